//! All-Inclusive plan pricing.
//!
//! All-Inclusive rates are per person per night. The stay's per-person
//! subtotal is the sum of the weekday and weekend rates over every night; an
//! optional adult promotion reduces what each adult pays, and children are
//! priced by age tier from the undiscounted subtotal.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Weekday / weekend rate: `(hotel, room type, bucket)` season column, 0 if missing |
//! | 2    | Per-person subtotal: Σ nightly rate over `[check_in, check_out)` |
//! | 3    | Adult price: subtotal, halved by 2-for-1 or reduced by the percentage discount |
//! | 4    | Adults total: adult price × adults |
//! | 5    | Child price: free below 6, 75 % of the subtotal below 12, adult price from 12 |
//! | 6    | Total USD: adults total + children total; local = USD × currency rate |
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use resort_core::calculations::{
//!     AllInclusiveCalculator, AllInclusivePolicy, AllInclusiveRequest,
//! };
//! use resort_core::{AllInclusiveRateEntry, AllInclusiveRateTable, DayBucket, Promotion, Season};
//!
//! let rates: AllInclusiveRateTable = [
//!     AllInclusiveRateEntry {
//!         hotel: "Isleño".to_string(),
//!         room_type: "Estándar".to_string(),
//!         day_bucket: DayBucket::Weekday,
//!         low: Some(dec!(60)),
//!         medium: Some(dec!(80)),
//!         high: Some(dec!(100)),
//!     },
//!     AllInclusiveRateEntry {
//!         hotel: "Isleño".to_string(),
//!         room_type: "Estándar".to_string(),
//!         day_bucket: DayBucket::Weekend,
//!         low: Some(dec!(90)),
//!         medium: Some(dec!(120)),
//!         high: Some(dec!(150)),
//!     },
//! ]
//! .into_iter()
//! .collect();
//!
//! let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
//! let request = AllInclusiveRequest {
//!     hotel: "Isleño".to_string(),
//!     room_type: "Estándar".to_string(),
//!     season: Season::High,
//!     // Thursday to Sunday: two weekday nights and one Saturday
//!     check_in: NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
//!     check_out: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
//!     adults: 2,
//!     child_ages: vec![5, 7],
//!     promotion: Promotion::TwoForOne,
//!     currency_rate: dec!(4000),
//! };
//!
//! let quote = calculator.calculate(&request).unwrap();
//!
//! assert_eq!(quote.subtotal, dec!(350));
//! assert_eq!(quote.adults_total, dec!(350));
//! assert_eq!(quote.children_total, dec!(262.5));
//! assert_eq!(quote.total_usd, dec!(612.5));
//! ```

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{LOCAL_CURRENCY, checked_sum, format_amount, format_money};
use crate::models::{
    AllInclusiveRateTable, DayBucket, Promotion, PromotionSelection, Season, stay_nights,
};

/// Errors that can occur while pricing an All-Inclusive stay.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllInclusiveError {
    #[error("please select a hotel")]
    NoHotelSelected,

    #[error("please select a room type")]
    NoRoomTypeSelected,

    /// Check-out is not after check-in.
    #[error("please select valid dates: check-out {check_out} must be after check-in {check_in}")]
    InvalidStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("at least one adult is required")]
    NoAdults,

    #[error("discount percentage must be between 1 and 100, got {0}")]
    InvalidDiscountPercent(u32),

    #[error("currency rate must be positive, got {0}")]
    InvalidCurrencyRate(Decimal),

    #[error("child price factor must be between 0 and 1, got {0}")]
    InvalidChildFactor(Decimal),

    #[error("free age limit {free_below} must not exceed child age limit {child_below}")]
    InvalidAgeLimits { free_below: u32, child_below: u32 },
    #[error("amount too large to price; check the rates and currency rate")]
    AmountOverflow,
}

/// Age tiers and the child price factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllInclusivePolicy {
    /// Children younger than this stay free.
    pub free_below_age: u32,

    /// Children younger than this (and not free) pay the child factor. Guests
    /// at or above this age are priced as adults.
    pub child_below_age: u32,

    /// Share of the undiscounted per-person subtotal a paying child is charged.
    pub child_factor: Decimal,
}

impl AllInclusivePolicy {
    pub fn validate(&self) -> Result<(), AllInclusiveError> {
        if self.child_factor < Decimal::ZERO || self.child_factor > Decimal::ONE {
            return Err(AllInclusiveError::InvalidChildFactor(self.child_factor));
        }
        if self.free_below_age > self.child_below_age {
            return Err(AllInclusiveError::InvalidAgeLimits {
                free_below: self.free_below_age,
                child_below: self.child_below_age,
            });
        }
        Ok(())
    }

    pub fn tier(
        &self,
        age: u32,
    ) -> ChildTier {
        if age < self.free_below_age {
            ChildTier::Free
        } else if age < self.child_below_age {
            ChildTier::Child
        } else {
            ChildTier::Adult
        }
    }
}

impl Default for AllInclusivePolicy {
    fn default() -> Self {
        Self {
            free_below_age: 6,
            child_below_age: 12,
            child_factor: Decimal::new(75, 2),
        }
    }
}

/// Pricing tier a child falls into by age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildTier {
    Free,
    /// Charged the child factor of the undiscounted subtotal.
    Child,
    /// Old enough to pay the adult price, promotion included.
    Adult,
}

/// An All-Inclusive booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllInclusiveRequest {
    pub hotel: String,
    pub room_type: String,
    pub season: Season,
    pub check_in: NaiveDate,
    /// Exclusive: the night of `check_out` is not charged.
    pub check_out: NaiveDate,
    pub adults: u32,
    pub child_ages: Vec<u32>,
    pub promotion: Promotion,
    /// Local currency units per USD.
    pub currency_rate: Decimal,
}

/// Price charged for one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildCharge {
    pub age: u32,
    pub tier: ChildTier,
    pub price: Decimal,
}

/// Result of an All-Inclusive calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllInclusiveQuote {
    pub hotel: String,
    pub room_type: String,
    pub season: Season,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,

    pub weekday_rate: Decimal,
    pub weekend_rate: Decimal,
    pub weekday_nights: u32,
    pub weekend_nights: u32,
    pub weekday_subtotal: Decimal,
    pub weekend_subtotal: Decimal,
    /// Undiscounted per-person price of the whole stay.
    pub subtotal: Decimal,

    pub promotion: Promotion,
    /// Amount the promotion takes off each adult's price.
    pub promotion_savings: Decimal,
    pub adult_price: Decimal,
    pub adults: u32,
    pub adults_total: Decimal,

    pub children: Vec<ChildCharge>,
    pub children_total: Decimal,

    pub total_usd: Decimal,
    pub currency_rate: Decimal,
    pub total_local: Decimal,

    /// Child price factor the quote was computed with, kept for display.
    pub child_factor: Decimal,
}

impl AllInclusiveQuote {
    pub fn nights(&self) -> u32 {
        self.weekday_nights + self.weekend_nights
    }

    /// Condensed result shown next to the booking form.
    pub fn summary(&self) -> String {
        format!(
            "Total for {} nights:\n{} adults, {} children\nUSD ${}\n{LOCAL_CURRENCY} ${}",
            self.nights(),
            self.adults,
            self.children.len(),
            format_money(self.total_usd),
            format_amount(self.total_local, 0),
        )
    }
}

impl fmt::Display for AllInclusiveQuote {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Reservation details")?;
        writeln!(f, "Hotel: {}", self.hotel)?;
        writeln!(f, "Room: {}", self.room_type)?;
        writeln!(f, "Season: {}", self.season)?;
        writeln!(
            f,
            "Dates: {} - {}",
            self.check_in.format("%d/%m/%Y"),
            self.check_out.format("%d/%m/%Y")
        )?;
        writeln!(f, "Total nights: {}", self.nights())?;
        writeln!(
            f,
            "Guests: {} adults, {} children",
            self.adults,
            self.children.len()
        )?;

        writeln!(f)?;
        writeln!(f, "Nightly rates")?;
        writeln!(f, "Weekday rate: ${}", format_money(self.weekday_rate))?;
        writeln!(f, "Weekend rate: ${}", format_money(self.weekend_rate))?;
        writeln!(
            f,
            "Weekday nights: {} (${})",
            self.weekday_nights,
            format_money(self.weekday_subtotal)
        )?;
        writeln!(
            f,
            "Weekend nights: {} (${})",
            self.weekend_nights,
            format_money(self.weekend_subtotal)
        )?;
        writeln!(f, "Per-person subtotal: ${}", format_money(self.subtotal))?;

        match self.promotion {
            Promotion::None => {}
            Promotion::TwoForOne => writeln!(
                f,
                "2-for-1 applied to adults: -${}",
                format_money(self.promotion_savings)
            )?,
            Promotion::PercentOff(pct) => writeln!(
                f,
                "Discount {pct}% applied: -${}",
                format_money(self.promotion_savings)
            )?,
        }

        writeln!(f)?;
        writeln!(f, "Per-guest pricing")?;
        writeln!(f, "Adults ({}):", self.adults)?;
        writeln!(f, "  Price per adult: ${}", format_money(self.adult_price))?;
        writeln!(f, "  Adults total: ${}", format_money(self.adults_total))?;
        if !self.children.is_empty() {
            writeln!(f, "Children:")?;
            let factor_pct = format_amount(self.child_factor * Decimal::ONE_HUNDRED, 0);
            for (idx, child) in self.children.iter().enumerate() {
                let n = idx + 1;
                match child.tier {
                    ChildTier::Free => {
                        writeln!(f, "  Child {n} ({} years) - free", child.age)?
                    }
                    ChildTier::Child => writeln!(
                        f,
                        "  Child {n} ({} years) - {factor_pct}% of base price: ${}",
                        child.age,
                        format_money(child.price)
                    )?,
                    ChildTier::Adult => writeln!(
                        f,
                        "  Child {n} ({} years) - adult price: ${}",
                        child.age,
                        format_money(child.price)
                    )?,
                }
            }
            writeln!(f, "  Children total: ${}", format_money(self.children_total))?;
        }

        writeln!(f)?;
        writeln!(f, "Final total")?;
        writeln!(f, "Total USD: ${}", format_money(self.total_usd))?;
        write!(
            f,
            "Total {LOCAL_CURRENCY}: ${}",
            format_amount(self.total_local, 0)
        )
    }
}

/// Calculator for All-Inclusive stays over a loaded rate table.
#[derive(Debug, Clone)]
pub struct AllInclusiveCalculator<'a> {
    rates: &'a AllInclusiveRateTable,
    policy: AllInclusivePolicy,
}

impl<'a> AllInclusiveCalculator<'a> {
    pub fn new(
        rates: &'a AllInclusiveRateTable,
        policy: AllInclusivePolicy,
    ) -> Self {
        Self { rates, policy }
    }

    pub fn policy(&self) -> &AllInclusivePolicy {
        &self.policy
    }

    /// Prices the request.
    ///
    /// # Errors
    ///
    /// Returns [`AllInclusiveError`] when the policy is invalid, the hotel or
    /// room type is blank, the stay is not at least one night (checked before
    /// any rate lookup), there are no adults, the discount percentage is
    /// outside 1..=100, the currency rate is not positive, or a total exceeds
    /// the decimal range.
    pub fn calculate(
        &self,
        request: &AllInclusiveRequest,
    ) -> Result<AllInclusiveQuote, AllInclusiveError> {
        self.policy.validate()?;
        Self::validate_request(request)?;

        let weekday_rate = self.bucket_rate(request, DayBucket::Weekday);
        let weekend_rate = self.bucket_rate(request, DayBucket::Weekend);

        let (weekday_nights, weekend_nights) = stay_nights(request.check_in, request.check_out)
            .fold((0u32, 0u32), |(weekdays, weekends), night| {
                match DayBucket::of(night) {
                    DayBucket::Weekday => (weekdays + 1, weekends),
                    DayBucket::Weekend => (weekdays, weekends + 1),
                }
            });

        let weekday_subtotal = weekday_rate
            .checked_mul(Decimal::from(weekday_nights))
            .ok_or(AllInclusiveError::AmountOverflow)?;
        let weekend_subtotal = weekend_rate
            .checked_mul(Decimal::from(weekend_nights))
            .ok_or(AllInclusiveError::AmountOverflow)?;
        let subtotal = weekday_subtotal
            .checked_add(weekend_subtotal)
            .ok_or(AllInclusiveError::AmountOverflow)?;

        let adult_price = Self::apply_promotion(subtotal, request.promotion);
        let promotion_savings = subtotal - adult_price;
        let adults_total = adult_price
            .checked_mul(Decimal::from(request.adults))
            .ok_or(AllInclusiveError::AmountOverflow)?;

        let children: Vec<_> = request
            .child_ages
            .iter()
            .map(|age| self.child_charge(*age, subtotal, adult_price))
            .collect();
        let children_total = checked_sum(children.iter().map(|c| c.price))
            .ok_or(AllInclusiveError::AmountOverflow)?;

        let total_usd = adults_total
            .checked_add(children_total)
            .ok_or(AllInclusiveError::AmountOverflow)?;
        let total_local = total_usd
            .checked_mul(request.currency_rate)
            .ok_or(AllInclusiveError::AmountOverflow)?;

        debug!(
            hotel = %request.hotel,
            room_type = %request.room_type,
            season = request.season.as_str(),
            subtotal = %subtotal,
            total_usd = %total_usd,
            "all-inclusive stay priced"
        );

        Ok(AllInclusiveQuote {
            hotel: request.hotel.clone(),
            room_type: request.room_type.clone(),
            season: request.season,
            check_in: request.check_in,
            check_out: request.check_out,
            weekday_rate,
            weekend_rate,
            weekday_nights,
            weekend_nights,
            weekday_subtotal,
            weekend_subtotal,
            subtotal,
            promotion: request.promotion,
            promotion_savings,
            adult_price,
            adults: request.adults,
            adults_total,
            children,
            children_total,
            total_usd,
            currency_rate: request.currency_rate,
            total_local,
            child_factor: self.policy.child_factor,
        })
    }

    fn validate_request(request: &AllInclusiveRequest) -> Result<(), AllInclusiveError> {
        if request.hotel.trim().is_empty() {
            return Err(AllInclusiveError::NoHotelSelected);
        }
        if request.room_type.trim().is_empty() {
            return Err(AllInclusiveError::NoRoomTypeSelected);
        }
        if request.check_out <= request.check_in {
            return Err(AllInclusiveError::InvalidStay {
                check_in: request.check_in,
                check_out: request.check_out,
            });
        }
        if request.adults == 0 {
            return Err(AllInclusiveError::NoAdults);
        }
        if let Promotion::PercentOff(pct) = request.promotion {
            if !(PromotionSelection::MIN_PERCENT..=PromotionSelection::MAX_PERCENT).contains(&pct)
            {
                return Err(AllInclusiveError::InvalidDiscountPercent(pct));
            }
        }
        if request.currency_rate <= Decimal::ZERO {
            return Err(AllInclusiveError::InvalidCurrencyRate(
                request.currency_rate,
            ));
        }
        Ok(())
    }

    /// Season rate for one bucket; zero when the row or cell is missing.
    fn bucket_rate(
        &self,
        request: &AllInclusiveRequest,
        bucket: DayBucket,
    ) -> Decimal {
        match self
            .rates
            .rate(&request.hotel, &request.room_type, bucket, request.season)
        {
            Some(rate) => rate,
            None => {
                warn!(
                    hotel = %request.hotel,
                    room_type = %request.room_type,
                    bucket = bucket.as_str(),
                    season = request.season.as_str(),
                    "no all-inclusive rate; pricing bucket at zero"
                );
                Decimal::ZERO
            }
        }
    }

    fn apply_promotion(
        subtotal: Decimal,
        promotion: Promotion,
    ) -> Decimal {
        match promotion {
            Promotion::None => subtotal,
            Promotion::TwoForOne => subtotal / Decimal::TWO,
            Promotion::PercentOff(pct) => {
                subtotal * (Decimal::ONE - Decimal::from(pct) / Decimal::ONE_HUNDRED)
            }
        }
    }

    fn child_charge(
        &self,
        age: u32,
        subtotal: Decimal,
        adult_price: Decimal,
    ) -> ChildCharge {
        let tier = self.policy.tier(age);
        let price = match tier {
            ChildTier::Free => Decimal::ZERO,
            ChildTier::Child => subtotal * self.policy.child_factor,
            ChildTier::Adult => adult_price,
        };
        ChildCharge { age, tier, price }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::test_support::count_warnings;
    use crate::models::AllInclusiveRateEntry;

    fn date(
        y: i32,
        m: u32,
        d: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(
        hotel: &str,
        room: &str,
        bucket: DayBucket,
        high: Decimal,
    ) -> AllInclusiveRateEntry {
        AllInclusiveRateEntry {
            hotel: hotel.to_string(),
            room_type: room.to_string(),
            day_bucket: bucket,
            low: Some(high - dec!(40)),
            medium: Some(high - dec!(20)),
            high: Some(high),
        }
    }

    fn test_rates() -> AllInclusiveRateTable {
        [
            entry("Isleño", "Estándar", DayBucket::Weekday, dec!(100)),
            entry("Isleño", "Estándar", DayBucket::Weekend, dec!(150)),
            entry("Marazul", "Superior", DayBucket::Weekday, dec!(120)),
        ]
        .into_iter()
        .collect()
    }

    /// Isleño, High season, Thursday 6 to Sunday 9 March 2025: two weekday
    /// nights and one Saturday night.
    fn isleno_request() -> AllInclusiveRequest {
        AllInclusiveRequest {
            hotel: "Isleño".to_string(),
            room_type: "Estándar".to_string(),
            season: Season::High,
            check_in: date(2025, 3, 6),
            check_out: date(2025, 3, 9),
            adults: 2,
            child_ages: Vec::new(),
            promotion: Promotion::None,
            currency_rate: dec!(4000),
        }
    }

    #[test]
    fn three_nights_with_one_saturday_subtotal() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());

        let quote = calculator.calculate(&isleno_request()).unwrap();

        assert_eq!(quote.weekday_nights, 2);
        assert_eq!(quote.weekend_nights, 1);
        assert_eq!(quote.weekday_subtotal, dec!(200));
        assert_eq!(quote.weekend_subtotal, dec!(150));
        assert_eq!(quote.subtotal, dec!(350));
        assert_eq!(quote.adults_total, dec!(700));
        assert_eq!(quote.total_local, dec!(2800000));
    }

    #[test]
    fn two_for_one_with_children_scenario() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            child_ages: vec![5, 7],
            promotion: Promotion::TwoForOne,
            ..isleno_request()
        };

        let quote = calculator.calculate(&request).unwrap();

        assert_eq!(quote.adult_price, dec!(175));
        assert_eq!(quote.promotion_savings, dec!(175));
        assert_eq!(quote.adults_total, dec!(350));
        assert_eq!(quote.children_total, dec!(262.5));
        assert_eq!(quote.total_usd, dec!(612.5));
        assert_eq!(quote.total_local, dec!(2450000));
    }

    #[test]
    fn percent_discount_reduces_adult_price_only() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            child_ages: vec![8],
            promotion: Promotion::PercentOff(10),
            ..isleno_request()
        };

        let quote = calculator.calculate(&request).unwrap();

        assert_eq!(quote.adult_price, dec!(315));
        assert_eq!(quote.promotion_savings, dec!(35));
        assert_eq!(quote.adults_total, dec!(630));
        // child price ignores the discount
        assert_eq!(quote.children_total, dec!(262.5));
        assert_eq!(quote.total_usd, dec!(892.5));
    }

    #[test]
    fn full_percent_discount_makes_adults_free() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            promotion: Promotion::PercentOff(100),
            ..isleno_request()
        };

        let quote = calculator.calculate(&request).unwrap();

        assert_eq!(quote.adults_total, Decimal::ZERO);
    }

    #[test]
    fn child_age_boundaries() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            child_ages: vec![5, 6, 11, 12],
            promotion: Promotion::TwoForOne,
            ..isleno_request()
        };

        let quote = calculator.calculate(&request).unwrap();

        let charges: Vec<_> = quote
            .children
            .iter()
            .map(|c| (c.age, c.tier, c.price))
            .collect();
        assert_eq!(
            charges,
            vec![
                (5, ChildTier::Free, dec!(0)),
                (6, ChildTier::Child, dec!(262.5)),
                (11, ChildTier::Child, dec!(262.5)),
                // from 12 a guest pays the adult price, promotion included
                (12, ChildTier::Adult, dec!(175)),
            ]
        );
        assert_eq!(quote.children_total, dec!(700));
    }

    #[test]
    fn missing_weekend_row_prices_weekend_at_zero() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            hotel: "Marazul".to_string(),
            room_type: "Superior".to_string(),
            ..isleno_request()
        };

        let quote = calculator.calculate(&request).unwrap();

        assert_eq!(quote.weekday_rate, dec!(120));
        assert_eq!(quote.weekend_rate, Decimal::ZERO);
        assert_eq!(quote.subtotal, dec!(240));
    }

    #[test]
    fn season_selects_rate_column() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            season: Season::Low,
            ..isleno_request()
        };

        let quote = calculator.calculate(&request).unwrap();

        // 2 * 60 + 110
        assert_eq!(quote.subtotal, dec!(230));
    }

    #[test]
    fn currency_rate_is_user_settable() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            adults: 1,
            currency_rate: dec!(3900.5),
            ..isleno_request()
        };

        let quote = calculator.calculate(&request).unwrap();

        assert_eq!(quote.total_local, dec!(1365175));
    }

    #[test]
    fn invalid_range_is_rejected() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            check_out: date(2025, 3, 6),
            ..isleno_request()
        };

        let result = calculator.calculate(&request);

        assert_eq!(
            result,
            Err(AllInclusiveError::InvalidStay {
                check_in: date(2025, 3, 6),
                check_out: date(2025, 3, 6),
            })
        );
    }

    #[test]
    fn invalid_range_skips_rate_lookups() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            hotel: "Nowhere".to_string(),
            check_out: date(2025, 3, 5),
            ..isleno_request()
        };

        let (result, warnings) = count_warnings(|| calculator.calculate(&request));

        assert!(matches!(result, Err(AllInclusiveError::InvalidStay { .. })));
        assert_eq!(warnings, 0);
    }

    #[test]
    fn huge_currency_rate_is_an_error() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            currency_rate: Decimal::from_i128_with_scale(10_i128.pow(28), 0),
            ..isleno_request()
        };

        let result = calculator.calculate(&request);

        assert_eq!(result, Err(AllInclusiveError::AmountOverflow));
    }

    #[test]
    fn request_validation_errors() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());

        let cases = [
            (
                AllInclusiveRequest {
                    hotel: String::new(),
                    ..isleno_request()
                },
                AllInclusiveError::NoHotelSelected,
            ),
            (
                AllInclusiveRequest {
                    room_type: " ".to_string(),
                    ..isleno_request()
                },
                AllInclusiveError::NoRoomTypeSelected,
            ),
            (
                AllInclusiveRequest {
                    adults: 0,
                    ..isleno_request()
                },
                AllInclusiveError::NoAdults,
            ),
            (
                AllInclusiveRequest {
                    promotion: Promotion::PercentOff(0),
                    ..isleno_request()
                },
                AllInclusiveError::InvalidDiscountPercent(0),
            ),
            (
                AllInclusiveRequest {
                    currency_rate: dec!(0),
                    ..isleno_request()
                },
                AllInclusiveError::InvalidCurrencyRate(dec!(0)),
            ),
        ];

        for (request, expected) in cases {
            assert_eq!(calculator.calculate(&request), Err(expected));
        }
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let rates = test_rates();
        let policy = AllInclusivePolicy {
            free_below_age: 13,
            ..AllInclusivePolicy::default()
        };
        let calculator = AllInclusiveCalculator::new(&rates, policy);

        let result = calculator.calculate(&isleno_request());

        assert_eq!(
            result,
            Err(AllInclusiveError::InvalidAgeLimits {
                free_below: 13,
                child_below: 12,
            })
        );
    }

    #[test]
    fn summary_matches_form_layout() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            child_ages: vec![5, 7],
            promotion: Promotion::TwoForOne,
            ..isleno_request()
        };

        let quote = calculator.calculate(&request).unwrap();

        assert_eq!(
            quote.summary(),
            "Total for 3 nights:\n2 adults, 2 children\nUSD $612.50\nCOP $2,450,000"
        );
    }

    #[test]
    fn details_list_promotion_and_children() {
        let rates = test_rates();
        let calculator = AllInclusiveCalculator::new(&rates, AllInclusivePolicy::default());
        let request = AllInclusiveRequest {
            child_ages: vec![5, 7],
            promotion: Promotion::TwoForOne,
            ..isleno_request()
        };

        let details = calculator.calculate(&request).unwrap().to_string();

        assert!(details.contains("Dates: 06/03/2025 - 09/03/2025"));
        assert!(details.contains("Weekday nights: 2 ($200.00)"));
        assert!(details.contains("Weekend nights: 1 ($150.00)"));
        assert!(details.contains("2-for-1 applied to adults: -$175.00"));
        assert!(details.contains("Child 1 (5 years) - free"));
        assert!(details.contains("Child 2 (7 years) - 75% of base price: $262.50"));
        assert!(details.ends_with("Total USD: $612.50\nTotal COP: $2,450,000"));
    }
}
