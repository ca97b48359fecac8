//! Decas plan pricing.
//!
//! A Decas stay is priced per room: every night of the stay reads the decas
//! value of the booked room type from the hotel's weekday or weekend row,
//! converts it to USD at a fixed factor, and the per-room subtotal is
//! multiplied by the number of rooms of that type.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Nightly decas: rate row `(hotel, bucket)`, room type column |
//! | 2    | Nightly USD: nightly decas × `usd_per_deca` |
//! | 3    | Per-room subtotal: Σ nightly decas / USD over `[check_in, check_out)` |
//! | 4    | Room type total: per-room subtotal × rooms booked |
//! | 5    | Totals: Σ room type totals; local currency = USD × `local_per_usd` |
//!
//! A night whose rate row is missing contributes zero. It is not an error;
//! the night is flagged in the breakdown and logged so the undercount is
//! visible.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use resort_core::calculations::{DecasCalculator, DecasConfig, DecasRequest};
//! use resort_core::{DayBucket, DecasRateEntry, DecasRateTable, RoomCounts};
//!
//! let rates: DecasRateTable = [
//!     DecasRateEntry {
//!         hotel: "Isleño".to_string(),
//!         day_bucket: DayBucket::Weekday,
//!         double: Some(dec!(20)),
//!         triple: Some(dec!(26)),
//!         quadruple: Some(dec!(32)),
//!     },
//!     DecasRateEntry {
//!         hotel: "Isleño".to_string(),
//!         day_bucket: DayBucket::Weekend,
//!         double: Some(dec!(30)),
//!         triple: Some(dec!(36)),
//!         quadruple: Some(dec!(42)),
//!     },
//! ]
//! .into_iter()
//! .collect();
//!
//! let calculator = DecasCalculator::new(&rates, DecasConfig::default());
//! let request = DecasRequest {
//!     hotel: "Isleño".to_string(),
//!     // Thursday to Sunday: Thu, Fri weekday nights and one Saturday night
//!     check_in: NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
//!     check_out: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
//!     rooms: RoomCounts::new(2, 0, 0),
//! };
//!
//! let quote = calculator.calculate(&request).unwrap();
//!
//! assert_eq!(quote.total_decas, dec!(140));
//! assert_eq!(quote.total_usd, dec!(700));
//! assert_eq!(quote.total_local, dec!(2800000));
//! ```

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{LOCAL_CURRENCY, checked_sum, format_amount, format_money};
use crate::models::{DayBucket, DecasRateTable, DecasRoomType, RoomCounts, stay_nights};

/// Errors that can occur while pricing a Decas stay.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecasError {
    /// No hotel has been selected.
    #[error("please select a hotel")]
    NoHotelSelected,

    /// Check-out is not after check-in.
    #[error("please select valid dates: check-out {check_out} must be after check-in {check_in}")]
    InvalidStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// The decas to USD factor must be positive.
    #[error("USD per deca must be positive, got {0}")]
    InvalidUsdPerDeca(Decimal),

    /// The USD to local currency rate must be positive.
    #[error("local currency rate must be positive, got {0}")]
    InvalidLocalRate(Decimal),

    /// A total does not fit in a decimal amount.
    #[error("amount too large to price; check the rates and conversion constants")]
    AmountOverflow,
}

/// Conversion constants for the Decas plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecasConfig {
    /// USD value of one deca.
    pub usd_per_deca: Decimal,

    /// Local currency units per USD.
    pub local_per_usd: Decimal,
}

impl DecasConfig {
    pub fn validate(&self) -> Result<(), DecasError> {
        if self.usd_per_deca <= Decimal::ZERO {
            return Err(DecasError::InvalidUsdPerDeca(self.usd_per_deca));
        }
        if self.local_per_usd <= Decimal::ZERO {
            return Err(DecasError::InvalidLocalRate(self.local_per_usd));
        }
        Ok(())
    }
}

impl Default for DecasConfig {
    fn default() -> Self {
        Self {
            usd_per_deca: Decimal::from(5),
            local_per_usd: Decimal::from(4000),
        }
    }
}

/// A Decas booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecasRequest {
    pub hotel: String,
    pub check_in: NaiveDate,
    /// Exclusive: the night of `check_out` is not charged.
    pub check_out: NaiveDate,
    pub rooms: RoomCounts,
}

/// Price of a single night for one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecasNight {
    pub date: NaiveDate,
    pub bucket: DayBucket,
    pub decas: Decimal,
    pub usd: Decimal,
    /// `false` when the hotel has no row for this bucket and the night was
    /// priced at zero.
    pub rate_found: bool,
}

/// Pricing of every room of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecasRoomBreakdown {
    pub room_type: DecasRoomType,
    pub rooms: u32,
    pub nights: Vec<DecasNight>,
    pub decas_per_room: Decimal,
    pub usd_per_room: Decimal,
    pub decas_total: Decimal,
    pub usd_total: Decimal,
}

impl DecasRoomBreakdown {
    pub fn missing_nights(&self) -> usize {
        self.nights.iter().filter(|night| !night.rate_found).count()
    }
}

/// Result of a Decas calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecasQuote {
    pub hotel: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rooms: Vec<DecasRoomBreakdown>,
    pub total_decas: Decimal,
    pub total_usd: Decimal,
    pub total_local: Decimal,
}

impl DecasQuote {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Nights priced at zero because no rate row matched, summed over all
    /// booked room types.
    pub fn missing_nights(&self) -> usize {
        self.rooms.iter().map(DecasRoomBreakdown::missing_nights).sum()
    }

    /// One-line summary of the totals.
    pub fn summary(&self) -> String {
        format!(
            "{} night(s), {} decas, USD ${}, {LOCAL_CURRENCY} ${}",
            self.nights(),
            format_amount(self.total_decas, 2),
            format_money(self.total_usd),
            format_money(self.total_local),
        )
    }
}

impl fmt::Display for DecasQuote {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for breakdown in &self.rooms {
            writeln!(f, "{} ({}):", breakdown.room_type, breakdown.rooms)?;
            for night in breakdown.nights.iter().filter(|night| night.rate_found) {
                writeln!(
                    f,
                    "  {}: ${} ({} decas)",
                    night.date.format("%d/%m/%Y"),
                    format_money(night.usd),
                    format_amount(night.decas, 2),
                )?;
            }
            let missing = breakdown.missing_nights();
            if missing > 0 {
                writeln!(f, "  {missing} night(s) without a rate, priced at 0")?;
            }
            if breakdown.rooms > 1 {
                writeln!(
                    f,
                    "  Subtotal per room: ${}",
                    format_money(breakdown.usd_per_room)
                )?;
            }
            writeln!(f)?;
        }
        writeln!(f, "TOTAL DECAS: {}", format_amount(self.total_decas, 2))?;
        writeln!(f, "TOTAL USD: ${}", format_money(self.total_usd))?;
        write!(
            f,
            "TOTAL {LOCAL_CURRENCY}: ${}",
            format_money(self.total_local)
        )
    }
}

/// Calculator for Decas stays over a loaded rate table.
#[derive(Debug, Clone)]
pub struct DecasCalculator<'a> {
    rates: &'a DecasRateTable,
    config: DecasConfig,
}

impl<'a> DecasCalculator<'a> {
    pub fn new(
        rates: &'a DecasRateTable,
        config: DecasConfig,
    ) -> Self {
        Self { rates, config }
    }

    pub fn config(&self) -> &DecasConfig {
        &self.config
    }

    /// Prices the request.
    ///
    /// # Errors
    ///
    /// * [`DecasError::NoHotelSelected`] when the hotel is blank.
    /// * [`DecasError::InvalidStay`] when `check_out <= check_in`; no rate
    ///   lookups are made in that case.
    /// * [`DecasError::InvalidUsdPerDeca`] / [`DecasError::InvalidLocalRate`]
    ///   for a non-positive conversion constant.
    /// * [`DecasError::AmountOverflow`] when a total exceeds the decimal range.
    pub fn calculate(
        &self,
        request: &DecasRequest,
    ) -> Result<DecasQuote, DecasError> {
        self.config.validate()?;

        if request.hotel.trim().is_empty() {
            return Err(DecasError::NoHotelSelected);
        }
        if request.check_out <= request.check_in {
            return Err(DecasError::InvalidStay {
                check_in: request.check_in,
                check_out: request.check_out,
            });
        }

        let rooms = request
            .rooms
            .booked()
            .map(|(room_type, count)| self.price_room_type(request, room_type, count))
            .collect::<Result<Vec<_>, _>>()?;

        let total_decas =
            checked_sum(rooms.iter().map(|r| r.decas_total)).ok_or(DecasError::AmountOverflow)?;
        let total_usd =
            checked_sum(rooms.iter().map(|r| r.usd_total)).ok_or(DecasError::AmountOverflow)?;
        let total_local = total_usd
            .checked_mul(self.config.local_per_usd)
            .ok_or(DecasError::AmountOverflow)?;

        debug!(
            hotel = %request.hotel,
            total_decas = %total_decas,
            total_usd = %total_usd,
            "decas stay priced"
        );

        Ok(DecasQuote {
            hotel: request.hotel.clone(),
            check_in: request.check_in,
            check_out: request.check_out,
            rooms,
            total_decas,
            total_usd,
            total_local,
        })
    }

    fn price_room_type(
        &self,
        request: &DecasRequest,
        room_type: DecasRoomType,
        rooms: u32,
    ) -> Result<DecasRoomBreakdown, DecasError> {
        let nights = stay_nights(request.check_in, request.check_out)
            .map(|date| self.price_night(&request.hotel, room_type, date))
            .collect::<Result<Vec<_>, _>>()?;

        let decas_per_room =
            checked_sum(nights.iter().map(|n| n.decas)).ok_or(DecasError::AmountOverflow)?;
        let usd_per_room =
            checked_sum(nights.iter().map(|n| n.usd)).ok_or(DecasError::AmountOverflow)?;
        let count = Decimal::from(rooms);

        Ok(DecasRoomBreakdown {
            room_type,
            rooms,
            nights,
            decas_per_room,
            usd_per_room,
            decas_total: decas_per_room
                .checked_mul(count)
                .ok_or(DecasError::AmountOverflow)?,
            usd_total: usd_per_room
                .checked_mul(count)
                .ok_or(DecasError::AmountOverflow)?,
        })
    }

    fn price_night(
        &self,
        hotel: &str,
        room_type: DecasRoomType,
        date: NaiveDate,
    ) -> Result<DecasNight, DecasError> {
        let bucket = DayBucket::of(date);
        let decas = self
            .rates
            .get(hotel, bucket)
            .map(|entry| entry.price(room_type).unwrap_or(Decimal::ZERO));

        if decas.is_none() {
            warn!(
                hotel,
                bucket = bucket.as_str(),
                %date,
                "no decas rate row for night; contributing zero"
            );
        }

        let decas_value = decas.unwrap_or(Decimal::ZERO);
        let usd = decas_value
            .checked_mul(self.config.usd_per_deca)
            .ok_or(DecasError::AmountOverflow)?;
        Ok(DecasNight {
            date,
            bucket,
            decas: decas_value,
            usd,
            rate_found: decas.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::test_support::count_warnings;
    use crate::models::DecasRateEntry;

    fn date(
        y: i32,
        m: u32,
        d: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(
        hotel: &str,
        bucket: DayBucket,
        base: Decimal,
    ) -> DecasRateEntry {
        DecasRateEntry {
            hotel: hotel.to_string(),
            day_bucket: bucket,
            double: Some(base),
            triple: Some(base + dec!(6)),
            quadruple: Some(base + dec!(12)),
        }
    }

    fn test_rates() -> DecasRateTable {
        [
            entry("Isleño", DayBucket::Weekday, dec!(20)),
            entry("Isleño", DayBucket::Weekend, dec!(30)),
            entry("Marazul", DayBucket::Weekday, dec!(18.5)),
        ]
        .into_iter()
        .collect()
    }

    fn request(
        hotel: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        rooms: RoomCounts,
    ) -> DecasRequest {
        DecasRequest {
            hotel: hotel.to_string(),
            check_in,
            check_out,
            rooms,
        }
    }

    #[test]
    fn single_weekday_night_single_double() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        // Monday night
        let quote = calculator
            .calculate(&request(
                "Isleño",
                date(2025, 3, 3),
                date(2025, 3, 4),
                RoomCounts::new(1, 0, 0),
            ))
            .unwrap();

        assert_eq!(quote.total_decas, dec!(20));
        assert_eq!(quote.total_usd, dec!(100));
        assert_eq!(quote.total_local, dec!(400000));
        assert_eq!(quote.rooms[0].nights[0].bucket, DayBucket::Weekday);
    }

    #[test]
    fn weekend_nights_use_weekend_row() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        // Friday to Monday: Fri weekday, Sat and Sun weekend
        let quote = calculator
            .calculate(&request(
                "Isleño",
                date(2025, 3, 7),
                date(2025, 3, 10),
                RoomCounts::new(1, 0, 0),
            ))
            .unwrap();

        let buckets: Vec<_> = quote.rooms[0].nights.iter().map(|n| n.bucket).collect();
        assert_eq!(
            buckets,
            vec![DayBucket::Weekday, DayBucket::Weekend, DayBucket::Weekend]
        );
        assert_eq!(quote.total_decas, dec!(80));
    }

    #[test]
    fn room_count_multiplies_per_room_subtotal() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        let quote = calculator
            .calculate(&request(
                "Isleño",
                date(2025, 3, 3),
                date(2025, 3, 5),
                RoomCounts::new(3, 0, 0),
            ))
            .unwrap();

        let doubles = &quote.rooms[0];
        assert_eq!(doubles.decas_per_room, dec!(40));
        assert_eq!(doubles.usd_per_room, dec!(200));
        assert_eq!(doubles.decas_total, dec!(120));
        assert_eq!(doubles.usd_total, dec!(600));
    }

    #[test]
    fn mixed_room_types_sum_independently() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        // Two weekday nights: double 20, triple 26, quadruple 32 per night
        let quote = calculator
            .calculate(&request(
                "Isleño",
                date(2025, 3, 3),
                date(2025, 3, 5),
                RoomCounts::new(1, 2, 1),
            ))
            .unwrap();

        // 40 + 2 * 52 + 64
        assert_eq!(quote.total_decas, dec!(208));
        assert_eq!(quote.total_usd, quote.total_decas * dec!(5));
        assert_eq!(quote.total_local, quote.total_usd * dec!(4000));
        assert_eq!(quote.rooms.len(), 3);
    }

    #[test]
    fn fractional_decas_keep_full_precision() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        let quote = calculator
            .calculate(&request(
                "Marazul",
                date(2025, 3, 3),
                date(2025, 3, 6),
                RoomCounts::new(1, 0, 0),
            ))
            .unwrap();

        assert_eq!(quote.total_decas, dec!(55.5));
        assert_eq!(quote.total_usd, dec!(277.5));
        assert_eq!(quote.total_local, dec!(1110000));
    }

    #[test]
    fn missing_bucket_row_contributes_zero() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        // Marazul has no weekend row; Fri priced, Sat and Sun are zero
        let quote = calculator
            .calculate(&request(
                "Marazul",
                date(2025, 3, 7),
                date(2025, 3, 10),
                RoomCounts::new(1, 0, 0),
            ))
            .unwrap();

        assert_eq!(quote.total_decas, dec!(18.5));
        assert_eq!(quote.missing_nights(), 2);
        assert!(!quote.rooms[0].nights[1].rate_found);
    }

    #[test]
    fn unknown_hotel_prices_every_night_at_zero() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        let quote = calculator
            .calculate(&request(
                "Nowhere",
                date(2025, 3, 3),
                date(2025, 3, 5),
                RoomCounts::new(1, 0, 0),
            ))
            .unwrap();

        assert_eq!(quote.total_usd, Decimal::ZERO);
        assert_eq!(quote.missing_nights(), 2);
    }

    #[test]
    fn no_rooms_gives_zero_totals() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        let quote = calculator
            .calculate(&request(
                "Isleño",
                date(2025, 3, 3),
                date(2025, 3, 5),
                RoomCounts::default(),
            ))
            .unwrap();

        assert!(quote.rooms.is_empty());
        assert_eq!(quote.total_decas, Decimal::ZERO);
        assert_eq!(quote.total_local, Decimal::ZERO);
    }

    #[test]
    fn check_out_equal_to_check_in_is_rejected() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        let result = calculator.calculate(&request(
            "Isleño",
            date(2025, 3, 3),
            date(2025, 3, 3),
            RoomCounts::new(1, 0, 0),
        ));

        assert_eq!(
            result,
            Err(DecasError::InvalidStay {
                check_in: date(2025, 3, 3),
                check_out: date(2025, 3, 3),
            })
        );
    }

    #[test]
    fn check_out_before_check_in_is_rejected() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        let result = calculator.calculate(&request(
            "Isleño",
            date(2025, 3, 5),
            date(2025, 3, 3),
            RoomCounts::new(1, 0, 0),
        ));

        assert!(matches!(result, Err(DecasError::InvalidStay { .. })));
    }

    #[test]
    fn invalid_range_is_rejected_before_any_lookup() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        // Every lookup for an unknown hotel misses and warns.
        let (priced, priced_warnings) = count_warnings(|| {
            calculator.calculate(&request(
                "Nowhere",
                date(2025, 3, 3),
                date(2025, 3, 5),
                RoomCounts::new(1, 0, 0),
            ))
        });
        assert!(priced.is_ok());
        assert_eq!(priced_warnings, 2);

        let (result, warnings) = count_warnings(|| {
            calculator.calculate(&request(
                "Nowhere",
                date(2025, 3, 5),
                date(2025, 3, 3),
                RoomCounts::new(1, 0, 0),
            ))
        });

        assert!(matches!(result, Err(DecasError::InvalidStay { .. })));
        assert_eq!(warnings, 0);
    }

    #[test]
    fn local_total_overflow_is_an_error() {
        let rates = test_rates();
        let config = DecasConfig {
            usd_per_deca: dec!(5),
            local_per_usd: Decimal::MAX,
        };
        let calculator = DecasCalculator::new(&rates, config);

        let result = calculator.calculate(&request(
            "Isleño",
            date(2025, 3, 3),
            date(2025, 3, 4),
            RoomCounts::new(1, 0, 0),
        ));

        assert_eq!(result, Err(DecasError::AmountOverflow));
    }

    #[test]
    fn nightly_usd_overflow_is_an_error() {
        let rates = test_rates();
        let config = DecasConfig {
            usd_per_deca: Decimal::MAX,
            local_per_usd: dec!(4000),
        };
        let calculator = DecasCalculator::new(&rates, config);

        let result = calculator.calculate(&request(
            "Isleño",
            date(2025, 3, 3),
            date(2025, 3, 4),
            RoomCounts::new(1, 0, 0),
        ));

        assert_eq!(result, Err(DecasError::AmountOverflow));
    }

    #[test]
    fn blank_hotel_is_rejected() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        let result = calculator.calculate(&request(
            " ",
            date(2025, 3, 3),
            date(2025, 3, 4),
            RoomCounts::new(1, 0, 0),
        ));

        assert_eq!(result, Err(DecasError::NoHotelSelected));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let rates = test_rates();
        let config = DecasConfig {
            usd_per_deca: dec!(0),
            local_per_usd: dec!(4000),
        };
        let calculator = DecasCalculator::new(&rates, config);

        let result = calculator.calculate(&request(
            "Isleño",
            date(2025, 3, 3),
            date(2025, 3, 4),
            RoomCounts::new(1, 0, 0),
        ));

        assert_eq!(result, Err(DecasError::InvalidUsdPerDeca(dec!(0))));
    }

    #[test]
    fn breakdown_lists_nights_and_totals() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        let quote = calculator
            .calculate(&request(
                "Isleño",
                date(2025, 3, 7),
                date(2025, 3, 9),
                RoomCounts::new(2, 0, 0),
            ))
            .unwrap();

        let expected = "\
Doble (2):
  07/03/2025: $100.00 (20.00 decas)
  08/03/2025: $150.00 (30.00 decas)
  Subtotal per room: $250.00

TOTAL DECAS: 100.00
TOTAL USD: $500.00
TOTAL COP: $2,000,000.00";
        assert_eq!(quote.to_string(), expected);
    }

    #[test]
    fn summary_condenses_totals() {
        let rates = test_rates();
        let calculator = DecasCalculator::new(&rates, DecasConfig::default());

        let quote = calculator
            .calculate(&request(
                "Isleño",
                date(2025, 3, 3),
                date(2025, 3, 4),
                RoomCounts::new(1, 0, 0),
            ))
            .unwrap();

        assert_eq!(
            quote.summary(),
            "1 night(s), 20.00 decas, USD $100.00, COP $400,000.00"
        );
    }
}
