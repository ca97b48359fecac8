use std::fmt;

use serde::{Deserialize, Serialize};

/// Adult-side promotion applied to an All-Inclusive stay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Promotion {
    #[default]
    None,
    /// Adults pay half of the per-person subtotal.
    TwoForOne,
    /// Adults pay the per-person subtotal less this whole percentage.
    PercentOff(u32),
}

impl fmt::Display for Promotion {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::TwoForOne => f.write_str("2-for-1"),
            Self::PercentOff(pct) => write!(f, "{pct}% discount"),
        }
    }
}

/// Promotion inputs as the booking form holds them.
///
/// The two promotions are mutually exclusive: turning one on turns the other
/// off. The percentage value is remembered while its flag is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionSelection {
    two_for_one: bool,
    percent_enabled: bool,
    percent: u32,
}

impl PromotionSelection {
    pub const DEFAULT_PERCENT: u32 = 10;
    pub const MIN_PERCENT: u32 = 1;
    pub const MAX_PERCENT: u32 = 100;

    pub fn new(percent: u32) -> Self {
        Self {
            two_for_one: false,
            percent_enabled: false,
            percent: percent.clamp(Self::MIN_PERCENT, Self::MAX_PERCENT),
        }
    }

    /// Toggles 2-for-1; enabling it disables the percentage discount.
    pub fn set_two_for_one(
        &mut self,
        enabled: bool,
    ) {
        self.two_for_one = enabled;
        if enabled {
            self.percent_enabled = false;
        }
    }

    /// Toggles the percentage discount; enabling it disables 2-for-1.
    pub fn set_percent_enabled(
        &mut self,
        enabled: bool,
    ) {
        self.percent_enabled = enabled;
        if enabled {
            self.two_for_one = false;
        }
    }

    /// Sets the discount percentage, clamped to 1..=100.
    pub fn set_percent(
        &mut self,
        percent: u32,
    ) {
        self.percent = percent.clamp(Self::MIN_PERCENT, Self::MAX_PERCENT);
    }

    pub fn two_for_one(&self) -> bool {
        self.two_for_one
    }

    pub fn percent_enabled(&self) -> bool {
        self.percent_enabled
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }

    /// The promotion the calculator should apply.
    pub fn promotion(&self) -> Promotion {
        if self.two_for_one {
            Promotion::TwoForOne
        } else if self.percent_enabled {
            Promotion::PercentOff(self.percent)
        } else {
            Promotion::None
        }
    }
}

impl Default for PromotionSelection {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERCENT)
    }
}
