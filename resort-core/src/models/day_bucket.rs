use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Rate table partition for a single night.
///
/// Saturday and Sunday nights are priced from the weekend row, every other
/// night from the weekday row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayBucket {
    Weekday,
    Weekend,
}

impl DayBucket {
    /// Classifies the night starting on `date`.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weekday,
        }
    }

    /// Label used in the `Dias de la Semana` column of the rate files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekday => "Entre Semana",
            Self::Weekend => "Fin de Semana",
        }
    }

    /// Parses a rate file label. Matching ignores case and surrounding
    /// whitespace, since the files spell the weekend label both
    /// `Fin de semana` and `Fin de Semana`.
    pub fn parse(s: &str) -> Option<Self> {
        let label = s.trim().to_lowercase();
        match label.as_str() {
            "entre semana" => Some(Self::Weekday),
            "fin de semana" => Some(Self::Weekend),
            _ => None,
        }
    }
}

/// Iterates every night of the half-open range `[check_in, check_out)`.
///
/// Yields nothing when `check_out <= check_in`.
pub fn stay_nights(
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    check_in.iter_days().take_while(move |night| *night < check_out)
}

/// Number of nights between the two dates; zero or negative for an invalid stay.
pub fn night_count(
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> i64 {
    (check_out - check_in).num_days()
}
