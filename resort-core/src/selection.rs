//! Booking selection shared by the pricing views.
//!
//! Hotel, season and stay dates are edited in one place and pushed to every
//! registered observer, so each calculator view prices the same stay. Every
//! setter runs its own notification pass; there is no batching.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Season;

/// A single field change delivered to observers, carrying the new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionChange {
    Hotel(String),
    Season(Season),
    CheckIn(NaiveDate),
    CheckOut(NaiveDate),
}

/// Receives selection changes in registration order.
pub trait SelectionObserver {
    fn selection_changed(
        &mut self,
        change: &SelectionChange,
    );
}

/// Plain copy of the selection fields.
///
/// Views keep one of these and fold incoming changes into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub hotel: String,
    pub season: Season,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl SelectionSnapshot {
    pub fn apply(
        &mut self,
        change: &SelectionChange,
    ) {
        match change {
            SelectionChange::Hotel(hotel) => self.hotel.clone_from(hotel),
            SelectionChange::Season(season) => self.season = *season,
            SelectionChange::CheckIn(date) => self.check_in = *date,
            SelectionChange::CheckOut(date) => self.check_out = *date,
        }
    }
}

/// Shared, observable booking selection.
///
/// Holds `check_out > check_in` after every write: a check-in on or after the
/// current check-out pushes check-out to the following day.
pub struct SelectionState {
    hotel: String,
    season: Season,
    check_in: NaiveDate,
    check_out: NaiveDate,
    observers: Vec<Rc<RefCell<dyn SelectionObserver>>>,
}

impl std::fmt::Debug for SelectionState {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SelectionState")
            .field("hotel", &self.hotel)
            .field("season", &self.season)
            .field("check_in", &self.check_in)
            .field("check_out", &self.check_out)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// The day after `date`. `NaiveDate::MAX` has no successor, so the stay
/// collapses to zero nights there and the calculators reject it as invalid.
fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or_else(|| {
        warn!(%date, "no day after check-in; stay has zero nights");
        date
    })
}

impl SelectionState {
    /// Starts a one-night stay at `check_in` in the low season.
    pub fn new(
        hotel: impl Into<String>,
        check_in: NaiveDate,
    ) -> Self {
        Self {
            hotel: hotel.into(),
            season: Season::default(),
            check_in,
            check_out: next_day(check_in),
            observers: Vec::new(),
        }
    }

    /// Registers an observer for the lifetime of the state.
    pub fn subscribe(
        &mut self,
        observer: Rc<RefCell<dyn SelectionObserver>>,
    ) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn hotel(&self) -> &str {
        &self.hotel
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            hotel: self.hotel.clone(),
            season: self.season,
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }

    pub fn set_hotel(
        &mut self,
        hotel: impl Into<String>,
    ) {
        self.hotel = hotel.into();
        self.notify(SelectionChange::Hotel(self.hotel.clone()));
    }

    pub fn set_season(
        &mut self,
        season: Season,
    ) {
        self.season = season;
        self.notify(SelectionChange::Season(season));
    }

    /// Sets check-in. If check-out is no longer after it, check-out moves to
    /// the next day and observers get a second, separate notification.
    pub fn set_check_in(
        &mut self,
        date: NaiveDate,
    ) {
        self.check_in = date;
        self.notify(SelectionChange::CheckIn(date));

        if self.check_out <= self.check_in {
            let bumped = next_day(self.check_in);
            debug!(%bumped, "check-out not after check-in; moving check-out");
            self.check_out = bumped;
            self.notify(SelectionChange::CheckOut(bumped));
        }
    }

    /// Sets check-out; a date on or before check-in stores the day after
    /// check-in instead.
    pub fn set_check_out(
        &mut self,
        date: NaiveDate,
    ) {
        self.check_out = if date <= self.check_in {
            next_day(self.check_in)
        } else {
            date
        };
        self.notify(SelectionChange::CheckOut(self.check_out));
    }

    fn notify(
        &self,
        change: SelectionChange,
    ) {
        for observer in &self.observers {
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.selection_changed(&change),
                Err(_) => {
                    warn!(?change, "observer busy; skipping selection notification")
                }
            }
        }
    }
}
