//! Session wiring: rate tables, shared selection, and the two views.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeSet;
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use resort_core::{
    AllInclusiveRateTable, DecasRateTable, Season, SelectionState, pick_default_hotel,
};
use resort_data::{AllInclusiveRateLoader, DecasRateLoader};
use tracing::{debug, info};

use crate::config::PricingConfig;
use crate::views::{AllInclusiveView, DecasView};

/// Both rate tables, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RateBook {
    pub decas: Rc<DecasRateTable>,
    pub all_inclusive: Rc<AllInclusiveRateTable>,
}

impl RateBook {
    pub fn new(
        decas: DecasRateTable,
        all_inclusive: AllInclusiveRateTable,
    ) -> Self {
        Self {
            decas: Rc::new(decas),
            all_inclusive: Rc::new(all_inclusive),
        }
    }

    /// Loads both rate files named by the configuration. Either failing is
    /// fatal.
    pub fn load(config: &PricingConfig) -> Result<Self> {
        let decas = DecasRateLoader::load_from_file(&config.decas_rates).with_context(|| {
            format!(
                "Failed to load Decas rates: {}",
                config.decas_rates.display()
            )
        })?;
        let all_inclusive = AllInclusiveRateLoader::load_from_file(&config.all_inclusive_rates)
            .with_context(|| {
                format!(
                    "Failed to load All-Inclusive rates: {}",
                    config.all_inclusive_rates.display()
                )
            })?;
        Ok(Self::new(decas, all_inclusive))
    }

    /// Sorted hotels appearing in either table.
    pub fn hotels(&self) -> Vec<&str> {
        let hotels: BTreeSet<&str> = self
            .decas
            .hotels()
            .into_iter()
            .chain(self.all_inclusive.hotels())
            .collect();
        hotels.into_iter().collect()
    }
}

/// One pricing session: a shared selection observed by a Decas view and an
/// All-Inclusive view, registered in that order.
#[derive(Debug)]
pub struct PricingSession {
    rates: RateBook,
    selection: SelectionState,
    decas: Rc<RefCell<DecasView>>,
    all_inclusive: Rc<RefCell<AllInclusiveView>>,
}

impl PricingSession {
    /// Starts a one-night stay at `today` on the configured default hotel,
    /// or the first listed hotel when that one has no rates.
    pub fn new(
        rates: RateBook,
        config: &PricingConfig,
        today: NaiveDate,
    ) -> Self {
        let hotel = pick_default_hotel(&rates.hotels(), &config.default_hotel)
            .unwrap_or_default()
            .to_string();
        let mut selection = SelectionState::new(hotel, today);

        let decas = Rc::new(RefCell::new(DecasView::new(
            Rc::clone(&rates.decas),
            config.decas_config(),
            selection.snapshot(),
        )));
        let all_inclusive = Rc::new(RefCell::new(AllInclusiveView::new(
            Rc::clone(&rates.all_inclusive),
            config.child_policy,
            selection.snapshot(),
            config.default_discount_percent,
            config.default_currency_rate,
        )));

        selection.subscribe(decas.clone());
        selection.subscribe(all_inclusive.clone());

        info!(
            hotel = selection.hotel(),
            hotels = rates.hotels().len(),
            "pricing session started"
        );

        Self {
            rates,
            selection,
            decas,
            all_inclusive,
        }
    }

    pub fn rates(&self) -> &RateBook {
        &self.rates
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn set_hotel(
        &mut self,
        hotel: &str,
    ) {
        debug!(hotel, "hotel selected");
        self.selection.set_hotel(hotel);
    }

    pub fn set_season(
        &mut self,
        season: Season,
    ) {
        self.selection.set_season(season);
    }

    pub fn set_check_in(
        &mut self,
        date: NaiveDate,
    ) {
        self.selection.set_check_in(date);
    }

    pub fn set_check_out(
        &mut self,
        date: NaiveDate,
    ) {
        self.selection.set_check_out(date);
    }

    /// Sets both stay dates, check-in first.
    pub fn set_stay(
        &mut self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) {
        self.set_check_in(check_in);
        self.set_check_out(check_out);
    }

    pub fn decas(&self) -> Ref<'_, DecasView> {
        self.decas.borrow()
    }

    pub fn decas_mut(&self) -> RefMut<'_, DecasView> {
        self.decas.borrow_mut()
    }

    pub fn all_inclusive(&self) -> Ref<'_, AllInclusiveView> {
        self.all_inclusive.borrow()
    }

    pub fn all_inclusive_mut(&self) -> RefMut<'_, AllInclusiveView> {
        self.all_inclusive.borrow_mut()
    }
}
