//! Calculator views kept in sync with the shared selection.
//!
//! Each view owns its plan-specific inputs and a copy of the selection. Any
//! change, from the selection or from its own inputs, recomputes the quote
//! immediately; the previous result is discarded.

use std::rc::Rc;

use resort_core::calculations::{
    AllInclusiveCalculator, AllInclusiveError, AllInclusivePolicy, AllInclusiveQuote,
    AllInclusiveRequest, DecasCalculator, DecasConfig, DecasError, DecasQuote, DecasRequest,
};
use resort_core::selection::SelectionSnapshot;
use resort_core::{
    AllInclusiveRateTable, DecasRateTable, DecasRoomType, PromotionSelection, RoomCounts,
    SelectionChange, SelectionObserver,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Guest limits of the All-Inclusive booking form.
pub const MIN_ADULTS: u32 = 1;
pub const MAX_ADULTS: u32 = 10;
pub const DEFAULT_ADULTS: u32 = 2;
pub const MAX_CHILDREN: usize = 8;
pub const DEFAULT_CHILD_AGE: u32 = 5;

// ---------------------------------------------------------------------------
// Decas
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DecasView {
    rates: Rc<DecasRateTable>,
    config: DecasConfig,
    selection: SelectionSnapshot,
    rooms: RoomCounts,
    result: Result<DecasQuote, DecasError>,
}

impl DecasView {
    pub fn new(
        rates: Rc<DecasRateTable>,
        config: DecasConfig,
        selection: SelectionSnapshot,
    ) -> Self {
        let mut view = Self {
            rates,
            config,
            selection,
            rooms: RoomCounts::default(),
            result: Err(DecasError::NoHotelSelected),
        };
        view.recalculate();
        view
    }

    pub fn rooms(&self) -> RoomCounts {
        self.rooms
    }

    /// Sets one room counter, clamped to the form's 0..=10 range.
    pub fn set_room_count(
        &mut self,
        room_type: DecasRoomType,
        count: u32,
    ) {
        self.rooms.set(room_type, count.min(RoomCounts::MAX_PER_TYPE));
        self.recalculate();
    }

    pub fn result(&self) -> &Result<DecasQuote, DecasError> {
        &self.result
    }

    /// Text shown in the totals area: the summary, or the validation message.
    pub fn status_text(&self) -> String {
        match &self.result {
            Ok(quote) => quote.summary(),
            Err(err) => err.to_string(),
        }
    }

    fn recalculate(&mut self) {
        let request = DecasRequest {
            hotel: self.selection.hotel.clone(),
            check_in: self.selection.check_in,
            check_out: self.selection.check_out,
            rooms: self.rooms,
        };
        self.result = DecasCalculator::new(&self.rates, self.config).calculate(&request);
        if let Err(err) = &self.result {
            debug!(%err, "decas quote unavailable");
        }
    }
}

impl SelectionObserver for DecasView {
    fn selection_changed(
        &mut self,
        change: &SelectionChange,
    ) {
        self.selection.apply(change);
        // Decas prices do not depend on the season.
        if !matches!(change, SelectionChange::Season(_)) {
            self.recalculate();
        }
    }
}

// ---------------------------------------------------------------------------
// All-Inclusive
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AllInclusiveView {
    rates: Rc<AllInclusiveRateTable>,
    policy: AllInclusivePolicy,
    selection: SelectionSnapshot,
    room_type: String,
    adults: u32,
    child_ages: Vec<u32>,
    promotion: PromotionSelection,
    currency_rate: Decimal,
    result: Result<AllInclusiveQuote, AllInclusiveError>,
}

impl AllInclusiveView {
    pub fn new(
        rates: Rc<AllInclusiveRateTable>,
        policy: AllInclusivePolicy,
        selection: SelectionSnapshot,
        discount_percent: u32,
        currency_rate: Decimal,
    ) -> Self {
        let mut view = Self {
            rates,
            policy,
            selection,
            room_type: String::new(),
            adults: DEFAULT_ADULTS,
            child_ages: Vec::new(),
            promotion: PromotionSelection::new(discount_percent),
            currency_rate,
            result: Err(AllInclusiveError::NoRoomTypeSelected),
        };
        view.sync_room_type();
        view.recalculate();
        view
    }

    /// Room types offered by the selected hotel.
    pub fn room_types(&self) -> Vec<&str> {
        self.rates.room_types(&self.selection.hotel)
    }

    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    pub fn set_room_type(
        &mut self,
        room_type: impl Into<String>,
    ) {
        self.room_type = room_type.into();
        self.recalculate();
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    /// Sets the adult count, clamped to 1..=10.
    pub fn set_adults(
        &mut self,
        adults: u32,
    ) {
        self.adults = adults.clamp(MIN_ADULTS, MAX_ADULTS);
        self.recalculate();
    }

    pub fn child_ages(&self) -> &[u32] {
        &self.child_ages
    }

    /// Sets the children's ages. Only the first eight are kept.
    pub fn set_child_ages(
        &mut self,
        ages: Vec<u32>,
    ) {
        let mut ages = ages;
        if ages.len() > MAX_CHILDREN {
            warn!(given = ages.len(), max = MAX_CHILDREN, "too many children; extra ages dropped");
            ages.truncate(MAX_CHILDREN);
        }
        self.child_ages = ages;
        self.recalculate();
    }

    /// Resizes the children list, new children starting at the default age.
    pub fn set_children(
        &mut self,
        count: usize,
    ) {
        self.child_ages
            .resize(count.min(MAX_CHILDREN), DEFAULT_CHILD_AGE);
        self.recalculate();
    }

    pub fn promotion(&self) -> PromotionSelection {
        self.promotion
    }

    pub fn set_two_for_one(
        &mut self,
        enabled: bool,
    ) {
        self.promotion.set_two_for_one(enabled);
        self.recalculate();
    }

    pub fn set_percent_enabled(
        &mut self,
        enabled: bool,
    ) {
        self.promotion.set_percent_enabled(enabled);
        self.recalculate();
    }

    pub fn set_percent(
        &mut self,
        percent: u32,
    ) {
        self.promotion.set_percent(percent);
        self.recalculate();
    }

    pub fn currency_rate(&self) -> Decimal {
        self.currency_rate
    }

    pub fn set_currency_rate(
        &mut self,
        rate: Decimal,
    ) {
        self.currency_rate = rate;
        self.recalculate();
    }

    pub fn result(&self) -> &Result<AllInclusiveQuote, AllInclusiveError> {
        &self.result
    }

    /// Text shown in the totals area: the summary, or the validation message.
    pub fn status_text(&self) -> String {
        match &self.result {
            Ok(quote) => quote.summary(),
            Err(err) => err.to_string(),
        }
    }

    /// Keeps the room type valid for the selected hotel, falling back to the
    /// hotel's first room type.
    fn sync_room_type(&mut self) {
        let room_types = self.rates.room_types(&self.selection.hotel);
        if room_types.contains(&self.room_type.as_str()) {
            return;
        }
        self.room_type = room_types
            .first()
            .map(|room| (*room).to_string())
            .unwrap_or_default();
    }

    fn recalculate(&mut self) {
        let request = AllInclusiveRequest {
            hotel: self.selection.hotel.clone(),
            room_type: self.room_type.clone(),
            season: self.selection.season,
            check_in: self.selection.check_in,
            check_out: self.selection.check_out,
            adults: self.adults,
            child_ages: self.child_ages.clone(),
            promotion: self.promotion.promotion(),
            currency_rate: self.currency_rate,
        };
        self.result = AllInclusiveCalculator::new(&self.rates, self.policy).calculate(&request);
        if let Err(err) = &self.result {
            debug!(%err, "all-inclusive quote unavailable");
        }
    }
}

impl SelectionObserver for AllInclusiveView {
    fn selection_changed(
        &mut self,
        change: &SelectionChange,
    ) {
        self.selection.apply(change);
        if matches!(change, SelectionChange::Hotel(_)) {
            self.sync_room_type();
        }
        self.recalculate();
    }
}
