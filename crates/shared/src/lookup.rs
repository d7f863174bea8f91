//! Bookkeeping for in-flight weather lookups.
//!
//! Every selection takes a ticket. Results carrying an older ticket than the
//! latest one are dropped, so a slow response for a previous click can never
//! overwrite the display for the current one.

use tracing::{debug, warn};

use crate::error::LookupError;
use crate::models::{CurrentWeather, Forecast, LocationQuery, Place};
use crate::theme::BackgroundTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionTicket(u64);

impl SelectionTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic ticket source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSequence {
    latest: u64,
}

impl SelectionSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> SelectionTicket {
        self.latest += 1;
        SelectionTicket(self.latest)
    }

    pub fn is_current(&self, ticket: SelectionTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn latest(&self) -> Option<SelectionTicket> {
        (self.latest > 0).then_some(SelectionTicket(self.latest))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupStatus<T> {
    Idle,
    Loading,
    Ready(T),
    /// User-facing message.
    Failed(String),
}

impl<T> Default for LookupStatus<T> {
    fn default() -> Self {
        LookupStatus::Idle
    }
}

impl<T> LookupStatus<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            LookupStatus::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LookupStatus::Loading)
    }

    fn from_result(result: Result<T, LookupError>, what: &str) -> Self {
        match result {
            Ok(value) => LookupStatus::Ready(value),
            Err(e) => {
                warn!(error = %e, "{what} lookup failed");
                LookupStatus::Failed(e.user_message())
            }
        }
    }
}

/// Display state for one query: current conditions, forecast strip and the
/// reverse-geocoded place name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupBoard {
    sequence: SelectionSequence,
    pub query: Option<LocationQuery>,
    pub weather: LookupStatus<CurrentWeather>,
    pub forecast: LookupStatus<Forecast>,
    pub place: LookupStatus<Place>,
}

impl LookupBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop whatever is shown and invalidate pending results, e.g. when the
    /// map pin moves to a place this board was never asked about.
    pub fn clear(&mut self) -> SelectionTicket {
        let ticket = self.sequence.next();
        self.query = None;
        self.weather = LookupStatus::Idle;
        self.forecast = LookupStatus::Idle;
        self.place = LookupStatus::Idle;
        ticket
    }

    /// Start a new selection. Everything shown for the previous one is
    /// replaced by loading placeholders.
    pub fn begin(&mut self, query: &LocationQuery) -> SelectionTicket {
        let ticket = self.sequence.next();
        debug!(ticket = ticket.value(), %query, "lookup started");
        self.query = Some(query.clone());
        self.weather = LookupStatus::Loading;
        self.forecast = LookupStatus::Loading;
        self.place = match query {
            LocationQuery::Coordinates(_) => LookupStatus::Loading,
            LocationQuery::City(_) => LookupStatus::Idle,
        };
        ticket
    }

    /// Reject a query before any request is made, e.g. an empty city name.
    pub fn reject(&mut self, error: LookupError) -> SelectionTicket {
        let ticket = self.sequence.next();
        self.query = None;
        self.weather = LookupStatus::from_result(Err(error), "weather");
        self.forecast = LookupStatus::Idle;
        self.place = LookupStatus::Idle;
        ticket
    }

    pub fn is_current(&self, ticket: SelectionTicket) -> bool {
        self.sequence.is_current(ticket)
    }

    fn accept(&self, ticket: SelectionTicket, what: &str) -> bool {
        if self.sequence.is_current(ticket) {
            return true;
        }
        debug!(
            ticket = ticket.value(),
            latest = ?self.sequence.latest().map(SelectionTicket::value),
            "discarding stale {what} result"
        );
        false
    }

    /// Returns `false` when the result was stale and ignored.
    pub fn apply_weather(
        &mut self,
        ticket: SelectionTicket,
        result: Result<CurrentWeather, LookupError>,
    ) -> bool {
        if !self.accept(ticket, "weather") {
            return false;
        }
        self.weather = LookupStatus::from_result(result, "weather");
        true
    }

    pub fn apply_forecast(
        &mut self,
        ticket: SelectionTicket,
        result: Result<Forecast, LookupError>,
    ) -> bool {
        if !self.accept(ticket, "forecast") {
            return false;
        }
        self.forecast = LookupStatus::from_result(result, "forecast");
        true
    }

    pub fn apply_place(
        &mut self,
        ticket: SelectionTicket,
        result: Result<Place, LookupError>,
    ) -> bool {
        if !self.accept(ticket, "place") {
            return false;
        }
        self.place = LookupStatus::from_result(result, "place");
        true
    }

    /// Background theme for the current conditions, if any have arrived.
    pub fn theme(&self) -> Option<BackgroundTheme> {
        self.weather
            .ready()
            .map(|w| BackgroundTheme::from_conditions(&w.condition, &w.icon))
    }
}
