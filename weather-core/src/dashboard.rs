//! The dashboard controller: sole owner of the [`View`].
//!
//! Every pipeline run is tagged with a [`Ticket`] carrying a sequence number.
//! Only the most recently issued ticket may change the view when its run
//! completes, so overlapping searches resolve to the latest one the user made.

use chrono::{DateTime, TimeZone};
use tracing::{debug, error, info};

use crate::{
    error::WeatherError,
    location::Geolocator,
    model::{Location, Report, Units},
    pipeline::{fetch_report, fetch_startup_report, search_location},
    provider::WeatherProvider,
    view::{UiState, View},
};

/// Identifies one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct Dashboard {
    view: View,
    units: Units,
    issued: u64,
}

impl Dashboard {
    pub fn new(units: Units) -> Self {
        Self { view: View::default(), units, issued: 0 }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Start a run: issue the next ticket and show the loading state.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.view.transition(UiState::Loading);
        Ticket(self.issued)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Accept a search submission.
    ///
    /// Blank input is ignored and leaves the view untouched. Otherwise a run
    /// for the trimmed city name is started; the caller fetches the returned
    /// location and hands the outcome to [`Dashboard::complete`].
    pub fn submit(&mut self, input: &str) -> Option<(Ticket, Location)> {
        let location = search_location(input)?;
        let ticket = self.begin();
        debug!(ticket = ticket.0, %location, "Search submitted");
        Some((ticket, location))
    }

    /// Apply the outcome of the run identified by `ticket`.
    ///
    /// Returns `false`, leaving the view untouched, when a newer run has been
    /// started since. Forecast days are read in the timezone of `now`.
    pub fn complete<Tz: TimeZone>(
        &mut self,
        ticket: Ticket,
        outcome: Result<Report, WeatherError>,
        now: &DateTime<Tz>,
    ) -> bool {
        if !self.is_latest(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Discarding result of superseded run"
            );
            return false;
        }

        match outcome {
            Ok(report) => self.view.show_report(&report, self.units, now),
            Err(err) => {
                if err.is_not_found() {
                    info!(error = %err, "Location not found");
                } else {
                    error!(error = %err, "Failed to fetch weather data");
                }
                self.view.transition(UiState::NotFound);
            }
        }
        true
    }

    /// Run the whole pipeline for `location` and apply its result.
    pub async fn run<Tz: TimeZone>(
        &mut self,
        provider: &dyn WeatherProvider,
        location: &Location,
        now: &DateTime<Tz>,
    ) -> &View {
        let ticket = self.begin();
        let outcome = fetch_report(provider, location).await;
        self.complete(ticket, outcome, now);
        &self.view
    }

    /// Search for the city typed by the user. Blank input does nothing.
    pub async fn search<Tz: TimeZone>(
        &mut self,
        provider: &dyn WeatherProvider,
        input: &str,
        now: &DateTime<Tz>,
    ) -> Option<&View> {
        let (ticket, location) = self.submit(input)?;
        let outcome = fetch_report(provider, &location).await;
        self.complete(ticket, outcome, now);
        Some(&self.view)
    }

    /// Resolve the startup location and show its weather.
    pub async fn start<Tz: TimeZone>(
        &mut self,
        provider: &dyn WeatherProvider,
        geolocator: Option<&dyn Geolocator>,
        default_city: &str,
        now: &DateTime<Tz>,
    ) -> &View {
        let ticket = self.begin();
        let outcome = fetch_startup_report(provider, geolocator, default_city).await;
        self.complete(ticket, outcome, now);
        &self.view
    }
}
