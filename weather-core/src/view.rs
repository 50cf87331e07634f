//! Presentation model: a snapshot of everything the dashboard shows.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::{
    forecast::{self, day_label, entry_date},
    model::{CurrentConditions, ForecastEntry, IconSize, Report, Units, icon_url},
    theme::Theme,
};

/// Which mutually exclusive mode the dashboard is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Loading,
    Content,
    NotFound,
}

/// Visibility of each page region, always derived from [`UiState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub loading: bool,
    pub current: bool,
    pub details: bool,
    pub forecast: bool,
    pub not_found: bool,
}

impl Regions {
    pub fn for_state(state: UiState) -> Self {
        let content = state == UiState::Content;
        Self {
            loading: state == UiState::Loading,
            current: content,
            details: content,
            forecast: content,
            not_found: state == UiState::NotFound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPanel {
    pub icon_url: String,
    pub icon_alt: String,
    pub temperature: String,
    pub description: String,
    pub place: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsPanel {
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub feels_like: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSlot {
    pub day: String,
    pub icon_url: String,
    pub icon_alt: String,
    pub max: String,
    pub min: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    state: UiState,
    regions: Regions,
    pub theme: Theme,
    pub current: Option<CurrentPanel>,
    pub details: Option<DetailsPanel>,
    pub forecast: Vec<ForecastSlot>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            state: UiState::Loading,
            regions: Regions::for_state(UiState::Loading),
            theme: Theme::Default,
            current: None,
            details: None,
            forecast: Vec::new(),
        }
    }
}

impl View {
    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn regions(&self) -> Regions {
        self.regions
    }

    /// The only way to change state; keeps region visibility in step.
    pub(crate) fn transition(&mut self, state: UiState) {
        self.state = state;
        self.regions = Regions::for_state(state);
    }

    /// Replace every panel with `report` and show the content regions.
    ///
    /// Forecast days are calendar days in the timezone of `now`.
    pub(crate) fn show_report<Tz: TimeZone>(
        &mut self,
        report: &Report,
        units: Units,
        now: &DateTime<Tz>,
    ) {
        self.current = Some(current_panel(&report.current, units));
        self.details = Some(details_panel(&report.current, units));
        self.forecast = forecast_strip(&report.forecast, units, now);
        self.theme = Theme::from_category(&report.current.category).unwrap_or_default();
        self.transition(UiState::Content);
    }
}

fn current_panel(current: &CurrentConditions, units: Units) -> CurrentPanel {
    let place = if current.country.is_empty() {
        current.place.clone()
    } else {
        format!("{}, {}", current.place, current.country)
    };

    CurrentPanel {
        icon_url: icon_url(&current.icon, IconSize::Large),
        icon_alt: current.description.clone(),
        temperature: format!("{}{}", round_half_up(current.temperature), units.temperature_suffix()),
        description: current.description.clone(),
        place,
    }
}

fn details_panel(current: &CurrentConditions, units: Units) -> DetailsPanel {
    DetailsPanel {
        humidity: format!("{}%", current.humidity_pct),
        wind: format!("{} {}", round_half_up(current.wind_speed), units.wind_suffix()),
        pressure: format!("{} hPa", current.pressure_hpa),
        feels_like: format!("{}{}", round_half_up(current.feels_like), units.temperature_suffix()),
    }
}

fn forecast_strip<Tz: TimeZone>(
    entries: &[ForecastEntry],
    units: Units,
    now: &DateTime<Tz>,
) -> Vec<ForecastSlot> {
    let tz = now.timezone();
    let today = now.date_naive();
    let mark = units.degree_mark();

    forecast::daily_samples(entries)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| ForecastSlot {
            day: day_label(entry_date(entry, &tz), index, today),
            icon_url: icon_url(&entry.icon, IconSize::Small),
            icon_alt: entry.description.clone(),
            max: format!("{}{mark}", round_half_up(entry.temp_max)),
            min: format!("{}{mark}", round_half_up(entry.temp_min)),
        })
        .collect()
}

/// Round to the nearest integer, halves towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Text of the live clock line.
pub fn format_clock<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%A, %-d %B %Y - %H:%M:%S").to_string()
}
