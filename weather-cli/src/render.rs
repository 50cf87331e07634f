//! Terminal rendering of the dashboard view.

use chrono::{DateTime, Local};
use std::fmt::Write;
use weather_core::{Theme, View, view::format_clock};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Clear the screen and home the cursor.
pub const CLEAR: &str = "\x1b[2J\x1b[H";

pub const PROMPT: &str = "search> ";

fn theme_colour(theme: Theme) -> &'static str {
    match theme {
        Theme::Default => "\x1b[36m",
        Theme::Clear => "\x1b[93m",
        Theme::Clouds => "\x1b[37m",
        Theme::Rain => "\x1b[34m",
        Theme::Drizzle => "\x1b[94m",
        Theme::Snow => "\x1b[97m",
        Theme::Mist => "\x1b[90m",
        Theme::Thunderstorm => "\x1b[35m",
    }
}

/// Redraw only the clock on the first screen row, keeping the cursor where it was.
pub fn clock_line(now: &DateTime<Local>) -> String {
    format!("\x1b7\x1b[1;1H\x1b[2K{DIM}{}{RESET}\x1b8", format_clock(now))
}

/// Everything visible in `view`, preceded by the clock line.
pub fn page(view: &View, now: &DateTime<Local>) -> String {
    let colour = theme_colour(view.theme);
    let regions = view.regions();
    let mut out = String::new();

    let _ = writeln!(out, "{DIM}{}{RESET}", format_clock(now));
    let _ = writeln!(out, "{colour}{BOLD}Weather{RESET} {DIM}[{}]{RESET}", view.theme);
    out.push('\n');

    if regions.loading {
        let _ = writeln!(out, "  Loading...");
    }

    if regions.current
        && let Some(current) = &view.current
    {
        let _ = writeln!(out, "  {colour}{BOLD}{}{RESET}", current.temperature);
        let _ = writeln!(out, "  {}", current.description);
        let _ = writeln!(out, "  {BOLD}{}{RESET}", current.place);
        let _ = writeln!(out, "  {DIM}{}{RESET}", current.icon_url);
        out.push('\n');
    }

    if regions.details
        && let Some(details) = &view.details
    {
        let _ = writeln!(out, "  Humidity    {}", details.humidity);
        let _ = writeln!(out, "  Wind        {}", details.wind);
        let _ = writeln!(out, "  Pressure    {}", details.pressure);
        let _ = writeln!(out, "  Feels like  {}", details.feels_like);
        out.push('\n');
    }

    if regions.forecast {
        for slot in &view.forecast {
            let _ = writeln!(
                out,
                "  {:<10} {:>4} / {:<4} {}  {DIM}{}{RESET}",
                slot.day, slot.max, slot.min, slot.icon_alt, slot.icon_url
            );
        }
        out.push('\n');
    }

    if regions.not_found {
        let _ = writeln!(out, "  {BOLD}Location not found.{RESET}");
        let _ = writeln!(out, "  Check the city name and try again.");
        out.push('\n');
    }

    out
}
