//! The interactive dashboard loop.
//!
//! One task owns the [`Dashboard`]. Pipeline runs are spawned into a
//! [`JoinSet`] and report back with their ticket; the clock ticks and stdin
//! lines are multiplexed on the same loop.

use anyhow::Context;
use chrono::Local;
use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinSet,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info};
use weather_core::{
    Config, Dashboard, Geolocator, Location, Report, Ticket, WeatherError, WeatherProvider,
    fetch_report, fetch_startup_report,
};

use crate::render;

type Outcome = (Ticket, Result<Report, WeatherError>);

pub async fn run(
    config: Config,
    provider: Arc<dyn WeatherProvider>,
    geolocator: Option<Arc<dyn Geolocator>>,
) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(config.units);
    let mut runs: JoinSet<Outcome> = JoinSet::new();

    let ticket = dashboard.begin();
    let startup_provider = Arc::clone(&provider);
    let default_city = config.default_city.clone();
    runs.spawn(async move {
        let outcome = fetch_startup_report(
            startup_provider.as_ref(),
            geolocator.as_deref(),
            &default_city,
        )
        .await;
        (ticket, outcome)
    });

    draw(&dashboard)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut clock = interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            _ = clock.tick() => {
                print!("{}", render::clock_line(&Local::now()));
                io::stdout().flush().context("Failed to write to terminal")?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read search input")? else {
                    info!("Input closed, leaving dashboard");
                    break;
                };
                match dashboard.submit(&line) {
                    Some((ticket, location)) => {
                        spawn_run(&mut runs, ticket, Arc::clone(&provider), location);
                        draw(&dashboard)?;
                    }
                    None => {
                        print!("{}", render::PROMPT);
                        io::stdout().flush().context("Failed to write to terminal")?;
                    }
                }
            }
            Some(joined) = runs.join_next() => {
                let (ticket, outcome) = joined.context("Weather fetch task panicked")?;
                if dashboard.complete(ticket, outcome, &Local::now()) {
                    draw(&dashboard)?;
                }
            }
            _ = &mut interrupted => {
                info!("Interrupted, leaving dashboard");
                break;
            }
        }
    }

    println!();
    Ok(())
}

fn spawn_run(
    runs: &mut JoinSet<Outcome>,
    ticket: Ticket,
    provider: Arc<dyn WeatherProvider>,
    location: Location,
) {
    debug!(ticket = ticket.sequence(), %location, "Starting weather run");
    runs.spawn(async move { (ticket, fetch_report(provider.as_ref(), &location).await) });
}

fn draw(dashboard: &Dashboard) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(
        stdout,
        "{}{}{}",
        render::CLEAR,
        render::page(dashboard.view(), &Local::now()),
        render::PROMPT
    )
    .and_then(|_| stdout.flush())
    .context("Failed to write to terminal")
}
