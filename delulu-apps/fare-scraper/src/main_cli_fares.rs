//!  Delulu Travel Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! CLI for booking page fare search.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use delulu_fare_scraper::{
    FareScraper, FlightSegmentRecord, Navigator, PageLayout, ScraperConfig, SearchParams,
    SearchResult, SnapshotNavigator, WebDriverNavigator,
};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "delulu-fares")]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Origin airport code (e.g., MDW, DEN)
    #[arg(short, long)]
    from: String,

    /// Destination airport code (e.g., MCO, AUS)
    #[arg(short, long)]
    to: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(short, long)]
    date: String,

    /// Return date for round trips (YYYY-MM-DD)
    #[arg(short = 'R', long)]
    return_date: Option<String>,

    /// Trip type: roundtrip, oneway
    #[arg(long, default_value = "roundtrip")]
    trip: String,

    /// Departure window: ALL_DAY, BEFORE_NOON, NOON_TO_SIX, AFTER_SIX (or anytime, morning, afternoon, evening)
    #[arg(long, default_value = "ALL_DAY")]
    depart_time: String,

    /// Return window, same values as --depart-time
    #[arg(long, default_value = "ALL_DAY")]
    return_time: String,

    /// Number of adult passengers (1-8)
    #[arg(short, long, default_value = "1")]
    passengers: u32,

    /// WebDriver server URL (geckodriver)
    #[arg(long, default_value = "http://localhost:4444")]
    webdriver: String,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Seconds to wait for the result page
    #[arg(long, default_value = "20")]
    timeout: u64,

    /// Milliseconds between checks while waiting for the result page
    #[arg(long, default_value = "500")]
    poll_ms: u64,

    /// JSON file overriding page class names and selectors
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Save the rendered page to dump-<timestamp>.html
    #[arg(long)]
    debug_dump: bool,

    /// Directory for debug dumps
    #[arg(long, default_value = ".")]
    dump_dir: PathBuf,

    /// Re-run extraction on a saved page instead of opening a browser
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

/// Configure logging based on verbosity level
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &CliArgs) -> Result<ScraperConfig> {
    let layout = match &args.layout {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read layout file {}", path.display()))?;
            PageLayout::from_json(&json)?
        }
        None => PageLayout::default(),
    };
    Ok(ScraperConfig {
        timeout: Duration::from_secs(args.timeout),
        layout,
        dump_dir: args.dump_dir.clone(),
        ..ScraperConfig::default()
    })
}

fn build_params(args: &CliArgs) -> SearchParams {
    let mut builder = SearchParams::builder(&args.from, &args.to, &args.date)
        .trip_type(&args.trip)
        .depart_time_of_day(&args.depart_time)
        .return_time_of_day(&args.return_time)
        .adults(args.passengers)
        .debug_dump(args.debug_dump);
    if let Some(rd) = &args.return_date {
        builder = builder.return_date(rd);
    }
    builder.build()
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn dash_bar() -> String {
    "-".repeat(get_terminal_width().min(100))
}

fn fmt_fare(fare: Option<u32>) -> String {
    fare.map_or("--".to_string(), |f| format!("${}", f))
}

fn fmt_stops(stops: u32) -> String {
    match stops {
        0 => "direct".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

fn cheapest(segments: &[FlightSegmentRecord]) -> Option<u32> {
    segments
        .iter()
        .flat_map(|s| [s.fare, s.fare_anytime, s.fare_business_select])
        .flatten()
        .min()
}

fn render_direction(title: &str, segments: &[FlightSegmentRecord]) {
    println!("\n✈️  {} ({} flights)", title, segments.len());
    if let Some(best) = cheapest(segments) {
        println!("💰 Best Price:  ${}", best);
    }
    println!("{}", dash_bar());
    println!(
        "  {:<8}  {:<9}  {:<9}  {:>8}  {:<8}  {:>8}  {:>8}  {:>8}",
        "FLIGHT", "DEPART", "ARRIVE", "HOURS", "STOPS", "WGA", "ANYTIME", "BUS.SEL"
    );
    println!("{}", dash_bar());
    for s in segments {
        println!(
            "  {:<8}  {:<9}  {:<9}  {:>8.2}  {:<8}  {:>8}  {:>8}  {:>8}",
            s.flight,
            s.origination,
            s.destination,
            s.duration,
            fmt_stops(s.stops),
            fmt_fare(s.fare),
            fmt_fare(s.fare_anytime),
            fmt_fare(s.fare_business_select)
        );
    }
}

/// Render results to stdout
fn render_results(args: &CliArgs, result: &SearchResult) {
    let title_bar = format!(
        "================================================================================================\n  🛫  {} → {} on {}\n================================================================================================",
        args.from.to_uppercase(),
        args.to.to_uppercase(),
        args.date
    );
    println!("{}", title_bar);

    render_direction("Outbound", result.outbound());
    if let Some(inbound) = result.inbound() {
        render_direction("Return", inbound);
    }
}

async fn run_search<N: Navigator>(
    navigator: N,
    config: ScraperConfig,
    params: &SearchParams,
) -> (N, delulu_fare_scraper::Result<SearchResult>) {
    let scraper = FareScraper::new(navigator, config);
    tracing::debug!(
        "Searching {} (page timeout {:?})",
        scraper.config().base_url,
        scraper.config().timeout
    );
    let result = scraper.search(params).await;
    (scraper.into_navigator(), result)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    tracing::info!("Starting delulu-fares CLI");
    tracing::debug!("Args: {:?}", args);

    let config = load_config(&args)?;
    let params = build_params(&args);

    let result = match &args.replay {
        Some(path) => {
            let navigator = SnapshotNavigator::from_file(path)
                .with_context(|| format!("Failed to read saved page {}", path.display()))?;
            tracing::info!("Replaying saved page {}", path.display());
            run_search(navigator, config, &params).await.1
        }
        None => {
            let navigator = WebDriverNavigator::connect(&args.webdriver, args.headless)
                .await?
                .poll_interval(Duration::from_millis(args.poll_ms));
            let (navigator, result) = run_search(navigator, config, &params).await;
            if let Err(e) = navigator.quit().await {
                tracing::warn!("{:#}", e);
            }
            result
        }
    };

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            if e.is_transient() {
                tracing::info!("Nothing to show yet, try again later");
            } else if e.stop_polling() {
                tracing::info!("Flight date has passed, stop watching this search");
            }
            return Err(e).context("Search failed");
        }
    };

    tracing::info!(
        "Search completed: {} flights found",
        result.segments.iter().map(Vec::len).sum::<usize>()
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize results")?
        );
    } else {
        render_results(&args, &result);
    }

    Ok(())
}
