//! `occur` CLI — expand and select food event occurrences from a catalog file.
//!
//! ## Usage
//!
//! ```sh
//! # Today's events near a coordinate, nearest venue first
//! occur select -c catalog.json --lat 52.37 --lon 4.89
//!
//! # This week, walk-in only, at most 5 km and €3, sorted by next start
//! occur select -c catalog.json --view week --sort time \
//!     --access WALK_IN --max-distance 5 --max-cost 3
//!
//! # Pin the clock for reproducible output
//! occur select -c catalog.json --now 2026-06-10T08:00:00Z --format text
//!
//! # Raw occurrences of every verified definition in a window
//! occur expand -c catalog.json --from 2026-06-01T00:00:00Z --to 2026-06-08T00:00:00Z
//!
//! # Describe each definition's recurrence rule
//! cat catalog.json | occur describe
//! ```

use std::collections::BTreeSet;
use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use occurrence_engine::calendar::LOCAL_TZ;
use occurrence_engine::expander::MAX_WINDOW_DAYS;
use occurrence_engine::{
    describe_deadline, describe_recurrence, generate_occurrences, parse_catalog, select,
    AccessLevel, Coordinate, EventDefinition, FilterCriteria, Selection, SelectionRequest, SortBy,
    TimeView,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Reference point used when no coordinate is given (Amsterdam Centraal).
const FALLBACK_COORDINATE: Coordinate = Coordinate {
    latitude: 52.3791,
    longitude: 4.9003,
};

#[derive(Parser)]
#[command(
    name = "occur",
    version,
    about = "Expand and select recurring food event occurrences"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Select, filter, group and sort occurrences for a time view
    Select {
        /// Catalog JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        catalog: Option<String>,
        /// Reference latitude (defaults to Amsterdam Centraal)
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Reference longitude (defaults to Amsterdam Centraal)
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Time view: today, week or next24h
        #[arg(long, default_value = "today")]
        view: TimeView,
        /// Venue order: distance, time or alphabetical
        #[arg(long, default_value = "distance")]
        sort: SortBy,
        /// Maximum distance in km
        #[arg(long)]
        max_distance: Option<f64>,
        /// Maximum cost in euro
        #[arg(long)]
        max_cost: Option<f64>,
        /// Comma-separated access levels (WALK_IN, REGISTRATION, REFERRAL)
        #[arg(long)]
        access: Option<String>,
        /// Comma-separated event types
        #[arg(long = "type")]
        event_type: Option<String>,
        /// Comma-separated dietary tags; any one of them must be present
        #[arg(long)]
        diet: Option<String>,
        /// Show unverified definitions only, unexpanded
        #[arg(long)]
        drafts: bool,
        /// Evaluate at this RFC 3339 instant instead of the system clock
        #[arg(long)]
        now: Option<DateTime<Utc>>,
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// List the occurrences of every verified definition in a window
    Expand {
        /// Catalog JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        catalog: Option<String>,
        /// Window start (RFC 3339)
        #[arg(long)]
        from: DateTime<Utc>,
        /// Window end (RFC 3339), at most seven weeks after the start
        #[arg(long)]
        to: DateTime<Utc>,
    },
    /// Describe each definition's recurrence and deadline rules
    Describe {
        /// Catalog JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        catalog: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Select {
            catalog,
            lat,
            lon,
            view,
            sort,
            max_distance,
            max_cost,
            access,
            event_type,
            diet,
            drafts,
            now,
            format,
        } => {
            let definitions = load_catalog(catalog.as_deref())?;
            let reference = match (lat, lon) {
                (Some(latitude), Some(longitude)) => Coordinate::new(latitude, longitude),
                _ => {
                    debug!("no coordinate given, using fallback");
                    FALLBACK_COORDINATE
                }
            };
            let request = SelectionRequest {
                filters: FilterCriteria {
                    max_distance_km: max_distance,
                    max_cost,
                    access_levels: parse_access_levels(access.as_deref())?,
                    event_types: split_list(event_type.as_deref()),
                    dietary_needs: split_list(diet.as_deref()),
                },
                reference,
                time_view: view,
                sort_by: sort,
                include_drafts_only: drafts,
            };

            let now = now.unwrap_or_else(Utc::now);
            let selection = select(&definitions, &request, now);
            info!(
                matched = selection.matched_count,
                generated = selection.total_generated_count,
                venues = selection.venues.len(),
                "selection done"
            );

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&selection)
                        .context("Failed to serialize selection")?;
                    println!("{}", json);
                }
                OutputFormat::Text => print!("{}", render_text(&selection)),
            }
        }
        Commands::Expand { catalog, from, to } => {
            if to <= from {
                anyhow::bail!("--to ({}) must be after --from ({})", to, from);
            }
            if to - from > Duration::days(MAX_WINDOW_DAYS) {
                anyhow::bail!(
                    "window from {} to {} is longer than {} days; split it into smaller windows",
                    from,
                    to,
                    MAX_WINDOW_DAYS
                );
            }
            let definitions = load_catalog(catalog.as_deref())?;
            let occurrences: Vec<_> = definitions
                .iter()
                .filter(|d| d.is_verified())
                .flat_map(|d| generate_occurrences(d, from, to))
                .collect();
            info!(count = occurrences.len(), "expanded catalog");
            let json = serde_json::to_string_pretty(&occurrences)
                .context("Failed to serialize occurrences")?;
            println!("{}", json);
        }
        Commands::Describe { catalog } => {
            let definitions = load_catalog(catalog.as_deref())?;
            for definition in &definitions {
                println!("{}", describe_definition(definition));
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "occur=debug,occurrence_engine=debug"
    } else {
        "occur=info,occurrence_engine=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_catalog(path: Option<&str>) -> Result<Vec<EventDefinition>> {
    let json = read_input(path)?;
    parse_catalog(&json).context("Failed to load catalog")
}

/// Split a comma-separated flag into a set, dropping empty parts.
///
/// - `--diet VEGAN,HALAL` produces `{"HALAL", "VEGAN"}`
/// - an absent flag produces an empty set (no restriction)
fn split_list(raw: Option<&str>) -> BTreeSet<String> {
    raw.into_iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_access_levels(raw: Option<&str>) -> Result<BTreeSet<AccessLevel>> {
    split_list(raw)
        .into_iter()
        .map(|level| match level.to_ascii_uppercase().replace('-', "_").as_str() {
            "WALK_IN" => Ok(AccessLevel::WalkIn),
            "REGISTRATION" => Ok(AccessLevel::Registration),
            "REFERRAL" => Ok(AccessLevel::Referral),
            _ => anyhow::bail!(
                "Unknown access level: '{}'. Available: WALK_IN, REGISTRATION, REFERRAL",
                level
            ),
        })
        .collect()
}

fn render_text(selection: &Selection) -> String {
    let mut out = String::new();
    for venue in &selection.venues {
        out.push_str(&format!("{} ({:.1} km)\n", venue.venue.name, venue.distance_km));
        let occurrences = selection
            .occurrences_by_venue
            .get(&venue.venue.id)
            .map_or(&[][..], Vec::as_slice);
        for annotated in occurrences {
            let o = &annotated.occurrence;
            out.push_str(&format!(
                "  {} {}-{}  {}  [{}]  {}\n",
                o.start.with_timezone(&LOCAL_TZ).format("%a %d-%m"),
                o.start.with_timezone(&LOCAL_TZ).format("%H:%M"),
                o.end.with_timezone(&LOCAL_TZ).format("%H:%M"),
                o.title,
                describe_recurrence(&o.recurrence),
                annotated.cost_value,
            ));
        }
    }
    out.push_str(&format!(
        "{} of {} occurrences matched\n",
        selection.matched_count, selection.total_generated_count
    ));
    out
}

fn describe_definition(definition: &EventDefinition) -> String {
    let mut line = format!(
        "{}: {}",
        definition.id,
        describe_recurrence(&definition.recurrence)
    );
    if let Some(rule) = &definition.deadline_rule {
        line.push_str(&format!("; {}", describe_deadline(rule)));
    }
    line
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
