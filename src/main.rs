use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use fpl_breakdown::compare::compare;
use fpl_breakdown::config::{load_config, validate_config, Config};
use fpl_breakdown::output;
use fpl_breakdown::range::{filter_and_aggregate_with, Window, WindowReport, HIGH_OUTLIER_Z};
use fpl_breakdown::scoring::{score_records, ScoreResult};
use fpl_breakdown::stats::{load_snapshot, validate_records, PlayerEntry, Position, SeasonSnapshot};
use fpl_breakdown::value::{build_value_table, SortKey, SortOrder, TableRequest};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug, Clone, Copy)]
struct RangeArgs {
    /// First gameweek (inclusive, defaults to 1)
    #[arg(long)]
    from: Option<u32>,

    /// Last gameweek (inclusive, defaults to the latest in the data)
    #[arg(long)]
    to: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Value table: points over the window, price and ownership metrics
    Table {
        /// Only players from this team
        #[arg(long)]
        team: Option<String>,

        /// Only players in this position (GK, DEF, MID, FWD)
        #[arg(long)]
        position: Option<Position>,

        /// Sort column: points, price, ppm, selected, template, differential
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,

        #[command(flatten)]
        range: RangeArgs,
    },
    /// Points by scoring category and by gameweek for one player
    Player {
        /// Player display name
        name: String,

        #[command(flatten)]
        range: RangeArgs,
    },
    /// Category-by-category comparison of two players
    Compare {
        first: String,
        second: String,

        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Parser, Debug)]
#[command(name = "fpl-breakdown")]
#[command(about = "Fantasy football points breakdown by scoring category", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to <config dir>/fpl-breakdown/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Season snapshot JSON (overrides `data` in the config file)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the gameweek window: flags, then config, then the season bounds.
///
/// A defaulted end never falls before the start, so a window past the data
/// reaches the aggregator and is reported as having no data.
fn resolve_window(range: RangeArgs, config: &Config, snapshot: &SeasonSnapshot) -> Result<Window> {
    let configured = config.window.clone().unwrap_or_default();
    let start = range.from.or(configured.start).unwrap_or(1);
    let end = range
        .to
        .or(configured.end)
        .unwrap_or_else(|| snapshot.last_gameweek().max(start));

    if start == 0 {
        anyhow::bail!("gameweeks start at 1");
    }
    if start > end {
        anyhow::bail!("start gameweek {} is after end gameweek {}", start, end);
    }
    Ok(Window::new(start, end))
}

fn find_player<'a>(snapshot: &'a SeasonSnapshot, name: &str) -> Result<&'a PlayerEntry> {
    snapshot
        .find_player(name)
        .with_context(|| format!("Unknown player '{}'", name))
}

/// Window report for one player, logging any history problems on the way.
fn player_window(
    snapshot: &SeasonSnapshot,
    player: &PlayerEntry,
    window: Window,
    outlier_z: f64,
) -> WindowReport {
    let history = snapshot.history(player.id);
    if let Err(problems) = validate_records(history) {
        for problem in problems {
            tracing::warn!(player = %player.web_name, "{}", problem);
        }
    }
    filter_and_aggregate_with(history, window, outlier_z)
}

fn print_player_header(snapshot: &SeasonSnapshot, player: &PlayerEntry, position: Position) {
    println!(
        "{} ({}, {}) £{:.1}m, selected by {:.1}%",
        player.web_name,
        snapshot.team_name(player.team).unwrap_or("unknown team"),
        position,
        player.price(),
        player.selected_by_percent
    );
}

fn run_table(
    snapshot: &SeasonSnapshot,
    request: &TableRequest,
    tsv: bool,
    use_colors: bool,
) -> Result<()> {
    let rows = build_value_table(snapshot, request);
    if tsv {
        println!("{}", output::format_tsv(&rows));
    } else {
        println!("Points {}", request.window);
        println!("{}", output::format_value_table(&rows, use_colors));
    }
    Ok(())
}

fn run_player(
    snapshot: &SeasonSnapshot,
    name: &str,
    window: Window,
    outlier_z: f64,
    use_colors: bool,
) -> Result<()> {
    let player = find_player(snapshot, name)?;
    let position = player.position()?;
    print_player_header(snapshot, player, position);

    let data = match player_window(snapshot, player, window, outlier_z) {
        WindowReport::NoData => {
            println!("No gameweek data for {} in {}.", player.web_name, window);
            return Ok(());
        }
        WindowReport::Data(data) => data,
    };

    let result = score_records(&data.records, position);
    println!();
    println!("{}", output::format_breakdown(&result, use_colors));

    println!();
    println!("Points by gameweek ({})", window);
    let opponent_name = |id: u32| snapshot.team_short_name(id).map(str::to_string);
    println!(
        "{}",
        output::format_gameweek_rows(&data.rows, opponent_name, use_colors)
    );
    let points: Vec<i64> = data.rows.iter().map(|r| r.points).collect();
    println!("{}", output::format_sparkline(&points));
    Ok(())
}

fn run_compare(
    snapshot: &SeasonSnapshot,
    names: (&str, &str),
    window: Window,
    outlier_z: f64,
    use_colors: bool,
) -> Result<()> {
    let first = find_player(snapshot, names.0)?;
    let second = find_player(snapshot, names.1)?;
    let first_position = first.position()?;
    let second_position = second.position()?;

    if first_position != second_position {
        tracing::warn!(
            "comparing a {} with a {}: categories are unioned",
            first_position,
            second_position
        );
    }

    let score = |player: &PlayerEntry, position: Position| -> Option<ScoreResult> {
        match player_window(snapshot, player, window, outlier_z) {
            WindowReport::NoData => {
                println!("No gameweek data for {} in {}.", player.web_name, window);
                None
            }
            WindowReport::Data(data) => Some(score_records(&data.records, position)),
        }
    };

    let (a, b) = match (score(first, first_position), score(second, second_position)) {
        (None, None) => return Ok(()),
        (a, b) => (
            a.unwrap_or_else(|| score_records(&[], first_position)),
            b.unwrap_or_else(|| score_records(&[], second_position)),
        ),
    };

    print_player_header(snapshot, first, first_position);
    print_player_header(snapshot, second, second_position);
    println!();
    println!("Points by category ({})", window);

    let comparison = compare(&a.breakdown, &b.breakdown);
    println!(
        "{}",
        output::format_comparison(
            &comparison,
            (first.web_name.as_str(), second.web_name.as_str()),
            (
                a.reconciliation.authoritative_total,
                b.reconciliation.authoritative_total
            ),
            use_colors,
        )
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let Some(data_path) = cli.data.or_else(|| config.data.clone()) else {
        eprintln!("No season data given. Pass --data <file> or set `data:` in the config file.");
        std::process::exit(EXIT_CONFIG);
    };

    let snapshot = match load_snapshot(&data_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let use_colors = output::should_use_colors();
    let outlier_z = config.outlier_z.unwrap_or(HIGH_OUTLIER_Z);

    let range = match &cli.command {
        Commands::Table { range, .. }
        | Commands::Player { range, .. }
        | Commands::Compare { range, .. } => *range,
    };
    let window = match resolve_window(range, &config, &snapshot) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Invalid gameweek range: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    tracing::debug!(%window, outlier_z, "resolved request");

    let result = match cli.command {
        Commands::Table {
            team,
            position,
            sort,
            ascending,
            tsv,
            ..
        } => {
            let request = TableRequest {
                team,
                position,
                window,
                sort: sort.or(config.sort).unwrap_or_default(),
                order: if ascending {
                    SortOrder::Ascending
                } else {
                    config.order.unwrap_or_default()
                },
            };
            run_table(&snapshot, &request, tsv, use_colors)
        }
        Commands::Player { name, .. } => run_player(&snapshot, &name, window, outlier_z, use_colors),
        Commands::Compare { first, second, .. } => run_compare(
            &snapshot,
            (first.as_str(), second.as_str()),
            window,
            outlier_z,
            use_colors,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(EXIT_DATA);
    }

    std::process::exit(EXIT_SUCCESS);
}
