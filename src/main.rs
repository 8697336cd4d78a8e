use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use sysdeck::cleanup::item::total_bytes;
use sysdeck::cleanup::{CleanupCategory, CleanupItem, CleanupOutcome};
use sysdeck::config::{self, Config, load_config, load_config_from_path};
use sysdeck::event::{Event, EventHandler};
use sysdeck::format::{format_bytes, sparkline, truncate_unicode, truncate_unicode_left};
use sysdeck::logging;
use sysdeck::service::TelemetryService;
use sysdeck::system::snapshot::Readings;

const PATH_COLUMN_WIDTH: usize = 60;

#[derive(Parser)]
#[command(
    name = "sysdeck",
    about = "Host telemetry and guided disk-space cleanup"
)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sample CPU, memory and disk once
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Refresh readings on an interval until Ctrl-C
    Watch {
        /// Refresh rate in milliseconds
        #[arg(long)]
        refresh_rate: Option<u64>,

        /// Stop after this many refreshes
        #[arg(long)]
        iterations: Option<usize>,
    },
    /// Measure reclaimable space per category
    Scan {
        /// Categories to scan (default: all)
        #[arg(long = "category", value_parser = parse_category)]
        categories: Vec<CleanupCategory>,

        #[arg(long)]
        json: bool,
    },
    /// Find files above a size threshold
    Large {
        /// Minimum size in megabytes
        #[arg(long)]
        min_mb: Option<u64>,

        #[arg(long)]
        json: bool,
    },
    /// Empty cache, log and trash folders (dry run unless --yes)
    Clean {
        /// Categories to clean (default: system caches, user caches, logs, trash)
        #[arg(long = "category", value_parser = parse_category)]
        categories: Vec<CleanupCategory>,

        /// Actually delete
        #[arg(long)]
        yes: bool,
    },
    /// Move everything in Downloads to the trash (preview unless --yes)
    EmptyDownloads {
        #[arg(long)]
        yes: bool,
    },
}

fn parse_category(s: &str) -> std::result::Result<CleanupCategory, String> {
    CleanupCategory::from_str_config(s).ok_or_else(|| {
        format!("unknown category `{s}` (system-caches, user-caches, logs, trash, downloads)")
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    let config = load_config_for_cli(&cli);
    let mut service = TelemetryService::new(&config);

    match cli.command {
        Command::Status { json } => {
            let readings = *service.tick();
            if json {
                println!("{}", serde_json::to_string_pretty(&readings)?);
            } else {
                print_readings(&readings);
            }
        }
        Command::Watch {
            refresh_rate,
            iterations,
        } => {
            let rate = refresh_rate.unwrap_or(config.general.refresh_rate_ms);
            if rate == 0 {
                return Err(eyre!("--refresh-rate must be greater than 0"));
            }
            watch(&mut service, Duration::from_millis(rate), iterations).await;
        }
        Command::Scan { categories, json } => {
            let categories = if categories.is_empty() {
                CleanupCategory::ALL.to_vec()
            } else {
                categories
            };
            let items = service.scan_categories(categories).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print_items(&items);
            }
        }
        Command::Large { min_mb, json } => {
            let min_mb = min_mb.unwrap_or(config.cleanup.large_file_min_mb);
            let items = service.scan_large_files(min_mb).await.unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                println!(
                    "Found {} files over {} MB ({})",
                    items.len(),
                    min_mb,
                    format_bytes(total_bytes(&items))
                );
                print_items(&items);
            }
        }
        Command::Clean { categories, yes } => {
            let categories = if categories.is_empty() {
                CleanupCategory::STANDARD.to_vec()
            } else {
                categories
            };
            let items = service.scan_categories(categories).await;
            print_items(&items);
            let outcome = service.cleanup(&items, !yes);
            print_outcome(if yes { "Freed" } else { "Would free" }, &outcome);
            if !yes {
                println!("Re-run with --yes to delete.");
            }
        }
        Command::EmptyDownloads { yes } => {
            let items = service.downloads_entries().await;
            print_items(&items);
            if yes {
                let outcome = service.move_to_trash(&items);
                print_outcome("Moved to trash", &outcome);
            } else {
                println!(
                    "Would move {} to the trash. Re-run with --yes to proceed.",
                    format_bytes(total_bytes(&items))
                );
            }
        }
    }

    Ok(())
}

async fn watch(service: &mut TelemetryService, tick_rate: Duration, iterations: Option<usize>) {
    let mut events = EventHandler::new(tick_rate);
    let mut ticks = 0usize;

    while let Some(event) = events.next().await {
        match event {
            Event::Tick => {
                let readings = *service.tick();
                println!(
                    "cpu {:>5.1}%  mem {:>5.1}%  disk {:>5.1}%  {}",
                    readings.cpu.usage_percentage,
                    readings.memory.pressure_percentage(),
                    readings.disk.usage_percentage(),
                    sparkline(&service.cpu_history()),
                );
                ticks += 1;
                if iterations.is_some_and(|limit| ticks >= limit) {
                    break;
                }
            }
            Event::Shutdown => break,
        }
    }
}

fn load_config_for_cli(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => load_config_from_path(path),
        None => {
            tracing::debug!(path = ?config::config_path(), "loading default config");
            load_config()
        }
    }
}

fn print_readings(readings: &Readings) {
    let mem = &readings.memory;
    println!(
        "CPU      {:.1}% across {} cores",
        readings.cpu.usage_percentage, readings.cpu.core_count
    );
    println!(
        "Memory   {:.1}% pressure of {}",
        mem.pressure_percentage(),
        format_bytes(mem.physical_total_bytes)
    );
    for (label, bytes) in [
        ("wired", mem.wired_bytes),
        ("active", mem.active_bytes),
        ("compressed", mem.compressed_bytes),
        ("free", mem.free_bytes),
    ] {
        println!(
            "  {:<11}{:>10}  {:>5.1}%",
            label,
            format_bytes(bytes),
            mem.fraction_of_total(bytes) * 100.0
        );
    }
    println!("Swap     {}", format_bytes(mem.swap_used_bytes));
    println!(
        "Disk     {} used, {} free of {} ({:.1}%)",
        format_bytes(readings.disk.used_bytes),
        format_bytes(readings.disk.available_bytes),
        format_bytes(readings.disk.total_bytes),
        readings.disk.usage_percentage()
    );
    println!("Uptime   {}s", readings.uptime_secs);
}

fn print_items(items: &[CleanupItem]) {
    for item in items {
        println!(
            "{:<14} {:<6} {:>10}  {}",
            truncate_unicode(item.category.label(), 14),
            item.category.risk_level().label(),
            item.formatted_size(),
            truncate_unicode_left(&item.path.display().to_string(), PATH_COLUMN_WIDTH),
        );
    }
    println!("Total {}", format_bytes(total_bytes(items)));
}

fn print_outcome(verb: &str, outcome: &CleanupOutcome) {
    println!("{verb} {}", format_bytes(outcome.bytes_freed));
    if outcome.skipped > 0 {
        println!("{} entries could not be removed", outcome.skipped);
    }
}
