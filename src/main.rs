mod formatter;
mod predict;
mod web;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;

use crate::formatter::{PassRow, WindowRow};
use crate::predict::{find_common_windows, find_passes, subpoint, wire_time, Satellite};
use crate::web::Config;

#[derive(Parser)]
#[command(name = "covis")]
#[command(about = "Dual ground station common visibility planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve { config: String },
    /// Predict passes and common windows for one day
    Passes {
        config: String,
        /// TLE file: two element lines, optionally preceded by a name line
        tle: String,
        /// UTC date (YYYY-MM-DD)
        date: String,
        /// Minimum elevation in degrees (default from config)
        #[arg(long)]
        min_elevation: Option<f64>,
        /// Window length from midnight, e.g. 24h, 6h 30m
        #[arg(long, default_value = "24h")]
        window: String,
    },
    /// Print the satellite ground-track position at an instant
    Position {
        /// TLE file: two element lines, optionally preceded by a name line
        tle: String,
        /// UTC timestamp (YYYY-MM-DD HH:MM:SS), defaults to now
        #[arg(long)]
        time: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Passes {
            config,
            tle,
            date,
            min_elevation,
            window,
        } => passes(&config, &tle, &date, min_elevation, &window),
        Commands::Position { tle, time } => position(&tle, time.as_deref()),
    }
}

async fn serve(config_path: &str) -> ExitCode {
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = web::run_server(config).await {
        eprintln!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn passes(
    config_path: &str,
    tle_path: &str,
    date: &str,
    min_elevation: Option<f64>,
    window: &str,
) -> ExitCode {
    let config = match Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let satellite = match load_satellite(tle_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let (start, end) = match day_window(date, window) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let min_el = min_elevation.unwrap_or(config.defaults.min_elevation_deg);
    let station1 = config.station1.to_station();
    let station2 = config.station2.to_station();

    let passes1 = match find_passes(&satellite, &station1, start, end, min_el) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Prediction error for {}: {}", station1.name, e);
            return ExitCode::FAILURE;
        }
    };
    let passes2 = match find_passes(&satellite, &station2, start, end, min_el) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Prediction error for {}: {}", station2.name, e);
            return ExitCode::FAILURE;
        }
    };
    let windows = find_common_windows(&passes1, &passes2);

    println!(
        "{} on {} (min elevation {}°)",
        satellite.name, date, min_el
    );
    print_pass_table(&station1.name, &formatter::pass_rows(&passes1));
    print_pass_table(&station2.name, &formatter::pass_rows(&passes2));
    print_window_table(&formatter::window_rows(&windows));

    ExitCode::SUCCESS
}

fn position(tle_path: &str, time: Option<&str>) -> ExitCode {
    let satellite = match load_satellite(tle_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let timestamp = match time {
        Some(s) => match wire_time::parse(s) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Invalid timestamp '{}': {}", s, e);
                return ExitCode::FAILURE;
            }
        },
        None => Utc::now(),
    };

    match subpoint(&satellite, timestamp) {
        Ok(point) => {
            println!(
                "{} @ {}: lat {:.6}°, lon {:.6}°, height {:.2} m",
                point.satellite,
                point.time.format(wire_time::FORMAT),
                point.latitude_deg,
                point.longitude_deg,
                point.elevation_m
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Prediction error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_satellite(path: &str) -> Result<Satellite, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Error reading TLE file: {}", e))?;
    Satellite::from_tle(&text).map_err(|e| format!("Error parsing TLE: {}", e))
}

fn day_window(date: &str, window: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), String> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", date, e))?;
    let start = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("Invalid date '{}'", date))?
        .and_utc();

    let length = humantime::parse_duration(window)
        .map_err(|e| format!("Invalid window '{}': {}", window, e))
        .and_then(|d| {
            Duration::from_std(d).map_err(|e| format!("Invalid window '{}': {}", window, e))
        })?;

    Ok((start, start + length - Duration::seconds(1)))
}

fn print_pass_table(station: &str, rows: &[PassRow]) {
    println!();
    println!("Passes over {}:", station);
    if rows.is_empty() {
        println!("  none");
        return;
    }
    println!(
        "  {:<3} {:<11} {:<11} {:<11} {:<14} {}",
        "Nr", "Date", "Rise (UTC)", "Set (UTC)", "Max elevation", "Duration (s)"
    );
    for row in rows {
        println!(
            "  {:<3} {:<11} {:<11} {:<11} {:<14} {}",
            row.nr, row.date, row.rise_time, row.set_time, row.max_elevation, row.duration_seconds
        );
    }
}

fn print_window_table(rows: &[WindowRow]) {
    println!();
    println!("Common visibility windows:");
    if rows.is_empty() {
        println!("  none");
        return;
    }
    println!(
        "  {:<3} {:<11} {:<12} {:<11} {:<14} {}",
        "Nr", "Date", "Start (UTC)", "End (UTC)", "Max elevation", "Duration"
    );
    for row in rows {
        println!(
            "  {:<3} {:<11} {:<12} {:<11} {:<14} {}",
            row.nr, row.date, row.start_time, row.end_time, row.max_elevation, row.duration
        );
    }
}
