use bhf_core::*;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bhf")]
#[command(about = "Brain Heart Fitness heart-rate zone tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use synthetic data instead of the local sample store
    #[arg(long, global = true)]
    synthetic: bool,

    /// Seed for synthetic data (implies reproducible output)
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current week's summary (default)
    Week,

    /// Show a single day's summary
    Day {
        /// Date to summarize (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Show Zone 2+ progress for each day of the current week
    Progress,

    /// Show the heart rate zone table
    Zones {
        /// Derive zones from this max heart rate instead of the config
        #[arg(long)]
        max_hr: Option<u16>,

        /// Resting heart rate used with --max-hr
        #[arg(long, default_value_t = 60)]
        resting_hr: u16,
    },

    /// Generate synthetic samples and append them to the sample store
    Record {
        /// Hours of data to generate, ending now
        #[arg(long, default_value_t = 24)]
        hours: u32,
    },

    /// Export the current week's summary and progress to CSV files
    Export {
        /// Output directory (defaults to <data-dir>/export)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    bhf_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    let service = build_service(&cli, &config, &data_dir);
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Week) | None => cmd_week(&service),
        Some(Commands::Day { ref date }) => cmd_day(&service, date.as_deref()),
        Some(Commands::Progress) => cmd_progress(&service),
        Some(Commands::Zones { max_hr, resting_hr }) => cmd_zones(&service, max_hr, resting_hr),
        Some(Commands::Record { hours }) => cmd_record(&data_dir, hours, cli.seed),
        Some(Commands::Export { ref out }) => cmd_export(&service, &data_dir, out.clone()),
    }
}

fn store_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("samples.jsonl")
}

fn build_service(cli: &Cli, config: &Config, data_dir: &std::path::Path) -> HealthDataService {
    let provider: Box<dyn HeartRateProvider> = if cli.synthetic {
        match cli.seed {
            Some(seed) => Box::new(SyntheticProvider::with_seed(seed)),
            None => Box::new(SyntheticProvider::new()),
        }
    } else {
        let path = store_path(data_dir);
        if !path.exists() {
            eprintln!(
                "No sample store at {} - run `bhf record` or pass --synthetic.",
                path.display()
            );
        }
        Box::new(StoreProvider::new(path))
    };

    HealthDataService::from_config(config, provider)
}

fn cmd_week(service: &HealthDataService) -> Result<()> {
    let now = Utc::now();
    let summary = service.weekly_summary(now);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  THIS WEEK (from {})            │", week_start(now));
    println!("╰─────────────────────────────────────────╯");
    display_summary(service, &summary);

    let zone2_plus = service.zone2_plus_minutes(&summary);
    let goal = service.goals().weekly_zone2_plus;
    println!();
    println!("  Zone 2+ minutes: {} / {} weekly goal", zone2_plus, goal);
    if zone2_plus >= goal {
        println!("  ✓ Weekly goal reached!");
    }
    println!();

    Ok(())
}

fn cmd_day(service: &HealthDataService, date: Option<&str>) -> Result<()> {
    let date = match date {
        Some(raw) => raw
            .parse::<NaiveDate>()
            .map_err(|e| Error::Other(format!("Invalid date '{}': {}", raw, e)))?,
        None => Utc::now().date_naive(),
    };

    let daily = service.daily_summary(date);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}                             │", daily.date);
    println!("╰─────────────────────────────────────────╯");
    display_summary(service, &daily.summary);

    let zone2_plus = service.zone2_plus_minutes(&daily.summary);
    let goal = service.goals().daily_zone2_plus;
    println!();
    println!("  Zone 2+ minutes: {} / {} daily goal", zone2_plus, goal);
    println!();

    Ok(())
}

fn cmd_progress(service: &HealthDataService) -> Result<()> {
    let today = Utc::now().date_naive();
    let progress = service.weekly_progress(today);
    let goal = service.goals().daily_zone2_plus;

    println!("\n  Zone 2+ minutes this week (goal {}/day)", goal);
    println!("  ─────────────────────────────────────────");

    for row in &progress {
        let marker = if row.zone2_plus_minutes >= goal { "✓" } else { " " };
        println!(
            "  {} {}  {:>4} min  {}",
            marker,
            row.date.format("%a %m-%d"),
            row.zone2_plus_minutes,
            bar(row.zone2_plus_minutes, goal.max(1))
        );
    }
    println!();

    Ok(())
}

fn cmd_zones(service: &HealthDataService, max_hr: Option<u16>, resting_hr: u16) -> Result<()> {
    let table = match max_hr {
        Some(max) => karvonen_zones(max, resting_hr),
        None => service.zones().to_vec(),
    };

    let errors = bhf_core::zones::validate(&table);
    if !errors.is_empty() {
        eprintln!("Zone table validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Zones("Invalid zone table".into()));
    }

    println!("\n  Heart rate zones");
    println!("  ─────────────────────────────────────────");
    for zone in &table {
        println!(
            "  {}  {:<13} {:>3}-{:<3} BPM",
            zone.name, zone.description, zone.min_bpm, zone.max_bpm
        );
    }
    println!();

    Ok(())
}

fn cmd_record(data_dir: &std::path::Path, hours: u32, seed: Option<u64>) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;

    let end_ms = Utc::now().timestamp_millis();
    let start_ms = end_ms - i64::from(hours) * 60 * MINUTE_MS;

    let mut gen = match seed {
        Some(seed) => SyntheticGenerator::with_seed(seed),
        None => SyntheticGenerator::from_entropy(),
    };
    let samples = gen.generate(start_ms, end_ms);

    let store = SampleStore::new(store_path(data_dir));
    store.append(&samples)?;

    println!(
        "✓ Recorded {} synthetic samples covering the last {} hours",
        samples.len(),
        hours
    );
    println!("  Store: {}", store.path().display());

    Ok(())
}

fn cmd_export(
    service: &HealthDataService,
    data_dir: &std::path::Path,
    out: Option<PathBuf>,
) -> Result<()> {
    let out_dir = out.unwrap_or_else(|| data_dir.join("export"));
    std::fs::create_dir_all(&out_dir)?;

    let now = Utc::now();
    let summary = service.weekly_summary(now);
    let progress = service.weekly_progress(now.date_naive());

    let sessions = export::write_sessions_csv(&summary, &out_dir.join("sessions.csv"))?;
    export::write_zone_breakdown_csv(&summary, &out_dir.join("zones.csv"))?;
    export::write_progress_csv(&progress, &out_dir.join("progress.csv"))?;

    println!("✓ Exported {} sessions and weekly progress", sessions);
    println!("  Output: {}", out_dir.display());

    Ok(())
}

fn display_summary(service: &HealthDataService, summary: &HeartRateSummary) {
    println!();
    println!("  Total active minutes: {}", summary.total_minutes);
    println!(
        "  Heart rate: avg {}  max {}  min {}",
        summary.average_heart_rate, summary.max_heart_rate, summary.min_heart_rate
    );
    println!();

    let scale = summary
        .zone_breakdown
        .values()
        .copied()
        .max()
        .unwrap_or(0)
        .max(1);

    for zone in service.zones() {
        let minutes = summary.zone_breakdown.get(&zone.id).copied().unwrap_or(0);
        println!(
            "  {}  {:<13} {:>4} min  {}",
            zone.name,
            zone.description,
            minutes,
            bar(minutes, scale)
        );
    }

    if !summary.sessions.is_empty() {
        println!();
        println!("  Sessions: {}", summary.sessions.len());
        for session in summary.sessions.iter().rev().take(5) {
            let start = chrono::DateTime::from_timestamp_millis(session.start_time_ms)
                .map(|dt| dt.format("%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!(
                "    {}  {} min  avg {} BPM",
                start,
                session.credited_minutes(),
                session.average_bpm
            );
        }
    }
}

/// Proportional bar capped at 20 cells
fn bar(value: u32, scale: u32) -> String {
    let cells = ((value * 20) / scale).min(20) as usize;
    "█".repeat(cells)
}
