use chrono::{DateTime, TimeZone, Utc};
use clap::Args;
use relaxeyes_core::simulation::{ReminderResponse, SimulationPlan, SimulationSeed};
use relaxeyes_core::{Config, SessionConfig, SimulationHarness};

#[derive(Args)]
pub struct SimulateArgs {
    /// Simulated session length
    #[arg(long, default_value_t = 60)]
    minutes: u64,
    /// Noise seed: a number, or any word to hash into one
    #[arg(long, default_value = "42")]
    seed: String,
    /// Print a snapshot every N simulated minutes (0 = final only)
    #[arg(long, default_value_t = 10)]
    every: u64,
    /// Take every break as soon as the reminder appears
    #[arg(long, conflicts_with = "dismiss")]
    accept_breaks: bool,
    /// Click "Later" on every reminder
    #[arg(long)]
    dismiss: bool,
    /// Simulated start time (RFC 3339)
    #[arg(long)]
    start: Option<DateTime<Utc>>,
    /// Also print every event
    #[arg(long)]
    events: bool,
    /// Ignore the config file and use built-in defaults
    #[arg(long)]
    defaults: bool,
}

fn parse_seed(raw: &str) -> SimulationSeed {
    raw.parse::<u64>()
        .map(SimulationSeed::new)
        .unwrap_or_else(|_| SimulationSeed::from_string(raw))
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = if args.defaults {
        SessionConfig::default()
    } else {
        SessionConfig::try_from(&Config::load_or_default())?
    };
    let start = match args.start {
        Some(start) => start,
        None => Utc
            .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
            .single()
            .ok_or("invalid default start time")?,
    };
    let response = if args.accept_breaks {
        ReminderResponse::Accept
    } else if args.dismiss {
        ReminderResponse::Dismiss
    } else {
        ReminderResponse::Ignore
    };

    let plan = SimulationPlan {
        minutes: args.minutes,
        seed: parse_seed(&args.seed),
        snapshot_every_minutes: args.every,
        response,
    };
    let result = SimulationHarness::new(config, start).run(&plan);

    if args.events {
        for event in &result.events {
            println!("{}", serde_json::to_string(event)?);
        }
    }
    for snapshot in &result.snapshots {
        println!("{}", serde_json::to_string(snapshot)?);
    }
    println!("{}", serde_json::to_string(&result.summary)?);
    Ok(())
}
