use clap::Args;
use relaxeyes_core::metrics::{format_minutes, HealthSummary, MetricsReading};

#[derive(Args)]
pub struct HealthArgs {
    /// Screen time today, in minutes
    #[arg(long)]
    screen: u32,
    /// Blinks per minute
    #[arg(long)]
    blink: u32,
    /// Eye strain percentage
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    strain: u32,
    /// The user is not currently looking at the screen
    #[arg(long)]
    inactive: bool,
    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let reading = MetricsReading {
        screen_time_minutes: args.screen,
        blink_rate_per_minute: args.blink,
        eye_strain_percent: args.strain,
        is_active: !args.inactive,
    };
    let summary = HealthSummary::assess(&reading);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Health score: {} ({:?})", summary.score, summary.grade);
    println!(
        "Screen time:  {} ({:?})",
        format_minutes(f64::from(reading.screen_time_minutes)),
        summary.screen_usage
    );
    println!(
        "Blink rate:   {}/min ({:?})",
        reading.blink_rate_per_minute, summary.blink_status
    );
    println!(
        "Eye strain:   {}% ({:?})",
        reading.eye_strain_percent, summary.strain_level
    );
    println!("{}", summary.strain_level.advice());
    for rec in &summary.recommendations {
        println!("- [{:?}] {}", rec.priority(), rec.title());
    }
    Ok(())
}
