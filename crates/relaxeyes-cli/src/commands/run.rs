use clap::Args;
use relaxeyes_core::{
    ActiveView, ActivityKind, Command, Config, SessionConfig, SessionDriver, SystemClock,
    ThreadNoise,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const HELP: &str = "commands: start, end, dismiss, snooze [minutes], view <name>, \
activity <name>, hit, done <exercise>, hydrate, stretch, posture, focus, blur, show, hide, pause, resume, \
status, quit";

#[derive(Args)]
pub struct RunArgs {
    /// Countdown minutes consumed per real minute (overrides the config)
    #[arg(long)]
    time_scale: Option<f64>,
}

/// One stdin line to a driver command. Blank lines are ignored.
fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    let command = match word.to_ascii_lowercase().as_str() {
        "start" => Command::StartBreak,
        "end" => Command::EndBreak,
        "dismiss" | "later" => Command::DismissReminder,
        "snooze" => {
            let minutes = arg
                .map(|raw| {
                    raw.parse::<f64>()
                        .map_err(|_| format!("not a number of minutes: {raw}"))
                })
                .transpose()?;
            Command::Snooze(minutes)
        }
        "view" => {
            let name = arg.ok_or("view needs a name")?;
            let view = name.parse::<ActiveView>().map_err(|e| e.to_string())?;
            Command::SetView(view)
        }
        "activity" => {
            let name = arg.ok_or("activity needs a name")?;
            let kind = name.parse::<ActivityKind>().map_err(|e| e.to_string())?;
            Command::SelectActivity(kind)
        }
        "hit" => Command::FocusHit,
        "done" => {
            let id = arg.ok_or("done needs an exercise id")?;
            relaxeyes_core::activity::find_exercise(id).map_err(|e| e.to_string())?;
            Command::CompleteExercise(id.to_string())
        }
        "hydrate" | "water" => Command::Hydrate,
        "stretch" => Command::Stretch,
        "posture" => Command::PostureCheck,
        "focus" => Command::Focus(true),
        "blur" => Command::Focus(false),
        "show" => Command::Visibility(true),
        "hide" => Command::Visibility(false),
        "pause" => Command::PauseBreak,
        "resume" => Command::ResumeBreak,
        "status" => Command::Snapshot,
        "quit" | "exit" => Command::Shutdown,
        other => return Err(format!("unknown command '{other}' ({HELP})")),
    };
    Ok(Some(command))
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(scale) = args.time_scale {
        config.breaks.time_scale = scale;
    }
    let session = SessionConfig::try_from(&config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(session))
}

async fn drive(config: SessionConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (driver, mut handle) = SessionDriver::new(config, SystemClock, ThreadNoise);
    let task = tokio::spawn(driver.run());
    info!("live session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reading = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if reading => match line? {
                Some(line) => match parse_line(&line) {
                    Ok(Some(command)) => {
                        if command == Command::Shutdown {
                            reading = false;
                        }
                        handle.send(command).await;
                    }
                    Ok(None) => {}
                    Err(message) => eprintln!("{message}"),
                },
                // EOF ends the session.
                None => {
                    reading = false;
                    handle.send(Command::Shutdown).await;
                }
            },
            event = handle.next_event() => match event {
                Some(event) => println!("{}", serde_json::to_string(&event)?),
                None => break,
            },
        }
    }

    let controller = task.await?;
    info!(phase = ?controller.phase(), "live session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_line("start").unwrap(), Some(Command::StartBreak));
        assert_eq!(parse_line("  ").unwrap(), None);
        assert_eq!(parse_line("snooze").unwrap(), Some(Command::Snooze(None)));
        assert_eq!(
            parse_line("snooze 12").unwrap(),
            Some(Command::Snooze(Some(12.0)))
        );
        assert_eq!(
            parse_line("view Health").unwrap(),
            Some(Command::SetView(ActiveView::Health))
        );
        assert_eq!(parse_line("blur").unwrap(), Some(Command::Focus(false)));
        assert_eq!(parse_line("quit").unwrap(), Some(Command::Shutdown));
    }

    #[test]
    fn parses_activity_and_wellness_commands() {
        assert_eq!(
            parse_line("activity focus-game").unwrap(),
            Some(Command::SelectActivity(ActivityKind::FocusGame))
        );
        assert_eq!(
            parse_line("activity Breathing").unwrap(),
            Some(Command::SelectActivity(ActivityKind::Breathing))
        );
        assert_eq!(parse_line("hit").unwrap(), Some(Command::FocusHit));
        assert_eq!(parse_line("hydrate").unwrap(), Some(Command::Hydrate));
        assert_eq!(parse_line("stretch").unwrap(), Some(Command::Stretch));
        assert_eq!(parse_line("posture").unwrap(), Some(Command::PostureCheck));
        assert_eq!(
            parse_line("done palming").unwrap(),
            Some(Command::CompleteExercise("palming".into()))
        );
        assert!(parse_line("done yoga").is_err());
        assert!(parse_line("activity").is_err());
        assert!(parse_line("activity juggling").is_err());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_line("snooze soon").is_err());
        assert!(parse_line("view").is_err());
        assert!(parse_line("view kitchen").is_err());
        assert!(parse_line("dance").is_err());
    }
}
