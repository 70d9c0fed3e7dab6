//! Async session driver.
//!
//! Runs a [`SessionController`] on a single task. Three intervals (metrics,
//! break scheduler, one-second countdowns) and inbound [`Command`]s are
//! multiplexed with `tokio::select!`, so every mutation of session state
//! happens on this one task and never overlaps another. Resulting [`Event`]s
//! go out on an mpsc channel.
//!
//! The loop exits on [`Command::Shutdown`], when every command sender is
//! dropped, or when the event receiver is dropped. The intervals live in the
//! loop and are released with it.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::activity::ActivityKind;
use crate::clock::Clock;
use crate::events::Event;
use crate::session::{ActiveView, SessionConfig, SessionController};
use crate::simulation::NoiseSource;
use crate::timer::MAX_TICK_SECS;

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);
const CHANNEL_CAPACITY: usize = 256;

/// Inputs from the presentation layer or the host environment.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartBreak,
    EndBreak,
    DismissReminder,
    /// Snooze for the given minutes, or the configured snooze length.
    Snooze(Option<f64>),
    SetView(ActiveView),
    Focus(bool),
    Visibility(bool),
    PauseBreak,
    ResumeBreak,
    /// Switch the guided activity during a break.
    SelectActivity(ActivityKind),
    FocusHit,
    /// Mark a catalog exercise done.
    CompleteExercise(String),
    Hydrate,
    Stretch,
    PostureCheck,
    /// Emit a `StateSnapshot` event.
    Snapshot,
    Shutdown,
}

/// Caller's end of a running driver.
#[derive(Debug)]
pub struct DriverHandle {
    pub commands: mpsc::Sender<Command>,
    pub events: mpsc::Receiver<Event>,
}

impl DriverHandle {
    /// Returns `false` once the driver has stopped.
    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }
}

pub struct SessionDriver<C, N> {
    controller: SessionController,
    clock: C,
    noise: N,
    commands: mpsc::Receiver<Command>,
    events: mpsc::Sender<Event>,
}

enum Flow {
    Continue,
    Stop,
}

impl<C, N> SessionDriver<C, N>
where
    C: Clock,
    N: NoiseSource,
{
    pub fn new(config: SessionConfig, clock: C, noise: N) -> (Self, DriverHandle) {
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let controller = SessionController::new(config, clock.now());
        let driver = Self {
            controller,
            clock,
            noise,
            commands: command_rx,
            events: event_tx,
        };
        let handle = DriverHandle {
            commands: command_tx,
            events: event_rx,
        };
        (driver, handle)
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Run until shutdown. Returns the controller in its final state.
    pub async fn run(mut self) -> SessionController {
        let config = self.controller.config().clone();
        let mut metrics_tick = ticker(Duration::from_secs(config.metrics.tick_secs.max(1)));
        let mut scheduler_tick = ticker(config.scheduler.tick_period().max(COUNTDOWN_PERIOD));
        let mut countdown_tick = ticker(COUNTDOWN_PERIOD);

        let mut last_scheduler = Instant::now();
        let mut last_countdown = Instant::now();

        info!("session driver started");
        loop {
            let flow = tokio::select! {
                _ = metrics_tick.tick() => {
                    let now = self.clock.now();
                    let events = self.controller.tick_metrics(now, &mut self.noise);
                    self.publish(events).await
                }
                at = scheduler_tick.tick() => {
                    let elapsed = at.duration_since(last_scheduler);
                    last_scheduler = at;
                    let now = self.clock.now();
                    let events = self.controller.tick_scheduler(elapsed, now);
                    self.publish(events).await
                }
                at = countdown_tick.tick() => {
                    let elapsed = at.duration_since(last_countdown);
                    last_countdown = at;
                    let now = self.clock.now();
                    let events = self.controller.tick_countdowns(elapsed, now, &mut self.noise);
                    self.publish(events).await
                }
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => Flow::Stop,
                    Some(command) => {
                        let events = self.apply(command);
                        self.publish(events).await
                    }
                },
            };
            if matches!(flow, Flow::Stop) {
                break;
            }
        }
        info!("session driver stopped");
        self.controller
    }

    fn apply(&mut self, command: Command) -> Vec<Event> {
        let now: DateTime<Utc> = self.clock.now();
        debug!(?command, "command received");
        let c = &mut self.controller;
        match command {
            Command::StartBreak => c.start_break(now),
            Command::EndBreak => c.end_break(now),
            Command::DismissReminder => c.dismiss_reminder(now),
            Command::Snooze(minutes) => {
                let minutes = minutes.unwrap_or(c.config().dismiss_snooze_minutes);
                c.snooze(minutes, now)
            }
            Command::SetView(view) => c.set_active_view(view, now).into_iter().collect(),
            Command::Focus(focused) => c.on_focus_change(focused, now),
            Command::Visibility(visible) => c.on_visibility_change(visible, now),
            Command::PauseBreak => c.pause_break(now).into_iter().collect(),
            Command::ResumeBreak => c.resume_break(now).into_iter().collect(),
            Command::SelectActivity(kind) => c.select_activity(kind, now).into_iter().collect(),
            Command::FocusHit => c.hit_focus_dot(now, &mut self.noise).into_iter().collect(),
            Command::CompleteExercise(id) => match c.complete_exercise(&id, now) {
                Ok(event) => event.into_iter().collect(),
                Err(e) => {
                    warn!(error = %e, "exercise not recorded");
                    Vec::new()
                }
            },
            Command::Hydrate => c.request_hydration_reminder(now),
            Command::Stretch => c.stretch_routine(now),
            Command::PostureCheck => vec![c.posture_check(now, &mut self.noise)],
            Command::Snapshot => vec![Event::StateSnapshot(c.snapshot(now))],
            Command::Shutdown => Vec::new(),
        }
    }

    async fn publish(&mut self, events: Vec<Event>) -> Flow {
        for event in events {
            debug!(kind = event.kind(), "event");
            if matches!(event, Event::NotificationRequested { .. }) {
                // The event carries the notification; nothing else consumes it.
                self.controller.take_notification();
            }
            if self.events.send(event).await.is_err() {
                debug!("event receiver dropped");
                return Flow::Stop;
            }
        }
        Flow::Continue
    }
}

/// Periods above [`MAX_TICK_SECS`] are clamped so instant arithmetic cannot
/// overflow.
fn ticker(period: Duration) -> Interval {
    let period = period.min(Duration::from_secs(MAX_TICK_SECS));
    let now = Instant::now();
    let mut interval = interval_at(now.checked_add(period).unwrap_or(now), period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
