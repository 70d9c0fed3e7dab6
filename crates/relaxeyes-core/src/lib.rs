//! # RelaxYourEyes Core Library
//!
//! This library provides the core logic for RelaxYourEyes, an eye-care
//! companion that reminds the user to take screen breaks (the 20-20-20 rule)
//! and shows synthetic eye-health metrics. Everything is available through
//! the standalone CLI binary; a GUI would be a thin layer over the same
//! library.
//!
//! ## Architecture
//!
//! - **Break Scheduler**: A wall-clock-delta countdown that raises "break due"
//!   and is reset by completed breaks or pushed out by snoozes
//! - **Metrics Simulator**: Screen time, blink rate and eye strain driven by
//!   focus/visibility and bounded noise
//! - **Session Controller**: Reminder, active break and navigation state
//! - **Driver**: A single tokio task that ticks the controller and takes
//!   commands over a channel
//! - **Activities**: The guided activity shown during a break, plus
//!   hydration, stretch and posture quick actions
//! - **Storage**: TOML-based configuration
//!
//! None of the state machines own a thread. The caller (the driver, the
//! simulation harness, or a test) invokes `tick` with the current time.
//!
//! ## Key Components
//!
//! - [`SessionController`]: Session state machine
//! - [`BreakScheduler`]: Break countdown
//! - [`MetricsSimulator`]: Synthetic metrics
//! - [`SessionDriver`]: Async event loop
//! - [`Config`]: Application configuration management

pub mod activity;
pub mod clock;
pub mod driver;
pub mod error;
pub mod events;
pub mod metrics;
pub mod session;
pub mod simulation;
pub mod storage;
pub mod timer;

pub use activity::{ActivityKind, BreakActivity};
pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use driver::{Command, DriverHandle, SessionDriver};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{BreakEndReason, DismissReason, Event};
pub use metrics::{HealthSummary, MetricsConfig, MetricsReading, MetricsSimulator};
pub use session::{ActiveView, SessionConfig, SessionController, SessionPhase, SessionSnapshot};
pub use simulation::{
    NoiseSource, SeededNoise, SimulationHarness, SimulationPlan, SimulationSeed, ThreadNoise,
};
pub use storage::Config;
pub use timer::{BreakScheduler, Countdown, SchedulerConfig};
