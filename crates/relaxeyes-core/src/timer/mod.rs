mod countdown;
mod scheduler;

pub use countdown::{Countdown, CountdownState};
pub use scheduler::{BreakScheduler, BreakTimerState, SchedulerConfig, MAX_TICK_SECS};
