mod health;
mod simulator;

pub use health::{
    format_minutes, health_score, recommendations, BlinkStatus, HealthGrade, HealthSummary,
    Priority, Recommendation, ScreenUsage, StrainLevel,
};
pub use simulator::{
    MetricsConfig, MetricsReading, MetricsSimulator, MetricsState, BLINK_RATE_BASELINE,
    BLINK_RATE_MAX, BLINK_RATE_MIN, EYE_STRAIN_MAX, EYE_STRAIN_MIN,
};
