//! Health assessment derived from the displayed (rounded) metrics.

use serde::{Deserialize, Serialize};

use super::simulator::MetricsReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrainLevel {
    Excellent,
    Good,
    Moderate,
    High,
}

impl StrainLevel {
    pub fn from_percent(strain: u32) -> Self {
        match strain {
            0..=29 => StrainLevel::Excellent,
            30..=49 => StrainLevel::Good,
            50..=69 => StrainLevel::Moderate,
            _ => StrainLevel::High,
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            StrainLevel::Excellent => "Your eyes are feeling great! Keep up the healthy habits.",
            StrainLevel::Good => "Your eyes are doing well. Consider taking regular breaks.",
            StrainLevel::Moderate => {
                "Moderate strain detected. Take a break and do some exercises."
            }
            StrainLevel::High => "High strain detected. Immediate rest recommended!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkStatus {
    Optimal,
    Low,
    High,
    VeryLow,
}

impl BlinkStatus {
    pub fn from_rate(rate: u32) -> Self {
        match rate {
            15..=20 => BlinkStatus::Optimal,
            12..=14 => BlinkStatus::Low,
            21.. => BlinkStatus::High,
            _ => BlinkStatus::VeryLow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenUsage {
    Healthy,
    Moderate,
    High,
}

impl ScreenUsage {
    pub fn from_minutes(minutes: u32) -> Self {
        if minutes > 480 {
            ScreenUsage::High
        } else if minutes > 360 {
            ScreenUsage::Moderate
        } else {
            ScreenUsage::Healthy
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthGrade {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl HealthGrade {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => HealthGrade::Excellent,
            60..=79 => HealthGrade::Good,
            40..=59 => HealthGrade::Fair,
            _ => HealthGrade::NeedsAttention,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ReduceScreenTime,
    IncreaseBlinking,
    HighEyeStrain,
    InactiveSession,
}

impl Recommendation {
    pub fn priority(self) -> Priority {
        match self {
            Recommendation::ReduceScreenTime | Recommendation::HighEyeStrain => Priority::High,
            Recommendation::IncreaseBlinking => Priority::Medium,
            Recommendation::InactiveSession => Priority::Low,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Recommendation::ReduceScreenTime => "Reduce Screen Time",
            Recommendation::IncreaseBlinking => "Increase Blinking",
            Recommendation::HighEyeStrain => "High Eye Strain",
            Recommendation::InactiveSession => "Inactive Session",
        }
    }
}

/// 0..=100; starts at 100 and loses points for long screen time, abnormal
/// blinking and strain.
pub fn health_score(reading: &MetricsReading) -> u32 {
    let mut score: i64 = 100;

    score -= match reading.screen_time_minutes {
        481.. => 30,
        361..=480 => 20,
        241..=360 => 10,
        _ => 0,
    };

    let blink = reading.blink_rate_per_minute;
    if blink < 10 {
        score -= 25;
    } else if blink < 15 {
        score -= 15;
    } else if blink > 25 {
        score -= 10;
    }

    score -= i64::from(reading.eye_strain_percent) / 2;
    score.clamp(0, 100) as u32
}

pub fn recommendations(reading: &MetricsReading) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if reading.screen_time_minutes > 360 {
        out.push(Recommendation::ReduceScreenTime);
    }
    if reading.blink_rate_per_minute < 15 {
        out.push(Recommendation::IncreaseBlinking);
    }
    if reading.eye_strain_percent > 50 {
        out.push(Recommendation::HighEyeStrain);
    }
    if !reading.is_active {
        out.push(Recommendation::InactiveSession);
    }
    out
}

/// Everything the health view shows, in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub score: u32,
    pub grade: HealthGrade,
    pub strain_level: StrainLevel,
    pub blink_status: BlinkStatus,
    pub screen_usage: ScreenUsage,
    pub recommendations: Vec<Recommendation>,
}

impl HealthSummary {
    pub fn assess(reading: &MetricsReading) -> Self {
        let score = health_score(reading);
        Self {
            score,
            grade: HealthGrade::from_score(score),
            strain_level: StrainLevel::from_percent(reading.eye_strain_percent),
            blink_status: BlinkStatus::from_rate(reading.blink_rate_per_minute),
            screen_usage: ScreenUsage::from_minutes(reading.screen_time_minutes),
            recommendations: recommendations(reading),
        }
    }
}

/// "2h 7m" or "45m".
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let (hours, mins) = (total / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}
