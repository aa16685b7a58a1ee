use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceCategory {
    SignificantlyFaster,
    Faster,
    Typical,
    Relaxed,
    Leisurely,
}

impl PaceCategory {
    pub fn from_factor(pace_factor: f64) -> Self {
        if pace_factor < 0.8 {
            PaceCategory::SignificantlyFaster
        } else if pace_factor < 0.95 {
            PaceCategory::Faster
        } else if pace_factor < 1.05 {
            PaceCategory::Typical
        } else if pace_factor < 1.2 {
            PaceCategory::Relaxed
        } else {
            PaceCategory::Leisurely
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaceCategory::SignificantlyFaster => "significantly faster",
            PaceCategory::Faster => "faster than average",
            PaceCategory::Typical => "typical pace",
            PaceCategory::Relaxed => "relaxed pace",
            PaceCategory::Leisurely => "leisurely pace",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            PaceCategory::SignificantlyFaster => {
                "You're significantly faster than average! You likely have excellent fitness."
            }
            PaceCategory::Faster => "You're faster than average. Good fitness level.",
            PaceCategory::Typical => "You move at a typical hiking pace.",
            PaceCategory::Relaxed => {
                "You take a more relaxed pace, possibly enjoying the scenery."
            }
            PaceCategory::Leisurely => {
                "You prefer a leisurely pace. Times will be adjusted accordingly."
            }
        }
    }
}

/// Personal pace multiplier learned from past activities. Computed per
/// request and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceProfile {
    pub pace_factor: f64,
    pub activities_analyzed: usize,
    pub category: PaceCategory,
    /// Set when no activity produced a usable ratio; `pace_factor` is then 1.0.
    pub no_data: bool,
}

impl PaceProfile {
    pub fn neutral() -> Self {
        Self {
            pace_factor: 1.0,
            activities_analyzed: 0,
            category: PaceCategory::from_factor(1.0),
            no_data: true,
        }
    }
}
