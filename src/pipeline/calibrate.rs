use rayon::prelude::*;

use crate::pipeline::{build, physics};
use crate::types::activity::TrackPoint;
use crate::types::pace::{PaceCategory, PaceProfile};
use crate::types::route::PhysicsConfig;

/// Learns a personal pace multiplier as the mean of actual/estimated
/// duration over the usable activities.
pub fn calibrate(activities: &[Vec<TrackPoint>], config: &PhysicsConfig) -> PaceProfile {
    let ratios: Vec<f64> = activities
        .par_iter()
        .filter_map(|points| duration_ratio(points, config))
        .collect();

    if ratios.is_empty() {
        tracing::info!(
            "No usable activities among {} for pace calibration",
            activities.len()
        );
        return PaceProfile::neutral();
    }

    let pace_factor = ratios.iter().sum::<f64>() / ratios.len() as f64;
    tracing::info!(
        "Calibrated pace factor {:.3} from {} of {} activities",
        pace_factor,
        ratios.len(),
        activities.len()
    );

    PaceProfile {
        pace_factor,
        activities_analyzed: ratios.len(),
        category: PaceCategory::from_factor(pace_factor),
        no_data: false,
    }
}

/// Actual over baseline-estimated duration for one activity, or `None` when
/// the activity cannot be compared.
pub fn duration_ratio(points: &[TrackPoint], config: &PhysicsConfig) -> Option<f64> {
    if points.len() < 2 {
        tracing::debug!("Skipping activity with {} points", points.len());
        return None;
    }

    let (Some(start), Some(end)) = (points.first()?.time, points.last()?.time) else {
        tracing::debug!("Skipping activity without start/end timestamps");
        return None;
    };
    let actual = (end - start).num_milliseconds() as f64 / 1000.0;
    if actual <= 0.0 {
        tracing::debug!("Skipping activity with non-positive duration {}s", actual);
        return None;
    }

    let route = build::build(points).ok()?;
    let estimated = physics::estimate_times(route, 1.0, config).ok()?.total_time();
    if estimated <= 0.0 {
        return None;
    }

    Some(actual / estimated)
}
