use crate::error::RouteError;
use crate::types::route::{PhysicsConfig, Route};

/// Gradient past which a descent slows the walker down again, percent.
const STEEP_DESCENT_GRADIENT: f64 = -15.0;
const DOWNHILL_FACTOR_FLOOR: f64 = 0.85;

/// Annotates every point with gradient, terrain factor, segment speed and
/// cumulative time using a modified Naismith model.
///
/// `pace_multiplier` scales travel time: above 1.0 models a slower walker.
pub fn estimate_times(
    mut route: Route,
    pace_multiplier: f64,
    config: &PhysicsConfig,
) -> Result<Route, RouteError> {
    if !pace_multiplier.is_finite() || pace_multiplier <= 0.0 {
        return Err(RouteError::InvalidPaceMultiplier(pace_multiplier));
    }

    let Some(first) = route.points.first_mut() else {
        return Err(RouteError::EmptyRoute);
    };
    first.estimated_time = 0.0;
    first.segment_speed = config.base_speed_kmh;
    first.gradient = 0.0;
    first.terrain_factor = 1.0;

    let mut total_time = 0.0;
    for i in 1..route.points.len() {
        let (prev_distance, prev_elevation) = {
            let prev = &route.points[i - 1];
            (prev.distance_from_start, prev.elevation)
        };
        let point = &mut route.points[i];

        let segment_distance = point.distance_from_start - prev_distance;
        let elevation_change = point.elevation - prev_elevation;
        let gradient = gradient_percent(elevation_change, segment_distance);

        let terrain = terrain_factor(gradient);
        let speed = config.base_speed_kmh / terrain / pace_multiplier;

        let mut segment_time = (segment_distance / 1000.0) / speed * 3600.0;
        if elevation_change > 0.0 {
            segment_time += config.ascent_penalty_seconds(elevation_change);
        }

        total_time += segment_time;

        point.estimated_time = total_time;
        point.segment_speed = speed;
        point.gradient = gradient;
        point.terrain_factor = terrain;
    }

    Ok(route)
}

/// Rise over run as a percentage. Zero-length segments are flat.
pub fn gradient_percent(elevation_change: f64, distance: f64) -> f64 {
    if distance > 0.0 {
        elevation_change / distance * 100.0
    } else {
        0.0
    }
}

/// Travel-time multiplier for a gradient in percent.
pub fn terrain_factor(gradient: f64) -> f64 {
    if gradient > 0.0 {
        1.0 + (gradient / 10.0) * 0.5
    } else if gradient < STEEP_DESCENT_GRADIENT {
        1.0 + (STEEP_DESCENT_GRADIENT - gradient) / 20.0
    } else if gradient < 0.0 {
        (1.0 + gradient / 50.0).max(DOWNHILL_FACTOR_FLOOR)
    } else {
        1.0
    }
}

/// Hours and minutes, e.g. "2h 15m", or "45m" when under an hour.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0) as u64 } else { 0 };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
