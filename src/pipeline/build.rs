use crate::error::RouteError;
use crate::types::activity::TrackPoint;
use crate::types::route::{Route, RouteBounds, RoutePoint};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Assembles a route from raw points, accumulating great-circle distance and
/// elevation totals. Time fields are left at their initial values.
pub fn build(points: &[TrackPoint]) -> Result<Route, RouteError> {
    if points.is_empty() {
        return Err(RouteError::EmptyRoute);
    }

    let mut route_points = Vec::with_capacity(points.len());
    let mut total_distance = 0.0;
    let mut total_ascent = 0.0;
    let mut total_descent = 0.0;

    for (i, curr) in points.iter().enumerate() {
        if i > 0 {
            let prev = &points[i - 1];
            total_distance += haversine_distance(prev.lat, prev.lon, curr.lat, curr.lon);

            if let (Some(prev_ele), Some(curr_ele)) = (prev.elevation, curr.elevation) {
                let change = curr_ele - prev_ele;
                if change > 0.0 {
                    total_ascent += change;
                } else {
                    total_descent += change.abs();
                }
            }
        }

        route_points.push(RoutePoint::new(
            curr.lat,
            curr.lon,
            curr.elevation.unwrap_or(0.0),
            total_distance,
        ));
    }

    Ok(Route {
        bounds: RouteBounds::enclosing(&route_points),
        points: route_points,
        total_distance,
        total_ascent,
        total_descent,
    })
}

/// Great-circle distance in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
