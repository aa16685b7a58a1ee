use serde::{Deserialize, Serialize};

/// Constants of the walking-time model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Walking speed on flat ground, km/h.
    pub base_speed_kmh: f64,
    /// Extra minutes added per 100 m of ascent (Naismith).
    pub naismith_minutes_per_100m: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            base_speed_kmh: 5.0,
            naismith_minutes_per_100m: 10.0,
        }
    }
}

impl PhysicsConfig {
    pub fn ascent_penalty_seconds(&self, climb_m: f64) -> f64 {
        climb_m / 100.0 * self.naismith_minutes_per_100m * 60.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lon: f64,
    /// Meters; 0 when the source point had none.
    #[serde(default)]
    pub elevation: f64,
    /// Cumulative meters from the first point.
    #[serde(default)]
    pub distance_from_start: f64,
    /// Seconds from trip start.
    #[serde(default)]
    pub estimated_time: f64,
    /// km/h over the segment ending at this point.
    #[serde(default)]
    pub segment_speed: f64,
    /// Percent.
    #[serde(default)]
    pub gradient: f64,
    #[serde(default = "neutral_factor")]
    pub terrain_factor: f64,
    #[serde(default = "neutral_factor")]
    pub weather_factor: f64,
}

fn neutral_factor() -> f64 {
    1.0
}

impl RoutePoint {
    pub fn new(lat: f64, lon: f64, elevation: f64, distance_from_start: f64) -> Self {
        Self {
            lat,
            lon,
            elevation,
            distance_from_start,
            estimated_time: 0.0,
            segment_speed: 0.0,
            gradient: 0.0,
            terrain_factor: 1.0,
            weather_factor: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RouteBounds {
    pub fn enclosing(points: &[RoutePoint]) -> Option<Self> {
        let first = points.first()?;
        let initial = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(points.iter().fold(initial, |b, p| Self {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lon: b.min_lon.min(p.lon),
            max_lon: b.max_lon.max(p.lon),
        }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub points: Vec<RoutePoint>,
    pub total_distance: f64,
    pub total_ascent: f64,
    pub total_descent: f64,
    pub bounds: Option<RouteBounds>,
}

impl Route {
    /// Reassembles a route from points that already carry their distances,
    /// e.g. a route sent back by a client for a weather pass.
    pub fn from_annotated(points: Vec<RoutePoint>) -> Self {
        let (ascent, descent) = points.windows(2).fold((0.0, 0.0), |(up, down), pair| {
            let change = pair[1].elevation - pair[0].elevation;
            if change > 0.0 {
                (up + change, down)
            } else {
                (up, down - change)
            }
        });
        Self {
            total_distance: points.last().map(|p| p.distance_from_start).unwrap_or(0.0),
            total_ascent: ascent,
            total_descent: descent,
            bounds: RouteBounds::enclosing(&points),
            points,
        }
    }

    /// Estimated seconds at the final point.
    pub fn total_time(&self) -> f64 {
        self.points.last().map(|p| p.estimated_time).unwrap_or(0.0)
    }
}
