use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw point as supplied by a file parser or a JSON request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            elevation: None,
            time: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum FileFormat {
    Gpx,
    Fit,
}

impl FileFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit('.').next()?.to_lowercase();
        match ext.as_str() {
            "gpx" => Some(FileFormat::Gpx),
            "fit" => Some(FileFormat::Fit),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Gpx => "gpx",
            FileFormat::Fit => "fit",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedActivity {
    /// Recorded track segments, in file order.
    pub segments: Vec<Vec<TrackPoint>>,
    /// Planned route points, which follow the track points when flattened.
    pub route_points: Vec<TrackPoint>,
    pub file_format: FileFormat,
}

impl ParsedActivity {
    /// All points as one ordered sequence: every track segment, then the route points.
    pub fn points(&self) -> Vec<TrackPoint> {
        self.segments
            .iter()
            .flatten()
            .chain(self.route_points.iter())
            .cloned()
            .collect()
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum::<usize>() + self.route_points.len()
    }
}
