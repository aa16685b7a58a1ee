use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::activity::{FileFormat, ParsedActivity, TrackPoint};
use chrono::DateTime;
use fitparser::profile::MesgNum;

pub struct FitParser;

impl Parser for FitParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedActivity, ParseError> {
        let data = fitparser::from_bytes(bytes)
            .map_err(|e| ParseError::InvalidFit(format!("Failed to parse FIT file: {}", e)))?;

        let mut points = Vec::new();

        for record in data {
            if record.kind() != MesgNum::Record {
                continue;
            }

            let mut lat = None;
            let mut lon = None;
            let mut elevation = None;
            let mut time = None;

            for field in record.fields() {
                match (field.name(), field.value()) {
                    ("position_lat", fitparser::Value::SInt32(val)) => {
                        lat = Some(semicircles_to_degrees(*val));
                    }
                    ("position_long", fitparser::Value::SInt32(val)) => {
                        lon = Some(semicircles_to_degrees(*val));
                    }
                    ("altitude" | "enhanced_altitude", fitparser::Value::Float64(val)) => {
                        elevation = Some(*val);
                    }
                    ("timestamp", fitparser::Value::Timestamp(val)) => {
                        time = DateTime::from_timestamp(val.timestamp(), 0);
                    }
                    _ => {}
                }
            }

            if let (Some(lat), Some(lon)) = (lat, lon) {
                points.push(TrackPoint {
                    lat,
                    lon,
                    elevation,
                    time,
                });
            }
        }

        if points.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(ParsedActivity {
            segments: vec![points],
            route_points: Vec::new(),
            file_format: FileFormat::Fit,
        })
    }
}

fn semicircles_to_degrees(semicircles: i32) -> f64 {
    (semicircles as f64) * (180.0 / 2_147_483_648.0)
}
