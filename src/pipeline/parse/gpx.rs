use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::activity::{FileFormat, ParsedActivity, TrackPoint};
use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub struct GpxParser;

#[derive(Clone, Copy, PartialEq)]
enum PointKind {
    Track,
    Route,
}

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedActivity, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut segments: Vec<Vec<TrackPoint>> = Vec::new();
        let mut segment: Vec<TrackPoint> = Vec::new();
        let mut route_points = Vec::new();
        let mut current: Option<(PointKind, TrackPoint)> = None;
        let mut current_element = String::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = local_name(&e)?;
                    match name.as_str() {
                        "trkpt" => current = read_point(&e)?.map(|p| (PointKind::Track, p)),
                        "rtept" => current = read_point(&e)?.map(|p| (PointKind::Route, p)),
                        _ if current.is_some() => current_element = name,
                        _ => {}
                    }
                }
                Ok(Event::Empty(e)) => {
                    // Self-closing points carry no children.
                    let name = local_name(&e)?;
                    if let Some(point) = read_point(&e)? {
                        match name.as_str() {
                            "trkpt" => segment.push(point),
                            "rtept" => route_points.push(point),
                            _ => {}
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some((_, point)) = current.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                        match current_element.as_str() {
                            "ele" => point.elevation = text.trim().parse().ok(),
                            "time" => point.time = parse_time(text.trim()),
                            _ => {}
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    let name = e.local_name();
                    let name_str = std::str::from_utf8(name.as_ref())
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                    match name_str {
                        "trkpt" | "rtept" => {
                            match current.take() {
                                Some((PointKind::Track, point)) => segment.push(point),
                                Some((PointKind::Route, point)) => route_points.push(point),
                                None => {}
                            }
                        }
                        "trkseg" | "trk" => {
                            if !segment.is_empty() {
                                segments.push(std::mem::take(&mut segment));
                            }
                        }
                        _ => current_element.clear(),
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if !segment.is_empty() {
            segments.push(segment);
        }

        let activity = ParsedActivity {
            segments,
            route_points,
            file_format: FileFormat::Gpx,
        };

        if activity.point_count() == 0 {
            return Err(ParseError::EmptyFile);
        }

        Ok(activity)
    }
}

fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    let name = e.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::InvalidGpx(e.to_string()))
}

/// GPX times are normally RFC 3339, but some exporters omit the offset.
/// Those are read as UTC.
fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    })
}

/// Reads `lat`/`lon` attributes. Points missing either are dropped.
fn read_point(e: &BytesStart<'_>) -> Result<Option<TrackPoint>, ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

        match key {
            "lat" => lat = value.trim().parse::<f64>().ok(),
            "lon" => lon = value.trim().parse::<f64>().ok(),
            _ => {}
        }
    }

    Ok(match (lat, lon) {
        (Some(lat), Some(lon)) => Some(TrackPoint::new(lat, lon)),
        _ => None,
    })
}
