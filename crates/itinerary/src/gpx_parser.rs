//! Streaming GPX track point extraction.
//!
//! Every element whose local name is `trkpt` is read as a track point, with
//! or without a namespace prefix, in document order. `lat` and `lon` are
//! required; the first nested `<ele>` supplies the elevation and falls back
//! to "absent" when it does not parse.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::errors::RouteError;
use crate::models::Trackpoint;

/// Parses a GPX document held in memory.
pub fn parse_gpx_bytes(bytes: &[u8]) -> Result<Vec<Trackpoint>, RouteError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| RouteError::XmlParse(format!("document is not valid UTF-8: {e}")))?;
    parse_gpx(text)
}

/// Parses GPX text into its ordered track points.
pub fn parse_gpx(text: &str) -> Result<Vec<Trackpoint>, RouteError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut points = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<PendingPoint> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            RouteError::XmlParse(format!("{e} (at byte {})", reader.error_position()))
        })?;

        match event {
            Event::Start(e) => {
                enter_element(depth, &mut seen_root)?;
                check_attributes(&e)?;
                depth += 1;

                match e.local_name().as_ref() {
                    b"trkpt" if current.is_none() => {
                        current = Some(PendingPoint::start(&e, points.len(), depth)?);
                    }
                    b"trkpt" => debug!("Ignoring trkpt nested inside track point {}", points.len()),
                    b"ele" => {
                        if let Some(point) = current.as_mut() {
                            point.open_elevation(depth);
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                enter_element(depth, &mut seen_root)?;
                check_attributes(&e)?;

                match e.local_name().as_ref() {
                    b"trkpt" if current.is_none() => {
                        let point = PendingPoint::start(&e, points.len(), depth + 1)?;
                        points.push(point.finish());
                    }
                    b"ele" => {
                        if let Some(point) = current.as_mut() {
                            point.skip_elevation();
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if depth == 0 {
                    return Err(RouteError::XmlParse(
                        "text outside of the root element".to_string(),
                    ));
                }
                let text = t
                    .unescape()
                    .map_err(|e| RouteError::XmlParse(e.to_string()))?;
                if let Some(point) = current.as_mut().filter(|p| p.reading_elevation()) {
                    point.push_elevation_text(&text);
                }
            }
            Event::CData(c) => {
                if let Some(point) = current.as_mut().filter(|p| p.reading_elevation()) {
                    point.push_elevation_text(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"ele" => {
                        if let Some(point) = current
                            .as_mut()
                            .filter(|p| p.elevation_depth() == Some(depth))
                        {
                            point.close_elevation();
                        }
                    }
                    b"trkpt" if current.as_ref().is_some_and(|p| p.depth == depth) => {
                        if let Some(point) = current.take() {
                            points.push(point.finish());
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(RouteError::XmlParse(format!(
            "unexpected end of document with {depth} unclosed element(s)"
        )));
    }
    if !seen_root {
        return Err(RouteError::XmlParse(
            "document has no root element".to_string(),
        ));
    }
    if points.is_empty() {
        return Err(RouteError::EmptyRoute);
    }

    Ok(points)
}

/// Rejects a second top-level element.
fn enter_element(depth: usize, seen_root: &mut bool) -> Result<(), RouteError> {
    if depth == 0 {
        if *seen_root {
            return Err(RouteError::XmlParse(
                "document has more than one root element".to_string(),
            ));
        }
        *seen_root = true;
    }
    Ok(())
}

/// Attributes are parsed lazily, so malformed ones (unquoted, duplicated,
/// bad references) only surface when every one of them is read.
fn check_attributes(e: &BytesStart<'_>) -> Result<(), RouteError> {
    for attr in e.attributes() {
        attr.map_err(|err| RouteError::XmlParse(err.to_string()))?
            .unescape_value()
            .map_err(|err| RouteError::XmlParse(err.to_string()))?;
    }
    Ok(())
}

#[derive(Debug)]
enum Elevation {
    Pending,
    Reading { depth: usize, text: String },
    Done(Option<f64>),
}

/// A track point whose start tag has been read but not its end tag.
#[derive(Debug)]
struct PendingPoint {
    index: usize,
    lat: f64,
    lon: f64,
    depth: usize,
    elevation: Elevation,
}

impl PendingPoint {
    fn start(e: &BytesStart<'_>, index: usize, depth: usize) -> Result<Self, RouteError> {
        Ok(Self {
            index,
            lat: coordinate(e, "lat", 90.0, index)?,
            lon: coordinate(e, "lon", 180.0, index)?,
            depth,
            elevation: Elevation::Pending,
        })
    }

    fn open_elevation(&mut self, depth: usize) {
        if matches!(self.elevation, Elevation::Pending) {
            self.elevation = Elevation::Reading {
                depth,
                text: String::new(),
            };
        }
    }

    fn skip_elevation(&mut self) {
        if matches!(self.elevation, Elevation::Pending) {
            self.elevation = Elevation::Done(None);
        }
    }

    fn reading_elevation(&self) -> bool {
        matches!(self.elevation, Elevation::Reading { .. })
    }

    fn elevation_depth(&self) -> Option<usize> {
        match self.elevation {
            Elevation::Reading { depth, .. } => Some(depth),
            _ => None,
        }
    }

    fn push_elevation_text(&mut self, chunk: &str) {
        if let Elevation::Reading { text, .. } = &mut self.elevation {
            text.push_str(chunk);
        }
    }

    fn close_elevation(&mut self) {
        if let Elevation::Reading { text, .. } = &self.elevation {
            let parsed = text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
            if parsed.is_none() {
                debug!(
                    "Track point {} has unusable elevation {:?}, defaulting to 0",
                    self.index, text
                );
            }
            self.elevation = Elevation::Done(parsed);
        }
    }

    fn finish(self) -> Trackpoint {
        let ele = match self.elevation {
            Elevation::Done(ele) => ele,
            _ => None,
        };
        Trackpoint::new(self.lat, self.lon, ele)
    }
}

/// Reads a required coordinate attribute, rejecting non-finite or out of
/// range values.
fn coordinate(
    e: &BytesStart<'_>,
    attribute: &'static str,
    limit: f64,
    index: usize,
) -> Result<f64, RouteError> {
    let invalid = || RouteError::InvalidTrackpoint { index, attribute };

    let attr = e
        .try_get_attribute(attribute)
        .map_err(|err| RouteError::XmlParse(err.to_string()))?
        .ok_or_else(invalid)?;
    let value = attr
        .unescape_value()
        .map_err(|err| RouteError::XmlParse(err.to_string()))?;

    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_POINTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Etapa 1</name>
    <trkseg>
      <trkpt lat="6.200" lon="-73.500"><ele>1500</ele></trkpt>
      <trkpt lat="6.205" lon="-73.495"><ele>1520</ele></trkpt>
      <trkpt lat="6.210" lon="-73.490"><ele>1480</ele></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_parse_preserves_document_order() {
        let points = parse_gpx(THREE_POINTS).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Trackpoint::new(6.200, -73.500, Some(1500.0)));
        assert_eq!(points[1], Trackpoint::new(6.205, -73.495, Some(1520.0)));
        assert_eq!(points[2], Trackpoint::new(6.210, -73.490, Some(1480.0)));
    }

    #[test]
    fn test_missing_elevation_reads_as_zero() {
        let gpx = r#"<gpx><trk><trkseg>
            <trkpt lat="1.0" lon="2.0"></trkpt>
            <trkpt lat="1.1" lon="2.1"/>
        </trkseg></trk></gpx>"#;

        let points = parse_gpx(gpx).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.ele.is_none()));
        assert!(points.iter().all(|p| p.elevation() == 0.0));
    }

    #[test]
    fn test_unparsable_elevation_defaults_to_zero() {
        let gpx = r#"<gpx><trk><trkseg>
            <trkpt lat="1.0" lon="2.0"><ele>high</ele></trkpt>
            <trkpt lat="1.1" lon="2.1"><ele></ele></trkpt>
            <trkpt lat="1.2" lon="2.2"><ele>NaN</ele></trkpt>
            <trkpt lat="1.3" lon="2.3"><ele> 12.5 </ele></trkpt>
        </trkseg></trk></gpx>"#;

        let points = parse_gpx(gpx).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].ele, None);
        assert_eq!(points[1].ele, None);
        assert_eq!(points[2].ele, None);
        assert_eq!(points[3].ele, Some(12.5));
    }

    #[test]
    fn test_first_elevation_wins() {
        let gpx = r#"<gpx><trkpt lat="1" lon="2">
            <ele>100</ele>
            <extensions><ele>999</ele></extensions>
        </trkpt></gpx>"#;

        let points = parse_gpx(gpx).unwrap();
        assert_eq!(points[0].ele, Some(100.0));
    }

    #[test]
    fn test_namespaced_track_points() {
        let gpx = r#"<g:gpx xmlns:g="http://www.topografix.com/GPX/1/1">
            <g:trk><g:trkseg>
                <g:trkpt lat="10.5" lon="-20.25"><g:ele>42</g:ele></g:trkpt>
            </g:trkseg></g:trk>
        </g:gpx>"#;

        let points = parse_gpx(gpx).unwrap();
        assert_eq!(points, vec![Trackpoint::new(10.5, -20.25, Some(42.0))]);
    }

    #[test]
    fn test_waypoints_and_route_points_are_not_track_points() {
        let gpx = r#"<gpx>
            <wpt lat="1" lon="1"><ele>5</ele></wpt>
            <rte><rtept lat="2" lon="2"/></rte>
            <trk><trkseg><trkpt lat="3" lon="3"/></trkseg></trk>
        </gpx>"#;

        let points = parse_gpx(gpx).unwrap();
        assert_eq!(points, vec![Trackpoint::new(3.0, 3.0, None)]);
    }

    #[test]
    fn test_track_points_across_segments_and_tracks() {
        let gpx = r#"<gpx>
            <trk><trkseg><trkpt lat="1" lon="1"/></trkseg>
                 <trkseg><trkpt lat="2" lon="2"/></trkseg></trk>
            <trk><trkseg><trkpt lat="3" lon="3"/></trkseg></trk>
        </gpx>"#;

        let lats: Vec<f64> = parse_gpx(gpx).unwrap().iter().map(|p| p.lat).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_no_track_points_is_empty_route() {
        let gpx = r#"<?xml version="1.0"?><gpx version="1.1"><trk><trkseg/></trk></gpx>"#;
        assert!(matches!(parse_gpx(gpx), Err(RouteError::EmptyRoute)));
    }

    #[test]
    fn test_malformed_xml() {
        let cases = [
            "",
            "this is not xml",
            r#"<gpx><trk><trkpt lat="1" lon="2"></trk></gpx>"#,
            r#"<gpx><trk><trkseg><trkpt lat="1" lon="2"/>"#,
            r#"<gpx/><gpx/>"#,
            r#"<gpx><trkpt lat="1" lon="2"></gpx>"#,
            r#"<gpx version=1.1><trkpt lat="1" lon="2"/></gpx>"#,
            r#"<gpx a="1" a="2"><trkpt lat="1" lon="2"/></gpx>"#,
            r#"<gpx><trk><name>A & B</name><trkpt lat="1" lon="2"/></trk></gpx>"#,
            r#"<gpx><trk><name>&bogus;</name><trkpt lat="1" lon="2"/></trk></gpx>"#,
            r#"<gpx><trk><trkseg><trkpt lat="1" lon="2" lon="3"/></trkseg></trk></gpx>"#,
            r#"<gpx creator="A &bogus; B"><trkpt lat="1" lon="2"/></gpx>"#,
        ];

        for case in cases {
            let result = parse_gpx(case);
            assert!(
                matches!(result, Err(RouteError::XmlParse(_))),
                "expected XmlParse for {case:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_missing_or_invalid_coordinates_reject_document() {
        let missing_lat = r#"<gpx><trkpt lat="1" lon="1"/><trkpt lon="2"/></gpx>"#;
        assert!(matches!(
            parse_gpx(missing_lat),
            Err(RouteError::InvalidTrackpoint {
                index: 1,
                attribute: "lat"
            })
        ));

        let bad_lon = r#"<gpx><trkpt lat="1" lon="east"/></gpx>"#;
        assert!(matches!(
            parse_gpx(bad_lon),
            Err(RouteError::InvalidTrackpoint {
                index: 0,
                attribute: "lon"
            })
        ));

        let out_of_range = r#"<gpx><trkpt lat="91" lon="0"/></gpx>"#;
        assert!(matches!(
            parse_gpx(out_of_range),
            Err(RouteError::InvalidTrackpoint { attribute: "lat", .. })
        ));

        let nan = r#"<gpx><trkpt lat="0" lon="NaN"/></gpx>"#;
        assert!(matches!(
            parse_gpx(nan),
            Err(RouteError::InvalidTrackpoint { attribute: "lon", .. })
        ));
    }

    #[test]
    fn test_escaped_text_and_attributes_are_accepted() {
        let gpx = r#"<gpx creator="Tom &amp; Jerry" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
            <trk><name>Día 1 &amp; 2 &lt;Boyacá&gt; &#x41;</name>
                <trkseg><trkpt lat="1" lon="2"><ele>1&#53;00</ele></trkpt></trkseg>
            </trk>
        </gpx>"#;

        let points = parse_gpx(gpx).unwrap();
        assert_eq!(points, vec![Trackpoint::new(1.0, 2.0, Some(1500.0))]);
    }

    #[test]
    fn test_byte_order_mark_is_accepted() {
        let gpx = "\u{feff}<gpx><trkpt lat=\"1\" lon=\"2\"/></gpx>";
        assert_eq!(parse_gpx(gpx).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_xml_error() {
        let bytes = b"<gpx><trkpt lat=\"1\" lon=\"2\"/>\xff</gpx>";
        assert!(matches!(
            parse_gpx_bytes(bytes),
            Err(RouteError::XmlParse(_))
        ));
    }
}
