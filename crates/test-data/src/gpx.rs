//! GPX file generation from track points.

use itinerary::models::Trackpoint;

/// Generates a GPX 1.1 XML document from track points.
///
/// The output has one track with one segment. Points carry `<ele>` only
/// when they have an elevation. Coordinates are written with full `f64`
/// precision so that parsing the output yields the same points.
pub fn generate_gpx(points: &[Trackpoint], route_name: &str) -> Vec<u8> {
    let mut gpx = String::new();

    gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    gpx.push('\n');
    gpx.push_str(r#"<gpx version="1.1" creator="itinerary-test-data""#);
    gpx.push_str(r#" xmlns="http://www.topografix.com/GPX/1/1""#);
    gpx.push_str(r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#);
    gpx.push_str(r#" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#);
    gpx.push('\n');

    gpx.push_str("  <metadata>\n");
    gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(route_name)));
    gpx.push_str("  </metadata>\n");

    gpx.push_str("  <trk>\n");
    gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(route_name)));
    gpx.push_str("    <trkseg>\n");

    for point in points {
        gpx.push_str(&format!(
            r#"      <trkpt lat="{}" lon="{}">"#,
            point.lat, point.lon
        ));
        gpx.push('\n');

        if let Some(ele) = point.ele {
            gpx.push_str(&format!("        <ele>{}</ele>\n", ele));
        }

        gpx.push_str("      </trkpt>\n");
    }

    gpx.push_str("    </trkseg>\n");
    gpx.push_str("  </trk>\n");
    gpx.push_str("</gpx>\n");

    gpx.into_bytes()
}

/// Escapes XML special characters in a string.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_gpx_basic() {
        let points = vec![
            Trackpoint::new(6.215, -73.5, Some(1650.0)),
            Trackpoint::new(6.216, -73.4995, Some(1660.5)),
        ];

        let gpx = generate_gpx(&points, "Etapa 1");
        let gpx_str = String::from_utf8(gpx).unwrap();

        assert!(gpx_str.contains(r#"version="1.1""#));
        assert!(gpx_str.contains("<name>Etapa 1</name>"));
        assert!(gpx_str.contains(r#"lat="6.215""#));
        assert!(gpx_str.contains(r#"lon="-73.4995""#));
        assert!(gpx_str.contains("<ele>1650</ele>"));
        assert!(gpx_str.contains("<ele>1660.5</ele>"));
    }

    #[test]
    fn test_generate_gpx_escapes_special_chars() {
        let points = vec![Trackpoint::new(6.0, -73.0, None)];

        let gpx = generate_gpx(&points, "Día 1 & <Bosques> \"Pandora\"");
        let gpx_str = String::from_utf8(gpx).unwrap();

        assert!(gpx_str.contains("Día 1 &amp; &lt;Bosques&gt; &quot;Pandora&quot;"));
    }

    #[test]
    fn test_generate_gpx_without_elevation() {
        let points = vec![Trackpoint::new(6.0, -73.0, None)];

        let gpx_str = String::from_utf8(generate_gpx(&points, "Descanso")).unwrap();

        assert!(!gpx_str.contains("<ele>"));
        assert!(gpx_str.contains(r#"lat="6""#));
    }
}
