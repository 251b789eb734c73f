//! GPX output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, SearchReport};

/// GPX formatter - outputs landmarks as a GPX waypoint file
pub struct GpxFormatter;

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, report: &SearchReport) -> Result<String> {
        let mut gpx = String::new();

        // XML header
        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="geomarks">"#);
        gpx.push('\n');

        // Metadata
        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!(
            "    <name>geomarks search ({:.5}, {:.5})</name>\n",
            report.request.center.lat, report.request.center.lon
        ));
        gpx.push_str(&format!(
            "    <time>{}</time>\n",
            chrono::Utc::now().to_rfc3339()
        ));
        gpx.push_str("  </metadata>\n");

        // Center waypoint
        gpx.push_str(&format!(
            r#"  <wpt lat="{}" lon="{}">"#,
            report.request.center.lat, report.request.center.lon
        ));
        gpx.push('\n');
        gpx.push_str("    <name>Center</name>\n");
        gpx.push_str(&format!(
            "    <desc>Search center, radius: {}m</desc>\n",
            report.request.radius
        ));
        gpx.push_str("  </wpt>\n");

        // Landmark waypoints
        for landmark in &report.landmarks {
            gpx.push_str(&format!(
                r#"  <wpt lat="{}" lon="{}">"#,
                landmark.lat, landmark.lon
            ));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", xml_escape(&landmark.title)));

            if let Some(dist) = landmark.dist {
                gpx.push_str(&format!("    <desc>{:.0}m from center</desc>\n", dist));
            }

            gpx.push_str("  </wpt>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}

/// Escape the XML-significant characters in text content
fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::sample_report;

    #[test]
    fn test_gpx_format() {
        let output = GpxFormatter.format(&sample_report()).unwrap();

        assert!(output.contains(r#"<?xml version="1.0""#));
        assert!(output.contains(r#"<gpx version="1.1""#));
        assert!(output.contains("<name>Center</name>"));
        assert!(output.contains("<name>Statue of Liberty</name>"));
        assert!(output.contains("322m from center"));
        assert!(output.contains("</gpx>"));
    }

    #[test]
    fn test_gpx_escapes_titles() {
        let mut report = sample_report();
        report.landmarks[0].title = "Santa & Cole <HQ>".to_string();

        let output = GpxFormatter.format(&report).unwrap();
        assert!(output.contains("Santa &amp; Cole &lt;HQ&gt;"));
    }

    #[test]
    fn test_gpx_formatter_info() {
        assert_eq!(GpxFormatter.name(), "gpx");
        assert!(!GpxFormatter.description().is_empty());
    }
}
