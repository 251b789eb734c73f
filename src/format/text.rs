//! Human-readable text output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, SearchReport};

/// Text formatter - outputs a human-readable listing
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &SearchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "Landmarks near ({:.6}, {:.6}), radius {}m\n",
            report.request.center.lat, report.request.center.lon, report.request.radius
        ));

        if report.landmarks.is_empty() {
            output.push_str("\nNo landmarks found.\n");
            return Ok(output);
        }

        output.push_str(&format!("\n{} result(s):\n", report.landmarks.len()));
        for landmark in &report.landmarks {
            let distance = match landmark.dist {
                Some(d) => format!(" [{:.0}m]", d),
                None => String::new(),
            };
            output.push_str(&format!(
                "  {} ({:.5}, {:.5}){}  #{}\n",
                landmark.title, landmark.lat, landmark.lon, distance, landmark.pageid
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::sample_report;

    #[test]
    fn test_text_format() {
        let output = TextFormatter.format(&sample_report()).unwrap();

        assert!(output.contains("Landmarks near"));
        assert!(output.contains("radius 5000m"));
        assert!(output.contains("Statue of Liberty"));
        assert!(output.contains("[322m]"));
        assert!(output.contains("#20426"));
    }

    #[test]
    fn test_text_format_empty() {
        let mut report = sample_report();
        report.landmarks.clear();

        let output = TextFormatter.format(&report).unwrap();
        assert!(output.contains("No landmarks found"));
    }

    #[test]
    fn test_text_formatter_info() {
        assert_eq!(TextFormatter.name(), "text");
        assert!(!TextFormatter.description().is_empty());
    }
}
