//! Time-stamped calls to action shown over interview videos

use serde::{Deserialize, Serialize};

/// A call to action visible between `start` and `end` seconds of a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateCta {
    pub label: String,
    pub href: String,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
}

impl AffiliateCta {
    /// Whether the CTA shows at `time` seconds; negative starts count as 0,
    /// a missing end as never ending.
    pub fn is_active(&self, time: f64) -> bool {
        let start = self.start.unwrap_or(0.0).max(0.0);
        let end = self.end.unwrap_or(f64::INFINITY);
        time >= start && time <= end
    }
}

/// CTAs visible at `time`, in input order
pub fn active_ctas(ctas: &[AffiliateCta], time: f64) -> Vec<&AffiliateCta> {
    ctas.iter().filter(|c| c.is_active(time)).collect()
}

/// Parse the `t` start offset; anything unusable becomes 0
pub fn parse_start_offset(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}

/// Video source with a media fragment when starting past 0
pub fn video_src(video: &str, start: u64) -> String {
    if start > 0 {
        format!("{}#t={}", video, start)
    } else {
        video.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cta(label: &str, start: Option<f64>, end: Option<f64>) -> AffiliateCta {
        AffiliateCta {
            label: label.to_string(),
            href: format!("https://example.com/{}", label),
            start,
            end,
        }
    }

    #[test]
    fn test_active_window() {
        let ctas = vec![
            cta("always", None, None),
            cta("early", Some(-5.0), Some(10.0)),
            cta("late", Some(30.0), None),
            cta("middle", Some(10.0), Some(20.0)),
        ];
        let labels = |t: f64| -> Vec<&str> {
            active_ctas(&ctas, t).iter().map(|c| c.label.as_str()).collect()
        };
        assert_eq!(labels(0.0), vec!["always", "early"]);
        assert_eq!(labels(10.0), vec!["always", "early", "middle"]);
        assert_eq!(labels(20.5), vec!["always"]);
        assert_eq!(labels(3600.0), vec!["always", "late"]);
    }

    #[test]
    fn test_start_offset() {
        assert_eq!(parse_start_offset(None), 0);
        assert_eq!(parse_start_offset(Some("42")), 42);
        assert_eq!(parse_start_offset(Some("-3")), 0);
        assert_eq!(parse_start_offset(Some("soon")), 0);
        assert_eq!(video_src("/v/a.mp4", 42), "/v/a.mp4#t=42");
        assert_eq!(video_src("/v/a.mp4", 0), "/v/a.mp4");
    }
}
