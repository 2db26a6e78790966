// Helper functions shared by the parsers, the orchestrator and the printer

use regex::Regex;
use std::str::FromStr;

use crate::downloader::errors::DownloadError;

/// Best-effort numeric decoding.
///
/// Missing or malformed values resolve to zero; a decode failure is never an error.
/// Both the fragment parser and the manifest parser go through this helper.
pub fn parse_or_zero<T>(value: Option<&str>) -> T
where
    T: FromStr + Default,
{
    value
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or_default()
}

/// Extract the 11-character video id from a watch, embed, short or user URL
pub fn extract_video_id(video_url: &str) -> Result<String, DownloadError> {
    lazy_static::lazy_static! {
        static ref VIDEO_ID_RE: Regex = Regex::new(
            r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/ ]{11})"#
        ).unwrap();
    }

    VIDEO_ID_RE
        .captures(video_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DownloadError::InvalidUrl(video_url.to_string()))
}

/// Format a byte count with SI units ("0 B", "1.0 kB", "83 MB")
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

    if bytes < 10 {
        return format!("{} B", bytes);
    }

    let mut exp = 0;
    let mut scale = 1u64;
    while exp + 1 < UNITS.len() && bytes / scale >= 1000 {
        scale *= 1000;
        exp += 1;
    }

    let value = ((bytes as f64 / scale as f64) * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{:.1} {}", value, UNITS[exp])
    } else {
        format!("{:.0} {}", value, UNITS[exp])
    }
}

/// Turn a video title into a file name that stays inside the output directory
pub fn to_safe_filename(title: &str, fallback: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        fallback.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO_ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_parse_or_zero() {
        assert_eq!(parse_or_zero::<u64>(Some("500000")), 500_000);
        assert_eq!(parse_or_zero::<u64>(Some("12abc")), 0);
        assert_eq!(parse_or_zero::<u64>(Some("")), 0);
        assert_eq!(parse_or_zero::<u64>(Some("-3")), 0);
        assert_eq!(parse_or_zero::<u32>(None), 0);
        assert_eq!(parse_or_zero::<i32>(Some("-3")), -3);
    }

    #[test]
    fn test_extract_video_id() {
        let embed = format!("https://www.youtube.com/embed/{}", VIDEO_ID);
        assert_eq!(extract_video_id(&embed).unwrap(), VIDEO_ID);

        let watch = format!("https://www.youtube.com/watch?v={}", VIDEO_ID);
        assert_eq!(extract_video_id(&watch).unwrap(), VIDEO_ID);

        let short = format!("https://youtu.be/{}", VIDEO_ID);
        assert_eq!(extract_video_id(&short).unwrap(), VIDEO_ID);

        let with_params = format!("https://www.youtube.com/watch?feature=share&v={}&t=42", VIDEO_ID);
        assert_eq!(extract_video_id(&with_params).unwrap(), VIDEO_ID);
    }

    #[test]
    fn test_extract_video_id_rejects_unknown_urls() {
        let err = extract_video_id("https://example.com/video/123").unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl(_)));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(999), "999 B");
        assert_eq!(format_size(1000), "1.0 kB");
        assert_eq!(format_size(1_500_000), "1.5 MB");
        assert_eq!(format_size(82_854_982), "83 MB");
        assert_eq!(format_size(1_000_000_000), "1.0 GB");
    }

    #[test]
    fn test_to_safe_filename() {
        assert_eq!(to_safe_filename("AC/DC - Live", "id"), "AC_DC - Live");
        assert_eq!(to_safe_filename("  ", "dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(to_safe_filename("..", "id"), "id");
        assert_eq!(to_safe_filename("line\nbreak", "id"), "line_break");
    }
}
