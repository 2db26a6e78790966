// Encoded-fragment parser
//
// The video info response carries two comma-separated lists of URL-encoded
// per-format blobs: progressive formats (audio+video in one stream) and
// adaptive formats. Both are decoded here into `RawFragment`s.

use std::collections::HashMap;

use super::models::VideoMetadata;
use super::utils::parse_or_zero;

/// Progressive (muxed) format list
pub const PROGRESSIVE_FIELD: &str = "url_encoded_fmt_stream_map";
/// Adaptive (DASH) format list
pub const ADAPTIVE_FIELD: &str = "adaptive_fmts";

/// Literal `WIDTHxHEIGHT` value from a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
    pub literal: String,
}

impl FrameSize {
    /// Accepts exactly two non-empty `x`-separated parts; each side decodes best-effort
    pub fn parse(literal: &str) -> Option<Self> {
        let (width, height) = literal.split_once('x')?;
        if width.is_empty() || height.is_empty() || height.contains('x') {
            return None;
        }
        Some(Self {
            width: parse_or_zero(Some(width)),
            height: parse_or_zero(Some(height)),
            literal: literal.to_string(),
        })
    }
}

/// Fields extracted from one fragment. Zero and `None` mean "not provided".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFragment {
    pub url: String,
    pub bitrate: u64,
    pub content_length: u64,
    pub fps: u32,
    pub size: Option<FrameSize>,
    pub quality: Option<String>,
}

/// Output of one parser run
#[derive(Debug, Clone, Default)]
pub struct FragmentSet {
    /// (format id, fragment) in encounter order: progressive first, then adaptive
    pub fragments: Vec<(String, RawFragment)>,
    /// Last `view_count` seen on any fragment
    pub view_count: Option<u64>,
}

/// Decode both fragment lists from the video metadata
pub fn parse_fragments(metadata: &VideoMetadata) -> FragmentSet {
    let progressive = metadata.get(PROGRESSIVE_FIELD).unwrap_or("");
    let adaptive = metadata.get(ADAPTIVE_FIELD).unwrap_or("");

    let mut set = FragmentSet::default();

    for blob in progressive.split(',').chain(adaptive.split(',')) {
        let fields = decode_blob(blob);
        let get = |key: &str| field(&fields, key);

        if let Some(views) = get("view_count") {
            set.view_count = Some(parse_or_zero(Some(views)));
        }

        let (format_id, url) = match (get("itag"), get("url")) {
            (Some(id), Some(url)) if !id.is_empty() && !url.is_empty() => (id, url),
            _ => continue,
        };

        let fragment = RawFragment {
            url: url.to_string(),
            bitrate: parse_or_zero(get("bitrate")),
            content_length: parse_or_zero(get("clen")),
            fps: parse_or_zero(get("fps")),
            size: get("size").and_then(FrameSize::parse),
            quality: get("quality_label")
                .filter(|q| !q.is_empty())
                .or_else(|| get("quality").filter(|q| !q.is_empty()))
                .map(str::to_string),
        };

        tracing::debug!("[Fragments] format {} -> {}", format_id, fragment.url);
        set.fragments.push((format_id.to_string(), fragment));
    }

    set
}

fn field<'a>(fields: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    fields.get(key).map(String::as_str)
}

/// First value per key, like a query-string lookup
fn decode_blob(blob: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(blob.as_bytes()) {
        fields.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(progressive: &str, adaptive: &str) -> VideoMetadata {
        vec![
            (PROGRESSIVE_FIELD.to_string(), progressive.to_string()),
            (ADAPTIVE_FIELD.to_string(), adaptive.to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_parse_single_fragment() {
        let meta = metadata("itag=18&url=http://x&bitrate=500000&clen=1000", "");
        let set = parse_fragments(&meta);

        assert_eq!(set.fragments.len(), 1);
        let (id, frag) = &set.fragments[0];
        assert_eq!(id, "18");
        assert_eq!(frag.url, "http://x");
        assert_eq!(frag.bitrate, 500_000);
        assert_eq!(frag.content_length, 1000);
        assert_eq!(frag.fps, 0);
        assert!(frag.size.is_none());
        assert!(frag.quality.is_none());
    }

    #[test]
    fn test_progressive_before_adaptive() {
        let meta = metadata(
            "itag=22&url=http://a,itag=18&url=http://b",
            "itag=137&url=http://c,itag=140&url=http://d",
        );
        let ids: Vec<String> = parse_fragments(&meta)
            .fragments
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["22", "18", "137", "140"]);
    }

    #[test]
    fn test_fragments_without_id_or_url_are_discarded() {
        let meta = metadata("url=http://a,itag=18,itag=&url=http://b,itag=22&url=", "");
        assert!(parse_fragments(&meta).fragments.is_empty());
    }

    #[test]
    fn test_malformed_numbers_resolve_to_zero() {
        let meta = metadata("itag=18&url=http://x&bitrate=fast&clen=12kb&fps=thirty", "");
        let set = parse_fragments(&meta);
        let frag = &set.fragments[0].1;
        assert_eq!(frag.bitrate, 0);
        assert_eq!(frag.content_length, 0);
        assert_eq!(frag.fps, 0);
    }

    #[test]
    fn test_size_literal() {
        let meta = metadata(
            "itag=137&url=http://x&size=1920x1080,itag=136&url=http://y&size=wide",
            "itag=135&url=http://z&size=1280xabc",
        );
        let set = parse_fragments(&meta);

        let size = set.fragments[0].1.size.as_ref().unwrap();
        assert_eq!((size.width, size.height), (1920, 1080));
        assert_eq!(size.literal, "1920x1080");

        assert!(set.fragments[1].1.size.is_none());

        let size = set.fragments[2].1.size.as_ref().unwrap();
        assert_eq!((size.width, size.height), (1280, 0));
        assert_eq!(size.literal, "1280xabc");
    }

    #[test]
    fn test_frame_size_needs_both_sides() {
        assert!(FrameSize::parse("x").is_none());
        assert!(FrameSize::parse("x720").is_none());
        assert!(FrameSize::parse("1280x").is_none());
        assert!(FrameSize::parse("1280x720x3").is_none());
        assert_eq!(FrameSize::parse("640x360").map(|s| (s.width, s.height)), Some((640, 360)));

        let meta = metadata("itag=18&url=http://x&size=x", "");
        assert!(parse_fragments(&meta).fragments[0].1.size.is_none());
    }

    #[test]
    fn test_quality_label_falls_back_to_quality() {
        let meta = metadata(
            "itag=22&url=http://a&quality=hd720,itag=18&url=http://b&quality=medium&quality_label=360p",
            "",
        );
        let set = parse_fragments(&meta);
        assert_eq!(set.fragments[0].1.quality.as_deref(), Some("hd720"));
        assert_eq!(set.fragments[1].1.quality.as_deref(), Some("360p"));
    }

    #[test]
    fn test_view_count_last_value_wins() {
        let meta = metadata(
            "itag=22&url=http://a&view_count=10,itag=18&url=http://b",
            "view_count=25",
        );
        let set = parse_fragments(&meta);
        assert_eq!(set.fragments.len(), 2);
        assert_eq!(set.view_count, Some(25));
    }

    #[test]
    fn test_missing_lists() {
        let set = parse_fragments(&VideoMetadata::default());
        assert!(set.fragments.is_empty());
        assert!(set.view_count.is_none());
    }
}
