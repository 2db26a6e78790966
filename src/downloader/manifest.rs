// DASH manifest parser
//
// Walks MPD -> Period -> AdaptationSet -> Representation and yields one
// `ManifestRepresentation` per retrievable representation.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use super::errors::DownloadError;
use super::traits::PageFetcher;
use super::utils::parse_or_zero;

/// One adaptive variant announced by the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestRepresentation {
    pub format_id: u32,
    pub codecs: String,
    pub audio_sampling_rate: u32,
    pub bandwidth: u64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub base_url: String,
    pub content_length: u64,
}

/// Replace an encrypted `/s/<token>` path segment with `/signature/<token>`.
///
/// Only the first occurrence is rewritten; URLs without the segment pass through.
pub fn rewrite_signature(manifest_url: &str) -> String {
    lazy_static::lazy_static! {
        static ref SIGNATURE_RE: Regex = Regex::new(r"/s/([a-fA-F0-9.]+)").unwrap();
    }

    SIGNATURE_RE
        .replace(manifest_url, "/signature/$1")
        .into_owned()
}

/// Rewrite, fetch and parse the manifest behind `manifest_url`
pub async fn fetch_manifest(
    fetcher: &dyn PageFetcher,
    manifest_url: &str,
) -> Result<Vec<ManifestRepresentation>, DownloadError> {
    let url = rewrite_signature(manifest_url);
    tracing::debug!("[Manifest] Fetching {}", url);

    let body = fetcher.fetch_page(&url).await?;
    let representations = parse_manifest(&body)?;

    tracing::info!("[Manifest] {} usable representations", representations.len());
    Ok(representations)
}

/// Parse MPD XML into representations, dropping those without a base URL
pub fn parse_manifest(xml: &str) -> Result<Vec<ManifestRepresentation>, DownloadError> {
    let mut reader = Reader::from_str(xml);

    // Local names of the currently open elements
    let mut path: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut current: Option<ManifestRepresentation> = None;
    let mut representations = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = local_name(e)?;
                seen_root = true;
                if name == "Representation" && path_matches(&path, &["Period", "AdaptationSet"]) {
                    current = read_representation(e)?;
                } else if name == "BaseURL" && is_representation_child(&path) {
                    // Alternative base URLs: the last one wins
                    if let Some(rep) = current.as_mut() {
                        rep.base_url.clear();
                        rep.content_length = parse_or_zero(attribute(e, "contentLength")?.as_deref());
                    }
                }
                path.push(name);
            }
            // Self-closing elements carry no base URL text, so nothing to collect
            Event::Empty(_) => seen_root = true,
            Event::Text(ref t) => {
                if in_base_url(&path) {
                    if let Some(rep) = current.as_mut() {
                        rep.base_url.push_str(&t.unescape()?);
                    }
                }
            }
            Event::CData(ref t) => {
                if in_base_url(&path) {
                    if let Some(rep) = current.as_mut() {
                        let text = std::str::from_utf8(t)
                            .map_err(|e| DownloadError::ParseError(format!("manifest: {}", e)))?;
                        rep.base_url.push_str(text);
                    }
                }
            }
            Event::End(_) => {
                let closed = path.pop();
                if closed.as_deref() == Some("Representation")
                    && path_matches(&path, &["Period", "AdaptationSet"])
                {
                    if let Some(mut rep) = current.take() {
                        rep.base_url = rep.base_url.trim().to_string();
                        if rep.base_url.is_empty() {
                            tracing::debug!("[Manifest] Skipping {}: empty BaseURL", rep.format_id);
                        } else {
                            representations.push(rep);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(DownloadError::ParseError("manifest: no root element".to_string()));
    }
    if !path.is_empty() {
        return Err(DownloadError::ParseError(format!(
            "manifest: unexpected end of document inside <{}>",
            path.join("/")
        )));
    }

    Ok(representations)
}

/// `None` when the id is not a non-negative integer; such a representation has no format key
fn read_representation(e: &BytesStart) -> Result<Option<ManifestRepresentation>, DownloadError> {
    let mut rep = ManifestRepresentation::default();
    let mut has_id = false;

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr.unescape_value()?;
        let value = Some(value.as_ref());
        match attr.key.local_name().as_ref() {
            b"id" => {
                has_id = value.is_some_and(|v| v.parse::<u32>().is_ok());
                rep.format_id = parse_or_zero(value);
            }
            b"codecs" => rep.codecs = value.unwrap_or_default().to_string(),
            b"audioSamplingRate" => rep.audio_sampling_rate = parse_or_zero(value),
            b"bandwidth" => rep.bandwidth = parse_or_zero(value),
            b"width" => rep.width = parse_or_zero(value),
            b"height" => rep.height = parse_or_zero(value),
            b"frameRate" => rep.frame_rate = parse_or_zero(value),
            _ => {}
        }
    }

    if !has_id {
        tracing::debug!("[Manifest] Skipping representation without a numeric id");
        return Ok(None);
    }

    Ok(Some(rep))
}

fn attribute(e: &BytesStart, key: &str) -> Result<Option<String>, DownloadError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == key.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn local_name(e: &BytesStart) -> Result<String, DownloadError> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_string)
        .map_err(|err| DownloadError::ParseError(format!("manifest: {}", err)))
}

/// `path` is exactly root followed by `tail`
fn path_matches(path: &[String], tail: &[&str]) -> bool {
    path.len() == tail.len() + 1 && path[1..].iter().zip(tail).all(|(a, b)| a == b)
}

fn is_representation_child(path: &[String]) -> bool {
    path_matches(path, &["Period", "AdaptationSet", "Representation"])
}

fn in_base_url(path: &[String]) -> bool {
    path_matches(path, &["Period", "AdaptationSet", "Representation", "BaseURL"])
}
