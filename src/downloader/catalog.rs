// Catalog resolver
//
// Every (format id, source record) pair is resolved against the static
// knowledge base and upserted into the catalog. Each resolution starts again
// from the static baseline: when both the fragment list and the manifest
// describe the same id, the manifest (resolved last) fully determines the
// entry and the fragment's contribution is discarded. Keep it that way; see
// `test_later_source_replaces_entry_without_merging`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::formats::FormatDescriptor;
use super::fragments::RawFragment;
use super::manifest::ManifestRepresentation;
use super::utils::parse_or_zero;

/// A format ready for selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFormat {
    pub format_id: u32,
    pub ext: String,
    pub width: u32,
    pub height: u32,
    pub acodec: String,
    pub vcodec: String,
    pub format_note: String,
    pub preference: i32,
    pub container: String,
    pub fps: u32,
    pub abr: u32,
    pub asr: u32,
    pub resolution: String,
    pub url: String,
    pub filesize: u64,
    pub tbr: u64,
}

impl From<FormatDescriptor> for ResolvedFormat {
    fn from(d: FormatDescriptor) -> Self {
        Self {
            format_id: d.id,
            ext: d.ext.to_string(),
            width: d.width,
            height: d.height,
            acodec: d.acodec.to_string(),
            vcodec: d.vcodec.to_string(),
            format_note: d.note.to_string(),
            preference: d.preference,
            container: d.container.to_string(),
            fps: d.fps,
            abr: d.abr,
            asr: d.asr,
            ..Self::default()
        }
    }
}

/// Fields a source explicitly provides. Zero, empty and `None` leave the baseline untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub url: String,
    pub tbr: u64,
    pub filesize: u64,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub asr: u32,
    pub format_note: String,
    /// Literal "WIDTHxHEIGHT" used verbatim as the resolution
    pub resolution: Option<String>,
}

impl From<&RawFragment> for Overlay {
    fn from(f: &RawFragment) -> Self {
        let (width, height) = f.size.as_ref().map_or((0, 0), |s| (s.width, s.height));
        Self {
            url: f.url.clone(),
            tbr: f.bitrate,
            filesize: f.content_length,
            fps: f.fps,
            width,
            height,
            asr: 0,
            format_note: f.quality.clone().unwrap_or_default(),
            resolution: f.size.as_ref().map(|s| s.literal.clone()),
        }
    }
}

impl From<&ManifestRepresentation> for Overlay {
    fn from(r: &ManifestRepresentation) -> Self {
        Self {
            url: r.base_url.clone(),
            tbr: r.bandwidth,
            filesize: r.content_length,
            fps: r.frame_rate,
            width: r.width,
            height: r.height,
            asr: r.audio_sampling_rate,
            format_note: String::new(),
            resolution: None,
        }
    }
}

/// Resolve one source record against the static baseline for `format_id`
pub fn resolve_format(format_id: &str, overlay: &Overlay) -> ResolvedFormat {
    let mut format = ResolvedFormat::from(FormatDescriptor::lookup(format_id));
    format.format_id = parse_or_zero(Some(format_id));

    overlay_string(&mut format.url, &overlay.url);
    overlay_string(&mut format.format_note, &overlay.format_note);
    overlay_number(&mut format.tbr, overlay.tbr);
    overlay_number(&mut format.filesize, overlay.filesize);
    overlay_number(&mut format.fps, overlay.fps);
    overlay_number(&mut format.width, overlay.width);
    overlay_number(&mut format.height, overlay.height);
    overlay_number(&mut format.asr, overlay.asr);

    format.resolution = match &overlay.resolution {
        Some(literal) if !literal.is_empty() => literal.clone(),
        _ if format.width != 0 && format.height != 0 => {
            format!("{}x{}", format.width, format.height)
        }
        _ => String::new(),
    };

    format
}

fn overlay_string(field: &mut String, value: &str) {
    if !value.is_empty() {
        *field = value.to_string();
    }
}

fn overlay_number<T: Copy + Default + PartialEq>(field: &mut T, value: T) {
    if value != T::default() {
        *field = value;
    }
}

/// Resolved formats keyed by format id
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FormatCatalog {
    entries: HashMap<String, ResolvedFormat>,
}

impl FormatCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve and insert, replacing whatever was stored under `format_id`
    pub fn upsert(&mut self, format_id: &str, overlay: &Overlay) -> &ResolvedFormat {
        let resolved = resolve_format(format_id, overlay);
        if self.entries.insert(format_id.to_string(), resolved).is_some() {
            tracing::debug!("[Catalog] Replacing format {}", format_id);
        }
        &self.entries[format_id]
    }

    /// Resolution pass over the encoded-fragment parser output
    pub fn resolve_fragments<'a, I>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = &'a (String, RawFragment)>,
    {
        for (format_id, fragment) in fragments {
            self.upsert(format_id, &Overlay::from(fragment));
        }
    }

    /// Resolution pass over the manifest parser output
    pub fn resolve_manifest<'a, I>(&mut self, representations: I)
    where
        I: IntoIterator<Item = &'a ManifestRepresentation>,
    {
        for rep in representations {
            self.upsert(&rep.format_id.to_string(), &Overlay::from(rep));
        }
    }

    pub fn get(&self, format_id: &str) -> Option<&ResolvedFormat> {
        self.entries.get(format_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by numeric format id
    pub fn sorted(&self) -> Vec<&ResolvedFormat> {
        let mut formats: Vec<(u32, &ResolvedFormat)> = self
            .entries
            .iter()
            .map(|(id, f)| (parse_or_zero(Some(id.as_str())), f))
            .collect();
        formats.sort_by_key(|(id, _)| *id);
        formats.into_iter().map(|(_, f)| f).collect()
    }
}
