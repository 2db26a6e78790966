// Static knowledge base of known format ids
//
// Baseline technical attributes for every format id the site is known to serve.
// Values coming from the live metadata or the DASH manifest are overlaid on top
// of these in the catalog resolver.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Baseline attributes of a known format id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub id: u32,
    pub ext: &'static str,
    pub container: &'static str,
    pub vcodec: &'static str,
    pub acodec: &'static str,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Audio bitrate class in kbps
    pub abr: u32,
    /// Audio sample rate in Hz
    pub asr: u32,
    /// Negative values mark less desirable variants (3D, HLS)
    pub preference: i32,
    pub note: &'static str,
}

impl FormatDescriptor {
    /// Zero-valued descriptor used for unknown ids
    pub const EMPTY: FormatDescriptor = FormatDescriptor {
        id: 0,
        ext: "",
        container: "",
        vcodec: "",
        acodec: "",
        width: 0,
        height: 0,
        fps: 0,
        abr: 0,
        asr: 0,
        preference: 0,
        note: "",
    };

    /// Baseline for `format_id`, or the empty descriptor when the id is unknown
    pub fn lookup(format_id: &str) -> FormatDescriptor {
        BY_ID.get(format_id).copied().unwrap_or(Self::EMPTY)
    }
}

const E: FormatDescriptor = FormatDescriptor::EMPTY;

pub static KNOWN_FORMATS: &[FormatDescriptor] = &[
    FormatDescriptor { id: 5, ext: "flv", width: 400, height: 240, acodec: "mp3", abr: 64, vcodec: "h263", ..E },
    FormatDescriptor { id: 6, ext: "flv", width: 450, height: 270, acodec: "mp3", abr: 64, vcodec: "h263", ..E },
    FormatDescriptor { id: 13, ext: "3gp", acodec: "aac", vcodec: "mp4v", ..E },
    FormatDescriptor { id: 17, ext: "3gp", width: 176, height: 144, acodec: "aac", abr: 24, vcodec: "mp4v", ..E },
    FormatDescriptor { id: 18, ext: "mp4", width: 640, height: 360, acodec: "aac", abr: 96, vcodec: "h264", ..E },
    FormatDescriptor { id: 22, ext: "mp4", width: 1280, height: 720, acodec: "aac", abr: 192, vcodec: "h264", ..E },
    FormatDescriptor { id: 34, ext: "flv", width: 640, height: 360, acodec: "aac", abr: 128, vcodec: "h264", ..E },
    FormatDescriptor { id: 35, ext: "flv", width: 854, height: 480, acodec: "aac", abr: 128, vcodec: "h264", ..E },
    // 36 is either 320x180 or 320x240 and its abr varies as well
    FormatDescriptor { id: 36, ext: "3gp", width: 320, acodec: "aac", vcodec: "mp4v", ..E },
    FormatDescriptor { id: 37, ext: "mp4", width: 1920, height: 1080, acodec: "aac", abr: 192, vcodec: "h264", ..E },
    FormatDescriptor { id: 38, ext: "mp4", width: 4096, height: 3072, acodec: "aac", abr: 192, vcodec: "h264", ..E },
    FormatDescriptor { id: 43, ext: "webm", width: 640, height: 360, acodec: "vorbis", abr: 128, vcodec: "vp8", ..E },
    FormatDescriptor { id: 44, ext: "webm", width: 854, height: 480, acodec: "vorbis", abr: 128, vcodec: "vp8", ..E },
    FormatDescriptor { id: 45, ext: "webm", width: 1280, height: 720, acodec: "vorbis", abr: 192, vcodec: "vp8", ..E },
    FormatDescriptor { id: 46, ext: "webm", width: 1920, height: 1080, acodec: "vorbis", abr: 192, vcodec: "vp8", ..E },
    FormatDescriptor { id: 59, ext: "mp4", width: 854, height: 480, acodec: "aac", abr: 128, vcodec: "h264", ..E },
    FormatDescriptor { id: 78, ext: "mp4", width: 854, height: 480, acodec: "aac", abr: 128, vcodec: "h264", ..E },

    // 3D
    FormatDescriptor { id: 82, ext: "mp4", height: 360, note: "3D", acodec: "aac", abr: 128, vcodec: "h264", preference: -20, ..E },
    FormatDescriptor { id: 83, ext: "mp4", height: 480, note: "3D", acodec: "aac", abr: 128, vcodec: "h264", preference: -20, ..E },
    FormatDescriptor { id: 84, ext: "mp4", height: 720, note: "3D", acodec: "aac", abr: 192, vcodec: "h264", preference: -20, ..E },
    FormatDescriptor { id: 85, ext: "mp4", height: 1080, note: "3D", acodec: "aac", abr: 192, vcodec: "h264", preference: -20, ..E },
    FormatDescriptor { id: 100, ext: "webm", height: 360, note: "3D", acodec: "vorbis", abr: 128, vcodec: "vp8", preference: -20, ..E },
    FormatDescriptor { id: 101, ext: "webm", height: 480, note: "3D", acodec: "vorbis", abr: 192, vcodec: "vp8", preference: -20, ..E },
    FormatDescriptor { id: 102, ext: "webm", height: 720, note: "3D", acodec: "vorbis", abr: 192, vcodec: "vp8", preference: -20, ..E },

    // Apple HTTP Live Streaming
    FormatDescriptor { id: 91, ext: "mp4", height: 144, note: "HLS", acodec: "aac", abr: 48, vcodec: "h264", preference: -10, ..E },
    FormatDescriptor { id: 92, ext: "mp4", height: 240, note: "HLS", acodec: "aac", abr: 48, vcodec: "h264", preference: -10, ..E },
    FormatDescriptor { id: 93, ext: "mp4", height: 360, note: "HLS", acodec: "aac", abr: 128, vcodec: "h264", preference: -10, ..E },
    FormatDescriptor { id: 94, ext: "mp4", height: 480, note: "HLS", acodec: "aac", abr: 128, vcodec: "h264", preference: -10, ..E },
    FormatDescriptor { id: 95, ext: "mp4", height: 720, note: "HLS", acodec: "aac", abr: 256, vcodec: "h264", preference: -10, ..E },
    FormatDescriptor { id: 96, ext: "mp4", height: 1080, note: "HLS", acodec: "aac", abr: 256, vcodec: "h264", preference: -10, ..E },
    FormatDescriptor { id: 132, ext: "mp4", height: 240, note: "HLS", acodec: "aac", abr: 48, vcodec: "h264", preference: -10, ..E },
    FormatDescriptor { id: 151, ext: "mp4", height: 72, note: "HLS", acodec: "aac", abr: 24, vcodec: "h264", preference: -10, ..E },

    // DASH mp4 video
    FormatDescriptor { id: 133, ext: "mp4", height: 240, note: "DASH video", vcodec: "h264", ..E },
    FormatDescriptor { id: 134, ext: "mp4", height: 360, note: "DASH video", vcodec: "h264", ..E },
    FormatDescriptor { id: 135, ext: "mp4", height: 480, note: "DASH video", vcodec: "h264", ..E },
    FormatDescriptor { id: 136, ext: "mp4", height: 720, note: "DASH video", vcodec: "h264", ..E },
    FormatDescriptor { id: 137, ext: "mp4", height: 1080, note: "DASH video", vcodec: "h264", ..E },
    // height varies
    FormatDescriptor { id: 138, ext: "mp4", note: "DASH video", vcodec: "h264", ..E },
    FormatDescriptor { id: 160, ext: "mp4", height: 144, note: "DASH video", vcodec: "h264", ..E },
    FormatDescriptor { id: 212, ext: "mp4", height: 480, note: "DASH video", vcodec: "h264", ..E },
    FormatDescriptor { id: 264, ext: "mp4", height: 1440, note: "DASH video", vcodec: "h264", ..E },
    FormatDescriptor { id: 298, ext: "mp4", height: 720, note: "DASH video", vcodec: "h264", fps: 60, ..E },
    FormatDescriptor { id: 299, ext: "mp4", height: 1080, note: "DASH video", vcodec: "h264", fps: 60, ..E },
    FormatDescriptor { id: 266, ext: "mp4", height: 2160, note: "DASH video", vcodec: "h264", ..E },

    // DASH mp4 audio
    FormatDescriptor { id: 139, ext: "m4a", note: "DASH audio", acodec: "aac", abr: 48, container: "m4a_dash", ..E },
    FormatDescriptor { id: 140, ext: "m4a", note: "DASH audio", acodec: "aac", abr: 128, container: "m4a_dash", ..E },
    FormatDescriptor { id: 141, ext: "m4a", note: "DASH audio", acodec: "aac", abr: 256, container: "m4a_dash", ..E },
    FormatDescriptor { id: 256, ext: "m4a", note: "DASH audio", acodec: "aac", container: "m4a_dash", ..E },
    FormatDescriptor { id: 258, ext: "m4a", note: "DASH audio", acodec: "aac", container: "m4a_dash", ..E },
    FormatDescriptor { id: 325, ext: "m4a", note: "DASH audio", acodec: "dtse", container: "m4a_dash", ..E },
    FormatDescriptor { id: 328, ext: "m4a", note: "DASH audio", acodec: "ec-3", container: "m4a_dash", ..E },

    // DASH webm
    FormatDescriptor { id: 167, ext: "webm", height: 360, width: 640, note: "DASH video", container: "webm", vcodec: "vp8", ..E },
    FormatDescriptor { id: 168, ext: "webm", height: 480, width: 854, note: "DASH video", container: "webm", vcodec: "vp8", ..E },
    FormatDescriptor { id: 169, ext: "webm", height: 720, width: 1280, note: "DASH video", container: "webm", vcodec: "vp8", ..E },
    FormatDescriptor { id: 170, ext: "webm", height: 1080, width: 1920, note: "DASH video", container: "webm", vcodec: "vp8", ..E },
    FormatDescriptor { id: 218, ext: "webm", height: 480, width: 854, note: "DASH video", container: "webm", vcodec: "vp8", ..E },
    FormatDescriptor { id: 219, ext: "webm", height: 480, width: 854, note: "DASH video", container: "webm", vcodec: "vp8", ..E },
    FormatDescriptor { id: 278, ext: "webm", height: 144, note: "DASH video", container: "webm", vcodec: "vp9", ..E },
    FormatDescriptor { id: 242, ext: "webm", height: 240, note: "DASH video", vcodec: "vp9", ..E },
    FormatDescriptor { id: 243, ext: "webm", height: 360, note: "DASH video", vcodec: "vp9", ..E },
    FormatDescriptor { id: 244, ext: "webm", height: 480, note: "DASH video", vcodec: "vp9", ..E },
    FormatDescriptor { id: 245, ext: "webm", height: 480, note: "DASH video", vcodec: "vp9", ..E },
    FormatDescriptor { id: 246, ext: "webm", height: 480, note: "DASH video", vcodec: "vp9", ..E },
    FormatDescriptor { id: 247, ext: "webm", height: 720, note: "DASH video", vcodec: "vp9", ..E },
    FormatDescriptor { id: 248, ext: "webm", height: 1080, note: "DASH video", vcodec: "vp9", ..E },
    FormatDescriptor { id: 271, ext: "webm", height: 1440, note: "DASH video", vcodec: "vp9", ..E },
    // 272 is either 3840x2160 or 7680x4320
    FormatDescriptor { id: 272, ext: "webm", height: 2160, note: "DASH video", vcodec: "vp9", ..E },
    FormatDescriptor { id: 302, ext: "webm", height: 720, note: "DASH video", vcodec: "vp9", fps: 60, ..E },
    FormatDescriptor { id: 303, ext: "webm", height: 1080, note: "DASH video", vcodec: "vp9", fps: 60, ..E },
    FormatDescriptor { id: 308, ext: "webm", height: 1440, note: "DASH video", vcodec: "vp9", fps: 60, ..E },
    FormatDescriptor { id: 313, ext: "webm", height: 2160, note: "DASH video", vcodec: "vp9", ..E },
    FormatDescriptor { id: 315, ext: "webm", height: 2160, note: "DASH video", vcodec: "vp9", fps: 60, ..E },

    // DASH webm audio
    FormatDescriptor { id: 171, ext: "webm", acodec: "vorbis", note: "DASH audio", abr: 128, ..E },
    FormatDescriptor { id: 172, ext: "webm", acodec: "vorbis", note: "DASH audio", abr: 256, ..E },

    // DASH webm audio with opus inside
    FormatDescriptor { id: 249, ext: "webm", note: "DASH audio", acodec: "opus", abr: 50, ..E },
    FormatDescriptor { id: 250, ext: "webm", note: "DASH audio", acodec: "opus", abr: 70, ..E },
    FormatDescriptor { id: 251, ext: "webm", note: "DASH audio", acodec: "opus", abr: 160, ..E },
];

lazy_static! {
    static ref BY_ID: HashMap<String, FormatDescriptor> = KNOWN_FORMATS
        .iter()
        .map(|f| (f.id.to_string(), *f))
        .collect();
}
