// Catalog presentation: aligned table or JSON array, both ordered by numeric format id

use super::catalog::{FormatCatalog, ResolvedFormat};
use super::errors::DownloadError;
use super::utils::format_size;

const HEADERS: [&str; 8] = [
    "Format",
    "Extension",
    "Video",
    "Audio",
    "Resolution",
    "Size",
    "Note",
    "All",
];

const COLUMN_GAP: &str = "  ";

fn row(format: &ResolvedFormat) -> Vec<String> {
    let mut extras = Vec::new();
    if format.fps > 0 {
        extras.push(format!("@{}fps", format.fps));
    }

    vec![
        format.format_id.to_string(),
        format.ext.clone(),
        format.vcodec.clone(),
        format.acodec.clone(),
        format.resolution.clone(),
        format_size(format.filesize),
        format.format_note.clone(),
        extras.join(" "),
    ]
}

/// Render the catalog as left-aligned columns, header first
pub fn render_table(catalog: &FormatCatalog) -> String {
    let mut rows: Vec<Vec<String>> = vec![HEADERS.iter().map(|h| h.to_string()).collect()];
    rows.extend(catalog.sorted().into_iter().map(row));

    let mut widths = [0usize; HEADERS.len()];
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|cells| {
            let line = cells
                .iter()
                .zip(widths.iter())
                .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP);
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the catalog as a JSON array
pub fn render_json(catalog: &FormatCatalog, pretty: bool) -> Result<String, DownloadError> {
    let formats = catalog.sorted();
    let rendered = if pretty {
        serde_json::to_string_pretty(&formats)
    } else {
        serde_json::to_string(&formats)
    };
    rendered.map_err(|e| DownloadError::ParseError(format!("json: {}", e)))
}
