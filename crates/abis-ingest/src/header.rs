//! Header and format normalization.

use std::path::Path;

/// Trim, drop byte-order marks and collapse inner whitespace runs to one space.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    let mut normalized = String::with_capacity(trimmed.len());
    for (idx, part) in trimmed.split_whitespace().enumerate() {
        if idx > 0 {
            normalized.push(' ');
        }
        normalized.push_str(part);
    }
    normalized
}

/// Lower-cased file extension, or an empty string when there is none.
pub fn format_from_path(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Field delimiter for a tabular format, `None` for formats that are not tabular.
pub fn delimiter_for(format: &str) -> Option<u8> {
    match format {
        "csv" => Some(b','),
        "tsv" => Some(b'\t'),
        _ => None,
    }
}
