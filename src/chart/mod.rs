//! Chart file loading.

pub mod koreography;

pub use koreography::{load_koreography, parse_koreography};

use crate::models::Chart;
use std::path::Path;

/// Extensions `load_chart` understands.
pub const CHART_EXTENSIONS: &[&str] = &["json"];

/// Whether `path` looks like a chart file.
pub fn is_chart_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CHART_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Loads a chart, picking the format from the file extension.
pub fn load_chart(path: &Path) -> Result<Chart, String> {
    if !is_chart_file(path) {
        return Err(format!("Unsupported chart format: {:?}", path));
    }
    load_koreography(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_extensions() {
        assert!(is_chart_file(Path::new("charts/song.json")));
        assert!(is_chart_file(Path::new("charts/SONG.JSON")));
        assert!(!is_chart_file(Path::new("charts/song.osu")));
        assert!(!is_chart_file(Path::new("charts/readme")));
    }

    #[test]
    fn test_unsupported_format() {
        assert!(load_chart(Path::new("song.osu")).is_err());
    }
}
