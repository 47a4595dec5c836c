//! Source file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Extensions treated as delimited tables (case-insensitive).
pub const TABLE_EXTENSIONS: &[&str] = &["csv", "tsv"];

/// Lists delimited table files in a directory, non-recursively.
///
/// Returns files sorted by filename.
pub fn list_table_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_table = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                TABLE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });

        if is_table {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Table name for a file: the stem, trimmed and lower-cased.
pub fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|v| v.to_str())
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_table_files() {
        let dir = TempDir::new().unwrap();
        for name in [
            "shopify_orders.csv",
            "Recipes.CSV",
            "ingredients.tsv",
            "consolidated_inspection_report.txt",
            "notes.md",
        ] {
            std::fs::write(dir.path().join(name), "a,b\n1,2\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("archive.csv")).unwrap();

        let files = list_table_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| table_name(p)).collect();
        assert_eq!(names, vec!["recipes", "ingredients", "shopify_orders"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_table_files(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }
}
