//! Reading import text from a file.

use crate::{Error, Result};
use std::path::Path;

/// File extensions accepted for upload
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "txt", "json"];

/// Read an import file's text
///
/// Only `.csv`, `.txt` and `.json` files are accepted (case-insensitive).
pub fn read_import_file(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(Error::Import(format!(
            "unsupported file type {:?}; expected one of .csv, .txt, .json",
            path
        )));
    }

    let text = std::fs::read_to_string(path)?;
    tracing::debug!("Read {} bytes of import text from {:?}", text.len(), path);
    Ok(text)
}
