//! Contains wrappers for loading the specification text from a file or standard input.

use std::fs::read_to_string;
use std::io::Read;

/// Load the specification text from the given file path, or from standard input when no
/// path is given.
pub fn load_spec_text(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(path) => read_to_string(path).map_err(|e| format!("Cannot read {path}: {e}")),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("Cannot read standard input: {e}"))?;
            Ok(text)
        }
    }
}
