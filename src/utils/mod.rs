//! Utilities (source loading, unicode helpers).

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Result};

pub mod unicode;

/// Program shown in the editor when no file is given.
pub const SAMPLE_PROGRAM: &str =
    "arr = [1,1,2,2,3]\narr = list(set(arr))\nfor i in range(len(arr)):\n    arr[i] += 1\nprint(arr)";

/// Read a source file once. The scratchpad never writes it back.
pub fn read_source(file_path: &str) -> Result<String> {
    let path = Path::new(file_path);

    if !path.exists() {
        bail!("Source file '{}' does not exist", file_path);
    }
    if !path.is_file() {
        bail!("'{}' is not a file", file_path);
    }

    fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", file_path, e))
}

/// Read all of stdin as source text.
pub fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
