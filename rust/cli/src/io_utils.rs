//! File helpers shared by commands that read audit logs.
//!
//! `read_text_auto` decompresses `.zst` (Zstandard) files based on the
//! extension, so archived shoe logs can be verified without unpacking them.

use crate::error::CliError;

/// Upper bound for a decompressed audit log.
const MAX_DECOMPRESSED: usize = 64 * 1024 * 1024;

/// Read text file with automatic .zst decompression detection.
///
/// UTF-8 BOM (Byte Order Mark) is stripped if present.
///
/// # Example
///
/// ```rust,no_run
/// # use fairdeal_cli::io_utils::read_text_auto;
///
/// let plain = read_text_auto("shoes.jsonl").unwrap();
/// let archived = read_text_auto("shoes.jsonl.zst").unwrap();
/// ```
pub fn read_text_auto(path: &str) -> Result<String, CliError> {
    let mut content = if path.ends_with(".zst") {
        let comp = std::fs::read(path)?;
        let dec = zstd::bulk::decompress(&comp, MAX_DECOMPRESSED)
            .map_err(|e| CliError::InvalidInput(format!("{}: {}", path, e)))?;
        String::from_utf8(dec).map_err(|e| CliError::InvalidInput(format!("{}: {}", path, e)))?
    } else {
        std::fs::read_to_string(path)?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

/// Strip UTF-8 BOM (Byte Order Mark) from the beginning of a string if present.
fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}
