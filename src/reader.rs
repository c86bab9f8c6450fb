//! Line reader: loads the sales file, decodes it and yields raw data rows.
//!
//! The whole file is read into memory. Decoding tries each candidate encoding
//! in order and keeps the first one that succeeds; rows are then split with a
//! `|`-delimited CSV reader, the header row is dropped and blank rows are
//! skipped. Each surviving row is handed on as its fields rejoined with `|`.

use crate::error::{Result, SalesError};
use csv::ReaderBuilder;
use log::{debug, error};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

/// Field delimiter of the sales file.
pub const DELIMITER: u8 = b'|';

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text encodings the reader knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8; a leading byte-order mark is dropped.
    Utf8,
    /// ISO-8859-1. Every byte maps to one char, so this never fails.
    Latin1,
    /// Windows code page 1252.
    Windows1252,
}

/// Encodings tried when the caller does not name any.
pub const DEFAULT_ENCODINGS: [TextEncoding; 3] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
];

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Windows1252 => "cp1252",
        }
    }

    /// Decodes `bytes`, or returns `None` if they are not valid in this
    /// encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_owned)
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Windows1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = SalesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            "cp1252" | "windows-1252" => Ok(TextEncoding::Windows1252),
            _ => Err(SalesError::UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decodes with the first encoding in `encodings` that accepts the bytes.
pub fn decode(bytes: &[u8], encodings: &[TextEncoding]) -> Option<(TextEncoding, String)> {
    encodings
        .iter()
        .find_map(|enc| enc.decode(bytes).map(|text| (*enc, text)))
}

/// Reads the sales file at `path` and returns its data rows.
///
/// # Errors
///
/// - [`SalesError::FileNotFound`] if `path` does not exist
/// - [`SalesError::Decode`] if no encoding in `encodings` can decode it
/// - [`SalesError::Io`] for any other read failure
pub fn read_lines(path: impl AsRef<Path>, encodings: &[TextEncoding]) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SalesError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => SalesError::Io(e),
    })?;

    let (encoding, text) = decode(&bytes, encodings).ok_or_else(|| SalesError::Decode {
        path: path.to_path_buf(),
        tried: encodings
            .iter()
            .map(TextEncoding::name)
            .collect::<Vec<_>>()
            .join(", "),
    })?;
    debug!("Decoded {} as {}", path.display(), encoding);

    split_rows(&text)
}

/// Like [`read_lines`], but logs the error and returns no rows instead of
/// failing, so that a run can carry on with an empty dataset.
pub fn read_lines_or_empty(path: impl AsRef<Path>, encodings: &[TextEncoding]) -> Vec<String> {
    match read_lines(path, encodings) {
        Ok(lines) => lines,
        Err(e) => {
            error!("{}", e);
            Vec::new()
        }
    }
}

/// Splits decoded file contents into data rows.
///
/// The first row is the header and is dropped. Empty or whitespace-only
/// rows are skipped; a row with delimiters but blank fields is kept for the
/// parser to judge.
pub fn split_rows(text: &str) -> Result<Vec<String>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut lines = Vec::new();
    for result in rdr.records().skip(1) {
        let record = result?;
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        lines.push(record.iter().collect::<Vec<_>>().join("|"));
    }

    Ok(lines)
}
