//! Submission source reading: turns a raw byte stream — from a local file, a fetched
//! URL response, or a datamule tar member — into the decoded text
//! [`crate::sgml::FilingSGML::from_text`] expects, or dispatches straight to the
//! datamule reader for `.tar` sources.
//!
//! `parse_source` is the library's unified entry point for local sources (a filesystem
//! path or a tar path): a `.tar` path is handed to the datamule reader, everything else
//! is read as a (possibly gzip- or zstd-wrapped) submission text file. The URL case is
//! served by [`crate::Edgar::get_filing_sgml`], which owns the HTTP client; it shares
//! [`decode_submission_bytes`] with this module so both paths apply the same encoding
//! and wrapper-detection rules.

use std::fs;
use std::path::Path;

use crate::error::{EdgarError, Result};
use crate::sgml::assembler::FilingSGML;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Strips an optional gzip or zstd wrapper (detected by magic bytes) from a raw
/// submission byte stream, then decodes it as UTF-8, falling back to a lossless
/// byte-for-byte Latin-1 decode when the bytes aren't valid UTF-8.
pub fn decode_submission_bytes(bytes: &[u8]) -> Result<String> {
    let unwrapped = unwrap_bytes(bytes)?;
    Ok(match String::from_utf8(unwrapped) {
        Ok(s) => s,
        Err(e) => e.into_bytes().into_iter().map(|b| b as char).collect(),
    })
}

fn unwrap_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC {
        use std::io::Read;
        let mut decoder = flate2::read::GzDecoder::new(bytes);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).map_err(EdgarError::FileError)?;
        return Ok(out);
    }
    if bytes.len() >= 4 && bytes[0..4] == ZSTD_MAGIC {
        #[cfg(feature = "datamule")]
        {
            return zstd::stream::decode_all(bytes)
                .map_err(|e| EdgarError::InvalidSgml(format!("zstd decode failed: {e}")));
        }
        #[cfg(not(feature = "datamule"))]
        {
            return Ok(bytes.to_vec());
        }
    }
    Ok(bytes.to_vec())
}

/// Parses a submission from a local filesystem source: a `.tar` datamule archive (see
/// [`crate::sgml::load_filing_from_tar`]), or a plain, optionally gzip/zstd-wrapped,
/// submission text file.
pub fn parse_source(path: impl AsRef<Path>) -> Result<FilingSGML> {
    let path = path.as_ref();

    #[cfg(feature = "datamule")]
    if path.extension().and_then(|e| e.to_str()) == Some("tar") {
        return crate::sgml::datamule::load_filing_from_tar(path, None);
    }

    let bytes = fs::read(path).map_err(EdgarError::FileError)?;
    let text = decode_submission_bytes(&bytes)?;
    FilingSGML::from_text(&text)
}
