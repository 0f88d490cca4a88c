//! A single embedded `<DOCUMENT>` block within an SGML submission.

use crate::error::{EdgarError, Result};

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// One embedded document inside an EDGAR submission.
///
/// `raw_content` is the full `<DOCUMENT>...</DOCUMENT>` buffer (header fields like
/// `TYPE`/`SEQUENCE` plus the `<TEXT>...</TEXT>` body), or just the file's own bytes for
/// documents built directly from structured metadata (e.g. datamule tar members) rather
/// than parsed SGML. Decoding — isolating the `<TEXT>` body, uu-decode, zstd
/// decompression — happens lazily through [`SgmlDocument::content`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SgmlDocument {
    pub sequence: String,
    pub doc_type: String,
    pub filename: String,
    pub description: String,
    pub raw_content: String,
}

impl SgmlDocument {
    pub fn new(
        sequence: impl Into<String>,
        doc_type: impl Into<String>,
        filename: impl Into<String>,
        description: impl Into<String>,
        raw_content: impl Into<String>,
    ) -> Self {
        Self {
            sequence: sequence.into(),
            doc_type: doc_type.into(),
            filename: filename.into(),
            description: description.into(),
            raw_content: raw_content.into(),
        }
    }

    /// Decoded payload of this document.
    ///
    /// Starts from the innermost `<TEXT>...</TEXT>` block when one is present (a real
    /// `<DOCUMENT>` body is wrapped in `TEXT` alongside its `TYPE`/`SEQUENCE`/`FILENAME`/
    /// `DESCRIPTION` header fields), or the raw content as a whole otherwise (datamule
    /// tar members, which carry no SGML wrapper at all). If that body begins with a
    /// uu-encoding header (`begin NNN filename`), it is uu-decoded first. If the
    /// resulting (or original, when not uu-encoded) bytes begin with the zstd magic
    /// number, they are decompressed. Otherwise the body is returned unchanged.
    pub fn content(&self) -> Result<Vec<u8>> {
        let body = extract_between_tags(&self.raw_content, "TEXT").unwrap_or(&self.raw_content);
        let trimmed = body.trim_start();
        let decoded = if trimmed.starts_with("begin ") {
            decode_uu(trimmed)?
        } else {
            body.as_bytes().to_vec()
        };

        if decoded.len() >= 4 && decoded[0..4] == ZSTD_MAGIC {
            #[cfg(feature = "datamule")]
            {
                return zstd::stream::decode_all(&decoded[..])
                    .map_err(|e| EdgarError::InvalidSgml(format!("zstd decode failed: {e}")));
            }
            #[cfg(not(feature = "datamule"))]
            {
                return Ok(decoded);
            }
        }

        Ok(decoded)
    }

    /// Decoded payload as a lossy UTF-8 string, for text/XML/HTML documents.
    pub fn content_text(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.content()?).into_owned())
    }

    /// Content of the innermost `<TEXT>...</TEXT>` block, case-insensitive.
    pub fn text(&self) -> Result<String> {
        extract_between_tags(&self.raw_content, "TEXT")
            .map(|s| s.to_string())
            .ok_or_else(|| EdgarError::InvalidSgml("no <TEXT> block found".into()))
    }

    /// Content between the outer tag matching the document's apparent payload kind,
    /// preferring, innermost-first: PDF, XBRL, XML, TEXT.
    fn get_content_between_known_tags(&self) -> Option<&str> {
        for tag in ["PDF", "XBRL", "XML", "TEXT"] {
            if let Some(body) = extract_between_tags(&self.raw_content, tag) {
                return Some(body);
            }
        }
        None
    }

    pub fn xml(&self) -> Option<String> {
        extract_between_tags(&self.raw_content, "XML").map(str::to_string)
    }

    pub fn html(&self) -> Option<String> {
        extract_between_tags(&self.raw_content, "HTML").map(str::to_string)
    }

    pub fn xbrl(&self) -> Option<String> {
        extract_between_tags(&self.raw_content, "XBRL").map(str::to_string)
    }

    /// Best-guess content type for this document, based on its extracted markers and
    /// filename extension.
    pub fn get_content_type(&self) -> &'static str {
        if self.get_content_between_known_tags().is_some() {
            if extract_between_tags(&self.raw_content, "PDF").is_some() {
                return "pdf";
            }
            if extract_between_tags(&self.raw_content, "XBRL").is_some() {
                return "xbrl";
            }
            if extract_between_tags(&self.raw_content, "XML").is_some() {
                return "xml";
            }
            return "text";
        }
        if is_xml_filename(&self.filename) {
            "xml"
        } else {
            "text"
        }
    }
}

/// Returns `true` for filenames the Filing Assembler treats as data files rather than
/// human-facing documents (`.xml`, `.xsd`, `.xbrl`).
pub fn is_xml_filename(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    lower.ends_with(".xml") || lower.ends_with(".xsd") || lower.ends_with(".xbrl")
}

/// Extracts the content between `<TAG>` and `</TAG>`, case-insensitively, returning the
/// first match. Used for the standard EDGAR content markers (TEXT, XML, XBRL, HTML, PDF).
fn extract_between_tags<'a>(content: &'a str, tag: &str) -> Option<&'a str> {
    let open_lower = format!("<{}>", tag.to_lowercase());
    let close_lower = format!("</{}>", tag.to_lowercase());
    let content_lower = content.to_lowercase();

    let start = content_lower.find(&open_lower)? + open_lower.len();
    let end = content_lower[start..].find(&close_lower)? + start;
    Some(&content[start..end])
}

/// Decodes a legacy uu-encoded block.
///
/// The `begin NNN filename` header line is skipped. Each remaining line's first character
/// gives the count of decoded bytes it carries (`(c - 0x20) & 0x3F`); the rest of the line
/// is split into 4-character groups, each group's six-bit values (`(c - 0x20) & 0x3F`)
/// packed into 3 bytes, then truncated to the declared count. Decoding stops at a
/// zero-length line (conventionally a single backtick) or a line starting with `end`.
fn decode_uu(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for line in text.lines().skip(1) {
        let bytes = line.as_bytes();
        let Some(&len_char) = bytes.first() else {
            continue;
        };
        if line.starts_with("end") {
            break;
        }
        let declared_len = ((len_char.wrapping_sub(b' ')) & 0x3F) as usize;
        if declared_len == 0 {
            break;
        }

        let mut decoded_line = Vec::with_capacity(declared_len + 2);
        for group in bytes[1..].chunks(4) {
            let mut six_bit = [0u8; 4];
            for (slot, &c) in six_bit.iter_mut().zip(group) {
                *slot = c.wrapping_sub(b' ') & 0x3F;
            }
            decoded_line.push((six_bit[0] << 2) | (six_bit[1] >> 4));
            decoded_line.push((six_bit[1] << 4) | (six_bit[2] >> 2));
            decoded_line.push((six_bit[2] << 6) | six_bit[3]);
        }
        decoded_line.truncate(declared_len);
        out.extend_from_slice(&decoded_line);
    }
    Ok(out)
}
