//! Format detection and the two SGML submission dialect parsers.

use std::collections::BTreeMap;

use crate::error::{EdgarError, Result};
use crate::sgml::document::SgmlDocument;

/// The two on-the-wire SGML submission dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgmlFormat {
    /// Modern EDGAR submissions: root `<SUBMISSION>` element with structured role tags.
    Submission,
    /// Legacy filings: `<SEC-HEADER>`/`<IMS-HEADER>` plus `<SEC-DOCUMENT>`/`<IMS-DOCUMENT>`/
    /// bare `<DOCUMENT>` markers.
    SecDocument,
}

/// A value in the SUBMISSION dialect's parsed header tree: a scalar, a repeated-tag
/// list, or a nested section.
#[derive(Debug, Clone, PartialEq)]
pub enum SValue {
    Str(String),
    List(Vec<SValue>),
    Dict(SDict),
}

impl SValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&SDict> {
        match self {
            SValue::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SValue]> {
        match self {
            SValue::List(items) => Some(items),
            SValue::Dict(_) => None,
            SValue::Str(_) => None,
        }
    }

    /// Normalizes a scalar-or-list value to a slice of dicts, treating a bare dict as a
    /// one-element list. Used when reading repeatable sections that may have collapsed to
    /// a single occurrence.
    pub fn as_dict_list(&self) -> Vec<&SDict> {
        match self {
            SValue::Dict(d) => vec![d],
            SValue::List(items) => items.iter().filter_map(SValue::as_dict).collect(),
            SValue::Str(_) => Vec::new(),
        }
    }
}

/// An ordered key-value map, preserving insertion order the way the source dialect's
/// dict-of-lines construction does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SDict {
    entries: Vec<(String, SValue)>,
}

impl SDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, SValue)> {
        self.entries.iter()
    }

    /// Inserts a scalar value under `key`. If `key` is already present, the existing
    /// value is promoted to a list (or appended to, if already a list).
    pub(crate) fn insert_scalar(&mut self, key: &str, value: String) {
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| k == key) {
            match &mut existing.1 {
                SValue::List(items) => items.push(SValue::Str(value)),
                other => {
                    let prior = other.clone();
                    *other = SValue::List(vec![prior, SValue::Str(value)]);
                }
            }
        } else {
            self.entries.push((key.to_string(), SValue::Str(value)));
        }
    }

    /// Inserts a completed section. Repeatable tags always end up as a list even for a
    /// single occurrence; other section tags store the dict directly (a second
    /// occurrence promotes to a list defensively).
    pub(crate) fn insert_section(&mut self, key: &str, value: SDict, repeatable: bool) {
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| k == key) {
            match &mut existing.1 {
                SValue::List(items) => items.push(SValue::Dict(value)),
                other => {
                    let prior = other.clone();
                    *other = SValue::List(vec![prior, SValue::Dict(value)]);
                }
            }
        } else if repeatable {
            self.entries
                .push((key.to_string(), SValue::List(vec![SValue::Dict(value)])));
        } else {
            self.entries.push((key.to_string(), SValue::Dict(value)));
        }
    }
}

/// Closed set of SUBMISSION-dialect section tags.
const SECTION_TAGS: &[&str] = &[
    "FILER",
    "REPORTING-OWNER",
    "ISSUER",
    "COMPANY-DATA",
    "OWNER-DATA",
    "FILING-VALUES",
    "BUSINESS-ADDRESS",
    "MAIL-ADDRESS",
    "FORMER-COMPANY",
    "SUBJECT-COMPANY",
    "CLASS-CONTRACT",
    "SERIES",
    "NEW-SERIES",
    "ACQUIRING-DATA",
    "TARGET-DATA",
    "MERGER",
    "DEPOSITOR",
    "SECURITIZER",
    "UNDERWRITER",
    "RULE",
    "ITEM",
    "SERIES-AND-CLASSES-CONTRACTS-DATA",
    "SERIES-AND-CLASSES-CONTRACTS",
    "CLASS-CONTRACT-CONTACT",
    "NEW-CLASS-CONTRACT",
];

/// Tags that are always stored as a list even when only one occurrence is present.
const REPEATABLE_TAGS: &[&str] = &[
    "FILER",
    "REPORTING-OWNER",
    "SERIES",
    "CLASS-CONTRACT",
    "FORMER-COMPANY",
    "SUBJECT-COMPANY",
    "UNDERWRITER",
    "ITEM",
];

fn is_section_tag(tag: &str) -> bool {
    SECTION_TAGS.contains(&tag)
}

fn is_repeatable(tag: &str) -> bool {
    REPEATABLE_TAGS.contains(&tag)
}

/// Output of parsing an SGML submission: the dialect, its documents in source order, and
/// the header in whichever shape that dialect produces.
pub struct ParsedSubmission {
    pub format: SgmlFormat,
    pub documents: Vec<SgmlDocument>,
    pub header: ParsedHeader,
}

pub enum ParsedHeader {
    /// SUBMISSION dialect: the structured tree the stack parser built.
    Submission(SDict),
    /// SEC-DOCUMENT dialect: the raw tab-indented header text block, parsed separately
    /// by [`crate::sgml::header`].
    Raw(String),
}

/// Detects the submission dialect, or fails with `UnknownFormat`.
pub fn detect_format(content: &str) -> Result<SgmlFormat> {
    if content.trim_start().starts_with("<SUBMISSION>") {
        return Ok(SgmlFormat::Submission);
    }
    if content.contains("<SEC-DOCUMENT>") || content.contains("<IMS-DOCUMENT>") {
        return Ok(SgmlFormat::SecDocument);
    }
    let head: String = content.chars().take(1000).collect();
    if head.contains("<DOCUMENT>") {
        return Ok(SgmlFormat::SecDocument);
    }
    Err(EdgarError::UnknownFormat)
}

/// Runs the pre-parse defensive checks for transport-layer payloads masquerading as
/// SGML: SEC's automated-tool rejection page, an S3 `NoSuchKey` error, or generic
/// HTML/XML returned where SGML was expected.
pub fn check_defensive_errors(content: &str) -> Result<()> {
    let lower = content.to_lowercase();

    if lower.contains("automated tool") && lower.contains("sec") {
        return Err(EdgarError::SECIdentityError(
            "SEC rejected this request as coming from an unidentified automated tool. \
             Set EDGAR_IDENTITY via set_identity(\"Your Name your.email@example.com\") \
             before making requests to sec.gov"
                .to_string(),
        ));
    }

    if lower.contains("<code>nosuchkey</code>") || lower.contains("nosuchkey") {
        return Err(EdgarError::SECFilingNotFoundError(
            "The requested filing does not exist at this location (S3 NoSuchKey)".to_string(),
        ));
    }

    let trimmed = lower.trim_start();
    if (trimmed.starts_with("<html") || trimmed.starts_with("<!doctype html"))
        && !content.contains("<SUBMISSION>")
        && !content.contains("<SEC-DOCUMENT>")
        && !content.contains("<IMS-DOCUMENT>")
    {
        return Err(EdgarError::SECHTMLResponseError(
            "Received an HTML page where an SGML submission was expected".to_string(),
        ));
    }

    Ok(())
}

/// Parses a full SGML submission text into documents plus a dialect-appropriate header.
pub fn parse_submission(content: &str) -> Result<ParsedSubmission> {
    check_defensive_errors(content)?;
    let format = detect_format(content)?;
    match format {
        SgmlFormat::Submission => parse_submission_dialect(content),
        SgmlFormat::SecDocument => parse_sec_document_dialect(content),
    }
}

fn parse_submission_dialect(content: &str) -> Result<ParsedSubmission> {
    // Stack of (tag, repeatable, dict-under-construction). The root frame is
    // seeded as the `<SUBMISSION>` section itself, since that's the opening
    // tag the eventual `</SUBMISSION>` must match.
    let mut stack: Vec<(String, bool, SDict)> = vec![("SUBMISSION".to_string(), false, SDict::new())];
    let mut documents = Vec::new();
    let mut in_document = false;
    let mut doc_buffer = String::new();
    let mut root: Option<SDict> = None;

    for raw_line in content.lines() {
        let line = raw_line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if in_document {
            if line.trim() == "</DOCUMENT>" {
                documents.push(parse_document_block(&doc_buffer)?);
                doc_buffer.clear();
                in_document = false;
            } else {
                doc_buffer.push_str(line);
                doc_buffer.push('\n');
            }
            continue;
        }

        if line.trim() == "<DOCUMENT>" {
            in_document = true;
            continue;
        }

        let trimmed = line.trim();
        if let Some(tag_and_rest) = trimmed.strip_prefix('<') {
            if let Some(stripped) = tag_and_rest.strip_prefix('/') {
                // Section end: </TAG>
                let Some(end_idx) = stripped.find('>') else {
                    continue;
                };
                let tag = &stripped[..end_idx];
                let Some((top_tag, repeatable, dict)) = stack.pop() else {
                    return Err(EdgarError::MismatchedTag(format!(
                        "unexpected closing tag </{tag}> with empty stack"
                    )));
                };
                if top_tag != tag {
                    return Err(EdgarError::MismatchedTag(format!(
                        "expected </{top_tag}> but found </{tag}>"
                    )));
                }
                if stack.is_empty() {
                    // This was the closing </SUBMISSION> for the root frame.
                    root = Some(dict);
                } else {
                    let parent_mut = &mut stack.last_mut().expect("parent frame present").2;
                    parent_mut.insert_section(&top_tag, dict, repeatable);
                }
                continue;
            }

            let Some(close) = tag_and_rest.find('>') else {
                continue;
            };
            let tag = &tag_and_rest[..close];
            let rest = &tag_and_rest[close + 1..];

            if tag == "SUBMISSION" && rest.is_empty() {
                // Root frame is already seeded for this; nothing to push.
                continue;
            }

            if rest.is_empty() {
                if is_section_tag(tag) {
                    stack.push((tag.to_string(), is_repeatable(tag), SDict::new()));
                } else {
                    let current = &mut stack.last_mut().expect("root frame present").2;
                    current.insert_scalar(tag, String::new());
                }
            } else {
                let current = &mut stack.last_mut().expect("root frame present").2;
                current.insert_scalar(tag, rest.trim().to_string());
            }
        }
    }

    let root = root.ok_or_else(|| {
        EdgarError::InvalidSgml("missing closing </SUBMISSION> tag".to_string())
    })?;

    Ok(ParsedSubmission {
        format: SgmlFormat::Submission,
        documents,
        header: ParsedHeader::Submission(root),
    })
}

fn parse_sec_document_dialect(content: &str) -> Result<ParsedSubmission> {
    let mut header_text = String::new();
    let mut in_header = false;
    let mut in_document = false;
    let mut doc_buffer = String::new();
    let mut documents = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line;
        let trimmed = line.trim();

        if in_document {
            if trimmed == "</DOCUMENT>" {
                documents.push(parse_document_block(&doc_buffer)?);
                doc_buffer.clear();
                in_document = false;
            } else {
                doc_buffer.push_str(line);
                doc_buffer.push('\n');
            }
            continue;
        }

        if trimmed == "<SEC-HEADER>" || trimmed == "<IMS-HEADER>" {
            in_header = true;
            continue;
        }
        if trimmed == "</SEC-HEADER>" || trimmed == "</IMS-HEADER>" {
            in_header = false;
            continue;
        }
        if trimmed == "<DOCUMENT>" {
            in_document = true;
            continue;
        }

        if in_header {
            header_text.push_str(line);
            header_text.push('\n');
        }
    }

    if documents.is_empty() && header_text.trim().is_empty() {
        return Err(EdgarError::InvalidSgml(
            "no header or documents found in SEC-DOCUMENT submission".to_string(),
        ));
    }

    Ok(ParsedSubmission {
        format: SgmlFormat::SecDocument,
        documents,
        header: ParsedHeader::Raw(header_text),
    })
}

/// Extracts `TYPE`/`SEQUENCE`/`FILENAME`/`DESCRIPTION` and the body from a buffered
/// `<DOCUMENT>...</DOCUMENT>` block (tags already stripped), shared by both dialects.
fn parse_document_block(buffer: &str) -> Result<SgmlDocument> {
    let mut fields: BTreeMap<&str, String> = BTreeMap::new();
    for tag in ["TYPE", "SEQUENCE", "FILENAME", "DESCRIPTION"] {
        let marker = format!("<{tag}>");
        if let Some(start) = buffer.find(&marker) {
            let value_start = start + marker.len();
            let value_end = buffer[value_start..]
                .find('\n')
                .map(|i| value_start + i)
                .unwrap_or(buffer.len());
            fields.insert(tag, buffer[value_start..value_end].trim().to_string());
        }
    }

    Ok(SgmlDocument::new(
        fields.get("SEQUENCE").cloned().unwrap_or_default(),
        fields.get("TYPE").cloned().unwrap_or_default(),
        fields.get("FILENAME").cloned().unwrap_or_default(),
        fields.get("DESCRIPTION").cloned().unwrap_or_default(),
        buffer.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_submission_dialect() {
        let content = "<SUBMISSION>\n<FILER>\n</FILER>\n</SUBMISSION>";
        assert_eq!(detect_format(content).unwrap(), SgmlFormat::Submission);
    }

    #[test]
    fn detects_sec_document_dialect() {
        let content = "<SEC-DOCUMENT>0000000000-00-000000.txt : 20240101\n<SEC-HEADER>\n</SEC-HEADER>";
        assert_eq!(detect_format(content).unwrap(), SgmlFormat::SecDocument);
    }

    #[test]
    fn unknown_format_errors() {
        let content = "just some plain text with no markers";
        assert!(matches!(
            detect_format(content),
            Err(EdgarError::UnknownFormat)
        ));
    }

    #[test]
    fn identity_rejection_message_contains_required_tokens() {
        let content = "<html>SEC has detected you are using an automated tool to access sec.gov</html>";
        let err = check_defensive_errors(content).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("EDGAR_IDENTITY"));
        assert!(msg.contains("set_identity"));
        assert!(msg.contains("sec.gov"));
        assert!(msg.contains('@'));
    }

    #[test]
    fn parses_documents_in_source_order() {
        let content = "<SUBMISSION>\n\
<DOCUMENT>\n<TYPE>10-K\n<SEQUENCE>1\n<FILENAME>a.htm\n<DESCRIPTION>Annual Report\n<TEXT>\nhello\n</TEXT>\n</DOCUMENT>\n\
<DOCUMENT>\n<TYPE>EX-101.SCH\n<SEQUENCE>2\n<FILENAME>b.xsd\n<DESCRIPTION>\n<TEXT>\n<schema/>\n</TEXT>\n</DOCUMENT>\n\
</SUBMISSION>";
        let parsed = parse_submission_dialect(content).unwrap();
        assert_eq!(parsed.documents.len(), 2);
        assert_eq!(parsed.documents[0].sequence, "1");
        assert_eq!(parsed.documents[1].filename, "b.xsd");
    }

    #[test]
    fn repeatable_tags_promote_to_list_even_for_one() {
        let content = "<SUBMISSION>\n<FILER>\n<COMPANY-DATA>\n<CONFORMED-NAME>Acme Corp\n</COMPANY-DATA>\n</FILER>\n</SUBMISSION>";
        let parsed = parse_submission_dialect(content).unwrap();
        let ParsedHeader::Submission(root) = parsed.header else {
            panic!("expected submission header");
        };
        let filer = root.get("FILER").expect("FILER present");
        assert!(matches!(filer, SValue::List(_)));
        assert_eq!(filer.as_dict_list().len(), 1);
    }

    #[test]
    fn mismatched_closing_tag_errors() {
        let content = "<SUBMISSION>\n<FILER>\n</ISSUER>\n</SUBMISSION>";
        assert!(matches!(
            parse_submission_dialect(content),
            Err(EdgarError::MismatchedTag(_))
        ));
    }
}
