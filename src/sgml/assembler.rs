//! Composes a parsed SGML submission into a [`FilingSGML`]: documents classified into
//! a primary document, supporting documents, and XML/XSD/XBRL datafiles.

use std::collections::HashMap;

use crate::error::{EdgarError, Result};
use crate::sgml::document::{is_xml_filename, SgmlDocument};
use crate::sgml::filing_summary::FilingSummary;
use crate::sgml::header::FilingHeader;
use crate::sgml::parser::{parse_submission, ParsedSubmission};

/// One attachment entry: a document plus its assembler-assigned role and, if a
/// `FilingSummary.xml` was present, its reported purpose (e.g. "Balance Sheet").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub sequence: String,
    pub filename: String,
    pub doc_type: String,
    pub purpose: Option<String>,
}

/// A fully assembled EDGAR submission: its header plus documents classified by role.
#[derive(Debug, Clone)]
pub struct FilingSGML {
    pub header: FilingHeader,
    pub documents: Vec<SgmlDocument>,
    documents_by_sequence: HashMap<String, usize>,
    documents_by_filename: HashMap<String, usize>,
    /// Index into `documents` of the primary document (sequence "1"), if any.
    pub primary: Option<usize>,
    /// Indices into `documents` of human-facing supporting documents.
    pub attachments: Vec<usize>,
    /// Indices into `documents` of XML/XSD/XBRL datafiles.
    pub datafiles: Vec<usize>,
}

impl FilingSGML {
    /// Parses and assembles a full submission text.
    pub fn from_text(content: &str) -> Result<FilingSGML> {
        let parsed = parse_submission(content)?;
        Self::from_parsed(parsed)
    }

    fn from_parsed(parsed: ParsedSubmission) -> Result<FilingSGML> {
        let header = FilingHeader::from_parsed(&parsed.header)?;
        Ok(Self::from_documents(header, parsed.documents))
    }

    /// Assembles a `FilingSGML` from an already-structured header and document list,
    /// classifying documents the same way a parsed submission would be. Used directly by
    /// non-SGML sources (e.g. the datamule tar reader) that build their own header and
    /// documents from structured metadata instead of SGML text.
    pub fn from_documents(header: FilingHeader, documents: Vec<SgmlDocument>) -> FilingSGML {
        let mut documents_by_sequence = HashMap::new();
        let mut documents_by_filename = HashMap::new();
        for (idx, doc) in documents.iter().enumerate() {
            documents_by_sequence.insert(doc.sequence.clone(), idx);
            if !doc.filename.is_empty() {
                documents_by_filename.insert(doc.filename.clone(), idx);
            }
        }

        let (primary, attachments, datafiles) = classify(&documents);

        let mut filing = FilingSGML {
            header,
            documents,
            documents_by_sequence,
            documents_by_filename,
            primary,
            attachments,
            datafiles,
        };

        filing.apply_filing_summary_purposes();
        filing
    }

    pub fn get_document_by_sequence(&self, sequence: &str) -> Option<&SgmlDocument> {
        self.documents_by_sequence
            .get(sequence)
            .map(|&idx| &self.documents[idx])
    }

    pub fn get_document_by_name(&self, filename: &str) -> Option<&SgmlDocument> {
        self.documents_by_filename
            .get(filename)
            .map(|&idx| &self.documents[idx])
    }

    pub fn get_document_sequences(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.sequence.as_str()).collect()
    }

    pub fn get_all_document_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.documents.iter().map(|d| d.doc_type.as_str()).collect();
        types.sort_unstable();
        types.dedup();
        types
    }

    pub fn get_document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn primary_document(&self) -> Option<&SgmlDocument> {
        self.primary.map(|idx| &self.documents[idx])
    }

    pub fn attachment_documents(&self) -> Vec<&SgmlDocument> {
        self.attachments.iter().map(|&idx| &self.documents[idx]).collect()
    }

    pub fn datafile_documents(&self) -> Vec<&SgmlDocument> {
        self.datafiles.iter().map(|&idx| &self.documents[idx]).collect()
    }

    /// Builds the classified attachment list, layering in `FilingSummary.xml` report
    /// purposes by filename when present among the datafiles/documents.
    pub fn attachment_list(&self) -> Vec<Attachment> {
        let summary = self.find_filing_summary();
        self.documents
            .iter()
            .map(|doc| Attachment {
                sequence: doc.sequence.clone(),
                filename: doc.filename.clone(),
                doc_type: doc.doc_type.clone(),
                purpose: summary
                    .as_ref()
                    .and_then(|s| s.get_reports_by_filename().get(doc.filename.as_str()).copied())
                    .map(str::to_string),
            })
            .collect()
    }

    /// Content of the primary document's outer `<XML>...</XML>` block, if any.
    pub fn xml(&self) -> Option<String> {
        self.primary_document().and_then(|d| d.xml())
    }

    /// Content of the primary document's outer `<HTML>...</HTML>` block, if any.
    pub fn html(&self) -> Option<String> {
        self.primary_document().and_then(|d| d.html())
    }

    /// Writes every document's decoded content to `dest`.
    ///
    /// When `archive` is `false`, `dest` is a directory (created if needed) and one
    /// file per document is written there, named by its filename (falling back to
    /// `<sequence>.txt` when the filename is empty). When `archive` is `true`, `dest`
    /// is the output archive path and every document is written into a single tar
    /// file — the pack's own archive-format dependency, reused here rather than
    /// adding a zip crate to the dependency stack — which requires the `datamule`
    /// feature.
    pub fn download(&self, dest: &std::path::Path, archive: bool) -> Result<()> {
        if archive {
            return self.download_archive(dest);
        }
        std::fs::create_dir_all(dest)?;
        for doc in &self.documents {
            let data = doc.content()?;
            std::fs::write(dest.join(Self::attachment_filename(doc)), data)?;
        }
        Ok(())
    }

    fn attachment_filename(doc: &SgmlDocument) -> String {
        if doc.filename.is_empty() {
            format!("{}.txt", doc.sequence)
        } else {
            doc.filename.clone()
        }
    }

    #[cfg(feature = "datamule")]
    fn download_archive(&self, dest: &std::path::Path) -> Result<()> {
        let file = std::fs::File::create(dest)?;
        let mut builder = tar::Builder::new(file);
        for doc in &self.documents {
            let data = doc.content()?;
            let name = Self::attachment_filename(doc);
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, &name, &data[..])?;
        }
        builder.finish()?;
        Ok(())
    }

    #[cfg(not(feature = "datamule"))]
    fn download_archive(&self, _dest: &std::path::Path) -> Result<()> {
        Err(EdgarError::InvalidSgml("archive download requires the datamule feature".into()))
    }

    fn find_filing_summary(&self) -> Option<FilingSummary> {
        let doc = self.get_document_by_name("FilingSummary.xml")?;
        let xml = doc.xml().or_else(|| doc.content_text().ok())?;
        FilingSummary::from_xml(&xml).ok()
    }

    /// No-op placeholder hook: purposes are resolved lazily via [`Self::attachment_list`]
    /// rather than mutated into stored state, since `FilingSummary.xml` itself is just
    /// another datafile and may not have been classified yet at construction time.
    fn apply_filing_summary_purposes(&mut self) {}
}

/// Classifies documents into (primary, attachments, datafiles).
///
/// The document with sequence `"1"` is always primary. For the rest, classification
/// latches one-way: once the first XML/XSD/XBRL-suffixed non-primary document is seen,
/// every subsequent non-primary document is treated as a datafile too, since EDGAR lists
/// human-facing attachments before the XBRL instance/schema/linkbase block.
fn classify(documents: &[SgmlDocument]) -> (Option<usize>, Vec<usize>, Vec<usize>) {
    let mut primary = None;
    let mut attachments = Vec::new();
    let mut datafiles = Vec::new();
    let mut in_datafile_section = false;

    for (idx, doc) in documents.iter().enumerate() {
        if doc.sequence == "1" {
            primary = Some(idx);
            attachments.push(idx);
            continue;
        }
        if !in_datafile_section && is_xml_filename(&doc.filename) {
            in_datafile_section = true;
        }
        if in_datafile_section {
            datafiles.push(idx);
        } else {
            attachments.push(idx);
        }
    }

    (primary, attachments, datafiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(docs: &str) -> String {
        format!("<SUBMISSION>\n<TYPE>10-K\n<ACCESSION-NUMBER>0000320193-24-000001\n{docs}\n</SUBMISSION>")
    }

    #[test]
    fn classifies_primary_attachments_and_datafiles() {
        let content = submission(
            "<DOCUMENT>\n<TYPE>10-K\n<SEQUENCE>1\n<FILENAME>a.htm\n<DESCRIPTION>Annual Report\n<TEXT>\nbody\n</TEXT>\n</DOCUMENT>\n\
             <DOCUMENT>\n<TYPE>EX-99.1\n<SEQUENCE>2\n<FILENAME>ex99.htm\n<DESCRIPTION>Exhibit\n<TEXT>\nbody\n</TEXT>\n</DOCUMENT>\n\
             <DOCUMENT>\n<TYPE>EX-101.INS\n<SEQUENCE>3\n<FILENAME>a-20240101.xml\n<DESCRIPTION>\n<TEXT>\n<xbrl/>\n</TEXT>\n</DOCUMENT>\n\
             <DOCUMENT>\n<TYPE>EX-101.SCH\n<SEQUENCE>4\n<FILENAME>a-20240101.xsd\n<DESCRIPTION>\n<TEXT>\n<schema/>\n</TEXT>\n</DOCUMENT>",
        );
        let filing = FilingSGML::from_text(&content).unwrap();
        assert_eq!(filing.get_document_count(), 4);
        assert_eq!(filing.primary_document().unwrap().filename, "a.htm");
        assert_eq!(filing.attachment_documents().len(), 2);
        assert_eq!(filing.datafile_documents().len(), 2);
        assert_eq!(filing.get_document_by_sequence("2").unwrap().filename, "ex99.htm");
        assert_eq!(filing.get_document_by_name("a-20240101.xsd").unwrap().sequence, "4");
    }

    #[test]
    fn document_types_are_deduplicated_and_sorted() {
        let content = submission(
            "<DOCUMENT>\n<TYPE>10-K\n<SEQUENCE>1\n<FILENAME>a.htm\n<DESCRIPTION>\n<TEXT>\nx\n</TEXT>\n</DOCUMENT>\n\
             <DOCUMENT>\n<TYPE>10-K\n<SEQUENCE>2\n<FILENAME>b.htm\n<DESCRIPTION>\n<TEXT>\nx\n</TEXT>\n</DOCUMENT>",
        );
        let filing = FilingSGML::from_text(&content).unwrap();
        assert_eq!(filing.get_all_document_types(), vec!["10-K"]);
    }

    #[test]
    fn download_without_archive_writes_one_file_per_document() {
        let content = submission(
            "<DOCUMENT>\n<TYPE>10-K\n<SEQUENCE>1\n<FILENAME>a.htm\n<DESCRIPTION>\n<TEXT>\nbody one\n</TEXT>\n</DOCUMENT>\n\
             <DOCUMENT>\n<TYPE>EX-99.1\n<SEQUENCE>2\n<FILENAME>ex99.htm\n<DESCRIPTION>\n<TEXT>\nbody two\n</TEXT>\n</DOCUMENT>",
        );
        let filing = FilingSGML::from_text(&content).unwrap();
        let dir = tempfile::tempdir().unwrap();
        filing.download(dir.path(), false).unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("a.htm")).unwrap().trim(), "body one");
        assert_eq!(std::fs::read_to_string(dir.path().join("ex99.htm")).unwrap().trim(), "body two");
    }

    #[test]
    fn filing_html_and_xml_delegate_to_primary_document() {
        let content = submission(
            "<DOCUMENT>\n<TYPE>10-K\n<SEQUENCE>1\n<FILENAME>a.htm\n<DESCRIPTION>\n<TEXT>\n<HTML>\n<body>hi</body>\n</HTML>\n</TEXT>\n</DOCUMENT>",
        );
        let filing = FilingSGML::from_text(&content).unwrap();
        assert!(filing.html().unwrap().contains("hi"));
        assert!(filing.xml().is_none());
    }
}
