//! Datamule tar archive storage: an offline source alternative to live EDGAR.
//!
//! Datamule distributes SEC filings as tar archives. A tar holds one filing
//! (`metadata.json` at the root plus its documents) or a batch of filings
//! (`<accession_no>/metadata.json` plus that accession's documents, one subdirectory
//! per filing). `metadata.json` itself comes in two shapes: flat snake_case
//! (`accession_number`, `form_type`, ...) or nested kebab-case
//! (`accession-number`, `filer.company-data.conformed-name`, ...); both are accepted.
//! Documents may be zstandard-compressed, detected by magic bytes, and are decompressed
//! on read.
//!
//! [`use_datamule_storage`] scans a directory of `*.tar` files into a process-global
//! accession→tar-path index; [`get_datamule_filing`] resolves an accession number
//! against that index and loads the filing. Both [`load_filing_from_tar`] and the
//! index are read-only after configuration, per the crate's no-internal-locking
//! concurrency model: the index itself is the one piece of shared state, written once
//! by `use_datamule_storage` and read many times thereafter.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use serde_json::Value;

use crate::error::{EdgarError, Result};
use crate::sgml::assembler::FilingSGML;
use crate::sgml::document::SgmlDocument;
use crate::sgml::header::{Address, CompanyInformation, Filer, FilingHeader, FilingInformation};

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Normalizes an accession number to the dashed `NNNNNNNNNN-NN-NNNNNN` form. Input that
/// already contains a dash passes through unchanged; an undashed 18-digit run is split.
fn normalize_accession(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains('-') {
        return raw.to_string();
    }
    if raw.len() == 18 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return format!("{}-{}-{}", &raw[0..10], &raw[10..12], &raw[12..18]);
    }
    raw.to_string()
}

fn flat_str<'a>(meta: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| meta.get(*k).and_then(Value::as_str))
}

fn nested_str<'a>(meta: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut cur = meta;
    for key in path {
        cur = cur.get(*key)?;
    }
    cur.as_str()
}

fn get_accession(meta: &Value) -> Option<String> {
    flat_str(meta, &["accession_number", "accessionNumber", "accession-number"]).map(normalize_accession)
}

fn get_company_name(meta: &Value) -> String {
    flat_str(meta, &["company_name", "companyName", "company-name"])
        .or_else(|| nested_str(meta, &["filer", "company-data", "conformed-name"]))
        .unwrap_or("")
        .to_string()
}

fn get_cik(meta: &Value) -> Option<String> {
    flat_str(meta, &["cik"])
        .or_else(|| nested_str(meta, &["filer", "company-data", "cik"]))
        .map(str::to_string)
}

/// Infers a document type string from a filename extension, for documents whose
/// `metadata.json` `documents` array doesn't supply one explicitly.
fn infer_doc_type(filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "htm" | "html" => "HTML".to_string(),
        "xml" | "xsd" => "XML".to_string(),
        "txt" => "TEXT".to_string(),
        "json" => "JSON".to_string(),
        "jpg" | "jpeg" | "png" | "gif" => "GRAPHIC".to_string(),
        "pdf" => "PDF".to_string(),
        "xlsx" => "EXCEL".to_string(),
        "zip" => "ZIP".to_string(),
        "" => String::new(),
        other => other.to_ascii_uppercase(),
    }
}

fn maybe_decompress_zstd(data: Vec<u8>) -> Vec<u8> {
    if data.len() < 4 || data[0..4] != ZSTD_MAGIC {
        return data;
    }
    match zstd::stream::decode_all(&data[..]) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!("failed to decompress zstd datamule member: {e}");
            data
        }
    }
}

/// Decodes bytes as UTF-8, falling back to a lossless byte-for-byte Latin-1 decode (every
/// byte 0..=255 maps to one Unicode scalar) when the bytes aren't valid UTF-8.
fn decode_lossless(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().into_iter().map(|b| b as char).collect(),
    }
}

fn build_address(v: Option<&Value>) -> Option<Address> {
    let v = v?;
    if !v.is_object() {
        return None;
    }
    Some(Address {
        street1: flat_str(v, &["street1", "street_1"]).map(str::to_string),
        street2: flat_str(v, &["street2", "street_2"]).map(str::to_string),
        city: flat_str(v, &["city"]).map(str::to_string),
        state: flat_str(v, &["state", "state_or_country"]).map(str::to_string),
        zip: flat_str(v, &["zipcode", "zip"]).map(str::to_string),
        phone: flat_str(v, &["phone"]).map(str::to_string),
    })
}

fn build_filer(meta: &Value) -> Filer {
    let company_information = CompanyInformation {
        name: get_company_name(meta),
        cik: get_cik(meta),
        sic: flat_str(meta, &["sic", "standard_industrial_classification"]).map(str::to_string),
        irs_number: flat_str(meta, &["irs_number", "irsNumber"]).map(str::to_string),
        state_of_incorporation: flat_str(meta, &["state_of_incorporation", "stateOfIncorporation"])
            .map(str::to_string),
        fiscal_year_end: flat_str(meta, &["fiscal_year_end", "fiscalYearEnd"]).map(str::to_string),
    };

    let filing_information = FilingInformation {
        form: flat_str(meta, &["form_type", "formType", "form-type"]).map(str::to_string),
        file_number: flat_str(meta, &["file_number", "fileNumber"]).map(str::to_string),
        sec_act: flat_str(meta, &["sec_act", "act"]).map(str::to_string),
        film_number: flat_str(meta, &["film_number", "filmNumber"]).map(str::to_string),
    };

    let business_address = build_address(meta.get("business_address").or_else(|| meta.get("businessAddress")));
    let mailing_address = build_address(meta.get("mailing_address").or_else(|| meta.get("mailingAddress")));

    Filer {
        company_information,
        filing_information,
        business_address,
        mailing_address,
        former_company_names: Vec::new(),
    }
}

/// Builds a [`FilingHeader`] from a parsed `metadata.json` document, accepting either
/// the flat snake_case or nested kebab-case shape.
pub fn filing_header_from_metadata(meta: &Value) -> FilingHeader {
    FilingHeader {
        accession_number: get_accession(meta),
        form: flat_str(meta, &["form_type", "formType", "form-type"]).map(str::to_string),
        period_of_report: flat_str(meta, &["period_of_report", "periodOfReport", "period-of-report"])
            .map(str::to_string),
        filing_date: flat_str(meta, &["filing_date", "filingDate", "filing-date"]).map(str::to_string),
        date_as_of_change: None,
        acceptance_datetime: None,
        filers: vec![build_filer(meta)],
        reporting_owners: Vec::new(),
        issuer: None,
        subject_companies: Vec::new(),
    }
}

struct TarMember {
    name: String,
    is_dir: bool,
    bytes: Vec<u8>,
}

fn read_tar_members(path: &Path) -> Result<Vec<TarMember>> {
    use std::io::Read;

    let file = File::open(path).map_err(EdgarError::FileError)?;
    let mut archive = tar::Archive::new(file);
    let entries = archive.entries().map_err(EdgarError::FileError)?;

    let mut members = Vec::new();
    for entry in entries {
        let mut entry = entry.map_err(EdgarError::FileError)?;
        let is_dir = entry.header().entry_type().is_dir();
        let name = entry
            .path()
            .map_err(EdgarError::FileError)?
            .to_string_lossy()
            .into_owned();
        let mut bytes = Vec::new();
        if !is_dir {
            entry.read_to_end(&mut bytes).map_err(EdgarError::FileError)?;
        }
        members.push(TarMember { name, is_dir, bytes });
    }
    Ok(members)
}

/// `'metadata.json' -> ""`, `'0001193125-24-012345/metadata.json' -> "0001193125-24-012345/"`.
fn get_prefix(metadata_path: &str) -> String {
    match metadata_path.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/"),
        None => String::new(),
    }
}

fn strip_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    if !prefix.is_empty() && name.starts_with(prefix) {
        &name[prefix.len()..]
    } else {
        name
    }
}

fn build_filing_sgml(members: &[TarMember], metadata: &Value, prefix: &str) -> FilingSGML {
    let header = filing_header_from_metadata(metadata);

    let mut doc_info: HashMap<&str, &Value> = HashMap::new();
    if let Some(docs) = metadata.get("documents").and_then(Value::as_array) {
        for info in docs {
            if let Some(filename) = info.get("filename").and_then(Value::as_str) {
                doc_info.insert(filename, info);
            }
        }
    }

    let mut documents = Vec::new();
    let mut seq_counter = 1usize;
    for member in members {
        if member.is_dir || member.name.ends_with("metadata.json") {
            continue;
        }
        if !prefix.is_empty() && !member.name.starts_with(prefix) {
            continue;
        }
        let filename = strip_prefix(&member.name, prefix);
        let content = decode_lossless(maybe_decompress_zstd(member.bytes.clone()));

        let (sequence, doc_type, description) = match doc_info.get(filename) {
            Some(info) => (
                info.get("sequence")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| seq_counter.to_string()),
                info.get("type")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| infer_doc_type(filename)),
                info.get("description").and_then(Value::as_str).unwrap_or("").to_string(),
            ),
            None => (seq_counter.to_string(), infer_doc_type(filename), String::new()),
        };

        documents.push(SgmlDocument::new(sequence, doc_type, filename, description, content));
        seq_counter += 1;
    }

    FilingSGML::from_documents(header, documents)
}

/// Loads a filing from a datamule tar archive: `metadata.json` at the root for a
/// single-filing tar, or `<accession_no>/metadata.json` per filing for a batch tar. When
/// `accession_no` is `None`, the first (or only) filing in the tar is loaded.
pub fn load_filing_from_tar(path: &Path, accession_no: Option<&str>) -> Result<FilingSGML> {
    let members = read_tar_members(path)?;
    let metadata_members: Vec<&TarMember> = members
        .iter()
        .filter(|m| !m.is_dir && m.name.ends_with("metadata.json"))
        .collect();
    if metadata_members.is_empty() {
        return Err(EdgarError::InvalidSgml(format!(
            "no metadata.json found in tar {}",
            path.display()
        )));
    }

    let (meta_path, metadata): (&str, Value) = if let Some(accession_no) = accession_no {
        let wanted = normalize_accession(accession_no);
        let mut found = None;
        for m in &metadata_members {
            let meta: Value = serde_json::from_slice(&m.bytes)?;
            if get_accession(&meta).as_deref() == Some(wanted.as_str()) {
                found = Some((m.name.as_str(), meta));
                break;
            }
        }
        found.ok_or_else(|| {
            EdgarError::InvalidAccessionNumber(format!(
                "accession {wanted} not found in tar {}",
                path.display()
            ))
        })?
    } else {
        let m = metadata_members[0];
        (m.name.as_str(), serde_json::from_slice(&m.bytes)?)
    };

    let prefix = get_prefix(meta_path);
    Ok(build_filing_sgml(&members, &metadata, &prefix))
}

fn index_tar(path: &Path, index: &mut HashMap<String, PathBuf>) -> Result<()> {
    for member in read_tar_members(path)? {
        if member.is_dir || !member.name.ends_with("metadata.json") {
            continue;
        }
        let Ok(meta) = serde_json::from_slice::<Value>(&member.bytes) else {
            continue;
        };
        if let Some(accession) = get_accession(&meta) {
            index.insert(accession, path.to_path_buf());
        }
    }
    Ok(())
}

static DATAMULE_PATH: OnceLock<Mutex<Option<PathBuf>>> = OnceLock::new();
static ACCESSION_INDEX: OnceLock<Mutex<HashMap<String, PathBuf>>> = OnceLock::new();

fn datamule_path_cell() -> &'static Mutex<Option<PathBuf>> {
    DATAMULE_PATH.get_or_init(|| Mutex::new(None))
}

fn accession_index_cell() -> &'static Mutex<HashMap<String, PathBuf>> {
    ACCESSION_INDEX.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Configures a directory of datamule tar files as a filing source: scans every `*.tar`
/// file directly inside `dir` and indexes its filings by accession number. Process-global
/// and write-once per call — a later call replaces the index outright, it does not merge.
pub fn use_datamule_storage(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(EdgarError::FileError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("datamule directory does not exist: {}", dir.display()),
        )));
    }

    let mut index = HashMap::new();
    for entry in std::fs::read_dir(dir).map_err(EdgarError::FileError)? {
        let entry = entry.map_err(EdgarError::FileError)?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("tar") {
            continue;
        }
        if let Err(e) = index_tar(&path, &mut index) {
            tracing::warn!("failed to index datamule tar {}: {e}", path.display());
        }
    }

    tracing::info!(
        "datamule storage enabled: {} ({} filings indexed)",
        dir.display(),
        index.len()
    );
    *datamule_path_cell().lock().unwrap() = Some(dir.to_path_buf());
    *accession_index_cell().lock().unwrap() = index;
    Ok(())
}

/// Disables datamule storage and clears the accession index.
pub fn disable_datamule_storage() {
    *datamule_path_cell().lock().unwrap() = None;
    accession_index_cell().lock().unwrap().clear();
}

/// Returns whether datamule storage is currently configured.
pub fn is_using_datamule_storage() -> bool {
    datamule_path_cell().lock().unwrap().is_some()
}

/// Looks up `accession_no` in the datamule index and loads the filing from its tar, or
/// returns `None` if the accession isn't indexed.
pub fn get_datamule_filing(accession_no: &str) -> Option<Result<FilingSGML>> {
    let accession = normalize_accession(accession_no);
    let tar_path = accession_index_cell().lock().unwrap().get(&accession).cloned()?;
    Some(load_filing_from_tar(&tar_path, Some(&accession)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tar(entries: &[(&str, &[u8])]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::with_suffix(".tar").unwrap();
        {
            let mut builder = tar::Builder::new(file.reopen().unwrap());
            for (name, data) in entries {
                let mut header = tar::Header::new_gnu();
                header.set_size(data.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append_data(&mut header, name, *data).unwrap();
            }
            builder.finish().unwrap();
        }
        file
    }

    #[test]
    fn normalizes_undashed_accession() {
        assert_eq!(normalize_accession("000119312524012345"), "0001193125-24-012345");
        assert_eq!(normalize_accession("0001193125-24-012345"), "0001193125-24-012345");
    }

    #[test]
    fn loads_single_filing_tar() {
        let metadata = br#"{"accession_number":"0001193125-24-012345","form_type":"10-K","company_name":"Acme Corp","cik":"320193"}"#;
        let tar = write_tar(&[
            ("metadata.json", metadata),
            ("primary-document.htm", b"<html>body</html>"),
        ]);

        let filing = load_filing_from_tar(tar.path(), None).unwrap();
        assert_eq!(filing.header.accession_number.as_deref(), Some("0001193125-24-012345"));
        assert_eq!(filing.header.form.as_deref(), Some("10-K"));
        assert_eq!(filing.header.filers[0].company_information.name, "Acme Corp");
        assert_eq!(filing.get_document_count(), 1);
        assert_eq!(filing.documents[0].filename, "primary-document.htm");
        assert_eq!(filing.documents[0].doc_type, "HTML");
    }

    #[test]
    fn loads_batch_tar_by_accession() {
        let meta_a = br#"{"accession-number":"0001193125-24-000111","form_type":"10-Q"}"#;
        let meta_b = br#"{"accession-number":"0001193125-24-000222","form_type":"8-K"}"#;
        let tar = write_tar(&[
            ("0001193125-24-000111/metadata.json", meta_a),
            ("0001193125-24-000111/doc.htm", b"<html>a</html>"),
            ("0001193125-24-000222/metadata.json", meta_b),
            ("0001193125-24-000222/doc.htm", b"<html>b</html>"),
        ]);

        let filing = load_filing_from_tar(tar.path(), Some("0001193125-24-000222")).unwrap();
        assert_eq!(filing.header.form.as_deref(), Some("8-K"));
        assert_eq!(filing.documents[0].filename, "doc.htm");
        assert_eq!(filing.documents[0].content_text().unwrap(), "<html>b</html>");
    }

    #[test]
    fn nested_kebab_case_metadata_is_accepted() {
        let metadata = br#"{
            "accession-number": "0001193125-24-099999",
            "form-type": "10-K",
            "filer": {"company-data": {"conformed-name": "Nested Corp", "cik": "1111111"}}
        }"#;
        let tar = write_tar(&[("metadata.json", metadata)]);

        let filing = load_filing_from_tar(tar.path(), None).unwrap();
        assert_eq!(filing.header.filers[0].company_information.name, "Nested Corp");
        assert_eq!(filing.header.filers[0].company_information.cik.as_deref(), Some("1111111"));
    }

    #[test]
    fn missing_accession_in_tar_is_an_error() {
        let tar = write_tar(&[("metadata.json", br#"{"accession_number":"0001-24-000001"}"#)]);
        let err = load_filing_from_tar(tar.path(), Some("0009-24-999999")).unwrap_err();
        assert!(matches!(err, EdgarError::InvalidAccessionNumber(_)));
    }
}
