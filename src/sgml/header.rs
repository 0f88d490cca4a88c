//! Structured filing header: company/owner/issuer records parsed out of either SGML
//! dialect's header block.

use crate::error::{EdgarError, Result};
use crate::sgml::parser::{ParsedHeader, SDict, SValue};

/// `{name, cik, sic, irs_number, state_of_incorporation, fiscal_year_end}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyInformation {
    pub name: String,
    pub cik: Option<String>,
    pub sic: Option<String>,
    pub irs_number: Option<String>,
    pub state_of_incorporation: Option<String>,
    pub fiscal_year_end: Option<String>,
}

/// `{form, file_number, sec_act, film_number}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilingInformation {
    pub form: Option<String>,
    pub file_number: Option<String>,
    pub sec_act: Option<String>,
    pub film_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub street1: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormerCompany {
    pub name: String,
    pub date_of_change: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filer {
    pub company_information: CompanyInformation,
    pub filing_information: FilingInformation,
    pub business_address: Option<Address>,
    pub mailing_address: Option<Address>,
    pub former_company_names: Vec<FormerCompany>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub name: String,
    pub cik: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingOwner {
    pub owner: Owner,
    pub filing_information: FilingInformation,
    pub business_address: Option<Address>,
    pub mailing_address: Option<Address>,
}

/// Subject companies and issuers share the Filer shape (company info + addresses +
/// former names); they are distinguished only by which header role they appeared under.
pub type SubjectCompany = Filer;
pub type Issuer = Filer;

/// The fully structured header of an EDGAR submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilingHeader {
    pub accession_number: Option<String>,
    pub form: Option<String>,
    pub period_of_report: Option<String>,
    pub filing_date: Option<String>,
    pub date_as_of_change: Option<String>,
    pub acceptance_datetime: Option<String>,
    pub filers: Vec<Filer>,
    pub reporting_owners: Vec<ReportingOwner>,
    pub issuer: Option<Issuer>,
    pub subject_companies: Vec<SubjectCompany>,
}

impl FilingHeader {
    /// CIK of the filing: the header's own CIK field if present, else the first filer's.
    pub fn cik(&self) -> Option<&str> {
        self.filers
            .first()
            .and_then(|f| f.company_information.cik.as_deref())
            .or_else(|| {
                self.reporting_owners
                    .first()
                    .and_then(|r| r.owner.cik.as_deref())
            })
    }

    pub fn document_count(&self) -> usize {
        self.filers.len() + self.reporting_owners.len()
    }

    /// Deduplicated union of all file numbers across filers and reporting owners.
    pub fn file_numbers(&self) -> Vec<String> {
        let mut out = Vec::new();
        for f in &self.filers {
            if let Some(fnum) = &f.filing_information.file_number {
                if !out.contains(fnum) {
                    out.push(fnum.clone());
                }
            }
        }
        for r in &self.reporting_owners {
            if let Some(fnum) = &r.filing_information.file_number {
                if !out.contains(fnum) {
                    out.push(fnum.clone());
                }
            }
        }
        out
    }

    /// Builds a header from whichever shape the SGML parser produced.
    pub fn from_parsed(header: &ParsedHeader) -> Result<FilingHeader> {
        match header {
            ParsedHeader::Submission(root) => Self::from_submission_tree(root),
            ParsedHeader::Raw(text) => Self::parse_from_sgml_text(text),
        }
    }

    /// Builds a header from the SUBMISSION dialect's structured tag tree.
    pub fn from_submission_tree(root: &SDict) -> Result<FilingHeader> {
        let mut header = FilingHeader {
            accession_number: root.get_str("ACCESSION-NUMBER").map(str::to_string),
            form: root.get_str("TYPE").map(str::to_string),
            period_of_report: root.get_str("PERIOD").map(str::to_string),
            filing_date: root.get_str("FILING-DATE").map(str::to_string),
            date_as_of_change: root
                .get_str("DATE-OF-FILING-DATE-CHANGE")
                .map(str::to_string),
            acceptance_datetime: root.get_str("ACCEPTANCE-DATETIME").map(str::to_string),
            ..Default::default()
        };

        if let Some(filers) = root.get("FILER") {
            for dict in filers.as_dict_list() {
                header.filers.push(filer_from_dict(dict, "COMPANY-DATA")?);
            }
        }
        if let Some(owners) = root.get("REPORTING-OWNER") {
            for dict in owners.as_dict_list() {
                header.reporting_owners.push(reporting_owner_from_dict(dict)?);
            }
        }
        if let Some(issuer) = root.get("ISSUER") {
            let dicts = issuer.as_dict_list();
            if let Some(dict) = dicts.first() {
                header.issuer = Some(filer_from_dict(dict, "COMPANY-DATA")?);
            }
        }
        if let Some(subjects) = root.get("SUBJECT-COMPANY") {
            for dict in subjects.as_dict_list() {
                header
                    .subject_companies
                    .push(filer_from_dict(dict, "COMPANY-DATA")?);
            }
        }

        validate_accession_number(header.accession_number.as_deref())?;
        Ok(header)
    }

    /// Parses the tab-indented key/value header text used by the SEC-DOCUMENT dialect.
    /// Applies the pre-2000 `<TAG>...</TAG>` preprocessing pass when that shape is
    /// detected.
    pub fn parse_from_sgml_text(header_text: &str) -> Result<FilingHeader> {
        let text = if needs_preprocessing(header_text) {
            preprocess_old_headers(header_text)
        } else {
            header_text.to_string()
        };

        let root = parse_indented_header(&text)?;

        let mut header = FilingHeader {
            accession_number: find_scalar(&root, "ACCESSION NUMBER"),
            form: find_scalar(&root, "CONFORMED SUBMISSION TYPE"),
            period_of_report: find_scalar(&root, "CONFORMED PERIOD OF REPORT"),
            filing_date: find_scalar(&root, "FILED AS OF DATE"),
            date_as_of_change: find_scalar(&root, "DATE AS OF CHANGE"),
            acceptance_datetime: find_scalar(&root, "ACCEPTANCE-DATETIME"),
            ..Default::default()
        };

        if let Some(filers) = root.get("FILER") {
            for dict in filers.as_dict_list() {
                header
                    .filers
                    .push(filer_from_legacy_dict(dict, "COMPANY DATA")?);
            }
        }
        if let Some(owners) = root.get("REPORTING-OWNER") {
            for dict in owners.as_dict_list() {
                header
                    .reporting_owners
                    .push(reporting_owner_from_legacy_dict(dict)?);
            }
        }
        if let Some(issuer) = root.get("ISSUER") {
            if let Some(dict) = issuer.as_dict_list().first() {
                header.issuer = Some(filer_from_legacy_dict(dict, "COMPANY DATA")?);
            }
        }
        if let Some(subjects) = root.get("SUBJECT COMPANY") {
            for dict in subjects.as_dict_list() {
                header
                    .subject_companies
                    .push(filer_from_legacy_dict(dict, "COMPANY DATA")?);
            }
        }

        validate_accession_number(header.accession_number.as_deref())?;
        Ok(header)
    }
}

fn validate_accession_number(value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !is_valid_accession_number(value) {
        return Err(EdgarError::InvalidAccessionNumber(value.to_string()));
    }
    Ok(())
}

/// `NNNNNNNNNN-NN-NNNNNN`.
pub fn is_valid_accession_number(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 20 {
        return false;
    }
    let digit_run = |s: &[u8]| s.iter().all(u8::is_ascii_digit);
    bytes[10] == b'-'
        && bytes[13] == b'-'
        && digit_run(&bytes[0..10])
        && digit_run(&bytes[11..13])
        && digit_run(&bytes[14..20])
}

fn filer_from_dict(dict: &SDict, company_key: &str) -> Result<Filer> {
    let company_information = dict
        .get(company_key)
        .and_then(SValue::as_dict)
        .map(company_information_from_submission_dict)
        .unwrap_or_default();
    let filing_information = dict
        .get("FILING-VALUES")
        .and_then(SValue::as_dict)
        .map(filing_information_from_submission_dict)
        .unwrap_or_default();
    let business_address = dict
        .get("BUSINESS-ADDRESS")
        .and_then(SValue::as_dict)
        .map(address_from_submission_dict);
    let mailing_address = dict
        .get("MAIL-ADDRESS")
        .and_then(SValue::as_dict)
        .map(address_from_submission_dict);
    let former_company_names = dict
        .get("FORMER-COMPANY")
        .map(|v| {
            v.as_dict_list()
                .into_iter()
                .filter_map(former_company_from_submission_dict)
                .collect()
        })
        .unwrap_or_default();

    Ok(Filer {
        company_information,
        filing_information,
        business_address,
        mailing_address,
        former_company_names,
    })
}

fn reporting_owner_from_dict(dict: &SDict) -> Result<ReportingOwner> {
    let owner_dict = dict.get("OWNER-DATA").and_then(SValue::as_dict);
    let name = owner_dict
        .and_then(|d| d.get_str("CONFORMED-NAME"))
        .unwrap_or("")
        .to_string();
    let cik = owner_dict
        .and_then(|d| d.get_str("CIK"))
        .map(str::to_string);
    let filing_information = dict
        .get("FILING-VALUES")
        .and_then(SValue::as_dict)
        .map(filing_information_from_submission_dict)
        .unwrap_or_default();
    let business_address = dict
        .get("BUSINESS-ADDRESS")
        .and_then(SValue::as_dict)
        .map(address_from_submission_dict);
    let mailing_address = dict
        .get("MAIL-ADDRESS")
        .and_then(SValue::as_dict)
        .map(address_from_submission_dict);

    Ok(ReportingOwner {
        owner: Owner { name, cik },
        filing_information,
        business_address,
        mailing_address,
    })
}

fn company_information_from_submission_dict(dict: &SDict) -> CompanyInformation {
    CompanyInformation {
        name: dict.get_str("CONFORMED-NAME").unwrap_or("").to_string(),
        cik: dict.get_str("CIK").map(str::to_string),
        sic: dict.get_str("ASSIGNED-SIC").map(str::to_string),
        irs_number: dict.get_str("IRS-NUMBER").map(str::to_string),
        state_of_incorporation: dict.get_str("STATE-OF-INCORPORATION").map(str::to_string),
        fiscal_year_end: dict.get_str("FISCAL-YEAR-END").map(str::to_string),
    }
}

fn filing_information_from_submission_dict(dict: &SDict) -> FilingInformation {
    FilingInformation {
        form: dict.get_str("FORM-TYPE").map(str::to_string),
        sec_act: dict.get_str("ACT").map(str::to_string),
        file_number: dict.get_str("FILE-NUMBER").map(str::to_string),
        film_number: dict.get_str("FILM-NUMBER").map(str::to_string),
    }
}

fn address_from_submission_dict(dict: &SDict) -> Address {
    Address {
        street1: dict.get_str("STREET1").map(str::to_string),
        street2: dict.get_str("STREET2").map(str::to_string),
        city: dict.get_str("CITY").map(str::to_string),
        state: dict.get_str("STATE").map(str::to_string),
        zip: dict.get_str("ZIP").map(str::to_string),
        phone: dict.get_str("PHONE").map(str::to_string),
    }
}

fn former_company_from_submission_dict(dict: &SDict) -> Option<FormerCompany> {
    let name = dict.get_str("FORMER-CONFORMED-NAME")?.to_string();
    Some(FormerCompany {
        name,
        date_of_change: dict.get_str("DATE-CHANGED").map(str::to_string),
    })
}

fn filer_from_legacy_dict(dict: &SDict, company_key: &str) -> Result<Filer> {
    let company_information = dict
        .get(company_key)
        .and_then(SValue::as_dict)
        .map(company_information_from_legacy_dict)
        .unwrap_or_default();
    let filing_information = dict
        .get("FILING VALUES")
        .and_then(SValue::as_dict)
        .map(filing_information_from_legacy_dict)
        .unwrap_or_default();
    let business_address = dict
        .get("BUSINESS ADDRESS")
        .and_then(SValue::as_dict)
        .map(address_from_legacy_dict);
    let mailing_address = dict
        .get("MAIL ADDRESS")
        .and_then(SValue::as_dict)
        .map(address_from_legacy_dict);
    let former_company_names = dict
        .get("FORMER COMPANY")
        .map(|v| {
            v.as_dict_list()
                .into_iter()
                .filter_map(former_company_from_legacy_dict)
                .collect()
        })
        .unwrap_or_default();

    Ok(Filer {
        company_information,
        filing_information,
        business_address,
        mailing_address,
        former_company_names,
    })
}

fn reporting_owner_from_legacy_dict(dict: &SDict) -> Result<ReportingOwner> {
    let owner_dict = dict.get("OWNER DATA").and_then(SValue::as_dict);
    let name = owner_dict
        .and_then(|d| d.get_str("COMPANY CONFORMED NAME"))
        .unwrap_or("")
        .to_string();
    let cik = owner_dict
        .and_then(|d| d.get_str("CENTRAL INDEX KEY"))
        .map(str::to_string);
    let filing_information = dict
        .get("FILING VALUES")
        .and_then(SValue::as_dict)
        .map(filing_information_from_legacy_dict)
        .unwrap_or_default();
    let business_address = dict
        .get("BUSINESS ADDRESS")
        .and_then(SValue::as_dict)
        .map(address_from_legacy_dict);
    let mailing_address = dict
        .get("MAIL ADDRESS")
        .and_then(SValue::as_dict)
        .map(address_from_legacy_dict);

    Ok(ReportingOwner {
        owner: Owner { name, cik },
        filing_information,
        business_address,
        mailing_address,
    })
}

fn company_information_from_legacy_dict(dict: &SDict) -> CompanyInformation {
    CompanyInformation {
        name: dict
            .get_str("COMPANY CONFORMED NAME")
            .unwrap_or("")
            .to_string(),
        cik: dict.get_str("CENTRAL INDEX KEY").map(str::to_string),
        sic: dict
            .get_str("STANDARD INDUSTRIAL CLASSIFICATION")
            .map(str::to_string),
        irs_number: dict.get_str("IRS NUMBER").map(str::to_string),
        state_of_incorporation: dict.get_str("STATE OF INCORPORATION").map(str::to_string),
        fiscal_year_end: dict.get_str("FISCAL YEAR END").map(str::to_string),
    }
}

fn filing_information_from_legacy_dict(dict: &SDict) -> FilingInformation {
    FilingInformation {
        form: dict.get_str("FORM TYPE").map(str::to_string),
        sec_act: dict.get_str("SEC ACT").map(str::to_string),
        file_number: dict.get_str("SEC FILE NUMBER").map(str::to_string),
        film_number: dict.get_str("FILM NUMBER").map(str::to_string),
    }
}

fn address_from_legacy_dict(dict: &SDict) -> Address {
    Address {
        street1: dict.get_str("STREET 1").map(str::to_string),
        street2: dict.get_str("STREET 2").map(str::to_string),
        city: dict.get_str("CITY").map(str::to_string),
        state: dict.get_str("STATE").map(str::to_string),
        zip: dict.get_str("ZIP").map(str::to_string),
        phone: dict.get_str("BUSINESS PHONE").map(str::to_string),
    }
}

fn former_company_from_legacy_dict(dict: &SDict) -> Option<FormerCompany> {
    let name = dict.get_str("FORMER CONFORMED NAME")?.to_string();
    Some(FormerCompany {
        name,
        date_of_change: dict.get_str("DATE OF NAME CHANGE").map(str::to_string),
    })
}

fn find_scalar(dict: &SDict, key: &str) -> Option<String> {
    dict.get_str(key).map(str::to_string)
}

const LEGACY_REPEATABLE: &[&str] = &["FILER", "REPORTING-OWNER", "FORMER COMPANY", "SUBJECT COMPANY"];

/// Normalizes a header-text section name (`REPORTING-OWNER:` or `REPORTING OWNER:`) to the
/// canonical key used by the rest of this module.
fn canonical_section_name(raw: &str) -> String {
    match raw {
        "REPORTING OWNER" | "REPORTING-OWNER" => "REPORTING-OWNER".to_string(),
        other => other.to_string(),
    }
}

/// Parses the tab-indented body of a `<SEC-HEADER>`/`<IMS-HEADER>` block into a generic
/// tree, keyed by the header's own field names (which use spaces, e.g.
/// `COMPANY CONFORMED NAME`), using indentation depth to determine nesting.
fn parse_indented_header(text: &str) -> Result<SDict> {
    // (section_name, indent, dict)
    let mut stack: Vec<(String, usize, SDict)> = vec![("ROOT".to_string(), 0, SDict::new())];

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let indent = line.chars().take_while(|c| *c == '\t').count();
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix('<') {
            if is_valid_sgml_tag_prefix(rest) {
                if let Some(close) = rest.find('>') {
                    let tag = &rest[..close];
                    let value = rest[close + 1..].trim().to_string();
                    insert_scalar_at_depth(&mut stack, indent, tag, value);
                    continue;
                }
            }
            // Not a recognizable tag line (likely stray inline content); skip.
            continue;
        }

        let Some(colon_idx) = trimmed.find(':') else {
            continue;
        };
        let key = trimmed[..colon_idx].trim().to_string();
        let value = trimmed[colon_idx + 1..].trim().to_string();

        if value.is_empty() {
            // Section header: pop to the nearest enclosing frame, then push a new one.
            while stack.len() > 1 && stack.last().unwrap().1 >= indent {
                pop_and_attach(&mut stack);
            }
            stack.push((canonical_section_name(&key), indent, SDict::new()));
        } else {
            insert_scalar_at_depth(&mut stack, indent, &key, value);
        }
    }

    while stack.len() > 1 {
        pop_and_attach(&mut stack);
    }

    Ok(stack.pop().map(|(_, _, d)| d).unwrap_or_default())
}

fn insert_scalar_at_depth(stack: &mut Vec<(String, usize, SDict)>, indent: usize, key: &str, value: String) {
    while stack.len() > 1 && stack.last().unwrap().1 >= indent {
        pop_and_attach(stack);
    }
    let (_, _, dict) = stack.last_mut().expect("ROOT frame present");
    dict.insert_scalar(key, value);
}

fn pop_and_attach(stack: &mut Vec<(String, usize, SDict)>) {
    let Some((name, _, dict)) = stack.pop() else {
        return;
    };
    let repeatable = LEGACY_REPEATABLE.contains(&name.as_str());
    let (_, _, parent) = stack.last_mut().expect("ROOT frame present");
    parent.insert_section(&name, dict, repeatable);
}

/// `_is_valid_sgml_tag`: uppercase ASCII, digits and hyphens only, no namespace colon or
/// whitespace. Used to tell a genuine header tag (`<ACCEPTANCE-DATETIME>`) apart from
/// stray inline XBRL/HTML content that can leak past `</SEC-HEADER>` in malformed files.
fn is_valid_sgml_tag_prefix(rest: &str) -> bool {
    let Some(close) = rest.find('>') else {
        return false;
    };
    let tag = &rest[..close];
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

/// `true` when the header text still uses the pre-2000 `<TAG>\ncontent\n</TAG>` shape
/// rather than tab-indented `KEY:\tvalue` lines.
fn needs_preprocessing(text: &str) -> bool {
    !text.contains(':') && text.contains('<') && text.contains("</")
}

/// Converts `<TAG>\ncontent\n</TAG>` blocks to tab-indented `TAG:\tcontent` form, and
/// strips any remaining unmatched tags.
fn preprocess_old_headers(text: &str) -> String {
    let mut out = String::new();
    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if let Some(rest) = line.strip_prefix('<') {
            if let Some(end) = rest.find('>') {
                let tag = &rest[..end];
                let closing = format!("</{tag}>");
                // Look for a matching close on a later line with the body in between.
                if let Some(close_offset) = lines[i + 1..].iter().position(|l| l.trim() == closing) {
                    let body_start = i + 1;
                    let body_end = body_start + close_offset;
                    let body = lines[body_start..body_end].join(" ");
                    out.push_str(&format!("{tag}:\t{}\n", body.trim()));
                    i = body_end + 1;
                    continue;
                }
            }
            // Unmatched open/close tag on its own: drop it.
            i += 1;
            continue;
        }
        out.push_str(line);
        out.push('\n');
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_accession_number_shape() {
        assert!(is_valid_accession_number("0000320193-20-000096"));
        assert!(!is_valid_accession_number("320193-20-000096"));
        assert!(!is_valid_accession_number("0000320193_20_000096"));
    }

    #[test]
    fn parses_legacy_tab_indented_header() {
        let text = "\
ACCESSION NUMBER:\t\t0000320193-20-000096
CONFORMED SUBMISSION TYPE:\t10-K
CONFORMED PERIOD OF REPORT:\t20200926
FILED AS OF DATE:\t\t20201030
FILER:

\tCOMPANY DATA:
\t\tCOMPANY CONFORMED NAME:\t\tApple Inc.
\t\tCENTRAL INDEX KEY:\t\t0000320193
\t\tSTANDARD INDUSTRIAL CLASSIFICATION:\tELECTRONIC COMPUTERS [3571]
\t\tIRS NUMBER:\t\t\t942404110
\t\tSTATE OF INCORPORATION:\t\tCA
\t\tFISCAL YEAR END:\t\t0926

\tFILING VALUES:
\t\tFORM TYPE:\t\t10-K
\t\tSEC ACT:\t\t1934 Act
\t\tSEC FILE NUMBER:\t001-36743
\t\tFILM NUMBER:\t\t201274955

\tBUSINESS ADDRESS:
\t\tSTREET 1:\t\tONE APPLE PARK WAY
\t\tCITY:\t\t\tCUPERTINO
\t\tSTATE:\t\t\tCA
\t\tZIP:\t\t\t95014
\t\tBUSINESS PHONE:\t\t(408) 996-1010
";
        let header = FilingHeader::parse_from_sgml_text(text).unwrap();
        assert_eq!(header.accession_number.as_deref(), Some("0000320193-20-000096"));
        assert_eq!(header.form.as_deref(), Some("10-K"));
        assert_eq!(header.filers.len(), 1);
        let filer = &header.filers[0];
        assert_eq!(filer.company_information.name, "Apple Inc.");
        assert_eq!(filer.company_information.cik.as_deref(), Some("0000320193"));
        assert_eq!(filer.filing_information.file_number.as_deref(), Some("001-36743"));
        assert_eq!(
            filer.business_address.as_ref().unwrap().city.as_deref(),
            Some("CUPERTINO")
        );
    }

    #[test]
    fn rejects_invalid_accession_number() {
        let text = "ACCESSION NUMBER:\tnot-a-valid-number\nCONFORMED SUBMISSION TYPE:\t10-K\n";
        assert!(matches!(
            FilingHeader::parse_from_sgml_text(text),
            Err(EdgarError::InvalidAccessionNumber(_))
        ));
    }
}
