//! SGML submission parsing and filing assembly.
//!
//! An EDGAR submission text file (`*.txt`) is SGML in one of two dialects: the modern
//! `<SUBMISSION>` root with structured role tags, or the legacy `<SEC-DOCUMENT>`/
//! `<IMS-DOCUMENT>` header-plus-documents shape. [`parser`] detects the dialect and
//! parses it into documents plus a dialect-appropriate header tree; [`header`] turns
//! that tree into a typed [`header::FilingHeader`]; [`assembler`] composes the parsed
//! pieces into a [`assembler::FilingSGML`] with documents classified by role.

pub mod assembler;
#[cfg(feature = "datamule")]
pub mod datamule;
pub mod document;
pub mod filing_summary;
pub mod header;
pub mod parser;
pub mod source;

pub use assembler::{Attachment, FilingSGML};
#[cfg(feature = "datamule")]
pub use datamule::{
    disable_datamule_storage, get_datamule_filing, is_using_datamule_storage, load_filing_from_tar,
    use_datamule_storage,
};
pub use document::SgmlDocument;
pub use filing_summary::{FilingSummary, Report};
pub use header::{
    Address, CompanyInformation, FilingHeader, FilingInformation, Filer, FormerCompany, Issuer,
    Owner, ReportingOwner, SubjectCompany,
};
pub use parser::{check_defensive_errors, detect_format, parse_submission, SgmlFormat};
pub use source::parse_source;
