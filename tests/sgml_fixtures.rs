//! Full SGML-text-to-`FilingSGML` round trips, exercising the SUBMISSION dialect parser,
//! the Filing Assembler's attachment classification, and uu-decoded document content
//! together rather than in isolation (the per-module unit tests already cover each piece
//! on its own). Content is embedded inline rather than read from a fixture file, mirroring
//! a real `<SUBMISSION>` submission closely enough to exercise the full pipeline.

use edgarkit::FilingSGML;

const SUBMISSION: &str = "\
<SUBMISSION>
<ACCESSION-NUMBER>0000320193-24-000001
<TYPE>10-K
<PUBLIC-DOCUMENT-COUNT>3
<FILER>
<COMPANY-DATA>
<CONFORMED-NAME>Apple Inc.
<CIK>0000320193
<ASSIGNED-SIC>3571
</COMPANY-DATA>
<FILING-VALUES>
<FORM-TYPE>10-K
<FILE-NUMBER>001-36743
</FILING-VALUES>
</FILER>
<DOCUMENT>
<TYPE>10-K
<SEQUENCE>1
<FILENAME>aapl-20240928.htm
<DESCRIPTION>10-K
<TEXT>
<HTML>
<body>Annual report body</body>
</HTML>
</TEXT>
</DOCUMENT>
<DOCUMENT>
<TYPE>EX-99.1
<SEQUENCE>2
<FILENAME>ex991.txt
<DESCRIPTION>Exhibit
<TEXT>
begin 644 ex991.txt
#0V%T
`
end
</TEXT>
</DOCUMENT>
<DOCUMENT>
<TYPE>EX-101.INS
<SEQUENCE>3
<FILENAME>aapl-20240928.xml
<DESCRIPTION>
<TEXT>
<xbrl>
<fact/>
</xbrl>
</TEXT>
</DOCUMENT>
</SUBMISSION>";

#[test]
fn full_submission_round_trips_into_a_classified_filing() {
    let filing = FilingSGML::from_text(SUBMISSION).unwrap();

    assert_eq!(filing.header.accession_number.as_deref(), Some("0000320193-24-000001"));
    assert_eq!(filing.get_document_count(), 3);

    let primary = filing.primary_document().unwrap();
    assert_eq!(primary.filename, "aapl-20240928.htm");
    assert!(filing.html().unwrap().contains("Annual report body"));

    // The primary document (sequence "1") is itself appended to the documents list
    // alongside the exhibit, per the classification rule in the assembler.
    assert_eq!(filing.attachment_documents().len(), 2);
    assert_eq!(filing.datafile_documents().len(), 1);
    assert_eq!(filing.datafile_documents()[0].filename, "aapl-20240928.xml");
}

#[test]
fn uu_encoded_exhibit_decodes_through_the_full_pipeline() {
    let filing = FilingSGML::from_text(SUBMISSION).unwrap();
    let exhibit = filing.get_document_by_sequence("2").expect("exhibit present");
    assert_eq!(exhibit.content().unwrap(), b"Cat".to_vec());
}

#[test]
fn mismatched_closing_tag_is_rejected() {
    let broken = SUBMISSION.replacen("</SUBMISSION>", "</WRONG-TAG>", 1);
    assert!(FilingSGML::from_text(&broken).is_err());
}
