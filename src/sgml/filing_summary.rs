//! `FilingSummary.xml`: the index of rendered reports (financial statements, exhibits)
//! that accompanies most modern XBRL filings, used to recover a human-readable purpose
//! for each datafile attachment.

use quick_xml::de::from_str;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{EdgarError, Result};

/// One entry in `FilingSummary.xml`'s `<Reports>` list.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Report {
    #[serde(rename = "ShortName", default)]
    pub short_name: String,
    #[serde(rename = "HtmlFileName", default)]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FilingSummary {
    #[serde(rename = "Reports", default)]
    reports_wrapper: ReportsWrapper,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
struct ReportsWrapper {
    #[serde(rename = "Report", default)]
    reports: Vec<Report>,
}

impl FilingSummary {
    pub fn from_xml(xml: &str) -> Result<FilingSummary> {
        from_str(xml).map_err(|e| EdgarError::InvalidSgml(format!("invalid FilingSummary.xml: {e}")))
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports_wrapper.reports
    }

    /// Maps each report's `HtmlFileName` to its `ShortName`, for attaching purposes to
    /// datafile attachments by filename.
    pub fn get_reports_by_filename(&self) -> HashMap<&str, &str> {
        self.reports_wrapper
            .reports
            .iter()
            .filter(|r| !r.filename.is_empty())
            .map(|r| (r.filename.as_str(), r.short_name.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reports_and_maps_by_filename() {
        let xml = "\
<FilingSummary>
  <Reports>
    <Report>
      <ShortName>Balance Sheet</ShortName>
      <HtmlFileName>R2.htm</HtmlFileName>
    </Report>
    <Report>
      <ShortName>Income Statement</ShortName>
      <HtmlFileName>R4.htm</HtmlFileName>
    </Report>
  </Reports>
</FilingSummary>";
        let summary = FilingSummary::from_xml(xml).unwrap();
        assert_eq!(summary.reports().len(), 2);
        let by_name = summary.get_reports_by_filename();
        assert_eq!(by_name.get("R2.htm"), Some(&"Balance Sheet"));
        assert_eq!(by_name.get("R4.htm"), Some(&"Income Statement"));
    }

    #[test]
    fn rejects_malformed_xml() {
        assert!(FilingSummary::from_xml("not xml at all").is_err());
    }
}
