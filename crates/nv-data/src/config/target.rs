//! Addressing of a view or folder on the backend

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use nv_core::FetchRequest;

/// Kind of design note a target points at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    View,
    Folder,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::View => "view",
            NoteKind::Folder => "folder",
        }
    }
}

/// A view or folder in a specific database.
///
/// Callers resolve the database path themselves and pass it in; nothing is
/// derived from process-wide session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewTarget {
    /// Web path of the database, e.g. `/apps/sales.nsf/`
    pub db_path: String,
    pub view_name: String,
    pub kind: NoteKind,
    /// Base URL of the design export agent
    pub exporter_url: String,
    /// Extra query parameters appended to every entry request
    pub base_params: Vec<(String, String)>,
}

impl Default for ViewTarget {
    fn default() -> Self {
        Self {
            db_path: "/".to_string(),
            view_name: String::new(),
            kind: NoteKind::View,
            exporter_url: "/extnd/extnd.nsf/".to_string(),
            base_params: Vec::new(),
        }
    }
}

impl ViewTarget {
    pub fn new(db_path: impl Into<String>, view_name: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            view_name: view_name.into(),
            ..Self::default()
        }
    }

    pub fn folder(mut self) -> Self {
        self.kind = NoteKind::Folder;
        self
    }

    /// URL of the view itself
    pub fn view_url(&self) -> String {
        let base = if self.db_path.ends_with('/') {
            self.db_path.clone()
        } else {
            format!("{}/", self.db_path)
        };
        format!("{base}{}", encode(&self.view_name))
    }

    /// URL returning the design document of the view
    pub fn design_url(&self) -> String {
        format!(
            "{}DXLExporter?OpenAgent&db={}&type={}&name={}",
            self.exporter_url,
            encode(&self.db_path),
            self.kind.as_str(),
            encode(&self.view_name)
        )
    }

    /// URL returning one window of entries for `request`
    pub fn entries_url(&self, request: &FetchRequest, single_category: Option<&str>) -> String {
        let mut url = format!("{}?ReadViewEntries&count={}", self.view_url(), request.count);

        if let Some(start) = &request.start {
            url.push_str(&format!("&start={start}"));
        }
        if let Some(category) = single_category {
            url.push_str(&format!("&RestrictToCategory={}", encode(category)));
        }
        if let Some(sort) = &request.sort {
            let param = if sort.descending { "ResortDescending" } else { "ResortAscending" };
            url.push_str(&format!("&{param}={}", sort.column_order));
        }
        for (name, value) in &self.base_params {
            url.push_str(&format!("&{}={}", encode(name), encode(value)));
        }

        url
    }
}

/// Everything outside the unreserved set and `/` is escaped
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nv_core::{PositionKey, SortRequest};

    #[test]
    fn test_design_url() {
        let target = ViewTarget::new("/apps/sales.nsf/", "By Region").folder();
        assert_eq!(
            target.design_url(),
            "/extnd/extnd.nsf/DXLExporter?OpenAgent&db=/apps/sales.nsf/&type=folder&name=By%20Region"
        );
    }

    #[test]
    fn test_entries_url_parameters() {
        let mut target = ViewTarget::new("/apps/sales.nsf", "Orders");
        target.base_params.push(("collapseview".to_string(), "1".to_string()));

        let mut request = FetchRequest::at(PositionKey::parse("2.3").unwrap(), 25);
        request.sort = Some(SortRequest { column_order: 2, descending: true });

        assert_eq!(
            target.entries_url(&request, Some("East & West")),
            "/apps/sales.nsf/Orders?ReadViewEntries&count=25&start=2.3\
             &RestrictToCategory=East%20%26%20West&ResortDescending=2&collapseview=1"
        );
    }

    #[test]
    fn test_encode_escapes_non_ascii_and_reserved() {
        assert_eq!(encode("Région/Q1 ~a-b_c.d"), "R%C3%A9gion/Q1%20~a-b_c.d");
        assert_eq!(encode("a+b&c=d?"), "a%2Bb%26c%3Dd%3F");
    }

    #[test]
    fn test_entries_url_without_start() {
        let target = ViewTarget::new("/db.nsf/", "All");
        let request = FetchRequest { start: None, count: 10, sort: None };
        assert_eq!(target.entries_url(&request, None), "/db.nsf/All?ReadViewEntries&count=10");
    }
}
