//! Entry stream reader
//!
//! Turns a `viewentries` document into a [`PageWindow`], naming each value
//! through the schema's field mapping.

mod datetime;

pub use datetime::parse_datetime;

use std::sync::Arc;

use ahash::AHashMap;
use indexmap::IndexMap;
use nv_core::{Entry, EntryMeta, FetchRequest, FieldValue, PageWindow, PositionKey};
use roxmltree::{Document, Node};
use tracing::warn;

use crate::design::{ColumnSpec, ViewSchema};
use crate::{xml, DataError};

/// Reads entry documents for one schema
#[derive(Debug, Clone)]
pub struct EntryReader {
    schema: Arc<ViewSchema>,
    by_order: AHashMap<usize, String>,
}

impl EntryReader {
    pub fn new(schema: Arc<ViewSchema>) -> Self {
        let by_order = schema
            .field_mapping()
            .iter()
            .map(|m| (m.column_order, m.name.clone()))
            .collect();
        Self { schema, by_order }
    }

    pub fn schema(&self) -> &Arc<ViewSchema> {
        &self.schema
    }

    /// Parse a complete entry document into a window for `request`
    pub fn read_window(&self, document: &str, request: &FetchRequest) -> Result<PageWindow, DataError> {
        let (total_count, entries) = self.read_entries(document)?;
        Ok(PageWindow {
            entries,
            total_count,
            requested_start: request.start.clone(),
            requested_count: request.count,
            is_categorized: self.schema.is_categorized(),
        })
    }

    /// Parse every entry of a document, returning the declared total alongside
    pub fn read_entries(&self, document: &str) -> Result<(usize, Vec<Entry>), DataError> {
        let doc = Document::parse(document)
            .map_err(|e| DataError::EntryParse(format!("malformed entry document: {e}")))?;
        let root = xml::find_first(doc.root(), &["viewentries"])
            .ok_or_else(|| DataError::EntryParse("no viewentries element found".to_string()))?;

        let entries: Vec<Entry> = xml::children(root, "viewentry")
            .map(|node| self.read_entry(node))
            .collect();
        let total_count = xml::number::<usize>(root, "toplevelentries").unwrap_or(entries.len());

        Ok((total_count, entries))
    }

    fn read_entry(&self, node: Node<'_, '_>) -> Entry {
        let is_category_total = xml::flag(node, "categorytotal");
        let position = match xml::attr(node, "position") {
            Some(text) => match PositionKey::parse(text) {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!(position = text, error = %e, "entry excluded from paging boundaries");
                    None
                }
            },
            None => None,
        };

        let meta = EntryMeta {
            unid: xml::attr(node, "unid").map(str::to_string),
            note_id: xml::attr(node, "noteid").map(str::to_string),
            children: xml::number(node, "children").unwrap_or(0),
            descendants: xml::number(node, "descendants").unwrap_or(0),
            siblings: xml::number(node, "siblings").unwrap_or(0),
            is_response: xml::flag(node, "response"),
        };

        let mut fields = IndexMap::new();
        // values of hidden or excluded columns have no field and are dropped
        for data in xml::children(node, "entrydata") {
            if let Some(name) = self.field_name(data) {
                fields.insert(name.to_string(), read_value(data));
            }
        }

        Entry {
            position,
            fields,
            is_category_total,
            meta,
        }
    }

    fn field_name(&self, data: Node<'_, '_>) -> Option<&str> {
        if let Some(name) = xml::number::<usize>(data, "columnnumber").and_then(|n| self.by_order.get(&n)) {
            return Some(name.as_str());
        }
        let name = ColumnSpec::normalize_name(xml::attr(data, "name")?);
        self.schema.column(&name).map(|c| c.name.as_str())
    }
}

/// Read the typed value held by an `entrydata` element
fn read_value(data: Node<'_, '_>) -> FieldValue {
    data.children()
        .find(|n| n.is_element())
        .map_or(FieldValue::Empty, read_typed)
}

fn read_typed(node: Node<'_, '_>) -> FieldValue {
    let text = node.text().unwrap_or_default().trim();
    match node.tag_name().name() {
        "text" => FieldValue::Text(text.to_string()),
        "number" => match text.parse::<f64>() {
            Ok(n) => FieldValue::Number(n),
            Err(_) if text.is_empty() => FieldValue::Empty,
            Err(_) => FieldValue::Text(text.to_string()),
        },
        "datetime" => FieldValue::DateTime {
            raw: text.to_string(),
            parsed: parse_datetime(text),
        },
        "textlist" | "numberlist" | "datetimelist" => FieldValue::List(
            node.children()
                .filter(|n| n.is_element())
                .map(read_typed)
                .collect(),
        ),
        _ => FieldValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewSchemaOptions;
    use crate::design::SchemaBuilder;

    const DESIGN: &str = r#"<view>
        <column itemname="Region" categorized="true"/>
        <column itemname="$Hidden" hidden="true"/>
        <column itemname="Amount"/>
        <column itemname="Tags"/>
        <column itemname="Placed"/>
    </view>"#;

    const ENTRIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<viewentries timestamp="20240101T000000,00Z" toplevelentries="2">
  <viewentry position="1" noteid="8F2" children="2" descendants="2" siblings="2">
    <entrydata columnnumber="0" name="Region"><text>East</text></entrydata>
  </viewentry>
  <viewentry position="1.1" unid="AB12" noteid="90A" siblings="2">
    <entrydata columnnumber="1" name="Amount"><number>125.5</number></entrydata>
    <entrydata columnnumber="2" name="Tags"><textlist><text>new</text><text>rush</text></textlist></entrydata>
    <entrydata columnnumber="3" name="Placed"><datetime>20240115T101500,00-05</datetime></entrydata>
  </viewentry>
  <viewentry position="1.x" unid="CD34" response="true">
    <entrydata name="Amount"><number>3</number></entrydata>
  </viewentry>
  <viewentry categorytotal="true">
    <entrydata columnnumber="1" name="Amount"><number>128.5</number></entrydata>
  </viewentry>
</viewentries>"#;

    fn reader() -> EntryReader {
        let schema = SchemaBuilder::new(ViewSchemaOptions::default()).build(DESIGN).unwrap();
        EntryReader::new(Arc::new(schema))
    }

    #[test]
    fn test_reads_window_metadata() {
        let request = FetchRequest::at(PositionKey::first(), 4);
        let window = reader().read_window(ENTRIES, &request).unwrap();

        assert_eq!(window.total_count, 2);
        assert_eq!(window.len(), 4);
        assert!(window.is_categorized);
        assert_eq!(window.requested_start, Some(PositionKey::first()));
        assert_eq!(window.requested_count, 4);
    }

    #[test]
    fn test_maps_values_by_column_number() {
        let (_, entries) = reader().read_entries(ENTRIES).unwrap();

        assert_eq!(entries[0].field("Region"), Some(&FieldValue::Text("East".into())));
        assert_eq!(entries[0].meta.children, 2);

        let detail = &entries[1];
        assert_eq!(detail.meta.unid.as_deref(), Some("AB12"));
        assert_eq!(detail.field("Amount"), Some(&FieldValue::Number(125.5)));
        assert_eq!(
            detail.field("Tags"),
            Some(&FieldValue::List(vec![
                FieldValue::Text("new".into()),
                FieldValue::Text("rush".into())
            ]))
        );
        match detail.field("Placed") {
            Some(FieldValue::DateTime { parsed: Some(dt), .. }) => {
                assert_eq!(dt.to_rfc3339(), "2024-01-15T10:15:00-05:00")
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_bad_positions_and_totals_are_not_boundaries() {
        let request = FetchRequest::at(PositionKey::first(), 4);
        let window = reader().read_window(ENTRIES, &request).unwrap();

        let broken = &window.entries[2];
        assert!(broken.position.is_none());
        assert!(broken.meta.is_response);
        assert_eq!(broken.field("Amount"), Some(&FieldValue::Number(3.0)));

        assert!(window.entries[3].is_category_total);
        assert_eq!(window.last_boundary(), Some(&PositionKey::parse("1.1").unwrap()));
    }

    #[test]
    fn test_rejects_non_entry_documents() {
        assert!(matches!(reader().read_entries("<html/>"), Err(DataError::EntryParse(_))));
        assert!(matches!(reader().read_entries("<viewentries"), Err(DataError::EntryParse(_))));
    }

    #[test]
    fn test_malformed_datetime_keeps_raw_text() {
        let doc = r#"<viewentries><viewentry position="1">
            <entrydata columnnumber="3"><datetime>20240101T101500,9223372036854775807</datetime></entrydata>
        </viewentry></viewentries>"#;
        let (_, entries) = reader().read_entries(doc).unwrap();
        assert_eq!(
            entries[0].field("Placed"),
            Some(&FieldValue::DateTime {
                raw: "20240101T101500,9223372036854775807".to_string(),
                parsed: None,
            })
        );
    }

    #[test]
    fn test_missing_total_falls_back_to_entry_count() {
        let (total, entries) = reader()
            .read_entries(r#"<viewentries><viewentry position="1"/></viewentries>"#)
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(entries.len(), 1);
    }
}
