//! Design document parsing
//!
//! A design document describes the columns of one view or folder. The
//! [`SchemaBuilder`] walks its `column` elements in order and produces a
//! [`ViewSchema`]: the retained columns, the record field mapping and a few
//! view-level flags.

mod column;
mod schema;

pub use column::{
    Alignment, ColumnSpec, DateTimeFormat, ListSeparator, SortDirection, MIN_COLUMN_WIDTH,
    PIXELS_PER_INCH,
};
pub use schema::{FieldMapping, ViewSchema};

use ahash::AHashSet;
use roxmltree::{Document, Node};
use tracing::{debug, info};

use crate::config::ViewSchemaOptions;
use crate::xml;
use crate::DesignParseError;

/// Builds a [`ViewSchema`] from a design document
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    options: ViewSchemaOptions,
}

impl SchemaBuilder {
    pub fn new(options: ViewSchemaOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ViewSchemaOptions {
        &self.options
    }

    /// Parse `document` into a schema.
    ///
    /// Fails without producing any schema when the text is not XML or holds
    /// no `view`/`folder` element.
    pub fn build(&self, document: &str) -> Result<ViewSchema, DesignParseError> {
        let doc = Document::parse(document)
            .map_err(|e| DesignParseError::new(format!("malformed design document: {e}"), document))?;

        let root = xml::find_first(doc.root(), &["view", "folder"])
            .ok_or_else(|| DesignParseError::new("no view or folder element found", document))?;
        let is_folder_variant = root.tag_name().name() == "folder";

        let mut columns = Vec::new();
        let mut names = AHashSet::new();
        let mut is_categorized = false;
        let mut order = 0usize;

        for (index, column) in root
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "column")
            .enumerate()
        {
            let categorized = xml::flag(column, "categorized");
            is_categorized |= categorized;

            // The backend only restricts to a category when the first column
            // is the categorized one, and that column must not show as data
            if index == 0 && categorized && self.options.single_category.is_some() {
                debug!("skipping leading category column for single-category restriction");
                continue;
            }

            if xml::flag(column, "hidden") {
                continue;
            }

            let mut spec = self.column_spec(column, order, categorized);
            if !names.insert(spec.name.clone()) {
                spec.name = format!("{}_{order}", spec.name);
                names.insert(spec.name.clone());
            }
            columns.push(spec);
            order += 1;
        }

        let auto_expand_column_order = match self.options.force_extend_last_column {
            Some(false) => None,
            Some(true) => columns.last().map(|c| c.order),
            None if xml::flag(root, "extendlastcolumn") => columns.last().map(|c| c.order),
            None => None,
        };

        let schema = ViewSchema::new(
            xml::attr(root, "name").map(str::to_string),
            columns,
            is_categorized,
            is_folder_variant,
            auto_expand_column_order,
            xml::flag(root, "allowdocselection"),
        );

        info!(
            view = schema.view_name().unwrap_or(""),
            columns = schema.columns().len(),
            categorized = schema.is_categorized(),
            folder = schema.is_folder_variant(),
            "built view schema"
        );

        Ok(schema)
    }

    fn column_spec(&self, column: Node<'_, '_>, order: usize, categorized: bool) -> ColumnSpec {
        let name = xml::attr(column, "itemname")
            .map(ColumnSpec::normalize_name)
            .unwrap_or_else(|| ColumnSpec::synthesized_name(order));

        let header = xml::child(column, "columnheader");
        let title = header
            .and_then(|h| h.attribute("title"))
            .unwrap_or_default()
            .to_string();

        let width = ColumnSpec::width_from_inches(xml::number::<f32>(column, "width").unwrap_or(0.0));

        let sort_direction = match xml::attr(column, "resort") {
            Some("ascending") => SortDirection::Ascending,
            Some("descending") => SortDirection::Descending,
            Some("both") => SortDirection::Both,
            Some("toview") => SortDirection::JumpToView(
                xml::attr(column, "resorttoview").unwrap_or_default().to_string(),
            ),
            _ => SortDirection::None,
        };
        let sortable = self.options.local_sort_only
            || sort_direction.allows_ascending()
            || sort_direction.allows_descending();

        let date_time_format = xml::child(column, "datetimeformat").map(|f| DateTimeFormat {
            show: xml::attr(f, "show").map(str::to_string),
            date: xml::attr(f, "date").map(str::to_string),
            time: xml::attr(f, "time").map(str::to_string),
            zone: xml::attr(f, "zone").map(str::to_string),
        });

        ColumnSpec {
            name,
            title,
            order,
            width,
            align: Alignment::parse(xml::attr(column, "align")),
            header_align: Alignment::parse(header.and_then(|h| xml::attr(h, "align"))),
            sortable,
            sort_direction,
            is_category_column: categorized,
            is_hidden: false,
            shows_as_icon: xml::flag(column, "showasicons"),
            allows_response_only: xml::flag(column, "responsesonly"),
            twisties: xml::flag(column, "twisties"),
            resizable: xml::flag(column, "resizable"),
            list_separator: ListSeparator::parse(xml::attr(column, "listseparator")),
            date_time_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS_VIEW: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<database xmlns="http://www.lotus.com/dxl">
  <view name="Orders\By Region" extendlastcolumn="true" allowdocselection="true">
    <column itemname="Region" width="1" categorized="true" twisties="true" resort="ascending">
      <columnheader title="Region"/>
    </column>
    <column itemname="$Ref" width="2" hidden="true">
      <columnheader title="Ref"/>
    </column>
    <column itemname="Customer" width="2.5" resort="both" align="center" resizable="true">
      <columnheader title="Customer" align="right"/>
    </column>
    <column itemname="$Total" width="0" listseparator="comma" showasicons="true">
      <columnheader title="Total"/>
    </column>
    <column width="1.5" resort="toview" resorttoview="OrdersByDate" responsesonly="true">
      <columnheader title="Date"/>
      <datetimeformat show="datetime" date="yearmonthday" time="hourminute" zone="never"/>
    </column>
  </view>
</database>"#;

    fn build(options: ViewSchemaOptions, doc: &str) -> ViewSchema {
        SchemaBuilder::new(options).build(doc).unwrap()
    }

    #[test]
    fn test_columns_numbered_in_order_without_hidden() {
        let schema = build(ViewSchemaOptions::default(), ORDERS_VIEW);
        let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        let orders: Vec<usize> = schema.columns().iter().map(|c| c.order).collect();

        assert_eq!(names, vec!["Region", "Customer", "_Total", "columnnumber_3"]);
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert!(schema.is_categorized());
        assert!(!schema.is_folder_variant());
        assert!(schema.allows_row_selection());
        assert_eq!(schema.view_name(), Some(r"Orders\By Region"));
    }

    #[test]
    fn test_single_category_drops_leading_category_column() {
        let doc = r#"<view>
            <column itemname="Cat" categorized="true"/>
            <column itemname="Secret" hidden="true"/>
            <column itemname="Data"/>
        </view>"#;
        let schema = build(ViewSchemaOptions::default().with_single_category("East"), doc);

        assert_eq!(schema.columns().len(), 1);
        assert_eq!(schema.columns()[0].name, "Data");
        assert_eq!(schema.columns()[0].order, 0);
        assert!(schema.is_categorized());
        assert_eq!(schema.field_for_column(0), Some("Data"));
    }

    #[test]
    fn test_category_column_kept_without_restriction() {
        let schema = build(ViewSchemaOptions::default(), ORDERS_VIEW);
        let region = schema.category_column().unwrap();
        assert_eq!(region.name, "Region");
        assert!(region.twisties);
    }

    #[test]
    fn test_column_attributes() {
        let schema = build(ViewSchemaOptions::default(), ORDERS_VIEW);

        let region = schema.column("Region").unwrap();
        assert_eq!(region.width, 22.0);
        assert_eq!(region.sort_direction, SortDirection::Ascending);
        assert!(region.sortable);

        let customer = schema.column("Customer").unwrap();
        assert!((customer.width - 28.2).abs() < 1e-3);
        assert_eq!(customer.align, Alignment::Center);
        assert_eq!(customer.header_align, Alignment::Right);
        assert_eq!(customer.sort_direction, SortDirection::Both);
        assert!(customer.resizable);

        let total = schema.column("_Total").unwrap();
        assert!(!total.sortable);
        assert!(total.shows_as_icon);
        assert_eq!(total.list_separator, ListSeparator::Comma);

        let date = schema.column("columnnumber_3").unwrap();
        assert_eq!(date.jump_target(), Some("OrdersByDate"));
        assert!(!date.sortable);
        assert!(date.allows_response_only);
        let format = date.date_time_format.as_ref().unwrap();
        assert_eq!(format.show.as_deref(), Some("datetime"));
        assert_eq!(format.zone.as_deref(), Some("never"));
        assert!(schema.column("Customer").unwrap().date_time_format.is_none());
    }

    #[test]
    fn test_local_sort_makes_every_column_sortable() {
        let schema = build(ViewSchemaOptions::default().with_local_sort(true), ORDERS_VIEW);
        assert!(schema.columns().iter().all(|c| c.sortable));
    }

    #[test]
    fn test_auto_expand_resolution() {
        let from_doc = build(ViewSchemaOptions::default(), ORDERS_VIEW);
        assert_eq!(from_doc.auto_expand_column_order(), Some(3));

        let forced_off = build(
            ViewSchemaOptions::default().with_extend_last_column(Some(false)),
            ORDERS_VIEW,
        );
        assert_eq!(forced_off.auto_expand_column_order(), None);

        let plain = r#"<folder><column itemname="A"/><column itemname="B"/></folder>"#;
        assert_eq!(build(ViewSchemaOptions::default(), plain).auto_expand_column_order(), None);
        let forced_on = build(ViewSchemaOptions::default().with_extend_last_column(Some(true)), plain);
        assert_eq!(forced_on.auto_expand_column_order(), Some(1));
        assert!(forced_on.is_folder_variant());
    }

    #[test]
    fn test_duplicate_item_names_are_made_unique() {
        let doc = r#"<view><column itemname="A"/><column itemname="A"/></view>"#;
        let schema = build(ViewSchemaOptions::default(), doc);
        let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "A_1"]);
    }

    #[test]
    fn test_field_mapping_follows_columns() {
        let schema = build(ViewSchemaOptions::default(), ORDERS_VIEW);
        assert_eq!(schema.field_mapping(), ViewSchema::mapping_for(schema.columns()).as_slice());
        assert_eq!(schema.field_mapping()[2].name, "_Total");
        assert_eq!(schema.field_mapping()[2].column_order, 2);
    }

    #[test]
    fn test_empty_view_has_no_columns() {
        let schema = build(ViewSchemaOptions::default().with_extend_last_column(Some(true)), "<view/>");
        assert!(schema.columns().is_empty());
        assert_eq!(schema.auto_expand_column_order(), None);
        assert!(!schema.is_categorized());
    }

    #[test]
    fn test_parse_errors_keep_raw_response() {
        let err = SchemaBuilder::default().build("<html><body>Login</body></html>").unwrap_err();
        assert_eq!(err.raw, "<html><body>Login</body></html>");

        let err = SchemaBuilder::default().build("<view><column></view>").unwrap_err();
        assert!(err.reason.contains("malformed"));
    }
}
