//! Backend view data source

use std::sync::Arc;

use async_trait::async_trait;
use nv_core::{FetchRequest, PageWindow, ViewDataSource};
use tracing::{debug, info};

use super::Transport;
use crate::config::{ViewSchemaOptions, ViewTarget};
use crate::design::{SchemaBuilder, ViewSchema};
use crate::reader::EntryReader;
use crate::DataError;

/// Fetch the design document of `target` and build its schema
pub async fn load_design(
    transport: &dyn Transport,
    target: &ViewTarget,
    options: &ViewSchemaOptions,
) -> Result<ViewSchema, DataError> {
    let url = target.design_url();
    debug!(%url, "loading view design");

    let document = transport
        .get(&url)
        .await
        .map_err(|e| DataError::Transport(format!("{e:#}")))?;

    Ok(SchemaBuilder::new(options.clone()).build(&document)?)
}

/// Reads entry windows of a view through a caller-supplied [`Transport`]
pub struct RemoteViewSource {
    transport: Arc<dyn Transport>,
    target: ViewTarget,
    reader: EntryReader,
    single_category: Option<String>,
}

impl RemoteViewSource {
    /// Create a source for a view whose schema is already known
    pub fn new(
        transport: Arc<dyn Transport>,
        target: ViewTarget,
        schema: Arc<ViewSchema>,
        single_category: Option<String>,
    ) -> Self {
        Self {
            transport,
            target,
            reader: EntryReader::new(schema),
            single_category,
        }
    }

    /// Load the view design, then create a source bound to the resulting schema
    pub async fn connect(
        transport: Arc<dyn Transport>,
        target: ViewTarget,
        options: ViewSchemaOptions,
    ) -> Result<Self, DataError> {
        let schema = load_design(transport.as_ref(), &target, &options).await?;
        info!(view = %target.view_name, columns = schema.columns().len(), "connected to view");
        Ok(Self::new(transport, target, Arc::new(schema), options.single_category))
    }

    pub fn schema(&self) -> &Arc<ViewSchema> {
        self.reader.schema()
    }

    pub fn target(&self) -> &ViewTarget {
        &self.target
    }
}

#[async_trait]
impl ViewDataSource for RemoteViewSource {
    async fn fetch(&self, request: &FetchRequest) -> anyhow::Result<PageWindow> {
        let url = self.target.entries_url(request, self.single_category.as_deref());
        debug!(%url, "reading view entries");

        let document = self
            .transport
            .get(&url)
            .await
            .map_err(|e| DataError::Transport(format!("{e:#}")))?;

        Ok(self.reader.read_window(&document, request)?)
    }

    fn source_name(&self) -> &str {
        &self.target.view_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nv_core::{PositionKey, SortRequest};
    use parking_lot::Mutex;

    const DESIGN: &str = r#"<database><view name="Orders" allowdocselection="true">
        <column itemname="Region" categorized="true"/>
        <column itemname="Customer" resort="ascending"/>
    </view></database>"#;

    const ENTRIES: &str = r#"<viewentries toplevelentries="1">
        <viewentry position="1.1"><entrydata columnnumber="0"><text>Acme</text></entrydata></viewentry>
    </viewentries>"#;

    /// Answers design and entry URLs with fixed documents and records every URL
    struct FixtureTransport {
        urls: Mutex<Vec<String>>,
        fail_entries: bool,
    }

    impl FixtureTransport {
        fn new() -> Self {
            Self { urls: Mutex::new(Vec::new()), fail_entries: false }
        }
    }

    #[async_trait]
    impl Transport for FixtureTransport {
        async fn get(&self, url: &str) -> anyhow::Result<String> {
            self.urls.lock().push(url.to_string());
            if url.contains("DXLExporter") {
                Ok(DESIGN.to_string())
            } else if self.fail_entries {
                anyhow::bail!("503 service unavailable")
            } else {
                Ok(ENTRIES.to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_connect_restricted_to_category() {
        let transport = Arc::new(FixtureTransport::new());
        let target = ViewTarget::new("/sales.nsf/", "Orders");
        let options = ViewSchemaOptions::default().with_single_category("East");

        let source = RemoteViewSource::connect(transport.clone(), target, options).await.unwrap();
        assert_eq!(source.schema().columns().len(), 1);
        assert_eq!(source.schema().columns()[0].name, "Customer");

        let mut request = FetchRequest::at(PositionKey::first(), 20);
        request.sort = Some(SortRequest { column_order: 0, descending: false });
        let window = source.fetch(&request).await.unwrap();

        assert_eq!(window.len(), 1);
        assert_eq!(window.entries[0].field("Customer").map(|v| v.to_string()).as_deref(), Some("Acme"));
        assert_eq!(
            transport.urls.lock().last().cloned().unwrap(),
            "/sales.nsf/Orders?ReadViewEntries&count=20&start=1&RestrictToCategory=East&ResortAscending=0"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let transport = Arc::new(FixtureTransport { urls: Mutex::new(Vec::new()), fail_entries: true });
        let source = RemoteViewSource::connect(transport, ViewTarget::new("/db.nsf", "Orders"), ViewSchemaOptions::default())
            .await
            .unwrap();

        let err = source.fetch(&FetchRequest::at(PositionKey::first(), 5)).await.unwrap_err();
        assert!(format!("{err:#}").contains("503"));
    }

    #[tokio::test]
    async fn test_design_parse_failure() {
        struct LoginPage;

        #[async_trait]
        impl Transport for LoginPage {
            async fn get(&self, _url: &str) -> anyhow::Result<String> {
                Ok("<html><body>Please log in</body></html>".to_string())
            }
        }

        let err = load_design(&LoginPage, &ViewTarget::new("/db.nsf", "Orders"), &ViewSchemaOptions::default())
            .await
            .unwrap_err();
        match err {
            DataError::DesignParse(e) => assert!(e.raw.contains("Please log in")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
