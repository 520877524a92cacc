/// Options that control which catalog objects are discovered.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    pub include_system_schemas: bool,
    pub include_views: bool,
    pub include_comments: bool,
    pub schemas: Option<Vec<String>>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            include_system_schemas: false,
            include_views: true,
            include_comments: true,
            schemas: None,
        }
    }
}

/// Options for column enrichment queries.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Maximum number of distinct values sampled per column.
    pub sample_limit: i64,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self { sample_limit: 50 }
    }
}
