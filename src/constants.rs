//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Change aggregation constants
pub mod watch {
    /// Quiet period after the most recent file event before a batch is processed (seconds)
    pub const DEBOUNCE_SECS: u64 = 3;

    /// Upper bound on batch staleness under continuous low-rate churn (seconds)
    pub const FLUSH_INTERVAL_SECS: u64 = 30;

    /// Distinct changed paths at or above which a batch also runs AI enhancement
    pub const ENHANCE_THRESHOLD: usize = 3;

    /// Capacity of the file-event channel feeding the aggregator
    pub const EVENT_CHANNEL_CAPACITY: usize = 1024;
}

/// Enhancement constants
pub mod enhancer {
    /// Fixed wait before the single rate-limit retry (seconds)
    pub const RATE_LIMIT_BACKOFF_SECS: u64 = 30;

    /// Section heading the enhancer appends to the architecture overview.
    /// Everything above this heading is generator-owned and preserved verbatim.
    pub const AI_INSIGHTS_HEADING: &str = "## AI-Generated Insights";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}

/// Documentation tree layout
pub mod docs {
    /// Navigation manifest file name at the root of the docs tree
    pub const NAV_MANIFEST: &str = "docs.json";

    /// Per-module overview pages
    pub const MODULES_DIR: &str = "modules";

    /// Per-entity API reference pages, one subdirectory per module
    pub const API_REFERENCE_DIR: &str = "api-reference";

    /// Architecture pages (generator-owned, enhancer appends only)
    pub const ARCHITECTURE_DIR: &str = "architecture";

    /// Shared component pages
    pub const COMPONENTS_DIR: &str = "components";

    /// Name the synced type-declarations file gets inside the docs tree
    pub const SYNCED_TYPES_FILE: &str = "types.d.ts";
}
