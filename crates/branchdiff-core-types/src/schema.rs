//! Canonical schema constants for structured logging
//!
//! Every log line emitted through the logging facility uses these keys so
//! that JSON output from the CLI and embedding services can be queried
//! uniformly.

// Envelope
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Deployments and assets
pub const FIELD_BASE_DEPLOYMENT: &str = "base_deployment";
pub const FIELD_BRANCH_DEPLOYMENT: &str = "branch_deployment";
pub const FIELD_DEPLOYMENT: &str = "deployment";
pub const FIELD_ASSET_KEY: &str = "asset_key";

// Collection sizes
pub const FIELD_BASE_ASSETS: &str = "base_assets";
pub const FIELD_BRANCH_ASSETS: &str = "branch_assets";
pub const FIELD_CHANGED_ASSETS: &str = "changed_assets";
pub const FIELD_REMOVED_ASSETS: &str = "removed_assets";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
