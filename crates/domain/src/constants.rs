//! SDK constants
//!
//! Centralized location for endpoint paths, storage keys and sentinel values
//! shared across crates.

// Server defaults
pub const DEFAULT_STITCH_SERVER_URL: &str = "https://stitch.mongodb.com";
pub const CLIENT_API_PREFIX: &str = "/api/client/v1.0/app";
pub const ADMIN_API_PREFIX: &str = "/admin/v1";
pub const JSON_CONTENT_TYPE: &str = "application/json";

// Endpoints (relative to the app-scoped base URL)
pub const AUTH_PATH: &str = "/auth";
pub const NEW_ACCESS_TOKEN_PATH: &str = "/auth/newAccessToken";
pub const PIPELINE_PATH: &str = "/pipeline";

// Server error codes
pub const INVALID_SESSION_CODE: &str = "InvalidSession";
pub const AUTH_PROVIDER_NOT_FOUND_CODE: &str = "AuthProviderNotFound";

/// Device id servers hand out when no device was registered.
pub const EMPTY_DEVICE_ID: &str = "000000000000000000000000";

// Token store keys (suffixes appended to the storage namespace)
pub const ACCESS_TOKEN_KEY: &str = "at";
pub const REFRESH_TOKEN_KEY: &str = "rt";
pub const USER_ID_KEY: &str = "uid";
pub const DEVICE_ID_KEY: &str = "did";
pub const STATE_KEY: &str = "state";
pub const AUTH_ERROR_KEY: &str = "error";
pub const IMPERSONATION_ACTIVE_KEY: &str = "impers_active";
pub const IMPERSONATION_USER_KEY: &str = "impers_user";
pub const IMPERSONATION_REAL_SESSION_KEY: &str = "impers_real_ua";

/// Every key the SDK may write, used by stores that cannot enumerate.
pub const SESSION_STORAGE_KEYS: &[&str] = &[
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_ID_KEY,
    DEVICE_ID_KEY,
    STATE_KEY,
    AUTH_ERROR_KEY,
    IMPERSONATION_ACTIVE_KEY,
    IMPERSONATION_USER_KEY,
    IMPERSONATION_REAL_SESSION_KEY,
];

// Pipeline response metadata
pub const WARNINGS_FIELD: &str = "warnings";
pub const METADATA_FIELD: &str = "_stitch_metadata";

// Auth timing
pub const DEFAULT_EXPIRY_MARGIN_SECS: i64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STORAGE_NAMESPACE: &str = "_stitch";
