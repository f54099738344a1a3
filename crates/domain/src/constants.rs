//! Domain constants
//!
//! Centralized location for defaults and remote endpoint paths.

// Client defaults
pub const DEFAULT_BASE_URL: &str = "https://public.whistic.com/api/external/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_WORKERS: usize = 5;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 5;

// Pagination
pub const PAGE_ITEMS_FIELD: &str = "items";
pub const PAGE_NEXT_FIELD: &str = "nextPage";
pub const PAGE_CURSOR_PARAM: &str = "page";

// Records
pub const IDENTIFIER_FIELD: &str = "identifier";
pub const DOMAIN_FIELD: &str = "domain";

// Endpoints
pub const VENDORS_PATH: &str = "/vendors";
pub const INTAKE_FORM_PATH: &str = "/questionnaireVersions/vendorIntake";
pub const INTAKE_FORM_EXPAND: &str = "sections.controls.questions";

// Intake form
pub const UNKNOWN_SECTION: &str = "Unknown Section";
pub const VENDOR_URL_QUESTION: &str = "Vendor URL";
pub const FIELD_KEY_SEPARATOR: char = ':';
