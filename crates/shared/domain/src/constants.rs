//! Shared string and numeric constants.

/// Prefix of every register REST route.
pub const API_PREFIX: &str = "/api/v1";

/// Header naming the signed-in portal account; recorded as the audit actor.
pub const PORTAL_USER_HEADER: &str = "x-portal-user";

/// Bearer tokens with this prefix may read but not mutate.
pub const READONLY_TOKEN_PREFIX: &str = "readonly-";

pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Recent toasts kept by the notifier.
pub const NOTIFICATION_HISTORY: usize = 50;

/// Characters of a token secret exposed as its listing prefix.
pub const TOKEN_PREFIX_LEN: usize = 8;
pub const TOKEN_DEFAULT_DAYS: u32 = 90;
pub const TOKEN_MAX_DAYS: u32 = 365;

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const MEMBERS_TAG: &str = "Members";
pub const IDENTIFIERS_TAG: &str = "Identifiers";
pub const CONTACTS_TAG: &str = "Contacts";
pub const ENDPOINTS_TAG: &str = "Endpoints";
pub const TOKENS_TAG: &str = "Tokens";
pub const AUDIT_TAG: &str = "Audit";
pub const VERIFICATION_TAG: &str = "KvK verification";

// Grid ids (preference keys)
pub const MEMBERS_GRID: &str = "members";
pub const IDENTIFIERS_GRID: &str = "identifiers";
pub const CONTACTS_GRID: &str = "contacts";
pub const ENDPOINTS_GRID: &str = "endpoints";
pub const TOKENS_GRID: &str = "tokens";
pub const AUDIT_GRID: &str = "audit";
pub const FLAGGED_GRID: &str = "flagged";
