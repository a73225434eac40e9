use crate::grid::GridRow;
use chrono::{DateTime, Utc};
use ctn_derive::api_model;
use strum::{Display, EnumIter, EnumString};

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Issue,
    Revoke,
    Upload,
    Review,
}

crate::grid_cell_display!(AuditAction);

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq, GridRow)]
#[grid(id = "audit_id")]
pub struct AuditLog {
    pub audit_id: String,
    #[grid(label = "When", sortable)]
    pub occurred_at: DateTime<Utc>,
    #[grid(label = "Actor", sortable)]
    pub actor: String,
    #[grid(label = "Action", sortable)]
    pub action: AuditAction,
    #[grid(label = "Resource", sortable)]
    pub resource_type: String,
    #[grid(label = "Resource ID")]
    pub resource_id: String,
    #[grid(label = "Summary")]
    pub summary: String,
}

/// Audit log filters and server-side pagination (query string).
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct AuditQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AuditAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

const fn first_page() -> u32 {
    1
}

#[allow(clippy::cast_possible_truncation)]
const fn default_page_size() -> u32 {
    crate::constants::DEFAULT_PAGE_SIZE as u32
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self { action: None, resource_type: None, actor: None, page: first_page(), page_size: default_page_size() }
    }
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq)]
pub struct AuditPage {
    pub data: Vec<AuditLog>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl AuditPage {
    #[must_use]
    pub fn page_count(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        u32::try_from(self.total.div_ceil(size).max(1)).unwrap_or(u32::MAX)
    }
}
