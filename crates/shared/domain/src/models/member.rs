use crate::grid::GridRow;
use chrono::{DateTime, Utc};
use ctn_derive::api_model;
use strum::{Display, EnumIter, EnumString};

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MemberStatus {
    Active,
    #[default]
    Pending,
    Suspended,
    Terminated,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MembershipLevel {
    #[default]
    Basic,
    Full,
    Premium,
}

crate::grid_cell_display!(MemberStatus, MembershipLevel);

/// Association member as listed in the members grid.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, GridRow)]
#[grid(id = "member_id")]
pub struct Member {
    pub member_id: String,
    pub legal_entity_id: String,
    #[grid(label = "Legal name", sortable)]
    pub legal_name: String,
    #[grid(label = "Org ID", sortable)]
    pub org_id: String,
    #[grid(label = "Domain", sortable)]
    pub domain: String,
    #[grid(label = "Country", sortable)]
    pub country_code: String,
    #[grid(label = "Status", sortable)]
    pub status: MemberStatus,
    #[grid(label = "Level", sortable)]
    pub membership_level: MembershipLevel,
    #[grid(label = "Created", sortable)]
    pub created_at: DateTime<Utc>,
}

/// Registered legal entity behind a member.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq)]
pub struct LegalEntity {
    pub legal_entity_id: String,
    pub primary_legal_name: String,
    #[serde(default)]
    pub address_line: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub country_code: String,
    #[serde(default)]
    pub entity_legal_form: Option<String>,
    pub status: MemberStatus,
    pub registered_at: DateTime<Utc>,
}

/// Creates a member together with its legal entity.
#[api_model]
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CreateMember {
    pub legal_name: String,
    pub org_id: String,
    pub domain: String,
    pub country_code: String,
    #[serde(default)]
    pub membership_level: MembershipLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_legal_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Partial member update; absent fields are left unchanged.
#[api_model]
#[derive(Clone, PartialEq, Eq, Default)]
pub struct UpdateMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_level: Option<MembershipLevel>,
}

impl UpdateMember {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.legal_name.is_none()
            && self.domain.is_none()
            && self.status.is_none()
            && self.membership_level.is_none()
    }
}

/// Partial legal entity update; absent fields are left unchanged.
#[api_model]
#[derive(Clone, PartialEq, Eq, Default)]
pub struct UpdateLegalEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_legal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_legal_form: Option<String>,
}

impl UpdateLegalEntity {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.primary_legal_name.is_none()
            && self.address_line.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.country_code.is_none()
            && self.entity_legal_form.is_none()
    }
}
