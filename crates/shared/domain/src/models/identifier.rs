use crate::grid::GridRow;
use chrono::{DateTime, Utc};
use ctn_derive::api_model;
use strum::{Display, EnumIter, EnumString};

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ValidationStatus {
    #[default]
    Pending,
    Valid,
    Invalid,
    Expired,
}

crate::grid_cell_display!(ValidationStatus);

/// Legal identifier (KVK, LEI, EORI, ...) registered for a legal entity.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq, GridRow)]
#[grid(id = "identifier_id")]
pub struct LegalEntityIdentifier {
    pub identifier_id: String,
    pub legal_entity_id: String,
    #[grid(label = "Country", sortable)]
    #[serde(default)]
    pub country_code: Option<String>,
    #[grid(label = "Type", sortable)]
    pub identifier_type: String,
    #[grid(label = "Value", sortable)]
    pub identifier_value: String,
    #[grid(label = "Registry", sortable)]
    #[serde(default)]
    pub registry_name: Option<String>,
    #[serde(default)]
    pub registry_url: Option<String>,
    #[grid(label = "Status", sortable)]
    pub validation_status: ValidationStatus,
    #[serde(default)]
    pub verification_notes: Option<String>,
    #[grid(label = "Created", sortable)]
    pub created_at: DateTime<Utc>,
}

/// Create/update body for an identifier. Values arrive already normalized by the form.
#[api_model]
#[derive(Clone, PartialEq, Eq, Default)]
pub struct IdentifierPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    pub identifier_type: String,
    pub identifier_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_status: Option<ValidationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_notes: Option<String>,
}
