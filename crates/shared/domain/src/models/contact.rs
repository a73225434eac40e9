use crate::grid::GridRow;
use ctn_derive::api_model;
use strum::{Display, EnumIter, EnumString};

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ContactType {
    #[default]
    Primary,
    Technical,
    Billing,
    Support,
}

crate::grid_cell_display!(ContactType);

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq, GridRow)]
#[grid(id = "contact_id")]
pub struct LegalEntityContact {
    pub contact_id: String,
    pub legal_entity_id: String,
    #[grid(label = "Type", sortable)]
    pub contact_type: ContactType,
    #[grid(label = "Name", sortable)]
    pub full_name: String,
    #[grid(label = "Email", sortable)]
    pub email: String,
    #[grid(label = "Phone")]
    #[serde(default)]
    pub phone: Option<String>,
    #[grid(label = "Job title", sortable)]
    #[serde(default)]
    pub job_title: Option<String>,
    #[grid(label = "Primary", sortable)]
    #[serde(default)]
    pub is_primary: bool,
}

#[api_model]
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ContactPayload {
    #[serde(default)]
    pub contact_type: ContactType,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}
