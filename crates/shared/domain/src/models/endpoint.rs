use crate::grid::GridRow;
use chrono::{DateTime, Utc};
use ctn_derive::api_model;
use strum::{Display, EnumIter, EnumString};

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EndpointType {
    #[default]
    RestApi,
    Webhook,
    EventStream,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DataCategory {
    Container,
    Customs,
    Warehouse,
    Transport,
    #[default]
    Other,
}

crate::grid_cell_display!(EndpointType, DataCategory);

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq, GridRow)]
#[grid(id = "endpoint_id")]
pub struct Endpoint {
    pub endpoint_id: String,
    pub legal_entity_id: String,
    #[grid(label = "Name", sortable)]
    pub endpoint_name: String,
    #[grid(label = "URL", sortable)]
    pub endpoint_url: String,
    #[grid(label = "Type", sortable)]
    pub endpoint_type: EndpointType,
    #[grid(label = "Category", sortable)]
    pub data_category: DataCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[grid(label = "Active", sortable)]
    pub is_active: bool,
    #[grid(label = "Created", sortable)]
    pub created_at: DateTime<Utc>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointPayload {
    pub endpoint_name: String,
    pub endpoint_url: String,
    #[serde(default)]
    pub endpoint_type: EndpointType,
    #[serde(default)]
    pub data_category: DataCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

const fn active_by_default() -> bool {
    true
}

impl Default for EndpointPayload {
    fn default() -> Self {
        Self {
            endpoint_name: String::new(),
            endpoint_url: String::new(),
            endpoint_type: EndpointType::default(),
            data_category: DataCategory::default(),
            description: None,
            is_active: true,
        }
    }
}
