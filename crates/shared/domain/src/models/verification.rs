use crate::grid::GridRow;
use chrono::{DateTime, Utc};
use ctn_derive::api_model;
use strum::{Display, EnumIter, EnumString};

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum VerificationStatus {
    #[default]
    Pending,
    Processing,
    Verified,
    Flagged,
    Failed,
}

impl VerificationStatus {
    /// Polling stops on these.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Flagged | Self::Failed)
    }
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

crate::grid_cell_display!(VerificationStatus, ReviewDecision);

/// Registry fields compared between what was entered and what the document states.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq, Default)]
pub struct KvkFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kvk_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl KvkFields {
    /// Field keys in comparison-table order, with their labels.
    pub const FIELDS: [(&'static str, &'static str); 4] = [
        ("kvkNumber", "KvK number"),
        ("companyName", "Company name"),
        ("legalForm", "Legal form"),
        ("city", "City"),
    ];

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "kvkNumber" => self.kvk_number.as_deref(),
            "companyName" => self.company_name.as_deref(),
            "legalForm" => self.legal_form.as_deref(),
            "city" => self.city.as_deref(),
            _ => None,
        }
    }

    /// Sets a field by key; returns `false` for unknown keys.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let slot = match key {
            "kvkNumber" => &mut self.kvk_number,
            "companyName" => &mut self.company_name,
            "legalForm" => &mut self.legal_form,
            "city" => &mut self.city,
            _ => return false,
        };
        *slot = Some(value.into());
        true
    }
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationReview {
    pub decision: ReviewDecision,
    #[serde(default)]
    pub notes: Option<String>,
    pub reviewed_by: String,
    pub reviewed_at: DateTime<Utc>,
}

/// Latest KvK document verification of a legal entity.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq, Eq, GridRow)]
#[grid(id = "verification_id")]
pub struct KvkVerification {
    pub verification_id: String,
    #[grid(label = "Legal entity", sortable)]
    pub legal_entity_id: String,
    #[grid(label = "Document", sortable)]
    pub document_name: String,
    #[grid(label = "Status", sortable)]
    pub status: VerificationStatus,
    #[grid(label = "Uploaded", sortable)]
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entered: KvkFields,
    #[serde(default)]
    pub extracted: Option<KvkFields>,
    #[grid(label = "Mismatches")]
    #[serde(default)]
    pub mismatches: Vec<String>,
    #[serde(default)]
    pub review: Option<VerificationReview>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
