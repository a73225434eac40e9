//! Audit feature slice: read-only, server-paginated audit log.
mod error;

pub use crate::error::{AuditError, AuditErrorExt};

use ctn_kernel::client::ApiClient;
use ctn_kernel::domain::constants::PAGE_SIZE_OPTIONS;
use ctn_kernel::domain::models::{AuditPage, AuditQuery};
use ctn_kernel::domain::registry::InitializedSlice;
use tracing::{debug, info};

/// Audit feature inner state.
#[ctn_derive::ctn_slice]
pub struct Audit {
    client: ApiClient,
}

/// Initialize the audit feature.
#[must_use]
pub fn init(client: ApiClient) -> InitializedSlice {
    info!("Audit slice initialized");
    InitializedSlice::new(Audit::new(AuditInner { client }))
}

/// Drops blank filters and rejects pages below 1 or sizes outside the grid options.
///
/// # Errors
/// [`AuditError::InvalidQuery`].
pub fn normalize_query(query: &AuditQuery) -> Result<AuditQuery, AuditError> {
    if query.page == 0 {
        return Err(AuditError::InvalidQuery { message: "page starts at 1".into(), context: None });
    }
    let size = usize::try_from(query.page_size).unwrap_or(usize::MAX);
    if !PAGE_SIZE_OPTIONS.contains(&size) {
        return Err(AuditError::InvalidQuery {
            message: format!("page size {} is not one of {PAGE_SIZE_OPTIONS:?}", query.page_size).into(),
            context: None,
        });
    }

    let filter = |v: &Option<String>| v.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned);
    Ok(AuditQuery {
        action: query.action,
        resource_type: filter(&query.resource_type),
        actor: filter(&query.actor),
        page: query.page,
        page_size: query.page_size,
    })
}

impl Audit {
    pub async fn list(&self, query: &AuditQuery) -> Result<AuditPage, AuditError> {
        let query = normalize_query(query)?;
        let page: AuditPage = self.client.get_query("/audit-logs", &query).await?;
        debug!(total = page.total, page = page.page, "Audit page loaded");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        let query = AuditQuery { actor: Some("  ".into()), resource_type: Some(" member ".into()), ..AuditQuery::default() };
        let normalized = normalize_query(&query).expect("valid");
        assert_eq!(normalized.actor, None);
        assert_eq!(normalized.resource_type.as_deref(), Some("member"));
    }

    #[test]
    fn paging_is_checked() {
        assert!(normalize_query(&AuditQuery { page: 0, ..AuditQuery::default() }).is_err());
        assert!(normalize_query(&AuditQuery { page_size: 15, ..AuditQuery::default() }).is_err());
        assert!(normalize_query(&AuditQuery { page_size: 50, page: 3, ..AuditQuery::default() }).is_ok());
    }
}
