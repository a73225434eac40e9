//! Identifiers feature slice: identifier CRUD per legal entity, driven by the validated
//! [`form::IdentifierForm`].

pub mod catalog;
mod error;
pub mod form;

pub use error::{IdentifiersError, IdentifiersErrorExt};

use ctn_kernel::client::ApiClient;
use ctn_kernel::domain::models::LegalEntityIdentifier;
use ctn_kernel::domain::registry::InitializedSlice;
use ctn_kernel::notify::Notifier;
use form::IdentifierForm;
use tracing::info;

/// Identifiers feature state.
#[ctn_derive::ctn_slice]
pub struct Identifiers {
    client: ApiClient,
    notifier: Notifier,
}

/// Initialize the identifiers feature.
#[must_use]
pub fn init(client: ApiClient, notifier: Notifier) -> InitializedSlice {
    info!("Identifiers slice initialized");
    InitializedSlice::new(Identifiers::new(IdentifiersInner { client, notifier }))
}

impl Identifiers {
    pub async fn list(&self, legal_entity_id: &str) -> Result<Vec<LegalEntityIdentifier>, IdentifiersError> {
        Ok(self.client.get(&format!("/legal-entities/{legal_entity_id}/identifiers")).await?)
    }

    pub async fn create(
        &self,
        legal_entity_id: &str,
        form: &IdentifierForm,
    ) -> Result<LegalEntityIdentifier, IdentifiersError> {
        let payload = form.to_payload()?;
        let created: LegalEntityIdentifier = self
            .client
            .post(&format!("/legal-entities/{legal_entity_id}/identifiers"), &payload)
            .await?;

        info!(legal_entity_id, identifier_type = %created.identifier_type, "Identifier created");
        self.notifier
            .success(format!("{} {} added", created.identifier_type, created.identifier_value));
        Ok(created)
    }

    pub async fn update(
        &self,
        identifier_id: &str,
        form: &IdentifierForm,
    ) -> Result<LegalEntityIdentifier, IdentifiersError> {
        let payload = form.to_payload()?;
        let updated: LegalEntityIdentifier =
            self.client.put(&format!("/identifiers/{identifier_id}"), &payload).await?;

        info!(identifier_id, "Identifier updated");
        self.notifier.success(format!("{} updated", updated.identifier_type));
        Ok(updated)
    }

    pub async fn delete(&self, identifier_id: &str) -> Result<(), IdentifiersError> {
        self.client.delete(&format!("/identifiers/{identifier_id}")).await?;

        info!(identifier_id, "Identifier deleted");
        self.notifier.success("Identifier deleted");
        Ok(())
    }
}
