//! Members feature slice: the members grid, member CRUD and the legal entity behind each member.

mod error;
pub mod form;

pub use error::{MembersError, MembersErrorExt};

use ctn_kernel::client::ApiClient;
use ctn_kernel::domain::models::{CreateMember, LegalEntity, Member, UpdateLegalEntity, UpdateMember};
use ctn_kernel::domain::registry::InitializedSlice;
use ctn_kernel::notify::Notifier;
use tracing::info;

/// Members feature state.
#[ctn_derive::ctn_slice]
pub struct Members {
    client: ApiClient,
    notifier: Notifier,
}

/// Initialize the members feature.
#[must_use]
pub fn init(client: ApiClient, notifier: Notifier) -> InitializedSlice {
    info!("Members slice initialized");
    InitializedSlice::new(Members::new(MembersInner { client, notifier }))
}

impl Members {
    pub async fn list(&self) -> Result<Vec<Member>, MembersError> {
        Ok(self.client.get("/members").await?)
    }

    pub async fn get(&self, member_id: &str) -> Result<Member, MembersError> {
        Ok(self.client.get(&format!("/members/{member_id}")).await?)
    }

    /// Creates the member and its legal entity.
    pub async fn create(&self, input: &CreateMember) -> Result<Member, MembersError> {
        let payload = form::validate_create(input)?;
        let member: Member = self.client.post("/members", &payload).await?;

        info!(member_id = %member.member_id, org_id = %member.org_id, "Member created");
        self.notifier.success(format!("Member {} created", member.legal_name));
        Ok(member)
    }

    pub async fn update(&self, member_id: &str, input: &UpdateMember) -> Result<Member, MembersError> {
        let payload = form::validate_update(input)?;
        let member: Member = self.client.put(&format!("/members/{member_id}"), &payload).await?;

        info!(member_id, "Member updated");
        self.notifier.success(format!("Member {} updated", member.legal_name));
        Ok(member)
    }

    pub async fn delete(&self, member_id: &str) -> Result<(), MembersError> {
        self.client.delete(&format!("/members/{member_id}")).await?;

        info!(member_id, "Member deleted");
        self.notifier.success("Member deleted");
        Ok(())
    }

    pub async fn legal_entity(&self, legal_entity_id: &str) -> Result<LegalEntity, MembersError> {
        Ok(self.client.get(&format!("/legal-entities/{legal_entity_id}")).await?)
    }

    pub async fn update_legal_entity(
        &self,
        legal_entity_id: &str,
        input: &UpdateLegalEntity,
    ) -> Result<LegalEntity, MembersError> {
        let payload = form::validate_legal_entity(input)?;
        let entity: LegalEntity =
            self.client.put(&format!("/legal-entities/{legal_entity_id}"), &payload).await?;

        info!(legal_entity_id, "Legal entity updated");
        self.notifier.success(format!("{} updated", entity.primary_legal_name));
        Ok(entity)
    }
}
