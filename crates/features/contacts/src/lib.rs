//! Contacts feature slice.

mod error;

pub use error::{ContactsError, ContactsErrorExt};

use ctn_kernel::client::ApiClient;
use ctn_kernel::domain::models::{ContactPayload, LegalEntityContact};
use ctn_kernel::domain::registry::InitializedSlice;
use ctn_kernel::forms::{self, FieldErrors};
use ctn_kernel::notify::Notifier;
use tracing::info;

/// Contacts feature state.
#[ctn_derive::ctn_slice]
pub struct Contacts {
    client: ApiClient,
    notifier: Notifier,
}

/// Initialize the contacts feature.
#[must_use]
pub fn init(client: ApiClient, notifier: Notifier) -> InitializedSlice {
    info!("Contacts slice initialized");
    InitializedSlice::new(Contacts::new(ContactsInner { client, notifier }))
}

/// Full name and email are required; phone is optional but must look like a phone number.
///
/// # Errors
/// Every failing field.
pub fn validate(input: &ContactPayload) -> Result<ContactPayload, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors
        .check("fullName", forms::required(&input.full_name))
        .check("email", forms::required(&input.email))
        .check("email", forms::email(&input.email));
    if let Some(phone) = &input.phone {
        errors.check("phone", forms::phone(phone));
    }
    errors.into_result()?;

    let optional = |v: &Option<String>| v.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned);
    Ok(ContactPayload {
        contact_type: input.contact_type,
        full_name: input.full_name.trim().to_owned(),
        email: input.email.trim().to_ascii_lowercase(),
        phone: optional(&input.phone),
        job_title: optional(&input.job_title),
        is_primary: input.is_primary,
    })
}

impl Contacts {
    pub async fn list(&self, legal_entity_id: &str) -> Result<Vec<LegalEntityContact>, ContactsError> {
        Ok(self.client.get(&format!("/legal-entities/{legal_entity_id}/contacts")).await?)
    }

    pub async fn create(
        &self,
        legal_entity_id: &str,
        input: &ContactPayload,
    ) -> Result<LegalEntityContact, ContactsError> {
        let payload = validate(input)?;
        let contact: LegalEntityContact =
            self.client.post(&format!("/legal-entities/{legal_entity_id}/contacts"), &payload).await?;

        info!(legal_entity_id, contact_id = %contact.contact_id, "Contact created");
        self.notifier.success(format!("Contact {} added", contact.full_name));
        Ok(contact)
    }

    pub async fn update(&self, contact_id: &str, input: &ContactPayload) -> Result<LegalEntityContact, ContactsError> {
        let payload = validate(input)?;
        let contact: LegalEntityContact = self.client.put(&format!("/contacts/{contact_id}"), &payload).await?;

        info!(contact_id, "Contact updated");
        self.notifier.success(format!("Contact {} updated", contact.full_name));
        Ok(contact)
    }

    pub async fn delete(&self, contact_id: &str) -> Result<(), ContactsError> {
        self.client.delete(&format!("/contacts/{contact_id}")).await?;

        info!(contact_id, "Contact deleted");
        self.notifier.success("Contact deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_email_are_required() {
        let errors = validate(&ContactPayload::default()).expect_err("empty contact");
        assert_eq!(errors.get("fullName"), Some("This field is required"));
        assert_eq!(errors.get("email"), Some("This field is required"));
    }

    #[test]
    fn phone_is_optional_but_checked() {
        let mut input = ContactPayload {
            full_name: " Ada Jansen ".into(),
            email: "Ada@Acme.NL".into(),
            phone: Some("  ".into()),
            ..ContactPayload::default()
        };
        let payload = validate(&input).expect("blank phone is fine");
        assert_eq!(payload.email, "ada@acme.nl");
        assert_eq!(payload.phone, None);

        input.phone = Some("ext. 12".into());
        assert!(validate(&input).expect_err("bad phone").get("phone").is_some());
    }
}
