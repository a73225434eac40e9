use super::{Register, check, non_blank};
use crate::error::{ApiError, ApiResult};
use chrono::Utc;
use ctn::domain::models::{
    AuditAction, ContactPayload, Endpoint, EndpointPayload, IdentifierPayload, LegalEntityContact,
    LegalEntityIdentifier,
};
use ctn::kernel::forms::{self, FieldErrors};
use ctn::kernel::safe_nanoid;

fn check_identifier(input: &IdentifierPayload) -> ApiResult<()> {
    let mut errors = FieldErrors::new();
    errors
        .check("identifierType", forms::required(&input.identifier_type))
        .check("identifierValue", forms::required(&input.identifier_value));
    check(errors)
}

fn check_contact(input: &ContactPayload) -> ApiResult<()> {
    let mut errors = FieldErrors::new();
    errors
        .check("fullName", forms::required(&input.full_name))
        .check("email", forms::required(&input.email))
        .check("email", forms::email(&input.email));
    check(errors)
}

fn check_endpoint(input: &EndpointPayload) -> ApiResult<()> {
    let mut errors = FieldErrors::new();
    errors
        .check("endpointName", forms::required(&input.endpoint_name))
        .check("endpointUrl", forms::http_url(&input.endpoint_url));
    check(errors)
}

impl Register {
    // --- Identifiers ---

    pub fn identifiers(&self, legal_entity_id: &str) -> ApiResult<Vec<LegalEntityIdentifier>> {
        self.legal_entity_exists(legal_entity_id)?;
        Ok(self.identifiers.iter().filter(|i| i.legal_entity_id == legal_entity_id).cloned().collect())
    }

    /// Type and value are unique per legal entity.
    fn identifier_taken(&self, legal_entity_id: &str, kind: &str, value: &str, except: Option<&str>) -> bool {
        self.identifiers.iter().any(|i| {
            i.legal_entity_id == legal_entity_id
                && i.identifier_type == kind
                && i.identifier_value == value
                && except.is_none_or(|id| i.identifier_id != id)
        })
    }

    pub fn create_identifier(
        &mut self,
        actor: &str,
        legal_entity_id: &str,
        input: IdentifierPayload,
    ) -> ApiResult<LegalEntityIdentifier> {
        self.legal_entity_exists(legal_entity_id)?;
        check_identifier(&input)?;

        let kind = input.identifier_type.trim().to_uppercase();
        let value = input.identifier_value.trim().to_owned();
        if self.identifier_taken(legal_entity_id, &kind, &value, None) {
            return Err(ApiError::conflict(format!(
                "Identifier {kind} {value} already exists for this legal entity"
            )));
        }

        let identifier = LegalEntityIdentifier {
            identifier_id: safe_nanoid!(),
            legal_entity_id: legal_entity_id.to_owned(),
            country_code: non_blank(input.country_code).map(|c| c.to_uppercase()),
            identifier_type: kind,
            identifier_value: value,
            registry_name: non_blank(input.registry_name),
            registry_url: non_blank(input.registry_url),
            validation_status: input.validation_status.unwrap_or_default(),
            verification_notes: non_blank(input.verification_notes),
            created_at: Utc::now(),
        };
        self.identifiers.push(identifier.clone());
        self.record(
            actor,
            AuditAction::Create,
            "Identifier",
            &identifier.identifier_id,
            format!("Added {} {}", identifier.identifier_type, identifier.identifier_value),
        );
        Ok(identifier)
    }

    /// Replaces the identifier fields; a missing validation status keeps the current one.
    pub fn update_identifier(
        &mut self,
        actor: &str,
        identifier_id: &str,
        input: IdentifierPayload,
    ) -> ApiResult<LegalEntityIdentifier> {
        check_identifier(&input)?;
        let index = self
            .identifiers
            .iter()
            .position(|i| i.identifier_id == identifier_id)
            .ok_or_else(|| ApiError::not_found("Identifier", identifier_id))?;

        let kind = input.identifier_type.trim().to_uppercase();
        let value = input.identifier_value.trim().to_owned();
        let legal_entity_id = self.identifiers[index].legal_entity_id.clone();
        if self.identifier_taken(&legal_entity_id, &kind, &value, Some(identifier_id)) {
            return Err(ApiError::conflict(format!(
                "Identifier {kind} {value} already exists for this legal entity"
            )));
        }

        let identifier = &mut self.identifiers[index];
        identifier.country_code = non_blank(input.country_code).map(|c| c.to_uppercase());
        identifier.identifier_type = kind;
        identifier.identifier_value = value;
        identifier.registry_name = non_blank(input.registry_name);
        identifier.registry_url = non_blank(input.registry_url);
        if let Some(status) = input.validation_status {
            identifier.validation_status = status;
        }
        identifier.verification_notes = non_blank(input.verification_notes);
        let updated = identifier.clone();

        self.record(
            actor,
            AuditAction::Update,
            "Identifier",
            identifier_id,
            format!("Updated {} {}", updated.identifier_type, updated.identifier_value),
        );
        Ok(updated)
    }

    pub fn delete_identifier(&mut self, actor: &str, identifier_id: &str) -> ApiResult<()> {
        let index = self
            .identifiers
            .iter()
            .position(|i| i.identifier_id == identifier_id)
            .ok_or_else(|| ApiError::not_found("Identifier", identifier_id))?;
        let removed = self.identifiers.remove(index);
        self.record(
            actor,
            AuditAction::Delete,
            "Identifier",
            identifier_id,
            format!("Removed {} {}", removed.identifier_type, removed.identifier_value),
        );
        Ok(())
    }

    // --- Contacts ---

    pub fn contacts(&self, legal_entity_id: &str) -> ApiResult<Vec<LegalEntityContact>> {
        self.legal_entity_exists(legal_entity_id)?;
        Ok(self.contacts.iter().filter(|c| c.legal_entity_id == legal_entity_id).cloned().collect())
    }

    /// A contact marked primary takes the flag from the entity's other contacts.
    fn demote_primary(&mut self, legal_entity_id: &str, keep: &str) {
        for contact in self.contacts.iter_mut().filter(|c| c.legal_entity_id == legal_entity_id) {
            if contact.contact_id != keep {
                contact.is_primary = false;
            }
        }
    }

    pub fn create_contact(
        &mut self,
        actor: &str,
        legal_entity_id: &str,
        input: ContactPayload,
    ) -> ApiResult<LegalEntityContact> {
        self.legal_entity_exists(legal_entity_id)?;
        check_contact(&input)?;

        let contact = LegalEntityContact {
            contact_id: safe_nanoid!(),
            legal_entity_id: legal_entity_id.to_owned(),
            contact_type: input.contact_type,
            full_name: input.full_name.trim().to_owned(),
            email: input.email.trim().to_lowercase(),
            phone: non_blank(input.phone),
            job_title: non_blank(input.job_title),
            is_primary: input.is_primary,
        };
        if contact.is_primary {
            self.demote_primary(legal_entity_id, &contact.contact_id);
        }
        self.contacts.push(contact.clone());
        self.record(actor, AuditAction::Create, "Contact", &contact.contact_id, format!("Added contact {}", contact.full_name));
        Ok(contact)
    }

    pub fn update_contact(&mut self, actor: &str, contact_id: &str, input: ContactPayload) -> ApiResult<LegalEntityContact> {
        check_contact(&input)?;
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.contact_id == contact_id)
            .ok_or_else(|| ApiError::not_found("Contact", contact_id))?;

        contact.contact_type = input.contact_type;
        contact.full_name = input.full_name.trim().to_owned();
        contact.email = input.email.trim().to_lowercase();
        contact.phone = non_blank(input.phone);
        contact.job_title = non_blank(input.job_title);
        contact.is_primary = input.is_primary;
        let updated = contact.clone();

        if updated.is_primary {
            self.demote_primary(&updated.legal_entity_id, contact_id);
        }
        self.record(actor, AuditAction::Update, "Contact", contact_id, format!("Updated contact {}", updated.full_name));
        Ok(updated)
    }

    pub fn delete_contact(&mut self, actor: &str, contact_id: &str) -> ApiResult<()> {
        let index = self
            .contacts
            .iter()
            .position(|c| c.contact_id == contact_id)
            .ok_or_else(|| ApiError::not_found("Contact", contact_id))?;
        let removed = self.contacts.remove(index);
        self.record(actor, AuditAction::Delete, "Contact", contact_id, format!("Removed contact {}", removed.full_name));
        Ok(())
    }

    // --- Endpoints ---

    pub fn endpoints(&self, legal_entity_id: &str) -> ApiResult<Vec<Endpoint>> {
        self.legal_entity_exists(legal_entity_id)?;
        Ok(self.endpoints.iter().filter(|e| e.legal_entity_id == legal_entity_id).cloned().collect())
    }

    pub(super) fn endpoint_exists(&self, endpoint_id: &str) -> ApiResult<()> {
        if self.endpoints.iter().any(|e| e.endpoint_id == endpoint_id) {
            Ok(())
        } else {
            Err(ApiError::not_found("Endpoint", endpoint_id))
        }
    }

    pub fn create_endpoint(&mut self, actor: &str, legal_entity_id: &str, input: EndpointPayload) -> ApiResult<Endpoint> {
        self.legal_entity_exists(legal_entity_id)?;
        check_endpoint(&input)?;

        let endpoint = Endpoint {
            endpoint_id: safe_nanoid!(),
            legal_entity_id: legal_entity_id.to_owned(),
            endpoint_name: input.endpoint_name.trim().to_owned(),
            endpoint_url: input.endpoint_url.trim().to_owned(),
            endpoint_type: input.endpoint_type,
            data_category: input.data_category,
            description: non_blank(input.description),
            is_active: input.is_active,
            created_at: Utc::now(),
        };
        self.endpoints.push(endpoint.clone());
        self.record(
            actor,
            AuditAction::Create,
            "Endpoint",
            &endpoint.endpoint_id,
            format!("Registered endpoint {}", endpoint.endpoint_name),
        );
        Ok(endpoint)
    }

    pub fn update_endpoint(&mut self, actor: &str, endpoint_id: &str, input: EndpointPayload) -> ApiResult<Endpoint> {
        check_endpoint(&input)?;
        let endpoint = self
            .endpoints
            .iter_mut()
            .find(|e| e.endpoint_id == endpoint_id)
            .ok_or_else(|| ApiError::not_found("Endpoint", endpoint_id))?;

        let toggled = endpoint.is_active != input.is_active;
        endpoint.endpoint_name = input.endpoint_name.trim().to_owned();
        endpoint.endpoint_url = input.endpoint_url.trim().to_owned();
        endpoint.endpoint_type = input.endpoint_type;
        endpoint.data_category = input.data_category;
        endpoint.description = non_blank(input.description);
        endpoint.is_active = input.is_active;
        let updated = endpoint.clone();

        let summary = match (toggled, updated.is_active) {
            (true, true) => format!("Activated endpoint {}", updated.endpoint_name),
            (true, false) => format!("Deactivated endpoint {}", updated.endpoint_name),
            (false, _) => format!("Updated endpoint {}", updated.endpoint_name),
        };
        self.record(actor, AuditAction::Update, "Endpoint", endpoint_id, summary);
        Ok(updated)
    }

    /// Removes the endpoint and its tokens.
    pub fn delete_endpoint(&mut self, actor: &str, endpoint_id: &str) -> ApiResult<()> {
        let index = self
            .endpoints
            .iter()
            .position(|e| e.endpoint_id == endpoint_id)
            .ok_or_else(|| ApiError::not_found("Endpoint", endpoint_id))?;
        let removed = self.endpoints.remove(index);
        self.tokens.retain(|t| t.token.endpoint_id != endpoint_id);
        self.record(actor, AuditAction::Delete, "Endpoint", endpoint_id, format!("Removed endpoint {}", removed.endpoint_name));
        Ok(())
    }
}
