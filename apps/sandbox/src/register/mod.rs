//! In-memory register: the records behind every sandbox route.
//!
//! Methods take the acting account and record an audit entry for every mutation. They are
//! plain synchronous functions; [`crate::state::SandboxState`] puts the register behind a lock.

mod kvk;
mod records;
mod tokens;

pub use kvk::{StoredVerification, extract_fields};
pub use tokens::{SECRET_PREFIX, StoredToken, digest};

use crate::error::{ApiError, ApiResult};
use chrono::Utc;
use ctn::domain::constants::PAGE_SIZE_OPTIONS;
use ctn::domain::models::{
    AuditAction, AuditLog, AuditPage, AuditQuery, CreateMember, Endpoint, LegalEntity,
    LegalEntityContact, LegalEntityIdentifier, Member, MemberStatus, UpdateLegalEntity,
    UpdateMember,
};
use ctn::kernel::forms::{self, FieldErrors};
use ctn::kernel::safe_nanoid;
use tracing::info;


#[derive(Debug, Default)]
pub struct Register {
    members: Vec<Member>,
    legal_entities: Vec<LegalEntity>,
    identifiers: Vec<LegalEntityIdentifier>,
    contacts: Vec<LegalEntityContact>,
    endpoints: Vec<Endpoint>,
    tokens: Vec<StoredToken>,
    verifications: Vec<StoredVerification>,
    audit: Vec<AuditLog>,
}

/// 400 carrying every field error.
fn check(errors: FieldErrors) -> ApiResult<()> {
    errors.into_result().map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Blank strings become `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

impl Register {
    fn record(&mut self, actor: &str, action: AuditAction, resource_type: &str, resource_id: &str, summary: String) {
        info!(actor, %action, resource_type, resource_id, "Audit");
        self.audit.push(AuditLog {
            audit_id: safe_nanoid!(),
            occurred_at: Utc::now(),
            actor: actor.to_owned(),
            action,
            resource_type: resource_type.to_owned(),
            resource_id: resource_id.to_owned(),
            summary,
        });
    }

    fn legal_entity_exists(&self, legal_entity_id: &str) -> ApiResult<()> {
        if self.legal_entities.iter().any(|e| e.legal_entity_id == legal_entity_id) {
            Ok(())
        } else {
            Err(ApiError::not_found("Legal entity", legal_entity_id))
        }
    }

    // --- Members ---

    #[must_use]
    pub fn members(&self) -> Vec<Member> {
        self.members.clone()
    }

    pub fn member(&self, member_id: &str) -> ApiResult<Member> {
        self.members
            .iter()
            .find(|m| m.member_id == member_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Member", member_id))
    }

    /// Creates the member and its legal entity.
    pub fn create_member(&mut self, actor: &str, input: CreateMember) -> ApiResult<Member> {
        let mut errors = FieldErrors::new();
        errors
            .check("legalName", forms::required(&input.legal_name))
            .check("orgId", forms::org_id(&input.org_id))
            .check("domain", forms::required(&input.domain))
            .check("countryCode", forms::country_code(&input.country_code));
        check(errors)?;

        let org_id = input.org_id.trim().to_owned();
        if self.members.iter().any(|m| m.org_id == org_id) {
            return Err(ApiError::conflict(format!("Organization ID {org_id} already exists")));
        }

        let now = Utc::now();
        let country_code = input.country_code.trim().to_uppercase();
        let entity = LegalEntity {
            legal_entity_id: safe_nanoid!(),
            primary_legal_name: input.legal_name.trim().to_owned(),
            address_line: None,
            postal_code: None,
            city: non_blank(input.city),
            country_code: country_code.clone(),
            entity_legal_form: non_blank(input.entity_legal_form),
            status: MemberStatus::Pending,
            registered_at: now,
        };
        let member = Member {
            member_id: safe_nanoid!(),
            legal_entity_id: entity.legal_entity_id.clone(),
            legal_name: entity.primary_legal_name.clone(),
            org_id,
            domain: input.domain.trim().to_lowercase(),
            country_code,
            status: MemberStatus::Pending,
            membership_level: input.membership_level,
            created_at: now,
        };

        self.legal_entities.push(entity);
        self.members.push(member.clone());
        self.record(actor, AuditAction::Create, "Member", &member.member_id, format!("Created member {}", member.legal_name));
        Ok(member)
    }

    /// Applies the present fields; the legal name and status carry over to the legal entity.
    pub fn update_member(&mut self, actor: &str, member_id: &str, input: UpdateMember) -> ApiResult<Member> {
        if let Some(name) = &input.legal_name {
            let mut errors = FieldErrors::new();
            errors.check("legalName", forms::required(name));
            check(errors)?;
        }

        let member = self
            .members
            .iter_mut()
            .find(|m| m.member_id == member_id)
            .ok_or_else(|| ApiError::not_found("Member", member_id))?;

        if let Some(name) = input.legal_name {
            member.legal_name = name.trim().to_owned();
        }
        if let Some(domain) = input.domain {
            member.domain = domain.trim().to_lowercase();
        }
        if let Some(status) = input.status {
            member.status = status;
        }
        if let Some(level) = input.membership_level {
            member.membership_level = level;
        }
        let updated = member.clone();

        if let Some(entity) =
            self.legal_entities.iter_mut().find(|e| e.legal_entity_id == updated.legal_entity_id)
        {
            entity.primary_legal_name.clone_from(&updated.legal_name);
            entity.status = updated.status;
        }

        self.record(actor, AuditAction::Update, "Member", member_id, format!("Updated member {}", updated.legal_name));
        Ok(updated)
    }

    /// Removes the member with its legal entity and everything registered for it.
    pub fn delete_member(&mut self, actor: &str, member_id: &str) -> ApiResult<()> {
        let index = self
            .members
            .iter()
            .position(|m| m.member_id == member_id)
            .ok_or_else(|| ApiError::not_found("Member", member_id))?;
        let member = self.members.remove(index);
        let entity = member.legal_entity_id.as_str();

        let endpoints: Vec<String> = self
            .endpoints
            .iter()
            .filter(|e| e.legal_entity_id == entity)
            .map(|e| e.endpoint_id.clone())
            .collect();
        self.tokens.retain(|t| !endpoints.contains(&t.token.endpoint_id));
        self.endpoints.retain(|e| e.legal_entity_id != entity);
        self.identifiers.retain(|i| i.legal_entity_id != entity);
        self.contacts.retain(|c| c.legal_entity_id != entity);
        self.verifications.retain(|v| v.verification.legal_entity_id != entity);
        self.legal_entities.retain(|e| e.legal_entity_id != entity);

        self.record(actor, AuditAction::Delete, "Member", member_id, format!("Deleted member {}", member.legal_name));
        Ok(())
    }

    // --- Legal entities ---

    pub fn legal_entity(&self, legal_entity_id: &str) -> ApiResult<LegalEntity> {
        self.legal_entities
            .iter()
            .find(|e| e.legal_entity_id == legal_entity_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Legal entity", legal_entity_id))
    }

    /// Applies the present fields; name and country carry over to the member.
    pub fn update_legal_entity(
        &mut self,
        actor: &str,
        legal_entity_id: &str,
        input: UpdateLegalEntity,
    ) -> ApiResult<LegalEntity> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &input.primary_legal_name {
            errors.check("primaryLegalName", forms::required(name));
        }
        if let Some(country) = &input.country_code {
            errors.check("countryCode", forms::country_code(country));
        }
        check(errors)?;

        let entity = self
            .legal_entities
            .iter_mut()
            .find(|e| e.legal_entity_id == legal_entity_id)
            .ok_or_else(|| ApiError::not_found("Legal entity", legal_entity_id))?;

        if let Some(name) = input.primary_legal_name {
            entity.primary_legal_name = name.trim().to_owned();
        }
        if let Some(country) = input.country_code {
            entity.country_code = country.trim().to_uppercase();
        }
        if input.address_line.is_some() {
            entity.address_line = non_blank(input.address_line);
        }
        if input.postal_code.is_some() {
            entity.postal_code = non_blank(input.postal_code);
        }
        if input.city.is_some() {
            entity.city = non_blank(input.city);
        }
        if input.entity_legal_form.is_some() {
            entity.entity_legal_form = non_blank(input.entity_legal_form);
        }
        let updated = entity.clone();

        if let Some(member) = self.members.iter_mut().find(|m| m.legal_entity_id == legal_entity_id) {
            member.legal_name.clone_from(&updated.primary_legal_name);
            member.country_code.clone_from(&updated.country_code);
        }

        self.record(
            actor,
            AuditAction::Update,
            "LegalEntity",
            legal_entity_id,
            format!("Updated legal entity {}", updated.primary_legal_name),
        );
        Ok(updated)
    }

    // --- Audit ---

    /// Newest first, filtered and paginated.
    pub fn audit_logs(&self, query: &AuditQuery) -> ApiResult<AuditPage> {
        if query.page == 0 {
            return Err(ApiError::bad_request("page starts at 1"));
        }
        if !usize::try_from(query.page_size).is_ok_and(|size| PAGE_SIZE_OPTIONS.contains(&size)) {
            return Err(ApiError::bad_request(format!("pageSize must be one of {PAGE_SIZE_OPTIONS:?}")));
        }

        let resource_type = query.resource_type.as_deref().map(str::trim).filter(|r| !r.is_empty());
        let actor = query.actor.as_deref().map(str::trim).filter(|a| !a.is_empty()).map(str::to_lowercase);

        let matched: Vec<&AuditLog> = self
            .audit
            .iter()
            .rev()
            .filter(|log| query.action.is_none_or(|a| log.action == a))
            .filter(|log| resource_type.is_none_or(|r| log.resource_type.eq_ignore_ascii_case(r)))
            .filter(|log| actor.as_ref().is_none_or(|a| log.actor.to_lowercase().contains(a)))
            .collect();

        let size = query.page_size as usize;
        let skip = (query.page as usize - 1).saturating_mul(size);
        Ok(AuditPage {
            data: matched.iter().skip(skip).take(size).map(|log| (*log).clone()).collect(),
            total: matched.len() as u64,
            page: query.page,
            page_size: query.page_size,
        })
    }

    #[must_use]
    pub fn audit_len(&self) -> usize {
        self.audit.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctn::domain::models::MembershipLevel;

    pub(super) fn acme() -> CreateMember {
        CreateMember {
            legal_name: "Acme Logistics B.V.".into(),
            org_id: "org:acme-logistics".into(),
            domain: "Acme.example.nl".into(),
            country_code: "nl".into(),
            membership_level: MembershipLevel::Full,
            entity_legal_form: Some("B.V.".into()),
            city: Some("Rotterdam".into()),
        }
    }

    #[test]
    fn create_member_creates_entity_and_audits() -> ApiResult<()> {
        let mut register = Register::default();
        let member = register.create_member("admin", acme())?;

        assert_eq!(member.country_code, "NL");
        assert_eq!(member.domain, "acme.example.nl");
        let entity = register.legal_entity(&member.legal_entity_id)?;
        assert_eq!(entity.primary_legal_name, "Acme Logistics B.V.");
        assert_eq!(entity.city.as_deref(), Some("Rotterdam"));
        assert_eq!(register.audit_len(), 1);
        Ok(())
    }

    #[test]
    fn duplicate_org_id_conflicts() -> ApiResult<()> {
        let mut register = Register::default();
        register.create_member("admin", acme())?;
        let err = register.create_member("admin", acme()).expect_err("duplicate");
        assert!(matches!(err, ApiError::Conflict { .. }));
        assert_eq!(err.to_string(), "Organization ID org:acme-logistics already exists");
        Ok(())
    }

    #[test]
    fn invalid_member_lists_every_field() {
        let mut register = Register::default();
        let input = CreateMember { legal_name: " ".into(), org_id: "acme".into(), ..acme() };
        let err = register.create_member("admin", input).expect_err("invalid");
        let message = err.to_string();
        assert!(message.contains("legalName"), "{message}");
        assert!(message.contains("orgId"), "{message}");
        assert_eq!(register.audit_len(), 0);
    }

    #[test]
    fn entity_updates_carry_over_to_the_member() -> ApiResult<()> {
        let mut register = Register::default();
        let member = register.create_member("admin", acme())?;
        let update = UpdateLegalEntity {
            primary_legal_name: Some("Acme Group B.V.".into()),
            city: Some(String::new()),
            ..UpdateLegalEntity::default()
        };
        let entity = register.update_legal_entity("admin", &member.legal_entity_id, update)?;

        assert_eq!(entity.city, None);
        assert_eq!(register.member(&member.member_id)?.legal_name, "Acme Group B.V.");
        Ok(())
    }

    #[test]
    fn audit_pages_newest_first_with_filters() -> ApiResult<()> {
        let mut register = Register::default();
        let member = register.create_member("admin@ctn.example", acme())?;
        let update = UpdateMember { status: Some(MemberStatus::Active), ..UpdateMember::default() };
        register.update_member("ops@ctn.example", &member.member_id, update)?;

        let page = register.audit_logs(&AuditQuery::default())?;
        assert_eq!(page.total, 2);
        assert_eq!(page.data[0].action, AuditAction::Update);

        let by_actor = AuditQuery { actor: Some("ADMIN".into()), ..AuditQuery::default() };
        assert_eq!(register.audit_logs(&by_actor)?.total, 1);

        let by_action = AuditQuery { action: Some(AuditAction::Delete), ..AuditQuery::default() };
        assert_eq!(register.audit_logs(&by_action)?.total, 0);

        let zero = AuditQuery { page: 0, ..AuditQuery::default() };
        assert!(matches!(register.audit_logs(&zero), Err(ApiError::BadRequest { .. })));

        for page_size in [0, 15, 99, 101] {
            let odd = AuditQuery { page_size, ..AuditQuery::default() };
            assert!(matches!(register.audit_logs(&odd), Err(ApiError::BadRequest { .. })), "{page_size}");
        }
        let fifty = AuditQuery { page_size: 50, ..AuditQuery::default() };
        assert_eq!(register.audit_logs(&fifty)?.page_size, 50);
        Ok(())
    }
}
