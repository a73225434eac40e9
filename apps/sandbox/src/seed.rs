//! Fixture members loaded when `seed` is enabled.

use crate::error::ApiResult;
use crate::register::Register;
use ctn::domain::models::{
    ContactPayload, ContactType, CreateMember, DataCategory, EndpointPayload, EndpointType,
    IdentifierPayload, IssueToken, MemberStatus, MembershipLevel, UpdateMember, ValidationStatus,
};

const SEED_ACTOR: &str = "system";

struct Fixture {
    member: CreateMember,
    identifiers: &'static [(&'static str, &'static str, &'static str)],
    contact: (&'static str, &'static str, ContactType),
    endpoint: Option<(&'static str, &'static str, DataCategory)>,
    status: MemberStatus,
}

fn member(name: &str, org: &str, domain: &str, country: &str, city: &str, form: &str, level: MembershipLevel) -> CreateMember {
    CreateMember {
        legal_name: name.to_owned(),
        org_id: org.to_owned(),
        domain: domain.to_owned(),
        country_code: country.to_owned(),
        membership_level: level,
        entity_legal_form: Some(form.to_owned()),
        city: Some(city.to_owned()),
    }
}

fn fixtures() -> Vec<Fixture> {
    vec![
        Fixture {
            member: member(
                "Acme Logistics B.V.",
                "org:acme-logistics",
                "acme-logistics.nl",
                "NL",
                "Rotterdam",
                "B.V.",
                MembershipLevel::Full,
            ),
            identifiers: &[("NL", "KVK", "12345678"), ("NL", "EORI", "NL123456789")],
            contact: ("Jan de Vries", "jan.devries@acme-logistics.nl", ContactType::Primary),
            endpoint: Some(("Container events", "https://api.acme-logistics.nl/events", DataCategory::Container)),
            status: MemberStatus::Active,
        },
        Fixture {
            member: member(
                "Rhein Cargo GmbH",
                "org:rhein-cargo",
                "rhein-cargo.de",
                "DE",
                "Duisburg",
                "GmbH",
                MembershipLevel::Premium,
            ),
            identifiers: &[("DE", "HRB", "HRB 12345"), ("DE", "LEI", "529900T8BM49AURSDO55")],
            contact: ("Anna Schmidt", "a.schmidt@rhein-cargo.de", ContactType::Technical),
            endpoint: Some(("Customs filings", "https://edi.rhein-cargo.de/customs", DataCategory::Customs)),
            status: MemberStatus::Active,
        },
        Fixture {
            member: member(
                "Scheldt Warehousing NV",
                "org:scheldt-warehousing",
                "scheldt-warehousing.be",
                "BE",
                "Antwerpen",
                "NV",
                MembershipLevel::Basic,
            ),
            identifiers: &[("BE", "KBO", "0123.456.789")],
            contact: ("Pieter Janssens", "pieter@scheldt-warehousing.be", ContactType::Billing),
            endpoint: None,
            status: MemberStatus::Pending,
        },
    ]
}

/// A register holding the fixture members with their identifiers, contacts and endpoints.
pub(crate) fn seeded() -> ApiResult<Register> {
    let mut register = Register::default();

    for fixture in fixtures() {
        let created = register.create_member(SEED_ACTOR, fixture.member)?;
        let entity = created.legal_entity_id.as_str();

        if fixture.status != created.status {
            let update = UpdateMember { status: Some(fixture.status), ..UpdateMember::default() };
            register.update_member(SEED_ACTOR, &created.member_id, update)?;
        }

        for (country, kind, value) in fixture.identifiers {
            let payload = IdentifierPayload {
                country_code: Some((*country).to_owned()),
                identifier_type: (*kind).to_owned(),
                identifier_value: (*value).to_owned(),
                validation_status: Some(ValidationStatus::Valid),
                ..IdentifierPayload::default()
            };
            register.create_identifier(SEED_ACTOR, entity, payload)?;
        }

        let (full_name, email, contact_type) = fixture.contact;
        let contact = ContactPayload {
            contact_type,
            full_name: full_name.to_owned(),
            email: email.to_owned(),
            is_primary: true,
            ..ContactPayload::default()
        };
        register.create_contact(SEED_ACTOR, entity, contact)?;

        if let Some((name, url, data_category)) = fixture.endpoint {
            let payload = EndpointPayload {
                endpoint_name: name.to_owned(),
                endpoint_url: url.to_owned(),
                endpoint_type: EndpointType::RestApi,
                data_category,
                ..EndpointPayload::default()
            };
            let endpoint = register.create_endpoint(SEED_ACTOR, entity, payload)?;
            register.issue_token(SEED_ACTOR, &endpoint.endpoint_id, IssueToken::default())?;
        }
    }

    Ok(register)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_load() -> ApiResult<()> {
        let mut register = seeded()?;
        let members = register.members();
        assert_eq!(members.len(), 3);
        assert!(members.iter().any(|m| m.org_id == "org:rhein-cargo" && m.status == MemberStatus::Active));

        let acme = &members[0];
        assert_eq!(register.identifiers(&acme.legal_entity_id)?.len(), 2);
        assert_eq!(register.contacts(&acme.legal_entity_id)?.len(), 1);
        let endpoints = register.endpoints(&acme.legal_entity_id)?;
        assert_eq!(register.tokens(&endpoints[0].endpoint_id)?.len(), 1);
        assert!(register.kvk_verification(&acme.legal_entity_id).is_err());
        assert!(register.audit_len() > members.len());
        Ok(())
    }
}
