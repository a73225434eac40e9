use ctn_kernel::domain::models::{CreateMember, UpdateLegalEntity, UpdateMember};
use ctn_kernel::forms::{self, FieldErrors};

fn trimmed(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Checks a new member and returns the normalized payload.
///
/// # Errors
/// Every failing field.
pub fn validate_create(input: &CreateMember) -> Result<CreateMember, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors
        .check("legalName", forms::required(&input.legal_name))
        .check("orgId", forms::org_id(&input.org_id))
        .check("domain", forms::required(&input.domain))
        .check("domain", forms::hostname(&input.domain))
        .check("countryCode", forms::country_code(&input.country_code));
    errors.into_result()?;

    Ok(CreateMember {
        legal_name: input.legal_name.trim().to_owned(),
        org_id: input.org_id.trim().to_owned(),
        domain: input.domain.trim().to_ascii_lowercase(),
        country_code: input.country_code.trim().to_ascii_uppercase(),
        membership_level: input.membership_level,
        entity_legal_form: trimmed(input.entity_legal_form.as_ref()),
        city: trimmed(input.city.as_ref()),
    })
}

/// # Errors
/// An empty update or a failing field.
pub fn validate_update(input: &UpdateMember) -> Result<UpdateMember, FieldErrors> {
    let mut errors = FieldErrors::new();
    if input.is_empty() {
        errors.add("member", "Nothing to update");
    }
    if let Some(name) = &input.legal_name {
        errors.check("legalName", forms::required(name));
    }
    if let Some(domain) = &input.domain {
        errors.check("domain", forms::required(domain)).check("domain", forms::hostname(domain));
    }
    errors.into_result()?;

    Ok(UpdateMember {
        legal_name: input.legal_name.as_ref().map(|v| v.trim().to_owned()),
        domain: input.domain.as_ref().map(|v| v.trim().to_ascii_lowercase()),
        ..input.clone()
    })
}

/// Optional fields given as blank are kept as `""`, which clears them on the server.
///
/// # Errors
/// An empty update, a blank legal name or a malformed country code.
pub fn validate_legal_entity(input: &UpdateLegalEntity) -> Result<UpdateLegalEntity, FieldErrors> {
    let mut errors = FieldErrors::new();
    if input.is_empty() {
        errors.add("legalEntity", "Nothing to update");
    }
    if let Some(name) = &input.primary_legal_name {
        errors.check("primaryLegalName", forms::required(name));
    }
    if let Some(country) = &input.country_code {
        errors.check("countryCode", forms::country_code(country));
    }
    errors.into_result()?;

    let clearable = |value: Option<&String>| value.map(|v| v.trim().to_owned());
    Ok(UpdateLegalEntity {
        primary_legal_name: clearable(input.primary_legal_name.as_ref()),
        address_line: clearable(input.address_line.as_ref()),
        postal_code: clearable(input.postal_code.as_ref()),
        city: clearable(input.city.as_ref()),
        country_code: input.country_code.as_ref().map(|c| c.trim().to_ascii_uppercase()),
        entity_legal_form: clearable(input.entity_legal_form.as_ref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateMember {
        CreateMember {
            legal_name: " Acme Logistics B.V. ".into(),
            org_id: "org:acme-logistics".into(),
            domain: "Acme-Logistics.NL".into(),
            country_code: "nl".into(),
            ..CreateMember::default()
        }
    }

    #[test]
    fn create_is_normalized() {
        let payload = validate_create(&valid()).expect("valid member");
        assert_eq!(payload.legal_name, "Acme Logistics B.V.");
        assert_eq!(payload.domain, "acme-logistics.nl");
        assert_eq!(payload.country_code, "NL");
        assert_eq!(payload.city, None);
    }

    #[test]
    fn every_failing_field_is_reported() {
        let input = CreateMember {
            legal_name: " ".into(),
            org_id: "acme".into(),
            domain: String::new(),
            country_code: "Netherlands".into(),
            ..CreateMember::default()
        };
        let errors = validate_create(&input).expect_err("invalid member");

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("domain"), Some("This field is required"));
        assert!(errors.get("orgId").is_some());
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(validate_update(&UpdateMember::default()).is_err());
        let update = UpdateMember { domain: Some(" NEW.acme.nl ".into()), ..UpdateMember::default() };
        assert_eq!(validate_update(&update).expect("valid").domain.as_deref(), Some("new.acme.nl"));
    }

    #[test]
    fn legal_entity_update_can_clear_optional_fields() {
        assert_eq!(
            validate_legal_entity(&UpdateLegalEntity::default()).expect_err("empty").get("legalEntity"),
            Some("Nothing to update")
        );

        let update = UpdateLegalEntity {
            city: Some("  ".into()),
            entity_legal_form: Some(" B.V. ".into()),
            ..UpdateLegalEntity::default()
        };
        let payload = validate_legal_entity(&update).expect("valid");
        assert_eq!(payload.city.as_deref(), Some(""));
        assert_eq!(payload.entity_legal_form.as_deref(), Some("B.V."));
        assert_eq!(payload.address_line, None);
    }
}
