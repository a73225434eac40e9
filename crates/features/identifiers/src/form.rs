//! Identifier entry form.
//!
//! The country narrows the type list, the type fills in the registry, and the value is checked
//! against the type's pattern. Saving is refused while any check fails.

use crate::catalog::{self, IdentifierKind};
use ctn_kernel::domain::models::{IdentifierPayload, LegalEntityIdentifier, ValidationStatus};
use ctn_kernel::forms::FieldErrors;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentifierForm {
    country_code: String,
    identifier_type: Option<String>,
    identifier_value: String,
    registry_name: Option<String>,
    registry_url: Option<String>,
    validation_status: Option<ValidationStatus>,
    verification_notes: Option<String>,
}

impl IdentifierForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefills the form from an existing identifier.
    #[must_use]
    pub fn from_identifier(identifier: &LegalEntityIdentifier) -> Self {
        Self {
            country_code: identifier.country_code.clone().unwrap_or_default(),
            identifier_type: Some(identifier.identifier_type.clone()),
            identifier_value: identifier.identifier_value.clone(),
            registry_name: identifier.registry_name.clone(),
            registry_url: identifier.registry_url.clone(),
            validation_status: Some(identifier.validation_status),
            verification_notes: identifier.verification_notes.clone(),
        }
    }

    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    #[must_use]
    pub fn identifier_type(&self) -> Option<&str> {
        self.identifier_type.as_deref()
    }

    #[must_use]
    pub fn identifier_value(&self) -> &str {
        &self.identifier_value
    }

    #[must_use]
    pub fn registry(&self) -> (Option<&str>, Option<&str>) {
        (self.registry_name.as_deref(), self.registry_url.as_deref())
    }

    /// Types selectable for the current country.
    #[must_use]
    pub fn available_types(&self) -> &'static [&'static str] {
        catalog::types_for_country(&self.country_code)
    }

    /// Sets the country. A selected type the new country does not offer is cleared together
    /// with the registry it filled in.
    pub fn set_country(&mut self, country: &str) {
        self.country_code = catalog::normalize_country(country);

        if let Some(selected) = &self.identifier_type
            && !self.available_types().iter().any(|t| t.eq_ignore_ascii_case(selected))
        {
            self.identifier_type = None;
            self.registry_name = None;
            self.registry_url = None;
        }
    }

    /// Selects a type offered for the current country and overwrites the registry pair.
    ///
    /// # Errors
    /// The type is unknown or not offered for the country; the form is left unchanged.
    pub fn select_type(&mut self, code: &str) -> Result<&'static IdentifierKind, FieldErrors> {
        let offered = self.available_types().iter().find(|t| t.eq_ignore_ascii_case(code.trim()));
        let Some(kind) = offered.and_then(|code| catalog::lookup(code)) else {
            let mut errors = FieldErrors::new();
            errors.add(
                "identifierType",
                format!("{} is not available for {}", code.trim(), self.country_label()),
            );
            return Err(errors);
        };

        self.identifier_type = Some(kind.code.to_owned());
        self.registry_name = kind.registry.map(|r| r.name.to_owned());
        self.registry_url = kind.registry.map(|r| r.url.to_owned());
        Ok(kind)
    }

    /// Manual override after autopopulation.
    pub fn set_registry(&mut self, name: Option<&str>, url: Option<&str>) {
        let clean = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned);
        self.registry_name = clean(name);
        self.registry_url = clean(url);
    }

    pub fn set_value(&mut self, value: &str) {
        value.clone_into(&mut self.identifier_value);
    }

    pub fn set_validation_status(&mut self, status: Option<ValidationStatus>) {
        self.validation_status = status;
    }

    pub fn set_notes(&mut self, notes: Option<&str>) {
        self.verification_notes = notes.map(str::trim).filter(|n| !n.is_empty()).map(str::to_owned);
    }

    /// Hint of the selected type.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        self.kind().map(|k| k.hint)
    }

    /// Inline error for the value, `None` while it is empty or matches.
    #[must_use]
    pub fn value_error(&self) -> Option<String> {
        let kind = self.kind()?;
        let value = self.identifier_value.trim();
        (!value.is_empty() && !catalog::value_matches(kind.code, value))
            .then(|| format!("Invalid {} format: expected {}", kind.code, kind.hint))
    }

    #[must_use]
    pub fn errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match self.kind() {
            None => {
                errors.add("identifierType", "Select an identifier type");
            },
            Some(kind) if !self.available_types().contains(&kind.code) => {
                errors.add("identifierType", format!("{} is not available for {}", kind.code, self.country_label()));
            },
            Some(_) => {},
        }
        if self.identifier_value.trim().is_empty() {
            errors.add("identifierValue", "This field is required");
        }
        errors.check("identifierValue", self.value_error());
        errors
    }

    /// Save guard: type, value and pattern all pass.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.errors().is_empty()
    }

    /// Normalized request body.
    ///
    /// # Errors
    /// Every failing field while [`Self::can_save`] is false.
    pub fn to_payload(&self) -> Result<IdentifierPayload, FieldErrors> {
        self.errors().into_result()?;
        let kind = self.kind().ok_or_else(FieldErrors::new)?;

        Ok(IdentifierPayload {
            country_code: (!self.country_code.is_empty()).then(|| self.country_code.clone()),
            identifier_type: kind.code.to_owned(),
            identifier_value: catalog::normalize_value(kind.code, &self.identifier_value),
            registry_name: self.registry_name.clone(),
            registry_url: self.registry_url.clone(),
            validation_status: self.validation_status,
            verification_notes: self.verification_notes.clone(),
        })
    }

    fn kind(&self) -> Option<&'static IdentifierKind> {
        self.identifier_type.as_deref().and_then(catalog::lookup)
    }

    fn country_label(&self) -> &str {
        if self.country_code.is_empty() { "unspecified countries" } else { &self.country_code }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_a_type_fills_the_registry() {
        let mut form = IdentifierForm::new();
        form.set_country("nl");
        form.select_type("kvk").expect("offered");

        assert_eq!(form.identifier_type(), Some("KVK"));
        assert_eq!(form.registry(), (Some("Kamer van Koophandel"), Some("https://www.kvk.nl/")));
        assert_eq!(form.hint(), Some("8 digits"));
    }

    #[test]
    fn registry_is_overwritten_on_every_selection() {
        let mut form = IdentifierForm::new();
        form.set_country("NL");
        form.select_type("KVK").expect("offered");
        form.set_registry(Some("Custom"), None);
        assert_eq!(form.registry(), (Some("Custom"), None));

        form.select_type("LEI").expect("offered");
        assert_eq!(form.registry().0, Some("GLEIF"));
    }

    #[test]
    fn types_outside_the_country_are_refused() {
        let mut form = IdentifierForm::new();
        form.set_country("DE");
        let errors = form.select_type("KVK").expect_err("KVK is Dutch");
        assert_eq!(errors.get("identifierType"), Some("KVK is not available for DE"));
        assert_eq!(form.identifier_type(), None);
    }

    #[test]
    fn changing_country_clears_an_unavailable_type() {
        let mut form = IdentifierForm::new();
        form.set_country("NL");
        form.select_type("KVK").expect("offered");

        form.set_country("BE");
        assert_eq!(form.identifier_type(), None);
        assert_eq!(form.registry(), (None, None));

        form.select_type("LEI").expect("offered");
        form.set_country("FR");
        assert_eq!(form.identifier_type(), Some("LEI"));
        assert_eq!(form.registry().0, Some("GLEIF"));
    }

    #[test]
    fn save_is_guarded_by_type_value_and_pattern() {
        let mut form = IdentifierForm::new();
        form.set_country("NL");
        assert!(!form.can_save());

        form.select_type("KVK").expect("offered");
        assert!(!form.can_save());
        assert_eq!(form.errors().get("identifierValue"), Some("This field is required"));

        form.set_value("1234");
        assert_eq!(form.value_error().as_deref(), Some("Invalid KVK format: expected 8 digits"));
        assert!(form.to_payload().is_err());

        form.set_value(" 12345678 ");
        assert!(form.can_save());
        let payload = form.to_payload().expect("valid");
        assert_eq!(payload.identifier_value, "12345678");
        assert_eq!(payload.country_code.as_deref(), Some("NL"));
        assert_eq!(payload.registry_name.as_deref(), Some("Kamer van Koophandel"));
    }

    #[test]
    fn stored_type_outside_the_country_blocks_saving() {
        let stored: LegalEntityIdentifier = serde_json::from_value(serde_json::json!({
            "identifierId": "id-1",
            "legalEntityId": "le-1",
            "countryCode": "DE",
            "identifierType": "KVK",
            "identifierValue": "12345678",
            "validationStatus": "VALID",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .expect("identifier");

        let mut form = IdentifierForm::from_identifier(&stored);
        assert!(!form.can_save());
        assert_eq!(form.errors().get("identifierType"), Some("KVK is not available for DE"));
        assert!(form.to_payload().is_err());

        form.set_country("NL");
        assert!(form.can_save());
    }

    #[test]
    fn unmapped_country_offers_the_default_list() {
        let mut form = IdentifierForm::new();
        form.set_country("pl");
        assert_eq!(form.available_types(), catalog::DEFAULT_TYPES);
        form.select_type("OTHER").expect("offered");
        assert_eq!(form.registry(), (None, None));
        form.set_value(" Ref-7a ");
        assert_eq!(form.to_payload().expect("valid").identifier_value, "Ref-7a");
    }

    #[test]
    fn drafts_serialize_in_camel_case() {
        let mut form = IdentifierForm::new();
        form.set_country("NL");
        form.set_value("123");
        let json = serde_json::to_value(&form).expect("serialize");
        assert_eq!(json["countryCode"], "NL");

        let restored: IdentifierForm = serde_json::from_value(json).expect("deserialize");
        assert_eq!(restored, form);
    }
}
