//! Client-side form checks.
//!
//! Validators return `Some(message)` on failure so forms can collect every field error before
//! refusing to submit.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").ok());
static HOSTNAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .ok()
});
static ORG_ID: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^org:[a-z0-9][a-z0-9-]{1,62}$").ok());
static PHONE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-]{6,20}$").ok());

fn matches(re: &LazyLock<Option<Regex>>, value: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(value))
}

/// Field errors keyed by field name, sorted by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` for `field` if present; the first error of a field wins.
    pub fn check(&mut self, field: &str, error: Option<String>) -> &mut Self {
        if let Some(message) = error {
            self.0.entry(field.to_owned()).or_insert(message);
        }
        self
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.check(field, Some(message.into()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no field failed.
    ///
    /// # Errors
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[must_use]
pub fn required(value: &str) -> Option<String> {
    value.trim().is_empty().then(|| "This field is required".to_owned())
}

/// Empty values pass; combine with [`required`] for mandatory fields.
#[must_use]
pub fn email(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty() && !matches(&EMAIL, value)).then(|| "Enter a valid email address".to_owned())
}

#[must_use]
pub fn hostname(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty() && (value.len() > 253 || !matches(&HOSTNAME, value)))
        .then(|| "Enter a domain such as example.com".to_owned())
}

#[must_use]
pub fn org_id(value: &str) -> Option<String> {
    (!matches(&ORG_ID, value.trim())).then(|| "Use the form org:<name> (lowercase letters, digits, dashes)".to_owned())
}

#[must_use]
pub fn country_code(value: &str) -> Option<String> {
    let value = value.trim();
    (value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| "Use a two-letter country code".to_owned())
}

#[must_use]
pub fn phone(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty() && !matches(&PHONE, value)).then(|| "Enter a valid phone number".to_owned())
}

/// `https` URLs, or plain `http` for `localhost` and `127.0.0.1`.
#[must_use]
pub fn http_url(value: &str) -> Option<String> {
    let value = value.trim();
    let Some((scheme, rest)) = value.split_once("://") else {
        return Some("Enter an absolute http(s) URL".to_owned());
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_name = host.rsplit_once(':').map_or(host, |(h, port)| {
        if port.chars().all(|c| c.is_ascii_digit()) { h } else { host }
    });

    if host_name.is_empty() {
        return Some("The URL has no host".to_owned());
    }
    match scheme.to_ascii_lowercase().as_str() {
        "https" => None,
        "http" if matches!(host_name, "localhost" | "127.0.0.1") => None,
        "http" => Some("Use https (plain http is only allowed for localhost)".to_owned()),
        _ => Some("Enter an absolute http(s) URL".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(required("  ").is_some());
        assert!(required("Acme").is_none());
    }

    #[test]
    fn email_shapes() {
        assert!(email("ops@acme.nl").is_none());
        assert!(email("").is_none());
        assert!(email("ops@acme").is_some());
        assert!(email("two@@acme.nl").is_some());
    }

    #[test]
    fn org_ids() {
        assert!(org_id("org:acme-logistics").is_none());
        assert!(org_id("org:Acme").is_some());
        assert!(org_id("acme").is_some());
        assert!(org_id("org:a").is_some());
    }

    #[test]
    fn hostnames_and_countries() {
        assert!(hostname("acme.example.nl").is_none());
        assert!(hostname("acme").is_some());
        assert!(hostname("-acme.nl").is_some());
        assert!(country_code("NL").is_none());
        assert!(country_code("NLD").is_some());
        assert!(country_code("N1").is_some());
    }

    #[test]
    fn phones() {
        assert!(phone("+31 (0)10 123-4567").is_none());
        assert!(phone("12345").is_some());
        assert!(phone("call me").is_some());
    }

    #[test]
    fn http_is_limited_to_localhost() {
        assert!(http_url("https://api.acme.nl/v1").is_none());
        assert!(http_url("http://localhost:8080/hook").is_none());
        assert!(http_url("http://127.0.0.1/hook").is_none());
        assert!(http_url("http://api.acme.nl").is_some());
        assert!(http_url("ftp://api.acme.nl").is_some());
        assert!(http_url("api.acme.nl").is_some());
        assert!(http_url("https://").is_some());
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.check("email", required("")).check("email", email("x")).add("phone", "bad");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("This field is required"));
        assert_eq!(errors.to_string(), "email: This field is required; phone: bad");
        assert!(errors.into_result().is_err());
    }
}
