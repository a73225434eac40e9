//! Endpoints feature slice.

mod error;

pub use error::{EndpointsError, EndpointsErrorExt};

use ctn_kernel::client::ApiClient;
use ctn_kernel::domain::models::{Endpoint, EndpointPayload};
use ctn_kernel::domain::registry::InitializedSlice;
use ctn_kernel::forms::{self, FieldErrors};
use ctn_kernel::notify::Notifier;
use tracing::info;

/// Endpoints feature state.
#[ctn_derive::ctn_slice]
pub struct Endpoints {
    client: ApiClient,
    notifier: Notifier,
}

/// Initialize the endpoints feature.
#[must_use]
pub fn init(client: ApiClient, notifier: Notifier) -> InitializedSlice {
    info!("Endpoints slice initialized");
    InitializedSlice::new(Endpoints::new(EndpointsInner { client, notifier }))
}

/// # Errors
/// A missing name or a URL that is not https (http is allowed for localhost only).
pub fn validate(input: &EndpointPayload) -> Result<EndpointPayload, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors
        .check("endpointName", forms::required(&input.endpoint_name))
        .check("endpointUrl", forms::required(&input.endpoint_url))
        .check("endpointUrl", forms::http_url(&input.endpoint_url));
    errors.into_result()?;

    Ok(EndpointPayload {
        endpoint_name: input.endpoint_name.trim().to_owned(),
        endpoint_url: input.endpoint_url.trim().to_owned(),
        description: input.description.as_deref().map(str::trim).filter(|d| !d.is_empty()).map(str::to_owned),
        ..input.clone()
    })
}

impl Endpoints {
    pub async fn list(&self, legal_entity_id: &str) -> Result<Vec<Endpoint>, EndpointsError> {
        Ok(self.client.get(&format!("/legal-entities/{legal_entity_id}/endpoints")).await?)
    }

    pub async fn create(&self, legal_entity_id: &str, input: &EndpointPayload) -> Result<Endpoint, EndpointsError> {
        let payload = validate(input)?;
        let endpoint: Endpoint =
            self.client.post(&format!("/legal-entities/{legal_entity_id}/endpoints"), &payload).await?;

        info!(legal_entity_id, endpoint_id = %endpoint.endpoint_id, "Endpoint created");
        self.notifier.success(format!("Endpoint {} registered", endpoint.endpoint_name));
        Ok(endpoint)
    }

    /// Full update; also used to activate or deactivate.
    pub async fn update(&self, endpoint_id: &str, input: &EndpointPayload) -> Result<Endpoint, EndpointsError> {
        let payload = validate(input)?;
        let endpoint: Endpoint = self.client.put(&format!("/endpoints/{endpoint_id}"), &payload).await?;

        info!(endpoint_id, active = endpoint.is_active, "Endpoint updated");
        self.notifier.success(format!("Endpoint {} updated", endpoint.endpoint_name));
        Ok(endpoint)
    }

    /// Flips `is_active` on the current endpoint.
    pub async fn set_active(&self, endpoint: &Endpoint, active: bool) -> Result<Endpoint, EndpointsError> {
        let payload = EndpointPayload {
            endpoint_name: endpoint.endpoint_name.clone(),
            endpoint_url: endpoint.endpoint_url.clone(),
            endpoint_type: endpoint.endpoint_type,
            data_category: endpoint.data_category,
            description: endpoint.description.clone(),
            is_active: active,
        };
        self.update(&endpoint.endpoint_id, &payload).await
    }

    pub async fn delete(&self, endpoint_id: &str) -> Result<(), EndpointsError> {
        self.client.delete(&format!("/endpoints/{endpoint_id}")).await?;

        info!(endpoint_id, "Endpoint deleted");
        self.notifier.success("Endpoint deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(url: &str) -> EndpointPayload {
        EndpointPayload {
            endpoint_name: "Container events".into(),
            endpoint_url: url.into(),
            ..EndpointPayload::default()
        }
    }

    #[test]
    fn https_or_local_http_only() {
        assert!(validate(&payload("https://api.acme.nl/events")).is_ok());
        assert!(validate(&payload("http://localhost:8080/events")).is_ok());

        let errors = validate(&payload("http://api.acme.nl/events")).expect_err("plain http");
        assert_eq!(
            errors.get("endpointUrl"),
            Some("Use https (plain http is only allowed for localhost)")
        );
    }

    #[test]
    fn name_is_required_and_new_endpoints_are_active() {
        let mut input = payload("https://api.acme.nl");
        assert!(validate(&input).expect("valid").is_active);

        input.endpoint_name = "  ".into();
        assert!(validate(&input).expect_err("no name").get("endpointName").is_some());
    }
}
