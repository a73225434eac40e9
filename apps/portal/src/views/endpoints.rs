use super::{details, invalid, overlay};
use crate::cli::{EndpointAction, EndpointFields, GridArgs};
use crate::screen::{Panel, Screen, View};
use crate::shell::Shell;
use anyhow::Context;
use ctn::domain::constants::ENDPOINTS_GRID;
use ctn::domain::models::{Endpoint, EndpointPayload};
use ctn::features::endpoints::{Endpoints, EndpointsError};

pub(crate) async fn panel(shell: &Shell, legal_entity_id: &str, grid: &GridArgs) -> anyhow::Result<Panel> {
    let rows = shell
        .slice::<Endpoints>()?
        .list(legal_entity_id)
        .await
        .context(format!("Endpoints of {legal_entity_id} not loaded"))?;
    Ok(shell
        .grid(ENDPOINTS_GRID, "Endpoints", &rows, grid, Some("Register one with `ctn-portal endpoints add`."))
        .await)
}

pub(crate) async fn run(shell: &Shell, action: EndpointAction) -> anyhow::Result<Screen> {
    let endpoints = shell.slice::<Endpoints>()?;
    match action {
        EndpointAction::List { legal_entity_id, grid } => {
            Ok(Screen::new(View::MemberDetail, "Endpoints").with_panel(panel(shell, &legal_entity_id, &grid).await?))
        },
        EndpointAction::Add { legal_entity_id, fields } => {
            let draft = format!("endpoint.create.{legal_entity_id}");
            let payload = fill(shell, &draft, EndpointPayload::default(), fields).await;
            let saved = endpoints.create(&legal_entity_id, &payload).await;
            submitted(shell, Screen::new(View::MemberDetail, "New endpoint"), &draft, &payload, saved).await
        },
        EndpointAction::Update { legal_entity_id, endpoint_id, fields } => {
            let current = find(endpoints, &legal_entity_id, &endpoint_id).await?;
            let draft = format!("endpoint.{endpoint_id}");
            let base = EndpointPayload {
                endpoint_name: current.endpoint_name,
                endpoint_url: current.endpoint_url,
                endpoint_type: current.endpoint_type,
                data_category: current.data_category,
                description: current.description,
                is_active: current.is_active,
            };
            let payload = fill(shell, &draft, base, fields).await;
            let saved = endpoints.update(&endpoint_id, &payload).await;
            submitted(shell, Screen::new(View::MemberDetail, "Edit endpoint"), &draft, &payload, saved).await
        },
        EndpointAction::Activate { legal_entity_id, endpoint_id } => {
            set_active(endpoints, &legal_entity_id, &endpoint_id, true).await
        },
        EndpointAction::Deactivate { legal_entity_id, endpoint_id } => {
            set_active(endpoints, &legal_entity_id, &endpoint_id, false).await
        },
        EndpointAction::Delete { endpoint_id } => {
            let prompt = format!("Delete endpoint {endpoint_id} and its tokens?");
            if let Err(cancelled) = shell.confirm(View::MemberDetail, &prompt) {
                return Ok(cancelled);
            }
            endpoints.delete(&endpoint_id).await.context(format!("Endpoint {endpoint_id} not deleted"))?;
            Ok(Screen::new(View::MemberDetail, "Endpoints").with_panel(Panel::Notice("Endpoint deleted.".into())))
        },
    }
}

async fn find(endpoints: &Endpoints, legal_entity_id: &str, endpoint_id: &str) -> anyhow::Result<Endpoint> {
    endpoints
        .list(legal_entity_id)
        .await
        .context(format!("Endpoints of {legal_entity_id} not loaded"))?
        .into_iter()
        .find(|e| e.endpoint_id == endpoint_id)
        .with_context(|| format!("Endpoint {endpoint_id} not found for {legal_entity_id}"))
}

async fn set_active(
    endpoints: &Endpoints,
    legal_entity_id: &str,
    endpoint_id: &str,
    active: bool,
) -> anyhow::Result<Screen> {
    let current = find(endpoints, legal_entity_id, endpoint_id).await?;
    let title = if active { "Endpoint activated" } else { "Endpoint deactivated" };
    if current.is_active == active {
        return Ok(Screen::new(View::MemberDetail, title).with_panel(endpoint_panel(&current)));
    }
    let endpoint = endpoints.set_active(&current, active).await.context(format!("Endpoint {endpoint_id} not updated"))?;
    Ok(Screen::new(View::MemberDetail, title).with_panel(endpoint_panel(&endpoint)))
}

async fn fill(shell: &Shell, draft: &str, base: EndpointPayload, fields: EndpointFields) -> EndpointPayload {
    let mut payload = if fields.resume { shell.load_draft(draft).await.unwrap_or(base) } else { base };
    overlay(&mut payload.endpoint_name, fields.name);
    overlay(&mut payload.endpoint_url, fields.url);
    overlay(&mut payload.endpoint_type, fields.endpoint_type);
    overlay(&mut payload.data_category, fields.category);
    overlay(&mut payload.is_active, fields.active);
    if fields.description.is_some() {
        payload.description = fields.description;
    }
    payload
}

async fn submitted(
    shell: &Shell,
    screen: Screen,
    draft: &str,
    payload: &EndpointPayload,
    saved: Result<Endpoint, EndpointsError>,
) -> anyhow::Result<Screen> {
    match saved {
        Ok(endpoint) => {
            shell.clear_draft(draft).await;
            Ok(screen.with_panel(endpoint_panel(&endpoint)))
        },
        Err(EndpointsError::Invalid { errors, .. }) => {
            shell.save_draft(draft, payload).await;
            Ok(invalid(shell, screen, errors))
        },
        Err(e) => {
            shell.save_draft(draft, payload).await;
            Err(e).context("Endpoint not saved")
        },
    }
}

fn endpoint_panel(endpoint: &Endpoint) -> Panel {
    details(
        "Endpoint",
        &[
            ("Endpoint ID", &endpoint.endpoint_id),
            ("Name", &endpoint.endpoint_name),
            ("URL", &endpoint.endpoint_url),
            ("Type", &endpoint.endpoint_type),
            ("Category", &endpoint.data_category),
            ("Description", &endpoint.description),
            ("Active", &endpoint.is_active),
            ("Created", &endpoint.created_at),
        ],
    )
}
