//! Identifier form. The country is applied before the type so the type list matches it; a
//! submission that fails any check is kept as a draft.

use super::{details, invalid};
use crate::cli::{GridArgs, IdentifierAction, IdentifierFields};
use crate::screen::{Panel, Screen, View};
use crate::shell::Shell;
use anyhow::Context;
use ctn::domain::constants::IDENTIFIERS_GRID;
use ctn::domain::models::LegalEntityIdentifier;
use ctn::features::identifiers::form::IdentifierForm;
use ctn::features::identifiers::{Identifiers, IdentifiersError};
use ctn::kernel::forms::FieldErrors;

pub(crate) async fn panel(shell: &Shell, legal_entity_id: &str, grid: &GridArgs) -> anyhow::Result<Panel> {
    let rows = shell
        .slice::<Identifiers>()?
        .list(legal_entity_id)
        .await
        .context(format!("Identifiers of {legal_entity_id} not loaded"))?;
    Ok(shell
        .grid(
            IDENTIFIERS_GRID,
            "Identifiers",
            &rows,
            grid,
            Some("Add one with `ctn-portal identifiers add <legal-entity> --country NL --type KVK --value ...`."),
        )
        .await)
}

pub(crate) async fn run(shell: &Shell, action: IdentifierAction) -> anyhow::Result<Screen> {
    let identifiers = shell.slice::<Identifiers>()?;
    match action {
        IdentifierAction::List { legal_entity_id, grid } => {
            Ok(Screen::new(View::MemberDetail, "Identifiers").with_panel(panel(shell, &legal_entity_id, &grid).await?))
        },
        IdentifierAction::Add { legal_entity_id, fields } => {
            let draft = format!("identifier.create.{legal_entity_id}");
            let (form, errors) = fill(shell, &draft, IdentifierForm::new(), fields).await;
            let screen = Screen::new(View::MemberDetail, "New identifier");
            if !errors.is_empty() {
                return Ok(rejected(shell, screen, &draft, &form, errors).await);
            }
            let saved = identifiers.create(&legal_entity_id, &form).await;
            submitted(shell, screen, &draft, &form, saved).await
        },
        IdentifierAction::Update { legal_entity_id, identifier_id, fields } => {
            let current = identifiers
                .list(&legal_entity_id)
                .await
                .context(format!("Identifiers of {legal_entity_id} not loaded"))?
                .into_iter()
                .find(|i| i.identifier_id == identifier_id)
                .with_context(|| format!("Identifier {identifier_id} not found for {legal_entity_id}"))?;

            let draft = format!("identifier.{identifier_id}");
            let (form, errors) = fill(shell, &draft, IdentifierForm::from_identifier(&current), fields).await;
            let screen = Screen::new(View::MemberDetail, "Edit identifier");
            if !errors.is_empty() {
                return Ok(rejected(shell, screen, &draft, &form, errors).await);
            }
            let saved = identifiers.update(&identifier_id, &form).await;
            submitted(shell, screen, &draft, &form, saved).await
        },
        IdentifierAction::Delete { identifier_id } => {
            if let Err(cancelled) = shell.confirm(View::MemberDetail, &format!("Delete identifier {identifier_id}?")) {
                return Ok(cancelled);
            }
            identifiers.delete(&identifier_id).await.context(format!("Identifier {identifier_id} not deleted"))?;
            Ok(Screen::new(View::MemberDetail, "Identifiers").with_panel(Panel::Notice("Identifier deleted.".into())))
        },
    }
}

/// Starts from the draft (with `--resume`) or `base`, then applies the flags in form order.
async fn fill(shell: &Shell, draft: &str, base: IdentifierForm, fields: IdentifierFields) -> (IdentifierForm, FieldErrors) {
    let mut form = if fields.resume {
        shell.load_draft(draft).await.unwrap_or_else(|| {
            shell.state().notifier.info(format!("No saved draft for {draft}"));
            base
        })
    } else {
        base
    };

    if let Some(country) = &fields.country {
        form.set_country(country);
    }
    let mut errors = match fields.identifier_type.as_deref().map(|code| form.select_type(code)) {
        Some(Err(errors)) => errors,
        _ => FieldErrors::new(),
    };
    if fields.registry_name.is_some() || fields.registry_url.is_some() {
        let (name, url) = form.registry();
        let name = fields.registry_name.as_deref().or(name).map(str::to_owned);
        let url = fields.registry_url.as_deref().or(url).map(str::to_owned);
        form.set_registry(name.as_deref(), url.as_deref());
    }
    if let Some(value) = &fields.value {
        form.set_value(value);
    }
    if fields.status.is_some() {
        form.set_validation_status(fields.status);
    }
    if let Some(notes) = &fields.notes {
        form.set_notes(Some(notes));
    }

    // A refused type selection explains more than "Select an identifier type".
    for (field, message) in form.errors().iter() {
        errors.add(field, message);
    }
    (form, errors)
}

async fn rejected(shell: &Shell, screen: Screen, draft: &str, form: &IdentifierForm, errors: FieldErrors) -> Screen {
    shell.save_draft(draft, form).await;
    invalid(shell, screen.with_panel(form_panel(form)), errors)
}

async fn submitted(
    shell: &Shell,
    screen: Screen,
    draft: &str,
    form: &IdentifierForm,
    saved: Result<LegalEntityIdentifier, IdentifiersError>,
) -> anyhow::Result<Screen> {
    match saved {
        Ok(identifier) => {
            shell.clear_draft(draft).await;
            Ok(screen.with_panel(details(
                "Identifier",
                &[
                    ("Identifier ID", &identifier.identifier_id),
                    ("Country", &identifier.country_code),
                    ("Type", &identifier.identifier_type),
                    ("Value", &identifier.identifier_value),
                    ("Registry", &identifier.registry_name),
                    ("Registry URL", &identifier.registry_url),
                    ("Status", &identifier.validation_status),
                    ("Notes", &identifier.verification_notes),
                ],
            )))
        },
        Err(IdentifiersError::Invalid { errors, .. }) => Ok(rejected(shell, screen, draft, form, errors).await),
        Err(e) => {
            shell.save_draft(draft, form).await;
            Err(e).context("Identifier not saved")
        },
    }
}

/// What the form currently holds, with the types the country offers.
fn form_panel(form: &IdentifierForm) -> Panel {
    let (registry, url) = form.registry();
    let offered = form.available_types().join(", ");
    details(
        "Identifier form",
        &[
            ("Country", &form.country_code().to_owned()),
            ("Types offered", &offered),
            ("Type", &form.identifier_type().map(str::to_owned)),
            ("Expected format", &form.hint().map(str::to_owned)),
            ("Value", &form.identifier_value().to_owned()),
            ("Registry", &registry.map(str::to_owned)),
            ("Registry URL", &url.map(str::to_owned)),
        ],
    )
}
