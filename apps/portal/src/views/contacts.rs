use super::{details, invalid, overlay};
use crate::cli::{ContactAction, ContactFields, GridArgs};
use crate::screen::{Panel, Screen, View};
use crate::shell::Shell;
use anyhow::Context;
use ctn::domain::constants::CONTACTS_GRID;
use ctn::domain::models::{ContactPayload, LegalEntityContact};
use ctn::features::contacts::{Contacts, ContactsError};

pub(crate) async fn panel(shell: &Shell, legal_entity_id: &str, grid: &GridArgs) -> anyhow::Result<Panel> {
    let rows = shell
        .slice::<Contacts>()?
        .list(legal_entity_id)
        .await
        .context(format!("Contacts of {legal_entity_id} not loaded"))?;
    Ok(shell.grid(CONTACTS_GRID, "Contacts", &rows, grid, Some("Add one with `ctn-portal contacts add`.")).await)
}

pub(crate) async fn run(shell: &Shell, action: ContactAction) -> anyhow::Result<Screen> {
    let contacts = shell.slice::<Contacts>()?;
    match action {
        ContactAction::List { legal_entity_id, grid } => {
            Ok(Screen::new(View::MemberDetail, "Contacts").with_panel(panel(shell, &legal_entity_id, &grid).await?))
        },
        ContactAction::Add { legal_entity_id, fields } => {
            let draft = format!("contact.create.{legal_entity_id}");
            let payload = fill(shell, &draft, ContactPayload::default(), fields).await;
            let saved = contacts.create(&legal_entity_id, &payload).await;
            submitted(shell, Screen::new(View::MemberDetail, "New contact"), &draft, &payload, saved).await
        },
        ContactAction::Update { legal_entity_id, contact_id, fields } => {
            let current = contacts
                .list(&legal_entity_id)
                .await
                .context(format!("Contacts of {legal_entity_id} not loaded"))?
                .into_iter()
                .find(|c| c.contact_id == contact_id)
                .with_context(|| format!("Contact {contact_id} not found for {legal_entity_id}"))?;

            let draft = format!("contact.{contact_id}");
            let base = ContactPayload {
                contact_type: current.contact_type,
                full_name: current.full_name,
                email: current.email,
                phone: current.phone,
                job_title: current.job_title,
                is_primary: current.is_primary,
            };
            let payload = fill(shell, &draft, base, fields).await;
            let saved = contacts.update(&contact_id, &payload).await;
            submitted(shell, Screen::new(View::MemberDetail, "Edit contact"), &draft, &payload, saved).await
        },
        ContactAction::Delete { contact_id } => {
            if let Err(cancelled) = shell.confirm(View::MemberDetail, &format!("Delete contact {contact_id}?")) {
                return Ok(cancelled);
            }
            contacts.delete(&contact_id).await.context(format!("Contact {contact_id} not deleted"))?;
            Ok(Screen::new(View::MemberDetail, "Contacts").with_panel(Panel::Notice("Contact deleted.".into())))
        },
    }
}

async fn fill(shell: &Shell, draft: &str, base: ContactPayload, fields: ContactFields) -> ContactPayload {
    let mut payload = if fields.resume { shell.load_draft(draft).await.unwrap_or(base) } else { base };
    overlay(&mut payload.contact_type, fields.contact_type);
    overlay(&mut payload.full_name, fields.name);
    overlay(&mut payload.email, fields.email);
    overlay(&mut payload.is_primary, fields.primary);
    if fields.phone.is_some() {
        payload.phone = fields.phone;
    }
    if fields.job_title.is_some() {
        payload.job_title = fields.job_title;
    }
    payload
}

async fn submitted(
    shell: &Shell,
    screen: Screen,
    draft: &str,
    payload: &ContactPayload,
    saved: Result<LegalEntityContact, ContactsError>,
) -> anyhow::Result<Screen> {
    match saved {
        Ok(contact) => {
            shell.clear_draft(draft).await;
            Ok(screen.with_panel(details(
                "Contact",
                &[
                    ("Contact ID", &contact.contact_id),
                    ("Type", &contact.contact_type),
                    ("Name", &contact.full_name),
                    ("Email", &contact.email),
                    ("Phone", &contact.phone),
                    ("Job title", &contact.job_title),
                    ("Primary", &contact.is_primary),
                ],
            )))
        },
        Err(ContactsError::Invalid { errors, .. }) => {
            shell.save_draft(draft, payload).await;
            Ok(invalid(shell, screen, errors))
        },
        Err(e) => {
            shell.save_draft(draft, payload).await;
            Err(e).context("Contact not saved")
        },
    }
}
