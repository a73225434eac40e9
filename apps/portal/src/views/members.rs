use super::{contacts, details, endpoints, identifiers, invalid, kvk};
use crate::cli::{EntityAction, GridArgs, MemberAction, MemberFields, Tab};
use crate::screen::{Panel, Screen, View};
use crate::shell::Shell;
use anyhow::Context;
use ctn::domain::constants::MEMBERS_GRID;
use ctn::domain::models::{CreateMember, LegalEntity, Member, UpdateLegalEntity, UpdateMember};
use ctn::features::members::{Members, MembersError};

pub(crate) async fn run(shell: &Shell, action: MemberAction) -> anyhow::Result<Screen> {
    let members = shell.slice::<Members>()?;
    match action {
        MemberAction::List(grid) => {
            let rows = members.list().await.context("Members not loaded")?;
            let panel = shell
                .grid(MEMBERS_GRID, "Members", &rows, &grid, Some("Create one with `ctn-portal members create`."))
                .await;
            Ok(Screen::new(View::Members, "Members").with_panel(panel))
        },
        MemberAction::Show { member_id, tab, grid } => show(shell, members, &member_id, tab, &grid).await,
        MemberAction::Create(fields) => create(shell, members, fields).await,
        MemberAction::Update { member_id, legal_name, domain, status, level } => {
            let input = UpdateMember { legal_name, domain, status, membership_level: level };
            let screen = Screen::new(View::MemberDetail, "Edit member");
            match members.update(&member_id, &input).await {
                Ok(member) => Ok(screen.with_panel(member_panel(&member))),
                Err(MembersError::Invalid { errors, .. }) => Ok(invalid(shell, screen, errors)),
                Err(e) => Err(e).context(format!("Member {member_id} not updated")),
            }
        },
        MemberAction::Delete { member_id } => {
            let member = members.get(&member_id).await.context(format!("Member {member_id}"))?;
            let prompt = format!("Delete {} ({}) and its legal entity?", member.legal_name, member.org_id);
            if let Err(cancelled) = shell.confirm(View::Members, &prompt) {
                return Ok(cancelled);
            }
            members.delete(&member_id).await.context(format!("Member {member_id} not deleted"))?;
            Ok(Screen::new(View::Members, "Members").with_panel(Panel::Notice(format!("{} was deleted.", member.legal_name))))
        },
    }
}

async fn show(shell: &Shell, members: &Members, member_id: &str, tab: Tab, grid: &GridArgs) -> anyhow::Result<Screen> {
    let member = members.get(member_id).await.context(format!("Member {member_id}"))?;
    let le = member.legal_entity_id.as_str();
    let entity = members.legal_entity(le).await.context(format!("Legal entity {le}"))?;

    let mut screen = Screen::new(View::MemberDetail, member.legal_name.clone());
    screen.push(member_panel(&member));
    screen.push(entity_panel(&entity));
    match tab {
        Tab::Identifiers => screen.push(identifiers::panel(shell, le, grid).await?),
        Tab::Contacts => screen.push(contacts::panel(shell, le, grid).await?),
        Tab::Endpoints => screen.push(endpoints::panel(shell, le, grid).await?),
        Tab::Kvk => screen.panels.extend(kvk::status_panels(shell, le, false).await?),
    }
    Ok(screen)
}

async fn create(shell: &Shell, members: &Members, fields: MemberFields) -> anyhow::Result<Screen> {
    let input = CreateMember {
        legal_name: fields.legal_name.unwrap_or_default(),
        org_id: fields.org_id.unwrap_or_default(),
        domain: fields.domain.unwrap_or_default(),
        country_code: fields.country.unwrap_or_default(),
        membership_level: fields.level.unwrap_or_default(),
        entity_legal_form: fields.legal_form,
        city: fields.city,
    };

    let screen = Screen::new(View::MemberDetail, "New member");
    match members.create(&input).await {
        Ok(member) => Ok(screen.with_panel(member_panel(&member))),
        Err(MembersError::Invalid { errors, .. }) => Ok(invalid(shell, screen, errors)),
        Err(e) => Err(e).context("Member not created"),
    }
}

/// Legal entity tab of the member detail.
pub(crate) async fn entity(shell: &Shell, action: EntityAction) -> anyhow::Result<Screen> {
    let members = shell.slice::<Members>()?;
    match action {
        EntityAction::Show { legal_entity_id } => {
            let entity = members.legal_entity(&legal_entity_id).await.context(format!("Legal entity {legal_entity_id}"))?;
            Ok(Screen::new(View::MemberDetail, entity.primary_legal_name.clone()).with_panel(entity_panel(&entity)))
        },
        EntityAction::Update { legal_entity_id, name, address, postal_code, city, country, legal_form } => {
            let input = UpdateLegalEntity {
                primary_legal_name: name,
                address_line: address,
                postal_code,
                city,
                country_code: country,
                entity_legal_form: legal_form,
            };
            let screen = Screen::new(View::MemberDetail, "Edit legal entity");
            match members.update_legal_entity(&legal_entity_id, &input).await {
                Ok(entity) => Ok(screen.with_panel(entity_panel(&entity))),
                Err(MembersError::Invalid { errors, .. }) => Ok(invalid(shell, screen, errors)),
                Err(e) => Err(e).context(format!("Legal entity {legal_entity_id} not updated")),
            }
        },
    }
}

fn member_panel(member: &Member) -> Panel {
    details(
        "Member",
        &[
            ("Member ID", &member.member_id),
            ("Legal name", &member.legal_name),
            ("Org ID", &member.org_id),
            ("Domain", &member.domain),
            ("Country", &member.country_code),
            ("Status", &member.status),
            ("Level", &member.membership_level),
            ("Legal entity ID", &member.legal_entity_id),
            ("Created", &member.created_at),
        ],
    )
}

fn entity_panel(entity: &LegalEntity) -> Panel {
    details(
        "Legal entity",
        &[
            ("Legal name", &entity.primary_legal_name),
            ("Address", &entity.address_line),
            ("Postal code", &entity.postal_code),
            ("City", &entity.city),
            ("Country", &entity.country_code),
            ("Legal form", &entity.entity_legal_form),
            ("Status", &entity.status),
            ("Registered", &entity.registered_at),
        ],
    )
}
