//! Audit log. Paging happens on the server, so the page is rendered as it arrives.

use super::details;
use crate::cli::AuditArgs;
use crate::screen::{Panel, Screen, View};
use crate::shell::Shell;
use anyhow::Context;
use ctn::domain::constants::AUDIT_GRID;
use ctn::domain::models::AuditQuery;
use ctn::features::audit::Audit;
use ctn::kernel::grid::{self, GridState};

pub(crate) async fn run(shell: &Shell, args: AuditArgs) -> anyhow::Result<Screen> {
    let query = AuditQuery {
        action: args.action,
        resource_type: args.resource_type,
        actor: args.actor,
        page: args.page,
        page_size: args.page_size,
    };
    let page = shell.slice::<Audit>()?.list(&query).await.context("Audit log not loaded")?;

    // The query only accepts offered page sizes, so the whole server page fits on one grid page.
    let page_size = usize::try_from(page.page_size).unwrap_or_default();
    let mut view = grid::apply(&page.data, &GridState { page_size, ..GridState::default() });
    view.page = usize::try_from(page.page).unwrap_or(1);
    view.page_count = usize::try_from(page.page_count()).unwrap_or(1);
    view.total = usize::try_from(page.total).unwrap_or(usize::MAX);
    view.matched = view.total;

    Ok(Screen::new(View::Audit, "Audit log")
        .with_panel(Panel::Grid { id: AUDIT_GRID, caption: "Audit entries".into(), view, search: None, empty_hint: None })
        .with_panel(details("Filters", &[("Action", &query.action), ("Resource", &query.resource_type), ("Actor", &query.actor)])))
}
