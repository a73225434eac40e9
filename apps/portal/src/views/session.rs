use super::details;
use crate::cli::PrefsAction;
use crate::help;
use crate::screen::{Panel, Screen, View};
use crate::shell::Shell;
use anyhow::Context;
use chrono::{Duration, Utc};
use ctn::domain::constants::{
    AUDIT_GRID, CONTACTS_GRID, ENDPOINTS_GRID, FLAGGED_GRID, IDENTIFIERS_GRID, MEMBERS_GRID,
    TOKENS_GRID,
};
use ctn::domain::models::MemberStatus;
use ctn::features::members::Members;
use ctn::features::verification::Verification;
use ctn::kernel::session::Session;
use tracing::info;

const GRIDS: [&str; 7] =
    [MEMBERS_GRID, IDENTIFIERS_GRID, CONTACTS_GRID, ENDPOINTS_GRID, TOKENS_GRID, AUDIT_GRID, FLAGGED_GRID];

/// Caches a token handed out by the sign-in page.
pub(crate) async fn login(shell: &Shell, token: String, account: String, expires_in: u32) -> Screen {
    let state = shell.state();
    let mut screen = Screen::new(View::SignIn, "Sign in");

    let session = Session {
        token: token.trim().to_owned(),
        account: account.trim().to_owned(),
        expires_at: Utc::now() + Duration::minutes(i64::from(expires_in)),
    };
    if session.account.is_empty() || !session.is_valid_at(Utc::now(), state.config.auth.session_skew_secs) {
        state.notifier.error("Sign-in failed", "Token is empty or expires too soon");
        screen.fail();
        return screen;
    }

    if let Err(e) = state.session.store(&session).await {
        state.notifier.report("Sign-in failed", &e);
        screen.fail();
        return screen;
    }

    info!(account = %session.account, expires_at = %session.expires_at, "Session cached");
    state.notifier.success(format!("Signed in as {}", session.account));
    screen.push(details("Session", &[("Account", &session.account), ("Expires", &session.expires_at)]));
    screen.account = Some(session.account);
    screen
}

pub(crate) async fn logout(shell: &Shell) -> Screen {
    let state = shell.state();
    let mut screen = Screen::new(View::SignIn, "Signed out");
    state.client.set_credentials(None);

    match state.session.clear().await {
        Ok(true) => {
            info!("Session cleared");
            state.notifier.success("Signed out");
        },
        Ok(false) => {
            state.notifier.info("No session was cached");
        },
        Err(e) => {
            state.notifier.report("Sign-out failed", &e);
            screen.fail();
        },
    }
    screen
}

pub(crate) fn help(topic: Option<&str>) -> Screen {
    let mut screen = Screen::new(View::Help, "Help");
    let Some(topic) = topic else {
        screen.push(Panel::Notice(format!(
            "Topics: {}. Identifier types (KVK, LEI, EORI, ...) are topics too.",
            help::topics().join(", ")
        )));
        return screen;
    };

    match help::topic(topic) {
        Some(text) => screen.push(Panel::Notice(text)),
        None => {
            screen.push(Panel::Notice(format!("No help for '{topic}'. Topics: {}", help::topics().join(", "))));
            screen.fail();
        },
    }
    if topic.eq_ignore_ascii_case("identifiers") {
        screen.push(Panel::Details {
            caption: "Identifier types for NL".into(),
            rows: help::identifier_types("NL"),
        });
    }
    screen
}

/// Landing page: who is signed in, where the register lives and what needs attention.
pub(crate) async fn dashboard(shell: &Shell) -> anyhow::Result<Screen> {
    let state = shell.state();
    let members = shell.slice::<Members>()?.list().await.context("Members not loaded")?;
    let flagged = shell.slice::<Verification>()?.flagged().await.context("Review queue not loaded")?;
    let drafts = state.drafts.pending().await.unwrap_or_default();

    let count = |status: MemberStatus| members.iter().filter(|m| m.status == status).count();
    let session = state.session.current().await;

    let mut screen = Screen::new(View::Dashboard, "Dashboard");
    screen.push(details(
        "Session",
        &[
            ("Account", &session.as_ref().map(|s| s.account.clone())),
            ("Expires", &session.as_ref().map(|s| s.expires_at)),
            ("Register API", &state.client.base_url().to_owned()),
        ],
    ));
    screen.push(details(
        "Register",
        &[
            ("Members", &members.len()),
            ("Active", &count(MemberStatus::Active)),
            ("Pending", &count(MemberStatus::Pending)),
            ("Suspended", &count(MemberStatus::Suspended)),
            ("KvK reviews waiting", &flagged.len()),
        ],
    ));
    if !drafts.is_empty() {
        screen.push(Panel::Notice(format!("Unsaved drafts: {}", drafts.join(", "))));
    }
    Ok(screen)
}

pub(crate) async fn prefs(shell: &Shell, action: PrefsAction) -> anyhow::Result<Screen> {
    let PrefsAction::Reset { grid } = action;
    let Some(grid) = GRIDS.iter().find(|g| g.eq_ignore_ascii_case(grid.trim())) else {
        anyhow::bail!("Unknown grid '{grid}'; one of {}", GRIDS.join(", "));
    };

    let state = shell.state();
    if state.prefs.reset(grid).await.context("Preferences not reset")? {
        state.notifier.success(format!("Columns, sort and page size of {grid} reset"));
    } else {
        state.notifier.info(format!("Nothing was saved for {grid}"));
    }
    Ok(Screen::new(View::Dashboard, "Preferences"))
}
