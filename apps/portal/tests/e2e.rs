use ctn::domain::config::PortalConfig;
use ctn::kernel::confirm::{AlwaysConfirm, Confirm, ScriptedConfirm};
use ctn::kernel::grid::EmptyReason;
use ctn::kernel::notify::ToastKind;
use ctn::domain::models::AuditAction;
use ctn_portal::cli::{
    AuditArgs, Command, GridArgs, IdentifierAction, IdentifierFields, KvkAction, MemberAction, Tab, TokenAction,
};
use ctn_portal::{Outcome, Screen, Shell, View};
use ctn_sandbox::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;

async fn sandbox() -> SocketAddr {
    let server = Server::builder().port(0).build().await.expect("sandbox builds");
    let (addr, _handle) = server.spawn().await.expect("sandbox listens");
    addr
}

async fn portal(base_url: &str, dir: &TempDir, confirm: Arc<dyn Confirm>) -> Shell {
    let mut cfg = PortalConfig::default();
    cfg.api.base_url = base_url.to_owned();
    cfg.auth.login_url = "https://login.ctn.example/signin".to_owned();
    cfg.storage.data_dir = dir.path().to_path_buf();
    cfg.verification.poll_interval_ms = 20;
    let state = ctn::bootstrap(cfg).await.expect("portal bootstraps");
    Shell::new(state, confirm)
}

async fn signed_in(confirm: Arc<dyn Confirm>) -> (Shell, TempDir) {
    let addr = sandbox().await;
    let dir = TempDir::new().expect("temp dir");
    let shell = portal(&format!("http://{addr}"), &dir, confirm).await;
    let screen = shell
        .run(Some(Command::Login {
            token: "e2e-token".into(),
            account: "admin@ctn.example".into(),
            expires_in: 60,
        }))
        .await;
    assert_eq!(screen.outcome, Outcome::Shown);
    (shell, dir)
}

fn members(grid: GridArgs) -> Option<Command> {
    Some(Command::Members { action: MemberAction::List(grid) })
}

/// Legal entity of the seeded Acme member.
async fn acme_entity(shell: &Shell) -> String {
    let list = shell.run(members(GridArgs { search: Some("acme".into()), ..GridArgs::default() })).await;
    let member_id = list.grid().and_then(|g| g.row_ids.first().cloned()).expect("acme listed");

    let detail = shell
        .run(Some(Command::Members {
            action: MemberAction::Show {
                member_id,
                tab: Tab::Identifiers,
                grid: GridArgs::default(),
            },
        }))
        .await;
    detail.detail("Legal entity ID").expect("legal entity shown").to_owned()
}

fn add_identifier(legal_entity_id: &str, value: &str, resume: bool) -> Option<Command> {
    Some(Command::Identifiers {
        action: IdentifierAction::Add {
            legal_entity_id: legal_entity_id.to_owned(),
            fields: IdentifierFields {
                country: (!resume).then(|| "NL".into()),
                identifier_type: (!resume).then(|| "KVK".into()),
                value: Some(value.to_owned()),
                resume,
                ..IdentifierFields::default()
            },
        },
    })
}

#[tokio::test]
async fn signed_out_views_redirect_without_calling_the_api() {
    let dir = TempDir::new().expect("temp dir");
    // Nothing listens here; any request would fail the view instead of redirecting.
    let shell = portal("http://127.0.0.1:9", &dir, Arc::new(AlwaysConfirm)).await;

    for command in [None, members(GridArgs::default())] {
        let screen = shell.run(command).await;
        assert_eq!(screen.outcome, Outcome::Redirect("https://login.ctn.example/signin".into()));
        assert_eq!(screen.view, View::SignIn);
        assert!(!screen.has_toast(ToastKind::Error));
    }

    let help = shell.run(Some(Command::Help { topic: Some("tokens".into()) })).await;
    assert_eq!(help.outcome, Outcome::Shown);
}

#[tokio::test]
async fn signed_in_landing_page_is_the_dashboard() {
    let (shell, _dir) = signed_in(Arc::new(AlwaysConfirm)).await;

    let screen = shell.run(None).await;
    assert!(screen.redirect_target().is_none());
    assert_eq!(screen.view, View::Dashboard);
    assert_eq!(screen.account.as_deref(), Some("admin@ctn.example"));
    assert_eq!(screen.detail("Members"), Some("3"));

    shell.run(Some(Command::Logout)).await;
    assert!(shell.run(None).await.redirect_target().is_some());
}

#[tokio::test]
async fn members_grid_searches_and_remembers_its_sort() {
    let (shell, _dir) = signed_in(Arc::new(AlwaysConfirm)).await;

    let all = shell.run(members(GridArgs::default())).await;
    let grid = all.grid().expect("members grid");
    assert_eq!(grid.total, 3);
    assert!(grid.empty.is_none());

    let rhein = shell.run(members(GridArgs { search: Some("RHEIN".into()), ..GridArgs::default() })).await;
    let grid = rhein.grid().expect("members grid");
    assert_eq!(grid.matched, 1);
    assert_eq!(grid.cell(0, "orgId"), Some("org:rhein-cargo"));

    let none = shell.run(members(GridArgs { search: Some("zzz".into()), ..GridArgs::default() })).await;
    assert_eq!(none.grid().and_then(|g| g.empty), Some(EmptyReason::NoMatches));

    shell.run(members(GridArgs { sort: Some("legalName:desc".into()), ..GridArgs::default() })).await;
    let sorted = shell.run(members(GridArgs::default())).await;
    assert_eq!(sorted.grid().and_then(|g| g.cell(0, "legalName")), Some("Scheldt Warehousing NV"));
}

#[tokio::test]
async fn invalid_identifier_is_blocked_and_kept_as_draft() {
    let (shell, _dir) = signed_in(Arc::new(AlwaysConfirm)).await;
    let le = acme_entity(&shell).await;
    let draft = format!("identifier.create.{le}");

    let rejected: Screen = shell.run(add_identifier(&le, "12AB", false)).await;
    assert_eq!(rejected.outcome, Outcome::Failed);
    assert_eq!(rejected.form_errors.get("identifierValue"), Some("Invalid KVK format: expected 8 digits"));
    assert!(shell.state().drafts.pending().await.expect("drafts").contains(&draft));

    let saved = shell.run(add_identifier(&le, "87654321", true)).await;
    assert_eq!(saved.outcome, Outcome::Shown);
    assert_eq!(saved.detail("Registry"), Some("Kamer van Koophandel"));
    assert!(saved.has_toast(ToastKind::Success));
    assert!(!shell.state().drafts.pending().await.expect("drafts").contains(&draft));
}

#[tokio::test]
async fn declined_confirmation_sends_nothing() {
    let confirm = ScriptedConfirm::new([false]);
    let (shell, _dir) = signed_in(Arc::new(confirm.clone())).await;

    let member_id = shell
        .run(members(GridArgs::default()))
        .await
        .grid()
        .and_then(|g| g.row_ids.first().cloned())
        .expect("a member");

    let screen = shell.run(Some(Command::Members { action: MemberAction::Delete { member_id } })).await;
    assert_eq!(screen.outcome, Outcome::Cancelled);
    assert_eq!(confirm.asked().len(), 1);
    assert_eq!(shell.run(members(GridArgs::default())).await.grid().map(|g| g.total), Some(3));
}

#[tokio::test]
async fn api_errors_become_error_toasts() {
    let (shell, _dir) = signed_in(Arc::new(AlwaysConfirm)).await;

    let screen = shell
        .run(Some(Command::Tokens { action: TokenAction::Issue { endpoint_id: "missing".into(), days: Some(30) } }))
        .await;
    assert_eq!(screen.outcome, Outcome::Failed);
    let toast = screen.toasts.iter().find(|t| t.kind == ToastKind::Error).expect("error toast");
    assert_eq!(toast.title.as_deref(), Some("Token not issued"));
    assert!(toast.message.starts_with("Not found"));
}

#[tokio::test]
async fn kvk_mismatch_is_flagged_and_reviewed() {
    let (shell, dir) = signed_in(Arc::new(AlwaysConfirm)).await;
    let le = acme_entity(&shell).await;
    let file = dir.path().join("acme-extract.pdf");
    std::fs::write(&file, "%PDF-1.4\nKvK nummer: 12345678\nHandelsnaam: Acme Holding B.V.\nPlaats: Rotterdam\n")
        .expect("document written");

    let uploaded = shell
        .run(Some(Command::Kvk { action: KvkAction::Upload { legal_entity_id: le.clone(), file, wait: true } }))
        .await;
    assert_eq!(uploaded.outcome, Outcome::Shown);
    assert_eq!(uploaded.detail("Status"), Some("FLAGGED"));
    let comparison = uploaded.grid().expect("comparison grid");
    let company = comparison.row_ids.iter().position(|k| k == "companyName").expect("company row");
    assert_eq!(comparison.cell(company, "status"), Some("Mismatch"));
    let verification_id = uploaded.detail("Verification ID").expect("verification id").to_owned();

    let queue = shell.run(Some(Command::Kvk { action: KvkAction::Queue(GridArgs::default()) })).await;
    assert!(queue.grid().is_some_and(|g| g.row_ids.contains(&verification_id)));

    let review = |approve: bool| {
        Some(Command::Kvk {
            action: KvkAction::Review { verification_id: verification_id.clone(), approve, reject: !approve, notes: None },
        })
    };
    let blocked = shell.run(review(false)).await;
    assert_eq!(blocked.outcome, Outcome::Failed);
    assert!(blocked.form_errors.get("notes").is_some());

    let approved = shell.run(review(true)).await;
    assert_eq!(approved.detail("Status"), Some("VERIFIED"));
    assert_eq!(approved.detail("Reviewed by"), Some("admin@ctn.example"));
}

#[tokio::test]
async fn audit_log_lists_the_callers_changes() {
    let (shell, _dir) = signed_in(Arc::new(AlwaysConfirm)).await;
    let le = acme_entity(&shell).await;
    assert_eq!(shell.run(add_identifier(&le, "87654321", false)).await.outcome, Outcome::Shown);

    let screen = shell
        .run(Some(Command::Audit(AuditArgs {
            action: Some(AuditAction::Create),
            resource_type: None,
            actor: Some("admin@ctn.example".into()),
            page: 1,
            page_size: 10,
        })))
        .await;
    let grid = screen.grid().expect("audit grid");
    assert_eq!(grid.total, 1);
    assert_eq!(grid.cell(0, "action"), Some("CREATE"));
    assert_eq!(grid.cell(0, "actor"), Some("admin@ctn.example"));
}
