use chrono::{Duration, Utc};
use ctn_kernel::domain::config::PortalConfig;
use ctn_kernel::domain::grid::SortSpec;
use ctn_kernel::prefs::GridPreferences;
use ctn_kernel::session::Session;
use ctn_kernel::state::{PortalState, PortalStateError};
use ctn_storage::Storage;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct ContactDraft {
    full_name: String,
    email: String,
}

async fn state(temp: &TempDir) -> PortalState {
    let storage = Storage::builder().root(temp.path()).connect().await.expect("storage");
    PortalState::builder()
        .config(PortalConfig::default())
        .storage(storage)
        .build()
        .expect("state")
}

#[tokio::test]
async fn session_survives_a_restart_until_it_expires() {
    let temp = TempDir::new().expect("tempdir");
    let session = Session {
        token: "dev-token".into(),
        account: "admin@ctn.example".into(),
        expires_at: Utc::now() + Duration::hours(1),
    };
    state(&temp).await.session.store(&session).await.expect("store");

    let restarted = state(&temp).await;
    let restored = restarted.restore_session().await;
    assert_eq!(restored.as_ref().map(|s| s.account.as_str()), Some("admin@ctn.example"));
    assert_eq!(restarted.client.credentials().map(|c| c.token), Some("dev-token".to_owned()));

    let expired = Session { expires_at: Utc::now() + Duration::seconds(10), ..session };
    restarted.session.store(&expired).await.expect("store");
    assert!(restarted.restore_session().await.is_none());
    assert!(restarted.client.credentials().is_none());
}

#[tokio::test]
async fn grid_preferences_are_kept_per_grid() {
    let temp = TempDir::new().expect("tempdir");
    let state = state(&temp).await;

    let prefs = GridPreferences {
        visible_columns: Some(vec!["legalName".into(), "orgId".into()]),
        sort: SortSpec::parse("legalName:desc"),
        page_size: Some(20),
    };
    state.prefs.save("members", &prefs).await.expect("save");

    assert_eq!(state.prefs.load("members").await, prefs);
    assert_eq!(state.prefs.load("contacts").await, GridPreferences::default());

    assert!(state.prefs.reset("members").await.expect("reset"));
    assert_eq!(state.prefs.load("members").await, GridPreferences::default());
}

#[tokio::test]
async fn corrupt_preferences_fall_back_to_defaults() {
    let temp = TempDir::new().expect("tempdir");
    let state = state(&temp).await;
    std::fs::create_dir_all(temp.path().join("prefs")).expect("mkdir");
    std::fs::write(temp.path().join("prefs/audit.json"), b"[not json").expect("write");

    assert_eq!(state.prefs.load("audit").await, GridPreferences::default());
}

#[tokio::test]
async fn drafts_round_trip_and_clear() {
    let temp = TempDir::new().expect("tempdir");
    let state = state(&temp).await;
    let draft = ContactDraft { full_name: "Ada Jansen".into(), email: "ada@".into() };

    state.drafts.save("contact.le-1", &draft).await.expect("save");
    assert_eq!(state.drafts.pending().await.expect("keys"), vec!["contact.le-1".to_owned()]);
    assert_eq!(state.drafts.load::<ContactDraft>("contact.le-1").await.expect("load"), Some(draft));

    assert!(state.drafts.clear("contact.le-1").await.expect("clear"));
    assert!(state.drafts.load::<ContactDraft>("contact.le-1").await.expect("load").is_none());
}

#[test]
fn builder_requires_storage() {
    let err = PortalState::builder().config(PortalConfig::default()).build().expect_err("no storage");
    assert!(matches!(err, PortalStateError::Validation { .. }));
}
