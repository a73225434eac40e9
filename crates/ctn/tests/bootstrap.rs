use ctn::domain::config::PortalConfig;
use ctn::features::members::Members;
use ctn::features::verification::Verification;
use ctn::{BootstrapError, bootstrap, features};

#[tokio::test]
async fn bootstrap_registers_every_slice() -> Result<(), BootstrapError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = PortalConfig::default();
    config.storage.data_dir = dir.path().join("store");

    let state = bootstrap(config).await?;

    assert!(state.get_slice::<Members>().is_some());
    assert!(state.get_slice::<Verification>().is_some());
    assert_eq!(state.slice_names().count(), 7);
    assert!(dir.path().join("store").is_dir());
    Ok(())
}

#[tokio::test]
async fn bootstrap_starts_signed_out() -> Result<(), BootstrapError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = PortalConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();

    let state = bootstrap(config).await?;
    assert!(state.restore_session().await.is_none());
    assert!(state.client.credentials().is_none());
    Ok(())
}

#[test]
fn feature_registry_lists_slices() {
    assert!(features::is_enabled("identifiers"));
    assert!(features::is_enabled("verification"));
    assert!(!features::is_enabled("invoicing"));
}
