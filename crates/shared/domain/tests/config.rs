use ctn_domain::config::{PortalConfig, SandboxConfig};
use serde_json::json;

#[test]
fn portal_defaults_are_usable() {
    let cfg = PortalConfig::default();
    assert_eq!(cfg.api.base_url, "http://127.0.0.1:4583");
    assert_eq!(cfg.api.timeout_secs, 30);
    assert_eq!(cfg.auth.session_skew_secs, 60);
    assert_eq!(cfg.grid.page_size, 10);
    assert_eq!(cfg.grid.page_size_options, vec![10, 20, 50, 100]);
    assert_eq!(cfg.verification.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(cfg.storage.data_dir, std::path::PathBuf::from(".ctn"));
}

#[test]
fn portal_config_deserializes_partial_documents() {
    let raw = json!({
        "api": { "base_url": "https://asr.example.org" },
        "verification": { "poll_interval_ms": 10, "max_poll_attempts": 3 }
    });

    let cfg: PortalConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.api.base_url, "https://asr.example.org");
    assert_eq!(cfg.api.timeout_secs, 30);
    assert_eq!(cfg.verification.max_poll_attempts, 3);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn deref_mut_copies_on_write() {
    let original = PortalConfig::default();
    let mut changed = original.clone();
    changed.api.base_url = "http://127.0.0.1:9".to_owned();

    assert_eq!(original.api.base_url, "http://127.0.0.1:4583");
    assert_eq!(changed.api.base_url, "http://127.0.0.1:9");
}

#[test]
fn sandbox_seeds_by_default() {
    let cfg: SandboxConfig = serde_json::from_value(json!({ "server": { "port": 0 } })).expect("sandbox");
    assert!(cfg.seed);
    assert_eq!(cfg.server.port, 0);
    assert!(cfg.server.ssl.is_none());
}
