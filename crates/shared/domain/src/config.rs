use crate::constants::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Portal settings (`portal.toml` + `CTN__*` overrides).
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfigInner {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub grid: GridConfig,
    pub verification: VerificationConfig,
    pub logging: LoggingConfig,
}

/// Arc-wrapped so slices can hold a copy cheaply.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct PortalConfig {
    #[serde(flatten, default)]
    inner: Arc<PortalConfigInner>,
}

impl Deref for PortalConfig {
    type Target = PortalConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PortalConfig {
    fn deref_mut(&mut self) -> &mut PortalConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Sandbox register API settings (`sandbox.toml` + `CTN__*` overrides).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SandboxConfigInner {
    pub server: ServerConfig,
    /// Load fixture members on startup.
    pub seed: bool,
    pub logging: LoggingConfig,
}

#[derive(Default, Debug, Clone, Deserialize)]
pub struct SandboxConfig {
    #[serde(flatten, default)]
    inner: Arc<SandboxConfigInner>,
}

impl Deref for SandboxConfig {
    type Target = SandboxConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SandboxConfig {
    fn deref_mut(&mut self) -> &mut SandboxConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Register API client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// External sign-in page; the portal redirects here without a valid session.
    pub login_url: String,
    /// A session expiring within this many seconds counts as expired.
    pub session_skew_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub max_upload_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Rolling file sink directory; console only when unset.
    pub dir: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

// --- Default ---

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: "http://127.0.0.1:4583".to_owned(), timeout_secs: 30 }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_url: "https://login.microsoftonline.com/common/oauth2/v2.0/authorize".to_owned(),
            session_skew_secs: 60,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from(".ctn") }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, page_size_options: PAGE_SIZE_OPTIONS.to_vec() }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 2000, max_poll_attempts: 30, max_upload_bytes: 10 * 1024 * 1024 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), dir: None, json: false }
    }
}

impl Default for SandboxConfigInner {
    fn default() -> Self {
        Self { server: ServerConfig::default(), seed: true, logging: LoggingConfig::default() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::LOCALHOST), port: 4583, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}
