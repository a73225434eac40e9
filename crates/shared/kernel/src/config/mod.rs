use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

pub const ENV_PREFIX: &str = "CTN";

#[ctn_derive::ctn_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Layered configuration loader.
///
/// 1. **File**: an explicit `path` is required to exist. Without one, the optional
///    `default_stem` file (`portal.toml`, `portal.yaml`, ...) in the working directory is used.
/// 2. **Environment**: `CTN__`-prefixed variables override file values; nested keys use `__`
///    (`CTN__API__BASE_URL` maps to `api.base_url`).
///
/// Missing keys fall back to the target type's `#[serde(default)]` values.
///
/// # Errors
/// An explicit file that is missing or malformed, or values that do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use ctn_kernel::config::load_config;
/// use ctn_kernel::domain::config::PortalConfig;
///
/// let cfg: PortalConfig = load_config("portal-example-absent", None).unwrap_or_default();
/// assert!(cfg.api.timeout_secs > 0);
/// ```
pub fn load_config<T>(default_stem: &str, path: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_with_env(default_stem, path, None)
}

/// [`load_config`] reading `CTN__*` overrides from `env` instead of the process environment.
pub fn load_config_with_env<T>(
    default_stem: &str,
    path: Option<&Path>,
    env: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match path {
        Some(explicit) => {
            debug!(path = %explicit.display(), "Loading config file");
            File::from(explicit).required(true)
        },
        None => {
            debug!(stem = default_stem, "Looking for optional config file");
            File::with_name(default_stem).required(false)
        },
    };

    Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
