use crate::error::ApiResult;
use crate::register::Register;
use crate::seed;
use ctn::domain::config::SandboxConfig;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::ops::Deref;
use std::sync::Arc;

#[derive(Debug)]
pub struct SandboxStateInner {
    pub config: SandboxConfig,
    register: RwLock<Register>,
}

/// Shared handler state. Handlers hold the lock for one register call and never across an
/// `.await`.
#[derive(Debug, Clone)]
pub struct SandboxState {
    inner: Arc<SandboxStateInner>,
}

impl SandboxState {
    /// # Errors
    /// A fixture fails to load.
    pub fn new(config: SandboxConfig) -> ApiResult<Self> {
        let register = if config.seed { seed::seeded()? } else { Register::default() };
        Ok(Self { inner: Arc::new(SandboxStateInner { config, register: RwLock::new(register) }) })
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Register> {
        self.inner.register.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Register> {
        self.inner.register.write()
    }
}

impl Deref for SandboxState {
    type Target = SandboxStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
