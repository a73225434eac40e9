//! # CTN Register Portal
//!
//! Terminal view shell for the association register. Every command renders one [`Screen`]:
//! a grid or detail view with the toasts raised while it ran.
//!
//! Without a valid cached session every view except `login`, `logout` and `help` redirects
//! to the external sign-in page and makes no API calls.
//!
//! ## Example
//! ```no_run
//! use ctn::domain::config::PortalConfig;
//! use ctn::kernel::confirm::AlwaysConfirm;
//! use ctn_portal::Shell;
//! use ctn_portal::cli::Command;
//! use std::sync::Arc;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let state = ctn::bootstrap(PortalConfig::default()).await?;
//! let shell = Shell::new(state, Arc::new(AlwaysConfirm));
//! let screen = shell.run(Some(Command::Dashboard)).await;
//! screen.render(&mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod help;
pub mod prompt;
pub mod screen;
mod shell;
mod views;

pub use screen::{Outcome, Panel, Screen, View};
pub use shell::Shell;
