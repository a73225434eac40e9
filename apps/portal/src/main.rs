use anyhow::Context;
use clap::Parser;
use ctn::domain::config::PortalConfig;
use ctn::kernel::config::load_config;
use ctn::kernel::confirm::{AlwaysConfirm, Confirm};
use ctn_logger::{Logger, parse_level};
use ctn_portal::cli::Cli;
use ctn_portal::prompt::TerminalConfirm;
use ctn_portal::{Outcome, Shell};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

#[ctn_runtime::main(interactive)]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let cfg: PortalConfig =
        load_config("portal", cli.config.as_deref()).context("Critical: Configuration is malformed")?;

    let mut logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(parse_level(&cfg.logging.level)?);
    if let Some(dir) = &cfg.logging.dir {
        logger = logger.directory(dir).json(cfg.logging.json);
    }
    let _log = logger.init()?;

    let state = ctn::bootstrap(cfg).await?;
    let confirm: Arc<dyn Confirm> = if cli.yes { Arc::new(AlwaysConfirm) } else { Arc::new(TerminalConfirm) };
    let screen = Shell::new(state, confirm).run(cli.command).await;

    screen.render(&mut io::stdout().lock())?;
    let mut stderr = io::stderr().lock();
    screen.render_toasts(&mut stderr)?;

    Ok(match &screen.outcome {
        Outcome::Shown => ExitCode::SUCCESS,
        Outcome::Redirect(url) => {
            writeln!(stderr, "Sign in at {url}, then run `ctn-portal login --token <token> --account <you>`")?;
            ExitCode::from(2)
        },
        Outcome::Cancelled => ExitCode::from(3),
        Outcome::Failed => ExitCode::FAILURE,
    })
}
