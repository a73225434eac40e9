use anyhow::Context;
use ctn::domain::config::SandboxConfig;
use ctn::kernel::config::load_config;
use ctn_logger::{Logger, parse_level};
use ctn_sandbox::Server;

#[ctn_runtime::main(service)]
async fn main() -> anyhow::Result<()> {
    let cfg: SandboxConfig = load_config("sandbox", None).context("Critical: Configuration is malformed")?;

    let mut logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(parse_level(&cfg.logging.level)?);
    if let Some(dir) = &cfg.logging.dir {
        logger = logger.directory(dir).json(cfg.logging.json);
    }
    let _log = logger.init()?;

    Server::builder().config(cfg).build().await?.run().await
}
