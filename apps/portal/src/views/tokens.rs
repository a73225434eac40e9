use super::details;
use crate::cli::TokenAction;
use crate::screen::{Panel, Screen, View};
use crate::shell::Shell;
use anyhow::Context;
use ctn::domain::constants::TOKENS_GRID;
use ctn::features::tokens::Tokens;

pub(crate) async fn run(shell: &Shell, action: TokenAction) -> anyhow::Result<Screen> {
    let tokens = shell.slice::<Tokens>()?;
    match action {
        TokenAction::List { endpoint_id, grid } => {
            let rows = tokens.list(&endpoint_id).await.context(format!("Tokens of {endpoint_id} not loaded"))?;
            let hint = format!("Issue one with `ctn-portal tokens issue {endpoint_id}`.");
            let panel = shell.grid(TOKENS_GRID, "Tokens", &rows, &grid, Some(&hint)).await;
            Ok(Screen::new(View::Tokens, "Tokens").with_panel(panel))
        },
        TokenAction::Issue { endpoint_id, days } => {
            let issued = tokens.issue(&endpoint_id, days).await.context("Token not issued")?;
            let token = &issued.token;
            Ok(Screen::new(View::Tokens, "New token")
                .with_panel(details(
                    "Token",
                    &[
                        ("Token ID", &token.token_id),
                        ("Prefix", &token.prefix),
                        ("Expires", &token.expires_at),
                        ("Secret", &issued.secret),
                    ],
                ))
                .with_panel(Panel::Notice("Copy the secret now. It is not shown again.".into())))
        },
        TokenAction::Revoke { token_id } => {
            let prompt = format!("Revoke token {token_id}? Clients using it lose access immediately.");
            if let Err(cancelled) = shell.confirm(View::Tokens, &prompt) {
                return Ok(cancelled);
            }
            tokens.revoke(&token_id).await.context(format!("Token {token_id} not revoked"))?;
            Ok(Screen::new(View::Tokens, "Tokens").with_panel(Panel::Notice("Token revoked.".into())))
        },
    }
}
