use super::details;
use crate::cli::KvkAction;
use crate::screen::{Panel, Screen, View};
use crate::shell::Shell;
use anyhow::Context;
use ctn::domain::constants::FLAGGED_GRID;
use ctn::domain::models::{KvkVerification, ReviewDecision};
use ctn::features::verification::{Verification, VerificationError, comparison};
use ctn::kernel::forms::FieldErrors;
use ctn::kernel::grid::{self, GridState};

pub(crate) async fn run(shell: &Shell, action: KvkAction) -> anyhow::Result<Screen> {
    let verification = shell.slice::<Verification>()?;
    match action {
        KvkAction::Upload { legal_entity_id, file, wait } => {
            let mut uploaded = verification
                .upload_file(&legal_entity_id, &file)
                .await
                .context(format!("{} not uploaded", file.display()))?;
            if wait {
                uploaded = verification
                    .poll(&legal_entity_id, verification.policy())
                    .await
                    .context("Verification result not available")?;
            }
            let mut screen = Screen::new(View::MemberDetail, "KvK verification");
            screen.panels.extend(panels(&uploaded));
            Ok(screen)
        },
        KvkAction::Status { legal_entity_id, wait } => {
            let mut screen = Screen::new(View::MemberDetail, "KvK verification");
            screen.panels.extend(status_panels(shell, &legal_entity_id, wait).await?);
            Ok(screen)
        },
        KvkAction::Queue(grid) => {
            let rows = verification.flagged().await.context("Review queue not loaded")?;
            let panel = shell
                .grid(FLAGGED_GRID, "Flagged verifications", &rows, &grid, Some("Nothing is waiting for review."))
                .await;
            Ok(Screen::new(View::ReviewQueue, "KvK review").with_panel(panel))
        },
        KvkAction::Review { verification_id, approve, reject: _, notes } => {
            let decision = if approve { ReviewDecision::Approved } else { ReviewDecision::Rejected };
            let mut screen = Screen::new(View::ReviewQueue, "KvK review");
            match verification.review(&verification_id, decision, notes.as_deref()).await {
                Ok(reviewed) => {
                    screen.panels.extend(panels(&reviewed));
                    Ok(screen)
                },
                Err(VerificationError::InvalidReview { message, .. }) => {
                    let mut errors = FieldErrors::new();
                    errors.add("notes", message);
                    Ok(super::invalid(shell, screen, errors))
                },
                Err(e) => Err(e).context(format!("Verification {verification_id} not reviewed")),
            }
        },
    }
}

/// Latest verification of a legal entity, optionally polled until it finishes.
pub(crate) async fn status_panels(shell: &Shell, legal_entity_id: &str, wait: bool) -> anyhow::Result<Vec<Panel>> {
    let verification = shell.slice::<Verification>()?;
    let Some(mut latest) = verification
        .status(legal_entity_id)
        .await
        .context(format!("KvK status of {legal_entity_id} not loaded"))?
    else {
        return Ok(vec![Panel::Notice(format!(
            "No KvK document uploaded yet. Upload one with `ctn-portal kvk upload {legal_entity_id} <file.pdf>`."
        ))]);
    };

    if wait && !latest.status.is_terminal() {
        latest = verification
            .poll(legal_entity_id, verification.policy())
            .await
            .context("Verification result not available")?;
    }
    Ok(panels(&latest))
}

fn panels(v: &KvkVerification) -> Vec<Panel> {
    let review = v.review.as_ref();
    let mut out = vec![details(
        "Verification",
        &[
            ("Verification ID", &v.verification_id),
            ("Document", &v.document_name),
            ("Status", &v.status),
            ("Uploaded", &v.uploaded_at),
            ("Completed", &v.completed_at),
            ("Mismatches", &v.mismatches),
            ("Review", &review.map(|r| r.decision)),
            ("Reviewed by", &review.map(|r| r.reviewed_by.clone())),
            ("Review notes", &review.and_then(|r| r.notes.clone())),
        ],
    )];

    let rows = comparison(v);
    out.push(Panel::Grid {
        id: "kvk-comparison",
        caption: "Entered versus extracted".into(),
        view: grid::apply(&rows, &GridState::default()),
        search: None,
        empty_hint: None,
    });
    out
}
