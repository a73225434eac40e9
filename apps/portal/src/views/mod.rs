//! One module per sidebar section. Every view returns the [`Screen`] to render; errors bubble up
//! to the shell, which turns them into an error toast.

pub(crate) mod audit;
pub(crate) mod contacts;
pub(crate) mod endpoints;
pub(crate) mod identifiers;
pub(crate) mod kvk;
pub(crate) mod members;
pub(crate) mod session;
pub(crate) mod tokens;

use crate::screen::{Panel, Screen};
use crate::shell::Shell;
use ctn::domain::grid::GridCell;
use ctn::kernel::forms::FieldErrors;

/// Label/value rows; empty values show as a dash.
fn details(caption: &str, rows: &[(&str, &dyn GridCell)]) -> Panel {
    Panel::Details {
        caption: caption.to_owned(),
        rows: rows
            .iter()
            .map(|(label, value)| {
                let text = value.cell_text();
                ((*label).to_owned(), if text.is_empty() { "-".to_owned() } else { text })
            })
            .collect(),
    }
}

/// Blocks the submit: keeps the screen, shows the field errors inline.
fn invalid(shell: &Shell, mut screen: Screen, errors: FieldErrors) -> Screen {
    shell.state().notifier.warning(match errors.len() {
        1 => "Please fix the highlighted field".to_owned(),
        n => format!("Please fix the {n} highlighted fields"),
    });
    screen.invalid(errors);
    screen
}

/// Replaces the value when the flag was given.
fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
