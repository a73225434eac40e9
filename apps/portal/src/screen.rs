//! Rendered view state.
//!
//! A [`Screen`] is what one command shows: header, sidebar, panels, inline form errors and the
//! toasts raised while it ran. [`Screen::render`] writes the text form; toasts are written
//! separately so they can go to stderr.

use ctn::domain::grid::GridStyle;
use ctn::kernel::forms::FieldErrors;
use ctn::kernel::grid::{EmptyReason, GridView};
use ctn::kernel::notify::{Toast, ToastKind};
use std::fmt::Write as _;
use std::io::{self, Write};

/// Top-level views reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Members,
    MemberDetail,
    Tokens,
    Audit,
    ReviewQueue,
    Help,
    SignIn,
}

impl View {
    pub const SIDEBAR: [(Self, &'static str); 4] = [
        (Self::Dashboard, "Dashboard"),
        (Self::Members, "Members"),
        (Self::Audit, "Audit log"),
        (Self::ReviewQueue, "KvK review"),
    ];

    /// Sidebar entry highlighted while this view is open.
    #[must_use]
    pub const fn section(self) -> Option<Self> {
        match self {
            Self::Dashboard | Self::Members | Self::Audit | Self::ReviewQueue => Some(self),
            Self::MemberDetail | Self::Tokens => Some(Self::Members),
            Self::Help | Self::SignIn => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Shown,
    /// Not signed in; the browser would be sent to this sign-in page.
    Redirect(String),
    /// The confirmation prompt was declined; nothing was sent.
    Cancelled,
    Failed,
}

#[derive(Debug, Clone)]
pub enum Panel {
    Grid {
        id: &'static str,
        caption: String,
        view: GridView,
        search: Option<String>,
        /// Shown when the grid has no records at all.
        empty_hint: Option<String>,
    },
    Details {
        caption: String,
        rows: Vec<(String, String)>,
    },
    Notice(String),
}

#[derive(Debug, Clone)]
pub struct Screen {
    pub title: String,
    pub view: View,
    pub account: Option<String>,
    pub panels: Vec<Panel>,
    pub form_errors: FieldErrors,
    pub toasts: Vec<Toast>,
    pub outcome: Outcome,
}

impl Screen {
    #[must_use]
    pub fn new(view: View, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            view,
            account: None,
            panels: Vec::new(),
            form_errors: FieldErrors::new(),
            toasts: Vec::new(),
            outcome: Outcome::Shown,
        }
    }

    #[must_use]
    pub fn redirect(login_url: &str) -> Self {
        let mut screen = Self::new(View::SignIn, "Sign in required");
        screen.outcome = Outcome::Redirect(login_url.to_owned());
        screen.panels.push(Panel::Notice(format!("Continue at {login_url}")));
        screen
    }

    #[must_use]
    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn push(&mut self, panel: Panel) {
        self.panels.push(panel);
    }

    pub fn fail(&mut self) {
        self.outcome = Outcome::Failed;
    }

    /// Marks the screen failed and shows the field errors inline.
    pub fn invalid(&mut self, errors: FieldErrors) {
        self.form_errors = errors;
        self.outcome = Outcome::Failed;
    }

    #[must_use]
    pub fn redirect_target(&self) -> Option<&String> {
        match &self.outcome {
            Outcome::Redirect(url) => Some(url),
            _ => None,
        }
    }

    /// First grid panel on the screen.
    #[must_use]
    pub fn grid(&self) -> Option<&GridView> {
        self.panels.iter().find_map(|p| match p {
            Panel::Grid { view, .. } => Some(view),
            _ => None,
        })
    }

    /// Value of a details row, searched across every details panel.
    #[must_use]
    pub fn detail(&self, label: &str) -> Option<&str> {
        self.panels.iter().find_map(|p| match p {
            Panel::Details { rows, .. } => rows.iter().find(|(l, _)| l == label).map(|(_, v)| v.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn has_toast(&self, kind: ToastKind) -> bool {
        self.toasts.iter().any(|t| t.kind == kind)
    }

    /// Header, sidebar and panels.
    ///
    /// # Errors
    /// Writing to `out` failed.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let mut text = String::new();
        self.render_header(&mut text);
        for panel in &self.panels {
            text.push('\n');
            render_panel(panel, &mut text);
        }
        if !self.form_errors.is_empty() {
            text.push_str("\nPlease fix the following fields:\n");
            for (field, message) in self.form_errors.iter() {
                let _ = writeln!(text, "  {field}: {message}");
            }
        }
        out.write_all(text.as_bytes())
    }

    /// # Errors
    /// Writing to `out` failed.
    pub fn render_toasts(&self, out: &mut impl Write) -> io::Result<()> {
        for toast in &self.toasts {
            writeln!(out, "{toast}")?;
        }
        Ok(())
    }

    fn render_header(&self, text: &mut String) {
        let _ = write!(text, "CTN Association Register | {}", self.title);
        if let Some(account) = &self.account {
            let _ = write!(text, " | {account}");
        }
        text.push('\n');

        if self.account.is_some() {
            let active = self.view.section();
            let nav: Vec<String> = View::SIDEBAR
                .iter()
                .map(|(view, label)| if Some(*view) == active { format!("[{label}]") } else { (*label).to_owned() })
                .collect();
            let _ = writeln!(text, "{}", nav.join("  "));
        }
    }
}

fn render_panel(panel: &Panel, text: &mut String) {
    match panel {
        Panel::Notice(message) => {
            let _ = writeln!(text, "{message}");
        },
        Panel::Details { caption, rows } => {
            let _ = writeln!(text, "{caption}");
            let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
            for (label, value) in rows {
                let _ = writeln!(text, "  {label:<width$}  {value}");
            }
        },
        Panel::Grid { caption, view, search, empty_hint, .. } => {
            let _ = writeln!(text, "{caption}");
            match view.empty {
                Some(EmptyReason::NoRecords) => {
                    let _ = writeln!(text, "  No {} yet.", caption.to_lowercase());
                    if let Some(hint) = empty_hint {
                        let _ = writeln!(text, "  {hint}");
                    }
                },
                Some(EmptyReason::NoMatches) => {
                    let _ = writeln!(
                        text,
                        "  No rows match \"{}\". Clear the search to see all {} rows.",
                        search.as_deref().unwrap_or_default(),
                        view.total
                    );
                },
                None => {
                    render_table(view, text);
                    let _ = write!(text, "Page {} of {}, {} rows", view.page, view.page_count, view.matched);
                    if view.matched != view.total {
                        let _ = write!(text, " (filtered from {})", view.total);
                    }
                    text.push('\n');
                },
            }
        },
    }
}

fn render_table(view: &GridView, text: &mut String) {
    let mut widths: Vec<usize> = view.columns.iter().map(|c| c.label.chars().count()).collect();
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let bordered = view.style.contains(GridStyle::BORDERED);
    let separator = if view.style.contains(GridStyle::COLUMN_BORDERS) { " | " } else { "   " };
    let rule = || {
        let parts: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let joiner = if separator == " | " { "-+-" } else { "---" };
        format!("+-{}-+\n", parts.join(joiner))
    };

    let line = |cells: &[String], text: &mut String| {
        let padded: Vec<String> =
            widths.iter().zip(cells).map(|(w, c)| format!("{c:<w$}")).collect();
        if bordered {
            let _ = writeln!(text, "| {} |", padded.join(separator));
        } else {
            let _ = writeln!(text, "{}", padded.join(separator).trim_end());
        }
    };

    let labels: Vec<String> = view.columns.iter().map(|c| c.label.to_owned()).collect();
    if bordered {
        text.push_str(&rule());
    }
    line(&labels, text);
    if bordered {
        text.push_str(&rule());
    }
    for row in &view.rows {
        line(row, text);
    }
    if bordered {
        text.push_str(&rule());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctn::domain::grid::Column;

    fn view(rows: Vec<Vec<String>>, total: usize, empty: Option<EmptyReason>) -> GridView {
        GridView {
            columns: vec![
                Column { key: "legalName", label: "Legal name", sortable: true },
                Column { key: "countryCode", label: "Country", sortable: true },
            ],
            row_ids: (0..rows.len()).map(|i| format!("m-{i}")).collect(),
            matched: rows.len(),
            rows,
            total,
            page: 1,
            page_count: 1,
            page_size: 10,
            style: GridStyle::default(),
            empty,
        }
    }

    fn grid_screen(view: GridView, search: Option<&str>) -> String {
        let screen = Screen::new(View::Members, "Members").with_panel(Panel::Grid {
            id: "members",
            caption: "Members".into(),
            view,
            search: search.map(str::to_owned),
            empty_hint: Some("Create one with `members create`.".into()),
        });
        let mut out = Vec::new();
        screen.render(&mut out).expect("render to memory");
        String::from_utf8(out).expect("utf-8")
    }

    #[test]
    fn tables_are_bordered_and_aligned() {
        let text = grid_screen(view(vec![vec!["Acme Logistics B.V.".into(), "NL".into()]], 1, None), None);
        assert!(text.contains("| Legal name          | Country |"));
        assert!(text.contains("| Acme Logistics B.V. | NL      |"));
        assert!(text.contains("Page 1 of 1, 1 rows"));
    }

    #[test]
    fn empty_states_differ() {
        let none = grid_screen(view(Vec::new(), 0, Some(EmptyReason::NoRecords)), None);
        assert!(none.contains("No members yet."));
        assert!(none.contains("members create"));

        let unmatched = grid_screen(view(Vec::new(), 3, Some(EmptyReason::NoMatches)), Some("zzz"));
        assert!(unmatched.contains("No rows match \"zzz\""));
        assert!(!unmatched.contains("members create"));
    }

    #[test]
    fn sidebar_marks_the_section() {
        let mut screen = Screen::new(View::Tokens, "Tokens");
        screen.account = Some("admin@ctn.example".into());
        let mut out = Vec::new();
        screen.render(&mut out).expect("render to memory");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("[Members]"));
        assert!(text.contains("admin@ctn.example"));
    }

    #[test]
    fn redirects_carry_the_login_url() {
        let screen = Screen::redirect("https://login.ctn.example/signin");
        assert_eq!(screen.redirect_target().map(String::as_str), Some("https://login.ctn.example/signin"));
        assert!(screen.panels.len() == 1);
    }
}
