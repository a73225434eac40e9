use crate::cli::{Command, GridArgs};
use crate::screen::{Outcome, Panel, Screen, View};
use crate::views;
use ctn::domain::grid::{GridRow, SortSpec};
use ctn::domain::registry::FeatureSlice;
use ctn::events::EventReceiverExt;
use ctn::kernel::confirm::Confirm;
use ctn::kernel::grid::{self, GridState};
use ctn::kernel::state::{PortalState, PortalStateError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Routes commands to views. Holds the portal state and the confirmation prompt.
#[derive(Debug, Clone)]
pub struct Shell {
    state: PortalState,
    confirm: Arc<dyn Confirm>,
}

impl Shell {
    #[must_use]
    pub fn new(state: PortalState, confirm: Arc<dyn Confirm>) -> Self {
        Self { state, confirm }
    }

    #[must_use]
    pub const fn state(&self) -> &PortalState {
        &self.state
    }

    /// Runs one command; `None` opens the landing page.
    pub async fn run(&self, command: Option<Command>) -> Screen {
        let mut toasts = match self.state.notifier.subscribe() {
            Ok(rx) => Some(rx),
            Err(e) => {
                warn!(error = %e, "Toasts will not be shown");
                None
            },
        };

        let mut screen = self.dispatch(command.unwrap_or(Command::Dashboard)).await;

        if let Some(rx) = toasts.as_mut() {
            screen.toasts.extend(rx.drain_ready().iter().map(|t| t.as_ref().clone()));
        }
        screen
    }

    async fn dispatch(&self, command: Command) -> Screen {
        match command {
            Command::Login { token, account, expires_in } => {
                views::session::login(self, token, account, expires_in).await
            },
            Command::Logout => views::session::logout(self).await,
            Command::Help { topic } => views::session::help(topic.as_deref()),
            command => {
                let Some(session) = self.state.restore_session().await else {
                    info!(login_url = %self.state.config.auth.login_url, "No valid session, redirecting to sign-in");
                    return Screen::redirect(&self.state.config.auth.login_url);
                };

                let mut screen = match self.signed_in(command).await {
                    Ok(screen) => screen,
                    Err(e) => self.failure(&e),
                };
                screen.account = Some(session.account);
                screen
            },
        }
    }

    async fn signed_in(&self, command: Command) -> anyhow::Result<Screen> {
        match command {
            Command::Dashboard => views::session::dashboard(self).await,
            Command::Members { action } => views::members::run(self, action).await,
            Command::Entity { action } => views::members::entity(self, action).await,
            Command::Identifiers { action } => views::identifiers::run(self, action).await,
            Command::Contacts { action } => views::contacts::run(self, action).await,
            Command::Endpoints { action } => views::endpoints::run(self, action).await,
            Command::Tokens { action } => views::tokens::run(self, action).await,
            Command::Audit(args) => views::audit::run(self, args).await,
            Command::Kvk { action } => views::kvk::run(self, action).await,
            Command::Prefs { action } => views::session::prefs(self, action).await,
            Command::Login { .. } | Command::Logout | Command::Help { .. } => {
                Err(anyhow::anyhow!("Command does not need a session"))
            },
        }
    }

    /// Error toast for a failed view: the outermost context is the title, the causes the text.
    fn failure(&self, err: &anyhow::Error) -> Screen {
        let title = err.to_string();
        let mut message = String::new();
        // Wrapper errors repeat their source's text; keep each cause once.
        for cause in err.chain().skip(1).map(ToString::to_string) {
            if !message.contains(&cause) {
                if !message.is_empty() {
                    message.push_str(": ");
                }
                message.push_str(&cause);
            }
        }
        if message.is_empty() {
            message.clone_from(&title);
        }
        self.state.notifier.error(&title, message);

        let mut screen = Screen::new(View::Dashboard, title);
        screen.outcome = Outcome::Failed;
        screen
    }

    pub(crate) fn slice<T: FeatureSlice>(&self) -> Result<&T, PortalStateError> {
        self.state.try_get_slice::<T>()
    }

    /// Asks before a destructive action. Declining is reported as a cancelled screen.
    pub(crate) fn confirm(&self, view: View, prompt: &str) -> Result<(), Screen> {
        if self.confirm.confirm(prompt) {
            return Ok(());
        }
        debug!(prompt, "Confirmation declined");
        self.state.notifier.info("Cancelled, nothing was changed");
        let mut screen = Screen::new(view, "Cancelled");
        screen.outcome = Outcome::Cancelled;
        Err(screen)
    }

    /// Grid panel over `rows` with saved preferences applied. Sort, page size and columns given
    /// on the command line are saved back.
    pub(crate) async fn grid<T: GridRow>(
        &self,
        grid_id: &'static str,
        caption: &str,
        rows: &[T],
        args: &GridArgs,
        empty_hint: Option<&str>,
    ) -> Panel {
        let saved = self.state.prefs.load(grid_id).await;
        let mut state = GridState::from_preferences(&saved);
        let mut changed = false;

        if let Some(raw) = args.sort.as_deref() {
            match SortSpec::parse(raw).filter(|s| T::column(&s.column).is_some_and(|c| c.sortable)) {
                Some(sort) => {
                    state.sort = Some(sort);
                    changed = true;
                },
                None => {
                    self.state.notifier.warning(format!("Cannot sort by '{raw}'"));
                },
            }
        }
        if let Some(size) = args.page_size {
            let normalized = grid::normalize_page_size(size);
            if normalized != size {
                self.state.notifier.warning(format!("Page size {size} is not offered, showing {normalized}"));
            }
            state.page_size = normalized;
            changed = true;
        }
        if let Some(columns) = &args.columns {
            state.visible = Some(columns.clone());
            changed = true;
        }
        state.search.clone_from(&args.search);
        state.page = args.page.unwrap_or(1);

        if changed && let Err(e) = self.state.prefs.save(grid_id, &state.to_preferences()).await {
            warn!(grid = grid_id, error = %e, "Grid preferences not saved");
        }

        Panel::Grid {
            id: grid_id,
            caption: caption.to_owned(),
            view: grid::apply(rows, &state),
            search: state.search,
            empty_hint: empty_hint.map(str::to_owned),
        }
    }

    pub(crate) async fn load_draft<T: DeserializeOwned>(&self, form: &str) -> Option<T> {
        match self.state.drafts.load(form).await {
            Ok(draft) => draft,
            Err(e) => {
                warn!(form, error = %e, "Draft unreadable");
                None
            },
        }
    }

    pub(crate) async fn save_draft<T: Serialize + ?Sized>(&self, form: &str, draft: &T) {
        match self.state.drafts.save(form, draft).await {
            Ok(()) => {
                self.state.notifier.info(format!("Your input was kept; add --resume to continue ({form})"));
            },
            Err(e) => warn!(form, error = %e, "Draft not saved"),
        }
    }

    pub(crate) async fn clear_draft(&self, form: &str) {
        if let Err(e) = self.state.drafts.clear(form).await {
            warn!(form, error = %e, "Draft not cleared");
        }
    }
}
