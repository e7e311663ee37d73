use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::Result;
use crate::models::{SummaryRecord, User};
use crate::orchestrator::{filter_summaries, DualWriteOutcome, SubmitRequest, SummaryService};
use crate::services::{ContentFetcher, Services};
use crate::session::{SessionManager, SessionSubscription};
use crate::transform::{self, Transformed};
use crate::tui::{AppAction, InputMode};

const BANNER_DURATION: Duration = Duration::from_secs(3);
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

pub struct App {
    // Data
    pub summaries: Vec<SummaryRecord>,
    pub last_result: Option<Transformed>,
    pub current_user: Option<User>,

    // UI State
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub url_input: String,
    pub search_query: String,
    pub token_input: String,
    pub show_help: bool,
    pub notification: Option<Notification>,
    banner_until: Option<Instant>,
    spinner_frame: usize,

    // Async state
    pub is_submitting: bool,
    submit_rx: mpsc::Receiver<DualWriteOutcome>,
    submit_tx: mpsc::Sender<DualWriteOutcome>,
    session_rx: mpsc::UnboundedReceiver<Option<User>>,
    _session_subscription: SessionSubscription,

    // Services
    service: Arc<SummaryService>,
    session: Arc<SessionManager>,
    fetcher: Option<Arc<ContentFetcher>>,
    oauth_provider: String,
    oauth_redirect_url: Option<String>,
}

impl App {
    pub async fn new(services: Services, config: &Config) -> Result<Self> {
        let session = Arc::new(SessionManager::new(services.auth));

        let (session_tx, session_rx) = mpsc::unbounded_channel();
        let subscription = session.on_session_change(move |user| {
            let _ = session_tx.send(user);
        });

        let (submit_tx, submit_rx) = mpsc::channel(1);

        let mut app = Self {
            summaries: Vec::new(),
            last_result: None,
            current_user: None,
            selected_index: 0,
            input_mode: InputMode::Normal,
            url_input: String::new(),
            search_query: String::new(),
            token_input: String::new(),
            show_help: false,
            notification: None,
            banner_until: None,
            spinner_frame: 0,
            is_submitting: false,
            submit_rx,
            submit_tx,
            session_rx,
            _session_subscription: subscription,
            service: services.summaries,
            session,
            fetcher: services.fetcher,
            oauth_provider: config.oauth_provider.clone(),
            oauth_redirect_url: config.oauth_redirect_url.clone(),
        };

        app.reload_summaries().await;
        Ok(app)
    }

    pub fn filtered_summaries(&self) -> Vec<&SummaryRecord> {
        filter_summaries(&self.summaries, &self.search_query)
    }

    pub fn selected_summary(&self) -> Option<&SummaryRecord> {
        self.filtered_summaries().get(self.selected_index).copied()
    }

    pub fn sign_in_enabled(&self) -> bool {
        self.session.is_enabled()
    }

    /// Submit and delete are unavailable while signed out in authenticated mode.
    pub fn writes_enabled(&self) -> bool {
        !self.service.require_auth() || self.current_user.is_some()
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_until.is_some()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// Advances the spinner and expires the success banner.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        if self.is_submitting {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        if self.banner_until.is_some_and(|until| now >= until) {
            self.banner_until = None;
        }
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification {
            kind,
            message: message.into(),
        });
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.filtered_summaries().len();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::MoveToTop => {
                self.selected_index = 0;
            }

            AppAction::MoveToBottom => {
                self.selected_index = self.filtered_summaries().len().saturating_sub(1);
            }

            AppAction::EditUrl => {
                self.input_mode = InputMode::Url;
            }

            AppAction::Submit => {
                self.submit();
            }

            AppAction::UseDemoUrl(index) => {
                if let Some(url) = transform::demo_urls().nth(index) {
                    self.url_input = url.to_string();
                }
            }

            AppAction::StartSearch => {
                self.input_mode = InputMode::Search;
            }

            AppAction::ClearSearch => {
                self.search_query.clear();
                self.selected_index = 0;
            }

            AppAction::DeleteSelected => {
                if !self.writes_enabled() {
                    self.notify(NotificationKind::Warning, "Sign in to delete summaries");
                } else if self.selected_summary().is_some() {
                    self.input_mode = InputMode::ConfirmDelete;
                }
            }

            AppAction::ConfirmDelete => {
                self.input_mode = InputMode::Normal;
                self.delete_selected().await;
            }

            AppAction::CancelDelete => {
                self.input_mode = InputMode::Normal;
            }

            AppAction::SignIn => {
                self.start_sign_in();
            }

            AppAction::SignOut => {
                if let Err(e) = self.session.sign_out().await {
                    tracing::error!("Sign-out failed: {}", e);
                    self.notify(NotificationKind::Error, "Sign-out failed");
                }
            }

            AppAction::OpenInBrowser => {
                if let Some(summary) = self.selected_summary() {
                    let url = summary.url.clone();
                    let _ = open::that(&url);
                }
            }

            AppAction::Refresh => {
                self.reload_summaries().await;
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }

            AppAction::InputChar(c) => {
                match self.input_mode {
                    InputMode::Url => self.url_input.push(c),
                    InputMode::Search => {
                        self.search_query.push(c);
                        self.selected_index = 0;
                    }
                    InputMode::Token => self.token_input.push(c),
                    InputMode::Normal | InputMode::ConfirmDelete => {}
                }
            }

            AppAction::InputBackspace => {
                match self.input_mode {
                    InputMode::Url => {
                        self.url_input.pop();
                    }
                    InputMode::Search => {
                        self.search_query.pop();
                        self.selected_index = 0;
                    }
                    InputMode::Token => {
                        self.token_input.pop();
                    }
                    InputMode::Normal | InputMode::ConfirmDelete => {}
                }
            }

            AppAction::InputConfirm => {
                let mode = std::mem::take(&mut self.input_mode);
                match mode {
                    InputMode::Url => self.submit(),
                    InputMode::Token => self.finish_sign_in().await,
                    InputMode::Search | InputMode::Normal | InputMode::ConfirmDelete => {}
                }
            }

            AppAction::InputCancel => {
                let mode = std::mem::take(&mut self.input_mode);
                match mode {
                    InputMode::Search => {
                        self.search_query.clear();
                        self.selected_index = 0;
                    }
                    InputMode::Token => self.token_input.clear(),
                    InputMode::Url | InputMode::Normal | InputMode::ConfirmDelete => {}
                }
            }
        }

        Ok(false)
    }

    /// Starts a dual-write submission in the background.
    fn submit(&mut self) {
        if self.is_submitting {
            return;
        }
        if !self.writes_enabled() {
            self.notify(NotificationKind::Warning, "Sign in to summarize and save blogs");
            return;
        }

        let url = std::mem::take(&mut self.url_input).trim().to_string();
        let service = Arc::clone(&self.service);
        let fetcher = self.fetcher.clone();
        let user = self.current_user.clone();
        let tx = self.submit_tx.clone();

        self.is_submitting = true;
        self.last_result = None;
        self.notification = None;

        tokio::spawn(async move {
            let mut request = SubmitRequest::new(url.as_str());
            let needs_content = !url.is_empty() && transform::predefined(&url).is_none();
            if let Some(fetcher) = fetcher.filter(|_| needs_content) {
                request.content = Some(fetcher.content_or_fallback(&url).await);
            }

            let outcome = service.submit(request, user.as_ref()).await;
            let _ = tx.send(outcome).await;
        });
    }

    /// Poll for a finished submission (non-blocking)
    pub async fn poll_submit_result(&mut self) -> Result<()> {
        if let Ok(outcome) = self.submit_rx.try_recv() {
            self.apply_outcome(outcome);
        }
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: DualWriteOutcome) {
        self.is_submitting = false;
        self.last_result = outcome.transformed().cloned();
        let message = outcome.notification();

        match outcome {
            DualWriteOutcome::Complete { record, .. } => {
                self.summaries.insert(0, record);
                self.selected_index = 0;
                self.banner_until = Some(Instant::now() + BANNER_DURATION);
                self.notify(NotificationKind::Success, message);
            }
            DualWriteOutcome::Partial { .. } => {
                self.notify(NotificationKind::Warning, message);
            }
            DualWriteOutcome::Failed(_) => {
                self.notify(NotificationKind::Error, message);
            }
        }
    }

    /// Poll for sign-in/sign-out notifications (non-blocking)
    pub async fn poll_session_change(&mut self) -> Result<()> {
        let mut changed = false;
        while let Ok(user) = self.session_rx.try_recv() {
            self.current_user = user;
            changed = true;
        }
        if changed {
            self.service.use_access_token(self.session.access_token());
            self.reload_summaries().await;
        }
        Ok(())
    }

    async fn reload_summaries(&mut self) {
        match self.service.list(self.current_user.as_ref(), "").await {
            Ok(summaries) => {
                self.summaries = summaries;
                let len = self.filtered_summaries().len();
                if self.selected_index >= len {
                    self.selected_index = len.saturating_sub(1);
                }
            }
            Err(e) => self.notify(NotificationKind::Error, e.to_string()),
        }
    }

    async fn delete_selected(&mut self) {
        let Some(id) = self.selected_summary().map(|s| s.id) else {
            return;
        };

        match self.service.delete_summary(id, self.current_user.as_ref()).await {
            Ok(_) => {
                self.summaries.retain(|s| s.id != id);
                let len = self.filtered_summaries().len();
                if len > 0 && self.selected_index >= len {
                    self.selected_index = len - 1;
                }
                self.notify(NotificationKind::Success, "Summary deleted successfully!");
            }
            Err(e) => self.notify(NotificationKind::Error, e.to_string()),
        }
    }

    fn start_sign_in(&mut self) {
        if !self.session.is_enabled() {
            self.notify(NotificationKind::Warning, "Sign-in is not configured");
            return;
        }

        match self
            .session
            .sign_in(&self.oauth_provider, self.oauth_redirect_url.as_deref())
        {
            Ok(url) => {
                if let Err(e) = open::that(url.as_str()) {
                    tracing::warn!("Failed to open browser: {}", e);
                }
                self.token_input.clear();
                self.input_mode = InputMode::Token;
                self.notify(
                    NotificationKind::Warning,
                    format!("Finish signing in at {url} and paste the access token"),
                );
            }
            Err(e) => {
                tracing::error!("Sign-in failed: {}", e);
                self.notify(NotificationKind::Error, "Could not start sign-in");
            }
        }
    }

    async fn finish_sign_in(&mut self) {
        let token = std::mem::take(&mut self.token_input);
        match self.session.complete_sign_in(&token).await {
            Ok(user) => {
                self.notify(
                    NotificationKind::Success,
                    format!("Signed in as {}", user.display_name()),
                );
            }
            Err(e) => {
                tracing::warn!("Sign-in rejected: {}", e);
                self.notify(NotificationKind::Error, "Sign-in failed: invalid or expired token");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ContentRepository, MemoryRecordStore};

    async fn test_app(require_auth: bool) -> App {
        let documents = Arc::new(ContentRepository::in_memory().await.unwrap());
        let records = Arc::new(MemoryRecordStore::new());
        let services = Services {
            summaries: Arc::new(SummaryService::new(documents, records, require_auth)),
            auth: None,
            fetcher: None,
        };
        let config = Config {
            fetch_content: false,
            ..Config::default()
        };
        App::new(services, &config).await.unwrap()
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(AppAction::InputChar(c)).await.unwrap();
        }
    }

    async fn wait_for_submit(app: &mut App) {
        for _ in 0..100 {
            app.poll_submit_result().await.unwrap();
            if !app.is_submitting {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("submission did not finish");
    }

    #[tokio::test]
    async fn submit_prepends_record_and_shows_banner() {
        let mut app = test_app(false).await;

        app.handle_action(AppAction::UseDemoUrl(1)).await.unwrap();
        app.handle_action(AppAction::Submit).await.unwrap();
        assert!(app.is_submitting);
        wait_for_submit(&mut app).await;

        assert_eq!(app.summaries.len(), 1);
        assert_eq!(app.summaries[0].url, "https://example.com/blog2");
        assert!(app.banner_visible());
        assert!(app.url_input.is_empty());
        assert!(app
            .last_result
            .as_ref()
            .unwrap()
            .summary
            .contains("digital detox"));
        assert_eq!(
            app.notification.as_ref().map(|n| n.kind),
            Some(NotificationKind::Success)
        );
    }

    #[tokio::test]
    async fn banner_expires_after_three_seconds() {
        let mut app = test_app(false).await;
        app.handle_action(AppAction::EditUrl).await.unwrap();
        type_text(&mut app, "https://blog.dev/a").await;
        app.handle_action(AppAction::InputConfirm).await.unwrap();
        wait_for_submit(&mut app).await;
        assert!(app.banner_visible());

        app.tick_at(Instant::now() + Duration::from_secs(1));
        assert!(app.banner_visible());
        app.tick_at(Instant::now() + BANNER_DURATION);
        assert!(!app.banner_visible());
    }

    #[tokio::test]
    async fn empty_url_reports_validation_error() {
        let mut app = test_app(false).await;
        app.handle_action(AppAction::Submit).await.unwrap();
        wait_for_submit(&mut app).await;

        assert!(app.summaries.is_empty());
        let notification = app.notification.as_ref().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "Please enter a blog URL");
    }

    #[tokio::test]
    async fn writes_are_disabled_while_signed_out_in_auth_mode() {
        let mut app = test_app(true).await;
        assert!(!app.writes_enabled());

        app.handle_action(AppAction::UseDemoUrl(0)).await.unwrap();
        app.handle_action(AppAction::Submit).await.unwrap();

        assert!(!app.is_submitting);
        assert_eq!(
            app.notification.as_ref().map(|n| n.kind),
            Some(NotificationKind::Warning)
        );
    }

    #[tokio::test]
    async fn search_filters_and_escape_clears() {
        let mut app = test_app(false).await;
        for index in 0..2 {
            app.handle_action(AppAction::UseDemoUrl(index)).await.unwrap();
            app.handle_action(AppAction::Submit).await.unwrap();
            wait_for_submit(&mut app).await;
        }

        app.handle_action(AppAction::StartSearch).await.unwrap();
        type_text(&mut app, "BLOG1").await;
        let visible: Vec<&str> = app.filtered_summaries().iter().map(|s| s.url.as_str()).collect();
        assert_eq!(visible, vec!["https://example.com/blog1"]);

        app.handle_action(AppAction::InputCancel).await.unwrap();
        assert_eq!(app.filtered_summaries().len(), 2);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn delete_needs_confirmation() {
        let mut app = test_app(false).await;
        app.handle_action(AppAction::UseDemoUrl(0)).await.unwrap();
        app.handle_action(AppAction::Submit).await.unwrap();
        wait_for_submit(&mut app).await;

        app.handle_action(AppAction::DeleteSelected).await.unwrap();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        app.handle_action(AppAction::CancelDelete).await.unwrap();
        assert_eq!(app.summaries.len(), 1);

        app.handle_action(AppAction::DeleteSelected).await.unwrap();
        app.handle_action(AppAction::ConfirmDelete).await.unwrap();
        assert!(app.summaries.is_empty());

        app.handle_action(AppAction::Refresh).await.unwrap();
        assert!(app.summaries.is_empty());
    }

    #[tokio::test]
    async fn sign_in_without_auth_service_warns() {
        let mut app = test_app(false).await;
        assert!(!app.sign_in_enabled());

        app.handle_action(AppAction::SignIn).await.unwrap();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(
            app.notification.as_ref().map(|n| n.message.as_str()),
            Some("Sign-in is not configured")
        );
    }
}
