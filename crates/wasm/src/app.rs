//! WASM App state, routing and background tasks

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use divergence_core::polling::DataSource;
use divergence_core::{
    load_dashboard, normalize_user_data, AuthStore, ChatSession, ChatTicket, ChatUpdate,
    ClientConfig, ContinueScopingRequest, DashboardLoad, DivergenceError, LoginRedirect,
    Navigator, PollOutcome, PollState, PollingController, ProjectChatRequest, ProjectDescriptor,
    ResponseClass, Result, Route, TranslatedData, UserData,
};
use eframe::egui;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::http_client::{ApiClient, TimerSleeper};
use crate::storage::{
    current_path, current_search, load_config, push_history, replace_history, LocalStorageSession,
};

// ============================================================================
// Types
// ============================================================================

/// Results of spawned tasks, drained once per frame
pub enum AppEvent {
    PollProgress { state: PollState, message: String },
    PollFinished(PollOutcome),
    Dashboard(DashboardLoad),
    Chat { ticket: ChatTicket, update: ChatUpdate },
    BreakdownRequested(Result<()>),
}

pub type Inbox = Rc<RefCell<Vec<AppEvent>>>;

fn push_event(inbox: &Inbox, ctx: &egui::Context, event: AppEvent) {
    inbox.borrow_mut().push(event);
    ctx.request_repaint();
}

/// Drops the event when the page that started the task has been left
fn push_unless_cancelled(cancel: &CancellationToken, inbox: &Inbox, ctx: &egui::Context, event: AppEvent) {
    if cancel.is_cancelled() {
        debug!("Dropping result of a cancelled task");
        return;
    }
    push_event(inbox, ctx, event);
}

/// Navigates with the History API; the next frame picks up the new path
#[derive(Clone)]
pub struct WebNavigator {
    ctx: egui::Context,
}

impl Navigator for WebNavigator {
    fn navigate(&self, path: &str) {
        push_history(path);
        self.ctx.request_repaint();
    }
}

/// Who the chat modal is talking to
#[derive(Debug, Clone, PartialEq)]
pub enum ChatTarget {
    /// Existing repository, `/api/projects/{id}/chat`
    Project(String),
    /// New idea, scoped through an AI thread
    NewProject(ProjectDescriptor),
}

impl ChatTarget {
    pub fn project_id(&self) -> &str {
        match self {
            ChatTarget::Project(id) => id,
            ChatTarget::NewProject(descriptor) => &descriptor.name,
        }
    }
}

pub struct ChatModal {
    pub target: ChatTarget,
    pub session: ChatSession,
    pub input: String,
}

/// Form state for describing a new project
#[derive(Debug, Clone, Default)]
pub struct NewProjectForm {
    pub name: String,
    pub description: String,
    pub tech_stack: String,
    pub goals: String,
}

impl NewProjectForm {
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty()
    }

    pub fn to_descriptor(&self) -> ProjectDescriptor {
        ProjectDescriptor {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            tech_stack: self
                .tech_stack
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            goals: Some(self.goals.trim().to_string()).filter(|g| !g.is_empty()),
        }
    }
}

// ============================================================================
// Polling source
// ============================================================================

struct PollSource {
    api: ApiClient,
    navigator: WebNavigator,
    inbox: Inbox,
    cancel: CancellationToken,
}

#[async_trait(?Send)]
impl DataSource for PollSource {
    async fn check_ready(&self) -> Result<ResponseClass> {
        self.api.check_filtered_data().await
    }

    async fn fetch_user_data(&self) {
        let load = load_dashboard(&self.api, self.api.store(), &self.navigator).await;
        push_unless_cancelled(&self.cancel, &self.inbox, &self.navigator.ctx, AppEvent::Dashboard(load));
    }
}

// ============================================================================
// Main App
// ============================================================================

pub struct WebApp {
    pub(crate) ctx: egui::Context,
    pub(crate) config: ClientConfig,
    pub(crate) store: AuthStore<LocalStorageSession>,
    pub(crate) api: ApiClient,
    pub(crate) navigator: WebNavigator,
    pub(crate) inbox: Inbox,

    // Page
    pub(crate) route: Route,
    /// Cancelled whenever the page changes or the user signs out
    pub(crate) cancel: CancellationToken,

    // Data
    pub(crate) user_data: UserData,
    pub(crate) translated: Option<TranslatedData>,
    pub(crate) data_loaded: bool,

    // UI state
    pub(crate) status: String,
    pub(crate) poll_state: PollState,
    pub(crate) loading: bool,
    pub(crate) chat: Option<ChatModal>,
    pub(crate) new_project: NewProjectForm,
}

impl WebApp {
    pub fn new(ctx: egui::Context) -> Self {
        let config = load_config();
        info!("Using backend at {}", config.api_base_url);
        let store = AuthStore::new(LocalStorageSession);
        let api = ApiClient::new(&config.api_base_url, store.clone());

        let mut app = Self {
            navigator: WebNavigator { ctx: ctx.clone() },
            ctx,
            config,
            store,
            api,
            inbox: Rc::new(RefCell::new(Vec::new())),
            route: Route::Landing,
            cancel: CancellationToken::new(),
            user_data: normalize_user_data(None),
            translated: None,
            data_loaded: false,
            status: String::new(),
            poll_state: PollState::Idle,
            loading: false,
            chat: None,
            new_project: NewProjectForm::default(),
        };

        app.enter_route(Route::from_path(&current_path()));
        app
    }

    // ========================================================================
    // Routing
    // ========================================================================

    pub(crate) fn go(&mut self, route: Route) {
        push_history(route.path());
        self.enter_route(route);
    }

    /// Picks up back/forward buttons and navigations made by background tasks
    fn sync_route_with_location(&mut self) {
        let route = Route::from_path(&current_path());
        if route != self.route {
            self.enter_route(route);
        }
    }

    fn enter_route(&mut self, route: Route) {
        debug!("Entering {:?}", route);
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.route = route;
        self.loading = false;
        self.chat = None;

        match route {
            Route::AuthCallback => match LoginRedirect::from_callback_query(&current_search()) {
                Some(login) if self.store_login(&login) => {
                    replace_history(Route::Home.path());
                    self.enter_route(Route::Home);
                }
                _ => {
                    warn!("Callback without a usable session");
                    replace_history(Route::Landing.path());
                    self.enter_route(Route::Landing);
                }
            },
            Route::Home => {
                let fresh_login = LoginRedirect::from_home_query(&current_search())
                    .filter(|login| self.store_login(login))
                    .is_some();
                if fresh_login {
                    replace_history(Route::Home.path());
                }
                if !self.store.get_auth_state().is_authenticated {
                    self.go(Route::Landing);
                } else if fresh_login {
                    self.start_polling();
                } else {
                    self.start_load();
                }
            }
            Route::Profile | Route::Projects => {
                if !self.store.get_auth_state().is_authenticated {
                    self.go(Route::Landing);
                } else if !self.data_loaded {
                    self.start_load();
                }
            }
            Route::Landing => {}
        }
    }

    fn store_login(&self, login: &LoginRedirect) -> bool {
        match self
            .store
            .set_auth_state(&login.username, &login.token, login.user_id.as_deref())
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not store session: {}", e);
                false
            }
        }
    }

    pub(crate) fn sign_out(&mut self) {
        self.cancel.cancel();
        self.store.sign_out(&self.navigator);
        self.reset_data();
    }

    fn reset_data(&mut self) {
        self.user_data = normalize_user_data(None);
        self.translated = None;
        self.data_loaded = false;
        self.chat = None;
        self.loading = false;
        self.poll_state = PollState::Idle;
        self.status.clear();
    }

    // ========================================================================
    // Background tasks
    // ========================================================================

    fn start_polling(&mut self) {
        let source = PollSource {
            api: self.api.clone(),
            navigator: self.navigator.clone(),
            inbox: self.inbox.clone(),
            cancel: self.cancel.clone(),
        };
        let mut controller = PollingController::new(
            source,
            TimerSleeper,
            self.config.polling.clone(),
            self.cancel.clone(),
        );
        let inbox = self.inbox.clone();
        let ctx = self.ctx.clone();
        let cancel = self.cancel.clone();
        self.loading = true;

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = controller
                .run(|state, message| {
                    let event = AppEvent::PollProgress { state, message: message.to_string() };
                    push_unless_cancelled(&cancel, &inbox, &ctx, event);
                })
                .await;
            push_unless_cancelled(&cancel, &inbox, &ctx, AppEvent::PollFinished(outcome));
        });
    }

    fn start_load(&mut self) {
        let api = self.api.clone();
        let navigator = self.navigator.clone();
        let inbox = self.inbox.clone();
        let cancel = self.cancel.clone();
        self.loading = true;

        wasm_bindgen_futures::spawn_local(async move {
            let load = load_dashboard(&api, api.store(), &navigator).await;
            push_unless_cancelled(&cancel, &inbox, &navigator.ctx, AppEvent::Dashboard(load));
        });
    }

    pub(crate) fn open_project_chat(&mut self, project_name: &str) {
        let intro = format!(
            "Let's scope your next step for {}. What would you like to build or improve?",
            project_name
        );
        self.chat = Some(ChatModal {
            target: ChatTarget::Project(project_name.to_string()),
            session: ChatSession::with_intro(&intro),
            input: String::new(),
        });
    }

    pub(crate) fn start_scoping(&mut self) {
        if !self.new_project.is_valid() {
            return;
        }
        let descriptor = self.new_project.to_descriptor();
        let mut session = ChatSession::new();
        session.begin_request();
        let ticket = session.ticket();
        self.chat = Some(ChatModal {
            target: ChatTarget::NewProject(descriptor.clone()),
            session,
            input: String::new(),
        });

        let api = self.api.clone();
        let inbox = self.inbox.clone();
        let ctx = self.ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let update = match api.create_ai_context(&descriptor).await {
                Ok(reply) => ChatUpdate::ScopingStarted(reply),
                Err(e) => ChatUpdate::Failed(e),
            };
            push_event(&inbox, &ctx, AppEvent::Chat { ticket, update });
        });
    }

    pub(crate) fn send_chat_message(&mut self, input: &str) {
        let Some(modal) = self.chat.as_mut() else { return };
        let Some(message) = modal.session.submit_user_message(input) else { return };

        let ticket = modal.session.ticket();
        let api = self.api.clone();
        let inbox = self.inbox.clone();
        let ctx = self.ctx.clone();
        match &modal.target {
            ChatTarget::Project(project_id) => {
                let project_id = project_id.clone();
                let request = ProjectChatRequest {
                    message,
                    session_id: modal.session.session_id().map(str::to_string),
                };
                wasm_bindgen_futures::spawn_local(async move {
                    let update = match api.project_chat(&project_id, &request).await {
                        Ok(reply) => ChatUpdate::Reply(reply),
                        Err(e) => ChatUpdate::Failed(e),
                    };
                    push_event(&inbox, &ctx, AppEvent::Chat { ticket, update });
                });
            }
            ChatTarget::NewProject(_) => {
                let Some(thread_id) = modal.session.thread_id().map(str::to_string) else {
                    modal.session.apply_error(&DivergenceError::InvalidData("scoping thread not started".to_string()));
                    return;
                };
                let request = ContinueScopingRequest { thread_id, message };
                wasm_bindgen_futures::spawn_local(async move {
                    let update = match api.continue_scoping(&request).await {
                        Ok(reply) => ChatUpdate::ScopingReply(reply),
                        Err(e) => ChatUpdate::Failed(e),
                    };
                    push_event(&inbox, &ctx, AppEvent::Chat { ticket, update });
                });
            }
        }
    }

    pub(crate) fn generate_breakdown(&mut self) {
        let Some(modal) = self.chat.take() else { return };
        let project_id = modal.target.project_id().to_string();
        info!("Requesting breakdown for {}", project_id);
        self.status = format!("Generating breakdown for {}...", project_id);

        let api = self.api.clone();
        let inbox = self.inbox.clone();
        let ctx = self.ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = api.generate_breakdown(&project_id).await;
            push_event(&inbox, &ctx, AppEvent::BreakdownRequested(result));
        });
    }

    // ========================================================================
    // Events
    // ========================================================================

    fn drain_events(&mut self) {
        let events = std::mem::take(&mut *self.inbox.borrow_mut());
        for event in events {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::PollProgress { state, message } => {
                self.poll_state = state;
                self.status = message;
            }
            AppEvent::PollFinished(outcome) => {
                debug!("Polling finished: {:?}", outcome);
                self.loading = false;
            }
            AppEvent::Dashboard(load) => self.apply_dashboard(load),
            AppEvent::Chat { update: ChatUpdate::Failed(DivergenceError::Unauthorized), .. } => {
                warn!("Token rejected during chat, signing out");
                self.sign_out();
            }
            AppEvent::Chat { ticket, update } => {
                if let ChatUpdate::Failed(e) = &update {
                    warn!("Chat request failed: {}", e);
                }
                let applied = self
                    .chat
                    .as_mut()
                    .is_some_and(|modal| modal.session.apply_update(ticket, &update));
                if !applied {
                    debug!("Dropping reply for a chat that is no longer open");
                }
            }
            AppEvent::BreakdownRequested(Ok(())) => {
                self.status = "Breakdown generation started".to_string();
            }
            AppEvent::BreakdownRequested(Err(e)) => {
                warn!("Breakdown request failed: {}", e);
                self.status = format!("Breakdown request failed: {}", e);
            }
        }
    }

    fn apply_dashboard(&mut self, load: DashboardLoad) {
        self.loading = false;
        match load {
            DashboardLoad::Loaded { user_data, translated } => {
                info!("Dashboard loaded for {}", user_data.profile.username);
                self.user_data = user_data;
                self.translated = translated;
                self.data_loaded = true;
                if self.poll_state != PollState::Timeout {
                    self.status.clear();
                }
            }
            DashboardLoad::NoData { translated } => {
                self.user_data = normalize_user_data(None);
                self.translated = translated;
                self.data_loaded = true;
                self.status = "No analysis available yet. Showing sample data.".to_string();
            }
            DashboardLoad::SignedOut => self.reset_data(),
            DashboardLoad::Failed { message } => {
                self.status = format!("Could not load your data: {}", message);
            }
        }
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.store.get_auth_state().is_authenticated
    }
}

// ============================================================================
// eframe::App Implementation
// ============================================================================

impl eframe::App for WebApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.sync_route_with_location();

        if self.loading {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        self.render_top_panel(ctx);
        match self.route {
            Route::Landing | Route::AuthCallback => self.render_landing(ctx),
            Route::Home => self.render_home(ctx),
            Route::Profile => self.render_profile(ctx),
            Route::Projects => self.render_projects(ctx),
        }
        self.render_chat_window(ctx);
    }
}

impl Drop for WebApp {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
