//! App state - the state machine behind every view, with no network I/O

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::app::auth::{LoginForm, RegisterForm, ResetPasswordForm};
use crate::app::forms::{Form, TextInput};
use crate::app::policies::PolicyList;
use crate::app::router::{self, Route, View};
use crate::app::travel::TravelFormState;
use crate::app::vehicle::VehicleFormState;
use crate::config::{default_data_dir, Config};
use crate::error::{ApiError, ApiResult};
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState};
use crate::models::{CurrencyRates, Session, TravelPolicy, VehiclePolicy};
use crate::storage::SessionStore;

/// A navigation scheduled for later
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRedirect {
    pub to: View,
    pub at: Instant,
}

/// Main application state - pure data plus transitions
pub struct AppState {
    pub view: View,
    pub session: Session,
    store: SessionStore,

    pub input_mode: InputMode,
    pub show_help: bool,
    pub next_request_id: u64,
    pub redirect: Option<PendingRedirect>,
    redirect_delay: Duration,
    pub export_dir: PathBuf,

    // Per-view state, rebuilt on every navigation
    pub login: LoginForm,
    pub register: RegisterForm,
    pub reset: ResetPasswordForm,
    pub vehicle: VehicleFormState,
    pub travel: TravelFormState,
    pub vehicle_policies: PolicyList<VehiclePolicy>,
    pub travel_policies: PolicyList<TravelPolicy>,
}

impl AppState {
    /// Build the state from config and the saved session
    pub fn new(config: &Config, store: SessionStore, data_dir: PathBuf) -> Self {
        let session = match store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read saved session, starting logged out");
                Session::default()
            }
        };
        AppState {
            view: View::Login,
            session,
            store,
            input_mode: InputMode::Normal,
            show_help: false,
            next_request_id: 1,
            redirect: None,
            redirect_delay: config.redirect_delay(),
            export_dir: config.export_dir(&data_dir),
            login: LoginForm::default(),
            register: RegisterForm::default(),
            reset: ResetPasswordForm::default(),
            vehicle: VehicleFormState::default(),
            travel: TravelFormState::default(),
            vehicle_policies: PolicyList::default(),
            travel_policies: PolicyList::default(),
        }
    }

    /// State with no saved session and default config
    pub fn ephemeral() -> Self {
        Self::new(&Config::default(), SessionStore::in_memory(), default_data_dir())
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // ========================
    // Navigation
    // ========================

    /// Open a path, as the initial route or a link
    pub fn open_path(&mut self, path: &str) -> Option<NetworkCommand> {
        match router::resolve(path) {
            Route::Show(view) => self.navigate(view),
            Route::Logout => self.logout(),
        }
    }

    /// Show a view (subject to the guard), rebuilding its state.
    ///
    /// Returns the view's load request, if it has one.
    pub fn navigate(&mut self, requested: View) -> Option<NetworkCommand> {
        let view = router::guard(requested, self.is_authenticated());
        if view != requested {
            tracing::info!(requested = requested.path(), "Not authenticated, redirecting to login");
        }
        tracing::debug!(path = view.path(), "Navigate");

        self.view = view;
        self.input_mode = InputMode::Normal;
        self.redirect = None;

        match view {
            View::Login => {
                self.login = LoginForm::default();
                None
            }
            View::Register => {
                self.register = RegisterForm::default();
                None
            }
            View::ResetPassword => {
                self.reset = ResetPasswordForm::default();
                None
            }
            View::Home => None,
            View::VehicleForm => {
                self.vehicle = VehicleFormState::default();
                let id = self.next_id();
                self.vehicle.rates_pending = Some(id);
                Some(NetworkCommand::FetchRates { id })
            }
            View::TravelForm => {
                self.travel = TravelFormState::default();
                let id = self.next_id();
                self.travel.rates_pending = Some(id);
                Some(NetworkCommand::FetchRates { id })
            }
            View::VehiclePolicies => {
                self.vehicle_policies = PolicyList::default();
                self.load_vehicle_policies()
            }
            View::TravelPolicies => {
                self.travel_policies = PolicyList::default();
                self.load_travel_policies()
            }
        }
    }

    /// Clear the session everywhere and return to login
    pub fn logout(&mut self) -> Option<NetworkCommand> {
        self.session.logout();
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to remove saved session");
        }
        tracing::info!("Logged out");
        self.navigate(View::Login)
    }

    /// Record a successful login and persist it
    pub(crate) fn start_session(&mut self, access_token: String, id_token: String, user_id: String) {
        self.session.login(access_token, id_token, user_id);
        if let Err(e) = self.store.save(&self.session) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }

    pub(crate) fn schedule_redirect(&mut self, to: View) {
        self.redirect = Some(PendingRedirect {
            to,
            at: Instant::now() + self.redirect_delay,
        });
    }

    /// Fire a due redirect
    pub fn tick(&mut self, now: Instant) -> Option<NetworkCommand> {
        match self.redirect {
            Some(redirect) if now >= redirect.at => {
                self.redirect = None;
                self.navigate(redirect.to)
            }
            _ => None,
        }
    }

    // ========================
    // Input editing
    // ========================

    fn active_form(&mut self) -> Option<&mut dyn Form> {
        match self.view {
            View::Login => Some(&mut self.login),
            View::Register => Some(&mut self.register),
            View::ResetPassword => Some(&mut self.reset),
            View::VehicleForm => Some(&mut self.vehicle),
            View::TravelForm => Some(&mut self.travel),
            _ => None,
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        self.active_form().and_then(|form| form.focused_input())
    }

    pub fn next_field(&mut self) {
        if let Some(form) = self.active_form() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.active_form() {
            form.prev_field();
        }
    }

    pub fn start_editing(&mut self) {
        if let Some(input) = self.focused_input() {
            input.cursor = input.value.len();
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(input) = self.focused_input() {
            input.insert(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(input) = self.focused_input() {
            input.backspace();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(input) = self.focused_input() {
            input.move_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(input) = self.focused_input() {
            input.move_right();
        }
    }

    // ========================
    // Primary action
    // ========================

    /// The Enter action of the current view
    pub fn submit(&mut self) -> Option<NetworkCommand> {
        self.stop_editing();
        match self.view {
            View::Login => self.submit_login(),
            View::Register => self.submit_registration(),
            View::ResetPassword => self.submit_reset(),
            View::VehicleForm => self.submit_vehicle(),
            View::TravelForm => self.submit_travel(),
            View::Home | View::VehiclePolicies | View::TravelPolicies => None,
        }
    }

    // ========================
    // Tier and currency
    // ========================

    pub fn cycle_tier(&mut self) {
        match self.view {
            View::VehicleForm if self.vehicle.quoted => self.vehicle.tier = self.vehicle.tier.next(),
            View::TravelForm if self.travel.quote.is_some() => {
                self.travel.tier = self.travel.tier.next()
            }
            _ => {}
        }
    }

    pub fn next_currency(&mut self) {
        self.step_currency(true);
    }

    pub fn prev_currency(&mut self) {
        self.step_currency(false);
    }

    fn step_currency(&mut self, forward: bool) {
        let (currency, rates) = match self.view {
            View::VehicleForm => (&mut self.vehicle.currency, &self.vehicle.rates),
            View::TravelForm => (&mut self.travel.currency, &self.travel.rates),
            _ => return,
        };
        let step = if forward {
            rates.next_currency(currency)
        } else {
            rates.prev_currency(currency)
        };
        if let Some(code) = step {
            *currency = code;
        }
    }

    pub(crate) fn on_rates(&mut self, id: u64, result: ApiResult<CurrencyRates>) {
        let (rates, rates_error) = if self.view == View::VehicleForm
            && take_pending(&mut self.vehicle.rates_pending, id)
        {
            (&mut self.vehicle.rates, &mut self.vehicle.rates_error)
        } else if self.view == View::TravelForm && take_pending(&mut self.travel.rates_pending, id) {
            (&mut self.travel.rates, &mut self.travel.rates_error)
        } else {
            return;
        };
        match result {
            Ok(fetched) => {
                tracing::debug!(count = fetched.rates.len(), "Currency rates loaded");
                *rates = fetched;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Currency rates unavailable");
                *rates_error = Some("Failed to fetch currency rates".to_string());
            }
        }
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a network response; stale responses are dropped by their owners
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        match response {
            NetworkResponse::LoggedIn { id, result } => self.on_logged_in(id, result),
            NetworkResponse::Registered { id, result } => {
                self.on_registered(id, result);
                None
            }
            NetworkResponse::OtpSent { id, result } => {
                self.on_otp_sent(id, result);
                None
            }
            NetworkResponse::PasswordReset { id, result } => {
                self.on_password_reset(id, result);
                None
            }
            NetworkResponse::Rates { id, result } => {
                self.on_rates(id, result);
                None
            }
            NetworkResponse::VehicleFound { id, result } => {
                self.on_vehicle_found(id, result);
                None
            }
            NetworkResponse::VehiclePolicyCreated { id, result } => {
                self.on_vehicle_policy_created(id, result);
                None
            }
            NetworkResponse::VehiclePolicies { id, result } => {
                self.vehicle_policies.finish_load(id, result);
                None
            }
            NetworkResponse::VehiclePolicyDeleted { id, insurance_id, result } => {
                self.vehicle_policies.finish_delete(id, &insurance_id, result);
                None
            }
            NetworkResponse::TripFound { id, result } => {
                self.on_trip_found(id, result);
                None
            }
            NetworkResponse::TravelPolicyCreated { id, result } => {
                self.on_travel_policy_created(id, result);
                None
            }
            NetworkResponse::TravelPolicies { id, result } => {
                self.travel_policies.finish_load(id, result);
                None
            }
            NetworkResponse::TravelPolicyDeleted { id, insurance_id, result } => {
                self.travel_policies.finish_delete(id, &insurance_id, result);
                None
            }
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            view: self.view,
            authenticated: self.is_authenticated(),
            user_id: self.session.user_id().map(str::to_string),
            input_mode: self.input_mode,
            show_help: self.show_help,
            redirecting: self.redirect.map(|r| r.to),
            confirm_prompt: self.confirm_prompt(),
            login: self.login.clone(),
            register: self.register.clone(),
            reset: self.reset.clone(),
            vehicle: self.vehicle.clone(),
            travel: self.travel.clone(),
            vehicle_policies: self.vehicle_policies.clone(),
            travel_policies: self.travel_policies.clone(),
        }
    }
}

/// Whether a response id matches the request a view is waiting on
pub(crate) fn take_pending(pending: &mut Option<u64>, id: u64) -> bool {
    if *pending == Some(id) {
        *pending = None;
        true
    } else {
        tracing::debug!(id, "Dropping stale response");
        false
    }
}

/// Inline text for a failed submission
pub(crate) fn error_text(error: &ApiError) -> String {
    match error {
        ApiError::Transport(reason) => format!("Error: {}", reason),
        ApiError::Status { message, .. } => message.clone(),
        ApiError::Decode(_) => format!("Error: {}", error),
    }
}
