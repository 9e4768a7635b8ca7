//! Render state - data structure sent from App layer to UI for rendering

use crate::app::auth::{LoginForm, RegisterForm, ResetPasswordForm};
use crate::app::policies::PolicyList;
use crate::app::router::View;
use crate::app::travel::TravelFormState;
use crate::app::vehicle::VehicleFormState;
use crate::messages::ui_events::InputMode;
use crate::models::{TravelPolicy, VehiclePolicy};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub view: View,
    pub authenticated: bool,
    pub user_id: Option<String>,

    pub input_mode: InputMode,
    pub show_help: bool,
    /// Destination of a scheduled redirect
    pub redirecting: Option<View>,
    /// Cancel prompt awaiting y/n
    pub confirm_prompt: Option<&'static str>,

    pub login: LoginForm,
    pub register: RegisterForm,
    pub reset: ResetPasswordForm,
    pub vehicle: VehicleFormState,
    pub travel: TravelFormState,
    pub vehicle_policies: PolicyList<VehiclePolicy>,
    pub travel_policies: PolicyList<TravelPolicy>,
}
