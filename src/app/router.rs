//! Routes and the authentication guard

/// Every screen the app can show
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Login,
    Register,
    ResetPassword,
    Home,
    VehicleForm,
    VehiclePolicies,
    TravelForm,
    TravelPolicies,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Register => "/register",
            View::ResetPassword => "/forgot-password",
            View::Home => "/home",
            View::VehicleForm => "/vehicleform",
            View::VehiclePolicies => "/policies",
            View::TravelForm => "/travelform",
            View::TravelPolicies => "/travel-policies",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Register => "Register",
            View::ResetPassword => "Reset Password",
            View::Home => "Home",
            View::VehicleForm => "Vehicle Insurance",
            View::VehiclePolicies => "Vehicle Policies",
            View::TravelForm => "Travel Insurance",
            View::TravelPolicies => "Travel Policies",
        }
    }

    /// Views that need a logged-in session
    pub fn is_protected(&self) -> bool {
        !matches!(self, View::Login | View::Register | View::ResetPassword)
    }
}

/// Result of resolving a path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Show(View),
    Logout,
}

/// Map a path to a route; `/` and unknown paths go to the login view
pub fn resolve(path: &str) -> Route {
    let path = path.trim();
    let path = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };
    match path {
        "/logout" => Route::Logout,
        "/login" => Route::Show(View::Login),
        "/register" => Route::Show(View::Register),
        "/forgot-password" => Route::Show(View::ResetPassword),
        "/home" => Route::Show(View::Home),
        "/vehicleform" => Route::Show(View::VehicleForm),
        "/policies" => Route::Show(View::VehiclePolicies),
        "/travelform" => Route::Show(View::TravelForm),
        "/travel-policies" => Route::Show(View::TravelPolicies),
        _ => Route::Show(View::Login),
    }
}

/// Redirect protected views to login when not authenticated
pub fn guard(view: View, authenticated: bool) -> View {
    if view.is_protected() && !authenticated {
        View::Login
    } else {
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [View; 8] = [
        View::Login,
        View::Register,
        View::ResetPassword,
        View::Home,
        View::VehicleForm,
        View::VehiclePolicies,
        View::TravelForm,
        View::TravelPolicies,
    ];

    #[test]
    fn test_paths_resolve_to_their_view() {
        for view in ALL {
            assert_eq!(resolve(view.path()), Route::Show(view));
        }
        assert_eq!(resolve("/policies/"), Route::Show(View::VehiclePolicies));
    }

    #[test]
    fn test_root_and_unknown_go_to_login() {
        assert_eq!(resolve("/"), Route::Show(View::Login));
        assert_eq!(resolve("/nope"), Route::Show(View::Login));
        assert_eq!(resolve("/logout"), Route::Logout);
    }

    #[test]
    fn test_guard() {
        for view in ALL {
            let guarded = guard(view, false);
            if view.is_protected() {
                assert_eq!(guarded, View::Login);
            } else {
                assert_eq!(guarded, view);
            }
            assert_eq!(guard(view, true), view);
        }
    }
}
