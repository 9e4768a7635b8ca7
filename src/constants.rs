//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name
pub const APP_NAME: &str = "SafeInsure";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default data directory name under the user's home
pub const DATA_DIR_NAME: &str = ".safeinsure";

/// Session file inside the data directory
pub const SESSION_FILE: &str = "session.yaml";

/// Config file inside the data directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Log file inside the data directory
pub const LOG_FILE: &str = "safeinsure.log";

// Default service gateways

pub const DEFAULT_AUTH_URL: &str = "https://oqlkiz04je.execute-api.us-east-1.amazonaws.com/prod";
pub const DEFAULT_VEHICLE_REGISTRY_URL: &str =
    "https://djl0ckzei0.execute-api.us-east-1.amazonaws.com/prod1";
pub const DEFAULT_SERVICE_HISTORY_URL: &str =
    "https://74k7bhila7.execute-api.us-east-1.amazonaws.com/prod";
pub const DEFAULT_VEHICLE_POLICY_URL: &str =
    "https://jw6w6mqhob.execute-api.us-east-1.amazonaws.com/prod";
pub const DEFAULT_VEHICLE_CANCEL_URL: &str =
    "https://9bhvx8qj55.execute-api.us-east-1.amazonaws.com/prod";
pub const DEFAULT_TRIP_URL: &str = "https://1csykikez9.execute-api.us-east-1.amazonaws.com/prod";
pub const DEFAULT_TRAVEL_POLICY_URL: &str =
    "https://hn35z82zrb.execute-api.us-east-1.amazonaws.com/prod";
pub const DEFAULT_TRAVEL_LIST_URL: &str =
    "https://po7t08ytm8.execute-api.us-east-1.amazonaws.com/prod";
pub const DEFAULT_TRAVEL_CANCEL_URL: &str =
    "https://446h09yp37.execute-api.us-east-1.amazonaws.com/prod";
pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Delay before redirecting after a successful purchase
pub const DEFAULT_REDIRECT_DELAY_SECS: u64 = 3;

/// Marker the service-history lookup uses for absent fields
pub const NO_DATA_SENTINEL: &str = "no_data_available";

/// Shown in place of absent service fields
pub const NOT_AVAILABLE: &str = "Not Available";

/// Shown in place of absent trip dates
pub const TRIP_DATE_NOT_AVAILABLE: &str = "Not available";

/// Default currency before the user picks one
pub const BASE_CURRENCY: &str = "USD";

/// Exact message the vehicle policy service returns on success
pub const VEHICLE_SAVED_MESSAGE: &str =
    "Insurance data saved successfully! Redirecting to Policies in 3 seconds ...";

/// Fallback success text for travel policy creation
pub const TRAVEL_SAVED_MESSAGE: &str =
    "Travel insurance data saved successfully! Redirecting to Policies in 3 seconds...";

pub const CANCEL_CONFIRM_PROMPT: &str =
    "Are you sure you want to cancel this policy? This action cannot be undone.";

pub const NOT_LOGGED_IN: &str = "User is not logged in. Please log in first.";
pub const LIST_NOT_LOGGED_IN: &str = "User not logged in. Please log in first.";

pub const MAX_REGISTRATION_LEN: usize = 8;
pub const MAX_MAKE_MODEL_LEN: usize = 20;
