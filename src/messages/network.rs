//! Network messages - communication between App and Network layers

use crate::error::ApiResult;
use crate::models::{
    AuthTokens, CurrencyRates, Registration, TravelPolicy, TravelPolicyRequest, TravelQuote,
    VehiclePolicy, VehiclePolicyRequest, VehicleQuote,
};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    Login {
        id: u64,
        username: String,
        password: String,
    },
    Register {
        id: u64,
        registration: Registration,
    },
    /// Request a password-reset OTP for an email
    ForgotPassword {
        id: u64,
        email: String,
    },
    /// Confirm a password reset with the OTP
    ResetPassword {
        id: u64,
        email: String,
        otp: String,
        new_password: String,
    },
    FetchRates {
        id: u64,
    },
    /// Registry and service-history lookups, joined
    LookupVehicle {
        id: u64,
        registration_number: String,
    },
    CreateVehiclePolicy {
        id: u64,
        request: VehiclePolicyRequest,
    },
    ListVehiclePolicies {
        id: u64,
        user_id: String,
    },
    DeleteVehiclePolicy {
        id: u64,
        user_id: String,
        insurance_id: String,
    },
    LookupTrip {
        id: u64,
        username: String,
        trip_title: String,
    },
    CreateTravelPolicy {
        id: u64,
        request: TravelPolicyRequest,
    },
    ListTravelPolicies {
        id: u64,
        user_id: String,
    },
    DeleteTravelPolicy {
        id: u64,
        user_id: String,
        insurance_id: String,
    },

    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            NetworkCommand::Login { .. } => "login",
            NetworkCommand::Register { .. } => "register",
            NetworkCommand::ForgotPassword { .. } => "forgot_password",
            NetworkCommand::ResetPassword { .. } => "reset_password",
            NetworkCommand::FetchRates { .. } => "fetch_rates",
            NetworkCommand::LookupVehicle { .. } => "lookup_vehicle",
            NetworkCommand::CreateVehiclePolicy { .. } => "create_vehicle_policy",
            NetworkCommand::ListVehiclePolicies { .. } => "list_vehicle_policies",
            NetworkCommand::DeleteVehiclePolicy { .. } => "delete_vehicle_policy",
            NetworkCommand::LookupTrip { .. } => "lookup_trip",
            NetworkCommand::CreateTravelPolicy { .. } => "create_travel_policy",
            NetworkCommand::ListTravelPolicies { .. } => "list_travel_policies",
            NetworkCommand::DeleteTravelPolicy { .. } => "delete_travel_policy",
            NetworkCommand::Shutdown => "shutdown",
        }
    }
}

/// Decoded reply of the vehicle policy service (from the inner JSON string)
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSubmitReply {
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    LoggedIn {
        id: u64,
        result: ApiResult<AuthTokens>,
    },
    Registered {
        id: u64,
        result: ApiResult<String>,
    },
    OtpSent {
        id: u64,
        result: ApiResult<String>,
    },
    PasswordReset {
        id: u64,
        result: ApiResult<String>,
    },
    Rates {
        id: u64,
        result: ApiResult<CurrencyRates>,
    },
    VehicleFound {
        id: u64,
        result: ApiResult<VehicleQuote>,
    },
    VehiclePolicyCreated {
        id: u64,
        result: ApiResult<VehicleSubmitReply>,
    },
    VehiclePolicies {
        id: u64,
        result: ApiResult<Vec<VehiclePolicy>>,
    },
    VehiclePolicyDeleted {
        id: u64,
        insurance_id: String,
        result: ApiResult<()>,
    },
    /// `Ok(None)` when the lookup succeeded but matched no trip
    TripFound {
        id: u64,
        result: ApiResult<Option<TravelQuote>>,
    },
    TravelPolicyCreated {
        id: u64,
        result: ApiResult<String>,
    },
    TravelPolicies {
        id: u64,
        result: ApiResult<Vec<TravelPolicy>>,
    },
    TravelPolicyDeleted {
        id: u64,
        insurance_id: String,
        result: ApiResult<()>,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::LoggedIn { id, .. }
            | NetworkResponse::Registered { id, .. }
            | NetworkResponse::OtpSent { id, .. }
            | NetworkResponse::PasswordReset { id, .. }
            | NetworkResponse::Rates { id, .. }
            | NetworkResponse::VehicleFound { id, .. }
            | NetworkResponse::VehiclePolicyCreated { id, .. }
            | NetworkResponse::VehiclePolicies { id, .. }
            | NetworkResponse::VehiclePolicyDeleted { id, .. }
            | NetworkResponse::TripFound { id, .. }
            | NetworkResponse::TravelPolicyCreated { id, .. }
            | NetworkResponse::TravelPolicies { id, .. }
            | NetworkResponse::TravelPolicyDeleted { id, .. } => *id,
        }
    }

    /// Whether the call behind this response failed
    pub fn is_error(&self) -> bool {
        match self {
            NetworkResponse::LoggedIn { result, .. } => result.is_err(),
            NetworkResponse::Registered { result, .. }
            | NetworkResponse::OtpSent { result, .. }
            | NetworkResponse::PasswordReset { result, .. }
            | NetworkResponse::TravelPolicyCreated { result, .. } => result.is_err(),
            NetworkResponse::Rates { result, .. } => result.is_err(),
            NetworkResponse::VehicleFound { result, .. } => result.is_err(),
            NetworkResponse::VehiclePolicyCreated { result, .. } => result.is_err(),
            NetworkResponse::VehiclePolicies { result, .. } => result.is_err(),
            NetworkResponse::VehiclePolicyDeleted { result, .. }
            | NetworkResponse::TravelPolicyDeleted { result, .. } => result.is_err(),
            NetworkResponse::TripFound { result, .. } => result.is_err(),
            NetworkResponse::TravelPolicies { result, .. } => result.is_err(),
        }
    }
}
