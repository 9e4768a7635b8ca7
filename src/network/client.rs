//! HTTP client wrapper - calls the insurance services and decodes their replies
//!
//! Every call is split in two: the async part sends the request and returns
//! `(status, body)`, and a pure `decode_*` function turns that pair into the
//! typed result. The decoders carry all of the status-code interpretation.

use std::time::Instant;

use serde_json::{json, Value};

use crate::config::{join_url, Config, Endpoints};
use crate::constants::TRAVEL_SAVED_MESSAGE;
use crate::error::{ApiError, ApiResult};
use crate::messages::network::VehicleSubmitReply;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{
    AuthTokens, CurrencyRates, Registration, ServiceRecord, TravelPolicy, TravelPolicyRequest,
    TravelQuote, TripLookup, VehiclePolicy, VehiclePolicyRequest, VehicleQuote, VehicleRecord,
};

/// Client for every external service the app talks to
#[derive(Clone)]
pub struct InsuranceClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl InsuranceClient {
    pub fn new(config: &Config) -> Self {
        InsuranceClient {
            http: create_client(config),
            endpoints: config.endpoints.clone(),
        }
    }

    /// Send a request and read the whole body
    async fn send(&self, request: reqwest::RequestBuilder) -> ApiResult<(u16, String)> {
        let response = request.send().await.map_err(|e| ApiError::from_reqwest(&e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Error reading body: {}", e)))?;
        Ok((status, body))
    }

    fn auth_post(&self, payload: &Value) -> reqwest::RequestBuilder {
        self.http
            .post(join_url(&self.endpoints.auth, "auth"))
            .json(payload)
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthTokens> {
        let payload = json!({ "action": "login", "username": username, "password": password });
        let (status, body) = self.send(self.auth_post(&payload)).await?;
        decode_login(status, &body)
    }

    pub async fn register(&self, registration: &Registration) -> ApiResult<String> {
        let payload = json!({
            "action": "register",
            "username": registration.username,
            "email": registration.email,
            "password": registration.password,
        });
        let (status, body) = self.send(self.auth_post(&payload)).await?;
        decode_message(status, &body, "Registration successful.", "Registration failed.")
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResult<String> {
        let payload = json!({ "action": "forgot_password", "email": email });
        let (status, body) = self.send(self.auth_post(&payload)).await?;
        decode_message(
            status,
            &body,
            "OTP sent to your email. Enter it below to reset your password.",
            "Failed to send OTP.",
        )
    }

    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> ApiResult<String> {
        let payload = json!({
            "action": "reset_password",
            "email": email,
            "otp": otp,
            "new_password": new_password,
        });
        let (status, body) = self.send(self.auth_post(&payload)).await?;
        decode_message(
            status,
            &body,
            "Password reset successfully. You can now log in with your new password.",
            "Failed to reset password.",
        )
    }

    pub async fn currency_rates(&self) -> ApiResult<CurrencyRates> {
        let (status, body) = self
            .send(self.http.get(&self.endpoints.currency_rates))
            .await?;
        decode_rates(status, &body)
    }

    /// Registry and service-history lookups issued together; either failing fails both
    pub async fn lookup_vehicle(&self, registration_number: &str) -> ApiResult<VehicleQuote> {
        let vehicle = async {
            let (status, body) = self
                .send(
                    self.http
                        .get(join_url(&self.endpoints.vehicle_registry, "vehicle"))
                        .query(&[("registration_number", registration_number)]),
                )
                .await?;
            decode_lookup::<VehicleRecord>(status, &body, "Vehicle lookup failed")
        };
        let service = async {
            let (status, body) = self
                .send(
                    self.http
                        .get(join_url(&self.endpoints.service_history, "service"))
                        .query(&[("registration_number", registration_number)]),
                )
                .await?;
            decode_lookup::<ServiceRecord>(status, &body, "Service history lookup failed")
        };

        let (mut vehicle, service) = tokio::try_join!(vehicle, service)?;
        if vehicle.registration_number.is_none() {
            vehicle.registration_number = Some(registration_number.to_string());
        }
        Ok(VehicleQuote::merge(vehicle, service))
    }

    pub async fn create_vehicle_policy(
        &self,
        request: &VehiclePolicyRequest,
    ) -> ApiResult<VehicleSubmitReply> {
        let payload = encode_vehicle_policy(request)?;
        let (status, body) = self
            .send(
                self.http
                    .post(join_url(&self.endpoints.vehicle_policies, "vehicle"))
                    .json(&payload),
            )
            .await?;
        decode_vehicle_submit(status, &body)
    }

    pub async fn vehicle_policies(&self, user_id: &str) -> ApiResult<Vec<VehiclePolicy>> {
        let (status, body) = self
            .send(
                self.http
                    .get(join_url(&self.endpoints.vehicle_policies, "vehicle"))
                    .query(&[("userId", user_id)]),
            )
            .await?;
        decode_vehicle_policies(status, &body)
    }

    pub async fn delete_vehicle_policy(&self, user_id: &str, insurance_id: &str) -> ApiResult<()> {
        let (status, body) = self
            .send(
                self.http
                    .delete(join_url(&self.endpoints.vehicle_cancel, "delete-car-insurance"))
                    .query(&[("userId", user_id), ("insuranceId", insurance_id)]),
            )
            .await?;
        decode_delete(status, &body, "Failed to cancel the insurance policy")
    }

    pub async fn lookup_trip(
        &self,
        username: &str,
        trip_title: &str,
    ) -> ApiResult<Option<TravelQuote>> {
        let (status, body) = self
            .send(
                self.http
                    .get(join_url(&self.endpoints.trips, "detail"))
                    .query(&[("userId", username), ("title", trip_title)]),
            )
            .await?;
        decode_trip(status, &body, username, trip_title)
    }

    pub async fn create_travel_policy(&self, request: &TravelPolicyRequest) -> ApiResult<String> {
        let (status, body) = self
            .send(
                self.http
                    .post(join_url(&self.endpoints.travel_policies, "travel"))
                    .json(request),
            )
            .await?;
        decode_message(
            status,
            &body,
            TRAVEL_SAVED_MESSAGE,
            "Failed to save travel insurance data.",
        )
    }

    pub async fn travel_policies(&self, user_id: &str) -> ApiResult<Vec<TravelPolicy>> {
        let (status, body) = self
            .send(
                self.http
                    .get(join_url(&self.endpoints.travel_list, "travel-policies"))
                    .query(&[("userId", user_id)]),
            )
            .await?;
        decode_travel_policies(status, &body)
    }

    pub async fn delete_travel_policy(&self, user_id: &str, insurance_id: &str) -> ApiResult<()> {
        let (status, body) = self
            .send(
                self.http
                    .delete(join_url(&self.endpoints.travel_cancel, "cancel-insurance-api"))
                    .query(&[("userId", user_id), ("insuranceId", insurance_id)]),
            )
            .await?;
        decode_delete(status, &body, "Failed to delete policy.")
    }

    /// Run one command and package its result; `None` for commands with no reply
    pub async fn execute(&self, command: NetworkCommand) -> Option<NetworkResponse> {
        let response = match command {
            NetworkCommand::Login { id, username, password } => NetworkResponse::LoggedIn {
                id,
                result: self.login(&username, &password).await,
            },
            NetworkCommand::Register { id, registration } => NetworkResponse::Registered {
                id,
                result: self.register(&registration).await,
            },
            NetworkCommand::ForgotPassword { id, email } => NetworkResponse::OtpSent {
                id,
                result: self.forgot_password(&email).await,
            },
            NetworkCommand::ResetPassword { id, email, otp, new_password } => {
                NetworkResponse::PasswordReset {
                    id,
                    result: self.reset_password(&email, &otp, &new_password).await,
                }
            }
            NetworkCommand::FetchRates { id } => NetworkResponse::Rates {
                id,
                result: self.currency_rates().await,
            },
            NetworkCommand::LookupVehicle { id, registration_number } => {
                NetworkResponse::VehicleFound {
                    id,
                    result: self.lookup_vehicle(&registration_number).await,
                }
            }
            NetworkCommand::CreateVehiclePolicy { id, request } => {
                NetworkResponse::VehiclePolicyCreated {
                    id,
                    result: self.create_vehicle_policy(&request).await,
                }
            }
            NetworkCommand::ListVehiclePolicies { id, user_id } => {
                NetworkResponse::VehiclePolicies {
                    id,
                    result: self.vehicle_policies(&user_id).await,
                }
            }
            NetworkCommand::DeleteVehiclePolicy { id, user_id, insurance_id } => {
                let result = self.delete_vehicle_policy(&user_id, &insurance_id).await;
                NetworkResponse::VehiclePolicyDeleted { id, insurance_id, result }
            }
            NetworkCommand::LookupTrip { id, username, trip_title } => NetworkResponse::TripFound {
                id,
                result: self.lookup_trip(&username, &trip_title).await,
            },
            NetworkCommand::CreateTravelPolicy { id, request } => {
                NetworkResponse::TravelPolicyCreated {
                    id,
                    result: self.create_travel_policy(&request).await,
                }
            }
            NetworkCommand::ListTravelPolicies { id, user_id } => NetworkResponse::TravelPolicies {
                id,
                result: self.travel_policies(&user_id).await,
            },
            NetworkCommand::DeleteTravelPolicy { id, user_id, insurance_id } => {
                let result = self.delete_travel_policy(&user_id, &insurance_id).await;
                NetworkResponse::TravelPolicyDeleted { id, insurance_id, result }
            }
            NetworkCommand::Shutdown => return None,
        };
        Some(response)
    }
}

/// Execute a command, logging its name, outcome and duration
pub async fn execute_command(client: &InsuranceClient, command: NetworkCommand) -> Option<NetworkResponse> {
    let name = command.name();
    let start = Instant::now();
    let response = client.execute(command).await?;
    let elapsed = start.elapsed().as_millis() as u64;
    if response.is_error() {
        tracing::warn!(id = response.id(), call = name, time_ms = elapsed, "Call failed");
    } else {
        tracing::info!(id = response.id(), call = name, time_ms = elapsed, "Call completed");
    }
    Some(response)
}

/// Create an HTTP client with the configured timeout
pub fn create_client(config: &Config) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

// ============================================================================
// Decoders
// ============================================================================

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Parse a body as JSON; non-JSON bodies read as `null`
fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or(Value::Null)
}

/// First non-empty string among `keys` in a JSON object
fn server_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn status_error(status: u16, value: &Value, keys: &[&str], fallback: &str) -> ApiError {
    ApiError::status(
        status,
        server_text(value, keys).unwrap_or_else(|| fallback.to_string()),
    )
}

pub fn decode_login(status: u16, body: &str) -> ApiResult<AuthTokens> {
    let value = parse_body(body);
    if is_success(status) {
        Ok(serde_json::from_value(value)?)
    } else {
        Err(status_error(status, &value, &["error"], "Login failed"))
    }
}

/// Decode a `{message}` / `{error}` style reply
pub fn decode_message(
    status: u16,
    body: &str,
    success_fallback: &str,
    error_fallback: &str,
) -> ApiResult<String> {
    let value = parse_body(body);
    if is_success(status) {
        Ok(server_text(&value, &["message"]).unwrap_or_else(|| success_fallback.to_string()))
    } else {
        Err(status_error(status, &value, &["message", "error"], error_fallback))
    }
}

pub fn decode_rates(status: u16, body: &str) -> ApiResult<CurrencyRates> {
    if !is_success(status) {
        return Err(ApiError::status(status, "Failed to fetch currency rates"));
    }
    Ok(serde_json::from_str(body)?)
}

pub fn decode_lookup<T: serde::de::DeserializeOwned>(
    status: u16,
    body: &str,
    fallback: &str,
) -> ApiResult<T> {
    if !is_success(status) {
        return Err(status_error(status, &parse_body(body), &["error", "message"], fallback));
    }
    Ok(serde_json::from_str(body)?)
}

/// Wrap the record as a JSON string inside `{"body": ...}`
pub fn encode_vehicle_policy(request: &VehiclePolicyRequest) -> ApiResult<Value> {
    let inner = serde_json::to_string(request)?;
    Ok(json!({ "body": inner }))
}

/// Unwrap `{"body": "<json>"}` and read the inner `message` / `statusCode`
pub fn decode_vehicle_submit(status: u16, body: &str) -> ApiResult<VehicleSubmitReply> {
    let outer = parse_body(body);
    let inner = match outer.get("body") {
        Some(Value::String(s)) => serde_json::from_str::<Value>(s)?,
        Some(v @ Value::Object(_)) => v.clone(),
        _ if !is_success(status) => {
            return Err(status_error(
                status,
                &outer,
                &["message", "error"],
                "Failed to process request",
            ))
        }
        _ => return Err(ApiError::Decode("missing body".to_string())),
    };
    Ok(VehicleSubmitReply {
        status_code: inner
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok()),
        message: server_text(&inner, &["message"]),
    })
}

pub fn decode_vehicle_policies(status: u16, body: &str) -> ApiResult<Vec<VehiclePolicy>> {
    match status {
        404 => Ok(Vec::new()),
        s if is_success(s) => Ok(serde_json::from_str(body)?),
        s => Err(ApiError::status(s, "Failed to fetch policies")),
    }
}

pub fn decode_delete(status: u16, body: &str, fallback: &str) -> ApiResult<()> {
    if is_success(status) {
        Ok(())
    } else {
        Err(status_error(status, &parse_body(body), &["error"], fallback))
    }
}

pub fn decode_trip(
    status: u16,
    body: &str,
    username: &str,
    trip_title: &str,
) -> ApiResult<Option<TravelQuote>> {
    if !is_success(status) {
        return Err(status_error(
            status,
            &parse_body(body),
            &["error"],
            "Failed to fetch trip details",
        ));
    }
    let lookup: TripLookup = serde_json::from_str(body)?;
    Ok(lookup
        .trips
        .first()
        .map(|trip| TravelQuote::from_trip(username, trip_title, trip)))
}

pub fn decode_travel_policies(status: u16, body: &str) -> ApiResult<Vec<TravelPolicy>> {
    #[derive(serde::Deserialize)]
    struct Envelope {
        #[serde(default)]
        policies: Vec<TravelPolicy>,
    }

    match status {
        404 => Ok(Vec::new()),
        s if is_success(s) => Ok(serde_json::from_str::<Envelope>(body)?.policies),
        s => Err(status_error(
            s,
            &parse_body(body),
            &["error"],
            "Failed to fetch policies.",
        )),
    }
}
