//! Vehicle insurance purchase: lookup, confirm, price, submit

use crate::app::forms::{Form, TextInput};
use crate::app::router::View;
use crate::app::state::{error_text, take_pending, AppState};
use crate::constants::{
    BASE_CURRENCY, MAX_MAKE_MODEL_LEN, MAX_REGISTRATION_LEN, NOT_LOGGED_IN, VEHICLE_SAVED_MESSAGE,
};
use crate::error::ApiResult;
use crate::messages::network::VehicleSubmitReply;
use crate::messages::NetworkCommand;
use crate::models::{
    convert_price, is_valid_registration, CurrencyRates, Notice, Price, VehicleQuote,
    VehiclePolicyRequest, VehicleTier,
};

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleFormState {
    /// Lookup input
    pub registration: TextInput,

    // Confirm step, filled from the lookup
    pub make: TextInput,
    pub model: TextInput,
    pub registration_date: TextInput,
    pub quote_registration: TextInput,
    pub service_date: String,
    pub service_type: String,
    pub quoted: bool,

    pub tier: VehicleTier,
    pub currency: String,
    pub rates: CurrencyRates,
    /// Rate fetch failure
    pub rates_error: Option<String>,

    pub focus: usize,
    pub notice: Option<Notice>,
    pub lookup_pending: Option<u64>,
    pub submit_pending: Option<u64>,
    pub rates_pending: Option<u64>,
    pub submitted: bool,
}

impl Default for VehicleFormState {
    fn default() -> Self {
        VehicleFormState {
            registration: TextInput::with_max(MAX_REGISTRATION_LEN),
            make: TextInput::with_max(MAX_MAKE_MODEL_LEN),
            model: TextInput::with_max(MAX_MAKE_MODEL_LEN),
            registration_date: TextInput::new(),
            quote_registration: TextInput::with_max(MAX_REGISTRATION_LEN),
            service_date: String::new(),
            service_type: String::new(),
            quoted: false,
            tier: VehicleTier::default(),
            currency: BASE_CURRENCY.to_string(),
            rates: CurrencyRates::default(),
            rates_error: None,
            focus: 0,
            notice: None,
            lookup_pending: None,
            submit_pending: None,
            rates_pending: None,
            submitted: false,
        }
    }
}

impl VehicleFormState {
    /// The confirm-step draft as currently edited
    pub fn quote(&self) -> VehicleQuote {
        VehicleQuote {
            registration_number: self.quote_registration.as_str().trim().to_string(),
            make: self.make.as_str().trim().to_string(),
            model: self.model.as_str().trim().to_string(),
            registration_date: self.registration_date.as_str().trim().to_string(),
            service_date: self.service_date.clone(),
            service_type: self.service_type.clone(),
        }
    }

    pub fn price(&self) -> Price {
        convert_price(self.tier.base_price(), &self.currency, &self.rates)
    }

    fn fill(&mut self, quote: VehicleQuote) {
        self.make.set(&quote.make);
        self.model.set(&quote.model);
        self.registration_date.set(&quote.registration_date);
        self.quote_registration.set(&quote.registration_number);
        self.service_date = quote.service_date;
        self.service_type = quote.service_type;
        self.quoted = true;
        self.focus = 0;
    }
}

impl Form for VehicleFormState {
    fn focus_index(&mut self) -> &mut usize {
        &mut self.focus
    }

    fn inputs_mut(&mut self) -> Vec<&mut TextInput> {
        if self.quoted {
            vec![
                &mut self.make,
                &mut self.model,
                &mut self.registration_date,
                &mut self.quote_registration,
            ]
        } else {
            vec![&mut self.registration]
        }
    }
}

impl AppState {
    /// Lookup before a quote exists, policy creation after
    pub(crate) fn submit_vehicle(&mut self) -> Option<NetworkCommand> {
        if self.vehicle.quoted {
            self.submit_vehicle_policy()
        } else {
            self.lookup_vehicle()
        }
    }

    fn lookup_vehicle(&mut self) -> Option<NetworkCommand> {
        if self.vehicle.lookup_pending.is_some() {
            return None;
        }
        let registration_number = self.vehicle.registration.as_str().trim().to_string();
        if !is_valid_registration(&registration_number) {
            self.vehicle.notice = Some(Notice::error(
                "Enter a registration number of up to 8 letters or digits.",
            ));
            return None;
        }

        self.vehicle.notice = None;
        let id = self.next_id();
        self.vehicle.lookup_pending = Some(id);
        Some(NetworkCommand::LookupVehicle {
            id,
            registration_number,
        })
    }

    fn submit_vehicle_policy(&mut self) -> Option<NetworkCommand> {
        if self.vehicle.submitted || self.vehicle.submit_pending.is_some() {
            return None;
        }
        let Some(user_id) = self.session.user_id().map(str::to_string) else {
            self.vehicle.notice = Some(Notice::error(NOT_LOGGED_IN));
            return None;
        };

        let quote = self.vehicle.quote();
        let request = VehiclePolicyRequest {
            user_id,
            registration_number: quote.registration_number,
            make: quote.make,
            model: quote.model,
            service_date: quote.service_date,
            insurance_type: self.vehicle.tier.as_str().to_string(),
            price: self.vehicle.price(),
        };

        self.vehicle.notice = None;
        let id = self.next_id();
        self.vehicle.submit_pending = Some(id);
        Some(NetworkCommand::CreateVehiclePolicy { id, request })
    }

    pub(crate) fn on_vehicle_found(&mut self, id: u64, result: ApiResult<VehicleQuote>) {
        if self.view != View::VehicleForm || !take_pending(&mut self.vehicle.lookup_pending, id) {
            return;
        }
        match result {
            Ok(quote) => {
                tracing::info!(registration = %quote.registration_number, "Vehicle found");
                self.vehicle.fill(quote);
                self.vehicle.notice = None;
            }
            Err(e) => self.vehicle.notice = Some(Notice::error(error_text(&e))),
        }
    }

    pub(crate) fn on_vehicle_policy_created(
        &mut self,
        id: u64,
        result: ApiResult<VehicleSubmitReply>,
    ) {
        if self.view != View::VehicleForm || !take_pending(&mut self.vehicle.submit_pending, id) {
            return;
        }
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                self.vehicle.notice = Some(Notice::error(error_text(&e)));
                return;
            }
        };

        let message = reply
            .message
            .unwrap_or_else(|| "Unexpected response from server".to_string());
        let accepted = reply.status_code == Some(200);
        if message == VEHICLE_SAVED_MESSAGE {
            self.schedule_redirect(View::VehiclePolicies);
        }
        self.vehicle.submitted = accepted || message == VEHICLE_SAVED_MESSAGE;
        self.vehicle.notice = Some(if accepted {
            Notice::success(message)
        } else {
            Notice::error(message)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::messages::NetworkResponse;

    fn logged_in_on_form() -> AppState {
        let mut state = AppState::ephemeral();
        state.start_session("A".into(), "I".into(), "alice".into());
        let cmd = state.navigate(View::VehicleForm);
        assert!(matches!(cmd, Some(NetworkCommand::FetchRates { .. })));
        state
    }

    fn lookup(state: &mut AppState, registration: &str) -> u64 {
        state.start_editing();
        for c in registration.chars() {
            state.enter_char(c);
        }
        match state.submit() {
            Some(NetworkCommand::LookupVehicle { id, registration_number }) => {
                assert_eq!(registration_number, registration);
                id
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn found_quote() -> VehicleQuote {
        VehicleQuote {
            registration_number: "AB12CDE".into(),
            make: "Ford".into(),
            model: "Focus".into(),
            registration_date: "2019-04-01".into(),
            service_date: "Not Available".into(),
            service_type: "Not Available".into(),
        }
    }

    fn quoted_state() -> AppState {
        let mut state = logged_in_on_form();
        let id = lookup(&mut state, "AB12CDE");
        state.handle_response(NetworkResponse::VehicleFound {
            id,
            result: Ok(found_quote()),
        });
        state
    }

    #[test]
    fn test_lookup_fills_confirm_step() {
        let state = quoted_state();
        assert!(state.vehicle.quoted);
        assert_eq!(state.vehicle.make.as_str(), "Ford");
        assert_eq!(state.vehicle.service_date, "Not Available");
        assert_eq!(state.vehicle.quote(), found_quote());
    }

    #[test]
    fn test_lookup_rejects_bad_registration() {
        let mut state = logged_in_on_form();
        state.start_editing();
        for c in "AB 12".chars() {
            state.enter_char(c);
        }
        assert!(state.submit().is_none());
        assert!(state.vehicle.notice.as_ref().unwrap().is_error());
    }

    #[test]
    fn test_lookup_failure_is_shown_and_retryable() {
        let mut state = logged_in_on_form();
        let id = lookup(&mut state, "ZZ99");
        state.handle_response(NetworkResponse::VehicleFound {
            id,
            result: Err(ApiError::status(404, "Vehicle not found")),
        });
        assert!(!state.vehicle.quoted);
        assert_eq!(state.vehicle.notice, Some(Notice::error("Vehicle not found")));
        assert!(matches!(state.submit(), Some(NetworkCommand::LookupVehicle { .. })));
    }

    #[test]
    fn test_lookup_sends_registration_as_typed() {
        let mut state = logged_in_on_form();
        lookup(&mut state, "ab12cde");
    }

    #[test]
    fn test_price_follows_tier_and_currency() {
        let mut state = quoted_state();
        state.vehicle.rates = CurrencyRates::from_pairs([("EUR", 0.9), ("USD", 1.0)]);
        assert_eq!(state.vehicle.price(), Price::Text("100.00".into()));

        state.cycle_tier();
        state.vehicle.currency = "EUR".into();
        assert_eq!(state.vehicle.price(), Price::Text("180.00".into()));

        state.vehicle.currency = "GBP".into();
        assert_eq!(state.vehicle.price(), Price::base(200));
    }

    #[test]
    fn test_submit_sends_edited_quote() {
        let mut state = quoted_state();
        state.vehicle.model.set("Fiesta");
        state.vehicle.rates = CurrencyRates::from_pairs([("EUR", 0.9)]);
        state.vehicle.currency = "EUR".into();

        let request = match state.submit() {
            Some(NetworkCommand::CreateVehiclePolicy { request, .. }) => request,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(request.user_id, "alice");
        assert_eq!(request.registration_number, "AB12CDE");
        assert_eq!(request.model, "Fiesta");
        assert_eq!(request.service_date, "Not Available");
        assert_eq!(request.insurance_type, "Standard");
        assert_eq!(request.price, Price::Text("90.00".into()));
    }

    #[test]
    fn test_saved_message_redirects_and_blocks_resubmit() {
        let mut state = quoted_state();
        let id = match state.submit() {
            Some(NetworkCommand::CreateVehiclePolicy { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };
        assert!(state.submit().is_none(), "submit while pending");

        state.handle_response(NetworkResponse::VehiclePolicyCreated {
            id,
            result: Ok(VehicleSubmitReply {
                status_code: Some(200),
                message: Some(VEHICLE_SAVED_MESSAGE.into()),
            }),
        });
        assert_eq!(state.vehicle.notice, Some(Notice::success(VEHICLE_SAVED_MESSAGE)));
        assert_eq!(state.redirect.map(|r| r.to), Some(View::VehiclePolicies));
        assert!(state.submit().is_none());
    }

    #[test]
    fn test_rejected_submit_keeps_data_for_retry() {
        let mut state = quoted_state();
        let id = match state.submit() {
            Some(NetworkCommand::CreateVehiclePolicy { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };
        state.handle_response(NetworkResponse::VehiclePolicyCreated {
            id,
            result: Ok(VehicleSubmitReply {
                status_code: Some(400),
                message: Some("Vehicle already insured".into()),
            }),
        });
        assert_eq!(state.vehicle.notice, Some(Notice::error("Vehicle already insured")));
        assert!(state.redirect.is_none());
        assert_eq!(state.vehicle.make.as_str(), "Ford");
        assert!(state.submit().is_some());
    }

    #[test]
    fn test_reply_without_message() {
        let mut state = quoted_state();
        let id = match state.submit() {
            Some(NetworkCommand::CreateVehiclePolicy { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };
        state.handle_response(NetworkResponse::VehiclePolicyCreated {
            id,
            result: Ok(VehicleSubmitReply {
                status_code: None,
                message: None,
            }),
        });
        assert_eq!(
            state.vehicle.notice,
            Some(Notice::error("Unexpected response from server"))
        );
    }

    #[test]
    fn test_submit_requires_user_id() {
        let mut state = quoted_state();
        state.session.user_id.clear();
        assert!(state.submit().is_none());
        assert_eq!(state.vehicle.notice, Some(Notice::error(NOT_LOGGED_IN)));
    }
}
