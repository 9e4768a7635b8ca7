//! Travel insurance purchase: trip lookup, tier, price, submit

use crate::app::forms::{Form, TextInput};
use crate::app::router::View;
use crate::app::state::{error_text, take_pending, AppState};
use crate::constants::{BASE_CURRENCY, NOT_LOGGED_IN};
use crate::error::ApiResult;
use crate::messages::NetworkCommand;
use crate::models::{convert_price, CurrencyRates, Notice, Price, TravelPolicyRequest, TravelQuote, TravelTier};

#[derive(Clone, Debug, PartialEq)]
pub struct TravelFormState {
    pub username: TextInput,
    pub trip_title: TextInput,
    pub quote: Option<TravelQuote>,

    pub tier: TravelTier,
    pub currency: String,
    pub rates: CurrencyRates,
    pub rates_error: Option<String>,

    pub focus: usize,
    pub notice: Option<Notice>,
    pub lookup_pending: Option<u64>,
    pub submit_pending: Option<u64>,
    pub rates_pending: Option<u64>,
    pub submitted: bool,
}

impl Default for TravelFormState {
    fn default() -> Self {
        TravelFormState {
            username: TextInput::new(),
            trip_title: TextInput::new(),
            quote: None,
            tier: TravelTier::default(),
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

impl TravelFormState {
    pub fn price(&self) -> Price {
        convert_price(self.tier.base_price(), &self.currency, &self.rates)
    }
}

impl Form for TravelFormState {
    fn focus_index(&mut self) -> &mut usize {
        &mut self.focus
    }

    // The lookup locks once a trip is found
    fn inputs_mut(&mut self) -> Vec<&mut TextInput> {
        if self.quote.is_some() {
            Vec::new()
        } else {
            vec![&mut self.username, &mut self.trip_title]
        }
    }
}

impl AppState {
    pub(crate) fn submit_travel(&mut self) -> Option<NetworkCommand> {
        match self.travel.quote.clone() {
            None => self.lookup_trip(),
            Some(quote) => self.submit_travel_policy(quote),
        }
    }

    fn lookup_trip(&mut self) -> Option<NetworkCommand> {
        let form = &mut self.travel;
        if form.lookup_pending.is_some() {
            return None;
        }
        if form.username.is_blank() || form.trip_title.is_blank() {
            form.notice = Some(Notice::error("Please enter both username and trip title."));
            return None;
        }

        form.notice = None;
        let username = form.username.as_str().trim().to_string();
        let trip_title = form.trip_title.as_str().trim().to_string();
        let id = self.next_id();
        self.travel.lookup_pending = Some(id);
        Some(NetworkCommand::LookupTrip {
            id,
            username,
            trip_title,
        })
    }

    fn submit_travel_policy(&mut self, quote: TravelQuote) -> Option<NetworkCommand> {
        if self.travel.submitted || self.travel.submit_pending.is_some() {
            return None;
        }
        let Some(user_id) = self.session.user_id().map(str::to_string) else {
            self.travel.notice = Some(Notice::error(NOT_LOGGED_IN));
            return None;
        };

        let request = TravelPolicyRequest {
            user_id,
            username: quote.username,
            trip_title: quote.trip_title,
            insurance_type: self.travel.tier.as_str().to_string(),
            price: self.travel.price(),
            start_date: quote.start_date,
            end_date: quote.end_date,
        };

        self.travel.notice = None;
        let id = self.next_id();
        self.travel.submit_pending = Some(id);
        Some(NetworkCommand::CreateTravelPolicy { id, request })
    }

    pub(crate) fn on_trip_found(&mut self, id: u64, result: ApiResult<Option<TravelQuote>>) {
        if self.view != View::TravelForm || !take_pending(&mut self.travel.lookup_pending, id) {
            return;
        }
        self.travel.notice = Some(match result {
            Ok(Some(quote)) => {
                tracing::info!(title = %quote.trip_title, "Trip found");
                self.travel.quote = Some(quote);
                self.travel.focus = 0;
                Notice::success("Trip found!")
            }
            Ok(None) => Notice::error("No matching trip found"),
            Err(e) => Notice::error(error_text(&e)),
        });
    }

    pub(crate) fn on_travel_policy_created(&mut self, id: u64, result: ApiResult<String>) {
        if self.view != View::TravelForm || !take_pending(&mut self.travel.submit_pending, id) {
            return;
        }
        match result {
            Ok(message) => {
                self.travel.submitted = true;
                self.travel.notice = Some(Notice::success(message));
                self.schedule_redirect(View::TravelPolicies);
            }
            Err(e) => self.travel.notice = Some(Notice::error(error_text(&e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TRAVEL_SAVED_MESSAGE;
    use crate::error::ApiError;
    use crate::messages::NetworkResponse;

    fn type_into(state: &mut AppState, text: &str) {
        state.start_editing();
        for c in text.chars() {
            state.enter_char(c);
        }
        state.stop_editing();
    }

    fn on_form() -> AppState {
        let mut state = AppState::ephemeral();
        state.start_session("A".into(), "I".into(), "u1".into());
        state.navigate(View::TravelForm);
        state
    }

    fn lookup_id(state: &mut AppState) -> u64 {
        type_into(state, "alice");
        state.next_field();
        type_into(state, "Paris");
        match state.submit() {
            Some(NetworkCommand::LookupTrip { id, username, trip_title }) => {
                assert_eq!((username.as_str(), trip_title.as_str()), ("alice", "Paris"));
                id
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn paris() -> TravelQuote {
        TravelQuote {
            username: "alice".into(),
            trip_title: "Paris".into(),
            start_date: "2025-06-01".into(),
            end_date: "2025-06-10".into(),
        }
    }

    #[test]
    fn test_lookup_requires_both_fields() {
        let mut state = on_form();
        type_into(&mut state, "alice");
        assert!(state.submit().is_none());
        assert!(state.travel.notice.as_ref().unwrap().is_error());
    }

    #[test]
    fn test_no_matching_trip() {
        let mut state = on_form();
        let id = lookup_id(&mut state);
        state.handle_response(NetworkResponse::TripFound { id, result: Ok(None) });
        assert_eq!(state.travel.notice, Some(Notice::error("No matching trip found")));
        assert!(state.travel.quote.is_none());
    }

    #[test]
    fn test_lookup_server_error() {
        let mut state = on_form();
        let id = lookup_id(&mut state);
        state.handle_response(NetworkResponse::TripFound {
            id,
            result: Err(ApiError::status(500, "Failed to fetch trip details")),
        });
        assert_eq!(
            state.travel.notice,
            Some(Notice::error("Failed to fetch trip details"))
        );
    }

    #[test]
    fn test_long_term_in_eur_submits_converted_price() {
        let mut state = on_form();
        let id = lookup_id(&mut state);
        state.handle_response(NetworkResponse::TripFound {
            id,
            result: Ok(Some(paris())),
        });
        assert_eq!(state.travel.notice, Some(Notice::success("Trip found!")));

        state.travel.rates = CurrencyRates::from_pairs([("EUR", 0.9), ("USD", 1.0)]);
        state.travel.currency = "EUR".into();
        assert_eq!(state.travel.price(), Price::Text("90.00".into()));
        state.cycle_tier();

        let (id, request) = match state.submit() {
            Some(NetworkCommand::CreateTravelPolicy { id, request }) => (id, request),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(request.user_id, "u1");
        assert_eq!(request.insurance_type, "Long Term");
        assert_eq!(request.price, Price::Text("180.00".into()));
        assert_eq!(request.start_date, "2025-06-01");

        state.handle_response(NetworkResponse::TravelPolicyCreated {
            id,
            result: Ok(TRAVEL_SAVED_MESSAGE.into()),
        });
        assert!(state.travel.submitted);
        assert_eq!(state.redirect.map(|r| r.to), Some(View::TravelPolicies));
        assert!(state.submit().is_none());
    }

    #[test]
    fn test_short_term_eur_price_is_ninety() {
        let mut state = on_form();
        let id = lookup_id(&mut state);
        state.handle_response(NetworkResponse::TripFound {
            id,
            result: Ok(Some(paris())),
        });
        state.travel.rates = CurrencyRates::from_pairs([("EUR", 0.9)]);
        state.travel.currency = "EUR".into();
        match state.submit() {
            Some(NetworkCommand::CreateTravelPolicy { request, .. }) => {
                assert_eq!(request.price, Price::Text("90.00".into()))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_failed_submit_allows_retry() {
        let mut state = on_form();
        let id = lookup_id(&mut state);
        state.handle_response(NetworkResponse::TripFound {
            id,
            result: Ok(Some(paris())),
        });
        let id = match state.submit() {
            Some(NetworkCommand::CreateTravelPolicy { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };
        state.handle_response(NetworkResponse::TravelPolicyCreated {
            id,
            result: Err(ApiError::status(500, "Failed to save travel insurance data.")),
        });
        assert!(!state.travel.submitted);
        assert!(state.redirect.is_none());
        assert!(state.submit().is_some());
    }
}
