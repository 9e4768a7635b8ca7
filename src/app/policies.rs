//! Policy listings: load, select, export, cancel

use chrono::Utc;

use crate::app::router::View;
use crate::app::state::{error_text, take_pending, AppState};
use crate::constants::{CANCEL_CONFIRM_PROMPT, LIST_NOT_LOGGED_IN};
use crate::error::ApiResult;
use crate::export;
use crate::messages::NetworkCommand;
use crate::models::{Notice, PolicyRecord};

/// One listing view's state
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyList<P> {
    pub policies: Vec<P>,
    pub selected: usize,
    pub loading: bool,
    /// View-level failure; no list is shown
    pub load_error: Option<String>,
    /// Row action outcome
    pub notice: Option<Notice>,
    /// Insurance id awaiting a yes/no
    pub confirm: Option<String>,
    pub load_pending: Option<u64>,
    pub delete_pending: Option<(u64, String)>,
}

impl<P> Default for PolicyList<P> {
    fn default() -> Self {
        PolicyList {
            policies: Vec::new(),
            selected: 0,
            loading: false,
            load_error: None,
            notice: None,
            confirm: None,
            load_pending: None,
            delete_pending: None,
        }
    }
}

impl<P: PolicyRecord> PolicyList<P> {
    pub fn selected_policy(&self) -> Option<&P> {
        self.policies.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.policies.is_empty() {
            self.selected = (self.selected + 1) % self.policies.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.policies.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.policies.len() - 1);
        }
    }

    fn begin_load(&mut self, id: u64) {
        self.loading = true;
        self.load_error = None;
        self.load_pending = Some(id);
    }

    pub fn finish_load(&mut self, id: u64, result: ApiResult<Vec<P>>) {
        if !take_pending(&mut self.load_pending, id) {
            return;
        }
        self.loading = false;
        match result {
            Ok(policies) => {
                tracing::debug!(count = policies.len(), "Policies loaded");
                self.policies = policies;
                self.selected = self.selected.min(self.policies.len().saturating_sub(1));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load policies");
                self.policies.clear();
                self.selected = 0;
                self.load_error = Some(error_text(&e));
            }
        }
    }

    /// Ask for confirmation before cancelling the selected row
    fn request_cancel(&mut self) {
        if self.delete_pending.is_some() {
            return;
        }
        if let Some(policy) = self.selected_policy() {
            self.confirm = Some(policy.insurance_id().to_string());
        }
    }

    pub fn finish_delete(&mut self, id: u64, insurance_id: &str, result: ApiResult<()>) {
        match &self.delete_pending {
            Some((pending, _)) if *pending == id => self.delete_pending = None,
            _ => {
                tracing::debug!(id, "Dropping stale response");
                return;
            }
        }
        match result {
            Ok(()) => {
                tracing::info!(insurance_id, "Policy cancelled");
                self.policies.retain(|p| p.insurance_id() != insurance_id);
                self.selected = self.selected.min(self.policies.len().saturating_sub(1));
                self.notice = Some(Notice::success("Policy cancelled."));
            }
            Err(e) => self.notice = Some(Notice::error(error_text(&e))),
        }
    }
}

impl AppState {
    pub(crate) fn load_vehicle_policies(&mut self) -> Option<NetworkCommand> {
        let Some(user_id) = self.session.user_id().map(str::to_string) else {
            self.vehicle_policies.load_error = Some(LIST_NOT_LOGGED_IN.to_string());
            return None;
        };
        let id = self.next_id();
        self.vehicle_policies.begin_load(id);
        Some(NetworkCommand::ListVehiclePolicies { id, user_id })
    }

    pub(crate) fn load_travel_policies(&mut self) -> Option<NetworkCommand> {
        let Some(user_id) = self.session.user_id().map(str::to_string) else {
            self.travel_policies.load_error = Some(LIST_NOT_LOGGED_IN.to_string());
            return None;
        };
        let id = self.next_id();
        self.travel_policies.begin_load(id);
        Some(NetworkCommand::ListTravelPolicies { id, user_id })
    }

    /// Fetch the current listing again
    pub fn reload(&mut self) -> Option<NetworkCommand> {
        match self.view {
            View::VehiclePolicies => self.load_vehicle_policies(),
            View::TravelPolicies => self.load_travel_policies(),
            _ => None,
        }
    }

    pub fn select_next(&mut self) {
        match self.view {
            View::VehiclePolicies => self.vehicle_policies.select_next(),
            View::TravelPolicies => self.travel_policies.select_next(),
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.view {
            View::VehiclePolicies => self.vehicle_policies.select_prev(),
            View::TravelPolicies => self.travel_policies.select_prev(),
            _ => {}
        }
    }

    pub fn request_cancel(&mut self) {
        match self.view {
            View::VehiclePolicies => self.vehicle_policies.request_cancel(),
            View::TravelPolicies => self.travel_policies.request_cancel(),
            _ => {}
        }
    }

    /// Prompt text while a cancel awaits confirmation
    pub fn confirm_prompt(&self) -> Option<&'static str> {
        let pending = match self.view {
            View::VehiclePolicies => self.vehicle_policies.confirm.is_some(),
            View::TravelPolicies => self.travel_policies.confirm.is_some(),
            _ => false,
        };
        pending.then_some(CANCEL_CONFIRM_PROMPT)
    }

    pub fn decline_cancel(&mut self) {
        self.vehicle_policies.confirm = None;
        self.travel_policies.confirm = None;
    }

    /// Send the delete for the confirmed row
    pub fn confirm_cancel(&mut self) -> Option<NetworkCommand> {
        let insurance_id = match self.view {
            View::VehiclePolicies => self.vehicle_policies.confirm.take(),
            View::TravelPolicies => self.travel_policies.confirm.take(),
            _ => None,
        }?;
        let Some(user_id) = self.session.user_id().map(str::to_string) else {
            let notice = Some(Notice::error(LIST_NOT_LOGGED_IN));
            match self.view {
                View::VehiclePolicies => self.vehicle_policies.notice = notice,
                _ => self.travel_policies.notice = notice,
            }
            return None;
        };

        let id = self.next_id();
        if self.view == View::VehiclePolicies {
            self.vehicle_policies.delete_pending = Some((id, insurance_id.clone()));
            Some(NetworkCommand::DeleteVehiclePolicy {
                id,
                user_id,
                insurance_id,
            })
        } else {
            self.travel_policies.delete_pending = Some((id, insurance_id.clone()));
            Some(NetworkCommand::DeleteTravelPolicy {
                id,
                user_id,
                insurance_id,
            })
        }
    }

    /// Write the selected policy to the export directory
    pub fn export_selected(&mut self) {
        let user_id = self.session.user_id().unwrap_or_default().to_string();
        let written = match self.view {
            View::VehiclePolicies => self.vehicle_policies.selected_policy().map(|policy| {
                let content = export::vehicle_policy_document(&user_id, policy, Utc::now());
                export::write_export(
                    &self.export_dir,
                    &export::vehicle_policy_filename(policy),
                    &content,
                )
            }),
            View::TravelPolicies => self.travel_policies.selected_policy().map(|policy| {
                export::travel_policy_csv(policy).and_then(|content| {
                    export::write_export(
                        &self.export_dir,
                        &export::travel_policy_filename(policy),
                        &content,
                    )
                })
            }),
            _ => None,
        };

        let notice = match written {
            None => return,
            Some(Ok(path)) => {
                tracing::info!(path = %path.display(), "Policy exported");
                Notice::success(format!("Saved to {}", path.display()))
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Export failed");
                Notice::error(format!("Export failed: {}", e))
            }
        };
        match self.view {
            View::VehiclePolicies => self.vehicle_policies.notice = Some(notice),
            _ => self.travel_policies.notice = Some(notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ApiError;
    use crate::messages::NetworkResponse;
    use crate::models::{Price, TravelPolicy, VehiclePolicy};
    use crate::storage::SessionStore;

    fn vehicle(id: &str) -> VehiclePolicy {
        VehiclePolicy {
            insurance_id: id.into(),
            registration_number: "AB12CDE".into(),
            make: "Ford".into(),
            model: "Focus".into(),
            insurance_type: "Premium".into(),
            price: Price::Text("180.00".into()),
            expiry_date: "2026-01-01".into(),
        }
    }

    fn logged_in(dir: &std::path::Path) -> AppState {
        let mut state = AppState::new(
            &Config::default(),
            SessionStore::in_memory(),
            dir.to_path_buf(),
        );
        state.start_session("A".into(), "I".into(), "alice".into());
        state
    }

    fn load_id(cmd: Option<NetworkCommand>) -> u64 {
        match cmd {
            Some(NetworkCommand::ListVehiclePolicies { id, .. })
            | Some(NetworkCommand::ListTravelPolicies { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_listing_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(dir.path());
        let id = load_id(state.navigate(View::TravelPolicies));
        assert!(state.travel_policies.loading);

        state.handle_response(NetworkResponse::TravelPolicies { id, result: Ok(Vec::new()) });
        assert!(!state.travel_policies.loading);
        assert!(state.travel_policies.policies.is_empty());
        assert!(state.travel_policies.load_error.is_none());
    }

    #[test]
    fn test_load_failure_is_view_level() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(dir.path());
        let id = load_id(state.navigate(View::VehiclePolicies));
        state.handle_response(NetworkResponse::VehiclePolicies {
            id,
            result: Err(ApiError::status(500, "Failed to fetch policies")),
        });
        assert_eq!(
            state.vehicle_policies.load_error.as_deref(),
            Some("Failed to fetch policies")
        );
    }

    #[test]
    fn test_listing_without_user_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(dir.path());
        state.session.user_id.clear();
        assert!(state.navigate(View::VehiclePolicies).is_none());
        assert_eq!(
            state.vehicle_policies.load_error.as_deref(),
            Some(LIST_NOT_LOGGED_IN)
        );
    }

    #[test]
    fn test_cancel_removes_row_only_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(dir.path());
        let id = load_id(state.navigate(View::VehiclePolicies));
        state.handle_response(NetworkResponse::VehiclePolicies {
            id,
            result: Ok(vec![vehicle("p1"), vehicle("p2")]),
        });

        state.select_next();
        state.request_cancel();
        assert_eq!(state.confirm_prompt(), Some(CANCEL_CONFIRM_PROMPT));

        let (id, insurance_id) = match state.confirm_cancel() {
            Some(NetworkCommand::DeleteVehiclePolicy { id, user_id, insurance_id }) => {
                assert_eq!(user_id, "alice");
                (id, insurance_id)
            }
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(insurance_id, "p2");
        assert_eq!(state.vehicle_policies.policies.len(), 2);

        state.handle_response(NetworkResponse::VehiclePolicyDeleted {
            id,
            insurance_id,
            result: Ok(()),
        });
        let ids: Vec<_> = state
            .vehicle_policies
            .policies
            .iter()
            .map(|p| p.insurance_id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1"]);
        assert_eq!(state.vehicle_policies.selected, 0);
    }

    #[test]
    fn test_failed_cancel_keeps_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(dir.path());
        let id = load_id(state.navigate(View::TravelPolicies));
        let policy = TravelPolicy {
            insurance_id: "t1".into(),
            insurance_type: "Short Term".into(),
            start_date: "2025-06-01".into(),
            end_date: "2025-06-10".into(),
            price: Price::Text("90.00".into()),
            ..Default::default()
        };
        state.handle_response(NetworkResponse::TravelPolicies { id, result: Ok(vec![policy]) });

        state.request_cancel();
        let id = match state.confirm_cancel() {
            Some(NetworkCommand::DeleteTravelPolicy { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };
        state.handle_response(NetworkResponse::TravelPolicyDeleted {
            id,
            insurance_id: "t1".into(),
            result: Err(ApiError::status(500, "Failed to delete policy.")),
        });
        assert_eq!(state.travel_policies.policies.len(), 1);
        assert_eq!(
            state.travel_policies.notice,
            Some(Notice::error("Failed to delete policy."))
        );
    }

    #[test]
    fn test_declined_cancel_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(dir.path());
        let id = load_id(state.navigate(View::VehiclePolicies));
        state.handle_response(NetworkResponse::VehiclePolicies { id, result: Ok(vec![vehicle("p1")]) });
        state.request_cancel();
        state.decline_cancel();
        assert!(state.confirm_prompt().is_none());
        assert!(state.confirm_cancel().is_none());
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(dir.path());
        let id = load_id(state.navigate(View::VehiclePolicies));
        state.handle_response(NetworkResponse::VehiclePolicies { id, result: Ok(vec![vehicle("p1")]) });

        state.export_selected();
        let path = state.export_dir.join("Policy_p1.txt");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Insurance Policy Details"));
        assert!(content.contains("alice"));
        assert!(!state.vehicle_policies.notice.as_ref().unwrap().is_error());
    }

    #[test]
    fn test_export_stays_inside_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = logged_in(dir.path());
        let exports = state.export_dir.clone();
        let id = load_id(state.navigate(View::TravelPolicies));
        let policy = TravelPolicy {
            insurance_id: "../escaped".into(),
            insurance_type: "Long Term, Family".into(),
            price: Price::base(200),
            ..Default::default()
        };
        state.handle_response(NetworkResponse::TravelPolicies { id, result: Ok(vec![policy]) });

        state.export_selected();
        let path = exports.join("___escaped_policy.csv");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Long Term, Family\""));
        assert!(!dir.path().join("escaped_policy.csv").exists());
        assert!(!state.travel_policies.notice.as_ref().unwrap().is_error());
    }
}
