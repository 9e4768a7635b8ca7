//! Login, registration and password reset

use crate::app::forms::{Form, TextInput};
use crate::app::router::View;
use crate::app::state::{error_text, take_pending, AppState};
use crate::error::{ApiError, ApiResult};
use crate::messages::NetworkCommand;
use crate::models::{AuthTokens, Notice, Registration};

#[derive(Clone, Debug, PartialEq)]
pub struct LoginForm {
    pub username: TextInput,
    pub password: TextInput,
    pub focus: usize,
    pub notice: Option<Notice>,
    pub pending: Option<u64>,
    /// Username sent with the in-flight request; the service does not echo it back
    pub submitted_username: String,
}

impl Default for LoginForm {
    fn default() -> Self {
        LoginForm {
            username: TextInput::new(),
            password: TextInput::masked(),
            focus: 0,
            notice: None,
            pending: None,
            submitted_username: String::new(),
        }
    }
}

impl Form for LoginForm {
    fn focus_index(&mut self) -> &mut usize {
        &mut self.focus
    }

    fn inputs_mut(&mut self) -> Vec<&mut TextInput> {
        vec![&mut self.username, &mut self.password]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RegisterForm {
    pub username: TextInput,
    pub email: TextInput,
    pub password: TextInput,
    pub focus: usize,
    pub notice: Option<Notice>,
    pub pending: Option<u64>,
}

impl Default for RegisterForm {
    fn default() -> Self {
        RegisterForm {
            username: TextInput::new(),
            email: TextInput::new(),
            password: TextInput::masked(),
            focus: 0,
            notice: None,
            pending: None,
        }
    }
}

impl Form for RegisterForm {
    fn focus_index(&mut self) -> &mut usize {
        &mut self.focus
    }

    fn inputs_mut(&mut self) -> Vec<&mut TextInput> {
        vec![&mut self.username, &mut self.email, &mut self.password]
    }
}

/// Password reset progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetPhase {
    #[default]
    AwaitingEmail,
    AwaitingOtpAndPassword,
    Done,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResetPasswordForm {
    pub phase: ResetPhase,
    pub email: TextInput,
    pub otp: TextInput,
    pub new_password: TextInput,
    pub focus: usize,
    pub notice: Option<Notice>,
    pub pending: Option<u64>,
}

impl Default for ResetPasswordForm {
    fn default() -> Self {
        ResetPasswordForm {
            phase: ResetPhase::AwaitingEmail,
            email: TextInput::new(),
            otp: TextInput::new(),
            new_password: TextInput::masked(),
            focus: 0,
            notice: None,
            pending: None,
        }
    }
}

impl Form for ResetPasswordForm {
    fn focus_index(&mut self) -> &mut usize {
        &mut self.focus
    }

    fn inputs_mut(&mut self) -> Vec<&mut TextInput> {
        match self.phase {
            ResetPhase::AwaitingEmail => vec![&mut self.email],
            ResetPhase::AwaitingOtpAndPassword => vec![&mut self.otp, &mut self.new_password],
            ResetPhase::Done => Vec::new(),
        }
    }
}

impl AppState {
    pub(crate) fn submit_login(&mut self) -> Option<NetworkCommand> {
        if self.login.pending.is_some() {
            return None;
        }
        if self.login.username.is_blank() || self.login.password.as_str().is_empty() {
            self.login.notice = Some(Notice::error("Please enter your username and password."));
            return None;
        }

        self.login.notice = None;
        let id = self.next_id();
        self.login.pending = Some(id);
        self.login.submitted_username = self.login.username.as_str().trim().to_string();
        Some(NetworkCommand::Login {
            id,
            username: self.login.submitted_username.clone(),
            password: self.login.password.as_str().to_string(),
        })
    }

    pub(crate) fn on_logged_in(
        &mut self,
        id: u64,
        result: ApiResult<AuthTokens>,
    ) -> Option<NetworkCommand> {
        if self.view != View::Login || !take_pending(&mut self.login.pending, id) {
            return None;
        }
        match result {
            Ok(tokens) => {
                let username = std::mem::take(&mut self.login.submitted_username);
                tracing::info!(user = %username, "Logged in");
                self.start_session(tokens.access_token, tokens.id_token, username);
                self.navigate(View::Home)
            }
            Err(e) => {
                let text = match &e {
                    ApiError::Status { message, .. } => message.clone(),
                    ApiError::Transport(reason) => format!("Login failed: {}", reason),
                    other => format!("Login failed: {}", other),
                };
                self.login.notice = Some(Notice::error(text));
                None
            }
        }
    }

    pub(crate) fn submit_registration(&mut self) -> Option<NetworkCommand> {
        let form = &mut self.register;
        if form.pending.is_some() {
            return None;
        }
        if form.username.is_blank() || form.email.is_blank() || form.password.as_str().is_empty() {
            form.notice = Some(Notice::error("Please fill in all fields."));
            return None;
        }

        form.notice = None;
        let registration = Registration {
            username: form.username.as_str().trim().to_string(),
            email: form.email.as_str().trim().to_string(),
            password: form.password.as_str().to_string(),
        };
        let id = self.next_id();
        self.register.pending = Some(id);
        Some(NetworkCommand::Register { id, registration })
    }

    pub(crate) fn on_registered(&mut self, id: u64, result: ApiResult<String>) {
        if self.view != View::Register || !take_pending(&mut self.register.pending, id) {
            return;
        }
        self.register.notice = Some(match result {
            Ok(message) => Notice::success(message),
            Err(e) => Notice::error(error_text(&e)),
        });
    }

    pub(crate) fn submit_reset(&mut self) -> Option<NetworkCommand> {
        if self.reset.pending.is_some() {
            return None;
        }
        match self.reset.phase {
            ResetPhase::AwaitingEmail => {
                if self.reset.email.is_blank() {
                    self.reset.notice = Some(Notice::error("Please enter a valid email."));
                    return None;
                }
                self.reset.notice = None;
                let id = self.next_id();
                self.reset.pending = Some(id);
                Some(NetworkCommand::ForgotPassword {
                    id,
                    email: self.reset.email.as_str().trim().to_string(),
                })
            }
            ResetPhase::AwaitingOtpAndPassword => {
                if self.reset.otp.is_blank() || self.reset.new_password.is_blank() {
                    self.reset.notice = Some(Notice::error("Please fill in all fields."));
                    return None;
                }
                self.reset.notice = None;
                let id = self.next_id();
                self.reset.pending = Some(id);
                Some(NetworkCommand::ResetPassword {
                    id,
                    email: self.reset.email.as_str().trim().to_string(),
                    otp: self.reset.otp.as_str().trim().to_string(),
                    new_password: self.reset.new_password.as_str().to_string(),
                })
            }
            ResetPhase::Done => None,
        }
    }

    pub(crate) fn on_otp_sent(&mut self, id: u64, result: ApiResult<String>) {
        if self.view != View::ResetPassword || !take_pending(&mut self.reset.pending, id) {
            return;
        }
        match result {
            Ok(_) => {
                self.reset.phase = ResetPhase::AwaitingOtpAndPassword;
                self.reset.focus = 0;
                self.reset.notice = Some(Notice::success(
                    "OTP sent to your email. Enter it below to reset your password.",
                ));
            }
            Err(e) => self.reset.notice = Some(Notice::error(error_text(&e))),
        }
    }

    pub(crate) fn on_password_reset(&mut self, id: u64, result: ApiResult<String>) {
        if self.view != View::ResetPassword || !take_pending(&mut self.reset.pending, id) {
            return;
        }
        match result {
            Ok(_) => {
                self.reset.phase = ResetPhase::Done;
                self.reset.focus = 0;
                self.reset.notice = Some(Notice::success(
                    "Password reset successfully. You can now log in with your new password.",
                ));
            }
            Err(e) => self.reset.notice = Some(Notice::error(error_text(&e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::NetworkResponse;

    fn type_into(state: &mut AppState, text: &str) {
        state.start_editing();
        for c in text.chars() {
            state.enter_char(c);
        }
        state.stop_editing();
    }

    fn fill_login(state: &mut AppState, username: &str, password: &str) {
        type_into(state, username);
        state.next_field();
        type_into(state, password);
    }

    #[test]
    fn test_login_scenario_alice() {
        let mut state = AppState::ephemeral();
        state.navigate(View::Login);
        fill_login(&mut state, "alice", "pw1");

        let id = match state.submit() {
            Some(NetworkCommand::Login { id, username, password }) => {
                assert_eq!((username.as_str(), password.as_str()), ("alice", "pw1"));
                id
            }
            other => panic!("expected login, got {other:?}"),
        };

        state.handle_response(NetworkResponse::LoggedIn {
            id,
            result: Ok(AuthTokens {
                access_token: "A".into(),
                id_token: "I".into(),
            }),
        });

        assert_eq!(state.session.access_token, "A");
        assert_eq!(state.session.id_token, "I");
        assert_eq!(state.session.user_id, "alice");
        assert_eq!(state.view, View::Home);
    }

    #[test]
    fn test_login_failure_keeps_session_empty() {
        let mut state = AppState::ephemeral();
        state.navigate(View::Login);
        fill_login(&mut state, "alice", "bad");
        let id = match state.submit() {
            Some(NetworkCommand::Login { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };

        state.handle_response(NetworkResponse::LoggedIn {
            id,
            result: Err(ApiError::status(400, "Invalid credentials.")),
        });
        assert!(!state.is_authenticated());
        assert_eq!(state.view, View::Login);
        assert_eq!(state.login.notice, Some(Notice::error("Invalid credentials.")));

        // A retry is allowed after failure
        assert!(state.submit().is_some());
    }

    #[test]
    fn test_login_transport_failure_message() {
        let mut state = AppState::ephemeral();
        state.navigate(View::Login);
        fill_login(&mut state, "alice", "pw1");
        let id = match state.submit() {
            Some(NetworkCommand::Login { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };
        state.handle_response(NetworkResponse::LoggedIn {
            id,
            result: Err(ApiError::Transport("Connection failed: refused".into())),
        });
        assert_eq!(
            state.login.notice.as_ref().map(|n| n.text.as_str()),
            Some("Login failed: Connection failed: refused")
        );
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut state = AppState::ephemeral();
        state.navigate(View::Login);
        type_into(&mut state, "alice");
        assert!(state.submit().is_none());
        assert!(state.login.notice.as_ref().unwrap().is_error());
    }

    #[test]
    fn test_stale_login_response_is_ignored() {
        let mut state = AppState::ephemeral();
        state.navigate(View::Login);
        fill_login(&mut state, "alice", "pw1");
        let id = match state.submit() {
            Some(NetworkCommand::Login { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };
        state.navigate(View::Register);

        state.handle_response(NetworkResponse::LoggedIn {
            id,
            result: Ok(AuthTokens {
                access_token: "A".into(),
                id_token: "I".into(),
            }),
        });
        assert!(!state.is_authenticated());
        assert_eq!(state.view, View::Register);
    }

    #[test]
    fn test_registration_reports_result() {
        let mut state = AppState::ephemeral();
        state.navigate(View::Register);
        assert!(state.submit().is_none());

        type_into(&mut state, "bob");
        state.next_field();
        type_into(&mut state, "bob@example.com");
        state.next_field();
        type_into(&mut state, "Secret1!");

        let (id, registration) = match state.submit() {
            Some(NetworkCommand::Register { id, registration }) => (id, registration),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(registration.email, "bob@example.com");

        state.handle_response(NetworkResponse::Registered {
            id,
            result: Err(ApiError::status(400, "User already exists.")),
        });
        assert_eq!(state.register.notice, Some(Notice::error("User already exists.")));
    }

    #[test]
    fn test_reset_password_two_phases() {
        let mut state = AppState::ephemeral();
        state.navigate(View::ResetPassword);

        assert!(state.submit().is_none());
        assert_eq!(
            state.reset.notice,
            Some(Notice::error("Please enter a valid email."))
        );

        type_into(&mut state, "alice@example.com");
        let id = match state.submit() {
            Some(NetworkCommand::ForgotPassword { id, email }) => {
                assert_eq!(email, "alice@example.com");
                id
            }
            other => panic!("unexpected {other:?}"),
        };

        // Failure keeps the phase
        state.handle_response(NetworkResponse::OtpSent {
            id,
            result: Err(ApiError::status(400, "User not found.")),
        });
        assert_eq!(state.reset.phase, ResetPhase::AwaitingEmail);

        let id = match state.submit() {
            Some(NetworkCommand::ForgotPassword { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };
        state.handle_response(NetworkResponse::OtpSent {
            id,
            result: Ok("Password reset instructions sent.".into()),
        });
        assert_eq!(state.reset.phase, ResetPhase::AwaitingOtpAndPassword);

        assert!(state.submit().is_none());
        type_into(&mut state, "123456");
        state.next_field();
        type_into(&mut state, "NewPass1!");

        let id = match state.submit() {
            Some(NetworkCommand::ResetPassword { id, email, otp, new_password }) => {
                assert_eq!((email.as_str(), otp.as_str(), new_password.as_str()),
                    ("alice@example.com", "123456", "NewPass1!"));
                id
            }
            other => panic!("unexpected {other:?}"),
        };

        state.handle_response(NetworkResponse::PasswordReset {
            id,
            result: Err(ApiError::status(400, "Invalid OTP code.")),
        });
        assert_eq!(state.reset.phase, ResetPhase::AwaitingOtpAndPassword);
        assert_eq!(state.reset.notice, Some(Notice::error("Invalid OTP code.")));

        let id = match state.submit() {
            Some(NetworkCommand::ResetPassword { id, .. }) => id,
            other => panic!("unexpected {other:?}"),
        };
        state.handle_response(NetworkResponse::PasswordReset {
            id,
            result: Ok("Password reset successfully.".into()),
        });
        assert_eq!(state.reset.phase, ResetPhase::Done);
        assert!(state.submit().is_none());
    }
}
