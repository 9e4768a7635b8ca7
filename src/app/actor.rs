//! App actor - message loop processing UI events and network responses

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// How often scheduled redirects are checked
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop, starting at `initial_path`
    pub async fn run(
        mut self,
        initial_path: String,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let cmd = self.state.open_path(&initial_path);
        self.dispatch(cmd);
        self.render();

        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.render();
                }
                Some(response) = net_rx.recv() => {
                    if response.is_error() {
                        tracing::debug!(id = response.id(), "Request failed");
                    }
                    let cmd = self.state.handle_response(response);
                    self.dispatch(cmd);
                    self.render();
                }
                now = ticker.tick() => {
                    if self.state.redirect.is_some() {
                        let cmd = self.state.tick(now.into_std());
                        self.dispatch(cmd);
                        self.render();
                    }
                }
                else => break,
            }
        }
    }

    fn dispatch(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    fn render(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmd = match event {
            // Navigation
            UiEvent::Navigate(view) => self.state.navigate(view),
            UiEvent::Logout => self.state.logout(),

            // Input editing
            UiEvent::NextField => {
                self.state.next_field();
                None
            }
            UiEvent::PrevField => {
                self.state.prev_field();
                None
            }
            UiEvent::StartEditing => {
                self.state.start_editing();
                None
            }
            UiEvent::StopEditing => {
                self.state.stop_editing();
                None
            }
            UiEvent::CharInput(c) => {
                self.state.enter_char(c);
                None
            }
            UiEvent::Backspace => {
                self.state.delete_char();
                None
            }
            UiEvent::CursorLeft => {
                self.state.move_cursor_left();
                None
            }
            UiEvent::CursorRight => {
                self.state.move_cursor_right();
                None
            }
            UiEvent::Submit => self.state.submit(),

            // Pricing
            UiEvent::CycleTier => {
                self.state.cycle_tier();
                None
            }
            UiEvent::NextCurrency => {
                self.state.next_currency();
                None
            }
            UiEvent::PrevCurrency => {
                self.state.prev_currency();
                None
            }

            // Policy lists
            UiEvent::SelectNext => {
                self.state.select_next();
                None
            }
            UiEvent::SelectPrev => {
                self.state.select_prev();
                None
            }
            UiEvent::ExportSelected => {
                self.state.export_selected();
                None
            }
            UiEvent::CancelSelected => {
                self.state.request_cancel();
                None
            }
            UiEvent::ConfirmYes => self.state.confirm_cancel(),
            UiEvent::ConfirmNo => {
                self.state.decline_cancel();
                None
            }
            UiEvent::Reload => self.state.reload(),

            // Popups
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                None
            }
            UiEvent::CloseHelp => {
                self.state.close_help();
                None
            }

            // System
            UiEvent::Quit => return true,
        };

        self.dispatch(cmd);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::router::View;

    #[tokio::test]
    async fn test_actor_starts_on_guarded_route_and_quits() {
        let (network_tx, mut network_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_net_tx, net_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(AppState::ephemeral(), network_tx, render_tx);
        let handle = tokio::spawn(actor.run("/travelform".to_string(), ui_rx, net_rx));

        let first = render_rx.recv().await.unwrap();
        assert_eq!(first.view, View::Login);

        ui_tx.send(UiEvent::Navigate(View::Register)).unwrap();
        let next = render_rx.recv().await.unwrap();
        assert_eq!(next.view, View::Register);

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
        assert!(matches!(network_rx.recv().await, Some(NetworkCommand::Shutdown)));
    }
}
