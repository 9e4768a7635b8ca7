//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::router::View;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    Navigate(View),
    Logout,

    // Form focus and editing
    NextField,
    PrevField,
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    /// Enter: login, register, lookup or purchase depending on the view
    Submit,

    // Pricing
    CycleTier,
    NextCurrency,
    PrevCurrency,

    // Policy lists
    SelectNext,
    SelectPrev,
    ExportSelected,
    CancelSelected,
    ConfirmYes,
    ConfirmNo,
    Reload,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    view: View,
    input_mode: InputMode,
    show_help: bool,
    confirming: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    // Popups first
    if show_help {
        return Some(UiEvent::CloseHelp);
    }
    if confirming {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(UiEvent::ConfirmYes),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(UiEvent::ConfirmNo),
            _ => None,
        };
    }

    match input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::BackTab => Some(UiEvent::PrevField),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
        InputMode::Normal => normal_mode_event(key, view),
    }
}

fn normal_mode_event(key: KeyEvent, view: View) -> Option<UiEvent> {
    // Keys shared by every view
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        _ => {}
    }

    if view.is_protected() {
        match key.code {
            KeyCode::Char('1') => return Some(UiEvent::Navigate(View::Home)),
            KeyCode::Char('2') => return Some(UiEvent::Navigate(View::VehiclePolicies)),
            KeyCode::Char('3') => return Some(UiEvent::Navigate(View::TravelPolicies)),
            KeyCode::Char('l') => return Some(UiEvent::Logout),
            _ => {}
        }
    }

    match view {
        View::Home => match key.code {
            KeyCode::Char('v') => Some(UiEvent::Navigate(View::VehicleForm)),
            KeyCode::Char('t') => Some(UiEvent::Navigate(View::TravelForm)),
            _ => None,
        },
        View::Login => match key.code {
            KeyCode::Char('r') => Some(UiEvent::Navigate(View::Register)),
            KeyCode::Char('f') => Some(UiEvent::Navigate(View::ResetPassword)),
            _ => form_keys(key),
        },
        View::Register | View::ResetPassword => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => Some(UiEvent::Navigate(View::Login)),
            _ => form_keys(key),
        },
        View::VehicleForm | View::TravelForm => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => Some(UiEvent::Navigate(View::Home)),
            KeyCode::Char('p') => Some(UiEvent::CycleTier),
            KeyCode::Char(']') => Some(UiEvent::NextCurrency),
            KeyCode::Char('[') => Some(UiEvent::PrevCurrency),
            _ => form_keys(key),
        },
        View::VehiclePolicies | View::TravelPolicies => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => Some(UiEvent::Navigate(View::Home)),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
            KeyCode::Char('d') => Some(UiEvent::ExportSelected),
            KeyCode::Char('x') => Some(UiEvent::CancelSelected),
            KeyCode::Char('r') => Some(UiEvent::Reload),
            _ => None,
        },
    }
}

fn form_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Char('e') => Some(UiEvent::StartEditing),
        KeyCode::Enter => Some(UiEvent::Submit),
        _ => None,
    }
}
