//! SafeInsure TUI - Actor-based insurance client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async calls to the insurance services

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use safeinsure_tui::app::auth::ResetPhase;
use safeinsure_tui::app::forms::TextInput;
use safeinsure_tui::app::{AppActor, AppState, View};
use safeinsure_tui::config::{default_data_dir, Config};
use safeinsure_tui::constants::{APP_NAME, APP_VERSION, CONFIG_FILE, LOG_FILE};
use safeinsure_tui::messages::ui_events::{key_to_ui_event, InputMode};
use safeinsure_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use safeinsure_tui::models::{TravelTier, VehicleTier};
use safeinsure_tui::network::NetworkActor;
use safeinsure_tui::storage::SessionStore;
use safeinsure_tui::ui::{
    centered_rect, choice_line, notice_line, render_input, render_readonly, render_tabs,
};

#[derive(Parser, Debug)]
#[command(name = "safeinsure", version, about = "Buy and manage vehicle and travel insurance")]
struct Cli {
    /// Directory for the session file, config, log and exports
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to config.yaml in the data directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Route to open first, e.g. /policies
    #[arg(long, default_value = "/home")]
    route: String,
}

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(&data_dir, LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config_path = cli.config.unwrap_or_else(|| data_dir.join(CONFIG_FILE));
    let config = Config::load(&config_path)?;
    tracing::info!(version = APP_VERSION, data_dir = %data_dir.display(), "Starting");

    let state = AppState::new(&config, SessionStore::new(&data_dir), data_dir.clone());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(&config, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(cli.route, ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.view,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.confirm_prompt.is_some(),
                ) {
                    let quit = event == UiEvent::Quit;
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Nav bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_nav_bar(f, state, main_chunks[0]);

    match state.view {
        View::Login => draw_login(f, state, main_chunks[1]),
        View::Register => draw_register(f, state, main_chunks[1]),
        View::ResetPassword => draw_reset(f, state, main_chunks[1]),
        View::Home => draw_home(f, state, main_chunks[1]),
        View::VehicleForm => draw_vehicle_form(f, state, main_chunks[1]),
        View::TravelForm => draw_travel_form(f, state, main_chunks[1]),
        View::VehiclePolicies => draw_vehicle_policies(f, state, main_chunks[1]),
        View::TravelPolicies => draw_travel_policies(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    if let Some(prompt) = state.confirm_prompt {
        draw_confirm_popup(f, prompt, area);
    }
    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_nav_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(APP_NAME.len() as u16 + 3),
            Constraint::Min(0),
            Constraint::Length(24),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(format!(" {} ", APP_NAME))
            .style(Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        chunks[0],
    );

    if state.authenticated {
        let selected = match state.view {
            View::VehiclePolicies => 1,
            View::TravelPolicies => 2,
            _ => 0,
        };
        let tabs = render_tabs(&[" 1:Home ", " 2:Vehicle Policies ", " 3:Travel Policies "], selected);
        f.render_widget(tabs, chunks[1]);

        let user = state.user_id.as_deref().unwrap_or("-");
        f.render_widget(
            Paragraph::new(format!("{} | l:logout ", user))
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Right),
            chunks[2],
        );
    } else {
        f.render_widget(
            Paragraph::new(format!(" {} ", state.view.title()))
                .style(Style::default().fg(Color::Gray)),
            chunks[1],
        );
    }
}

/// Draw a column of inputs and place the cursor in the focused one while editing
fn draw_inputs(f: &mut Frame, area: Rect, fields: &[(&str, &TextInput)], focus: usize, mode: InputMode) {
    let constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let editing = mode == InputMode::Editing;
    for (i, (title, input)) in fields.iter().enumerate() {
        let focused = i == focus;
        f.render_widget(render_input(input, title, focused, editing), rows[i]);
        if focused && editing {
            let col = input.cursor_column();
            f.set_cursor_position(Position::new(rows[i].x + 1 + col as u16, rows[i].y + 1));
        }
    }
}

/// Centered panel with a border and title
fn panel(f: &mut Frame, area: Rect, title: &str, width: u16, height: u16) -> Rect {
    let rect = centered_rect(width, height, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title));
    let inner = block.inner(rect);
    f.render_widget(Clear, rect);
    f.render_widget(block, rect);
    inner
}

fn draw_login(f: &mut Frame, state: &RenderState, area: Rect) {
    let inner = panel(f, area, "Login", 50, 60);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let form = &state.login;
    draw_inputs(
        f,
        chunks[0],
        &[("Username", &form.username), ("Password", &form.password)],
        form.focus,
        state.input_mode,
    );

    let status = if form.pending.is_some() {
        Line::from("Logging in...")
    } else {
        notice_line(form.notice.as_ref())
    };
    f.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), chunks[1]);
    f.render_widget(
        Paragraph::new("Enter: log in | r: register | f: forgot password")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn draw_register(f: &mut Frame, state: &RenderState, area: Rect) {
    let inner = panel(f, area, "Register", 50, 70);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let form = &state.register;
    draw_inputs(
        f,
        chunks[0],
        &[
            ("Username", &form.username),
            ("Email", &form.email),
            ("Password", &form.password),
        ],
        form.focus,
        state.input_mode,
    );
    f.render_widget(
        Paragraph::new(notice_line(form.notice.as_ref())).wrap(Wrap { trim: true }),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new("Enter: register | b: back to login")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn draw_reset(f: &mut Frame, state: &RenderState, area: Rect) {
    let inner = panel(f, area, "Reset Password", 60, 60);
    let form = &state.reset;

    let (fields, hint): (Vec<(&str, &TextInput)>, &str) = match form.phase {
        ResetPhase::AwaitingEmail => (vec![("Email", &form.email)], "Enter: send OTP | b: back"),
        ResetPhase::AwaitingOtpAndPassword => (
            vec![("OTP", &form.otp), ("New Password", &form.new_password)],
            "Enter: reset password | b: back",
        ),
        ResetPhase::Done => (Vec::new(), "b: back to login"),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    draw_inputs(f, chunks[0], &fields, form.focus, state.input_mode);
    f.render_widget(
        Paragraph::new(notice_line(form.notice.as_ref())).wrap(Wrap { trim: true }),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn draw_home(f: &mut Frame, state: &RenderState, area: Rect) {
    let inner = panel(f, area, "Home", 60, 50);
    let user = state.user_id.as_deref().unwrap_or("");
    let text = vec![
        Line::from(format!("Welcome, {}", user)).bold(),
        Line::default(),
        Line::from(vec![
            Span::styled(" v ", Style::default().fg(Color::Black).bg(Color::Yellow)),
            Span::raw("  Vehicle insurance"),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled(" t ", Style::default().fg(Color::Black).bg(Color::Yellow)),
            Span::raw("  Travel insurance"),
        ]),
        Line::default(),
        Line::from("2: vehicle policies | 3: travel policies").fg(Color::DarkGray),
    ];
    f.render_widget(Paragraph::new(text), inner);
}

/// Tier, currency and price lines shared by both purchase forms
fn pricing_lines<'a>(
    tier_line: Line<'a>,
    currency: &str,
    price: String,
    rates_error: Option<&str>,
) -> Vec<Line<'a>> {
    let mut lines = vec![
        tier_line,
        Line::from(vec![
            Span::styled("Currency: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("< {} >", currency), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Price: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{} {}", price, currency), Style::default().fg(Color::Green).bold()),
        ]),
    ];
    if let Some(err) = rates_error {
        lines.push(Line::from(err.to_string()).fg(Color::Red));
    }
    lines
}

fn draw_vehicle_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let inner = panel(f, area, "Vehicle Insurance", 70, 90);
    let form = &state.vehicle;

    if !form.quoted {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(2), Constraint::Min(0)])
            .split(inner);
        draw_inputs(
            f,
            chunks[0],
            &[("Registration Number", &form.registration)],
            form.focus,
            state.input_mode,
        );
        let status = if form.lookup_pending.is_some() {
            Line::from("Looking up vehicle...")
        } else {
            notice_line(form.notice.as_ref())
        };
        f.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), chunks[1]);
        f.render_widget(
            Paragraph::new("e: edit | Enter: look up | b: back")
                .style(Style::default().fg(Color::DarkGray)),
            chunks[2],
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(inner);

    draw_inputs(
        f,
        chunks[0],
        &[
            ("Make", &form.make),
            ("Model", &form.model),
            ("Registration Date", &form.registration_date),
            ("Registration Number", &form.quote_registration),
        ],
        form.focus,
        state.input_mode,
    );

    let service = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    f.render_widget(render_readonly(&form.service_date, "Service Date"), service[0]);
    f.render_widget(render_readonly(&form.service_type, "Service Type"), service[1]);

    let tier_index = match form.tier {
        VehicleTier::Standard => 0,
        VehicleTier::Premium => 1,
    };
    let tier_line = choice_line(
        "Insurance Type",
        &[VehicleTier::Standard.as_str(), VehicleTier::Premium.as_str()],
        tier_index,
    );
    f.render_widget(
        Paragraph::new(pricing_lines(
            tier_line,
            &form.currency,
            form.price().to_string(),
            form.rates_error.as_deref(),
        )),
        chunks[2],
    );

    let mut footer = vec![submit_status(
        form.submit_pending.is_some(),
        notice_line(form.notice.as_ref()),
    )];
    footer.push(
        Line::from("e: edit | p: tier | [ ]: currency | Enter: purchase | b: back")
            .fg(Color::DarkGray),
    );
    f.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), chunks[3]);
}

fn submit_status(pending: bool, notice: Line<'static>) -> Line<'static> {
    if pending {
        Line::from("Submitting...")
    } else {
        notice
    }
}

fn draw_travel_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let inner = panel(f, area, "Travel Insurance", 70, 80);
    let form = &state.travel;

    let Some(quote) = &form.quote else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Length(2), Constraint::Min(0)])
            .split(inner);
        draw_inputs(
            f,
            chunks[0],
            &[("Username", &form.username), ("Trip Title", &form.trip_title)],
            form.focus,
            state.input_mode,
        );
        let status = if form.lookup_pending.is_some() {
            Line::from("Looking up trip...")
        } else {
            notice_line(form.notice.as_ref())
        };
        f.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), chunks[1]);
        f.render_widget(
            Paragraph::new("e: edit | Tab: next field | Enter: find trip | b: back")
                .style(Style::default().fg(Color::DarkGray)),
            chunks[2],
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(inner);

    let details = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(chunks[0]);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(details[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(details[1]);
    f.render_widget(render_readonly(&quote.username, "Username"), top[0]);
    f.render_widget(render_readonly(&quote.trip_title, "Trip Title"), top[1]);
    f.render_widget(render_readonly(&quote.start_date, "Start Date"), bottom[0]);
    f.render_widget(render_readonly(&quote.end_date, "End Date"), bottom[1]);

    let tier_index = match form.tier {
        TravelTier::ShortTerm => 0,
        TravelTier::LongTerm => 1,
    };
    let tier_line = choice_line(
        "Insurance Type",
        &[TravelTier::ShortTerm.label(), TravelTier::LongTerm.label()],
        tier_index,
    );
    f.render_widget(
        Paragraph::new(pricing_lines(
            tier_line,
            &form.currency,
            form.price().to_string(),
            form.rates_error.as_deref(),
        )),
        chunks[1],
    );

    let footer = vec![
        submit_status(form.submit_pending.is_some(), notice_line(form.notice.as_ref())),
        Line::from("p: tier | [ ]: currency | Enter: purchase | b: back").fg(Color::DarkGray),
    ];
    f.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), chunks[2]);
}

/// Loading, error and empty states shared by both listings
fn list_placeholder(loading: bool, load_error: Option<&str>, empty: bool) -> Option<Line<'static>> {
    if loading {
        Some(Line::from("Loading policies..."))
    } else if let Some(err) = load_error {
        Some(Line::from(err.to_string()).fg(Color::Red))
    } else if empty {
        Some(Line::from("No policies found.").fg(Color::DarkGray))
    } else {
        None
    }
}

fn draw_policy_table(
    f: &mut Frame,
    area: Rect,
    title: &str,
    header: &[&'static str],
    rows: Vec<Row<'static>>,
    widths: &[Constraint],
    selected: usize,
) {
    let table = Table::new(rows, widths.to_vec())
        .header(Row::new(header.to_vec()).style(Style::default().fg(Color::Yellow).bold()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", title)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ");
    let mut table_state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn list_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area)
}

fn draw_vehicle_policies(f: &mut Frame, state: &RenderState, area: Rect) {
    let list = &state.vehicle_policies;
    let chunks = list_layout(area);

    if let Some(line) = list_placeholder(list.loading, list.load_error.as_deref(), list.policies.is_empty()) {
        let block = Block::default().borders(Borders::ALL).title(" Vehicle Policies ");
        f.render_widget(Paragraph::new(line).block(block), chunks[0]);
    } else {
        let rows = list
            .policies
            .iter()
            .map(|p| {
                Row::new(vec![
                    p.short_id().to_string(),
                    p.registration_number.clone(),
                    p.make.clone(),
                    p.model.clone(),
                    p.insurance_type.clone(),
                    p.price.to_string(),
                    p.expiry_date.clone(),
                ])
            })
            .collect();
        draw_policy_table(
            f,
            chunks[0],
            "Vehicle Policies",
            &["ID", "Registration", "Make", "Model", "Type", "Price", "Expiry Date"],
            rows,
            &[
                Constraint::Length(8),
                Constraint::Length(13),
                Constraint::Percentage(15),
                Constraint::Percentage(15),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Min(12),
            ],
            list.selected,
        );
    }

    let footer = vec![
        notice_line(list.notice.as_ref()),
        Line::from("↑/↓: select | d: export | x: cancel policy | r: reload").fg(Color::DarkGray),
    ];
    f.render_widget(Paragraph::new(footer), chunks[1]);
}

fn draw_travel_policies(f: &mut Frame, state: &RenderState, area: Rect) {
    let list = &state.travel_policies;
    let chunks = list_layout(area);

    if let Some(line) = list_placeholder(list.loading, list.load_error.as_deref(), list.policies.is_empty()) {
        let block = Block::default().borders(Borders::ALL).title(" Travel Policies ");
        f.render_widget(Paragraph::new(line).block(block), chunks[0]);
    } else {
        let rows = list
            .policies
            .iter()
            .map(|p| {
                Row::new(vec![
                    p.insurance_id.clone(),
                    p.title.clone().unwrap_or_default(),
                    p.insurance_type.clone(),
                    p.start_date.clone(),
                    p.end_date.clone(),
                    p.price.to_string(),
                ])
            })
            .collect();
        draw_policy_table(
            f,
            chunks[0],
            "Travel Policies",
            &["Policy ID", "Trip", "Type", "Start Date", "End Date", "Price"],
            rows,
            &[
                Constraint::Percentage(25),
                Constraint::Percentage(20),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Min(8),
            ],
            list.selected,
        );
    }

    let footer = vec![
        notice_line(list.notice.as_ref()),
        Line::from("↑/↓: select | d: export CSV | x: cancel policy | r: reload").fg(Color::DarkGray),
    ];
    f.render_widget(Paragraph::new(footer), chunks[1]);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if let Some(to) = state.redirecting {
        format!(" Redirecting to {}... ", to.title())
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next field | Enter:submit ".to_string()
    } else {
        " Tab:field | e:edit | Enter:submit | ?:help | q:quit ".to_string()
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_confirm_popup(f: &mut Frame, prompt: &str, area: Rect) {
    let popup_area = centered_rect(50, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Cancel Policy ")
        .style(Style::default().bg(Color::Black));

    let text = vec![
        Line::from(prompt.to_string()),
        Line::default(),
        Line::from("y: yes, cancel it | n: keep it").fg(Color::DarkGray),
    ];
    let popup = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 SAFEINSURE - Keyboard Shortcuts

 NAVIGATION (logged in)
   1 / 2 / 3          Home / Vehicle policies / Travel policies
   v / t              Vehicle / travel insurance (from Home)
   l                  Log out
   b / Esc            Back

 FORMS
   Tab / Shift+Tab    Next / previous field
   e                  Edit current field
   Enter              Submit (log in, look up, purchase)
   p                  Cycle insurance type
   [ / ]              Previous / next currency

 POLICY LISTS
   ↑ / ↓              Select policy
   d                  Export selected policy
   x                  Cancel selected policy
   r                  Reload

 LOGIN
   r                  Register
   f                  Forgot password

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
