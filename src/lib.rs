//! # SafeInsure TUI
//!
//! A terminal client for buying and managing vehicle and travel insurance.
//!
//! ## Features
//! - Login, registration and password reset against the auth service
//! - Vehicle insurance: registration lookup, editable quote, tiered pricing
//! - Travel insurance: trip lookup, tiered pricing
//! - Price conversion into any currency the rate service knows
//! - Policy listings with export and cancellation
//! - Session persisted between runs
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod messages;
pub mod models;
pub mod network;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState, View};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{convert_price, CurrencyRates, Price, Session};
pub use network::{InsuranceClient, NetworkActor};
