//! Network layer - calls to the authentication, lookup, policy and rate services
//!
//! The Network actor receives commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::InsuranceClient;
