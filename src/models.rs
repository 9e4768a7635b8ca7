use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{
    MAX_REGISTRATION_LEN, NOT_AVAILABLE, NO_DATA_SENTINEL, TRIP_DATE_NOT_AVAILABLE,
};

/// Client-held proof of authentication plus the remembered user id
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub user_id: String,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    pub fn login(
        &mut self,
        access_token: impl Into<String>,
        id_token: impl Into<String>,
        user_id: impl Into<String>,
    ) {
        self.access_token = access_token.into();
        self.id_token = id_token.into();
        self.user_id = user_id.into();
    }

    pub fn logout(&mut self) {
        self.access_token.clear();
        self.id_token.clear();
        self.user_id.clear();
    }

    /// The user id, if one is remembered
    pub fn user_id(&self) -> Option<&str> {
        if self.user_id.is_empty() {
            None
        } else {
            Some(&self.user_id)
        }
    }
}

/// Tokens returned by a successful login
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthTokens {
    #[serde(rename = "AccessToken")]
    pub access_token: String,
    #[serde(rename = "IdToken")]
    pub id_token: String,
}

/// Registration form payload
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Vehicle insurance tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VehicleTier {
    #[default]
    Standard,
    Premium,
}

impl VehicleTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleTier::Standard => "Standard",
            VehicleTier::Premium => "Premium",
        }
    }

    pub fn base_price(&self) -> u32 {
        match self {
            VehicleTier::Standard => 100,
            VehicleTier::Premium => 200,
        }
    }

    pub fn next(&self) -> VehicleTier {
        match self {
            VehicleTier::Standard => VehicleTier::Premium,
            VehicleTier::Premium => VehicleTier::Standard,
        }
    }
}

/// Travel insurance tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TravelTier {
    #[default]
    ShortTerm,
    LongTerm,
}

impl TravelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelTier::ShortTerm => "Short Term",
            TravelTier::LongTerm => "Long Term",
        }
    }

    /// Label shown in the tier picker
    pub fn label(&self) -> &'static str {
        match self {
            TravelTier::ShortTerm => "Short Term (1 month)",
            TravelTier::LongTerm => "Long Term (6 months)",
        }
    }

    pub fn base_price(&self) -> u32 {
        match self {
            TravelTier::ShortTerm => 100,
            TravelTier::LongTerm => 200,
        }
    }

    pub fn next(&self) -> TravelTier {
        match self {
            TravelTier::ShortTerm => TravelTier::LongTerm,
            TravelTier::LongTerm => TravelTier::ShortTerm,
        }
    }
}

/// Exchange rates relative to USD, keyed by currency code
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CurrencyRates {
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl CurrencyRates {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        CurrencyRates {
            rates: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Currency code after `current`, wrapping around
    pub fn next_currency(&self, current: &str) -> Option<String> {
        self.rates
            .keys()
            .find(|code| code.as_str() > current)
            .or_else(|| self.rates.keys().next())
            .cloned()
    }

    /// Currency code before `current`, wrapping around
    pub fn prev_currency(&self, current: &str) -> Option<String> {
        self.rates
            .keys()
            .rev()
            .find(|code| code.as_str() < current)
            .or_else(|| self.rates.keys().next_back())
            .cloned()
    }
}

/// A price as sent to and received from the policy services.
///
/// Converted prices travel as two-decimal strings; an unconverted base price
/// travels as a bare number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Text(String),
    Number(serde_json::Number),
}

impl Price {
    pub fn base(amount: u32) -> Self {
        Price::Number(serde_json::Number::from(amount))
    }
}

impl Default for Price {
    fn default() -> Self {
        Price::base(0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Text(s) => write!(f, "{}", s),
            Price::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Convert a base USD price into `currency`.
///
/// Unknown currencies leave the base price unconverted.
pub fn convert_price(base: u32, currency: &str, rates: &CurrencyRates) -> Price {
    match rates.rate(currency) {
        Some(rate) if rate != 0.0 => Price::Text(format!("{:.2}", f64::from(base) * rate)),
        _ => Price::base(base),
    }
}

/// Registry lookup response
#[derive(Clone, Debug, Default, Deserialize)]
pub struct VehicleRecord {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
}

/// Service-history lookup response
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServiceRecord {
    #[serde(default)]
    pub service_date: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
}

/// Editable draft of vehicle details prior to policy creation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VehicleQuote {
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub registration_date: String,
    pub service_date: String,
    pub service_type: String,
}

impl VehicleQuote {
    /// Shallow merge of the registry and service-history lookups
    pub fn merge(vehicle: VehicleRecord, service: ServiceRecord) -> Self {
        VehicleQuote {
            registration_number: vehicle.registration_number.unwrap_or_default(),
            make: vehicle.make.unwrap_or_default(),
            model: vehicle.model.unwrap_or_default(),
            registration_date: vehicle.registration_date.unwrap_or_default(),
            service_date: service_field(service.service_date),
            service_type: service_field(service.service_type),
        }
    }
}

fn service_field(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() && v != NO_DATA_SENTINEL => v,
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Registration numbers are 1-8 ASCII alphanumerics
pub fn is_valid_registration(registration: &str) -> bool {
    !registration.is_empty()
        && registration.len() <= MAX_REGISTRATION_LEN
        && registration.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Trip record returned by the trip lookup
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Envelope of the trip lookup
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TripLookup {
    #[serde(default)]
    pub trips: Vec<TripRecord>,
}

/// Draft of trip details prior to policy creation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TravelQuote {
    pub username: String,
    pub trip_title: String,
    pub start_date: String,
    pub end_date: String,
}

impl TravelQuote {
    pub fn from_trip(username: &str, trip_title: &str, trip: &TripRecord) -> Self {
        TravelQuote {
            username: username.to_string(),
            trip_title: trip_title.to_string(),
            start_date: trip_date(trip.start_date.as_deref()),
            end_date: trip_date(trip.end_date.as_deref()),
        }
    }
}

fn trip_date(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => TRIP_DATE_NOT_AVAILABLE.to_string(),
    }
}

/// Body of a vehicle policy creation (before the outer string wrapping)
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePolicyRequest {
    pub user_id: String,
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub service_date: String,
    pub insurance_type: String,
    pub price: Price,
}

/// Body of a travel policy creation
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPolicyRequest {
    pub user_id: String,
    pub username: String,
    pub trip_title: String,
    pub insurance_type: String,
    pub price: Price,
    pub start_date: String,
    pub end_date: String,
}

/// Stored vehicle policy
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePolicy {
    pub insurance_id: String,
    #[serde(default)]
    pub registration_number: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub insurance_type: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub expiry_date: String,
}

impl VehiclePolicy {
    /// Abbreviated id shown in the policy table
    pub fn short_id(&self) -> &str {
        match self.insurance_id.char_indices().nth(6) {
            Some((i, _)) => &self.insurance_id[..i],
            None => &self.insurance_id,
        }
    }
}

/// Stored travel policy
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPolicy {
    pub insurance_id: String,
    #[serde(default)]
    pub insurance_type: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Records that carry an insurance id
pub trait PolicyRecord {
    fn insurance_id(&self) -> &str;
}

impl PolicyRecord for VehiclePolicy {
    fn insurance_id(&self) -> &str {
        &self.insurance_id
    }
}

impl PolicyRecord for TravelPolicy {
    fn insurance_id(&self) -> &str {
        &self.insurance_id
    }
}

/// Outcome flavor of an inline message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

/// Inline message shown beneath a form
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: MessageKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_prices_are_fixed() {
        assert_eq!(VehicleTier::Premium.base_price(), 200);
        assert_eq!(VehicleTier::Standard.base_price(), 100);
        assert_eq!(TravelTier::LongTerm.base_price(), 200);
        assert_eq!(TravelTier::ShortTerm.base_price(), 100);
    }

    #[test]
    fn test_convert_price_with_known_rate() {
        let rates = CurrencyRates::from_pairs([("EUR", 0.9)]);
        assert_eq!(convert_price(100, "EUR", &rates), Price::Text("90.00".into()));
    }

    #[test]
    fn test_convert_price_unknown_currency_keeps_base() {
        let rates = CurrencyRates::from_pairs([("EUR", 0.9)]);
        for code in ["GBP", "JPY", "", "usd"] {
            assert_eq!(convert_price(200, code, &rates), Price::base(200));
        }
        assert_eq!(convert_price(100, "USD", &CurrencyRates::default()).to_string(), "100");
    }

    #[test]
    fn test_price_wire_shapes() {
        assert_eq!(serde_json::to_string(&Price::base(100)).unwrap(), "100");
        assert_eq!(serde_json::to_string(&Price::Text("90.00".into())).unwrap(), "\"90.00\"");
        let parsed: Price = serde_json::from_str("123.5").unwrap();
        assert_eq!(parsed.to_string(), "123.5");
    }

    #[test]
    fn test_currency_cycling_wraps() {
        let rates = CurrencyRates::from_pairs([("EUR", 0.9), ("GBP", 0.8), ("USD", 1.0)]);
        assert_eq!(rates.next_currency("EUR").as_deref(), Some("GBP"));
        assert_eq!(rates.next_currency("USD").as_deref(), Some("EUR"));
        assert_eq!(rates.prev_currency("EUR").as_deref(), Some("USD"));
        assert_eq!(rates.next_currency("AAA").as_deref(), Some("EUR"));
        assert_eq!(CurrencyRates::default().next_currency("USD"), None);
    }

    #[test]
    fn test_merge_replaces_service_sentinel() {
        let vehicle = VehicleRecord {
            make: Some("Ford".into()),
            model: Some("Focus".into()),
            registration_date: Some("2019-04-01".into()),
            registration_number: Some("AB12CDE".into()),
        };
        let service = ServiceRecord {
            service_date: Some("no_data_available".into()),
            service_type: None,
        };
        let quote = VehicleQuote::merge(vehicle, service);
        assert_eq!(quote.make, "Ford");
        assert_eq!(quote.service_date, "Not Available");
        assert_eq!(quote.service_type, "Not Available");
    }

    #[test]
    fn test_registration_validation() {
        assert!(is_valid_registration("AB12CDE"));
        assert!(!is_valid_registration(""));
        assert!(!is_valid_registration("AB12 CDE"));
        assert!(!is_valid_registration("ABCDEFGHI"));
    }

    #[test]
    fn test_session_transitions() {
        let mut session = Session::default();
        assert!(!session.is_authenticated());
        session.login("A", "I", "alice");
        assert!(session.is_authenticated());
        assert_eq!(session.user_id(), Some("alice"));
        session.logout();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_short_id() {
        let policy = VehiclePolicy {
            insurance_id: "0f8fad5b-d9cb".into(),
            ..Default::default()
        };
        assert_eq!(policy.short_id(), "0f8fad");
    }
}
