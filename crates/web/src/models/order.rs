//! Order domain types and form-input parsing rules.
//!
//! Parsing here is deliberately forgiving: a bad quantity never rejects an
//! order, and a malformed field in an edit leaves the stored value alone.
//! Only a missing phone, address or payment note is a validation error.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use clearspring_core::{OrderId, PaymentMethod, PaymentStatus, Phone, PhoneError};

/// Quantity used when the submitted value is missing or unusable.
pub const DEFAULT_CANS: i64 = 1;

/// The only checkbox/select value that turns cooling on.
const COOLING_ON: &str = "yes";

/// Missing or malformed required input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("phone number is required")]
    MissingPhone,
    #[error("delivery address is required")]
    MissingAddress,
    #[error("payment details are required")]
    MissingPaymentDetails,
}

impl ValidationError {
    /// Short code carried in redirect query strings.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingPhone => "phone_required",
            Self::MissingAddress => "phone_and_address_required",
            Self::MissingPaymentDetails => "payment_details_required",
        }
    }
}

impl From<PhoneError> for ValidationError {
    fn from(err: PhoneError) -> Self {
        match err {
            PhoneError::Empty => Self::MissingPhone,
        }
    }
}

/// A delivery order (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub customer_phone: Phone,
    pub customer_address: String,
    /// Number of water cans, always at least 1.
    pub cans: i64,
    pub cooling: bool,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// `"{staff username}: {note}"` once a payment is recorded.
    pub payment_details: Option<String>,
    /// Set once at creation, never updated.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns `true` if the order was placed under exactly this phone number.
    #[must_use]
    pub fn is_owned_by(&self, phone: &Phone) -> bool {
        self.customer_phone == *phone
    }

    /// Returns `true` once staff have recorded a payment.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// A validated order ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_phone: Phone,
    pub customer_address: String,
    pub cans: i64,
    pub cooling: bool,
    pub payment_method: PaymentMethod,
}

/// Raw order form as submitted by a customer.
///
/// Every field is optional text; interpretation happens in
/// [`NewOrder::from_request`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceOrderRequest {
    /// Overrides the session phone when non-empty.
    pub phone: Option<String>,
    pub cans: Option<String>,
    pub cooling: Option<String>,
    pub address: Option<String>,
    pub payment_method: Option<String>,
}

impl NewOrder {
    /// Build an order from the customer form.
    ///
    /// The phone typed into the form wins when non-empty, otherwise the
    /// session phone is used.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if no phone can be resolved or the address
    /// is blank.
    pub fn from_request(
        request: &PlaceOrderRequest,
        session_phone: Option<&Phone>,
    ) -> Result<Self, ValidationError> {
        let customer_phone = match non_blank(request.phone.as_deref()) {
            Some(raw) => Phone::parse(raw)?,
            None => session_phone
                .cloned()
                .ok_or(ValidationError::MissingPhone)?,
        };

        let customer_address = non_blank(request.address.as_deref())
            .ok_or(ValidationError::MissingAddress)?;

        Ok(Self {
            customer_phone,
            customer_address: customer_address.to_owned(),
            cans: parse_cans(request.cans.as_deref()).unwrap_or(DEFAULT_CANS),
            cooling: parse_cooling(request.cooling.as_deref()),
            payment_method: parse_token(request.payment_method.as_deref()).unwrap_or_default(),
        })
    }
}

/// Admin edit form. Absent or malformed fields keep the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    pub customer_address: Option<String>,
    pub cans: Option<String>,
    pub cooling: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    /// Present-but-blank clears the note.
    pub payment_details: Option<String>,
}

impl OrderPatch {
    /// Apply every present, well-formed field to `order`.
    ///
    /// Never fails: fields that do not parse are ignored. The phone number and
    /// creation time are not editable.
    pub fn apply(&self, order: &mut Order) {
        if let Some(address) = non_blank(self.customer_address.as_deref()) {
            address.clone_into(&mut order.customer_address);
        }

        if let Some(cans) = parse_cans(self.cans.as_deref()) {
            order.cans = cans;
        }

        if let Some(cooling) = self.cooling.as_deref() {
            order.cooling = parse_cooling(Some(cooling));
        }

        if let Some(method) = parse_token(self.payment_method.as_deref()) {
            order.payment_method = method;
        }

        if let Some(status) = parse_token(self.payment_status.as_deref()) {
            order.payment_status = status;
        }

        if let Some(details) = self.payment_details.as_deref() {
            let details = details.trim();
            order.payment_details = (!details.is_empty()).then(|| details.to_owned());
        }
    }
}

/// Build the stored payment note, attributing it to the recording staff member.
///
/// # Errors
///
/// Returns `ValidationError::MissingPaymentDetails` if the note is blank.
pub fn payment_note(username: &str, raw_details: &str) -> Result<String, ValidationError> {
    let details = raw_details.trim();
    if details.is_empty() {
        return Err(ValidationError::MissingPaymentDetails);
    }

    Ok(format!("{username}: {details}"))
}

/// Parse a can count. Only integers >= 1 are accepted.
#[must_use]
pub fn parse_cans(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok().filter(|n| *n >= 1)
}

/// Cooling is on iff the submitted value is exactly `"yes"`.
#[must_use]
pub fn parse_cooling(raw: Option<&str>) -> bool {
    raw == Some(COOLING_ON)
}

fn parse_token<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw?.trim().parse().ok()
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn phone(s: &str) -> Phone {
        Phone::parse(s).unwrap()
    }

    fn request(address: &str) -> PlaceOrderRequest {
        PlaceOrderRequest {
            address: Some(address.to_string()),
            ..PlaceOrderRequest::default()
        }
    }

    fn sample_order() -> Order {
        Order {
            id: OrderId::new(5),
            customer_phone: phone("555-1234"),
            customer_address: "12 Well Street".to_string(),
            cans: 2,
            cooling: true,
            payment_method: PaymentMethod::Offline,
            payment_status: PaymentStatus::Pending,
            payment_details: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_place_order_uses_session_phone_when_form_blank() {
        let session = phone("555-1234");
        let mut req = request("12 Well Street");
        req.phone = Some("   ".to_string());

        let order = NewOrder::from_request(&req, Some(&session)).unwrap();
        assert_eq!(order.customer_phone, session);
    }

    #[test]
    fn test_place_order_form_phone_overrides_session() {
        let session = phone("555-1234");
        let mut req = request("12 Well Street");
        req.phone = Some(" 555-0000 ".to_string());

        let order = NewOrder::from_request(&req, Some(&session)).unwrap();
        assert_eq!(order.customer_phone.as_str(), "555-0000");
    }

    #[test]
    fn test_place_order_requires_phone_and_address() {
        let err = NewOrder::from_request(&request("12 Well Street"), None).unwrap_err();
        assert_eq!(err, ValidationError::MissingPhone);

        let session = phone("555-1234");
        let err = NewOrder::from_request(&request("  "), Some(&session)).unwrap_err();
        assert_eq!(err, ValidationError::MissingAddress);

        let err = NewOrder::from_request(&PlaceOrderRequest::default(), Some(&session))
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingAddress);
    }

    #[test]
    fn test_place_order_accepts_long_phone_and_address() {
        let long_address = "Flat 4, ".repeat(200);
        let mut req = request(&long_address);
        req.phone = Some("+91 98765 43210 ext. 1234 (office)".to_string());

        let order = NewOrder::from_request(&req, None).unwrap();
        assert_eq!(order.customer_address, long_address.trim());
        assert_eq!(
            order.customer_phone.as_str(),
            "+91 98765 43210 ext. 1234 (office)"
        );
    }

    #[test]
    fn test_place_order_bad_cans_defaults_to_one() {
        let session = phone("555-1234");
        for raw in ["abc", "", "2.5", "0", "-3"] {
            let mut req = request("12 Well Street");
            req.cans = Some(raw.to_string());
            let order = NewOrder::from_request(&req, Some(&session)).unwrap();
            assert_eq!(order.cans, 1, "cans_raw = {raw:?}");
        }

        let mut req = request("12 Well Street");
        req.cans = Some(" 4 ".to_string());
        assert_eq!(NewOrder::from_request(&req, Some(&session)).unwrap().cans, 4);
    }

    #[test]
    fn test_place_order_cooling_only_for_exact_yes() {
        let session = phone("555-1234");
        for (raw, expected) in [
            (Some("yes"), true),
            (Some("no"), false),
            (Some("YES"), false),
            (Some("on"), false),
            (None, false),
        ] {
            let mut req = request("12 Well Street");
            req.cooling = raw.map(String::from);
            let order = NewOrder::from_request(&req, Some(&session)).unwrap();
            assert_eq!(order.cooling, expected, "cooling_raw = {raw:?}");
        }
    }

    #[test]
    fn test_place_order_payment_method_defaults_to_offline() {
        let session = phone("555-1234");
        let mut req = request("12 Well Street");
        req.payment_method = Some("bitcoin".to_string());
        let order = NewOrder::from_request(&req, Some(&session)).unwrap();
        assert_eq!(order.payment_method, PaymentMethod::Offline);

        req.payment_method = Some("online".to_string());
        let order = NewOrder::from_request(&req, Some(&session)).unwrap();
        assert_eq!(order.payment_method, PaymentMethod::Online);
    }

    #[test]
    fn test_payment_note_attribution() {
        assert_eq!(
            payment_note("mgr1", "  cash received ").unwrap(),
            "mgr1: cash received"
        );
        assert_eq!(
            payment_note("mgr1", " \t ").unwrap_err(),
            ValidationError::MissingPaymentDetails
        );

        let long = "x".repeat(2000);
        assert_eq!(
            payment_note("mgr1", &long).unwrap(),
            format!("mgr1: {long}")
        );
    }

    #[test]
    fn test_patch_ignores_malformed_fields() {
        let mut order = sample_order();
        let original = order.clone();

        OrderPatch {
            customer_address: Some("   ".to_string()),
            cans: Some("lots".to_string()),
            payment_method: Some("cheque".to_string()),
            payment_status: Some("refunded".to_string()),
            ..OrderPatch::default()
        }
        .apply(&mut order);

        assert_eq!(order, original);
    }

    #[test]
    fn test_patch_applies_well_formed_fields() {
        let mut order = sample_order();
        let created_at = order.created_at;

        OrderPatch {
            customer_address: Some(" 99 Spring Road ".to_string()),
            cans: Some("6".to_string()),
            cooling: Some("no".to_string()),
            payment_method: Some("online".to_string()),
            payment_status: Some("paid".to_string()),
            payment_details: Some("admin: bank transfer".to_string()),
        }
        .apply(&mut order);

        assert_eq!(order.customer_address, "99 Spring Road");
        assert_eq!(order.cans, 6);
        assert!(!order.cooling);
        assert_eq!(order.payment_method, PaymentMethod::Online);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.payment_details.as_deref(), Some("admin: bank transfer"));
        assert_eq!(order.created_at, created_at);
        assert_eq!(order.customer_phone.as_str(), "555-1234");
    }

    #[test]
    fn test_patch_absent_cooling_keeps_value_and_blank_details_clear() {
        let mut order = sample_order();
        order.payment_details = Some("mgr1: cash".to_string());

        OrderPatch {
            payment_details: Some(String::new()),
            ..OrderPatch::default()
        }
        .apply(&mut order);

        assert!(order.cooling);
        assert_eq!(order.payment_details, None);
    }

    #[test]
    fn test_validation_codes_are_distinct() {
        let codes = [
            ValidationError::MissingPhone.code(),
            ValidationError::MissingAddress.code(),
            ValidationError::MissingPaymentDetails.code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
