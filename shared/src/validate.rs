//! Customer input validation
//!
//! One validation gate shared by both sides: the checkout pipeline runs it
//! before any network call, and the order API runs it again on receipt so
//! a malformed request can never leave partial state behind.

use crate::client::CreateOrderRequest;
use thiserror::Error;

/// Soft cap mirrored by the input widget; the server rejects (never
/// truncates) anything longer.
pub const MAX_SPECIAL_REQUEST_LEN: usize = 100;

/// Phone length bounds after normalization (digits only)
pub const MIN_PHONE_DIGITS: usize = 9;
pub const MAX_PHONE_DIGITS: usize = 12;

/// Validation failure: recovered locally, surfaced to the end user,
/// no side effects performed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be non-empty and contain only letters, spaces, hyphens or apostrophes")]
    InvalidName,

    #[error("phone must start with 01 or 03 and be 9-12 digits")]
    InvalidPhone,

    #[error("email address is malformed")]
    InvalidEmail,

    #[error("table number is required for dine-in orders")]
    MissingTableNumber,

    #[error("special request exceeds {MAX_SPECIAL_REQUEST_LEN} characters")]
    SpecialRequestTooLong,

    #[error("order must contain at least one item")]
    EmptyOrder,

    #[error("line items must have positive quantity and non-negative price")]
    InvalidLine,

    #[error("claimed total does not match the sum of line items")]
    TotalMismatch,
}

/// Strip everything but ASCII digits (spaces, dashes, etc.)
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Letters, spaces, hyphens and apostrophes only
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidName);
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == ' ' || c == '-' || c == '\'')
    {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}

/// Digits only, starts with "01" or "03", 9-12 digits total
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone);
    }
    if !(phone.starts_with("01") || phone.starts_with("03")) {
        return Err(ValidationError::InvalidPhone);
    }
    if phone.len() < MIN_PHONE_DIGITS || phone.len() > MAX_PHONE_DIGITS {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Conventional `local@domain.tld` shape; no whitespace anywhere
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ValidationError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() {
        return Err(ValidationError::InvalidEmail);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    // Domain needs a dot with non-empty labels around it
    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Dine-in requires a non-empty table number; take-away ignores it
pub fn validate_table_number(
    order_type: crate::order::OrderType,
    table_number: Option<&str>,
) -> Result<(), ValidationError> {
    if order_type.requires_table() {
        match table_number {
            Some(t) if !t.trim().is_empty() => Ok(()),
            _ => Err(ValidationError::MissingTableNumber),
        }
    } else {
        Ok(())
    }
}

/// Length cap on the optional special request (count chars, not bytes)
pub fn validate_special_request(special_request: Option<&str>) -> Result<(), ValidationError> {
    if let Some(req) = special_request
        && req.chars().count() > MAX_SPECIAL_REQUEST_LEN
    {
        return Err(ValidationError::SpecialRequestTooLong);
    }
    Ok(())
}

/// The full validation gate for an order submission.
///
/// Fails fast: the first violation is returned and the caller must not
/// have performed any side effect yet.
pub fn validate_create_order(req: &CreateOrderRequest) -> Result<(), ValidationError> {
    validate_name(&req.customer_name)?;
    validate_phone(&req.customer_phone)?;
    if let Some(email) = req.customer_email.as_deref()
        && !email.is_empty()
    {
        validate_email(email)?;
    }
    validate_table_number(req.order_type, req.table_number.as_deref())?;
    validate_special_request(req.special_request.as_deref())?;

    if req.items.is_empty() {
        return Err(ValidationError::EmptyOrder);
    }
    for line in &req.items {
        if line.quantity < 1 || line.price_cents < 0 {
            return Err(ValidationError::InvalidLine);
        }
    }
    let computed: i64 = req.items.iter().map(|l| l.line_total_cents()).sum();
    if computed != req.total_cents {
        return Err(ValidationError::TotalMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderLine, OrderType};

    fn base_request() -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Ali".into(),
            customer_phone: "0123456789".into(),
            customer_email: None,
            table_number: Some("5".into()),
            special_request: None,
            order_type: OrderType::DineIn,
            items: vec![OrderLine {
                name: "Nasi Ayam".into(),
                quantity: 2,
                price_cents: 990,
            }],
            total_cents: 1980,
        }
    }

    #[test]
    fn accepts_well_formed_request() {
        assert_eq!(validate_create_order(&base_request()), Ok(()));
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("Ali").is_ok());
        assert!(validate_name("Siti-Nur 'Aisyah").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Ali123").is_err());
        assert!(validate_name("Ali@home").is_err());
    }

    #[test]
    fn phone_rules() {
        assert!(validate_phone("0123456789").is_ok());
        assert!(validate_phone("0312345678").is_ok());
        assert!(validate_phone("012345678").is_ok()); // 9 digits, lower bound
        assert!(validate_phone("012345678901").is_ok()); // 12 digits, upper bound
        assert!(validate_phone("0223456789").is_err()); // wrong prefix
        assert!(validate_phone("01234567").is_err()); // too short
        assert!(validate_phone("0123456789012").is_err()); // too long
        assert!(validate_phone("01-2345678").is_err()); // not normalized
    }

    #[test]
    fn normalize_strips_formatting() {
        assert_eq!(normalize_phone("012-345 6789"), "0123456789");
        assert_eq!(normalize_phone("(03) 1234 5678"), "0312345678");
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("a.b@mail.example.my").is_ok());
        assert!(validate_email("user").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@example").is_err());
        assert!(validate_email("us er@example.com").is_err());
        assert!(validate_email("user@@example.com").is_err());
    }

    #[test]
    fn dine_in_needs_a_table() {
        let mut req = base_request();
        req.table_number = Some("".into());
        assert_eq!(
            validate_create_order(&req),
            Err(ValidationError::MissingTableNumber)
        );

        // Take-away is fine without one
        req.order_type = OrderType::TakeAway;
        req.table_number = None;
        assert_eq!(validate_create_order(&req), Ok(()));
    }

    #[test]
    fn special_request_cap_rejects_not_truncates() {
        let mut req = base_request();
        req.special_request = Some("x".repeat(MAX_SPECIAL_REQUEST_LEN));
        assert!(validate_create_order(&req).is_ok());

        req.special_request = Some("x".repeat(MAX_SPECIAL_REQUEST_LEN + 1));
        assert_eq!(
            validate_create_order(&req),
            Err(ValidationError::SpecialRequestTooLong)
        );
    }

    #[test]
    fn empty_email_is_treated_as_absent() {
        let mut req = base_request();
        req.customer_email = Some("".into());
        assert_eq!(validate_create_order(&req), Ok(()));
    }

    #[test]
    fn total_must_match_lines() {
        let mut req = base_request();
        req.total_cents = 1000;
        assert_eq!(
            validate_create_order(&req),
            Err(ValidationError::TotalMismatch)
        );
    }

    #[test]
    fn rejects_empty_or_nonsense_lines() {
        let mut req = base_request();
        req.items.clear();
        req.total_cents = 0;
        assert_eq!(validate_create_order(&req), Err(ValidationError::EmptyOrder));

        let mut req = base_request();
        req.items[0].quantity = 0;
        req.total_cents = 0;
        assert_eq!(validate_create_order(&req), Err(ValidationError::InvalidLine));
    }
}
