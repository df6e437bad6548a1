//! Mapping raw gateway responses to delivery outcomes.

use serde::Deserialize;

use crate::DeliveryOutcome;

/// Gateway error kind for tokens whose app was uninstalled or expired.
pub const DEVICE_NOT_REGISTERED: &str = "DeviceNotRegistered";

/// Reason used when the gateway reports a failure without a message.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// No response was received from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportFailure(pub String);

/// Raw HTTP response from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Default, Deserialize)]
struct Reply {
    #[serde(default)]
    data: Option<Tickets>,
    #[serde(default)]
    errors: Vec<ReplyError>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tickets {
    One(Ticket),
    Many(Vec<Ticket>),
}

impl Tickets {
    fn as_slice(&self) -> &[Ticket] {
        match self {
            Tickets::One(ticket) => std::slice::from_ref(ticket),
            Tickets::Many(tickets) => tickets,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Ticket {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<Details>,
}

#[derive(Debug, Deserialize)]
struct ReplyError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<Details>,
}

#[derive(Debug, Deserialize)]
struct Details {
    #[serde(default)]
    error: Option<String>,
}

/// Classify one gateway response.
///
/// Error kinds are read from `data.details.error`, `errors[].details.error` and
/// `errors[].code`, whatever the HTTP status. Any other reported error, or a
/// non-2xx status, is a rejection carrying the first message available.
pub fn classify(response: &GatewayResponse) -> DeliveryOutcome {
    let Ok(reply) = serde_json::from_str::<Reply>(&response.body) else {
        return DeliveryOutcome::GatewayRejected(UNKNOWN_ERROR.to_string());
    };

    let tickets = reply.data.as_ref().map(Tickets::as_slice).unwrap_or_default();

    let mut kinds = tickets
        .iter()
        .filter_map(|t| t.details.as_ref()?.error.as_deref())
        .chain(reply.errors.iter().flat_map(|e| {
            let detail = e.details.as_ref().and_then(|d| d.error.as_deref());
            detail.into_iter().chain(e.code.as_deref())
        }));
    if kinds.any(|kind| kind == DEVICE_NOT_REGISTERED) {
        return DeliveryOutcome::DeviceNotRegistered;
    }

    let ticket_failed = tickets
        .iter()
        .any(|t| t.status.as_deref() == Some("error"));

    if !reply.errors.is_empty() || ticket_failed || !response.is_success() {
        let message = reply
            .errors
            .first()
            .and_then(|e| e.message.clone())
            .or_else(|| tickets.iter().find_map(|t| t.message.clone()))
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        return DeliveryOutcome::GatewayRejected(message);
    }

    DeliveryOutcome::Delivered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_ticket() {
        let response = GatewayResponse::new(200, r#"{"data":{"status":"ok","id":"XXXX-XXXX"}}"#);
        assert_eq!(classify(&response), DeliveryOutcome::Delivered);
    }

    #[test]
    fn test_ticket_device_not_registered() {
        let response = GatewayResponse::new(
            200,
            r#"{"data":{"status":"error","message":"\"ExponentPushToken[x]\" is not a registered push notification recipient","details":{"error":"DeviceNotRegistered"}}}"#,
        );
        assert_eq!(classify(&response), DeliveryOutcome::DeviceNotRegistered);
    }

    #[test]
    fn test_ticket_array_error() {
        let response = GatewayResponse::new(
            200,
            r#"{"data":[{"status":"error","message":"Message too big","details":{"error":"MessageTooBig"}}]}"#,
        );
        assert_eq!(
            classify(&response),
            DeliveryOutcome::GatewayRejected("Message too big".into())
        );
    }

    #[test]
    fn test_request_errors_use_first_message() {
        let response = GatewayResponse::new(
            400,
            r#"{"errors":[{"code":"VALIDATION_ERROR","message":"\"to\" must be a string"},{"code":"OTHER","message":"second"}]}"#,
        );
        assert_eq!(
            classify(&response),
            DeliveryOutcome::GatewayRejected("\"to\" must be a string".into())
        );
    }

    #[test]
    fn test_error_code_device_not_registered() {
        let response = GatewayResponse::new(
            400,
            r#"{"errors":[{"code":"DeviceNotRegistered","message":"gone"}]}"#,
        );
        assert_eq!(classify(&response), DeliveryOutcome::DeviceNotRegistered);
    }

    #[test]
    fn test_error_details_device_not_registered() {
        let response = GatewayResponse::new(
            200,
            r#"{"errors":[{"code":"PUSH_TOO_MANY_EXPERIENCE_IDS","message":"gone","details":{"error":"DeviceNotRegistered"}}]}"#,
        );
        assert_eq!(classify(&response), DeliveryOutcome::DeviceNotRegistered);
    }

    #[test]
    fn test_error_without_message() {
        let response = GatewayResponse::new(200, r#"{"data":{"status":"error"}}"#);
        assert_eq!(
            classify(&response),
            DeliveryOutcome::GatewayRejected(UNKNOWN_ERROR.into())
        );

        let response = GatewayResponse::new(503, "{}");
        assert_eq!(
            classify(&response),
            DeliveryOutcome::GatewayRejected(UNKNOWN_ERROR.into())
        );
    }

    #[test]
    fn test_unreadable_body() {
        let response = GatewayResponse::new(502, "<html>bad gateway</html>");
        assert_eq!(
            classify(&response),
            DeliveryOutcome::GatewayRejected(UNKNOWN_ERROR.into())
        );
    }
}
