//! Delivery outcomes and dispatch reports.

use std::fmt;

use crate::RecipientToken;

/// Reason recorded for sends abandoned by cancellation.
pub const CANCELLED: &str = "cancelled";

/// Terminal result of sending to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Gateway accepted the notification.
    Delivered,
    /// Gateway reports the token no longer maps to an installed app.
    DeviceNotRegistered,
    /// Gateway answered with any other error.
    GatewayRejected(String),
    /// No response was received.
    TransportError(String),
}

impl DeliveryOutcome {
    /// Outcome for a send abandoned by cancellation.
    pub fn cancelled() -> Self {
        Self::TransportError(CANCELLED.to_string())
    }

    /// Check if the notification was delivered.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => f.write_str("delivered"),
            Self::DeviceNotRegistered => f.write_str("device not registered"),
            Self::GatewayRejected(reason) => write!(f, "gateway rejected: {reason}"),
            Self::TransportError(reason) => write!(f, "transport error: {reason}"),
        }
    }
}

/// Outcome for one recipient of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecipientResult {
    pub token: RecipientToken,
    pub outcome: DeliveryOutcome,
}

/// Informational condition attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The dispatch had nobody to send to.
    NoRecipients,
}

/// Per-recipient results of one dispatch, in input order.
///
/// Holds exactly one entry per requested recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DispatchReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
    results: Vec<RecipientResult>,
}

impl DispatchReport {
    /// Empty report for a dispatch without recipients.
    pub fn no_recipients() -> Self {
        Self {
            notice: Some(Notice::NoRecipients),
            results: Vec::new(),
        }
    }

    /// Report from results already in input order.
    pub fn from_results(results: Vec<RecipientResult>) -> Self {
        Self {
            notice: None,
            results,
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn is_no_recipients(&self) -> bool {
        self.notice == Some(Notice::NoRecipients)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[RecipientResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecipientResult> {
        self.results.iter()
    }

    pub fn delivered_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_delivered()).count()
    }

    /// Tokens to pass to a follow-up dispatch when retrying.
    pub fn undelivered(&self) -> Vec<RecipientToken> {
        self.results
            .iter()
            .filter(|r| !r.outcome.is_delivered())
            .map(|r| r.token.clone())
            .collect()
    }

    pub fn into_results(self) -> Vec<RecipientResult> {
        self.results
    }
}

impl<'a> IntoIterator for &'a DispatchReport {
    type Item = &'a RecipientResult;
    type IntoIter = std::slice::Iter<'a, RecipientResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
