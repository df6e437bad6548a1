//! Batch dispatch with per-recipient failure isolation.

use std::pin::pin;

use futures::StreamExt as _;
use push_core::{
    DeliveryOutcome, DispatchReport, InvalidPayload, NotificationPayload, RecipientResult,
    RecipientToken, classify,
};
use tokio_util::sync::CancellationToken;
use tracing::Instrument as _;

use crate::Gateway;

/// Sends one payload to many recipients, one gateway call each.
pub struct Dispatcher<G> {
    gateway: G,
    concurrency: usize,
}

impl<G: Gateway> Dispatcher<G> {
    /// Create a dispatcher running at most `concurrency` sends at once.
    ///
    /// A limit of 1 sends sequentially; 0 is treated as 1.
    pub fn new(gateway: G, concurrency: usize) -> Self {
        Self {
            gateway,
            concurrency: concurrency.max(1),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Send `payload` to every recipient and report each outcome in input order.
    pub async fn dispatch(
        &self,
        payload: &NotificationPayload,
        recipients: &[RecipientToken],
    ) -> Result<DispatchReport, InvalidPayload> {
        self.dispatch_until_cancelled(payload, recipients, &CancellationToken::new())
            .await
    }

    /// Like [`Dispatcher::dispatch`], but stops waiting once `cancel` fires.
    ///
    /// Recipients still pending at that point are reported as
    /// `TransportError("cancelled")`.
    pub async fn dispatch_until_cancelled(
        &self,
        payload: &NotificationPayload,
        recipients: &[RecipientToken],
        cancel: &CancellationToken,
    ) -> Result<DispatchReport, InvalidPayload> {
        if recipients.is_empty() {
            tracing::info!("no recipients, nothing to dispatch");
            return Ok(DispatchReport::no_recipients());
        }

        payload.validate()?;

        let span = tracing::info_span!(
            "dispatch",
            dispatch_id = %uuid::Uuid::new_v4(),
            recipients = recipients.len(),
        );

        let report = self
            .run(payload, recipients, cancel)
            .instrument(span)
            .await;

        Ok(report)
    }

    async fn run(
        &self,
        payload: &NotificationPayload,
        recipients: &[RecipientToken],
        cancel: &CancellationToken,
    ) -> DispatchReport {
        let mut outcomes: Vec<Option<DeliveryOutcome>> = vec![None; recipients.len()];

        // Iterate indices: a closure taking `&RecipientToken` is not Send for every lifetime.
        let mut sends = pin!(
            futures::stream::iter(0..recipients.len())
                .map(move |index| async move {
                    (index, self.send_one(payload, &recipients[index]).await)
                })
                .buffer_unordered(self.concurrency)
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::warn!(
                        pending = outcomes.iter().filter(|o| o.is_none()).count(),
                        "dispatch cancelled"
                    );
                    break;
                }
                next = sends.next() => match next {
                    Some((index, outcome)) => outcomes[index] = Some(outcome),
                    None => break,
                },
            }
        }

        let results: Vec<RecipientResult> = recipients
            .iter()
            .zip(outcomes)
            .map(|(token, outcome)| RecipientResult {
                token: token.clone(),
                outcome: outcome.unwrap_or_else(DeliveryOutcome::cancelled),
            })
            .collect();

        let report = DispatchReport::from_results(results);
        tracing::info!(
            delivered = report.delivered_count(),
            failed = report.len() - report.delivered_count(),
            "dispatch complete"
        );
        report
    }

    async fn send_one(&self, payload: &NotificationPayload, token: &RecipientToken) -> DeliveryOutcome {
        tracing::debug!(token = %token, "sending notification");

        let outcome = match self.gateway.send(&payload.message_for(token.as_str())).await {
            Ok(response) => classify(&response),
            Err(e) => DeliveryOutcome::TransportError(e.0),
        };

        match &outcome {
            DeliveryOutcome::Delivered => tracing::info!(token = %token, "notification delivered"),
            DeliveryOutcome::DeviceNotRegistered => {
                tracing::warn!(token = %token, "device not registered")
            }
            DeliveryOutcome::GatewayRejected(reason) => {
                tracing::warn!(token = %token, reason = %reason, "gateway rejected notification")
            }
            DeliveryOutcome::TransportError(reason) => {
                tracing::error!(token = %token, reason = %reason, "failed to reach gateway")
            }
        }

        outcome
    }
}
