//! Push service combining registration and dispatch.

use push_core::{
    DeliveryOutcome, DispatchReport, InvalidPayload, Listeners, NotificationPayload,
    RecipientToken, Subscription,
};
use push_registrar::{Endpoint, Registrar, RegistrationError, TokenIssuer};
use tokio::sync::RwLock;

use crate::{Dispatcher, Gateway};

/// Outcome of one recipient, published after each dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeEvent {
    pub token: RecipientToken,
    pub outcome: DeliveryOutcome,
}

/// Failure sending to the local endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelfDispatchError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    InvalidPayload(#[from] InvalidPayload),
}

/// Registers the local endpoint and dispatches notifications.
pub struct PushService<E, I, G> {
    registrar: Registrar<E, I>,
    dispatcher: Dispatcher<G>,
    local_token: RwLock<Option<RecipientToken>>,
    outcomes: Listeners<OutcomeEvent>,
}

impl<E, I, G> PushService<E, I, G>
where
    E: Endpoint,
    I: TokenIssuer,
    G: Gateway,
{
    /// Create a new push service.
    pub fn new(registrar: Registrar<E, I>, dispatcher: Dispatcher<G>) -> Self {
        Self {
            registrar,
            dispatcher,
            local_token: RwLock::new(None),
            outcomes: Listeners::new(),
        }
    }

    pub fn registrar(&self) -> &Registrar<E, I> {
        &self.registrar
    }

    pub fn dispatcher(&self) -> &Dispatcher<G> {
        &self.dispatcher
    }

    /// Register again and remember the resulting token.
    pub async fn register(&self) -> Result<RecipientToken, RegistrationError> {
        let mut cached = self.local_token.write().await;
        let token = self.registrar.register().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Token of the local endpoint, registering on first use.
    pub async fn local_token(&self) -> Result<RecipientToken, RegistrationError> {
        if let Some(token) = self.local_token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let mut cached = self.local_token.write().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }
        let token = self.registrar.register().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Dispatch to `recipients`, publishing each outcome to subscribers.
    pub async fn dispatch(
        &self,
        payload: &NotificationPayload,
        recipients: &[RecipientToken],
    ) -> Result<DispatchReport, InvalidPayload> {
        let report = self.dispatcher.dispatch(payload, recipients).await?;

        for result in &report {
            self.outcomes.emit(&OutcomeEvent {
                token: result.token.clone(),
                outcome: result.outcome.clone(),
            });
        }

        Ok(report)
    }

    /// Dispatch to the local endpoint only.
    pub async fn send_to_self(
        &self,
        payload: &NotificationPayload,
    ) -> Result<DispatchReport, SelfDispatchError> {
        let token = self.local_token().await?;
        Ok(self.dispatch(payload, &[token]).await?)
    }

    /// Subscribe to per-recipient outcomes.
    pub fn on_outcome<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&OutcomeEvent) + Send + Sync + 'static,
    {
        self.outcomes.subscribe(callback)
    }
}
