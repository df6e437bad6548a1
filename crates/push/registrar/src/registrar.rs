//! Token registration.

use push_core::{Listeners, RecipientToken, Subscription};

use crate::{
    ChannelConfig, Endpoint, NotificationResponse, Platform, ReceivedNotification, TokenIssuer,
    TokenRequest,
};

/// Registration settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegistrationConfig {
    /// Project identifier tokens are issued under.
    pub project_id: String,
    /// Token issuance endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_token_url() -> String {
    "https://exp.host/--/api/v2/push/getExpoPushToken".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl RegistrationConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            token_url: default_token_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Why registration failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("push notifications require a physical device")]
    UnsupportedEndpoint,
    #[error("notification permission not granted")]
    PermissionDenied,
    #[error("permission query failed: {0}")]
    Platform(String),
    #[error("token issuance failed: {0}")]
    TokenIssuance(String),
}

/// Obtains the gateway token of the current endpoint.
pub struct Registrar<E, I> {
    endpoint: E,
    issuer: I,
    project_id: String,
    channel: ChannelConfig,
    received: Listeners<ReceivedNotification>,
    responses: Listeners<NotificationResponse>,
}

impl<E, I> Registrar<E, I>
where
    E: Endpoint,
    I: TokenIssuer,
{
    /// Create a registrar issuing tokens under `project_id`.
    pub fn new(endpoint: E, issuer: I, project_id: impl Into<String>) -> Self {
        Self {
            endpoint,
            issuer,
            project_id: project_id.into(),
            channel: ChannelConfig::default(),
            received: Listeners::new(),
            responses: Listeners::new(),
        }
    }

    /// Use a different delivery channel.
    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    /// Obtain the token for this endpoint, asking for permission if needed.
    pub async fn register(&self) -> Result<RecipientToken, RegistrationError> {
        if !self.endpoint.is_physical() {
            tracing::warn!("push notifications are not supported on simulators");
            return Err(RegistrationError::UnsupportedEndpoint);
        }

        let existing = self
            .endpoint
            .permission_status()
            .await
            .map_err(|e| RegistrationError::Platform(format!("{e:#}")))?;
        tracing::debug!(status = ?existing, "existing notification permission");

        let status = if existing.is_granted() {
            existing
        } else {
            tracing::info!("requesting notification permission");
            self.endpoint
                .request_permission()
                .await
                .map_err(|e| RegistrationError::Platform(format!("{e:#}")))?
        };

        if !status.is_granted() {
            tracing::warn!(status = ?status, "notification permission not granted");
            return Err(RegistrationError::PermissionDenied);
        }

        let platform = self.endpoint.platform();
        if platform == Platform::Android {
            match self.endpoint.ensure_channel(&self.channel).await {
                Ok(()) => tracing::debug!(channel = %self.channel.id, "notification channel ready"),
                Err(e) => {
                    tracing::warn!(channel = %self.channel.id, error = %e, "failed to set up notification channel")
                }
            }
        }

        let request = TokenRequest {
            project_id: &self.project_id,
            platform,
            device: self.endpoint.device(),
        };
        let token = self
            .issuer
            .issue_token(&request)
            .await
            .map_err(|e| RegistrationError::TokenIssuance(format!("{e:#}")))?;

        tracing::info!(token = %token, "registered for push notifications");
        Ok(token)
    }

    /// Subscribe to notifications received on this endpoint.
    pub fn on_received<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ReceivedNotification) + Send + Sync + 'static,
    {
        self.received.subscribe(callback)
    }

    /// Subscribe to user responses to notifications.
    pub fn on_response<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&NotificationResponse) + Send + Sync + 'static,
    {
        self.responses.subscribe(callback)
    }

    /// Report a notification received by the host platform.
    pub fn notify_received(&self, notification: &ReceivedNotification) {
        tracing::debug!(title = ?notification.title, "notification received");
        self.received.emit(notification);
    }

    /// Report a user response captured by the host platform.
    pub fn notify_response(&self, response: &NotificationResponse) {
        tracing::debug!(action = %response.action_identifier, "notification response");
        self.responses.emit(response);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use color_eyre::eyre::eyre;

    use super::*;
    use crate::{DeviceIdentity, PermissionStatus};

    struct StubEndpoint {
        physical: bool,
        platform: Platform,
        status: Mutex<PermissionStatus>,
        grant: PermissionStatus,
        channel_fails: bool,
        device: DeviceIdentity,
        requests: AtomicUsize,
        channels: AtomicUsize,
    }

    impl StubEndpoint {
        fn new(status: PermissionStatus) -> Self {
            Self {
                physical: true,
                platform: Platform::Android,
                status: Mutex::new(status),
                grant: PermissionStatus::Granted,
                channel_fails: false,
                device: DeviceIdentity {
                    device_id: "device-1".to_string(),
                    app_id: "com.example.demo".to_string(),
                    native_token: "native".to_string(),
                    development: false,
                },
                requests: AtomicUsize::new(0),
                channels: AtomicUsize::new(0),
            }
        }
    }

    impl Endpoint for StubEndpoint {
        fn is_physical(&self) -> bool {
            self.physical
        }

        fn platform(&self) -> Platform {
            self.platform
        }

        fn device(&self) -> &DeviceIdentity {
            &self.device
        }

        async fn permission_status(&self) -> color_eyre::eyre::Result<PermissionStatus> {
            Ok(*self.status.lock().unwrap())
        }

        async fn request_permission(&self) -> color_eyre::eyre::Result<PermissionStatus> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            *self.status.lock().unwrap() = self.grant;
            Ok(self.grant)
        }

        async fn ensure_channel(&self, _channel: &ChannelConfig) -> color_eyre::eyre::Result<()> {
            self.channels.fetch_add(1, Ordering::SeqCst);
            if self.channel_fails {
                return Err(eyre!("channel service unavailable"));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct StubIssuer {
        calls: AtomicUsize,
        project: Mutex<Option<String>>,
    }

    impl TokenIssuer for StubIssuer {
        async fn issue_token(
            &self,
            request: &TokenRequest<'_>,
        ) -> color_eyre::eyre::Result<RecipientToken> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.project.lock().unwrap() = Some(request.project_id.to_string());
            Ok(RecipientToken::new("ExponentPushToken[stub]")?)
        }
    }

    #[tokio::test]
    async fn test_register_with_existing_permission() {
        let registrar = Registrar::new(
            StubEndpoint::new(PermissionStatus::Granted),
            StubIssuer::default(),
            "project-1",
        );

        let token = registrar.register().await.unwrap();

        assert_eq!(token.as_str(), "ExponentPushToken[stub]");
        assert_eq!(registrar.endpoint().requests.load(Ordering::SeqCst), 0);
        assert_eq!(registrar.endpoint().channels.load(Ordering::SeqCst), 1);
        assert_eq!(
            registrar.issuer().project.lock().unwrap().as_deref(),
            Some("project-1")
        );
    }

    #[tokio::test]
    async fn test_register_requests_permission() {
        let registrar = Registrar::new(
            StubEndpoint::new(PermissionStatus::Undetermined),
            StubIssuer::default(),
            "project-1",
        );

        assert!(registrar.register().await.is_ok());
        assert_eq!(registrar.endpoint().requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_permission_denied_skips_issuer() {
        let mut endpoint = StubEndpoint::new(PermissionStatus::Undetermined);
        endpoint.grant = PermissionStatus::Denied;
        let registrar = Registrar::new(endpoint, StubIssuer::default(), "project-1");

        assert_eq!(
            registrar.register().await,
            Err(RegistrationError::PermissionDenied)
        );
        assert_eq!(registrar.issuer().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_simulator_unsupported() {
        let mut endpoint = StubEndpoint::new(PermissionStatus::Granted);
        endpoint.physical = false;
        let registrar = Registrar::new(endpoint, StubIssuer::default(), "project-1");

        assert_eq!(
            registrar.register().await,
            Err(RegistrationError::UnsupportedEndpoint)
        );
        assert_eq!(registrar.issuer().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_channel_failure_is_not_fatal() {
        let mut endpoint = StubEndpoint::new(PermissionStatus::Granted);
        endpoint.channel_fails = true;
        let registrar = Registrar::new(endpoint, StubIssuer::default(), "project-1");

        assert!(registrar.register().await.is_ok());
        assert_eq!(registrar.endpoint().channels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ios_skips_channel() {
        let mut endpoint = StubEndpoint::new(PermissionStatus::Granted);
        endpoint.platform = Platform::Ios;
        let registrar = Registrar::new(endpoint, StubIssuer::default(), "project-1");

        assert!(registrar.register().await.is_ok());
        assert_eq!(registrar.endpoint().channels.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_received_listeners() {
        let registrar = Registrar::new(
            StubEndpoint::new(PermissionStatus::Granted),
            StubIssuer::default(),
            "project-1",
        );
        let titles = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&titles);
        let sub = registrar.on_received(move |n| {
            seen.lock().unwrap().push(n.title.clone());
        });

        let notification = ReceivedNotification {
            title: Some("Demo Notification".to_string()),
            body: None,
            data: Default::default(),
        };
        registrar.notify_received(&notification);
        sub.unsubscribe();
        registrar.notify_received(&notification);

        assert_eq!(
            *titles.lock().unwrap(),
            vec![Some("Demo Notification".to_string())]
        );
    }

    #[test]
    fn test_response_listeners() {
        let registrar = Registrar::new(
            StubEndpoint::new(PermissionStatus::Granted),
            StubIssuer::default(),
            "project-1",
        );
        let actions = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&actions);
        let _sub = registrar.on_response(move |r| {
            seen.lock().unwrap().push(r.action_identifier.clone());
        });
        let _other = registrar.on_received(|_| panic!("no notification was received"));

        registrar.notify_response(&NotificationResponse {
            action_identifier: "default".to_string(),
            notification: ReceivedNotification {
                title: Some("Demo Notification".to_string()),
                body: Some("This is a test notification!".to_string()),
                data: Default::default(),
            },
        });

        assert_eq!(*actions.lock().unwrap(), vec!["default".to_string()]);
    }
}
