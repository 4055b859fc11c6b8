//! API gateway: the single choke point for outbound calls.
//!
//! Every call made by the dashboard flows through here. The gateway attaches
//! the current bearer credential, collapses envelope responses to their
//! payload, and on authentication rejection tears the session down itself.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::auth::CredentialStore;
use crate::shell::{Navigator, Notifier};

use super::error::ApiError;
use super::transport::{Method, RequestOptions, Transport, TransportError};

/// Fallback user-facing text for failures that carry no message at all
const FALLBACK_FAILURE_MESSAGE: &str = "Request failed";

pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    base_url: String,
    login_path: String,
}

impl ApiGateway {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        base_url: impl Into<String>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            navigator,
            notifier,
            base_url: base_url.into(),
            login_path: login_path.into(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::Get, path, None, RequestOptions::default())
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::Post, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::Put, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::Delete, path, None, RequestOptions::default())
            .await
    }

    /// Issue a call through the full request/response pipeline.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        mut options: RequestOptions,
    ) -> Result<T, ApiError> {
        let token = self.credentials.token();
        if !token.is_empty() {
            options.bearer_token = Some(token);
        }

        let url = format!("{}{}", self.base_url, path);
        match self.transport.request(method, &url, body, options).await {
            Ok(payload) => Ok(serde_json::from_value(unwrap_envelope(payload))?),
            Err(error) => Err(self.handle_failure(error)),
        }
    }

    /// Normalize a failed call. The call stays failed in every branch; retry
    /// policy belongs to the caller.
    fn handle_failure(&self, error: TransportError) -> ApiError {
        let message = error
            .server_message()
            .map(str::to_string)
            .or_else(|| (!error.message.is_empty()).then(|| error.message.clone()))
            .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_string());

        // The current-path check makes the teardown idempotent: once the
        // shell is at the login view, further 401s change nothing.
        if error.status == Some(401) && self.navigator.current_path() != self.login_path {
            warn!("Authentication rejected, clearing session");
            self.credentials.clear_session();
            self.navigator.navigate(&self.login_path);
            return ApiError::Unauthorized(error);
        }

        self.notifier.show(&message);
        ApiError::Request { message, source: error }
    }
}

/// Collapse an API envelope to its payload.
///
/// An object carrying both a `code` and a `message` key is treated as an
/// envelope and replaced by its `data` member (null when absent); everything
/// else passes through unmodified. An application payload that happens to
/// carry both keys is misread as an envelope - callers rely on this exact
/// rule, so it must not be tightened.
fn unwrap_envelope(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.contains_key("code") && map.contains_key("message") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::auth::{CredentialStore, TOKEN_KEY, USERNAME_KEY, USER_ID_KEY};
    use crate::storage::{KeyValueStorage, MemoryStorage};

    type ScriptedResult = Result<Value, TransportError>;

    /// Transport that pops pre-scripted results and records what it saw.
    #[derive(Default)]
    struct ScriptedTransport {
        results: Mutex<VecDeque<ScriptedResult>>,
        seen_options: Mutex<Vec<RequestOptions>>,
        seen_urls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn returning(results: Vec<ScriptedResult>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn request(
            &self,
            _method: Method,
            url: &str,
            _body: Option<Value>,
            options: RequestOptions,
        ) -> Result<Value, TransportError> {
            self.seen_urls.lock().unwrap().push(url.to_string());
            self.seen_options.lock().unwrap().push(options);
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .expect("Transport called more times than scripted")
        }
    }

    /// Navigator that records every forced navigation.
    struct RecordingNavigator {
        path: Mutex<String>,
        navigations: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        fn at(path: &str) -> Self {
            Self {
                path: Mutex::new(path.to_string()),
                navigations: Mutex::new(Vec::new()),
            }
        }

        fn navigation_count(&self) -> usize {
            self.navigations.lock().unwrap().len()
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> String {
            self.path.lock().unwrap().clone()
        }

        fn navigate(&self, path: &str) {
            self.navigations.lock().unwrap().push(path.to_string());
            *self.path.lock().unwrap() = path.to_string();
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn show(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    struct Harness {
        gateway: ApiGateway,
        storage: Arc<MemoryStorage>,
        navigator: Arc<RecordingNavigator>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness(transport: ScriptedTransport, current_path: &str, logged_in: bool) -> Harness {
        let storage = Arc::new(MemoryStorage::new());
        if logged_in {
            storage.set(TOKEN_KEY, "tok");
            storage.set(USERNAME_KEY, "alice");
            storage.set(USER_ID_KEY, "7");
        }
        let navigator = Arc::new(RecordingNavigator::at(current_path));
        let notifier = Arc::new(RecordingNotifier::default());
        let credentials = Arc::new(CredentialStore::new(
            storage.clone(),
            navigator.clone(),
            "/login",
        ));
        let gateway = ApiGateway::new(
            Arc::new(transport),
            credentials,
            navigator.clone(),
            notifier.clone(),
            "http://127.0.0.1:8080/api",
            "/login",
        );
        Harness {
            gateway,
            storage,
            navigator,
            notifier,
        }
    }

    fn status_error(status: u16) -> TransportError {
        TransportError {
            status: Some(status),
            data: None,
            message: format!("Request failed with status {}", status),
        }
    }

    // ------------------------------------------------------------------
    // Envelope handling
    // ------------------------------------------------------------------

    #[test]
    fn test_unwrap_requires_both_code_and_message() {
        // Full envelope collapses to its data member
        let enveloped = json!({"code": 0, "message": "ok", "data": {"x": 1}});
        assert_eq!(unwrap_envelope(enveloped), json!({"x": 1}));

        // `code` without `message` is an ordinary payload
        let code_only = json!({"x": 1, "code": 7});
        assert_eq!(unwrap_envelope(code_only.clone()), code_only);

        // `message` without `code` likewise
        let message_only = json!({"message": "hello", "x": 1});
        assert_eq!(unwrap_envelope(message_only.clone()), message_only);
    }

    #[test]
    fn test_unwrap_envelope_without_data_yields_null() {
        let enveloped = json!({"code": 0, "message": "ok"});
        assert_eq!(unwrap_envelope(enveloped), Value::Null);
    }

    #[test]
    fn test_unwrap_leaves_non_objects_alone() {
        assert_eq!(unwrap_envelope(json!([1, 2, 3])), json!([1, 2, 3]));
        assert_eq!(unwrap_envelope(json!("plain")), json!("plain"));
        assert_eq!(unwrap_envelope(Value::Null), Value::Null);
    }

    // ------------------------------------------------------------------
    // Request phase
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_request_goes_unauthenticated_without_session() {
        let transport = Arc::new(ScriptedTransport::returning(vec![Ok(json!(null))]));
        let storage = Arc::new(MemoryStorage::new());
        let navigator = Arc::new(RecordingNavigator::at("/dashboard"));
        let credentials = Arc::new(CredentialStore::new(
            storage,
            navigator.clone(),
            "/login",
        ));
        let gateway = ApiGateway::new(
            transport.clone(),
            credentials,
            navigator,
            Arc::new(RecordingNotifier::default()),
            "http://127.0.0.1:8080/api",
            "/login",
        );

        let _: Value = gateway.get("/config").await.expect("call should succeed");

        let options = transport.seen_options.lock().unwrap();
        assert_eq!(options.len(), 1);
        assert!(options[0].bearer_token.is_none());
        let urls = transport.seen_urls.lock().unwrap();
        assert_eq!(urls[0], "http://127.0.0.1:8080/api/config");
    }

    #[tokio::test]
    async fn test_request_carries_bearer_with_session() {
        let transport = Arc::new(ScriptedTransport::returning(vec![Ok(json!(null))]));
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok");
        storage.set(USERNAME_KEY, "alice");
        storage.set(USER_ID_KEY, "7");
        let navigator = Arc::new(RecordingNavigator::at("/dashboard"));
        let credentials = Arc::new(CredentialStore::new(
            storage,
            navigator.clone(),
            "/login",
        ));
        let gateway = ApiGateway::new(
            transport.clone(),
            credentials,
            navigator,
            Arc::new(RecordingNotifier::default()),
            "http://127.0.0.1:8080/api",
            "/login",
        );

        let _: Value = gateway.get("/videos").await.expect("call should succeed");

        let options = transport.seen_options.lock().unwrap();
        assert_eq!(options[0].bearer_token.as_deref(), Some("tok"));
    }

    // ------------------------------------------------------------------
    // Failure phase
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_failure_message_prefers_server_message() {
        let error = TransportError {
            status: Some(400),
            data: Some(json!({"message": "name already taken"})),
            message: "Request failed with status 400".to_string(),
        };
        let transport = ScriptedTransport::returning(vec![Err(error)]);
        let h = harness(transport, "/videos", true);

        let result: Result<Value, _> = h.gateway.get("/videos").await;

        assert!(result.is_err());
        let messages = h.notifier.messages.lock().unwrap();
        assert_eq!(messages.as_slice(), ["name already taken"]);
    }

    #[tokio::test]
    async fn test_failure_message_falls_back_to_transport_text() {
        let transport = ScriptedTransport::returning(vec![Err(status_error(500))]);
        let h = harness(transport, "/videos", true);

        let result: Result<Value, _> = h.gateway.get("/videos").await;

        assert!(result.is_err());
        let messages = h.notifier.messages.lock().unwrap();
        assert_eq!(messages.as_slice(), ["Request failed with status 500"]);
    }

    #[tokio::test]
    async fn test_failure_message_fixed_fallback() {
        let error = TransportError {
            status: None,
            data: None,
            message: String::new(),
        };
        let transport = ScriptedTransport::returning(vec![Err(error)]);
        let h = harness(transport, "/videos", true);

        let result: Result<Value, _> = h.gateway.get("/videos").await;

        assert!(result.is_err());
        let messages = h.notifier.messages.lock().unwrap();
        assert_eq!(messages.as_slice(), [FALLBACK_FAILURE_MESSAGE]);
    }

    // ------------------------------------------------------------------
    // Forced logout
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_401_clears_session_and_navigates_once() {
        let transport = ScriptedTransport::returning(vec![Err(status_error(401))]);
        let h = harness(transport, "/videos", true);

        let result: Result<Value, _> = h.gateway.get("/videos").await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
        assert_eq!(h.storage.get(TOKEN_KEY), None);
        assert_eq!(h.storage.get(USERNAME_KEY), None);
        assert_eq!(h.storage.get(USER_ID_KEY), None);
        assert_eq!(h.navigator.current_path(), "/login");
        assert_eq!(h.navigator.navigation_count(), 1);
        // The teardown is silent; no notification fires
        assert!(h.notifier.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_401s_navigate_exactly_once() {
        let transport =
            ScriptedTransport::returning(vec![Err(status_error(401)), Err(status_error(401))]);
        let h = harness(transport, "/videos", true);

        let (a, b): (Result<Value, _>, Result<Value, _>) =
            tokio::join!(h.gateway.get("/videos"), h.gateway.get("/tasks"));

        // Both calls still fail; only one teardown happens
        assert!(a.is_err());
        assert!(b.is_err());
        assert_eq!(h.navigator.navigation_count(), 1);
        assert_eq!(h.storage.get(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_401_on_login_view_notifies_instead() {
        // A rejected login attempt surfaces its message rather than
        // redirecting the user to the page they are already on
        let error = TransportError {
            status: Some(401),
            data: Some(json!({"message": "invalid credentials"})),
            message: "Request failed with status 401".to_string(),
        };
        let transport = ScriptedTransport::returning(vec![Err(error)]);
        let h = harness(transport, "/login", false);

        let result: Result<Value, _> = h.gateway.post("/auth/login", &json!({})).await;

        assert!(matches!(result, Err(ApiError::Request { .. })));
        assert_eq!(h.navigator.navigation_count(), 0);
        let messages = h.notifier.messages.lock().unwrap();
        assert_eq!(messages.as_slice(), ["invalid credentials"]);
    }

    // ------------------------------------------------------------------
    // Typed decode
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_enveloped_response_decodes_to_type() {
        #[derive(serde::Deserialize)]
        struct Stats {
            total: i64,
        }

        let transport = ScriptedTransport::returning(vec![Ok(
            json!({"code": 0, "message": "ok", "data": {"total": 42}}),
        )]);
        let h = harness(transport, "/dashboard", true);

        let stats: Stats = h
            .gateway
            .get("/dashboard/stats")
            .await
            .expect("call should succeed");
        assert_eq!(stats.total, 42);
    }

    #[tokio::test]
    async fn test_unit_decodes_from_empty_envelope() {
        let transport =
            ScriptedTransport::returning(vec![Ok(json!({"code": 0, "message": "ok"}))]);
        let h = harness(transport, "/videos", true);

        let result: Result<(), _> = h.gateway.delete("/videos/3").await;
        assert!(result.is_ok());
    }
}
