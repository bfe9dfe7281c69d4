// Transport strategy: one invoke contract, two implementations.
//
// The embedder picks a transport once at startup (see `Mode::detect`) and
// hands it to `CommandRouter`; no other code branches on the environment.

use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use tokio::sync::broadcast;

use super::endpoints::{self, HttpMethod};
use super::{Args, InvokeError};

/// Suppress repeated unauthorized signals fired within this window.
/// Repeated 401s during a failure storm would otherwise make the
/// re-authentication UI flicker.
const AUTH_ERROR_DEBOUNCE: Duration = Duration::from_millis(2000);

/// The in-process invocation primitive exposed by the embedded host.
/// Opaque to the bridge: failures come back as the host's own string and are
/// rethrown to callers unchanged.
pub trait NativeHost: Send + Sync {
    fn call<'a>(
        &'a self,
        command: &'a str,
        args: Option<&'a Args>,
    ) -> BoxFuture<'a, Result<Value, String>>;
}

/// Shared invoke contract for both execution environments.
pub trait Transport: Send + Sync {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: Option<&'a Args>,
    ) -> BoxFuture<'a, Result<Value, InvokeError>>;
}

/// Native mode: delegate to the host primitive with the command name
/// verbatim. The endpoint registry is never consulted here.
pub struct NativeTransport {
    host: Arc<dyn NativeHost>,
}

impl NativeTransport {
    pub fn new(host: Arc<dyn NativeHost>) -> Self {
        Self { host }
    }
}

impl Transport for NativeTransport {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: Option<&'a Args>,
    ) -> BoxFuture<'a, Result<Value, InvokeError>> {
        async move {
            match self.host.call(command, args).await {
                Ok(value) => Ok(value),
                Err(e) => {
                    log::error!("Native invoke failed for {command}: {e}");
                    Err(InvokeError::Native(e))
                }
            }
        }
        .boxed()
    }
}

/// Remote mode: translate commands into HTTP requests against the REST
/// deployment. Holds the session token slot, the auth-error debounce state
/// and the unauthorized broadcast channel; exactly one instance exists per
/// running process.
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
    token: RwLock<Option<String>>,
    last_auth_error: Mutex<Option<Instant>>,
    unauthorized_tx: broadcast::Sender<()>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let (unauthorized_tx, _) = broadcast::channel(16);
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            token: RwLock::new(None),
            last_auth_error: Mutex::new(None),
            unauthorized_tx,
        }
    }

    /// Store the admin API key for the rest of the session. Attached to
    /// every subsequent request as `Authorization: Bearer` plus the
    /// redundant `x-api-key` header the proxy also accepts.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap() = None;
    }

    /// Observe the one-shot unauthorized signal (no payload). Broadcast on
    /// repeated 401s, debounced; the app listens to trigger re-login.
    pub fn subscribe_unauthorized(&self) -> broadcast::Receiver<()> {
        self.unauthorized_tx.subscribe()
    }

    // Read and update of the debounce state happen under one lock hold, so
    // concurrent 401s cannot both pass the window check.
    fn note_auth_error(&self) {
        let mut last = self.last_auth_error.lock().unwrap();
        let now = Instant::now();
        let expired = last.map_or(true, |at| now.duration_since(at) > AUTH_ERROR_DEBOUNCE);
        if expired {
            *last = Some(now);
            // No active receivers is fine
            let _ = self.unauthorized_tx.send(());
        }
    }

    async fn send(&self, command: &str, args: Option<&Args>) -> Result<Value, InvokeError> {
        let endpoint = endpoints::lookup(command).ok_or_else(|| {
            log::error!("Command \"{command}\" is not mapped for remote mode");
            InvokeError::UnmappedCommand(command.to_string())
        })?;

        let url = format!("{}{}", self.base_url, substitute_path(endpoint.url, args));

        let mut request = match endpoint.method {
            HttpMethod::Get => {
                let mut req = self.http.get(&url);
                if let Some(args) = args {
                    // Path-substituted keys are not removed from args, so a
                    // path param shows up again as a query param. The
                    // backend tolerates the duplicate; preserved as is.
                    let pairs: Vec<(&str, String)> = args
                        .iter()
                        .filter(|(_, value)| !value.is_null())
                        .map(|(key, value)| (key.as_str(), stringify(value)))
                        .collect();
                    if !pairs.is_empty() {
                        req = req.query(&pairs);
                    }
                }
                req
            }
            HttpMethod::Post => {
                let mut req = self.http.post(&url);
                if let Some(args) = args {
                    let body = serde_json::to_string(args)
                        .map_err(|e| InvokeError::Request(e.to_string()))?;
                    req = req.body(body);
                }
                req
            }
            // No body regardless of args beyond path substitution
            HttpMethod::Delete => self.http.delete(&url),
        };

        request = request.header("Content-Type", "application/json");
        if let Some(token) = self.token.read().unwrap().clone() {
            request = request
                .header("Authorization", format!("Bearer {token}"))
                .header("x-api-key", token);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("Request failed for {command}: {e}");
            InvokeError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.note_auth_error();
            }
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("HTTP Error {}", status.as_u16()));
            return Err(InvokeError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let text = response.text().await.map_err(|e| {
            log::error!("Failed to read response for {command}: {e}");
            InvokeError::Request(e.to_string())
        })?;
        if text.is_empty() {
            return Ok(Value::Null);
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(_) => {
                // Success with a malformed body degrades to raw text
                log::warn!("Non-JSON response for {command}, returning raw text");
                Ok(Value::String(text))
            }
        }
    }
}

impl Transport for HttpTransport {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: Option<&'a Args>,
    ) -> BoxFuture<'a, Result<Value, InvokeError>> {
        self.send(command, args).boxed()
    }
}

/// Replace `:key` placeholder segments with the percent-encoded arg value,
/// by exact key match. Keys used here stay in `args`; the serialization
/// step sees them again. Placeholders with no matching key are left as is.
fn substitute_path(template: &str, args: Option<&Args>) -> String {
    let Some(args) = args else {
        return template.to_string();
    };
    template
        .split('/')
        .map(|segment| {
            segment
                .strip_prefix(':')
                .and_then(|key| args.get(key))
                .map(|value| urlencoding::encode(&stringify(value)).into_owned())
                .unwrap_or_else(|| segment.to_string())
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Loose stringification matching what the web console sends: strings pass
/// through unquoted, everything else renders as its JSON text.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn args_of(value: Value) -> Args {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn substitutes_exact_keys_only() {
        let args = args_of(json!({ "accountId": "x1", "account": "nope" }));
        assert_eq!(
            substitute_path("/api/accounts/:accountId/quota", Some(&args)),
            "/api/accounts/x1/quota"
        );
    }

    #[test]
    fn substitutes_multiple_placeholders() {
        let args = args_of(json!({ "accountId": "a1", "versionId": "v2" }));
        assert_eq!(
            substitute_path(
                "/api/accounts/:accountId/device-versions/:versionId/restore",
                Some(&args)
            ),
            "/api/accounts/a1/device-versions/v2/restore"
        );
    }

    #[test]
    fn missing_args_leave_template_untouched() {
        assert_eq!(
            substitute_path("/api/accounts/:accountId", None),
            "/api/accounts/:accountId"
        );
    }

    #[test]
    fn path_values_are_percent_encoded() {
        let args = args_of(json!({ "id": "a b/c" }));
        assert_eq!(
            substitute_path("/api/security/blacklist/:id", Some(&args)),
            "/api/security/blacklist/a%20b%2Fc"
        );
    }

    #[test]
    fn stringify_matches_console_rendering() {
        assert_eq!(stringify(&json!("plain")), "plain");
        assert_eq!(stringify(&json!(42)), "42");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&Value::Null), "null");
    }
}
