//! Command router: the single entry point through which the UI reaches the
//! backend, whichever environment it is deployed in.

pub mod endpoints;
pub mod transport;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use transport::{HttpTransport, NativeHost, NativeTransport, Transport};

/// Invoke arguments: a flat JSON object, or absent.
pub type Args = Map<String, Value>;

/// Failure classification for `invoke`.
///
/// Display is deliberately transparent: the historical contract rejected
/// with bare strings (the native host's own failure, the backend's `error`
/// field, or a synthetic `HTTP Error <status>`), and call sites render the
/// rejection value directly. The enum adds structure without changing what
/// the user sees.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The native call primitive rejected; carries its failure verbatim.
    #[error("{0}")]
    Native(String),
    /// Remote mode with no registry entry for the command. A configuration
    /// defect, surfaced immediately and never retried.
    #[error("Command \"{0}\" not supported in remote mode")]
    UnmappedCommand(String),
    /// The HTTP request could not be sent or its body could not be read.
    #[error("{0}")]
    Request(String),
    /// Non-success HTTP status. `message` is the backend's `error` field
    /// when the body carried one, otherwise synthesized from the status.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// `invoke_as` only: the resolved value did not match the caller's type.
    #[error("Invalid response for \"{command}\": {message}")]
    Decode { command: String, message: String },
}

/// Routes named commands to the transport chosen at startup. Constructed
/// once and passed by reference to call sites; concurrent invokes share no
/// mutable state and complete in any order.
pub struct CommandRouter {
    transport: Arc<dyn Transport>,
}

impl CommandRouter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Router for the embedded environment, wrapping the host primitive.
    pub fn native(host: Arc<dyn NativeHost>) -> Self {
        Self::new(Arc::new(NativeTransport::new(host)))
    }

    /// Router for a remote deployment.
    pub fn remote(http: Arc<HttpTransport>) -> Self {
        Self::new(http)
    }

    /// Issue a named command. Resolution of the command name is entirely
    /// owned by the bridge; callers treat it as opaque.
    ///
    /// Resolves to `Value::Null` for 204/empty responses and to the raw
    /// response text when a successful body is not valid JSON. No retries,
    /// no app-level timeout; a stalled transport stalls the caller.
    pub async fn invoke(&self, command: &str, args: Option<&Args>) -> Result<Value, InvokeError> {
        self.transport.invoke(command, args).await
    }

    /// `invoke` plus a typed decode of the resolved value.
    pub async fn invoke_as<T: DeserializeOwned>(
        &self,
        command: &str,
        args: Option<&Args>,
    ) -> Result<T, InvokeError> {
        let value = self.invoke(command, args).await?;
        serde_json::from_value(value).map_err(|e| InvokeError::Decode {
            command: command.to_string(),
            message: e.to_string(),
        })
    }
}
