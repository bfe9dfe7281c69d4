//! Command and diagnostics bridge for the ABV management console.
//!
//! The UI issues named commands (`switch_account`, `save_config`, ...) that
//! must work unmodified against two deployments: the embedded native host,
//! reachable only through an in-process invocation primitive, and a remote
//! REST server, reachable only over HTTP. [`CommandRouter`] owns that
//! translation; [`Diagnostics`] captures uncaught UI failures and ships them
//! to the backend through the same router.
//!
//! The transport is chosen once at startup ([`Mode::detect`]) and injected
//! into the router; nothing else in the crate branches on the environment.

pub mod diagnostics;
pub mod environment;
pub mod router;

pub use diagnostics::{Diagnostics, LogLevel};
pub use environment::Mode;
pub use router::transport::{HttpTransport, NativeHost, NativeTransport, Transport};
pub use router::{Args, CommandRouter, InvokeError};
