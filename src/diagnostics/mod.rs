//! Diagnostics forwarder: captures failures the UI did not handle and ships
//! them to the backend log through the command router.
//!
//! The forwarder is the one component that must fully absorb its own
//! failures — a broken log pipeline must never become a second source of
//! errors.

use std::backtrace::Backtrace;
use std::fmt::Display;
use std::panic;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::router::{Args, CommandRouter};

/// Fixed backend command that persists a frontend log entry.
const LOG_COMMAND: &str = "frontend_log";

/// Identical entries inside this window are dropped.
const DEDUP_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
        }
    }
}

struct DedupState {
    last_signature: String,
    last_at: Option<Instant>,
}

/// One instance per running process, created at startup alongside the
/// router. The dedup state lives here rather than in module globals.
pub struct Diagnostics {
    dedup: Mutex<DedupState>,
    entries: mpsc::UnboundedSender<Args>,
}

impl Diagnostics {
    /// Must be called from within a Tokio runtime; a single forwarder task
    /// drains captured entries so capture sites never block and never touch
    /// the runtime directly. A capture after runtime shutdown (a late panic
    /// during teardown, say) degrades to a silent drop.
    pub fn new(router: Arc<CommandRouter>) -> Arc<Self> {
        let (entries, mut rx) = mpsc::unbounded_channel::<Args>();
        tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                // Swallow forwarding failures, including invoke itself
                // failing; a dead backend must not loop us forever.
                if let Err(e) = router.invoke(LOG_COMMAND, Some(&entry)).await {
                    log::trace!("Dropped frontend log entry: {e}");
                }
            }
        });
        Arc::new(Self {
            dedup: Mutex::new(DedupState {
                last_signature: String::new(),
                last_at: None,
            }),
            entries,
        })
    }

    /// Subscribe to uncaught synchronous failures (panics), then send one
    /// info breadcrumb so the backend log stream shows liveness even for a
    /// frontend that renders nothing and never errors.
    pub fn install(self: &Arc<Self>) {
        let diagnostics = Arc::clone(self);
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let message = panic_message(info);
            let backtrace = Backtrace::force_capture().to_string();
            diagnostics.capture(LogLevel::Error, &message, Some(&backtrace));
            previous(info);
        }));

        self.capture(LogLevel::Info, "Frontend initialized", None);
    }

    /// Report failures of a background task nothing else awaits. Both an
    /// `Err` result and a task panic are captured as error entries.
    pub fn watch<T, E>(self: &Arc<Self>, handle: JoinHandle<Result<T, E>>)
    where
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let diagnostics = Arc::clone(self);
        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => diagnostics.capture(
                    LogLevel::Error,
                    &format!("Unhandled task failure: {e}"),
                    None,
                ),
                Err(e) => diagnostics.capture(
                    LogLevel::Error,
                    &format!("Unhandled task panic: {e}"),
                    None,
                ),
            }
        });
    }

    /// Explicit capture hook; render-failure boundaries call this directly.
    /// Never returns an error and never panics.
    pub fn capture(&self, level: LogLevel, message: &str, stack: Option<&str>) {
        if !self.should_forward(level, message, stack) {
            return;
        }
        // Fails only once the forwarder is gone; swallowed either way
        let _ = self.entries.send(log_args(level, message, stack));
    }

    // Deduplicate bursts (common for render loops). Decision and state
    // update happen under a single lock hold. A dropped duplicate does not
    // refresh `last_at`, so the window is measured from the first
    // occurrence rather than sliding forever.
    fn should_forward(&self, level: LogLevel, message: &str, stack: Option<&str>) -> bool {
        let signature = format!("{}:{}:{}", level.as_str(), message, stack.unwrap_or(""));
        let mut state = self.dedup.lock().unwrap();
        let now = Instant::now();
        if state.last_signature == signature {
            if let Some(at) = state.last_at {
                if now.duration_since(at) < DEDUP_WINDOW {
                    return false;
                }
            }
        }
        state.last_signature = signature;
        state.last_at = Some(now);
        true
    }
}

fn log_args(level: LogLevel, message: &str, stack: Option<&str>) -> Args {
    let mut args = Map::new();
    args.insert("level".to_string(), Value::String(level.as_str().to_string()));
    args.insert("message".to_string(), Value::String(message.to_string()));
    if let Some(stack) = stack {
        args.insert("stack".to_string(), Value::String(stack.to_string()));
    }
    args
}

fn panic_message(info: &panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    };
    match info.location() {
        Some(location) => format!("{message} ({location})"),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn log_args_omits_absent_stack() {
        let entry = log_args(LogLevel::Warn, "slow render", None);
        assert_eq!(
            Value::Object(entry),
            json!({ "level": "warn", "message": "slow render" })
        );
    }

    #[test]
    fn log_args_includes_stack_when_present() {
        let entry = log_args(LogLevel::Error, "boom", Some("at render"));
        assert_eq!(
            Value::Object(entry),
            json!({ "level": "error", "message": "boom", "stack": "at render" })
        );
    }

    #[test]
    fn levels_serialize_lowercase() {
        assert_eq!(LogLevel::Error.as_str(), "error");
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Info.as_str(), "info");
    }
}
