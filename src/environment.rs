// Execution environment detection: embedded native host vs remote deployment.

use std::env;

/// Marker injected into the process environment by the embedded host.
const NATIVE_HOST_MARKER: &str = "ABV_NATIVE_HOST";
/// Marker name used by hosts predating the v2 launcher.
const LEGACY_HOST_MARKER: &str = "ABV_HOST";

/// The execution context the console is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Embedded in the native host; commands go through the in-process
    /// invocation primitive.
    Native,
    /// Running against a remote deployment; commands go over HTTP.
    Remote,
}

impl Mode {
    /// Classify the running context from host-injected markers.
    ///
    /// Pure check with no error conditions; absence of markers means
    /// `Remote`. Callers evaluate this once at startup and construct the
    /// matching transport — the result is constant for the process lifetime.
    pub fn detect() -> Mode {
        Mode::from_markers(
            env::var_os(NATIVE_HOST_MARKER).is_some(),
            env::var_os(LEGACY_HOST_MARKER).is_some(),
        )
    }

    fn from_markers(native_marker: bool, legacy_marker: bool) -> Mode {
        if native_marker || legacy_marker {
            Mode::Native
        } else {
            Mode::Remote
        }
    }

    pub fn is_native(self) -> bool {
        self == Mode::Native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn either_marker_means_native() {
        assert_eq!(Mode::from_markers(true, false), Mode::Native);
        assert_eq!(Mode::from_markers(false, true), Mode::Native);
        assert_eq!(Mode::from_markers(true, true), Mode::Native);
    }

    #[test]
    fn no_markers_means_remote() {
        assert_eq!(Mode::from_markers(false, false), Mode::Remote);
        assert!(!Mode::from_markers(false, false).is_native());
    }
}
