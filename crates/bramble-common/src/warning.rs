//! Engine warnings with colored terminal output.
//!
//! The cascade and layout stages never abort on a bad declaration; they
//! degrade per-property and report what they dropped through this channel.
//! Messages are deduplicated process-wide so a stylesheet that uses `%`
//! lengths on every element produces one line of output, not hundreds.

use std::collections::HashSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Messages already reported, kept for deduplication.
static REPORTED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report an unsupported feature or recoverable value error.
///
/// Prints once per unique `(component, message)` pair.
///
/// # Example
/// ```ignore
/// warn_once("css", "percent-based sizing is not supported: 'width: 50%'");
/// ```
///
/// # Panics
/// Panics if the warning-set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let first_report = REPORTED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_report {
        eprintln!("{YELLOW}[bramble {component}] warning: {message}{RESET}");
    }
}

/// Forget all recorded warnings (call when loading a new document).
///
/// # Panics
/// Panics if the warning-set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = REPORTED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the warning set is process-global, so separate tests
    // would race each other under the parallel test runner.
    #[test]
    fn test_warn_once_records_and_clears() {
        clear_warnings();
        warn_once("test", "same message");
        warn_once("test", "same message");
        assert!(
            REPORTED
                .lock()
                .unwrap()
                .as_ref()
                .unwrap()
                .contains("[test] same message")
        );

        clear_warnings();
        assert!(
            REPORTED
                .lock()
                .unwrap()
                .as_ref()
                .is_none_or(HashSet::is_empty)
        );
    }
}
