// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ambient, call-site-implicit logging for a single unit of work.
//!
//! This module keeps at most one [`Log`] per thread in thread-local
//! storage, so code deep inside a call tree can append observations
//! without threading a handle through every signature. Two threads never
//! observe each other's slot; there is no process-wide shared log and no
//! locking.
//!
//! # Lifecycle
//!
//! ```rust
//! use steplog::ambient;
//!
//! ambient::start_tag("validation");
//! ambient::log("input_valid", true);
//! ambient::tag("authorization");
//! ambient::log("user_role", "admin".to_string());
//!
//! let lines = ambient::close_default();
//! assert_eq!(
//!     lines,
//!     vec![
//!         "validation_input_valid: true".to_string(),
//!         "authorization_user_role: \"admin\"".to_string(),
//!     ]
//! );
//! // The slot is now empty; a second close yields an empty list.
//! assert!(ambient::close_default().is_empty());
//! ```
//!
//! # Failure semantics
//!
//! Operations split into two classes when no log is active:
//!
//! - [`tag`] panics. Extending a log that was never started is a broken
//!   lifecycle contract, and surfacing it loudly beats silently losing a
//!   section boundary.
//! - Everything else degrades gracefully: [`log`] and friends no-op,
//!   [`trace`] passes its value through untouched, [`tag_silent`] does
//!   nothing. This keeps optional instrumentation safe to leave in code
//!   paths that sometimes run without a log.
//!
//! The fire-and-forget pair [`record`]/[`record_in`] goes one step
//! further and starts a log on demand; callers using them must still
//! [`close`] eventually, or the slot leaks into the next unit of work
//! that reuses the thread.
//!
//! Prefer [`wrap`] when the unit of work has a single entry point: it
//! starts, runs, and always clears the slot, even when the body panics.

use std::cell::RefCell;
use std::fmt::Debug;

use crate::model::Log;
use crate::value::{debug_format, ValueFormatter};

thread_local! {
    static ACTIVE: RefCell<Option<Log>> = const { RefCell::new(None) };
}

/// Rewrites the slot through `f` if a log is active; no-op otherwise.
fn update(f: impl FnOnce(Log) -> Log) {
    ACTIVE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(log) = slot.take() {
            *slot = Some(f(log));
        }
    });
}

/// Rewrites the slot through `f`, starting from an empty log if none is
/// active. Used by the auto-initializing operations only.
fn update_or_init(f: impl FnOnce(Log) -> Log) {
    ACTIVE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let log = slot.take().unwrap_or_default();
        *slot = Some(f(log));
    });
}

/// Starts a fresh log with no sections, replacing any active log.
pub fn start() {
    ACTIVE.with(|slot| *slot.borrow_mut() = Some(Log::new()));
}

/// Starts a fresh log with one empty section, replacing any active log.
pub fn start_tag(tag: impl Into<String>) {
    ACTIVE.with(|slot| *slot.borrow_mut() = Some(Log::with_tag(tag)));
}

/// Opens a new section in the active log.
///
/// # Panics
///
/// Panics if no log is active — calling `tag` before `start` is a
/// lifecycle bug in the caller. Use [`tag_silent`] where running without
/// a log is legitimate.
pub fn tag(tag: impl Into<String>) {
    ACTIVE.with(|slot| {
        let mut slot = slot.borrow_mut();
        match slot.take() {
            Some(log) => *slot = Some(log.tag(tag)),
            None => panic!("steplog: ambient::tag called with no active log; call start() first"),
        }
    });
}

/// Opens a new section if a log is active; does nothing otherwise.
///
/// This is the entry-tagging operation used by [`crate::intercept`], so
/// that an intercepted function never breaks a caller that did not start
/// logging.
pub fn tag_silent(tag: impl Into<String>) {
    update(|log| log.tag(tag));
}

/// Appends a labeled entry to the active log; no-op without one.
pub fn log<T>(label: impl Into<String>, value: T)
where
    T: Debug + Send + Sync + 'static,
{
    update(|l| l.append(label, value));
}

/// Appends a labeled entry with its own formatter; no-op without a log.
pub fn log_with<T, F>(label: impl Into<String>, value: T, formatter: F)
where
    T: Debug + Send + Sync + 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    update(|l| l.append_with(label, value, formatter));
}

/// Appends an auto-labeled (`step_N`) entry; no-op without a log.
pub fn log_auto<T>(value: T)
where
    T: Debug + Send + Sync + 'static,
{
    update(|l| l.append_auto(value));
}

/// Appends every pair in input order; no-op without a log.
pub fn log_all<I, S, T>(pairs: I)
where
    I: IntoIterator<Item = (S, T)>,
    S: Into<String>,
    T: Debug + Send + Sync + 'static,
{
    update(|l| l.append_many(pairs));
}

/// Logs the value auto-labeled and returns it, for transparent use in
/// the middle of an expression or pipeline.
///
/// ```rust
/// use steplog::ambient;
///
/// ambient::start_tag("pricing");
/// let subtotal = ambient::trace(40u32 + 2);
/// assert_eq!(subtotal, 42);
/// assert_eq!(ambient::close_default(), vec!["pricing_step_0: 42".to_string()]);
/// ```
pub fn trace<T>(value: T) -> T
where
    T: Debug + Send + Sync + Clone + 'static,
{
    update(|l| l.append_auto(value.clone()));
    value
}

/// [`trace`] with an explicit label.
pub fn trace_as<T>(label: impl Into<String>, value: T) -> T
where
    T: Debug + Send + Sync + Clone + 'static,
{
    update(|l| l.append(label, value.clone()));
    value
}

/// [`trace_as`] with a per-entry formatter.
pub fn trace_with<T, F>(label: impl Into<String>, value: T, formatter: F) -> T
where
    T: Debug + Send + Sync + Clone + 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    update(|l| l.append_with(label, value.clone(), formatter));
    value
}

/// Logs the value under `label` and returns the `(label, value)` pair,
/// for identifying which branch produced a result in short-circuiting
/// control flow.
pub fn tagged<T>(label: impl Into<String>, value: T) -> (String, T)
where
    T: Debug + Send + Sync + Clone + 'static,
{
    let label = label.into();
    update(|l| l.append(label.clone(), value.clone()));
    (label, value)
}

/// [`tagged`] with a per-entry formatter.
pub fn tagged_with<T, F>(label: impl Into<String>, value: T, formatter: F) -> (String, T)
where
    T: Debug + Send + Sync + Clone + 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    let label = label.into();
    update(|l| l.append_with(label.clone(), value.clone(), formatter));
    (label, value)
}

/// Fire-and-forget append: starts a log (with the default section tag)
/// if none is active, then appends.
///
/// The implicit start means the slot now holds state; the caller is
/// responsible for an eventual [`close`].
pub fn record<T>(label: impl Into<String>, value: T)
where
    T: Debug + Send + Sync + 'static,
{
    update_or_init(|l| l.append(label, value));
}

/// Fire-and-forget append into a named section.
///
/// Starts a log with `tag` if none is active. If a log is active, opens
/// a new section only when `tag` differs from the current section's tag;
/// a matching tag reuses the current section.
pub fn record_in<T>(tag: impl Into<String>, label: impl Into<String>, value: T)
where
    T: Debug + Send + Sync + 'static,
{
    let tag = tag.into();
    update_or_init(|l| {
        let l = if l.current_tag() == Some(tag.as_str()) {
            l
        } else {
            l.tag(tag)
        };
        l.append(label, value)
    });
}

/// Clones the active log without clearing it, or `None`.
pub fn get() -> Option<Log> {
    // try_with: a thread in teardown simply has no active log.
    ACTIVE
        .try_with(|slot| slot.borrow().clone())
        .unwrap_or(None)
}

/// True if this thread currently holds an active log.
pub fn is_active() -> bool {
    ACTIVE
        .try_with(|slot| slot.borrow().is_some())
        .unwrap_or(false)
}

/// Extracts the active log, clears the slot, and serializes it.
///
/// Returns an empty list when no log is active, so closing twice is
/// harmless and yields `[]` the second time.
pub fn close(default: ValueFormatter) -> Vec<String> {
    ACTIVE.with(|slot| {
        slot.borrow_mut()
            .take()
            .map(|log| log.close(default))
            .unwrap_or_default()
    })
}

/// [`close`] with the [`debug_format`](crate::debug_format) default.
#[inline]
pub fn close_default() -> Vec<String> {
    close(debug_format)
}

/// Runs `body` inside a fresh ambient log and returns both its result
/// and the serialized log.
///
/// The slot is always cleared on exit: a panic in `body` clears it via
/// a drop guard and then propagates unchanged, so the next unit of work
/// on this thread never inherits a stale log. Any log active before the
/// call is replaced.
///
/// ```rust
/// use steplog::{ambient, debug_format};
///
/// let (total, lines) = ambient::wrap(
///     "pricing",
///     || {
///         ambient::log("base", 100u32);
///         ambient::log("discount", 10u32);
///         90u32
///     },
///     debug_format,
/// );
/// assert_eq!(total, 90);
/// assert_eq!(
///     lines,
///     vec!["pricing_base: 100".to_string(), "pricing_discount: 10".to_string()]
/// );
/// assert!(!ambient::is_active());
/// ```
pub fn wrap<R>(
    tag: impl Into<String>,
    body: impl FnOnce() -> R,
    default: ValueFormatter,
) -> (R, Vec<String>) {
    struct ClearGuard;
    impl Drop for ClearGuard {
        fn drop(&mut self) {
            let _ = ACTIVE.try_with(|slot| slot.borrow_mut().take());
        }
    }

    start_tag(tag);
    let guard = ClearGuard;
    let result = body();
    let lines = close(default);
    drop(guard);
    (result, lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each #[test] runs on its own thread, so the thread-local slot is
    // isolated per test without any setup.

    #[test]
    fn start_log_close_round() {
        start_tag("validation");
        log("input_valid", true);
        tag("authorization");
        log("user_role", "admin".to_string());
        assert_eq!(
            close_default(),
            vec![
                "validation_input_valid: true".to_string(),
                "authorization_user_role: \"admin\"".to_string(),
            ]
        );
    }

    #[test]
    fn second_close_yields_empty() {
        start_tag("s");
        log("a", 1);
        assert_eq!(close_default().len(), 1);
        assert!(close_default().is_empty());
        assert!(!is_active());
    }

    #[test]
    #[should_panic(expected = "no active log")]
    fn tag_without_start_panics() {
        tag("s");
    }

    #[test]
    fn tolerant_ops_noop_without_log() {
        log("a", 1);
        log_auto(2);
        log_all(vec![("b", 3)]);
        tag_silent("s");
        assert_eq!(trace(42), 42);
        assert_eq!(tagged("branch", true), ("branch".to_string(), true));
        assert!(!is_active());
        assert!(close_default().is_empty());
    }

    #[test]
    fn get_peeks_without_clearing() {
        start_tag("s");
        log("a", 1);
        let peeked = get().map(|l| l.close_default());
        assert_eq!(peeked, Some(vec!["s_a: 1".to_string()]));
        assert!(is_active());
        assert_eq!(close_default(), vec!["s_a: 1".to_string()]);
    }

    #[test]
    fn record_starts_with_default_tag() {
        record("a", 1);
        assert!(is_active());
        assert_eq!(close_default(), vec!["log_a: 1".to_string()]);
    }

    #[test]
    fn record_in_reuses_matching_section() {
        record_in("s", "a", 1);
        record_in("s", "b", 2);
        record_in("t", "c", 3);
        assert_eq!(
            close_default(),
            vec![
                "s_a: 1".to_string(),
                "s_b: 2".to_string(),
                "t_c: 3".to_string(),
            ]
        );
    }

    #[test]
    fn trace_as_and_with_return_the_value() {
        start_tag("s");
        assert_eq!(trace_as("n", 7), 7);
        assert_eq!(trace_with("m", 8u32, |n: &u32| format!("<{n}>")), 8);
        assert_eq!(
            close_default(),
            vec!["s_n: 7".to_string(), "s_m: <8>".to_string()]
        );
    }

    #[test]
    fn wrap_clears_slot_on_panic() {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            wrap(
                "s",
                || {
                    log("before", 1);
                    panic!("boom");
                },
                debug_format,
            )
        }));
        assert!(outcome.is_err());
        assert!(!is_active());
        assert!(close_default().is_empty());
    }

    #[test]
    fn slots_are_per_thread() {
        start_tag("outer");
        log("here", 1);
        let other = std::thread::spawn(|| {
            assert!(!is_active());
            start_tag("inner");
            log("there", 2);
            close_default()
        })
        .join()
        .expect("thread should not panic");
        assert_eq!(other, vec!["inner_there: 2".to_string()]);
        assert_eq!(close_default(), vec!["outer_here: 1".to_string()]);
    }
}
