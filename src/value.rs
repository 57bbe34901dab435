// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opaque value storage for log entries.
//!
//! A decision log records arbitrary values — booleans from validation
//! checks, strings from branch outcomes, whole structs from pricing
//! results — without knowing their types up front. This module defines
//! [`Value`], the erased type every entry stores, and the formatter
//! machinery that turns a stored value back into a string at close time.
//!
//! # Design
//!
//! Every stored value carries two rendering paths:
//!
//! - The *default* path: a [`ValueFormatter`] supplied to the close
//!   operation, applied uniformly to entries that did not choose their
//!   own formatter. The reference default is [`debug_format`].
//! - The *per-entry* path: a typed closure captured when the entry was
//!   logged. If present it always wins over the default.
//!
//! The precedence is resolved at serialization time, not at append time,
//! so the same log can be closed twice (via a clone) with different
//! default formatters and per-entry choices survive both.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// A value that can be stored in a decision log.
///
/// Blanket-implemented for every `Debug + Send + Sync + 'static` type, so
/// any ordinary value can be logged without ceremony:
///
/// ```rust
/// use steplog::Log;
///
/// let log = Log::with_tag("validation")
///     .append("input_valid", true)
///     .append("attempts", 3u32)
///     .append("user", "admin".to_string());
/// ```
///
/// The `as_any` hook exists so that per-entry formatters, which are typed
/// closures, can recover the concrete type at close time.
pub trait Value: Debug + Send + Sync {
    /// Returns the value as `&dyn Any` for formatter downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Debug + Send + Sync + 'static> Value for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The shape of a default formatter passed to a close operation.
///
/// Applied to every entry that was logged without its own formatter.
pub type ValueFormatter = fn(&dyn Value) -> String;

/// The reference default formatter: renders via `Debug`.
///
/// Booleans render as `true`/`false`, strings render quoted, numbers
/// render bare — a deterministic, human-readable inspection of the value.
///
/// ```rust
/// use steplog::debug_format;
///
/// assert_eq!(debug_format(&true), "true");
/// assert_eq!(debug_format(&"admin".to_string()), "\"admin\"");
/// assert_eq!(debug_format(&42u32), "42");
/// ```
#[inline]
pub fn debug_format(value: &dyn Value) -> String {
    format!("{value:?}")
}

/// An erased per-entry formatter, stored alongside the value it renders.
///
/// Arc rather than Box so that logs stay cheap to clone (forking a
/// functional context shares entries instead of copying them).
pub(crate) type SharedFormatter = Arc<dyn Fn(&dyn Value) -> String + Send + Sync>;

/// Erases a typed formatter into a [`SharedFormatter`].
///
/// If the downcast ever misses (it cannot, for formatters paired with
/// their own value at append time), the value falls back to the debug
/// rendering rather than panicking inside a close.
pub(crate) fn erase_formatter<T, F>(f: F) -> SharedFormatter
where
    T: Debug + Send + Sync + 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    Arc::new(move |value: &dyn Value| match value.as_any().downcast_ref::<T>() {
        Some(typed) => f(typed),
        None => debug_format(value),
    })
}
