// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit-handle logging for pure functional composition.
//!
//! Every operation on [`Log`] already takes the log by value and returns
//! the updated log, so the model doubles as the functional context API:
//! no hidden storage, safe for any number of concurrent independent
//! sessions, and a `clone` forks a context into divergent branches that
//! never observe each other.
//!
//! This module adds the chaining operations that return a payload
//! *alongside* the updated log — [`trace`](Log::trace) for transparent
//! pipelines and [`tagged`](Log::tagged) for branch identification — plus
//! the [`wrap`](Log::wrap) convenience that runs a body against a fresh
//! context and hands back the serialized result.
//!
//! ```rust
//! use steplog::{debug_format, Log};
//!
//! let ctx = Log::with_tag("pricing");
//! let (subtotal, ctx) = ctx.trace(40u32 + 2);
//! let ctx = ctx.append("discounted", subtotal - 2);
//! assert_eq!(
//!     ctx.close(debug_format),
//!     vec!["pricing_step_0: 42".to_string(), "pricing_discounted: 40".to_string()]
//! );
//! ```

use std::fmt::Debug;

use crate::model::Log;
use crate::value::ValueFormatter;

impl Log {
    /// Logs the value auto-labeled and returns it together with the
    /// updated log.
    pub fn trace<T>(self, value: T) -> (T, Log)
    where
        T: Debug + Send + Sync + Clone + 'static,
    {
        let log = self.append_auto(value.clone());
        (value, log)
    }

    /// [`trace`](Log::trace) with an explicit label.
    pub fn trace_as<T>(self, label: impl Into<String>, value: T) -> (T, Log)
    where
        T: Debug + Send + Sync + Clone + 'static,
    {
        let log = self.append(label, value.clone());
        (value, log)
    }

    /// [`trace_as`](Log::trace_as) with a per-entry formatter.
    pub fn trace_with<T, F>(self, label: impl Into<String>, value: T, formatter: F) -> (T, Log)
    where
        T: Debug + Send + Sync + Clone + 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let log = self.append_with(label, value.clone(), formatter);
        (value, log)
    }

    /// Logs the value under `label` and returns the `(label, value)`
    /// pair together with the updated log.
    ///
    /// The pair identifies which branch produced a result when the log
    /// threads through short-circuiting control flow.
    pub fn tagged<T>(self, label: impl Into<String>, value: T) -> ((String, T), Log)
    where
        T: Debug + Send + Sync + Clone + 'static,
    {
        let label = label.into();
        let log = self.append(label.clone(), value.clone());
        ((label, value), log)
    }

    /// [`tagged`](Log::tagged) with a per-entry formatter.
    pub fn tagged_with<T, F>(
        self,
        label: impl Into<String>,
        value: T,
        formatter: F,
    ) -> ((String, T), Log)
    where
        T: Debug + Send + Sync + Clone + 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let label = label.into();
        let log = self.append_with(label.clone(), value.clone(), formatter);
        ((label, value), log)
    }

    /// Runs `body` against a fresh context with one section and returns
    /// the body's result alongside the serialized log.
    ///
    /// `body` receives the fresh context and must return
    /// `(result, final_context)`; the final context is closed with
    /// `default`.
    ///
    /// ```rust
    /// use steplog::{debug_format, Log};
    ///
    /// let (total, lines) = Log::wrap(
    ///     "pricing",
    ///     |ctx| {
    ///         let ctx = ctx.append("base", 100u32);
    ///         (90u32, ctx.append("discounted", 90u32))
    ///     },
    ///     debug_format,
    /// );
    /// assert_eq!(total, 90);
    /// assert_eq!(
    ///     lines,
    ///     vec!["pricing_base: 100".to_string(), "pricing_discounted: 90".to_string()]
    /// );
    /// ```
    pub fn wrap<R>(
        tag: impl Into<String>,
        body: impl FnOnce(Log) -> (R, Log),
        default: ValueFormatter,
    ) -> (R, Vec<String>) {
        let (result, log) = body(Log::with_tag(tag));
        (result, log.close(default))
    }
}
