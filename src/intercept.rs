// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tagging the ambient log at function entry, without the function
//! managing any log lifecycle.
//!
//! A function participating in a decision log usually wants exactly one
//! thing: "entries logged while I run should land under my name". This
//! module provides three ways to get that, all built on
//! [`ambient::tag_silent`](crate::ambient::tag_silent), so an intercepted
//! function is always safe to call when the caller never started a log.
//!
//! - [`enter`] — the call-site convention: one line at the top of the
//!   function body.
//! - [`tagging`] / [`tagging_with`] — higher-order combinators wrapping
//!   an existing closure.
//! - [`tagged_fn!`](crate::tagged_fn) — defines a function whose body is
//!   automatically preceded by `enter`, defaulting the tag to the
//!   function's own name.
//!
//! # Tags do not restore on return
//!
//! When an intercepted function calls another intercepted function, the
//! inner call re-tags the same ambient log. Entries the outer function
//! logs *after* the inner call returns land in whatever section the
//! inner call left active. This is intentional: the log reads as a
//! chronological record of where control actually was, not as a stack.
//!
//! ```rust
//! use steplog::{ambient, intercept};
//!
//! fn inner() {
//!     intercept::enter("inner");
//!     ambient::log("detail", 2);
//! }
//!
//! fn outer() {
//!     intercept::enter("outer");
//!     ambient::log("before", 1);
//!     inner();
//!     ambient::log("after", 3); // lands under "inner"
//! }
//!
//! ambient::start();
//! outer();
//! assert_eq!(
//!     ambient::close_default(),
//!     vec![
//!         "outer_before: 1".to_string(),
//!         "inner_detail: 2".to_string(),
//!         "inner_after: 3".to_string(),
//!     ]
//! );
//! ```
//!
//! There is no functional-API counterpart: interception only makes sense
//! against implicit storage.

use crate::ambient;

/// Tags the ambient log with `tag` if one is active; no-op otherwise.
///
/// Call this as the first statement of a function that wants its
/// observations grouped under its own section.
#[inline]
pub fn enter(tag: &str) {
    ambient::tag_silent(tag);
}

/// Wraps a thunk so that calling it first tags the ambient log.
///
/// The wrapped operation's result is returned directly, not wrapped in
/// any envelope.
///
/// ```rust
/// use steplog::{ambient, intercept};
///
/// let check = intercept::tagging("stock_check", || 17u32);
/// ambient::start();
/// let on_hand = check();
/// ambient::log("on_hand", on_hand);
/// assert_eq!(ambient::close_default(), vec!["stock_check_on_hand: 17".to_string()]);
/// ```
pub fn tagging<R>(tag: impl Into<String>, f: impl Fn() -> R) -> impl Fn() -> R {
    let tag = tag.into();
    move || {
        enter(&tag);
        f()
    }
}

/// Wraps a unary operation so that calling it first tags the ambient
/// log.
pub fn tagging_with<A, R>(tag: impl Into<String>, f: impl Fn(A) -> R) -> impl Fn(A) -> R {
    let tag = tag.into();
    move |arg| {
        enter(&tag);
        f(arg)
    }
}

/// Defines a function whose body is preceded by an ambient entry tag.
///
/// The tag defaults to the function's own name; an explicit tag can be
/// given with `tag = "..."`. The function signature is otherwise
/// ordinary, and the body's result is returned unchanged.
///
/// ```rust
/// use steplog::{ambient, tagged_fn};
///
/// tagged_fn! {
///     fn validate(order_total: u32) -> bool {
///         steplog::ambient::log("total", order_total);
///         order_total > 0
///     }
/// }
///
/// tagged_fn! {
///     tag = "approval",
///     fn approve(ok: bool) -> bool {
///         steplog::ambient::log("granted", ok);
///         ok
///     }
/// }
///
/// ambient::start();
/// approve(validate(100));
/// assert_eq!(
///     ambient::close_default(),
///     vec![
///         "validate_total: 100".to_string(),
///         "approval_granted: true".to_string(),
///     ]
/// );
/// ```
#[macro_export]
macro_rules! tagged_fn {
    (
        tag = $tag:literal,
        $(#[$meta:meta])*
        $vis:vis fn $name:ident ( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? $body:block
    ) => {
        $(#[$meta])*
        $vis fn $name ( $($arg : $ty),* ) $(-> $ret)? {
            $crate::intercept::enter($tag);
            $body
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident ( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? $body:block
    ) => {
        $(#[$meta])*
        $vis fn $name ( $($arg : $ty),* ) $(-> $ret)? {
            $crate::intercept::enter(stringify!($name));
            $body
        }
    };
}
