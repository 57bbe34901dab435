// SPDX-License-Identifier: MIT OR Apache-2.0

//! The section/entry tree behind every decision log.
//!
//! A [`Log`] is an ordered list of [`Section`]s; a section is a tag plus
//! an ordered list of [`Entry`]s. Both levels preserve strict insertion
//! order, which is the single most important invariant of the whole
//! crate: closing a log yields its entries in exactly the chronological
//! order they were appended, across section boundaries.
//!
//! All operations here take the log by value and return the updated log.
//! [`Log`] is cheap to clone (entries are Arc-shared), so a caller can
//! fork a log into divergent branches and neither branch observes the
//! other's appends.
//!
//! # Sections are never merged
//!
//! Tagging twice with the same label creates two distinct sections. Both
//! serialize under the same `tag_` prefix, so two same-named sections
//! interleave under one string prefix in the output. Callers who need to
//! tell them apart should pick distinct tags.
//!
//! # Example
//!
//! ```rust
//! use steplog::{debug_format, Log};
//!
//! let lines = Log::with_tag("validation")
//!     .append("input_valid", true)
//!     .tag("authorization")
//!     .append("user_role", "admin".to_string())
//!     .close(debug_format);
//!
//! assert_eq!(
//!     lines,
//!     vec![
//!         "validation_input_valid: true".to_string(),
//!         "authorization_user_role: \"admin\"".to_string(),
//!     ]
//! );
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use crate::value::{debug_format, erase_formatter, SharedFormatter, Value, ValueFormatter};

/// Tag of the section opened implicitly when an entry is appended to a
/// log that has no sections yet (and by the ambient fire-and-forget
/// operations when no log is active).
pub const DEFAULT_TAG: &str = "log";

/// A single observation: a label plus an opaque value, with an optional
/// per-entry formatter that takes precedence over whatever default
/// formatter is later passed to close.
#[derive(Clone)]
pub struct Entry {
    label: String,
    value: Arc<dyn Value>,
    formatter: Option<SharedFormatter>,
}

impl Entry {
    fn new(label: String, value: Arc<dyn Value>, formatter: Option<SharedFormatter>) -> Self {
        Self {
            label,
            value,
            formatter,
        }
    }

    /// The entry's label.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Renders the entry's value: per-entry formatter if one was logged,
    /// otherwise the supplied default.
    pub fn render(&self, default: ValueFormatter) -> String {
        match &self.formatter {
            Some(f) => f(self.value.as_ref()),
            None => default(self.value.as_ref()),
        }
    }
}

impl Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("label", &self.label)
            .field("value", &self.value)
            .field("has_formatter", &self.formatter.is_some())
            .finish()
    }
}

/// A named group of entries. Entries are held in chronological order.
#[derive(Debug, Clone)]
pub struct Section {
    tag: String,
    entries: Vec<Entry>,
}

impl Section {
    fn new(tag: String) -> Self {
        Self {
            tag,
            entries: Vec::new(),
        }
    }

    /// The section's tag.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The section's entries, oldest first.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

/// An append-only, section-grouped decision log.
///
/// Built incrementally by `tag`/`append` calls, then closed into a flat
/// list of formatted strings. See the [module docs](self) for the
/// ordering contract.
#[derive(Debug, Clone, Default)]
pub struct Log {
    // Chronological order; the current section is the last element. The
    // upstream cons-list representation kept sections newest-first for
    // O(1) prepend; a Vec gets O(1) append at the tail instead, with the
    // same observable ordering.
    pub(crate) sections: Vec<Section>,
}

impl Log {
    /// Creates an empty log with no sections.
    ///
    /// The first `append` on an empty log opens a section tagged
    /// [`DEFAULT_TAG`]; call [`with_tag`](Log::with_tag) or
    /// [`tag`](Log::tag) first to choose the tag yourself.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log with one empty section.
    ///
    /// ```rust
    /// use steplog::Log;
    ///
    /// let log = Log::with_tag("validation");
    /// assert_eq!(log.current_tag(), Some("validation"));
    /// ```
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            sections: vec![Section::new(tag.into())],
        }
    }

    /// Opens a new section. Subsequent appends land in it.
    ///
    /// Repeating a tag opens a second, distinct section; sections are
    /// never merged.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.sections.push(Section::new(tag.into()));
        self
    }

    /// Appends a labeled entry to the current section.
    ///
    /// On a log with no sections yet, opens a [`DEFAULT_TAG`] section
    /// first.
    pub fn append<T>(self, label: impl Into<String>, value: T) -> Self
    where
        T: Debug + Send + Sync + 'static,
    {
        self.push_entry(label.into(), Arc::new(value), None)
    }

    /// Appends a labeled entry with its own formatter.
    ///
    /// The formatter wins over any default formatter passed to close:
    ///
    /// ```rust
    /// use steplog::{debug_format, Log};
    ///
    /// let lines = Log::with_tag("pricing")
    ///     .append_with("total", 1050u32, |cents: &u32| {
    ///         format!("{}.{:02} EUR", cents / 100, cents % 100)
    ///     })
    ///     .close(debug_format);
    /// assert_eq!(lines, vec!["pricing_total: 10.50 EUR".to_string()]);
    /// ```
    pub fn append_with<T, F>(self, label: impl Into<String>, value: T, formatter: F) -> Self
    where
        T: Debug + Send + Sync + 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.push_entry(label.into(), Arc::new(value), Some(erase_formatter(formatter)))
    }

    /// Appends an entry with a synthesized `step_N` label, where `N` is
    /// the number of entries already in the current section.
    ///
    /// The counter is per-section and derived from the section's current
    /// size, so explicit and auto labels interleave stably:
    ///
    /// ```rust
    /// use steplog::{debug_format, Log};
    ///
    /// let lines = Log::with_tag("checks")
    ///     .append_auto(1)
    ///     .append("named", 2)
    ///     .append_auto(3)
    ///     .close(debug_format);
    /// assert_eq!(
    ///     lines,
    ///     vec![
    ///         "checks_step_0: 1".to_string(),
    ///         "checks_named: 2".to_string(),
    ///         "checks_step_2: 3".to_string(),
    ///     ]
    /// );
    /// ```
    pub fn append_auto<T>(self, value: T) -> Self
    where
        T: Debug + Send + Sync + 'static,
    {
        let label = self.next_auto_label();
        self.append(label, value)
    }

    /// Auto-labeled append with a per-entry formatter.
    pub fn append_auto_with<T, F>(self, value: T, formatter: F) -> Self
    where
        T: Debug + Send + Sync + 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let label = self.next_auto_label();
        self.append_with(label, value, formatter)
    }

    /// Appends every `(label, value)` pair in input order.
    ///
    /// The pairs appear in the closed output in the same order they were
    /// given.
    pub fn append_many<I, S, T>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Debug + Send + Sync + 'static,
    {
        pairs
            .into_iter()
            .fold(self, |log, (label, value)| log.append(label, value))
    }

    /// The sections in chronological order, each with its entries oldest
    /// first.
    pub fn view(&self) -> Vec<(&str, &[Entry])> {
        self.sections
            .iter()
            .map(|s| (s.tag(), s.entries()))
            .collect()
    }

    /// Tag of the current (most recently opened) section, if any.
    #[inline]
    pub fn current_tag(&self) -> Option<&str> {
        self.sections.last().map(Section::tag)
    }

    /// True if the log has no sections at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections, counting repeated tags separately.
    #[inline]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn next_auto_label(&self) -> String {
        let n = self.sections.last().map_or(0, |s| s.entries.len());
        format!("step_{n}")
    }

    fn push_entry(
        mut self,
        label: String,
        value: Arc<dyn Value>,
        formatter: Option<SharedFormatter>,
    ) -> Self {
        if self.sections.is_empty() {
            self.sections.push(Section::new(DEFAULT_TAG.to_string()));
        }
        // A section always exists here.
        if let Some(section) = self.sections.last_mut() {
            section.entries.push(Entry::new(label, value, formatter));
        }
        self
    }
}

impl std::fmt::Display for Log {
    /// One serialized entry per line, rendered with [`debug_format`].
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, line) in self.clone().close(debug_format).iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

/*
Boilerplate notes for Log:

IMPLEMENTED:
- Debug: derived, for diagnostics
- Clone: derived - forking a functional context is a core operation;
  entries are Arc-shared so the clone is shallow
- Default: empty log, same as new()
- Display: serialized form joined with newlines

NOT IMPLEMENTED:
- PartialEq/Eq: entries hold Arc<dyn Value>; value equality is not
  expressible without constraining what callers may log
- Hash/Ord: no meaningful ordering or hashing for logs
- Copy: heap-backed
*/
