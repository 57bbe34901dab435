// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning a log into its flat, storable string form.
//!
//! Closing a [`Log`] produces one string per entry, shaped
//! `"{section_tag}_{entry_label}: {rendered_value}"`, in strict
//! chronological order across every section and entry. An entry logged
//! with its own formatter renders through that formatter; everything else
//! renders through the default formatter passed to close.
//!
//! # Format limitation
//!
//! The literal separator `": "` is not escaped. A rendered value that
//! itself contains `": "` is emitted verbatim, so downstream parsers
//! splitting on the first occurrence see an ambiguous line. This is a
//! documented property of the format, not something the serializer
//! rewrites.

use crate::model::Log;
use crate::value::{debug_format, ValueFormatter};

impl Log {
    /// Consumes the log and returns its serialized entries in
    /// chronological order.
    ///
    /// ```rust
    /// use steplog::{debug_format, Log};
    ///
    /// let lines = Log::with_tag("validation")
    ///     .append("input_valid", true)
    ///     .tag("authorization")
    ///     .append("user_role", "admin".to_string())
    ///     .close(debug_format);
    ///
    /// assert_eq!(
    ///     lines,
    ///     vec![
    ///         "validation_input_valid: true".to_string(),
    ///         "authorization_user_role: \"admin\"".to_string(),
    ///     ]
    /// );
    /// ```
    pub fn close(self, default: ValueFormatter) -> Vec<String> {
        let mut out = Vec::new();
        for section in &self.sections {
            for entry in section.entries() {
                out.push(format!(
                    "{}_{}: {}",
                    section.tag(),
                    entry.label(),
                    entry.render(default)
                ));
            }
        }
        out
    }

    /// [`close`](Log::close) with the [`debug_format`] default.
    #[inline]
    pub fn close_default(self) -> Vec<String> {
        self.close(debug_format)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::Log;
    use crate::value::debug_format;

    #[test]
    fn empty_log_closes_to_empty_list() {
        assert!(Log::new().close(debug_format).is_empty());
        assert!(Log::with_tag("s").close(debug_format).is_empty());
    }

    #[test]
    fn chronological_order_across_sections() {
        let lines = Log::with_tag("a")
            .append("x", 1)
            .tag("b")
            .append("y", 2)
            .tag("a")
            .append("z", 3)
            .close(debug_format);
        assert_eq!(
            lines,
            vec![
                "a_x: 1".to_string(),
                "b_y: 2".to_string(),
                "a_z: 3".to_string(),
            ]
        );
    }

    #[test]
    fn per_entry_formatter_beats_default() {
        let shouting: fn(&dyn crate::Value) -> String = |v| format!("DEFAULT {v:?}");
        let lines = Log::with_tag("s")
            .append_with("own", 1u8, |n: &u8| format!("own {n}"))
            .append("plain", 2u8)
            .close(shouting);
        assert_eq!(
            lines,
            vec!["s_own: own 1".to_string(), "s_plain: DEFAULT 2".to_string()]
        );
    }

    #[test]
    fn separator_in_value_is_emitted_verbatim() {
        let lines = Log::with_tag("s")
            .append("note", "a: b".to_string())
            .close(debug_format);
        assert_eq!(lines, vec!["s_note: \"a: b\"".to_string()]);
    }

    #[test]
    fn close_default_uses_debug_format() {
        let lines = Log::with_tag("s").append("flag", false).close_default();
        assert_eq!(lines, vec!["s_flag: false".to_string()]);
    }
}
