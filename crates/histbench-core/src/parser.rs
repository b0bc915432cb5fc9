//! Checker output line grammar. The checker emits log lines of the shape
//! `[<prefix>...] <key>: <value>` plus a terminal `accept: true|false`
//! verdict. The grammar is informal but stable; this parser is pure so it
//! can be table- and fuzz-tested independently of process plumbing, and it
//! must survive a checker update that adds new line formats.

use crate::model::KEY_ACCEPT;
use tracing::{debug, warn};

/// One recognized piece of checker output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    /// A named metric, e.g. `construct time` -> `120ms`.
    Metric { key: String, value: String },
    /// The checker's verdict.
    Verdict(bool),
}

impl LogLine {
    /// Metric key this line writes to in the result store.
    pub fn key(&self) -> &str {
        match self {
            Self::Metric { key, .. } => key,
            Self::Verdict(_) => KEY_ACCEPT,
        }
    }
}

/// Parse one line of checker stdout. Returns `None` for empty lines,
/// bracketed lines with no `key: value` payload, and unrecognized shapes;
/// only the last of these is worth a warning.
pub fn parse_line(line: &str) -> Option<LogLine> {
    if line.is_empty() {
        return None;
    }
    if line.starts_with('[') {
        // [time] [thread] [level] msg — everything up to the last ']' is prefix.
        let msg = line.rsplit(']').next().unwrap_or("").trim();
        let Some((key, value)) = msg.split_once(':') else {
            debug!(msg, "informational checker line, no metric");
            return None;
        };
        return Some(LogLine::Metric {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        });
    }
    if line.starts_with('a') {
        let value = line.rsplit(':').next().unwrap_or("").trim();
        return Some(LogLine::Verdict(value == "true"));
    }
    warn!(line, "cannot parse checker output line");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bracketed_metric_line() {
        assert_eq!(
            parse_line("[00:00:01] construct time: 120ms"),
            Some(LogLine::Metric {
                key: "construct time".into(),
                value: "120ms".into()
            })
        );
    }

    #[test]
    fn multiple_prefixes_are_stripped() {
        assert_eq!(
            parse_line("[2024-01-01 00:00:01] [worker-3] [INFO] solve time: 250ms"),
            Some(LogLine::Metric {
                key: "solve time".into(),
                value: "250ms".into()
            })
        );
    }

    #[test]
    fn verdict_lines() {
        assert_eq!(parse_line("accept: true"), Some(LogLine::Verdict(true)));
        assert_eq!(parse_line("accept: false"), Some(LogLine::Verdict(false)));
        assert_eq!(parse_line("accept : true"), Some(LogLine::Verdict(true)));
    }

    #[test]
    fn verdict_writes_under_the_accept_key() {
        let verdict = parse_line("accept: false").unwrap();
        assert_eq!(verdict.key(), KEY_ACCEPT);
        let metric = parse_line("[t] solve time: 1ms").unwrap();
        assert_eq!(metric.key(), "solve time");
    }

    #[test]
    fn empty_line_skipped() {
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn bracketed_line_without_colon_skipped() {
        assert_eq!(parse_line("[00:00:02] pruning done"), None);
    }

    #[test]
    fn value_keeps_text_after_first_colon() {
        assert_eq!(
            parse_line("[t] detail: a:b"),
            Some(LogLine::Metric {
                key: "detail".into(),
                value: "a:b".into()
            })
        );
    }

    #[test]
    fn unrecognized_shape_yields_nothing() {
        assert_eq!(parse_line("Segmentation fault"), None);
        assert_eq!(parse_line("== summary =="), None);
    }

    #[test]
    fn parsing_is_idempotent() {
        for line in ["[00:00:01] construct time: 120ms", "accept: true", ""] {
            assert_eq!(parse_line(line), parse_line(line));
        }
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_input(line in ".*") {
            let _ = parse_line(&line);
        }

        #[test]
        fn bracketed_metric_always_round_trips(key in "[a-z ]{1,12}", value in "[0-9]{1,6}ms") {
            let parsed = parse_line(&format!("[00:00:01] {key}: {value}"));
            prop_assert_eq!(
                parsed,
                Some(LogLine::Metric { key: key.trim().to_string(), value })
            );
        }
    }
}
