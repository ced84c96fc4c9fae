//! Response normalizer: raw backend text in, exactly one [`NormalizedResult`] out.
//!
//! The backend is not a trusted structured-output source. Its text is run
//! through a fixed chain; the first branch that applies wins:
//!
//! 1. Strip markdown fences (tagged or bare) and stray backticks, trim.
//! 2. `NEED_INFO` marker or "please provide" (any case) → [`NormalizedResult::NeedsInfo`].
//! 3. Collapse whitespace runs to one space, unescape `\"` and `\'`.
//! 4. Starts with `query`/`mutation` and has a `{` body → brace repair → operation.
//! 5. First `query`/`mutation` followed by `{` anywhere → keyword onward, brace repair → operation.
//! 6. Otherwise wrap everything as `query { ... }` → operation.
//!
//! Normalization never fails, and every produced operation has as many `{`
//! as `}`. Feeding an operation's text back in returns it unchanged.

use querywright_core::result::{NEED_INFO_FALLBACK, NEED_INFO_MARKER, NormalizedResult};
use regex_lite::Regex;
use std::sync::LazyLock;

/// Opening fence with an optional language tag, up to and including its newline.
static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```[ \t]*[A-Za-z0-9_+.-]*[ \t]*\r?\n").expect("fence pattern is valid")
});

static KEYWORD_AT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:query|mutation)\b[^{]*\{").expect("keyword pattern is valid")
});

static KEYWORD_BEFORE_BRACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:query|mutation)\b[^{]*\{").expect("keyword pattern is valid")
});

const PLEASE_PROVIDE: &str = "please provide";

/// Normalize one raw generation.
pub fn normalize(raw: &str) -> NormalizedResult {
    let stripped = strip_fences(raw);

    if let Some(message) = detect_need_info(&stripped) {
        return NormalizedResult::needs_info(message);
    }

    let cleaned = unescape_quotes(&collapse_whitespace(&stripped));

    if KEYWORD_AT_START.is_match(&cleaned) {
        return NormalizedResult::operation(balance_braces(&cleaned));
    }

    if let Some(m) = KEYWORD_BEFORE_BRACE.find(&cleaned) {
        return NormalizedResult::operation(balance_braces(&cleaned[m.start()..]));
    }

    NormalizedResult::operation(balance_braces(&wrap_as_query(&cleaned)))
}

/// Remove code fences and any backtick left over, then trim.
pub fn strip_fences(raw: &str) -> String {
    let without_open = FENCE_OPEN.replace_all(raw, "");
    without_open.replace('`', "").trim().to_string()
}

/// Look for a missing-information signal and extract its message.
///
/// The `NEED_INFO` marker takes precedence: its message is whatever follows
/// it on the same line (past any `:`/`-` separator), or the generic
/// fallback when that line holds nothing more. Without the marker, a "please
/// provide" phrase yields the phrase itself through the end of its line.
pub fn detect_need_info(text: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lowered = text.to_ascii_lowercase();

    if let Some(idx) = lowered.find(&NEED_INFO_MARKER.to_ascii_lowercase()) {
        let rest = text[idx + NEED_INFO_MARKER.len()..]
            .trim_start_matches([' ', '\t', ':', '-']);
        let message = first_line(rest);
        return Some(if message.is_empty() {
            NEED_INFO_FALLBACK.to_string()
        } else {
            message.to_string()
        });
    }

    lowered
        .find(PLEASE_PROVIDE)
        .map(|idx| first_line(&text[idx..]).to_string())
}

fn first_line(text: &str) -> &str {
    text.split(['\n', '\r']).next().unwrap_or_default().trim()
}

/// Collapse every whitespace run (newlines included) into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Undo quote escaping introduced by the backend, to a fixpoint.
pub fn unescape_quotes(text: &str) -> String {
    let mut out = text.to_string();
    while out.contains("\\\"") || out.contains("\\'") {
        out = out.replace("\\\"", "\"").replace("\\'", "'");
    }
    out
}

fn wrap_as_query(body: &str) -> String {
    if body.is_empty() {
        "query { }".to_string()
    } else {
        format!("query {{ {body} }}")
    }
}

/// Make `{` and `}` counts equal.
///
/// A `}` with no open brace before it is dropped; every brace still open at
/// the end gets a ` }` appended. Text that is already balanced comes back
/// untouched.
pub fn balance_braces(text: &str) -> String {
    let mut depth = 0usize;
    let mut dropped = false;
    let mut out = String::with_capacity(text.len() + 8);

    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                out.push(c);
            }
            '}' if depth == 0 => dropped = true,
            '}' => {
                depth -= 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    if dropped {
        out = collapse_whitespace(&out);
    }

    for _ in 0..depth {
        out.push_str(" }");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(text: &str) -> NormalizedResult {
        NormalizedResult::operation(text)
    }

    fn braces_balanced(result: &NormalizedResult) -> bool {
        match result {
            NormalizedResult::Operation { text } => {
                text.matches('{').count() == text.matches('}').count()
            }
            NormalizedResult::NeedsInfo { .. } => true,
        }
    }

    #[test]
    fn fenced_truncated_query_is_repaired() {
        let raw = "```graphql\nquery { getEvents { Name } ```";
        assert_eq!(normalize(raw), op("query { getEvents { Name } }"));
    }

    #[test]
    fn need_info_marker_extracts_message() {
        let raw = "I need more info. NEED_INFO: Please provide Location, Date";
        assert_eq!(
            normalize(raw),
            NormalizedResult::needs_info("Please provide Location, Date")
        );
    }

    #[test]
    fn keywordless_text_is_wrapped() {
        assert_eq!(
            normalize("getAlumni { Name }"),
            op("query { getAlumni { Name } }")
        );
    }

    #[test]
    fn bare_fence_and_multiline_body() {
        let raw = "```\nquery {\n  getAdmins {\n    Username\n    Role\n  }\n}\n```";
        assert_eq!(normalize(raw), op("query { getAdmins { Username Role } }"));
    }

    #[test]
    fn stray_backticks_removed() {
        assert_eq!(
            normalize("`query { getPhotos { Photo_id } }`"),
            op("query { getPhotos { Photo_id } }")
        );
    }

    #[test]
    fn need_info_is_case_insensitive() {
        assert_eq!(
            normalize("need_info: Please provide Event_id"),
            NormalizedResult::needs_info("Please provide Event_id")
        );
    }

    #[test]
    fn need_info_stops_at_newline() {
        let raw = "NEED_INFO: Please provide Date, Time\nmutation { createEvent(input: {}) { Name } }";
        assert_eq!(
            normalize(raw),
            NormalizedResult::needs_info("Please provide Date, Time")
        );
    }

    #[test]
    fn need_info_reads_only_its_own_line() {
        assert_eq!(
            normalize("NEED_INFO:\nPlease provide Location"),
            NormalizedResult::needs_info("Please provide more information")
        );
    }

    #[test]
    fn empty_need_info_uses_fallback() {
        assert_eq!(
            normalize("NEED_INFO:"),
            NormalizedResult::needs_info("Please provide more information")
        );
    }

    #[test]
    fn please_provide_phrase_without_marker() {
        let raw = "I can create that event.\nPlease provide the Date and Time.\nThanks!";
        assert_eq!(
            normalize(raw),
            NormalizedResult::needs_info("Please provide the Date and Time.")
        );
    }

    #[test]
    fn need_info_wins_over_operation() {
        let raw = "mutation { createEvent(input: { Name: \"Gala\" }) { Event_id } } NEED_INFO: Please provide Date";
        assert!(matches!(normalize(raw), NormalizedResult::NeedsInfo { .. }));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert_eq!(
            normalize("Query { getEvents { Name } }"),
            op("Query { getEvents { Name } }")
        );
    }

    #[test]
    fn leading_keyword_without_body_is_wrapped() {
        assert_eq!(
            normalize("Query failed, sorry"),
            op("query { Query failed, sorry }")
        );
        let again = normalize("query { Query failed, sorry }");
        assert_eq!(again, op("query { Query failed, sorry }"));
    }

    #[test]
    fn embedded_operation_is_extracted() {
        let raw = "Here is the GraphQL you asked for:\n\nmutation {\n  deleteEvent(id: \"65f1\")\n}";
        assert_eq!(normalize(raw), op("mutation { deleteEvent(id: \"65f1\") }"));
    }

    #[test]
    fn escaped_quotes_unescaped() {
        let raw = r#"query { getAlumniByEmployer(Employer: \"Google\") { Name } }"#;
        assert_eq!(
            normalize(raw),
            op(r#"query { getAlumniByEmployer(Employer: "Google") { Name } }"#)
        );
    }

    #[test]
    fn multiple_missing_braces_appended() {
        assert_eq!(
            normalize("mutation { createReservation(input: { Event_id: \"E1\" }) { Reservation_id"),
            op("mutation { createReservation(input: { Event_id: \"E1\" }) { Reservation_id } }")
        );
    }

    #[test]
    fn surplus_closing_braces_dropped() {
        assert_eq!(
            normalize("query { getAdmins { Username } } }"),
            op("query { getAdmins { Username } }")
        );
        assert_eq!(normalize("} query { getPhotos { Tags } }"), op("query { getPhotos { Tags } }"));
    }

    #[test]
    fn empty_generation_becomes_empty_query() {
        assert_eq!(normalize(""), op("query { }"));
        assert_eq!(normalize("   \n ```\n```"), op("query { }"));
    }

    #[test]
    fn keyword_inside_word_is_not_an_operation_start() {
        // "queryable" must not count as the `query` keyword
        assert_eq!(
            normalize("queryable getEvents { Name }"),
            op("query { queryable getEvents { Name } }")
        );
    }

    #[test]
    fn braces_always_balanced() {
        let samples = [
            "query {",
            "}}}{{{",
            "mutation { a { b { c",
            "text } with { odd } } braces {",
            "```json\n{\"query\": \"{ x }\"}\n```",
            "",
            "query { a } } } { b",
        ];
        for raw in samples {
            let result = normalize(raw);
            assert!(braces_balanced(&result), "unbalanced for {raw:?}: {result:?}");
            assert!(KEYWORD_AT_START.is_match(&result.render()), "no body for {raw:?}: {result:?}");
        }
    }

    #[test]
    fn normalization_is_idempotent_on_operations() {
        let samples = [
            "```graphql\nquery { getEvents { Name } ```",
            "getAlumni { Name }",
            "Sure!\nmutation {\n deleteAdmin(id: \"1\")",
            "query { a } } } { b",
            r#"query { getAlumniByEmail(Email: \\\"x@y.z\\\") { Name } }"#,
            "",
        ];
        for raw in samples {
            let first = normalize(raw);
            let NormalizedResult::Operation { text } = &first else {
                panic!("expected operation for {raw:?}");
            };
            assert_eq!(normalize(text), first, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn balance_leaves_correct_text_untouched() {
        let text = "query { getEvents { Name Date } }";
        assert_eq!(balance_braces(text), text);
    }
}
