//! Character class decomposition
//!
//! Recognizes the common named ranges inside a bracket body so an editor can
//! show them as toggles. The original body is kept as `raw`, which the
//! serializer emits verbatim, so decomposition never changes a pattern.

use crate::node::{CharClassPayload, NamedSets};

/// Split a bracket body (without `[`, `^` and `]`) into named ranges and a remainder.
///
/// Each named range is removed at most once, at its first occurrence, in the
/// fixed order `a-z`, `A-Z`, `0-9`, `_`, `\s`. The returned payload is not
/// negated; callers that stripped a `^` set `negate` themselves.
pub fn decompose_char_class(raw_body: &str) -> CharClassPayload {
    let mut rest = raw_body.to_string();
    let flags = NamedSets::RANGES.map(|range| take_first(&mut rest, range));

    CharClassPayload {
        negate: false,
        sets: NamedSets::from_flags(flags),
        custom: rest,
        raw: Some(raw_body.to_string()),
    }
}

fn take_first(haystack: &mut String, needle: &str) -> bool {
    match haystack.find(needle) {
        Some(at) => {
            haystack.replace_range(at..at + needle.len(), "");
            true
        }
        None => false,
    }
}
