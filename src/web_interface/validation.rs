use regex::Regex;
use std::sync::LazyLock;

static PSN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{10}$").expect("PSN pattern is valid")
});

static SESSION_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .expect("session id pattern is valid")
});

/// A PSN is exactly ten ASCII digits.
pub fn is_valid_psn(psn: &str) -> bool {
    PSN_PATTERN.is_match(psn)
}

/// Session ids are hyphenated UUIDs in either case.
pub fn is_valid_session_id(session_id: &str) -> bool {
    SESSION_ID_PATTERN.is_match(session_id)
}
