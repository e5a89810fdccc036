//! Display masking of sensitive strings.

/// Character used for redacted positions.
pub const MASK_CHAR: char = '*';

/// Number of trailing characters left visible by default.
pub const DEFAULT_VISIBLE_SUFFIX: usize = 4;

/// Redact `value` for display, leaving at most the last `visible_suffix`
/// characters readable.
///
/// Values no longer than the visible suffix come back fully redacted — a
/// short value is never partially revealed. Counting is per character, not
/// per byte, so multi-byte input masks cleanly.
///
/// Display only: the result must never be stored or compared.
pub fn mask(value: &str, visible_suffix: usize) -> String {
    let total = value.chars().count();
    if total <= visible_suffix {
        return MASK_CHAR.to_string().repeat(total);
    }

    let hidden = total - visible_suffix;
    let mut out = String::with_capacity(value.len());
    out.extend(std::iter::repeat(MASK_CHAR).take(hidden));
    out.extend(value.chars().skip(hidden));
    out
}
