use crate::config::DISPLAY_QUERY_FLAG;
use once_cell::sync::Lazy;
use regex::Regex;

// Leading integer, the way a browser's parseInt reads a number field
static LEADING_INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([+-]?)(\d+)").unwrap());

/// Normalize the text of a minutes field.
///
/// Reads an optional sign and the leading digits and ignores the rest, so
/// `"12abc"` is 12 and `"3.5"` is 3. Text without leading digits is 0, which
/// later drops the topic from the agenda. Values too large for `i64`
/// saturate.
///
/// # Examples
/// ```text
/// parse_minutes("5")      == 5
/// parse_minutes(" 7 min") == 7
/// parse_minutes("-2")     == -2
/// parse_minutes("abc")    == 0
/// ```
pub fn parse_minutes(input: &str) -> i64 {
    let Some(captures) = LEADING_INT_REGEX.captures(input) else {
        return 0;
    };
    let negative = &captures[1] == "-";
    match captures[2].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Whether the page was opened as the full-screen display window.
pub fn is_display_mode(query: &str) -> bool {
    query.contains(DISPLAY_QUERY_FLAG)
}
