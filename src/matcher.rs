//! Token matchers.
//!
//! Each matcher looks at the unread text and reports the longest prefix its
//! grammar accepts, along with the decoded value. Matchers are independent:
//! the lexer runs all of them at every position and keeps the longest.

use chrono::NaiveDate;
use std::borrow::Cow;

use crate::config::SymbolTable;
use crate::token::TokenKind;

/// A successful match. `len` is in bytes and always lands on a character
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub len: usize,
    pub kind: TokenKind<'a>,
}

pub type Matcher = for<'a> fn(&'a str, &'a SymbolTable) -> Option<Match<'a>>;

/// All matchers, in the order their candidates are reported on a tie.
pub const MATCHERS: [(&str, Matcher); 8] = [
    ("int", match_int),
    ("float", match_float),
    ("string", match_string),
    ("date", match_date),
    ("datetime", match_datetime),
    ("identifier", match_identifier),
    ("keyword", match_keyword),
    ("symbol", match_symbol),
];

fn digits(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

fn word(text: &str) -> usize {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {
            1 + bytes[1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                .count()
        }
        _ => 0,
    }
}

/// Length of an `[eE][+-]?[0-9]+` exponent, or 0.
fn exponent(text: &str) -> usize {
    let bytes = text.as_bytes();
    if !matches!(bytes.first(), Some(b'e' | b'E')) {
        return 0;
    }
    let sign = usize::from(matches!(bytes.get(1), Some(b'+' | b'-')));
    match digits(&text[1 + sign..]) {
        0 => 0,
        n => 1 + sign + n,
    }
}

fn number(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

fn is_digits(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_digit)
}

/// Parses a `YYYY-MM-DD` prefix.
fn date_prefix(text: &str) -> Option<NaiveDate> {
    let b = text.as_bytes();
    if b.len() < 10
        || !is_digits(&b[0..4])
        || b[4] != b'-'
        || !is_digits(&b[5..7])
        || b[7] != b'-'
        || !is_digits(&b[8..10])
    {
        return None;
    }
    NaiveDate::from_ymd_opt(number(&b[0..4]) as i32, number(&b[5..7]), number(&b[8..10]))
}

fn followed_by_digit(text: &str, len: usize) -> bool {
    text.as_bytes().get(len).is_some_and(u8::is_ascii_digit)
}

pub fn match_int<'a>(text: &'a str, _: &'a SymbolTable) -> Option<Match<'a>> {
    let len = digits(text);
    if len == 0 {
        return None;
    }
    // Out-of-range literals are not integers.
    let value = text[..len].parse::<i64>().ok()?;
    Some(Match { len, kind: TokenKind::Int(value) })
}

pub fn match_float<'a>(text: &'a str, _: &'a SymbolTable) -> Option<Match<'a>> {
    let int_len = digits(text);
    let mut len = int_len;
    let mut fractional = false;

    if text[len..].starts_with('.') {
        let frac_len = digits(&text[len + 1..]);
        if int_len == 0 && frac_len == 0 {
            return None;
        }
        len += 1 + frac_len;
        fractional = true;
    } else if int_len == 0 {
        return None;
    }

    let exp_len = exponent(&text[len..]);
    if !fractional && exp_len == 0 {
        return None;
    }
    len += exp_len;

    let value = text[..len].parse::<f64>().ok()?;
    Some(Match { len, kind: TokenKind::Float(value) })
}

pub fn match_string<'a>(text: &'a str, _: &'a SymbolTable) -> Option<Match<'a>> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'\'') {
        return None;
    }

    let mut i = 1;
    let mut escaped = false;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                escaped = true;
                i += 2;
                continue;
            }
            let content = &text[1..i];
            let value = if escaped {
                Cow::Owned(content.replace("''", "'"))
            } else {
                Cow::Borrowed(content)
            };
            return Some(Match { len: i + 1, kind: TokenKind::Str(value) });
        }
        i += 1;
    }
    // Unterminated
    None
}

pub fn match_date<'a>(text: &'a str, _: &'a SymbolTable) -> Option<Match<'a>> {
    let date = date_prefix(text)?;
    if followed_by_digit(text, 10) {
        return None;
    }
    Some(Match { len: 10, kind: TokenKind::Date(date) })
}

/// `YYYY-MM-DD[T ]HH:MM:SS[.fraction]`
pub fn match_datetime<'a>(text: &'a str, _: &'a SymbolTable) -> Option<Match<'a>> {
    let date = date_prefix(text)?;
    let b = text.as_bytes();
    if b.len() < 19
        || !matches!(b[10], b'T' | b' ')
        || !is_digits(&b[11..13])
        || b[13] != b':'
        || !is_digits(&b[14..16])
        || b[16] != b':'
        || !is_digits(&b[17..19])
    {
        return None;
    }

    let mut len = 19;
    let mut nanos = 0;
    if b.get(19) == Some(&b'.') {
        let frac_len = digits(&text[20..]);
        if frac_len > 0 {
            let kept = &b[20..20 + frac_len.min(9)];
            nanos = number(kept) * 10u32.pow(9 - kept.len() as u32);
            len = 20 + frac_len;
        }
    }
    if followed_by_digit(text, len) {
        return None;
    }

    let datetime =
        date.and_hms_nano_opt(number(&b[11..13]), number(&b[14..16]), number(&b[17..19]), nanos)?;
    Some(Match { len, kind: TokenKind::Datetime(datetime) })
}

pub fn match_identifier<'a>(text: &'a str, _: &'a SymbolTable) -> Option<Match<'a>> {
    match word(text) {
        0 => None,
        len => Some(Match { len, kind: TokenKind::Identifier(&text[..len]) }),
    }
}

pub fn match_keyword<'a>(text: &'a str, table: &'a SymbolTable) -> Option<Match<'a>> {
    let len = word(text);
    if len == 0 {
        return None;
    }
    let keyword = table.keyword(&text[..len])?;
    Some(Match { len, kind: TokenKind::Keyword(keyword) })
}

pub fn match_symbol<'a>(text: &'a str, table: &'a SymbolTable) -> Option<Match<'a>> {
    let symbol = table.longest_symbol(text)?;
    Some(Match { len: symbol.len(), kind: TokenKind::Symbol(symbol) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn run(matcher: Matcher, text: &str) -> Option<(usize, String)> {
        let table = SymbolTable::default();
        matcher(text, &table).map(|m| (m.len, m.kind.to_string()))
    }

    #[test]
    fn test_int() {
        assert_eq!(run(match_int, "123abc"), Some((3, "int(123)".to_string())));
        assert_eq!(run(match_int, "abc"), None);
        assert_eq!(run(match_int, "99999999999999999999"), None);
    }

    #[test]
    fn test_float() {
        assert_eq!(run(match_float, "1.5+2"), Some((3, "float(1.5)".to_string())));
        assert_eq!(run(match_float, ".25"), Some((3, "float(0.25)".to_string())));
        assert_eq!(run(match_float, "2."), Some((2, "float(2)".to_string())));
        assert_eq!(run(match_float, "1e3"), Some((3, "float(1000)".to_string())));
        assert_eq!(run(match_float, "1.5e-1x"), Some((6, "float(0.15)".to_string())));
        assert_eq!(run(match_float, "1e"), None);
        assert_eq!(run(match_float, "12"), None);
        assert_eq!(run(match_float, "."), None);
    }

    #[test]
    fn test_string() {
        let table = SymbolTable::default();
        let m = match_string("'it''s' rest", &table).unwrap();
        assert_eq!(m.len, 7);
        assert_eq!(m.kind, TokenKind::Str(Cow::Owned("it's".to_string())));

        let m = match_string("'plain'", &table).unwrap();
        assert_eq!(m.kind, TokenKind::Str(Cow::Borrowed("plain")));

        assert_eq!(run(match_string, "''"), Some((2, "string(\"\")".to_string())));
        assert_eq!(run(match_string, "'open"), None);
    }

    #[test]
    fn test_date_and_datetime() {
        let table = SymbolTable::default();
        let m = match_date("2024-02-29 ", &table).unwrap();
        assert_eq!(m.kind, TokenKind::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(match_date("2023-02-29", &table).is_none());
        assert!(match_date("2023-1-01", &table).is_none());

        let m = match_datetime("2024-01-02T03:04:05.5 and", &table).unwrap();
        assert_eq!(m.len, 21);
        let expected = NaiveDateTime::parse_from_str("2024-01-02 03:04:05.5", "%Y-%m-%d %H:%M:%S%.f").unwrap();
        assert_eq!(m.kind, TokenKind::Datetime(expected));

        let m = match_datetime("2024-01-02 23:59:59", &table).unwrap();
        assert_eq!(m.len, 19);
        assert!(match_datetime("2024-01-02 24:00:00", &table).is_none());
        assert!(match_datetime("2024-01-02", &table).is_none());
    }

    #[test]
    fn test_identifier_keyword_symbol() {
        assert_eq!(run(match_identifier, "_tbl1.col"), Some((5, "identifier(_tbl1)".to_string())));
        assert_eq!(run(match_identifier, "1abc"), None);
        assert_eq!(run(match_keyword, "AND x"), Some((3, "keyword(and)".to_string())));
        assert_eq!(run(match_keyword, "android"), None);
        assert_eq!(run(match_symbol, "<=>"), Some((2, "symbol(<=)".to_string())));
        assert_eq!(run(match_symbol, "@"), None);
    }
}
