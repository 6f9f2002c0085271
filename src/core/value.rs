//! Typed argument grammar.
//!
//! Each supported type knows how to parse itself from the next token(s) of a
//! [`Line`] and how to render itself back in the same textual form. The
//! closed type set: `bool`, `char`, `u8` (character-like), the integer
//! widths `i16`/`u16`/`i32`/`u32`/`i64`/`u64`/`i128`/`u128`, `f32`, `f64`,
//! `String`, and `Vec<T>` of any supported `T`, nested arbitrarily.
//!
//! Reserved characters are `\`, `[`, `]`, and `"`; a literal occurrence must
//! be escaped with `\`. Lists mark consumed brackets by blanking them in the
//! input buffer, which is how nested parses find their boundaries.

use std::num::IntErrorKind;

use super::error::ConsoleError;
use super::tokenizer::{is_reserved, Line, ERR_RESERVED};

/// A value that can be declared as a command argument.
///
/// `parse` consumes from the scanner starting at `cursor` and leaves the
/// cursor past the consumed text. `format` renders the value the way the
/// grammar would accept it back.
pub trait ArgValue: Clone + Send + Sync + 'static {
    /// The type name shown in help usage strings, e.g. `[count:i32]`.
    fn type_name() -> String;

    /// Parse one value from the line.
    fn parse(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError>;

    /// Parse one value in list-element position.
    ///
    /// Identical to [`parse`](Self::parse) for scalars. List types override
    /// this so that a bare scalar inside a list of lists parses as a
    /// singleton instead of failing on the missing `[`.
    fn parse_element(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError> {
        Self::parse(line, cursor)
    }

    /// Render the value in the grammar's textual form.
    fn format(&self) -> String;
}

/// The logging facet of a value, used by variable getters.
///
/// Every [`ArgValue`] is a `LogValue`; variable types that are only
/// constructed from parsed arguments (never parsed directly) implement this
/// by hand.
pub trait LogValue: Send + Sync + 'static {
    /// Render the value for an interaction-log item.
    fn log_value(&self) -> String;
}

impl<T: ArgValue> LogValue for T {
    fn log_value(&self) -> String {
        self.format()
    }
}

/// Conversion from a parsed argument tuple into a variable's storage type.
///
/// A single-argument declaration assigns directly; wider declarations go
/// through `From<(..)>` on the storage type.
pub trait FromParsed<V>: Sized {
    /// Build the storage value from the parsed tuple.
    fn from_parsed(values: V) -> Self;
}

impl<T> FromParsed<(T,)> for T {
    fn from_parsed(values: (T,)) -> Self {
        values.0
    }
}

macro_rules! impl_from_parsed {
    ($($A:ident),+) => {
        impl<T, $($A),+> FromParsed<($($A,)+)> for T
        where
            T: From<($($A,)+)>,
        {
            fn from_parsed(values: ($($A,)+)) -> Self {
                T::from(values)
            }
        }
    };
}

impl_from_parsed!(A0, A1);
impl_from_parsed!(A0, A1, A2);
impl_from_parsed!(A0, A1, A2, A3);
impl_from_parsed!(A0, A1, A2, A3, A4);
impl_from_parsed!(A0, A1, A2, A3, A4, A5);
impl_from_parsed!(A0, A1, A2, A3, A4, A5, A6);
impl_from_parsed!(A0, A1, A2, A3, A4, A5, A6, A7);

/// Default variable setter: construct the storage value from the parsed
/// tuple and assign it.
pub(crate) fn assign_parsed<T: FromParsed<V>, V>(slot: &mut T, values: V) {
    *slot = T::from_parsed(values);
}

/// Copy `[start, end)` out of the line, resolving escape pairs.
///
/// Any reserved character that is not part of an escape pair is an error.
fn unescape_word(line: &Line, start: usize, end: usize) -> Result<String, ConsoleError> {
    let mut out: Vec<u8> = Vec::with_capacity(end.saturating_sub(start));
    let mut i = start;
    while i < end {
        let b = line.byte(i);
        if !is_reserved(b) {
            out.push(b);
            i += 1;
        } else if b == b'\\' && line.is_escaping(i) {
            out.push(line.byte(i + 1));
            i += 2;
        } else {
            return Err(ConsoleError::parse(
                ERR_RESERVED,
                &line.as_str()[start..end.min(line.len())],
            ));
        }
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

impl ArgValue for bool {
    fn type_name() -> String {
        "bool".to_string()
    }

    fn parse(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError> {
        let span = line.next_token(cursor);
        let token = line.slice(span);
        if token.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if token.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConsoleError::parse(
                "Missing or invalid bool argument",
                token,
            ))
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl ArgValue for char {
    fn type_name() -> String {
        "char".to_string()
    }

    fn parse(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError> {
        let span = line.next_token(cursor);
        let token = line.slice(span);
        let mut chars = token.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(c), None, _) => {
                if c.is_ascii() && is_reserved(c as u8) {
                    Err(ConsoleError::parse(ERR_RESERVED, token))
                } else {
                    Ok(c)
                }
            }
            (Some('\\'), Some(c), None) if c.is_ascii() && is_reserved(c as u8) => Ok(c),
            (None, ..) => Err(ConsoleError::parse(
                "Too many or no chars were given",
                token,
            )),
            _ => Err(ConsoleError::parse("Too many chars were given", token)),
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl ArgValue for u8 {
    fn type_name() -> String {
        "u8".to_string()
    }

    fn parse(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError> {
        let span = line.next_token(cursor);
        let token = line.slice(span);
        match token.as_bytes() {
            [b] if !is_reserved(*b) => Ok(*b),
            [_] => Err(ConsoleError::parse(ERR_RESERVED, token)),
            [b'\\', b] if is_reserved(*b) => Ok(*b),
            [] => Err(ConsoleError::parse(
                "Too many or no chars were given",
                token,
            )),
            _ => Err(ConsoleError::parse("Too many chars were given", token)),
        }
    }

    fn format(&self) -> String {
        (*self as char).to_string()
    }
}

macro_rules! impl_int_value {
    ($ty:ty, $name:literal) => {
        impl ArgValue for $ty {
            fn type_name() -> String {
                $name.to_string()
            }

            fn parse(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError> {
                let span = line.next_token(cursor);
                let token = line.slice(span);
                token.parse::<$ty>().map_err(|err| match err.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        ConsoleError::parse(concat!("Argument too large for ", $name), token)
                    }
                    _ => ConsoleError::parse(
                        concat!("Missing or invalid ", $name, " argument"),
                        token,
                    ),
                })
            }

            fn format(&self) -> String {
                self.to_string()
            }
        }
    };
}

impl_int_value!(i16, "i16");
impl_int_value!(u16, "u16");
impl_int_value!(i32, "i32");
impl_int_value!(u32, "u32");
impl_int_value!(i64, "i64");
impl_int_value!(u64, "u64");
impl_int_value!(i128, "i128");
impl_int_value!(u128, "u128");

fn token_means_infinity(token: &str) -> bool {
    let t = token.trim_start_matches(['+', '-']);
    t.eq_ignore_ascii_case("inf") || t.eq_ignore_ascii_case("infinity")
}

macro_rules! impl_float_value {
    ($ty:ty, $name:literal) => {
        impl ArgValue for $ty {
            fn type_name() -> String {
                $name.to_string()
            }

            fn parse(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError> {
                let span = line.next_token(cursor);
                let token = line.slice(span);
                let value: $ty = token.parse().map_err(|_| {
                    ConsoleError::parse(concat!("Missing or invalid ", $name, " argument"), token)
                })?;
                if value.is_infinite() && !token_means_infinity(token) {
                    return Err(ConsoleError::parse(
                        concat!("Argument too large for ", $name),
                        token,
                    ));
                }
                Ok(value)
            }

            fn format(&self) -> String {
                self.to_string()
            }
        }
    };
}

impl_float_value!(f32, "f32");
impl_float_value!(f64, "f64");

impl ArgValue for String {
    fn type_name() -> String {
        "String".to_string()
    }

    fn parse(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError> {
        let span = line.next_token(cursor);
        if span.start >= line.len() {
            return Ok(String::new());
        }

        // Bare word: one whitespace-delimited run, escapes resolved.
        if line.byte(span.start) != b'"' {
            let word = unescape_word(line, span.start, span.end)?;
            *cursor = span.end + 1;
            return Ok(word);
        }

        // Quoted: scan to the next unescaped quote, allowing embedded
        // whitespace. Adjacent quoted segments concatenate.
        let mut first = span.start + 1;
        let mut value = String::new();
        loop {
            let close = match line.find_unescaped(b'"', first) {
                Some(pos) => pos,
                None => {
                    return Err(ConsoleError::parse(
                        "Could not find closing '\"'",
                        line.tail(first),
                    ));
                }
            };
            value.push_str(&unescape_word(line, first, close)?);
            first = close + 1;

            if first < line.len() && !line.byte(first).is_ascii_whitespace() {
                if line.byte(first) == b'"' {
                    first += 1;
                }
            } else {
                *cursor = first;
                break;
            }
        }
        Ok(value)
    }

    fn format(&self) -> String {
        self.clone()
    }
}

impl<T: ArgValue> ArgValue for Vec<T> {
    fn type_name() -> String {
        format!("Vec<{}>", T::type_name())
    }

    fn parse(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError> {
        let opening = line.next_token(cursor);
        if opening.start >= line.len() {
            return Ok(Vec::new());
        }
        if line.byte(opening.start) != b'[' {
            return Err(ConsoleError::parse(
                "Invalid list argument missing opening [",
                line.slice(opening),
            ));
        }
        line.blank(opening.start);

        let mut items = Vec::new();
        let mut pos = opening.start;
        loop {
            let mut probe = pos;
            let span = line.next_token(&mut probe);
            if span.start >= line.len() {
                *cursor = probe;
                return Err(ConsoleError::parse(
                    "Invalid list argument missing closing ]",
                    line.as_str(),
                ));
            }

            if line.byte(span.start) == b'[' {
                // Nested list element.
                let mut elem_cursor = span.start;
                items.push(T::parse_element(line, &mut elem_cursor)?);
                pos = elem_cursor;
            } else {
                // A run of elements terminated by the matching unescaped ].
                let close = match line.find_unescaped(b']', span.start) {
                    Some(found) => found,
                    None => {
                        return Err(ConsoleError::parse(
                            "Invalid list argument missing closing ]",
                            line.tail(span.start),
                        ));
                    }
                };
                line.blank(close);

                let mut elem_cursor = span.start;
                loop {
                    let next = line.peek_token(elem_cursor);
                    if next.start >= close {
                        *cursor = next.start;
                        return Ok(items);
                    }
                    items.push(T::parse_element(line, &mut elem_cursor)?);
                }
            }
        }
    }

    fn parse_element(line: &mut Line, cursor: &mut usize) -> Result<Self, ConsoleError> {
        let peek = line.peek_token(*cursor);
        if peek.start < line.len() && line.byte(peek.start) == b'[' {
            Self::parse(line, cursor)
        } else {
            // A bare scalar in list-of-list position parses as a singleton.
            Ok(vec![T::parse_element(line, cursor)?])
        }
    }

    fn format(&self) -> String {
        let rendered: Vec<String> = self.iter().map(|item| item.format()).collect();
        format!("[{}]", rendered.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one<T: ArgValue>(input: &str) -> Result<T, ConsoleError> {
        let mut line = Line::new(input);
        let mut cursor = 0;
        T::parse(&mut line, &mut cursor)
    }

    #[test]
    fn test_bool_strict_literals() {
        assert_eq!(parse_one::<bool>("true"), Ok(true));
        assert_eq!(parse_one::<bool>("FALSE"), Ok(false));
        assert_eq!(parse_one::<bool>("True"), Ok(true));
        assert!(parse_one::<bool>("1").is_err());
        assert!(parse_one::<bool>("yes").is_err());
        assert!(parse_one::<bool>("truex").is_err());
    }

    #[test]
    fn test_char_plain_and_escaped() {
        assert_eq!(parse_one::<char>("a"), Ok('a'));
        assert_eq!(parse_one::<char>(r"\["), Ok('['));
        assert_eq!(parse_one::<char>(r"\\"), Ok('\\'));
        assert_eq!(parse_one::<char>(r#"\""#), Ok('"'));
    }

    #[test]
    fn test_char_errors() {
        assert!(parse_one::<char>("ab").is_err());
        assert!(parse_one::<char>("[").is_err());
        assert!(parse_one::<char>(r"\a").is_err());
    }

    #[test]
    fn test_u8_char_like() {
        assert_eq!(parse_one::<u8>("x"), Ok(b'x'));
        assert_eq!(parse_one::<u8>(r"\]"), Ok(b']'));
        assert!(parse_one::<u8>("xy").is_err());
        assert!(parse_one::<u8>("]").is_err());
    }

    #[test]
    fn test_int_parse() {
        assert_eq!(parse_one::<i32>("42"), Ok(42));
        assert_eq!(parse_one::<i32>("-17"), Ok(-17));
        assert_eq!(parse_one::<u64>("1000000"), Ok(1_000_000));
    }

    #[test]
    fn test_int_range_error_is_distinct() {
        let too_large = parse_one::<i16>("70000");
        assert_eq!(
            too_large,
            Err(ConsoleError::parse("Argument too large for i16", "70000"))
        );
        let malformed = parse_one::<i16>("12abc");
        assert_eq!(
            malformed,
            Err(ConsoleError::parse(
                "Missing or invalid i16 argument",
                "12abc"
            ))
        );
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        assert!(parse_one::<u32>("-1").is_err());
    }

    #[test]
    fn test_float_parse() {
        assert_eq!(parse_one::<f32>("1.5"), Ok(1.5));
        assert_eq!(parse_one::<f64>("-2.25e3"), Ok(-2250.0));
        assert!(parse_one::<f32>("abc").is_err());
    }

    #[test]
    fn test_float_overflow_is_distinct() {
        let result = parse_one::<f32>("1e60");
        assert_eq!(
            result,
            Err(ConsoleError::parse("Argument too large for f32", "1e60"))
        );
        // Explicit infinity is not an overflow.
        assert_eq!(parse_one::<f32>("inf"), Ok(f32::INFINITY));
    }

    #[test]
    fn test_string_bare_word() {
        assert_eq!(parse_one::<String>("hello"), Ok("hello".to_string()));
    }

    #[test]
    fn test_string_bare_word_with_escapes() {
        assert_eq!(
            parse_one::<String>(r"foo\[bar\]"),
            Ok("foo[bar]".to_string())
        );
    }

    #[test]
    fn test_string_unescaped_reserved_is_error() {
        assert!(parse_one::<String>("foo[bar").is_err());
    }

    #[test]
    fn test_string_quoted_preserves_whitespace() {
        assert_eq!(
            parse_one::<String>(r#""hello world""#),
            Ok("hello world".to_string())
        );
    }

    #[test]
    fn test_string_quoted_with_escaped_quote() {
        assert_eq!(
            parse_one::<String>(r#""say \"hi\"""#),
            Ok(r#"say "hi""#.to_string())
        );
    }

    #[test]
    fn test_string_adjacent_quotes_concatenate() {
        assert_eq!(
            parse_one::<String>(r#""foo""bar""#),
            Ok("foobar".to_string())
        );
    }

    #[test]
    fn test_string_unterminated_quote() {
        let result = parse_one::<String>(r#""hello"#);
        assert!(matches!(result, Err(ConsoleError::Parse { .. })));
    }

    #[test]
    fn test_string_cursor_lands_after_value() {
        let mut line = Line::new(r#""a b" next"#);
        let mut cursor = 0;
        let value = String::parse(&mut line, &mut cursor).unwrap();
        assert_eq!(value, "a b");
        let span = line.next_token(&mut cursor);
        assert_eq!(line.slice(span), "next");
    }

    #[test]
    fn test_vec_flat() {
        assert_eq!(parse_one::<Vec<i32>>("[1 2 3]"), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn test_vec_empty() {
        assert_eq!(parse_one::<Vec<i32>>("[]"), Ok(vec![]));
        assert_eq!(parse_one::<Vec<i32>>("[   ]"), Ok(vec![]));
    }

    #[test]
    fn test_vec_nested() {
        assert_eq!(
            parse_one::<Vec<Vec<i32>>>("[[1 2] [3 4]]"),
            Ok(vec![vec![1, 2], vec![3, 4]])
        );
    }

    #[test]
    fn test_vec_scalar_promotion_in_nested_list() {
        // A bare scalar in list-of-list position becomes a singleton, so the
        // result has three elements and the third is the inner pair.
        let value = parse_one::<Vec<Vec<i32>>>("[1 2 [3 4]]").unwrap();
        assert_eq!(value.len(), 3);
        assert_eq!(value[0], vec![1]);
        assert_eq!(value[1], vec![2]);
        assert_eq!(value[2], vec![3, 4]);
    }

    #[test]
    fn test_vec_missing_opening_bracket() {
        let result = parse_one::<Vec<i32>>("1 2 3]");
        assert!(matches!(result, Err(ConsoleError::Parse { .. })));
    }

    #[test]
    fn test_vec_missing_closing_bracket() {
        let result = parse_one::<Vec<i32>>("[1 2 3");
        assert!(matches!(result, Err(ConsoleError::Parse { .. })));
    }

    #[test]
    fn test_vec_of_strings_with_quotes() {
        assert_eq!(
            parse_one::<Vec<String>>(r#"[foo "bar baz"]"#),
            Ok(vec!["foo".to_string(), "bar baz".to_string()])
        );
    }

    #[test]
    fn test_vec_bad_element_reports_error() {
        let result = parse_one::<Vec<i32>>("[1 two 3]");
        assert!(matches!(result, Err(ConsoleError::Parse { .. })));
    }

    #[test]
    fn test_vec_cursor_lands_after_list() {
        let mut line = Line::new("[1 2] 9");
        let mut cursor = 0;
        let value = Vec::<i32>::parse(&mut line, &mut cursor).unwrap();
        assert_eq!(value, vec![1, 2]);
        let trailing = i32::parse(&mut line, &mut cursor).unwrap();
        assert_eq!(trailing, 9);
    }

    #[test]
    fn test_format_round_forms() {
        assert_eq!(true.format(), "true");
        assert_eq!(42i32.format(), "42");
        assert_eq!(vec![1, 2, 3].format(), "[1 2 3]");
        assert_eq!(vec![vec![1], vec![2, 3]].format(), "[[1] [2 3]]");
    }

    #[test]
    fn test_from_parsed_identity() {
        let value: i32 = FromParsed::from_parsed((7,));
        assert_eq!(value, 7);
        let nested: Vec<Vec<i32>> = FromParsed::from_parsed((vec![vec![1]],));
        assert_eq!(nested, vec![vec![1]]);
    }
}
