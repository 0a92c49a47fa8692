//! S-expression reader: turns source text into values. One numeric token
//! grammar covers integers and floats (the value decides its display tag),
//! `'` and `@` expand to `(quote ...)` and `(deref ...)`, commas and `;`
//! comments count as whitespace, and nesting is bounded by
//! [`crate::MAX_PARSE_DEPTH`].

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::char,
    error::ErrorKind,
};

use std::collections::BTreeMap;

use crate::value::Value;
use crate::{Error, MAX_PARSE_DEPTH, ParseError, ParseErrorKind};

/// Characters that terminate a token
fn is_token_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '(' | ')' | '[' | ']' | '{' | '}' | '\'' | '"' | '`' | ';' | ',' | '@' | '~'
        )
}

/// Skip whitespace, commas, and `;` line comments
fn skip_ws(input: &str) -> &str {
    let mut rest = input;
    loop {
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        match trimmed.strip_prefix(';') {
            Some(comment) => {
                rest = match comment.find('\n') {
                    Some(end) => &comment[end + 1..],
                    None => "",
                };
            }
            None => return trimmed,
        }
    }
}

/// Whether a token should be treated as a number (and must then parse as one)
fn looks_numeric(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-' | '+') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Parse a bare token: number, literal, keyword, or symbol
fn parse_atom(input: &str) -> IResult<&str, Value> {
    let (remaining, token) = take_while1(is_token_char).parse(input)?;

    let value = match token {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "nil" => Value::Nil,
        ":" => {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                ErrorKind::Alpha,
            )));
        }
        _ if token.starts_with(':') => Value::keyword(token),
        _ if looks_numeric(token) => match token.parse::<f64>() {
            // The token's value decides its display tag: "3.0" reads as 3
            Ok(n) => Value::number(n),
            Err(_) => {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    input,
                    ErrorKind::Digit,
                )));
            }
        },
        _ => Value::symbol(token),
    };

    Ok((remaining, value))
}

/// Parse a string literal with escape sequences
fn parse_string(input: &str) -> IResult<&str, Value> {
    let (mut remaining, _) = char('"').parse(input)?;
    let mut chars = Vec::new();

    loop {
        let mut char_iter = remaining.chars();
        match char_iter.next() {
            Some('"') => {
                let text: String = chars.into_iter().collect();
                return Ok((char_iter.as_str(), Value::string(text)));
            }
            Some('\\') => {
                match char_iter.next() {
                    Some('n') => chars.push('\n'),
                    Some('t') => chars.push('\t'),
                    Some('\\') => chars.push('\\'),
                    Some('"') => chars.push('"'),
                    Some(_) => {
                        // Unknown escape sequence
                        return Err(nom::Err::Failure(nom::error::Error::new(
                            remaining,
                            ErrorKind::Escaped,
                        )));
                    }
                    None => {
                        return Err(nom::Err::Failure(nom::error::Error::new(
                            remaining,
                            ErrorKind::Eof,
                        )));
                    }
                }
                remaining = char_iter.as_str();
            }
            Some(ch) => {
                chars.push(ch);
                remaining = char_iter.as_str();
            }
            None => {
                // End of input without a closing quote
                return Err(nom::Err::Failure(nom::error::Error::new(
                    remaining,
                    ErrorKind::Eof,
                )));
            }
        }
    }
}

/// Parse forms until the closing bracket of a collection
fn parse_elements(mut input: &str, close: char, depth: usize) -> IResult<&str, Vec<Value>> {
    let mut elements = Vec::new();
    loop {
        let rest = skip_ws(input);
        if let Some(after) = rest.strip_prefix(close) {
            return Ok((after, elements));
        }
        if rest.is_empty() {
            return Err(nom::Err::Failure(nom::error::Error::new(
                rest,
                ErrorKind::Eof,
            )));
        }
        let (rest, value) = parse_form(rest, depth + 1)?;
        elements.push(value);
        input = rest;
    }
}

fn parse_list(input: &str, depth: usize) -> IResult<&str, Value> {
    let (input, _) = char('(').parse(input)?;
    let (input, elements) = parse_elements(input, ')', depth)?;
    Ok((input, Value::list(elements)))
}

fn parse_vector(input: &str, depth: usize) -> IResult<&str, Value> {
    let (input, _) = char('[').parse(input)?;
    let (input, elements) = parse_elements(input, ']', depth)?;
    Ok((input, Value::vector(elements)))
}

fn parse_map(input: &str, depth: usize) -> IResult<&str, Value> {
    let (input, _) = char('{').parse(input)?;
    let (input, elements) = parse_elements(input, '}', depth)?;

    if elements.len() % 2 != 0 {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::Count,
        )));
    }

    let mut entries = BTreeMap::new();
    let mut forms = elements.into_iter();
    while let (Some(key), Some(value)) = (forms.next(), forms.next()) {
        entries.insert(key, value);
    }
    Ok((input, Value::map(entries)))
}

/// Parse `'form` into `(quote form)`
fn parse_quote(input: &str, depth: usize) -> IResult<&str, Value> {
    let (input, _) = char('\'').parse(input)?;
    let (input, form) = parse_form(input, depth + 1)?;
    Ok((input, Value::list(vec![Value::symbol("quote"), form])))
}

/// Parse `@form` into `(deref form)`
fn parse_deref(input: &str, depth: usize) -> IResult<&str, Value> {
    let (input, _) = char('@').parse(input)?;
    let (input, form) = parse_form(input, depth + 1)?;
    Ok((input, Value::list(vec![Value::symbol("deref"), form])))
}

fn parse_form(input: &str, depth: usize) -> IResult<&str, Value> {
    if depth >= MAX_PARSE_DEPTH {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::TooLarge,
        )));
    }
    let input = skip_ws(input);

    // Quasiquote tokens are valid Lisp that this implementation does not
    // support; reject them up front instead of misreading them as symbols
    if input.starts_with('`') || input.starts_with('~') {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::Verify,
        )));
    }

    alt((
        |i| parse_quote(i, depth),
        |i| parse_deref(i, depth),
        |i| parse_list(i, depth),
        |i| parse_vector(i, depth),
        |i| parse_map(i, depth),
        parse_string,
        parse_atom,
    ))
    .parse(input)
}

/// Convert nom parsing errors to structured parse errors
fn convert_error(input: &str, error: nom::Err<nom::error::Error<&str>>) -> ParseError {
    match error {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let position = input.len().saturating_sub(e.input.len());
            match e.code {
                ErrorKind::TooLarge => ParseError::from_message(
                    ParseErrorKind::TooDeeplyNested,
                    format!("form too deeply nested (max depth: {MAX_PARSE_DEPTH})"),
                ),
                ErrorKind::Verify => ParseError::from_message(
                    ParseErrorKind::Unsupported,
                    "quasiquote syntax (`, ~, ~@) is not supported",
                ),
                ErrorKind::Count => ParseError::with_context(
                    ParseErrorKind::InvalidSyntax,
                    "map literal requires an even number of forms",
                    input,
                    position,
                ),
                ErrorKind::Eof => ParseError::with_context(
                    ParseErrorKind::Incomplete,
                    "unexpected end of input",
                    input,
                    position,
                ),
                _ => {
                    if position < input.len() {
                        let near: String = input.chars().skip(position).take(10).collect();
                        let mut parse_error = ParseError::with_context(
                            ParseErrorKind::InvalidSyntax,
                            format!("invalid syntax near '{near}'"),
                            input,
                            position,
                        );
                        parse_error.found = Some(near);
                        parse_error
                    } else {
                        ParseError::from_message(
                            ParseErrorKind::Incomplete,
                            "unexpected end of input",
                        )
                    }
                }
            }
        }
        nom::Err::Incomplete(_) => {
            ParseError::from_message(ParseErrorKind::Incomplete, "incomplete input")
        }
    }
}

/// Parse exactly one form from the input. Trailing whitespace and comments
/// are allowed; any further content is an error.
pub fn read_str(input: &str) -> Result<Value, Error> {
    match parse_form(input, 0) {
        Ok((rest, value)) => {
            let rest = skip_ws(rest);
            if rest.is_empty() {
                Ok(value)
            } else {
                let position = input.len() - rest.len();
                Err(Error::Parse(ParseError::with_context(
                    ParseErrorKind::TrailingContent,
                    format!("unexpected content after form: '{}'",
                        rest.chars().take(10).collect::<String>()),
                    input,
                    position,
                )))
            }
        }
        Err(e) => Err(Error::Parse(convert_error(input, e))),
    }
}
