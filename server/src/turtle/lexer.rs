//! Turtle lexer built on winnow.
//!
//! Turns the document into tokens with byte offsets. Whitespace and `#`
//! comments are skipped. Fails on the first invalid token, reporting the
//! line and column where that token starts.

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location};
use winnow::token::{any, one_of, take, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::{is_iri_char, is_local_char, is_pn_chars, is_pn_chars_base, is_pn_chars_u, is_ws};
use super::error::ParseError;
use super::token::{Token, TokenKind};

/// Characters a backslash may escape inside a prefixed name's local part.
const LOCAL_ESCAPABLE: &str = "_~.-!$&'()*+,;=/?#@%";

type Input<'a> = LocatingSlice<&'a str>;

/// Tokenize a whole document. The last token is always `Eof`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut stream = LocatingSlice::new(input);
    loop {
        skip_ws_and_comments(&mut stream);
        let start = stream.current_token_start();
        if remaining(&stream).is_empty() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                start,
            });
            return Ok(tokens);
        }
        match next_token(&mut stream) {
            Ok(kind) => tokens.push(Token { kind, start }),
            Err(_) => return Err(lex_error(input, start)),
        }
    }
}

/// Describe the token that failed to lex at `offset`.
fn lex_error(input: &str, offset: usize) -> ParseError {
    let rest = input.get(offset..).unwrap_or_default();
    let message = match rest.chars().next() {
        Some('"' | '\'') => "unterminated or malformed string literal".to_owned(),
        Some('<') => "invalid or unterminated IRI".to_owned(),
        Some('@') => "expected @prefix, @base or a language tag after '@'".to_owned(),
        Some('_') if rest.starts_with("_:") => "invalid blank node label".to_owned(),
        Some(':') => "invalid prefixed name".to_owned(),
        Some(c) if is_pn_chars_base(c) => {
            let word: String = rest.chars().take_while(|&c| is_pn_chars(c)).collect();
            if rest[word.len()..].starts_with(':') {
                format!("invalid prefixed name '{word}:...'")
            } else {
                format!("unexpected word '{word}'")
            }
        }
        Some(c) => format!("unexpected character '{c}'"),
        None => "unexpected end of input".to_owned(),
    };
    ParseError::at(input, offset, message)
}

fn remaining<'a>(input: &Input<'a>) -> &'a str {
    **input
}

fn backtrack<T>() -> ModalResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str> = take_while(0.., is_ws).parse_next(input);
        if !remaining(input).starts_with('#') {
            return;
        }
        let _: ModalResult<&str> = take_till(0.., ['\n', '\r']).parse_next(input);
    }
}

fn next_token(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "^^".value(TokenKind::DoubleCaret),
        iri_ref,
        blank_node_label,
        at_word,
        string_literal,
        number,
        default_prefixed_name,
        bare_word,
        punctuation,
    ))
    .parse_next(input)
}

/// `<...>`, with `\u` and `\U` escapes decoded.
fn iri_ref(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    '<'.parse_next(input)?;
    let mut iri = String::new();
    loop {
        iri.push_str(take_while(0.., is_iri_char).parse_next(input)?);
        if opt('\\').parse_next(input)?.is_none() {
            break;
        }
        iri.push(unicode_escape(input)?);
    }
    '>'.parse_next(input)?;
    Ok(TokenKind::Iri(iri))
}

/// `uXXXX` or `UXXXXXXXX` after a backslash.
fn unicode_escape(input: &mut Input<'_>) -> ModalResult<char> {
    let digits: &str = alt((
        preceded('u', take_while(4, AsChar::is_hex_digit)),
        preceded('U', take_while(8, AsChar::is_hex_digit)),
    ))
    .parse_next(input)?;
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
        .map_or_else(backtrack, Ok)
}

/// `@prefix`, `@base`, or a language tag.
fn at_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let word: &str = preceded(
        '@',
        take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-'),
    )
    .parse_next(input)?;
    match word {
        "prefix" => Ok(TokenKind::PrefixDirective),
        "base" => Ok(TokenKind::BaseDirective),
        tag if is_language_tag(tag) => Ok(TokenKind::LangTag(tag.to_owned())),
        _ => backtrack(),
    }
}

/// `[a-zA-Z]+ ('-' [a-zA-Z0-9]+)*`
fn is_language_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let primary_ok = parts
        .next()
        .is_some_and(|primary| !primary.is_empty() && primary.chars().all(|c| c.is_ascii_alphabetic()));
    primary_ok && parts.all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// `_:label`. A trailing '.' ends the statement rather than the label.
fn blank_node_label(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded(
        "_:",
        (
            one_of(|c: char| is_pn_chars_u(c) || c.is_ascii_digit()),
            name_tail,
        )
            .take(),
    )
    .map(|label: &str| TokenKind::BlankNodeLabel(label.to_owned()))
    .parse_next(input)
}

/// `PN_CHARS*` with inner dots; never ends with '.'.
fn name_tail<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (
        take_while(0.., is_pn_chars),
        repeat(0.., (take_while(1.., '.'), take_while(1.., is_pn_chars))).map(|()| ()),
    )
        .take()
        .parse_next(input)
}

/// `:local` in the default namespace.
fn default_prefixed_name(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    preceded(':', local_name)
        .map(|local| TokenKind::PrefixedName {
            prefix: String::new(),
            local,
        })
        .parse_next(input)
}

/// A bare word: the prefix of a prefixed name, or a keyword.
fn bare_word(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let word: &str = (one_of(is_pn_chars_base), name_tail)
        .take()
        .parse_next(input)?;
    if opt(':').parse_next(input)?.is_some() {
        let local = local_name(input)?;
        return Ok(TokenKind::PrefixedName {
            prefix: word.to_owned(),
            local,
        });
    }
    match word {
        "a" => Ok(TokenKind::A),
        "true" => Ok(TokenKind::True),
        "false" => Ok(TokenKind::False),
        w if w.eq_ignore_ascii_case("prefix") => Ok(TokenKind::SparqlPrefix),
        w if w.eq_ignore_ascii_case("base") => Ok(TokenKind::SparqlBase),
        _ => backtrack(),
    }
}

/// The local part after `prefix:`, possibly empty.
///
/// `\`-escapes are decoded; `%XX` sequences are kept verbatim. Dots stay in
/// the name only when more name characters follow them.
fn local_name(input: &mut Input<'_>) -> ModalResult<String> {
    let mut local = String::new();
    loop {
        let rest = remaining(input);
        match rest.chars().next() {
            Some('\\') => {
                '\\'.parse_next(input)?;
                local.push(one_of(|c: char| LOCAL_ESCAPABLE.contains(c)).parse_next(input)?);
            }
            Some('%') => {
                local.push_str(('%', take_while(2, AsChar::is_hex_digit)).take().parse_next(input)?);
            }
            Some('.') => {
                let after_dots = rest.trim_start_matches('.');
                if !after_dots.starts_with(|c: char| is_local_char(c) || c == '%' || c == '\\') {
                    return Ok(local);
                }
                local.push_str(take_while(1.., '.').parse_next(input)?);
            }
            Some(c) if is_local_char(c) => {
                local.push_str(take_while(1.., is_local_char).parse_next(input)?);
            }
            _ => return Ok(local),
        }
    }
}

/// Short and long strings in either quote style, escapes decoded.
fn string_literal(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    let (quote, long) = alt((
        "\"\"\"".value(('"', true)),
        "'''".value(('\'', true)),
        '"'.value(('"', false)),
        '\''.value(('\'', false)),
    ))
    .parse_next(input)?;
    string_body(input, quote, long).map(TokenKind::String)
}

/// Everything after the opening quotes, including the closing ones.
///
/// A long string may end with up to two extra quotes: `"""a"""""` is `a""`.
fn string_body(input: &mut Input<'_>, quote: char, long: bool) -> ModalResult<String> {
    let mut value = String::new();
    loop {
        value.push_str(
            take_till(0.., |c: char| {
                c == quote || c == '\\' || (!long && matches!(c, '\n' | '\r'))
            })
            .parse_next(input)?,
        );
        let rest = remaining(input);
        match rest.chars().next() {
            Some('\\') => {
                '\\'.parse_next(input)?;
                value.push(string_escape(input)?);
            }
            Some(c) if c == quote && long => {
                let run = rest.len() - rest.trim_start_matches(quote).len();
                if run >= 3 {
                    value.push_str(take((run - 3).min(2)).parse_next(input)?);
                    take(3usize).parse_next(input)?;
                    return Ok(value);
                }
                value.push_str(take(run).parse_next(input)?);
            }
            Some(c) if c == quote => {
                any.parse_next(input)?;
                return Ok(value);
            }
            // End of input, or a line break inside a short string.
            _ => return backtrack(),
        }
    }
}

fn string_escape(input: &mut Input<'_>) -> ModalResult<char> {
    alt((
        unicode_escape,
        any.verify_map(|c| match c {
            't' => Some('\t'),
            'b' => Some('\u{8}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            'f' => Some('\u{c}'),
            '"' => Some('"'),
            '\'' => Some('\''),
            '\\' => Some('\\'),
            _ => None,
        }),
    ))
    .parse_next(input)
}

/// Integer, decimal or double, kept as written.
fn number(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        (sign, mantissa, one_of(['e', 'E']), sign, digit1)
            .take()
            .map(|lexical: &str| TokenKind::Double(lexical.to_owned())),
        (sign, digit0, '.', digit1)
            .take()
            .map(|lexical: &str| TokenKind::Decimal(lexical.to_owned())),
        (sign, digit1)
            .take()
            .map(|lexical: &str| TokenKind::Integer(lexical.to_owned())),
    ))
    .parse_next(input)
}

fn sign(input: &mut Input<'_>) -> ModalResult<Option<char>> {
    opt(one_of(['+', '-'])).parse_next(input)
}

fn mantissa<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    alt((
        (digit1, opt(('.', digit0))).take(),
        ('.', digit1).take(),
    ))
    .parse_next(input)
}

fn punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c| match c {
        '.' => Some(TokenKind::Dot),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        _ => None,
    })
    .parse_next(input)
}
