//! Content stream lexer.
//!
//! Splits decoded content stream bytes into tokens. Content streams use the
//! same token syntax as the rest of PDF (numbers, strings, names, arrays,
//! dictionaries) but everything that is not an operand is an operator
//! keyword such as `rg`, `Tj` or `BT`.
//!
//! The lexer never fails. Bytes that cannot start a token (a stray `)` or
//! `>`) come out as [`Token::Invalid`] so the caller can see that an operand
//! run was interrupted.
//!
//! Inline image data (`BI ... ID <binary> EI`) is returned as a single
//! [`Token::InlineImageData`] so that binary payloads are never scanned for
//! operators.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_till, take_while, take_while1},
    character::complete::{char, one_of},
    combinator::{opt, recognize},
    sequence::{preceded, tuple},
};

/// Token types in a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Integer or real number
    Number(f32),
    /// Operator or keyword (`rg`, `k`, `BT`, `true`, `null`, ...)
    Keyword(&'a [u8]),
    /// Name without the leading `/`; `#XX` escapes are not decoded
    Name(&'a [u8]),
    /// Literal string content between the outer parentheses
    LiteralString(&'a [u8]),
    /// Hex string content between `<` and `>`
    HexString(&'a [u8]),
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `<<`
    DictStart,
    /// `>>`
    DictEnd,
    /// Binary data between `ID` and `EI`
    InlineImageData(&'a [u8]),
    /// A byte that cannot start a token
    Invalid(u8),
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'a> {
    /// The token
    pub token: Token<'a>,
    /// Offset into the lexed input
    pub offset: usize,
}

/// PDF whitespace (ISO 32000-1, Table 1).
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0C)
}

/// PDF delimiters (ISO 32000-1, Table 2).
pub fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

fn is_regular(byte: u8) -> bool {
    !is_whitespace(byte) && !is_delimiter(byte)
}

fn whitespace(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(is_whitespace)(input)
}

/// Skip whitespace and `%` comments.
fn skip_ws(input: &[u8]) -> IResult<&[u8], ()> {
    let mut remaining = input;
    while let Ok((rest, _)) = alt((whitespace, comment))(remaining) {
        remaining = rest;
    }
    Ok((remaining, ()))
}

fn comment(input: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(char('%'), take_till(|c| c == b'\r' || c == b'\n'))(input)
}

/// Parse a whole regular-character run as a number.
///
/// Accepts an optional sign, digits, and an optional decimal point with
/// optional fraction: `42`, `-3`, `+.5`, `0.`, `-.002`. At least one digit is
/// required.
pub fn parse_number(run: &[u8]) -> Option<f32> {
    let (rest, text) = number_syntax(run).ok()?;
    if !rest.is_empty() || !text.iter().any(u8::is_ascii_digit) {
        return None;
    }

    let text = std::str::from_utf8(text).ok()?;
    let (negative, unsigned) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    // Rust float parsing wants digits on both sides of the point.
    let mut normalized = String::with_capacity(unsigned.len() + 2);
    if unsigned.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(unsigned);
    if unsigned.ends_with('.') {
        normalized.push('0');
    }

    let value: f32 = normalized.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn digits(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while(|c: u8| c.is_ascii_digit())(input)
}

fn number_syntax(input: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((opt(one_of("+-")), digits, opt(preceded(char('.'), digits)))))(input)
}

/// Literal string with balanced parentheses and backslash escapes.
///
/// An unterminated string runs to the end of the input.
fn literal_string(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (body, _) = char('(')(input)?;
    let mut depth = 1usize;
    let mut pos = 0;

    while pos < body.len() {
        match body[pos] {
            b'\\' => pos += 1,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&body[pos + 1..], &body[..pos]));
                }
            },
            _ => {},
        }
        pos += 1;
    }

    Ok((&body[body.len()..], body))
}

/// Hex string `<...>`. An unterminated string runs to the end of the input.
fn hex_string(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (body, _) = char('<')(input)?;
    let (rest, content) = take_till(|c| c == b'>')(body)?;
    let rest = rest.strip_prefix(b">").unwrap_or(rest);
    Ok((rest, content))
}

fn name(input: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(char('/'), take_while(is_regular))(input)
}

fn regular_run(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(is_regular)(input)
}

/// Find the `EI` that ends inline image data: preceded by whitespace and
/// followed by whitespace, a delimiter, or the end of input.
///
/// Returns the length of the image data (excluding the whitespace before
/// `EI`), or `None` when no terminator exists.
fn find_inline_image_end(data: &[u8]) -> Option<usize> {
    (0..data.len().saturating_sub(2)).find(|&i| {
        is_whitespace(data[i])
            && &data[i + 1..i + 3] == b"EI"
            && data.get(i + 3).map_or(true, |&c| is_whitespace(c) || is_delimiter(c))
    })
}

/// Iterator over the tokens of a content stream.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a [u8],
    remaining: &'a [u8],
    in_inline_image: bool,
}

impl<'a> Lexer<'a> {
    /// Start lexing `input` from its first byte.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            remaining: input,
            in_inline_image: false,
        }
    }

    fn offset(&self) -> usize {
        self.input.len() - self.remaining.len()
    }

    fn inline_image_data(&mut self) -> Lexeme<'a> {
        // One whitespace byte separates ID from the data.
        let data = match self.remaining.first() {
            Some(&c) if is_whitespace(c) => &self.remaining[1..],
            _ => self.remaining,
        };
        let offset = self.input.len() - data.len();
        let len = find_inline_image_end(data).unwrap_or_else(|| {
            log::debug!("Inline image at byte {} has no EI terminator", offset);
            data.len()
        });

        self.remaining = &data[len..];
        Lexeme {
            token: Token::InlineImageData(&data[..len]),
            offset,
        }
    }
}

/// Lex one token from non-empty input positioned at a non-whitespace byte.
fn lex_token(input: &[u8]) -> (&[u8], Token<'_>) {
    let first = input[0];
    let parsed = match first {
        b'(' => literal_string(input).map(|(r, s)| (r, Token::LiteralString(s))),
        b'<' if input.get(1) == Some(&b'<') => Ok((&input[2..], Token::DictStart)),
        b'<' => hex_string(input).map(|(r, s)| (r, Token::HexString(s))),
        b'>' if input.get(1) == Some(&b'>') => Ok((&input[2..], Token::DictEnd)),
        b'[' => Ok((&input[1..], Token::ArrayStart)),
        b']' => Ok((&input[1..], Token::ArrayEnd)),
        b'/' => name(input).map(|(r, n)| (r, Token::Name(n))),
        _ => regular_run(input).map(|(r, run)| {
            let token = parse_number(run).map_or(Token::Keyword(run), Token::Number);
            (r, token)
        }),
    };

    parsed.unwrap_or((&input[1..], Token::Invalid(first)))
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Lexeme<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.in_inline_image {
            self.in_inline_image = false;
            return Some(self.inline_image_data());
        }

        let (rest, _) = skip_ws(self.remaining).ok()?;
        self.remaining = rest;
        if self.remaining.is_empty() {
            return None;
        }

        let offset = self.offset();
        let (rest, token) = lex_token(self.remaining);
        self.remaining = rest;

        if token == Token::Keyword(b"ID") {
            self.in_inline_image = true;
        }

        Some(Lexeme { token, offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Vec<Token<'_>> {
        Lexer::new(input).map(|l| l.token).collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_number(b"42"), Some(42.0));
        assert_eq!(parse_number(b"-3"), Some(-3.0));
        assert_eq!(parse_number(b"+.5"), Some(0.5));
        assert_eq!(parse_number(b"0."), Some(0.0));
        assert_eq!(parse_number(b"-.25"), Some(-0.25));
        assert_eq!(parse_number(b"1.5"), Some(1.5));
    }

    #[test]
    fn test_non_numbers() {
        assert_eq!(parse_number(b"."), None);
        assert_eq!(parse_number(b"-"), None);
        assert_eq!(parse_number(b"rg"), None);
        assert_eq!(parse_number(b"1.2.3"), None);
        assert_eq!(parse_number(b"12abc"), None);
        assert_eq!(parse_number(b"1e5"), None);
    }

    #[test]
    fn test_color_operator_tokens() {
        assert_eq!(
            tokens(b"0.2 .4 1 rg"),
            vec![
                Token::Number(0.2),
                Token::Number(0.4),
                Token::Number(1.0),
                Token::Keyword(b"rg"),
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let lexemes: Vec<_> = Lexer::new(b"  1 g\n0 G").collect();
        let offsets: Vec<_> = lexemes.iter().map(|l| l.offset).collect();
        assert_eq!(offsets, vec![2, 4, 6, 8]);
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            tokens(b"% 1 0 0 rg\n0 g % trailing"),
            vec![Token::Number(0.0), Token::Keyword(b"g")]
        );
    }

    #[test]
    fn test_skip_ws_combinator() {
        assert_eq!(skip_ws(b"  % a\n\t% b\r\n1 g"), Ok((&b"1 g"[..], ())));
        assert_eq!(skip_ws(b"%"), Ok((&b""[..], ())));
        assert_eq!(skip_ws(b""), Ok((&b""[..], ())));
        assert_eq!(skip_ws(b"rg"), Ok((&b"rg"[..], ())));
    }

    #[test]
    fn test_strings_and_names() {
        assert_eq!(
            tokens(b"/F1 12 Tf (a (nested\\) 1 g) str) Tj <0A0B> /"),
            vec![
                Token::Name(b"F1"),
                Token::Number(12.0),
                Token::Keyword(b"Tf"),
                Token::LiteralString(b"a (nested\\) 1 g) str"),
                Token::Keyword(b"Tj"),
                Token::HexString(b"0A0B"),
                Token::Name(b""),
            ]
        );
    }

    #[test]
    fn test_arrays_and_dicts() {
        assert_eq!(
            tokens(b"[(A) -50]TJ /P<</MCID 0>>BDC"),
            vec![
                Token::ArrayStart,
                Token::LiteralString(b"A"),
                Token::Number(-50.0),
                Token::ArrayEnd,
                Token::Keyword(b"TJ"),
                Token::Name(b"P"),
                Token::DictStart,
                Token::Name(b"MCID"),
                Token::Number(0.0),
                Token::DictEnd,
                Token::Keyword(b"BDC"),
            ]
        );
    }

    #[test]
    fn test_stray_delimiters_are_invalid() {
        assert_eq!(
            tokens(b"1 ) 0 >"),
            vec![
                Token::Number(1.0),
                Token::Invalid(b')'),
                Token::Number(0.0),
                Token::Invalid(b'>'),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        assert_eq!(tokens(b"(1 0 0 rg"), vec![Token::LiteralString(b"1 0 0 rg")]);
    }

    #[test]
    fn test_inline_image_data_is_opaque() {
        let stream = b"BI /W 1 /H 1 /CS /RGB /BPC 8 ID \x001 0 0 rg\xff EI 0 g";
        let toks = tokens(stream);
        assert!(toks.contains(&Token::InlineImageData(b"\x001 0 0 rg\xff")));
        assert_eq!(&toks[toks.len() - 3..], &[
            Token::Keyword(b"EI"),
            Token::Number(0.0),
            Token::Keyword(b"g"),
        ]);
        assert!(!toks.contains(&Token::Keyword(b"rg")));
    }

    #[test]
    fn test_operator_glued_to_delimiter() {
        assert_eq!(
            tokens(b"(x)Tj/Cs1 cs"),
            vec![
                Token::LiteralString(b"x"),
                Token::Keyword(b"Tj"),
                Token::Name(b"Cs1"),
                Token::Keyword(b"cs"),
            ]
        );
    }
}
