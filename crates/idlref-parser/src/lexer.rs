//! IDL tokenizer.
//!
//! Keywords are not distinguished here: they lex as identifiers and the
//! parser matches on their text, which lets keywords double as argument names.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Integer,
    Decimal,
    String,
    /// Single punctuation character or `...`.
    Punct,
    EndOfFile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: u32,
}

/// Lexing failure: the offending byte offset and a description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub offset: u32,
    pub message: String,
}

pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < bytes.len() {
        let b = bytes[pos];

        // Whitespace and comments
        if b.is_ascii_whitespace() {
            pos += 1;
            continue;
        }
        if source[pos..].starts_with("//") {
            pos = source[pos..].find('\n').map_or(bytes.len(), |n| pos + n + 1);
            continue;
        }
        if source[pos..].starts_with("/*") {
            let Some(end) = source[pos + 2..].find("*/") else {
                return Err(LexError {
                    offset: pos as u32,
                    message: "Unterminated comment".to_string(),
                });
            };
            pos += end + 4;
            continue;
        }

        let start = pos;
        let kind = if b == b'"' {
            let Some(end) = source[pos + 1..].find('"') else {
                return Err(LexError {
                    offset: pos as u32,
                    message: "Unterminated string".to_string(),
                });
            };
            pos += end + 2;
            TokenKind::String
        } else if source[pos..].starts_with("-Infinity") {
            pos += "-Infinity".len();
            TokenKind::Identifier
        } else if b.is_ascii_digit()
            || (matches!(b, b'-' | b'.') && bytes.get(pos + 1).is_some_and(|n| n.is_ascii_digit()))
        {
            let (len, kind) = scan_number(&bytes[pos..]);
            pos += len;
            kind
        } else if is_identifier_start(bytes, pos) {
            pos += 1;
            while pos < bytes.len()
                && (bytes[pos].is_ascii_alphanumeric() || matches!(bytes[pos], b'_' | b'-'))
            {
                pos += 1;
            }
            TokenKind::Identifier
        } else if source[pos..].starts_with("...") {
            pos += 3;
            TokenKind::Punct
        } else if b"(),:;<=>?*[]{}".contains(&b) {
            pos += 1;
            TokenKind::Punct
        } else {
            let ch = source[pos..].chars().next().unwrap_or('?');
            return Err(LexError {
                offset: pos as u32,
                message: format!("Unexpected character '{ch}'"),
            });
        };

        tokens.push(Token {
            kind,
            text: &source[start..pos],
            start: start as u32,
        });
    }

    tokens.push(Token {
        kind: TokenKind::EndOfFile,
        text: "",
        start: bytes.len() as u32,
    });
    Ok(tokens)
}

fn is_identifier_start(bytes: &[u8], pos: usize) -> bool {
    match bytes[pos] {
        b'_' | b'-' => bytes.get(pos + 1).is_some_and(u8::is_ascii_alphabetic),
        b => b.is_ascii_alphabetic(),
    }
}

/// Length and kind of the numeric literal at the start of `bytes`.
fn scan_number(bytes: &[u8]) -> (usize, TokenKind) {
    let mut i = 0;
    if bytes[i] == b'-' {
        i += 1;
    }
    if bytes.get(i) == Some(&b'0') && matches!(bytes.get(i + 1), Some(b'x' | b'X')) {
        i += 2;
        while bytes.get(i).is_some_and(u8::is_ascii_hexdigit) {
            i += 1;
        }
        return (i, TokenKind::Integer);
    }

    let mut kind = TokenKind::Integer;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if bytes.get(i) == Some(&b'.') {
        kind = TokenKind::Decimal;
        i += 1;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if bytes.get(j).is_some_and(u8::is_ascii_digit) {
            kind = TokenKind::Decimal;
            i = j;
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
    }
    (i, kind)
}
