//! Template tokenizer.
//!
//! Tag-shaped syntax is handled by the html5ever tokenizer. Text runs it
//! produces are scanned here for brace constructs:
//!
//! | Leading char | Kind         |
//! |--------------|--------------|
//! | `?`          | `When`       |
//! | `^`          | `Unless`     |
//! | `#`          | `Range`      |
//! | `/`          | `EndControl` |
//! | `!`          | `Comment`    |
//! | otherwise    | `Variable`   |
//!
//! Input is read from any `io::Read` in fixed-size chunks; an incomplete
//! UTF-8 sequence at a chunk boundary is carried over to the next read.

use std::collections::VecDeque;
use std::io::Read;
use std::ops::Range;

use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer as HtmlTokenizer,
    TokenizerOpts,
};
use tendril::StrTendril;
use tracing::trace;

use crate::error::TokenError;
use crate::normalize;

const READ_CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    TagOpen,
    TagClose,
    TagSelfClosing,
    Text,
    Variable,
    When,
    Unless,
    Range,
    EndControl,
    Comment,
    Error,
}

impl TokenKind {
    /// Marker character that introduces a brace construct of this kind.
    fn marker(self) -> Option<char> {
        match self {
            TokenKind::When => Some('?'),
            TokenKind::Unless => Some('^'),
            TokenKind::Range => Some('#'),
            TokenKind::EndControl => Some('/'),
            TokenKind::Comment => Some('!'),
            _ => None,
        }
    }
}

/// One attribute of the current start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAttr {
    /// Key as lower-cased by the HTML tokenizer.
    pub raw_key: String,
    /// Key after data-/aria- preservation and kebab to camel conversion.
    pub key: String,
    /// Literal value, or the trimmed identifier for expressions.
    pub value: String,
    pub is_expression: bool,
}

impl TagAttr {
    fn new(raw_key: String, value: String) -> Self {
        let key = normalize::attr_key(&raw_key);
        match expression_value(&value) {
            Some(expr) => TagAttr {
                raw_key,
                key,
                value: expr.to_string(),
                is_expression: true,
            },
            None => TagAttr {
                raw_key,
                key,
                value,
                is_expression: false,
            },
        }
    }
}

/// Inner identifier when the trimmed value is exactly one `{ ... }` group.
fn expression_value(value: &str) -> Option<&str> {
    let rest = value.trim_start_matches(is_space).strip_prefix('{')?;
    let close = rest.find('}')?;
    if !rest[close + 1..].chars().all(is_space) {
        return None;
    }
    Some(rest[..close].trim_matches(is_space))
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn brace_kind(inner: &str) -> TokenKind {
    match inner.trim_start_matches(is_space).chars().next() {
        Some('?') => TokenKind::When,
        Some('^') => TokenKind::Unless,
        Some('#') => TokenKind::Range,
        Some('/') => TokenKind::EndControl,
        Some('!') => TokenKind::Comment,
        _ => TokenKind::Variable,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTML SINK
// ═══════════════════════════════════════════════════════════════════════════════

enum Lexeme {
    Tag {
        kind: TokenKind,
        name: String,
        attrs: Vec<TagAttr>,
    },
    Text(String),
    End,
}

/// Collects html5ever tokens, merging adjacent character runs.
///
/// A text run is only queued once a tag or end of input terminates it, so
/// brace constructs split across read chunks are seen whole.
#[derive(Default)]
struct Sink {
    queue: VecDeque<Lexeme>,
    text: String,
}

impl Sink {
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.queue
                .push_back(Lexeme::Text(std::mem::take(&mut self.text)));
        }
    }

    fn push_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        let name = tag.name.to_string();
        let kind = match tag.kind {
            TagKind::EndTag => TokenKind::TagClose,
            TagKind::StartTag if tag.self_closing => TokenKind::TagSelfClosing,
            TagKind::StartTag => TokenKind::TagOpen,
        };
        let attrs = tag
            .attrs
            .into_iter()
            .map(|a| TagAttr::new(a.name.local.to_string(), a.value.to_string()))
            .collect();

        // Raw-text elements would otherwise have their content read as markup.
        let next = match (kind, name.as_str()) {
            (TokenKind::TagOpen, "script") => TokenSinkResult::RawData(RawKind::ScriptData),
            (TokenKind::TagOpen, "style") => TokenSinkResult::RawData(RawKind::Rawtext),
            (TokenKind::TagOpen, "textarea" | "title") => {
                TokenSinkResult::RawData(RawKind::Rcdata)
            }
            _ => TokenSinkResult::Continue,
        };
        self.queue.push_back(Lexeme::Tag { kind, name, attrs });
        next
    }
}

impl TokenSink for Sink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(s) => self.text.push_str(&s),
            Token::NullCharacterToken => self.text.push('\u{FFFD}'),
            Token::TagToken(tag) => {
                self.flush_text();
                return self.push_tag(tag);
            }
            Token::ParseError(msg) => trace!(error = %msg, "recoverable markup error"),
            Token::EOFToken => {
                self.flush_text();
                self.queue.push_back(Lexeme::End);
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOKENIZER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Tokenizer<R> {
    reader: R,
    html: HtmlTokenizer<Sink>,
    input: BufferQueue,
    /// Bytes of an incomplete UTF-8 sequence from the previous read.
    carry: Vec<u8>,
    /// Total bytes read so far.
    offset: usize,
    ended: bool,

    kind: TokenKind,
    err: Option<TokenError>,

    text: String,
    pos: usize,
    tok: Range<usize>,

    tag_name: String,
    attrs: Vec<TagAttr>,
    attr_pos: usize,
}

impl<R: Read> Tokenizer<R> {
    pub fn new(reader: R) -> Self {
        Tokenizer {
            reader,
            html: HtmlTokenizer::new(Sink::default(), TokenizerOpts::default()),
            input: BufferQueue::default(),
            carry: Vec::new(),
            offset: 0,
            ended: false,
            kind: TokenKind::Error,
            err: None,
            text: String::new(),
            pos: 0,
            tok: 0..0,
            tag_name: String::new(),
            attrs: Vec::new(),
            attr_pos: 0,
        }
    }

    /// Advance to the next token.
    ///
    /// Returns `TokenKind::Error` at end of input or on a read failure;
    /// `err()` tells the two apart.
    pub fn next(&mut self) -> TokenKind {
        if self.err.is_some() {
            self.kind = TokenKind::Error;
            return self.kind;
        }
        if self.pos < self.text.len() {
            self.scan_text();
            return self.kind;
        }

        loop {
            match self.html.sink.queue.pop_front() {
                Some(Lexeme::Text(text)) => {
                    self.text = text;
                    self.pos = 0;
                    self.scan_text();
                    return self.kind;
                }
                Some(Lexeme::Tag { kind, name, attrs }) => {
                    self.text.clear();
                    self.pos = 0;
                    self.tok = 0..0;
                    self.tag_name = name;
                    self.attrs = attrs;
                    self.attr_pos = 0;
                    self.kind = kind;
                    return self.kind;
                }
                Some(Lexeme::End) => return self.fail(TokenError::Eof),
                None => {
                    if let Err(e) = self.fill() {
                        return self.fail(e);
                    }
                }
            }
        }
    }

    fn fail(&mut self, err: TokenError) -> TokenKind {
        self.err = Some(err);
        self.kind = TokenKind::Error;
        self.kind
    }

    /// Read one chunk and feed the decoded part to the HTML tokenizer.
    fn fill(&mut self) -> Result<(), TokenError> {
        if self.ended {
            return Err(TokenError::Eof);
        }

        let mut chunk = [0u8; READ_CHUNK];
        let n = loop {
            match self.reader.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(TokenError::Io(e)),
            }
        };

        if n == 0 {
            if !self.carry.is_empty() {
                return Err(TokenError::InvalidUtf8 {
                    offset: self.offset - self.carry.len(),
                });
            }
            self.ended = true;
            self.html.end();
            return Ok(());
        }

        let start = self.offset - self.carry.len();
        self.offset += n;
        let mut bytes = std::mem::take(&mut self.carry);
        bytes.extend_from_slice(&chunk[..n]);

        let valid = match std::str::from_utf8(&bytes) {
            Ok(_) => bytes.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(TokenError::InvalidUtf8 {
                    offset: start + e.valid_up_to(),
                })
            }
        };
        self.carry = bytes.split_off(valid);

        // Validated above; cannot fail.
        if let Ok(s) = std::str::from_utf8(&bytes) {
            if !s.is_empty() {
                self.input.push_back(StrTendril::from_slice(s));
                let _ = self.html.feed(&mut self.input);
            }
        }
        Ok(())
    }

    /// Produce the next Text or brace token from the current text run.
    fn scan_text(&mut self) {
        let start = self.pos;
        let end = self.text.len();
        let rest = &self.text[start..];

        let open = match rest.find('{') {
            None => return self.text_token(start, end),
            Some(0) => start,
            Some(i) => return self.text_token(start, start + i),
        };
        let close = match self.text[open + 1..].find('}') {
            None => return self.text_token(open, end),
            Some(i) => open + 1 + i,
        };

        self.kind = brace_kind(&self.text[open + 1..close]);
        self.tok = open + 1..close;
        self.pos = close + 1;
    }

    fn text_token(&mut self, from: usize, to: usize) {
        self.kind = TokenKind::Text;
        self.tok = from..to;
        self.pos = to;
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn err(&self) -> Option<&TokenError> {
        self.err.as_ref()
    }

    /// Take ownership of the stored error, leaving `Eof` in its place.
    pub fn take_err(&mut self) -> Option<TokenError> {
        self.err
            .as_mut()
            .map(|e| std::mem::replace(e, TokenError::Eof))
    }

    /// Source text of the current token.
    ///
    /// For Text this is the literal run, for brace tokens everything between
    /// the braces, and for tags the lower-cased tag name.
    pub fn raw(&self) -> &str {
        match self.kind {
            TokenKind::TagOpen | TokenKind::TagClose | TokenKind::TagSelfClosing => {
                &self.tag_name
            }
            TokenKind::Error => "",
            _ => &self.text[self.tok.clone()],
        }
    }

    /// Tag name of the current tag token.
    pub fn tag_name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::TagOpen | TokenKind::TagClose | TokenKind::TagSelfClosing => {
                Some(&self.tag_name)
            }
            _ => None,
        }
    }

    /// Next attribute of the current start tag, in source order.
    pub fn tag_attr(&mut self) -> Option<&TagAttr> {
        match self.kind {
            TokenKind::TagOpen | TokenKind::TagSelfClosing => {}
            _ => return None,
        }
        let attr = self.attrs.get(self.attr_pos)?;
        self.attr_pos += 1;
        Some(attr)
    }

    /// Trimmed name of a Variable, When, Unless, Range or EndControl token.
    pub fn control_name(&self) -> &str {
        match self.kind {
            TokenKind::Variable
            | TokenKind::When
            | TokenKind::Unless
            | TokenKind::Range
            | TokenKind::EndControl => self.brace_body(),
            _ => "",
        }
    }

    /// Trimmed body of a Comment token.
    pub fn comment(&self) -> &str {
        match self.kind {
            TokenKind::Comment => self.brace_body(),
            _ => "",
        }
    }

    fn brace_body(&self) -> &str {
        let inner = self.raw().trim_matches(is_space);
        let body = match self.kind.marker() {
            Some(m) => inner.strip_prefix(m).unwrap_or(inner),
            None => inner,
        };
        body.trim_matches(is_space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_value() {
        assert_eq!(expression_value("{name}"), Some("name"));
        assert_eq!(expression_value("  { user.name }  "), Some("user.name"));
        assert_eq!(expression_value("{a}{b}"), None);
        assert_eq!(expression_value("x {a}"), None);
        assert_eq!(expression_value("{open"), None);
        assert_eq!(expression_value(""), None);
    }

    #[test]
    fn test_brace_kind() {
        assert_eq!(brace_kind("?ok"), TokenKind::When);
        assert_eq!(brace_kind("  ^ok"), TokenKind::Unless);
        assert_eq!(brace_kind("#items"), TokenKind::Range);
        assert_eq!(brace_kind("/items"), TokenKind::EndControl);
        assert_eq!(brace_kind("! note"), TokenKind::Comment);
        assert_eq!(brace_kind("name"), TokenKind::Variable);
        assert_eq!(brace_kind("   "), TokenKind::Variable);
    }
}
