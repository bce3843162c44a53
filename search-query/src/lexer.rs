//! # Search query lexer
//!
//! This module exposes the [`Lexer`], which splits a raw search
//! query into [`Token`]s, one at a time.
//!
//! - Spaces separate tokens and are otherwise ignored.
//! - `(` and `)` are always standalone tokens, even when glued to a
//!   word.
//! - `"…"` and `'…'` delimit a phrase. Inside a phrase, `\"` and `\'`
//!   stand for the quote itself. A phrase that is never closed
//!   extends to the end of the query.
//! - A word is read up to the next space or parenthesis, except
//!   when it contains a `:` directly followed by a quote: the value
//!   is then read as a phrase (`subject:"hello world"`).
//! - `and`, `or` and `not` words (whatever their case) are
//!   operators.

use std::fmt;

use tracing::{debug, trace};

/// The search query token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// A word, a phrase or a `field:value` pair.
    ///
    /// Quotes are already stripped and escaped quotes resolved. The
    /// split between field and value is left to the
    /// [`interpreter`](crate::filter::predicate::interpret).
    Word(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
    EndOfInput,
}

impl Token {
    fn from_word(word: String) -> Self {
        if word.eq_ignore_ascii_case("and") {
            Self::And
        } else if word.eq_ignore_ascii_case("or") {
            Self::Or
        } else if word.eq_ignore_ascii_case("not") {
            Self::Not
        } else {
            Self::Word(word)
        }
    }

    /// Return `true` if the token is an explicit boolean operator or
    /// an opening parenthesis.
    pub fn is_boolean_operator(&self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Not | Self::LParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(word) => write!(f, "{word}"),
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::Not => write!(f, "NOT"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// The search query lexer.
///
/// A lexer moves forward only: once [`Token::EndOfInput`] is
/// reached, it keeps returning it. Create a new lexer to read the
/// same query again.
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    token_start: usize,
    unterminated_quote: Option<usize>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            token_start: 0,
            unterminated_quote: None,
        }
    }

    /// The byte position where the last returned token starts.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// The byte position of the first quote that was never closed,
    /// if any was read so far.
    pub fn unterminated_quote(&self) -> Option<usize> {
        self.unterminated_quote
    }

    /// Read the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.token_start = self.pos;

        let token = match self.peek() {
            None => Token::EndOfInput,
            Some('(') => {
                self.bump();
                Token::LParen
            }
            Some(')') => {
                self.bump();
                Token::RParen
            }
            Some('"' | '\'') => Token::Word(self.read_quoted()),
            Some(_) => Token::from_word(self.read_word()),
        };

        trace!(%token, position = self.token_start, "read search query token");
        token
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Read a phrase, the cursor being on its opening quote.
    ///
    /// A backslash protects the next character from closing the
    /// phrase. Once the phrase is read, `\"` and `\'` are replaced by
    /// the quote alone, other backslashes are kept.
    fn read_quoted(&mut self) -> String {
        let start = self.pos;

        let Some(quote) = self.bump() else {
            return String::new();
        };

        let phrase_start = self.pos;
        let mut phrase_end = None;

        while let Some(c) = self.peek() {
            if c == quote {
                phrase_end = Some(self.pos);
                self.bump();
                break;
            }

            self.bump();

            if c == '\\' {
                self.bump();
            }
        }

        if phrase_end.is_none() {
            debug!(position = start, "quote never closed, phrase extends to the end");
            self.unterminated_quote.get_or_insert(start);
        }

        let phrase = &self.input[phrase_start..phrase_end.unwrap_or(self.pos)];
        phrase.replace("\\\"", "\"").replace("\\'", "'")
    }

    fn read_word(&mut self) -> String {
        let input = self.input;
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '(' || c == ')' {
                break;
            }

            if c == ':' && matches!(self.peek_second(), Some('"' | '\'')) {
                let field = &input[start..self.pos];
                self.bump();
                let value = self.read_quoted();
                return format!("{field}:{value}");
            }

            self.bump();
        }

        input[start..self.pos].to_owned()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token::EndOfInput => None,
            token => Some(token),
        }
    }
}
