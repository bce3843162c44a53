//! # Search query filter parser
//!
//! This module contains the [`Parser`], which builds a
//! [`FilterNode`] tree from the tokens of a [`Lexer`].
//!
//! # Operators
//!
//! There are 3 operators, ordered by precedence:
//!
//! - `NOT <filter>`
//! - `<filter> AND <filter>`, or simply `<filter> <filter>`
//! - `<filter> OR <filter>`
//!
//! `NOT` has the highest priority, then `AND` and finally `OR`: `a
//! OR b AND NOT c` is the same as `a OR (b AND (NOT c))`. Filters can
//! be wrapped into parentheses `(…)` to change the precedence.
//!
//! # Grammar
//!
//! ```abnf,ignore
//! expr     = or-expr
//! or-expr  = and-expr *( "OR" and-expr )
//! and-expr = not-expr *( [ "AND" ] not-expr )
//! not-expr = "NOT" not-expr / primary
//! primary  = "(" expr ")" / term
//! term     = word
//! ```
//!
//! # Malformed queries
//!
//! By default, the parser never fails:
//!
//! - a missing right operand is dropped (`a AND`, `a AND OR b`),
//! - a missing left operand gives up the current expression (`OR a`
//!   and `() a` hold no filter),
//! - a parenthesis that is never closed extends to the end,
//! - a closing parenthesis without opening match ends the query,
//! - parentheses and `NOT` nested deeper than the
//!   [maximum depth](Parser::with_max_depth) are ignored.
//!
//! A [strict](Parser::with_strict) parser reports these cases
//! instead, except for missing right operands.

use tracing::{debug, trace};

use crate::{
    lexer::{Lexer, Token},
    Error, Result,
};

use super::{predicate::interpret, FilterNode};

/// The default maximum nesting depth of parentheses and `NOT`
/// operators.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// The search query filter parser.
///
/// A parser owns its cursor over the query, and is consumed by
/// [`Parser::parse`].
#[derive(Clone, Debug)]
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    current: Token,
    position: usize,
    strict: bool,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        let position = lexer.token_start();

        Self {
            input,
            lexer,
            current,
            position,
            strict: false,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole query.
    ///
    /// Returns [`None`] when the query holds no term at all, for
    /// example an empty query. A non-strict parser never fails.
    pub fn parse(mut self) -> Result<Option<FilterNode>> {
        self.check_quotes()?;

        let filter = self.parse_or()?;

        if self.current == Token::RParen {
            if self.strict {
                let query = self.input.to_owned();
                return Err(Error::UnmatchedClosingParenError(self.position, query));
            }

            debug!(
                position = self.position,
                "unmatched closing parenthesis, ignoring the rest of the query"
            );
        }

        trace!(?filter, "parsed search query filter");
        Ok(filter)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token();
        self.position = self.lexer.token_start();
        self.check_quotes()
    }

    fn check_quotes(&self) -> Result<()> {
        match self.lexer.unterminated_quote() {
            Some(position) if self.strict => {
                let query = self.input.to_owned();
                Err(Error::UnterminatedQuoteError(position, query))
            }
            _ => Ok(()),
        }
    }

    fn parse_or(&mut self) -> Result<Option<FilterNode>> {
        let Some(first) = self.parse_and()? else {
            return Ok(None);
        };

        let mut nodes = vec![first];

        while self.current == Token::Or {
            self.advance()?;
            nodes.extend(self.parse_and()?);
        }

        Ok(FilterNode::or(nodes))
    }

    fn parse_and(&mut self) -> Result<Option<FilterNode>> {
        let Some(first) = self.parse_not()? else {
            return self.missing_operand();
        };

        let mut nodes = vec![first];

        loop {
            match self.current {
                Token::And => {
                    self.advance()?;
                    nodes.extend(self.parse_not()?);
                }
                // implicit AND
                Token::Word(_) | Token::Not | Token::LParen => {
                    nodes.extend(self.parse_not()?);
                }
                _ => break,
            }
        }

        Ok(FilterNode::and(nodes))
    }

    /// Give up the current expression, its left operand being
    /// missing.
    fn missing_operand(&self) -> Result<Option<FilterNode>> {
        if matches!(self.current, Token::EndOfInput | Token::RParen) {
            return Ok(None);
        }

        if self.strict {
            let query = self.input.to_owned();
            return Err(Error::MissingOperandError(self.position, query));
        }

        debug!(
            position = self.position,
            token = %self.current,
            "missing left operand, giving up the expression"
        );

        Ok(None)
    }

    fn parse_not(&mut self) -> Result<Option<FilterNode>> {
        if self.current != Token::Not {
            return self.parse_primary();
        }

        if self.depth >= self.max_depth {
            return self.skip_too_deep();
        }

        self.depth += 1;
        self.advance()?;
        let filter = self.parse_not()?.map(FilterNode::not);
        self.depth -= 1;

        Ok(filter)
    }

    fn parse_primary(&mut self) -> Result<Option<FilterNode>> {
        if self.current != Token::LParen {
            return self.parse_term();
        }

        if self.depth >= self.max_depth {
            return self.skip_too_deep();
        }

        let position = self.position;
        self.depth += 1;
        self.advance()?;

        let filter = self.parse_or()?;

        match self.current {
            Token::RParen => self.advance()?,
            Token::EndOfInput if self.strict => {
                let query = self.input.to_owned();
                return Err(Error::UnclosedParenError(position, query));
            }
            Token::EndOfInput => {
                debug!(position, "parenthesis never closed, extending it to the end");
            }
            // the expression was given up
            _ => (),
        }

        self.depth -= 1;
        Ok(filter)
    }

    /// Skip the operand under the cursor without descending into it,
    /// the nesting being too deep.
    fn skip_too_deep(&mut self) -> Result<Option<FilterNode>> {
        let position = self.position;

        if self.strict {
            let query = self.input.to_owned();
            return Err(Error::QueryTooDeepError(position, query));
        }

        while self.current == Token::Not {
            self.advance()?;
        }

        match self.current {
            Token::Word(_) => self.advance()?,
            Token::LParen => {
                let mut open = 0usize;
                loop {
                    match self.current {
                        Token::LParen => open += 1,
                        Token::RParen => open -= 1,
                        Token::EndOfInput => break,
                        _ => (),
                    }

                    self.advance()?;

                    if open == 0 {
                        break;
                    }
                }
            }
            _ => (),
        }

        debug!(position, max_depth = self.max_depth, "nesting too deep, skipping operand");
        Ok(None)
    }

    fn parse_term(&mut self) -> Result<Option<FilterNode>> {
        let predicate = match &self.current {
            Token::Word(word) => interpret(word),
            _ => return Ok(None),
        };

        self.advance()?;
        Ok(Some(predicate.into()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        filter::{
            predicate::{Keyword, Predicate, TextField},
            FilterNode, Operator,
        },
        Error,
    };

    use super::Parser;

    fn parse(input: &str) -> Option<FilterNode> {
        Parser::new(input).parse().unwrap()
    }

    fn parse_strict(input: &str) -> crate::Result<Option<FilterNode>> {
        Parser::new(input).with_strict(true).parse()
    }

    fn text(s: &str) -> FilterNode {
        Predicate::FreeText(s.into()).into()
    }

    fn and(nodes: Vec<FilterNode>) -> FilterNode {
        FilterNode::Boolean(Operator::And, nodes)
    }

    fn or(nodes: Vec<FilterNode>) -> FilterNode {
        FilterNode::Boolean(Operator::Or, nodes)
    }

    fn not(node: FilterNode) -> FilterNode {
        FilterNode::not(node)
    }

    #[test]
    fn empty() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn single_term() {
        assert_eq!(parse("hello"), Some(text("hello")));
        assert_eq!(parse("(hello)"), Some(text("hello")));
        assert_eq!(parse("((hello))"), Some(text("hello")));
        assert_eq!(
            parse("from:alice"),
            Some(Predicate::FieldText(TextField::From, "alice".into()).into()),
        );
    }

    #[test]
    fn precedence() {
        assert_eq!(
            parse("a OR b AND NOT c"),
            Some(or(vec![text("a"), and(vec![text("b"), not(text("c"))])])),
        );

        assert_eq!(
            parse("a AND b OR c"),
            Some(or(vec![and(vec![text("a"), text("b")]), text("c")])),
        );
    }

    #[test]
    fn implicit_and() {
        assert_eq!(parse("a b"), parse("a AND b"));
        assert_eq!(parse("a b c"), Some(and(vec![text("a"), text("b"), text("c")])));
        assert_eq!(
            parse("a NOT b (c OR d)"),
            Some(and(vec![
                text("a"),
                not(text("b")),
                or(vec![text("c"), text("d")]),
            ])),
        );
    }

    #[test]
    fn grouping() {
        assert_eq!(
            parse("(a OR b) AND c"),
            Some(and(vec![or(vec![text("a"), text("b")]), text("c")])),
        );

        assert_eq!(
            parse("a AND (b AND c)"),
            Some(and(vec![text("a"), and(vec![text("b"), text("c")])])),
        );
    }

    #[test]
    fn multi_way() {
        assert_eq!(
            parse("a OR b OR c"),
            Some(or(vec![text("a"), text("b"), text("c")])),
        );
    }

    #[test]
    fn nested_not() {
        assert_eq!(parse("NOT NOT a"), Some(not(not(text("a")))));
        assert_eq!(
            parse("NOT (a OR b)"),
            Some(not(or(vec![text("a"), text("b")]))),
        );
        assert_eq!(
            parse("NOT is:unread"),
            Some(not(Predicate::KeywordPresence(Keyword::Seen, false).into())),
        );
    }

    #[test]
    fn missing_right_operands() {
        assert_eq!(parse("a AND"), Some(text("a")));
        assert_eq!(parse("a OR"), Some(text("a")));
        assert_eq!(parse("a AND OR b"), Some(or(vec![text("a"), text("b")])));
        assert_eq!(parse("a ()"), Some(text("a")));
        assert_eq!(parse("NOT"), None);
        assert_eq!(parse("OR"), None);
        assert_eq!(parse("()"), None);
    }

    #[test]
    fn missing_left_operands() {
        assert_eq!(parse("OR a"), None);
        assert_eq!(parse("AND a"), None);
        assert_eq!(parse("() a"), None);
        assert_eq!(parse("(OR a)"), None);
        assert_eq!(parse("NOT OR a"), None);
        assert_eq!(parse("a (OR b) c"), Some(or(vec![text("a"), text("b")])));
        assert_eq!(parse("a OR (AND b) OR c"), Some(text("a")));
    }

    #[test]
    fn deep_nesting() {
        let query = format!("{}a{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&query), Some(text("a")));

        let query = format!("{}a", "(".repeat(100_000));
        assert_eq!(parse(&query), None);

        let query = format!("{}a", "NOT ".repeat(100_000));
        assert_eq!(parse(&query), None);

        assert_eq!(
            Parser::new("b ((a)) c").with_max_depth(1).parse().unwrap(),
            Some(and(vec![text("b"), text("c")])),
        );
        assert_eq!(
            Parser::new("b NOT NOT a").with_max_depth(1).parse().unwrap(),
            Some(text("b")),
        );
    }

    #[test]
    fn unbalanced_parentheses() {
        assert_eq!(parse("(a OR b"), Some(or(vec![text("a"), text("b")])));
        assert_eq!(
            parse("(a OR b) c)"),
            Some(and(vec![or(vec![text("a"), text("b")]), text("c")])),
        );
        assert_eq!(parse("a ) b"), Some(text("a")));
        assert_eq!(parse(") a"), None);
    }

    #[test]
    fn unterminated_quote() {
        assert_eq!(
            parse("a \"b OR c"),
            Some(and(vec![text("a"), text("b OR c")])),
        );
    }

    #[test]
    fn strict() {
        assert_eq!(
            parse_strict("(a OR b) AND c").unwrap(),
            parse("(a OR b) AND c"),
        );

        match parse_strict("a \"b c").unwrap_err() {
            Error::UnterminatedQuoteError(position, query) => {
                assert_eq!(position, 2);
                assert_eq!(query, "a \"b c");
            }
            err => panic!("unexpected error: {err:?}"),
        }

        match parse_strict("a) b").unwrap_err() {
            Error::UnmatchedClosingParenError(position, _) => assert_eq!(position, 1),
            err => panic!("unexpected error: {err:?}"),
        }

        match parse_strict("a (b OR c").unwrap_err() {
            Error::UnclosedParenError(position, _) => assert_eq!(position, 2),
            err => panic!("unexpected error: {err:?}"),
        }
    }

    #[test]
    fn strict_missing_left_operand() {
        match parse_strict("a (OR b)").unwrap_err() {
            Error::MissingOperandError(position, _) => assert_eq!(position, 3),
            err => panic!("unexpected error: {err:?}"),
        }

        assert!(matches!(
            parse_strict("AND a"),
            Err(Error::MissingOperandError(0, _)),
        ));
        assert_eq!(parse_strict("a AND").unwrap(), Some(text("a")));
    }

    #[test]
    fn strict_deep_nesting() {
        let query = format!("{}a", "(".repeat(100_000));
        assert!(matches!(
            parse_strict(&query),
            Err(Error::QueryTooDeepError(128, _)),
        ));
    }

    #[test]
    fn strict_unterminated_first_token() {
        assert!(matches!(
            parse_strict("\"abc"),
            Err(Error::UnterminatedQuoteError(0, _)),
        ));
    }
}
