//! Recursive-descent Turtle parser.
//!
//! Consumes the token stream and appends statements to a `GraphBuilder` in
//! document order. Nested blank node property lists emit their own
//! statements before the statement that references them, so each subject's
//! statements keep their written order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::error::ParseError;
use super::lexer::tokenize;
use super::token::{Token, TokenKind};
use crate::graph::GraphBuilder;
use crate::types::{BLANK_NODE_PREFIX, Literal, Term};
use crate::vocab;

/// Deepest allowed nesting of `[...]` and `(...)`.
pub const MAX_NESTING: usize = 64;

pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    builder: &'a mut GraphBuilder,
    prefixes: HashMap<String, String>,
    base: Option<String>,
    /// Labels written in the document; generated labels must avoid them.
    used_labels: HashSet<String>,
    next_generated: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, builder: &'a mut GraphBuilder) -> Result<Self, ParseError> {
        let tokens = tokenize(input)?;
        let used_labels = tokens
            .iter()
            .filter_map(|token| match &token.kind {
                TokenKind::BlankNodeLabel(label) => Some(label.as_str().to_owned()),
                _ => None,
            })
            .collect();
        Ok(Self {
            input,
            tokens,
            pos: 0,
            builder,
            prefixes: HashMap::new(),
            base: None,
            used_labels,
            next_generated: 0,
            depth: 0,
        })
    }

    /// Parse the whole document.
    pub fn parse(mut self) -> Result<(), ParseError> {
        while !self.at(&TokenKind::Eof) {
            self.parse_statement()?;
        }
        Ok(())
    }

    fn current(&self) -> &Token {
        // The token list always ends with Eof and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.current().kind.clone();
        if !matches!(kind, TokenKind::Eof) {
            self.pos += 1;
        }
        kind
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(self.input, self.current().start, message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        self.error(format!(
            "expected {expected}, found {}",
            self.current().kind.describe()
        ))
    }

    /// Enter a `[...]` or `(...)`; the caller calls `leave` when done.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(format!("nesting deeper than {MAX_NESTING} levels")));
        }
        self.depth += 1;
        Ok(())
    }

    const fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<(), ParseError> {
        if self.at(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn parse_statement(&mut self) -> Result<(), ParseError> {
        match self.current().kind {
            TokenKind::PrefixDirective => self.parse_prefix(false),
            TokenKind::SparqlPrefix => self.parse_prefix(true),
            TokenKind::BaseDirective => self.parse_base(false),
            TokenKind::SparqlBase => self.parse_base(true),
            _ => self.parse_triples(),
        }
    }

    fn parse_prefix(&mut self, sparql_style: bool) -> Result<(), ParseError> {
        self.advance();
        let TokenKind::PrefixedName { prefix, local } = self.current().kind.clone() else {
            return Err(self.unexpected("prefix name"));
        };
        if !local.is_empty() {
            return Err(self.error(format!("prefix declaration '{prefix}:{local}' has a local part")));
        }
        self.advance();
        let TokenKind::Iri(reference) = self.current().kind.clone() else {
            return Err(self.unexpected("namespace IRI"));
        };
        let namespace = self.resolve_iri(&reference)?;
        self.advance();
        self.prefixes.insert(prefix, namespace);
        if !sparql_style {
            self.expect(&TokenKind::Dot, "'.' after @prefix")?;
        }
        Ok(())
    }

    fn parse_base(&mut self, sparql_style: bool) -> Result<(), ParseError> {
        self.advance();
        let TokenKind::Iri(reference) = self.current().kind.clone() else {
            return Err(self.unexpected("base IRI"));
        };
        let base = self.resolve_iri(&reference)?;
        self.advance();
        self.base = Some(base);
        if !sparql_style {
            self.expect(&TokenKind::Dot, "'.' after @base")?;
        }
        Ok(())
    }

    fn parse_triples(&mut self) -> Result<(), ParseError> {
        if self.at(&TokenKind::LBracket) {
            // `[ ... ] .` may stand alone without a predicate-object list.
            let subject = self.parse_blank_node_property_list()?;
            if !self.at(&TokenKind::Dot) {
                self.parse_predicate_object_list(&subject)?;
            }
        } else {
            let subject = self.parse_subject()?;
            self.parse_predicate_object_list(&subject)?;
        }
        self.expect(&TokenKind::Dot, "'.' at end of statement")
    }

    fn parse_subject(&mut self) -> Result<Arc<str>, ParseError> {
        match self.current().kind.clone() {
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => self.parse_iri_term(),
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Ok(self.labelled_blank(&label))
            }
            TokenKind::LParen => self.parse_collection(),
            _ => Err(self.unexpected("subject")),
        }
    }

    fn parse_predicate_object_list(&mut self, subject: &Arc<str>) -> Result<(), ParseError> {
        loop {
            let predicate = self.parse_predicate()?;
            self.parse_object_list(subject, &predicate)?;
            if !self.at(&TokenKind::Semicolon) {
                return Ok(());
            }
            // Repeated and trailing semicolons are allowed.
            while self.at(&TokenKind::Semicolon) {
                self.advance();
            }
            if matches!(
                self.current().kind,
                TokenKind::Dot | TokenKind::RBracket | TokenKind::Eof
            ) {
                return Ok(());
            }
        }
    }

    fn parse_predicate(&mut self) -> Result<Arc<str>, ParseError> {
        match self.current().kind {
            TokenKind::A => {
                self.advance();
                Ok(self.builder.intern(vocab::RDF_TYPE))
            }
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => self.parse_iri_term(),
            _ => Err(self.unexpected("predicate")),
        }
    }

    fn parse_object_list(&mut self, subject: &Arc<str>, predicate: &Arc<str>) -> Result<(), ParseError> {
        loop {
            let object = self.parse_object()?;
            self.emit(subject, predicate, object)?;
            if !self.at(&TokenKind::Comma) {
                return Ok(());
            }
            self.advance();
        }
    }

    fn parse_object(&mut self) -> Result<Term, ParseError> {
        match self.current().kind.clone() {
            TokenKind::Iri(_) | TokenKind::PrefixedName { .. } => {
                Ok(Term::resource(self.parse_iri_term()?))
            }
            TokenKind::BlankNodeLabel(label) => {
                self.advance();
                Ok(Term::resource(self.labelled_blank(&label)))
            }
            TokenKind::LBracket => Ok(Term::resource(self.parse_blank_node_property_list()?)),
            TokenKind::LParen => Ok(Term::resource(self.parse_collection()?)),
            TokenKind::String(value) => {
                self.advance();
                self.parse_literal_suffix(&value)
            }
            TokenKind::Integer(lexical) => Ok(self.typed_literal(&lexical, vocab::XSD_INTEGER)),
            TokenKind::Decimal(lexical) => Ok(self.typed_literal(&lexical, vocab::XSD_DECIMAL)),
            TokenKind::Double(lexical) => Ok(self.typed_literal(&lexical, vocab::XSD_DOUBLE)),
            TokenKind::True => Ok(self.typed_literal("true", vocab::XSD_BOOLEAN)),
            TokenKind::False => Ok(self.typed_literal("false", vocab::XSD_BOOLEAN)),
            _ => Err(self.unexpected("object")),
        }
    }

    /// Consume the current token and build a typed literal from `lexical`.
    fn typed_literal(&mut self, lexical: &str, datatype: &str) -> Term {
        self.advance();
        let lexical = self.builder.intern(lexical);
        let datatype = self.builder.intern(datatype);
        Term::Literal(Literal::typed(lexical, datatype))
    }

    /// Language tag or `^^datatype` following a string.
    fn parse_literal_suffix(&mut self, value: &str) -> Result<Term, ParseError> {
        let lexical = self.builder.intern(value);
        match self.current().kind.clone() {
            TokenKind::LangTag(tag) => {
                self.advance();
                let tag = self.builder.intern(&tag.to_ascii_lowercase());
                Ok(Term::Literal(Literal::tagged(lexical, tag)))
            }
            TokenKind::DoubleCaret => {
                self.advance();
                if !matches!(
                    self.current().kind,
                    TokenKind::Iri(_) | TokenKind::PrefixedName { .. }
                ) {
                    return Err(self.unexpected("datatype IRI"));
                }
                let datatype = self.parse_iri_term()?;
                Ok(Term::Literal(Literal::typed(lexical, datatype)))
            }
            _ => Ok(Term::Literal(Literal::plain(lexical))),
        }
    }

    /// `<iri>` or `prefix:local`, resolved and interned.
    fn parse_iri_term(&mut self) -> Result<Arc<str>, ParseError> {
        let iri = match self.current().kind.clone() {
            TokenKind::Iri(reference) => self.resolve_iri(&reference)?,
            TokenKind::PrefixedName { prefix, local } => {
                let Some(namespace) = self.prefixes.get(&prefix) else {
                    return Err(self.error(format!("undefined prefix '{prefix}:'")));
                };
                format!("{namespace}{local}")
            }
            _ => return Err(self.unexpected("IRI")),
        };
        self.advance();
        Ok(self.builder.intern(&iri))
    }

    /// `[ predicate object ; ... ]`, or `[]` for an anonymous node.
    fn parse_blank_node_property_list(&mut self) -> Result<Arc<str>, ParseError> {
        self.enter()?;
        self.expect(&TokenKind::LBracket, "'['")?;
        let node = self.fresh_blank();
        if !self.at(&TokenKind::RBracket) {
            self.parse_predicate_object_list(&node)?;
        }
        self.expect(&TokenKind::RBracket, "']'")?;
        self.leave();
        Ok(node)
    }

    /// `( item ... )` expanded into an `rdf:first`/`rdf:rest` chain.
    fn parse_collection(&mut self) -> Result<Arc<str>, ParseError> {
        self.enter()?;
        self.expect(&TokenKind::LParen, "'('")?;
        if self.at(&TokenKind::RParen) {
            self.advance();
            self.leave();
            return Ok(self.builder.intern(vocab::RDF_NIL));
        }
        let first = self.builder.intern(vocab::RDF_FIRST);
        let rest = self.builder.intern(vocab::RDF_REST);
        let head = self.fresh_blank();
        let mut node = Arc::clone(&head);
        loop {
            let item = self.parse_object()?;
            self.emit(&node, &first, item)?;
            if self.at(&TokenKind::RParen) {
                let nil = self.builder.intern(vocab::RDF_NIL);
                self.emit(&node, &rest, Term::resource(nil))?;
                break;
            }
            if self.at(&TokenKind::Eof) {
                return Err(self.unexpected("')'"));
            }
            let next = self.fresh_blank();
            self.emit(&node, &rest, Term::resource(Arc::clone(&next)))?;
            node = next;
        }
        self.advance();
        self.leave();
        Ok(head)
    }

    fn emit(&mut self, subject: &Arc<str>, predicate: &Arc<str>, object: Term) -> Result<(), ParseError> {
        self.builder
            .push(Arc::clone(subject), Arc::clone(predicate), object)
            .map_err(|e| self.error(e.to_string()))
    }

    fn labelled_blank(&mut self, label: &str) -> Arc<str> {
        self.builder.intern(&format!("{BLANK_NODE_PREFIX}{label}"))
    }

    /// A blank node label that does not clash with any label in the document.
    fn fresh_blank(&mut self) -> Arc<str> {
        loop {
            self.next_generated += 1;
            let label = format!("genid{}", self.next_generated);
            if !self.used_labels.contains(&label) {
                return self.labelled_blank(&label);
            }
        }
    }

    /// Resolve an IRI reference against the current base.
    fn resolve_iri(&self, reference: &str) -> Result<String, ParseError> {
        if has_scheme(reference) {
            return Ok(reference.to_owned());
        }
        let Some(base) = &self.base else {
            if reference.is_empty() {
                return Err(self.error("empty IRI with no @base in scope"));
            }
            return Err(self.error(format!("relative IRI <{reference}> with no @base in scope")));
        };
        Ok(resolve_against(base, reference))
    }
}

/// Whether `reference` starts with a URI scheme (`scheme:`).
fn has_scheme(reference: &str) -> bool {
    let Some(colon) = reference.find(':') else {
        return false;
    };
    let scheme = &reference[..colon];
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Simplified RFC 3986 reference resolution.
fn resolve_against(base: &str, reference: &str) -> String {
    let base_without_fragment = base.split('#').next().unwrap_or(base);
    if reference.is_empty() {
        return base_without_fragment.to_owned();
    }
    if reference.starts_with('#') {
        return format!("{base_without_fragment}{reference}");
    }
    let scheme_end = base.find(':').map_or(0, |i| i + 1);
    if reference.starts_with("//") {
        return format!("{}{reference}", &base[..scheme_end]);
    }
    let authority_end = if base[scheme_end..].starts_with("//") {
        base[scheme_end + 2..]
            .find('/')
            .map_or(base.len(), |i| scheme_end + 2 + i)
    } else {
        scheme_end
    };
    if reference.starts_with('/') {
        return format!("{}{}", &base[..authority_end], remove_dot_segments(reference));
    }
    let base_path = base_without_fragment
        .split('?')
        .next()
        .unwrap_or(base_without_fragment);
    let directory_end = base_path
        .rfind('/')
        .filter(|i| *i >= authority_end)
        .map_or(authority_end, |i| i + 1);
    let merged = if directory_end == authority_end {
        format!("/{reference}")
    } else {
        format!("{}{reference}", &base_path[authority_end..directory_end])
    };
    format!("{}{}", &base[..authority_end], remove_dot_segments(&merged))
}

fn remove_dot_segments(path: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path.split('/').collect();
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        match *segment {
            "." => {
                if last {
                    output.push("");
                }
            }
            ".." => {
                if output.len() > 1 {
                    output.pop();
                }
                if last {
                    output.push("");
                }
            }
            other => output.push(other),
        }
    }
    output.join("/")
}
