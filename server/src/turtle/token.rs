//! Turtle tokens.

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `<...>`, escapes already decoded.
    Iri(String),
    /// `prefix:local`; the prefix may be empty, as may the local part.
    PrefixedName { prefix: String, local: String },
    /// `_:label`, without the `_:`.
    BlankNodeLabel(String),
    /// String literal content, escapes already decoded.
    String(String),
    /// `@en`, without the `@`.
    LangTag(String),
    Integer(String),
    Decimal(String),
    Double(String),
    True,
    False,
    /// `a`, shorthand for `rdf:type`.
    A,
    /// `@prefix`
    PrefixDirective,
    /// `@base`
    BaseDirective,
    /// `PREFIX` (SPARQL style, no trailing dot)
    SparqlPrefix,
    /// `BASE` (SPARQL style, no trailing dot)
    SparqlBase,
    Dot,
    Semicolon,
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,
    DoubleCaret,
    Eof,
}

impl TokenKind {
    /// Short human-readable description for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Iri(iri) => format!("IRI <{iri}>"),
            Self::PrefixedName { prefix, local } => format!("prefixed name {prefix}:{local}"),
            Self::BlankNodeLabel(label) => format!("blank node _:{label}"),
            Self::String(_) => "string literal".to_owned(),
            Self::LangTag(tag) => format!("language tag @{tag}"),
            Self::Integer(n) | Self::Decimal(n) | Self::Double(n) => format!("number {n}"),
            Self::True => "'true'".to_owned(),
            Self::False => "'false'".to_owned(),
            Self::A => "'a'".to_owned(),
            Self::PrefixDirective => "@prefix".to_owned(),
            Self::BaseDirective => "@base".to_owned(),
            Self::SparqlPrefix => "PREFIX".to_owned(),
            Self::SparqlBase => "BASE".to_owned(),
            Self::Dot => "'.'".to_owned(),
            Self::Semicolon => "';'".to_owned(),
            Self::Comma => "','".to_owned(),
            Self::LBracket => "'['".to_owned(),
            Self::RBracket => "']'".to_owned(),
            Self::LParen => "'('".to_owned(),
            Self::RParen => "')'".to_owned(),
            Self::DoubleCaret => "'^^'".to_owned(),
            Self::Eof => "end of input".to_owned(),
        }
    }
}
