//! Terms: the values that appear in statement positions.
//!
//! Provides `Term` (a resource identifier or a literal), `Literal`, and the
//! typed `LiteralValue` view used by accessors and sorting.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::vocab;

/// Prefix that marks a blank node identifier.
pub const BLANK_NODE_PREFIX: &str = "_:";

/// An object-position term.
///
/// IRIs and blank nodes share one identifier space: blank nodes are stored
/// as `_:label`. An IRI can never start with `_:` because it must carry a
/// scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Term {
    /// An IRI or blank node identifier.
    Resource { id: Arc<str> },
    /// A literal value.
    Literal(Literal),
}

impl Term {
    #[must_use]
    pub const fn resource(id: Arc<str>) -> Self {
        Self::Resource { id }
    }

    /// The resource identifier, if this term names a resource.
    #[must_use]
    pub fn as_resource(&self) -> Option<&Arc<str>> {
        match self {
            Self::Resource { id } => Some(id),
            Self::Literal(_) => None,
        }
    }

    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Resource { .. } => None,
            Self::Literal(literal) => Some(literal),
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Resource { id } if id.starts_with(BLANK_NODE_PREFIX))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource { id } if id.starts_with(BLANK_NODE_PREFIX) => write!(f, "{id}"),
            Self::Resource { id } => write!(f, "<{id}>"),
            Self::Literal(literal) => write!(f, "{literal}"),
        }
    }
}

/// A literal: lexical form plus optional datatype IRI or language tag.
///
/// INVARIANT: `datatype` and `language` are never both set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Literal {
    pub lexical: Arc<str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Arc<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Arc<str>>,
}

/// A literal interpreted through its datatype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    String(&'a str),
    Integer(i64),
    Decimal(f64),
    Double(f64),
    Boolean(bool),
    Year(i32),
    Date { year: i32, month: u8, day: u8 },
    /// A typed literal whose lexical form does not fit its datatype, or an
    /// unknown datatype. Carries the raw lexical form.
    Other(&'a str),
}

impl Literal {
    /// A plain string literal.
    #[must_use]
    pub const fn plain(lexical: Arc<str>) -> Self {
        Self {
            lexical,
            datatype: None,
            language: None,
        }
    }

    #[must_use]
    pub const fn typed(lexical: Arc<str>, datatype: Arc<str>) -> Self {
        Self {
            lexical,
            datatype: Some(datatype),
            language: None,
        }
    }

    #[must_use]
    pub const fn tagged(lexical: Arc<str>, language: Arc<str>) -> Self {
        Self {
            lexical,
            datatype: None,
            language: Some(language),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.lexical
    }

    /// The effective datatype IRI (`xsd:string` or `rdf:langString` when none
    /// was written).
    #[must_use]
    pub fn datatype_iri(&self) -> &str {
        match (&self.datatype, &self.language) {
            (Some(datatype), _) => datatype,
            (None, Some(_)) => vocab::RDF_LANG_STRING,
            (None, None) => vocab::XSD_STRING,
        }
    }

    /// Interpret the lexical form according to the datatype.
    #[must_use]
    pub fn value(&self) -> LiteralValue<'_> {
        let lexical = self.lexical.trim();
        let Some(datatype) = self.datatype.as_deref() else {
            return LiteralValue::String(&self.lexical);
        };
        match datatype {
            vocab::XSD_STRING | vocab::XSD_ANY_URI => LiteralValue::String(&self.lexical),
            vocab::XSD_INTEGER | vocab::XSD_INT | vocab::XSD_LONG => lexical
                .parse()
                .map_or(LiteralValue::Other(&self.lexical), LiteralValue::Integer),
            vocab::XSD_DECIMAL => lexical
                .parse()
                .map_or(LiteralValue::Other(&self.lexical), LiteralValue::Decimal),
            vocab::XSD_DOUBLE | vocab::XSD_FLOAT => lexical
                .parse()
                .map_or(LiteralValue::Other(&self.lexical), LiteralValue::Double),
            vocab::XSD_BOOLEAN => match lexical {
                "true" | "1" => LiteralValue::Boolean(true),
                "false" | "0" => LiteralValue::Boolean(false),
                _ => LiteralValue::Other(&self.lexical),
            },
            vocab::XSD_GYEAR => parse_year(lexical)
                .map_or(LiteralValue::Other(&self.lexical), LiteralValue::Year),
            vocab::XSD_DATE => parse_date(lexical).map_or(
                LiteralValue::Other(&self.lexical),
                |(year, month, day)| LiteralValue::Date { year, month, day },
            ),
            _ => LiteralValue::Other(&self.lexical),
        }
    }

    /// The year this literal denotes, for year, date and integer literals.
    ///
    /// Plain strings that are exactly a four digit year also count, since the
    /// conversion step sometimes writes years untyped.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        match self.value() {
            LiteralValue::Year(year) | LiteralValue::Date { year, .. } => Some(year),
            LiteralValue::Integer(n) => i32::try_from(n).ok(),
            LiteralValue::String(s) if s.len() == 4 => parse_year(s),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape_string(&self.lexical))?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")
        } else if let Some(datatype) = &self.datatype {
            write!(f, "^^<{datatype}>")
        } else {
            Ok(())
        }
    }
}

/// Escape a string for use inside a double-quoted Turtle literal.
#[must_use]
pub fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn parse_year(s: &str) -> Option<i32> {
    // gYear may carry a timezone suffix ("2021Z", "2021+08:00").
    let digits_end = s
        .char_indices()
        .skip(usize::from(s.starts_with('-')))
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s[..digits_end].parse().ok()
}

fn parse_date(s: &str) -> Option<(i32, u8, u8)> {
    let mut parts = s.splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day_part = parts.next()?;
    let day: u8 = day_part.get(..2)?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some((year, month, day))
}
