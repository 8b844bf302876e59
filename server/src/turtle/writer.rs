//! Turtle serialization.
//!
//! Statements are grouped by subject in first-seen order, then by predicate,
//! with objects of a repeated predicate joined by commas. IRIs under a
//! well-known namespace are compacted and only the prefixes actually used
//! are declared.

use std::collections::{BTreeSet, HashMap};

use crate::types::{BLANK_NODE_PREFIX, Literal, Statement, Term, escape_string};
use crate::vocab;

/// Serialize statements as a Turtle document.
#[must_use]
pub fn write_turtle<'a>(statements: impl IntoIterator<Item = &'a Statement>) -> String {
    let mut writer = TurtleWriter::default();
    for statement in statements {
        writer.add(statement);
    }
    writer.finish()
}

#[derive(Default)]
struct TurtleWriter<'a> {
    subjects: Vec<&'a str>,
    /// subject -> (predicate, objects) in first-seen order
    groups: HashMap<&'a str, Vec<(&'a str, Vec<&'a Term>)>>,
    /// Indexes into `vocab::PREFIXES`.
    used_prefixes: BTreeSet<usize>,
}

impl<'a> TurtleWriter<'a> {
    fn add(&mut self, statement: &'a Statement) {
        let predicates = self
            .groups
            .entry(&*statement.subject)
            .or_insert_with(|| {
                self.subjects.push(&*statement.subject);
                Vec::new()
            });
        match predicates
            .iter_mut()
            .find(|(predicate, _)| *predicate == &*statement.predicate)
        {
            Some((_, objects)) => objects.push(&statement.object),
            None => predicates.push((&*statement.predicate, vec![&statement.object])),
        }
    }

    fn finish(mut self) -> String {
        let mut body = String::new();
        let subjects = std::mem::take(&mut self.subjects);
        let mut groups = std::mem::take(&mut self.groups);
        for subject in subjects {
            let Some(predicates) = groups.remove(subject) else {
                continue;
            };
            let subject = self.resource(subject);
            body.push_str(&subject);
            let last = predicates.len().saturating_sub(1);
            for (i, (predicate, objects)) in predicates.into_iter().enumerate() {
                let predicate = if predicate == vocab::RDF_TYPE {
                    "a".to_owned()
                } else {
                    self.resource(predicate)
                };
                let objects: Vec<String> = objects.into_iter().map(|o| self.term(o)).collect();
                let terminator = if i == last { " ." } else { " ;" };
                body.push_str(&format!(
                    "\n    {predicate} {}{terminator}",
                    objects.join(", ")
                ));
            }
            body.push_str("\n\n");
        }

        let mut out = String::new();
        for index in &self.used_prefixes {
            if let Some((prefix, namespace)) = vocab::PREFIXES.get(*index) {
                out.push_str(&format!("@prefix {prefix}: <{namespace}> .\n"));
            }
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(body.trim_end());
        out.push('\n');
        out
    }

    fn term(&mut self, term: &Term) -> String {
        match term {
            Term::Resource { id } => self.resource(id),
            Term::Literal(literal) => self.literal(literal),
        }
    }

    fn literal(&mut self, literal: &Literal) -> String {
        let quoted = format!("\"{}\"", escape_string(&literal.lexical));
        if let Some(language) = &literal.language {
            return format!("{quoted}@{language}");
        }
        match literal.datatype.as_deref() {
            None | Some(vocab::XSD_STRING) => quoted,
            Some(datatype) => format!("{quoted}^^{}", self.resource(datatype)),
        }
    }

    /// `prefix:local` when possible, otherwise `<iri>`. Blank nodes pass through.
    fn resource(&mut self, id: &str) -> String {
        if id.starts_with(BLANK_NODE_PREFIX) {
            return id.to_owned();
        }
        for (index, (prefix, namespace)) in vocab::PREFIXES.iter().enumerate() {
            if let Some(local) = id.strip_prefix(namespace) {
                if is_plain_local_name(local) {
                    self.used_prefixes.insert(index);
                    return format!("{prefix}:{local}");
                }
            }
        }
        format!("<{id}>")
    }
}

/// Whether `local` can be written after a prefix without escaping.
fn is_plain_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphanumeric() || first == '_')
        && !local.ends_with('.')
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
