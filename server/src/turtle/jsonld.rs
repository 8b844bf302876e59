//! JSON-LD serialization.
//!
//! Statements become an expanded JSON-LD document with no `@context`:
//! `{"@graph": [node, ...]}`, one node per subject in first-seen order.
//! `rdf:type` objects go under `@type`; every other predicate maps to an
//! array of `{"@id": ...}` references or `{"@value": ...}` literals.

use std::collections::HashMap;

use serde_json::{Map, Value, json};

use crate::types::{Literal, Statement, Term};
use crate::vocab;

/// Serialize statements as a JSON-LD document.
#[must_use]
pub fn write_jsonld<'a>(statements: impl IntoIterator<Item = &'a Statement>) -> Value {
    let mut subjects: Vec<&'a str> = Vec::new();
    let mut nodes: HashMap<&'a str, Map<String, Value>> = HashMap::new();
    for statement in statements {
        let node = nodes.entry(&*statement.subject).or_insert_with(|| {
            subjects.push(&*statement.subject);
            let mut node = Map::new();
            node.insert("@id".to_owned(), Value::from(&*statement.subject));
            node
        });
        match &statement.object {
            Term::Resource { id } if *statement.predicate == *vocab::RDF_TYPE => {
                push_value(node, "@type", Value::from(&**id));
            }
            object => push_value(node, &statement.predicate, object_value(object)),
        }
    }
    let graph: Vec<Value> = subjects
        .into_iter()
        .filter_map(|subject| nodes.remove(subject))
        .map(Value::Object)
        .collect();
    json!({ "@graph": graph })
}

fn push_value(node: &mut Map<String, Value>, key: &str, value: Value) {
    if let Value::Array(values) = node
        .entry(key)
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        values.push(value);
    }
}

fn object_value(term: &Term) -> Value {
    match term {
        Term::Resource { id } => json!({ "@id": &**id }),
        Term::Literal(literal) => literal_value(literal),
    }
}

/// `@language` for tagged literals, `@type` for typed ones other than
/// `xsd:string`.
fn literal_value(literal: &Literal) -> Value {
    let mut value = Map::new();
    value.insert("@value".to_owned(), Value::from(&*literal.lexical));
    match (&literal.language, literal.datatype.as_deref()) {
        (Some(language), _) => {
            value.insert("@language".to_owned(), Value::from(&**language));
        }
        (None, Some(datatype)) if datatype != vocab::XSD_STRING => {
            value.insert("@type".to_owned(), Value::from(datatype));
        }
        _ => {}
    }
    Value::Object(value)
}
