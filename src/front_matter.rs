use std::sync::LazyLock;

use log::warn;
use regex::{Regex, RegexBuilder};
use serde_yaml_ng::{Mapping, Value};

// `---` line, yaml, `---` line, then the body.
static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"\A---[ \t]*\r?\n(.*?)^---[ \t]*\r?$\n?(.*)\z")
        .dot_matches_new_line(true)
        .multi_line(true)
        .build()
        .expect("front matter pattern is valid")
});

/// Key/value pairs from the metadata block of a post.
///
/// Lookups are lenient: a field of the wrong shape reads as missing.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    /// Reads a scalar field as a string. Numbers and booleans are
    /// converted to their textual form.
    pub fn string(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(scalar_to_string)
    }

    /// Reads a sequence of scalars. A plain string is treated as a
    /// comma-separated list.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        match untag(self.fields.get(key)?) {
            Value::Sequence(items) => Some(items.iter().filter_map(scalar_to_string).collect()),
            Value::String(s) => Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        _ => value,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Splits a document into its metadata block and body.
///
/// A document without a leading `---` line has no metadata and the whole
/// text is the body. Metadata that is not a yaml mapping is discarded with
/// a warning; the body is still returned.
pub(crate) fn parse(content: &str) -> (FrontMatter, &str) {
    let Some(caps) = HEADER_PATTERN.captures(content) else {
        return (FrontMatter::default(), content);
    };
    let header = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str());

    let fields = match serde_yaml_ng::from_str::<Value>(header) {
        Ok(Value::Mapping(fields)) => fields,
        Ok(Value::Null) => Mapping::new(),
        Ok(other) => {
            warn!("Ignoring metadata block: expected key/value pairs, found {other:?}");
            Mapping::new()
        }
        Err(e) => {
            warn!("Ignoring malformed metadata block: {e}");
            Mapping::new()
        }
    };

    (FrontMatter { fields }, body)
}
