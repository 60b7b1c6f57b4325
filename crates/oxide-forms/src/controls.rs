//! Submitted controls and their structural decoding.
//!
//! Browsers submit a flat list of `name=value` pairs. Compound widgets
//! bracket their inputs with `__start__`/`__end__` markers so the list can
//! be folded back into a tree:
//!
//! ```text
//! __start__ = mapping:mapping
//! name      = foo
//! date      = 2010-04-09
//! __end__   = mapping:mapping
//! ```
//!
//! The start value is `name:kind` with kind `mapping`, `sequence` or
//! `rename`; a bare name means `mapping`.

use std::collections::BTreeMap;

use crate::value::{Cstruct, Upload};

/// Marker opening a nested structure.
pub const START: &str = "__start__";
/// Marker closing the innermost nested structure.
pub const END: &str = "__end__";

/// A single submitted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// A plain text value.
    Text(String),
    /// A file from a multipart request.
    File(Upload),
}

impl Control {
    fn into_cstruct(self) -> Cstruct {
        match self {
            Self::Text(s) => Cstruct::Str(s),
            Self::File(upload) => Cstruct::Upload(upload),
        }
    }
}

impl From<&str> for Control {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Control {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Builds a control list from text pairs.
pub fn text_controls<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<(String, Control)> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Control::from(v)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Mapping,
    Sequence,
    Rename,
}

struct Frame {
    name: String,
    kind: Kind,
    map: BTreeMap<String, Cstruct>,
    seq: Vec<Cstruct>,
    renamed: Option<Cstruct>,
}

impl Frame {
    fn new(name: String, kind: Kind) -> Self {
        Self {
            name,
            kind,
            map: BTreeMap::new(),
            seq: Vec::new(),
            renamed: None,
        }
    }

    fn push(&mut self, name: String, value: Cstruct) {
        match self.kind {
            Kind::Mapping => {
                self.map.insert(name, value);
            }
            Kind::Sequence => self.seq.push(value),
            Kind::Rename => {
                if self.renamed.is_none() {
                    self.renamed = Some(value);
                }
            }
        }
    }

    fn finish(self) -> (String, Cstruct) {
        let value = match self.kind {
            Kind::Mapping => Cstruct::Map(self.map),
            Kind::Sequence => Cstruct::Seq(self.seq),
            Kind::Rename => self.renamed.unwrap_or_default(),
        };
        (self.name, value)
    }
}

fn parse_start(value: &str) -> (String, Kind) {
    match value.rsplit_once(':') {
        Some((name, "sequence")) => (name.to_string(), Kind::Sequence),
        Some((name, "rename")) => (name.to_string(), Kind::Rename),
        Some((name, _)) => (name.to_string(), Kind::Mapping),
        None => (value.to_string(), Kind::Mapping),
    }
}

/// Folds a flat control list into a [`Cstruct::Map`].
///
/// Stray `__end__` markers are ignored and structures still open when the
/// input runs out are closed implicitly.
pub fn parse(controls: &[(String, Control)]) -> Cstruct {
    let mut stack = vec![Frame::new(String::new(), Kind::Mapping)];

    for (name, control) in controls {
        match name.as_str() {
            START => {
                let value = match control {
                    Control::Text(v) => v.as_str(),
                    Control::File(_) => "",
                };
                let (name, kind) = parse_start(value);
                stack.push(Frame::new(name, kind));
            }
            END => {
                if stack.len() > 1 {
                    if let Some(frame) = stack.pop() {
                        let (name, value) = frame.finish();
                        if let Some(parent) = stack.last_mut() {
                            parent.push(name, value);
                        }
                    }
                }
            }
            _ => {
                if let Some(frame) = stack.last_mut() {
                    frame.push(name.clone(), control.clone().into_cstruct());
                }
            }
        }
    }

    while stack.len() > 1 {
        if let Some(frame) = stack.pop() {
            let (name, value) = frame.finish();
            if let Some(parent) = stack.last_mut() {
                parent.push(name, value);
            }
        }
    }

    stack
        .pop()
        .map_or(Cstruct::Map(BTreeMap::new()), |root| root.finish().1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_controls() {
        let controls = text_controls([("submit", "submit"), ("text", "hello")]);
        let cstruct = parse(&controls);
        assert_eq!(cstruct.str_at("text"), "hello");
        assert_eq!(cstruct.str_at("submit"), "submit");
    }

    #[test]
    fn test_later_duplicate_wins_in_mapping() {
        let controls = text_controls([("text", "first"), ("text", "second")]);
        assert_eq!(parse(&controls).str_at("text"), "second");
    }

    #[test]
    fn test_nested_mapping() {
        let controls = text_controls([
            ("number", "42"),
            (START, "mapping:mapping"),
            ("name", "foo"),
            ("date", "2010-04-09"),
            (END, "mapping:mapping"),
        ]);
        let cstruct = parse(&controls);
        let mapping = cstruct.get("mapping").unwrap();
        assert_eq!(mapping.str_at("name"), "foo");
        assert_eq!(mapping.str_at("date"), "2010-04-09");
        assert_eq!(cstruct.str_at("number"), "42");
    }

    #[test]
    fn test_sequence_of_mappings() {
        let controls = text_controls([
            (START, "mappings:sequence"),
            (START, "mapping:mapping"),
            ("name", "a"),
            (END, "mapping:mapping"),
            (START, "mapping:mapping"),
            ("name", "b"),
            (END, "mapping:mapping"),
            (END, "mappings:sequence"),
        ]);
        let Some(Cstruct::Seq(items)) = parse(&controls).get("mappings").cloned() else {
            panic!("expected a sequence");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].str_at("name"), "a");
        assert_eq!(items[1].str_at("name"), "b");
    }

    #[test]
    fn test_sequence_keeps_duplicates() {
        let controls = text_controls([
            (START, "pepper:sequence"),
            ("checkbox", "habanero"),
            ("checkbox", "chipotle"),
            (END, "pepper:sequence"),
        ]);
        let cstruct = parse(&controls);
        assert_eq!(
            cstruct.get("pepper"),
            Some(&Cstruct::Seq(vec!["habanero".into(), "chipotle".into()]))
        );
    }

    #[test]
    fn test_rename_takes_first_value() {
        let controls = text_controls([
            (START, "choice:rename"),
            ("radio", "a"),
            ("radio", "b"),
            (END, "choice:rename"),
        ]);
        assert_eq!(parse(&controls).str_at("choice"), "a");
    }

    #[test]
    fn test_stray_end_is_ignored() {
        let controls = text_controls([(END, "x:mapping"), ("text", "ok")]);
        assert_eq!(parse(&controls).str_at("text"), "ok");
    }

    #[test]
    fn test_unclosed_start_is_closed() {
        let controls = text_controls([(START, "mapping"), ("name", "foo")]);
        assert_eq!(parse(&controls).get("mapping").unwrap().str_at("name"), "foo");
    }

    #[test]
    fn test_file_control() {
        let upload = Upload {
            filename: "a.txt".to_string(),
            mimetype: None,
            data: b"hi".to_vec(),
        };
        let controls = vec![("upload".to_string(), Control::File(upload.clone()))];
        assert_eq!(parse(&controls).get("upload"), Some(&Cstruct::Upload(upload)));
    }
}
