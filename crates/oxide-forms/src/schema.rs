//! Schema nodes.
//!
//! A [`Field`] couples a value type, validators and a widget. Leaf nodes
//! hold scalars; mapping and sequence nodes hold children. A form's schema
//! is a mapping node whose children are the top-level fields.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{FormError, Result, ValidationErrors};
use crate::i18n::TranslationString;
use crate::tmpstore::TmpStore;
use crate::validation::Validator;
use crate::value::{Appstruct, Cstruct};
use crate::widgets::{
    Checkbox, CheckboxChoice, FileUpload, MappingWidget, SequenceWidget, TextInput, Widget,
};

/// Value type of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    /// Text.
    String,
    /// Signed integer.
    Integer,
    /// True/false.
    Boolean,
    /// ISO calendar date.
    Date,
    /// Unordered set of strings.
    Set,
    /// An uploaded file.
    FileData,
    /// Named children.
    Mapping,
    /// Repeated single child.
    Sequence,
}

impl SchemaType {
    /// Whether nodes of this type have children.
    pub const fn is_compound(self) -> bool {
        matches!(self, Self::Mapping | Self::Sequence)
    }

    fn deserialize_leaf(self, cstruct: &Cstruct) -> std::result::Result<Appstruct, TranslationString> {
        match (self, cstruct) {
            (Self::String, Cstruct::Str(s)) => Ok(Appstruct::Str(s.clone())),
            (Self::Integer, Cstruct::Str(s)) => s
                .trim()
                .parse::<i64>()
                .map(Appstruct::Int)
                .map_err(|_| TranslationString::new("\"${val}\" is not a number").with("val", s)),
            (Self::Boolean, Cstruct::Str(s)) => {
                let falsy = matches!(s.trim().to_lowercase().as_str(), "" | "false" | "0");
                Ok(Appstruct::Bool(!falsy))
            }
            (Self::Date, Cstruct::Str(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Appstruct::Date)
                .map_err(|_| TranslationString::new("Invalid date")),
            (Self::Set, Cstruct::Seq(items)) => Ok(Appstruct::Set(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect::<BTreeSet<_>>(),
            )),
            (Self::Set, other) => Err(
                TranslationString::new("\"${val}\" is not iterable").with("val", other.describe()),
            ),
            (Self::FileData, Cstruct::File(file)) => Ok(Appstruct::File(file.clone())),
            (Self::FileData, other) => Err(TranslationString::new("${val} is not a file upload")
                .with("val", other.describe())),
            (_, other) => Err(TranslationString::new("\"${val}\" is not a valid value")
                .with("val", other.describe())),
        }
    }

    fn serialize_leaf(self, appstruct: &Appstruct) -> Cstruct {
        match appstruct {
            Appstruct::Null => Cstruct::Null,
            Appstruct::Bool(b) => Cstruct::Str(if *b { "true" } else { "false" }.to_string()),
            Appstruct::Set(items) => Cstruct::Seq(items.iter().map(|s| Cstruct::Str(s.clone())).collect()),
            Appstruct::File(file) => Cstruct::File(file.clone()),
            Appstruct::Sequence(items) if self == Self::Set => {
                Cstruct::Seq(items.iter().map(|s| Cstruct::Str(s.to_string())).collect())
            }
            other => Cstruct::Str(other.to_string()),
        }
    }
}

/// Output of deserializing one node.
pub(crate) struct Deserialized {
    /// Control-level state kept for re-rendering.
    pub cstruct: Cstruct,
    /// The application value, or `None` if this node or a descendant failed.
    pub appstruct: Option<Appstruct>,
}

/// A schema node with its widget.
pub struct Field {
    /// Node name (the control name).
    pub name: String,
    /// Display title.
    pub title: TranslationString,
    /// Optional help text.
    pub description: Option<TranslationString>,
    /// Value type.
    pub typ: SchemaType,
    /// Value rendered when no appstruct value is supplied.
    pub default: Option<Appstruct>,
    /// Value used when nothing is submitted; `None` makes the node required.
    pub missing: Option<Appstruct>,
    /// Validators run after deserialization.
    pub validators: Vec<Box<dyn Validator>>,
    /// Widget rendering this node.
    pub widget: Box<dyn Widget>,
    /// Children of mapping and sequence nodes.
    pub children: Vec<Field>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("typ", &self.typ)
            .field("default", &self.default)
            .field("missing", &self.missing)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Title derived from a node name: `names_and_titles` becomes
/// `Names And Titles`.
fn title_from_name(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

impl Field {
    fn with_type(name: impl Into<String>, typ: SchemaType, widget: impl Widget + 'static) -> Self {
        let name = name.into();
        Self {
            title: TranslationString::new(title_from_name(&name)),
            name,
            description: None,
            typ,
            default: None,
            missing: None,
            validators: Vec::new(),
            widget: Box::new(widget),
            children: Vec::new(),
        }
    }

    /// String node rendered as a text input.
    pub fn string(name: impl Into<String>) -> Self {
        Self::with_type(name, SchemaType::String, TextInput::new())
    }

    /// Integer node rendered as a text input.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::with_type(name, SchemaType::Integer, TextInput::new())
    }

    /// Boolean node rendered as a checkbox.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::with_type(name, SchemaType::Boolean, Checkbox::new())
    }

    /// Date node rendered as a date input.
    pub fn date(name: impl Into<String>) -> Self {
        Self::with_type(name, SchemaType::Date, TextInput::date())
    }

    /// Set node rendered as a checkbox group with no choices; supply a
    /// [`CheckboxChoice`] with values through [`Field::widget`].
    pub fn set(name: impl Into<String>) -> Self {
        Self::with_type(
            name,
            SchemaType::Set,
            CheckboxChoice::new(Vec::<(String, String)>::new()),
        )
    }

    /// File node backed by a temporary store.
    pub fn file(name: impl Into<String>, store: Arc<dyn TmpStore>) -> Self {
        Self::with_type(name, SchemaType::FileData, FileUpload::new(store))
    }

    /// Mapping node.
    pub fn mapping(name: impl Into<String>, children: impl IntoIterator<Item = Self>) -> Self {
        let mut field = Self::with_type(name, SchemaType::Mapping, MappingWidget);
        field.children = children.into_iter().collect();
        field
    }

    /// Sequence node repeating `item`.
    pub fn sequence(name: impl Into<String>, item: Self) -> Self {
        let mut field = Self::with_type(name, SchemaType::Sequence, SequenceWidget::new());
        field.children = vec![item];
        field
    }

    /// Root schema for a form.
    pub fn schema(children: impl IntoIterator<Item = Self>) -> Self {
        Self::mapping("", children)
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<TranslationString>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, text: impl Into<TranslationString>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Sets the default rendered value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Appstruct>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Makes the node optional, yielding `value` when nothing is submitted.
    #[must_use]
    pub fn missing(mut self, value: impl Into<Appstruct>) -> Self {
        self.missing = Some(value.into());
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Replaces the widget.
    #[must_use]
    pub fn widget(mut self, widget: impl Widget + 'static) -> Self {
        self.widget = Box::new(widget);
        self
    }

    /// Replaces the widget in place.
    pub fn set_widget(&mut self, widget: impl Widget + 'static) {
        self.widget = Box::new(widget);
    }

    /// Whether a value must be submitted.
    pub const fn is_required(&self) -> bool {
        self.missing.is_none()
    }

    /// Returns the direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns the node at a dotted path below this one.
    pub fn find_mut(&mut self, path: &str) -> Result<&mut Self> {
        let mut node = self;
        for part in path.split('.') {
            node = node
                .children
                .iter_mut()
                .find(|c| c.name == part)
                .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        }
        Ok(node)
    }

    /// The sequence item node, if this is a sequence.
    pub fn item(&self) -> Option<&Self> {
        match self.typ {
            SchemaType::Sequence => self.children.first(),
            _ => None,
        }
    }

    /// Converts an application value into control-level state.
    ///
    /// A null value falls back to the node's default.
    pub fn serialize(&self, appstruct: &Appstruct) -> Cstruct {
        let value = match (appstruct, &self.default) {
            (Appstruct::Null, Some(default)) => default,
            _ => appstruct,
        };

        match self.typ {
            SchemaType::Mapping => Cstruct::Map(
                self.children
                    .iter()
                    .map(|child| {
                        let sub = value.get(&child.name).unwrap_or(&Appstruct::Null);
                        (child.name.clone(), child.serialize(sub))
                    })
                    .collect(),
            ),
            SchemaType::Sequence => match (value, self.item()) {
                (Appstruct::Sequence(items), Some(item)) => {
                    Cstruct::Seq(items.iter().map(|v| item.serialize(v)).collect())
                }
                _ => Cstruct::Seq(Vec::new()),
            },
            typ => typ.serialize_leaf(value),
        }
    }

    /// Converts submitted control state into an application value,
    /// recording errors under `path`.
    pub(crate) fn deserialize(
        &self,
        pstruct: Option<&Cstruct>,
        path: &str,
        errors: &mut ValidationErrors,
    ) -> Deserialized {
        let cstruct = match self.widget.deserialize(self, pstruct) {
            Ok(cstruct) => cstruct,
            Err(message) => {
                errors.add(path, message);
                return Deserialized {
                    cstruct: pstruct.cloned().unwrap_or_default(),
                    appstruct: None,
                };
            }
        };

        match self.typ {
            SchemaType::Mapping => self.deserialize_mapping(cstruct, path, errors),
            SchemaType::Sequence => self.deserialize_sequence(cstruct, path, errors),
            typ => {
                if cstruct.is_null() {
                    return match &self.missing {
                        Some(missing) => Deserialized {
                            cstruct,
                            appstruct: Some(missing.clone()),
                        },
                        None => {
                            errors.add(path, "Required");
                            Deserialized {
                                cstruct,
                                appstruct: None,
                            }
                        }
                    };
                }
                match typ.deserialize_leaf(&cstruct) {
                    Ok(appstruct) => self.run_validators(cstruct, appstruct, path, errors),
                    Err(message) => {
                        errors.add(path, message);
                        Deserialized {
                            cstruct,
                            appstruct: None,
                        }
                    }
                }
            }
        }
    }

    fn deserialize_mapping(
        &self,
        cstruct: Cstruct,
        path: &str,
        errors: &mut ValidationErrors,
    ) -> Deserialized {
        let submitted = match cstruct {
            Cstruct::Map(map) => map,
            Cstruct::Null => BTreeMap::new(),
            other => {
                errors.add(
                    path,
                    TranslationString::new("\"${val}\" is not a mapping type")
                        .with("val", other.describe()),
                );
                return Deserialized {
                    cstruct: other,
                    appstruct: None,
                };
            }
        };

        let mut cmap = BTreeMap::new();
        let mut amap = BTreeMap::new();
        let mut complete = true;

        for child in &self.children {
            let result = child.deserialize(
                submitted.get(&child.name),
                &join_path(path, &child.name),
                errors,
            );
            cmap.insert(child.name.clone(), result.cstruct);
            match result.appstruct {
                Some(value) => {
                    amap.insert(child.name.clone(), value);
                }
                None => complete = false,
            }
        }

        let cstruct = Cstruct::Map(cmap);
        if complete {
            self.run_validators(cstruct, Appstruct::Mapping(amap), path, errors)
        } else {
            Deserialized {
                cstruct,
                appstruct: None,
            }
        }
    }

    fn deserialize_sequence(
        &self,
        cstruct: Cstruct,
        path: &str,
        errors: &mut ValidationErrors,
    ) -> Deserialized {
        let submitted = match cstruct {
            Cstruct::Seq(items) => items,
            Cstruct::Null => Vec::new(),
            other => {
                errors.add(
                    path,
                    TranslationString::new("\"${val}\" is not iterable").with("val", other.describe()),
                );
                return Deserialized {
                    cstruct: other,
                    appstruct: None,
                };
            }
        };

        let Some(item) = self.item() else {
            return Deserialized {
                cstruct: Cstruct::Seq(submitted),
                appstruct: Some(Appstruct::Sequence(Vec::new())),
            };
        };

        let mut citems = Vec::with_capacity(submitted.len());
        let mut aitems = Vec::with_capacity(submitted.len());
        let mut complete = true;

        for (index, pstruct) in submitted.iter().enumerate() {
            let result = item.deserialize(
                Some(pstruct),
                &join_path(path, &index.to_string()),
                errors,
            );
            citems.push(result.cstruct);
            match result.appstruct {
                Some(value) => aitems.push(value),
                None => complete = false,
            }
        }

        let cstruct = Cstruct::Seq(citems);
        if complete {
            self.run_validators(cstruct, Appstruct::Sequence(aitems), path, errors)
        } else {
            Deserialized {
                cstruct,
                appstruct: None,
            }
        }
    }

    fn run_validators(
        &self,
        cstruct: Cstruct,
        appstruct: Appstruct,
        path: &str,
        errors: &mut ValidationErrors,
    ) -> Deserialized {
        for validator in &self.validators {
            if let Err(invalid) = validator.validate(&appstruct) {
                errors.add(path, invalid.message);
                for (child, message) in invalid.children {
                    errors.add(&join_path(path, &child), message);
                }
                return Deserialized {
                    cstruct,
                    appstruct: None,
                };
            }
        }
        Deserialized {
            cstruct,
            appstruct: Some(appstruct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Length;

    fn run(field: &Field, pstruct: Option<&Cstruct>) -> (Option<Appstruct>, ValidationErrors) {
        let mut errors = ValidationErrors::new();
        let result = field.deserialize(pstruct, &field.name, &mut errors);
        (result.appstruct, errors)
    }

    #[test]
    fn test_title_from_name() {
        assert_eq!(title_from_name("names_and_titles"), "Names And Titles");
        assert_eq!(title_from_name("text"), "Text");
        assert_eq!(Field::string("sneaky").title.to_string(), "Sneaky");
    }

    #[test]
    fn test_string_required() {
        let field = Field::string("text");
        let (value, errors) = run(&field, None);
        assert!(value.is_none());
        assert_eq!(errors.get("text").unwrap()[0].to_string(), "Required");
    }

    #[test]
    fn test_string_missing_value() {
        let field = Field::string("text").missing("");
        let (value, errors) = run(&field, Some(&Cstruct::from("  ")));
        assert_eq!(value, Some(Appstruct::from("")));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_integer_not_a_number() {
        let field = Field::integer("number");
        let (value, errors) = run(&field, Some(&Cstruct::from("abc")));
        assert!(value.is_none());
        assert_eq!(
            errors.get("number").unwrap()[0].to_string(),
            "\"abc\" is not a number"
        );
    }

    #[test]
    fn test_boolean_unchecked_is_false() {
        let field = Field::boolean("want");
        let (value, errors) = run(&field, None);
        assert_eq!(value, Some(Appstruct::Bool(false)));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_date_invalid() {
        let field = Field::date("date");
        let (value, errors) = run(&field, Some(&Cstruct::from("2010-13-45")));
        assert!(value.is_none());
        assert_eq!(errors.get("date").unwrap()[0].to_string(), "Invalid date");
    }

    #[test]
    fn test_mapping_collects_child_errors() {
        let field = Field::mapping(
            "mapping",
            [Field::string("name"), Field::date("date")],
        );
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Cstruct::from("foo"));
        let (value, errors) = run(&field, Some(&Cstruct::Map(map)));
        assert!(value.is_none());
        assert!(errors.get("mapping.date").is_some());
        assert!(errors.get("mapping.name").is_none());
    }

    #[test]
    fn test_sequence_item_paths() {
        let field = Field::sequence(
            "texts",
            Field::string("text").validator(Length::max(3)),
        );
        let pstruct = Cstruct::Seq(vec!["ok".into(), "too long".into()]);
        let (value, errors) = run(&field, Some(&pstruct));
        assert!(value.is_none());
        assert!(errors.get("texts.1").is_some());
        assert!(errors.get("texts.0").is_none());
    }

    #[test]
    fn test_serialize_uses_defaults() {
        let field = Field::schema([
            Field::string("artist").default("Grandaddy"),
            Field::string("song"),
        ]);
        let cstruct = field.serialize(&Appstruct::Null);
        assert_eq!(cstruct.str_at("artist"), "Grandaddy");
        assert_eq!(cstruct.get("song"), Some(&Cstruct::Null));
    }

    #[test]
    fn test_serialize_partial_mapping() {
        let field = Field::schema([
            Field::integer("number"),
            Field::mapping("mapping", [Field::string("name"), Field::date("date")]),
        ]);
        let appstruct = Appstruct::mapping([
            ("number", Appstruct::Int(42)),
            (
                "mapping",
                Appstruct::mapping([(
                    "date",
                    Appstruct::Date(NaiveDate::from_ymd_opt(2010, 4, 9).unwrap()),
                )]),
            ),
        ]);
        let cstruct = field.serialize(&appstruct);
        assert_eq!(cstruct.str_at("number"), "42");
        assert_eq!(cstruct.get("mapping").unwrap().str_at("date"), "2010-04-09");
        assert_eq!(cstruct.get("mapping").unwrap().get("name"), Some(&Cstruct::Null));
    }

    #[test]
    fn test_find_mut() {
        let mut field = Field::schema([Field::sequence("uploads", Field::string("upload"))]);
        assert!(field.find_mut("uploads.upload").is_ok());
        assert!(matches!(
            field.find_mut("uploads.nope"),
            Err(FormError::UnknownField(_))
        ));
    }
}
