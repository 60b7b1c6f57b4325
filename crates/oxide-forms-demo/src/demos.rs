//! The demos. Each function builds one schema, wires its widgets and runs
//! it through the submission cycle.
//!
//! This file is also what `/allcode/` shows, so keep every demo a
//! top-level `pub fn` closed by a `}` in the first column.

use chrono::NaiveDate;
use oxide_forms::validation::{Email, Function, Length, OneOf, Range};
use oxide_forms::widgets::{
    CheckboxChoice, CheckedInput, DateParts, HiddenInput, RadioChoice, Select, SequenceWidget,
    TextInput, Textarea,
};
use oxide_forms::{Appstruct, Button, Field, Invalid, TranslationString};

use crate::context::DemoContext;
use crate::cycle::{RenderOptions, RenderResult};
use crate::error::Result;
use crate::locale::LOCALE_PARAM;

const PEPPERS: [(&str, &str); 3] = [
    ("habanero", "Habanero"),
    ("jalapeno", "Jalapeno"),
    ("chipotle", "Chipotle"),
];

pub fn textinput(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::string("text")
        .validator(Length::max(100))
        .description("Enter some text")]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("text")?.set_widget(TextInput::new().size(60));
    ctx.render_form(&form, RenderOptions::new())
}

pub fn textarea(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::string("text")
        .validator(Length::max(100))
        .description("Enter some text")]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("text")?.set_widget(Textarea::new(10, 60));
    ctx.render_form(&form, RenderOptions::new())
}

pub fn password(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::string("password")
        .validator(Length::between(5, 100))
        .description("Enter a password")]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("password")?
        .set_widget(TextInput::password().size(20));
    ctx.render_form(&form, RenderOptions::new())
}

pub fn checkbox(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::boolean("want")
        .description("Check this box!")
        .title("I Want It!")]);
    let form = ctx.form(schema)?.button("submit");
    ctx.render_form(&form, RenderOptions::new())
}

pub fn radiochoice(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::string("pepper")
        .validator(OneOf::new(PEPPERS.map(|(value, _)| value)))
        .title("Choose your pepper")
        .description("Select a Pepper")]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("pepper")?.set_widget(RadioChoice::new(PEPPERS));
    ctx.render_form(&form, RenderOptions::new())
}

pub fn checkedinput(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::string("email")
        .title("Email Address")
        .description("Type your email address and confirm it")
        .validator(Email::new())]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("email")?.set_widget(
        CheckedInput::new()
            .subject("Email")
            .confirm_subject("Confirm Email")
            .size(40),
    );
    ctx.render_form(&form, RenderOptions::new())
}

pub fn checkedpassword(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::string("password")
        .validator(Length::min(5))
        .description("Type your password and confirm it")]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("password")?
        .set_widget(CheckedInput::password().size(20));
    ctx.render_form(&form, RenderOptions::new())
}

pub fn mapping(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([
        Field::integer("number"),
        Field::mapping(
            "mapping",
            [
                Field::string("name").description("Content name"),
                Field::date("date").description("Content date"),
            ],
        ),
    ]);
    let form = ctx.form(schema)?.button("submit");
    ctx.render_form(&form, RenderOptions::new())
}

pub fn sequence_of_fileuploads(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::sequence(
        "uploads",
        Field::file("upload", ctx.store()),
    )]);
    let form = ctx.form(schema)?.button("submit");
    let store = ctx.store();
    ctx.render_form(
        &form,
        RenderOptions::new().on_success(move || {
            store.clear();
            Ok(())
        }),
    )
}

pub fn sequence_of_fileuploads_with_initial_item(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::sequence(
        "uploads",
        Field::file("upload", ctx.store()),
    )]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("uploads")?
        .set_widget(SequenceWidget::new().render_initial_item());
    let store = ctx.store();
    ctx.render_form(
        &form,
        RenderOptions::new().on_success(move || {
            store.clear();
            Ok(())
        }),
    )
}

pub fn sequence_of_mappings(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::sequence(
        "mappings",
        Field::mapping("mapping", [Field::string("name"), Field::string("title")]),
    )]);
    let form = ctx.form(schema)?.button("submit");
    ctx.render_form(&form, RenderOptions::new())
}

pub fn sequence_of_mappings_with_initial_item(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::sequence(
        "mappings",
        Field::mapping("mapping", [Field::string("name"), Field::string("title")]),
    )]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("mappings")?
        .set_widget(SequenceWidget::new().render_initial_item());
    ctx.render_form(&form, RenderOptions::new())
}

pub fn readonly_sequence_of_mappings(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::sequence(
        "mappings",
        Field::mapping("mapping", [Field::string("name"), Field::string("title")]),
    )]);
    let form = ctx.form(schema)?.button("submit");
    let appstruct = Appstruct::mapping([(
        "mappings",
        Appstruct::sequence([
            Appstruct::mapping([("name", "name1"), ("title", "title1")]),
            Appstruct::mapping([("name", "name2"), ("title", "title2")]),
        ]),
    )]);
    ctx.render_form(
        &form,
        RenderOptions::new().appstruct(appstruct).readonly(true),
    )
}

pub fn sequence_of_sequences(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let name_and_title =
        Field::mapping("name_and_title", [Field::string("name"), Field::string("title")])
            .title("Name and Title");
    let names_and_titles =
        Field::sequence("names_and_titles", name_and_title).title("Names and Titles");
    let schema = Field::schema([Field::sequence("names_and_titles_sequence", names_and_titles)
        .title("Sequence of Sequences of Names and Titles")]);
    let mut form = ctx.form(schema)?.button("submit");
    let outer = form.field_mut("names_and_titles_sequence")?;
    outer.set_widget(SequenceWidget::new().render_initial_item());
    outer
        .find_mut("names_and_titles")?
        .set_widget(SequenceWidget::new().render_initial_item());
    ctx.render_form(&form, RenderOptions::new())
}

pub fn file(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::file("upload", ctx.store())]);
    let form = ctx.form(schema)?.button("submit");
    let store = ctx.store();
    ctx.render_form(
        &form,
        RenderOptions::new().on_success(move || {
            store.clear();
            Ok(())
        }),
    )
}

pub fn date(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let earliest = NaiveDate::from_ymd_opt(2010, 1, 1).map(Appstruct::Date);
    let schema = Field::schema([Field::date("date")
        .widget(DateParts)
        .validator(Range::new(earliest, None).min_err("${min} is earlier than earliest date ${val}"))]);
    let form = ctx.form(schema)?.button("submit");
    ctx.render_form(&form, RenderOptions::new())
}

pub fn edit(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([
        Field::integer("number"),
        Field::mapping(
            "mapping",
            [
                Field::string("name").description("Content name"),
                Field::date("date").description("Content date"),
            ],
        ),
    ]);
    let form = ctx.form(schema)?.button("submit");
    // Only the values the application has are needed for the first
    // render; `mapping.name` is left out on purpose.
    let date = NaiveDate::from_ymd_opt(2010, 4, 9).map_or(Appstruct::Null, Appstruct::Date);
    let appstruct = Appstruct::mapping([
        ("number", Appstruct::Int(42)),
        ("mapping", Appstruct::mapping([("date", date)])),
    ]);
    ctx.render_form(&form, RenderOptions::new().appstruct(appstruct))
}

pub fn interfield(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([
        Field::string("name").description("Content name"),
        Field::string("title").description("Content title (must start with content name)"),
    ])
    .validator(Function(|value: &Appstruct| {
        let name = value.get("name").and_then(Appstruct::as_str).unwrap_or_default();
        let title = value.get("title").and_then(Appstruct::as_str).unwrap_or_default();
        if title.starts_with(name) {
            Ok(())
        } else {
            Err(Invalid::new("Title must start with name")
                .child("title", format!("Must start with name {name}")))
        }
    }));
    let form = ctx.form(schema)?.button("submit");
    ctx.render_form(&form, RenderOptions::new())
}

pub fn fielddefaults(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([
        Field::string("artist")
            .default("Grandaddy")
            .description("Song name"),
        Field::string("album").default("Just Like the Fambly Cat"),
        Field::string("song").description("Song name"),
    ]);
    let form = ctx.form(schema)?.button("submit");
    ctx.render_form(&form, RenderOptions::new())
}

pub fn unicodeeverywhere(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::string("field")
        .title("По оживлённым берегам")
        .description(
            "子曰：「學而時習之，不亦說乎？有朋自遠方來，不亦樂乎？ \
             人不知而不慍，不亦君子乎？」",
        )
        .default("☃")]);
    let form = ctx.form(schema)?.button("submit");
    ctx.render_form(&form, RenderOptions::new())
}

pub fn select(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let choices = [("", "- Select -")].into_iter().chain(PEPPERS);
    let schema = Field::schema([Field::string("pepper")]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("pepper")?.set_widget(Select::new(choices));
    ctx.render_form(&form, RenderOptions::new())
}

pub fn checkboxchoice(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::set("pepper")]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("pepper")?
        .set_widget(CheckboxChoice::new(PEPPERS));
    ctx.render_form(&form, RenderOptions::new())
}

pub fn i18n(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let between = || {
        TranslationString::new("A number between ${min} and ${max}")
            .with("min", 1)
            .with("max", 10)
    };
    let schema = Field::schema([
        Field::integer("number")
            .title(between())
            .description(between())
            .validator(Range::int(1, 10)),
        Field::string(LOCALE_PARAM).default(ctx.locale),
    ]);
    let mut form = ctx
        .form(schema)?
        .button(Button::new("submit").title("Submit"));
    form.field_mut(LOCALE_PARAM)?.set_widget(HiddenInput);
    ctx.render_form(&form, RenderOptions::new())
}

pub fn hidden_field(ctx: &DemoContext<'_>) -> Result<RenderResult> {
    let schema = Field::schema([Field::boolean("sneaky").default(true)]);
    let mut form = ctx.form(schema)?.button("submit");
    form.field_mut("sneaky")?.set_widget(HiddenInput);
    ctx.render_form(&form, RenderOptions::new())
}

/// A registered demo.
pub struct Demo {
    /// URL slug, also the function name.
    pub name: &'static str,
    /// Page title.
    pub title: &'static str,
    /// Builds and runs the demo's form.
    pub build: fn(&DemoContext<'_>) -> Result<RenderResult>,
}

impl std::fmt::Debug for Demo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Demo")
            .field("name", &self.name)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Every demo, in declaration order.
pub static DEMOS: &[Demo] = &[
    Demo {
        name: "textinput",
        title: "Text Input Widget",
        build: textinput,
    },
    Demo {
        name: "textarea",
        title: "Text Area Widget",
        build: textarea,
    },
    Demo {
        name: "password",
        title: "Password Widget",
        build: password,
    },
    Demo {
        name: "checkbox",
        title: "Checkbox Widget",
        build: checkbox,
    },
    Demo {
        name: "radiochoice",
        title: "Radio Choice Widget",
        build: radiochoice,
    },
    Demo {
        name: "checkedinput",
        title: "Checked Input Widget",
        build: checkedinput,
    },
    Demo {
        name: "checkedpassword",
        title: "Checked Password Widget",
        build: checkedpassword,
    },
    Demo {
        name: "mapping",
        title: "Mapping Widget",
        build: mapping,
    },
    Demo {
        name: "sequence_of_fileuploads",
        title: "Sequence of File Upload Widgets",
        build: sequence_of_fileuploads,
    },
    Demo {
        name: "sequence_of_fileuploads_with_initial_item",
        title: "Sequence of File Upload Widgets (With Initial Item)",
        build: sequence_of_fileuploads_with_initial_item,
    },
    Demo {
        name: "sequence_of_mappings",
        title: "Sequence of Mapping Widgets",
        build: sequence_of_mappings,
    },
    Demo {
        name: "sequence_of_mappings_with_initial_item",
        title: "Sequence of Mapping Widgets (With Initial Item)",
        build: sequence_of_mappings_with_initial_item,
    },
    Demo {
        name: "readonly_sequence_of_mappings",
        title: "Read-Only Sequence of Mappings",
        build: readonly_sequence_of_mappings,
    },
    Demo {
        name: "sequence_of_sequences",
        title: "Sequence of Sequence Widgets",
        build: sequence_of_sequences,
    },
    Demo {
        name: "file",
        title: "File Upload Widget",
        build: file,
    },
    Demo {
        name: "date",
        title: "Date Parts Widget",
        build: date,
    },
    Demo {
        name: "edit",
        title: "Edit Form",
        build: edit,
    },
    Demo {
        name: "interfield",
        title: "Inter-Field Validation",
        build: interfield,
    },
    Demo {
        name: "fielddefaults",
        title: "Field Defaults",
        build: fielddefaults,
    },
    Demo {
        name: "unicodeeverywhere",
        title: "Unicode Everywhere",
        build: unicodeeverywhere,
    },
    Demo {
        name: "select",
        title: "Select Widget",
        build: select,
    },
    Demo {
        name: "checkboxchoice",
        title: "Checkbox Choice Widget",
        build: checkboxchoice,
    },
    Demo {
        name: "i18n",
        title: "Internationalization",
        build: i18n,
    },
    Demo {
        name: "hidden_field",
        title: "Hidden Field Widget",
        build: hidden_field,
    },
];

/// Looks up a demo by URL slug.
pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|demo| demo.name == name)
}

/// Demos sorted by title, then name, for the index page.
pub fn index() -> Vec<&'static Demo> {
    let mut demos: Vec<&'static Demo> = DEMOS.iter().collect();
    demos.sort_by(|a, b| (a.title, a.name).cmp(&(b.title, b.name)));
    demos
}
