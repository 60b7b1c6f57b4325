//! Index, demo and listing pages.

use ironhtml::html;
use ironhtml::typed::Element;
use ironhtml_elements::{Div, A, H1, H5};
use oxide_forms::widgets::html_escape;

use super::base::{render_base, PageContext};
use crate::cycle::RenderResult;
use crate::demos::Demo;
use crate::locale::{LOCALE_PARAM, SUPPORTED};

/// Renders the demo index.
pub fn render_index(demos: &[&Demo]) -> String {
    let list = Element::<Div>::new()
        .class("list-group")
        .children(demos.iter(), |demo, a: Element<A>| {
            let url = format!("/{}/", demo.name);
            a.class("list-group-item list-group-item-action")
                .attr("href", &url)
                .text(demo.title)
        });

    let content = Element::<Div>::new()
        .child::<H1, _>(|h| h.class("mb-4").text("Demos"))
        .raw(list.render())
        .render();

    render_base(&PageContext {
        page_title: "Demos".to_string(),
        content,
        ..Default::default()
    })
}

/// Locale switcher shown above a translated demo.
#[derive(Debug, Clone, Copy)]
pub struct LocaleLinks<'a> {
    /// The locale the page is rendered in.
    pub current: &'a str,
}

/// Renders a demo page: the form, what it captured and its source.
pub fn render_demo(result: &RenderResult, locales: Option<LocaleLinks<'_>>) -> String {
    let title = &result.title;
    let heading = html! {
        h1.class("mb-4") {
            #title
        }
    };

    let mut content = Element::<Div>::new().raw(heading.render());
    if let Some(links) = locales {
        content = content.raw(render_locale_links(links.current));
    }

    let captured = html_escape(&result.captured_text());
    let content = content
        .child::<Div, _>(|row| {
            row.class("row g-4")
                .child::<Div, _>(|col| {
                    col.class("col-lg-7").child::<Div, _>(|card| {
                        card.class("card").child::<Div, _>(|body| {
                            body.class("card-body").raw(&result.form)
                        })
                    })
                })
                .child::<Div, _>(|col| {
                    col.class("col-lg-5").child::<Div, _>(|card| {
                        card.class("card captured")
                            .child::<H5, _>(|h| h.class("card-header").text("Captured"))
                            .child::<Div, _>(|body| {
                                body.class("card-body")
                                    .raw(format!("<pre>{captured}</pre>"))
                            })
                    })
                })
        })
        .raw(render_code_panel(result))
        .render();

    render_base(&PageContext {
        page_title: result.title.clone(),
        lang: locales.map_or_else(|| "en".to_string(), |l| l.current.to_string()),
        content,
        ..Default::default()
    })
}

fn render_locale_links(current: &str) -> String {
    let links: String = SUPPORTED
        .iter()
        .map(|locale| {
            let class = if *locale == current {
                "btn btn-sm btn-primary"
            } else {
                "btn btn-sm btn-outline-primary"
            };
            format!(r#"<a class="{class}" href="?{LOCALE_PARAM}={locale}">{locale}</a>"#)
        })
        .collect();
    format!(r#"<div class="btn-group mb-3" role="group">{links}</div>"#)
}

fn render_code_panel(result: &RenderResult) -> String {
    let Some(snippet) = &result.snippet else {
        return String::new();
    };
    let url = snippet.allcode_url();
    let link = html! {
        a.class("btn btn-sm btn-outline-secondary").href(#url) {
            "View in full listing"
        }
    };

    Element::<Div>::new()
        .class("card mt-4")
        .child::<Div, _>(|h| {
            h.class("card-header d-flex justify-content-between align-items-center")
                .text("Code")
                .raw(link.render())
        })
        .child::<Div, _>(|body| body.class("card-body demo-code").raw(snippet.to_html()))
        .render()
}

/// Renders the full demo source.
pub fn render_code(listing: &str) -> String {
    let content = Element::<Div>::new()
        .child::<H1, _>(|h| h.class("mb-4").text("All code"))
        .child::<Div, _>(|d| d.class("card card-body").raw(listing))
        .render();

    render_base(&PageContext {
        page_title: "All code".to_string(),
        content,
        ..Default::default()
    })
}
