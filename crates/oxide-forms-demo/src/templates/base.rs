//! Base layout template.

use ironhtml::html;
use ironhtml::typed::{Document, Element};
use ironhtml_elements::{Body, Div, Head, Html, Li, Link, Meta, Nav, Script, Style, Title, Ul};

/// Context for rendering the demo layout.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Site title.
    pub site_title: String,
    /// Page title.
    pub page_title: String,
    /// `lang` attribute of the document.
    pub lang: String,
    /// Main content HTML.
    pub content: String,
}

impl Default for PageContext {
    fn default() -> Self {
        Self {
            site_title: "Deform Demo".to_string(),
            page_title: String::new(),
            lang: "en".to_string(),
            content: String::new(),
        }
    }
}

const CSS: &str = "\
body { min-height: 100vh; background-color: #f8f9fa; }\n\
.oxide-form-readonly .form-control-plaintext { padding-left: 0; }\n\
.captured pre { white-space: pre-wrap; margin: 0; }\n\
.demo-code { max-height: 28rem; overflow: auto; }";

/// Sequence add/remove buttons. Each add clones the item prototype and
/// gives its ids a fresh index.
const JS: &str = "\
let oxideSeq=0;\
document.addEventListener('click',function(e){\
const add=e.target.closest('.oxide-seq-add');\
if(add){\
const tpl=document.getElementById(add.dataset.prototype);\
const items=document.getElementById(add.dataset.items);\
const max=add.dataset.maxLen;\
if(max&&items.children.length>=Number(max)){return;}\
oxideSeq+=1;\
items.insertAdjacentHTML('beforeend',\
tpl.innerHTML.split('__index__').join('new'+oxideSeq));\
return;}\
const rm=e.target.closest('.oxide-seq-remove');\
if(rm){rm.closest('.oxide-seq-item').remove();}});";

/// Renders the base demo layout.
pub fn render_base(ctx: &PageContext) -> String {
    let title_str = if ctx.page_title.is_empty() {
        ctx.site_title.clone()
    } else {
        format!("{} | {}", ctx.page_title, ctx.site_title)
    };

    Document::new()
        .doctype()
        .root::<Html, _>(|html_el| {
            html_el
                .attr("lang", &ctx.lang)
                .data("bs-theme", "light")
                .child::<Head, _>(|head| {
                    head.child::<Meta, _>(|m| m.attr("charset", "UTF-8"))
                        .child::<Meta, _>(|m| {
                            m.attr("name", "viewport").attr(
                                "content",
                                "width=device-width, \
                                 initial-scale=1.0",
                            )
                        })
                        .child::<Title, _>(|t| t.text(&title_str))
                        .child::<Link, _>(|l| {
                            l.attr("href", "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css")
                                .attr("rel", "stylesheet")
                        })
                        .child::<Link, _>(|l| l.attr("href", "/code.css").attr("rel", "stylesheet"))
                        .child::<Style, _>(|s| s.raw(CSS))
                })
                .child::<Body, _>(|body| {
                    body.child::<Nav, _>(|nav| render_navbar(nav, ctx))
                        .child::<Div, _>(|main| {
                            main.class("container pb-5").raw(&ctx.content)
                        })
                        .child::<Script, _>(|s| {
                            s.attr("src", "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/js/bootstrap.bundle.min.js")
                        })
                        .child::<Script, _>(|s| s.raw(JS))
                })
        })
        .build()
}

fn render_navbar(nav: Element<Nav>, ctx: &PageContext) -> Element<Nav> {
    let site = &ctx.site_title;
    let brand = html! {
        a.class("navbar-brand").href("/") {
            #site
        }
    };
    let allcode = html! {
        a.class("nav-link").href("/allcode/") {
            "All code"
        }
    };

    nav.class("navbar navbar-expand navbar-dark bg-dark mb-4")
        .child::<Div, _>(|d| {
            d.class("container")
                .raw(brand.render())
                .child::<Ul, _>(|ul| {
                    ul.class("navbar-nav ms-auto")
                        .child::<Li, _>(|li| li.class("nav-item").raw(allcode.render()))
                })
        })
}
