//! Turn the rendered share page into a static, self-contained document.
//!
//! Passes run in a fixed order over one `scraper::Html` tree:
//!
//! 1. inline every stylesheet link as a `<style>` element
//! 2. drop `<script>` elements
//! 3. drop `on*` event-handler attributes
//! 4. drop `div`s wrapping the interactive control strip
//! 5. drop `div`s wrapping the composer form
//!
//! Later passes query structure that earlier passes may have removed, so
//! the order is significant. Nodes are collected by id first and mutated
//! afterwards; scraper's selection borrows the tree immutably.
//!
//! Detached nodes stay in the tree's storage and `Html::select` still walks
//! them. Every query here starts from `Html::root_element` instead, and
//! callers inspecting the returned document should do the same.

pub mod markers;

use crate::acquisition::http_client::StylesheetSource;
use crate::error::{ArchiveError, Result};
use html5ever::tendril::StrTendril;
use html5ever::{LocalName, QualName};
use markers::{is_input_form_container, is_interactive_control_container};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::OnceLock;
use tracing::{debug, info};
use url::Url;

fn stylesheet_links() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| {
        Selector::parse(r#"link[rel~="stylesheet"]"#).expect("stylesheet selector is valid")
    })
}

fn scripts() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("script").expect("script selector is valid"))
}

fn divs() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("div").expect("div selector is valid"))
}

/// Parse `html` and run every pass over it.
///
/// Stylesheet hrefs are resolved against `base`. Any stylesheet that
/// cannot be fetched aborts the whole run.
pub async fn sanitize(html: &str, base: &Url, source: &dyn StylesheetSource) -> Result<Html> {
    let mut doc = Html::parse_document(html);

    let inlined = inline_stylesheets(&mut doc, base, source).await?;
    let scripts = remove_scripts(&mut doc);
    let handlers = strip_event_handlers(&mut doc);
    let controls = remove_interactive_controls(&mut doc);
    let forms = remove_input_forms(&mut doc);

    debug!(inlined, scripts, handlers, controls, forms, "document sanitized");
    Ok(doc)
}

/// Replace each `link[rel~=stylesheet]` with a `<style>` holding the sheet.
///
/// Sheets are fetched one at a time in document order. A link without an
/// `href` is left in place. Returns the number of sheets inlined.
pub async fn inline_stylesheets(
    doc: &mut Html,
    base: &Url,
    source: &dyn StylesheetSource,
) -> Result<usize> {
    let links: Vec<_> = doc
        .root_element()
        .select(stylesheet_links())
        .filter_map(|link| {
            link.value()
                .attr("href")
                .map(|href| (link.id(), href.to_string()))
        })
        .collect();

    for (id, href) in &links {
        let css_url = base
            .join(href)
            .map_err(|source| ArchiveError::StylesheetUrl {
                href: href.clone(),
                source,
            })?;
        info!("Inlining CSS from: {css_url}");
        let css = source.fetch_stylesheet(&css_url).await?;

        let Some(mut link) = doc.tree.get_mut(*id) else {
            continue;
        };
        let style_name = match link.value() {
            Node::Element(el) => QualName::new(None, el.name.ns.clone(), LocalName::from("style")),
            _ => continue,
        };
        {
            let mut style = link.insert_before(Node::Element(Element::new(style_name, Vec::new())));
            style.append(Node::Text(Text {
                text: StrTendril::from_slice(&css),
            }));
        }
        link.detach();
    }

    Ok(links.len())
}

/// Remove every `<script>` and its contents. Returns the number removed.
pub fn remove_scripts(doc: &mut Html) -> usize {
    detach_where(doc, scripts(), |_| true)
}

/// Whether `name` is an inline event handler (`onclick`, `ONLOAD`, ...).
pub fn is_event_handler(name: &str) -> bool {
    name.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

/// Drop every attribute starting with `on` from every element.
///
/// Returns the number of attributes removed.
pub fn strip_event_handlers(doc: &mut Html) -> usize {
    let targets: Vec<_> = doc
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().attrs().any(|(name, _)| is_event_handler(name)))
        .map(|el| el.id())
        .collect();

    let mut stripped = 0;
    for id in targets {
        let Some(mut node) = doc.tree.get_mut(id) else {
            continue;
        };
        let Node::Element(el) = node.value() else {
            continue;
        };

        let before = el.attrs.len();
        el.attrs.retain(|name, _| !is_event_handler(&name.local));
        stripped += before - el.attrs.len();
    }
    stripped
}

/// Remove `div`s whose direct-child button is `cursor-pointer`.
pub fn remove_interactive_controls(doc: &mut Html) -> usize {
    detach_where(doc, divs(), |div| is_interactive_control_container(div))
}

/// Remove `div`s whose direct-child form is `w-full`.
pub fn remove_input_forms(doc: &mut Html) -> usize {
    detach_where(doc, divs(), |div| is_input_form_container(div))
}

fn detach_where(
    doc: &mut Html,
    selector: &Selector,
    pred: impl Fn(&ElementRef<'_>) -> bool,
) -> usize {
    let ids: Vec<_> = doc
        .root_element()
        .select(selector)
        .filter(|el| pred(el))
        .map(|el| el.id())
        .collect();

    for id in &ids {
        if let Some(mut node) = doc.tree.get_mut(*id) {
            node.detach();
        }
    }
    ids.len()
}
