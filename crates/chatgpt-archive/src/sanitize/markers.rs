//! Class-name heuristics for the share page's interactive chrome.
//!
//! These track the page template's current markup and are expected to
//! break when it changes. Only direct children are inspected, and the
//! first qualifying child decides.

use scraper::ElementRef;

/// Class on the buttons of the copy/share/regenerate control strips.
pub const CURSOR_POINTER_MARKER: &str = "cursor-pointer";

/// Class on the composer form at the bottom of the page.
pub const FULL_WIDTH_FORM_MARKER: &str = "w-full";

/// The tree-node operations the predicates need.
pub trait MarkupNode: Sized {
    /// Attribute value by name.
    fn attr(&self, name: &str) -> Option<&str>;
    /// Element children (not descendants) with the given tag name.
    fn direct_children(&self, tag: &str) -> Vec<Self>;
}

impl<'a> MarkupNode for ElementRef<'a> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn direct_children(&self, tag: &str) -> Vec<Self> {
        self.children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == tag)
            .collect()
    }
}

/// Whether the whitespace-separated `class` list contains `marker` exactly.
pub fn has_class_token<N: MarkupNode>(node: &N, marker: &str) -> bool {
    node.attr("class")
        .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == marker))
}

fn any_direct_child_has_class<N: MarkupNode>(node: &N, tag: &str, marker: &str) -> bool {
    node.direct_children(tag)
        .iter()
        .any(|child| has_class_token(child, marker))
}

/// A container holding a direct `button.cursor-pointer`.
pub fn is_interactive_control_container<N: MarkupNode>(div: &N) -> bool {
    any_direct_child_has_class(div, "button", CURSOR_POINTER_MARKER)
}

/// A container holding a direct `form.w-full`.
pub fn is_input_form_container<N: MarkupNode>(div: &N) -> bool {
    any_direct_child_has_class(div, "form", FULL_WIDTH_FORM_MARKER)
}
