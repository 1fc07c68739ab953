//! Lookups over the parsed `roxmltree` arena.
//!
//! Tags are matched on their local name, so `gx:Track` and `Track` are the
//! same tag here.

use roxmltree::Node;

pub const FOLDER: &str = "Folder";

pub fn is(node: &Node, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

/// Direct element children of `node` named `tag`, in document order.
pub fn children_named<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.children().filter(move |c| is(c, tag))
}

pub fn first_child<'a, 'i: 'a>(node: Node<'a, 'i>, tag: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|c| is(c, tag))
}

/// Element descendants of `node` named `tag`, excluding `node` itself.
pub fn descendants_named<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.descendants().skip(1).filter(move |c| is(c, tag))
}

pub fn first_descendant<'a, 'i: 'a>(node: Node<'a, 'i>, tag: &str) -> Option<Node<'a, 'i>> {
    node.descendants().skip(1).find(|c| is(c, tag))
}

/// Concatenation of the direct text children of `node`.
pub fn text_content(node: Node) -> String {
    node.children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect()
}

/// The first child of `node` when that child is text.
pub fn first_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.first_child().filter(|c| c.is_text()).and_then(|c| c.text())
}

pub fn child_text(node: Node, tag: &str) -> Option<String> {
    first_child(node, tag).map(|c| text_content(c).trim().to_string())
}

pub fn child_f64(node: Node, tag: &str) -> Option<f64> {
    child_text(node, tag).and_then(|t| t.parse().ok())
}

/// Elements whose nearest enclosing `Folder` is `scope`, in document order.
///
/// Nested folders are yielded themselves but never entered.
pub fn scoped_elements<'a, 'i: 'a>(scope: Node<'a, 'i>) -> Vec<Node<'a, 'i>> {
    let mut ret = Vec::new();
    let mut stack: Vec<Node<'a, 'i>> = scope.children().filter(|c| c.is_element()).collect();
    stack.reverse();
    while let Some(node) = stack.pop() {
        ret.push(node);
        if is(&node, FOLDER) {
            continue;
        }
        let len = stack.len();
        stack.extend(node.children().filter(|c| c.is_element()));
        stack[len..].reverse();
    }
    ret
}
