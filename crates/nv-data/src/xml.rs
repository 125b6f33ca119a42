//! Namespace-agnostic helpers over `roxmltree` nodes

use roxmltree::Node;

/// Element children of `node` whose local name is `name`
pub(crate) fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

pub(crate) fn child<'a, 'input: 'a>(node: Node<'a, 'input>, name: &'a str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

/// First element at or below `node` whose local name is one of `names`
pub(crate) fn find_first<'a, 'input>(node: Node<'a, 'input>, names: &[&str]) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && names.contains(&n.tag_name().name()))
}

/// Attribute value with surrounding whitespace removed; empty values count as absent
pub(crate) fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).map(str::trim).filter(|v| !v.is_empty())
}

/// Boolean attribute: `true` or `1`, case-insensitive
pub(crate) fn flag(node: Node<'_, '_>, name: &str) -> bool {
    attr(node, name).map_or(false, |v| v.eq_ignore_ascii_case("true") || v == "1")
}

pub(crate) fn number<T: std::str::FromStr>(node: Node<'_, '_>, name: &str) -> Option<T> {
    attr(node, name).and_then(|v| v.parse().ok())
}
