#![forbid(unsafe_code)]

//! Namespace-agnostic element lookup.
//!
//! XML-Enc producers disagree on prefixes (`xenc:`, `e:`, default namespace),
//! so every lookup here matches on the element's local name.  Lookups that
//! must be pinned to a namespace take it explicitly.

use crate::node::XmlNode;

/// First element child of `parent` with the given local name.
pub fn find_child<N: XmlNode>(parent: N, local_name: &str) -> Option<N> {
    parent
        .children()
        .find(|n| n.is_element() && n.local_name() == local_name)
}

/// Follow a path of local names from `scope`, one child level per segment.
///
/// `find_path(data, &["CipherData", "CipherValue"])` is the equivalent of the
/// XPath `./*[local-name()='CipherData']/*[local-name()='CipherValue']`.
pub fn find_path<N: XmlNode>(scope: N, path: &[&str]) -> Option<N> {
    let mut current = scope;
    for segment in path {
        current = find_child(current, segment)?;
    }
    Some(current)
}

/// First element at or below `scope`, in document order, with the given
/// local name and, when `ns` is given, that namespace URI.
pub fn find_descendant<N: XmlNode>(scope: N, local_name: &str, ns: Option<&str>) -> Option<N> {
    let matches = |n: &N| {
        n.is_element()
            && n.local_name() == local_name
            && ns.map_or(true, |uri| n.namespace() == Some(uri))
    };

    // Explicit stack; children are pushed in reverse to keep document order.
    let mut stack = vec![scope];
    while let Some(node) = stack.pop() {
        if matches(&node) {
            return Some(node);
        }
        let children: Vec<N> = node.children().collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Concatenated text of all text children of `node`.
pub fn text_content<N: XmlNode>(node: N) -> String {
    node.children().filter_map(|c| c.text().map(str::to_owned)).collect()
}
