#![forbid(unsafe_code)]

//! Minimal node abstraction used by the envelope lookups.
//!
//! Keeps the lookup code independent from the concrete XML library; only
//! the handful of accessors the lookups need are exposed.

/// A read-only view of a node in a parsed XML tree.
pub trait XmlNode: Copy {
    /// Iterator over the direct children of a node.
    type Children: Iterator<Item = Self>;

    fn is_element(&self) -> bool;
    /// Local part of the element name, without any prefix.
    fn local_name(&self) -> &str;
    /// Resolved namespace URI, if the element is in a namespace.
    fn namespace(&self) -> Option<&str>;
    fn attribute(&self, name: &str) -> Option<&str>;
    /// Text of a text node; `None` for other node kinds.
    fn text(&self) -> Option<&str>;
    fn children(&self) -> Self::Children;
}

impl<'a, 'input: 'a> XmlNode for roxmltree::Node<'a, 'input> {
    type Children = roxmltree::Children<'a, 'input>;

    fn is_element(&self) -> bool {
        roxmltree::Node::is_element(self)
    }

    fn local_name(&self) -> &str {
        self.tag_name().name()
    }

    fn namespace(&self) -> Option<&str> {
        self.tag_name().namespace()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        roxmltree::Node::attribute(self, name)
    }

    fn text(&self) -> Option<&str> {
        if roxmltree::Node::is_text(self) {
            roxmltree::Node::text(self)
        } else {
            None
        }
    }

    fn children(&self) -> Self::Children {
        roxmltree::Node::children(self)
    }
}
