// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Element-specific DOM operations

use super::node::{self, NodeId, NodeMap};
use super::parser::parse_fragment_into;
use crate::error::{Error, Result};

/// Handle to an element inside a document
#[derive(Debug, Clone)]
pub struct Element {
    id: NodeId,
    nodes: NodeMap,
}

impl Element {
    pub(crate) fn new(id: NodeId, nodes: NodeMap) -> Self {
        Self { id, nodes }
    }

    /// Node ID of this element
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Whether the element is still attached to its document's storage
    pub fn is_alive(&self) -> bool {
        self.nodes.read().contains_key(&self.id)
    }

    /// Get the tag name (uppercase, like browsers)
    pub fn tag_name(&self) -> String {
        self.local_name().to_uppercase()
    }

    /// Get local name (lowercase)
    pub fn local_name(&self) -> String {
        self.nodes
            .read()
            .get(&self.id)
            .and_then(|n| n.tag_name.clone())
            .unwrap_or_default()
    }

    /// Get an attribute
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let name = name.to_lowercase();
        self.nodes.read().get(&self.id).and_then(|n| {
            n.attributes
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.clone())
        })
    }

    /// Get text content
    pub fn text_content(&self) -> String {
        node::text_content(&self.nodes.read(), self.id)
    }

    /// Get inner HTML
    pub fn inner_html(&self) -> String {
        node::serialize_children(&self.nodes.read(), self.id)
    }

    /// Get outer HTML
    pub fn outer_html(&self) -> String {
        node::serialize(&self.nodes.read(), self.id)
    }

    /// Replace the element's children with parsed `html`
    pub fn set_inner_html(&self, html: &str) -> Result<()> {
        let mut nodes = self.nodes.write();
        if !nodes.contains_key(&self.id) {
            return Err(Error::dom("element was removed from the document"));
        }
        node::clear_children(&mut nodes, self.id);
        parse_fragment_into(&mut nodes, self.id, html)
    }

    /// Replace the element's children with a single text node
    pub fn set_text_content(&self, text: &str) -> Result<()> {
        let mut nodes = self.nodes.write();
        if !nodes.contains_key(&self.id) {
            return Err(Error::dom("element was removed from the document"));
        }
        node::clear_children(&mut nodes, self.id);
        if !text.is_empty() {
            node::append(&mut nodes, self.id, node::NodeData::text(text));
        }
        Ok(())
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

#[cfg(test)]
mod tests {
    use crate::dom::parse_html;

    #[test]
    fn test_set_inner_html_replaces_children() {
        let doc = parse_html(
            "<body><ytd-rich-grid-renderer><div><a href='/watch'>clip</a></div></ytd-rich-grid-renderer></body>",
        )
        .unwrap();
        let grid = doc.get_elements_by_tag_name("ytd-rich-grid-renderer").remove(0);
        let before = doc.node_count();

        grid.set_inner_html("<h1>🌱\nPADHLE</h1>").unwrap();

        assert_eq!(grid.inner_html(), "<h1>🌱\nPADHLE</h1>");
        assert!(doc.get_elements_by_tag_name("a").is_empty());
        // div, a, and text replaced by h1 and text
        assert_eq!(doc.node_count(), before - 1);
    }

    #[test]
    fn test_set_text_content_escapes() {
        let doc = parse_html("<body><p>x</p></body>").unwrap();
        let p = doc.get_elements_by_tag_name("p").remove(0);
        p.set_text_content("<b>not bold</b>").unwrap();
        assert_eq!(p.outer_html(), "<p>&lt;b&gt;not bold&lt;/b&gt;</p>");
        assert_eq!(p.tag_name(), "P");
    }

    #[test]
    fn test_removed_element() {
        let doc = parse_html("<body><section><p>x</p></section></body>").unwrap();
        let section = doc.get_elements_by_tag_name("section").remove(0);
        let p = doc.get_elements_by_tag_name("p").remove(0);

        section.set_inner_html("").unwrap();
        assert!(!p.is_alive());
        assert!(p.set_inner_html("y").is_err());
    }
}
