// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document representation

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

use super::element::Element;
use super::node::{self, NodeData, NodeId, NodeMap};

/// HTML document of the host page
///
/// Clones share the same node storage, so a script holding a clone sees
/// (and makes) the same edits as the host.
#[derive(Debug, Clone)]
pub struct Document {
    /// Page URL
    url: Option<Url>,
    /// Document title
    title: Arc<RwLock<String>>,
    /// Root node ID
    root_id: NodeId,
    /// Node storage
    pub(crate) nodes: NodeMap,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        let root_id = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, NodeData::document());

        Self {
            url: None,
            title: Arc::new(RwLock::new(String::new())),
            root_id,
            nodes: Arc::new(RwLock::new(nodes)),
        }
    }

    /// Create a document with URL
    pub fn with_url(url: Url) -> Self {
        Self {
            url: Some(url),
            ..Self::new()
        }
    }

    /// Page URL
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.title.read().clone()
    }

    /// Set document title
    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.write() = title.into();
    }

    /// The <html> element
    pub fn document_element(&self) -> Option<Element> {
        self.first_by_tag("html")
    }

    /// The <head> element
    pub fn head(&self) -> Option<Element> {
        self.first_by_tag("head")
    }

    /// The <body> element
    pub fn body(&self) -> Option<Element> {
        self.first_by_tag("body")
    }

    fn first_by_tag(&self, tag: &str) -> Option<Element> {
        self.get_elements_by_tag_name(tag).into_iter().next()
    }

    /// Elements with the given tag name, in document order
    ///
    /// Matching is case-insensitive, like HTML documents in browsers.
    pub fn get_elements_by_tag_name(&self, tag: &str) -> Vec<Element> {
        let tag = tag.to_lowercase();
        let ids = node::descendants_by_tag(&self.nodes.read(), self.root_id, &tag);
        ids.into_iter()
            .map(|id| Element::new(id, self.nodes.clone()))
            .collect()
    }

    /// Number of nodes currently in the document
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Serialize the whole document
    pub fn outer_html(&self) -> String {
        node::serialize(&self.nodes.read(), self.root_id)
    }

    /// Get all text content
    pub fn text_content(&self) -> String {
        node::text_content(&self.nodes.read(), self.root_id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
