// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM node storage

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared node storage for one document
pub(crate) type NodeMap = Arc<RwLock<HashMap<NodeId, NodeData>>>;

/// Unique node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a new unique node ID
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
    DocumentType,
}

/// Internal node data
#[derive(Debug)]
pub(crate) struct NodeData {
    pub node_type: NodeType,
    /// Lowercase tag name (elements only)
    pub tag_name: Option<String>,
    /// Text for text and comment nodes
    pub text: Option<String>,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl NodeData {
    fn with_type(node_type: NodeType) -> Self {
        Self {
            node_type,
            tag_name: None,
            text: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn document() -> Self {
        Self::with_type(NodeType::Document)
    }

    pub fn doctype() -> Self {
        Self::with_type(NodeType::DocumentType)
    }

    pub fn element(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: Some(tag_name.into().to_lowercase()),
            ..Self::with_type(NodeType::Element)
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Self::with_type(NodeType::Text)
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Self::with_type(NodeType::Comment)
        }
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.as_deref() == Some(tag)
    }
}

/// Insert `data` as the last child of `parent`
pub(crate) fn append(
    nodes: &mut HashMap<NodeId, NodeData>,
    parent: NodeId,
    mut data: NodeData,
) -> NodeId {
    let id = NodeId::new();
    data.parent = Some(parent);
    nodes.insert(id, data);
    if let Some(p) = nodes.get_mut(&parent) {
        p.children.push(id);
    }
    id
}

/// Drop every descendant of `id`, leaving `id` itself with no children
pub(crate) fn clear_children(nodes: &mut HashMap<NodeId, NodeData>, id: NodeId) {
    let children = nodes
        .get_mut(&id)
        .map(|n| std::mem::take(&mut n.children))
        .unwrap_or_default();

    let mut stack = children;
    while let Some(child) = stack.pop() {
        if let Some(data) = nodes.remove(&child) {
            stack.extend(data.children);
        }
    }
}

/// Elements with `tag` under `root` (excluding `root`), in document order
pub(crate) fn descendants_by_tag(
    nodes: &HashMap<NodeId, NodeData>,
    root: NodeId,
    tag: &str,
) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut stack: Vec<NodeId> = nodes
        .get(&root)
        .map(|n| n.children.iter().rev().copied().collect())
        .unwrap_or_default();

    while let Some(id) = stack.pop() {
        if let Some(node) = nodes.get(&id) {
            if node.is_tag(tag) {
                found.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
    }

    found
}

/// Concatenated text of a subtree
pub(crate) fn text_content(nodes: &HashMap<NodeId, NodeData>, id: NodeId) -> String {
    let mut out = String::new();
    collect_text(nodes, id, &mut out);
    out
}

fn collect_text(nodes: &HashMap<NodeId, NodeData>, id: NodeId, out: &mut String) {
    let Some(node) = nodes.get(&id) else { return };
    match node.node_type {
        NodeType::Text => out.push_str(node.text.as_deref().unwrap_or("")),
        NodeType::Element | NodeType::Document => {
            for &child in &node.children {
                collect_text(nodes, child, out);
            }
        }
        NodeType::Comment | NodeType::DocumentType => {}
    }
}

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Raw text elements whose text children are emitted unescaped
const RAW_TEXT_ELEMENTS: [&str; 6] = ["script", "style", "xmp", "iframe", "noembed", "noframes"];

/// Serialize the children of `id`
pub(crate) fn serialize_children(nodes: &HashMap<NodeId, NodeData>, id: NodeId) -> String {
    let mut out = String::new();
    if let Some(node) = nodes.get(&id) {
        let raw = node
            .tag_name
            .as_deref()
            .map(|t| RAW_TEXT_ELEMENTS.contains(&t))
            .unwrap_or(false);
        for &child in &node.children {
            serialize_node(nodes, child, raw, &mut out);
        }
    }
    out
}

/// Serialize `id` including its own tag
pub(crate) fn serialize(nodes: &HashMap<NodeId, NodeData>, id: NodeId) -> String {
    let mut out = String::new();
    serialize_node(nodes, id, false, &mut out);
    out
}

fn serialize_node(
    nodes: &HashMap<NodeId, NodeData>,
    id: NodeId,
    raw_text: bool,
    out: &mut String,
) {
    let Some(node) = nodes.get(&id) else { return };
    match node.node_type {
        NodeType::Text => {
            let text = node.text.as_deref().unwrap_or("");
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeType::Comment => {
            out.push_str("<!--");
            out.push_str(node.text.as_deref().unwrap_or(""));
            out.push_str("-->");
        }
        NodeType::DocumentType => out.push_str("<!DOCTYPE html>"),
        NodeType::Document => {
            for &child in &node.children {
                serialize_node(nodes, child, false, out);
            }
        }
        NodeType::Element => {
            let tag = node.tag_name.as_deref().unwrap_or("div");
            out.push('<');
            out.push_str(tag);
            for (name, value) in &node.attributes {
                out.push(' ');
                out.push_str(name);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            let raw = RAW_TEXT_ELEMENTS.contains(&tag);
            for &child in &node.children {
                serialize_node(nodes, child, raw, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}
