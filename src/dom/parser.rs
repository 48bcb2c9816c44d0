// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML parser using html5ever

use std::collections::HashMap;

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, parse_fragment, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use url::Url;

use super::document::Document;
use super::node::{append, NodeData, NodeId};
use crate::error::{Error, Result};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

fn parse_opts() -> ParseOpts {
    ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Parse HTML string into a Document
pub fn parse_html(html: &str) -> Result<Document> {
    parse_html_with_url(html, None)
}

/// Parse HTML string with the page URL
pub fn parse_html_with_url(html: &str, url: Option<Url>) -> Result<Document> {
    let dom = parse_document(RcDom::default(), parse_opts())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| Error::HtmlParse(e.to_string()))?;

    let doc = match url {
        Some(u) => Document::with_url(u),
        None => Document::new(),
    };

    {
        let mut nodes = doc.nodes.write();
        let root = doc.root_id();
        for child in dom.document.children.borrow().iter() {
            convert(&mut nodes, child, root);
        }
    }

    if let Some(title) = doc.get_elements_by_tag_name("title").first() {
        doc.set_title(title.text_content());
    }

    Ok(doc)
}

/// Parse `html` as the content of an element and append it under `parent`
///
/// This is what an `innerHTML` assignment does after clearing the children.
pub(crate) fn parse_fragment_into(
    nodes: &mut HashMap<NodeId, NodeData>,
    parent: NodeId,
    html: &str,
) -> Result<()> {
    let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
    let dom = parse_fragment(RcDom::default(), parse_opts(), context, Vec::new())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| Error::HtmlParse(e.to_string()))?;

    // Fragment parsing wraps the content in a synthetic <html> element
    let document_children = dom.document.children.borrow();
    for top in document_children.iter() {
        let is_wrapper = matches!(
            top.data,
            RcNodeData::Element { ref name, .. } if &*name.local == "html"
        );
        if is_wrapper {
            for child in top.children.borrow().iter() {
                convert(nodes, child, parent);
            }
        } else {
            convert(nodes, top, parent);
        }
    }

    Ok(())
}

/// Copy an html5ever subtree into our node storage
fn convert(nodes: &mut HashMap<NodeId, NodeData>, handle: &Handle, parent: NodeId) {
    let data = match handle.data {
        RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return,
        RcNodeData::Doctype { .. } => NodeData::doctype(),
        RcNodeData::Text { ref contents } => {
            let text = contents.borrow().to_string();
            if text.trim().is_empty() && text.len() > 1 {
                // Skip whitespace-only runs (but keep single spaces)
                return;
            }
            NodeData::text(text)
        }
        RcNodeData::Comment { ref contents } => NodeData::comment(contents.to_string()),
        RcNodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let mut data = NodeData::element(name.local.to_string());
            data.attributes = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect();
            data
        }
    };

    let id = append(nodes, parent, data);
    for child in handle.children.borrow().iter() {
        convert(nodes, child, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_html() {
        let doc = parse_html("<html><body><p>Hello</p></body></html>").unwrap();
        assert!(doc.body().is_some());
        assert_eq!(doc.text_content(), "Hello");
    }

    #[test]
    fn test_parse_with_attributes() {
        let doc = parse_html("<div id=\"test\" class=\"foo bar\">content</div>").unwrap();
        let div = doc.get_elements_by_tag_name("div").remove(0);
        assert_eq!(div.get_attribute("id"), Some("test".to_string()));
        assert_eq!(div.get_attribute("class"), Some("foo bar".to_string()));
    }

    #[test]
    fn test_parse_title_and_custom_elements() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head><title>Home - YouTube</title></head>
            <body>
                <ytd-app>
                    <ytd-rich-grid-renderer><div>video</div></ytd-rich-grid-renderer>
                </ytd-app>
            </body>
            </html>
        "#;
        let doc = parse_html(html).unwrap();

        assert_eq!(doc.title(), "Home - YouTube");
        assert_eq!(doc.get_elements_by_tag_name("ytd-rich-grid-renderer").len(), 1);
        assert!(doc.outer_html().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_fragment_into() {
        let doc = parse_html("<div></div>").unwrap();
        let div = doc.get_elements_by_tag_name("div").remove(0);
        {
            let mut nodes = doc.nodes.write();
            parse_fragment_into(&mut nodes, div.id(), "<b>bold</b> text").unwrap();
        }
        assert_eq!(div.inner_html(), "<b>bold</b> text");
    }
}
