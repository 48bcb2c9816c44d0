// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Host page DOM
//!
//! A DOM-like interface built on top of html5ever, covering what an injected
//! script needs: tag lookup, innerHTML reads and writes, serialization.

mod document;
mod element;
mod node;
mod parser;

pub use document::Document;
pub use element::Element;
pub use node::{NodeId, NodeType};
pub use parser::{parse_html, parse_html_with_url};
