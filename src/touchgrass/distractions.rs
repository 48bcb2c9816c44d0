// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Distraction removal

use crate::dom::Document;
use crate::error::Result;

/// Recommendation grid on the home page
pub const HOMEPAGE_GRID: &str = "ytd-rich-grid-renderer";

/// "Up next" sidebar on the watch page
pub const WATCH_SIDEBAR: &str = "ytd-watch-next-secondary-results-renderer";

/// What a removed pane is replaced with
pub const DISTRACTION_NOTICE: &str = "<h1>🌱\nPADHLE</h1>";

/// Replace the first grid and sidebar in `document` with the notice
///
/// Panes missing from the page are skipped. Returns how many were replaced.
pub fn remove_distractions(document: &Document) -> Result<usize> {
    let mut removed = 0;

    for tag in [HOMEPAGE_GRID, WATCH_SIDEBAR] {
        let Some(pane) = document.get_elements_by_tag_name(tag).into_iter().next() else {
            tracing::trace!(tag, "no distraction pane on page");
            continue;
        };
        pane.set_inner_html(DISTRACTION_NOTICE)?;
        tracing::debug!(tag, "distraction pane replaced");
        removed += 1;
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const WATCH_PAGE: &str = r#"
        <html><body>
            <ytd-watch-flexy>
                <div id="player">video</div>
                <ytd-watch-next-secondary-results-renderer>
                    <a href="/watch?v=1">next</a>
                </ytd-watch-next-secondary-results-renderer>
            </ytd-watch-flexy>
        </body></html>
    "#;

    #[test]
    fn test_watch_page() {
        let doc = parse_html(WATCH_PAGE).unwrap();
        assert_eq!(remove_distractions(&doc).unwrap(), 1);

        let sidebar = doc.get_elements_by_tag_name(WATCH_SIDEBAR).remove(0);
        assert_eq!(sidebar.inner_html(), DISTRACTION_NOTICE);
        assert_eq!(doc.get_elements_by_tag_name("div")[0].text_content(), "video");
    }

    #[test]
    fn test_only_first_grid_replaced() {
        let doc = parse_html(
            "<body><ytd-rich-grid-renderer>one</ytd-rich-grid-renderer>\
             <ytd-rich-grid-renderer>two</ytd-rich-grid-renderer></body>",
        )
        .unwrap();

        assert_eq!(remove_distractions(&doc).unwrap(), 1);
        let grids = doc.get_elements_by_tag_name(HOMEPAGE_GRID);
        assert_eq!(grids[0].inner_html(), DISTRACTION_NOTICE);
        assert_eq!(grids[1].inner_html(), "two");
    }

    #[test]
    fn test_page_without_panes() {
        let doc = parse_html("<body><p>search results</p></body>").unwrap();
        let before = doc.outer_html();
        assert_eq!(remove_distractions(&doc).unwrap(), 0);
        assert_eq!(doc.outer_html(), before);
    }
}
