//! Table of contents with clickable links.
//!
//! Lists every content page with a rule to write on and its page number, each
//! entry linking to the page it names. How many entries go on which page has
//! already been decided by the [`DocumentPlan`]; this only draws them. Every
//! contents page also gets a navigation row linking to its neighbours and the
//! cover.

use crate::notebook::{DocumentPlan, NotebookConfig, Rect, TOC_HEADER_SPACING};
use crate::pdf::document::{Page, SpanFont, SpanLayout};
use crate::pdf::fonts::{Face, FontSet};
use crate::units::{Mm, Pt};
use pdf_writer::types::LineCapStyle;
use pdf_writer::Content;

pub const HEADING: &str = "Table of Contents";
const HEADING_SIZE: Pt = Pt(16.0);
const ENTRY_SIZE: Pt = Pt(8.0);
const NAV_SIZE: Pt = Pt(8.0);
/// Baseline of the navigation row
const NAV_BASELINE: Mm = Mm(12.0);

/// Render all contents pages, in order.
pub fn render(config: &NotebookConfig, plan: &DocumentPlan, fonts: &FontSet) -> Vec<Page> {
    let geometry = config.geometry();
    let line_spacing: Pt = config.toc_line_spacing.into();
    let number_x = geometry.width - geometry.right + Pt::from(Mm(2.0));

    let mut pages = Vec::with_capacity(plan.toc_page_count());
    for (toc_index, entries) in plan.toc_pages.iter().enumerate() {
        let mut page = Page::new();

        let mut y = if toc_index == 0 {
            let heading_y = geometry.height - geometry.top - Pt::from(Mm(15.0));
            page.add_span(SpanLayout {
                text: HEADING.to_string(),
                font: SpanFont {
                    face: Face::Serif,
                    size: HEADING_SIZE,
                },
                grey: 0.4,
                coords: (geometry.left, heading_y),
            });
            heading_y - TOC_HEADER_SPACING
        } else {
            geometry.height - geometry.top - TOC_HEADER_SPACING - Pt::from(Mm(10.0))
        };

        let mut rules = Content::new();
        rules
            .save_state()
            .set_stroke_gray(0.7)
            .set_line_width(0.5)
            .set_line_cap(LineCapStyle::ButtCap);

        for entry in plan.entries[entries.clone()].iter() {
            let number = entry.number().to_string();
            let width = fonts.width_of_text(&number, Face::Sans, ENTRY_SIZE);
            page.add_span(SpanLayout {
                text: number,
                font: SpanFont {
                    face: Face::Sans,
                    size: ENTRY_SIZE,
                },
                grey: 0.0,
                coords: (number_x - width, y + Pt(5.0)),
            });

            rules
                .move_to(*geometry.left, *y)
                .line_to(*number_x + 2.0, *y);

            if let Some(target) = plan.destinations.content(entry.content_index) {
                page.add_intradocument_link(
                    Rect {
                        x1: geometry.left,
                        y1: y - Pt(5.0),
                        x2: number_x,
                        y2: y + line_spacing - Pt(5.0),
                    },
                    target,
                );
            }

            y -= line_spacing;
        }

        if !entries.is_empty() {
            rules.stroke();
        }
        rules.restore_state();
        page.add_content(rules);

        add_navigation(&mut page, config, plan, fonts, toc_index);
        pages.push(page);
    }
    pages
}

/// Previous / Cover / Next links along the bottom of a contents page.
fn add_navigation(
    page: &mut Page,
    config: &NotebookConfig,
    plan: &DocumentPlan,
    fonts: &FontSet,
    toc_index: usize,
) {
    let geometry = config.geometry();
    let y: Pt = NAV_BASELINE.into();
    let destinations = &plan.destinations;

    let mut links = Vec::with_capacity(3);
    if toc_index > 0 {
        if let Some(target) = destinations.toc(toc_index - 1) {
            links.push(("Previous", geometry.left, target));
        }
    }
    if let Some(target) = destinations.title() {
        let width = fonts.width_of_text("Cover", Face::Sans, NAV_SIZE);
        links.push(("Cover", (geometry.width - width) / 2.0, target));
    }
    if let Some(target) = destinations.toc(toc_index + 1) {
        let width = fonts.width_of_text("Next", Face::Sans, NAV_SIZE);
        links.push(("Next", geometry.width - geometry.right - width, target));
    }

    for (text, x, target) in links {
        let width = fonts.width_of_text(text, Face::Sans, NAV_SIZE);
        page.add_span(SpanLayout {
            text: text.to_string(),
            font: SpanFont {
                face: Face::Sans,
                size: NAV_SIZE,
            },
            grey: 0.4,
            coords: (x, y),
        });
        page.add_intradocument_link(
            Rect {
                x1: x,
                y1: y,
                x2: x + width,
                y2: y + Pt(10.0),
            }
            .padded(Pt(2.0)),
            target,
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notebook::PageSize;

    fn setup(num_pages: usize, title: bool) -> (NotebookConfig, DocumentPlan) {
        let config = NotebookConfig::builder()
            .num_pages(num_pages)
            .page_size("remarkable2".parse::<PageSize>().unwrap())
            .include_title_page(title)
            .build()
            .unwrap();
        let plan = DocumentPlan::new(&config).unwrap();
        (config, plan)
    }

    #[test]
    fn every_entry_links_to_its_content_page() {
        let (config, plan) = setup(30, true);
        let pages = render(&config, &plan, &FontSet::standard());
        assert_eq!(pages.len(), 2);

        let entry_targets: Vec<usize> = pages
            .iter()
            .flat_map(|page| page.links().iter())
            .map(|link| plan.destinations.get(link.target))
            .filter(|dest| dest.name.starts_with("page_"))
            .map(|dest| dest.page_index)
            .collect();
        let expected: Vec<usize> = (0..30).map(|i| plan.content_page_index(i)).collect();
        assert_eq!(entry_targets, expected);
    }

    #[test]
    fn navigation_links_neighbours_and_cover() {
        let (config, plan) = setup(60, true);
        let pages = render(&config, &plan, &FontSet::standard());
        assert_eq!(pages.len(), 3);

        let nav_names = |page: &Page| -> Vec<String> {
            page.links()
                .iter()
                .map(|link| plan.destinations.get(link.target).name.clone())
                .filter(|name| !name.starts_with("page_"))
                .collect()
        };
        assert_eq!(nav_names(&pages[0]), vec!["title_page", "toc_page_2"]);
        assert_eq!(
            nav_names(&pages[1]),
            vec!["toc_page_1", "title_page", "toc_page_3"]
        );
        assert_eq!(nav_names(&pages[2]), vec!["toc_page_2", "title_page"]);
    }

    #[test]
    fn no_cover_link_without_a_title_page() {
        let (config, plan) = setup(3, false);
        let pages = render(&config, &plan, &FontSet::standard());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].links().len(), 3);
    }
}
