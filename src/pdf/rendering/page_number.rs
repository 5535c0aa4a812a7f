//! Page numbers on content pages, linked back to the contents.

use super::pattern::GridLayout;
use crate::notebook::{DestId, NotebookConfig, PageGeometry, PageNumberPosition, Rect};
use crate::pdf::document::{Page, SpanFont, SpanLayout};
use crate::pdf::fonts::{Face, FontSet};
use crate::registry::PatternKind;
use crate::units::{Mm, Pt};

pub const FONT_SIZE: Pt = Pt(18.0);
pub const GREY: f32 = 0.55;
/// Baseline of numbers at the bottom of the page
pub const LOWER_BASELINE: Mm = Mm(11.0);
/// Every position is nudged right by this much
pub const RIGHT_OFFSET: Mm = Mm(3.0);
const LINK_PADDING: Pt = Pt(2.0);

/// Where the number's baseline starts.
pub fn anchor(
    config: &NotebookConfig,
    geometry: &PageGeometry,
    position: PageNumberPosition,
    text_width: Pt,
) -> (Pt, Pt) {
    let offset: Pt = RIGHT_OFFSET.into();
    let lower: Pt = LOWER_BASELINE.into();
    let upper = geometry.height - geometry.top / 2.0 - Pt(10.0);
    let middle = (geometry.width - text_width) / 2.0 + offset;
    let right = geometry.width - geometry.right - text_width + offset;

    match position {
        // line the number up with the last grid column
        PageNumberPosition::LowerRight if config.pattern == PatternKind::Grid => {
            let grid = GridLayout::new(geometry, config.spacing);
            (grid.right() - text_width, lower)
        }
        PageNumberPosition::LowerLeft => (geometry.left + offset, lower),
        PageNumberPosition::LowerRight => (right, lower),
        PageNumberPosition::LowerMiddle => (middle, lower),
        PageNumberPosition::UpperRight => (right, upper),
        PageNumberPosition::UpperMiddle => (middle, upper),
    }
}

/// Draw the 1-based number of a content page and link it to `target`.
///
/// Does nothing when page numbers are turned off. Returns the clickable area
/// when a link was attached.
pub fn annotate(
    page: &mut Page,
    config: &NotebookConfig,
    fonts: &FontSet,
    content_index: usize,
    target: Option<DestId>,
) -> Option<Rect> {
    let position = config.page_number_position?;
    let geometry = config.geometry();

    let text = (content_index + 1).to_string();
    let width = fonts.width_of_text(&text, Face::Sans, FONT_SIZE);
    let (x, y) = anchor(config, &geometry, position, width);

    page.add_span(SpanLayout {
        text,
        font: SpanFont {
            face: Face::Sans,
            size: FONT_SIZE,
        },
        grey: GREY,
        coords: (x, y),
    });

    let target = target?;
    let rect = Rect {
        x1: x - LINK_PADDING,
        y1: y - LINK_PADDING,
        x2: x + width + LINK_PADDING,
        y2: y + FONT_SIZE,
    };
    page.add_intradocument_link(rect, target);
    Some(rect)
}
