//! Background patterns for content pages.
//!
//! [`marks`] computes the full set of dots or rules for a page; [`render`] turns
//! that set into content stream operators. Keeping the two apart means the mark
//! set can be checked without parsing any PDF.

use crate::error::{NotebookError, Result};
use crate::notebook::PageGeometry;
use crate::pdf::document::Page;
use crate::registry::PatternKind;
use crate::units::{whole_steps, Mm, Pt};
use pdf_writer::types::LineCapStyle;
use pdf_writer::Content;

pub const RULE_WIDTH: Pt = Pt(0.5);
pub const RULE_GREY: f32 = 0.7;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mark {
    Dot { x: Pt, y: Pt, radius: Pt },
    Rule { from: (Pt, Pt), to: (Pt, Pt) },
}

/// The whole squares of a grid pattern, centred in the drawable area.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub x: Pt,
    pub y: Pt,
    pub step: Pt,
}

impl GridLayout {
    pub fn new(geometry: &PageGeometry, spacing: Mm) -> GridLayout {
        let area = geometry.drawable();
        let step: Pt = spacing.into();
        let columns = whole_steps(area.width(), step);
        let rows = whole_steps(area.height(), step);
        let width = step * columns as f32;
        let height = step * rows as f32;
        GridLayout {
            columns,
            rows,
            x: area.x1 + (area.width() - width) / 2.0,
            y: area.y1 + (area.height() - height) / 2.0,
            step,
        }
    }

    pub fn right(&self) -> Pt {
        self.x + self.step * self.columns as f32
    }

    pub fn top(&self) -> Pt {
        self.y + self.step * self.rows as f32
    }
}

fn check_spacing(spacing: Mm) -> Result<()> {
    if spacing.0.is_finite() && spacing.0 > 0.0 {
        Ok(())
    } else {
        Err(NotebookError::invalid(format!(
            "spacing_mm must be positive, got {}",
            spacing.0
        )))
    }
}

/// Compute every mark a content page carries.
pub fn marks(
    geometry: &PageGeometry,
    pattern: PatternKind,
    spacing: Mm,
    dot_radius: Pt,
) -> Result<Vec<Mark>> {
    check_spacing(spacing)?;
    let area = geometry.drawable();
    let step: Pt = spacing.into();

    // too small for even one spacing unit
    if area.width() < step || area.height() < step {
        return Ok(Vec::new());
    }

    let columns = whole_steps(area.width(), step) + 1;
    let rows = whole_steps(area.height(), step) + 1;

    let marks = match pattern {
        PatternKind::Blank => Vec::new(),
        PatternKind::Dots => {
            let mut marks = Vec::with_capacity(rows * columns);
            for row in 0..rows {
                let y = area.y2 - step * row as f32;
                for column in 0..columns {
                    marks.push(Mark::Dot {
                        x: area.x1 + step * column as f32,
                        y,
                        radius: dot_radius,
                    });
                }
            }
            marks
        }
        PatternKind::Lines => (0..rows)
            .map(|row| {
                let y = area.y2 - step * row as f32;
                Mark::Rule {
                    from: (area.x1, y),
                    to: (area.x2, y),
                }
            })
            .collect(),
        PatternKind::Grid => {
            let grid = GridLayout::new(geometry, spacing);
            let horizontal = (0..=grid.rows).map(|row| {
                let y = grid.y + grid.step * row as f32;
                Mark::Rule {
                    from: (grid.x, y),
                    to: (grid.right(), y),
                }
            });
            let vertical = (0..=grid.columns).map(|column| {
                let x = grid.x + grid.step * column as f32;
                Mark::Rule {
                    from: (x, grid.y),
                    to: (x, grid.top()),
                }
            });
            horizontal.chain(vertical).collect()
        }
    };
    Ok(marks)
}

/// Draw the pattern onto a page, returning how many marks were drawn.
pub fn render(
    page: &mut Page,
    geometry: &PageGeometry,
    pattern: PatternKind,
    spacing: Mm,
    dot_radius: Pt,
) -> Result<usize> {
    let marks = marks(geometry, pattern, spacing, dot_radius)?;
    if marks.is_empty() {
        return Ok(0);
    }

    let mut dots = Content::new();
    dots.save_state();
    dots.set_stroke_gray(0.0);
    dots.set_line_cap(LineCapStyle::RoundCap);
    dots.set_line_width(*dot_radius * 2.0);

    let mut rules = Content::new();
    rules.save_state();
    rules.set_stroke_gray(RULE_GREY);
    rules.set_line_cap(LineCapStyle::ButtCap);
    rules.set_line_width(*RULE_WIDTH);

    let (mut has_dots, mut has_rules) = (false, false);
    for mark in marks.iter() {
        match *mark {
            // a zero-length stroke with round caps is a filled circle
            Mark::Dot { x, y, .. } => {
                dots.move_to(*x, *y).line_to(*x, *y);
                has_dots = true;
            }
            Mark::Rule { from, to } => {
                rules.move_to(*from.0, *from.1).line_to(*to.0, *to.1);
                has_rules = true;
            }
        }
    }

    if has_dots {
        dots.stroke().restore_state();
        page.add_content(dots);
    }
    if has_rules {
        rules.stroke().restore_state();
        page.add_content(rules);
    }
    Ok(marks.len())
}
