use super::Margins;
use crate::error::{NotebookError, Result};
use crate::units::{Mm, Pt};

/// An axis-aligned rectangle in page space (origin at the bottom-left corner).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x1: Pt,
    pub y1: Pt,
    pub x2: Pt,
    pub y2: Pt,
}

impl Rect {
    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn padded(&self, amount: Pt) -> Rect {
        Rect {
            x1: self.x1 - amount,
            y1: self.y1 - amount,
            x2: self.x2 + amount,
            y2: self.y2 + amount,
        }
    }
}

/// Largest page side PDF viewers accept (200 inches of user space).
pub const MAX_PAGE_SIDE: Pt = Pt(14_400.0);

/// Page dimensions and margins, all in points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: Pt,
    pub height: Pt,
    pub left: Pt,
    pub right: Pt,
    pub top: Pt,
    pub bottom: Pt,
}

impl PageGeometry {
    pub fn new((width, height): (Pt, Pt), margins: &Margins) -> PageGeometry {
        PageGeometry {
            width,
            height,
            left: margins.left.into(),
            right: margins.right.into(),
            top: margins.top.into(),
            bottom: margins.bottom.into(),
        }
    }

    /// The area inside the margins.
    pub fn drawable(&self) -> Rect {
        Rect {
            x1: self.left,
            y1: self.bottom,
            x2: self.width - self.right,
            y2: self.height - self.top,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, side) in [("width", self.width), ("height", self.height)] {
            if !(side.is_finite() && *side > 0.0) {
                return Err(NotebookError::invalid(format!(
                    "page {name} must be a positive number, got {}",
                    *side
                )));
            }
            if side > MAX_PAGE_SIDE {
                return Err(NotebookError::invalid(format!(
                    "page {name} of {:.1}mm exceeds the {:.0}mm PDF limit",
                    Mm::from(side).0,
                    Mm::from(MAX_PAGE_SIDE).0
                )));
            }
        }
        for (name, margin) in [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ] {
            if !margin.is_finite() || *margin < 0.0 {
                return Err(NotebookError::invalid(format!(
                    "{name} margin must not be negative"
                )));
            }
        }

        let drawable = self.drawable();
        if *drawable.width() <= 0.0 || *drawable.height() <= 0.0 {
            return Err(NotebookError::invalid(
                "margins leave no drawable area on the page",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn a5() -> (Pt, Pt) {
        (Mm(148.0).into(), Mm(210.0).into())
    }

    #[test]
    fn drawable_area_is_inset_by_margins() {
        let geometry = PageGeometry::new(a5(), &Margins::all(Mm(10.0)));
        geometry.validate().expect("geometry is valid");

        let drawable = geometry.drawable();
        let expected_width: Pt = Mm(128.0).into();
        assert!((*drawable.width() - *expected_width).abs() < 1e-3);
        let ten: Pt = Mm(10.0).into();
        assert_eq!(drawable.x1, ten);
    }

    #[test]
    fn margins_consuming_the_page_are_rejected() {
        let mut margins = Margins::default();
        margins.left = Mm(80.0);
        margins.right = Mm(68.0);
        let geometry = PageGeometry::new(a5(), &margins);
        assert!(matches!(
            geometry.validate(),
            Err(NotebookError::InvalidParameter(_))
        ));

        let mut margins = Margins::default();
        margins.top = Mm(300.0);
        let geometry = PageGeometry::new(a5(), &margins);
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn negative_margins_are_rejected() {
        let mut margins = Margins::default();
        margins.bottom = Mm(-1.0);
        let geometry = PageGeometry::new(a5(), &margins);
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn non_finite_page_sizes_are_rejected() {
        for size in [
            (Pt(f32::INFINITY), Pt(500.0)),
            (Pt(500.0), Pt(f32::NAN)),
            (Pt(-10.0), Pt(500.0)),
        ] {
            let geometry = PageGeometry::new(size, &Margins::default());
            assert!(matches!(
                geometry.validate(),
                Err(NotebookError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn page_sides_are_capped_at_the_pdf_limit() {
        let geometry = PageGeometry::new((MAX_PAGE_SIDE, MAX_PAGE_SIDE), &Margins::default());
        geometry.validate().expect("the largest page is still valid");

        let huge: Pt = Mm(1e7).into();
        let geometry = PageGeometry::new((huge, huge), &Margins::default());
        assert!(matches!(
            geometry.validate(),
            Err(NotebookError::InvalidParameter(_))
        ));
    }
}
