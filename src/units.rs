//! Physical units.
//!
//! Everything drawn on a page is measured in PDF points (1/72 inch). Configuration
//! is expressed in millimetres because that is how device sizes and pattern spacing
//! are usually quoted, so [`Mm`] converts into [`Pt`] at the edges.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Deref, Div, Mul, Sub, SubAssign};

pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// A length in PDF points.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Pt(pub f32);

/// A length in millimetres.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Mm(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * POINTS_PER_MM)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Self {
        Mm(pt.0 / POINTS_PER_MM)
    }
}

impl Deref for Pt {
    type Target = f32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Add for Pt {
    type Output = Pt;

    fn add(self, rhs: Pt) -> Pt {
        Pt(self.0 + rhs.0)
    }
}

impl AddAssign for Pt {
    fn add_assign(&mut self, rhs: Pt) {
        self.0 += rhs.0;
    }
}

impl Sub for Pt {
    type Output = Pt;

    fn sub(self, rhs: Pt) -> Pt {
        Pt(self.0 - rhs.0)
    }
}

impl SubAssign for Pt {
    fn sub_assign(&mut self, rhs: Pt) {
        self.0 -= rhs.0;
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

impl Div for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

/// How many whole `step`s fit into `length`.
///
/// A tiny tolerance keeps exact multiples (147 mm / 7 mm) from losing their last
/// step to floating point error.
pub fn whole_steps(length: Pt, step: Pt) -> usize {
    if step.0 <= 0.0 || length.0 <= 0.0 {
        return 0;
    }
    ((length / step) + 1e-4).floor() as usize
}
