//! PDF output: the page model, fonts and the notebook renderers.

pub mod document;
pub mod fonts;
pub mod metrics;
pub mod rendering;

pub use fonts::FontSet;
pub use rendering::generate;
