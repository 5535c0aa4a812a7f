//! Notebook configuration.
//!
//! A [`NotebookConfig`] describes one document: how many content pages, which
//! device it is sized for, the page pattern and its spacing, margins, whether the
//! title page and table of contents are included, and the metadata pre-filled into
//! the title page form. It is built through [`NotebookConfigBuilder`], which fills
//! in defaults and validates everything before any drawing happens, so a bad
//! configuration never produces a partial file.

mod geometry;
pub use geometry::*;

mod margins;
pub use margins::*;

mod plan;
pub use plan::*;

use crate::error::{NotebookError, Result};
use crate::registry::{self, DeviceId, DeviceSpec, PatternKind};
use crate::units::{Mm, Pt};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// What the page is sized for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PageSize {
    Device(&'static DeviceSpec),
    Custom { width: Mm, height: Mm },
}

impl PageSize {
    pub fn dimensions(&self) -> (Pt, Pt) {
        match self {
            PageSize::Device(spec) => spec.size(),
            PageSize::Custom { width, height } => ((*width).into(), (*height).into()),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            PageSize::Device(spec) => spec.display_name,
            PageSize::Custom { .. } => "Custom Size",
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        let a4 = registry::list_devices()
            .iter()
            .find(|d| d.id == DeviceId::A4)
            .expect("A4 is in the device table");
        PageSize::Device(a4)
    }
}

impl FromStr for PageSize {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self> {
        registry::resolve(s).map(PageSize::Device)
    }
}

/// Where the page number sits on content pages.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageNumberPosition {
    LowerLeft,
    LowerRight,
    LowerMiddle,
    UpperRight,
    UpperMiddle,
}

impl PageNumberPosition {
    pub fn name(&self) -> &'static str {
        match self {
            PageNumberPosition::LowerLeft => "lower-left",
            PageNumberPosition::LowerRight => "lower-right",
            PageNumberPosition::LowerMiddle => "lower-middle",
            PageNumberPosition::UpperRight => "upper-right",
            PageNumberPosition::UpperMiddle => "upper-middle",
        }
    }

    pub fn all() -> &'static [PageNumberPosition] {
        &[
            PageNumberPosition::LowerLeft,
            PageNumberPosition::LowerRight,
            PageNumberPosition::LowerMiddle,
            PageNumberPosition::UpperRight,
            PageNumberPosition::UpperMiddle,
        ]
    }

    /// Parse a position name, where `none` (or an empty string) turns page
    /// numbering off.
    pub fn parse_optional(s: &str) -> Result<Option<PageNumberPosition>> {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() || needle == "none" {
            return Ok(None);
        }
        PageNumberPosition::all()
            .iter()
            .copied()
            .find(|p| p.name() == needle.replace('_', "-"))
            .map(Some)
            .ok_or_else(|| {
                NotebookError::invalid(format!(
                    "unknown page number position `{s}`, expected one of: lower-left, \
                    lower-right, lower-middle, upper-right, upper-middle, none"
                ))
            })
    }
}

impl fmt::Display for PageNumberPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Values pre-filled into the title page form fields.
#[derive(Builder, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct TitleMetadata {
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[builder(setter(each(name = "tag", into)), default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Everything needed to generate one notebook.
#[derive(Builder, Debug, Clone)]
#[builder(setter(into), build_fn(skip, error = "NotebookError"), derive(Debug))]
pub struct NotebookConfig {
    /// Number of content pages
    pub num_pages: usize,
    pub page_size: PageSize,
    pub pattern: PatternKind,
    /// Distance between dots, lines, or grid rules
    pub spacing: Mm,
    pub dot_radius: Pt,
    #[builder(setter(custom))]
    pub margins: Margins,
    /// `None` turns page numbers (and their links back to the contents) off
    pub page_number_position: Option<PageNumberPosition>,
    pub include_title_page: bool,
    pub include_toc: bool,
    pub toc_line_spacing: Mm,
    pub title_metadata: TitleMetadata,
    /// Preferred serif font file for headings, tried before the well-known locations
    #[builder(setter(into, strip_option))]
    pub serif_font: Option<PathBuf>,
}

impl NotebookConfig {
    pub const DEFAULT_NUM_PAGES: usize = 1;
    pub const DEFAULT_SPACING_MM: f32 = 5.0;
    pub const DEFAULT_DOT_RADIUS_PT: f32 = 0.5;
    pub const DEFAULT_TOC_LINE_SPACING_MM: f32 = 8.0;

    pub fn builder() -> NotebookConfigBuilder {
        NotebookConfigBuilder::default()
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.page_size.dimensions(), &self.margins)
    }

    fn validate(&self) -> Result<()> {
        if self.num_pages == 0 {
            return Err(NotebookError::invalid("num_pages must be at least 1"));
        }
        if !(self.spacing.0.is_finite() && self.spacing.0 > 0.0) {
            return Err(NotebookError::invalid(format!(
                "spacing_mm must be positive, got {}",
                self.spacing.0
            )));
        }
        if !(self.dot_radius.is_finite() && *self.dot_radius > 0.0) {
            return Err(NotebookError::invalid(format!(
                "dot_radius must be positive, got {}",
                *self.dot_radius
            )));
        }
        if !(self.toc_line_spacing.0.is_finite() && self.toc_line_spacing.0 > 0.0) {
            return Err(NotebookError::invalid(format!(
                "toc_line_spacing_mm must be positive, got {}",
                self.toc_line_spacing.0
            )));
        }

        let geometry = self.geometry();
        geometry.validate()?;
        if self.include_toc {
            TocLayout::new(&geometry, self.toc_line_spacing)?;
        }
        Ok(())
    }
}

impl NotebookConfigBuilder {
    /// Override some or all margins; keys not present keep their current value.
    pub fn margins(&mut self, overrides: MarginOverrides) -> &mut Self {
        let current = self.margins.unwrap_or_default();
        self.margins = Some(current.merge(&overrides));
        self
    }

    /// Fill in defaults for anything unset and validate the result.
    pub fn build(&self) -> Result<NotebookConfig> {
        let config = NotebookConfig {
            num_pages: self.num_pages.unwrap_or(NotebookConfig::DEFAULT_NUM_PAGES),
            page_size: self.page_size.unwrap_or_default(),
            pattern: self.pattern.unwrap_or(PatternKind::Dots),
            spacing: self
                .spacing
                .unwrap_or(Mm(NotebookConfig::DEFAULT_SPACING_MM)),
            dot_radius: self
                .dot_radius
                .unwrap_or(Pt(NotebookConfig::DEFAULT_DOT_RADIUS_PT)),
            margins: self.margins.unwrap_or_default(),
            page_number_position: self
                .page_number_position
                .unwrap_or(Some(PageNumberPosition::LowerLeft)),
            include_title_page: self.include_title_page.unwrap_or(true),
            include_toc: self.include_toc.unwrap_or(true),
            toc_line_spacing: self
                .toc_line_spacing
                .unwrap_or(Mm(NotebookConfig::DEFAULT_TOC_LINE_SPACING_MM)),
            title_metadata: self.title_metadata.clone().unwrap_or_default(),
            serif_font: self.serif_font.clone().flatten(),
        };
        config.validate()?;
        Ok(config)
    }
}
