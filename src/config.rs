//! The `notebook.toml` configuration file.
//!
//! Every key is optional. Device names, patterns and page number positions are
//! kept as plain strings here and only checked when the settings are turned into
//! a [`NotebookConfig`], so a typo surfaces as the same
//! [`NotebookError::InvalidParameter`] or [`NotebookError::UnknownDevice`] the
//! library reports.

use crate::batch::BatchSettings;
use crate::error::{NotebookError, Result};
use crate::notebook::{
    MarginOverrides, NotebookConfig, NotebookConfigBuilder, PageNumberPosition, PageSize,
    TitleMetadata,
};
use crate::registry::{self, PatternKind};
use crate::units::{Mm, Pt};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "notebook.toml";

/// Complete configuration for ink-notebook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub notebook: NotebookSettings,
    #[serde(default)]
    pub batch: BatchSection,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Configuration> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))
    }
}

/// A device name or an explicit `[width_mm, height_mm]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageSizeSetting {
    Named(String),
    Dimensions([f32; 2]),
}

impl PageSizeSetting {
    pub fn resolve(&self) -> Result<PageSize> {
        match self {
            PageSizeSetting::Named(name) => registry::resolve(name).map(PageSize::Device),
            PageSizeSetting::Dimensions([width, height]) => Ok(PageSize::Custom {
                width: Mm(*width),
                height: Mm(*height),
            }),
        }
    }
}

impl Default for PageSizeSetting {
    fn default() -> Self {
        PageSizeSetting::Named("a4".to_string())
    }
}

/// The `[notebook]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookSettings {
    /// Output file for `render`
    pub outfile: PathBuf,
    pub num_pages: usize,
    pub page_size: PageSizeSetting,
    pub page_pattern: String,
    pub spacing_mm: f32,
    /// Dot radius in points
    pub dot_radius: f32,
    pub page_number_position: String,
    pub include_title_page: bool,
    pub include_toc: bool,
    pub toc_line_spacing_mm: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serif_font: Option<PathBuf>,
    #[serde(skip_serializing_if = "MarginOverrides::is_empty")]
    pub margins: MarginOverrides,
    pub title_page: TitleMetadata,
}

impl Default for NotebookSettings {
    fn default() -> Self {
        NotebookSettings {
            outfile: PathBuf::from("notebook.pdf"),
            num_pages: NotebookConfig::DEFAULT_NUM_PAGES,
            page_size: PageSizeSetting::default(),
            page_pattern: PatternKind::Dots.name().to_string(),
            spacing_mm: NotebookConfig::DEFAULT_SPACING_MM,
            dot_radius: NotebookConfig::DEFAULT_DOT_RADIUS_PT,
            page_number_position: PageNumberPosition::LowerLeft.name().to_string(),
            include_title_page: true,
            include_toc: true,
            toc_line_spacing_mm: NotebookConfig::DEFAULT_TOC_LINE_SPACING_MM,
            serif_font: None,
            margins: MarginOverrides::default(),
            title_page: TitleMetadata::default(),
        }
    }
}

impl NotebookSettings {
    /// Everything except the page size, which batch runs set per job.
    fn common_builder(&self) -> Result<NotebookConfigBuilder> {
        let mut builder = NotebookConfig::builder();
        builder
            .num_pages(self.num_pages)
            .pattern(self.page_pattern.parse::<PatternKind>()?)
            .spacing(Mm(self.spacing_mm))
            .dot_radius(Pt(self.dot_radius))
            .margins(self.margins)
            .page_number_position(PageNumberPosition::parse_optional(
                &self.page_number_position,
            )?)
            .include_title_page(self.include_title_page)
            .include_toc(self.include_toc)
            .toc_line_spacing(Mm(self.toc_line_spacing_mm))
            .title_metadata(self.title_page.clone());
        if let Some(serif_font) = &self.serif_font {
            builder.serif_font(serif_font.clone());
        }
        Ok(builder)
    }

    pub fn builder(&self) -> Result<NotebookConfigBuilder> {
        let mut builder = self.common_builder()?;
        builder.page_size(self.page_size.resolve()?);
        Ok(builder)
    }

    pub fn to_config(&self) -> Result<NotebookConfig> {
        self.builder()?.build()
    }
}

/// The `[batch]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    pub devices: Vec<String>,
    pub patterns: Vec<String>,
    pub num_pages: usize,
    pub output_dir: PathBuf,
    pub parallel: bool,
    pub skip_existing: bool,
}

impl Default for BatchSection {
    fn default() -> Self {
        BatchSection {
            devices: registry::default_batch_devices(),
            patterns: PatternKind::all()
                .iter()
                .map(|p| p.name().to_string())
                .collect(),
            num_pages: BatchSettings::DEFAULT_NUM_PAGES,
            output_dir: PathBuf::from("."),
            parallel: false,
            skip_existing: false,
        }
    }
}

impl BatchSection {
    pub fn patterns(&self) -> Result<Vec<PatternKind>> {
        self.patterns.iter().map(|p| p.parse()).collect()
    }

    /// Batch settings using `notebook` for everything but size and pattern.
    pub fn settings(&self, notebook: &NotebookSettings) -> Result<BatchSettings> {
        if self.num_pages == 0 {
            return Err(NotebookError::invalid("batch num_pages must be at least 1"));
        }
        Ok(BatchSettings {
            template: notebook.common_builder()?,
            num_pages: self.num_pages,
            output_dir: self.output_dir.clone(),
            parallel: self.parallel,
            skip_existing: self.skip_existing,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Configuration = toml::from_str("").expect("can parse empty config");
        assert_eq!(config, Configuration::default());

        let notebook = config.notebook.to_config().expect("defaults are valid");
        assert_eq!(notebook.page_size.display_name(), "A4");
        assert_eq!(notebook.pattern, PatternKind::Dots);
        assert_eq!(config.batch.devices.len(), 16);
        assert_eq!(config.batch.patterns().unwrap(), PatternKind::all());
        assert_eq!(config.batch.num_pages, 256);
    }

    #[test]
    fn can_parse_full_config() {
        let config: Configuration = toml::from_str(
            r#"
            [notebook]
            outfile = "journal.pdf"
            num_pages = 64
            page_size = "rm2"
            page_pattern = "Grid"
            spacing_mm = 6.0
            page_number_position = "upper-middle"
            include_toc = false

            [notebook.margins]
            left = 8.0

            [notebook.title_page]
            title = "Journal"
            tags = ["work", "2026"]

            [batch]
            devices = ["move", "booxnoteair"]
            patterns = ["lines"]
            output_dir = "out"
            parallel = true
            "#,
        )
        .expect("can parse config");

        let notebook = config.notebook.to_config().expect("valid notebook");
        assert_eq!(notebook.num_pages, 64);
        assert_eq!(notebook.page_size.display_name(), "reMarkable 2");
        assert_eq!(notebook.pattern, PatternKind::Grid);
        assert_eq!(notebook.spacing, Mm(6.0));
        assert_eq!(
            notebook.page_number_position,
            Some(PageNumberPosition::UpperMiddle)
        );
        assert!(!notebook.include_toc);
        assert!(notebook.include_title_page);
        assert_eq!(notebook.margins.left, Mm(8.0));
        assert_eq!(notebook.margins.right, Mm(5.0));
        assert_eq!(notebook.title_metadata.title.as_deref(), Some("Journal"));
        assert_eq!(notebook.title_metadata.tags.len(), 2);

        let settings = config.batch.settings(&config.notebook).unwrap();
        assert!(settings.parallel);
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(config.batch.patterns().unwrap(), vec![PatternKind::Lines]);
    }

    #[test]
    fn page_size_can_be_explicit_dimensions() {
        let config: Configuration = toml::from_str(
            r#"
            [notebook]
            page_size = [120.0, 180.0]
            "#,
        )
        .unwrap();
        let notebook = config.notebook.to_config().unwrap();
        assert_eq!(
            notebook.page_size,
            PageSize::Custom {
                width: Mm(120.0),
                height: Mm(180.0)
            }
        );
    }

    #[test]
    fn unbounded_page_dimensions_are_invalid() {
        for page_size in ["[inf, 200.0]", "[120.0, nan]", "[1e7, 1e7]"] {
            let config: Configuration = toml::from_str(&format!(
                "[notebook]\npage_size = {page_size}\ninclude_toc = false\n"
            ))
            .unwrap();
            assert!(
                matches!(
                    config.notebook.to_config(),
                    Err(NotebookError::InvalidParameter(_))
                ),
                "{page_size}"
            );
        }
    }

    #[test]
    fn page_numbers_can_be_turned_off() {
        let config: Configuration = toml::from_str(
            r#"
            [notebook]
            page_number_position = "none"
            "#,
        )
        .unwrap();
        assert_eq!(config.notebook.to_config().unwrap().page_number_position, None);
    }

    #[test]
    fn bad_names_are_reported_at_build_time() {
        let mut settings = NotebookSettings {
            page_pattern: "hexagons".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.to_config(),
            Err(NotebookError::InvalidParameter(_))
        ));

        settings.page_pattern = "dots".to_string();
        settings.page_size = PageSizeSetting::Named("kindle".to_string());
        assert!(matches!(
            settings.to_config(),
            Err(NotebookError::UnknownDevice(_))
        ));
    }

    #[test]
    fn can_serialize_configuration() {
        let config = Configuration::default();
        let text = toml::to_string_pretty(&config).expect("can serialize configuration to TOML");
        let parsed: Configuration = toml::from_str(&text).expect("can parse it back");
        assert_eq!(parsed, config);
    }

    #[test]
    fn can_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[notebook]\nnum_pages = 3\n").unwrap();
        let config = Configuration::load(&path).unwrap();
        assert_eq!(config.notebook.num_pages, 3);

        assert!(Configuration::load(dir.path().join("missing.toml")).is_err());
    }
}
