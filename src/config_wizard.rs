//! Interactive configuration wizard for creating `notebook.toml`.
//!
//! The wizard walks through the device, page pattern and spacing, page numbering,
//! the title page and its pre-filled metadata, and the table of contents. The
//! answers are checked by building the notebook configuration before anything is
//! written.

use crate::config::{Configuration, NotebookSettings, PageSizeSetting, DEFAULT_CONFIG_FILE};
use crate::notebook::{MarginOverrides, PageNumberPosition, TitleMetadata};
use crate::registry::{self, PatternKind};
use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input};
use std::path::PathBuf;

const CUSTOM_SIZE: &str = "Custom size";
const NO_PAGE_NUMBERS: &str = "none";

fn positive(input: &f32) -> Result<(), &'static str> {
    if input.is_finite() && *input > 0.0 {
        Ok(())
    } else {
        Err("Must be a positive number")
    }
}

fn optional_text(theme: &ColorfulTheme, prompt: &str) -> Result<Option<String>> {
    let text: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact()
        .with_context(|| format!("Failed to obtain {}", prompt.to_lowercase()))?;
    let text = text.trim();
    Ok(if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    })
}

/// Run the interactive configuration wizard.
///
/// Prompts for the notebook settings, then writes `notebook.toml` to the current
/// directory.
pub fn run() -> Result<()> {
    let theme = ColorfulTheme {
        ..ColorfulTheme::default()
    };

    let outfile: String = Input::with_theme(&theme)
        .with_prompt("Output pdf file")
        .default("notebook.pdf".to_string())
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain output file")?;
    let mut outfile = PathBuf::from(outfile);
    let ext = outfile
        .extension()
        .map(std::ffi::OsStr::to_ascii_lowercase)
        .unwrap_or_default();
    if ext != *"pdf" {
        outfile.set_extension("pdf");
    }

    let mut device_options: Vec<String> = registry::list_devices()
        .iter()
        .map(|d| d.display_name.to_string())
        .collect();
    device_options.push(CUSTOM_SIZE.to_string());
    let device_idx = FuzzySelect::with_theme(&theme)
        .with_prompt("Device")
        .items(&device_options)
        .default(1)
        .interact()?;
    let page_size = match registry::list_devices().get(device_idx) {
        Some(device) => PageSizeSetting::Named(device.key.to_string()),
        None => {
            let width: f32 = Input::with_theme(&theme)
                .with_prompt("Page width in millimetres")
                .default(157.0)
                .validate_with(positive)
                .interact()?;
            let height: f32 = Input::with_theme(&theme)
                .with_prompt("Page height in millimetres")
                .default(210.0)
                .validate_with(positive)
                .interact()?;
            PageSizeSetting::Dimensions([width, height])
        }
    };

    let pattern_idx = FuzzySelect::with_theme(&theme)
        .with_prompt("Page pattern")
        .items(PatternKind::all())
        .default(0)
        .interact()?;
    let pattern = PatternKind::all()[pattern_idx];

    let num_pages: usize = Input::with_theme(&theme)
        .with_prompt("Number of pages")
        .default(256)
        .validate_with(|input: &usize| {
            if *input > 0 {
                Ok(())
            } else {
                Err("A notebook needs at least one page")
            }
        })
        .interact()?;

    let defaults = NotebookSettings::default();
    let spacing_mm = if pattern == PatternKind::Blank {
        defaults.spacing_mm
    } else {
        Input::with_theme(&theme)
            .with_prompt("Pattern spacing in millimetres")
            .default(defaults.spacing_mm)
            .validate_with(positive)
            .interact()?
    };
    let dot_radius = if pattern == PatternKind::Dots {
        Input::with_theme(&theme)
            .with_prompt("Dot radius in points")
            .default(defaults.dot_radius)
            .validate_with(positive)
            .interact()?
    } else {
        defaults.dot_radius
    };

    let mut position_options: Vec<String> = PageNumberPosition::all()
        .iter()
        .map(|p| p.to_string())
        .collect();
    position_options.push(NO_PAGE_NUMBERS.to_string());
    let position_idx = FuzzySelect::with_theme(&theme)
        .with_prompt("Page number position")
        .items(&position_options)
        .default(0)
        .interact()?;
    let page_number_position = position_options[position_idx].clone();

    let margins = if Confirm::with_theme(&theme)
        .with_prompt("Do you want to change the 5mm page margins?")
        .default(false)
        .interact()?
    {
        let mut margins = MarginOverrides::default();
        for (name, margin) in [
            ("Left", &mut margins.left),
            ("Right", &mut margins.right),
            ("Top", &mut margins.top),
            ("Bottom", &mut margins.bottom),
        ] {
            let value: f32 = Input::with_theme(&theme)
                .with_prompt(format!("{name} margin in millimetres"))
                .default(5.0)
                .validate_with(|input: &f32| {
                    if input.is_finite() && *input >= 0.0 {
                        Ok(())
                    } else {
                        Err("Margins can't be negative")
                    }
                })
                .interact()?;
            *margin = Some(value);
        }
        margins
    } else {
        MarginOverrides::default()
    };

    let include_title_page = Confirm::with_theme(&theme)
        .with_prompt("Include a title page?")
        .default(true)
        .interact()?;
    let title_page = if include_title_page {
        let tags = optional_text(&theme, "Tags (comma separated, leave blank for none)")?
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();
        TitleMetadata {
            title: optional_text(&theme, "Title (leave blank to fill in by hand)")?,
            author: optional_text(&theme, "Author")?,
            description: optional_text(&theme, "Description")?,
            date_from: optional_text(&theme, "Date from")?,
            date_to: optional_text(&theme, "Date to")?,
            tags,
        }
    } else {
        TitleMetadata::default()
    };

    let include_toc = Confirm::with_theme(&theme)
        .with_prompt("Include a linked table of contents?")
        .default(true)
        .interact()?;
    let toc_line_spacing_mm = if include_toc {
        Input::with_theme(&theme)
            .with_prompt("Table of contents line spacing in millimetres")
            .default(defaults.toc_line_spacing_mm)
            .validate_with(positive)
            .interact()?
    } else {
        defaults.toc_line_spacing_mm
    };

    let notebook = NotebookSettings {
        outfile,
        num_pages,
        page_size,
        page_pattern: pattern.name().to_string(),
        spacing_mm,
        dot_radius,
        page_number_position,
        include_title_page,
        include_toc,
        toc_line_spacing_mm,
        margins,
        title_page,
        ..defaults
    };
    notebook
        .to_config()
        .with_context(|| "These settings can't produce a notebook")?;

    let config = Configuration {
        notebook,
        ..Configuration::default()
    };
    let config =
        toml::to_string_pretty(&config).with_context(|| "Failed to convert configuration to TOML")?;

    let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!(
                "{DEFAULT_CONFIG_FILE} already exists, do you want to override it?"
            ))
            .interact()?
    {
        println!("Configuration:");
        println!("{}", config);
    } else {
        std::fs::write(&config_path, config)
            .with_context(|| "Failed to write configuration file")?;
        println!("{DEFAULT_CONFIG_FILE} written!");
    }

    Ok(())
}
