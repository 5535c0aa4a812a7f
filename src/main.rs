use anyhow::{Context, Result};
use cli::Cli;
use config::{Configuration, PageSizeSetting};
use indicatif::{ProgressBar, ProgressStyle};
use pdf::FontSet;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

mod batch;
mod cli;
mod config;
mod config_wizard;
mod error;
mod notebook;
mod pdf;
mod registry;
mod units;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match try_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", console::style("Error").red());
            ExitCode::FAILURE
        }
    }
}

/// Read the configuration file, falling back to the defaults when there isn't one.
fn load_configuration(path: &Path) -> Result<Configuration> {
    if path.exists() {
        println!("Loading configuration...");
        Configuration::load(path)
    } else {
        log::info!("{} not found, using defaults", path.display());
        Ok(Configuration::default())
    }
}

fn human_size(bytes: u64) -> String {
    byte_unit::Byte::from_u64(bytes)
        .get_appropriate_unit(byte_unit::UnitType::Binary)
        .to_string()
}

fn try_main() -> Result<ExitCode> {
    use clap::Parser;
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Config => {
            config_wizard::run()?;
            Ok(ExitCode::SUCCESS)
        }
        cli::Commands::Devices => {
            for device in registry::list_devices() {
                let aliases = if device.aliases.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", device.aliases.join(", "))
                };
                println!(
                    "{:<16}{:<28}{:>6} x {:<6} mm{}",
                    device.key,
                    device.display_name,
                    device.width.0,
                    device.height.0,
                    console::style(aliases).dim()
                );
            }
            println!();
            println!(
                "Patterns: {}",
                registry::list_patterns()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<String>>()
                    .join(", ")
            );
            Ok(ExitCode::SUCCESS)
        }
        cli::Commands::Render(args) => {
            let Configuration { mut notebook, .. } = load_configuration(&args.config)?;
            if let Some(device) = &args.device {
                notebook.page_size = PageSizeSetting::Named(device.clone());
            }
            if let Some(pattern) = &args.pattern {
                notebook.page_pattern = pattern.clone();
            }
            if let Some(pages) = args.pages {
                notebook.num_pages = pages;
            }
            let outfile = args.output.clone().unwrap_or_else(|| notebook.outfile.clone());
            let config = notebook
                .to_config()
                .with_context(|| "Invalid notebook configuration")?;

            let fonts = FontSet::load(config.serif_font.as_deref());

            let progress = ProgressBar::new_spinner();
            progress.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .expect("can parse progress style"),
            );
            progress.set_message("Rendering PDF...");
            progress.enable_steady_tick(Duration::from_millis(100));

            let stats = pdf::generate(&config, &fonts, &outfile)
                .with_context(|| "Failed to render PDF")?;
            progress.finish_and_clear();

            println!();
            println!("  Notebook:      {}", outfile.display());
            println!("  Device:        {}", config.page_size.display_name());
            println!("  Pattern:       {}", config.pattern);
            println!(
                "  Pages:         {} ({} content, {} contents)",
                stats.page_count, config.num_pages, stats.toc_page_count
            );
            println!(
                "  Page numbers:  {}",
                config
                    .page_number_position
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
            println!("  Links:         {}", stats.link_count);
            println!("  Size:          {}", human_size(stats.bytes));
            if stats.serif_fallback {
                println!(
                    "  Headings:      {}",
                    console::style("Helvetica (no serif font could be loaded)").yellow()
                );
            } else {
                println!("  Headings:      {}", fonts.serif.name());
            }
            Ok(ExitCode::SUCCESS)
        }
        cli::Commands::Batch(args) => {
            let Configuration {
                notebook,
                batch: mut section,
            } = load_configuration(&args.config)?;
            if !args.devices.is_empty() {
                section.devices = args.devices.clone();
            }
            if !args.patterns.is_empty() {
                section.patterns = args.patterns.clone();
            }
            if let Some(pages) = args.pages {
                section.num_pages = pages;
            }
            if let Some(output_dir) = &args.output_dir {
                section.output_dir = output_dir.clone();
            }
            section.parallel |= args.parallel;
            section.skip_existing |= args.skip_existing;

            let patterns = section
                .patterns()
                .with_context(|| "Invalid batch patterns")?;
            let settings = section
                .settings(&notebook)
                .with_context(|| "Invalid notebook configuration")?;
            let fonts = FontSet::load(notebook.serif_font.as_deref());

            let progress = ProgressBar::new(0);
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .expect("can parse progress style")
                    .progress_chars("#>-"),
            );
            progress.set_message("Rendering notebooks...");

            let result =
                batch::generate_all(&section.devices, &patterns, &settings, &fonts, &progress)
                    .with_context(|| "Failed to run batch")?;

            println!();
            println!(
                "  Generated:     {}/{}",
                result.generated.len(),
                result.total()
            );
            if !result.skipped.is_empty() {
                println!("  Skipped:       {}", result.skipped.len());
            }
            println!("  Output:        {}", settings.output_dir.display());
            if result.is_success() {
                return Ok(ExitCode::SUCCESS);
            }

            println!("  Failed:        {}", result.failures.len());
            println!();
            println!("Failed files:");
            for failure in result.failures {
                let error = anyhow::Error::new(failure.error);
                println!(
                    "  - {}: {}",
                    failure.path.display(),
                    console::style(format!("{error:#}")).red()
                );
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
