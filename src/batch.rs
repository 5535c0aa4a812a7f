//! Generating many notebooks in one go.
//!
//! A batch is a list of (device, pattern) jobs sharing one set of notebook
//! settings. Every job writes its own file, so a failing job is recorded and the
//! rest carry on. Jobs can run on the rayon thread pool; they share nothing but
//! the read-only device table and the already resolved fonts.

use crate::error::{NotebookError, Result};
use crate::notebook::{NotebookConfigBuilder, PageSize};
use crate::pdf::{self, FontSet};
use crate::registry::{self, PatternKind};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One notebook to generate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchJob {
    /// Device key, alias or display name
    pub device: String,
    pub pattern: PatternKind,
}

impl BatchJob {
    pub fn new<S: Into<String>>(device: S, pattern: PatternKind) -> BatchJob {
        BatchJob {
            device: device.into(),
            pattern,
        }
    }
}

/// Settings shared by every job in a batch.
#[derive(Clone, Debug)]
pub struct BatchSettings {
    /// Notebook settings; page size and pattern are set per job
    pub template: NotebookConfigBuilder,
    pub num_pages: usize,
    pub output_dir: PathBuf,
    pub parallel: bool,
    pub skip_existing: bool,
}

impl BatchSettings {
    pub const DEFAULT_NUM_PAGES: usize = 256;
}

impl Default for BatchSettings {
    fn default() -> Self {
        BatchSettings {
            template: NotebookConfigBuilder::default(),
            num_pages: BatchSettings::DEFAULT_NUM_PAGES,
            output_dir: PathBuf::from("."),
            parallel: false,
            skip_existing: false,
        }
    }
}

#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: NotebookError,
}

#[derive(Debug, Default)]
pub struct BatchResult {
    pub generated: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.generated.len() + self.skipped.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Outcome {
    Generated(PathBuf),
    Skipped(PathBuf),
    Failed(BatchFailure),
}

/// `"<Device Display Name> - <Pattern>.pdf"`; unknown devices keep their raw name.
pub fn output_filename(device: &str, pattern: PatternKind) -> String {
    let device = registry::resolve(device)
        .map(|spec| spec.display_name.to_string())
        .unwrap_or_else(|_| device.to_string());
    format!("{device} - {}.pdf", pattern.title())
}

/// Every device with every pattern, device by device.
pub fn cartesian_jobs(devices: &[String], patterns: &[PatternKind]) -> Vec<BatchJob> {
    devices
        .iter()
        .flat_map(|device| {
            patterns
                .iter()
                .map(move |pattern| BatchJob::new(device.clone(), *pattern))
        })
        .collect()
}

/// Generate every combination of `devices` and `patterns`.
pub fn generate_all(
    devices: &[String],
    patterns: &[PatternKind],
    settings: &BatchSettings,
    fonts: &FontSet,
    progress: &ProgressBar,
) -> Result<BatchResult> {
    generate_jobs(&cartesian_jobs(devices, patterns), settings, fonts, progress)
}

/// Generate an explicit list of jobs.
///
/// Only failing to create the output directory aborts the batch; everything
/// else is recorded per job.
pub fn generate_jobs(
    jobs: &[BatchJob],
    settings: &BatchSettings,
    fonts: &FontSet,
    progress: &ProgressBar,
) -> Result<BatchResult> {
    std::fs::create_dir_all(&settings.output_dir)
        .map_err(|e| NotebookError::generation(&settings.output_dir, e))?;

    progress.set_length(jobs.len() as u64);
    let run = |job: &BatchJob| {
        let outcome = run_job(job, settings, fonts);
        progress.inc(1);
        outcome
    };
    let outcomes: Vec<Outcome> = if settings.parallel {
        jobs.par_iter().map(run).collect()
    } else {
        jobs.iter().map(run).collect()
    };

    let mut result = BatchResult::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Generated(path) => result.generated.push(path),
            Outcome::Skipped(path) => result.skipped.push(path),
            Outcome::Failed(failure) => result.failures.push(failure),
        }
    }
    progress.finish_with_message(format!(
        "{} generated, {} skipped, {} failed",
        result.generated.len(),
        result.skipped.len(),
        result.failures.len()
    ));
    Ok(result)
}

fn run_job(job: &BatchJob, settings: &BatchSettings, fonts: &FontSet) -> Outcome {
    let file_name = output_filename(&job.device, job.pattern);
    let path = settings.output_dir.join(&file_name);

    if settings.skip_existing && path.exists() {
        log::info!("skipping {}, it already exists", path.display());
        return Outcome::Skipped(path);
    }

    match build_and_generate(job, settings, fonts, &path) {
        Ok(()) => Outcome::Generated(path),
        Err(error) => {
            log::warn!("failed to generate {file_name}: {error}");
            Outcome::Failed(BatchFailure {
                path,
                error,
            })
        }
    }
}

fn build_and_generate(
    job: &BatchJob,
    settings: &BatchSettings,
    fonts: &FontSet,
    path: &Path,
) -> Result<()> {
    let device = registry::resolve(&job.device)?;
    let config = settings
        .template
        .clone()
        .page_size(PageSize::Device(device))
        .pattern(job.pattern)
        .num_pages(settings.num_pages)
        .build()?;
    pdf::generate(&config, fonts, path)?;
    Ok(())
}
