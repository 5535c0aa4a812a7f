use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a notebook.toml config file
    Config,
    /// Renders one notebook according to notebook.toml and any overrides
    Render(RenderArgs),
    /// Renders a notebook for every device and pattern combination
    Batch(BatchArgs),
    /// Lists the supported devices and page sizes
    Devices,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Configuration file to read; defaults are used if it doesn't exist
    #[clap(short, long, default_value = "notebook.toml")]
    pub config: PathBuf,
    /// Device name or alias, overriding the configured page size
    #[clap(short, long)]
    pub device: Option<String>,
    /// Page pattern: dots, lines, grid or blank
    #[clap(short, long)]
    pub pattern: Option<String>,
    /// Number of content pages
    #[clap(short = 'n', long)]
    pub pages: Option<usize>,
    /// Output pdf file
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Configuration file to read; defaults are used if it doesn't exist
    #[clap(short, long, default_value = "notebook.toml")]
    pub config: PathBuf,
    /// Device to generate for, may be repeated
    #[clap(short, long = "device")]
    pub devices: Vec<String>,
    /// Pattern to generate, may be repeated
    #[clap(short, long = "pattern")]
    pub patterns: Vec<String>,
    /// Number of content pages per notebook
    #[clap(short = 'n', long)]
    pub pages: Option<usize>,
    /// Directory the notebooks are written to
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Generate notebooks in parallel
    #[clap(long)]
    pub parallel: bool,
    /// Leave notebooks that already exist alone
    #[clap(long)]
    pub skip_existing: bool,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
