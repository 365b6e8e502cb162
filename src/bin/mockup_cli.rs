//! Mockup CLI - upload boundary for the composition engine
//!
//! Commands: layout, fit, render, upload
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when a mockup job fails

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use mockup_core::{
    fit_to_group, logging, JobContext, MockupConfig, MockupPipeline, MockupReport, MockupResult,
    PageMode, SlotGroupId,
};

#[derive(Parser)]
#[command(name = "mockup-cli")]
#[command(about = "Logo Mockup CLI - composite a logo onto the mockup template")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the slot layout
    Layout,

    /// Compute the fitted size of a logo for one slot group
    Fit {
        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        #[arg(short, long, value_enum, default_value = "large")]
        group: GroupArg,
    },

    /// Render mockups from an already staged work directory
    Render {
        #[arg(short, long)]
        work_dir: Option<PathBuf>,

        /// How to walk PDF pages. `best-effort` renders until the first page
        /// that fails to rasterize, then stops silently (a corrupt PDF yields
        /// no mockups instead of an error)
        #[arg(long, value_enum)]
        page_mode: Option<PageModeArg>,
    },

    /// Reset the work directory, stage a logo file and render mockups
    Upload {
        /// Logo file (.pdf, .png, .jpg, .jpeg)
        file: PathBuf,

        #[arg(short, long)]
        work_dir: Option<PathBuf>,

        /// Background asset copied into the work directory
        #[arg(short, long)]
        background: Option<PathBuf>,

        /// How to walk PDF pages. `best-effort` renders until the first page
        /// that fails to rasterize, then stops silently (a corrupt PDF yields
        /// no mockups instead of an error)
        #[arg(long, value_enum)]
        page_mode: Option<PageModeArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupArg {
    Large,
    Small,
}

impl From<GroupArg> for SlotGroupId {
    fn from(g: GroupArg) -> Self {
        match g {
            GroupArg::Large => SlotGroupId::Large,
            GroupArg::Small => SlotGroupId::Small,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PageModeArg {
    /// Ask the rasterizer for the page count; any page failure is an error
    Counted,
    /// Render until the first rasterization failure and stop silently
    BestEffort,
}

impl From<PageModeArg> for PageMode {
    fn from(m: PageModeArg) -> Self {
        match m {
            PageModeArg::Counted => PageMode::Counted,
            PageModeArg::BestEffort => PageMode::BestEffort,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match MockupConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            println!("{}", serde_json::json!({ "success": false, "error": e.to_string() }));
            return ExitCode::FAILURE;
        }
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init_logging(&config.logging);

    match cli.command {
        Commands::Layout => {
            let pipeline = MockupPipeline::from_config(&config);
            print_json(&serde_json::json!(pipeline.layout()));
            ExitCode::SUCCESS
        }

        Commands::Fit { width, height, group } => {
            if width == 0 || height == 0 {
                println!(r#"{{"error": "width and height must be non-zero"}}"#);
                return ExitCode::FAILURE;
            }
            let pipeline = MockupPipeline::from_config(&config);
            let group = pipeline.layout().group(group.into());
            let fitted = fit_to_group(width, height, group);
            print_json(&serde_json::json!({
                "group": group.id,
                "fitted": fitted,
                "pixels": fitted.to_pixels(),
            }));
            ExitCode::SUCCESS
        }

        Commands::Render { work_dir, page_mode } => {
            apply_overrides(&mut config, work_dir, None, page_mode);
            let pipeline = MockupPipeline::from_config(&config);
            let result = JobContext::open(&config.work_dir).and_then(|job| pipeline.run(&job));
            report_outcome(result)
        }

        Commands::Upload { file, work_dir, background, page_mode } => {
            apply_overrides(&mut config, work_dir, background, page_mode);
            let pipeline = MockupPipeline::from_config(&config);
            let result = pipeline.process_upload(&config.work_dir, &config.background, &file);
            report_outcome(result)
        }
    }
}

fn apply_overrides(
    config: &mut MockupConfig,
    work_dir: Option<PathBuf>,
    background: Option<PathBuf>,
    page_mode: Option<PageModeArg>,
) {
    if let Some(dir) = work_dir {
        config.work_dir = dir;
    }
    if let Some(bg) = background {
        config.background = bg;
    }
    if let Some(mode) = page_mode {
        config.page_mode = mode.into();
    }
}

/// Callers only learn success or failure; the cause goes to the log.
fn report_outcome(result: MockupResult<MockupReport>) -> ExitCode {
    match result {
        Ok(report) => {
            print_json(&serde_json::json!({
                "success": true,
                "report": report,
            }));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(kind = ?e.kind(), error = %e, "Mockup job failed");
            println!(
                "{}",
                serde_json::json!({ "success": false, "error": "Failed to generate mockup" })
            );
            ExitCode::from(2)
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}
