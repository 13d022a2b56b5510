//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use srsgen_core::pipeline::{GenerateOutcome, ProgressReporter};
use srsgen_generation::GenerationClient;
use srsgen_render::WkhtmltopdfRenderer;
use srsgen_shared::{
    AppConfig, GenerationConfig, InputSources, PipelineConfig, RenderConfig, SrsError, Upload,
    config_file_path, init_config, load_config, validate_api_key,
};

/// File name used when `--save-as` points at a directory.
const DOWNLOAD_FILE_NAME: &str = "SRS_Document.pdf";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// srsgen: generate Software Requirements Specifications.
#[derive(Parser)]
#[command(
    name = "srsgen",
    version,
    about = "Turn a project description, document, or requirement sheet into an SRS PDF.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate an SRS document.
    Generate {
        /// Project description. Takes priority over uploaded files.
        #[arg(short, long)]
        text: Option<String>,

        /// PDF or plain-text document with the requirements.
        #[arg(short, long)]
        document: Option<PathBuf>,

        /// Excel sheet with columns S.No, User Code, Description, Function, Function Code.
        #[arg(short, long)]
        spreadsheet: Option<PathBuf>,

        /// Output directory for output.html / output.pdf (overrides config).
        #[arg(short, long)]
        out: Option<String>,

        /// wkhtmltopdf executable (overrides config).
        #[arg(long, env = "SRSGEN_WKHTMLTOPDF")]
        engine: Option<String>,

        /// Copy the rendered PDF here (a directory gets SRS_Document.pdf).
        #[arg(long)]
        save_as: Option<PathBuf>,

        /// Print the generated SRS text after rendering.
        #[arg(long)]
        show: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
    /// Check that the API key is set and the rendering engine can be found.
    Check,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "srsgen=info",
        1 => "srsgen=debug",
        _ => "srsgen=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            text,
            document,
            spreadsheet,
            out,
            engine,
            save_as,
            show,
        } => {
            let args = GenerateArgs {
                text,
                document,
                spreadsheet,
                out,
                engine,
                save_as,
                show,
            };
            cmd_generate(args).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Check => cmd_config_check(),
        },
    }
}

struct GenerateArgs {
    text: Option<String>,
    document: Option<PathBuf>,
    spreadsheet: Option<PathBuf>,
    out: Option<String>,
    engine: Option<String>,
    save_as: Option<PathBuf>,
    show: bool,
}

async fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let mut config = load_config()?;
    if let Some(out) = args.out {
        config.output.dir = out;
    }
    if let Some(engine) = args.engine {
        config.render.engine_path = engine;
    }

    // Everything process-wide is resolved once here and passed down.
    let generation = GenerationConfig::from_app(&config)?;
    let pipeline = PipelineConfig::from(&config);
    let client = GenerationClient::new(&generation)?;
    let renderer = WkhtmltopdfRenderer::new(&RenderConfig::from(&config));

    let sources = InputSources {
        text: args.text,
        document: args.document.as_deref().map(read_upload).transpose()?,
        spreadsheet: args.spreadsheet.as_deref().map(read_upload).transpose()?,
    };

    info!(
        html = %pipeline.output.html.display(),
        pdf = %pipeline.output.pdf.display(),
        "generating SRS"
    );

    let reporter = CliProgress::new();
    let outcome =
        srsgen_core::pipeline::generate_srs(&pipeline, &sources, &client, &renderer, &reporter)
            .await?;

    println!();
    println!("  SRS generated successfully!");
    println!("  Run:    {}", outcome.run_id);
    println!("  Input:  {}", outcome.source);
    println!("  HTML:   {}", outcome.output.html.display());
    println!("  PDF:    {}", outcome.output.pdf.display());
    println!("  Time:   {:.1}s", outcome.elapsed.as_secs_f64());

    if let Some(target) = args.save_as {
        let saved = save_document(&outcome, &target)?;
        println!("  Saved:  {}", saved.display());
    }
    println!();

    if args.show {
        println!("{}", outcome.generated_text);
    }

    Ok(())
}

/// Read a file from disk as an upload, keeping its name for type detection.
fn read_upload(path: &Path) -> Result<Upload> {
    let bytes = std::fs::read(path).map_err(|e| SrsError::io(path, e))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| eyre!("'{}' is not a file path", path.display()))?;
    Ok(Upload { filename, bytes })
}

/// Write the rendered document bytes to the download target.
fn save_document(outcome: &GenerateOutcome, target: &Path) -> Result<PathBuf> {
    let target = if target.is_dir() {
        target.join(DOWNLOAD_FILE_NAME)
    } else {
        target.to_path_buf()
    };
    let bytes = outcome.read_document()?;
    std::fs::write(&target, bytes).map_err(|e| SrsError::io(&target, e))?;
    Ok(target)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _outcome: &GenerateOutcome) {
        self.spinner.finish_and_clear();
    }

    fn failed(&self, _error: &SrsError) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("# {}", config_file_path()?.display());
    println!("{toml_str}");
    Ok(())
}

fn cmd_config_check() -> Result<()> {
    let config = load_config()?;
    let mut problems = 0;

    match validate_api_key(&config) {
        Ok(()) => println!("  ok    API key ({})", config.generation.api_key_env),
        Err(e) => {
            problems += 1;
            println!("  fail  {e}");
        }
    }

    match resolve_engine(Path::new(&config.render.engine_path)) {
        Some(found) => println!("  ok    rendering engine ({})", found.display()),
        None => {
            problems += 1;
            println!(
                "  fail  rendering engine '{}' not found",
                config.render.engine_path
            );
        }
    }

    if problems > 0 {
        return Err(eyre!("{problems} configuration problem(s) found"));
    }
    Ok(())
}

/// Locate the engine: an explicit path must exist, a bare name is searched on `PATH`.
fn resolve_engine(engine: &Path) -> Option<PathBuf> {
    if engine.components().count() > 1 || engine.is_absolute() {
        return engine.is_file().then(|| engine.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        [engine.to_path_buf(), engine.with_extension("exe")]
            .into_iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
