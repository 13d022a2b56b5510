//! End-to-end `generate` pipeline: input → prompt → generation → markup → document.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use srsgen_generation::{GenerationClient, build_prompt, prompt_digest};
use srsgen_render::{DocumentRenderer, write_markup};
use srsgen_shared::{
    InputSource, InputSources, OutputPaths, PipelineConfig, Result, RunId, SrsError,
};

/// Result of one successful `generate_srs` run.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    /// Run identifier.
    pub run_id: RunId,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Input channel the text came from.
    pub source: InputSource,
    /// SHA-256 of the prompt sent to the service.
    pub prompt_sha256: String,
    /// Raw text returned by the generative service.
    pub generated_text: String,
    /// Complete HTML written to `output.html`.
    pub markup: String,
    /// Where the HTML and PDF were written.
    pub output: OutputPaths,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl GenerateOutcome {
    /// Bytes of the rendered document, for download.
    pub fn read_document(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.output.pdf).map_err(|e| SrsError::io(&self.output.pdf, e))
    }
}

/// Progress callback for reporting pipeline status (busy indicator).
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, outcome: &GenerateOutcome);
    /// Called when the pipeline halts.
    fn failed(&self, error: &SrsError);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _outcome: &GenerateOutcome) {}
    fn failed(&self, _error: &SrsError) {}
}

/// Run the full `generate` pipeline.
///
/// 1. Select and validate the input channel
/// 2. Assemble the prompt
/// 3. Call the generative service (single attempt)
/// 4. Convert the completion to styled HTML and write it
/// 5. Render the PDF
///
/// Any failure halts the run; later stages are not invoked.
#[instrument(skip_all)]
pub async fn generate_srs<R: DocumentRenderer>(
    config: &PipelineConfig,
    sources: &InputSources,
    client: &GenerationClient,
    renderer: &R,
    progress: &dyn ProgressReporter,
) -> Result<GenerateOutcome> {
    let result = run(config, sources, client, renderer, progress).await;
    match &result {
        Ok(outcome) => progress.done(outcome),
        Err(e) => {
            warn!(error = %e, "generation run halted");
            progress.failed(e);
        }
    }
    result
}

async fn run<R: DocumentRenderer>(
    config: &PipelineConfig,
    sources: &InputSources,
    client: &GenerationClient,
    renderer: &R,
    progress: &dyn ProgressReporter,
) -> Result<GenerateOutcome> {
    let start = Instant::now();
    let run_id = RunId::new();
    let started_at = Utc::now();

    // --- Phase 1: Input ---
    progress.phase("Reading input");
    let (source, input) = srsgen_extract::select_input(sources)?;

    // --- Phase 2: Prompt ---
    let prompt = build_prompt(&input);
    let prompt_sha256 = prompt_digest(&prompt);
    info!(%run_id, %source, prompt_sha256 = %prompt_sha256, "starting generation run");

    // --- Phase 3: Generation ---
    progress.phase("Generating SRS");
    let generated_text = client.generate(&prompt).await?;

    // --- Phase 4: Markup ---
    progress.phase("Formatting document");
    let markup = srsgen_markup::format_document(&generated_text).to_html(config.escape_html);
    write_markup(&config.output.html, &markup)?;

    // --- Phase 5: Render ---
    progress.phase("Rendering PDF");
    renderer
        .render(&config.output.html, &config.output.pdf)
        .await?;

    let elapsed = start.elapsed();
    info!(
        %run_id,
        pdf = %config.output.pdf.display(),
        elapsed_ms = elapsed.as_millis() as u64,
        "SRS generated"
    );

    Ok(GenerateOutcome {
        run_id,
        started_at,
        source,
        prompt_sha256,
        generated_text,
        markup,
        output: config.output.clone(),
        elapsed,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
