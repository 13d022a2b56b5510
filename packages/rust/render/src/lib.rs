//! HTML → PDF rendering through an external engine process.
//!
//! The intermediate HTML is written to a fixed path first, then the engine
//! converts it into the PDF slot. Both files are overwritten on every run.
//! The engine's installation is not checked up front; a missing binary
//! surfaces as a [`SrsError::Rendering`] from the spawn.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use srsgen_shared::{RenderConfig, Result, SrsError};

/// Turns an HTML file into a document file.
pub trait DocumentRenderer: Send + Sync {
    /// Render `html` into `output`, replacing any existing file.
    fn render(&self, html: &Path, output: &Path) -> impl Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// wkhtmltopdf
// ---------------------------------------------------------------------------

/// Renders by running `wkhtmltopdf [extra args] --quiet <html> <pdf>`.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    engine_path: PathBuf,
    extra_args: Vec<String>,
}

impl WkhtmltopdfRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            engine_path: config.engine_path.clone(),
            extra_args: config.extra_args.clone(),
        }
    }
}

impl DocumentRenderer for WkhtmltopdfRenderer {
    #[instrument(skip_all, fields(engine = %self.engine_path.display(), output = %output.display()))]
    async fn render(&self, html: &Path, output: &Path) -> Result<()> {
        info!("rendering document");

        let result = Command::new(&self.engine_path)
            .args(&self.extra_args)
            .arg("--quiet")
            .arg(html)
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                SrsError::Rendering(format!(
                    "failed to run `{}`: {e}. Is wkhtmltopdf installed at that path?",
                    self.engine_path.display()
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!(status = ?result.status, "rendering engine failed");
            return Err(SrsError::Rendering(format!(
                "`{}` exited with {}: {}",
                self.engine_path.display(),
                result.status,
                stderr.trim()
            )));
        }

        debug!("rendering engine finished");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Intermediate markup
// ---------------------------------------------------------------------------

/// Write the intermediate HTML, replacing the previous run's file.
///
/// Written to a sibling temp file and renamed into place so a reader never
/// sees a half-written document.
pub fn write_markup(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SrsError::io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.html".into());
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, html).map_err(|e| SrsError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| SrsError::io(path, e))?;

    debug!(path = %path.display(), size = html.len(), "wrote markup");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "srsgen-render-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn renderer(engine: &str, extra_args: &[&str]) -> WkhtmltopdfRenderer {
        WkhtmltopdfRenderer::new(&RenderConfig {
            engine_path: PathBuf::from(engine),
            extra_args: extra_args.iter().map(|a| (*a).to_string()).collect(),
        })
    }

    #[test]
    fn write_markup_overwrites_in_place() {
        let dir = temp_dir();
        let path = dir.join("nested").join("output.html");

        write_markup(&path, "<p>first</p>").unwrap();
        write_markup(&path, "<p>second</p>").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>second</p>");
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn missing_engine_is_rendering_error() {
        let dir = temp_dir();
        let html = dir.join("output.html");
        write_markup(&html, "<p>x</p>").unwrap();

        let err = renderer("/nonexistent/srsgen/wkhtmltopdf", &[])
            .render(&html, &dir.join("output.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, SrsError::Rendering(_)));
        assert!(err.to_string().contains("/nonexistent/srsgen/wkhtmltopdf"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn engine_receives_input_and_output_paths() {
        let dir = temp_dir();
        let html = dir.join("output.html");
        let pdf = dir.join("output.pdf");
        write_markup(&html, "<h1>SRS</h1>").unwrap();

        // `sh -c 'cp "$2" "$3"' sh --quiet <html> <pdf>`
        let fake = renderer("sh", &["-c", r#"cp "$2" "$3""#, "sh"]);
        fake.render(&html, &pdf).await.unwrap();

        assert_eq!(std::fs::read_to_string(&pdf).unwrap(), "<h1>SRS</h1>");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_engine_reports_stderr() {
        let dir = temp_dir();
        let html = dir.join("output.html");
        write_markup(&html, "<p>x</p>").unwrap();

        let fake = renderer("sh", &["-c", "echo 'Exit with code 1' >&2; exit 1", "sh"]);
        let err = fake.render(&html, &dir.join("output.pdf")).await.unwrap_err();
        assert!(matches!(err, SrsError::Rendering(_)));
        assert!(err.to_string().contains("Exit with code 1"));
    }
}
