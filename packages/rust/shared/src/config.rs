//! Application configuration for srsgen.
//!
//! User config lives at `~/.srsgen/srsgen.toml`.
//! CLI flags override config file values, which override defaults.
//! Runtime structs are built once at startup and passed by reference into
//! the generation client and the renderer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SrsError};
use crate::types::OutputPaths;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "srsgen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".srsgen";

// ---------------------------------------------------------------------------
// Config structs (matching srsgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative service settings.
    #[serde(default)]
    pub generation: GenerationSection,

    /// Document rendering engine settings.
    #[serde(default)]
    pub render: RenderSection,

    /// Output file locations.
    #[serde(default)]
    pub output: OutputSection,

    /// Markup formatting options.
    #[serde(default)]
    pub markup: MarkupSection,
}

/// `[generation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSection {
    /// Base URL of the models collection.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name, appended as `{base_url}/{model}:generateContent`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Whole-request timeout in seconds. The call is attempted exactly once.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".into()
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_timeout_secs() -> u64 {
    120
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSection {
    /// Path (or bare name on `PATH`) of the wkhtmltopdf executable.
    #[serde(default = "default_engine_path")]
    pub engine_path: String,

    /// Extra arguments passed to the engine before the input/output paths.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            extra_args: Vec::new(),
        }
    }
}

fn default_engine_path() -> String {
    "wkhtmltopdf".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Directory the HTML and PDF slots are written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// File name of the intermediate HTML.
    #[serde(default = "default_html_file")]
    pub html_file: String,

    /// File name of the rendered PDF.
    #[serde(default = "default_pdf_file")]
    pub pdf_file: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            html_file: default_html_file(),
            pdf_file: default_pdf_file(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_html_file() -> String {
    "output.html".into()
}
fn default_pdf_file() -> String {
    "output.pdf".into()
}

/// `[markup]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupSection {
    /// HTML-escape generated text before embedding it in markup.
    #[serde(default = "default_true")]
    pub escape_html: bool,
}

impl Default for MarkupSection {
    fn default() -> Self {
        Self { escape_html: true }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Runtime config (resolved once at startup)
// ---------------------------------------------------------------------------

/// Runtime settings for the generation client.
#[derive(Clone)]
pub struct GenerationConfig {
    /// Fully-resolved `generateContent` endpoint.
    pub endpoint: Url,
    /// API key sent in the `x-goog-api-key` header. May be empty.
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GenerationConfig {
    /// Resolve the endpoint and read the API key from the configured env var.
    ///
    /// A missing key is not an error here; the request goes out with an
    /// empty key and the service rejects it.
    pub fn from_app(config: &AppConfig) -> Result<Self> {
        let section = &config.generation;
        let api_key = std::env::var(&section.api_key_env).unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!(var = %section.api_key_env, "API key env var is not set");
        }

        Ok(Self {
            endpoint: endpoint_url(&section.base_url, &section.model)?,
            api_key,
            timeout: Duration::from_secs(section.timeout_secs),
        })
    }
}

/// Build `{base_url}/{model}:generateContent`.
pub fn endpoint_url(base_url: &str, model: &str) -> Result<Url> {
    let raw = format!("{}/{model}:generateContent", base_url.trim_end_matches('/'));
    Url::parse(&raw).map_err(|e| SrsError::config(format!("invalid endpoint '{raw}': {e}")))
}

/// Runtime settings for the document renderer.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Engine executable.
    pub engine_path: PathBuf,
    /// Extra engine arguments.
    pub extra_args: Vec<String>,
}

impl From<&AppConfig> for RenderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            engine_path: PathBuf::from(&config.render.engine_path),
            extra_args: config.render.extra_args.clone(),
        }
    }
}

/// Runtime settings for the pipeline itself.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Where the HTML and PDF slots live.
    pub output: OutputPaths,
    /// Escape generated text before embedding it in HTML.
    pub escape_html: bool,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        let dir = PathBuf::from(&config.output.dir);
        Self {
            output: OutputPaths {
                html: dir.join(&config.output.html_file),
                pdf: dir.join(&config.output.pdf_file),
            },
            escape_html: config.markup.escape_html,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.srsgen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| SrsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.srsgen/srsgen.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SrsError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SrsError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SrsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| SrsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SrsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the API key env var is set and non-empty.
///
/// Used by `srsgen config check`; generation itself does not call this.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    let var_name = &config.generation.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(SrsError::config(format!(
            "API key not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("engine_path"));
        assert!(toml_str.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.generation.timeout_secs, 120);
        assert_eq!(parsed.generation.api_key_env, "GEMINI_API_KEY");
        assert!(parsed.markup.escape_html);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[render]
engine_path = "/opt/wkhtmltopdf/bin/wkhtmltopdf"

[output]
dir = "/tmp/srs"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.render.engine_path, "/opt/wkhtmltopdf/bin/wkhtmltopdf");
        assert_eq!(config.output.html_file, "output.html");
        assert_eq!(config.generation.model, "gemini-2.0-flash");

        let pipeline = PipelineConfig::from(&config);
        assert_eq!(pipeline.output.pdf, PathBuf::from("/tmp/srs/output.pdf"));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let url = endpoint_url("http://localhost:9000/v1beta/models/", "gemini-2.0-flash")
            .expect("endpoint");
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn generation_config_debug_redacts_key() {
        let config = GenerationConfig {
            endpoint: Url::parse("https://example.com/m:generateContent").unwrap(),
            api_key: "super-secret-key".into(),
            timeout: Duration::from_secs(5),
        };
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("super-secret-key"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.generation.api_key_env = "SRSGEN_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }

    #[test]
    fn missing_key_does_not_block_runtime_config() {
        let mut config = AppConfig::default();
        config.generation.api_key_env = "SRSGEN_TEST_NONEXISTENT_KEY_67890".into();
        let runtime = GenerationConfig::from_app(&config).expect("runtime config");
        assert!(runtime.api_key.is_empty());
        assert_eq!(runtime.timeout, Duration::from_secs(120));
    }
}
