/*!
 * accessgen - command-line accessibility metadata generator
 *
 * Reads an image from disk or takes a URL, runs the generation pipeline
 * against the configured provider, and prints the structured result as
 * JSON on stdout.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Parser;
use log::{debug, info};

use accessgen::app_config::Config;
use accessgen::generator::AccessibilityGenerator;
use accessgen::providers::openai::OpenAi;
use accessgen::sections::{GenerationMode, GenerationRequest};

#[derive(Parser, Debug)]
#[command(
    name = "accessgen",
    about = "Generate accessibility metadata (alt text, descriptions, transcription) for an image",
    version
)]
struct Args {
    /// Image file path, or an http(s)/data URL passed through as-is
    image: String,

    /// Free-text context for the image ("used in Chapter 3 on water quality")
    #[arg(long)]
    context: Option<String>,

    /// File with an additional reference document to include in the prompt
    #[arg(long)]
    reference_file: Option<PathBuf>,

    /// Which sections to generate: full, alt-text, or long-description
    #[arg(long, default_value = "full")]
    mode: GenerationMode,

    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// API key; falls back to the config file
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model override
    #[arg(long)]
    model: Option<String>,

    /// Request structured JSON output from the model
    #[arg(long)]
    structured: bool,

    /// Only verify that the provider is reachable, then exit
    #[arg(long)]
    test_connection: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(api_key) = &args.api_key {
        config.provider.api_key = api_key.clone();
    }
    if let Some(model) = &args.model {
        config.provider.model = model.clone();
    }
    if args.structured {
        config.generation.structured_output = true;
    }
    config.validate()?;

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .format_timestamp(None)
        .init();

    let provider = Arc::new(OpenAi::new(
        &config.provider.api_key,
        &config.provider.endpoint,
        &config.provider.model,
        config.provider.timeout_secs,
    ));

    if args.test_connection {
        accessgen::providers::Provider::test_connection(provider.as_ref())
            .await
            .context("Provider connection test failed")?;
        info!("Provider connection OK");
        return Ok(());
    }

    let image = load_image(&args.image)?;
    let mut request = GenerationRequest::new(image).with_mode(args.mode);
    if let Some(context) = args.context {
        request = request.with_context(context);
    }
    if let Some(path) = &args.reference_file {
        let document = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference file: {}", path.display()))?;
        request = request.with_reference_document(document);
    }

    let generator = AccessibilityGenerator::new(provider, config.generation.clone());
    let result = generator.generate(&request).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Pass URLs through unchanged; encode local files as data URLs
fn load_image(source: &str) -> Result<String> {
    if source.starts_with("http://")
        || source.starts_with("https://")
        || source.starts_with("data:")
    {
        return Ok(source.to_string());
    }

    let path = Path::new(source);
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image file: {}", path.display()))?;
    let mime = mime_for_extension(path)?;
    debug!("encoding {} bytes of {} as a data URL", bytes.len(), mime);
    Ok(format!("data:{};base64,{}", mime, BASE64.encode(&bytes)))
}

fn mime_for_extension(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        other => Err(anyhow!(
            "Unsupported image extension {:?} (supported: png, jpg, jpeg, gif, webp)",
            other
        )),
    }
}
