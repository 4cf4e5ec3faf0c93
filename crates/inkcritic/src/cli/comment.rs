//! The `inkcritic comment` command for generating one comment.

use clap::Args;
use inkcritic_core::{CommentGenerator, CommentRequest, Config, Style};

/// Arguments for the `comment` command.
#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Image of the calligraphy work: local path or http(s)/oss/data URL
    #[arg(required = true)]
    pub image: String,

    /// Student name used in the comment (defaults to comment.default_subject)
    #[arg(short, long)]
    pub student: Option<String>,

    /// Comment style: professional, warm or childlike (unknown names use professional)
    #[arg(long)]
    pub style: Option<String>,

    /// Model identifier overriding llm.model
    #[arg(long)]
    pub model: Option<String>,

    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the comment command.
pub async fn execute(args: CommentArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(model) = args.model {
        config.llm.model = model;
    }
    let generator = CommentGenerator::from_config(&config)?;

    let style = resolve_style(args.style.as_deref(), config.comment.default_style);
    let subject = args
        .student
        .unwrap_or_else(|| config.comment.default_subject.clone());
    let request = CommentRequest::new(args.image)
        .subject(subject)
        .style(style);

    let outcome = generator.generate(&request).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if let Some(comment) = outcome.comment() {
        println!("{comment}");
    }

    match outcome.error() {
        Some(error) => anyhow::bail!("{error}"),
        None => Ok(()),
    }
}

/// Pick the style from the flag, falling back to the configured default.
fn resolve_style(flag: Option<&str>, default: Style) -> Style {
    let Some(name) = flag else {
        return default;
    };
    let style = Style::from_name(name);
    if style.as_str() != name.trim().to_ascii_lowercase() {
        tracing::warn!("Unknown style '{name}', using {style}");
    }
    style
}
