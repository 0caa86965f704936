//! CLI for Diya - festive Deepavali portraits.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use diya::{
    build_prompt, intake, GeminiModel, GeminiProvider, GenerationState, PortraitProvider,
    SelectionMode, Session, Slot, StatusView,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "diya")]
#[command(about = "Turn one or two photos into a festive Deepavali portrait (Gemini)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v debug, -vv trace). RUST_LOG wins if set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a portrait from your photo(s)
    Generate(GenerateArgs),

    /// Print the prompt that would be sent for a mode
    Prompt(PromptArgs),

    /// Check that the API key and model are usable
    Check(ProviderArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Portrait mode
    #[arg(short, long, value_enum, default_value = "single")]
    mode: ModeArg,

    /// Photo of the first person (PNG, JPEG or WEBP)
    #[arg(short, long)]
    photo: PathBuf,

    /// Photo of the second person (couple mode)
    #[arg(long)]
    partner: Option<PathBuf>,

    /// Where to write the portrait
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    provider: ProviderArgs,
}

#[derive(Args)]
struct PromptArgs {
    /// Portrait mode
    #[arg(short, long, value_enum, default_value = "single")]
    mode: ModeArg,
}

#[derive(Args)]
struct ProviderArgs {
    /// Gemini image model
    #[arg(long, value_enum, default_value = "flash")]
    model: ModelArg,

    /// API key (defaults to API_KEY, GEMINI_API_KEY or GOOGLE_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Single,
    Couple,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    /// gemini-2.5-flash-image
    Flash,
    /// nano-banana-pro-preview
    Pro,
}

impl From<ModeArg> for SelectionMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Single => SelectionMode::Single,
            ModeArg::Couple => SelectionMode::Couple,
        }
    }
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Flash => GeminiModel::NanoBanana,
            ModelArg::Pro => GeminiModel::NanoBananaPro,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => {
            generate_portrait(args, cli.json).await?;
        }
        Commands::Prompt(args) => {
            print_prompt(args, cli.json)?;
        }
        Commands::Check(args) => {
            check_provider(args, cli.json).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn build_provider(args: &ProviderArgs) -> anyhow::Result<GeminiProvider> {
    let mut builder = GeminiProvider::builder().model(args.model.into());
    if let Some(ref key) = args.api_key {
        builder = builder.api_key(key);
    }
    Ok(builder.build()?)
}

async fn generate_portrait(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let provider = build_provider(&args.provider)?;

    let mut session = Session::new();
    session.set_mode(args.mode.into());

    session.load_image(Slot::PersonOne, intake::read_file(&args.photo));
    if let Some(ref partner) = args.partner {
        if session.mode() == SelectionMode::Single {
            tracing::warn!("--partner is ignored in single mode");
        }
        session.load_image(Slot::PersonTwo, intake::read_file(partner));
    }

    session
        .generate_with(&provider, |session| {
            if !json_output {
                eprintln!("{}\n", session.view());
            }
        })
        .await;

    report(&session, &args, json_output)
}

fn report(session: &Session, args: &GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let view = session.view();

    let saved_bytes = match &view {
        StatusView::Success(image) => Some(image.save(&args.output)?),
        _ => None,
    };

    if json_output {
        let result = match (&view, session.state()) {
            (StatusView::Success(image), _) => serde_json::json!({
                "success": true,
                "mode": session.mode(),
                "output": args.output.display().to_string(),
                "size_bytes": saved_bytes,
                "media_type": image.media_type,
                "model": image.metadata.model,
                "duration_ms": image.metadata.duration_ms,
            }),
            (_, GenerationState::Failed(failure)) => serde_json::json!({
                "success": false,
                "mode": session.mode(),
                "error": failure.message(),
            }),
            _ => serde_json::json!({
                "success": false,
                "mode": session.mode(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{view}");
        if let Some(bytes) = saved_bytes {
            println!("Saved: {} ({} bytes)", args.output.display(), bytes);
        }
    }

    match session.error() {
        Some(message) => anyhow::bail!("{message}"),
        None => Ok(()),
    }
}

fn print_prompt(args: PromptArgs, json_output: bool) -> anyhow::Result<()> {
    let mode = SelectionMode::from(args.mode);
    let prompt = build_prompt(mode);

    if json_output {
        let result = serde_json::json!({
            "mode": mode,
            "required_images": mode.required_images(),
            "prompt": prompt,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{prompt}");
    }
    Ok(())
}

async fn check_provider(args: ProviderArgs, json_output: bool) -> anyhow::Result<()> {
    let provider = build_provider(&args)?;
    let result = provider.health_check().await;

    if json_output {
        let out = serde_json::json!({
            "provider": provider.name(),
            "model": provider.model().as_str(),
            "ok": result.is_ok(),
            "error": result.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if result.is_ok() {
        println!("✓ {} ({}) is reachable", provider.name(), provider.model().as_str());
    }

    result?;
    Ok(())
}
