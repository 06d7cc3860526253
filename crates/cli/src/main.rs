use anyhow::{bail, Context, Result};
use clap::Parser;
use outfit_lens_core::{
    config::Config,
    init,
    model::{Language, ModelId, AVAILABLE_MODELS},
    ui::{render_analysis, AnalysisOrchestrator, AppState},
};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Photo of the outfit to analyze
    #[arg(required_unless_present = "list_models")]
    image: Option<PathBuf>,

    /// Language of the feedback (zh, en, id)
    #[arg(short, long)]
    lang: Option<Language>,

    /// Override the model defined in .env
    #[arg(short, long)]
    model: Option<ModelId>,

    /// Override the analysis endpoint defined in .env
    #[arg(long)]
    endpoint: Option<String>,

    /// Print the raw analysis as JSON instead of a report
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// List available models and exit
    #[arg(long)]
    list_models: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;

    if let Some(endpoint) = &args.endpoint {
        config.endpoint = Config::builder()
            .with_endpoint(endpoint)
            .build()
            .context("Invalid --endpoint")?
            .endpoint;
    }
    if let Some(lang) = args.lang {
        config.language = lang;
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup
    init();
    let args = Args::parse();
    init_logging(args.verbose);

    // Handle --list-models
    if args.list_models {
        println!("Available models:");
        for model in AVAILABLE_MODELS {
            println!("{}", model);
        }
        return Ok(());
    }

    let config = load_config(&args)?;
    let path = args.image.as_ref().context("An image path is required")?;
    let image = std::fs::read(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;

    let mut orchestrator = AnalysisOrchestrator::from_config(&config);
    orchestrator.select_image(image);

    let messages = config.language.loading_messages();
    let mut updates = orchestrator
        .status_updates()
        .context("Status ticker did not start")?;
    if let Some(text) = orchestrator.status_text() {
        eprintln!("{}", text);
    }

    while orchestrator.state() == AppState::Analyzing {
        tokio::select! {
            _ = orchestrator.next_event() => {}
            Ok(()) = updates.changed() => {
                let index = *updates.borrow_and_update();
                if let Some(text) = messages.get(index) {
                    eprintln!("{}", text);
                }
            }
        }
    }

    match orchestrator.state() {
        AppState::Success => {
            let analysis = orchestrator
                .result()
                .context("Analysis finished without a result")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(analysis)?);
            } else {
                println!("{}", render_analysis(analysis, config.language));
            }
            Ok(())
        }
        _ => bail!(
            "{}",
            orchestrator
                .error_message()
                .unwrap_or(config.language.generic_error())
        ),
    }
}
