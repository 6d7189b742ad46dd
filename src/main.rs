use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use photosage::capabilities::CapabilityBundle;
use photosage::config::AppConfig;
use photosage::models::AnswerResult;
use photosage::perception::ImageService;
use photosage::rag::QaService;
use tracing::info;

#[derive(Parser)]
#[command(name = "photosage")]
#[command(about = "Photo description/tagging assistant with FAQ answering")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (defaults to config.toml)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a photo, generate its description and tags
    Analyze {
        /// Path to the image file (jpg or png)
        path: String,
    },
    /// Ask a question against the FAQ corpus
    Ask {
        /// The question text
        question: String,
    },
}

fn content_type_for(path: &str) -> &'static str {
    if path.to_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    photosage::logging::init_logging_with_config(Some(&config))?;

    let bundle = CapabilityBundle::from_config(&config).context("failed to wire capabilities")?;
    if bundle.is_demo() {
        info!("Running with demo capabilities; no live endpoints are called");
    }

    match cli.command {
        Commands::Analyze { path } => {
            let bytes = std::fs::read(&path).with_context(|| format!("failed to read {path}"))?;

            let service = ImageService::new(&config, bundle);
            let (reference, result, stored) = service
                .upload_and_analyze(&bytes, content_type_for(&path))
                .await?;

            println!("Image: {}/{}", reference.bucket, reference.key);
            println!("\nDescription:\n{}", result.description);
            println!(
                "\nTags: {}",
                result
                    .tags
                    .iter()
                    .map(|tag| format!("#{tag}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            );
            if !stored {
                println!("\n(warning: the result could not be persisted)");
            }
        }
        Commands::Ask { question } => {
            let service = QaService::new(&config, &bundle).await;

            match service.ask(&question).await {
                AnswerResult::Matched {
                    question: matched,
                    answer,
                    score,
                } => {
                    println!("Found a similar question (score {score:.2}): \"{matched}\"");
                    println!("\n{answer}");
                }
                AnswerResult::Generated {
                    answer_text,
                    relevant_questions,
                } => {
                    println!("{answer_text}");
                    if !relevant_questions.is_empty() {
                        println!("\nRelated FAQ questions:");
                        for q in relevant_questions {
                            println!("- {q}");
                        }
                    }
                }
                AnswerResult::Failed { reason } => {
                    anyhow::bail!("could not answer the question: {reason}");
                }
            }
        }
    }

    Ok(())
}
