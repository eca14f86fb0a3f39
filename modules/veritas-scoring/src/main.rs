use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use veritas_common::{AnalysisRequest, Config, Verdict};
use veritas_scoring::{Analyzer, AnalyzerDeps};

#[derive(Parser)]
#[command(name = "veritas", about = "Content reliability scoring")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a text or a URL
    Analyze {
        #[arg(long, conflicts_with = "url")]
        text: Option<String>,

        #[arg(long)]
        url: Option<String>,

        /// Treat the URL as an image or video
        #[arg(long, requires = "url")]
        media: Option<Media>,
    },
    /// Run the URL gatekeeper and trusted-source lookup without fetching
    CheckUrl { url: String },
    /// List trusted outlets to verify a claim against
    CrossCheck { claim: String },
    /// Print the JSON schema of a verdict
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum Media {
    Image,
    Video,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::from_default_env().add_directive("veritas=info".parse()?);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Command::Analyze { text, url, media } => {
            let request = match (text, url, media) {
                (Some(text), None, _) => AnalysisRequest::text(text),
                (None, Some(url), None) => AnalysisRequest::url(url),
                (None, Some(url), Some(Media::Image)) => AnalysisRequest::Image { url },
                (None, Some(url), Some(Media::Video)) => AnalysisRequest::Video { url },
                _ => bail!("provide exactly one of --text or --url"),
            };
            info!(
                content_type = %request.content_type(),
                subject = request.subject(),
                "Analyzing"
            );
            let verdict = analyzer()?.analyze(&request).await;
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Command::CheckUrl { url } => {
            let analyzer = analyzer()?;
            let rejection = analyzer.check_url(&url).err().map(|r| r.to_string());
            let trust = analyzer.verify_source(&url).await;
            let report = serde_json::json!({
                "url": url,
                "isValid": rejection.is_none(),
                "reason": rejection,
                "isTrusted": trust.is_trusted,
                "reliabilityScore": trust.reliability_score,
                "source": trust.source,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::CrossCheck { claim } => {
            let matches = analyzer()?.cross_check(&claim).await;
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
        Command::Schema => {
            let schema = schemars::schema_for!(Verdict);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn analyzer() -> Result<Analyzer> {
    let config = Config::from_env()?;
    Ok(Analyzer::new(AnalyzerDeps::from_config(&config)?))
}
