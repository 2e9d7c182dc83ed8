use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rhyme_finder::config::Settings;
use rhyme_finder::datamuse::{DatamuseClient, WordLookup};
use rhyme_finder::repl;
use rhyme_finder::session::Finder;
use rhyme_finder::words::LookupMode;

#[derive(Parser, Debug)]
#[command(name = "rhyme_finder", about = "Find rhymes and synonyms, save the ones you like")]
struct Cli {
    /// Word API base URL (overrides DATAMUSE_URL)
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default)
    Repl,
    /// Print words that rhyme with WORD, grouped by syllable count
    Rhymes { word: String },
    /// Print words with a meaning similar to WORD
    Synonyms { word: String },
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    if let Some(url) = cli.api_url {
        settings.datamuse_url = url;
    }
    let client = DatamuseClient::new(settings.datamuse_url.clone(), settings.request_timeout)?;
    let lookup: Arc<dyn WordLookup> = Arc::new(client);

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            repl::run(Finder::new(lookup)).await?;
        }
        Command::Rhymes { word } => {
            lookup_once(lookup, &word, LookupMode::Rhymes).await?;
        }
        Command::Synonyms { word } => {
            lookup_once(lookup, &word, LookupMode::Synonyms).await?;
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.port = port;
            }
            println!("🌐 Starting API server on http://{}\n", settings.listen_addr());
            rhyme_finder::api::serve(lookup, &settings.listen_addr()).await?;
        }
    }

    Ok(())
}

async fn lookup_once(lookup: Arc<dyn WordLookup>, word: &str, mode: LookupMode) -> Result<()> {
    let mut finder = Finder::new(lookup);
    let view = finder.show(word, mode).await?;
    print!("{}", repl::render_view(view));
    Ok(())
}
