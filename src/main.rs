use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sayit::config::Config;
use sayit::options::{Length, RewriteOptions, Tone};
use sayit::{client, server};

#[derive(Parser, Debug)]
#[command(
    name = "sayit",
    version,
    about = "Say it better: rewrite what you want to say with an LLM.",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the rewrite proxy and form UI
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: String,
    },
    /// Rewrite a scenario through a running sayit server
    Rewrite {
        /// What you want to say
        text: String,

        #[arg(long, value_enum, default_value = "professional")]
        tone: Tone,

        #[arg(long, value_enum, default_value = "medium")]
        length: Length,

        #[arg(long, default_value = "General")]
        audience: String,

        /// Goal for the rewrite; repeat the flag for several.
        /// Defaults to "Be clear" and "Be polite".
        #[arg(long = "goal", value_name = "GOAL")]
        goals: Vec<String>,

        /// Base URL of the server to talk to
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { bind } => server::serve(&bind, Config::from_env()).await,
        Command::Rewrite {
            text,
            tone,
            length,
            audience,
            goals,
            server,
        } => {
            let defaults = RewriteOptions::default();
            let options = RewriteOptions {
                tone,
                length,
                audience,
                goals: if goals.is_empty() { defaults.goals } else { goals },
            };
            let improved = client::run_rewrite(&server, &text, &options).await?;
            println!("{improved}");
            Ok(())
        }
    }
}
