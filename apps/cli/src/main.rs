use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{BlogClient, ViewState};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

mod browse;
mod config;
mod render;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "travelblog", about = "Browse travel stories and their authors")]
struct Cli {
    /// Base URL of the blog API, overriding config and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Settings file; defaults to ./travelblog.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Home page: featured story, latest stories and popular authors.
    Posts {
        #[arg(long, short, default_value = "")]
        search: String,
        #[arg(long)]
        json: bool,
    },
    /// Author directory.
    Authors {
        #[arg(long, short, default_value = "")]
        search: String,
        #[arg(long)]
        json: bool,
    },
    /// A single post with its author and related posts.
    Post {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Interactive session reading commands from stdin.
    Browse,
}

fn print_page<T>(state: &ViewState<T>, text: String, json: Option<String>) -> Result<()> {
    if let Some(json) = json {
        println!("{json}");
    } else if state.ready().is_some() {
        print!("{text}");
    }
    if let Some(err) = state.error() {
        bail!("{}", err.message);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    let client = BlogClient::over_http(&settings.api_url()?, settings.request_timeout())?;
    tracing::info!(api = %settings.api_base_url, "using blog api");

    match cli.command {
        Command::Posts { search, json } => {
            let state = client.post_list().load_view().await;
            let text = render::render_home(&state, &search, settings.popular_authors);
            let json = json
                .then(|| render::home_json(&state, &search, settings.popular_authors))
                .transpose()?;
            print_page(&state, text, json)?;
        }
        Command::Authors { search, json } => {
            let state = client.author_list().load_view().await;
            let text = render::render_authors(&state, &search);
            let json = json
                .then(|| render::authors_json(&state, &search))
                .transpose()?;
            print_page(&state, text, json)?;
        }
        Command::Post { id, json } => {
            let state = client.post_detail().load_param_view(&id).await;
            let text = render::render_post(&state);
            let json = json.then(|| render::post_json(&state)).transpose()?;
            print_page(&state, text, json)?;
        }
        Command::Browse => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            browse::run(client, settings.popular_authors, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}
