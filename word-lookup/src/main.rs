use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{ClientConfig, ProviderConfig, ServerConfig};
use dictionary::{Dictionary, PhotoSearch};
use lookup::{Lookup, SearchOutcome};
use store_client::WordStoreClient;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
use utilities::{input, parse_prompt, str_to_bool, Prompt};

mod api;
mod config;
mod lookup;
mod server;
mod storage;
mod store_client;
mod utilities;

#[derive(Parser)]
#[command(name = "word-lookup", version, about = "Look up words and keep them in a local store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the word store service
    Serve,
    /// Look up a single word
    Search {
        #[arg(required = true)]
        word: Vec<String>,
    },
    /// Prompt for words until `:quit`
    Interactive,
    /// Delete a word from the store
    Remove {
        #[arg(required = true)]
        word: Vec<String>,
    },
}

const HELP: &str = "Type a word to look it up.
    :remove <word>  delete a word from the store
    :quit           leave";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => {
            server::start_server(&ServerConfig::load()?).await?;
        }
        Command::Search { word } => {
            let config = ClientConfig::load()?;
            let mut lookup = build_lookup(&config)?;
            search_once(&mut lookup, &word.join(" ")).await;
        }
        Command::Interactive => {
            let config = ClientConfig::load()?;
            let lookup = build_lookup(&config)?;
            let store = WordStoreClient::new(http_client(&config)?, &config.store_url)?;
            interactive(lookup, &store).await?;
        }
        Command::Remove { word } => {
            let config = ClientConfig::load()?;
            let store = WordStoreClient::new(http_client(&config)?, &config.store_url)?;
            remove_word(&store, &word.join(" ")).await?;
        }
    }
    Ok(())
}

fn http_client(config: &ClientConfig) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.http_timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

fn build_lookup(config: &ClientConfig) -> anyhow::Result<Lookup> {
    let providers =
        ProviderConfig::load().context("provider credentials are required for lookups")?;
    let client = http_client(config)?;

    let mut dictionary = Dictionary::new(client.clone(), providers.merriam_webster_key);
    if let Some(url) = &providers.merriam_webster_url {
        dictionary = dictionary.with_base_url(url)?;
    }
    let mut photos = PhotoSearch::new(client.clone(), providers.unsplash_access_key);
    if let Some(url) = &providers.unsplash_url {
        photos = photos.with_base_url(url)?;
    }
    let store = WordStoreClient::new(client, &config.store_url)?;

    Ok(Lookup::new(
        Arc::new(store),
        Arc::new(dictionary),
        Arc::new(photos),
    ))
}

async fn search_once(lookup: &mut Lookup, word: &str) {
    match lookup.search(word).await {
        SearchOutcome::Cached | SearchOutcome::Fetched => print!("{}", lookup.view()),
        SearchOutcome::Ignored | SearchOutcome::Unresolved => {}
    }
    // the process would otherwise exit before the word is stored
    lookup.finish().await;
}

async fn interactive(mut lookup: Lookup, store: &WordStoreClient) -> anyhow::Result<()> {
    let result = prompt_loop(&mut lookup, store).await;
    lookup.finish().await;
    result
}

async fn prompt_loop(lookup: &mut Lookup, store: &WordStoreClient) -> anyhow::Result<()> {
    loop {
        let line = input(">> ")?;
        if line.is_empty() {
            // end of input
            return Ok(());
        }
        match parse_prompt(&line) {
            Prompt::Quit => return Ok(()),
            Prompt::Remove(word) => {
                let answer = input(&format!("Remove '{word}' from the store? (y/N): "))?;
                if str_to_bool(answer).unwrap_or(false) {
                    if let Err(error) = remove_word(store, &word).await {
                        warn!(%word, %error, "failed to remove word");
                    }
                }
            }
            Prompt::Search(word) => {
                lookup.set_input(&word);
                match lookup.submit().await {
                    SearchOutcome::Cached | SearchOutcome::Fetched => print!("{}", lookup.view()),
                    SearchOutcome::Ignored | SearchOutcome::Unresolved => {}
                }
            }
            Prompt::Help => println!("{HELP}"),
            Prompt::Invalid(message) => println!("{message}"),
        }
    }
}

async fn remove_word(store: &WordStoreClient, word: &str) -> anyhow::Result<()> {
    store.remove(word).await?;
    println!("Deleted '{word}' from the store.");
    Ok(())
}
