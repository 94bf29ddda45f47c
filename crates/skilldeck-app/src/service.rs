use crate::config::{BackendKind, Config};
use crate::deck::{Deck, Outcome};
use anyhow::Result;
use skilldeck_catalog::{Catalog, CatalogSource};
use skilldeck_persistence::{
    AuthContext, BookmarkCache, BookmarkStore, IdentityProvider, RestBackend, SqliteBackend,
};
use skilldeck_provider::{CompletionService, CompletionSettings};
use std::io::Write;
use std::sync::Arc;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info, warn};

/// Application service - wires the components and runs the prompt loop
pub struct AppService {
    config: Config,
}

impl AppService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        skilldeck_logging::init_logging(&self.config.logging.level)?;
        info!("Starting SkillDeck");

        // Catalog failures leave an empty, browsable catalog
        let source = CatalogSource::detect(&self.config.catalog.source);
        let (catalog, load_error) = Catalog::load_or_empty(&source).await;
        if let Some(e) = load_error {
            error!("Error loading skills: {}", e);
            eprintln!(
                "{} {}",
                style("Catalog unavailable:").red().bold(),
                style(e).red()
            );
        }

        let completion = Arc::new(CompletionService::new(self.completion_settings()));
        if !completion.has_credential() {
            warn!("No completion API key configured; test drives run in degraded mode");
        }

        let (identity, store) = self.backend().await?;
        let mut deck = Deck::new(
            catalog,
            self.config.catalog.page_size,
            completion,
            AuthContext::new(identity),
            BookmarkCache::new(store),
        );
        deck.start().await;

        let shutdown = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
            }
            info!("Received shutdown signal");
        };

        tokio::select! {
            result = prompt_loop(&mut deck) => {
                if let Err(e) = result {
                    error!("Prompt loop error: {}", e);
                }
            }
            _ = shutdown => {
                println!();
            }
        }

        deck.shutdown();
        println!("👋 Goodbye!");
        info!("SkillDeck stopped");
        Ok(())
    }

    fn completion_settings(&self) -> CompletionSettings {
        let completion = &self.config.completion;
        let settings = CompletionSettings::new(&completion.model, &completion.base_url);
        if completion.api_key.is_empty() {
            settings
        } else {
            settings.with_api_key(&completion.api_key)
        }
    }

    async fn backend(&self) -> Result<(Arc<dyn IdentityProvider>, Arc<dyn BookmarkStore>)> {
        let backend = &self.config.backend;
        match backend.kind {
            BackendKind::Local => {
                let sqlite = Arc::new(SqliteBackend::new(&backend.database).await?);
                let identity: Arc<dyn IdentityProvider> = sqlite.clone();
                let store: Arc<dyn BookmarkStore> = sqlite;
                Ok((identity, store))
            }
            BackendKind::Remote => {
                let rest = Arc::new(RestBackend::new(&backend.url, &backend.anon_key));
                let identity: Arc<dyn IdentityProvider> = rest.clone();
                let store: Arc<dyn BookmarkStore> = rest;
                Ok((identity, store))
            }
        }
    }
}

async fn prompt_loop(deck: &mut Deck) -> Result<()> {
    if let Some(splash) = deck.splash() {
        println!("{}", splash);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let prompt = style(deck.prompt());
        if deck.is_driving() {
            print!("{}", prompt.green());
        } else {
            print!("{}", prompt.cyan());
        }
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match deck.handle_line(&line).await {
            Outcome::Print(text) if text.is_empty() => {}
            Outcome::Print(text) => println!("{}\n", text),
            Outcome::Quit => break,
        }
    }
    Ok(())
}
