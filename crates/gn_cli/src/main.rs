use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use tracing::info;

use gn_core::config::AppConfig;
use gn_core::{EmbeddingProvider, Result, SearchParams, TranslationProvider};
use gn_enrich::{
    HttpContentExtractor, ParallelContentFetcher, PerCountryOrchestrator, StaticMediaRegistry,
};
use gn_inference::{OpenAiCompatEmbeddings, OpenAiCompatTranslator, RelevanceFilter};
use gn_search::{DocumentSearch, RestWarehouseClient, SearchCoordinator, WarehouseSearch};

#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-strategy international news retrieval", long_about = None)]
struct Cli {
    /// JSON config file; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<String>,

    /// Override the relevance threshold.
    #[arg(long)]
    threshold: Option<f32>,

    /// Override the per-country article cap.
    #[arg(long)]
    cap: Option<usize>,

    /// Skip title translation even when a chat model is configured.
    #[arg(long)]
    no_translate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct ParamArgs {
    /// Search keywords, comma separated.
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,

    /// Named entities (people, organizations), comma separated.
    #[arg(long, value_delimiter = ',')]
    entities: Vec<String>,

    /// Location names, comma separated.
    #[arg(long, value_delimiter = ',')]
    locations: Vec<String>,

    /// Theme codes like ECON_TRADE, comma separated.
    #[arg(long, value_delimiter = ',')]
    themes: Vec<String>,

    /// ISO country codes to bucket results by (e.g. US,KR,CN). Omit for a
    /// single flat result list.
    #[arg(long, value_delimiter = ',')]
    countries: Vec<String>,

    /// Event date (YYYY-MM-DD) centering the warehouse date window.
    #[arg(long)]
    event_date: Option<NaiveDate>,
}

impl ParamArgs {
    fn into_params(self) -> SearchParams {
        SearchParams {
            keywords: self.keywords,
            entities: self.entities,
            locations: self.locations,
            themes: self.themes,
            event_date: self.event_date,
            target_countries: self.countries,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Retrieve and enrich coverage of a topic.
    Search {
        /// Topic or claim candidates are scored against.
        #[arg(long)]
        topic: String,

        #[command(flatten)]
        params: ParamArgs,
    },
    /// Show the canonical keyword list a parameter set merges into.
    Plan {
        #[command(flatten)]
        params: ParamArgs,
    },
}

fn build_pipeline(config: &AppConfig, no_translate: bool) -> PerCountryOrchestrator {
    let document = Arc::new(DocumentSearch::new(config.document.clone()));
    let warehouse_client = Arc::new(RestWarehouseClient::new(config.warehouse.endpoint.clone()));
    let warehouse = Arc::new(WarehouseSearch::new(warehouse_client, config.warehouse.clone()));
    let coordinator = Arc::new(SearchCoordinator::new(document, warehouse));
    info!("🔎 search strategies initialized (document + warehouse fallback)");

    let embeddings: Arc<dyn EmbeddingProvider> =
        Arc::new(OpenAiCompatEmbeddings::new(&config.providers));
    let relevance = Arc::new(RelevanceFilter::new(
        embeddings.clone(),
        config.relevance.threshold,
    ));
    info!("🧠 relevance threshold: {}", config.relevance.threshold);

    let translator: Option<Arc<dyn TranslationProvider>> =
        if no_translate || config.providers.translate_to.trim().is_empty() {
            None
        } else {
            Some(Arc::new(OpenAiCompatTranslator::new(&config.providers)))
        };

    let extractor = Arc::new(HttpContentExtractor::new(config.enrich.fetch_timeout_secs));
    let media = Arc::new(StaticMediaRegistry::new());
    let fetcher = Arc::new(ParallelContentFetcher::new(
        extractor,
        translator,
        media,
        &config.enrich,
    ));

    PerCountryOrchestrator::new(
        coordinator,
        relevance,
        fetcher,
        embeddings,
        config.enrich.per_country_cap,
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.relevance.threshold = threshold;
    }
    if let Some(cap) = cli.cap {
        config.enrich.per_country_cap = cap;
    }

    match cli.command {
        Commands::Plan { params } => {
            let params = params.into_params();
            let keywords = gn_search::planner::merge(&params);
            println!("{}", serde_json::to_string_pretty(&keywords)?);
        }
        Commands::Search { topic, params } => {
            let params = params.into_params();
            let orchestrator = build_pipeline(&config, cli.no_translate);

            if params.target_countries.is_empty() {
                info!("🔍 topic search: {}", topic);
                let articles = orchestrator.search_topic(&params, &topic).await;
                info!("✨ {} articles retrieved", articles.len());
                println!("{}", serde_json::to_string_pretty(&articles)?);
            } else {
                info!(
                    "🌍 per-country search: {} across {:?}",
                    topic, params.target_countries
                );
                let report = orchestrator.run(&params, &topic).await;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }

    Ok(())
}
