pub mod extract;
pub mod fetcher;
pub mod media;
pub mod orchestrator;

pub use extract::HttpContentExtractor;
pub use fetcher::ParallelContentFetcher;
pub use media::StaticMediaRegistry;
pub use orchestrator::PerCountryOrchestrator;
