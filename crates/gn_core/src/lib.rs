pub mod config;
pub mod error;
pub mod similarity;
pub mod traits;
pub mod types;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use similarity::cosine_similarity;
pub use traits::{
    ContentExtractor, EmbeddingProvider, Extraction, MediaInfo, MediaRegistry, TranslationProvider,
};
pub use types::{
    Article, ArticleCandidate, CountryBucket, CountryCode, CountryReport, ScoredCandidate,
    SearchParams,
};
