pub mod providers;
pub mod relevance;

pub use providers::{OpenAiCompatEmbeddings, OpenAiCompatTranslator};
pub use relevance::RelevanceFilter;
