pub mod enrich;
pub mod rules;
pub mod vocabulary;

pub use enrich::{EnrichmentReport, FillExample, enrich_votes};
pub use rules::{MAPPING_RULES, SUPPLEMENTAL_TOPICS};
pub use vocabulary::TopicVocabulary;
