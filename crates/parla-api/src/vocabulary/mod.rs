mod enrich;
mod routes;

pub use enrich::{EnrichedWord, enrich};
pub use routes::{AddVocabularyRequest, AddVocabularyResponse, routes};
