// Topic model container — validated conversion from fitted models.

pub mod coerce;
pub mod container;
pub mod errors;
pub mod language;
pub mod ranking;
pub mod snapshot;
pub mod store;
pub mod traits;
pub mod vocabulary;

pub use container::TopicModelContainer;
pub use errors::{BuildError, ShapeMismatch};
pub use language::{LanguageHint, LanguageHintInput};
pub use ranking::WordMeta;
pub use vocabulary::Vocabulary;
