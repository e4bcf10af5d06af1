pub mod athletes;
pub mod enumerator;
pub mod extractor;
pub mod pipeline;

pub use athletes::{AthleteSearch, SearchResults};
pub use enumerator::{EventEnumerator, EventList};
pub use extractor::{Extraction, ResultExtractor};
pub use pipeline::{RunOutput, ScrapePipeline};
