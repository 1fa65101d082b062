mod loader;
mod models;
mod snapshot;

pub use loader::load_snapshot;
pub use models::{format_followers, InfluencerRecord};
pub use snapshot::{canonical_key, DatasetSnapshot};
