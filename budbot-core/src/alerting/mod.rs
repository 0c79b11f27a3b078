pub mod matcher;
pub mod deduper;

pub use matcher::match_rules;
pub use deduper::AlertDeduper;
