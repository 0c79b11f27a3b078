pub mod fetcher;
pub mod extractor;

pub use fetcher::HttpListingSource;
pub use extractor::{HtmlListingExtractor, ListingMarkers};
