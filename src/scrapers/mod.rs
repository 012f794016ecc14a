pub mod fetch;
pub mod somon;

pub use somon::SomonScraper;
