pub mod crawler;
pub mod error;
pub mod result;

pub use crawler::{Crawler, ProgressCallback, extract_links};
pub use error::ScanError;
pub use result::{CrawlOutput, PageScan};
