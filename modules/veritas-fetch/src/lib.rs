pub mod error;
pub mod page;
mod readability;

pub use error::{FetchError, Result};
pub use page::{parse_page, HttpPageFetcher};
pub use readability::{extract_description, extract_title, strip_boilerplate};
