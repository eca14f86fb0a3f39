pub mod types;
pub mod config;
pub mod error;
pub mod quality;

pub use types::*;
pub use config::Config;
pub use error::VeritasError;
pub use quality::*;
