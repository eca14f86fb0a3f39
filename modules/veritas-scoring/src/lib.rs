pub mod analyzer;
pub mod classifier;
pub mod cross_check;
pub mod gatekeeper;
pub mod heuristics;
pub mod jitter;
mod lexicon;
pub mod sources;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod util;
pub mod verdict;

pub use analyzer::{Analyzer, AnalyzerDeps};
pub use gatekeeper::{Gatekeeper, Rejection};
pub use sources::{InMemorySourceStore, SourceFilter, TrustResolution, TrustedSourceResolver};
