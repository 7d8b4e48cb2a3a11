pub mod analyzer;
pub mod insight;
pub mod pipeline;
pub mod sources;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
