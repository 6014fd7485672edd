//! Back-end client implementations.

pub mod focusflow;

// Re-export for convenience
pub use focusflow::FocusFlowClient;
