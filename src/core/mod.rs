// ============================================================================
// ember-signals - Core Module
// Capability traits and subscriber bookkeeping
// ============================================================================

pub mod subscribers;
pub mod types;

// Re-export commonly used items
pub use subscribers::Unsubscribe;
pub use types::{default_equals, AsSignal, Callback, EqualsFn, Signal, WritableSignal};
