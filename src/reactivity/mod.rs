// ============================================================================
// ember-signals - Reactivity Module
// Equality policies applied across the primitives
// ============================================================================

pub mod equality;

// Re-export commonly used items
pub use equality::{
    always_equals, never_equals, safe_equals_f32, safe_equals_f64, shallow_equals_vec,
};
