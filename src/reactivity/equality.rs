// ============================================================================
// ember-signals - Equality Policies
// Ready-made comparison functions for atoms and selectors
// ============================================================================
//
// Every signal carries an `EqualsFn` (a plain fn pointer) deciding whether a
// candidate value counts as a change. `default_equals` covers `PartialEq`
// types; the helpers here cover the cases it gets wrong or cannot express.
// ============================================================================

/// Float equality that treats NaN as equal to itself.
///
/// With `PartialEq`, `NaN != NaN`, so an atom holding NaN would notify on
/// every NaN write. This policy makes repeated NaN writes a no-op.
pub fn safe_equals_f64(a: &f64, b: &f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

/// `f32` variant of [`safe_equals_f64`].
pub fn safe_equals_f32(a: &f32, b: &f32) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

/// Treats every write as a change. Subscribers are notified on every set,
/// even when the value is identical.
pub fn never_equals<T>(_: &T, _: &T) -> bool {
    false
}

/// Treats every write as unchanged. After the initial delivery, subscribers
/// are never notified again.
pub fn always_equals<T>(_: &T, _: &T) -> bool {
    true
}

/// Element-wise vector comparison requiring equal length and equal elements
/// in order.
pub fn shallow_equals_vec<T: PartialEq>(a: &Vec<T>, b: &Vec<T>) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}
