//! Test fixtures for Flux development.
//!
//! Builders for grids, velocity sets and distribution fields in known
//! states, plus float comparison helpers. Every random fixture takes an
//! explicit seed so failures reproduce.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::*;

/// Assert `a` and `b` agree to within `rel` of the larger magnitude
/// (or `rel` absolutely, near zero).
#[track_caller]
pub fn assert_close(a: f64, b: f64, rel: f64) {
    let scale = a.abs().max(b.abs()).max(1.0);
    assert!(
        (a - b).abs() <= rel * scale,
        "{a} and {b} differ by {} (tolerance {})",
        (a - b).abs(),
        rel * scale
    );
}

/// Assert every value in `values` is finite and non-negative.
#[track_caller]
pub fn assert_non_negative(values: &[f64]) {
    if let Some((i, v)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        panic!("value {i} = {v} is negative or not finite");
    }
}
