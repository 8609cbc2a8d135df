//! Integration test crate for the Manx ID workspace. The tests live in
//! `tests/`.
