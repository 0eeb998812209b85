// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for the DALi text crates: text analysis,
//! layout, the text view and atlas rendering working together.
//!
//! - The `util` module holds the pipeline shared by the tests.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, which makes shared utilities easy to reach.
//! - Put the "topic" of a test at the start of its name, e.g. `atlas_glyphs_are_shared`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod atlas;
mod util;
