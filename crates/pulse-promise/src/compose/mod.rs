//! Composition combinators.
//!
//! Coordinators attach to each input through the input's settle-callback
//! slot and keep their shared working state alive by capturing it in every
//! per-input continuation; the last continuation to run drops the state
//! with itself.

mod all;
mod race;

pub use all::{all2, all3, all4, all_unit};
pub use race::{race2, race3, race_all, Race2, Race3};
