//! The thermal core: attribute resolution, U-values and aggregation.
//!
//! Records flow through [`pipeline::process_element`] one at a time; the
//! resulting elements are reduced by [`aggregate`] only after the whole
//! batch is done.

pub mod aggregate;
pub mod classify;
pub mod geometry;
pub mod materials;
pub mod pipeline;
pub mod properties;
pub mod units;
pub mod uvalue;

pub use pipeline::{process_batch, process_element};
