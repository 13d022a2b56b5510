//! Core pipeline orchestration for srsgen.
//!
//! This crate ties together input extraction, prompt assembly, generation,
//! markup formatting and rendering into one end-to-end run (`generate_srs`).

pub mod pipeline;
