//! Parley - Text Translation with Pretrained opus-mt Models
//!
//! Translates text between a fixed set of language pairs, loading each
//! pretrained model once and reusing it, and can speak the result.

pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod model;
pub mod resolver;
pub mod speech;
pub mod workflow;
