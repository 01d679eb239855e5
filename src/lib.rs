//! hypoview - browse and export scored research hypotheses.
//!
//! A client for a hypothesis REST API: fetches topics, subtopics, categories
//! and loosely shaped hypothesis records, normalizes their titles and scores,
//! and renders them through a local web interface or the command line.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod server;
pub mod services;
