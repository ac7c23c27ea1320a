//! ecolens — sustainability audit pipeline for JavaScript/TypeScript
//! repositories.
//!
//! Ingests a GitHub repository or ZIP archive, collects the JS/TS files
//! worth analyzing, asks an LLM chat-completions endpoint to audit each one
//! for energy-inefficient patterns, and aggregates the findings into JSON
//! reports. The binary exposes the pipeline as a CLI (`audit`) and a small
//! HTTP service (`serve`).

pub mod analysis;
pub mod cli;
pub mod collector;
pub mod config;
pub mod constants;
pub mod env;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod server;
