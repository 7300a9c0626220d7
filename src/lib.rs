//! ISpace is a terminal interior-design assistant backed by a generative
//! image model.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the design session: transcript, version history, the
//!   current-design pointer and the single-slot pending guard, plus
//!   configuration and credential storage.
//! - [`gateway`] is the boundary with the generation backend. Create and
//!   refine requests share one capability; [`gateway::gemini`] implements it
//!   over the Gemini REST API.
//! - [`export`] writes the current design to disk.
//! - [`commands`] parses slash commands for the interactive session and
//!   [`ui`] runs the line-oriented loop around them.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod export;
pub mod gateway;
pub mod ui;
pub mod utils;
