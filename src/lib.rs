//! # bytemonk-search
//!
//! Interactive book search console over a Typesense index.
//!
//! The search logic lives in the [`typesense_search`] crate; this crate
//! wires it to a line-oriented terminal: each plain line stands for the
//! current contents of the search box and is debounced into suggestion
//! fetches, while `/search <text>` submits a full search.
//!
//! Stdout carries the rendered view only; tracing output goes to stderr.

pub mod console;

pub use console::{ConsoleInput, run_console};
