//! doclift HTTP service: conversion, chunking and indexing endpoints, plus
//! the `init-collection` setup command.

pub mod api;
pub mod cli;
pub mod router;
pub mod setup;
pub mod staging;
pub mod startup;
pub mod state;

pub use router::build_router;
pub use state::AppState;
