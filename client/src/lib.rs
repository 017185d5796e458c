//! # client
//!
//! Client core for the ClimaGuard weather-alert app: the remote auth and
//! geographic reference clients, the persisted session store, the navigation
//! gate that picks between the signed-in and signed-out route trees, and the
//! headless screen controllers that tie them together.
//!
//! Rendering is left to the caller. The `climaguard` binary drives these
//! controllers from a terminal.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
