//! Mira - lead capture wizard and waitlist service
//!
//! The library holds the wizard state machine, the waitlist service contract
//! and its clients, the REST server and the terminal front end used by the
//! `mira` binary.

pub mod app;
pub mod blog;
pub mod config;
pub mod lead;
pub mod logging;
pub mod rest;
pub mod services;
pub mod ui;
