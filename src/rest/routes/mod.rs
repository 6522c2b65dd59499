//! Route handlers for the REST API.

pub mod admin;
pub mod health;
pub mod posts;
pub mod waitlist;
