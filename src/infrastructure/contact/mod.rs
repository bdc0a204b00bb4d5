//! Contact form infrastructure

mod service;

pub use service::{ContactRequest, ContactService};
