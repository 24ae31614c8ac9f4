//! Default request options for `reqwest` clients.
//!
//! [`Client`] decorates a `reqwest::Client` with a shared bag of default
//! options applied to every request builder it creates. Defaults deep-merge
//! as they accumulate, entries can be removed by dotted path, the whole
//! overlay can be suppressed permanently, and a per-call option always beats
//! a default on the same leaf.

#![forbid(unsafe_code)]

mod apply;
mod client;
mod merge;
mod options;
mod path;
mod request;

pub use client::Client;
pub use options::DefaultOptions;
pub use request::RequestBuilder;
