//! Library components of the `manifest` command-line front-end.

pub mod logging;
pub mod store;
