//! qlist: property list viewer core.
//!
//! A document is decoded into an order-preserving [`domain::Entry`] tree, wrapped in a
//! [`domain::TreeIndex`] whose nodes are addressed only by path strings, and rendered
//! row by row through [`application::TreeDataSource`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
