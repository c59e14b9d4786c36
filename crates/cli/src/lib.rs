//! Terminal front-end for crop recommendations.
//!
//! [`session::run`] drives the prompt loop over any reader/writer pair, so the
//! binary only wires stdin/stdout to it.

pub mod form;
pub mod render;
pub mod session;
