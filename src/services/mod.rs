//! Typed calls to the mood API, one function per endpoint.

pub mod ai;
pub mod auth;
pub mod moods;
