//! The interactive surface: form rendering, submission handling, and the
//! JSON mirror endpoint.

pub mod handlers;
pub mod page;
