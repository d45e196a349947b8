//! Plain-text rendering of the step tree and of a single step.

pub mod formatter;

pub use formatter::TreeFormatter;
