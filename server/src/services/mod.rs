//! Request pipelines shared by the HTTP handlers.

pub mod form;
pub mod scan;
