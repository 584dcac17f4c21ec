//! HTTP route handlers

pub mod catalog;
pub mod workflows;
