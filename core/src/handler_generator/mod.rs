#![deny(missing_docs)]

//! # Handler Generator Module
//!
//! Synthesizes `axum` handler functions. Each route is reduced to a
//! [`HandlerDescriptor`], which is rendered through the handler template.

mod builder;
mod descriptor;

pub use builder::{
    load_handler_template, render_handler, HANDLER_TEMPLATE, TEMPLATE_CATEGORY, TEMPLATE_NAME,
};
pub use descriptor::HandlerDescriptor;
