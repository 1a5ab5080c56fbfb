//! Lightweight Charts style model, pane views and pane renderers.

pub mod model;
pub mod renderers;
pub mod views;
