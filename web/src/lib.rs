//! Heatmap Web – server-rendered workout activity heatmap.

pub mod app;
pub mod components;
pub mod model;
pub mod pages;
pub mod server;
