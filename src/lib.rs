// Embeddable document preview engine: debounced regeneration against a
// remote generation service, exclusive artifact ownership, and the viewport,
// pagination, and download surfaces a host UI needs.

pub mod config;
pub mod download;
pub mod error;
pub mod generator;
pub mod preview;
pub mod render;
