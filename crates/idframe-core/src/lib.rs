pub mod cleanup;
pub mod config;
pub mod consts;
pub mod error;
pub mod export;
pub mod image_io;
pub mod sampling;
pub mod session;
pub mod tasks;
pub mod viewport;
