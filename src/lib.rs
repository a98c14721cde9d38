pub mod archive;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gbfs;
pub mod pipeline;
pub mod stats;
pub mod store;
