pub mod builder;
pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod selector;
pub mod session;
pub mod setops;
pub mod special_sets;
pub mod tokenizer;

pub use error::{DanError, DanResult};
