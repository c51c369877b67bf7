pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod exec;
pub mod io;
pub mod marker;
pub mod paths;
pub mod pipeline;
pub mod tools;

pub use error::{Result, SlipwayError};
