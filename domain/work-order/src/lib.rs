#[macro_use]
mod macros;

pub mod command;
pub mod endpoint;
pub mod exception;
#[cfg(feature = "mock")]
pub mod mock;
pub mod model;
pub mod service;
