//! Core types for the suite run pipeline: builder, context, dispatcher, and error handling.

pub mod builder;
pub mod context;
pub mod dispatcher;
pub mod error;

pub use builder::{SuiteRunner, SuiteRunnerBuilder};
pub use context::Context;
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
