// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod telemetry;
pub mod ui;

pub use error::LoadError;
