//! Session store and training dispatch.
mod base;
mod config;
pub use base::TrainingCoordinator;
pub use config::CoordinatorConfig;
