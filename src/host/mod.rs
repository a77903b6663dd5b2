//! Host-side checks and mutations used by bootstrap steps

pub mod preconditions;
pub mod readiness;
pub mod workspace;

pub use preconditions::PreconditionChecker;
pub use readiness::ReadinessPoller;
pub use workspace::{ensure_dir, ensure_ignore_entry};
