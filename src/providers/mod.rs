pub mod google_provider;
pub mod providers;
pub mod static_provider;

// Re-export from providers.rs so we can do "use crate::providers::*;"
pub use providers::*;
