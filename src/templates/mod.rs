pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{divider, labelled};
pub use layouts::email::email_layout;
pub use pages::report::{render_report, Report};
