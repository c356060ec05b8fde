// Presentation and serving of analysis reports

pub mod error;
pub mod render;
pub mod server;

pub use error::{Error, Result};
pub use render::render_dashboard;
pub use server::DashboardServer;
