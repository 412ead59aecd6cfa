pub mod analytics;
pub mod session;
