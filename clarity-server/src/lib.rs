pub mod error;
pub mod http;
pub mod render;
pub mod subsystems;
