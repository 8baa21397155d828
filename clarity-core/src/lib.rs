pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod reflection;

pub use config::ClarityConfig;
pub use error::ClarityError;
pub use models::entry::JournalEntry;
pub use reflection::{
    create_generator, FallbackReflectionGenerator, OpenAiReflectionClient, ReflectionConfig,
    ReflectionError, ReflectionGenerator,
};
