pub mod comments;
pub mod error;
pub mod health;
pub mod opinions;
pub mod reactions;

pub use error::AppError;
