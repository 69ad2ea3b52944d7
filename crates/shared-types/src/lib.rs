pub mod config;
pub mod error;
pub mod todo;
pub mod user;

pub use config::*;
pub use error::*;
pub use todo::*;
pub use user::*;
