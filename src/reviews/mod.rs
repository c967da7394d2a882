pub mod models;
pub mod error;
pub mod repository;
pub mod rating_calculator;
pub mod gate;
pub mod service;
pub mod handlers;

pub use models::*;
pub use error::*;
pub use repository::*;
pub use rating_calculator::*;
pub use gate::*;
pub use service::*;
pub use handlers::*;

#[cfg(test)]
mod tests;
