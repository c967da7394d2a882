pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repository;
pub mod store;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use policy::*;
pub use repository::*;
pub use store::*;
