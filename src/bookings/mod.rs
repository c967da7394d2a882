pub mod availability;
pub mod error;
pub mod handlers;
pub mod models;
pub mod operating_hours;
pub mod policy;
pub mod repository;
pub mod service;
pub mod status_machine;


pub use availability::*;
pub use error::*;
pub use handlers::*;
pub use models::*;
pub use operating_hours::*;
pub use policy::*;
pub use repository::*;
pub use service::*;
pub use status_machine::*;
