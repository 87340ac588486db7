pub mod model;
pub mod repository;

pub use model::AccountData;
pub use repository::{AccountRepository, DataError, InMemoryAccountRepository};
