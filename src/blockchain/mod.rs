pub mod block;
pub mod model;
pub mod params;

pub use block::Block;
pub use model::{Blockchain, BlockchainError};
pub use params::{BlockchainParams, ParamsError};
