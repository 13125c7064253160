pub mod chain;
pub mod interface;
pub mod prompt;

pub use chain::ChainState;
pub use interface::*;
