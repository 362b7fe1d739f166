pub mod mocks;
pub mod setup;

pub use mocks::*;
pub use setup::*;
