pub mod common;
pub mod region;
pub mod session;
pub mod subsidy;

pub use common::*;
pub use region::*;
pub use session::*;
pub use subsidy::*;
