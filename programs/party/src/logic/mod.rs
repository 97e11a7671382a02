pub mod fees;
pub mod migration;
pub mod orientation;
pub mod routing;
pub mod unit_of_work;

pub use fees::*;
pub use migration::*;
pub use orientation::*;
pub use routing::*;
pub use unit_of_work::*;
