pub mod pagination;
pub mod pattern;

pub use pagination::*;
pub use pattern::*;
