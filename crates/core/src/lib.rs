pub mod lifecycle;
pub mod model;
pub mod validate;

pub use lifecycle::Lifecycle;
pub use model::*;
