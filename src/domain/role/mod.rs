pub mod model;

pub use model::{LimitKind, Role, RoleLimits, RoleName};
