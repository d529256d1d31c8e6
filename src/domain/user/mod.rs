pub mod dto;
pub mod error;
pub mod model;
pub mod service;

pub use dto::{ChangeRoleRequest, MeResponse, RoleDto, RoleLimitsDto, UsageTodayDto};
pub use error::UserServiceError;
pub use model::User;
pub use service::{UserService, UserServiceApi};
