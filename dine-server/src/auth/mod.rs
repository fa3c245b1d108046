//! 调用方身份
//!
//! 身份由上游认证层断言，通过请求头传入：
//! - `X-Actor-Id` - 不透明的调用方 id (必填)
//! - `X-Actor-Role` - `customer` | `staff` | `admin` (默认 customer)
//!
//! - [`CurrentActor`] - axum extractor
//! - [`require_staff`] / [`require_admin`] - 角色检查

pub mod extractor;

pub use extractor::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, CurrentActor};

use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::types::Actor;

/// Staff or admin only
pub fn require_staff(actor: &Actor) -> AppResult<()> {
    if actor.is_staff() {
        return Ok(());
    }
    security_log!("WARN", "staff_required", actor_id = actor.id.as_str());
    Err(AppError::new(ErrorCode::StaffRequired))
}

/// Admin only
pub fn require_admin(actor: &Actor) -> AppResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    security_log!("WARN", "admin_required", actor_id = actor.id.as_str());
    Err(AppError::new(ErrorCode::AdminRequired))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_guards() {
        assert!(require_staff(&Actor::staff("s")).is_ok());
        assert!(require_staff(&Actor::admin("a")).is_ok());
        assert_eq!(
            require_staff(&Actor::customer("c")).unwrap_err().code,
            ErrorCode::StaffRequired
        );

        assert!(require_admin(&Actor::admin("a")).is_ok());
        assert_eq!(
            require_admin(&Actor::staff("s")).unwrap_err().code,
            ErrorCode::AdminRequired
        );
    }
}
