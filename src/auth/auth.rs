use crate::error::ProfileError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// The caller, as placed in request extensions by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = ProfileError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or(ProfileError::Unauthorized),
        )
    }
}

impl AuthUser {
    pub fn require_hr_or_admin(&self) -> Result<(), ProfileError> {
        if self.role.manages_records() {
            Ok(())
        } else {
            Err(ProfileError::Forbidden("HR/Admin only"))
        }
    }

    /// The employee record this user's own profile lives in.
    pub fn own_employee_id(&self) -> Result<u64, ProfileError> {
        self.employee_id
            .ok_or(ProfileError::Forbidden("No employee profile"))
    }

    pub fn can_edit_salary(&self) -> bool {
        self.role.manages_records()
    }
}
