use actix_web::{HttpResponse, web};
use serde_json::{Value, json};
use tracing::info;

use crate::auth::auth::AuthUser;
use crate::error::ProfileError;
use crate::services::profile::{load_profile, save_profile};
use crate::store::mysql::MySqlRecordStore;

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Own profile", body = crate::model::profile::EmployeeProfile),
        (status = 401),
        (status = 403, description = "User is not linked to an employee record"),
        (status = 404, description = "Employee record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_my_profile(
    auth: AuthUser,
    store: web::Data<MySqlRecordStore>,
) -> Result<HttpResponse, ProfileError> {
    let employee_id = auth.own_employee_id()?;
    let profile = load_profile(store.get_ref(), employee_id).await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body(content = Object, description = "Any subset of the profile's camelCase keys"),
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Malformed field value"),
        (status = 403, description = "Salary and schedule fields need HR/Admin"),
        (status = 404, description = "Employee record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_my_profile(
    auth: AuthUser,
    store: web::Data<MySqlRecordStore>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ProfileError> {
    let employee_id = auth.own_employee_id()?;
    let written = save_profile(
        store.get_ref(),
        employee_id,
        &payload,
        auth.can_edit_salary(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully!",
        "fieldsUpdated": written
    })))
}

#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}/profile",
    params(
        ("employee_id", description = "Employee record ID")
    ),
    responses(
        (status = 200, description = "Employee profile", body = crate::model::profile::EmployeeProfile),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Employee record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_employee_profile(
    auth: AuthUser,
    store: web::Data<MySqlRecordStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ProfileError> {
    auth.require_hr_or_admin()?;

    let profile = load_profile(store.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    put,
    path = "/api/employee/{employee_id}/profile",
    params(
        ("employee_id", description = "Employee record ID")
    ),
    request_body(content = Object, description = "Any subset of the profile's camelCase keys"),
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Malformed field value"),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Employee record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_employee_profile(
    auth: AuthUser,
    store: web::Data<MySqlRecordStore>,
    path: web::Path<u64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ProfileError> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();
    let written = save_profile(store.get_ref(), employee_id, &payload, true).await?;
    info!(employee_id, user_id = auth.user_id, by = %auth.username, "Profile updated by HR");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully!",
        "fieldsUpdated": written
    })))
}
