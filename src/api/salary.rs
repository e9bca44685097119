use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ProfileError;
use crate::model::payroll::{PayrollField, PayrollSnapshot};
use crate::salary::drafts::{SalaryDraft, SalaryDrafts};
use crate::salary::reconcile::reconcile;
use crate::store::mysql::MySqlRecordStore;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    pub snapshot: PayrollSnapshot,

    #[schema(example = "basicSalaryPercent")]
    pub field: PayrollField,

    /// `null` clears the field.
    #[serde(default)]
    #[schema(example = 40.0)]
    pub value: Option<f64>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub snapshot: PayrollSnapshot,
    pub changed_fields: Vec<PayrollField>,
}

/// One field edit applied to an open draft.
#[derive(Deserialize, ToSchema)]
pub struct DraftEdit {
    #[schema(example = "hra")]
    pub field: PayrollField,

    #[serde(default)]
    #[schema(example = 12000.0)]
    pub value: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub employee_id: u64,
    pub snapshot: PayrollSnapshot,
    /// Fields that differ from the stored record.
    pub pending_fields: Vec<PayrollField>,
}

impl DraftResponse {
    pub fn new(employee_id: u64, draft: &SalaryDraft) -> Self {
        Self {
            employee_id,
            snapshot: draft.current,
            pending_fields: draft.pending_fields(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/salary/reconcile",
    request_body = ReconcileRequest,
    responses(
        (status = 200, description = "Reconciled snapshot", body = ReconcileResponse),
        (status = 400, description = "Unknown field name"),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn reconcile_snapshot(
    _auth: AuthUser,
    body: web::Json<ReconcileRequest>,
) -> Result<HttpResponse, ProfileError> {
    let ReconcileRequest {
        snapshot,
        field,
        value,
    } = body.into_inner();

    let next = reconcile(&snapshot, field, value);
    Ok(HttpResponse::Ok().json(ReconcileResponse {
        changed_fields: snapshot.changed_fields(&next),
        snapshot: next,
    }))
}

#[utoipa::path(
    post,
    path = "/api/employee/{employee_id}/salary/draft",
    params(
        ("employee_id", description = "Employee record ID")
    ),
    responses(
        (status = 201, description = "Draft opened from the stored record", body = DraftResponse),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Employee record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn open_draft(
    auth: AuthUser,
    store: web::Data<MySqlRecordStore>,
    drafts: web::Data<SalaryDrafts>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ProfileError> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();
    let draft = drafts.open(store.get_ref(), employee_id).await?;
    Ok(HttpResponse::Created().json(DraftResponse::new(employee_id, &draft)))
}

#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}/salary/draft",
    params(
        ("employee_id", description = "Employee record ID")
    ),
    responses(
        (status = 200, description = "Current draft", body = DraftResponse),
        (status = 404, description = "No open draft")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn get_draft(
    auth: AuthUser,
    drafts: web::Data<SalaryDrafts>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ProfileError> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();
    let draft = drafts.get(employee_id).await?;
    Ok(HttpResponse::Ok().json(DraftResponse::new(employee_id, &draft)))
}

#[utoipa::path(
    patch,
    path = "/api/employee/{employee_id}/salary/draft",
    params(
        ("employee_id", description = "Employee record ID")
    ),
    request_body = DraftEdit,
    responses(
        (status = 200, description = "Edit reconciled into the draft", body = DraftResponse),
        (status = 404, description = "No open draft")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn edit_draft(
    auth: AuthUser,
    drafts: web::Data<SalaryDrafts>,
    path: web::Path<u64>,
    body: web::Json<DraftEdit>,
) -> Result<HttpResponse, ProfileError> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();
    let draft = drafts.apply_edit(employee_id, body.field, body.value).await?;
    Ok(HttpResponse::Ok().json(DraftResponse::new(employee_id, &draft)))
}

#[utoipa::path(
    post,
    path = "/api/employee/{employee_id}/salary/draft/commit",
    params(
        ("employee_id", description = "Employee record ID")
    ),
    responses(
        (status = 200, description = "Changed fields saved", body = DraftResponse),
        (status = 400, description = "Draft holds an out-of-range value"),
        (status = 404, description = "No open draft or employee record"),
        (status = 500, description = "Save failed, draft kept")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn commit_draft(
    auth: AuthUser,
    store: web::Data<MySqlRecordStore>,
    drafts: web::Data<SalaryDrafts>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ProfileError> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();
    let draft = drafts.commit(store.get_ref(), employee_id).await?;
    Ok(HttpResponse::Ok().json(DraftResponse::new(employee_id, &draft)))
}

#[utoipa::path(
    delete,
    path = "/api/employee/{employee_id}/salary/draft",
    params(
        ("employee_id", description = "Employee record ID")
    ),
    responses(
        (status = 200, description = "Draft discarded"),
        (status = 404, description = "No open draft")
    ),
    security(("bearer_auth" = [])),
    tag = "Salary"
)]
pub async fn discard_draft(
    auth: AuthUser,
    drafts: web::Data<SalaryDrafts>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ProfileError> {
    auth.require_hr_or_admin()?;

    if !drafts.discard(path.into_inner()).await {
        return Err(ProfileError::NoDraft);
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Draft discarded" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::tests::token;
    use crate::auth::middleware::{auth_middleware, tests::test_config};
    use crate::models::TokenType;
    use actix_web::middleware::from_fn;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn reconcile_endpoint_returns_derived_fields() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .wrap(from_fn(auth_middleware))
                .route("/salary/reconcile", web::post().to(reconcile_snapshot)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/salary/reconcile")
            .insert_header((
                "Authorization",
                format!("Bearer {}", token(3, Some(7), TokenType::Access)),
            ))
            .set_json(json!({
                "snapshot": { "monthlyWage": 50000.0 },
                "field": "basicSalaryPercent",
                "value": 40.0
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["snapshot"]["basicSalary"], 20000.0);
        assert_eq!(body["snapshot"]["hra"], 10000.0);
        assert_eq!(body["snapshot"]["fixedAllowance"], 20000.0);
        let changed = body["changedFields"].as_array().unwrap();
        assert!(changed.contains(&json!("basicSalary")));
        assert!(!changed.contains(&json!("monthlyWage")));
    }

    #[actix_web::test]
    async fn unknown_field_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .wrap(from_fn(auth_middleware))
                .route("/salary/reconcile", web::post().to(reconcile_snapshot)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/salary/reconcile")
            .insert_header((
                "Authorization",
                format!("Bearer {}", token(3, Some(7), TokenType::Access)),
            ))
            .set_json(json!({ "snapshot": {}, "field": "bonusPct", "value": 1.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn draft_response_lists_pending_fields() {
        let mut draft = SalaryDraft {
            committed: PayrollSnapshot::default(),
            current: PayrollSnapshot::default(),
        };
        draft.current.hra = Some(100.0);

        let json = serde_json::to_value(DraftResponse::new(7, &draft)).unwrap();
        assert_eq!(json["employeeId"], 7);
        assert_eq!(json["pendingFields"], json!(["hra"]));
        assert_eq!(json["snapshot"]["hra"], 100.0);
    }
}
