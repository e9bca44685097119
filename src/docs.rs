use crate::api::salary::{DraftEdit, DraftResponse, ReconcileRequest, ReconcileResponse};
use crate::model::payroll::{PayrollField, PayrollSnapshot};
use crate::model::profile::EmployeeProfile;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Profile & Payroll API",
        version = "1.0.0",
        description = r#"
## Employee profile and salary composition

Employees read and update their own profile. HR and Admin manage any
employee's profile, including the salary breakdown.

### Salary drafts
A salary draft holds one employee's payroll fields while HR edits them.
Every edit is reconciled: the paired amount or percentage is derived, HRA is
seeded at 50% of basic when blank, and the fixed allowance absorbs whatever
the other components leave of the monthly wage. Committing writes only the
fields that changed.

### 🔐 Security
Every endpoint needs a **JWT Bearer** access token from the identity service.
"#,
    ),
    paths(
        crate::api::profile::get_my_profile,
        crate::api::profile::update_my_profile,
        crate::api::profile::get_employee_profile,
        crate::api::profile::update_employee_profile,

        crate::api::salary::reconcile_snapshot,
        crate::api::salary::open_draft,
        crate::api::salary::get_draft,
        crate::api::salary::edit_draft,
        crate::api::salary::commit_draft,
        crate::api::salary::discard_draft
    ),
    components(
        schemas(
            EmployeeProfile,
            PayrollSnapshot,
            PayrollField,
            ReconcileRequest,
            ReconcileResponse,
            DraftEdit,
            DraftResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Profile", description = "Employee profile APIs"),
        (name = "Salary", description = "Salary composition and draft APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/employee/{employee_id}/salary/draft"));
        assert!(doc.paths.paths.contains_key("/api/profile"));

        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("PayrollSnapshot"));
    }
}
