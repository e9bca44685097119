use sqlx::MySqlPool;
use tracing::{debug, error};

use crate::error::ProfileError;
use crate::model::profile::{EmployeeProfile, ProfileUpdate};
use crate::store::RecordStore;
use crate::utils::db_utils::{build_update_sql, execute_update};

const PROFILE_TABLE: &str = "employee_profiles";

#[derive(Clone)]
pub struct MySqlRecordStore {
    pool: MySqlPool,
}

impl MySqlRecordStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, employee_id: u64) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employee_profiles WHERE id = ?",
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }
}

impl RecordStore for MySqlRecordStore {
    async fn load_employee_record(&self, employee_id: u64) -> Result<EmployeeProfile, ProfileError> {
        let profile = sqlx::query_as::<_, EmployeeProfile>(
            r#"
            SELECT *
            FROM employee_profiles
            WHERE id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee profile");
            ProfileError::from(e)
        })?;

        profile.ok_or(ProfileError::NotFound)
    }

    async fn save_employee_record(
        &self,
        employee_id: u64,
        update: &ProfileUpdate,
    ) -> Result<(), ProfileError> {
        // MySQL reports zero affected rows for an unchanged row, so existence is checked up front
        let exists = self.exists(employee_id).await.map_err(|e| {
            error!(error = %e, employee_id, "Failed to look up employee profile");
            ProfileError::from(e)
        })?;
        if !exists {
            return Err(ProfileError::NotFound);
        }

        let Some(sql_update) = build_update_sql(PROFILE_TABLE, &update.columns(), "id", employee_id)
        else {
            debug!(employee_id, "Nothing to write");
            return Ok(());
        };
        debug!(sql = %sql_update.sql, employee_id, "Updating employee profile");

        execute_update(&self.pool, sql_update).await.map_err(|e| {
            error!(error = %e, employee_id, "Failed to update employee profile");
            ProfileError::from(e)
        })?;

        Ok(())
    }
}
