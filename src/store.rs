use crate::error::ProfileError;
use crate::model::profile::{EmployeeProfile, ProfileUpdate};

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// Where employee profiles live. Saves are partial: keys absent from the
/// update keep their stored value, and a missing record is `NotFound`.
pub trait RecordStore {
    async fn load_employee_record(&self, employee_id: u64) -> Result<EmployeeProfile, ProfileError>;

    async fn save_employee_record(
        &self,
        employee_id: u64,
        update: &ProfileUpdate,
    ) -> Result<(), ProfileError>;
}
