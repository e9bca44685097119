use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use crate::error::ProfileError;
use crate::model::profile::{EmployeeProfile, PersonalField, ProfileKey, ProfileUpdate};
use crate::store::RecordStore;
use crate::utils::db_utils::SqlValue;

/// In-memory store with the same partial-write rules as the MySQL one.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<u64, EmployeeProfile>>,
    writes: Mutex<Vec<(u64, ProfileUpdate)>>,
    offline: AtomicBool,
}

impl MemoryRecordStore {
    pub fn with_profile(profile: EmployeeProfile) -> Self {
        let store = Self::default();
        store.records.write().unwrap().insert(profile.id, profile);
        store
    }

    /// Make every following save fail as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn profile(&self, employee_id: u64) -> Option<EmployeeProfile> {
        self.records.read().unwrap().get(&employee_id).cloned()
    }

    pub fn writes(&self) -> Vec<(u64, ProfileUpdate)> {
        self.writes.lock().unwrap().clone()
    }
}

impl RecordStore for MemoryRecordStore {
    async fn load_employee_record(&self, employee_id: u64) -> Result<EmployeeProfile, ProfileError> {
        self.profile(employee_id).ok_or(ProfileError::NotFound)
    }

    async fn save_employee_record(
        &self,
        employee_id: u64,
        update: &ProfileUpdate,
    ) -> Result<(), ProfileError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ProfileError::Persistence("connection refused".into()));
        }

        let mut records = self.records.write().unwrap();
        let profile = records.get_mut(&employee_id).ok_or(ProfileError::NotFound)?;
        for (key, value) in update.iter() {
            apply(profile, *key, value);
        }
        self.writes.lock().unwrap().push((employee_id, update.clone()));
        Ok(())
    }
}

fn apply(profile: &mut EmployeeProfile, key: ProfileKey, value: &SqlValue) {
    let field = match key {
        ProfileKey::Payroll(field) => {
            let amount = match value {
                SqlValue::F64(v) => Some(*v),
                _ => None,
            };
            profile.payroll.set(field, amount);
            return;
        }
        ProfileKey::Personal(field) => field,
    };

    match field {
        PersonalField::DateOfBirth | PersonalField::DateOfJoining => {
            let date = match value {
                SqlValue::Date(d) => Some(*d),
                _ => None,
            };
            if field == PersonalField::DateOfBirth {
                profile.date_of_birth = date;
            } else {
                profile.date_of_joining = date;
            }
        }
        PersonalField::WorkingDaysPerWeek => {
            profile.working_days_per_week = match value {
                SqlValue::I64(days) => u8::try_from(*days).ok(),
                _ => None,
            };
        }
        PersonalField::BreakTimeHours => {
            profile.break_time_hours = match value {
                SqlValue::F64(hours) => Some(*hours),
                _ => None,
            };
        }
        text => {
            let text_value = match value {
                SqlValue::String(s) => Some(s.clone()),
                _ => None,
            };
            *text_slot(profile, text) = text_value;
        }
    }
}

fn text_slot(profile: &mut EmployeeProfile, field: PersonalField) -> &mut Option<String> {
    match field {
        PersonalField::Name => &mut profile.name,
        PersonalField::PhoneNumber => &mut profile.phone_number,
        PersonalField::JobPosition => &mut profile.job_position,
        PersonalField::Department => &mut profile.department,
        PersonalField::Manager => &mut profile.manager,
        PersonalField::Location => &mut profile.location,
        PersonalField::ResidingAddress => &mut profile.residing_address,
        PersonalField::Nationality => &mut profile.nationality,
        PersonalField::PersonalEmail => &mut profile.personal_email,
        PersonalField::Gender => &mut profile.gender,
        PersonalField::MaritalStatus => &mut profile.marital_status,
        PersonalField::AccountNumber => &mut profile.account_number,
        PersonalField::BankName => &mut profile.bank_name,
        PersonalField::IfscCode => &mut profile.ifsc_code,
        PersonalField::PanNo => &mut profile.pan_no,
        PersonalField::UanNo => &mut profile.uan_no,
        PersonalField::EmergencyContactName => &mut profile.emergency_contact_name,
        PersonalField::EmergencyContactPhone => &mut profile.emergency_contact_phone,
        PersonalField::EmergencyContactRelation => &mut profile.emergency_contact_relation,
        PersonalField::Skills => &mut profile.skills,
        PersonalField::Experience => &mut profile.experience,
        PersonalField::Education => &mut profile.education,
        PersonalField::Certifications => &mut profile.certifications,
        PersonalField::Languages => &mut profile.languages,
        PersonalField::DateOfBirth
        | PersonalField::DateOfJoining
        | PersonalField::WorkingDaysPerWeek
        | PersonalField::BreakTimeHours => unreachable!("{field} is not a text column"),
    }
}
