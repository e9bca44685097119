use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::model::payroll::{PayrollField, PayrollSnapshot};
use crate::utils::db_utils::SqlValue;

/// Keys the profile form sends back but that this service never writes.
pub const READ_ONLY_KEYS: [&str; 4] = ["id", "email", "employeeId", "resumeFile"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 7,
    "employeeId": "EMP-007",
    "email": "jane.doe@company.com",
    "name": "Jane Doe",
    "jobPosition": "Engineer",
    "department": "Platform",
    "dateOfJoining": "2024-01-01",
    "workingDaysPerWeek": 5,
    "monthlyWage": 50000.0,
    "yearlyWage": 600000.0
}))]
pub struct EmployeeProfile {
    pub id: u64,
    /// Company employee code.
    #[serde(rename = "employeeId")]
    pub employee_code: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub job_position: Option<String>,
    pub department: Option<String>,
    pub manager: Option<String>,
    pub location: Option<String>,
    #[schema(value_type = Option<String>, format = "date")]
    pub date_of_birth: Option<NaiveDate>,
    pub residing_address: Option<String>,
    pub nationality: Option<String>,
    pub personal_email: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    #[schema(value_type = Option<String>, format = "date")]
    pub date_of_joining: Option<NaiveDate>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub ifsc_code: Option<String>,
    pub pan_no: Option<String>,
    pub uan_no: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
    /// Comma separated.
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    /// Comma separated.
    pub certifications: Option<String>,
    pub languages: Option<String>,
    pub resume_file: Option<String>,
    pub working_days_per_week: Option<u8>,
    pub break_time_hours: Option<f64>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payroll: PayrollSnapshot,
}

/// How a profile field is parsed from the form and stored.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldKind {
    /// Written only when non-blank.
    Name,
    Text,
    Date,
    /// Comma separated list.
    List,
    Integer,
    Decimal,
}

/// Editable profile fields outside the payroll snapshot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum PersonalField {
    Name,
    PhoneNumber,
    JobPosition,
    Department,
    Manager,
    Location,
    DateOfBirth,
    ResidingAddress,
    Nationality,
    PersonalEmail,
    Gender,
    MaritalStatus,
    DateOfJoining,
    AccountNumber,
    BankName,
    IfscCode,
    PanNo,
    UanNo,
    EmergencyContactName,
    EmergencyContactPhone,
    EmergencyContactRelation,
    Skills,
    Experience,
    Education,
    Certifications,
    Languages,
    WorkingDaysPerWeek,
    BreakTimeHours,
}

impl PersonalField {
    pub fn kind(self) -> FieldKind {
        match self {
            PersonalField::Name => FieldKind::Name,
            PersonalField::DateOfBirth | PersonalField::DateOfJoining => FieldKind::Date,
            PersonalField::Skills | PersonalField::Certifications => FieldKind::List,
            PersonalField::WorkingDaysPerWeek => FieldKind::Integer,
            PersonalField::BreakTimeHours => FieldKind::Decimal,
            _ => FieldKind::Text,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            PersonalField::Name => "name",
            PersonalField::PhoneNumber => "phone_number",
            PersonalField::JobPosition => "job_position",
            PersonalField::Department => "department",
            PersonalField::Manager => "manager",
            PersonalField::Location => "location",
            PersonalField::DateOfBirth => "date_of_birth",
            PersonalField::ResidingAddress => "residing_address",
            PersonalField::Nationality => "nationality",
            PersonalField::PersonalEmail => "personal_email",
            PersonalField::Gender => "gender",
            PersonalField::MaritalStatus => "marital_status",
            PersonalField::DateOfJoining => "date_of_joining",
            PersonalField::AccountNumber => "account_number",
            PersonalField::BankName => "bank_name",
            PersonalField::IfscCode => "ifsc_code",
            PersonalField::PanNo => "pan_no",
            PersonalField::UanNo => "uan_no",
            PersonalField::EmergencyContactName => "emergency_contact_name",
            PersonalField::EmergencyContactPhone => "emergency_contact_phone",
            PersonalField::EmergencyContactRelation => "emergency_contact_relation",
            PersonalField::Skills => "skills",
            PersonalField::Experience => "experience",
            PersonalField::Education => "education",
            PersonalField::Certifications => "certifications",
            PersonalField::Languages => "languages",
            PersonalField::WorkingDaysPerWeek => "working_days_per_week",
            PersonalField::BreakTimeHours => "break_time_hours",
        }
    }
}

/// A writable column of `employee_profiles`, resolved from a form key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProfileKey {
    Personal(PersonalField),
    Payroll(PayrollField),
}

impl ProfileKey {
    pub fn parse(key: &str) -> Option<Self> {
        PayrollField::from_str(key)
            .map(ProfileKey::Payroll)
            .or_else(|_| PersonalField::from_str(key).map(ProfileKey::Personal))
            .ok()
    }

    pub fn column(self) -> &'static str {
        match self {
            ProfileKey::Personal(field) => field.column(),
            ProfileKey::Payroll(field) => field.column(),
        }
    }

    /// Salary and work-schedule fields are HR territory.
    pub fn is_restricted(self) -> bool {
        matches!(
            self,
            ProfileKey::Payroll(_)
                | ProfileKey::Personal(PersonalField::WorkingDaysPerWeek)
                | ProfileKey::Personal(PersonalField::BreakTimeHours)
        )
    }
}

/// Partial write: only the listed columns are touched, `SqlValue::Null` clears one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    assignments: Vec<(ProfileKey, SqlValue)>,
}

impl ProfileUpdate {
    pub fn set(&mut self, key: ProfileKey, value: SqlValue) {
        match self.assignments.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.assignments.push((key, value)),
        }
    }

    pub fn set_payroll(&mut self, field: PayrollField, value: Option<f64>) {
        self.set(ProfileKey::Payroll(field), value.map_or(SqlValue::Null, SqlValue::F64));
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ProfileKey, SqlValue)> {
        self.assignments.iter()
    }

    /// `(column, value)` pairs ready for `build_update_sql`.
    pub fn columns(&self) -> Vec<(&'static str, SqlValue)> {
        self.assignments
            .iter()
            .map(|(key, value)| (key.column(), value.clone()))
            .collect()
    }
}
