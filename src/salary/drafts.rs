use std::time::Duration;

use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use tracing::{debug, info, warn};

use crate::error::ProfileError;
use crate::model::payroll::{PayrollField, PayrollSnapshot};
use crate::model::profile::ProfileUpdate;
use crate::salary::reconcile::reconcile;
use crate::services::profile::validate_payroll_value;
use crate::store::RecordStore;

/// One employee's salary form between open and save.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryDraft {
    /// Payroll fields as last read from or written to the record store.
    pub committed: PayrollSnapshot,
    pub current: PayrollSnapshot,
}

impl SalaryDraft {
    fn opened(snapshot: PayrollSnapshot) -> Self {
        Self {
            committed: snapshot,
            current: snapshot,
        }
    }

    /// Fields edited since the draft was opened or last committed.
    pub fn pending_fields(&self) -> Vec<PayrollField> {
        self.committed.changed_fields(&self.current)
    }
}

/// Open salary drafts keyed by employee id.
///
/// Edits to one employee's draft run one at a time through the cache's
/// per-key compute, so each edit reconciles against the result of the one
/// before it. Idle drafts expire.
#[derive(Clone)]
pub struct SalaryDrafts {
    cache: Cache<u64, SalaryDraft>,
}

impl SalaryDrafts {
    pub fn new(max_capacity: u64, time_to_idle: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_idle(time_to_idle)
                .build(),
        }
    }

    /// Load the payroll fields from the store and start (or restart) a draft.
    pub async fn open<S: RecordStore>(
        &self,
        store: &S,
        employee_id: u64,
    ) -> Result<SalaryDraft, ProfileError> {
        let profile = store.load_employee_record(employee_id).await?;
        let draft = SalaryDraft::opened(profile.payroll);
        self.cache.insert(employee_id, draft).await;

        debug!(employee_id, "Salary draft opened");
        Ok(draft)
    }

    pub async fn get(&self, employee_id: u64) -> Result<SalaryDraft, ProfileError> {
        self.cache.get(&employee_id).await.ok_or(ProfileError::NoDraft)
    }

    /// Reconcile one field edit into the open draft.
    pub async fn apply_edit(
        &self,
        employee_id: u64,
        field: PayrollField,
        value: Option<f64>,
    ) -> Result<SalaryDraft, ProfileError> {
        let result = self
            .cache
            .entry(employee_id)
            .and_compute_with(|entry| {
                let op = match entry {
                    Some(entry) => {
                        let mut draft = entry.into_value();
                        draft.current = reconcile(&draft.current, field, value);
                        Op::Put(draft)
                    }
                    None => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        match result {
            CompResult::ReplacedWith(entry) | CompResult::Inserted(entry) => {
                debug!(employee_id, field = %field, "Salary draft edited");
                Ok(entry.into_value())
            }
            _ => Err(ProfileError::NoDraft),
        }
    }

    /// Write the draft's pending fields to the store.
    ///
    /// A failed write leaves the draft exactly as it was so no edit is lost.
    /// Edits that land while the write is in flight stay pending.
    pub async fn commit<S: RecordStore>(
        &self,
        store: &S,
        employee_id: u64,
    ) -> Result<SalaryDraft, ProfileError> {
        let draft = self.get(employee_id).await?;
        let pending = draft.pending_fields();
        if pending.is_empty() {
            return Ok(draft);
        }

        let mut update = ProfileUpdate::default();
        for field in &pending {
            let value = draft.current.get(*field);
            if let Some(value) = value {
                validate_payroll_value(*field, value)?;
            }
            update.set_payroll(*field, value);
        }

        if let Err(e) = store.save_employee_record(employee_id, &update).await {
            warn!(employee_id, error = %e, "Salary draft commit failed, keeping draft");
            return Err(e);
        }

        let saved = draft.current;
        let result = self
            .cache
            .entry(employee_id)
            .and_compute_with(|entry| {
                let op = match entry {
                    Some(entry) => {
                        let mut latest = entry.into_value();
                        latest.committed = saved;
                        Op::Put(latest)
                    }
                    None => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        info!(employee_id, fields = pending.len(), "Salary draft committed");

        Ok(match result {
            CompResult::ReplacedWith(entry) | CompResult::Inserted(entry) => entry.into_value(),
            // Expired or discarded mid-write; what was sent is what is stored.
            _ => SalaryDraft::opened(saved),
        })
    }

    /// Drop a draft without saving. Returns whether one was open.
    pub async fn discard(&self, employee_id: u64) -> bool {
        self.cache.remove(&employee_id).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::profile::{EmployeeProfile, ProfileKey};
    use crate::store::memory::MemoryRecordStore;
    use crate::utils::db_utils::SqlValue;

    fn drafts() -> SalaryDrafts {
        SalaryDrafts::new(100, Duration::from_secs(60))
    }

    fn store() -> MemoryRecordStore {
        let mut profile = EmployeeProfile {
            id: 7,
            ..Default::default()
        };
        profile.payroll.monthly_wage = Some(50000.0);
        profile.payroll.yearly_wage = Some(600000.0);
        profile.payroll.professional_tax = Some(200.0);
        MemoryRecordStore::with_profile(profile)
    }

    #[actix_web::test]
    async fn edits_chain_on_the_latest_draft() {
        let store = store();
        let drafts = drafts();
        drafts.open(&store, 7).await.unwrap();

        drafts
            .apply_edit(7, PayrollField::BasicSalaryPercent, Some(40.0))
            .await
            .unwrap();
        let draft = drafts
            .apply_edit(7, PayrollField::StandardAllowance, Some(5000.0))
            .await
            .unwrap();

        assert_eq!(draft.current.basic_salary, Some(20000.0));
        assert_eq!(draft.current.hra, Some(10000.0));
        assert_eq!(draft.current.fixed_allowance, Some(15000.0));
        assert_eq!(drafts.get(7).await.unwrap(), draft);
    }

    #[actix_web::test]
    async fn editing_without_a_draft_fails() {
        let drafts = drafts();
        assert!(matches!(
            drafts.apply_edit(7, PayrollField::Hra, Some(1.0)).await,
            Err(ProfileError::NoDraft)
        ));
        assert!(matches!(drafts.commit(&store(), 7).await, Err(ProfileError::NoDraft)));
    }

    #[actix_web::test]
    async fn open_unknown_employee_is_not_found() {
        let drafts = drafts();
        assert!(matches!(
            drafts.open(&store(), 99).await,
            Err(ProfileError::NotFound)
        ));
        assert!(matches!(drafts.get(99).await, Err(ProfileError::NoDraft)));
    }

    #[actix_web::test]
    async fn commit_writes_only_changed_fields() {
        let store = store();
        let drafts = drafts();
        drafts.open(&store, 7).await.unwrap();
        drafts
            .apply_edit(7, PayrollField::StandardAllowance, Some(5000.0))
            .await
            .unwrap();

        let draft = drafts.commit(&store, 7).await.unwrap();
        assert!(draft.pending_fields().is_empty());

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        let (employee_id, update) = &writes[0];
        assert_eq!(*employee_id, 7);
        let keys: Vec<_> = update.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            vec![
                ProfileKey::Payroll(PayrollField::StandardAllowance),
                ProfileKey::Payroll(PayrollField::StandardAllowancePercent),
                ProfileKey::Payroll(PayrollField::FixedAllowance),
                ProfileKey::Payroll(PayrollField::FixedAllowancePercent),
            ]
        );
        assert!(update.iter().all(|(_, value)| matches!(value, SqlValue::F64(_))));

        let stored = store.profile(7).unwrap().payroll;
        assert_eq!(stored.fixed_allowance, Some(45000.0));
        assert_eq!(stored.professional_tax, Some(200.0));

        // Nothing pending, nothing written
        drafts.commit(&store, 7).await.unwrap();
        assert_eq!(store.writes().len(), 1);
    }

    #[actix_web::test]
    async fn failed_commit_keeps_edits() {
        let store = store();
        let drafts = drafts();
        drafts.open(&store, 7).await.unwrap();
        let edited = drafts
            .apply_edit(7, PayrollField::MonthlyWage, Some(60000.0))
            .await
            .unwrap();

        store.set_offline(true);
        assert!(matches!(
            drafts.commit(&store, 7).await,
            Err(ProfileError::Persistence(_))
        ));
        assert_eq!(drafts.get(7).await.unwrap(), edited);
        assert_eq!(store.profile(7).unwrap().payroll.monthly_wage, Some(50000.0));

        store.set_offline(false);
        drafts.commit(&store, 7).await.unwrap();
        assert_eq!(store.profile(7).unwrap().payroll.yearly_wage, Some(720000.0));
    }

    #[actix_web::test]
    async fn out_of_range_draft_is_not_committed() {
        let store = store();
        let drafts = drafts();
        drafts.open(&store, 7).await.unwrap();
        // basic above the wage derives a percent over 100
        drafts
            .apply_edit(7, PayrollField::BasicSalary, Some(60000.0))
            .await
            .unwrap();

        assert!(matches!(
            drafts.commit(&store, 7).await,
            Err(ProfileError::Validation(_))
        ));
        assert!(store.writes().is_empty());
        assert!(!drafts.get(7).await.unwrap().pending_fields().is_empty());
    }

    #[actix_web::test]
    async fn discard_drops_the_draft() {
        let store = store();
        let drafts = drafts();
        drafts.open(&store, 7).await.unwrap();

        assert!(drafts.discard(7).await);
        assert!(!drafts.discard(7).await);
        assert!(matches!(drafts.get(7).await, Err(ProfileError::NoDraft)));
    }
}
