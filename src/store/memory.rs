//! In-memory payroll ledger.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::PayrollStore;
use crate::error::{EngineError, EngineResult};
use crate::models::{CompanyId, EmployeeId, PayMaster, PayMasterId, PayPeriod};

type PeriodKey = (EmployeeId, u32, i32);

fn period_key(record: &PayMaster) -> PeriodKey {
    (record.employee_id, record.month, record.year)
}

#[derive(Debug, Default)]
struct Ledger {
    rows: BTreeMap<PayMasterId, PayMaster>,
    index: HashMap<PeriodKey, PayMasterId>,
    last_id: PayMasterId,
}

/// A [`PayrollStore`] holding the ledger behind a single `RwLock`.
///
/// A batch is checked against the unique index and inserted under one
/// write-lock acquisition, so two concurrent runs for the same period
/// cannot both create rows.
#[derive(Debug, Default)]
pub struct InMemoryPayrollStore {
    ledger: RwLock<Ledger>,
}

impl InMemoryPayrollStore {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, Ledger>> {
        self.ledger.read().map_err(|_| EngineError::Persistence {
            message: "payroll ledger lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, Ledger>> {
        self.ledger.write().map_err(|_| EngineError::Persistence {
            message: "payroll ledger lock poisoned".to_string(),
        })
    }
}

impl PayrollStore for InMemoryPayrollStore {
    fn count_existing(
        &self,
        company_id: CompanyId,
        period: PayPeriod,
        employee_ids: &[EmployeeId],
    ) -> EngineResult<usize> {
        let ledger = self.read()?;
        let count = employee_ids
            .iter()
            .filter_map(|id| ledger.index.get(&(*id, period.month, period.year)))
            .filter_map(|row_id| ledger.rows.get(row_id))
            .filter(|row| row.company_id == company_id)
            .count();
        Ok(count)
    }

    fn commit_batch(&self, records: Vec<PayMaster>) -> EngineResult<Vec<PayMaster>> {
        let mut ledger = self.write()?;

        let mut seen: HashSet<PeriodKey> = HashSet::with_capacity(records.len());
        let mut first_conflict: Option<PeriodKey> = None;
        let mut conflicts = 0;
        for record in &records {
            let key = period_key(record);
            if ledger.index.contains_key(&key) || !seen.insert(key) {
                conflicts += 1;
                first_conflict.get_or_insert(key);
            }
        }
        if let Some((_, month, year)) = first_conflict {
            return Err(EngineError::DuplicatePeriod {
                month,
                year,
                existing: conflicts,
            });
        }

        let mut committed = Vec::with_capacity(records.len());
        for mut record in records {
            ledger.last_id += 1;
            record.id = ledger.last_id;
            ledger.index.insert(period_key(&record), record.id);
            ledger.rows.insert(record.id, record.clone());
            committed.push(record);
        }

        debug!(rows = committed.len(), "Committed payroll batch");
        Ok(committed)
    }

    fn get(&self, company_id: CompanyId, id: PayMasterId) -> EngineResult<Option<PayMaster>> {
        let ledger = self.read()?;
        Ok(ledger
            .rows
            .get(&id)
            .filter(|row| row.company_id == company_id)
            .cloned())
    }

    fn replace(&self, record: PayMaster) -> EngineResult<PayMaster> {
        let mut ledger = self.write()?;
        let existing = ledger
            .rows
            .get_mut(&record.id)
            .filter(|row| row.company_id == record.company_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "PayMaster".to_string(),
                id: record.id.to_string(),
            })?;

        if period_key(existing) != period_key(&record) {
            return Err(EngineError::validation(
                "pay_master_id",
                "a correction cannot change the employee or period of a record",
            ));
        }

        *existing = record.clone();
        Ok(record)
    }

    fn records(
        &self,
        company_id: CompanyId,
        period: Option<PayPeriod>,
    ) -> EngineResult<Vec<PayMaster>> {
        let ledger = self.read()?;
        Ok(ledger
            .rows
            .values()
            .filter(|row| row.company_id == company_id)
            .filter(|row| period.is_none_or(|p| row.period() == p))
            .cloned()
            .collect())
    }

    fn count_for_company(&self, company_id: CompanyId) -> EngineResult<usize> {
        let ledger = self.read()?;
        Ok(ledger
            .rows
            .values()
            .filter(|row| row.company_id == company_id)
            .count())
    }
}
