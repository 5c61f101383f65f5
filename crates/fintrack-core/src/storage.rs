//! Persistence boundary: a key-value store of JSON values.
//!
//! The engine itself never touches storage. Callers load a [`FinanceSnapshot`],
//! run the pure computations over it, and write mutated collections back.

use std::{collections::BTreeMap, sync::Mutex};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use fintrack_domain::{Expense, Income, RecurringTransaction, SavingsVaultGoal};

use crate::CoreError;

pub const INCOMES_KEY: &str = "incomes";
pub const EXPENSES_KEY: &str = "expenses";
pub const RECURRING_KEY: &str = "recurringTransactions";
pub const GOALS_KEY: &str = "savingsVaultGoals";

/// Abstraction over backends that persist arbitrary JSON values by key.
pub trait FinanceStore: Send + Sync {
    fn get_value(&self, key: &str) -> Result<Option<Value>, CoreError>;
    fn set_value(&self, key: &str, value: Value) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
    fn keys(&self) -> Result<Vec<String>, CoreError>;
}

/// Reads a list stored under `key`; a missing key is an empty list.
pub fn load_collection<T, S>(store: &S, key: &str) -> Result<Vec<T>, CoreError>
where
    T: DeserializeOwned,
    S: FinanceStore + ?Sized,
{
    match store.get_value(key)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}

pub fn save_collection<T, S>(store: &S, key: &str, items: &[T]) -> Result<(), CoreError>
where
    T: Serialize,
    S: FinanceStore + ?Sized,
{
    store.set_value(key, serde_json::to_value(items)?)
}

/// Every collection the tracker persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceSnapshot {
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub recurring: Vec<RecurringTransaction>,
    pub goals: Vec<SavingsVaultGoal>,
}

impl FinanceSnapshot {
    pub fn load<S: FinanceStore + ?Sized>(store: &S) -> Result<Self, CoreError> {
        Ok(Self {
            incomes: load_collection(store, INCOMES_KEY)?,
            expenses: load_collection(store, EXPENSES_KEY)?,
            recurring: load_collection(store, RECURRING_KEY)?,
            goals: load_collection(store, GOALS_KEY)?,
        })
    }

    pub fn save<S: FinanceStore + ?Sized>(&self, store: &S) -> Result<(), CoreError> {
        save_collection(store, INCOMES_KEY, &self.incomes)?;
        save_collection(store, EXPENSES_KEY, &self.expenses)?;
        save_collection(store, RECURRING_KEY, &self.recurring)?;
        save_collection(store, GOALS_KEY, &self.goals)
    }
}

/// In-process store, mainly for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Value>) -> R,
    ) -> Result<R, CoreError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        Ok(f(&mut guard))
    }
}

impl FinanceStore for MemoryStore {
    fn get_value(&self, key: &str) -> Result<Option<Value>, CoreError> {
        self.with_values(|values| values.get(key).cloned())
    }

    fn set_value(&self, key: &str, value: Value) -> Result<(), CoreError> {
        self.with_values(|values| {
            values.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.with_values(|values| {
            values.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        self.with_values(|values| values.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fintrack_domain::IncomeSource;

    #[test]
    fn missing_collections_load_as_empty() {
        let store = MemoryStore::new();
        let snapshot = FinanceSnapshot::load(&store).unwrap();
        assert_eq!(snapshot, FinanceSnapshot::default());
    }

    #[test]
    fn snapshot_survives_a_save_and_load() {
        let store = MemoryStore::new();
        let snapshot = FinanceSnapshot {
            incomes: vec![Income::new(
                IncomeSource::MainJob,
                10.0,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )],
            ..FinanceSnapshot::default()
        };
        snapshot.save(&store).unwrap();

        assert_eq!(FinanceSnapshot::load(&store).unwrap(), snapshot);
        assert_eq!(
            store.keys().unwrap(),
            vec![EXPENSES_KEY, INCOMES_KEY, RECURRING_KEY, GOALS_KEY]
        );
    }

    #[test]
    fn malformed_values_surface_as_serde_errors() {
        let store = MemoryStore::new();
        store
            .set_value(INCOMES_KEY, serde_json::json!({"not": "a list"}))
            .unwrap();
        assert!(matches!(
            load_collection::<Income, _>(&store, INCOMES_KEY),
            Err(CoreError::Serde(_))
        ));
    }
}
