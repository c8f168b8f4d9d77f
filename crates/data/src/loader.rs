//! Dataset loading
//!
//! All five files are checked for existence before any row is parsed, so a
//! missing export halts initialization with the offending path and no
//! partial dataset escapes.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use planwise_core::config::DataConfig;
use planwise_core::domain::billing::BillingRecord;
use planwise_core::domain::plan::Plan;
use planwise_core::domain::subscription::Subscription;
use planwise_core::domain::user::User;

use crate::error::DataError;
use crate::records::{BillingRow, PlanRow, SubscriptionRow, UserRow};

/// Log rows are free-form (the engine never reads them), so they load as
/// header-keyed string maps.
pub type LogRecord = BTreeMap<String, String>;

/// Resolved locations of the five exports.
#[derive(Clone, Debug)]
pub struct DatasetPaths {
    pub users: PathBuf,
    pub subscriptions: PathBuf,
    pub plans: PathBuf,
    pub billing: PathBuf,
    pub logs: PathBuf,
}

impl DatasetPaths {
    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            users: config.users_path(),
            subscriptions: config.subscriptions_path(),
            plans: config.plans_path(),
            billing: config.billing_path(),
            logs: config.logs_path(),
        }
    }

    fn all(&self) -> [&Path; 5] {
        [&self.users, &self.subscriptions, &self.plans, &self.billing, &self.logs]
    }

    /// Paths that do not currently exist, in table order.
    pub fn missing(&self) -> Vec<&Path> {
        self.all().into_iter().filter(|path| !path.exists()).collect()
    }
}

/// The immutable input snapshot: five tables, loaded once, read-only from
/// then on.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub users: Vec<User>,
    pub subscriptions: Vec<Subscription>,
    pub plans: Vec<Plan>,
    pub billing: Vec<BillingRecord>,
    pub logs: Vec<LogRecord>,
}

impl Dataset {
    pub fn load(paths: &DatasetPaths) -> Result<Self, DataError> {
        if let Some(path) = paths.missing().first() {
            return Err(DataError::MissingFile { path: path.to_path_buf() });
        }

        let users = read_table::<UserRow>(&paths.users)?
            .into_iter()
            .map(User::from)
            .collect();
        let subscriptions = read_table::<SubscriptionRow>(&paths.subscriptions)?
            .into_iter()
            .map(Subscription::from)
            .collect();
        let plans = read_table::<PlanRow>(&paths.plans)?
            .into_iter()
            .map(Plan::from)
            .collect();
        let billing = read_table::<BillingRow>(&paths.billing)?
            .into_iter()
            .map(BillingRecord::from)
            .collect();
        let logs = read_table::<LogRecord>(&paths.logs)?;

        Ok(Self { users, subscriptions, plans, billing, logs })
    }
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataError> {
    let file = File::open(path)
        .map_err(|source| DataError::Io { path: path.to_path_buf(), source })?;

    let mut reader = csv::Reader::from_reader(file);
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|source| DataError::Csv { path: path.to_path_buf(), source })
}
