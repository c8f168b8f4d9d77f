//! Deterministic demo dataset
//!
//! Canonical seed exports for demos, smoke checks and tests. The seed is
//! pure data: writing it twice produces byte-identical files. The rows are
//! arranged to exercise every engine path: a cold-start user, mixed
//! status casings, yearly commitments, an unparseable date and popularity
//! ties.

use std::fs;
use std::io;
use std::path::Path;

use crate::loader::DatasetPaths;

struct UserSeed {
    id: &'static str,
    name: &'static str,
    status: &'static str,
}

struct PlanSeed {
    id: &'static str,
    name: &'static str,
    price: &'static str,
    auto_renewal: &'static str,
}

struct SubscriptionSeed {
    user_id: &'static str,
    plan_id: &'static str,
    status: &'static str,
    subscription_type: &'static str,
    start_date: &'static str,
    last_billed_date: &'static str,
    last_renewed_date: &'static str,
}

const USER_SEEDS: &[UserSeed] = &[
    UserSeed { id: "U001", name: "Ava Laurent", status: "active" },
    UserSeed { id: "U002", name: "Ben Okafor", status: "active" },
    UserSeed { id: "U003", name: "Cleo Marsh", status: "active" },
    UserSeed { id: "U004", name: "Dev Patel", status: "inactive" },
    UserSeed { id: "U005", name: "Elle Nguyen", status: "active" },
    UserSeed { id: "U006", name: "Finn Halvorsen", status: "active" },
    UserSeed { id: "U007", name: "Gus Ferreira", status: "active" },
    UserSeed { id: "U008", name: "Hana Sato", status: "active" },
];

const PLAN_SEEDS: &[PlanSeed] = &[
    PlanSeed { id: "P001", name: "Starter", price: "19.99", auto_renewal: "Yes" },
    PlanSeed { id: "P002", name: "Basic", price: "34.99", auto_renewal: "No" },
    PlanSeed { id: "P003", name: "Standard", price: "49.99", auto_renewal: "Yes" },
    PlanSeed { id: "P004", name: "Plus", price: "59.99", auto_renewal: "Yes" },
    PlanSeed { id: "P005", name: "Premium", price: "79.99", auto_renewal: "Yes" },
    PlanSeed { id: "P006", name: "Ultimate", price: "99.99", auto_renewal: "No" },
];

// U006 deliberately has no rows (cold-start profile); one row keeps the
// uppercase PAUSED casing and one date is unparseable on purpose.
const SUBSCRIPTION_SEEDS: &[SubscriptionSeed] = &[
    SubscriptionSeed {
        user_id: "U001",
        plan_id: "P001",
        status: "active",
        subscription_type: "monthly",
        start_date: "2024-01-15",
        last_billed_date: "2024-06-15",
        last_renewed_date: "2024-06-15",
    },
    SubscriptionSeed {
        user_id: "U001",
        plan_id: "P003",
        status: "active",
        subscription_type: "monthly",
        start_date: "2024-03-01 09:30:00",
        last_billed_date: "2024-06-01",
        last_renewed_date: "",
    },
    SubscriptionSeed {
        user_id: "U002",
        plan_id: "P001",
        status: "active",
        subscription_type: "monthly",
        start_date: "2023-11-20",
        last_billed_date: "2024-06-20",
        last_renewed_date: "2024-05-20",
    },
    SubscriptionSeed {
        user_id: "U002",
        plan_id: "P002",
        status: "PAUSED",
        subscription_type: "monthly",
        start_date: "2024-02-02",
        last_billed_date: "2024-04-02",
        last_renewed_date: "n/a",
    },
    SubscriptionSeed {
        user_id: "U003",
        plan_id: "P005",
        status: "active",
        subscription_type: "yearly",
        start_date: "2023-07-01",
        last_billed_date: "2024-07-01",
        last_renewed_date: "2024-07-01",
    },
    SubscriptionSeed {
        user_id: "U003",
        plan_id: "P003",
        status: "active",
        subscription_type: "yearly",
        start_date: "2023-09-12",
        last_billed_date: "2024-06-12",
        last_renewed_date: "2024-06-12",
    },
    SubscriptionSeed {
        user_id: "U004",
        plan_id: "P003",
        status: "active",
        subscription_type: "monthly",
        start_date: "2024-04-18",
        last_billed_date: "2024-06-18",
        last_renewed_date: "",
    },
    SubscriptionSeed {
        user_id: "U004",
        plan_id: "P004",
        status: "PAUSED",
        subscription_type: "monthly",
        start_date: "2023-12-05",
        last_billed_date: "2024-03-05",
        last_renewed_date: "2024-02-05",
    },
    SubscriptionSeed {
        user_id: "U005",
        plan_id: "P002",
        status: "active",
        subscription_type: "monthly",
        start_date: "2024-05-25",
        last_billed_date: "2024-06-25",
        last_renewed_date: "",
    },
    SubscriptionSeed {
        user_id: "U007",
        plan_id: "P005",
        status: "active",
        subscription_type: "yearly",
        start_date: "2022-08-30",
        last_billed_date: "2024-06-30",
        last_renewed_date: "2023-08-30",
    },
    SubscriptionSeed {
        user_id: "U007",
        plan_id: "P006",
        status: "cancelled",
        subscription_type: "yearly",
        start_date: "2021-03-14",
        last_billed_date: "2022-03-14",
        last_renewed_date: "2022-03-14",
    },
    SubscriptionSeed {
        user_id: "U008",
        plan_id: "P001",
        status: "PAUSED",
        subscription_type: "monthly",
        start_date: "2023-10-09",
        last_billed_date: "2024-01-09",
        last_renewed_date: "",
    },
    SubscriptionSeed {
        user_id: "U008",
        plan_id: "P003",
        status: "active",
        subscription_type: "monthly",
        start_date: "2024-02-14",
        last_billed_date: "2024-06-14",
        last_renewed_date: "2024-06-14",
    },
    SubscriptionSeed {
        user_id: "U008",
        plan_id: "P004",
        status: "active",
        subscription_type: "yearly",
        start_date: "2023-06-22",
        last_billed_date: "2024-06-22",
        last_renewed_date: "2024-06-22",
    },
];

const BILLING_ROWS: &[(&str, &str)] = &[
    ("19.99", "paid"),
    ("49.99", "paid"),
    ("19.99", "paid"),
    ("34.99", "failed"),
    ("79.99", "paid"),
    ("49.99", "paid"),
    ("59.99", "pending"),
    ("34.99", "paid"),
    ("79.99", "paid"),
    ("49.99", "failed"),
];

const LOG_ROWS: &[(&str, &str, &str, &str)] = &[
    ("U001", "P001", "New Subscription", "2024-01-15"),
    ("U002", "P002", "Auto-renewal Disabled", "2024-03-02"),
    ("U003", "P005", "Payment Successful", "2024-07-01"),
    ("U004", "P004", "Plan Downgraded", "2024-03-05"),
    ("U007", "P006", "Payment Failed", "2022-03-10"),
    ("U008", "P004", "Plan Upgraded", "2023-06-22"),
];

/// Row counts of the written seed, reported back to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub subscriptions: usize,
    pub plans: usize,
    pub billing_rows: usize,
    pub log_rows: usize,
}

/// Write the demo exports into `dir` (created if absent) and return the
/// resolved paths plus row counts. Overwrites any previous seed.
pub fn write_demo_dataset(dir: &Path) -> io::Result<(DatasetPaths, SeedSummary)> {
    fs::create_dir_all(dir)?;

    let paths = DatasetPaths {
        users: dir.join("User_Data.csv"),
        subscriptions: dir.join("Subscriptions.csv"),
        plans: dir.join("Subscription_Plans.csv"),
        billing: dir.join("Billing_Information.csv"),
        logs: dir.join("Subscription_Logs.csv"),
    };

    let mut users = String::from("User Id,Name,Status\n");
    for seed in USER_SEEDS {
        users.push_str(&format!("{},{},{}\n", seed.id, seed.name, seed.status));
    }
    fs::write(&paths.users, users)?;

    let mut subscriptions = String::from(
        "User Id,Product Id,Status,Subscription Type,Start Date,Last Billed Date,Last Renewed Date\n",
    );
    for seed in SUBSCRIPTION_SEEDS {
        subscriptions.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            seed.user_id,
            seed.plan_id,
            seed.status,
            seed.subscription_type,
            seed.start_date,
            seed.last_billed_date,
            seed.last_renewed_date,
        ));
    }
    fs::write(&paths.subscriptions, subscriptions)?;

    let mut plans = String::from("Product Id,Name,Price,Auto Renewal Allowed\n");
    for seed in PLAN_SEEDS {
        plans.push_str(&format!(
            "{},{},{},{}\n",
            seed.id, seed.name, seed.price, seed.auto_renewal
        ));
    }
    fs::write(&paths.plans, plans)?;

    let mut billing = String::from("amount,payment_status\n");
    for (amount, status) in BILLING_ROWS {
        billing.push_str(&format!("{amount},{status}\n"));
    }
    fs::write(&paths.billing, billing)?;

    let mut logs = String::from("User Id,Product Id,Action,Timestamp\n");
    for (user_id, plan_id, action, timestamp) in LOG_ROWS {
        logs.push_str(&format!("{user_id},{plan_id},{action},{timestamp}\n"));
    }
    fs::write(&paths.logs, logs)?;

    let summary = SeedSummary {
        users: USER_SEEDS.len(),
        subscriptions: SUBSCRIPTION_SEEDS.len(),
        plans: PLAN_SEEDS.len(),
        billing_rows: BILLING_ROWS.len(),
        log_rows: LOG_ROWS.len(),
    };

    Ok((paths, summary))
}
