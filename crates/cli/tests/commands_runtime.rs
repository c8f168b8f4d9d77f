use std::env;
use std::sync::{Mutex, OnceLock};

use planwise_cli::commands::{doctor, explain, overview, plans, popular, profile, recommend, seed};
use serde_json::Value;
use tempfile::TempDir;

fn seeded_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let result = seed::run(Some(dir.path().to_path_buf()));
    assert_eq!(result.exit_code, 0, "seed should succeed: {}", result.output);
    dir
}

#[test]
fn seed_then_doctor_reports_all_checks_passing() {
    with_env(|| {
        let dir = seeded_dir();

        let output = doctor::run(Some(dir.path().to_path_buf()), true);
        let report: Value = serde_json::from_str(&output).expect("doctor JSON");
        assert_eq!(report["overall_status"], "pass", "doctor output: {output}");
        assert_eq!(report["checks"][1]["name"], "data_files");
        assert_eq!(report["checks"][1]["status"], "pass");
    });
}

#[test]
fn doctor_fails_readably_when_data_is_missing() {
    with_env(|| {
        let dir = TempDir::new().expect("tempdir");

        let output = doctor::run(Some(dir.path().to_path_buf()), true);
        let report: Value = serde_json::from_str(&output).expect("doctor JSON");
        assert_eq!(report["overall_status"], "fail");

        let human = doctor::run(Some(dir.path().to_path_buf()), false);
        assert!(human.contains("[fail] data_files"), "human output: {human}");
    });
}

#[test]
fn recommend_excludes_currently_held_plans() {
    with_env(|| {
        let dir = seeded_dir();

        let result =
            recommend::run(Some(dir.path().to_path_buf()), "U001".to_string(), Some(3), "hybrid");
        assert_eq!(result.exit_code, 0, "output: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        let data = payload["data"].as_array().expect("data array");
        assert!(!data.is_empty());
        assert!(data.len() <= 3);
        // U001 actively holds P001 and P003 in the seed.
        for entry in data {
            let plan_id = entry["plan_id"].as_str().expect("plan id");
            assert_ne!(plan_id, "P001");
            assert_ne!(plan_id, "P003");
        }
    });
}

#[test]
fn recommend_for_unknown_user_falls_back_to_popular_plans() {
    with_env(|| {
        let dir = seeded_dir();

        let result =
            recommend::run(Some(dir.path().to_path_buf()), "GHOST".to_string(), None, "content");
        assert_eq!(result.exit_code, 0, "fallback must not be an error");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        assert!(payload["message"].as_str().unwrap_or("").contains("popular"));
        let data = payload["data"].as_array().expect("data array");
        // Popularity fallback carries the fixed placeholder score.
        for entry in data {
            assert_eq!(entry["score"].as_f64(), Some(0.8));
        }
    });
}

#[test]
fn recommend_rejects_unknown_strategies() {
    with_env(|| {
        let result = recommend::run(None, "U001".to_string(), None, "telepathy");
        assert_eq!(result.exit_code, 1);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_strategy");
    });
}

#[test]
fn recommend_fails_with_data_load_error_when_files_are_absent() {
    with_env(|| {
        let dir = TempDir::new().expect("tempdir");

        let result =
            recommend::run(Some(dir.path().to_path_buf()), "U001".to_string(), None, "hybrid");
        assert_eq!(result.exit_code, 3, "output: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "data_load");
        assert!(payload["message"].as_str().unwrap_or("").contains("missing"));
    });
}

#[test]
fn explain_always_returns_at_least_one_reason() {
    with_env(|| {
        let dir = seeded_dir();

        let result = explain::run(
            Some(dir.path().to_path_buf()),
            "U003".to_string(),
            "P006".to_string(),
        );
        assert_eq!(result.exit_code, 0);
        let payload = parse_payload(&result.output);
        let reasons = payload["data"].as_array().expect("reasons array");
        assert!(!reasons.is_empty());

        // Unknown user and unknown plan both resolve to the generic reason.
        let fallback = explain::run(
            Some(dir.path().to_path_buf()),
            "GHOST".to_string(),
            "NOPE".to_string(),
        );
        assert_eq!(fallback.exit_code, 0);
        let payload = parse_payload(&fallback.output);
        let reasons = payload["data"].as_array().expect("reasons array");
        assert_eq!(reasons.len(), 1);
    });
}

#[test]
fn popular_ranks_the_most_subscribed_seed_plan_first() {
    with_env(|| {
        let dir = seeded_dir();

        let result = popular::run(Some(dir.path().to_path_buf()), Some(3));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let data = payload["data"].as_array().expect("data array");
        // P003 carries four seed subscriptions, more than any other plan.
        assert_eq!(data[0]["plan_id"].as_str(), Some("P003"));
    });
}

#[test]
fn profile_reports_unknown_users_with_a_dedicated_exit_code() {
    with_env(|| {
        let dir = seeded_dir();

        let known = profile::run(Some(dir.path().to_path_buf()), "U006".to_string());
        assert_eq!(known.exit_code, 0);
        let payload = parse_payload(&known.output);
        // U006 is the cold-start seed user.
        assert_eq!(payload["data"]["total_subscriptions"].as_u64(), Some(0));
        assert_eq!(payload["data"]["avg_price_preference"].as_f64(), Some(50.0));

        let unknown = profile::run(Some(dir.path().to_path_buf()), "GHOST".to_string());
        assert_eq!(unknown.exit_code, 4);
        let payload = parse_payload(&unknown.output);
        assert_eq!(payload["error_class"], "unknown_user");
    });
}

#[test]
fn plans_filters_and_sorts_the_catalog() {
    with_env(|| {
        let dir = seeded_dir();

        let result = plans::run(
            Some(dir.path().to_path_buf()),
            Some(30.0),
            Some(60.0),
            None,
            "price-asc",
        );
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let ids: Vec<&str> = payload["data"]
            .as_array()
            .expect("data array")
            .iter()
            .map(|entry| entry["plan_id"].as_str().expect("plan id"))
            .collect();
        assert_eq!(ids, vec!["P002", "P003", "P004"]);

        let invalid =
            plans::run(Some(dir.path().to_path_buf()), None, None, None, "alphabetical");
        assert_eq!(invalid.exit_code, 1);
        assert_eq!(parse_payload(&invalid.output)["error_class"], "invalid_sort");
    });
}

#[test]
fn overview_summarizes_the_seed_population() {
    with_env(|| {
        let dir = seeded_dir();

        let result = overview::run(Some(dir.path().to_path_buf()));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["summary"]["total_users"].as_u64(), Some(8));
        assert_eq!(payload["data"]["summary"]["total_plans"].as_u64(), Some(6));
        let success_rate =
            payload["data"]["revenue"]["payment_success_rate"].as_f64().expect("rate");
        assert!((success_rate - 0.7).abs() < 1e-9);
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "PLANWISE_DATA_DIR",
        "PLANWISE_DATA_USERS_FILE",
        "PLANWISE_DATA_SUBSCRIPTIONS_FILE",
        "PLANWISE_DATA_PLANS_FILE",
        "PLANWISE_DATA_BILLING_FILE",
        "PLANWISE_DATA_LOGS_FILE",
        "PLANWISE_ENGINE_DEFAULT_TOP_N",
        "PLANWISE_LOGGING_LEVEL",
        "PLANWISE_LOGGING_FORMAT",
        "PLANWISE_LOG_LEVEL",
        "PLANWISE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
