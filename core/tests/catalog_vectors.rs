//! Verify every catalog builder against JSON vectors stored in `test-vectors/`.
//!
//! Each case names an operation, its input and the request it must produce.
//! Bodies are compared as parsed JSON so field order does not matter.

use std::collections::HashSet;

use console_core::catalog;
use console_core::{HttpMethod, HttpRequest, Operation};
use serde_json::Value;

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn from<T: serde::de::DeserializeOwned>(input: &Value) -> T {
    serde_json::from_value(input.clone()).unwrap()
}

fn opt_u32(input: &Value, key: &str) -> Option<u32> {
    input[key].as_u64().map(|n| n as u32)
}

/// Dispatch one vector case to its builder.
fn build(operation: &str, input: &Value) -> HttpRequest {
    match operation {
        "get_all_notice_configs" => catalog::get_all_notice_configs(),
        "get_notice_channels" => catalog::get_notice_channels(),
        "create_notice_config" => catalog::create_notice_config(&from(input)).unwrap(),
        "update_notice_config" => catalog::update_notice_config(&from(input)).unwrap(),
        "delete_notice_config" => catalog::delete_notice_config(from(input)).unwrap(),
        "test_notice_config" => catalog::test_notice_config(&from(input)).unwrap(),
        "get_all_notification_servers" => catalog::get_all_notification_servers(),
        "get_all_mail_configs" => catalog::get_all_mail_configs(),
        "create_mail_config" => catalog::create_mail_config(&from(input)).unwrap(),
        "update_mail_config" => catalog::update_mail_config(&from(input)).unwrap(),
        "delete_mail_config" => catalog::delete_mail_config(input.as_str().unwrap()).unwrap(),
        "test_single_mail_config" => catalog::test_single_mail_config(&from(input)).unwrap(),
        "run_schedule" => catalog::run_schedule(),
        "get_all_email_servers" => catalog::get_all_email_servers(),
        "get_email_records" => catalog::get_email_records(console_core::EmailRecordQuery {
            limit: opt_u32(input, "limit"),
            offset: opt_u32(input, "offset"),
        }),
        "get_email_by_id" => catalog::get_email_by_id(from(input)),
        "create_email_record" => catalog::create_email_record(&from(input)).unwrap(),
        "update_email_record" => {
            catalog::update_email_record(from(&input["email_id"]), &from(&input["update"])).unwrap()
        }
        "delete_email_record" => catalog::delete_email_record(from(input)),
        "get_email_statistics" => catalog::get_email_statistics(),
        "search_email_records" => catalog::search_email_records(&from(input)).unwrap(),
        "get_recent_emails" => catalog::get_recent_emails(from(input)),
        "get_emails_by_sent_status" => catalog::get_emails_by_sent_status(
            input["sent"].as_bool().unwrap(),
            opt_u32(input, "limit"),
        ),
        "get_emails_by_recipient" => catalog::get_emails_by_recipient(
            input["recipient"].as_str().unwrap(),
            opt_u32(input, "limit"),
        ),
        "send_email_manual" => catalog::send_email_manual(from(input)).unwrap(),
        "send_emails_batch" => catalog::send_emails_batch(&from::<Vec<i64>>(input)).unwrap(),
        "login" => catalog::login(input.as_str().unwrap()).unwrap(),
        other => panic!("no builder for operation: {other}"),
    }
}

#[test]
fn catalog_test_vectors() {
    let raw = include_str!("../../test-vectors/catalog.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let mut covered = HashSet::new();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["operation"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(name, &case["input"]);

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");

        let expected_query: Vec<(String, String)> = from(&expected["query"]);
        assert_eq!(req.query, expected_query, "{name}: query");

        match expected["body"] {
            Value::Null => {
                assert!(req.body.is_none(), "{name}: body should be None");
                assert!(req.headers.is_empty(), "{name}: no headers without a body");
            }
            ref body => {
                let actual: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&actual, body, "{name}: body");
                assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content type");
            }
        }

        // the table and the builder agree
        let op = Operation::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .unwrap_or_else(|| panic!("{name}: not in Operation::ALL"));
        assert_eq!(op.endpoint().method, req.method, "{name}: table method");

        covered.insert(name.to_string());
    }

    let all: HashSet<String> = Operation::ALL.iter().map(|op| op.name().to_string()).collect();
    assert_eq!(covered, all, "every operation has a vector");
}
