mod support;

use std::io::{Cursor, Read};

use casedeck_application::export::{HEADERS, LEADING_ROWS};
use casedeck_application::{ExportOutcome, Notifier, SpreadsheetExporter};
use casedeck_core::filter::FilterCriteria;
use casedeck_core::test_case::{CaseLevel, CaseType, TestCase};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use regex::Regex;
use support::{Harness, session, test_case};
use tempfile::TempDir;

/// Reads the cell texts of the first worksheet, row by row.
fn read_rows(bytes: &[u8]) -> Vec<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    let row_re = Regex::new(r#"(?s)<row r="\d+"[^>]*>(.*?)</row>"#).unwrap();
    let cell_re = Regex::new(r#"(?s)<t xml:space="preserve">(.*?)</t>"#).unwrap();
    let ooxml_re = Regex::new(r"_x([0-9A-Fa-f]{4})_").unwrap();

    row_re
        .captures_iter(&xml)
        .map(|row| {
            cell_re
                .captures_iter(&row[1])
                .map(|cell| {
                    let unescaped = quick_xml::escape::unescape(&cell[1]).unwrap();
                    ooxml_re
                        .replace_all(&unescaped, |caps: &regex::Captures| {
                            let code = u32::from_str_radix(&caps[1], 16).unwrap();
                            char::from_u32(code).unwrap().to_string()
                        })
                        .into_owned()
                })
                .collect()
        })
        .collect()
}

fn exported(cases: &[TestCase], title: &str) -> (String, Vec<Vec<String>>) {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    match SpreadsheetExporter::export_at(cases, title, now).unwrap() {
        ExportOutcome::Exported(file) => {
            assert_eq!(file.row_count, cases.len());
            let rows = read_rows(&file.bytes);
            (file.filename, rows)
        }
        ExportOutcome::AbortedEmpty => panic!("expected a file"),
    }
}

#[test]
fn test_export_empty_aborts() {
    let exporter = SpreadsheetExporter::new(Notifier::new());
    let outcome = exporter.export(&[], "Session A").unwrap();
    assert_eq!(outcome, ExportOutcome::AbortedEmpty);
}

#[test]
fn test_export_layout_and_order() {
    let mut login = test_case("c1", "s1", "Login");
    login.group_name = Some("Web|Account".to_string());
    login.maintainer = Some("Li".to_string());
    login.step_description = Some("[1] Open login page\n[2] Submit credentials".to_string());
    login.expected_result = Some("[1] Form shown\n[2] Dashboard shown".to_string());
    login.case_level = CaseLevel::High;
    let mut logout = test_case("c2", "s1", "Logout");
    logout.case_type = CaseType::Interface;

    let (filename, rows) = exported(&[login, logout], "Session A");

    assert_eq!(filename, "test_cases_Session A_20240501083000000.xlsx");
    assert_eq!(rows.len(), LEADING_ROWS + 2);
    assert_eq!(rows[0][0], "Keep the rules and example rows");
    assert_eq!(rows[1], HEADERS.to_vec());
    assert_eq!(rows[2][0], "(example, keep) To-do list test");
    assert_eq!(
        rows[3],
        vec![
            "Login",
            "Web|Account",
            "Li",
            "",
            "[1] Open login page\n[2] Submit credentials",
            "[1] Form shown\n[2] Dashboard shown",
            "High",
            "Functional",
        ]
    );
    assert_eq!(
        rows[4],
        vec!["Logout", "", "", "", "", "", "Medium", "Interface"]
    );
}

#[test]
fn test_reserved_characters_roundtrip() {
    let mut case = test_case("c1", "s1", "A <b> & \"c\" 'd'");
    case.precondition = Some("line1\r\nline2\ttab".to_string());
    case.step_description = Some("literal _x0041_ and bell \u{7}".to_string());
    case.expected_result = Some("登录成功 | ok".to_string());
    case.group_name = Some("a\u{FFFE}b\u{FFFF}".to_string());

    let (_, rows) = exported(std::slice::from_ref(&case), "Session A");

    assert_eq!(rows[3][0], "A <b> & \"c\" 'd'");
    assert_eq!(rows[3][3], "line1\r\nline2\ttab");
    assert_eq!(rows[3][4], "literal _x0041_ and bell \u{7}");
    assert_eq!(rows[3][5], "登录成功 | ok");
    assert_eq!(rows[3][1], "a\u{FFFE}b\u{FFFF}");
}

#[tokio::test]
async fn test_export_view_writes_filtered_rows() {
    let one = session("s1", "Sprint 1");
    let mut harness = Harness::with_sessions(vec![one.clone()]);
    let mut high = test_case("c1", "s1", "Login");
    high.case_level = CaseLevel::High;
    harness.remote.insert_test_case(high);
    harness.remote.insert_test_case(test_case("c2", "s1", "Logout"));
    harness.store.init().await.unwrap();
    harness.store.switch(Some(&one)).await.unwrap();
    harness.drain_events();

    let dir = TempDir::new().unwrap();
    let exporter = SpreadsheetExporter::new(harness.cache.notifier().clone());
    let criteria = FilterCriteria::new().with_level(CaseLevel::High);
    let path = exporter
        .export_view(&harness.store, &criteria, dir.path())
        .await
        .unwrap()
        .unwrap();

    let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("test_cases_Sprint 1_"));
    assert!(file_name.ends_with(".xlsx"));
    let rows = read_rows(&std::fs::read(&path).unwrap());
    assert_eq!(rows.len(), LEADING_ROWS + 1);
    assert_eq!(rows[3][0], "Login");
    assert_eq!(
        harness.drain_messages(),
        vec!["Exported 1 test cases".to_string()]
    );
}

#[tokio::test]
async fn test_export_view_with_nothing_visible_warns() {
    let one = session("s1", "Sprint 1");
    let mut harness = Harness::with_sessions(vec![one.clone()]);
    harness.remote.insert_test_case(test_case("c1", "s1", "Login"));
    harness.store.init().await.unwrap();
    harness.store.switch(Some(&one)).await.unwrap();
    harness.drain_events();

    let dir = TempDir::new().unwrap();
    let exporter = SpreadsheetExporter::new(harness.cache.notifier().clone());
    let criteria = FilterCriteria::new().with_search("no such case");
    let written = exporter
        .export_view(&harness.store, &criteria, dir.path())
        .await
        .unwrap();

    assert!(written.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(harness.drain_messages(), vec!["Nothing to export".to_string()]);
}

#[tokio::test]
async fn test_export_view_requires_active_session() {
    let harness = Harness::with_sessions(vec![session("s1", "Sprint 1")]);
    harness.store.init().await.unwrap();

    let dir = TempDir::new().unwrap();
    let exporter = SpreadsheetExporter::new(Notifier::new());
    let err = exporter
        .export_view(&harness.store, &FilterCriteria::new(), dir.path())
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

fn arb_text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z0-9 <>&\"'|_\\r\\n\\t\\x01\\x1F中文]{0,20}")
}

fn arb_case() -> impl Strategy<Value = TestCase> {
    (
        "[a-zA-Z0-9 <>&_中]{1,20}",
        arb_text(),
        arb_text(),
        arb_text(),
        arb_text(),
        arb_text(),
        proptest::sample::select(CaseLevel::ALL.to_vec()),
        proptest::sample::select(CaseType::ALL.to_vec()),
    )
        .prop_map(
            |(title, group, maintainer, precondition, steps, expected, level, kind)| {
                let mut case = test_case("c", "s1", &title);
                case.group_name = group;
                case.maintainer = maintainer;
                case.precondition = precondition;
                case.step_description = steps;
                case.expected_result = expected;
                case.case_level = level;
                case.case_type = kind;
                case
            },
        )
}

proptest! {
    #[test]
    fn prop_row_count_matches_input(cases in proptest::collection::vec(arb_case(), 1..12)) {
        let (_, rows) = exported(&cases, "Session A");
        prop_assert_eq!(rows.len(), LEADING_ROWS + cases.len());

        for (row, case) in rows[LEADING_ROWS..].iter().zip(&cases) {
            prop_assert_eq!(&row[0], &case.title);
            prop_assert_eq!(&row[1], &case.group_name.clone().unwrap_or_default());
            prop_assert_eq!(&row[3], &case.precondition.clone().unwrap_or_default());
            prop_assert_eq!(&row[4], &case.step_description.clone().unwrap_or_default());
            prop_assert_eq!(&row[6], case.case_level.as_str());
        }
    }
}
