use casedeck_core::test_case::TestCase;
use casedeck_infrastructure::spreadsheet::{SheetRow, Worksheet};

pub const SHEET_NAME: &str = "Test Cases";

pub const HEADERS: [&str; 8] = [
    "Title*",
    "Group",
    "Maintainer",
    "Precondition",
    "Steps",
    "Expected Result",
    "Level",
    "Type",
];

/// Column widths in character units.
pub const COLUMN_WIDTHS: [f64; 8] = [30.0, 25.0, 15.0, 30.0, 40.0, 40.0, 10.0, 12.0];

/// Rows before the first data row: rules, headers, example.
pub const LEADING_ROWS: usize = 3;

const RULES_ROW_HEIGHT: f64 = 20.0;
const HEADER_ROW_HEIGHT: f64 = 16.0;
const EXAMPLE_ROW_HEIGHT: f64 = 16.0;
const DATA_ROW_HEIGHT: f64 = 14.0;

const RULES: [&str; 3] = [
    "Keep the rules and example rows",
    "Group, maintainer, type and level must match existing values",
    "Incorrect values will fail the import",
];

const EXAMPLE_STEPS: &str = "[1] Show pending tasks\n[2] Open task details";

const EXAMPLE: [&str; 8] = [
    "(example, keep) To-do list test",
    "Web|Home|My to-do",
    "Wang",
    "There are pending tasks in My to-do",
    EXAMPLE_STEPS,
    EXAMPLE_STEPS,
    "Medium",
    "Functional",
];

fn rules_row() -> SheetRow {
    let cells = RULES
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::repeat_n(String::new(), HEADERS.len() - RULES.len()));
    SheetRow::new(cells).with_height(RULES_ROW_HEIGHT)
}

fn data_row(case: &TestCase) -> SheetRow {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();
    SheetRow::new([
        case.title.clone(),
        text(&case.group_name),
        text(&case.maintainer),
        text(&case.precondition),
        text(&case.step_description),
        text(&case.expected_result),
        case.case_level.as_str().to_string(),
        case.case_type.as_str().to_string(),
    ])
    .with_height(DATA_ROW_HEIGHT)
}

/// Lays out `cases` under the three leading template rows, in input order.
pub fn build_worksheet<'a, I>(cases: I) -> Worksheet
where
    I: IntoIterator<Item = &'a TestCase>,
{
    let mut rows = vec![
        rules_row(),
        SheetRow::new(HEADERS).with_height(HEADER_ROW_HEIGHT),
        SheetRow::new(EXAMPLE).with_height(EXAMPLE_ROW_HEIGHT),
    ];
    rows.extend(cases.into_iter().map(data_row));

    Worksheet {
        name: SHEET_NAME.to_string(),
        column_widths: COLUMN_WIDTHS.to_vec(),
        rows,
    }
}
