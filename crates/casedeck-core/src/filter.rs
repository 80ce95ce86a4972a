//! Multi-predicate filter over a test-case collection.
//!
//! Filtering is pure and order-preserving, so it can be re-run on every
//! keystroke. The input is never mutated; the result borrows from it.

use serde::{Deserialize, Serialize};

use crate::test_case::{CaseLevel, CaseStatus, CaseType, TestCase};

/// The filter controls of the test-case view.
///
/// A case passes iff every set predicate holds. An empty `search` matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub level: Option<CaseLevel>,
    #[serde(default)]
    pub case_type: Option<CaseType>,
    #[serde(default)]
    pub status: Option<CaseStatus>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_level(mut self, level: CaseLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_type(mut self, case_type: CaseType) -> Self {
        self.case_type = Some(case_type);
        self
    }

    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.level.is_none()
            && self.case_type.is_none()
            && self.status.is_none()
    }

    /// Returns the cases that pass every predicate, in input order.
    pub fn apply<'a, I>(&self, cases: I) -> Vec<&'a TestCase>
    where
        I: IntoIterator<Item = &'a TestCase>,
    {
        let matcher = Matcher::new(self);
        cases.into_iter().filter(|case| matcher.matches(case)).collect()
    }

    /// Evaluates the predicates against a single case.
    pub fn matches(&self, case: &TestCase) -> bool {
        Matcher::new(self).matches(case)
    }
}

/// Criteria with the search needle lower-cased once.
struct Matcher<'c> {
    criteria: &'c FilterCriteria,
    needle: Option<String>,
}

impl<'c> Matcher<'c> {
    fn new(criteria: &'c FilterCriteria) -> Self {
        let needle = (!criteria.search.is_empty()).then(|| criteria.search.to_lowercase());
        Self { criteria, needle }
    }

    fn matches(&self, case: &TestCase) -> bool {
        self.matches_search(case)
            && self.criteria.level.is_none_or(|level| case.case_level == level)
            && self.criteria.case_type.is_none_or(|kind| case.case_type == kind)
            && self.criteria.status.is_none_or(|status| case.status == status)
    }

    fn matches_search(&self, case: &TestCase) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };
        [
            Some(case.title.as_str()),
            case.group_name.as_deref(),
            case.maintainer.as_deref(),
            case.precondition.as_deref(),
            case.step_description.as_deref(),
            case.expected_result.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle.as_str()))
    }
}

/// Filters `test_cases` by the four view controls.
///
/// Shorthand for building a [`FilterCriteria`] and calling [`FilterCriteria::apply`].
pub fn filter<'a>(
    test_cases: &'a [TestCase],
    search: &str,
    level: Option<CaseLevel>,
    case_type: Option<CaseType>,
    status: Option<CaseStatus>,
) -> Vec<&'a TestCase> {
    FilterCriteria {
        search: search.to_string(),
        level,
        case_type,
        status,
    }
    .apply(test_cases)
}

/// Distinct, non-empty group names in first-seen order.
pub fn distinct_groups(test_cases: &[TestCase]) -> Vec<&str> {
    let mut groups: Vec<&str> = Vec::new();
    for group in test_cases
        .iter()
        .filter_map(|case| case.group_name.as_deref())
        .filter(|group| !group.is_empty())
    {
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    groups
}
