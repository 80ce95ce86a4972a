use anyhow::{Context, Result};
use casedeck_core::filter::{FilterCriteria, distinct_groups};
use casedeck_core::test_case::{CaseLevel, CaseStatus, CaseType, TestCaseDraft, TestCasePatch};
use clap::{Args, Subcommand};

use crate::app::App;
use crate::output;

/// Filter controls shared by `case list` and `export`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive text search over title, group, maintainer, precondition, steps and expected result
    #[arg(long, short)]
    pub search: Option<String>,
    /// High, Medium or Low
    #[arg(long)]
    pub level: Option<CaseLevel>,
    /// Functional, Performance, Security, Compatibility or Interface
    #[arg(long = "type")]
    pub case_type: Option<CaseType>,
    /// Pending, Running, Passed, Failed or Blocked
    #[arg(long)]
    pub status: Option<CaseStatus>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: self.search.clone().unwrap_or_default(),
            level: self.level,
            case_type: self.case_type,
            status: self.status,
        }
    }
}

/// Editable test-case fields.
#[derive(Args, Debug, Default)]
pub struct CaseFields {
    #[arg(long)]
    pub group: Option<String>,
    #[arg(long)]
    pub maintainer: Option<String>,
    #[arg(long)]
    pub precondition: Option<String>,
    /// Steps, one per line ("[1] ...\n[2] ...")
    #[arg(long)]
    pub steps: Option<String>,
    #[arg(long)]
    pub expected: Option<String>,
    #[arg(long)]
    pub level: Option<CaseLevel>,
    #[arg(long = "type")]
    pub case_type: Option<CaseType>,
    #[arg(long)]
    pub status: Option<CaseStatus>,
    #[arg(long)]
    pub suggestions: Option<String>,
    /// Estimated execution time in minutes (1-480)
    #[arg(long)]
    pub minutes: Option<u32>,
}

#[derive(Subcommand)]
pub enum CaseAction {
    /// List the active session's test cases
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one test case in full
    Show { id: String },
    /// List the group names used in the active session
    Groups,
    /// Add a test case to the active session
    Create {
        title: String,
        #[command(flatten)]
        fields: CaseFields,
    },
    /// Change fields of a test case
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: CaseFields,
    },
    /// Delete a test case
    Delete { id: String },
}

pub async fn run(app: &mut App, action: CaseAction) -> Result<()> {
    app.init().await?;
    let session = app.require_active_session().await?;

    match action {
        CaseAction::List { filter } => {
            let cases = app
                .store
                .active_test_cases()
                .await?
                .context("Active session changed while loading")?;
            let visible = filter.criteria().apply(&cases);
            output::print_test_cases(&visible, cases.len());
        }
        CaseAction::Groups => {
            let cases = app.cache.test_cases(&session.id).await?;
            output::print_groups(&distinct_groups(&cases));
        }
        CaseAction::Show { id } => {
            let cases = app.cache.test_cases(&session.id).await?;
            let case = cases
                .iter()
                .find(|c| c.id == id)
                .with_context(|| format!("Test case '{id}' not found"))?;
            output::print_test_case_detail(case);
        }
        CaseAction::Create { title, fields } => {
            let mut draft = TestCaseDraft::new(&session.id, title);
            draft.group_name = fields.group;
            draft.maintainer = fields.maintainer;
            draft.precondition = fields.precondition;
            draft.step_description = fields.steps;
            draft.expected_result = fields.expected;
            draft.test_suggestions = fields.suggestions;
            if let Some(level) = fields.level {
                draft.case_level = level;
            }
            if let Some(case_type) = fields.case_type {
                draft.case_type = case_type;
            }
            if let Some(status) = fields.status {
                draft.status = status;
            }
            if let Some(minutes) = fields.minutes {
                draft.execution_time_minutes = minutes;
            }
            let created = app.cache.create_test_case(&draft).await?;
            output::print_test_case_detail(&created);
        }
        CaseAction::Update { id, title, fields } => {
            let patch = TestCasePatch {
                title,
                group_name: fields.group,
                maintainer: fields.maintainer,
                precondition: fields.precondition,
                step_description: fields.steps,
                expected_result: fields.expected,
                case_level: fields.level,
                case_type: fields.case_type,
                status: fields.status,
                test_suggestions: fields.suggestions,
                execution_time_minutes: fields.minutes,
            };
            let updated = app.cache.update_test_case(&session.id, &id, &patch).await?;
            output::print_test_case_detail(&updated);
        }
        CaseAction::Delete { id } => {
            app.cache.delete_test_case(&session.id, &id).await?;
        }
    }
    Ok(())
}
