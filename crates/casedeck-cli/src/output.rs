//! Terminal rendering.

use casedeck_core::ai_config::AiConfiguration;
use casedeck_core::notification::{Notification, NotificationLevel};
use casedeck_core::session::Session;
use casedeck_core::test_case::TestCase;
use chrono::Local;
use colored::Colorize;

pub fn print_notification(notification: &Notification) {
    let line = notification.message.as_str();
    match notification.level {
        NotificationLevel::Success => println!("{} {}", "✓".green(), line.green()),
        NotificationLevel::Info => println!("{} {}", "i".blue(), line),
        NotificationLevel::Warning => eprintln!("{} {}", "!".yellow(), line.yellow()),
        NotificationLevel::Error => eprintln!("{} {}", "✗".red(), line.red()),
    }
}

pub fn print_sessions(sessions: &[Session], active_id: Option<&str>) {
    if sessions.is_empty() {
        println!("{}", "No sessions yet".bright_black());
        return;
    }
    for session in sessions {
        let marker = if Some(session.id.as_str()) == active_id {
            "*".bright_green().to_string()
        } else {
            " ".to_string()
        };
        let created = session.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        println!(
            "{} {}  {}  {}",
            marker,
            session.id.bright_black(),
            created.to_string().bright_black(),
            session.title.bold()
        );
    }
}

pub fn print_test_cases(cases: &[&TestCase], total: usize) {
    if cases.is_empty() {
        println!("{}", "No matching test cases".bright_black());
        return;
    }
    for case in cases {
        println!(
            "{}  {:<6} {:<13} {:<7}  {}",
            case.id.bright_black(),
            case.case_level.as_str(),
            case.case_type.as_str(),
            case.status.as_str(),
            case.title.bold()
        );
        if let Some(group) = &case.group_name {
            println!("      {} {}", "group:".bright_black(), group);
        }
    }
    println!(
        "{}",
        format!("{} of {} test cases", cases.len(), total).bright_black()
    );
}

pub fn print_groups(groups: &[&str]) {
    if groups.is_empty() {
        println!("{}", "No groups yet".bright_black());
        return;
    }
    for group in groups {
        println!("{group}");
    }
}

pub fn print_test_case_detail(case: &TestCase) {
    println!("{} {}", case.title.bold(), format!("({})", case.id).bright_black());
    let optional = [
        ("Group", &case.group_name),
        ("Maintainer", &case.maintainer),
        ("Precondition", &case.precondition),
        ("Steps", &case.step_description),
        ("Expected", &case.expected_result),
        ("Suggestions", &case.test_suggestions),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("{}", format!("{label}:").bright_black());
            for line in value.lines() {
                println!("  {line}");
            }
        }
    }
    println!(
        "{} {}  {} {}  {} {}  {} {} min",
        "Level:".bright_black(),
        case.case_level,
        "Type:".bright_black(),
        case.case_type,
        "Status:".bright_black(),
        case.status,
        "Time:".bright_black(),
        case.execution_time_minutes
    );
}

pub fn print_ai_configurations(configs: &[AiConfiguration]) {
    if configs.is_empty() {
        println!("{}", "No AI configurations".bright_black());
        return;
    }
    for config in configs {
        let state = if config.is_active {
            "active".green().to_string()
        } else {
            "inactive".bright_black().to_string()
        };
        println!(
            "{}  {} / {}  {}  {}  [{}]",
            config.id.bright_black(),
            config.provider.bold(),
            config.model_name,
            config.api_endpoint,
            config.masked_api_key(),
            state
        );
    }
}
