use std::collections::HashSet;

use advisor_agent::{QuestionRouter, RULES};
use advisor_core::config::{AppConfig, LoadOptions};
use advisor_core::{CaseAnalysis, Topic};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool, options: &LoadOptions) -> String {
    let report = build_report(&CaseAnalysis::default(), options);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(analysis: &CaseAnalysis, options: &LoadOptions) -> DoctorReport {
    let checks = vec![
        check_config(options),
        check_case_consistency(analysis),
        check_break_even(analysis),
        check_rule_table(analysis),
    ];

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all checks passed".to_string()
    } else {
        "doctor: one or more checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_config(options: &LoadOptions) -> DoctorCheck {
    match AppConfig::load(options.clone()) {
        Ok(_) => DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Pass,
            details: "configuration loaded and validated".to_string(),
        },
        Err(error) => DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_case_consistency(analysis: &CaseAnalysis) -> DoctorCheck {
    let case = &analysis.case;
    if let Err(error) = case.validate() {
        return DoctorCheck {
            name: "case_consistency",
            status: CheckStatus::Fail,
            details: error.to_string(),
        };
    }

    let department_total: Decimal =
        case.departments.iter().map(|department| department.annual_labor_cost()).sum();
    if department_total != case.current_labor_cost {
        return DoctorCheck {
            name: "case_consistency",
            status: CheckStatus::Fail,
            details: format!(
                "department labor costs sum to {department_total}, case states {}",
                case.current_labor_cost
            ),
        };
    }

    DoctorCheck {
        name: "case_consistency",
        status: CheckStatus::Pass,
        details: format!(
            "{} departments, {} employees, labor costs reconcile",
            case.departments.len(),
            case.headcount()
        ),
    }
}

fn check_break_even(analysis: &CaseAnalysis) -> DoctorCheck {
    let break_even = analysis.metrics.break_even;
    DoctorCheck {
        name: "break_even",
        status: if break_even.pays_back() { CheckStatus::Pass } else { CheckStatus::Fail },
        details: break_even.describe(),
    }
}

fn check_rule_table(analysis: &CaseAnalysis) -> DoctorCheck {
    let topics = RULES.iter().map(|rule| rule.topic).collect::<HashSet<_>>();
    let router = QuestionRouter::new(analysis.clone());
    let fallback = router.route("").topic;

    if topics.len() != RULES.len() || topics.contains(&Topic::Help) || fallback != Topic::Help {
        return DoctorCheck {
            name: "rule_table",
            status: CheckStatus::Fail,
            details: "rule table must list each topic once and fall back to help".to_string(),
        };
    }

    DoctorCheck {
        name: "rule_table",
        status: CheckStatus::Pass,
        details: format!("{} rules, help fallback", RULES.len()),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
