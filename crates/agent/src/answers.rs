//! Answer templates, one per topic.
//!
//! Every figure is read from `CaseAnalysis`; nothing here recomputes a metric.

use advisor_core::format::{count, one_decimal, signed_count, usd, usd_millions_short};
use advisor_core::metrics::DEFAULT_SHIPMENT_CHANGE_PCT;
use advisor_core::{
    BreakEven, CaseAnalysis, ChartData, ChartMarker, ChartPoint, ChartSeries, ResponsePayload,
    TableData, TableRow, Topic, DEFAULT_HORIZON_YEARS, FTE_ANNUAL_HOURS,
};
use rust_decimal::Decimal;

pub const HELP_TEXT: &str = "I can help answer questions about:
- Current vs automated labor costs
- Break-even analysis
- Employee impact
- Whether to automate
- Risks to consider

Try asking something like:
\"What are the current labor costs?\"
\"How much would we save with automation?\"
\"Should we automate the distribution center?\"";

pub const GREETING_TEXT: &str = "Hello! I can help you analyze the grocery distribution \
automation case study. Ask me about costs, savings, or whether to automate.";

const RISKS_TEXT: &str = "**Potential Risks:**
1. Technology implementation risks
2. Employee morale issues from layoffs
3. Hidden maintenance costs
4. Operational disruption during transition
5. Technology becoming obsolete";

const LONG_TERM_TEXT: &str = "**Long-Term Benefits:**
- Significant operational savings
- Enhanced productivity and throughput
- Reduced dependency on manual labor
- Competitive edge through technology integration
- More scalable operations over time";

const PHASED_TEXT: &str = "**Phased Automation Possibility:**
- A phased rollout can reduce initial risk and financial burden
- Allows time for employee retraining and system adaptation
- May delay full ROI but improve organizational readiness
- Requires more granular planning and modular technology";

const DECREASE_WORDS: &[&str] = &["decrease", "drop", "decline", "fall", "reduc"];

/// Builds the answer for `topic`. `question` must already be lowercased.
pub fn answer(topic: Topic, analysis: &CaseAnalysis, question: &str) -> ResponsePayload {
    match topic {
        Topic::Greeting => ResponsePayload::text(topic, GREETING_TEXT),
        Topic::Costs => costs(analysis, question),
        Topic::Savings => ResponsePayload::text(topic, savings(analysis)),
        Topic::BreakEven => break_even(analysis),
        Topic::Employees => ResponsePayload::text(topic, employees(analysis)),
        Topic::Recommendation => ResponsePayload::text(topic, recommendation(analysis)),
        Topic::Risks => ResponsePayload::text(topic, RISKS_TEXT),
        Topic::KeyNumbers => ResponsePayload::text(
            topic,
            "Here are the key numbers from the case study:",
        )
        .with_table(key_numbers_table(analysis)),
        Topic::Headcount => ResponsePayload::text(topic, headcount(analysis)),
        Topic::Payback => ResponsePayload::text(topic, payback(analysis)),
        Topic::ShippingChange => ResponsePayload::text(topic, shipping_change(analysis)),
        Topic::Maintenance => ResponsePayload::text(topic, maintenance(analysis)),
        Topic::SavingsChart => savings_chart(analysis),
        Topic::Assumptions => ResponsePayload::text(topic, assumptions()),
        Topic::ShipmentVolume => ResponsePayload::text(topic, shipment_volume(analysis, question)),
        Topic::StoreImpact => ResponsePayload::text(topic, store_impact(analysis)),
        Topic::LongTerm => ResponsePayload::text(topic, LONG_TERM_TEXT),
        Topic::Phased => ResponsePayload::text(topic, PHASED_TEXT),
        Topic::Help => ResponsePayload::text(topic, HELP_TEXT),
    }
}

fn costs(analysis: &CaseAnalysis, question: &str) -> ResponsePayload {
    let case = &analysis.case;

    let text = if question.contains("current") {
        let mut lines = vec!["**Current Annual Labor Costs:**".to_string()];
        for department in &case.departments {
            lines.push(format!(
                "- {}: {} employees × ${}/hr = {} per year",
                department.display_name,
                department.employees,
                department.hourly_wage.normalize(),
                usd(department.annual_labor_cost())
            ));
        }
        lines.push(format!("- **Total:** {} per year", usd(case.current_labor_cost)));
        lines.join("\n")
    } else if question.contains("automated") || question.contains("after") {
        let mut lines = vec!["**Labor Costs After Automation:**".to_string()];
        let (changed, unchanged): (Vec<_>, Vec<_>) =
            case.departments.iter().partition(|department| department.headcount_change() != 0);
        for department in changed.into_iter().chain(unchanged) {
            let line = match department.headcount_change() {
                change if change < 0 => format!(
                    "- {} reduced to {} employees (from {})",
                    department.display_name,
                    department.employees_after_automation,
                    department.employees
                ),
                change if change > 0 => format!(
                    "- {} increases to {} employees (from {})",
                    department.display_name,
                    department.employees_after_automation,
                    department.employees
                ),
                _ => format!(
                    "- {} remains at {} employees",
                    department.display_name, department.employees
                ),
            };
            lines.push(line);
        }
        lines.push(format!("- **Total:** {} per year", usd(case.automated_labor_cost)));
        lines.push(format!("- **Savings:** {} per year", usd(analysis.metrics.labor_savings)));
        lines.join("\n")
    } else {
        [
            "**Cost Information:**".to_string(),
            format!("- Current labor costs: {}/year", usd(case.current_labor_cost)),
            format!("- Automated labor costs: {}/year", usd(case.automated_labor_cost)),
            format!("- One-time automation cost: {}", usd(case.automation_cost)),
            format!("- Annual maintenance: {}", usd(case.annual_maintenance)),
        ]
        .join("\n")
    };

    ResponsePayload::text(Topic::Costs, text)
}

fn savings(analysis: &CaseAnalysis) -> String {
    let metrics = &analysis.metrics;
    [
        "**Savings Analysis:**".to_string(),
        format!("- Labor cost reduction: {} per year", usd(metrics.labor_savings)),
        format!("- After maintenance costs: {} net annual savings", usd(metrics.net_savings)),
        format!("- {}", break_even_sentence(&metrics.break_even)),
    ]
    .join("\n")
}

fn break_even(analysis: &CaseAnalysis) -> ResponsePayload {
    let text = [
        "**Break-even Calculation:**".to_string(),
        format!("- One-time cost: {}", usd(analysis.case.automation_cost)),
        format!("- Annual net savings: {}", usd(analysis.metrics.net_savings)),
        format!("- **Break-even point:** {}", analysis.metrics.break_even.describe()),
        String::new(),
        "The chart shows cumulative costs and savings over time.".to_string(),
    ]
    .join("\n");

    let chart = cumulative_chart(
        analysis,
        ChartLabels {
            title: "Break-even Analysis",
            y_label: "Dollars ($)",
            cost_series: "Total Automation Costs",
            savings_series: "Total Labor Savings",
        },
        |years| format!("Break-even ({years} years)"),
    );

    ResponsePayload::text(Topic::BreakEven, text).with_chart(chart)
}

fn savings_chart(analysis: &CaseAnalysis) -> ResponsePayload {
    let text = match analysis.metrics.break_even.years() {
        Some(years) => format!(
            "Here's the cumulative cost vs. savings chart with a break-even point at {} years.",
            one_decimal(years)
        ),
        None => format!(
            "Here's the cumulative cost vs. savings chart; {}.",
            analysis.metrics.break_even.describe()
        ),
    };

    let chart = cumulative_chart(
        analysis,
        ChartLabels {
            title: "Cumulative Cost vs Savings",
            y_label: "USD ($)",
            cost_series: "Cumulative Costs (Automation + Maintenance)",
            savings_series: "Cumulative Labor Savings",
        },
        |years| format!("Break-even: {years} years"),
    );

    ResponsePayload::text(Topic::SavingsChart, text).with_chart(chart)
}

struct ChartLabels {
    title: &'static str,
    y_label: &'static str,
    cost_series: &'static str,
    savings_series: &'static str,
}

fn cumulative_chart(
    analysis: &CaseAnalysis,
    labels: ChartLabels,
    marker_label: impl Fn(String) -> String,
) -> ChartData {
    let positions = analysis.cumulative_projection(DEFAULT_HORIZON_YEARS);

    let cost_points = positions
        .iter()
        .map(|position| ChartPoint { x: position.year, y: position.cumulative_cost })
        .collect();
    let savings_points = positions
        .iter()
        .map(|position| ChartPoint { x: position.year, y: position.cumulative_savings })
        .collect();

    let marker = analysis
        .metrics
        .break_even
        .years()
        .map(|years| ChartMarker { x: years, label: marker_label(one_decimal(years)) });

    ChartData {
        title: labels.title.to_string(),
        x_label: "Years".to_string(),
        y_label: labels.y_label.to_string(),
        series: vec![
            ChartSeries { label: labels.cost_series.to_string(), points: cost_points },
            ChartSeries { label: labels.savings_series.to_string(), points: savings_points },
        ],
        marker,
    }
}

fn employees(analysis: &CaseAnalysis) -> String {
    let case = &analysis.case;
    let mut lines = vec![
        "**Employee Impact:**".to_string(),
        format!("- Current employees: {} total", case.headcount()),
    ];
    for department in &case.departments {
        lines.push(format!("  - {}: {}", department.display_name, department.employees));
    }

    lines.push(format!("- After automation: {} total", case.headcount_after_automation()));
    for department in &case.departments {
        let change = match department.headcount_change() {
            0 => "no change".to_string(),
            change => signed_count(change),
        };
        lines.push(format!(
            "  - {}: {} ({change})",
            department.display_name, department.employees_after_automation
        ));
    }

    let net_change = case.headcount_change();
    lines.push(match net_change {
        change if change < 0 => {
            format!("- **Net reduction:** {} employees", change.unsigned_abs())
        }
        change if change > 0 => format!("- **Net increase:** {change} employees"),
        _ => "- **Net change:** none".to_string(),
    });

    lines.join("\n")
}

fn headcount(analysis: &CaseAnalysis) -> String {
    let case = &analysis.case;
    let net_change = match case.headcount_change() {
        0 => "0".to_string(),
        change => signed_count(change),
    };
    [
        "**Employee Impact Overview:**".to_string(),
        format!("- **Before Automation:** {} employees", case.headcount()),
        format!("- **After Automation:** {} employees", case.headcount_after_automation()),
        format!("- **Net Change:** {net_change} employees"),
    ]
    .join("\n")
}

fn recommendation(analysis: &CaseAnalysis) -> String {
    let case = &analysis.case;
    let metrics = &analysis.metrics;

    let mut for_automation = Vec::new();
    let mut against_automation = vec![format!(
        "- Significant upfront investment ({})",
        usd_millions_short(case.automation_cost)
    )];

    match metrics.break_even {
        BreakEven::Years(years) => for_automation.push(format!(
            "- Long-term cost savings (~{}/year after year {})",
            usd_millions_short(metrics.net_savings),
            years.ceil().normalize()
        )),
        BreakEven::NoPayback => {
            against_automation.push(format!("- No payback: {}", metrics.break_even.describe()))
        }
    }
    for_automation.push("- Improved operational efficiency".to_string());
    for_automation.push("- Competitive advantage through technology".to_string());

    let headcount_change = case.headcount_change();
    if headcount_change < 0 {
        against_automation
            .push(format!("- Workforce reduction ({} jobs)", headcount_change.unsigned_abs()));
    }
    against_automation.push(format!(
        "- Additional {}/year maintenance costs",
        usd_millions_short(case.annual_maintenance)
    ));

    [
        "**Recommendation:**".to_string(),
        String::new(),
        "*Arguments FOR Automation:*".to_string(),
        for_automation.join("\n"),
        String::new(),
        "*Arguments AGAINST Automation:*".to_string(),
        against_automation.join("\n"),
        String::new(),
        "*Consider:*".to_string(),
        "- If the company has capital and prioritizes long-term savings → Automate".to_string(),
        "- If workforce impact is a major concern → Delay automation".to_string(),
    ]
    .join("\n")
}

pub fn key_numbers_table(analysis: &CaseAnalysis) -> TableData {
    let case = &analysis.case;
    let metrics = &analysis.metrics;
    let row = |metric: &str, value: String| TableRow { metric: metric.to_string(), value };

    TableData::metrics(vec![
        row("Current Labor Cost", usd(case.current_labor_cost)),
        row("Automated Labor Cost", usd(case.automated_labor_cost)),
        row("Labor Savings", usd(metrics.labor_savings)),
        row("One-time Automation Cost", usd(case.automation_cost)),
        row("Annual Maintenance", usd(case.annual_maintenance)),
        row("Net Annual Savings", usd(metrics.net_savings)),
        row("Break-even Period", metrics.break_even.describe()),
    ])
}

fn payback(analysis: &CaseAnalysis) -> String {
    [
        "**Payback Period:**".to_string(),
        format!("- With net savings of {}/year", usd(analysis.metrics.net_savings)),
        format!("- Automation cost: {}", usd(analysis.case.automation_cost)),
        format!("- **{}**", break_even_sentence(&analysis.metrics.break_even)),
    ]
    .join("\n")
}

fn shipping_change(analysis: &CaseAnalysis) -> String {
    let Some(shipping) = analysis.case.department("shipping") else {
        return "The case study does not describe a shipping department.".to_string();
    };

    let movement = match shipping.headcount_change() {
        change if change > 0 => "increase",
        change if change < 0 => "decrease",
        _ => "stay",
    };
    let headcount_line = if movement == "stay" {
        format!("- Employees stay at {}", shipping.employees)
    } else {
        format!(
            "- Employees {movement} from {} to {}",
            shipping.employees, shipping.employees_after_automation
        )
    };

    [
        "**Shipping Department Changes:**".to_string(),
        headcount_line,
        "- Possibly due to reallocation of automated processes".to_string(),
        "- Suggests higher throughput or new responsibilities post-automation".to_string(),
    ]
    .join("\n")
}

fn maintenance(analysis: &CaseAnalysis) -> String {
    let net_savings = analysis.metrics.net_savings;
    let impact = if net_savings > Decimal::ZERO {
        format!(
            "- Reduces gross savings but still yields **{}/year** in net benefits",
            usd(net_savings)
        )
    } else {
        format!(
            "- Consumes the gross labor savings, leaving **{}/year** in net benefits",
            usd(net_savings)
        )
    };

    [
        "**Annual Maintenance:**".to_string(),
        format!("- Recurring cost: {} per year", usd(analysis.case.annual_maintenance)),
        impact,
        "- Should be factored into long-term ROI analysis".to_string(),
    ]
    .join("\n")
}

fn assumptions() -> String {
    [
        "**Model Assumptions:**".to_string(),
        "- Full automation implemented immediately".to_string(),
        "- Labor savings are constant year-over-year".to_string(),
        "- No additional operational disruptions or hidden costs".to_string(),
        format!("- Annual hours: {} per FTE assumed", count(u64::from(FTE_ANNUAL_HOURS))),
        "- Wage estimates are accurate and do not fluctuate".to_string(),
    ]
    .join("\n")
}

fn shipment_volume(analysis: &CaseAnalysis, question: &str) -> String {
    let change_pct = shipment_change_pct(question);
    let Some(projection) = analysis.shipment_projection(change_pct) else {
        if analysis.case.shipments == 0 {
            return "Shipment projections need a non-zero shipment baseline.".to_string();
        }
        return format!(
            "A {}% change in shipment volume is too large to project. \
             Try a change within a few hundred percent.",
            change_pct.abs().normalize()
        );
    };

    let direction = if change_pct.is_sign_negative() { "Decrease" } else { "Increase" };
    let volumes = if change_pct.is_sign_negative() { "lower" } else { "larger" };
    let verdict = if projection.projected_savings > Decimal::ZERO {
        format!("- Automation still leads to cost efficiency at {volumes} volumes")
    } else {
        "- Automation no longer yields labor savings at this volume".to_string()
    };

    [
        format!("**Impact of {}% Shipment {direction}:**", change_pct.abs().normalize()),
        format!("- New shipments: {}", count(projection.whole_shipments())),
        format!("- Estimated cost with automation: {}", usd(projection.projected_cost)),
        format!("- New estimated savings: {}", usd(projection.projected_savings)),
        verdict,
    ]
    .join("\n")
}

/// Percentage named in the question (`25%`, `12.5 %`), negative when the question
/// talks about a decrease. Falls back to the default change.
pub fn shipment_change_pct(question: &str) -> Decimal {
    let tokens = tokenize(question);
    let named = tokens.iter().enumerate().find_map(|(index, token)| {
        if let Some(raw) = token.strip_suffix('%') {
            if !raw.is_empty() {
                return raw.parse::<Decimal>().ok();
            }
            return index.checked_sub(1).and_then(|previous| tokens[previous].parse().ok());
        }
        None
    });

    let Some(pct) = named else {
        return Decimal::from(DEFAULT_SHIPMENT_CHANGE_PCT);
    };

    let decreasing = DECREASE_WORDS.iter().any(|word| question.contains(word));
    if decreasing && pct.is_sign_positive() {
        -pct
    } else {
        pct
    }
}

fn store_impact(analysis: &CaseAnalysis) -> String {
    let per_store = match analysis.savings_per_store() {
        Some(amount) => format!("- Average savings per store: **{}/year**", usd(amount)),
        None => "- Average savings per store: not available without stores".to_string(),
    };

    [
        "**Per Store Impact:**".to_string(),
        format!("- {} stores total", analysis.case.stores),
        per_store,
        "- Automation supports scaling without linear labor cost increases".to_string(),
    ]
    .join("\n")
}

fn break_even_sentence(break_even: &BreakEven) -> String {
    match break_even {
        BreakEven::Years(years) => format!("Break-even in {} years", one_decimal(*years)),
        BreakEven::NoPayback => format!("No break-even: {}", break_even.describe()),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let mut sanitized = String::with_capacity(text.len());
    for character in text.chars() {
        if character.is_ascii_alphanumeric() || matches!(character, '%' | '.' | '-') {
            sanitized.push(character);
        } else {
            sanitized.push(' ');
        }
    }
    sanitized
        .split_whitespace()
        .map(|token| token.trim_end_matches('.').to_string())
        .filter(|token| !token.is_empty())
        .collect()
}
