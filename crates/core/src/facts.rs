use serde::Serialize;

use crate::format;
use crate::metrics::CaseAnalysis;

pub const SAMPLE_QUESTIONS: &[&str] = &[
    "What are the current costs?",
    "How much would automation save?",
    "What's the employee impact?",
    "Should we automate?",
    "What are the risks?",
    "How many employees are affected by automation?",
    "How long will it take to recover the automation cost?",
    "What changes occur in the shipping department?",
    "What are the annual maintenance implications?",
    "Can you show a chart of savings vs costs?",
    "What are the assumptions behind these numbers?",
    "What if shipment volume increases by 10%?",
    "How does automation affect individual store performance?",
    "What are the long-term benefits of automation?",
    "Could this be phased instead of fully automated at once?",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuickFact {
    pub label: &'static str,
    pub value: String,
}

/// Headline figures shown next to the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuickFacts {
    pub title: String,
    pub facts: Vec<QuickFact>,
    pub sample_questions: Vec<&'static str>,
}

impl QuickFacts {
    pub fn from_analysis(analysis: &CaseAnalysis) -> Self {
        let case = &analysis.case;
        let metrics = &analysis.metrics;

        let break_even = match metrics.break_even.years() {
            Some(years) => format!("{} years", format::one_decimal(years)),
            None => "never".to_string(),
        };

        Self {
            title: case.title.clone(),
            facts: vec![
                QuickFact {
                    label: "Current Labor Cost",
                    value: format!("{}/year", format::usd_millions(case.current_labor_cost)),
                },
                QuickFact {
                    label: "Automation Cost",
                    value: format::usd_millions(case.automation_cost),
                },
                QuickFact {
                    label: "Annual Savings",
                    value: format!("{}/year", format::usd_millions(metrics.net_savings)),
                },
                QuickFact { label: "Break-even", value: break_even },
            ],
            sample_questions: SAMPLE_QUESTIONS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::QuickFacts;
    use crate::domain::case::CaseData;
    use crate::metrics::CaseAnalysis;

    #[test]
    fn quick_facts_for_fixed_case() {
        let facts = QuickFacts::from_analysis(&CaseAnalysis::default());

        let values =
            facts.facts.iter().map(|fact| (fact.label, fact.value.as_str())).collect::<Vec<_>>();
        assert_eq!(
            values,
            vec![
                ("Current Labor Cost", "$12.27M/year"),
                ("Automation Cost", "$4.00M"),
                ("Annual Savings", "$1.02M/year"),
                ("Break-even", "3.9 years"),
            ]
        );
        assert_eq!(facts.sample_questions.len(), 15);
    }

    #[test]
    fn quick_facts_show_never_without_payback() {
        let analysis = CaseAnalysis::new(CaseData {
            annual_maintenance: Decimal::from(3_000_000),
            ..CaseData::grocery_distribution()
        });

        let facts = QuickFacts::from_analysis(&analysis);
        assert_eq!(facts.facts[3].value, "never");
        assert_eq!(facts.facts[2].value, "-$0.99M/year");
    }
}
