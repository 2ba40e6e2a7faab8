use advisor_core::{CaseAnalysis, ResponsePayload, Topic};
use tracing::debug;

use crate::answers;

/// Keyword test over a lowercased question. Keywords match as plain substrings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    AnyOf(&'static [&'static str]),
    AllOf(&'static [&'static str]),
    Either(&'static [Trigger]),
}

impl Trigger {
    pub fn matches(&self, normalized_text: &str) -> bool {
        match self {
            Self::AnyOf(keywords) => {
                keywords.iter().any(|keyword| normalized_text.contains(keyword))
            }
            Self::AllOf(keywords) => {
                keywords.iter().all(|keyword| normalized_text.contains(keyword))
            }
            Self::Either(triggers) => {
                triggers.iter().any(|trigger| trigger.matches(normalized_text))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub topic: Topic,
    pub trigger: Trigger,
}

/// Priority order of the rules. The first matching rule wins, so a question that
/// mentions both "cost" and "save" is a costs question, and "shipping" is caught by
/// the greeting rule through "hi".
pub const RULES: &[Rule] = &[
    Rule { topic: Topic::Greeting, trigger: Trigger::AnyOf(&["hello", "hi", "greet"]) },
    Rule { topic: Topic::Costs, trigger: Trigger::AnyOf(&["cost", "spend", "expense"]) },
    Rule { topic: Topic::Savings, trigger: Trigger::AnyOf(&["save", "saving", "benefit"]) },
    Rule { topic: Topic::BreakEven, trigger: Trigger::AnyOf(&["break", "even", "payback"]) },
    Rule {
        topic: Topic::Employees,
        trigger: Trigger::AnyOf(&["employee", "staff", "job", "worker"]),
    },
    Rule {
        topic: Topic::Recommendation,
        trigger: Trigger::AnyOf(&["recommend", "should", "advise"]),
    },
    Rule { topic: Topic::Risks, trigger: Trigger::AnyOf(&["risk", "challenge", "problem"]) },
    Rule {
        topic: Topic::KeyNumbers,
        trigger: Trigger::AnyOf(&["data", "numbers", "statistics"]),
    },
    Rule { topic: Topic::Headcount, trigger: Trigger::AllOf(&["how many", "employee"]) },
    Rule {
        topic: Topic::Payback,
        trigger: Trigger::AnyOf(&["recover", "recover cost", "payback"]),
    },
    Rule { topic: Topic::ShippingChange, trigger: Trigger::AllOf(&["shipping", "change"]) },
    Rule { topic: Topic::Maintenance, trigger: Trigger::AnyOf(&["maintenance"]) },
    Rule { topic: Topic::SavingsChart, trigger: Trigger::AllOf(&["chart", "savings"]) },
    Rule { topic: Topic::Assumptions, trigger: Trigger::AnyOf(&["assumption"]) },
    Rule { topic: Topic::ShipmentVolume, trigger: Trigger::AllOf(&["shipment", "%"]) },
    Rule { topic: Topic::StoreImpact, trigger: Trigger::AllOf(&["store", "impact"]) },
    Rule {
        topic: Topic::LongTerm,
        trigger: Trigger::Either(&[
            Trigger::AnyOf(&["long-term"]),
            Trigger::AllOf(&["benefit", "long"]),
        ]),
    },
    Rule { topic: Topic::Phased, trigger: Trigger::AnyOf(&["phase", "phased"]) },
];

#[derive(Clone, Debug, Default)]
pub struct QuestionRouter {
    analysis: CaseAnalysis,
}

impl QuestionRouter {
    pub fn new(analysis: CaseAnalysis) -> Self {
        Self { analysis }
    }

    pub fn analysis(&self) -> &CaseAnalysis {
        &self.analysis
    }

    /// Topic of the first matching rule; `None` means the help answer.
    pub fn classify(&self, text: &str) -> Option<Topic> {
        classify_normalized(&normalize_text(text))
    }

    pub fn route(&self, text: &str) -> ResponsePayload {
        let normalized_text = normalize_text(text);
        let topic = classify_normalized(&normalized_text).unwrap_or(Topic::Help);

        debug!(
            event_name = "advisor.router.matched",
            topic = topic.as_str(),
            question_chars = normalized_text.chars().count(),
            "question routed"
        );

        answers::answer(topic, &self.analysis, &normalized_text)
    }

    /// Answers as `topic` regardless of the rule table, for callers that pick the
    /// topic themselves.
    pub fn answer_topic(&self, topic: Topic, text: &str) -> ResponsePayload {
        answers::answer(topic, &self.analysis, &normalize_text(text))
    }
}

fn classify_normalized(normalized_text: &str) -> Option<Topic> {
    RULES.iter().find(|rule| rule.trigger.matches(normalized_text)).map(|rule| rule.topic)
}

pub(crate) fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}
