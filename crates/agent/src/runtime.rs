use advisor_core::{CaseAnalysis, ResponsePayload, Topic};
use tracing::info;

use crate::conversation::Conversation;
use crate::router::QuestionRouter;

#[derive(Clone, Debug, Default)]
pub struct AdvisorRuntime {
    router: QuestionRouter,
}

impl AdvisorRuntime {
    pub fn new(router: QuestionRouter) -> Self {
        Self { router }
    }

    pub fn for_case(analysis: CaseAnalysis) -> Self {
        Self::new(QuestionRouter::new(analysis))
    }

    pub fn router(&self) -> &QuestionRouter {
        &self.router
    }

    /// Answers one user turn and appends it to `conversation`.
    pub fn handle_turn(&self, conversation: &mut Conversation, question: &str) -> ResponsePayload {
        let payload = self.router.route(question);
        self.record(conversation, question, &payload);
        payload
    }

    /// Like `handle_turn`, with the topic chosen by the caller.
    pub fn handle_topic_turn(
        &self,
        conversation: &mut Conversation,
        topic: Topic,
        question: &str,
    ) -> ResponsePayload {
        let payload = self.router.answer_topic(topic, question);
        self.record(conversation, question, &payload);
        payload
    }

    fn record(&self, conversation: &mut Conversation, question: &str, payload: &ResponsePayload) {
        conversation.record_turn(question, payload.text.clone());
        info!(
            event_name = "advisor.session.turn_recorded",
            topic = payload.topic.as_str(),
            has_attachment = payload.attachment.is_some(),
            entries = conversation.len(),
            "conversation turn recorded"
        );
    }
}

#[cfg(test)]
mod tests {
    use advisor_core::Topic;

    use super::AdvisorRuntime;
    use crate::conversation::{Conversation, Role};

    #[test]
    fn each_turn_adds_question_and_answer() {
        let runtime = AdvisorRuntime::default();
        let mut conversation = Conversation::new();

        let payload = runtime.handle_turn(&mut conversation, "What are the risks?");

        assert_eq!(payload.topic, Topic::Risks);
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.entries()[0].role, Role::User);
        assert_eq!(conversation.entries()[0].content, "What are the risks?");
        assert_eq!(conversation.entries()[1].content, payload.text);
    }

    #[test]
    fn help_answers_are_recorded_too() {
        let runtime = AdvisorRuntime::default();
        let mut conversation = Conversation::new();

        let payload = runtime.handle_turn(&mut conversation, "");

        assert_eq!(payload.topic, Topic::Help);
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.entries()[0].content, "");
    }

    #[test]
    fn table_answers_record_only_the_text() {
        let runtime = AdvisorRuntime::default();
        let mut conversation = Conversation::new();

        let payload = runtime.handle_turn(&mut conversation, "show me the numbers");

        assert!(payload.table().is_some());
        assert_eq!(
            conversation.entries()[1].content,
            "Here are the key numbers from the case study:"
        );
    }

    #[test]
    fn topic_turns_bypass_the_rule_table() {
        let runtime = AdvisorRuntime::default();
        let mut conversation = Conversation::new();

        let payload =
            runtime.handle_topic_turn(&mut conversation, Topic::SavingsChart, "savings chart");

        assert_eq!(payload.topic, Topic::SavingsChart);
        assert!(payload.chart().is_some());
        assert_eq!(conversation.turns(), 1);
    }
}
