//! Conversation materializer
//!
//! Derives the two per-model timelines from a session's records. Pure and
//! cheap enough to recompute on every render.

use chat_core::{Branch, BranchMessage, ConversationRecord, ModelId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchTimelines {
    pub left: Vec<BranchMessage>,
    pub right: Vec<BranchMessage>,
}

impl BranchTimelines {
    pub fn get(&self, branch: Branch) -> &[BranchMessage] {
        match branch {
            Branch::Left => &self.left,
            Branch::Right => &self.right,
        }
    }

    fn get_mut(&mut self, branch: Branch) -> &mut Vec<BranchMessage> {
        match branch {
            Branch::Left => &mut self.left,
            Branch::Right => &mut self.right,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Build both timelines. Every record contributes a user message to each
/// side; an assistant message follows only where that branch's slot is
/// non-empty, tagged with the branch's current model.
pub fn materialize(records: &[ConversationRecord], left: &ModelId, right: &ModelId) -> BranchTimelines {
    let mut ordered: Vec<&ConversationRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.timestamp);

    let mut timelines = BranchTimelines::default();
    for record in ordered {
        for branch in Branch::BOTH {
            let model = match branch {
                Branch::Left => left,
                Branch::Right => right,
            };
            let timeline = timelines.get_mut(branch);
            timeline.push(BranchMessage::user(&record.id, &record.text, record.timestamp));

            let response = record.responses.get(branch);
            if !response.is_empty() {
                timeline.push(BranchMessage::assistant(
                    branch,
                    &record.id,
                    response,
                    record.timestamp,
                    model.clone(),
                ));
            }
        }
    }
    timelines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{MessageRole, RecordId, ResponseSlots};
    use chrono::{Duration, TimeZone, Utc};

    fn record(id: &str, minute: i64, text: &str, left: &str, right: &str) -> ConversationRecord {
        let base = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        ConversationRecord {
            id: RecordId::from(id),
            user_id: "u-1".to_string(),
            session_id: "s-1".to_string(),
            text: text.to_string(),
            responses: ResponseSlots::new(left, right),
            tokens_used: 0,
            timestamp: base + Duration::minutes(minute),
        }
    }

    fn models() -> (ModelId, ModelId) {
        (ModelId::from("gpt-5"), ModelId::from("gemini-2.5-flash"))
    }

    #[test]
    fn test_empty_input() {
        let (left, right) = models();
        assert!(materialize(&[], &left, &right).is_empty());
    }

    #[test]
    fn test_two_records_yield_four_messages_per_side() {
        let (left, right) = models();
        let records = vec![
            record("p-2", 5, "second", "L2", "R2"),
            record("p-1", 1, "first", "L1", "R1"),
        ];

        let timelines = materialize(&records, &left, &right);

        assert_eq!(timelines.left.len(), 4);
        assert_eq!(timelines.right.len(), 4);
        let contents: Vec<&str> = timelines.left.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "L1", "second", "L2"]);
        assert_eq!(timelines.right[1].model, Some(right.clone()));
        assert_eq!(timelines.right[1].id, "assistant-right-p-1");
        assert_eq!(timelines.left[0].role, MessageRole::User);
    }

    #[test]
    fn test_empty_slot_is_skipped() {
        let (left, right) = models();
        let records = vec![record("p-1", 0, "What is 2+2?", "4", "")];

        let timelines = materialize(&records, &left, &right);

        assert_eq!(timelines.left.len(), 2);
        assert_eq!(timelines.left[1].model, Some(left));
        assert_eq!(timelines.right.len(), 1);
        assert!(timelines.right[0].is_user());
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let (left, right) = models();
        let records = vec![record("a", 0, "a", "", ""), record("b", 0, "b", "", "")];

        let timelines = materialize(&records, &left, &right);

        assert_eq!(timelines.left[0].content, "a");
        assert_eq!(timelines.left[1].content, "b");
    }

    #[test]
    fn test_recompute_is_identical() {
        let (left, right) = models();
        let records = vec![record("p-1", 0, "q", "x", "y")];
        assert_eq!(materialize(&records, &left, &right), materialize(&records, &left, &right));
    }
}
