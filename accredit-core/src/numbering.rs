//! Human-readable question numbers.
//!
//! Replies are grouped by their question's accreditation standard and
//! numbered `<standard>.<n>` within the group, ordered by question id.
//! Groups keep the order in which they first appear. Numbers are never
//! stored; they are recomputed every time reports are read.

use crate::database::models::{Question, QuestionReply, Report, SENTINEL_ID};
use chrono::NaiveDateTime;

/// Assign `question_number` / `question_number_order_by` to every reply
/// and reorder the replies by that ordering.
///
/// Replies without a loaded question cannot be grouped; they lose any
/// number they had and are moved to the end in their current order.
/// Running this twice yields the same sequence.
pub fn renumber_replies(replies: &mut Vec<QuestionReply>) {
    let mut groups: Vec<(i64, Vec<usize>)> = Vec::new();
    let mut ungrouped = Vec::new();

    for (i, reply) in replies.iter().enumerate() {
        let Some(standard) = reply.question.as_ref().map(|q| q.accreditation_standard_id) else {
            ungrouped.push(i);
            continue;
        };
        match groups.iter_mut().find(|(key, _)| *key == standard) {
            Some((_, members)) => members.push(i),
            None => groups.push((standard, vec![i])),
        }
    }

    let mut order_by = 0;
    for (key, members) in &mut groups {
        // Stable, so equal question ids keep their relative order
        members.sort_by_key(|&i| replies[i].question_id);
        for (n, &i) in members.iter().enumerate() {
            order_by += 1;
            replies[i].question_number = Some(format!("{}.{}", key, n + 1));
            replies[i].question_number_order_by = order_by;
        }
    }
    for &i in &ungrouped {
        order_by += 1;
        replies[i].question_number = None;
        replies[i].question_number_order_by = order_by;
    }

    replies.sort_by_key(|r| r.question_number_order_by);
}

/// Build the blank template report the client copies when starting a new
/// assessment: one unanswered reply per question.
pub fn blank_report(questions: &[Question], report_date: NaiveDateTime) -> Report {
    let mut question_reply: Vec<QuestionReply> = questions
        .iter()
        .map(|q| QuestionReply {
            question_id: q.question_id,
            response: false,
            question: Some(q.clone()),
            ..Default::default()
        })
        .collect();
    renumber_replies(&mut question_reply);

    Report {
        report_id: 0,
        aged_care_center_id: SENTINEL_ID,
        assessor_id: SENTINEL_ID,
        report_date,
        is_new: true,
        is_changed: false,
        is_deleted: false,
        question_reply,
    }
}
