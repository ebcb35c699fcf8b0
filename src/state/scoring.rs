//! Scoring of a question once its answer window closes.

use tracing::debug;

use crate::state::session::{AnswerBreakdown, PlayerId, QuestionResult, Session, Submission};

/// Round to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score the current question, update cumulative player scores and append its result.
///
/// Fully correct respondents are ranked by answer time; each one's whole score (previous
/// total plus the question points) is divided by its rank. Partial or wrong answers do not
/// consume a rank. Returns `None` when the session is not positioned on a question.
pub fn score_current_question(session: &mut Session) -> Option<&QuestionResult> {
    let position = session.at_question;
    let question = session.metadata.question(position)?.clone();
    let correct = question.correct_answer_ids();

    let slot = session.question_states.get(position - 1)?;

    let question_correct_breakdown = correct
        .iter()
        .map(|answer_id| AnswerBreakdown {
            answer_id: *answer_id,
            players_correct: session
                .players
                .iter()
                .filter(|player| {
                    slot.answers
                        .get(&player.player_id)
                        .is_some_and(|submission| submission.answer_ids.contains(answer_id))
                })
                .map(|player| player.name.clone())
                .collect(),
        })
        .collect();

    let mut submissions: Vec<(PlayerId, Submission)> = slot
        .answers
        .iter()
        .map(|(player_id, submission)| (*player_id, submission.clone()))
        .collect();
    submissions.sort_by_key(|(_, submission)| submission.elapsed);

    let respondents = submissions.len();
    let total_secs: f64 = submissions
        .iter()
        .map(|(_, submission)| submission.elapsed.as_secs_f64())
        .sum();

    let mut rank: u32 = 1;
    for (player_id, submission) in &submissions {
        if !submission.matches_exactly(&correct) {
            continue;
        }
        if let Some(player) = session
            .players
            .iter_mut()
            .find(|player| player.player_id == *player_id)
        {
            player.score = round2((player.score + f64::from(question.points)) / f64::from(rank));
            debug!(
                session_id = session.session_id,
                player_id,
                rank,
                score = player.score,
                "scored correct answer"
            );
        }
        rank += 1;
    }

    let (average_answer_time, percent_correct) = if respondents == 0 {
        (0, 0)
    } else {
        let respondents = respondents as f64;
        (
            (total_secs / respondents).round() as u64,
            (100.0 * f64::from(rank - 1) / respondents).round() as u64,
        )
    };

    session.question_results.push(QuestionResult {
        question_id: question.question_id,
        question_correct_breakdown,
        average_answer_time,
        percent_correct,
    });
    session.question_results.last()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::state::{session::tests::sample_quiz, state_machine::SessionState};

    fn session_with_players(count: usize, names: &[&str]) -> Session {
        let mut session = Session::new(1, sample_quiz(count), 50);
        for (index, name) in names.iter().enumerate() {
            session.add_player(name, || index as u64 + 1).unwrap();
        }
        session
    }

    fn record(session: &mut Session, player_id: PlayerId, answer_ids: &[u64], secs: u64) {
        let slot = &mut session.question_states[session.at_question - 1];
        slot.answers.insert(
            player_id,
            Submission {
                answer_ids: answer_ids.to_vec(),
                elapsed: Duration::from_secs(secs),
            },
        );
    }

    #[test]
    fn earlier_correct_answer_ranks_first() {
        let mut session = session_with_players(1, &["alice", "bob"]);
        session.at_question = 1;
        session.state = SessionState::QuestionOpen;
        record(&mut session, 2, &[11], 3);
        record(&mut session, 1, &[11], 1);

        let result = score_current_question(&mut session).unwrap().clone();

        assert_eq!(session.players[0].score, 5.0);
        assert_eq!(session.players[1].score, 2.5);
        assert_eq!(result.question_id, 1);
        assert_eq!(result.average_answer_time, 2);
        assert_eq!(result.percent_correct, 100);
        assert_eq!(
            result.question_correct_breakdown,
            vec![AnswerBreakdown {
                answer_id: 11,
                players_correct: vec!["alice".into(), "bob".into()],
            }]
        );
    }

    #[test]
    fn resubmission_is_ranked_by_its_own_time() {
        let mut session = session_with_players(1, &["alice", "bob"]);
        session.at_question = 1;
        session.state = SessionState::QuestionOpen;
        let opened_at = Instant::now();
        session.open_current_question(opened_at);

        session
            .submit_answer(1, 1, &[12], opened_at + Duration::from_secs(1))
            .unwrap();
        session
            .submit_answer(2, 1, &[11], opened_at + Duration::from_secs(3))
            .unwrap();
        session
            .submit_answer(1, 1, &[11], opened_at + Duration::from_secs(5))
            .unwrap();

        let result = score_current_question(&mut session).unwrap().clone();

        assert_eq!(session.players[1].score, 5.0);
        assert_eq!(session.players[0].score, 2.5);
        assert_eq!(result.average_answer_time, 4);
        assert_eq!(result.percent_correct, 100);
    }

    #[test]
    fn partial_answers_do_not_consume_a_rank() {
        // question 2 has two correct answers: 21 and 23
        let mut session = session_with_players(2, &["alice", "bob", "carol"]);
        session.at_question = 2;
        record(&mut session, 1, &[21], 1);
        record(&mut session, 2, &[21, 22], 2);
        record(&mut session, 3, &[23, 21], 4);

        let result = score_current_question(&mut session).unwrap().clone();

        assert_eq!(session.players[0].score, 0.0);
        assert_eq!(session.players[1].score, 0.0);
        assert_eq!(session.players[2].score, 5.0);
        assert_eq!(result.percent_correct, 33);
        assert_eq!(result.average_answer_time, 2);
        assert_eq!(result.question_correct_breakdown.len(), 2);
        assert_eq!(
            result.question_correct_breakdown[0].players_correct,
            vec!["alice", "bob", "carol"]
        );
        assert_eq!(
            result.question_correct_breakdown[1].players_correct,
            vec!["carol"]
        );
    }

    #[test]
    fn accumulated_score_is_divided_by_rank() {
        let mut session = session_with_players(1, &["alice", "bob", "carol"]);
        session.at_question = 1;
        session.players[2].score = 10.0;
        record(&mut session, 1, &[11], 1);
        record(&mut session, 2, &[11], 2);
        record(&mut session, 3, &[11], 3);

        score_current_question(&mut session);

        assert_eq!(session.players[0].score, 5.0);
        assert_eq!(session.players[1].score, 2.5);
        // (10 + 5) / 3
        assert_eq!(session.players[2].score, 5.0);
    }

    #[test]
    fn scores_are_rounded_to_two_decimals() {
        let mut session = session_with_players(1, &["a", "b", "c"]);
        session.at_question = 1;
        session.players[2].score = 0.5;
        record(&mut session, 1, &[11], 1);
        record(&mut session, 2, &[11], 2);
        record(&mut session, 3, &[11], 3);

        score_current_question(&mut session);

        // (0.5 + 5) / 3 = 1.8333...
        assert_eq!(session.players[2].score, 1.83);
    }

    #[test]
    fn nobody_answered_yields_zeroes() {
        let mut session = session_with_players(1, &["alice"]);
        session.at_question = 1;

        let result = score_current_question(&mut session).unwrap().clone();

        assert_eq!(result.average_answer_time, 0);
        assert_eq!(result.percent_correct, 0);
        assert!(result.question_correct_breakdown[0].players_correct.is_empty());
        assert_eq!(session.question_results.len(), 1);
    }

    #[test]
    fn lobby_session_is_not_scored() {
        let mut session = session_with_players(1, &["alice"]);
        assert!(score_current_question(&mut session).is_none());
        assert!(session.question_results.is_empty());
    }

    #[test]
    fn round2_matches_expected_values() {
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
    }
}
