//! Side effects of session transitions, both admin-driven and timer-driven.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::{
    services::sse_events::broadcast_session_state,
    state::{
        registry::SessionHandle,
        scoring,
        session::{Session, SessionError},
        state_machine::{SessionAction, SessionState, Trigger, next_state},
        timer,
    },
};

/// Validate and apply an admin action on a locked session.
///
/// Any pending timer is cancelled before the action's effects run, so a racing automatic
/// transition can never fire afterwards. On error the session is left untouched.
pub fn apply_action(
    cell: &SessionHandle,
    session: &mut Session,
    action: SessionAction,
    countdown: Duration,
) -> Result<SessionState, SessionError> {
    let next = next_state(session.state, Trigger::Admin(action))?;

    if action == SessionAction::NextQuestion && session.at_question >= session.num_questions() {
        return Err(SessionError::NoNextQuestion {
            at_question: session.at_question,
        });
    }

    timer::cancel(session);

    match action {
        SessionAction::NextQuestion => {
            session.at_question += 1;
            timer::schedule(cell, session, countdown, on_countdown_elapsed);
        }
        SessionAction::GoToAnswer => {
            if session.state == SessionState::QuestionOpen {
                scoring::score_current_question(session);
            }
        }
        SessionAction::GoToFinalResults | SessionAction::End => {}
    }

    let from = session.state;
    session.state = next;
    info!(
        session_id = session.session_id,
        ?action,
        ?from,
        to = ?next,
        at_question = session.at_question,
        "session transition applied"
    );
    broadcast_session_state(cell.events(), session);

    Ok(next)
}

/// The countdown elapsed: open the current question and arm its answer window.
fn on_countdown_elapsed(cell: &SessionHandle, session: &mut Session) {
    let next = match next_state(session.state, Trigger::CountdownElapsed) {
        Ok(next) => next,
        Err(err) => {
            debug!(session_id = session.session_id, error = %err, "ignored countdown expiry");
            return;
        }
    };

    session.open_current_question(Instant::now());
    session.state = next;

    let window = session
        .current_question()
        .map(|question| Duration::from_secs(question.duration))
        .unwrap_or_default();
    timer::schedule(cell, session, window, on_question_time_up);

    broadcast_session_state(cell.events(), session);
}

/// The answer window elapsed: score the question and close it.
fn on_question_time_up(cell: &SessionHandle, session: &mut Session) {
    let next = match next_state(session.state, Trigger::QuestionTimeUp) {
        Ok(next) => next,
        Err(err) => {
            debug!(session_id = session.session_id, error = %err, "ignored question expiry");
            return;
        }
    };

    scoring::score_current_question(session);
    session.state = next;

    broadcast_session_state(cell.events(), session);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::{
        SseHub, registry::SessionCell, session::tests::sample_quiz,
        state_machine::InvalidTransition,
    };

    const COUNTDOWN: Duration = Duration::from_secs(3);

    fn cell(questions: usize) -> SessionHandle {
        let mut session = Session::new(1, sample_quiz(questions), 10);
        session.add_player("alice", || 1).unwrap();
        session.add_player("bob", || 2).unwrap();
        Arc::new(SessionCell::new(session, SseHub::new(16)))
    }

    async fn act(cell: &SessionHandle, action: SessionAction) -> Result<SessionState, SessionError> {
        let mut session = cell.lock().await;
        apply_action(cell, &mut session, action, COUNTDOWN)
    }

    #[tokio::test(start_paused = true)]
    async fn next_question_runs_countdown_then_opens_question() {
        let cell = cell(1);
        assert_eq!(
            act(&cell, SessionAction::NextQuestion).await,
            Ok(SessionState::QuestionCountdown)
        );
        assert_eq!(cell.lock().await.at_question, 1);

        tokio::time::sleep(COUNTDOWN + Duration::from_millis(10)).await;
        {
            let session = cell.lock().await;
            assert_eq!(session.state, SessionState::QuestionOpen);
            assert!(session.question_states[0].opened_at.is_some());
            assert!(session.has_pending_timer());
        }

        // the sample questions last one second
        tokio::time::sleep(Duration::from_secs(1)).await;
        let session = cell.lock().await;
        assert_eq!(session.state, SessionState::QuestionClose);
        assert_eq!(session.question_results.len(), 1);
        assert!(!session.has_pending_timer());
    }

    #[tokio::test(start_paused = true)]
    async fn next_question_on_last_question_fails_without_mutation() {
        let cell = cell(1);
        act(&cell, SessionAction::NextQuestion).await.unwrap();
        tokio::time::sleep(COUNTDOWN + Duration::from_secs(2)).await;
        assert_eq!(cell.lock().await.state, SessionState::QuestionClose);

        assert_eq!(
            act(&cell, SessionAction::NextQuestion).await,
            Err(SessionError::NoNextQuestion { at_question: 1 })
        );
        let session = cell.lock().await;
        assert_eq!(session.state, SessionState::QuestionClose);
        assert_eq!(session.at_question, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn go_to_answer_from_open_scores_once_and_cancels_timer() {
        let cell = cell(1);
        act(&cell, SessionAction::NextQuestion).await.unwrap();
        tokio::time::sleep(COUNTDOWN + Duration::from_millis(10)).await;

        {
            let mut session = cell.lock().await;
            session.submit_answer(1, 1, &[11], Instant::now()).unwrap();
        }
        assert_eq!(
            act(&cell, SessionAction::GoToAnswer).await,
            Ok(SessionState::AnswerShow)
        );

        tokio::time::sleep(Duration::from_secs(5)).await;
        let session = cell.lock().await;
        assert_eq!(session.state, SessionState::AnswerShow);
        assert_eq!(session.question_results.len(), 1);
        assert_eq!(session.players[0].score, 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn go_to_answer_from_close_does_not_rescore() {
        let cell = cell(1);
        act(&cell, SessionAction::NextQuestion).await.unwrap();
        tokio::time::sleep(COUNTDOWN + Duration::from_secs(2)).await;

        act(&cell, SessionAction::GoToAnswer).await.unwrap();
        assert_eq!(cell.lock().await.question_results.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn end_during_countdown_suppresses_the_countdown_timer() {
        let cell = cell(2);
        act(&cell, SessionAction::NextQuestion).await.unwrap();
        assert_eq!(act(&cell, SessionAction::End).await, Ok(SessionState::End));

        tokio::time::sleep(COUNTDOWN * 3).await;
        let session = cell.lock().await;
        assert_eq!(session.state, SessionState::End);
        assert!(session.question_states[0].opened_at.is_none());
        assert!(!session.has_pending_timer());
    }

    #[tokio::test(start_paused = true)]
    async fn illegal_action_reports_current_state() {
        let cell = cell(1);
        act(&cell, SessionAction::NextQuestion).await.unwrap();

        let err = act(&cell, SessionAction::GoToFinalResults).await.unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition(InvalidTransition {
                from: SessionState::QuestionCountdown,
                trigger: Trigger::Admin(SessionAction::GoToFinalResults),
            })
        );
        // the countdown timer is still pending
        assert!(cell.lock().await.has_pending_timer());
    }

    #[tokio::test(start_paused = true)]
    async fn transitions_are_broadcast() {
        let cell = cell(1);
        let mut events = cell.events().subscribe();

        act(&cell, SessionAction::NextQuestion).await.unwrap();
        tokio::time::sleep(COUNTDOWN + Duration::from_millis(10)).await;

        let first = events.recv().await.unwrap();
        let second = events.recv().await.unwrap();
        assert_eq!(first.event.as_deref(), Some("session.state"));
        assert!(first.data.contains("QUESTION_COUNTDOWN"));
        assert!(second.data.contains("QUESTION_OPEN"));
    }
}
