use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Phases a quiz session moves through, from lobby to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Players can join; nothing has been asked yet.
    Lobby,
    /// Buffer before the current question becomes answerable.
    QuestionCountdown,
    /// The current question accepts answers until its duration elapses.
    QuestionOpen,
    /// The answer window closed on its own timer; results are computed.
    QuestionClose,
    /// Results of the current question are being shown.
    AnswerShow,
    /// The final scoreboard is being shown.
    FinalResults,
    /// Terminal state; the session can no longer be advanced.
    End,
}

impl SessionState {
    /// Whether the session reached its terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::End)
    }
}

/// Actions an admin can request on a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionAction {
    /// Advance to the countdown of the next question.
    NextQuestion,
    /// Show the answers of the current question.
    GoToAnswer,
    /// Show the final scoreboard.
    GoToFinalResults,
    /// Stop the session for good.
    End,
}

/// Anything that can move a session from one state to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit admin action (or one synthesized by the lobby auto-start).
    Admin(SessionAction),
    /// The countdown timer expired.
    CountdownElapsed,
    /// The question duration timer expired.
    QuestionTimeUp,
}

/// Error returned when a trigger cannot be applied from the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("action {trigger:?} is not allowed while the session is in {from:?}")]
pub struct InvalidTransition {
    /// The state the session was in when the trigger was received.
    pub from: SessionState,
    /// The trigger that cannot be applied from this state.
    pub trigger: Trigger,
}

/// Admin actions accepted in the given state, in a stable order.
pub fn allowed_actions(state: SessionState) -> &'static [SessionAction] {
    use SessionAction::*;

    match state {
        SessionState::Lobby => &[End, NextQuestion],
        SessionState::QuestionCountdown => &[End],
        SessionState::QuestionOpen => &[End, GoToAnswer],
        SessionState::QuestionClose => &[End, GoToAnswer, GoToFinalResults, NextQuestion],
        SessionState::AnswerShow => &[End, NextQuestion, GoToFinalResults],
        SessionState::FinalResults => &[End],
        SessionState::End => &[],
    }
}

/// Compute the state reached by applying `trigger` from `from`.
///
/// Admin actions are checked against [`allowed_actions`]; timer triggers are only valid
/// from the phase that scheduled them. Side effects are left to the caller.
pub fn next_state(from: SessionState, trigger: Trigger) -> Result<SessionState, InvalidTransition> {
    let next = match (from, trigger) {
        (SessionState::QuestionCountdown, Trigger::CountdownElapsed) => SessionState::QuestionOpen,
        (SessionState::QuestionOpen, Trigger::QuestionTimeUp) => SessionState::QuestionClose,
        (state, Trigger::Admin(action)) if allowed_actions(state).contains(&action) => {
            match action {
                SessionAction::NextQuestion => SessionState::QuestionCountdown,
                SessionAction::GoToAnswer => SessionState::AnswerShow,
                SessionAction::GoToFinalResults => SessionState::FinalResults,
                SessionAction::End => SessionState::End,
            }
        }
        (from, trigger) => return Err(InvalidTransition { from, trigger }),
    };

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [SessionState; 7] = [
        SessionState::Lobby,
        SessionState::QuestionCountdown,
        SessionState::QuestionOpen,
        SessionState::QuestionClose,
        SessionState::AnswerShow,
        SessionState::FinalResults,
        SessionState::End,
    ];

    const ALL_ACTIONS: [SessionAction; 4] = [
        SessionAction::NextQuestion,
        SessionAction::GoToAnswer,
        SessionAction::GoToFinalResults,
        SessionAction::End,
    ];

    fn admin(state: SessionState, action: SessionAction) -> Result<SessionState, InvalidTransition> {
        next_state(state, Trigger::Admin(action))
    }

    #[test]
    fn full_happy_path_through_session() {
        let mut state = SessionState::Lobby;
        state = admin(state, SessionAction::NextQuestion).unwrap();
        assert_eq!(state, SessionState::QuestionCountdown);
        state = next_state(state, Trigger::CountdownElapsed).unwrap();
        assert_eq!(state, SessionState::QuestionOpen);
        state = next_state(state, Trigger::QuestionTimeUp).unwrap();
        assert_eq!(state, SessionState::QuestionClose);
        state = admin(state, SessionAction::GoToAnswer).unwrap();
        assert_eq!(state, SessionState::AnswerShow);
        state = admin(state, SessionAction::GoToFinalResults).unwrap();
        assert_eq!(state, SessionState::FinalResults);
        state = admin(state, SessionAction::End).unwrap();
        assert_eq!(state, SessionState::End);
    }

    #[test]
    fn end_is_reachable_from_every_non_terminal_state() {
        for state in ALL_STATES.into_iter().filter(|state| !state.is_terminal()) {
            assert_eq!(admin(state, SessionAction::End), Ok(SessionState::End));
        }
    }

    #[test]
    fn end_state_rejects_everything() {
        for action in ALL_ACTIONS {
            assert!(admin(SessionState::End, action).is_err());
        }
        assert!(next_state(SessionState::End, Trigger::CountdownElapsed).is_err());
        assert!(next_state(SessionState::End, Trigger::QuestionTimeUp).is_err());
    }

    #[test]
    fn admin_actions_follow_the_legality_table() {
        for state in ALL_STATES {
            for action in ALL_ACTIONS {
                let result = admin(state, action);
                assert_eq!(
                    result.is_ok(),
                    allowed_actions(state).contains(&action),
                    "{action:?} from {state:?}"
                );
            }
        }
    }

    #[test]
    fn countdown_only_accepts_end() {
        let err = admin(SessionState::QuestionCountdown, SessionAction::GoToAnswer).unwrap_err();
        assert_eq!(err.from, SessionState::QuestionCountdown);
        assert_eq!(err.trigger, Trigger::Admin(SessionAction::GoToAnswer));
    }

    #[test]
    fn timer_triggers_only_fire_from_their_own_phase() {
        for state in ALL_STATES {
            assert_eq!(
                next_state(state, Trigger::CountdownElapsed).is_ok(),
                state == SessionState::QuestionCountdown
            );
            assert_eq!(
                next_state(state, Trigger::QuestionTimeUp).is_ok(),
                state == SessionState::QuestionOpen
            );
        }
    }

    #[test]
    fn states_and_actions_use_screaming_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&SessionState::QuestionCountdown).unwrap(),
            "\"QUESTION_COUNTDOWN\""
        );
        let action: SessionAction = serde_json::from_str("\"GO_TO_FINAL_RESULTS\"").unwrap();
        assert_eq!(action, SessionAction::GoToFinalResults);
    }
}
