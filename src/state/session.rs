use std::{collections::HashSet, time::Duration};

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use thiserror::Error;
use tokio::time::Instant;

use crate::{
    dao::models::{AnswerEntity, QuestionEntity, QuizEntity},
    state::{
        state_machine::{InvalidTransition, SessionState},
        timer::TimerSlot,
    },
};

/// Identifier of a quiz in the snapshot source.
pub type QuizId = u64;
/// Identifier of a running or archived session.
pub type SessionId = u64;
/// Identifier of a player, unique across the process.
pub type PlayerId = u64;
/// Identifier of a question inside a quiz.
pub type QuestionId = u64;
/// Identifier of an answer inside a question.
pub type AnswerId = u64;

const GENERATED_NAME_LETTERS: usize = 5;
const GENERATED_NAME_DIGITS: usize = 3;

/// Point-in-time copy of a quiz, owned by the session that was started from it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    /// Quiz the snapshot was taken from.
    pub quiz_id: QuizId,
    /// Display name of the quiz.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Questions in play order.
    pub questions: Vec<Question>,
}

impl QuizSnapshot {
    /// Number of questions in the snapshot.
    pub fn num_questions(&self) -> usize {
        self.questions.len()
    }

    /// Sum of every question duration, in seconds.
    pub fn duration(&self) -> u64 {
        self.questions.iter().map(|question| question.duration).sum()
    }

    /// Look a question up by its 1-based position.
    pub fn question(&self, position: usize) -> Option<&Question> {
        position
            .checked_sub(1)
            .and_then(|index| self.questions.get(index))
    }
}

/// A single question of a quiz snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Stable identifier of the question.
    pub question_id: QuestionId,
    /// Question text.
    pub question: String,
    /// Answer window, in seconds.
    pub duration: u64,
    /// Points awarded to fully correct answers.
    pub points: u32,
    /// Possible answers, in display order.
    pub answers: Vec<Answer>,
}

impl Question {
    /// Ids of every correct answer, in display order.
    pub fn correct_answer_ids(&self) -> Vec<AnswerId> {
        self.answers
            .iter()
            .filter(|answer| answer.correct)
            .map(|answer| answer.answer_id)
            .collect()
    }

    fn has_answer(&self, answer_id: AnswerId) -> bool {
        self.answers
            .iter()
            .any(|answer| answer.answer_id == answer_id)
    }
}

/// A possible answer to a question.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Stable identifier of the answer.
    pub answer_id: AnswerId,
    /// Answer text.
    pub answer: String,
    /// Display colour.
    pub colour: String,
    /// Whether selecting this answer is required for a correct submission.
    pub correct: bool,
}

/// Player taking part in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Process-wide unique identifier.
    pub player_id: PlayerId,
    /// Display name, unique within the session.
    pub name: String,
    /// Cumulative score, kept rounded to two decimals.
    pub score: f64,
}

/// Latest answer a player submitted for a question.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Selected answers, without duplicates.
    pub answer_ids: Vec<AnswerId>,
    /// Time between the question opening and this submission.
    pub elapsed: Duration,
}

impl Submission {
    /// Whether the submission selects exactly the given correct set.
    pub fn matches_exactly(&self, correct: &[AnswerId]) -> bool {
        self.answer_ids.len() == correct.len()
            && self.answer_ids.iter().all(|id| correct.contains(id))
    }
}

/// Answer ledger of one question position.
#[derive(Debug, Clone, Default)]
pub struct QuestionState {
    /// When the question became answerable.
    pub opened_at: Option<Instant>,
    /// One entry per player; re-submission replaces the previous one.
    pub answers: IndexMap<PlayerId, Submission>,
}

/// Players who selected one of the correct answers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerBreakdown {
    /// The correct answer.
    pub answer_id: AnswerId,
    /// Names of the players whose submission included it, in join order.
    pub players_correct: Vec<String>,
}

/// Outcome of a closed question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    /// Question the result belongs to.
    pub question_id: QuestionId,
    /// One entry per correct answer.
    pub question_correct_breakdown: Vec<AnswerBreakdown>,
    /// Mean answer time in whole seconds.
    pub average_answer_time: u64,
    /// Share of respondents who selected exactly the correct set, in percent.
    pub percent_correct: u64,
}

/// Chat message sent by a player.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Message text.
    pub message_body: String,
    /// Sender.
    pub player_id: PlayerId,
    /// Sender name at the time of sending.
    pub player_name: String,
    /// Unix timestamp, in seconds.
    pub time_sent: i64,
}

/// Errors raised by session-level operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The requested action is not allowed in the current state.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// `NEXT_QUESTION` was requested on the last question.
    #[error("no next question: session is already at question {at_question}")]
    NoNextQuestion {
        /// Current question position.
        at_question: usize,
    },
    /// Players can only join while the session is in the lobby.
    #[error("session is not in LOBBY (current state {0:?})")]
    NotInLobby(SessionState),
    /// Another player of the session already uses this name.
    #[error("name `{0}` is already taken in this session")]
    DuplicateName(String),
    /// Player id unknown to the session.
    #[error("player {0} does not exist")]
    UnknownPlayer(PlayerId),
    /// Answers are only accepted while a question is open.
    #[error("answers can only be submitted while a question is open (current state {0:?})")]
    AnswerWindowClosed(SessionState),
    /// The question position is out of range or not the current one.
    #[error("question position {position} is not valid (session is at question {at_question})")]
    QuestionPosition {
        /// Requested position.
        position: usize,
        /// Current question position.
        at_question: usize,
    },
    /// Malformed answer submission.
    #[error("invalid answer: {0}")]
    InvalidAnswer(String),
    /// Question details are hidden in the current state.
    #[error("question is not available while the session is in {0:?}")]
    QuestionUnavailable(SessionState),
    /// Results are not available yet in the current state.
    #[error("results are not available while the session is in {0:?}")]
    ResultsUnavailable(SessionState),
    /// Chat message rejected.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

/// Runtime state of one quiz session.
#[derive(Debug)]
pub struct Session {
    /// Identity of the session.
    pub session_id: SessionId,
    /// Quiz snapshot taken at session start.
    pub metadata: QuizSnapshot,
    /// Current state.
    pub state: SessionState,
    /// 1-based position of the current question, 0 before the first one.
    pub at_question: usize,
    /// Player count that automatically starts the first question.
    pub auto_start: usize,
    /// Players in join order.
    pub players: Vec<Player>,
    /// One answer ledger per question position.
    pub question_states: Vec<QuestionState>,
    /// Results, appended as questions close.
    pub question_results: Vec<QuestionResult>,
    /// Chat log.
    pub messages: Vec<Message>,
    /// Pending phase timer, if any.
    pub(crate) timer: TimerSlot,
}

impl Session {
    /// Build a lobby session over its own copy of `metadata`.
    pub fn new(session_id: SessionId, metadata: QuizSnapshot, auto_start: usize) -> Self {
        let question_states = vec![QuestionState::default(); metadata.num_questions()];
        Self {
            session_id,
            metadata,
            state: SessionState::Lobby,
            at_question: 0,
            auto_start,
            players: Vec::new(),
            question_states,
            question_results: Vec::new(),
            messages: Vec::new(),
            timer: TimerSlot::default(),
        }
    }

    /// Number of questions of the session.
    pub fn num_questions(&self) -> usize {
        self.metadata.num_questions()
    }

    /// Question at the current position, if one has been reached.
    pub fn current_question(&self) -> Option<&Question> {
        self.metadata.question(self.at_question)
    }

    /// Look up a player of this session.
    pub fn player(&self, player_id: PlayerId) -> Result<&Player, SessionError> {
        self.players
            .iter()
            .find(|player| player.player_id == player_id)
            .ok_or(SessionError::UnknownPlayer(player_id))
    }

    /// Whether a timer is currently pending.
    pub fn has_pending_timer(&self) -> bool {
        self.timer.is_pending()
    }

    /// Add a player to the lobby. Blank names are replaced by a generated unique one.
    ///
    /// `allocate_id` is only called once every check passed, so rejected joins never
    /// consume an identifier.
    pub fn add_player(
        &mut self,
        name: &str,
        allocate_id: impl FnOnce() -> PlayerId,
    ) -> Result<&Player, SessionError> {
        if self.state != SessionState::Lobby {
            return Err(SessionError::NotInLobby(self.state));
        }

        let name = name.trim();
        let name = if name.is_empty() {
            self.generate_unique_name()
        } else if self.name_taken(name) {
            return Err(SessionError::DuplicateName(name.to_string()));
        } else {
            name.to_string()
        };

        self.players.push(Player {
            player_id: allocate_id(),
            name,
            score: 0.0,
        });
        Ok(&self.players[self.players.len() - 1])
    }

    /// Whether the player count reached the auto-start threshold.
    pub fn should_auto_start(&self) -> bool {
        self.state == SessionState::Lobby && self.players.len() == self.auto_start
    }

    /// Stamp the current question as answerable from `now`.
    pub fn open_current_question(&mut self, now: Instant) {
        if let Some(slot) = self
            .at_question
            .checked_sub(1)
            .and_then(|index| self.question_states.get_mut(index))
        {
            slot.opened_at = Some(now);
        }
    }

    /// Record a player's answer for the open question, replacing any earlier submission.
    pub fn submit_answer(
        &mut self,
        player_id: PlayerId,
        position: usize,
        answer_ids: &[AnswerId],
        now: Instant,
    ) -> Result<(), SessionError> {
        self.player(player_id)?;

        if self.state != SessionState::QuestionOpen {
            return Err(SessionError::AnswerWindowClosed(self.state));
        }

        self.ensure_current_position(position)?;

        let question = self
            .metadata
            .question(position)
            .ok_or(SessionError::QuestionPosition {
                position,
                at_question: self.at_question,
            })?;
        validate_answer_ids(question, answer_ids)?;

        let slot = &mut self.question_states[position - 1];
        let elapsed = slot
            .opened_at
            .map(|opened_at| now.saturating_duration_since(opened_at))
            .unwrap_or_default();
        slot.answers.insert(
            player_id,
            Submission {
                answer_ids: answer_ids.to_vec(),
                elapsed,
            },
        );

        Ok(())
    }

    /// Question shown to players at `position`, when the current state exposes it.
    pub fn question_for_player(&self, position: usize) -> Result<&Question, SessionError> {
        if matches!(
            self.state,
            SessionState::Lobby
                | SessionState::QuestionCountdown
                | SessionState::FinalResults
                | SessionState::End
        ) {
            return Err(SessionError::QuestionUnavailable(self.state));
        }

        self.ensure_current_position(position)?;
        self.metadata
            .question(position)
            .ok_or(SessionError::QuestionPosition {
                position,
                at_question: self.at_question,
            })
    }

    /// Result of the question at `position`, once it has been revealed.
    ///
    /// Earlier questions are always available; the current one only from `ANSWER_SHOW` on.
    pub fn question_result(&self, position: usize) -> Result<&QuestionResult, SessionError> {
        if position == 0 || position > self.num_questions() {
            return Err(SessionError::QuestionPosition {
                position,
                at_question: self.at_question,
            });
        }

        let revealed = position < self.at_question
            || (position == self.at_question
                && matches!(
                    self.state,
                    SessionState::AnswerShow | SessionState::FinalResults | SessionState::End
                ));

        match self.question_results.get(position - 1) {
            Some(result) if revealed => Ok(result),
            _ => Err(SessionError::ResultsUnavailable(self.state)),
        }
    }

    /// Final scoreboard access is limited to `FINAL_RESULTS`.
    pub fn ensure_final_results(&self) -> Result<(), SessionError> {
        if self.state == SessionState::FinalResults {
            Ok(())
        } else {
            Err(SessionError::ResultsUnavailable(self.state))
        }
    }

    /// Players ordered by score, highest first; ties keep join order.
    pub fn ranked_players(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Append a chat message from one of the session's players.
    pub fn send_message(
        &mut self,
        player_id: PlayerId,
        body: &str,
        max_length: usize,
        time_sent: i64,
    ) -> Result<&Message, SessionError> {
        let player_name = self.player(player_id)?.name.clone();

        let length = body.chars().count();
        if length == 0 || length > max_length {
            return Err(SessionError::InvalidMessage(format!(
                "message body must be between 1 and {max_length} characters (got {length})"
            )));
        }

        self.messages.push(Message {
            message_body: body.to_string(),
            player_id,
            player_name,
            time_sent,
        });
        Ok(&self.messages[self.messages.len() - 1])
    }

    fn ensure_current_position(&self, position: usize) -> Result<(), SessionError> {
        if position == 0 || position > self.num_questions() || position != self.at_question {
            return Err(SessionError::QuestionPosition {
                position,
                at_question: self.at_question,
            });
        }
        Ok(())
    }

    fn name_taken(&self, name: &str) -> bool {
        self.players.iter().any(|player| player.name == name)
    }

    fn generate_unique_name(&self) -> String {
        loop {
            let candidate = generate_name();
            if !self.name_taken(&candidate) {
                return candidate;
            }
        }
    }
}

/// Random name made of distinct letters followed by distinct digits, e.g. `qwert123`.
fn generate_name() -> String {
    let mut rng = rand::rng();
    let mut letters: Vec<char> = ('a'..='z').collect();
    let mut digits: Vec<char> = ('0'..='9').collect();
    letters.shuffle(&mut rng);
    digits.shuffle(&mut rng);

    letters
        .into_iter()
        .take(GENERATED_NAME_LETTERS)
        .chain(digits.into_iter().take(GENERATED_NAME_DIGITS))
        .collect()
}

fn validate_answer_ids(question: &Question, answer_ids: &[AnswerId]) -> Result<(), SessionError> {
    if answer_ids.is_empty() {
        return Err(SessionError::InvalidAnswer(
            "at least one answer must be selected".into(),
        ));
    }

    let mut seen = HashSet::new();
    for id in answer_ids {
        if !seen.insert(*id) {
            return Err(SessionError::InvalidAnswer(format!(
                "answer {id} selected more than once"
            )));
        }
        if !question.has_answer(*id) {
            return Err(SessionError::InvalidAnswer(format!(
                "answer {id} does not belong to question {}",
                question.question_id
            )));
        }
    }

    Ok(())
}

impl From<AnswerEntity> for Answer {
    fn from(value: AnswerEntity) -> Self {
        Self {
            answer_id: value.answer_id,
            answer: value.answer,
            colour: value.colour,
            correct: value.correct,
        }
    }
}

impl From<QuestionEntity> for Question {
    fn from(value: QuestionEntity) -> Self {
        Self {
            question_id: value.question_id,
            question: value.question,
            duration: value.duration,
            points: value.points,
            answers: value.answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<QuizEntity> for QuizSnapshot {
    fn from(value: QuizEntity) -> Self {
        Self {
            quiz_id: value.quiz_id,
            name: value.name,
            description: value.description,
            questions: value.questions.into_iter().map(Into::into).collect(),
        }
    }
}
