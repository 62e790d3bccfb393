use crate::error::ChatError;
use crate::query::QueryService;
use crate::session::store::SessionStore;
use crate::session::{Message, SessionId};

pub const ACKNOWLEDGMENT: &str =
    "Here are the results for your request. Use the sidebar outputs to view SQL, table, and chart.";
pub const FAILURE_REPLY: &str = "Sorry, I couldn't process that request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Processing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Answered,
    /// The service failed; carries the cause. Prior query output was kept.
    Failed(String),
}

/// Runs user turns against a query service, one at a time.
pub struct ConversationController<S> {
    service: S,
    state: TurnState,
}

impl<S: QueryService> ConversationController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: TurnState::Idle,
        }
    }

    /// Turns run to completion inside `submit`, so callers only ever observe `Idle`.
    #[cfg(test)]
    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn submit(
        &mut self,
        store: &mut SessionStore,
        id: SessionId,
        input: &str,
    ) -> Result<TurnOutcome, ChatError> {
        debug_assert_eq!(self.state, TurnState::Idle);
        if input.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }
        store.get(id)?;

        self.state = TurnState::Processing;
        let outcome = self.run_turn(store, id, input);
        self.state = TurnState::Idle;
        outcome
    }

    fn run_turn(
        &self,
        store: &mut SessionStore,
        id: SessionId,
        input: &str,
    ) -> Result<TurnOutcome, ChatError> {
        store.get_mut(id)?.push_message(Message::user(input));

        let outcome = match self.service.answer(input) {
            Ok(answer) => {
                let session = store.get_mut(id)?;
                session.record_answer(answer.sql, answer.table);
                session.push_message(Message::assistant(ACKNOWLEDGMENT));
                TurnOutcome::Answered
            }
            Err(err) => {
                tracing::warn!(session = %id, error = %err, "query service failed");
                store
                    .get_mut(id)?
                    .push_message(Message::assistant(FAILURE_REPLY));
                TurnOutcome::Failed(err.to_string())
            }
        };

        store.refresh_suggestions(id)?;
        Ok(outcome)
    }
}
