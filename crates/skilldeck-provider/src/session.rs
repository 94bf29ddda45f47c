//! Test-drive chat session
//!
//! An ephemeral, per-skill conversation with the completion endpoint:
//!
//! ```text
//! Closed ──open──▶ AwaitingInput ──submit──▶ WaitingForReply
//!    ▲                  ▲    │                    │
//!    └──────close───────┴────┘◀──────resolve──────┘
//! ```
//!
//! Only one request may be in flight. Each `submit` and each `close` bumps a
//! generation counter; a reply whose token no longer matches is dropped, so
//! nothing is appended after a session has been closed or superseded.

use skilldeck_types::{ChatMessage, Role, Skill};
use tracing::{debug, info, warn};

use crate::error::CompletionError;
use crate::prompt::{greeting, system_prompt, CONNECTION_ERROR_MESSAGE, MISSING_KEY_MESSAGE};
use crate::CompletionBackend;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    AwaitingInput,
    WaitingForReply,
}

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// A request the caller must send to the completion backend
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub token: RequestToken,
    /// Full transcript: system prompt, prior turns, new user turn
    pub messages: Vec<ChatMessage>,
}

/// A chat session for one skill. The transcript lives only as long as the
/// session value.
#[derive(Debug)]
pub struct TestDriveSession {
    skill: Skill,
    transcript: Vec<ChatMessage>,
    state: SessionState,
    generation: u64,
}

impl TestDriveSession {
    pub fn new(skill: Skill) -> Self {
        Self {
            skill,
            transcript: Vec::new(),
            state: SessionState::Closed,
            generation: 0,
        }
    }

    /// Open the session window. The system prompt and greeting are seeded
    /// only on the first open.
    pub fn open(&mut self) {
        if self.state != SessionState::Closed {
            return;
        }

        if self.transcript.is_empty() {
            self.transcript.push(ChatMessage::system(system_prompt(&self.skill)));
            self.transcript.push(ChatMessage::assistant(greeting(&self.skill)));
            info!("Test drive opened for {}", self.skill.slug);
        } else {
            debug!("Test drive reopened for {}", self.skill.slug);
        }

        self.state = SessionState::AwaitingInput;
    }

    /// Close the window, discarding any reply still in flight
    pub fn close(&mut self) {
        if self.state == SessionState::WaitingForReply {
            debug!("Closing {} with a reply pending; it will be dropped", self.skill.slug);
        }
        self.generation += 1;
        self.state = SessionState::Closed;
    }

    /// Append a user turn and hand back the request to send.
    ///
    /// Returns `None` (and changes nothing) unless the session is awaiting
    /// input and `input` has non-whitespace content. Submissions made while
    /// waiting are dropped, not queued.
    pub fn submit(&mut self, input: &str) -> Option<PendingReply> {
        if self.state != SessionState::AwaitingInput || input.trim().is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(input));
        self.generation += 1;
        self.state = SessionState::WaitingForReply;

        Some(PendingReply {
            token: RequestToken(self.generation),
            messages: self.transcript.clone(),
        })
    }

    /// Apply the outcome of a request. Returns `false` if the token is stale
    /// and the outcome was discarded.
    ///
    /// Failures become fixed assistant messages; the user turn that caused
    /// them stays in the transcript and is sent again with the next request.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        outcome: Result<String, CompletionError>,
    ) -> bool {
        if self.state != SessionState::WaitingForReply || token.0 != self.generation {
            debug!("Dropping stale reply for {}", self.skill.slug);
            return false;
        }

        let content = match outcome {
            Ok(text) => text,
            Err(CompletionError::MissingCredential) => MISSING_KEY_MESSAGE.to_string(),
            Err(e) => {
                warn!("Test drive request for {} failed: {}", self.skill.slug, e);
                CONNECTION_ERROR_MESSAGE.to_string()
            }
        };

        self.transcript.push(ChatMessage::assistant(content));
        self.state = SessionState::AwaitingInput;
        true
    }

    /// Submit `input`, wait for the backend and apply the reply.
    ///
    /// Returns the appended assistant message, or `None` if the input was
    /// ignored.
    pub async fn exchange<B>(&mut self, backend: &B, input: &str) -> Option<&ChatMessage>
    where
        B: CompletionBackend + ?Sized,
    {
        let pending = self.submit(input)?;
        let outcome = backend.complete(&pending.messages).await;
        if self.resolve(pending.token, outcome) {
            self.transcript.last()
        } else {
            None
        }
    }

    pub fn skill(&self) -> &Skill {
        &self.skill
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the input affordance should be enabled
    pub fn accepts_input(&self) -> bool {
        self.state == SessionState::AwaitingInput
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Transcript without the hidden system prompt
    pub fn visible_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.transcript.iter().filter(|m| m.role != Role::System)
    }
}
