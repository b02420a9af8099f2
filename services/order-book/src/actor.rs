//! Single-writer session actor
//!
//! One tokio task owns a [`Session`] and applies events to it strictly in
//! the order they were queued. Feed frames travel through the same queue and
//! are matched against the session's product only when their turn comes, so
//! a queued `ToggleProduct` is honoured by every frame behind it. After each applied transition it publishes a
//! fresh `Arc<BookSnapshot>` on a watch channel; readers only ever see
//! immutable snapshots. Handles are cheap to clone and several actors (one
//! per product, say) can run side by side.
//!
//! The actor stops when every handle has been dropped and returns the final
//! session.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use types::ids::SessionId;

use crate::config::BookConfig;
use crate::events::SessionEvent;
use crate::feed::{parse_frame, FeedError, FeedMessage};
use crate::machine::{Outcome, Session};
use crate::snapshot::BookSnapshot;

/// Errors returned by [`SessionHandle`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session {0} has stopped")]
    Closed(SessionId),

    #[error("session {0} event queue is full")]
    QueueFull(SessionId),

    #[error("undecodable frame: {0}")]
    Feed(#[from] FeedError),
}

/// Running counters for one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorStats {
    pub events_applied: u64,
    pub events_ignored: u64,
    /// Book frames for a product other than the active one.
    pub frames_dropped: u64,
}

/// What travels over the actor's queue.
#[derive(Debug)]
enum Command {
    Event(SessionEvent),
    Frame(FeedMessage),
}

/// Sending side of a session actor.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<BookSnapshot>>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Queue an event, waiting for space if the queue is full.
    pub async fn send(&self, event: SessionEvent) -> Result<(), SessionError> {
        self.enqueue(Command::Event(event)).await
    }

    /// Queue an event without waiting.
    pub fn try_send(&self, event: SessionEvent) -> Result<(), SessionError> {
        self.commands
            .try_send(Command::Event(event))
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => SessionError::QueueFull(self.id),
                mpsc::error::TrySendError::Closed(_) => SessionError::Closed(self.id),
            })
    }

    /// Classify a raw feed frame and queue it for the session.
    ///
    /// Returns `Ok(false)` for control frames, which are not queued. Book
    /// frames are queued as-is; the actor drops those for another product
    /// once it reaches them.
    pub async fn send_frame(&self, raw: &str) -> Result<bool, SessionError> {
        let message = parse_frame(raw)?;
        if matches!(message, FeedMessage::Control { .. }) {
            return Ok(false);
        }
        self.enqueue(Command::Frame(message)).await?;
        Ok(true)
    }

    async fn enqueue(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed(self.id))
    }

    /// The most recently published snapshot.
    pub fn current(&self) -> Arc<BookSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<BookSnapshot>> {
        self.snapshots.clone()
    }
}

/// The task that owns a session.
pub struct SessionActor {
    session: Session,
    config: Arc<BookConfig>,
    commands: mpsc::Receiver<Command>,
    publisher: watch::Sender<Arc<BookSnapshot>>,
    stats: ActorStats,
}

impl SessionActor {
    /// Create an actor around `session` and the handle that feeds it.
    pub fn new(session: Session, config: Arc<BookConfig>) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let (publisher, snapshots) = watch::channel(Arc::new(BookSnapshot::from_session(&session)));
        let handle = SessionHandle {
            id: session.id(),
            commands: tx,
            snapshots,
        };
        let actor = Self {
            session,
            config,
            commands: rx,
            publisher,
            stats: ActorStats::default(),
        };
        (actor, handle)
    }

    /// Spawn an actor for a fresh session on the configured default product.
    pub fn spawn(config: BookConfig) -> (SessionHandle, JoinHandle<Session>) {
        let session = Session::from_config(&config);
        let (actor, handle) = Self::new(session, Arc::new(config));
        (handle, tokio::spawn(actor.run()))
    }

    pub fn stats(&self) -> ActorStats {
        self.stats
    }

    /// Apply one event and publish if it changed the session.
    pub fn handle_event(&mut self, event: SessionEvent) -> Outcome {
        let from = self.session.state();
        let outcome = self.session.apply(&event, &self.config);

        match outcome {
            Outcome::Applied => {
                self.stats.events_applied += 1;
                let to = self.session.state();
                if from != to {
                    info!(
                        session = %self.session.id(),
                        event = event.label(),
                        from = from.label(),
                        to = to.label(),
                        "Session state changed"
                    );
                } else {
                    debug!(
                        session = %self.session.id(),
                        event = event.label(),
                        levels = event.level_count(),
                        asks = self.session.asks().len(),
                        bids = self.session.bids().len(),
                        "Event applied"
                    );
                }
                self.publisher
                    .send_replace(Arc::new(BookSnapshot::from_session(&self.session)));
            }
            Outcome::Ignored => {
                self.stats.events_ignored += 1;
                debug!(
                    session = %self.session.id(),
                    event = event.label(),
                    state = from.label(),
                    "Event ignored in current state"
                );
            }
        }

        outcome
    }

    /// Apply a classified frame against the current product.
    ///
    /// Returns `None` when the frame produced no event.
    pub fn handle_frame(&mut self, message: FeedMessage) -> Option<Outcome> {
        let is_book = matches!(
            message,
            FeedMessage::Snapshot { .. } | FeedMessage::Delta { .. }
        );
        match message.into_event(self.session.product()) {
            Some(event) => Some(self.handle_event(event)),
            None => {
                if is_book {
                    self.stats.frames_dropped += 1;
                }
                None
            }
        }
    }

    /// Process events until every handle is dropped.
    pub async fn run(mut self) -> Session {
        info!(
            session = %self.session.id(),
            product = %self.session.product(),
            grouping = %self.session.grouping(),
            "Session actor started"
        );

        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Event(event) => {
                    self.handle_event(event);
                }
                Command::Frame(message) => {
                    self.handle_frame(message);
                }
            }
        }

        info!(
            session = %self.session.id(),
            applied = self.stats.events_applied,
            ignored = self.stats.events_ignored,
            dropped = self.stats.frames_dropped,
            "Session actor stopped"
        );
        self.session
    }
}
