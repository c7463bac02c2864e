//! Room actor: one Tokio task per room, owning its [`RoomSession`].
//!
//! Commands arrive on an mpsc channel and are applied one at a time, so a
//! play is always validated against the board it will be committed to.
//! A commit that has started runs to the end even if its caller goes away.

use std::collections::HashMap;
use std::sync::Arc;

use scrabr_protocol::{PlayerId, RoomCode, RoomView, ServerEvent};
use scrabr_rules::{DictionaryOracle, Placement};
use tokio::sync::{mpsc, oneshot};

use crate::session::Outbox;
use crate::{RoomError, RoomSession};

/// Channel a room uses to push events to one player's connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

type Reply<T> = oneshot::Sender<Result<T, RoomError>>;

pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
        reply: Reply<()>,
    },

    /// Replies with the number of players left.
    Leave {
        player_id: PlayerId,
        reply: Reply<usize>,
    },

    ToggleReady {
        player_id: PlayerId,
        reply: Reply<()>,
    },

    /// A dry run. Dropping the reply receiver abandons it.
    CheckPlay {
        player_id: PlayerId,
        placements: Vec<Placement>,
        reply: Reply<()>,
    },

    Play {
        player_id: PlayerId,
        placements: Vec<Placement>,
        reply: Reply<()>,
    },

    Skip {
        player_id: PlayerId,
        reply: Reply<()>,
    },

    View {
        player_id: PlayerId,
        reply: oneshot::Sender<RoomView>,
    },

    Shutdown,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Sends a command that carries a reply channel and waits for the answer.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Join {
            player_id,
            name,
            sender,
            reply,
        })
        .await?
    }

    /// Removes a player and returns how many remain.
    pub async fn leave(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        self.request(|reply| RoomCommand::Leave { player_id, reply })
            .await?
    }

    pub async fn toggle_ready(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::ToggleReady { player_id, reply })
            .await?
    }

    /// Asks for a price on a tentative play. The result goes to the
    /// player's channel; this returns once the room has handled it.
    ///
    /// Cancelling this future before the room reaches the request
    /// abandons the check.
    pub async fn check_play(
        &self,
        player_id: PlayerId,
        placements: Vec<Placement>,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::CheckPlay {
            player_id,
            placements,
            reply,
        })
        .await?
    }

    pub async fn play(
        &self,
        player_id: PlayerId,
        placements: Vec<Placement>,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Play {
            player_id,
            placements,
            reply,
        })
        .await?
    }

    pub async fn skip(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Skip { player_id, reply })
            .await?
    }

    /// The room as `player_id` sees it.
    pub async fn view(&self, player_id: PlayerId) -> Result<RoomView, RoomError> {
        self.request(|reply| RoomCommand::View { player_id, reply })
            .await
    }

    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

struct RoomActor<D: DictionaryOracle> {
    session: RoomSession,
    senders: HashMap<PlayerId, PlayerSender>,
    oracle: Arc<D>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl<D: DictionaryOracle> RoomActor<D> {
    async fn run(mut self) {
        let code = self.session.code().clone();
        tracing::info!(room = %code, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    name,
                    sender,
                    reply,
                } => {
                    let result = self.session.join(player_id, name);
                    if result.is_ok() {
                        self.senders.insert(player_id, sender);
                    }
                    let _ = reply.send(self.settle(player_id, result));
                }
                RoomCommand::Leave { player_id, reply } => {
                    let result = self.session.leave(player_id);
                    self.senders.remove(&player_id);
                    let outcome = self
                        .settle(player_id, result)
                        .map(|()| self.session.player_count());
                    let _ = reply.send(outcome);
                }
                RoomCommand::ToggleReady { player_id, reply } => {
                    let result = self.session.toggle_ready(player_id);
                    let _ = reply.send(self.settle(player_id, result));
                }
                RoomCommand::CheckPlay {
                    player_id,
                    placements,
                    reply,
                } => {
                    if reply.is_closed() {
                        tracing::debug!(room = %code, %player_id, "check abandoned");
                        continue;
                    }
                    let result = self
                        .session
                        .check_play(player_id, &placements, self.oracle.as_ref())
                        .await;
                    if reply.is_closed() {
                        continue;
                    }
                    let _ = reply.send(self.settle(player_id, result));
                }
                RoomCommand::Play {
                    player_id,
                    placements,
                    reply,
                } => {
                    let result = self
                        .session
                        .commit_play(player_id, &placements, self.oracle.as_ref())
                        .await;
                    let _ = reply.send(self.settle(player_id, result));
                }
                RoomCommand::Skip { player_id, reply } => {
                    let result = self.session.skip(player_id);
                    let _ = reply.send(self.settle(player_id, result));
                }
                RoomCommand::View { player_id, reply } => {
                    let _ = reply.send(self.session.view_for(player_id));
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room = %code, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room = %code, "room actor stopped");
    }

    /// Delivers the events of a successful command, or tells the requester
    /// why it failed. Other players never hear about failures.
    fn settle(
        &self,
        player_id: PlayerId,
        result: Result<Outbox, RoomError>,
    ) -> Result<(), RoomError> {
        let err = match result {
            Ok(events) => {
                self.dispatch(events);
                return Ok(());
            }
            Err(err) => err,
        };

        let code = self.session.code();
        if err.is_desync() {
            tracing::debug!(room = %code, %player_id, error = %err, "stale request, resyncing");
            if self.session.contains(player_id) {
                self.dispatch(self.session.snapshot_for(player_id));
            }
        } else if err.is_rule_violation() {
            tracing::debug!(room = %code, %player_id, error = %err, "play rejected");
            self.send_to(player_id, ServerEvent::PlayRejected);
        } else {
            if matches!(err, RoomError::Internal(_)) {
                tracing::warn!(room = %code, %player_id, error = %err, "command aborted");
            }
            self.send_to(
                player_id,
                ServerEvent::Error {
                    message: err.to_string(),
                },
            );
        }
        Err(err)
    }

    fn dispatch(&self, events: Outbox) {
        for (recipient, event) in events {
            for (pid, sender) in &self.senders {
                if recipient.includes(*pid) {
                    let _ = sender.send(event.clone());
                }
            }
        }
    }

    /// Silently drops the event if the player's connection is gone.
    fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(event);
        }
    }
}

/// Spawns an actor for `session` and returns a handle to it.
pub(crate) fn spawn_room<D: DictionaryOracle>(
    session: RoomSession,
    oracle: Arc<D>,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let code = session.code().clone();

    let actor = RoomActor {
        session,
        senders: HashMap::new(),
        oracle,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
