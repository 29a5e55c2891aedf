//! Async owner of one game session.
//!
//! The session lives inside a single tokio task. User commands and timer
//! ticks are handled by one `select!` loop, so every transition runs to
//! completion before the next event is looked at.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use brain_core::model::{BestScores, GameKind};

use crate::error::{DriverError, InputError};
use crate::sessions::{Feedback, GameSession, SessionSnapshot, Transition};

const COMMAND_BUFFER: usize = 16;

enum Command {
    Start {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Submit {
        input: Option<i64>,
        reply: oneshot::Sender<Result<SessionSnapshot, InputError>>,
    },
    Shutdown,
}

/// Handle to a running session task.
///
/// Dropping the handle aborts the task and with it any pending timer.
pub struct SessionDriver {
    game: GameKind,
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: Option<JoinHandle<BestScores>>,
}

impl SessionDriver {
    /// Move `session` and `best` into a new task on the current runtime.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(session: Box<dyn GameSession>, best: BestScores) -> Self {
        let game = session.kind();
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);

        let mut initial = session.snapshot();
        initial.best = best.get(game);
        let (publisher, snapshots) = watch::channel(initial);

        let actor = Actor {
            session,
            best,
            ticker: None,
            revision: 0,
            publisher,
        };
        let task = tokio::spawn(actor.run(receiver));
        debug!(%game, "session driver spawned");

        Self {
            game,
            commands,
            snapshots,
            task: Some(task),
        }
    }

    #[must_use]
    pub fn game(&self) -> GameKind {
        self.game
    }

    /// (Re)start the game.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Stopped` if the task is gone.
    pub async fn start(&self) -> Result<SessionSnapshot, DriverError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Start { reply }).await?;
        response.await.map_err(|_| DriverError::Stopped)
    }

    /// Feed one parsed input value (`None` for an empty entry).
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Input` when the session ignored the value and
    /// `DriverError::Stopped` if the task is gone.
    pub async fn submit(&self, input: Option<i64>) -> Result<SessionSnapshot, DriverError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Submit { input, reply }).await?;
        let snapshot = response.await.map_err(|_| DriverError::Stopped)??;
        Ok(snapshot)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that observes every published snapshot, including ticks.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the task and hand back the best scores it was keeping.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Join` if the task panicked or was cancelled.
    pub async fn shutdown(mut self) -> Result<BestScores, DriverError> {
        let Some(task) = self.task.take() else {
            return Err(DriverError::Stopped);
        };
        if self.commands.send(Command::Shutdown).await.is_err() {
            warn!(game = %self.game, "session task ended before shutdown");
        }
        let best = task.await?;
        debug!(game = %self.game, "session driver stopped");
        Ok(best)
    }

    async fn send(&self, command: Command) -> Result<(), DriverError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| DriverError::Stopped)
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy)]
struct Ticker {
    period: Duration,
    deadline: Instant,
}

struct Actor {
    session: Box<dyn GameSession>,
    best: BestScores,
    ticker: Option<Ticker>,
    revision: u64,
    publisher: watch::Sender<SessionSnapshot>,
}

impl Actor {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> BestScores {
        loop {
            let deadline = self.ticker.map(|ticker| ticker.deadline);
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::Start { reply }) => {
                        let snapshot = self.start();
                        let _ = reply.send(snapshot);
                    }
                    Some(Command::Submit { input, reply }) => {
                        let result = self.submit(input);
                        let _ = reply.send(result);
                    }
                    Some(Command::Shutdown) | None => break,
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(fired) = deadline {
                        self.tick(fired);
                    }
                }
            }
        }
        self.best
    }

    fn start(&mut self) -> SessionSnapshot {
        self.session.start();
        self.ticker = None;
        self.arm(Instant::now());
        info!(game = %self.session.kind(), "game started");
        self.publish(None)
    }

    fn submit(&mut self, input: Option<i64>) -> Result<SessionSnapshot, InputError> {
        let transition = match self.session.submit(input) {
            Ok(transition) => transition,
            Err(err) => {
                debug!(game = %self.session.kind(), ?input, %err, "input ignored");
                return Err(err);
            }
        };
        if transition == Transition::Unchanged {
            // Nothing is published, and the last event's cue must not repeat.
            let mut snapshot = self.publisher.borrow().clone();
            snapshot.feedback = None;
            return Ok(snapshot);
        }
        let feedback = self.feedback(transition, true);
        self.arm(Instant::now());
        Ok(self.publish(feedback))
    }

    fn tick(&mut self, fired: Instant) {
        let transition = self.session.tick();
        let feedback = self.feedback(transition.clone(), false);
        // Next deadline counts from the one that fired, not from wake-up time.
        let previous = self.ticker.take();
        match self.session.tick_interval() {
            Some(period) => {
                self.ticker = Some(Ticker {
                    period,
                    deadline: fired + period,
                });
            }
            None if previous.is_some() => {
                debug!(game = %self.session.kind(), phase = ?self.session.phase(), "timer disarmed");
            }
            None => {}
        }
        if transition != Transition::Unchanged {
            self.publish(feedback);
        }
    }

    /// Bring the timer in line with what the session currently wants.
    ///
    /// An already armed timer with the same period keeps its deadline.
    fn arm(&mut self, from: Instant) {
        let wanted = self.session.tick_interval();
        match (self.ticker, wanted) {
            (Some(ticker), Some(period)) if ticker.period == period => {}
            (_, Some(period)) => {
                if self.ticker.is_none() {
                    debug!(game = %self.session.kind(), ?period, "timer armed");
                }
                self.ticker = Some(Ticker {
                    period,
                    deadline: from + period,
                });
            }
            (Some(_), None) => {
                debug!(game = %self.session.kind(), phase = ?self.session.phase(), "timer disarmed");
                self.ticker = None;
            }
            (None, None) => {}
        }
    }

    fn feedback(&mut self, transition: Transition, from_input: bool) -> Option<Feedback> {
        match transition {
            Transition::Unchanged => None,
            Transition::Advanced => from_input.then_some(Feedback::Correct),
            Transition::Rejected => Some(Feedback::Wrong),
            Transition::RoundComplete => Some(Feedback::RoundComplete),
            Transition::Ended(result) => {
                let new_record = self.best.record(&result);
                info!(
                    game = %result.game,
                    outcome = ?result.outcome,
                    score = %result.score,
                    new_record,
                    "game over"
                );
                Some(Feedback::Finished {
                    outcome: result.outcome,
                    score: result.score,
                    new_record,
                })
            }
        }
    }

    fn publish(&mut self, feedback: Option<Feedback>) -> SessionSnapshot {
        self.revision += 1;
        let mut snapshot = self.session.snapshot();
        snapshot.best = self.best.get(snapshot.game);
        snapshot.feedback = feedback;
        snapshot.ticking = self.ticker.is_some();
        snapshot.revision = self.revision;
        self.publisher.send_replace(snapshot.clone());
        snapshot
    }
}
