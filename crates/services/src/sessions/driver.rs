use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::service::{QuizSession, SessionState};
use super::timer::QuestionTimer;
use super::view::SessionSnapshot;
use super::workflow::QuizLoopService;
use crate::error::DriverError;

const COMMAND_BUFFER: usize = 32;

/// User actions forwarded by the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizCommand {
    StartQuiz {
        topic: String,
        count: usize,
        credential: Option<String>,
    },
    SubmitAnswer(usize),
    Advance,
    Restart,
    NewQuiz,
    Shutdown,
}

/// Shell-side handle to a running `SessionDriver`.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<QuizCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Queue a command. Commands are applied strictly in order.
    ///
    /// # Errors
    ///
    /// Returns `DriverError::Closed` once the driver has stopped.
    pub async fn send(&self, command: QuizCommand) -> Result<(), DriverError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| DriverError::Closed)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the driver and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.commands.send(QuizCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

/// Single-task event loop owning one `QuizSession`.
///
/// Shell commands and countdown ticks arrive on two channels and are applied
/// one at a time. The countdown task is replaced whenever the session epoch
/// changes and dropped as soon as no question is awaiting an answer.
pub struct SessionDriver {
    service: QuizLoopService,
    session: QuizSession,
    timer: Option<QuestionTimer>,
    ticks: mpsc::UnboundedSender<u64>,
    snapshots: watch::Sender<SessionSnapshot>,
    error: Option<String>,
}

impl SessionDriver {
    /// Spawn the driver on the current tokio runtime.
    #[must_use]
    pub fn spawn(service: QuizLoopService) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let session = service.new_session();
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

        let driver = Self {
            session,
            service,
            timer: None,
            ticks: tick_tx,
            snapshots: snapshot_tx,
            error: None,
        };
        let task = tokio::spawn(driver.run(command_rx, tick_rx));

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<QuizCommand>,
        mut ticks: mpsc::UnboundedReceiver<u64>,
    ) {
        loop {
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    None | Some(QuizCommand::Shutdown) => break,
                    Some(command) => self.apply(command).await,
                },
                Some(epoch) = ticks.recv() => {
                    self.service.tick(&mut self.session, epoch);
                }
            }
            self.sync_timer();
            self.publish(false);
        }
        self.timer = None;
        tracing::debug!("session driver stopped");
    }

    async fn apply(&mut self, command: QuizCommand) {
        self.error = None;
        match command {
            QuizCommand::StartQuiz {
                topic,
                count,
                credential,
            } => {
                if self.session.state() != SessionState::Setup {
                    tracing::debug!("ignoring start while a quiz is active");
                    return;
                }
                self.publish(true);
                if let Err(err) = self
                    .service
                    .start_quiz(&mut self.session, &topic, count, credential.as_deref())
                    .await
                {
                    self.error = Some(err.to_string());
                }
            }
            QuizCommand::SubmitAnswer(index) => {
                if let Err(err) = self.service.submit_answer(&mut self.session, index) {
                    self.error = Some(err.to_string());
                }
            }
            QuizCommand::Advance => {
                self.service.advance(&mut self.session).await;
            }
            QuizCommand::Restart => {
                self.service.restart(&mut self.session);
            }
            QuizCommand::NewQuiz => self.service.new_quiz(&mut self.session),
            QuizCommand::Shutdown => {}
        }
    }

    /// Keep exactly one countdown running for the live, unanswered question.
    fn sync_timer(&mut self) {
        if !self.session.countdown_active() {
            if let Some(timer) = self.timer.take() {
                timer.cancel();
            }
            return;
        }
        let epoch = self.session.epoch();
        if self.timer.as_ref().is_some_and(|t| t.epoch() == epoch) {
            return;
        }
        self.timer = Some(QuestionTimer::start(epoch, self.ticks.clone()));
    }

    fn publish(&self, loading: bool) {
        let snapshot = SessionSnapshot::from_session(&self.session)
            .with_loading(loading)
            .with_error(self.error.clone());
        self.snapshots.send_replace(snapshot);
    }
}
