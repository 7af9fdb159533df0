use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::pass::{ObserverCoordinates, PassRecord};
use crate::playback::PlaybackState;
use crate::scene::{Scene, SceneError, SceneEvent, SceneStatus, SvgRenderer, VisualizationError};
use crate::trajectory::Trajectory;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("view session {0} is gone")]
    Closed(Uuid),
}

type Reply<T> = oneshot::Sender<T>;

enum Command {
    SelectPass(PassRecord, Reply<Result<SceneStatus, SceneError>>),
    SetObserver(ObserverCoordinates, Reply<Result<SceneStatus, SceneError>>),
    Toggle(Reply<Result<PlaybackState, SceneError>>),
    Reset(Reply<Result<PlaybackState, SceneError>>),
    Retry(Reply<bool>),
    Close(Reply<()>),
    Status(Reply<SceneStatus>),
    Render(Reply<Result<String, VisualizationError>>),
    Trajectory(Reply<Result<Arc<Trajectory>, SceneError>>),
    SelectedPass(Reply<Option<PassRecord>>),
}

/// Cloneable handle to a running view session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    tx: mpsc::Sender<Command>,
}

#[derive(Debug)]
pub struct Session {
    handle: SessionHandle,
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl Session {
    /// Spawn the actor owning `scene`. Must be called inside a tokio runtime.
    pub fn spawn(scene: Scene, renderer: SvgRenderer, frame_interval: Duration) -> Self {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_session(
            id,
            scene,
            renderer,
            rx,
            stop_rx,
            frame_interval,
        ));
        log::info!("View session {} started", id);
        Self {
            handle: SessionHandle { id, tx },
            stop_tx,
            join,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Stop the actor and wait for it to exit. Outstanding handles fail with
    /// [`SessionError::Closed`] afterwards.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(());
        let _ = self.join.await;
    }
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| SessionError::Closed(self.id))?;
        reply_rx.await.map_err(|_| SessionError::Closed(self.id))
    }

    pub async fn select_pass(
        &self,
        pass: PassRecord,
    ) -> Result<Result<SceneStatus, SceneError>, SessionError> {
        self.request(|r| Command::SelectPass(pass, r)).await
    }

    pub async fn set_observer(
        &self,
        observer: ObserverCoordinates,
    ) -> Result<Result<SceneStatus, SceneError>, SessionError> {
        self.request(|r| Command::SetObserver(observer, r)).await
    }

    pub async fn toggle(&self) -> Result<Result<PlaybackState, SceneError>, SessionError> {
        self.request(Command::Toggle).await
    }

    pub async fn reset(&self) -> Result<Result<PlaybackState, SceneError>, SessionError> {
        self.request(Command::Reset).await
    }

    pub async fn retry(&self) -> Result<bool, SessionError> {
        self.request(Command::Retry).await
    }

    pub async fn close(&self) -> Result<(), SessionError> {
        self.request(Command::Close).await
    }

    pub async fn status(&self) -> Result<SceneStatus, SessionError> {
        self.request(Command::Status).await
    }

    pub async fn render(&self) -> Result<Result<String, VisualizationError>, SessionError> {
        self.request(Command::Render).await
    }

    pub async fn trajectory(&self) -> Result<Result<Arc<Trajectory>, SceneError>, SessionError> {
        self.request(Command::Trajectory).await
    }

    pub async fn selected_pass(&self) -> Result<Option<PassRecord>, SessionError> {
        self.request(Command::SelectedPass).await
    }
}

async fn run_session(
    id: Uuid,
    mut scene: Scene,
    renderer: SvgRenderer,
    mut rx: mpsc::Receiver<Command>,
    mut stop_rx: oneshot::Receiver<()>,
    frame_interval: Duration,
) {
    let mut frames = tokio::time::interval(frame_interval.max(Duration::from_millis(1)));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            command = rx.recv() => match command {
                Some(command) => handle_command(&mut scene, &renderer, command),
                None => break,
            },
            _ = frames.tick() => {
                if scene.has_pending_frames() {
                    for event in scene.run_frames(Instant::now()) {
                        if let SceneEvent::Completed { simulated_time } = event {
                            log::info!("Session {}: pass playback completed at t={:.0}", id, simulated_time);
                        }
                    }
                }
            }
        }
    }

    scene.close();
    log::info!("View session {} stopped", id);
}

fn handle_command(scene: &mut Scene, renderer: &SvgRenderer, command: Command) {
    // A dropped receiver means the caller went away; nothing to do.
    match command {
        Command::SelectPass(pass, reply) => {
            let result = scene.select_pass(pass).map(|()| scene.status());
            if let Err(e) = &result {
                log::warn!("Pass rejected: {}", e);
            }
            let _ = reply.send(result);
        }
        Command::SetObserver(observer, reply) => {
            let _ = reply.send(scene.set_observer(observer).map(|()| scene.status()));
        }
        Command::Toggle(reply) => {
            let _ = reply.send(scene.toggle_playback(Instant::now()));
        }
        Command::Reset(reply) => {
            let _ = reply.send(scene.reset());
        }
        Command::Retry(reply) => {
            let _ = reply.send(scene.retry());
        }
        Command::Close(reply) => {
            scene.close();
            let _ = reply.send(());
        }
        Command::Status(reply) => {
            let _ = reply.send(scene.status());
        }
        Command::Render(reply) => {
            let _ = reply.send(scene.render(renderer));
        }
        Command::Trajectory(reply) => {
            let _ = reply.send(scene.trajectory());
        }
        Command::SelectedPass(reply) => {
            let _ = reply.send(scene.selected_pass().cloned());
        }
    }
}
