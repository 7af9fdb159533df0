use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::error::{SceneError, VisualizationError};
use super::render::SceneRenderer;
use crate::geometry::{observer_position, Point3};
use crate::pass::{ObserverCoordinates, PassRecord, PassSummary};
use crate::playback::{
    FrameQueue, PassSpan, PlaybackClock, PlaybackPhase, PlaybackState, Tick, DEFAULT_ANIMATION_CAP,
};
use crate::trajectory::{
    Trajectory, TrajectoryCache, TrajectoryGenerator, TrajectoryPoint, TrajectoryResult,
};

pub const GLOBE_RADIUS: f64 = 1.0;
pub const DEFAULT_OBSERVER_RADIUS: f64 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub generator: TrajectoryGenerator,
    pub observer_radius: f64,
    pub animation_cap: Duration,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            generator: TrajectoryGenerator::default(),
            observer_radius: DEFAULT_OBSERVER_RADIUS,
            animation_cap: DEFAULT_ANIMATION_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SceneEvent {
    Progress { progress: f64, simulated_time: f64 },
    Completed { simulated_time: f64 },
}

/// Geometry handed to a [`SceneRenderer`] for one frame.
#[derive(Debug, Clone)]
pub struct SceneFrame<'a> {
    pub globe_radius: f64,
    pub observer: Point3,
    pub path: &'a [TrajectoryPoint],
    pub satellite: Option<Point3>,
    pub has_data: bool,
}

impl SceneFrame<'_> {
    pub fn validate(&self) -> Result<(), VisualizationError> {
        if !self.observer.is_finite() {
            return Err(VisualizationError::InvalidGeometry(
                "observer marker is not finite".into(),
            ));
        }
        if let Some(p) = self.path.iter().find(|p| !p.position.is_finite()) {
            return Err(VisualizationError::InvalidGeometry(format!(
                "trajectory point {} is not finite",
                p.index
            )));
        }
        if self.satellite.is_some_and(|s| !s.is_finite()) {
            return Err(VisualizationError::InvalidGeometry(
                "satellite marker is not finite".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SceneStatus {
    pub observer: ObserverCoordinates,
    pub playback: Option<PlaybackState>,
    pub simulated_at: Option<DateTime<Utc>>,
    pub summary: Option<PassSummary>,
    pub has_data: bool,
    pub no_data_reason: Option<String>,
    pub fault: Option<String>,
}

#[derive(Debug)]
struct PassSession {
    pass: PassRecord,
    trajectory: TrajectoryResult,
    clock: PlaybackClock,
    satellite: Option<TrajectoryPoint>,
}

impl PassSession {
    fn move_satellite(&mut self, progress: f64) {
        self.satellite = self
            .trajectory
            .as_ref()
            .ok()
            .and_then(|t| t.sample_at(progress).copied());
    }
}

/// Globe, observer, pass trajectory and satellite marker for one view.
///
/// Owns all playback state. Frames are requested through the scene's
/// [`FrameQueue`] and fired by the host via [`Scene::run_frames`].
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    observer: ObserverCoordinates,
    observer_marker: Point3,
    cache: TrajectoryCache,
    session: Option<PassSession>,
    frames: FrameQueue,
    fault: Option<VisualizationError>,
}

impl Scene {
    pub fn new(config: SceneConfig, observer: ObserverCoordinates) -> Self {
        Self {
            config,
            observer,
            observer_marker: observer_position(&observer, config.observer_radius),
            cache: TrajectoryCache::new(config.generator),
            session: None,
            frames: FrameQueue::new(),
            fault: None,
        }
    }

    pub fn selected_pass(&self) -> Option<&PassRecord> {
        self.session.as_ref().map(|s| &s.pass)
    }

    /// Trajectory of the selected pass, or why there is none.
    pub fn trajectory(&self) -> Result<Arc<Trajectory>, SceneError> {
        let session = self.session.as_ref().ok_or(SceneError::NoPass)?;
        session.trajectory.clone().map_err(SceneError::NoData)
    }

    pub fn generations(&self) -> usize {
        self.cache.generations()
    }

    pub fn has_pending_frames(&self) -> bool {
        self.frames.has_pending()
    }

    pub fn playback(&self) -> Option<PlaybackState> {
        self.session.as_ref().map(|s| s.clock.state())
    }

    pub fn fault(&self) -> Option<&VisualizationError> {
        self.fault.as_ref()
    }

    /// Replace the observer. Playback of the current pass is rewound.
    pub fn set_observer(&mut self, observer: ObserverCoordinates) -> Result<(), SceneError> {
        observer.validate().map_err(SceneError::InvalidInput)?;
        if let Some(session) = self.session.as_mut() {
            session.clock.reset(&mut self.frames);
            session.move_satellite(0.0);
        }
        self.observer = observer;
        self.observer_marker = observer_position(&observer, self.config.observer_radius);
        Ok(())
    }

    /// Select a pass, cancelling any running playback.
    ///
    /// A rejected pass is still selected; the scene then shows no data and
    /// refuses to play it.
    pub fn select_pass(&mut self, pass: PassRecord) -> Result<(), SceneError> {
        if let Some(mut previous) = self.session.take() {
            previous.clock.stop(&mut self.frames);
        }

        let trajectory = self.cache.get_or_generate(&pass);
        let clock = PlaybackClock::new(PassSpan::of(&pass), self.config.animation_cap);
        let mut session = PassSession {
            pass,
            trajectory,
            clock,
            satellite: None,
        };
        session.move_satellite(0.0);

        let result = match &session.trajectory {
            Ok(t) => {
                log::info!("Pass selected, {} trajectory points", t.len());
                Ok(())
            }
            Err(e) => Err(SceneError::NoData(e.clone())),
        };
        self.session = Some(session);
        result
    }

    pub fn play(&mut self, now: Instant) -> Result<PlaybackState, SceneError> {
        let session = self.session.as_mut().ok_or(SceneError::NoPass)?;
        if let Err(e) = &session.trajectory {
            return Err(SceneError::NoData(e.clone()));
        }
        let state = session.clock.start(now, &mut self.frames)?;
        session.move_satellite(state.progress);
        Ok(state)
    }

    pub fn pause(&mut self) -> Result<PlaybackState, SceneError> {
        let session = self.session.as_mut().ok_or(SceneError::NoPass)?;
        session.clock.stop(&mut self.frames);
        Ok(session.clock.state())
    }

    /// Play up to `progress` of the animation and hold there.
    pub fn seek(&mut self, progress: f64, now: Instant) -> Result<PlaybackState, SceneError> {
        self.play(now)?;
        let duration = self
            .session
            .as_ref()
            .ok_or(SceneError::NoPass)?
            .clock
            .animation_duration();
        self.run_frames(now + duration.mul_f64(progress.clamp(0.0, 1.0)));
        self.pause()
    }

    pub fn toggle_playback(&mut self, now: Instant) -> Result<PlaybackState, SceneError> {
        match self.playback() {
            Some(state) if state.is_playing => self.pause(),
            _ => self.play(now),
        }
    }

    pub fn reset(&mut self) -> Result<PlaybackState, SceneError> {
        let session = self.session.as_mut().ok_or(SceneError::NoPass)?;
        session.clock.reset(&mut self.frames);
        session.move_satellite(0.0);
        Ok(session.clock.state())
    }

    /// Tear down the current pass. Pending frames are dropped.
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.clock.stop(&mut self.frames);
            log::info!("Visualization closed");
        }
        self.frames.clear();
        self.fault = None;
    }

    /// Fire every frame due at `now`.
    pub fn run_frames(&mut self, now: Instant) -> Vec<SceneEvent> {
        let due = self.frames.take_due();
        let mut events = Vec::new();
        let Some(session) = self.session.as_mut() else {
            return events;
        };

        for handle in due {
            match session.clock.tick(handle, now, &mut self.frames) {
                Tick::Advanced(state) => {
                    session.move_satellite(state.progress);
                    events.push(SceneEvent::Progress {
                        progress: state.progress,
                        simulated_time: state.simulated_time,
                    });
                }
                Tick::Completed(state) => {
                    session.move_satellite(state.progress);
                    events.push(SceneEvent::Progress {
                        progress: state.progress,
                        simulated_time: state.simulated_time,
                    });
                    events.push(SceneEvent::Completed {
                        simulated_time: state.simulated_time,
                    });
                }
                Tick::Stale => log::debug!("Ignored stale frame {}", handle.id()),
            }
        }
        events
    }

    pub fn frame(&self) -> SceneFrame<'_> {
        let trajectory = self
            .session
            .as_ref()
            .and_then(|s| s.trajectory.as_ref().ok());
        SceneFrame {
            globe_radius: GLOBE_RADIUS,
            observer: self.observer_marker,
            path: trajectory.map(|t| t.points.as_slice()).unwrap_or(&[]),
            satellite: self
                .session
                .as_ref()
                .and_then(|s| s.satellite.map(|p| p.position)),
            has_data: trajectory.is_some_and(|t| !t.is_empty()),
        }
    }

    /// Render the current frame. Failures are kept as the scene's fault and
    /// block rendering until [`Scene::retry`].
    pub fn render<R: SceneRenderer>(&mut self, renderer: &R) -> Result<R::Output, VisualizationError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        let result = {
            let frame = self.frame();
            frame.validate().and_then(|()| renderer.render(&frame))
        };

        result.inspect_err(|e| {
            log::error!("Visualization error: {}", e);
            self.fault = Some(e.clone());
        })
    }

    pub fn retry(&mut self) -> bool {
        self.fault.take().is_some()
    }

    pub fn status(&self) -> SceneStatus {
        let playback = self.playback();
        let session = self.session.as_ref();
        SceneStatus {
            observer: self.observer,
            playback,
            simulated_at: playback.and_then(|p| p.simulated_at()),
            summary: session.and_then(|s| s.pass.summary().ok()),
            has_data: self.frame().has_data,
            no_data_reason: session.and_then(|s| s.trajectory.as_ref().err().map(|e| e.to_string())),
            fault: self.fault.as_ref().map(|f| f.to_string()),
        }
    }

    pub fn phase(&self) -> Option<PlaybackPhase> {
        self.playback().map(|p| p.phase)
    }
}
