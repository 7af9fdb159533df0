use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

use super::error::PlaybackError;
use super::frame::{FrameHandle, FrameScheduler};
use crate::pass::PassRecord;

/// Longest animation played for any pass; longer passes are compressed.
pub const DEFAULT_ANIMATION_CAP: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlaybackPhase {
    Idle,
    Playing,
    Completed,
}

/// Real-time window covered by the animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSpan {
    /// Seconds since epoch.
    pub start: f64,
    pub seconds: f64,
}

impl PassSpan {
    pub fn of(pass: &PassRecord) -> Self {
        Self {
            start: pass.start_time as f64,
            seconds: pass.span_seconds() as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    pub progress: f64,
    pub is_playing: bool,
    /// Simulated UTC time in seconds since epoch.
    pub simulated_time: f64,
}

impl PlaybackState {
    pub fn simulated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis((self.simulated_time * 1000.0).round() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    Advanced(PlaybackState),
    Completed(PlaybackState),
    /// The handle was not the live frame; nothing changed.
    Stale,
}

/// Maps wall-clock time onto progress through a pass.
///
/// Holds at most one live [`FrameHandle`]. Ticks from any other handle are
/// ignored, so a frame that fires after stop or reset cannot move progress.
#[derive(Debug)]
pub struct PlaybackClock {
    span: PassSpan,
    cap: Duration,
    phase: PlaybackPhase,
    progress: f64,
    started_at: Option<Instant>,
    animation_duration: Duration,
    frame: Option<FrameHandle>,
}

impl PlaybackClock {
    pub fn new(span: PassSpan, cap: Duration) -> Self {
        Self {
            span,
            cap,
            phase: PlaybackPhase::Idle,
            progress: 0.0,
            started_at: None,
            animation_duration: Duration::ZERO,
            frame: None,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn live_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn simulated_time(&self) -> f64 {
        self.span.start + self.progress * self.span.seconds.max(0.0)
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            phase: self.phase,
            progress: self.progress,
            is_playing: self.phase == PlaybackPhase::Playing,
            simulated_time: self.simulated_time(),
        }
    }

    /// Real time up to the cap: `min(span, cap)`.
    pub fn animation_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.span.seconds)
            .map(|real| real.min(self.cap))
            .unwrap_or(self.cap)
    }

    pub fn start(
        &mut self,
        now: Instant,
        scheduler: &mut impl FrameScheduler,
    ) -> Result<PlaybackState, PlaybackError> {
        if self.phase == PlaybackPhase::Playing {
            return Err(PlaybackError::AlreadyPlaying);
        }
        if !(self.span.seconds > 0.0 && self.span.seconds.is_finite()) {
            return Err(PlaybackError::EmptySpan {
                seconds: self.span.seconds,
            });
        }

        self.progress = 0.0;
        self.started_at = Some(now);
        self.animation_duration = self.animation_duration();
        self.frame = Some(scheduler.request_frame());
        self.phase = PlaybackPhase::Playing;

        log::debug!("Playback started over {:?}", self.animation_duration);
        Ok(self.state())
    }

    pub fn tick(
        &mut self,
        handle: FrameHandle,
        now: Instant,
        scheduler: &mut impl FrameScheduler,
    ) -> Tick {
        if self.phase != PlaybackPhase::Playing || self.frame != Some(handle) {
            return Tick::Stale;
        }
        self.frame = None;

        let elapsed = self
            .started_at
            .map(|s| now.saturating_duration_since(s))
            .unwrap_or_default();
        self.progress = if self.animation_duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.animation_duration.as_secs_f64()).min(1.0)
        };

        if self.progress >= 1.0 {
            self.phase = PlaybackPhase::Completed;
            self.started_at = None;
            Tick::Completed(self.state())
        } else {
            self.frame = Some(scheduler.request_frame());
            Tick::Advanced(self.state())
        }
    }

    /// Pause. Returns false when nothing was playing.
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.phase != PlaybackPhase::Playing {
            return false;
        }
        if let Some(handle) = self.frame.take() {
            scheduler.cancel_frame(handle);
        }
        self.started_at = None;
        self.phase = PlaybackPhase::Idle;
        true
    }

    pub fn reset(&mut self, scheduler: &mut impl FrameScheduler) {
        self.stop(scheduler);
        self.phase = PlaybackPhase::Idle;
        self.progress = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::FrameQueue;

    fn clock(seconds: f64) -> PlaybackClock {
        PlaybackClock::new(
            PassSpan {
                start: 1_000.0,
                seconds,
            },
            DEFAULT_ANIMATION_CAP,
        )
    }

    fn fire(clock: &mut PlaybackClock, queue: &mut FrameQueue, now: Instant) -> Vec<Tick> {
        queue
            .take_due()
            .into_iter()
            .map(|h| clock.tick(h, now, &mut *queue))
            .collect()
    }

    #[test]
    fn test_short_pass_plays_in_real_time() {
        assert_eq!(clock(8.0).animation_duration(), Duration::from_secs(8));
    }

    #[test]
    fn test_long_pass_is_capped() {
        assert_eq!(clock(600.0).animation_duration(), DEFAULT_ANIMATION_CAP);
    }

    #[test]
    fn test_completes_exactly_once() {
        let mut queue = FrameQueue::new();
        let mut clock = clock(600.0);
        let t0 = Instant::now();
        clock.start(t0, &mut queue).unwrap();

        let ticks = fire(&mut clock, &mut queue, t0 + Duration::from_millis(7_500));
        match ticks.as_slice() {
            [Tick::Advanced(state)] => {
                assert!((state.progress - 0.5).abs() < 1e-9);
                assert!((state.simulated_time - 1_300.0).abs() < 1e-6);
            }
            other => panic!("unexpected ticks {:?}", other),
        }

        let ticks = fire(&mut clock, &mut queue, t0 + DEFAULT_ANIMATION_CAP);
        match ticks.as_slice() {
            [Tick::Completed(state)] => {
                assert_eq!(state.progress, 1.0);
                assert!(!state.is_playing);
                assert!((state.simulated_time - 1_600.0).abs() < 1e-6);
            }
            other => panic!("unexpected ticks {:?}", other),
        }

        assert!(!queue.has_pending());
        assert!(fire(&mut clock, &mut queue, t0 + Duration::from_secs(20)).is_empty());
        assert_eq!(clock.phase(), PlaybackPhase::Completed);
    }

    #[test]
    fn test_empty_span_fails_closed() {
        let mut queue = FrameQueue::new();
        let mut clock = clock(0.0);
        assert_eq!(
            clock.start(Instant::now(), &mut queue),
            Err(PlaybackError::EmptySpan { seconds: 0.0 })
        );
        assert!(!queue.has_pending());
        assert_eq!(clock.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_start_while_playing_is_rejected() {
        let mut queue = FrameQueue::new();
        let mut clock = clock(60.0);
        let t0 = Instant::now();
        clock.start(t0, &mut queue).unwrap();
        assert_eq!(clock.start(t0, &mut queue), Err(PlaybackError::AlreadyPlaying));
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_stop_freezes_progress() {
        let mut queue = FrameQueue::new();
        let mut clock = clock(10.0);
        let t0 = Instant::now();
        clock.start(t0, &mut queue).unwrap();
        fire(&mut clock, &mut queue, t0 + Duration::from_secs(3));
        let frozen = clock.progress();

        let live = clock.live_frame().unwrap();
        assert!(clock.stop(&mut queue));
        assert!(!queue.has_pending());
        assert_eq!(clock.tick(live, t0 + Duration::from_secs(6), &mut queue), Tick::Stale);
        assert_eq!(clock.progress(), frozen);
        assert_eq!(clock.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_start_after_pause_restarts() {
        let mut queue = FrameQueue::new();
        let mut clock = clock(10.0);
        let t0 = Instant::now();
        clock.start(t0, &mut queue).unwrap();
        fire(&mut clock, &mut queue, t0 + Duration::from_secs(4));
        clock.stop(&mut queue);
        assert!((clock.progress() - 0.4).abs() < 1e-9);

        let t1 = t0 + Duration::from_secs(30);
        let state = clock.start(t1, &mut queue).unwrap();
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.simulated_time, 1_000.0);

        fire(&mut clock, &mut queue, t1 + Duration::from_secs(1));
        assert!((clock.progress() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut queue = FrameQueue::new();
        let mut clock = clock(10.0);
        let t0 = Instant::now();
        clock.start(t0, &mut queue).unwrap();
        fire(&mut clock, &mut queue, t0 + Duration::from_secs(12));
        assert_eq!(clock.phase(), PlaybackPhase::Completed);

        clock.reset(&mut queue);
        assert_eq!(clock.phase(), PlaybackPhase::Idle);
        assert_eq!(clock.progress(), 0.0);
        assert_eq!(clock.simulated_time(), 1_000.0);
    }

    #[test]
    fn test_restart_after_completion() {
        let mut queue = FrameQueue::new();
        let mut clock = clock(10.0);
        let t0 = Instant::now();
        clock.start(t0, &mut queue).unwrap();
        fire(&mut clock, &mut queue, t0 + Duration::from_secs(10));

        let t1 = t0 + Duration::from_secs(11);
        let state = clock.start(t1, &mut queue).unwrap();
        assert_eq!(state.progress, 0.0);
        assert!(state.is_playing);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(PlaybackPhase::Completed.to_string(), "completed");
    }
}
