//! Lockstep playback for a pair of media players.
//!
//! Each pair owns its own re-entrancy guard. When one player fires `play`,
//! `pause`, `seeking` or `seeked`, the coordinator mirrors the action onto the
//! other player and holds the guard for [`GUARD_RELEASE_DELAY`] so the echo
//! event from the mirrored action is ignored instead of bouncing back.
//! The delay is an approximation: a mirrored action slower than the window
//! can still echo.

use crate::render::SyncBinding;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Time differences at or below this are not corrected
pub const SYNC_TOLERANCE: f64 = 0.1;

/// How long the guard stays held after a mirrored action
pub const GUARD_RELEASE_DELAY: Duration = Duration::from_millis(50);

/// Playback refused by the host, e.g. an autoplay policy
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("playback rejected: {0}")]
pub struct PlayError(pub String);

/// Handle to one media player
pub trait MediaPlayer {
    fn play(&mut self) -> Result<(), PlayError>;
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, time: f64);
}

/// Monotonic time source used to expire the guard
pub trait Clock {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced by hand; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    Play,
    Pause,
    Seeking,
    Seeked,
}

impl MediaEvent {
    /// Events a pair subscribes to
    pub const ALL: [MediaEvent; 4] = [
        MediaEvent::Play,
        MediaEvent::Pause,
        MediaEvent::Seeking,
        MediaEvent::Seeked,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MediaEvent::Play => "play",
            MediaEvent::Pause => "pause",
            MediaEvent::Seeking => "seeking",
            MediaEvent::Seeked => "seeked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairSide {
    First,
    Second,
}

impl PairSide {
    pub fn other(&self) -> Self {
        match self {
            PairSide::First => PairSide::Second,
            PairSide::Second => PairSide::First,
        }
    }
}

/// What handling one event did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// Guard was held, nothing mirrored
    Suppressed,
    Played,
    /// Play on the other player failed and was swallowed
    PlayRejected,
    Paused,
    Seeked { to: f64 },
    /// Players already within tolerance
    InTolerance,
}

pub struct SyncCoordinator<P, C = SystemClock> {
    first: P,
    second: P,
    clock: C,
    release_at: Option<Duration>,
    release_delay: Duration,
    tolerance: f64,
}

impl<P: MediaPlayer> SyncCoordinator<P, SystemClock> {
    pub fn new(first: P, second: P) -> Self {
        Self::with_clock(first, second, SystemClock::default())
    }
}

impl<P: MediaPlayer, C: Clock> SyncCoordinator<P, C> {
    pub fn with_clock(first: P, second: P, clock: C) -> Self {
        Self {
            first,
            second,
            clock,
            release_at: None,
            release_delay: GUARD_RELEASE_DELAY,
            tolerance: SYNC_TOLERANCE,
        }
    }

    pub fn is_guard_held(&self) -> bool {
        matches!(self.release_at, Some(at) if self.clock.now() < at)
    }

    /// React to `event` fired by the player on `source`
    pub fn handle(&mut self, source: PairSide, event: MediaEvent) -> SyncOutcome {
        if self.is_guard_held() {
            debug!("Ignoring {} from {:?} while guard is held", event.name(), source);
            return SyncOutcome::Suppressed;
        }

        self.release_at = Some(self.clock.now() + self.release_delay);

        let (origin, target) = match source {
            PairSide::First => (&self.first, &mut self.second),
            PairSide::Second => (&self.second, &mut self.first),
        };

        match event {
            MediaEvent::Play => match target.play() {
                Ok(()) => SyncOutcome::Played,
                Err(e) => {
                    debug!("Mirrored play not started: {}", e);
                    SyncOutcome::PlayRejected
                }
            },
            MediaEvent::Pause => {
                target.pause();
                SyncOutcome::Paused
            }
            MediaEvent::Seeking | MediaEvent::Seeked => {
                let time = origin.current_time();
                if (target.current_time() - time).abs() > self.tolerance {
                    target.set_current_time(time);
                    SyncOutcome::Seeked { to: time }
                } else {
                    SyncOutcome::InTolerance
                }
            }
        }
    }

    pub fn player(&self, side: PairSide) -> &P {
        match side {
            PairSide::First => &self.first,
            PairSide::Second => &self.second,
        }
    }

    pub fn player_mut(&mut self, side: PairSide) -> &mut P {
        match side {
            PairSide::First => &mut self.first,
            PairSide::Second => &mut self.second,
        }
    }

    pub fn into_players(self) -> (P, P) {
        (self.first, self.second)
    }
}

/// Routes player events by element id to the coordinator of their pair
pub struct SyncRegistry<P, C = SystemClock> {
    pairs: HashMap<usize, SyncCoordinator<P, C>>,
    players: HashMap<String, (usize, PairSide)>,
}

impl<P, C> Default for SyncRegistry<P, C> {
    fn default() -> Self {
        Self {
            pairs: HashMap::new(),
            players: HashMap::new(),
        }
    }
}

impl<P: MediaPlayer, C: Clock> SyncRegistry<P, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the two players named by a rendered binding
    pub fn bind(&mut self, binding: &SyncBinding, first: P, second: P, clock: C) {
        self.players
            .insert(binding.first.clone(), (binding.pair, PairSide::First));
        self.players
            .insert(binding.second.clone(), (binding.pair, PairSide::Second));
        self.pairs
            .insert(binding.pair, SyncCoordinator::with_clock(first, second, clock));
    }

    /// Deliver an event from the player with `player_id`; unknown ids are ignored
    pub fn dispatch(&mut self, player_id: &str, event: MediaEvent) -> Option<SyncOutcome> {
        let (pair, side) = *self.players.get(player_id)?;
        let coordinator = self.pairs.get_mut(&pair)?;
        Some(coordinator.handle(side, event))
    }

    pub fn pair(&self, pair: usize) -> Option<&SyncCoordinator<P, C>> {
        self.pairs.get(&pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
