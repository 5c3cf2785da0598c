//! The stopwatch state machine.
//!
//! The machine has a single superstate that owns the accumulated time and two
//! substates, [`State::Stopped`] and [`State::Running`]. Reset belongs to the
//! superstate: it applies from either substate and always lands in `Stopped`
//! with nothing accumulated.

use crate::clock::{Clock, SystemClock};
use std::cell::Cell;
use std::fmt::{Display, Formatter};
use std::time::{Duration, SystemTime};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Starts a stopped stopwatch or stops a running one.
    Toggle,
    /// Zeroes the stopwatch and stops it, discarding any running interval.
    Reset,
}

/// The wall clock moved in a way that makes the elapsed time meaningless.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClockFault {
    #[error("clock reads {behind:?} before the running interval started")]
    BeforeStart { behind: Duration },
    #[error("elapsed time went backwards from {previous:?} to {current:?}")]
    Regressed { previous: Duration, current: Duration },
}

#[derive(Debug, Clone)]
pub struct Running {
    start: SystemTime,
    // Largest elapsed time handed out during this interval.
    observed: Cell<Duration>,
}

impl Running {
    fn new(start: SystemTime) -> Self {
        Self {
            start,
            observed: Cell::new(Duration::ZERO),
        }
    }

    pub fn start(&self) -> SystemTime {
        self.start
    }

    // Never folds less than an elapsed time already handed out.
    fn fold(&self, accumulated: Duration, now: SystemTime) -> Duration {
        let interval = match now.duration_since(self.start) {
            Ok(interval) => interval,
            Err(e) => {
                tracing::warn!(
                    behind = ?e.duration(),
                    "Clock moved behind the start of the running interval"
                );
                Duration::ZERO
            }
        };
        let reported = self.observed.get().saturating_sub(accumulated);

        if interval < reported {
            tracing::warn!(
                ?interval,
                ?reported,
                "Clock moved behind a reported elapsed time, keeping the reported interval"
            );
        }

        accumulated.saturating_add(interval.max(reported))
    }
}

#[derive(Debug, Clone, Default)]
pub enum State {
    #[default]
    Stopped,
    Running(Running),
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::Stopped => "Stopped",
            State::Running(_) => "Running",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Stopwatch<C = SystemClock> {
    clock: C,
    accumulated: Duration,
    state: State,
}

impl Default for Stopwatch<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> Stopwatch<C> {
    /// Creates a stopped stopwatch with nothing accumulated.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            accumulated: Duration::ZERO,
            state: State::Stopped,
        }
    }

    pub fn handle(&mut self, event: Event) {
        let (state, accumulated) =
            transition(&self.state, event, self.accumulated, self.clock.now());

        tracing::debug!(
            ?event,
            from = %self.state,
            to = %state,
            ?accumulated,
            "Handled stopwatch event"
        );

        self.state = state;
        self.accumulated = accumulated;
    }

    /// Returns the elapsed time as of now.
    ///
    /// While running, a clock that reads before the start of the interval or
    /// behind a value already returned for this interval is reported as a
    /// [`ClockFault`] rather than as a duration.
    pub fn elapsed(&self) -> Result<Duration, ClockFault> {
        let elapsed = elapsed(&self.state, self.accumulated, self.clock.now())?;

        if let State::Running(running) = &self.state {
            running.observed.set(elapsed);
        }

        Ok(elapsed)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    /// Time folded in from completed running intervals.
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }
}

fn transition(
    state: &State,
    event: Event,
    accumulated: Duration,
    now: SystemTime,
) -> (State, Duration) {
    match (state, event) {
        (State::Stopped, Event::Toggle) => (State::Running(Running::new(now)), accumulated),
        (State::Running(running), Event::Toggle) => {
            (State::Stopped, running.fold(accumulated, now))
        }
        (_, Event::Reset) => (State::Stopped, Duration::ZERO),
    }
}

fn elapsed(state: &State, accumulated: Duration, now: SystemTime) -> Result<Duration, ClockFault> {
    match state {
        State::Stopped => Ok(accumulated),
        State::Running(running) => {
            let interval = now
                .duration_since(running.start)
                .map_err(|e| ClockFault::BeforeStart {
                    behind: e.duration(),
                })?;
            let current = accumulated.saturating_add(interval);
            let previous = running.observed.get();

            if current < previous {
                return Err(ClockFault::Regressed { previous, current });
            }

            Ok(current)
        }
    }
}
