use std::{cell::Cell, rc::Rc, time::Duration};

/// Monotonic time source injected into a [`Session`](crate::Session).
///
/// The session never sleeps or schedules callbacks on its own; it records
/// deadlines against this clock and processes everything due when
/// [`Session::poll`](crate::Session::poll) runs. Tests drive a
/// [`ManualClock`]; production drivers wrap a wall clock.
pub trait Clock {
    /// Returns the elapsed time since the clock's origin.
    fn now(&self) -> Duration;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<T: Clock + ?Sized> Clock for Rc<T> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<T: Clock + ?Sized> Clock for Box<T> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// A clock advanced explicitly, for deterministic tests and simulations.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use tileswap_game::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// assert_eq!(clock.now(), Duration::ZERO);
///
/// clock.advance(Duration::from_secs(3));
/// assert_eq!(clock.now(), Duration::from_secs(3));
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
