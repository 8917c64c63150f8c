/*! Time structures.

The `time` module contains structures used to represent both
absolute and relative time.

 - [Instant] is used to represent absolute time.
 - [Duration] is used to represet relative time.
 - [Expiration] is a deadline which may be absent.

Reassembly never reads a clock on its own unless asked to, all
deadline handling takes the current `Instant` as an argument.

[Instant]: struct.Instant.html
[Duration]: struct.Duration.html
[Expiration]: enum.Expiration.html
*/
use core::{cmp, fmt, ops};
use core::convert::TryFrom;
pub use core::time::Duration;

/// A representation of an absolute time value.
///
/// The `Instant` type is a wrapper around a `i64` value that
/// represents a number of milliseconds, monotonically increasing
/// since an arbitrary moment in time, such as system startup.
///
/// * A value of `0` is inherently arbitrary.
/// * A value less than `0` indicates a time before the starting
///   point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    /// Milliseconds since the starting point.
    pub millis: i64,
}

/// An expiration time, inversion of `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Expires at the given instant.
    When(Instant),
    /// Never expires.
    Never,
}

use Expiration::{When, Never};

impl Instant {
    /// Create a new `Instant` from a number of milliseconds.
    pub fn from_millis<T: Into<i64>>(millis: T) -> Instant {
        Instant { millis: millis.into() }
    }

    /// Create a new `Instant` from a number of seconds.
    pub fn from_secs<T: Into<i64>>(secs: T) -> Instant {
        Instant { millis: secs.into() * 1000 }
    }

    /// Create a new `Instant` from the current [std::time::SystemTime].
    ///
    /// See [std::time::SystemTime::now]
    ///
    /// [std::time::SystemTime]: https://doc.rust-lang.org/std/time/struct.SystemTime.html
    /// [std::time::SystemTime::now]: https://doc.rust-lang.org/std/time/struct.SystemTime.html#method.now
    pub fn now() -> Instant {
        Self::from(::std::time::SystemTime::now())
    }

    /// The fractional number of milliseconds that have passed
    /// since the beginning of time.
    pub fn millis(&self) -> i64 {
        self.millis % 1000
    }

    /// The number of whole seconds that have passed since the
    /// beginning of time.
    pub fn secs(&self) -> i64 {
        self.millis / 1000
    }

    /// The total number of milliseconds that have passed since
    /// the biginning of time.
    pub fn total_millis(&self) -> i64 {
        self.millis
    }
}

impl From<::std::time::SystemTime> for Instant {
    /// Times before the unix epoch all map to the epoch itself.
    fn from(other: ::std::time::SystemTime) -> Instant {
        let n = other.duration_since(::std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_millis(n.as_secs() as i64 * 1000 + i64::from(n.subsec_millis()))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:03}s", self.secs(), self.millis())
    }
}

/// The milliseconds of a duration, saturating at the largest representable offset.
fn offset_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::max_value())
}

impl ops::Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant::from_millis(self.millis.saturating_add(offset_millis(rhs)))
    }
}

impl ops::AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        self.millis = self.millis.saturating_add(offset_millis(rhs));
    }
}

impl ops::Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, rhs: Duration) -> Instant {
        Instant::from_millis(self.millis.saturating_sub(offset_millis(rhs)))
    }
}

impl ops::Sub<Instant> for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Duration {
        let diff = self.millis.saturating_sub(rhs.millis)
            .checked_abs()
            .unwrap_or(i64::max_value());
        Duration::from_millis(diff as u64)
    }
}

impl Expiration {
    /// The deadline `timeout` after `now`, or none at all.
    pub fn after(now: Instant, timeout: Option<Duration>) -> Self {
        timeout.map(|timeout| now + timeout).into()
    }

    /// Check if the deadline lies at or before `now`.
    pub fn has_passed(self, now: Instant) -> bool {
        self <= When(now)
    }
}

impl Default for Expiration {
    fn default() -> Self {
        Expiration::Never
    }
}

impl From<Option<Instant>> for Expiration {
    fn from(opt: Option<Instant>) -> Self {
        match opt {
            Some(instant) => When(instant),
            None => Never,
        }
    }
}

impl From<Expiration> for Option<Instant> {
    fn from(opt: Expiration) -> Self {
        match opt {
            When(instant) => Some(instant),
            Never => None,
        }
    }
}

impl cmp::PartialOrd<Self> for Expiration {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl cmp::Ord for Expiration {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match (*self, *other) {
            (Never, Never) => cmp::Ordering::Equal,
            (Never, When(_)) => cmp::Ordering::Greater,
            (When(_), Never) => cmp::Ordering::Less,
            (When(ref a), When(ref b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            When(instant) => write!(f, "at {}", instant),
            Never => write!(f, "never"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_instant_ops() {
        // std::ops::Add
        assert_eq!(Instant::from_millis(4) + Duration::from_millis(6), Instant::from_millis(10));
        // std::ops::Sub
        assert_eq!(Instant::from_millis(7) - Duration::from_millis(5), Instant::from_millis(2));
        assert_eq!(Instant::from_millis(7) - Instant::from_millis(12), Duration::from_millis(5));
    }

    #[test]
    fn test_instant_getters() {
        let instant = Instant::from_millis(5674);
        assert_eq!(instant.secs(), 5);
        assert_eq!(instant.millis(), 674);
        assert_eq!(instant.total_millis(), 5674);
    }

    #[test]
    fn test_instant_display() {
        assert_eq!(format!("{}", Instant::from_millis(5674)), "5.674s");
        assert_eq!(format!("{}", Instant::from_millis(5000)), "5.000s");
        assert_eq!(format!("{}", Instant::from_millis(5074)), "5.074s");
    }

    #[test]
    fn test_instant_conversions() {
        assert_eq!(Instant::from(::std::time::UNIX_EPOCH),
                   Instant::from_millis(0));
        let later = ::std::time::UNIX_EPOCH + Duration::from_millis(2085955200123);
        assert_eq!(Instant::from(later), Instant::from_millis(2085955200123i64));
    }

    #[test]
    fn test_expiration_order() {
        let early = When(Instant::from_secs(1));
        let late = When(Instant::from_secs(2));
        assert!(early < late);
        assert!(late < Never);
        assert_eq!(Expiration::default(), Never);
        assert_eq!(Option::<Instant>::from(early), Some(Instant::from_secs(1)));
    }

    #[test]
    fn test_expiration_deadline() {
        let now = Instant::from_secs(10);
        let deadline = Expiration::after(now, Some(Duration::from_secs(30)));
        assert_eq!(deadline, When(Instant::from_secs(40)));
        assert!(!deadline.has_passed(Instant::from_secs(39)));
        assert!(deadline.has_passed(Instant::from_secs(40)));
        assert!(!Expiration::after(now, None).has_passed(Instant::from_secs(1i64 << 40)));
    }

    #[test]
    fn test_instant_saturates() {
        let now = Instant::from_secs(10);
        assert_eq!(now + Duration::from_secs(u64::max_value()), Instant::from_millis(i64::max_value()));
        assert_eq!(now - Duration::from_secs(u64::max_value()), Instant::from_millis(i64::min_value()));

        let mut later = now;
        later += Duration::from_secs(u64::max_value());
        assert_eq!(later, Instant::from_millis(i64::max_value()));

        let deadline = Expiration::after(now, Some(Duration::from_secs(u64::max_value())));
        assert!(!deadline.has_passed(now));
        assert!(!deadline.has_passed(Instant::from_secs(1i64 << 40)));
    }
}
