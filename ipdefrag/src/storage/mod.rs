//! Algorithmic containers for bytes and byte ranges.
//!
//! The [`RingBuffer`] accumulates a byte stream that arrives in arbitrary chunks. [`Interval`]
//! and [`disjoin`] form a small algebra of closed integer ranges, and the [`HoleList`] uses it to
//! track which parts of a datagram payload have arrived so far.
//!
//! [`RingBuffer`]: struct.RingBuffer.html
//! [`Interval`]: struct.Interval.html
//! [`disjoin`]: fn.disjoin.html
//! [`HoleList`]: struct.HoleList.html
mod holes;
mod interval;
mod ring;

pub use self::holes::{FillError, HoleList};
pub use self::interval::{disjoin, Interval, NotContained};
pub use self::ring::{RingBuffer, MAX_CAPACITY};
