//! Reassembly of fragmented datagrams.
//!
//! Fragmentation splits the payload of a datagram into pieces at multiples of eight octets, see
//! [RFC 791 § 2.3]. All pieces carry the same source, destination, protocol and identification,
//! the [`FlowKey`], and the position of their payload as fragment offset. All but the last piece
//! have the "more fragments" flag set.
//!
//! ## Structure
//!
//! The [`Defragmenter`] maps each flow key to one [`Agent`], created with the first fragment of the
//! flow and discarded once its datagram is complete, on any error, or when the flow expires. The
//! agent tracks received payload ranges in a [`HoleList`] and stores the payloads by offset until
//! no hole is left.
//!
//! Fragments are classified by their flags. With all flags clear, a fragment with non-zero offset
//! is the last one, it covers everything from its offset onward. With only "more fragments" set,
//! it is a leading or middle piece whose length must be a multiple of eight. A datagram with offset
//! zero and no "more fragments" flag, or with only "don't fragment" set, is whole and passes
//! through. Every other combination is rejected.
//!
//! ## Policy
//!
//! A single bad fragment poisons the whole datagram. Overlaps, duplicated boundary fragments and
//! malformed lengths discard everything received for that flow. The number of concurrently
//! reassembled flows and their lifetime are bounded by the [`Config`].
//!
//! [RFC 791 § 2.3]: https://tools.ietf.org/html/rfc791#section-2.3
//! [`FlowKey`]: ../../wire/struct.FlowKey.html
//! [`Defragmenter`]: struct.Defragmenter.html
//! [`Agent`]: struct.Agent.html
//! [`HoleList`]: ../../storage/struct.HoleList.html
//! [`Config`]: struct.Config.html
use crate::time::Duration;

mod agent;
mod endpoint;

pub use agent::Agent;
pub use endpoint::Defragmenter;

/// The reassembly policy of a [`Defragmenter`].
///
/// [`Defragmenter`]: struct.Defragmenter.html
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    /// The maximum number of flows reassembled at the same time.
    ///
    /// A fragment of another flow is rejected with `Error::Exhausted` unless an expired flow can be
    /// discarded to make room. A flow only takes a slot once it holds payload, an empty leading
    /// fragment does not open one.
    pub max_flows: usize,

    /// How long a flow may take to complete, counted from its first fragment.
    ///
    /// `None` keeps incomplete flows around until they are removed explicitly.
    pub flow_timeout: Option<Duration>,
}

impl Config {
    /// The default maximum number of concurrent flows.
    pub const DEFAULT_MAX_FLOWS: usize = 1024;

    /// The default lifetime of an incomplete flow.
    pub const DEFAULT_FLOW_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_flows: Config::DEFAULT_MAX_FLOWS,
            flow_timeout: Some(Config::DEFAULT_FLOW_TIMEOUT),
        }
    }
}
