use std::collections::BTreeMap;

use crate::layer::{Error, Result};
use crate::storage::{FillError, HoleList, Interval};
use crate::wire::{Datagram, Ipv4Flags, Ipv4Repr, FRAGMENT_UNIT, MAX_TOTAL_LEN};

/// The last payload octet any fragment may cover.
const MAX_PAYLOAD_END: u32 = MAX_TOTAL_LEN as u32 - 1;

/// The role of a fragment within its datagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Piece {
    First,
    Middle,
    Last,
}

/// The reassembly state of one fragmented datagram.
///
/// Holds the header of the first fragment (offset zero), the header of the last fragment (no "more
/// fragments" flag, non-zero offset), the received payload ranges and the payloads by offset.
///
/// Any error discards all of it before being returned, as does handing out a datagram. The agent
/// is then ready for a new datagram.
#[derive(Clone, Debug)]
pub struct Agent {
    first: Option<Ipv4Repr>,
    last: Option<Ipv4Repr>,
    holes: HoleList,
    payloads: BTreeMap<u16, Vec<u8>>,
}

impl Agent {
    /// Create an agent that has not seen any fragment.
    pub fn new() -> Self {
        Agent {
            first: None,
            last: None,
            holes: HoleList::new(Interval::new(0, MAX_PAYLOAD_END)),
            payloads: BTreeMap::new(),
        }
    }

    /// Add one datagram.
    ///
    /// Returns `Ok(Some(_))` with the reassembled datagram when this fragment closed the last
    /// hole, or the datagram itself when it is not a fragment at all. Returns `Ok(None)` while
    /// holes remain. In both of the first cases, and on any error, the agent is reset.
    pub fn consume(&mut self, datagram: Datagram) -> Result<Option<Datagram>> {
        let result = self.consume_fragment(datagram);
        match result {
            Ok(None) => (),
            _ => self.reset(),
        }
        result
    }

    /// Discard all received fragments.
    pub fn reset(&mut self) {
        self.first = None;
        self.last = None;
        self.holes.clear();
        self.payloads.clear();
    }

    /// Query if no fragment is held.
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.last.is_none() && self.payloads.is_empty()
    }

    /// Query if the fragment with offset zero arrived.
    pub fn has_first(&self) -> bool {
        self.first.is_some()
    }

    /// Query if the final fragment arrived.
    pub fn has_last(&self) -> bool {
        self.last.is_some()
    }

    /// The number of payload octets held.
    pub fn received_len(&self) -> usize {
        self.payloads.values().map(Vec::len).sum()
    }

    /// The received payload ranges.
    pub fn holes(&self) -> &HoleList {
        &self.holes
    }

    fn consume_fragment(&mut self, datagram: Datagram) -> Result<Option<Datagram>> {
        let repr = datagram.repr();
        let offset = repr.frag_offset;

        let piece = match repr.flags {
            Ipv4Flags::NONE if offset > 0 => Piece::Last,
            Ipv4Flags::NONE | Ipv4Flags::DONT_FRAGMENT => {
                net_debug!("defrag: not a fragment, {}", repr);
                return Ok(Some(datagram));
            },
            Ipv4Flags::MORE_FRAGMENTS if offset == 0 => Piece::First,
            Ipv4Flags::MORE_FRAGMENTS => Piece::Middle,
            _ => return Err(Error::InvalidFragmentFlags),
        };

        let start = u32::from(offset);
        let len = datagram.payload().len();
        let fill = match piece {
            Piece::Last => {
                if self.last.is_some() {
                    return Err(Error::DuplicateLastFragment);
                }
                if start > MAX_PAYLOAD_END {
                    return Err(Error::FragmentOutOfRange);
                }
                Some(Interval::new(start, MAX_PAYLOAD_END))
            },
            Piece::First | Piece::Middle => {
                if piece == Piece::First && self.first.is_some() {
                    return Err(Error::DuplicateFirstFragment);
                }
                if len % FRAGMENT_UNIT != 0 {
                    return Err(Error::MisalignedFragmentLength);
                }
                // Bounded by the 16-bit total length.
                Interval::with_len(start, len as u32)
            },
        };

        let fill = match fill {
            Some(fill) => fill,
            // An empty leading fragment covers nothing.
            None => return Ok(None),
        };

        self.holes.fill(fill).map_err(|err| match err {
            FillError::OutOfRange => Error::FragmentOutOfRange,
            FillError::Overlap => Error::OverlappingFragment,
        })?;

        match piece {
            Piece::First => self.first = Some(repr),
            Piece::Last => self.last = Some(repr),
            Piece::Middle => (),
        }

        let (_, payload) = datagram.into_parts();
        self.payloads.insert(offset, payload);
        net_trace!("defrag: filled {} of {}, now {}", fill, repr.flow_key(), self.holes);

        if !self.holes.is_complete() {
            return Ok(None);
        }

        self.assemble().map(Some)
    }

    fn assemble(&mut self) -> Result<Datagram> {
        let (first, last) = match (self.first, self.last) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(Error::IncompleteReassemblyInconsistency),
        };

        let payload_len = usize::from(last.frag_offset) + last.payload_len();
        let mut payload = Vec::with_capacity(payload_len);
        for (&offset, data) in &self.payloads {
            if usize::from(offset) != payload.len() {
                return Err(Error::IncompleteReassemblyInconsistency);
            }
            payload.extend_from_slice(data);
        }

        if payload.len() != payload_len {
            return Err(Error::IncompleteReassemblyInconsistency);
        }

        let total_len = usize::from(first.header_len) + payload_len;
        if total_len > MAX_TOTAL_LEN {
            return Err(Error::Oversized);
        }

        let flags = first.flags.bits() & !Ipv4Flags::MORE_FRAGMENTS.bits();
        let repr = Ipv4Repr {
            total_len: total_len as u16,
            flags: Ipv4Flags::from_bits_truncate(flags),
            frag_offset: 0,
            ..first
        };

        net_debug!("defrag: reassembled {}", repr);
        Datagram::new(repr, payload)
            .map_err(|_| Error::IncompleteReassemblyInconsistency)
    }
}

impl Default for Agent {
    fn default() -> Self {
        Agent::new()
    }
}
