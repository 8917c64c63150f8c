//! The processing logic on top of the wire representation.
//!
//! ## Layering
//!
//! The packet logic is contained in `wire` and the algorithmic containers in `storage`, while this
//! module holds the stateful processing. Two stages exist, each with its own state that stays open
//! to inspection and reconfiguration while no processing takes place:
//!
//! * The [`stream`] parser turns a byte stream arriving in arbitrary chunks into whole datagrams.
//! * The [`defrag`] module routes fragments to one reassembly agent per flow and hands out
//!   complete datagrams.
//!
//! ## Receiving
//!
//! The [`Pipeline`] chains both stages and routes its results to a [`Recv`] handler, one call per
//! complete datagram or per failed flow. Closures become handlers through [`FnHandler`].
//!
//! ## Errors
//!
//! Reassembly errors are fatal to the affected flow only. Its agent is discarded before the error
//! is reported and no other flow is touched. A decode error of the stream parser is fatal to the
//! stream instead, the parser refuses all further input until it is reset.
//!
//! [`stream`]: stream/index.html
//! [`defrag`]: defrag/index.html
//! [`Pipeline`]: struct.Pipeline.html
//! [`Recv`]: trait.Recv.html
//! [`FnHandler`]: struct.FnHandler.html
use core::fmt;

use crate::time::Instant;
use crate::wire::{self, Datagram};

pub mod defrag;
pub mod stream;

/// The result type of processing a datagram or a stream.
pub type Result<T> = core::result::Result<T, Error>;

/// The error kinds of processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// A header field was out of its valid range.
    Decode(wire::Error),

    /// A second fragment with offset zero arrived for the same flow.
    DuplicateFirstFragment,

    /// A second final fragment with non-zero offset arrived for the same flow.
    DuplicateLastFragment,

    /// A fragment other than the last had a payload length not a multiple of eight octets.
    MisalignedFragmentLength,

    /// The fragment flags had a combination reassembly does not accept.
    ///
    /// This includes the reserved bit and the "don't fragment" bit combined with "more
    /// fragments".
    InvalidFragmentFlags,

    /// A fragment overlapped data already received for the same flow.
    OverlappingFragment,

    /// The received fragments covered the datagram but did not add up.
    ///
    /// Either a boundary fragment was never seen or the payloads did not form one contiguous
    /// sequence of the announced length.
    IncompleteReassemblyInconsistency,

    /// A fragment reached beyond the largest possible datagram payload.
    FragmentOutOfRange,

    /// The reassembled datagram would exceed the largest expressible total length.
    Oversized,

    /// The action could not be completed because there were not enough resources.
    ///
    /// Returned when a fragment of a new flow arrives while the configured number of flows are
    /// already being reassembled and none of them has expired.
    Exhausted,

    /// The stream parser previously failed to decode a header.
    ///
    /// It does not resynchronize on its own, the stream must be reset.
    Corrupted,
}

/// A standard wrapper for a function implementing the receive trait.
///
/// Keeps the type alias overhead low by providing a single wrapper type that implements the
/// receive trait for closures.
pub struct FnHandler<F>(pub F);

/// A receiver of processed datagrams.
pub trait Recv {
    /// Inspect one complete datagram or the error that ended a flow.
    fn receive(&mut self, datagram: Result<Datagram>);
}

impl<F> Recv for FnHandler<F>
    where F: FnMut(Result<Datagram>)
{
    fn receive(&mut self, datagram: Result<Datagram>) {
        self.0(datagram)
    }
}

impl<H: Recv + ?Sized> Recv for &'_ mut H {
    fn receive(&mut self, datagram: Result<Datagram>) {
        (**self).receive(datagram)
    }
}

impl Recv for Vec<Result<Datagram>> {
    fn receive(&mut self, datagram: Result<Datagram>) {
        self.push(datagram)
    }
}

/// A stream parser feeding a defragmenter.
///
/// Turns raw bytes into complete datagrams. Datagrams that are not fragmented pass straight
/// through, fragments are held back until their datagram is whole.
#[derive(Debug, Default)]
pub struct Pipeline {
    parser: stream::Parser,
    defrag: defrag::Defragmenter,
}

impl Pipeline {
    /// Create a pipeline with a fresh parser and the given reassembly policy.
    pub fn new(config: defrag::Config) -> Self {
        Pipeline {
            parser: stream::Parser::new(),
            defrag: defrag::Defragmenter::new(config),
        }
    }

    /// Combine an existing parser and defragmenter.
    pub fn from_parts(parser: stream::Parser, defrag: defrag::Defragmenter) -> Self {
        Pipeline { parser, defrag }
    }

    /// The stream parser.
    pub fn parser(&self) -> &stream::Parser {
        &self.parser
    }

    /// The stream parser, mutably.
    pub fn parser_mut(&mut self) -> &mut stream::Parser {
        &mut self.parser
    }

    /// The defragmenter.
    pub fn defragmenter(&self) -> &defrag::Defragmenter {
        &self.defrag
    }

    /// The defragmenter, mutably.
    pub fn defragmenter_mut(&mut self) -> &mut defrag::Defragmenter {
        &mut self.defrag
    }

    /// Process a chunk of the stream at the current time.
    pub fn consume<H: Recv>(&mut self, bytes: &[u8], handler: H) -> Result<()> {
        self.consume_at(bytes, Instant::now(), handler)
    }

    /// Process a chunk of the stream with a closure as handler.
    pub fn consume_with<F>(&mut self, bytes: &[u8], handler: F) -> Result<()>
        where F: FnMut(Result<Datagram>),
    {
        self.consume(bytes, FnHandler(handler))
    }

    /// Process a chunk of the stream at the given time.
    ///
    /// Every complete datagram, and every error that ended a flow, goes to the handler in stream
    /// order. Datagrams decoded before a stream error are still processed, the decode error itself
    /// is returned.
    pub fn consume_at<H: Recv>(&mut self, bytes: &[u8], now: Instant, mut handler: H)
        -> Result<()>
    {
        let mut parsed = Vec::new();
        let status = self.parser.consume_into(bytes, &mut parsed);

        for datagram in parsed {
            match self.defrag.defrag_at(datagram, now) {
                Ok(Some(datagram)) => handler.receive(Ok(datagram)),
                Ok(None) => (),
                Err(err) => handler.receive(Err(err)),
            }
        }

        status
    }
}

impl From<wire::Error> for Error {
    fn from(err: wire::Error) -> Self {
        Error::Decode(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Decode(err) => write!(f, "decode error: {}", err),
            Error::DuplicateFirstFragment => write!(f, "duplicated first fragment"),
            Error::DuplicateLastFragment => write!(f, "duplicated last fragment"),
            Error::MisalignedFragmentLength => write!(f, "fragment length not a multiple of 8"),
            Error::InvalidFragmentFlags => write!(f, "invalid fragment flags"),
            Error::OverlappingFragment => write!(f, "overlapping fragment"),
            Error::IncompleteReassemblyInconsistency => write!(f, "inconsistent reassembly"),
            Error::FragmentOutOfRange => write!(f, "fragment out of range"),
            Error::Oversized => write!(f, "reassembled datagram too large"),
            Error::Exhausted => write!(f, "too many flows in reassembly"),
            Error::Corrupted => write!(f, "stream corrupted"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(err) => Some(err),
            _ => None,
        }
    }
}
