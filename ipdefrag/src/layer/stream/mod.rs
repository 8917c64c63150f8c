//! The streaming datagram parser.
//!
//! Bytes are pushed in chunks of any size, split anywhere. They accumulate in a growing
//! [`RingBuffer`] and a small state machine pulls the header, its options and the payload out of it
//! as soon as each is complete:
//!
//! ```text
//! AwaitHeader --(options announced)--> AwaitOptions --> AwaitPayload --> AwaitHeader
//!      \_____________(no options)____________________/^
//! ```
//!
//! There is no terminal state in regular operation. Once a header has been decoded its lengths are
//! trusted, so the decoder bounds them up front: a version other than 4, a header length below 20
//! octets or a total length not covering the header move the parser to `Corrupted`. The parser does
//! not resynchronize a corrupted stream, the caller decides to [`reset`] or drop it.
//!
//! [`RingBuffer`]: ../../storage/struct.RingBuffer.html
//! [`reset`]: struct.Parser.html#method.reset
use crate::layer::{Error, Result};
use crate::storage::RingBuffer;
use crate::wire::{self, ipv4_packet, Datagram, Ipv4Repr, MAX_OPTIONS_LEN, MIN_HEADER_LEN};

#[cfg(test)]
mod tests;

/// The initial capacity of the internal buffer.
pub const DEFAULT_CAPACITY: usize = 32;

/// The state of the parser between two chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the 20 octets of a fixed header.
    AwaitHeader,

    /// Waiting for the options announced by the contained header.
    AwaitOptions(Ipv4Repr),

    /// Waiting for the payload announced by the contained header.
    AwaitPayload(Ipv4Repr),

    /// A header failed to decode, all input is rejected until a reset.
    Corrupted(wire::Error),
}

/// Decodes a chunked byte stream into datagrams.
#[derive(Debug, Clone)]
pub struct Parser {
    buffer: RingBuffer,
    state: State,
}

impl Parser {
    /// Create a parser with the default initial buffer capacity.
    pub fn new() -> Self {
        Parser::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a parser whose buffer starts out with room for `capacity` bytes.
    ///
    /// The buffer grows as needed, this only avoids early reallocation.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = RingBuffer::new(capacity);
        buffer.set_auto_expand(true);
        Parser {
            buffer,
            state: State::AwaitHeader,
        }
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The number of bytes received but not yet part of a decoded header or datagram.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Query if a decode error stopped the parser.
    pub fn is_corrupted(&self) -> bool {
        match self.state {
            State::Corrupted(_) => true,
            _ => false,
        }
    }

    /// Drop all buffered bytes and any partially decoded header.
    ///
    /// The next byte pushed is expected to start a new header.
    pub fn reset(&mut self) {
        net_trace!("stream: reset with {} bytes buffered", self.buffer.len());
        self.buffer.clear();
        self.state = State::AwaitHeader;
    }

    /// Push a chunk of the stream, returning the datagrams it completed.
    ///
    /// See [`consume_into`] for the error behaviour.
    ///
    /// [`consume_into`]: #method.consume_into
    pub fn consume(&mut self, bytes: &[u8]) -> Result<Vec<Datagram>> {
        let mut datagrams = Vec::new();
        self.consume_into(bytes, &mut datagrams)?;
        Ok(datagrams)
    }

    /// Push a chunk of the stream, appending completed datagrams to `datagrams` in stream order.
    ///
    /// Returns `Err(Error::Decode(_))` when a header in this chunk fails to decode and
    /// `Err(Error::Corrupted)` when an earlier one did. Datagrams completed before the failing
    /// header are still appended.
    pub fn consume_into(&mut self, bytes: &[u8], datagrams: &mut Vec<Datagram>) -> Result<()> {
        if self.is_corrupted() {
            return Err(Error::Corrupted);
        }

        let mut rest = bytes;
        loop {
            let written = self.buffer.enqueue(rest);
            rest = &rest[written..];

            while self.step(datagrams)? {}

            if rest.is_empty() {
                return Ok(());
            }

            if written == 0 {
                // The buffer reached its maximum size without completing anything.
                return Err(Error::Exhausted);
            }
        }
    }

    /// Advance the state machine by one transition.
    ///
    /// Returns `Ok(false)` if more bytes are needed.
    fn step(&mut self, datagrams: &mut Vec<Datagram>) -> Result<bool> {
        match self.state {
            State::AwaitHeader => {
                if self.buffer.len() < MIN_HEADER_LEN {
                    return Ok(false);
                }

                let mut header = [0; MIN_HEADER_LEN];
                self.buffer.dequeue_into(&mut header);
                let repr = Ipv4Repr::parse_fixed(ipv4_packet::new_unchecked(&header))
                    .map_err(|err| self.corrupt(err))?;

                self.state = if repr.option_len() > 0 {
                    State::AwaitOptions(repr)
                } else {
                    State::AwaitPayload(repr)
                };
                net_trace!("stream: header {}", repr);
                Ok(true)
            },
            State::AwaitOptions(mut repr) => {
                let option_len = repr.option_len();
                if self.buffer.len() < option_len {
                    return Ok(false);
                }

                let mut options = [0; MAX_OPTIONS_LEN];
                self.buffer.dequeue_into(&mut options[..option_len]);
                repr.set_options(&options[..option_len])
                    .map_err(|err| self.corrupt(err))?;

                self.state = State::AwaitPayload(repr);
                Ok(true)
            },
            State::AwaitPayload(repr) => {
                let payload_len = repr.payload_len();
                if self.buffer.len() < payload_len {
                    return Ok(false);
                }

                let payload = self.buffer.dequeue(payload_len);
                let datagram = Datagram::new(repr, payload)
                    .map_err(|err| self.corrupt(err))?;

                datagrams.push(datagram);
                self.state = State::AwaitHeader;
                Ok(true)
            },
            State::Corrupted(_) => Err(Error::Corrupted),
        }
    }

    fn corrupt(&mut self, err: wire::Error) -> Error {
        net_debug!("stream: corrupted by {}", err);
        self.state = State::Corrupted(err);
        Error::Decode(err)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}
