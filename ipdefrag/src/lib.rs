//! A streaming IPv4 datagram parser and fragment reassembler.
//!
//! ## Table of contents
//!
//! This is also a recommended reading order but feel free to skip ahead, each chapter tries to be
//! somewhat self-contained.
//!
//! 1. [Highlights](#highlights)
//! 2. [Design](#design-and-relevant-core-concepts)
//! 3. [The wire module](wire/index.html)
//!    1. [Overview of packet representations](wire/index.html#an-overview-over-packet-representations)
//! 4. [The layers](layer/index.html)
//!    1. [The stream parser](layer/stream/index.html)
//!    1. [Reassembly](layer/defrag/index.html)
//! 5. Internals
//!    1. [The storage module](storage/index.html)
//!    2. [The time module](time/index.html)
//!
//! ## Highlights
//!
//! * Byte streams may be chunked arbitrarily, a header split across two reads decodes all the
//!   same.
//! * Fragments may arrive in any order. Overlapping or duplicated fragments poison their datagram
//!   instead of being silently merged.
//! * Memory is bounded by policy: a cap on concurrently reassembled flows and a deadline per flow.
//!
//! Also, large portions of the `wire` module follow @whitequark's [`smoltcp`].
//!
//! [`smoltcp`]: https://github.com/m-labs/smoltcp
//!
//! ## Design and relevant core concepts
//!
//! Bytes are pushed in by the caller, nothing in this library performs I/O or blocks. A
//! [`Parser`] turns the byte stream into datagrams and a [`Defragmenter`] turns datagrams into
//! whole datagrams. The [`Pipeline`] chains both. Every call runs to completion before returning,
//! and a single instance must not be shared between threads without synchronization while
//! independent instances share no state at all.
//!
//! Time is explicit. Deadlines of incomplete flows are checked against an [`Instant`] passed by the
//! caller, the convenience methods without such an argument read the system clock.
//!
//! ```
//! use ipdefrag::layer::{defrag, Pipeline};
//! use ipdefrag::wire::{Datagram, IpProtocol, Ipv4Address, Ipv4Flags, Ipv4Options, Ipv4Repr};
//!
//! let payload: Vec<u8> = (0..24).collect();
//! let fragment = |flags, frag_offset: u16, data: &[u8]| {
//!     let repr = Ipv4Repr {
//!         header_len: 20,
//!         tos: 0,
//!         total_len: 20 + data.len() as u16,
//!         ident: 0x4242,
//!         flags,
//!         frag_offset,
//!         hop_limit: 64,
//!         protocol: IpProtocol::Udp,
//!         checksum: 0,
//!         src_addr: Ipv4Address::new(10, 0, 0, 1),
//!         dst_addr: Ipv4Address::new(10, 0, 0, 2),
//!         options: Ipv4Options::EMPTY,
//!     };
//!     Datagram::new(repr, data.to_vec()).unwrap().to_bytes()
//! };
//!
//! let mut stream = fragment(Ipv4Flags::NONE, 16, &payload[16..]);
//! stream.extend(fragment(Ipv4Flags::MORE_FRAGMENTS, 0, &payload[..16]));
//!
//! let mut pipeline = Pipeline::new(defrag::Config::default());
//! let mut complete = Vec::new();
//! pipeline.consume_with(&stream, |datagram| complete.push(datagram.unwrap())).unwrap();
//!
//! assert_eq!(complete.len(), 1);
//! assert_eq!(complete[0].payload(), &payload[..]);
//! ```
//!
//! [`Parser`]: layer/stream/struct.Parser.html
//! [`Defragmenter`]: layer/defrag/struct.Defragmenter.html
//! [`Pipeline`]: layer/struct.Pipeline.html
//! [`Instant`]: time/struct.Instant.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

#[macro_use] mod macros;
pub mod layer;
pub mod storage;
pub mod time;
pub mod wire;
