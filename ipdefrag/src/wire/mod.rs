/*! Low-level packet access and construction.

# An overview over packet representations

The `wire` module deals with the IPv4 header *representation*. It provides three levels of
functionality.

 * First, it provides functions to extract fields from sequences of octets, and to insert fields
   into sequences of octets. This happens in the lowercase structure [`ipv4_packet`].
 * Second, it provides a compact, high-level representation of header data that can be created from
   parsing and emitted into a sequence of octets. This happens in [`Ipv4Repr`].
 * Third, it provides an owned [`Datagram`] which pairs a header with exactly the payload the
   header announces. This is the unit handed out by the stream parser and the defragmenter.

[`ipv4_packet`]: struct.ipv4_packet.html
[`Ipv4Repr`]: struct.Ipv4Repr.html
[`Datagram`]: struct.Datagram.html

The `ipv4_packet` wrapper guarantees that, if `check_len()` returned `Ok(())`, then no field
accessor or setter method will panic. `check_header()` is the weaker variant which only requires the
header with its options to be present and is what a streaming reader can check before the payload
has arrived.

In the `Repr` family, `Repr::parse()` and `Repr::decode()` never panic and `Repr::emit()` never
panics as long as the underlying buffer is at least `Repr::buffer_len()` octets long. The checksum
is carried through as received, it is never verified nor recomputed.

# Examples

To emit an IPv4 header into an octet buffer, and then parse it back:

```rust
use ipdefrag::wire::*;
let repr = Ipv4Repr {
    header_len:  20,
    tos:         0,
    total_len:   30,
    ident:       0x1234,
    flags:       Ipv4Flags::MORE_FRAGMENTS,
    frag_offset: 0,
    hop_limit:   64,
    protocol:    IpProtocol::Udp,
    checksum:    0,
    src_addr:    Ipv4Address::new(10, 0, 0, 1),
    dst_addr:    Ipv4Address::new(10, 0, 0, 2),
    options:     Ipv4Options::EMPTY,
};
let mut buffer = vec![0; repr.buffer_len() + repr.payload_len()];
{ // emission
    let packet = ipv4_packet::new_unchecked_mut(&mut buffer);
    repr.emit(packet);
}
{ // parsing
    let packet = ipv4_packet::new_checked(&buffer)
        .expect("truncated packet");
    let parsed = Ipv4Repr::parse(packet)
        .expect("malformed packet");
    assert_eq!(repr, parsed);
}
```
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `error.rs`
// * `ip.rs`
// * `ipv4.rs`
// * `mod.rs` (this file)

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
}

mod error;
pub(crate) mod ip;
pub(crate) mod ipv4;

pub use self::error::{
    Error,
    Result};

pub use self::ip::Protocol as IpProtocol;

pub use self::ipv4::{
    ipv4 as ipv4_packet,
    Address as Ipv4Address,
    Flags as Ipv4Flags,
    Options as Ipv4Options,
    Repr as Ipv4Repr,
    Datagram,
    FlowKey,
    FLOW_KEY_LEN,
    FRAGMENT_UNIT,
    MAX_HEADER_LEN,
    MAX_OPTIONS_LEN,
    MAX_TOTAL_LEN,
    MIN_HEADER_LEN};
