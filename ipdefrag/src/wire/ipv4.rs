use core::{fmt, ops};
use byteorder::{ByteOrder, NetworkEndian};

use super::{Error, Result};
use super::field::Field;

pub use super::ip::Protocol;

/// Length of the fixed part of every IPv4 header, in octets.
pub const MIN_HEADER_LEN: usize = 20;

/// Largest header length expressible in the four bit header length field, in octets.
pub const MAX_HEADER_LEN: usize = 60;

/// Largest amount of option octets a header can carry.
pub const MAX_OPTIONS_LEN: usize = MAX_HEADER_LEN - MIN_HEADER_LEN;

/// Largest length expressible in the 16-bit total length field.
///
/// This also bounds the payload of a reassembled datagram, see [RFC 791 § 3.2].
///
/// [RFC 791 § 3.2]: https://tools.ietf.org/html/rfc791#section-3.2
pub const MAX_TOTAL_LEN: usize = 0xffff;

/// The unit of the fragment offset field, in octets.
pub const FRAGMENT_UNIT: usize = 8;

/// Length of the key identifying all fragments of one original datagram.
pub const FLOW_KEY_LEN: usize = 11;

/// A four-octet IPv4 address.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; 4]);

impl Address {
    /// An unspecified address.
    pub const UNSPECIFIED: Address = Address([0x00; 4]);

    /// The broadcast address.
    pub const BROADCAST:   Address = Address([0xff; 4]);

    /// Construct an IPv4 address from parts.
    pub const fn new(a0: u8, a1: u8, a2: u8, a3: u8) -> Address {
        Address([a0, a1, a2, a3])
    }

    /// Construct an IPv4 address from a sequence of octets, in big-endian.
    ///
    /// # Panics
    /// The function panics if `data` is not four octets long.
    pub fn from_bytes(data: &[u8]) -> Address {
        let mut bytes = [0; 4];
        bytes.copy_from_slice(data);
        Address(bytes)
    }

    /// Return an IPv4 address as a sequence of octets, in big-endian.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<::std::net::Ipv4Addr> for Address {
    fn from(x: ::std::net::Ipv4Addr) -> Address {
        Address(x.octets())
    }
}

impl From<Address> for ::std::net::Ipv4Addr {
    fn from(Address(x): Address) -> ::std::net::Ipv4Addr {
        x.into()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = self.0;
        write!(f, "{}.{}.{}.{}", bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// The three fragmentation control bits.
///
/// The raw value is the top three bits of the flags/offset word shifted down, so the "more
/// fragments" bit has the value `1` and the reserved bit the value `4`.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Default)]
pub struct Flags(u8);

impl Flags {
    /// No flag set.
    pub const NONE:           Flags = Flags(0b000);

    /// Set on every fragment except the last one.
    pub const MORE_FRAGMENTS: Flags = Flags(0b001);

    /// The datagram must not be fragmented.
    pub const DONT_FRAGMENT:  Flags = Flags(0b010);

    /// The reserved bit, must be zero.
    pub const RESERVED:       Flags = Flags(0b100);

    /// Construct flags from the raw value, ignoring bits outside the field.
    pub const fn from_bits_truncate(bits: u8) -> Flags {
        Flags(bits & 0b111)
    }

    /// The raw value of the three flag bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Query if all bits of `other` are set.
    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Return the "more fragments" flag.
    pub fn more_frags(self) -> bool {
        self.contains(Flags::MORE_FRAGMENTS)
    }

    /// Return the "don't fragment" flag.
    pub fn dont_frag(self) -> bool {
        self.contains(Flags::DONT_FRAGMENT)
    }
}

impl ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut sep = "";
        for &(flag, name) in &[
            (Flags::RESERVED, "rsv"),
            (Flags::DONT_FRAGMENT, "df"),
            (Flags::MORE_FRAGMENTS, "mf"),
        ] {
            if self.contains(flag) {
                write!(f, "{}{}", sep, name)?;
                sep = ",";
            }
        }
        Ok(())
    }
}

/// The option octets of a header, stored inline.
///
/// Options are carried opaquely. Their length is always a multiple of four since it is derived
/// from the header length field, counted in 32-bit words.
#[derive(Clone, Copy)]
pub struct Options {
    len: u8,
    bytes: [u8; MAX_OPTIONS_LEN],
}

impl Options {
    /// The options of a minimal header.
    pub const EMPTY: Options = Options { len: 0, bytes: [0; MAX_OPTIONS_LEN] };

    /// Copy option octets.
    ///
    /// Returns `Err(Error::Malformed)` if there are more than 40 octets or the length is not a
    /// multiple of four.
    pub fn new(data: &[u8]) -> Result<Options> {
        if data.len() > MAX_OPTIONS_LEN || data.len() % 4 != 0 {
            return Err(Error::Malformed);
        }

        let mut options = Options::EMPTY;
        options.bytes[..data.len()].copy_from_slice(data);
        options.len = data.len() as u8;
        Ok(options)
    }

    /// The option octets.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    /// The number of option octets.
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Check if there are no options.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::EMPTY
    }
}

impl PartialEq for Options {
    fn eq(&self, other: &Options) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Options {}

impl core::hash::Hash for Options {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.as_bytes()).finish()
    }
}

/// Identifies all fragments of one original datagram.
///
/// The octets are the source address, destination address, protocol and identification, in that
/// order and in network byte order. Two live datagrams never share a key.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct FlowKey(pub [u8; FLOW_KEY_LEN]);

impl FlowKey {
    /// Assemble the key from its parts.
    pub fn new(src_addr: Address, dst_addr: Address, protocol: Protocol, ident: u16) -> Self {
        let mut key = [0; FLOW_KEY_LEN];
        key[0..4].copy_from_slice(src_addr.as_bytes());
        key[4..8].copy_from_slice(dst_addr.as_bytes());
        key[8] = protocol.into();
        NetworkEndian::write_u16(&mut key[9..11], ident);
        FlowKey(key)
    }

    /// The key as raw octets.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The source address of the fragments.
    pub fn src_addr(&self) -> Address {
        Address::from_bytes(&self.0[0..4])
    }

    /// The destination address of the fragments.
    pub fn dst_addr(&self) -> Address {
        Address::from_bytes(&self.0[4..8])
    }

    /// The protocol of the fragmented datagram.
    pub fn protocol(&self) -> Protocol {
        Protocol::from(self.0[8])
    }

    /// The identification shared by all fragments.
    pub fn ident(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[9..11])
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}->{} proto={} id={}",
               self.src_addr(), self.dst_addr(), self.protocol(), self.ident())
    }
}

byte_wrapper! {
    /// A byte sequence representing an IPv4 packet.
    #[derive(Debug, PartialEq, Eq)]
    pub struct ipv4([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const VER_IHL:  usize = 0;
    pub(crate) const TOS:      usize = 1;
    pub(crate) const LENGTH:   Field = 2..4;
    pub(crate) const IDENT:    Field = 4..6;
    pub(crate) const FLG_OFF:  Field = 6..8;
    pub(crate) const TTL:      usize = 8;
    pub(crate) const PROTOCOL: usize = 9;
    pub(crate) const CHECKSUM: Field = 10..12;
    pub(crate) const SRC_ADDR: Field = 12..16;
    pub(crate) const DST_ADDR: Field = 16..20;
}

impl ipv4 {
    /// Imbue a raw octet buffer with IPv4 packet structure.
    pub fn new_unchecked(buffer: &[u8]) -> &ipv4 {
        Self::__from_macro_new_unchecked(buffer)
    }

    /// Imbue a mutable octet buffer with IPv4 packet structure.
    pub fn new_unchecked_mut(buffer: &mut [u8]) -> &mut ipv4 {
        Self::__from_macro_new_unchecked_mut(buffer)
    }

    /// Shorthand for a combination of [new_unchecked] and [check_len].
    ///
    /// [new_unchecked]: #method.new_unchecked
    /// [check_len]: #method.check_len
    pub fn new_checked(data: &[u8]) -> Result<&ipv4> {
        let packet = Self::new_unchecked(data);
        packet.check_len()?;
        Ok(packet)
    }

    /// View the packet as a raw byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Ensure that no header accessor will panic if called.
    ///
    /// Returns `Err(Error::Truncated)` if the buffer is shorter than the fixed header or than the
    /// header length it declares. Returns `Err(Error::Malformed)` if the declared header length is
    /// below the 20 octet minimum. The payload is not required to be present.
    pub fn check_header(&self) -> Result<()> {
        let len = self.0.len();
        if len < field::DST_ADDR.end {
            Err(Error::Truncated)
        } else if usize::from(self.header_len()) < MIN_HEADER_LEN {
            Err(Error::Malformed)
        } else if len < usize::from(self.header_len()) {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    /// Ensure that no accessor method will panic if called.
    /// Returns `Err(Error::Truncated)` if the buffer is too short.
    /// Returns `Err(Error::Malformed)` if the header length is greater
    /// than total length.
    ///
    /// The result of this check is invalidated by calling [set_header_len]
    /// and [set_total_len].
    ///
    /// [set_header_len]: #method.set_header_len
    /// [set_total_len]: #method.set_total_len
    pub fn check_len(&self) -> Result<()> {
        self.check_header()?;
        if u16::from(self.header_len()) > self.total_len() {
            Err(Error::Malformed)
        } else if self.0.len() < usize::from(self.total_len()) {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    /// Return the version field.
    #[inline]
    pub fn version(&self) -> u8 {
        self.0[field::VER_IHL] >> 4
    }

    /// Return the header length, in octets.
    #[inline]
    pub fn header_len(&self) -> u8 {
        (self.0[field::VER_IHL] & 0x0f) * 4
    }

    /// Return the type of service field.
    pub fn tos(&self) -> u8 {
        self.0[field::TOS]
    }

    /// Return the total length field.
    #[inline]
    pub fn total_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::LENGTH])
    }

    /// Return the fragment identification field.
    #[inline]
    pub fn ident(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::IDENT])
    }

    /// Return all three flag bits.
    #[inline]
    pub fn flags(&self) -> Flags {
        let raw = NetworkEndian::read_u16(&self.0[field::FLG_OFF]);
        Flags::from_bits_truncate((raw >> 13) as u8)
    }

    /// Return the "don't fragment" flag.
    #[inline]
    pub fn dont_frag(&self) -> bool {
        NetworkEndian::read_u16(&self.0[field::FLG_OFF]) & 0x4000 != 0
    }

    /// Return the "more fragments" flag.
    #[inline]
    pub fn more_frags(&self) -> bool {
        NetworkEndian::read_u16(&self.0[field::FLG_OFF]) & 0x2000 != 0
    }

    /// Return the fragment offset, in octets.
    #[inline]
    pub fn frag_offset(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::FLG_OFF]) << 3
    }

    /// Return the time to live field.
    #[inline]
    pub fn hop_limit(&self) -> u8 {
        self.0[field::TTL]
    }

    /// Return the protocol field.
    #[inline]
    pub fn protocol(&self) -> Protocol {
        Protocol::from(self.0[field::PROTOCOL])
    }

    /// Return the header checksum field.
    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::CHECKSUM])
    }

    /// Return the source address field.
    #[inline]
    pub fn src_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::SRC_ADDR])
    }

    /// Return the destination address field.
    #[inline]
    pub fn dst_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::DST_ADDR])
    }

    /// Return the range of the option octets.
    pub fn options_range(&self) -> Field {
        field::DST_ADDR.end..usize::from(self.header_len())
    }

    /// Return the option octets.
    pub fn options(&self) -> &[u8] {
        let range = self.options_range();
        &self.0[range]
    }

    /// Set the version field.
    #[inline]
    pub fn set_version(&mut self, value: u8) {
        self.0[field::VER_IHL] = (self.0[field::VER_IHL] & !0xf0) | (value << 4);
    }

    /// Set the header length, in octets.
    #[inline]
    pub fn set_header_len(&mut self, value: u8) {
        self.0[field::VER_IHL] = (self.0[field::VER_IHL] & !0x0f) | ((value / 4) & 0x0f);
    }

    /// Set the type of service field.
    pub fn set_tos(&mut self, value: u8) {
        self.0[field::TOS] = value
    }

    /// Set the total length field.
    #[inline]
    pub fn set_total_len(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.0[field::LENGTH], value)
    }

    /// Set the fragment identification field.
    #[inline]
    pub fn set_ident(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.0[field::IDENT], value)
    }

    /// Replace all three flag bits.
    #[inline]
    pub fn set_flags(&mut self, value: Flags) {
        let raw = NetworkEndian::read_u16(&self.0[field::FLG_OFF]);
        let raw = (raw & !0xe000) | (u16::from(value.bits()) << 13);
        NetworkEndian::write_u16(&mut self.0[field::FLG_OFF], raw);
    }

    /// Set the fragment offset, in octets.
    #[inline]
    pub fn set_frag_offset(&mut self, value: u16) {
        let raw = NetworkEndian::read_u16(&self.0[field::FLG_OFF]);
        let raw = (raw & 0xe000) | (value >> 3);
        NetworkEndian::write_u16(&mut self.0[field::FLG_OFF], raw);
    }

    /// Set the time to live field.
    #[inline]
    pub fn set_hop_limit(&mut self, value: u8) {
        self.0[field::TTL] = value
    }

    /// Set the protocol field.
    #[inline]
    pub fn set_protocol(&mut self, value: Protocol) {
        self.0[field::PROTOCOL] = value.into()
    }

    /// Set the header checksum field.
    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.0[field::CHECKSUM], value)
    }

    /// Set the source address field.
    #[inline]
    pub fn set_src_addr(&mut self, value: Address) {
        self.0[field::SRC_ADDR].copy_from_slice(value.as_bytes())
    }

    /// Set the destination address field.
    #[inline]
    pub fn set_dst_addr(&mut self, value: Address) {
        self.0[field::DST_ADDR].copy_from_slice(value.as_bytes())
    }

    /// Return the option octets mutably.
    pub fn options_mut(&mut self) -> &mut [u8] {
        let range = self.options_range();
        &mut self.0[range]
    }

    /// Compute the range of the payload without accessing it.
    ///
    /// Contrary to `payload_slice`, this only requires the packet to have a valid header but need
    /// not have a consistent length for the payload itself.
    pub fn payload_range(&self) -> Field {
        let header_end = usize::from(self.header_len());
        let total_len = usize::from(self.total_len());
        header_end..total_len
    }

    /// Return the payload as a byte slice.
    pub fn payload_slice(&self) -> &[u8] {
        let range = self.payload_range();
        &self.0[range]
    }

    /// Return the payload as a mutable byte slice.
    pub fn payload_mut_slice(&mut self) -> &mut [u8] {
        let range = self.payload_range();
        &mut self.0[range]
    }
}

impl AsRef<[u8]> for ipv4 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A high-level representation of an Internet Protocol version 4 packet header.
///
/// All fields are kept as they appear on the wire, including the checksum which is neither
/// verified nor recomputed. The version is implied, parsing rejects anything but 4.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Repr {
    /// The header length, in octets, including options.
    pub header_len:  u8,
    /// The type of service.
    pub tos:         u8,
    /// The length of header and payload, in octets.
    pub total_len:   u16,
    /// The identification shared by all fragments of a datagram.
    pub ident:       u16,
    /// The fragmentation control bits.
    pub flags:       Flags,
    /// The position of the payload within the original datagram, in octets.
    pub frag_offset: u16,
    /// The remaining hop limit of the packet.
    pub hop_limit:   u8,
    /// The encapsulated protocol identifier.
    pub protocol:    Protocol,
    /// The header checksum, as received.
    pub checksum:    u16,
    /// The source of the packet.
    pub src_addr:    Address,
    /// The destination of the packet.
    pub dst_addr:    Address,
    /// The option octets, `header_len - 20` of them once attached.
    pub options:     Options,
}

impl Repr {
    /// Parse the fixed 20 octets of a header.
    ///
    /// The options are left empty even if the header length announces some, the caller attaches
    /// them with [`set_options`] once available. Rejects any version other than 4, a header length
    /// below 20 octets and a total length that does not cover the header.
    ///
    /// [`set_options`]: #method.set_options
    pub fn parse_fixed(packet: &ipv4) -> Result<Repr> {
        if packet.as_bytes().len() < field::DST_ADDR.end { return Err(Error::Truncated) }
        // Version 4 is expected.
        if packet.version() != 4 { return Err(Error::Malformed) }
        let header_len = packet.header_len();
        if usize::from(header_len) < MIN_HEADER_LEN { return Err(Error::Malformed) }
        if packet.total_len() < u16::from(header_len) { return Err(Error::Malformed) }

        Ok(Repr {
            header_len,
            tos:         packet.tos(),
            total_len:   packet.total_len(),
            ident:       packet.ident(),
            flags:       packet.flags(),
            frag_offset: packet.frag_offset(),
            hop_limit:   packet.hop_limit(),
            protocol:    packet.protocol(),
            checksum:    packet.checksum(),
            src_addr:    packet.src_addr(),
            dst_addr:    packet.dst_addr(),
            options:     Options::EMPTY,
        })
    }

    /// Parse a complete header, including its options.
    ///
    /// The payload need not be present.
    pub fn parse(packet: &ipv4) -> Result<Repr> {
        packet.check_header()?;
        let mut repr = Repr::parse_fixed(packet)?;
        repr.set_options(packet.options())?;
        Ok(repr)
    }

    /// Decode a header starting at `offset`, returning it with the new read cursor.
    ///
    /// The options are read only when all of them are available. Otherwise the cursor stops after
    /// the fixed header and the options are left empty, as in [`parse_fixed`].
    ///
    /// [`parse_fixed`]: #method.parse_fixed
    pub fn decode(bytes: &[u8], offset: usize) -> Result<(Repr, usize)> {
        let data = bytes.get(offset..).ok_or(Error::Truncated)?;
        let packet = ipv4::new_unchecked(data);
        let mut repr = Repr::parse_fixed(packet)?;
        let mut cursor = offset + MIN_HEADER_LEN;

        let option_len = repr.option_len();
        if option_len > 0 && data.len() >= MIN_HEADER_LEN + option_len {
            repr.set_options(packet.options())?;
            cursor += option_len;
        }

        Ok((repr, cursor))
    }

    /// Attach the option octets announced by the header length.
    ///
    /// Returns `Err(Error::Malformed)` if the number of octets differs from `option_len()`.
    pub fn set_options(&mut self, options: &[u8]) -> Result<()> {
        if options.len() != self.option_len() {
            return Err(Error::Malformed);
        }
        self.options = Options::new(options)?;
        Ok(())
    }

    /// The number of option octets announced by the header length.
    pub fn option_len(&self) -> usize {
        usize::from(self.header_len).saturating_sub(MIN_HEADER_LEN)
    }

    /// The number of payload octets announced by the total length.
    pub fn payload_len(&self) -> usize {
        usize::from(self.total_len).saturating_sub(usize::from(self.header_len))
    }

    /// Return the "more fragments" flag.
    pub fn more_frags(&self) -> bool {
        self.flags.more_frags()
    }

    /// Whether this is a fragment rather than a whole datagram.
    ///
    /// True for every fragment but the last one, and for a last fragment with non-zero offset.
    /// A header with offset zero and the "more fragments" bit clear is a complete datagram.
    pub fn is_fragmented(&self) -> bool {
        self.more_frags() || self.frag_offset > 0
    }

    /// The key shared by all fragments of the original datagram.
    pub fn flow_key(&self) -> FlowKey {
        FlowKey::new(self.src_addr, self.dst_addr, self.protocol, self.ident)
    }

    /// Return the length of a header that will be emitted from this high-level representation.
    pub fn buffer_len(&self) -> usize {
        usize::from(self.header_len)
    }

    /// Emit a high-level representation into an Internet Protocol version 4 packet.
    ///
    /// # Panics
    /// This function panics if the packet is shorter than `buffer_len()` or if `header_len` is
    /// below 20 octets. A `header_len` that is not a multiple of four is emitted truncated to one.
    pub fn emit(&self, packet: &mut ipv4) {
        packet.set_version(4);
        packet.set_header_len(self.header_len);
        packet.set_tos(self.tos);
        packet.set_total_len(self.total_len);
        packet.set_ident(self.ident);
        packet.set_flags(self.flags);
        packet.set_frag_offset(self.frag_offset);
        packet.set_hop_limit(self.hop_limit);
        packet.set_protocol(self.protocol);
        packet.set_checksum(self.checksum);
        packet.set_src_addr(self.src_addr);
        packet.set_dst_addr(self.dst_addr);

        let options = packet.options_mut();
        let given = self.options.as_bytes();
        let len = given.len().min(options.len());
        options[..len].copy_from_slice(&given[..len]);
        // Pad anything not attached with end-of-options.
        options[len..].iter_mut().for_each(|b| *b = 0);
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "IPv4 src={} dst={} proto={} tlen={} id={}",
               self.src_addr, self.dst_addr, self.protocol, self.total_len, self.ident)?;
        if self.flags != Flags::NONE {
            write!(f, " {}", self.flags)?;
        }
        if self.frag_offset != 0 {
            write!(f, " off={}", self.frag_offset)?;
        }
        if usize::from(self.header_len) != MIN_HEADER_LEN {
            write!(f, " hlen={}", self.header_len)?;
        }
        Ok(())
    }
}

/// An owned IPv4 datagram, header and payload.
///
/// The payload always has exactly the length the header announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    repr: Repr,
    payload: Vec<u8>,
}

impl Datagram {
    /// Pair a header with its payload.
    ///
    /// Returns `Err(Error::Malformed)` if the header length is not a multiple of four between 20
    /// and 60 octets, if the total length does not cover the header, or if the payload length
    /// differs from `repr.payload_len()`.
    pub fn new(repr: Repr, payload: Vec<u8>) -> Result<Self> {
        let header_len = usize::from(repr.header_len);
        if header_len < MIN_HEADER_LEN || header_len > MAX_HEADER_LEN || header_len % 4 != 0 {
            return Err(Error::Malformed);
        }
        if usize::from(repr.total_len) < header_len || payload.len() != repr.payload_len() {
            return Err(Error::Malformed);
        }
        Ok(Datagram { repr, payload })
    }

    /// Parse one complete datagram from a buffer.
    ///
    /// Octets beyond the total length are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let packet = ipv4::new_checked(data)?;
        let repr = Repr::parse(packet)?;
        Datagram::new(repr, packet.payload_slice().to_vec())
    }

    /// The header of the datagram.
    pub fn repr(&self) -> Repr {
        self.repr
    }

    /// The payload of the datagram.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Split into header and payload.
    pub fn into_parts(self) -> (Repr, Vec<u8>) {
        (self.repr, self.payload)
    }

    /// The number of octets `to_bytes` produces.
    pub fn buffer_len(&self) -> usize {
        self.repr.buffer_len() + self.payload.len()
    }

    /// Serialize header and payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0; self.buffer_len()];
        let header_len = self.repr.buffer_len();
        self.repr.emit(ipv4::new_unchecked_mut(&mut bytes));
        bytes[header_len..].copy_from_slice(&self.payload);
        bytes
    }
}

impl fmt::Display for Datagram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} payload={}", self.repr, self.payload.len())
    }
}
