use core::fmt;

enum_with_unknown! {
    /// IP datagram encapsulated protocol.
    pub enum Protocol(u8) {
        /// IPv6 Hop-by-Hop option.
        HopByHop  = 0x00,
        /// Internet Control Message Protocol.
        Icmp      = 0x01,
        /// Internet Group Management Protocol.
        Igmp      = 0x02,
        /// Transmission Control Protocol.
        Tcp       = 0x06,
        /// User Datagram Protocol.
        Udp       = 0x11,
        /// Generic Routing Encapsulation.
        Gre       = 0x2f,
        /// Encapsulating Security Payload.
        Esp       = 0x32,
        /// Authentication Header.
        Ah        = 0x33,
        /// Stream Control Transmission Protocol.
        Sctp      = 0x84,
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Protocol::HopByHop    => write!(f, "Hop-by-Hop"),
            Protocol::Icmp        => write!(f, "ICMP"),
            Protocol::Igmp        => write!(f, "IGMP"),
            Protocol::Tcp         => write!(f, "TCP"),
            Protocol::Udp         => write!(f, "UDP"),
            Protocol::Gre         => write!(f, "GRE"),
            Protocol::Esp         => write!(f, "ESP"),
            Protocol::Ah          => write!(f, "AH"),
            Protocol::Sctp        => write!(f, "SCTP"),
            Protocol::Unknown(id) => write!(f, "0x{:02x}", id)
        }
    }
}
