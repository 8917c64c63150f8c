use crate::layer::Error;
use crate::wire::{self, Datagram, IpProtocol, Ipv4Address, Ipv4Flags, Ipv4Options, Ipv4Repr};
use super::{Parser, State};

fn datagram(ident: u16, options: &[u8], payload_len: usize) -> Datagram {
    let header_len = 20 + options.len();
    let repr = Ipv4Repr {
        header_len: header_len as u8,
        tos: 0,
        total_len: (header_len + payload_len) as u16,
        ident,
        flags: Ipv4Flags::DONT_FRAGMENT,
        frag_offset: 0,
        hop_limit: 64,
        protocol: IpProtocol::Udp,
        checksum: 0xbeef,
        src_addr: Ipv4Address::new(192, 168, 1, 1),
        dst_addr: Ipv4Address::new(192, 168, 1, 2),
        options: Ipv4Options::new(options).unwrap(),
    };
    let payload = (0..payload_len).map(|i| (i * 7 + usize::from(ident)) as u8).collect();
    Datagram::new(repr, payload).unwrap()
}

#[test]
fn single_call() {
    let expected = datagram(1, &[], 100);
    let mut parser = Parser::new();
    assert_eq!(parser.consume(&expected.to_bytes()), Ok(vec![expected]));
    assert_eq!(parser.state(), State::AwaitHeader);
    assert_eq!(parser.buffered(), 0);
}

#[test]
fn every_split_point() {
    let expected = datagram(2, &[], 40);
    let bytes = expected.to_bytes();

    for split in 0..=bytes.len() {
        let mut parser = Parser::new();
        let mut datagrams = parser.consume(&bytes[..split]).unwrap();
        datagrams.extend(parser.consume(&bytes[split..]).unwrap());
        assert_eq!(datagrams, vec![expected.clone()], "split at {}", split);
    }
}

#[test]
fn every_split_point_with_options() {
    let expected = datagram(3, &[0x94, 0x04, 0x00, 0x00, 0x01, 0x01, 0x01, 0x00], 17);
    let bytes = expected.to_bytes();

    for split in 0..=bytes.len() {
        let mut parser = Parser::with_capacity(4);
        let first = parser.consume(&bytes[..split]).unwrap();
        let second = parser.consume(&bytes[split..]).unwrap();
        assert_eq!(first.len() + second.len(), 1);
        assert_eq!(first.into_iter().chain(second).next(), Some(expected.clone()));
    }
}

#[test]
fn byte_by_byte() {
    let expected = datagram(4, &[0x01; 40], 300);
    let bytes = expected.to_bytes();
    let mut parser = Parser::new();
    let mut datagrams = Vec::new();

    for (idx, byte) in bytes.iter().enumerate() {
        parser.consume_into(&[*byte], &mut datagrams).unwrap();
        match idx {
            0..=18 => assert_eq!(parser.state(), State::AwaitHeader),
            19..=58 => assert!(matches!(parser.state(), State::AwaitOptions(_))),
            _ if idx + 1 < bytes.len() => assert!(matches!(parser.state(), State::AwaitPayload(_))),
            _ => assert_eq!(parser.state(), State::AwaitHeader),
        }
    }

    assert_eq!(datagrams, vec![expected]);
}

#[test]
fn many_in_one_chunk() {
    let all = vec![
        datagram(5, &[], 0),
        datagram(6, &[0xaa; 4], 1),
        datagram(7, &[], 2000),
        datagram(8, &[0x01; 20], 8),
    ];
    let mut bytes: Vec<u8> = all.iter().flat_map(Datagram::to_bytes).collect();
    // A partial trailing header.
    bytes.extend_from_slice(&datagram(9, &[], 4).to_bytes()[..10]);

    let mut parser = Parser::new();
    assert_eq!(parser.consume(&bytes), Ok(all));
    assert_eq!(parser.buffered(), 10);
    assert_eq!(parser.state(), State::AwaitHeader);
}

#[test]
fn empty_chunks() {
    let mut parser = Parser::new();
    assert_eq!(parser.consume(&[]), Ok(vec![]));
    let expected = datagram(10, &[], 0);
    assert_eq!(parser.consume(&expected.to_bytes()), Ok(vec![expected]));
    assert_eq!(parser.consume(&[]), Ok(vec![]));
}

#[test]
fn corrupted_version() {
    let mut bytes = datagram(11, &[], 4).to_bytes();
    bytes[0] = 0x65;

    let mut parser = Parser::new();
    assert_eq!(parser.consume(&bytes), Err(Error::Decode(wire::Error::Malformed)));
    assert_eq!(parser.state(), State::Corrupted(wire::Error::Malformed));
    assert!(parser.is_corrupted());

    let valid = datagram(12, &[], 4);
    assert_eq!(parser.consume(&valid.to_bytes()), Err(Error::Corrupted));

    parser.reset();
    assert!(!parser.is_corrupted());
    assert_eq!(parser.consume(&valid.to_bytes()), Ok(vec![valid]));
}

#[test]
fn corrupted_header_len() {
    let mut bytes = datagram(13, &[], 4).to_bytes();
    bytes[0] = 0x44;

    let mut parser = Parser::new();
    assert_eq!(parser.consume(&bytes), Err(Error::Decode(wire::Error::Malformed)));
}

#[test]
fn corrupted_total_len() {
    let mut bytes = datagram(14, &[0; 8], 0).to_bytes();
    // Total length 24 does not cover the 28 octet header.
    bytes[2] = 0;
    bytes[3] = 24;

    let mut parser = Parser::new();
    assert_eq!(parser.consume(&bytes), Err(Error::Decode(wire::Error::Malformed)));
}

#[test]
fn keeps_datagrams_before_corruption() {
    let valid = datagram(15, &[], 12);
    let mut bytes = valid.to_bytes();
    let mut broken = datagram(16, &[], 12).to_bytes();
    broken[0] = 0x40;
    bytes.extend_from_slice(&broken);

    let mut parser = Parser::new();
    let mut datagrams = Vec::new();
    assert_eq!(parser.consume_into(&bytes, &mut datagrams),
               Err(Error::Decode(wire::Error::Malformed)));
    assert_eq!(datagrams, vec![valid]);
}
