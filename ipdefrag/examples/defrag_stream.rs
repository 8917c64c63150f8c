//! Reassembles the datagrams of a raw IPv4 byte stream.
//!
//! # Usage
//!
//! The example reads a stream of back-to-back IPv4 datagrams, without any link layer framing,
//! from a file or from stdin. It feeds the bytes in chunks of configurable size, printing every
//! complete datagram and every flow that had to be discarded.
//!
//! A stream can be extracted from a capture of fragmented traffic, for example:
//!
//!   > $ tshark -r frags.pcap -T fields -e ip.raw | xxd -r -p > frags.bin
//!
//! Then run the example on it, with small reads to exercise the stream parser:
//!
//!   > $ cargo run --example defrag_stream -- --chunk 7 frags.bin
use std::fs::File;
use std::io::{self, stdin, stdout, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use ipdefrag::layer::{defrag, Pipeline};

fn main() {
    let config = Config::from_args();

    let mut input: Box<dyn Read> = match &config.input {
        Some(path) => Box::new(File::open(path).expect("Couldn't open input")),
        None => Box::new(stdin()),
    };

    let mut pipeline = Pipeline::new(defrag::Config {
        max_flows: config.max_flows,
        flow_timeout: Some(Duration::from_secs(config.timeout)),
    });

    let out = stdout();
    let mut out = out.lock();
    let mut buffer = vec![0; config.chunk.max(1)];
    let mut complete = 0usize;

    loop {
        let len = match input.read(&mut buffer) {
            Ok(0) => break,
            Ok(len) => len,
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => panic!("Error during read {:?}", err),
        };

        let result = pipeline.consume_with(&buffer[..len], |datagram| match datagram {
            Ok(datagram) => {
                complete += 1;
                writeln!(out, "{}", datagram).unwrap();
            },
            Err(err) => writeln!(out, "discarded flow: {}", err).unwrap(),
        });

        result.unwrap_or_else(|err| {
            panic!("Stream corrupted {:?}", err);
        });
    }

    writeln!(out, "{} datagrams, {} flows incomplete, {} bytes left over",
        complete,
        pipeline.defragmenter().len(),
        pipeline.parser().buffered()).unwrap();
}

#[derive(StructOpt)]
struct Config {
    /// Read from this file instead of stdin.
    #[structopt(parse(from_os_str))]
    input: Option<PathBuf>,

    /// The number of bytes fed to the parser at once.
    #[structopt(long, default_value = "1500")]
    chunk: usize,

    /// The maximum number of flows in reassembly.
    #[structopt(long, default_value = "1024")]
    max_flows: usize,

    /// Seconds until an incomplete flow is discarded.
    #[structopt(long, default_value = "30")]
    timeout: u64,
}
