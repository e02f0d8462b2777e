//! Text trace input for the driver binary.
//!
//! One access per line, `r <hex-addr>` or `w <hex-addr>`; blank lines and
//! anything else are skipped. Traces with an `.xz` extension are
//! decompressed on the fly. The core never sees any of this.

use std::{
    fs,
    io::{self, BufRead, BufReader, Read},
    path::PathBuf,
    thread::{self, JoinHandle},
};

use crossbeam::channel::{Receiver, Sender};
use xz2::read::XzDecoder;

use crate::event::Op;

/// One parsed trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub op: Op,
    pub addr: u32,
}

pub fn parse_record(line: &str) -> Option<Access> {
    let mut fields = line.split_whitespace();
    let op = match fields.next()? {
        "r" | "R" => Op::Read,
        "w" | "W" => Op::Write,
        _ => return None,
    };
    let addr = fields.next()?;
    let addr = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    let addr = u32::from_str_radix(addr, 16).ok()?;
    Some(Access { op, addr })
}

/// A trace being parsed on a background thread, consumed in batches from the
/// bounded channel. The channel closes at end of trace.
pub struct Trace {
    pub rec: Receiver<Vec<Access>>,
    _thread: JoinHandle<()>,
}

impl Trace {
    pub fn read(
        path: PathBuf,
        records_per_block: usize,
        blocks_per_queue: usize,
    ) -> io::Result<Trace> {
        let file = fs::File::open(&path)?;
        let stream: Box<dyn Read + Send> = if path.extension().is_some_and(|ext| ext == "xz") {
            Box::new(XzDecoder::new(file))
        } else {
            Box::new(file)
        };
        let (sender, receiver) = crossbeam::channel::bounded(blocks_per_queue);

        let t = thread::spawn(move || Trace::run_thread(stream, records_per_block, sender));

        Ok(Trace {
            rec: receiver,
            _thread: t,
        })
    }

    fn run_thread(stream: Box<dyn Read + Send>, records_per_block: usize, queue: Sender<Vec<Access>>) {
        let mut lines = BufReader::new(stream).lines();
        loop {
            let mut block = Vec::with_capacity(records_per_block);
            let mut eof = false;
            while block.len() < records_per_block {
                match lines.next() {
                    Some(Ok(line)) => {
                        if let Some(access) = parse_record(&line) {
                            block.push(access);
                        }
                    }
                    Some(Err(err)) => panic!("trace read failed: {}", err),
                    None => {
                        eof = true;
                        break;
                    }
                }
            }
            // A send fails only when the consumer is gone; stop quietly.
            if !block.is_empty() && queue.send(block).is_err() {
                return;
            }
            if eof {
                return;
            }
        }
    }
}
