use std::io::{Cursor, Write};

use zip::write::{SimpleFileOptions, ZipWriter};

pub const JAN_2014: &str = "AUD/USD,20131231 23:59:59.999,0.88700,0.88800
AUD/USD,20140101 21:55:34.404,0.88796,0.88922
AUD/USD,20140131 23:59:59.000,0.87000,0.87100
";

pub const FEB_2014: &str = "AUD/USD,20140203 00:03:38.169,0.87500,0.87524
AUD/USD,20140301 00:00:00.000,0.87600,0.87650
";

pub fn zipped(name: &str, body: &str) -> Vec<u8> {
    let mut w = ZipWriter::new(Cursor::new(Vec::new()));
    w.start_file(name, SimpleFileOptions::default()).unwrap();
    w.write_all(body.as_bytes()).unwrap();
    w.finish().unwrap().into_inner()
}
