use flate2::read::{MultiGzDecoder, ZlibDecoder};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::utils::compression::compression_utils::{is_deflate, is_gzip};
use crate::utils::file_reader;

/// Reads a possibly gzip or zlib compressed file transparently.
pub struct CompressedFileReader {
    reader: BufReader<Box<dyn Read + Send>>,
}

impl CompressedFileReader {
    pub fn new(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;

        let mut buffered_file = file_reader(file);
        let header = buffered_file.fill_buf()?;
        let is_gzipped = is_gzip(header);
        let is_deflated = is_deflate(header);

        let reader: Box<dyn Read + Send> = if is_gzipped {
            Box::new(MultiGzDecoder::new(buffered_file))
        } else if is_deflated {
            Box::new(ZlibDecoder::new(buffered_file))
        } else {
            Box::new(buffered_file)
        };

        Ok(Self {
            reader: BufReader::new(reader),
        })
    }
}

impl Read for CompressedFileReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for CompressedFileReader {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
    }
}
