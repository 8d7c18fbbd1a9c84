//! Input splitting: contiguous byte ranges over a line file, with
//! boundary-spanning lines assigned to the range where they start.

use std::io::{self, BufRead, Seek, SeekFrom};

/// Half-open byte range `[start, end)` of the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

/// Divide `len` bytes into `parts` contiguous ranges of near-equal size.
/// Ranges may be empty when the file is smaller than the part count.
pub fn byte_ranges(len: u64, parts: usize) -> Vec<ByteRange> {
    let parts = parts.max(1) as u64;
    let base = len / parts;
    let rem = len % parts;
    let mut ranges = Vec::with_capacity(parts as usize);
    let mut start = 0;
    for i in 0..parts {
        let size = base + u64::from(i < rem);
        ranges.push(ByteRange {
            start,
            end: start + size,
        });
        start += size;
    }
    ranges
}

/// Iterates the lines owned by one byte range.
///
/// A line belongs to the range containing its first byte: the reader keeps
/// consuming past `end` to complete a line it started, and a range starting
/// at `s > 0` opens at `s - 1` and discards through the first newline so the
/// previous range's spanning line is not double-counted. Together the ranges
/// of a file deliver every line exactly once.
pub struct LineChunkReader<R> {
    inner: R,
    pos: u64,
    end: u64,
}

impl<R: BufRead + Seek> LineChunkReader<R> {
    pub fn new(mut inner: R, range: ByteRange) -> io::Result<Self> {
        let mut pos = range.start;
        if range.start > 0 {
            inner.seek(SeekFrom::Start(range.start - 1))?;
            let mut skipped = Vec::new();
            let n = inner.read_until(b'\n', &mut skipped)?;
            pos = range.start - 1 + n as u64;
        } else {
            inner.seek(SeekFrom::Start(0))?;
        }
        Ok(Self {
            inner,
            pos,
            end: range.end,
        })
    }
}

impl<R: BufRead + Seek> Iterator for LineChunkReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let mut buf = Vec::new();
        match self.inner.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(n) => {
                self.pos += n as u64;
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                match String::from_utf8(buf) {
                    Ok(line) => Some(Ok(line)),
                    Err(err) => Some(Err(io::Error::new(io::ErrorKind::InvalidData, err))),
                }
            }
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lines_for_range(data: &str, range: ByteRange) -> Vec<String> {
        let reader = LineChunkReader::new(Cursor::new(data.as_bytes().to_vec()), range).unwrap();
        reader.map(|l| l.unwrap()).collect()
    }

    #[test]
    fn ranges_tile_the_file() {
        let ranges = byte_ranges(10, 3);
        assert_eq!(ranges[0], ByteRange { start: 0, end: 4 });
        assert_eq!(ranges[1], ByteRange { start: 4, end: 7 });
        assert_eq!(ranges[2], ByteRange { start: 7, end: 10 });
    }

    #[test]
    fn empty_file_yields_empty_ranges() {
        for range in byte_ranges(0, 4) {
            assert_eq!(range.start, range.end);
        }
    }

    #[test]
    fn every_split_point_delivers_each_line_once() {
        let data = "10\n7\n300\n42\n-6\n";
        let expected: Vec<String> = data.lines().map(str::to_string).collect();
        let len = data.len() as u64;
        for cut in 0..=len {
            let mut collected = lines_for_range(data, ByteRange { start: 0, end: cut });
            collected.extend(lines_for_range(data, ByteRange { start: cut, end: len }));
            assert_eq!(collected, expected, "cut at {cut}");
        }
    }

    #[test]
    fn three_way_splits_also_cover_exactly() {
        let data = "1\n22\n333\n4444\n55555\n";
        let expected: Vec<String> = data.lines().map(str::to_string).collect();
        for parts in 1..=6 {
            let mut collected = Vec::new();
            for range in byte_ranges(data.len() as u64, parts) {
                collected.extend(lines_for_range(data, range));
            }
            assert_eq!(collected, expected, "{parts} parts");
        }
    }

    #[test]
    fn missing_final_newline_still_delivers_last_line() {
        let data = "5\n17";
        let mut collected = Vec::new();
        for range in byte_ranges(data.len() as u64, 2) {
            collected.extend(lines_for_range(data, range));
        }
        assert_eq!(collected, vec!["5", "17"]);
    }

    #[test]
    fn crlf_payload_is_preserved() {
        let data = "8\r\n3\r\n";
        let collected = lines_for_range(
            data,
            ByteRange {
                start: 0,
                end: data.len() as u64,
            },
        );
        assert_eq!(collected, vec!["8\r", "3\r"]);
    }
}
