use anyhow::Result;
use std::io::{BufRead, Write};

use super::SeqRecord;
use crate::error::ViroError;

pub struct FastqReader<R: BufRead> {
    reader: R,
    buf: String,
    line: usize,
    done: bool,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), line: 0, done: false }
    }

    fn read_line(&mut self) -> Result<usize> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        if n > 0 { self.line += 1; }
        Ok(n)
    }

    fn malformed(&self, msg: &str) -> anyhow::Error {
        ViroError::MalformedRecord { line: self.line, msg: msg.to_string() }.into()
    }

    pub fn next_record(&mut self) -> Result<Option<SeqRecord>> {
        if self.done { return Ok(None); }

        // header line starting with '@', blank lines before it are skipped
        loop {
            if self.read_line()? == 0 { self.done = true; return Ok(None); }
            if !self.buf.trim().is_empty() { break; }
        }
        if !self.buf.starts_with('@') {
            return Err(self.malformed("FASTQ header not starting with '@'"));
        }
        let header = self.buf[1..].trim_end().to_string();
        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        // sequence line
        if self.read_line()? == 0 { return Err(self.malformed("unexpected EOF after header")); }
        let seq = self.buf.trim_end().as_bytes().to_vec();

        // plus line
        if self.read_line()? == 0 || !self.buf.starts_with('+') {
            return Err(self.malformed("missing '+' line"));
        }

        // quality line; may legitimately start with '@'
        if self.read_line()? == 0 { return Err(self.malformed("missing quality line")); }
        let qual = self.buf.trim_end().as_bytes().to_vec();

        if qual.len() != seq.len() { return Err(self.malformed("seq/qual length mismatch")); }

        Ok(Some(SeqRecord { id, desc, seq, qual: Some(qual) }))
    }
}

/// Write one four-line record. A record without quality gets a
/// placeholder string of `I` so the output stays valid FASTQ.
pub fn write_record<W: Write>(out: &mut W, rec: &SeqRecord) -> Result<()> {
    match &rec.desc {
        Some(d) => writeln!(out, "@{} {}", rec.id, d)?,
        None => writeln!(out, "@{}", rec.id)?,
    }
    out.write_all(&rec.seq)?;
    out.write_all(b"\n+\n")?;
    match &rec.qual {
        Some(q) => out.write_all(q)?,
        None => out.write_all(&vec![b'I'; rec.seq.len()])?,
    }
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_two_records() {
        let data = b"@r1 sample=1\nACGT\n+\nIIII\n@r2\nGG\n+r2\n@#\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.id, "r1");
        assert_eq!(r1.desc.as_deref(), Some("sample=1"));
        assert_eq!(r1.seq, b"ACGT");
        assert_eq!(r1.qual.as_deref(), Some(&b"IIII"[..]));

        // quality line beginning with '@' is not mistaken for a header
        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.id, "r2");
        assert_eq!(r2.qual.as_deref(), Some(&b"@#"[..]));

        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let data = b"@r1\nAC\n+\nII\n\n\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        assert!(r.next_record().unwrap().is_some());
        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let data = b"@r1\nACGT\n+\nII\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        let err = r.next_record().unwrap_err();
        match err.downcast_ref::<ViroError>() {
            Some(ViroError::MalformedRecord { line, .. }) => assert_eq!(*line, 4),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_header_is_an_error() {
        let data = b"ACGT\n+\nIIII\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));
        assert!(r.next_record().is_err());
    }
}
