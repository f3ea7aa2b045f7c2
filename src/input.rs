use std::io::{self, Read};

/// Reads lines one byte at a time.
///
/// Nothing past the current newline is consumed, so children sharing the
/// interpreter's stdin see the rest of the input.
pub struct LineReader<R> {
    inner: R,
}

impl<R: Read> LineReader<R> {
    #[inline(always)]
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The next line without its newline, or `None` at end of input.
    ///
    /// A final line without a newline is still returned; an empty remainder is not.
    pub fn next_line(&mut self) -> io::Result::<Option::<String>> {
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) if buf.is_empty() => return Ok(None),
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => buf.push(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e)
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
