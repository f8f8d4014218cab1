//! Character-level source and sink abstractions over byte streams.

use std::io::{self, BufRead, ErrorKind, Write};

use encoding_rs::{Decoder, UTF_8};

/// Sequential supplier of characters.
pub trait CharSource {
    /// Next character, or `None` at end of input.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

/// Any in-memory character iterator is an infallible source.
impl<I> CharSource for I
where
    I: Iterator<Item = char>,
{
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

/// Sequential consumer of characters.
pub trait CharSink {
    fn write_char(&mut self, ch: char) -> io::Result<()>;

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        s.chars().try_for_each(|ch| self.write_char(ch))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CharSink for String {
    fn write_char(&mut self, ch: char) -> io::Result<()> {
        self.push(ch);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }
}

/// Decodes UTF-8 from a buffered byte reader one character at a time.
///
/// Each chunk the reader buffers is decoded with an incremental
/// `encoding_rs` decoder, so sequences split across chunks are reassembled.
/// Malformed sequences decode to U+FFFD instead of failing, so arbitrary
/// bytes can be piped through.
pub struct Utf8Reader<R> {
    inner: R,
    decoder: Decoder,
    decoded: String,
    pos: usize,
    finished: bool,
}

impl<R: BufRead> Utf8Reader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            decoder: UTF_8.new_decoder_without_bom_handling(),
            decoded: String::new(),
            pos: 0,
            finished: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Decodes the next buffered chunk. An empty chunk is end of input and
    /// flushes any partial sequence held by the decoder.
    fn refill(&mut self) -> io::Result<()> {
        loop {
            match self.inner.fill_buf() {
                Ok(_) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        let src = self.inner.fill_buf()?;
        let last = src.is_empty();
        self.decoded.clear();
        self.pos = 0;
        let needed = self
            .decoder
            .max_utf8_buffer_length(src.len())
            .unwrap_or(src.len().saturating_mul(3).saturating_add(4));
        self.decoded.reserve(needed);
        let (_, read, _) = self.decoder.decode_to_string(src, &mut self.decoded, last);
        self.inner.consume(read);
        self.finished = last;
        Ok(())
    }
}

impl<R: BufRead> CharSource for Utf8Reader<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        loop {
            if let Some(ch) = self.decoded[self.pos..].chars().next() {
                self.pos += ch.len_utf8();
                return Ok(Some(ch));
            }
            if self.finished {
                return Ok(None);
            }
            self.refill()?;
        }
    }
}

/// Encodes characters as UTF-8 onto a byte writer.
pub struct Utf8Writer<W> {
    inner: W,
}

impl<W: Write> Utf8Writer<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> CharSink for Utf8Writer<W> {
    fn write_char(&mut self, ch: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.inner.write_all(ch.encode_utf8(&mut buf).as_bytes())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.inner.write_all(s.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> String {
        let mut reader = Utf8Reader::new(bytes);
        let mut out = String::new();
        while let Some(ch) = reader.next_char().unwrap() {
            out.push(ch);
        }
        out
    }

    #[test]
    fn decodes_multibyte_text() {
        let text = "héllo wörld € 𝄞";
        assert_eq!(decode(text.as_bytes()), text);
    }

    #[test]
    fn decodes_across_tiny_buffers() {
        let text = "日本語テキスト";
        let reader = io::BufReader::with_capacity(1, text.as_bytes());
        let mut reader = Utf8Reader::new(reader);
        let mut out = String::new();
        while let Some(ch) = reader.next_char().unwrap() {
            out.push(ch);
        }
        assert_eq!(out, text);
    }

    #[test]
    fn invalid_bytes_become_replacement_characters() {
        assert_eq!(decode(b"a\xFFb"), "a\u{FFFD}b");
        // Truncated two-byte sequence followed by ASCII keeps the ASCII.
        assert_eq!(decode(b"\xC3x"), "\u{FFFD}x");
        // Overlong encoding of '/': every byte is an invalid subpart.
        assert_eq!(decode(b"\xE0\x80\xAF"), "\u{FFFD}\u{FFFD}\u{FFFD}");
        // Truncated at end of input.
        assert_eq!(decode(b"ok\xE2\x82"), "ok\u{FFFD}");
    }

    #[test]
    fn empty_input_is_immediately_exhausted() {
        let mut reader = Utf8Reader::new(&b""[..]);
        assert_eq!(reader.next_char().unwrap(), None);
    }

    #[test]
    fn writer_encodes_utf8() {
        let mut writer = Utf8Writer::new(Vec::new());
        writer.write_char('é').unwrap();
        writer.write_str(" ok €").unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), "é ok €".as_bytes());
    }

    #[test]
    fn string_sink_appends() {
        let mut out = String::from(">");
        out.write_char('a').unwrap();
        CharSink::write_str(&mut out, "bc").unwrap();
        assert_eq!(out, ">abc");
    }
}
