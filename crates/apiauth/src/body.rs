//! Request bodies that can be hashed without being consumed.
//!
//! Computing `Content-Md5` requires the full body, but the request still has to
//! be sent (client side) or handed to application code (server side) afterwards.
//! [`SignableBody::payload`] therefore returns the complete payload while
//! leaving the body readable with the exact same bytes.
//!
//! In-memory bodies (`Bytes`, `Vec<u8>`, `String`) satisfy this trivially. A
//! streaming reader can be wrapped in [`BufferedBody`], which drains it once and
//! replays the buffered bytes from then on.

use std::fmt;
use std::io::{self, Cursor, Read};

use bytes::Bytes;

/// A request body whose payload can be read without destroying it.
pub trait SignableBody {
    /// Return the complete payload, leaving the body readable afterwards.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the body cannot be read.
    fn payload(&mut self) -> io::Result<Bytes>;
}

impl SignableBody for () {
    fn payload(&mut self) -> io::Result<Bytes> {
        Ok(Bytes::new())
    }
}

impl SignableBody for Bytes {
    fn payload(&mut self) -> io::Result<Bytes> {
        Ok(self.clone())
    }
}

impl SignableBody for Vec<u8> {
    fn payload(&mut self) -> io::Result<Bytes> {
        Ok(Bytes::copy_from_slice(self))
    }
}

impl SignableBody for String {
    fn payload(&mut self) -> io::Result<Bytes> {
        Ok(Bytes::copy_from_slice(self.as_bytes()))
    }
}

impl<B: SignableBody> SignableBody for Option<B> {
    fn payload(&mut self) -> io::Result<Bytes> {
        match self {
            Some(body) => body.payload(),
            None => Ok(Bytes::new()),
        }
    }
}

/// A reader-backed body that is drained on first use and replayed afterwards.
///
/// # Examples
///
/// ```
/// use std::io::Read;
///
/// use apiauth::body::{BufferedBody, SignableBody};
///
/// let mut body = BufferedBody::new(&b"hello"[..]);
/// assert_eq!(body.payload().unwrap(), "hello");
///
/// let mut sent = String::new();
/// body.read_to_string(&mut sent).unwrap();
/// assert_eq!(sent, "hello");
/// ```
pub struct BufferedBody<R> {
    state: State<R>,
}

enum State<R> {
    Unread(R),
    Buffered(Cursor<Bytes>),
}

impl<R: Read> BufferedBody<R> {
    /// Wrap a reader. Nothing is read until [`SignableBody::payload`] is called.
    pub fn new(reader: R) -> Self {
        Self {
            state: State::Unread(reader),
        }
    }

    /// Whether the underlying reader has already been drained into memory.
    #[must_use]
    pub fn is_buffered(&self) -> bool {
        matches!(self.state, State::Buffered(_))
    }
}

impl<R: Read> SignableBody for BufferedBody<R> {
    fn payload(&mut self) -> io::Result<Bytes> {
        let bytes = match &mut self.state {
            State::Buffered(cursor) => cursor.get_ref().clone(),
            State::Unread(reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Bytes::from(buf)
            }
        };
        // Rewind so the full payload is readable again.
        self.state = State::Buffered(Cursor::new(bytes.clone()));
        Ok(bytes)
    }
}

impl<R: Read> Read for BufferedBody<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.state {
            State::Unread(reader) => reader.read(buf),
            State::Buffered(cursor) => cursor.read(buf),
        }
    }
}

impl<R> fmt::Debug for BufferedBody<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("BufferedBody");
        match &self.state {
            State::Unread(_) => s.field("state", &"unread"),
            State::Buffered(cursor) => s.field("buffered_len", &cursor.get_ref().len()),
        };
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
        }
    }

    #[test]
    fn test_should_return_empty_payload_for_unit_body() {
        assert!(().payload().unwrap().is_empty());
        assert!(None::<Bytes>.payload().unwrap().is_empty());
    }

    #[test]
    fn test_should_keep_in_memory_bodies_intact() {
        let mut body = b"{\"a\":1}".to_vec();
        assert_eq!(body.payload().unwrap(), &b"{\"a\":1}"[..]);
        assert_eq!(body, b"{\"a\":1}");

        let mut text = "plain".to_owned();
        assert_eq!(text.payload().unwrap(), "plain");
        assert_eq!(text, "plain");
    }

    #[test]
    fn test_should_replay_buffered_reader_after_payload() {
        let mut body = BufferedBody::new(&b"payload bytes"[..]);
        assert!(!body.is_buffered());

        assert_eq!(body.payload().unwrap(), "payload bytes");
        assert!(body.is_buffered());

        // A second call sees the same bytes, not an exhausted reader.
        assert_eq!(body.payload().unwrap(), "payload bytes");

        let mut replayed = Vec::new();
        body.read_to_end(&mut replayed).unwrap();
        assert_eq!(replayed, b"payload bytes");
    }

    #[test]
    fn test_should_rewind_partially_read_buffer() {
        let mut body = BufferedBody::new(&b"abcdef"[..]);
        body.payload().unwrap();

        let mut head = [0u8; 3];
        body.read_exact(&mut head).unwrap();
        assert_eq!(&head, b"abc");

        assert_eq!(body.payload().unwrap(), "abcdef");
        let mut rest = Vec::new();
        body.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"abcdef");
    }

    #[test]
    fn test_should_surface_reader_failure() {
        let mut body = BufferedBody::new(FailingReader);
        let err = body.payload().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert!(!body.is_buffered());
    }
}
