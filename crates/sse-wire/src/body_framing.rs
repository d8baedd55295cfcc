use thiserror::Error;

/// How the HTTP response body is delimited. Picked once from the response
/// headers and never changed for the life of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    Chunked,
    ContentLength(u64),
    UntilClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedPhase {
    SizeLine,
    Data { remaining: u64 },
    DataTerminator,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    #[error("invalid chunk size line: {0:?}")]
    InvalidChunkSize(String),
    #[error("invalid chunk terminator")]
    InvalidChunkTerminator,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FramingProgress {
    pub payload: Vec<u8>,
    pub body_complete: bool,
}

/// Strips HTTP body framing from raw post-header bytes, yielding the logical
/// payload. Insufficient input is never an error: the decoder pauses where
/// it stands (mid chunk-size line, mid chunk data, before a terminator) and
/// resumes on the next call without losing count.
#[derive(Debug)]
pub struct BodyFramingDecoder {
    framing: BodyFraming,
    chunked_phase: ChunkedPhase,
    bytes_forwarded: u64,
    complete: bool,
}

impl BodyFramingDecoder {
    pub fn new(framing: BodyFraming) -> Self {
        Self {
            framing,
            chunked_phase: ChunkedPhase::SizeLine,
            bytes_forwarded: 0,
            complete: matches!(framing, BodyFraming::ContentLength(0)),
        }
    }

    pub fn framing(&self) -> BodyFraming {
        self.framing
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Drains as much of `buf` as the current framing allows. Bytes that
    /// cannot be interpreted yet, or that lie past the end of the body, are
    /// left in `buf` untouched.
    pub fn decode(&mut self, buf: &mut Vec<u8>) -> Result<FramingProgress, FramingError> {
        match self.framing {
            BodyFraming::Chunked => self.decode_chunked(buf),
            BodyFraming::ContentLength(length) => Ok(self.decode_exact(buf, length)),
            BodyFraming::UntilClose => Ok(FramingProgress {
                payload: std::mem::take(buf),
                body_complete: false,
            }),
        }
    }

    fn decode_exact(&mut self, buf: &mut Vec<u8>, length: u64) -> FramingProgress {
        if self.complete {
            return FramingProgress {
                payload: Vec::new(),
                body_complete: true,
            };
        }
        let remaining = (length - self.bytes_forwarded) as usize;
        let take = std::cmp::min(remaining, buf.len());
        let payload = buf.drain(..take).collect::<Vec<_>>();
        self.bytes_forwarded += take as u64;
        if self.bytes_forwarded >= length {
            self.complete = true;
        }
        FramingProgress {
            payload,
            body_complete: self.complete,
        }
    }

    fn decode_chunked(&mut self, buf: &mut Vec<u8>) -> Result<FramingProgress, FramingError> {
        let mut payload = Vec::new();
        while !self.complete {
            match self.chunked_phase {
                ChunkedPhase::SizeLine => {
                    let Some(line) = take_line(buf) else {
                        break;
                    };
                    let size = parse_chunk_size(&line)?;
                    if size == 0 {
                        // Terminal chunk. Its trailing blank line may not
                        // have arrived yet; the body is complete either way.
                        take_line(buf);
                        self.complete = true;
                        break;
                    }
                    self.chunked_phase = ChunkedPhase::Data { remaining: size };
                }
                ChunkedPhase::Data { remaining } => {
                    let take = std::cmp::min(remaining as usize, buf.len());
                    if take == 0 {
                        break;
                    }
                    payload.extend(buf.drain(..take));
                    let left = remaining - take as u64;
                    if left > 0 {
                        self.chunked_phase = ChunkedPhase::Data { remaining: left };
                        break;
                    }
                    self.chunked_phase = ChunkedPhase::DataTerminator;
                }
                ChunkedPhase::DataTerminator => {
                    if buf.len() < 2 {
                        break;
                    }
                    let terminator = buf.drain(..2).collect::<Vec<_>>();
                    if terminator.as_slice() != b"\r\n" {
                        return Err(FramingError::InvalidChunkTerminator);
                    }
                    self.chunked_phase = ChunkedPhase::SizeLine;
                }
            }
        }
        Ok(FramingProgress {
            payload,
            body_complete: self.complete,
        })
    }
}

/// Removes one `\n`-terminated line from the front of `buf`, stripping a
/// trailing `\r`. Returns `None` when no terminator is buffered yet.
pub(crate) fn take_line(buf: &mut Vec<u8>) -> Option<Vec<u8>> {
    let newline = buf.iter().position(|byte| *byte == b'\n')?;
    let mut line = buf.drain(..=newline).collect::<Vec<_>>();
    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Some(line)
}

fn parse_chunk_size(line: &[u8]) -> Result<u64, FramingError> {
    let text = std::str::from_utf8(line)
        .map_err(|_| FramingError::InvalidChunkSize(String::from_utf8_lossy(line).into_owned()))?;
    let size_text = text.trim().split(';').next().unwrap_or(text).trim();
    u64::from_str_radix(size_text, 16)
        .map_err(|_| FramingError::InvalidChunkSize(size_text.to_string()))
}
