use thiserror::Error;

use sse_wire::ParseError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol parse error: {0}")]
    Parse(#[from] ParseError),
}
