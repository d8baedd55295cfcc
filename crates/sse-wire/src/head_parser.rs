use crate::body_framing::BodyFraming;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    Http10,
    Http11,
}

impl HttpVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http10 => "HTTP/1.0",
            Self::Http11 => "HTTP/1.1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// The parsed response status line and header block. Header names are
/// lower-cased at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub version: HttpVersion,
    pub status_code: u16,
    pub reason_phrase: String,
    pub headers: Vec<Header>,
}

impl ResponseHead {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }

    /// Selects the body framing once, at the header/body transition: a
    /// chunked transfer-encoding wins, then an explicit content-length,
    /// otherwise the body runs until the connection closes.
    pub fn framing_mode(&self) -> BodyFraming {
        let chunked = self
            .header("transfer-encoding")
            .map(|value| value.trim().eq_ignore_ascii_case("chunked"))
            .unwrap_or(false);
        if chunked {
            return BodyFraming::Chunked;
        }
        if let Some(length) = self
            .header("content-length")
            .and_then(|value| value.trim().parse::<u64>().ok())
        {
            return BodyFraming::ContentLength(length);
        }
        BodyFraming::UntilClose
    }
}

/// Status line: two whitespace-delimited tokens minimum, where the version
/// token must end in a recognizable HTTP/1.x digit and the status token must
/// parse as an integer. Anything else is a hard parse failure.
pub(crate) fn parse_status_line(line: &str) -> Option<(HttpVersion, u16, String)> {
    let mut parts = line.split_whitespace();
    let version_text = parts.next()?;
    let status_text = parts.next()?;
    let version = match version_text.as_bytes().last()? {
        b'1' => HttpVersion::Http11,
        b'0' => HttpVersion::Http10,
        _ => return None,
    };
    let status_code = status_text.parse::<u16>().ok()?;
    let reason_phrase = parts.collect::<Vec<_>>().join(" ");
    Some((version, status_code, reason_phrase))
}

/// Header line: split at the first colon, name lower-cased, one leading
/// space stripped from the value. Colon-less lines yield `None` and are
/// skipped by the caller.
pub(crate) fn parse_header_line(line: &str) -> Option<Header> {
    let (name, value) = line.split_once(':')?;
    let value = value.strip_prefix(' ').unwrap_or(value);
    Some(Header {
        name: name.to_ascii_lowercase(),
        value: value.to_string(),
    })
}
