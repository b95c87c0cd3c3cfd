use super::message_builder::{MessageBuilder, HEADER_LEN};
use std::fmt;
use std::net::SocketAddr;

const QR_BIT: u8 = 0x80;
/// QTYPE and QCLASS trail the name in a question entry.
const QUESTION_TRAILER_LEN: usize = 4;

/// Why a datagram was not accepted as the answer to an outstanding query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMismatch {
    ForeignSource(SocketAddr),
    TooShort(usize),
    IdMismatch { expected: u16, received: u16 },
    NotAResponse,
    QuestionCount(u16),
    QuestionMismatch,
}

impl fmt::Display for ResponseMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignSource(from) => write!(f, "datagram from foreign source {}", from),
            Self::TooShort(len) => write!(f, "message too short ({} bytes)", len),
            Self::IdMismatch { expected, received } => {
                write!(f, "id {} does not match query id {}", received, expected)
            }
            Self::NotAResponse => write!(f, "QR bit not set"),
            Self::QuestionCount(n) => write!(f, "expected one question, got {}", n),
            Self::QuestionMismatch => write!(f, "question section differs from query"),
        }
    }
}

/// Header-level acceptance check run before a reply is decoded.
///
/// Works directly on the wire bytes so that spoofed or stale datagrams are
/// rejected without a full parse.
pub struct ResponseMatcher<'a> {
    server: SocketAddr,
    id: u16,
    question: &'a [u8],
}

impl<'a> ResponseMatcher<'a> {
    pub fn new(server: SocketAddr, query: &'a [u8]) -> Self {
        let id = match query {
            [hi, lo, ..] => u16::from_be_bytes([*hi, *lo]),
            _ => 0,
        };
        Self {
            server,
            id,
            question: MessageBuilder::question_section(query),
        }
    }

    pub fn check(&self, from: SocketAddr, response: &[u8]) -> Result<(), ResponseMismatch> {
        if from != self.server {
            return Err(ResponseMismatch::ForeignSource(from));
        }
        self.check_message(response)
    }

    /// Same as [`ResponseMatcher::check`] for transports without a source
    /// address, such as a connected TCP stream.
    pub fn check_message(&self, response: &[u8]) -> Result<(), ResponseMismatch> {
        if response.len() < HEADER_LEN {
            return Err(ResponseMismatch::TooShort(response.len()));
        }

        let received = u16::from_be_bytes([response[0], response[1]]);
        if received != self.id {
            return Err(ResponseMismatch::IdMismatch {
                expected: self.id,
                received,
            });
        }

        if response[2] & QR_BIT == 0 {
            return Err(ResponseMismatch::NotAResponse);
        }

        let qdcount = u16::from_be_bytes([response[4], response[5]]);
        if qdcount != 1 {
            return Err(ResponseMismatch::QuestionCount(qdcount));
        }

        let end = HEADER_LEN + self.question.len();
        let Some(question) = response.get(HEADER_LEN..end) else {
            return Err(ResponseMismatch::TooShort(response.len()));
        };

        // Names compare case-insensitively; type and class must be exact.
        let name_len = self.question.len().saturating_sub(QUESTION_TRAILER_LEN);
        let (name, trailer) = question.split_at(name_len);
        let (expected_name, expected_trailer) = self.question.split_at(name_len);
        if !name.eq_ignore_ascii_case(expected_name) || trailer != expected_trailer {
            return Err(ResponseMismatch::QuestionMismatch);
        }

        Ok(())
    }
}
