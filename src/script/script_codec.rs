//! Implementation hints from here: https://docs.rs/tokio-util/0.6.6/tokio_util/codec/index.html
//!
//! Splits a script on newlines (a trailing \r is dropped) and parses each line into a Command.
//! The last line does not need a newline.
use super::{ScriptError, ScriptParser};
use crate::tasks::Command;
use bytes::BytesMut;
use tokio_util::codec::Decoder;

#[derive(Debug, Default)]
pub struct ScriptCodec {
    //How far into the buffer we already know there is no newline
    next_index: usize,
}

impl ScriptCodec {
    pub fn new() -> ScriptCodec {
        ScriptCodec { next_index: 0 }
    }

    fn parse_line(raw: &[u8]) -> Result<Command, ScriptError> {
        let raw = match raw.last() {
            Some(b'\r') => &raw[..raw.len() - 1],
            _ => raw,
        };
        let line = std::str::from_utf8(raw)?;
        ScriptParser::parse(line)
    }
}

impl Decoder for ScriptCodec {
    type Item = Command;
    type Error = ScriptError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let newline = src[self.next_index..].iter().position(|b| *b == b'\n');
        match newline {
            Some(offset) => {
                let line_end = self.next_index + offset;
                self.next_index = 0;
                let line = src.split_to(line_end + 1);
                Ok(Some(Self::parse_line(&line[..line_end])?))
            }
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(cmd) = self.decode(src)? {
            return Ok(Some(cmd));
        }
        if src.is_empty() {
            return Ok(None);
        }

        self.next_index = 0;
        let line = src.split_to(src.len());
        Ok(Some(Self::parse_line(&line)?))
    }
}
