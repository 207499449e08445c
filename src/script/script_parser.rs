//! Grammar of a single script line.
//!
//! A line starting with .save, .end or .print (after any indentation) is a command, its
//! argument is the rest of the line trimmed. .save and .print must name a file, without one
//! the line is rejected. Every other line, blank ones included, is data and is kept exactly
//! as written.
use crate::tasks::Command;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{multispace0, multispace1};
use nom::combinator::{eof, map, rest};
use nom::error::{convert_error, ContextError, ErrorKind, ParseError, VerboseError};
use nom::sequence::{preceded, tuple};
use nom::{Finish, IResult};
use thiserror::Error;

pub struct ScriptParser {}

impl ScriptParser {
    pub fn parse(input: &str) -> Result<Command, ScriptError> {
        match ScriptParser::nom_parse::<VerboseError<&str>>(input).finish() {
            Ok((_, cmd)) => Ok(cmd),
            Err(e) => Err(ScriptError::ParseError(convert_error(input, e))),
        }
    }

    fn nom_parse<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
        input: &'a str,
    ) -> IResult<&'a str, Command, E> {
        alt((parse_save, parse_end, parse_print, parse_data))(input)
    }
}

fn parse_save<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Command, E> {
    let (input, name) = parse_file_name(".save", input)?;
    Ok((input, Command::BeginFile(name.to_string())))
}

fn parse_end<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Command, E> {
    let (input, _) = parse_keyword(".end", input)?;
    Ok((input, Command::EndFile))
}

fn parse_print<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Command, E> {
    let (input, name) = parse_file_name(".print", input)?;
    Ok((input, Command::PrintFile(name.to_string())))
}

fn parse_data<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Command, E> {
    map(rest, |line: &str| Command::DataLine(line.to_string()))(input)
}

// Failure, not Error, so alt does not go on to read the line as data
fn parse_file_name<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    keyword: &'static str,
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    let (remaining, name) = parse_keyword(keyword, input)?;
    if name.is_empty() {
        let e = E::from_error_kind(remaining, ErrorKind::Verify);
        return Err(nom::Err::Failure(E::add_context(remaining, "file name", e)));
    }
    Ok((remaining, name))
}

// The keyword has to stand alone, ".saved" is data not a save
fn parse_keyword<'a, E: ParseError<&'a str> + ContextError<&'a str>>(
    keyword: &'static str,
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    let (input, _) = tuple((multispace0, tag(keyword)))(input)?;
    let (input, argument) = alt((eof, preceded(multispace1, rest)))(input)?;
    Ok((input, argument.trim()))
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("Unable to open script {0}: {1}")]
    OpenError(String, std::io::Error),
    #[error("Script line is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("Script Parse Error {0}")]
    ParseError(String),
}
