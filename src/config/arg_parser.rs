//! Parses the positional resource counts, each written as a dash followed by a number.
//! Anything after the third argument is ignored.
use super::ConfigError;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_res};
use nom::error::{convert_error, ContextError, FromExternalError, ParseError, VerboseError};
use nom::sequence::preceded;
use nom::{Finish, IResult};
use std::num::ParseIntError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResourceCounts {
    pub users: usize,
    pub disks: usize,
    pub printers: usize,
}

pub struct ArgParser {}

impl ArgParser {
    pub fn parse<I, S>(args: I) -> Result<ResourceCounts, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let mut next_count = |name: &'static str| match args.next() {
            Some(arg) => Self::parse_count(arg.as_ref()),
            None => Err(ConfigError::MissingArgument(name)),
        };

        let users = next_count("users")?;
        let disks = next_count("disks")?;
        let printers = next_count("printers")?;

        Ok(ResourceCounts {
            users,
            disks,
            printers,
        })
    }

    fn parse_count(input: &str) -> Result<usize, ConfigError> {
        match all_consuming(Self::nom_parse::<VerboseError<&str>>)(input).finish() {
            Ok((_, count)) => Ok(count),
            Err(e) => Err(ConfigError::ParseError(convert_error(input, e))),
        }
    }

    fn nom_parse<'a, E>(input: &'a str) -> IResult<&'a str, usize, E>
    where
        E: ParseError<&'a str> + ContextError<&'a str> + FromExternalError<&'a str, ParseIntError>,
    {
        preceded(char('-'), map_res(digit1, |d: &str| d.parse::<usize>()))(input)
    }
}
