use std::fmt;

/// One step of a user's script, already decoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// .save <name>
    BeginFile(String),
    /// Any line that is not a command, stored as one sector
    DataLine(String),
    /// .end
    EndFile,
    /// .print <name>
    PrintFile(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::BeginFile(name) => write!(f, ".save {}", name),
            Command::DataLine(line) => write!(f, "{}", line),
            Command::EndFile => write!(f, ".end"),
            Command::PrintFile(name) => write!(f, ".print {}", name),
        }
    }
}
