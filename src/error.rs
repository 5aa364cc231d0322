use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Rejected before layout begins: no records, no names, bad start position.
    Input(String),
    /// Font could not be located, downloaded or parsed.
    Font(String),
    Csv(String),
    Mapping(String),
    Pdf(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Input(msg) => write!(f, "Invalid input: {msg}"),
            Error::Font(msg) => write!(f, "Font error: {msg}"),
            Error::Csv(msg) => write!(f, "CSV error: {msg}"),
            Error::Mapping(msg) => write!(f, "Invalid field mapping: {msg}"),
            Error::Pdf(msg) => write!(f, "PDF error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e.to_string())
    }
}
