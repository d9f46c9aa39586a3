use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Error as IoError;
use std::result::Result as StdResult;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub enum ErrorKind {
    IoError = 1,
    MalformedData = 2,
    InconsistentState = 3,
    UnsupportedFeature = 4,
    InvalidTarget = 5,
    NoShots = 6,
    NoVisibleVertices = 7,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub description: String,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind, description: String) -> Self {
        Self {
            kind,
            description,
            source: None,
        }
    }

    pub fn with_source<E: StdError + Send + Sync + 'static>(
        kind: ErrorKind,
        description: String,
        source: E,
    ) -> Self {
        Self {
            kind,
            description,
            source: Some(Box::new(source)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(source) = &self.source {
            write!(f, "{}: {}", self.description, source)
        } else {
            write!(f, "{}", self.description)
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Self {
        Error::with_source(ErrorKind::IoError, "i/o failure".to_string(), err)
    }
}

pub type Result<T> = StdResult<T, Error>;

pub trait IntoResult<T> {
    fn into_result<F: FnOnce() -> String>(self, desc: F) -> Result<T>;

    fn res<F: FnOnce() -> String>(self, desc: F) -> Result<T>
    where
        Self: Sized,
    {
        self.into_result(desc)
    }
}

impl<T, E: StdError + Send + Sync + 'static> IntoResult<T> for StdResult<T, E> {
    fn into_result<F: FnOnce() -> String>(self, desc: F) -> Result<T> {
        self.map_err(|err| {
            let dyn_err = &err as &(dyn StdError + 'static);
            let kind = if dyn_err.is::<IoError>() {
                ErrorKind::IoError
            } else {
                ErrorKind::MalformedData
            };
            Error::with_source(kind, desc(), err)
        })
    }
}
