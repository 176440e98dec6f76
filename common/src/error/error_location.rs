use std::fmt;
use std::panic::Location;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Source position where an error value was constructed.
///
/// Captured with `#[track_caller]` + [`Location::caller`], so the position is
/// the call site of the constructor, not the constructor itself.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ErrorLocation(&'static Location<'static>);

impl ErrorLocation {
    pub const fn from(location: &'static Location<'static>) -> Self {
        Self(location)
    }

    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    pub fn line(&self) -> u32 {
        self.0.line()
    }

    pub fn column(&self) -> u32 {
        self.0.column()
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}:{}]", self.file(), self.line(), self.column())
    }
}

impl fmt::Debug for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorLocation{self}")
    }
}

// Same shape as a derived struct: `{ "file", "line", "column" }`.
impl Serialize for ErrorLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ErrorLocation", 3)?;
        state.serialize_field("file", self.file())?;
        state.serialize_field("line", &self.line())?;
        state.serialize_field("column", &self.column())?;
        state.end()
    }
}
