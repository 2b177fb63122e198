use std::borrow::Cow;
use std::{error, fmt};

// -----------------------------------------------------------------------------
// MarshalError

/// An enumeration of all error outcomes that might happen while marshalling a
/// value into a [`Document`](crate::Document).
///
/// The first error encountered aborts the whole conversion; no partial output
/// is ever returned.
#[derive(Debug)]
pub enum MarshalError {
    /// The top-level value (after unwrapping references) is not a struct.
    NotAStruct { type_name: Cow<'static, str> },
    /// The top-level value (after unwrapping references) is not a sequence.
    NotASeq { type_name: Cow<'static, str> },
    /// A nil reference was found where a concrete value is required.
    NilValue,
    /// A `value`-tagged field cannot be emitted as-is.
    ///
    /// Structs opt into as-is emission with the `#[map(clone)]` flag.
    LiteralUnsupported { type_name: Cow<'static, str> },
    /// Embedded-member resolution recursed past the supported depth.
    EmbedDepthExceeded {
        type_name: Cow<'static, str>,
        limit: usize,
    },
    /// Reference unwrapping did not reach a concrete value within the
    /// supported depth.
    RefDepthExceeded { limit: usize },
    /// An error reported by a [`Marshaler`](crate::Marshaler) implementation.
    Custom(Cow<'static, str>),
    /// A child error, attributed to the field path where it occurred.
    Field {
        path: String,
        source: Box<MarshalError>,
    },
}

impl MarshalError {
    /// Creates an error from an arbitrary message.
    ///
    /// This is the intended error constructor for [`Marshaler`] implementors.
    ///
    /// # Examples
    ///
    /// ```
    /// use fm_marshal::MarshalError;
    ///
    /// let err = MarshalError::custom("geometry has no coordinates");
    /// assert_eq!(err.to_string(), "geometry has no coordinates");
    /// ```
    ///
    /// [`Marshaler`]: crate::Marshaler
    #[inline]
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Custom(message.into())
    }

    /// Wraps this error with the name of the field it occurred in.
    ///
    /// Nested wrapping accumulates a dotted path, e.g. `outer.inner[2].field`.
    pub(crate) fn into_field(self, name: &str) -> Self {
        self.into_segment(name)
    }

    /// Wraps this error with the sequence index it occurred at.
    pub(crate) fn into_index(self, index: usize) -> Self {
        self.into_segment(&format!("[{index}]"))
    }

    fn into_segment(self, segment: &str) -> Self {
        match self {
            Self::Field { path, source } => Self::Field {
                path: join_path(segment, &path),
                source,
            },
            other => Self::Field {
                path: segment.to_owned(),
                source: Box::new(other),
            },
        }
    }
}

// Index segments attach without a separating dot: `items[2].field`.
fn join_path(segment: &str, rest: &str) -> String {
    if rest.starts_with('[') {
        format!("{segment}{rest}")
    } else {
        format!("{segment}.{rest}")
    }
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAStruct { type_name } => {
                write!(f, "cannot marshal `{type_name}`: not a struct value")
            }
            Self::NotASeq { type_name } => {
                write!(f, "cannot marshal `{type_name}`: not a sequence value")
            }
            Self::NilValue => {
                write!(f, "cannot marshal a nil reference")
            }
            Self::LiteralUnsupported { type_name } => {
                write!(f, "type `{type_name}` cannot be emitted as a literal value")
            }
            Self::EmbedDepthExceeded { type_name, limit } => {
                write!(
                    f,
                    "embedded members of `{type_name}` nest deeper than {limit} levels"
                )
            }
            Self::RefDepthExceeded { limit } => {
                write!(f, "value is nested behind more than {limit} references")
            }
            Self::Custom(message) => f.write_str(message),
            Self::Field { path, source } => {
                write!(f, "field `{path}`: {source}")
            }
        }
    }
}

impl error::Error for MarshalError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Field { source, .. } => Some(source),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::MarshalError;

    #[test]
    fn field_paths_accumulate_outside_in() {
        let err = MarshalError::custom("boom")
            .into_field("inner")
            .into_index(2)
            .into_field("outer");

        assert_eq!(err.to_string(), "field `outer[2].inner`: boom");
    }

    #[test]
    fn source_chain_reaches_the_original_error() {
        let err = MarshalError::custom("boom").into_field("field");
        let source = std::error::Error::source(&err).expect("wrapped source");
        assert_eq!(source.to_string(), "boom");
    }
}
