//! The tag grammar read from member annotations.
//!
//! Under the configured keyword a tag spec is `"-"` | `""` | `name` |
//! `name,opt,...` | `,opt,...`. Options are matched ASCII-case-insensitively;
//! unrecognized options are ignored so that specs written for newer versions
//! still parse. Parsing cannot fail.

// -----------------------------------------------------------------------------
// TagSpec

/// A parsed tag spec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TagSpec<'a> {
    /// The output name override, if the spec names one.
    pub name: Option<&'a str>,
    /// `"-"`: the member is dropped unconditionally.
    pub ignored: bool,
    /// `omitZero`: drop the member when its value equals its type's zero.
    pub omit_zero: bool,
    /// `omitNil`: drop the member when it is a nil reference.
    pub omit_nil: bool,
    /// `value`: emit the member as-is, without conversion.
    pub literal: bool,
}

/// Parses a raw tag spec.
pub(crate) fn parse_tag(spec: &str) -> TagSpec<'_> {
    let mut parts = spec.split(',');

    // The split of a non-empty pattern always yields at least one part.
    let name = parts.next().unwrap_or_default();
    if name == "-" {
        return TagSpec {
            ignored: true,
            ..TagSpec::default()
        };
    }

    let mut tag = TagSpec {
        name: (!name.is_empty()).then_some(name),
        ..TagSpec::default()
    };
    for option in parts {
        if option.eq_ignore_ascii_case("omitZero") {
            tag.omit_zero = true;
        } else if option.eq_ignore_ascii_case("omitNil") {
            tag.omit_nil = true;
        } else if option.eq_ignore_ascii_case("value") {
            tag.literal = true;
        }
        // Unrecognized options are ignored.
    }
    tag
}

// -----------------------------------------------------------------------------
// Tests
