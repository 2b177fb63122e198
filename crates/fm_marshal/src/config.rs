use std::borrow::Cow;

// -----------------------------------------------------------------------------
// MarshalConfig

/// Options for one marshalling invocation.
///
/// The configuration is immutable and threaded unchanged through the whole
/// walk, so tag lookup stays consistent across the value graph.
///
/// # Examples
///
/// ```
/// use fm_marshal::MarshalConfig;
///
/// let config = MarshalConfig::new();
/// assert_eq!(config.tag_keyword(), "map");
///
/// let config = MarshalConfig::with_tag_keyword("map_key");
/// assert_eq!(config.tag_keyword(), "map_key");
/// ```
#[derive(Clone, Debug)]
pub struct MarshalConfig {
    tag_keyword: Cow<'static, str>,
}

impl MarshalConfig {
    /// The tag keyword used when none is configured.
    pub const DEFAULT_TAG_KEYWORD: &'static str = "map";

    /// Creates the default configuration.
    #[inline]
    pub const fn new() -> Self {
        Self {
            tag_keyword: Cow::Borrowed(Self::DEFAULT_TAG_KEYWORD),
        }
    }

    /// Creates a configuration reading tags under the given keyword.
    #[inline]
    pub fn with_tag_keyword(keyword: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tag_keyword: keyword.into(),
        }
    }

    /// Returns the tag keyword member annotations are read under.
    #[inline]
    pub fn tag_keyword(&self) -> &str {
        &self.tag_keyword
    }
}

impl Default for MarshalConfig {
    /// See [`MarshalConfig::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
