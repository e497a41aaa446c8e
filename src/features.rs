/// Capabilities a concrete format advertises to its callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatFeatures {
    is_contextful: bool,
    can_count_collection_items: bool,
    can_specify_string_encoding: bool,
    supports_extension_types: bool,
}

impl FormatFeatures {
    /// A descriptor with every capability off.
    pub const NONE: Self = Self {
        is_contextful: false,
        can_count_collection_items: false,
        can_specify_string_encoding: false,
        supports_extension_types: false,
    };

    /// Construct a descriptor from its four flags.
    #[must_use]
    pub const fn new(
        is_contextful: bool,
        can_count_collection_items: bool,
        can_specify_string_encoding: bool,
        supports_extension_types: bool,
    ) -> Self {
        Self {
            is_contextful,
            can_count_collection_items,
            can_specify_string_encoding,
            supports_extension_types,
        }
    }

    /// Start a builder with every capability off.
    #[must_use]
    pub const fn builder() -> FormatFeaturesBuilder {
        FormatFeaturesBuilder::new()
    }

    /// Decoding an item depends on state carried from earlier items.
    #[inline]
    #[must_use]
    pub const fn is_contextful(&self) -> bool {
        self.is_contextful
    }

    /// Collection headers carry an element count.
    #[inline]
    #[must_use]
    pub const fn can_count_collection_items(&self) -> bool {
        self.can_count_collection_items
    }

    /// Strings may be written in a caller-chosen text encoding.
    #[inline]
    #[must_use]
    pub const fn can_specify_string_encoding(&self) -> bool {
        self.can_specify_string_encoding
    }

    /// The format has extension-type objects.
    #[inline]
    #[must_use]
    pub const fn supports_extension_types(&self) -> bool {
        self.supports_extension_types
    }
}

/// Builder for [`FormatFeatures`].
///
/// Setters return `&mut Self` for chaining; `reset_*` restores the default (`false`).
#[derive(Debug, Clone, Default)]
pub struct FormatFeaturesBuilder {
    features: FormatFeatures,
}

impl FormatFeaturesBuilder {
    /// A builder with every capability off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            features: FormatFeatures::NONE,
        }
    }

    /// Start from an existing descriptor.
    #[must_use]
    pub const fn from_features(features: FormatFeatures) -> Self {
        Self { features }
    }

    /// Set whether decoding is contextful.
    pub fn is_contextful(&mut self, value: bool) -> &mut Self {
        self.features.is_contextful = value;
        self
    }

    /// Restore the default for `is_contextful`.
    pub fn reset_is_contextful(&mut self) -> &mut Self {
        self.is_contextful(false)
    }

    /// Set whether collection headers carry counts.
    pub fn can_count_collection_items(&mut self, value: bool) -> &mut Self {
        self.features.can_count_collection_items = value;
        self
    }

    /// Restore the default for `can_count_collection_items`.
    pub fn reset_can_count_collection_items(&mut self) -> &mut Self {
        self.can_count_collection_items(false)
    }

    /// Set whether the string encoding is pluggable.
    pub fn can_specify_string_encoding(&mut self, value: bool) -> &mut Self {
        self.features.can_specify_string_encoding = value;
        self
    }

    /// Restore the default for `can_specify_string_encoding`.
    pub fn reset_can_specify_string_encoding(&mut self) -> &mut Self {
        self.can_specify_string_encoding(false)
    }

    /// Set whether extension types are supported.
    pub fn supports_extension_types(&mut self, value: bool) -> &mut Self {
        self.features.supports_extension_types = value;
        self
    }

    /// Restore the default for `supports_extension_types`.
    pub fn reset_supports_extension_types(&mut self) -> &mut Self {
        self.supports_extension_types(false)
    }

    /// Snapshot the configured capabilities.
    #[must_use]
    pub const fn build(&self) -> FormatFeatures {
        self.features
    }
}
