//! Closed string vocabularies used throughout the model.
//!
//! Every enum here has a fixed string representation that is shared with
//! previously persisted results. Conversions go through [`as_str`] and
//! [`std::str::FromStr`]; there is no implicit coercion from strings.
//!
//! [`as_str`]: ImageBuilderOptions::as_str

/// Declares a `Copy` enum backed by fixed string values.
///
/// Generates `ALL` (declaration order), `as_str`, `Display` and `FromStr`.
/// Serde names are declared on the variants so the wire form matches `as_str`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant, )+
        }

        impl $name {
            /// All members in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The persisted string value.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err($crate::error::ValidationError::InvalidEnumValue {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use string_enum;

string_enum! {
    /// Image builders, in the order they are attempted.
    ///
    /// `Fallback` is the last resort and only sees files no other builder consumed.
    ImageBuilderOptions, "ImageBuilderOptions" {
        Mhd => "MHD",
        Nifti => "NIFTI",
        Nrrd => "NRRD",
        Dicom => "DICOM",
        Tiff => "TIFF",
        Oct => "OCT",
        Fallback => "FALLBACK",
    }
}

string_enum! {
    /// Post-processing stages run over newly created images.
    PostProcessorOptions, "PostProcessorOptions" {
        /// Deep zoom tiling
        Dzi => "DZI",
    }
}

string_enum! {
    /// Physical storage format of an image file.
    ImageType, "ImageType" {
        Mhd => "MHD",
        Tiff => "TIFF",
        Dzi => "DZI",
    }
}

impl ImageType {
    /// Whether files of this type come with a directory of side-car files.
    pub const fn requires_directory(&self) -> bool {
        matches!(self, ImageType::Dzi)
    }
}

string_enum! {
    /// Laterality of an ophthalmologic image.
    ///
    /// Non-ophthalmologic images use `NotApplicable`; there is no default.
    EyeChoice, "EyeChoice" {
        OculusDexter => "OD",
        OculusSinister => "OS",
        Unknown => "U",
        NotApplicable => "NA",
    }
}

// =============================================================================
// Tests
// =============================================================================
