//! Enumerations shared across the document model.
//!
//! - [`Verb`] - HTTP verbs a path item can declare
//! - [`ParameterLocation`] - The `in` field of a Swagger parameter
//! - [`CollectionFormat`] - How array parameters are serialized

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// HTTP verbs supported by Swagger 2.0 path items.
///
/// Display and parsing use the uppercase wire form.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use swagql_define::Verb;
///
/// assert_eq!(Verb::from_str("GET").unwrap(), Verb::Get);
/// assert_eq!(Verb::Patch.to_string(), "PATCH");
/// assert!(Verb::Post.is_mutating());
/// assert!(!Verb::Get.is_mutating());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verb {
    /// HTTP GET
    Get,
    /// HTTP PUT
    Put,
    /// HTTP POST
    Post,
    /// HTTP DELETE
    Delete,
    /// HTTP OPTIONS
    Options,
    /// HTTP HEAD
    Head,
    /// HTTP PATCH
    Patch,
}

impl Verb {
    /// Returns `true` for verbs that change server state.
    ///
    /// Mutating verbs become Mutation fields; the rest become Query fields.
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch | Self::Delete)
    }

    /// Lowercase form, as used for path item keys and synthetic names.
    pub fn as_lowercase(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
        }
    }
}

/// Where a parameter travels in the outbound request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ParameterLocation {
    /// Substituted into the path template.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as a request header.
    Header,
    /// The JSON request body.
    Body,
    /// A form field, merged into the request body under its raw name.
    FormData,
}

/// Serialization of array-valued parameters.
///
/// Swagger 2.0 defaults to [`CollectionFormat::Csv`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CollectionFormat {
    /// `a,b,c`
    #[default]
    Csv,
    /// `a b c`
    Ssv,
    /// `a\tb\tc`
    Tsv,
    /// `a|b|c`
    Pipes,
    /// `key=a&key=b&key=c`
    Multi,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn verb_display_uppercase() {
        assert_eq!(Verb::Get.to_string(), "GET");
        assert_eq!(Verb::Delete.to_string(), "DELETE");
        assert_eq!(Verb::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn verb_from_str_is_case_sensitive() {
        assert_eq!(Verb::from_str("PUT").unwrap(), Verb::Put);
        assert!(Verb::from_str("put").is_err());
        assert!(Verb::from_str("").is_err());
    }

    #[test]
    fn mutating_verbs() {
        let mutating: Vec<_> = Verb::iter().filter(|v| v.is_mutating()).collect();
        assert_eq!(
            mutating,
            vec![Verb::Put, Verb::Post, Verb::Delete, Verb::Patch]
        );
    }

    #[test]
    fn parameter_location_serde_camel_case() {
        let loc: ParameterLocation = serde_json::from_str("\"formData\"").unwrap();
        assert_eq!(loc, ParameterLocation::FormData);
        assert_eq!(ParameterLocation::FormData.to_string(), "formData");
    }

    #[test]
    fn collection_format_defaults_to_csv() {
        assert_eq!(CollectionFormat::default(), CollectionFormat::Csv);
        let fmt: CollectionFormat = serde_json::from_str("\"multi\"").unwrap();
        assert_eq!(fmt, CollectionFormat::Multi);
    }
}
