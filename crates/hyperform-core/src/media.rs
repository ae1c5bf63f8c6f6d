//! Hypermedia media types.

use std::fmt;
use std::str::FromStr;

use crate::error::AffordanceError;

/// A hypermedia format affordances can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// `application/prs.hal-forms+json`
    HalForms,
    /// `application/vnd.amundsen-uber+json`
    Uber,
    /// `application/vnd.collection+json`
    CollectionJson,
    /// `application/xhtml+xml`
    Xhtml,
}

impl MediaType {
    /// All supported types.
    pub const ALL: [MediaType; 4] = [Self::HalForms, Self::Uber, Self::CollectionJson, Self::Xhtml];

    /// Media type string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HalForms => "application/prs.hal-forms+json",
            Self::Uber => "application/vnd.amundsen-uber+json",
            Self::CollectionJson => "application/vnd.collection+json",
            Self::Xhtml => "application/xhtml+xml",
        }
    }

    /// Whether documents of this type are JSON.
    pub fn is_json(self) -> bool {
        self != Self::Xhtml
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = AffordanceError;

    /// Parses a media type, ignoring parameters such as `;charset=UTF-8`.
    /// `text/html` is accepted as XHTML.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("text/html") {
            return Ok(Self::Xhtml);
        }
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(essence))
            .ok_or_else(|| AffordanceError::UnknownMediaType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_parameters() {
        assert_eq!(
            "application/vnd.amundsen-uber+json; charset=UTF-8".parse::<MediaType>(),
            Ok(MediaType::Uber)
        );
        assert_eq!("text/html".parse::<MediaType>(), Ok(MediaType::Xhtml));
        assert!("application/json".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_round_trips_through_string() {
        for media_type in MediaType::ALL {
            assert_eq!(media_type.to_string().parse::<MediaType>(), Ok(media_type));
        }
    }
}
