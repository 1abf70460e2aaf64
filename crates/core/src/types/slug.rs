//! URL slug type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// Nothing usable remained after normalization.
    #[error("slug cannot be empty")]
    Empty,
    /// The slug contains a character outside `[a-z0-9-]`.
    #[error("slug contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The slug starts or ends with `-`, or contains `--`.
    #[error("slug has a leading, trailing, or repeated separator")]
    MalformedSeparator,
}

/// A URL-safe identifier derived from a display name.
///
/// Slugs are lowercase ASCII words joined by single hyphens, e.g.
/// `"Linen Shirt & Tie"` becomes `linen-shirt-and-tie`. Derivation is
/// deterministic, so the same name always produces the same slug.
///
/// ## Examples
///
/// ```
/// use boutique_core::Slug;
///
/// assert_eq!(Slug::from_name("Classic Wool Coat").unwrap().as_str(), "classic-wool-coat");
/// assert_eq!(Slug::from_name("  Shoes/Boots ").unwrap().as_str(), "shoes-boots");
/// assert!(Slug::from_name("!!!").is_err());
///
/// assert!(Slug::parse("wool-coat").is_ok());
/// assert!(Slug::parse("Wool Coat").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a human-readable name.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if the name has no letters or digits.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        // Accented and non-Latin letters become their closest ASCII spelling.
        let ascii = deunicode::deunicode(name);
        let mut out = String::with_capacity(ascii.len());
        let mut pending_separator = false;

        for c in ascii.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_separator && !out.is_empty() {
                    out.push('-');
                }
                pending_separator = false;
                out.push(c.to_ascii_lowercase());
            } else if c == '&' {
                if !out.is_empty() {
                    out.push('-');
                }
                out.push_str("and");
                pending_separator = true;
            } else if c.is_whitespace() || matches!(c, '-' | '_' | '/' | '.') {
                pending_separator = true;
            }
        }

        if out.is_empty() {
            return Err(SlugError::Empty);
        }

        Ok(Self(out))
    }

    /// Validate an already-formed slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other than
    /// lowercase ASCII letters, digits, and `-`, or has malformed separators.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter(c));
        }

        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(SlugError::MalformedSeparator);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn slug(name: &str) -> String {
        Slug::from_name(name).unwrap().into_inner()
    }

    #[test]
    fn test_from_name_lowercases_and_joins() {
        assert_eq!(slug("Classic Wool Coat"), "classic-wool-coat");
        assert_eq!(slug("NIKE Air 90"), "nike-air-90");
    }

    #[test]
    fn test_from_name_collapses_separators() {
        assert_eq!(slug("  silk   scarf  "), "silk-scarf");
        assert_eq!(slug("shirt--slim_fit"), "shirt-slim-fit");
        assert_eq!(slug("home/decor.lamps"), "home-decor-lamps");
    }

    #[test]
    fn test_from_name_ampersand() {
        assert_eq!(slug("Shirts & Ties"), "shirts-and-ties");
        assert_eq!(slug("Shirts&Ties"), "shirts-and-ties");
        assert_eq!(slug("& more"), "and-more");
    }

    #[test]
    fn test_from_name_drops_punctuation() {
        assert_eq!(slug("Men's T-Shirt!"), "mens-t-shirt");
    }

    #[test]
    fn test_from_name_transliterates() {
        assert_eq!(slug("Café Crème"), "cafe-creme");
        assert_eq!(slug("Été"), "ete");
        assert_eq!(slug("Straße Über"), "strasse-uber");
    }

    #[test]
    fn test_from_name_empty() {
        assert_eq!(Slug::from_name(""), Err(SlugError::Empty));
        assert_eq!(Slug::from_name(" -- "), Err(SlugError::Empty));
    }

    #[test]
    fn test_from_name_is_deterministic() {
        assert_eq!(slug("Leather Belt"), slug("Leather Belt"));
    }

    #[test]
    fn test_derived_slug_always_parses() {
        for name in ["A & B", " x ", "Shoes/Boots 2024", "t_shirt", "Niño Ñandú"] {
            let derived = slug(name);
            assert!(Slug::parse(&derived).is_ok(), "{derived}");
        }
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Slug::parse("Wool"), Err(SlugError::InvalidCharacter('W')));
        assert_eq!(Slug::parse("a b"), Err(SlugError::InvalidCharacter(' ')));
        assert_eq!(Slug::parse("-ab"), Err(SlugError::MalformedSeparator));
        assert_eq!(Slug::parse("a--b"), Err(SlugError::MalformedSeparator));
    }
}
