/// A trimmed, non-empty username plus the lowercase key used for uniqueness and lookup.
///
/// Matching is case-insensitive; the display form keeps the case the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username {
    display: String,
    key: String,
}

impl Username {
    /// Returns `None` if `raw` is empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let display = raw.trim();
        if display.is_empty() {
            return None;
        }
        Some(Self {
            key: display.to_lowercase(),
            display: display.to_string(),
        })
    }

    /// For names fixed at compile time; skips the emptiness check.
    pub(crate) fn from_static(name: &'static str) -> Self {
        Self {
            display: name.to_string(),
            key: name.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn into_parts(self) -> (String, String) {
        (self.display, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_preserves_case() {
        let u = Username::parse("  Alice ").unwrap();
        assert_eq!(u.as_str(), "Alice");
        assert_eq!(u.key(), "alice");
    }

    #[test]
    fn rejects_blank() {
        assert!(Username::parse("").is_none());
        assert!(Username::parse(" \t ").is_none());
    }

    #[test]
    fn unicode_keys_fold() {
        let a = Username::parse("ÉLODIE").unwrap();
        let b = Username::parse("élodie").unwrap();
        assert_eq!(a.key(), b.key());
        assert_ne!(a.as_str(), b.as_str());
    }
}
