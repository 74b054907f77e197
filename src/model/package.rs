//! Package names and the visibility relation between them.

use std::fmt;

use smol_str::SmolStr;

/// A dotted package identifier, e.g. `google.protobuf`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackageName {
    segments: Vec<SmolStr>,
}

impl PackageName {
    /// Parse a dotted identifier. Empty segments are dropped, so `""` yields
    /// the empty (default) package.
    pub fn parse(name: &str) -> Self {
        let segments = name
            .split('.')
            .filter(|s| !s.is_empty())
            .map(SmolStr::new)
            .collect();
        Self { segments }
    }

    /// The dot-separated components.
    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    /// True for the empty (default) package.
    pub fn is_default(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether two packages are *related*: the components of one form a
    /// prefix of the other's (equality included). Related packages see each
    /// other's declarations unqualified across imports.
    pub fn is_related_to(&self, other: &PackageName) -> bool {
        let shorter = self.segments.len().min(other.segments.len());
        self.segments[..shorter] == other.segments[..shorter]
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

/// Package relation over optional packages.
///
/// A file with no package declaration lives in unqualified global scope and
/// is by convention related to everything. Pure: never touches the files
/// themselves.
pub fn are_related(a: Option<&PackageName>, b: Option<&PackageName>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.is_related_to(b),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("x.y", "x.y", true)] // reflexive
    #[case("x.y", "x.y.z", true)] // prefix
    #[case("x.y.z", "x.y", true)] // prefix, other direction
    #[case("x", "x.y.z", true)]
    #[case("p", "q", false)]
    #[case("x.y", "x.z", false)]
    #[case("ab", "a", false)] // component, not string, prefix
    fn test_relation(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        let a = PackageName::parse(a);
        let b = PackageName::parse(b);
        assert_eq!(a.is_related_to(&b), expected);
        assert_eq!(b.is_related_to(&a), expected);
    }

    #[test]
    fn test_absent_package_is_related_to_everything() {
        let p = PackageName::parse("x.y");
        assert!(are_related(None, Some(&p)));
        assert!(are_related(Some(&p), None));
        assert!(are_related(None, None));
    }

    #[test]
    fn test_default_package_is_related_to_everything() {
        let empty = PackageName::parse("");
        let p = PackageName::parse("x.y");
        assert!(empty.is_default());
        assert!(empty.is_related_to(&p));
    }

    #[test]
    fn test_display_round_trip() {
        let p = PackageName::parse("google.protobuf");
        assert_eq!(p.to_string(), "google.protobuf");
        assert_eq!(p.segments().len(), 2);
    }
}
