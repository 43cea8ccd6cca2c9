//! Trusted library references from the process environment.
//!
//! The artifact is built against whatever prebuilt libraries the surrounding
//! process declares trustworthy, enumerated as a colon-delimited list of file
//! paths. Attaching the full set means the artifact can resolve harness types
//! without a manually curated reference list. The environment value is read
//! once per run and treated as immutable for its duration.

use std::env;

use crate::syntax::MetadataReference;

/// Environment variable naming the trusted library list.
pub const TRUSTED_LIBRARY_PATHS: &str = "TRUSTED_LIBRARY_PATHS";

/// Read the trusted library references from the process environment.
pub fn trusted_libraries() -> Vec<MetadataReference> {
    parse_trusted_libraries(&env::var(TRUSTED_LIBRARY_PATHS).unwrap_or_default())
}

/// Parse a colon-delimited path list into references.
pub fn parse_trusted_libraries(value: &str) -> Vec<MetadataReference> {
    value
        .split(':')
        .filter(|path| !path.is_empty())
        .map(MetadataReference::from_file)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn splits_on_colons() {
        let refs = parse_trusted_libraries("/libs/libtrace_capture.rlib:/libs/libharness.rlib");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].path(), Path::new("/libs/libtrace_capture.rlib"));
        assert_eq!(refs[1].path(), Path::new("/libs/libharness.rlib"));
    }

    #[test]
    fn empty_value_yields_no_references() {
        assert!(parse_trusted_libraries("").is_empty());
    }

    #[test]
    fn empty_segments_are_ignored() {
        let refs = parse_trusted_libraries(":/libs/liba.rlib::");
        assert_eq!(refs.len(), 1);
    }
}
