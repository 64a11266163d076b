//! TOML catalog files and catalog validation.
//!
//! File layout (arrays of tables keep declaration order):
//!
//! ```toml
//! [[category]]
//! name = "realesrgan"
//!
//! [[category.artifact]]
//! name = "x4plus"
//! url = "https://example.com/RealESRGAN_x4plus.pth"
//! filename = "RealESRGAN_x4plus.pth"
//! size_mb = 64
//! ```

use super::{mb_to_bytes, ArtifactDescriptor, Catalog};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("catalog has no artifacts")]
    Empty,
    #[error("invalid category name {0:?}")]
    InvalidCategory(String),
    #[error("{category}/{name}: invalid source URL {url:?}: {source}")]
    InvalidUrl {
        category: String,
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{category}/{name}: unsupported URL scheme {scheme:?} (expected http or https)")]
    UnsupportedScheme {
        category: String,
        name: String,
        scheme: String,
    },
    #[error("{category}/{name}: filename {filename:?} must be a plain file name")]
    InvalidFilename {
        category: String,
        name: String,
        filename: String,
    },
    #[error("{category}/{name}: exactly one of size_mb or size_bytes is required")]
    AmbiguousSize { category: String, name: String },
    #[error("{category}/{name}: expected size must be greater than zero")]
    ZeroSize { category: String, name: String },
    #[error("{category}/{name}: duplicate artifact name")]
    DuplicateArtifact { category: String, name: String },
    #[error("{category}/{name}: filename {filename:?} is already used in this category")]
    DuplicateFilename {
        category: String,
        name: String,
        filename: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    category: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryEntry {
    name: String,
    #[serde(default)]
    artifact: Vec<ArtifactEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArtifactEntry {
    name: String,
    url: String,
    filename: String,
    #[serde(default)]
    size_mb: Option<f64>,
    #[serde(default)]
    size_bytes: Option<u64>,
}

/// Read and validate a catalog file.
pub fn load_catalog_file(path: &Path) -> Result<Catalog, CatalogError> {
    let data = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let catalog: Catalog = data.parse()?;
    tracing::debug!(
        path = %path.display(),
        artifacts = catalog.len(),
        "loaded catalog file"
    );
    Ok(catalog)
}

impl std::str::FromStr for Catalog {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let file: CatalogFile = toml::from_str(s)?;
        let mut artifacts = Vec::new();
        for category in file.category {
            for entry in category.artifact {
                let expected_size_bytes = match (entry.size_mb, entry.size_bytes) {
                    // Negative or non-finite sizes collapse to zero and fail validation.
                    (Some(mb), None) if mb.is_finite() && mb > 0.0 => mb_to_bytes(mb),
                    (Some(_), None) => 0,
                    (None, Some(bytes)) => bytes,
                    _ => {
                        return Err(CatalogError::AmbiguousSize {
                            category: category.name.clone(),
                            name: entry.name,
                        })
                    }
                };
                artifacts.push(ArtifactDescriptor::new(
                    category.name.clone(),
                    entry.name,
                    entry.url,
                    entry.filename,
                    expected_size_bytes,
                ));
            }
        }
        let catalog = Catalog::from_artifacts(artifacts);
        catalog.validate()?;
        Ok(catalog)
    }
}

/// True if `name` is exactly one normal path component (no separators, not `.`/`..`).
fn is_plain_component(name: &str) -> bool {
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

pub(super) fn validate(catalog: &Catalog) -> Result<(), CatalogError> {
    if catalog.is_empty() {
        return Err(CatalogError::Empty);
    }
    for category in catalog.categories() {
        if !is_plain_component(&category.name) {
            return Err(CatalogError::InvalidCategory(category.name.clone()));
        }
        let mut seen = HashSet::new();
        let mut filenames = HashSet::new();
        for artifact in &category.artifacts {
            let category = category.name.clone();
            let name = artifact.name.clone();
            if !seen.insert(artifact.name.as_str()) {
                return Err(CatalogError::DuplicateArtifact { category, name });
            }
            let parsed = url::Url::parse(&artifact.source).map_err(|source| {
                CatalogError::InvalidUrl {
                    category: category.clone(),
                    name: name.clone(),
                    url: artifact.source.clone(),
                    source,
                }
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(CatalogError::UnsupportedScheme {
                    category,
                    name,
                    scheme: parsed.scheme().to_string(),
                });
            }
            if !is_plain_component(&artifact.filename) {
                return Err(CatalogError::InvalidFilename {
                    category,
                    name,
                    filename: artifact.filename.clone(),
                });
            }
            // Two artifacts sharing a destination would overwrite each other.
            if !filenames.insert(artifact.filename.as_str()) {
                return Err(CatalogError::DuplicateFilename {
                    category,
                    name,
                    filename: artifact.filename.clone(),
                });
            }
            if artifact.expected_size_bytes == 0 {
                return Err(CatalogError::ZeroSize { category, name });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_CATEGORIES: &str = r#"
        [[category]]
        name = "rife"

        [[category.artifact]]
        name = "v4.6"
        url = "https://example.com/flownet.pkl"
        filename = "flownet.pkl"
        size_mb = 51

        [[category]]
        name = "tiny"

        [[category.artifact]]
        name = "b"
        url = "http://127.0.0.1:8080/b.bin"
        filename = "b.bin"
        size_bytes = 4096

        [[category.artifact]]
        name = "a"
        url = "http://127.0.0.1:8080/a.bin"
        filename = "a.bin"
        size_mb = 0.5
    "#;

    #[test]
    fn parse_catalog_keeps_order_and_sizes() {
        let catalog: Catalog = TWO_CATEGORIES.parse().unwrap();
        assert_eq!(catalog.len(), 3);
        let names: Vec<&str> = catalog.artifacts().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["v4.6", "b", "a"]);
        let sizes: Vec<u64> = catalog.artifacts().map(|a| a.expected_size_bytes).collect();
        assert_eq!(sizes, [51 * 1024 * 1024, 4096, 512 * 1024]);
        assert_eq!(catalog.categories()[1].name, "tiny");
    }

    #[test]
    fn load_catalog_file_reads_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(TWO_CATEGORIES.as_bytes()).unwrap();
        f.flush().unwrap();
        let catalog = load_catalog_file(f.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn load_catalog_file_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let toml = r#"
            [[category]]
            name = "x"
            [[category.artifact]]
            name = "a"
            url = "ftp://example.com/a.bin"
            filename = "a.bin"
            size_mb = 1
        "#;
        let err = toml.parse::<Catalog>().unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedScheme { ref scheme, .. } if scheme == "ftp"));
    }

    #[test]
    fn rejects_unparseable_url() {
        let toml = r#"
            [[category]]
            name = "x"
            [[category.artifact]]
            name = "a"
            url = "not a url"
            filename = "a.bin"
            size_mb = 1
        "#;
        assert!(matches!(
            toml.parse::<Catalog>().unwrap_err(),
            CatalogError::InvalidUrl { .. }
        ));
    }

    #[test]
    fn rejects_path_traversal_filename() {
        for filename in ["../evil.bin", "sub/dir.bin", "..", "."] {
            let toml = format!(
                r#"
                [[category]]
                name = "x"
                [[category.artifact]]
                name = "a"
                url = "https://example.com/a.bin"
                filename = "{filename}"
                size_mb = 1
                "#
            );
            assert!(
                matches!(
                    toml.parse::<Catalog>().unwrap_err(),
                    CatalogError::InvalidFilename { .. }
                ),
                "filename {filename:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_both_or_neither_size() {
        let both = r#"
            [[category]]
            name = "x"
            [[category.artifact]]
            name = "a"
            url = "https://example.com/a.bin"
            filename = "a.bin"
            size_mb = 1
            size_bytes = 10
        "#;
        assert!(matches!(
            both.parse::<Catalog>().unwrap_err(),
            CatalogError::AmbiguousSize { .. }
        ));
        let neither = r#"
            [[category]]
            name = "x"
            [[category.artifact]]
            name = "a"
            url = "https://example.com/a.bin"
            filename = "a.bin"
        "#;
        assert!(matches!(
            neither.parse::<Catalog>().unwrap_err(),
            CatalogError::AmbiguousSize { .. }
        ));
    }

    #[test]
    fn rejects_zero_size_and_duplicates() {
        let zero = r#"
            [[category]]
            name = "x"
            [[category.artifact]]
            name = "a"
            url = "https://example.com/a.bin"
            filename = "a.bin"
            size_bytes = 0
        "#;
        assert!(matches!(
            zero.parse::<Catalog>().unwrap_err(),
            CatalogError::ZeroSize { .. }
        ));
        let dup = r#"
            [[category]]
            name = "x"
            [[category.artifact]]
            name = "a"
            url = "https://example.com/a.bin"
            filename = "a.bin"
            size_mb = 1
            [[category.artifact]]
            name = "a"
            url = "https://example.com/b.bin"
            filename = "b.bin"
            size_mb = 1
        "#;
        assert!(matches!(
            dup.parse::<Catalog>().unwrap_err(),
            CatalogError::DuplicateArtifact { .. }
        ));
    }

    #[test]
    fn rejects_shared_destination_filename() {
        let toml = r#"
            [[category]]
            name = "x"
            [[category.artifact]]
            name = "a"
            url = "https://example.com/a.bin"
            filename = "same.bin"
            size_bytes = 1000
            [[category.artifact]]
            name = "b"
            url = "https://example.com/b.bin"
            filename = "same.bin"
            size_bytes = 3000
        "#;
        match toml.parse::<Catalog>().unwrap_err() {
            CatalogError::DuplicateFilename {
                category,
                name,
                filename,
            } => {
                assert_eq!(category, "x");
                assert_eq!(name, "b");
                assert_eq!(filename, "same.bin");
            }
            other => panic!("expected DuplicateFilename, got {other:?}"),
        }
    }

    #[test]
    fn same_filename_in_different_categories_is_allowed() {
        let toml = r#"
            [[category]]
            name = "x"
            [[category.artifact]]
            name = "a"
            url = "https://example.com/x/model.bin"
            filename = "model.bin"
            size_bytes = 1000
            [[category]]
            name = "y"
            [[category.artifact]]
            name = "a"
            url = "https://example.com/y/model.bin"
            filename = "model.bin"
            size_bytes = 1000
        "#;
        assert_eq!(toml.parse::<Catalog>().unwrap().len(), 2);
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!("".parse::<Catalog>().unwrap_err(), CatalogError::Empty));
    }

    #[test]
    fn rejects_unknown_keys() {
        let toml = r#"
            [[category]]
            name = "x"
            [[category.artifact]]
            name = "a"
            url = "https://example.com/a.bin"
            filename = "a.bin"
            size_mb = 1
            sha256 = "abc"
        "#;
        assert!(matches!(
            toml.parse::<Catalog>().unwrap_err(),
            CatalogError::Parse(_)
        ));
    }
}
