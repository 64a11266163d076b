//! Artifact catalog: the ordered registry of categories and the artifacts in each.
//!
//! The default catalog is a hard-coded table (see `builtin`). A catalog can also be
//! read from a TOML data file; both go through the same validation so the
//! provisioner never sees an entry it cannot place on disk.

mod builtin;
mod file;

pub use builtin::{BuiltinEntry, BUILTIN_ENTRIES};
pub use file::{load_catalog_file, CatalogError};

/// Bytes per "MB" as used by catalog sizes (binary megabyte).
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Convert a human-entered megabyte value into bytes, rounding to the nearest byte.
pub fn mb_to_bytes(size_mb: f64) -> u64 {
    (size_mb * BYTES_PER_MB as f64).round() as u64
}

/// One artifact to provision. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub category: String,
    pub name: String,
    /// HTTP(S) source URL.
    pub source: String,
    /// File name under `<models-dir>/<category>/`.
    pub filename: String,
    pub expected_size_bytes: u64,
}

impl ArtifactDescriptor {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        source: impl Into<String>,
        filename: impl Into<String>,
        expected_size_bytes: u64,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            source: source.into(),
            filename: filename.into(),
            expected_size_bytes,
        }
    }

    /// Expected size in MB, for display.
    pub fn expected_size_mb(&self) -> f64 {
        self.expected_size_bytes as f64 / BYTES_PER_MB as f64
    }
}

/// A named group of artifacts sharing one destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub artifacts: Vec<ArtifactDescriptor>,
}

/// Ordered catalog. Iteration follows declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// The hard-coded model catalog.
    pub fn builtin() -> Self {
        let mut catalog = Catalog::default();
        for entry in BUILTIN_ENTRIES {
            catalog.push(ArtifactDescriptor::new(
                entry.category,
                entry.name,
                entry.url,
                entry.filename,
                mb_to_bytes(entry.size_mb as f64),
            ));
        }
        catalog
    }

    /// Build a catalog from descriptors, grouping by category in first-seen order.
    pub fn from_artifacts(artifacts: impl IntoIterator<Item = ArtifactDescriptor>) -> Self {
        let mut catalog = Catalog::default();
        for artifact in artifacts {
            catalog.push(artifact);
        }
        catalog
    }

    fn push(&mut self, artifact: ArtifactDescriptor) {
        match self
            .categories
            .iter_mut()
            .find(|c| c.name == artifact.category)
        {
            Some(category) => category.artifacts.push(artifact),
            None => self.categories.push(Category {
                name: artifact.category.clone(),
                artifacts: vec![artifact],
            }),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All artifacts in catalog order.
    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactDescriptor> {
        self.categories.iter().flat_map(|c| c.artifacts.iter())
    }

    /// Number of artifacts across all categories.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.artifacts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every entry: HTTP(S) source, non-zero size, plain file/category names,
    /// unique artifact names and filenames per category.
    pub fn validate(&self) -> Result<(), CatalogError> {
        file::validate(self)
    }
}
