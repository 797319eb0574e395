//! Lock file recognition tables.
//!
//! Every generator keys its filesystem support off these tables: a lock
//! file name maps to exactly one ecosystem, and each adapter declares the
//! ecosystems its tool understands. Table order doubles as the probe order
//! when a directory is searched for a lock file.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Package ecosystem a lock file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Python,
    Rust,
    JavaScript,
    Ruby,
    Go,
    Dart,
    Cpp,
    Java,
    Php,
    DotNet,
    Swift,
    Elixir,
    Scala,
    Terraform,
}

impl Ecosystem {
    /// Get the ecosystem name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Python => "python",
            Ecosystem::Rust => "rust",
            Ecosystem::JavaScript => "javascript",
            Ecosystem::Ruby => "ruby",
            Ecosystem::Go => "go",
            Ecosystem::Dart => "dart",
            Ecosystem::Cpp => "cpp",
            Ecosystem::Java => "java",
            Ecosystem::Php => "php",
            Ecosystem::DotNet => "dotnet",
            Ecosystem::Swift => "swift",
            Ecosystem::Elixir => "elixir",
            Ecosystem::Scala => "scala",
            Ecosystem::Terraform => "terraform",
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Python dependency files.
pub const PYTHON_LOCK_FILES: &[&str] = &[
    "Pipfile.lock",
    "poetry.lock",
    "pyproject.toml",
    "requirements.txt",
    "uv.lock",
];

/// Rust dependency files.
pub const RUST_LOCK_FILES: &[&str] = &["Cargo.lock"];

/// JavaScript dependency files.
pub const JAVASCRIPT_LOCK_FILES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lock",
];

/// Ruby dependency files.
pub const RUBY_LOCK_FILES: &[&str] = &["Gemfile.lock"];

/// Go dependency files.
pub const GO_LOCK_FILES: &[&str] = &["go.mod", "go.sum"];

/// Dart dependency files.
pub const DART_LOCK_FILES: &[&str] = &["pubspec.lock"];

/// C/C++ dependency files.
pub const CPP_LOCK_FILES: &[&str] = &["conan.lock"];

/// Java dependency files.
pub const JAVA_LOCK_FILES: &[&str] = &[
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "gradle.lockfile",
];

/// PHP dependency files.
pub const PHP_LOCK_FILES: &[&str] = &["composer.json", "composer.lock"];

/// .NET dependency files.
pub const DOTNET_LOCK_FILES: &[&str] = &["packages.lock.json"];

/// Swift dependency files.
pub const SWIFT_LOCK_FILES: &[&str] = &["Package.swift", "Package.resolved"];

/// Elixir dependency files.
pub const ELIXIR_LOCK_FILES: &[&str] = &["mix.lock"];

/// Scala dependency files.
pub const SCALA_LOCK_FILES: &[&str] = &["build.sbt"];

/// Terraform dependency files.
pub const TERRAFORM_LOCK_FILES: &[&str] = &[".terraform.lock.hcl"];

/// Lock file tables in probe order.
const TABLES: &[(Ecosystem, &[&str])] = &[
    (Ecosystem::Python, PYTHON_LOCK_FILES),
    (Ecosystem::Rust, RUST_LOCK_FILES),
    (Ecosystem::JavaScript, JAVASCRIPT_LOCK_FILES),
    (Ecosystem::Ruby, RUBY_LOCK_FILES),
    (Ecosystem::Go, GO_LOCK_FILES),
    (Ecosystem::Dart, DART_LOCK_FILES),
    (Ecosystem::Cpp, CPP_LOCK_FILES),
    (Ecosystem::Java, JAVA_LOCK_FILES),
    (Ecosystem::Php, PHP_LOCK_FILES),
    (Ecosystem::DotNet, DOTNET_LOCK_FILES),
    (Ecosystem::Swift, SWIFT_LOCK_FILES),
    (Ecosystem::Elixir, ELIXIR_LOCK_FILES),
    (Ecosystem::Scala, SCALA_LOCK_FILES),
    (Ecosystem::Terraform, TERRAFORM_LOCK_FILES),
];

/// Get the ecosystem for a lock file name.
pub fn ecosystem_for(file_name: &str) -> Option<Ecosystem> {
    TABLES
        .iter()
        .find(|(_, files)| files.contains(&file_name))
        .map(|(ecosystem, _)| *ecosystem)
}

/// Check if a lock file name is recognized at all.
pub fn is_known_lock_file(file_name: &str) -> bool {
    ecosystem_for(file_name).is_some()
}

/// Check whether a lock file belongs to one of the given ecosystems.
pub fn lock_file_in(file_name: &str, ecosystems: &[Ecosystem]) -> bool {
    ecosystem_for(file_name).map_or(false, |e| ecosystems.contains(&e))
}

/// All recognized lock file names, in probe order.
pub fn known_lock_files() -> impl Iterator<Item = &'static str> {
    TABLES.iter().flat_map(|(_, files)| files.iter().copied())
}

/// Directories never worth descending into during discovery.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "vendor", "venv", "__pycache__"];

/// How deep `find_lock_file` is willing to look.
const MAX_DISCOVERY_DEPTH: usize = 3;

fn table_rank(file_name: &str) -> Option<usize> {
    known_lock_files().position(|name| name == file_name)
}

fn skipped_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// Find the lock file a directory most plausibly builds from.
///
/// The tree is walked a few levels deep, skipping hidden and dependency
/// directories. The shallowest recognized lock file wins; ties at the
/// same depth fall back to table order, so `requirements.txt` beats a
/// `go.mod` sitting beside it.
pub fn find_lock_file(dir: &Path) -> Option<PathBuf> {
    let mut best: Option<(usize, usize, PathBuf)> = None;

    for entry in WalkDir::new(dir)
        .max_depth(MAX_DISCOVERY_DEPTH)
        .into_iter()
        .filter_entry(|entry| !skipped_dir(entry))
        .filter_map(|entry| entry.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(rank) = table_rank(name) else {
            continue;
        };

        let better = match &best {
            Some((depth, best_rank, _)) => (entry.depth(), rank) < (*depth, *best_rank),
            None => true,
        };
        if better {
            best = Some((entry.depth(), rank, entry.into_path()));
        }
    }

    best.map(|(_, _, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ecosystem_for() {
        assert_eq!(ecosystem_for("requirements.txt"), Some(Ecosystem::Python));
        assert_eq!(ecosystem_for("uv.lock"), Some(Ecosystem::Python));
        assert_eq!(ecosystem_for("Cargo.lock"), Some(Ecosystem::Rust));
        assert_eq!(ecosystem_for("pnpm-lock.yaml"), Some(Ecosystem::JavaScript));
        assert_eq!(ecosystem_for("gradle.lockfile"), Some(Ecosystem::Java));
        assert_eq!(
            ecosystem_for(".terraform.lock.hcl"),
            Some(Ecosystem::Terraform)
        );
        assert_eq!(ecosystem_for("unknown.lock"), None);
    }

    #[test]
    fn test_is_known_lock_file() {
        assert!(is_known_lock_file("Gemfile.lock"));
        assert!(is_known_lock_file("mix.lock"));
        assert!(!is_known_lock_file("Makefile"));
    }

    #[test]
    fn test_lock_file_in() {
        let ecosystems = &[Ecosystem::Python, Ecosystem::Rust];
        assert!(lock_file_in("poetry.lock", ecosystems));
        assert!(lock_file_in("Cargo.lock", ecosystems));
        assert!(!lock_file_in("go.mod", ecosystems));
        assert!(!lock_file_in("not-a-lock-file", ecosystems));
    }

    #[test]
    fn test_no_duplicate_lock_file_names() {
        let mut seen = std::collections::HashSet::new();
        for name in known_lock_files() {
            assert!(seen.insert(name), "duplicate lock file entry: {}", name);
        }
    }

    #[test]
    fn test_find_lock_file() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_lock_file(tmp.path()), None);

        std::fs::write(tmp.path().join("go.mod"), "module example.com/app").unwrap();
        assert_eq!(find_lock_file(tmp.path()), Some(tmp.path().join("go.mod")));

        // Table order prefers the Python table over Go at the same depth.
        std::fs::write(tmp.path().join("requirements.txt"), "requests==2.32.0").unwrap();
        assert_eq!(
            find_lock_file(tmp.path()),
            Some(tmp.path().join("requirements.txt"))
        );
    }

    #[test]
    fn test_find_lock_file_descends_into_subdirs() {
        let tmp = TempDir::new().unwrap();
        let backend = tmp.path().join("backend");
        std::fs::create_dir_all(&backend).unwrap();
        std::fs::write(backend.join("Cargo.lock"), "version = 3").unwrap();

        assert_eq!(
            find_lock_file(tmp.path()),
            Some(backend.join("Cargo.lock"))
        );
    }

    #[test]
    fn test_find_lock_file_prefers_shallow_matches() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("services/api");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("requirements.txt"), "flask").unwrap();
        std::fs::write(tmp.path().join("Cargo.lock"), "version = 3").unwrap();

        // Cargo.lock ranks below requirements.txt in the tables, but it
        // sits at the root and depth wins.
        assert_eq!(
            find_lock_file(tmp.path()),
            Some(tmp.path().join("Cargo.lock"))
        );
    }

    #[test]
    fn test_find_lock_file_skips_dependency_dirs() {
        let tmp = TempDir::new().unwrap();
        let modules = tmp.path().join("node_modules/leftpad");
        std::fs::create_dir_all(&modules).unwrap();
        std::fs::write(modules.join("package.json"), "{}").unwrap();
        let hidden = tmp.path().join(".cache");
        std::fs::create_dir_all(&hidden).unwrap();
        std::fs::write(hidden.join("Gemfile.lock"), "GEM").unwrap();

        assert_eq!(find_lock_file(tmp.path()), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Ecosystem::DotNet.to_string(), "dotnet");
        assert_eq!(Ecosystem::JavaScript.to_string(), "javascript");
    }
}
