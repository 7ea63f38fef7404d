//! GL-007: Data file locations.
//!
//! Files live in a data directory (default: the working directory). Their
//! names come from an optional `galley.toml` in that directory; a
//! `--prep-file` flag overrides the prep-list name.

use super::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional config file inside the data directory.
pub const CONFIG_FILE: &str = "galley.toml";

/// File names, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileNames {
    pub recipes: String,
    pub meal_plans: String,
    pub prep_list: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            recipes: "recipes.txt".to_string(),
            meal_plans: "meal_plans.txt".to_string(),
            prep_list: "prep_list.txt".to_string(),
        }
    }
}

/// Parse `galley.toml` content.
pub fn parse_file_names(content: &str, path: &Path) -> Result<FileNames, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `galley.toml` from the data directory. A missing file means defaults.
pub fn load_file_names(data_dir: &Path) -> Result<FileNames, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_file_names(&content, &path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileNames::default()),
        Err(source) => Err(ConfigError::Read { path, source }),
    }
}

/// Full paths of the three data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub recipes: PathBuf,
    pub meal_plans: PathBuf,
    pub prep_list: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: &Path, names: &FileNames) -> Self {
        Self {
            recipes: data_dir.join(&names.recipes),
            meal_plans: data_dir.join(&names.meal_plans),
            prep_list: data_dir.join(&names.prep_list),
        }
    }

    /// Defaults < `galley.toml` < `prep_file` override.
    pub fn resolve(data_dir: &Path, prep_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut names = load_file_names(data_dir)?;
        if let Some(prep) = prep_file {
            names.prep_list = prep.to_string();
        }
        let paths = Self::new(data_dir, &names);
        tracing::debug!(?paths, "resolved data files");
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gl007_defaults() {
        let paths = DataPaths::new(Path::new("/data"), &FileNames::default());
        assert_eq!(paths.recipes, PathBuf::from("/data/recipes.txt"));
        assert_eq!(paths.meal_plans, PathBuf::from("/data/meal_plans.txt"));
        assert_eq!(paths.prep_list, PathBuf::from("/data/prep_list.txt"));
    }

    #[test]
    fn test_gl007_partial_config() {
        let names = parse_file_names("prep_list = \"meal_prep.txt\"\n", Path::new("galley.toml"))
            .unwrap();
        assert_eq!(names.prep_list, "meal_prep.txt");
        assert_eq!(names.recipes, "recipes.txt");
    }

    #[test]
    fn test_gl007_unknown_key_rejected() {
        let result = parse_file_names("pantry = \"x.txt\"\n", Path::new("galley.toml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_gl007_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_file_names(dir.path()).unwrap(), FileNames::default());
    }

    #[test]
    fn test_gl007_resolve_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "recipes = \"book.txt\"\nprep_list = \"meal_prep.txt\"\n",
        )
        .unwrap();

        let paths = DataPaths::resolve(dir.path(), None).unwrap();
        assert_eq!(paths.recipes, dir.path().join("book.txt"));
        assert_eq!(paths.prep_list, dir.path().join("meal_prep.txt"));

        let paths = DataPaths::resolve(dir.path(), Some("queue.txt")).unwrap();
        assert_eq!(paths.prep_list, dir.path().join("queue.txt"));
        assert_eq!(paths.meal_plans, dir.path().join("meal_plans.txt"));
    }

    #[test]
    fn test_gl007_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "recipes = [").unwrap();
        assert!(DataPaths::resolve(dir.path(), None).is_err());
    }
}
