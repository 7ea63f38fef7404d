//! GL-006: Data files — load, save (atomic), whole-kitchen load/save.
//!
//! Loading never fails. A missing or unreadable file, a bad header or a bad
//! record becomes a `LoadWarning`, is logged, and loading carries on with
//! whatever could be read. Saving fails per file; callers report and move on
//! to the next file.

use super::aggregate;
use super::catalog::Catalog;
use super::codec;
use super::config::DataPaths;
use super::error::{LoadWarning, StoreError};
use super::prep::PrepList;
use super::types::MealPlan;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A loaded value plus everything that went wrong while loading it.
#[derive(Debug, Clone, Default)]
pub struct Loaded<T> {
    pub value: T,
    pub warnings: Vec<LoadWarning>,
}

impl<T> Loaded<T> {
    fn warn(&mut self, warning: LoadWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Read a whole file. `None` means there is nothing to load; the reason has
/// been recorded.
///
/// Bytes that are not UTF-8 are replaced, so they can only spoil the record
/// they sit in.
fn read_text<T>(path: &Path, what: &'static str, loaded: &mut Loaded<T>) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(e) => {
                loaded.warn(LoadWarning::InvalidUtf8 {
                    path: path.to_path_buf(),
                });
                Some(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            loaded.warn(LoadWarning::MissingFile {
                path: path.to_path_buf(),
                what,
            });
            None
        }
        Err(e) => {
            loaded.warn(LoadWarning::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
            None
        }
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// Load the recipe catalog.
pub fn load_catalog(path: &Path) -> Loaded<Catalog> {
    let mut loaded = Loaded::default();
    let Some(text) = read_text(path, "recipes", &mut loaded) else {
        return loaded;
    };

    let reader = match codec::recipe_reader(&text) {
        Ok(reader) => reader,
        Err(source) => {
            loaded.warn(LoadWarning::BadHeader {
                path: path.to_path_buf(),
                source,
            });
            return loaded;
        }
    };

    let mut recipes = Vec::new();
    for (i, result) in reader.enumerate() {
        match result {
            Ok(recipe) => recipes.push(recipe),
            Err(reason) => loaded.warn(LoadWarning::SkippedRecord {
                path: path.to_path_buf(),
                index: i + 1,
                reason,
            }),
        }
    }
    tracing::debug!(path = %path.display(), count = recipes.len(), "loaded recipes");
    loaded.value = Catalog::from_recipes(recipes);
    loaded
}

/// Save the recipe catalog.
pub fn save_catalog(path: &Path, catalog: &Catalog) -> Result<(), StoreError> {
    write_atomic(path, |out| codec::encode_catalog(out, catalog))?;
    tracing::debug!(path = %path.display(), count = catalog.len(), "saved recipes");
    Ok(())
}

// ============================================================================
// Meal plans
// ============================================================================

/// Load the meal-plan history, resolving every entry against `catalog`.
///
/// Entries whose recipe is not in the catalog are dropped with a warning;
/// the plan itself is kept.
pub fn load_meal_plans(path: &Path, catalog: &Catalog) -> Loaded<Vec<MealPlan>> {
    let mut loaded = Loaded::default();
    let Some(text) = read_text(path, "meal plans", &mut loaded) else {
        return loaded;
    };

    let reader = match codec::meal_plan_reader(&text) {
        Ok(reader) => reader,
        Err(source) => {
            loaded.warn(LoadWarning::BadHeader {
                path: path.to_path_buf(),
                source,
            });
            return loaded;
        }
    };

    let mut plans = Vec::new();
    for (i, result) in reader.enumerate() {
        let index = i + 1;
        let record = match result {
            Ok(record) => record,
            Err(reason) => {
                loaded.warn(LoadWarning::SkippedRecord {
                    path: path.to_path_buf(),
                    index,
                    reason,
                });
                continue;
            }
        };

        for reason in record.skipped {
            loaded.warn(LoadWarning::SkippedEntry {
                path: path.to_path_buf(),
                plan: index,
                reason,
            });
        }
        let expansion = aggregate::expand(
            record.entries.iter().map(|(id, n)| (id.as_str(), *n)),
            catalog,
        );
        for id in expansion.dangling {
            loaded.warn(LoadWarning::DanglingReference {
                path: path.to_path_buf(),
                plan: index,
                id,
            });
        }
        plans.push(MealPlan::new(record.date, expansion.portions));
    }
    tracing::debug!(path = %path.display(), count = plans.len(), "loaded meal plans");
    loaded.value = plans;
    loaded
}

/// Save the meal-plan history in counted form.
pub fn save_meal_plans(path: &Path, plans: &[MealPlan]) -> Result<(), StoreError> {
    write_atomic(path, |out| codec::encode_meal_plans(out, plans))?;
    tracing::debug!(path = %path.display(), count = plans.len(), "saved meal plans");
    Ok(())
}

// ============================================================================
// Prep list
// ============================================================================

/// Load the prep list. Lines that do not parse are dropped quietly.
pub fn load_prep_list(path: &Path) -> Loaded<PrepList> {
    let mut loaded = Loaded::default();
    let Some(text) = read_text(path, "prep list entries", &mut loaded) else {
        return loaded;
    };

    let (prep, skipped) = codec::decode_prep_list(&text);
    for reason in &skipped {
        tracing::debug!(path = %path.display(), %reason, "ignored prep list line");
    }
    tracing::debug!(path = %path.display(), count = prep.len(), "loaded prep list");
    loaded.value = prep;
    loaded
}

/// Save the prep list.
pub fn save_prep_list(path: &Path, prep: &PrepList) -> Result<(), StoreError> {
    write_atomic(path, |out| codec::encode_prep_list(out, prep))?;
    tracing::debug!(path = %path.display(), count = prep.len(), "saved prep list");
    Ok(())
}

// ============================================================================
// Atomic write
// ============================================================================

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write to a sibling temp file, then rename over `path`.
fn write_atomic<F>(path: &Path, encode: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut BufWriter<std::fs::File>) -> io::Result<()>,
{
    let fail = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(fail)?;
    }

    let tmp = temp_path(path);
    let result = std::fs::File::create(&tmp).and_then(|file| {
        let mut out = BufWriter::new(file);
        encode(&mut out)?;
        out.flush()?;
        out.get_ref().sync_all()
    });
    if let Err(e) = result.and_then(|()| std::fs::rename(&tmp, path)) {
        let _ = std::fs::remove_file(&tmp);
        return Err(fail(e));
    }
    Ok(())
}

// ============================================================================
// Kitchen
// ============================================================================

/// Everything one run works on.
#[derive(Debug, Clone, Default)]
pub struct Kitchen {
    pub catalog: Catalog,
    pub prep: PrepList,
    pub plans: Vec<MealPlan>,

    /// Files that exist but could not be read; `save` leaves them alone
    pub unreadable: Vec<PathBuf>,
}

impl Kitchen {
    /// Load all three files. The catalog goes first: plans resolve against it.
    pub fn load(paths: &DataPaths) -> (Self, Vec<LoadWarning>) {
        let catalog = load_catalog(&paths.recipes);
        let mut prep = load_prep_list(&paths.prep_list);
        let plans = load_meal_plans(&paths.meal_plans, &catalog.value);

        let unknown: Vec<String> = prep
            .value
            .iter()
            .filter(|(id, _)| !catalog.value.contains(id))
            .map(|(id, _)| id.to_string())
            .collect();
        for id in unknown {
            prep.warn(LoadWarning::UnknownPrepEntry {
                path: paths.prep_list.clone(),
                id,
            });
        }

        let mut warnings = catalog.warnings;
        warnings.extend(prep.warnings);
        warnings.extend(plans.warnings);

        let unreadable = warnings
            .iter()
            .filter_map(|w| match w {
                LoadWarning::Unreadable { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect();

        let kitchen = Self {
            catalog: catalog.value,
            prep: prep.value,
            plans: plans.value,
            unreadable,
        };
        (kitchen, warnings)
    }

    /// Save all three files, attempting each one even if an earlier one
    /// failed. Returns the failures.
    ///
    /// A file that could not be read at load time is not written: what is in
    /// memory for it is empty, not its real content.
    pub fn save(&self, paths: &DataPaths) -> Vec<StoreError> {
        let mut failures = Vec::new();
        let mut attempt = |path: &Path, save: &dyn Fn(&Path) -> Result<(), StoreError>| {
            if self.unreadable.iter().any(|p| p == path) {
                tracing::warn!(path = %path.display(), "not saving a file that could not be read");
                return;
            }
            if let Err(e) = save(path) {
                failures.push(e);
            }
        };
        attempt(&paths.recipes, &|p| save_catalog(p, &self.catalog));
        attempt(&paths.prep_list, &|p| save_prep_list(p, &self.prep));
        attempt(&paths.meal_plans, &|p| save_meal_plans(p, &self.plans));
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FileNames;
    use crate::core::error::HeaderError;
    use crate::core::types::{PlanDate, Recipe};
    use std::collections::BTreeMap;

    fn recipe(id: &str, prep_time: u32) -> Recipe {
        Recipe::new(id, format!("{id} name"), vec!["salt".to_string()], prep_time)
    }

    fn catalog() -> Catalog {
        Catalog::from_recipes(vec![recipe("r1", 10), recipe("r2", 20)])
    }

    #[test]
    fn test_gl006_catalog_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.txt");
        save_catalog(&path, &catalog()).unwrap();

        let loaded = load_catalog(&path);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.value, catalog());
    }

    #[test]
    fn test_gl006_missing_catalog_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        let loaded = load_catalog(&path);
        assert!(loaded.value.is_empty());
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::MissingFile {
                path: path.clone(),
                what: "recipes",
            }]
        );
    }

    #[test]
    fn test_gl006_bad_header_ignores_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.txt");
        std::fs::write(&path, "several\nr1\nOne\n0\n10\n").unwrap();
        let loaded = load_catalog(&path);
        assert!(loaded.value.is_empty());
        assert!(matches!(
            loaded.warnings.as_slice(),
            [LoadWarning::BadHeader {
                source: HeaderError::Invalid { .. },
                ..
            }]
        ));
    }

    #[test]
    fn test_gl006_corrupt_record_recovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.txt");
        std::fs::write(
            &path,
            "3\nr1\nOne\n0\n10\nr2\nTwo\n1\nrice\n20\nr3\nThree\nx\n5\n",
        )
        .unwrap();
        let loaded = load_catalog(&path);
        assert_eq!(loaded.value.len(), 2);
        assert!(loaded.value.contains("r1"));
        assert!(loaded.value.contains("r2"));
        assert!(matches!(
            loaded.warnings.as_slice(),
            [LoadWarning::SkippedRecord { index: 3, .. }]
        ));
    }

    #[test]
    fn test_gl006_non_utf8_byte_spoils_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.txt");
        std::fs::write(&path, b"2\nr1\nSoup\n1\nwater\n10\nr2\nCr\xE8me\n0\n20\n").unwrap();

        let loaded = load_catalog(&path);
        assert_eq!(loaded.value.len(), 2);
        assert_eq!(loaded.value.find("r1").unwrap().ingredients, vec!["water"]);
        assert_eq!(loaded.value.find("r2").unwrap().name, "Cr\u{FFFD}me");
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::InvalidUtf8 { path: path.clone() }]
        );
    }

    #[test]
    fn test_gl006_kitchen_keeps_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path(), &FileNames::default());
        std::fs::create_dir_all(paths.meal_plans.join("kept")).unwrap();

        let (kitchen, _) = Kitchen::load(&paths);
        assert_eq!(kitchen.unreadable, vec![paths.meal_plans.clone()]);
        assert!(kitchen.save(&paths).is_empty());
        assert!(paths.meal_plans.join("kept").is_dir());
        assert!(paths.recipes.exists());
        assert!(paths.prep_list.exists());
    }

    #[test]
    fn test_gl006_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_catalog(dir.path());
        assert!(loaded.value.is_empty());
        assert!(matches!(
            loaded.warnings.as_slice(),
            [LoadWarning::Unreadable { .. }]
        ));
    }

    #[test]
    fn test_gl006_meal_plans_resolve_against_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meal_plans.txt");
        std::fs::write(&path, "2\n1 2 2025\n2\nr1 2\nghost 1\n5 6 2025\n1\nr2 3\n").unwrap();

        let loaded = load_meal_plans(&path, &catalog());
        assert_eq!(loaded.value.len(), 2);
        assert_eq!(
            aggregate::counted(&loaded.value[0]),
            BTreeMap::from([("r1".to_string(), 2)])
        );
        assert_eq!(loaded.value[1].servings(), 3);
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::DanglingReference {
                path: path.clone(),
                plan: 1,
                id: "ghost".into(),
            }]
        );
    }

    #[test]
    fn test_gl006_meal_plans_bad_entry_keeps_plan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meal_plans.txt");
        std::fs::write(&path, "1\n1 2 2025\n2\nr1\nr2 1\n").unwrap();
        let loaded = load_meal_plans(&path, &catalog());
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value[0].servings(), 1);
        assert!(matches!(
            loaded.warnings.as_slice(),
            [LoadWarning::SkippedEntry { plan: 1, .. }]
        ));
    }

    #[test]
    fn test_gl006_meal_plans_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meal_plans.txt");
        let c = catalog();
        let e = aggregate::expand([("r2", 1), ("r1", 2)], &c);
        let plans = vec![MealPlan::new(PlanDate::new(9, 9, 2025), e.portions)];
        save_meal_plans(&path, &plans).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "1\n9 9 2025\n2\nr1 2\nr2 1\n"
        );
        let loaded = load_meal_plans(&path, &c);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(
            aggregate::counted(&loaded.value[0]),
            aggregate::counted(&plans[0])
        );
    }

    #[test]
    fn test_gl006_prep_list_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prep_list.txt");
        let c = catalog();
        let mut prep = PrepList::new();
        prep.add(&c, "r1", 2).unwrap();
        prep.add(&c, "r2", 1).unwrap();

        save_prep_list(&path, &prep).unwrap();
        let loaded = load_prep_list(&path);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.value, prep);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "r1 2\nr2 1\n");
    }

    #[test]
    fn test_gl006_missing_prep_list() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_prep_list(&dir.path().join("prep_list.txt"));
        assert!(loaded.value.is_empty());
        assert_eq!(loaded.warnings.len(), 1);
    }

    #[test]
    fn test_gl006_atomic_write_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.txt");
        save_catalog(&path, &catalog()).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_gl006_save_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/prep_list.txt");
        save_prep_list(&path, &PrepList::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_gl006_save_failure_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go makes the rename fail.
        let path = dir.path().join("recipes.txt");
        std::fs::create_dir_all(path.join("occupied")).unwrap();
        let err = save_catalog(&path, &catalog()).unwrap_err();
        assert!(err.to_string().contains("recipes.txt"));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_gl006_kitchen_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path(), &FileNames::default());

        let (empty, warnings) = Kitchen::load(&paths);
        assert!(empty.catalog.is_empty());
        assert_eq!(warnings.len(), 3);

        let mut kitchen = Kitchen {
            catalog: catalog(),
            ..Kitchen::default()
        };
        kitchen.prep.add(&kitchen.catalog, "r1", 2).unwrap();
        aggregate::create_meal_plan(
            &mut kitchen.prep,
            &mut kitchen.plans,
            &kitchen.catalog,
            PlanDate::new(1, 3, 2026),
        );
        kitchen.prep.add(&kitchen.catalog, "r2", 5).unwrap();
        assert!(kitchen.save(&paths).is_empty());

        let (again, warnings) = Kitchen::load(&paths);
        assert!(warnings.is_empty());
        assert_eq!(again.catalog, kitchen.catalog);
        assert_eq!(again.prep, kitchen.prep);
        assert_eq!(again.plans, kitchen.plans);
    }

    #[test]
    fn test_gl006_kitchen_load_flags_unknown_prep_entries() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path(), &FileNames::default());
        save_catalog(&paths.recipes, &catalog()).unwrap();
        save_meal_plans(&paths.meal_plans, &[]).unwrap();
        std::fs::write(&paths.prep_list, "r1 2\ngone 1\n").unwrap();

        let (kitchen, warnings) = Kitchen::load(&paths);
        assert_eq!(kitchen.prep.len(), 2);
        assert_eq!(
            warnings,
            vec![LoadWarning::UnknownPrepEntry {
                path: paths.prep_list.clone(),
                id: "gone".into(),
            }]
        );
    }

    #[test]
    fn test_gl006_kitchen_save_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path(), &FileNames::default());
        std::fs::create_dir_all(paths.recipes.join("blocked")).unwrap();

        let kitchen = Kitchen {
            catalog: catalog(),
            ..Kitchen::default()
        };
        let failures = kitchen.save(&paths);
        assert_eq!(failures.len(), 1);
        assert!(paths.prep_list.exists());
        assert!(paths.meal_plans.exists());
    }
}
