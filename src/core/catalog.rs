//! GL-003: Recipe catalog — lookup by ID plus add/delete/modify.
//!
//! Lookup is a linear scan that returns the first match. The catalog does
//! not enforce unique IDs itself: a hand-edited file may contain duplicates,
//! and `find` must still answer. `add` is what keeps new IDs unique.

use super::error::CommandError;
use super::types::{validate_line, validate_recipe_id, Recipe, RecipeField};

/// The set of known recipes, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog as-is, duplicates included.
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// First recipe with this ID.
    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Add a new recipe. Never overwrites.
    pub fn add(&mut self, recipe: Recipe) -> Result<(), CommandError> {
        validate_recipe_id(&recipe.id)?;
        validate_line("recipe name", &recipe.name)?;
        for ingredient in &recipe.ingredients {
            validate_line("ingredient", ingredient)?;
        }
        if self.contains(&recipe.id) {
            return Err(CommandError::DuplicateRecipe { id: recipe.id });
        }
        self.recipes.push(recipe);
        Ok(())
    }

    /// Remove every recipe with this ID. Returns how many were removed.
    pub fn delete(&mut self, id: &str) -> Result<usize, CommandError> {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        match before - self.recipes.len() {
            0 => Err(CommandError::RecipeNotFound { id: id.to_string() }),
            removed => Ok(removed),
        }
    }

    /// Replace the prep time or the whole ingredient list of a recipe.
    ///
    /// `field` is `prepTime` or `ingredients`. For ingredients, `value` is a
    /// comma-separated list; elements are trimmed and empty ones dropped.
    /// On any error the recipe is left as it was.
    pub fn modify(
        &mut self,
        id: &str,
        field: &str,
        value: &str,
    ) -> Result<RecipeField, CommandError> {
        let recipe = self
            .recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CommandError::RecipeNotFound { id: id.to_string() })?;

        let field: RecipeField = field.parse()?;
        match field {
            RecipeField::PrepTime => {
                recipe.prep_time = value
                    .trim()
                    .parse()
                    .map_err(|_| CommandError::InvalidPrepTime {
                        value: value.to_string(),
                    })?;
            }
            RecipeField::Ingredients => {
                let ingredients = parse_ingredient_list(value);
                for ingredient in &ingredients {
                    validate_line("ingredient", ingredient)?;
                }
                recipe.ingredients = ingredients;
            }
        }
        Ok(field)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

/// Split a comma-separated ingredient list.
pub fn parse_ingredient_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
