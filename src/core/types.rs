//! GL-001: Domain types — recipes, plan dates, portions, meal plans.
//!
//! A `MealPlan` holds a date and a list of portions. A portion is one deep
//! copy of a recipe plus how many times it is served, so a plan never keeps
//! N identical copies of an ingredient list. The expanded shape (one recipe
//! per serving) is produced on demand by `MealPlan::expanded`.

use super::error::CommandError;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Recipes
// ============================================================================

/// A recipe in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Catalog key
    pub id: String,

    /// Display name
    pub name: String,

    /// Ingredients, stored verbatim (empty strings allowed)
    pub ingredients: Vec<String>,

    /// Preparation time in minutes
    pub prep_time: u32,
}

impl Recipe {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        ingredients: Vec<String>,
        prep_time: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ingredients,
            prep_time,
        }
    }
}

/// Check that a recipe id can be written to every record format.
///
/// Meal-plan and prep-list lines split `id count` on whitespace, so an id must
/// be a single non-empty token.
pub fn validate_recipe_id(id: &str) -> Result<(), CommandError> {
    if id.is_empty() || id.chars().any(char::is_whitespace) {
        return Err(CommandError::InvalidRecipeId { id: id.to_string() });
    }
    Ok(())
}

/// Check that a name or ingredient occupies exactly one line on disk.
pub fn validate_line(field: &'static str, value: &str) -> Result<(), CommandError> {
    if value.contains(['\n', '\r']) {
        return Err(CommandError::MultilineText {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Which part of a recipe a modify operation replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeField {
    PrepTime,
    Ingredients,
}

impl FromStr for RecipeField {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prepTime" | "prep-time" | "prep_time" => Ok(Self::PrepTime),
            "ingredients" => Ok(Self::Ingredients),
            other => Err(CommandError::UnknownField {
                field: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RecipeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrepTime => write!(f, "prepTime"),
            Self::Ingredients => write!(f, "ingredients"),
        }
    }
}

// ============================================================================
// Meal plans
// ============================================================================

/// Calendar date of a meal plan. Not validated: `31/2/2024` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlanDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl PlanDate {
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self { day, month, year }
    }

    /// Today's date on the host calendar (local time zone).
    pub fn today() -> Self {
        use chrono::Datelike;
        let now = chrono::Local::now().date_naive();
        Self {
            day: now.day(),
            month: now.month(),
            year: now.year(),
        }
    }
}

impl fmt::Display for PlanDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.day, self.month, self.year)
    }
}

/// One recipe served `quantity` times within a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portion {
    pub recipe: Recipe,
    pub quantity: u32,
}

/// A dated meal plan. Owns its recipe copies; later catalog edits do not
/// reach into saved plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPlan {
    pub date: PlanDate,
    pub portions: Vec<Portion>,
}

impl MealPlan {
    pub fn new(date: PlanDate, portions: Vec<Portion>) -> Self {
        Self { date, portions }
    }

    /// Total number of servings across all portions, capped at `u32::MAX`.
    pub fn servings(&self) -> u32 {
        self.portions
            .iter()
            .fold(0u32, |total, p| total.saturating_add(p.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.servings() == 0
    }

    /// The expanded shape: each recipe repeated once per serving.
    pub fn expanded(&self) -> impl Iterator<Item = &Recipe> + '_ {
        self.portions
            .iter()
            .flat_map(|p| std::iter::repeat(&p.recipe).take(p.quantity as usize))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str) -> Recipe {
        Recipe::new(id, format!("{id} name"), vec!["salt".to_string()], 5)
    }

    #[test]
    fn test_gl001_recipe_field_parse() {
        assert_eq!("prepTime".parse::<RecipeField>().unwrap(), RecipeField::PrepTime);
        assert_eq!("prep-time".parse::<RecipeField>().unwrap(), RecipeField::PrepTime);
        assert_eq!(
            "ingredients".parse::<RecipeField>().unwrap(),
            RecipeField::Ingredients
        );
    }

    #[test]
    fn test_gl001_recipe_field_unknown() {
        let err = "colour".parse::<RecipeField>().unwrap_err();
        assert!(matches!(err, CommandError::UnknownField { ref field } if field == "colour"));
    }

    #[test]
    fn test_gl001_validate_recipe_id() {
        assert!(validate_recipe_id("pasta-01").is_ok());
        assert!(validate_recipe_id("").is_err());
        assert!(validate_recipe_id("two words").is_err());
        assert!(validate_recipe_id("tab\there").is_err());
    }

    #[test]
    fn test_gl001_validate_line() {
        assert!(validate_line("recipe name", "Fish & Chips").is_ok());
        assert!(validate_line("recipe name", "").is_ok());
        assert!(matches!(
            validate_line("recipe name", "Fish\nChips"),
            Err(CommandError::MultilineText { field: "recipe name", .. })
        ));
        assert!(validate_line("ingredient", "salt\r").is_err());
    }

    #[test]
    fn test_gl001_plan_date_display() {
        assert_eq!(PlanDate::new(3, 11, 2024).to_string(), "3/11/2024");
    }

    #[test]
    fn test_gl001_plan_date_unvalidated() {
        let d = PlanDate::new(31, 2, 2024);
        assert_eq!(d.day, 31);
        assert_eq!(d.month, 2);
    }

    #[test]
    fn test_gl001_plan_date_today_plausible() {
        let d = PlanDate::today();
        assert!((1..=31).contains(&d.day));
        assert!((1..=12).contains(&d.month));
        assert!(d.year >= 2024);
    }

    #[test]
    fn test_gl001_meal_plan_expanded() {
        let plan = MealPlan::new(
            PlanDate::new(1, 1, 2025),
            vec![
                Portion {
                    recipe: recipe("r1"),
                    quantity: 2,
                },
                Portion {
                    recipe: recipe("r2"),
                    quantity: 1,
                },
            ],
        );
        let ids: Vec<&str> = plan.expanded().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r1", "r2"]);
        assert_eq!(plan.servings(), 3);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_gl001_meal_plan_empty() {
        let plan = MealPlan::new(PlanDate::new(1, 1, 2025), Vec::new());
        assert!(plan.is_empty());
        assert_eq!(plan.expanded().count(), 0);
    }
}
