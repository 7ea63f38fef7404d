//! GL-009: Console views and messages.
//!
//! Every function returns the text instead of printing it, so commands can
//! be tested without capturing stdout.

use crate::core::aggregate::{self, PlanOutcome};
use crate::core::catalog::Catalog;
use crate::core::error::StoreError;
use crate::core::prep::{PrepChange, PrepList};
use crate::core::types::{MealPlan, RecipeField};
use colored::Colorize;

fn join(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// All recipes with their ingredients.
pub fn recipes(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return format!("No {} available.\n", "recipes".blue());
    }

    let mut lines = vec![format!("{}:", "Available Recipes".green())];
    for recipe in catalog {
        lines.push(format!("  {}: {}", "ID".yellow(), recipe.id.cyan()));
        lines.push(format!("  {}: {}", "Name".yellow(), recipe.name.cyan()));
        lines.push(format!("  {}:", "Ingredients".yellow()));
        for ingredient in &recipe.ingredients {
            lines.push(format!("    - {}", ingredient.magenta()));
        }
        lines.push(format!(
            "  {}: {} minutes",
            "Preparation Time".yellow(),
            recipe.prep_time.to_string().cyan()
        ));
        lines.push(String::new());
    }
    join(lines)
}

/// Saved plans with per-recipe serving counts.
///
/// Names come from the catalog when the recipe still exists there, else from
/// the copy the plan holds.
pub fn meal_plans(plans: &[MealPlan], catalog: &Catalog) -> String {
    if plans.is_empty() {
        return format!("No {} available.\n", "meal plans".blue());
    }

    let rule = "------------------------".green().to_string();
    let mut lines = vec!["--- Saved Meal Plans ---".green().to_string()];
    for plan in plans {
        lines.push(format!(
            "{}: {}",
            "Meal Plan Date".yellow(),
            plan.date.to_string().cyan()
        ));
        let counts = aggregate::counted(plan);
        if counts.is_empty() {
            lines.push(format!("  (No {} in this plan)", "recipes".blue()));
        } else {
            lines.push(format!("  {}:", "Recipes".yellow()));
            for (id, count) in &counts {
                let name = catalog
                    .find(id)
                    .or_else(|| plan.portions.iter().map(|p| &p.recipe).find(|r| &r.id == id))
                    .map_or(id.as_str(), |r| r.name.as_str());
                lines.push(format!(
                    "    - {} (x{})",
                    name.magenta(),
                    count.to_string().cyan()
                ));
            }
        }
        lines.push(rule.clone());
        lines.push(String::new());
    }
    join(lines)
}

/// The prep list, with names looked up in the catalog.
pub fn prep_list(prep: &PrepList, catalog: &Catalog) -> String {
    if prep.is_empty() {
        return format!("{} is empty.\n", "Meal prep list".blue());
    }

    let mut lines = vec![format!("{}:", "Current Meal Prep List".green())];
    for (id, count) in prep.iter() {
        let line = match catalog.find(id) {
            Some(recipe) => format!(
                "  - {} ({}: {}), {}: {}",
                recipe.name.magenta(),
                "ID".yellow(),
                id.cyan(),
                "Count".yellow(),
                count.to_string().cyan()
            ),
            None => format!(
                "  - {} ({}: {}), {}: {} ({} not found)",
                "Unknown Recipe".red(),
                "ID".yellow(),
                id.cyan(),
                "Count".yellow(),
                count.to_string().cyan(),
                "Recipe details".blue()
            ),
        };
        lines.push(line);
    }
    join(lines)
}

pub fn recipe_added(id: &str) -> String {
    format!(
        "{} '{}' added {}!\n",
        "Recipe".blue(),
        id.cyan(),
        "successfully".green()
    )
}

pub fn recipe_deleted(id: &str, removed: usize) -> String {
    let suffix = if removed > 1 {
        format!(" ({} entries)", removed)
    } else {
        String::new()
    };
    format!(
        "{} with {} {} deleted {}{}!\n",
        "Recipe".blue(),
        "ID".yellow(),
        id.cyan(),
        "successfully".green(),
        suffix
    )
}

pub fn recipe_modified(id: &str, field: RecipeField) -> String {
    let what = match field {
        RecipeField::PrepTime => "Preparation time",
        RecipeField::Ingredients => "Ingredients",
    };
    format!(
        "{} updated {} for {}: {}\n",
        what.yellow(),
        "successfully".green(),
        "recipe ID".blue(),
        id.cyan()
    )
}

pub fn prep_added(id: &str, total: u32) -> String {
    format!(
        "{} '{}' added to {}. Current {}: {}\n",
        "Recipe ID".blue(),
        id.cyan(),
        "prep list".blue(),
        "count".yellow(),
        total.to_string().cyan()
    )
}

pub fn prep_modified(id: &str, change: PrepChange) -> String {
    match change {
        PrepChange::Updated(count) => format!(
            "{} for {} '{}' updated to {}\n",
            "Count".yellow(),
            "Recipe ID".blue(),
            id.cyan(),
            count.to_string().cyan()
        ),
        PrepChange::Removed => format!(
            "{} '{}' removed from {} ({} set to 0 or less).\n",
            "Recipe ID".blue(),
            id.cyan(),
            "prep list".blue(),
            "count".yellow()
        ),
    }
}

pub fn prep_deleted(id: &str) -> String {
    format!(
        "{} '{}' removed from {}.\n",
        "Recipe ID".blue(),
        id.cyan(),
        "prep list".blue()
    )
}

pub fn plan_outcome(outcome: &PlanOutcome) -> String {
    match outcome {
        PlanOutcome::EmptyPrepList => format!(
            "{} is empty. Nothing to create a {} from.\n",
            "Meal prep list".blue(),
            "meal plan".blue()
        ),
        PlanOutcome::Created {
            date,
            servings,
            dangling,
        } => {
            let mut lines = vec![format!(
                "{} for {}...",
                "Creating meal plan".green(),
                date.to_string().cyan()
            )];
            if !dangling.is_empty() {
                lines.push(format!(
                    "{}: skipped recipe IDs not in the catalog: {}",
                    "Warning".red(),
                    dangling.join(", ").cyan()
                ));
            }
            lines.push(format!(
                "{} created {} with {} serving(s) and {} cleared.",
                "Meal plan".blue(),
                "successfully".green(),
                servings.to_string().cyan(),
                "prep list".blue()
            ));
            join(lines)
        }
    }
}

pub fn store_error(err: &StoreError) -> String {
    format!("{}: {}\n", "Error".red(), err)
}
