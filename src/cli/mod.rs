//! GL-008: CLI subcommands — recipes, prep list, meal plans.
//!
//! Every command loads the three data files, runs once against the loaded
//! kitchen and saves all three files again, even when the command itself
//! was rejected.

pub mod render;

use crate::core::aggregate;
use crate::core::config::DataPaths;
use crate::core::error::{CommandError, ConfigError};
use crate::core::store::Kitchen;
use crate::core::types::{PlanDate, Recipe};
use clap::Subcommand;
use thiserror::Error;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every recipe in the catalog
    #[command(alias = "view_recipes")]
    ViewRecipes,

    /// Add a recipe to the catalog
    #[command(alias = "add_recipe")]
    AddRecipe {
        /// Recipe ID (one word, unique)
        id: String,

        /// Display name
        name: String,

        /// Preparation time in minutes
        prep_time: u32,

        /// Ingredients, one argument each
        ingredients: Vec<String>,
    },

    /// Delete a recipe from the catalog
    #[command(alias = "delete_recipe")]
    DeleteRecipe {
        /// Recipe ID
        id: String,
    },

    /// Replace a recipe's preparation time or ingredient list
    #[command(alias = "modify_recipe")]
    ModifyRecipe {
        /// Recipe ID
        id: String,

        /// Field to replace: prepTime or ingredients
        field: String,

        /// New value; ingredients are comma-separated
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Show saved meal plans
    #[command(alias = "view_meal_plans")]
    ViewMealPlans,

    /// Show the prep list
    #[command(alias = "view_prep_list")]
    ViewPrepList,

    /// Queue servings of a recipe (adds to any already queued)
    #[command(alias = "add_to_prep_list")]
    AddToPrepList {
        /// Recipe ID
        id: String,

        /// Servings to add
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },

    /// Set the queued count of a recipe; zero or less removes it
    #[command(alias = "modify_prep_list_count")]
    ModifyPrepListCount {
        /// Recipe ID
        id: String,

        /// New count
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },

    /// Remove a recipe from the prep list
    #[command(alias = "delete_from_prep_list")]
    DeleteFromPrepList {
        /// Recipe ID
        id: String,
    },

    /// Turn the prep list into a meal plan dated today and clear it
    #[command(alias = "create_meal_plan")]
    CreateMealPlan,
}

/// Why a run ended unsuccessfully.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{count} data file(s) could not be saved")]
    Save { count: usize },
}

/// Load, run one command, save.
pub fn dispatch(cmd: Commands, paths: &DataPaths) -> Result<(), CliError> {
    let (mut kitchen, warnings) = Kitchen::load(paths);
    tracing::debug!(warnings = warnings.len(), "data files loaded");

    let result = execute(cmd, &mut kitchen, PlanDate::today());
    if let Ok(output) = &result {
        print!("{}", output);
    }

    let failures = kitchen.save(paths);
    for failure in &failures {
        eprint!("{}", render::store_error(failure));
    }

    result?;
    if !failures.is_empty() {
        return Err(CliError::Save {
            count: failures.len(),
        });
    }
    Ok(())
}

/// Run one command against a loaded kitchen and return what to print.
///
/// `today` dates a plan created by `create-meal-plan`. On error, nothing in
/// the kitchen has changed.
pub fn execute(
    cmd: Commands,
    kitchen: &mut Kitchen,
    today: PlanDate,
) -> Result<String, CommandError> {
    match cmd {
        Commands::ViewRecipes => Ok(render::recipes(&kitchen.catalog)),
        Commands::AddRecipe {
            id,
            name,
            prep_time,
            ingredients,
        } => {
            kitchen
                .catalog
                .add(Recipe::new(id.clone(), name, ingredients, prep_time))?;
            Ok(render::recipe_added(&id))
        }
        Commands::DeleteRecipe { id } => {
            let removed = kitchen.catalog.delete(&id)?;
            Ok(render::recipe_deleted(&id, removed))
        }
        Commands::ModifyRecipe { id, field, value } => {
            let field = kitchen.catalog.modify(&id, &field, &value)?;
            Ok(render::recipe_modified(&id, field))
        }
        Commands::ViewMealPlans => Ok(render::meal_plans(&kitchen.plans, &kitchen.catalog)),
        Commands::ViewPrepList => Ok(render::prep_list(&kitchen.prep, &kitchen.catalog)),
        Commands::AddToPrepList { id, count } => {
            let total = kitchen.prep.add(&kitchen.catalog, &id, count)?;
            Ok(render::prep_added(&id, total))
        }
        Commands::ModifyPrepListCount { id, count } => {
            let change = kitchen.prep.modify(&id, count)?;
            Ok(render::prep_modified(&id, change))
        }
        Commands::DeleteFromPrepList { id } => {
            kitchen.prep.delete(&id)?;
            Ok(render::prep_deleted(&id))
        }
        Commands::CreateMealPlan => {
            let outcome = aggregate::create_meal_plan(
                &mut kitchen.prep,
                &mut kitchen.plans,
                &kitchen.catalog,
                today,
            );
            Ok(render::plan_outcome(&outcome))
        }
    }
}
