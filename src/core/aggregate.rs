//! GL-005: Aggregation — moving between counted and expanded recipe lists.
//!
//! - `expand`: `(id, count)` pairs → portions, resolved against the catalog.
//!   IDs missing from the catalog are reported as dangling and dropped.
//! - `collapse`: expanded recipes → `id → count`, sorted by ID. This is the
//!   shape written to disk.
//! - `create_meal_plan`: expand the prep list into a new dated plan, then
//!   clear the prep list.

use super::catalog::Catalog;
use super::prep::PrepList;
use super::types::{MealPlan, PlanDate, Portion, Recipe};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Result of resolving counted pairs against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// One portion per distinct resolved ID, in first-seen order
    pub portions: Vec<Portion>,

    /// IDs not found in the catalog, in input order
    pub dangling: Vec<String>,
}

impl Expansion {
    /// Full recipe copies, one per serving.
    pub fn materialize(&self) -> Vec<Recipe> {
        self.portions
            .iter()
            .flat_map(|p| std::iter::repeat(p.recipe.clone()).take(p.quantity as usize))
            .collect()
    }
}

/// Resolve `(id, count)` pairs into portions.
///
/// Repeated IDs are merged. Zero counts contribute nothing.
pub fn expand<'a, I>(counts: I, catalog: &Catalog) -> Expansion
where
    I: IntoIterator<Item = (&'a str, u32)>,
{
    let mut portions: IndexMap<&str, Portion> = IndexMap::new();
    let mut dangling = Vec::new();

    for (id, count) in counts {
        if count == 0 {
            continue;
        }
        if let Some(portion) = portions.get_mut(id) {
            portion.quantity = portion.quantity.saturating_add(count);
            continue;
        }
        match catalog.find(id) {
            Some(recipe) => {
                portions.insert(
                    id,
                    Portion {
                        recipe: recipe.clone(),
                        quantity: count,
                    },
                );
            }
            None => dangling.push(id.to_string()),
        }
    }

    Expansion {
        portions: portions.into_values().collect(),
        dangling,
    }
}

/// Tally recipes by ID. Only the counts survive.
pub fn collapse<'a, I>(recipes: I) -> BTreeMap<String, u32>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut counts = BTreeMap::new();
    for recipe in recipes {
        *counts.entry(recipe.id.clone()).or_insert(0) += 1;
    }
    counts
}

/// The counted form of a plan, without walking every serving.
pub fn counted(plan: &MealPlan) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for portion in plan.portions.iter().filter(|p| p.quantity > 0) {
        let slot = counts.entry(portion.recipe.id.clone()).or_insert(0);
        *slot = slot.saturating_add(portion.quantity);
    }
    counts
}

/// What `create_meal_plan` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Nothing queued; no plan was created and the prep list is untouched.
    EmptyPrepList,

    Created {
        date: PlanDate,
        servings: u32,
        dangling: Vec<String>,
    },
}

/// Turn the prep list into a meal plan dated `date` and append it to `plans`.
///
/// The prep list is consumed: it is empty afterwards, including any dangling
/// IDs it held.
pub fn create_meal_plan(
    prep: &mut PrepList,
    plans: &mut Vec<MealPlan>,
    catalog: &Catalog,
    date: PlanDate,
) -> PlanOutcome {
    if prep.is_empty() {
        return PlanOutcome::EmptyPrepList;
    }

    let queued = prep.take();
    let expansion = expand(queued.iter().map(|(id, n)| (id.as_str(), *n)), catalog);
    for id in &expansion.dangling {
        tracing::warn!(recipe = %id, "recipe ID not found in catalog; skipping it for the meal plan");
    }
    let plan = MealPlan::new(date, expansion.portions);
    let servings = plan.servings();
    tracing::info!(%date, servings, "meal plan created");
    plans.push(plan);

    PlanOutcome::Created {
        date,
        servings,
        dangling: expansion.dangling,
    }
}
