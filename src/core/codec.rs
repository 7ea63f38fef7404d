//! GL-002: Line-oriented record codec for recipes, meal plans and the prep list.
//!
//! Decoding is positional and tolerant:
//! - Recipe and meal-plan files start with a record count. If it cannot be
//!   read the whole file is ignored (`HeaderError`).
//! - Each record is decoded by `RecordReader`, which yields
//!   `Result<Record, SkipReason>`. A malformed field drops that record only;
//!   the line holding the bad field is consumed and the next record starts
//!   on the following line.
//! - A malformed `id count` entry inside a meal plan drops the entry, not the
//!   plan.
//! - Prep-list lines that do not parse are dropped.
//!
//! Encoding always writes the counted shape, sorted by recipe ID.

use super::aggregate;
use super::error::{HeaderError, SkipReason};
use super::prep::PrepList;
use super::types::{MealPlan, PlanDate, Recipe};
use std::io::{self, Write};
use std::iter::Peekable;
use std::str::{FromStr, Lines};

// ============================================================================
// Line cursor
// ============================================================================

/// Cursor over the lines of a record file, tracking 1-based line numbers.
pub struct LineCursor<'a> {
    lines: Peekable<Lines<'a>>,
    line_no: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().peekable(),
            line_no: 0,
        }
    }

    /// True once every line has been consumed.
    pub fn is_exhausted(&mut self) -> bool {
        self.lines.peek().is_none()
    }

    /// Consume the next line.
    pub fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.next()?;
        self.line_no += 1;
        Some((self.line_no, line))
    }

    /// Read the leading record count, skipping blank lines before it.
    pub fn header(&mut self) -> Result<usize, HeaderError> {
        while let Some((_, line)) = self.next_line() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return trimmed.parse().map_err(|_| HeaderError::Invalid {
                value: trimmed.to_string(),
            });
        }
        Err(HeaderError::Missing)
    }

    /// Consume one required line.
    fn field(&mut self, field: &'static str) -> Result<(usize, &'a str), SkipReason> {
        self.next_line().ok_or(SkipReason::UnexpectedEof { field })
    }

    /// Consume one line holding a single number.
    fn number<T: FromStr>(&mut self, field: &'static str) -> Result<T, SkipReason> {
        let (line, text) = self.field(field)?;
        text.trim().parse().map_err(|_| SkipReason::InvalidNumber {
            field,
            line,
            value: text.to_string(),
        })
    }
}

// ============================================================================
// Record reader
// ============================================================================

/// Decodes up to `declared` records, one `Result` per record slot.
///
/// A truncated file yields a single `UnexpectedEof` and then stops instead of
/// reporting every missing slot.
pub struct RecordReader<'a, T> {
    cursor: LineCursor<'a>,
    remaining: usize,
    decode: fn(&mut LineCursor<'a>) -> Result<T, SkipReason>,
    eof_field: &'static str,
}

impl<'a, T> Iterator for RecordReader<'a, T> {
    type Item = Result<T, SkipReason>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        if self.cursor.is_exhausted() {
            self.remaining = 0;
            return Some(Err(SkipReason::UnexpectedEof {
                field: self.eof_field,
            }));
        }
        self.remaining -= 1;
        Some((self.decode)(&mut self.cursor))
    }
}

/// Read the record count and return a reader over the recipe records.
pub fn recipe_reader(text: &str) -> Result<RecordReader<'_, Recipe>, HeaderError> {
    let mut cursor = LineCursor::new(text);
    let declared = cursor.header()?;
    Ok(RecordReader {
        cursor,
        remaining: declared,
        decode: decode_recipe,
        eof_field: "recipe ID",
    })
}

/// Read the record count and return a reader over the meal-plan records.
pub fn meal_plan_reader(text: &str) -> Result<RecordReader<'_, PlanRecord>, HeaderError> {
    let mut cursor = LineCursor::new(text);
    let declared = cursor.header()?;
    Ok(RecordReader {
        cursor,
        remaining: declared,
        decode: decode_plan,
        eof_field: "plan date",
    })
}

// ============================================================================
// Recipes
// ============================================================================

/// id, name, ingredient count, ingredients (verbatim), prep time.
fn decode_recipe(cursor: &mut LineCursor<'_>) -> Result<Recipe, SkipReason> {
    let (line, id) = cursor.field("recipe ID")?;
    if id.is_empty() {
        return Err(SkipReason::EmptyId { line });
    }
    let (_, name) = cursor.field("recipe name")?;
    let ingredient_count: usize = cursor.number("ingredient count")?;

    // Not preallocated: the count comes from the file.
    let mut ingredients = Vec::new();
    for _ in 0..ingredient_count {
        let (_, ingredient) = cursor.field("ingredient")?;
        ingredients.push(ingredient.to_string());
    }

    let prep_time: u32 = cursor.number("preparation time")?;

    // Checked last so the whole record is consumed.
    if id.chars().any(char::is_whitespace) {
        return Err(SkipReason::InvalidId {
            line,
            value: id.to_string(),
        });
    }
    Ok(Recipe {
        id: id.to_string(),
        name: name.to_string(),
        ingredients,
        prep_time,
    })
}

/// Encode the catalog in iteration order.
pub fn encode_catalog<'a, W, I>(out: &mut W, recipes: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Recipe>,
    I::IntoIter: ExactSizeIterator,
{
    let recipes = recipes.into_iter();
    writeln!(out, "{}", recipes.len())?;
    for recipe in recipes {
        writeln!(out, "{}", recipe.id)?;
        writeln!(out, "{}", recipe.name)?;
        writeln!(out, "{}", recipe.ingredients.len())?;
        for ingredient in &recipe.ingredients {
            writeln!(out, "{}", ingredient)?;
        }
        writeln!(out, "{}", recipe.prep_time)?;
    }
    Ok(())
}

// ============================================================================
// Meal plans
// ============================================================================

/// A meal plan as stored on disk: a date and its counted entries, not yet
/// resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRecord {
    pub date: PlanDate,

    /// `(recipe ID, quantity)` in file order; quantities are positive
    pub entries: Vec<(String, u32)>,

    /// Entries dropped while reading this plan
    pub skipped: Vec<SkipReason>,
}

/// "day month year", entry count, then `id count` lines.
fn decode_plan(cursor: &mut LineCursor<'_>) -> Result<PlanRecord, SkipReason> {
    let (line, text) = cursor.field("plan date")?;
    let date = parse_date(text).ok_or_else(|| SkipReason::InvalidDate {
        line,
        value: text.to_string(),
    })?;
    let entry_count: usize = cursor.number("recipe entry count")?;

    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    for _ in 0..entry_count {
        let (line, text) = match cursor.field("recipe entry") {
            Ok(field) => field,
            Err(eof) => {
                skipped.push(eof);
                break;
            }
        };
        match parse_entry(line, text) {
            Ok((id, quantity)) => entries.push((id.to_string(), quantity)),
            Err(reason) => skipped.push(reason),
        }
    }

    Ok(PlanRecord {
        date,
        entries,
        skipped,
    })
}

fn parse_date(text: &str) -> Option<PlanDate> {
    let mut parts = text.split_whitespace();
    let day = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let year = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(PlanDate { day, month, year })
}

/// Parse an `id count` line. The count must be a positive `u32`.
pub fn parse_entry(line: usize, text: &str) -> Result<(&str, u32), SkipReason> {
    let invalid = || SkipReason::InvalidEntry {
        line,
        value: text.to_string(),
    };
    let mut parts = text.split_whitespace();
    let id = parts.next().ok_or_else(invalid)?;
    let count = parts.next().ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    match count.parse::<u32>() {
        Ok(n) if n > 0 => Ok((id, n)),
        _ => Err(SkipReason::InvalidNumber {
            field: "recipe quantity",
            line,
            value: count.to_string(),
        }),
    }
}

/// Encode meal plans, each collapsed to sorted `id count` lines.
pub fn encode_meal_plans<W: Write>(out: &mut W, plans: &[MealPlan]) -> io::Result<()> {
    writeln!(out, "{}", plans.len())?;
    for plan in plans {
        let d = plan.date;
        writeln!(out, "{} {} {}", d.day, d.month, d.year)?;
        let counts = aggregate::counted(plan);
        writeln!(out, "{}", counts.len())?;
        for (id, count) in &counts {
            writeln!(out, "{} {}", id, count)?;
        }
    }
    Ok(())
}

// ============================================================================
// Prep list
// ============================================================================

/// Decode a prep list. No header; one `id count` per line, last one wins.
///
/// Returns the list plus the reasons for every non-blank line that was
/// dropped.
pub fn decode_prep_list(text: &str) -> (PrepList, Vec<SkipReason>) {
    let mut prep = PrepList::new();
    let mut skipped = Vec::new();
    let mut cursor = LineCursor::new(text);
    while let Some((line, text)) = cursor.next_line() {
        if text.trim().is_empty() {
            continue;
        }
        match parse_entry(line, text) {
            Ok((id, count)) => prep.set(id, count),
            Err(reason) => skipped.push(reason),
        }
    }
    (prep, skipped)
}

/// Encode a prep list, sorted by recipe ID, without a count line.
pub fn encode_prep_list<W: Write>(out: &mut W, prep: &PrepList) -> io::Result<()> {
    for (id, count) in prep.iter() {
        writeln!(out, "{} {}", id, count)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
