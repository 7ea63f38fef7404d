//! GL-010: Error types.
//!
//! Three tiers: a bad file header drops that file (`HeaderError`), a bad
//! field drops one record (`SkipReason`), and a rejected command leaves the
//! collections untouched (`CommandError`). Only writes surface as
//! `StoreError`, and those are reported per file.

use std::path::PathBuf;
use thiserror::Error;

/// A mutator or aggregation command was rejected. No state was changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("recipe with ID '{id}' already exists; use modify-recipe to update it")]
    DuplicateRecipe { id: String },

    #[error("invalid recipe ID '{id}': must be non-empty with no whitespace")]
    InvalidRecipeId { id: String },

    #[error("invalid {field} {value:?}: must fit on one line")]
    MultilineText { field: &'static str, value: String },

    #[error("recipe with ID '{id}' not found")]
    RecipeNotFound { id: String },

    #[error("invalid modification type '{field}'; use 'prepTime' or 'ingredients'")]
    UnknownField { field: String },

    #[error("invalid preparation time '{value}'")]
    InvalidPrepTime { value: String },

    #[error("count must be a positive integer, got {count}")]
    NonPositiveCount { count: i64 },

    #[error("count {count} is out of range")]
    CountOutOfRange { count: i64 },

    #[error("recipe with ID '{id}' does not exist in the catalog")]
    UnknownRecipe { id: String },

    #[error("recipe ID '{id}' not found in prep list")]
    NotInPrepList { id: String },
}

/// Why one record was dropped while decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("unexpected end of input while reading {field}")]
    UnexpectedEof { field: &'static str },

    #[error("line {line}: empty recipe ID")]
    EmptyId { line: usize },

    #[error("line {line}: invalid recipe ID '{value}' (contains whitespace)")]
    InvalidId { line: usize, value: String },

    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        field: &'static str,
        line: usize,
        value: String,
    },

    #[error("line {line}: invalid date '{value}' (expected 'day month year')")]
    InvalidDate { line: usize, value: String },

    #[error("line {line}: invalid recipe entry '{value}' (expected 'id count')")]
    InvalidEntry { line: usize, value: String },
}

/// The leading record count of a file could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("missing record count")]
    Missing,

    #[error("invalid record count '{value}'")]
    Invalid { value: String },
}

/// A recoverable problem met while loading a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    #[error("could not open {}; starting with no {what}", .path.display())]
    MissingFile { path: PathBuf, what: &'static str },

    #[error("could not read {}: {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },

    #[error("{}: contains bytes that are not UTF-8; they were replaced", .path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("{}: {source}; ignoring the whole file", .path.display())]
    BadHeader { path: PathBuf, source: HeaderError },

    #[error("{}: skipped record {index}: {reason}", .path.display())]
    SkippedRecord {
        path: PathBuf,
        index: usize,
        reason: SkipReason,
    },

    #[error("{}: meal plan {plan}: skipped entry: {reason}", .path.display())]
    SkippedEntry {
        path: PathBuf,
        plan: usize,
        reason: SkipReason,
    },

    #[error("{}: recipe ID '{id}' not found in the catalog; skipping it in meal plan {plan}", .path.display())]
    DanglingReference {
        path: PathBuf,
        plan: usize,
        id: String,
    },

    #[error("{}: recipe ID '{id}' is not in the catalog", .path.display())]
    UnknownPrepEntry { path: PathBuf, id: String },
}

/// Writing a file failed. Other files are still saved.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `galley.toml` exists but cannot be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
