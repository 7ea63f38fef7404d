//! Galley — a recipe catalog, a prep list and a meal-plan history kept in
//! plain line-oriented text files.
//!
//! Every run loads all three files, performs one command and writes them
//! back.

pub mod cli;
pub mod core;
