//! CSV catalog reader.
//!
//! Columns are recognised by header name, case-insensitively. Spreadsheet
//! exports use several conventions for the same field, and all of them are
//! merged into one list per item:
//!
//! | Field        | List-cell columns                      | One-per-cell columns      |
//! |--------------|----------------------------------------|---------------------------|
//! | categories   | `Type` `Types` `Category` `Categories` | `Category N`              |
//! |              |                                        | `category/N/name`         |
//! | requirements | `Recipe` `Ingredients`                 | `Ingredient N`            |
//! |              |                                        | `ingredient_set/N/ing`    |
//! | effects      | `Effects`                              | `Effect N`                |
//!
//! List cells are split on `;` or `,`. An `Include`, `Included` or `Enabled`
//! column drops rows whose value is falsy. Unrecognised columns are ignored.

use std::path::Path;

use tracing::debug;

use super::{LoadError, is_falsy, push_unique, split_list};
use crate::model::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Categories,
    Requirements,
    Effects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    /// A cell holding a `;`/`,` separated list.
    List(Field),
    /// A cell holding a single value.
    Single(Field),
    Include,
    Ignored,
}

fn is_numbered(rest: &str) -> bool {
    !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
}

fn classify(header: &str) -> Column {
    let header = header.trim().to_ascii_lowercase();
    match header.as_str() {
        "name" => return Column::Name,
        "type" | "types" | "category" | "categories" => return Column::List(Field::Categories),
        "recipe" | "ingredients" => return Column::List(Field::Requirements),
        "effects" => return Column::List(Field::Effects),
        "include" | "included" | "enabled" => return Column::Include,
        _ => {}
    }

    if let Some(rest) = header.strip_prefix("category ")
        && is_numbered(rest.trim())
    {
        return Column::Single(Field::Categories);
    }
    if let Some(rest) = header.strip_prefix("ingredient ")
        && is_numbered(rest.trim())
    {
        return Column::Single(Field::Requirements);
    }
    if let Some(rest) = header.strip_prefix("effect ")
        && is_numbered(rest.trim())
    {
        return Column::Single(Field::Effects);
    }

    let parts: Vec<&str> = header.split('/').collect();
    match parts.as_slice() {
        ["category", n, "name"] if is_numbered(n) => Column::Single(Field::Categories),
        ["ingredient_set", n, "ing"] if is_numbered(n) => Column::Single(Field::Requirements),
        _ => Column::Ignored,
    }
}

/// Parse CSV text with a header row into items.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] on malformed CSV and
/// [`LoadError::InvalidConfiguration`] when the name column is missing or a
/// row has an empty name.
pub fn parse(text: &str, path: &Path) -> Result<Vec<Item>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<Column> = reader
        .headers()
        .map_err(|err| LoadError::parse(path, err))?
        .iter()
        .map(classify)
        .collect();

    if !columns.contains(&Column::Name) {
        return Err(LoadError::invalid(path, "header", "missing `name` column"));
    }

    let mut items = Vec::new();
    let mut skipped = 0_usize;

    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| LoadError::parse(path, err))?;
        let line = record.position().map_or(idx as u64 + 2, csv::Position::line);

        let mut name = String::new();
        let mut categories = Vec::new();
        let mut requirements = Vec::new();
        let mut effects = Vec::new();
        let mut included = true;

        for (column, cell) in columns.iter().zip(record.iter()) {
            match column {
                Column::Name => {
                    if name.is_empty() {
                        cell.trim().clone_into(&mut name);
                    }
                }
                Column::List(field) => {
                    let target = select(*field, &mut categories, &mut requirements, &mut effects);
                    for entry in split_list(cell) {
                        push_unique(target, entry);
                    }
                }
                Column::Single(field) => {
                    let target = select(*field, &mut categories, &mut requirements, &mut effects);
                    push_unique(target, cell);
                }
                Column::Include => included = included && !is_falsy(cell),
                Column::Ignored => {}
            }
        }

        if !included {
            skipped += 1;
            continue;
        }
        if name.is_empty() {
            return Err(LoadError::invalid(path, format!("line {line}"), "empty item name"));
        }

        items.push(Item {
            name,
            categories,
            recipe_requirements: requirements,
            effects,
        });
    }

    debug!(items = items.len(), skipped, "csv rows parsed");
    Ok(items)
}

fn select<'v>(
    field: Field,
    categories: &'v mut Vec<String>,
    requirements: &'v mut Vec<String>,
    effects: &'v mut Vec<String>,
) -> &'v mut Vec<String> {
    match field {
        Field::Categories => categories,
        Field::Requirements => requirements,
        Field::Effects => effects,
    }
}
