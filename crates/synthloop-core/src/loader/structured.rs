//! YAML / JSON / TOML catalog reader.
//!
//! All three share one document shape, a top-level `items` list:
//!
//! ```yaml
//! items:
//!   - Name: Craft
//!     Type: [(Gunpowder), (Bombs)]
//!     Recipe: [(Gunpowder), (Fuel)]
//!   - name: Kindling Coal
//!     categories: (Fuel)
//!     include: false
//! ```
//!
//! Field names accept the lowercase form and the capitalised spreadsheet
//! form. List fields may be a sequence or a single `;`/`,` separated string.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{CatalogFormat, LoadError, push_unique, split_list};
use crate::model::Item;

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    items: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    #[serde(default, alias = "Name")]
    name: Option<String>,
    #[serde(
        default,
        alias = "Type",
        alias = "Types",
        alias = "types",
        alias = "Categories"
    )]
    categories: Option<ListField>,
    #[serde(
        default,
        alias = "Recipe",
        alias = "ingredients",
        alias = "Ingredients"
    )]
    recipe: Option<ListField>,
    #[serde(default, alias = "Effects")]
    effects: Option<ListField>,
    #[serde(default = "default_include", alias = "Include", alias = "enabled")]
    include: bool,
}

const fn default_include() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListField {
    Many(Vec<String>),
    One(String),
}

impl ListField {
    fn flatten(field: Option<Self>) -> Vec<String> {
        let mut out = Vec::new();
        match field {
            Some(Self::Many(values)) => {
                for value in &values {
                    push_unique(&mut out, value);
                }
            }
            Some(Self::One(cell)) => {
                for entry in split_list(&cell) {
                    push_unique(&mut out, entry);
                }
            }
            None => {}
        }
        out
    }
}

/// Parse a structured catalog document.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] when the document does not deserialize and
/// [`LoadError::InvalidConfiguration`] for a record without a name.
pub fn parse(text: &str, format: CatalogFormat, path: &Path) -> Result<Vec<Item>, LoadError> {
    let document: CatalogDocument = match format {
        CatalogFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|err| LoadError::parse(path, err))?
        }
        CatalogFormat::Json => {
            serde_json::from_str(text).map_err(|err| LoadError::parse(path, err))?
        }
        CatalogFormat::Toml => toml::from_str(text).map_err(|err| LoadError::parse(path, err))?,
        CatalogFormat::Csv => {
            return Err(LoadError::parse(path, "csv is not a structured format"));
        }
    };

    let mut items = Vec::with_capacity(document.items.len());
    let mut skipped = 0_usize;

    for (idx, record) in document.items.into_iter().enumerate() {
        if !record.include {
            skipped += 1;
            continue;
        }
        let name = record.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(LoadError::invalid(path, format!("record {idx}"), "empty item name"));
        }
        items.push(Item {
            name: name.to_string(),
            categories: ListField::flatten(record.categories),
            recipe_requirements: ListField::flatten(record.recipe),
            effects: ListField::flatten(record.effects),
        });
    }

    debug!(%format, items = items.len(), skipped, "structured records parsed");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn yaml_with_capitalised_fields() {
        let text = "\
items:
  - Name: Craft
    Type: [(Gunpowder), (Bombs)]
    Recipe: [(Gunpowder), (Fuel), (Gunpowder)]
  - Name: Uni
    Type: [(Plants), (Gunpowder)]
    Recipe: []
";
        let items = parse(text, CatalogFormat::Yaml, Path::new("items.yaml")).expect("parse");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].categories, vec!["(Gunpowder)", "(Bombs)"]);
        assert_eq!(items[0].recipe_requirements, vec!["(Gunpowder)", "(Fuel)"]);
        assert!(items[1].recipe_requirements.is_empty());
    }

    #[test]
    fn json_with_string_lists_and_include() {
        let text = r#"{"items": [
            {"name": "Ingot", "categories": "(Metal); (Ingredients)", "ingredients": ["(Ore)"]},
            {"name": "Hidden", "include": false}
        ]}"#;
        let items = parse(text, CatalogFormat::Json, Path::new("items.json")).expect("parse");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].categories, vec!["(Metal)", "(Ingredients)"]);
        assert_eq!(items[0].recipe_requirements, vec!["(Ore)"]);
    }

    #[test]
    fn toml_array_of_tables() {
        let text = "\
[[items]]
name = \"Bomb\"
categories = [\"(Bombs)\"]
recipe = [\"(Gunpowder)\"]
effects = [\"Blast\"]
";
        let items = parse(text, CatalogFormat::Toml, Path::new("items.toml")).expect("parse");
        assert_eq!(items[0].name, "Bomb");
        assert_eq!(items[0].effects, vec!["Blast"]);
    }

    #[test]
    fn missing_name_reports_record_index() {
        let text = "items:\n  - Name: Ok\n  - Type: [(Ore)]\n";
        let err = parse(text, CatalogFormat::Yaml, Path::new("items.yaml")).expect_err("no name");
        assert_eq!(err.code(), ErrorCode::InvalidRecord);
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn malformed_document_is_parse_error() {
        let err = parse("{not json", CatalogFormat::Json, Path::new("items.json"))
            .expect_err("malformed");
        assert_eq!(err.code(), ErrorCode::ConfigParseError);
    }
}
