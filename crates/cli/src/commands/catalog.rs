use serde_json::json;

use crate::commands::{catalog_failure, load_catalog, load_config, CommandResult, LoadedConfig};

pub fn manufacturers(loaded: &LoadedConfig) -> CommandResult {
    let config = match load_config("manufacturers", loaded) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let catalog = match load_catalog("manufacturers", config) {
        Ok(catalog) => catalog,
        Err(result) => return result,
    };

    let manufacturers = catalog.list_manufacturers();
    CommandResult::success_with_data(
        "manufacturers",
        format!("{} manufacturers available", manufacturers.len()),
        Some(json!(manufacturers)),
    )
}

pub fn products(loaded: &LoadedConfig, manufacturer: &str) -> CommandResult {
    let config = match load_config("products", loaded) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let catalog = match load_catalog("products", config) {
        Ok(catalog) => catalog,
        Err(result) => return result,
    };

    let products = match catalog.list_products(manufacturer) {
        Ok(products) => products,
        Err(error) => return catalog_failure("products", &error),
    };

    let entries: Vec<_> = products
        .iter()
        .map(|product| {
            json!({
                "name": product.name,
                "category": product.insight_category(),
                "selling_point_count": product.selling_points.len(),
            })
        })
        .collect();

    CommandResult::success_with_data(
        "products",
        format!("{} products listed for {manufacturer}", entries.len()),
        Some(json!(entries)),
    )
}
