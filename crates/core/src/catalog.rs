use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{domain::product::ProductRecord, errors::CatalogError};

#[derive(Clone, Debug, PartialEq, Eq)]
struct ManufacturerEntry {
    name: String,
    products: Vec<ProductRecord>,
}

/// Read-only manufacturer → product mapping. Manufacturer order is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductCatalog {
    manufacturers: Vec<ManufacturerEntry>,
}

impl ProductCatalog {
    pub fn new(
        manufacturers: impl IntoIterator<Item = (String, Vec<ProductRecord>)>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (name, products) in manufacturers {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(CatalogError::Invalid("manufacturer name must not be empty".to_owned()));
            }
            if !seen.insert(trimmed.to_owned()) {
                return Err(CatalogError::Invalid(format!("duplicate manufacturer `{trimmed}`")));
            }
            if products.iter().any(|product| product.name.trim().is_empty()) {
                return Err(CatalogError::Invalid(format!(
                    "manufacturer `{trimmed}` lists a product without a name"
                )));
            }
            entries.push(ManufacturerEntry { name: trimmed.to_owned(), products });
        }

        Ok(Self { manufacturers: entries })
    }

    pub fn builtin() -> Self {
        Self {
            manufacturers: vec![
                ManufacturerEntry {
                    name: "重庆药友".to_owned(),
                    products: vec![
                        ProductRecord::new(
                            "可乐必妥 左氧氟沙星片 0.5g*4片",
                            Some("抗生素"),
                            [
                                "原研品质",
                                "可乐必妥=阿莫西林+阿奇霉素",
                                "在肺部和泌尿的组织浓度高，对呼吸和泌尿系统的感染有着良好的效果",
                                "一天一片，服用更方便",
                            ],
                        ),
                        ProductRecord::new(
                            "阿拓莫兰 谷胱甘肽片 36片",
                            Some("肝病辅助用药"),
                            ["独家产品，临床带动", "高客单", "告客户粘性，慢乙肝顾客长期复购"],
                        ),
                    ],
                },
                ManufacturerEntry {
                    name: "达仁堂".to_owned(),
                    products: vec![ProductRecord::new(
                        "达仁堂 速效救心丸 120丸",
                        Some("心血管中成药"),
                        ["速效救心丸突出速效和救心，直击患者对快速奇效、急救的迫切需求。即使非医疗专业人士也能从名称直观理解其主要功效和场景"],
                    )],
                },
            ],
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let document = toml::from_str::<CatalogDocument>(raw)?;
        Self::new(document.manufacturers.into_iter().map(|entry| (entry.name, entry.products)))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn list_manufacturers(&self) -> Vec<&str> {
        self.manufacturers.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn list_products(&self, manufacturer: &str) -> Result<&[ProductRecord], CatalogError> {
        self.manufacturers
            .iter()
            .find(|entry| entry.name == manufacturer)
            .map(|entry| entry.products.as_slice())
            .ok_or_else(|| CatalogError::ManufacturerNotFound(manufacturer.to_owned()))
    }

    pub fn find_product(
        &self,
        manufacturer: &str,
        name: &str,
    ) -> Result<&ProductRecord, CatalogError> {
        self.list_products(manufacturer)?.iter().find(|product| product.name == name).ok_or_else(
            || CatalogError::ProductNotFound {
                manufacturer: manufacturer.to_owned(),
                product: name.to_owned(),
            },
        )
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    manufacturers: Vec<ManufacturerDocument>,
}

#[derive(Debug, Deserialize)]
struct ManufacturerDocument {
    name: String,
    #[serde(default)]
    products: Vec<ProductRecord>,
}
