use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Own,
    Competitor,
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relationship::Own => write!(f, "own"),
            Relationship::Competitor => write!(f, "competitor"),
        }
    }
}

impl std::str::FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "own" => Ok(Relationship::Own),
            "competitor" => Ok(Relationship::Competitor),
            other => Err(format!(
                "relationship must be 'own' or 'competitor', got '{other}'"
            )),
        }
    }
}

/// Typical retail price band for a brand, in USD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    pub name: String,
    pub relationship: Relationship,
    pub tier: u8,
    /// Lowercase match terms. The brand name itself is always matched too.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BrandConfig {
    /// Generate a URL-safe slug from the brand name.
    #[must_use]
    pub fn slug(&self) -> String {
        slug_from_name(&self.name)
    }

    /// Match terms for this brand: its name plus configured keywords,
    /// lowercased and deduplicated.
    #[must_use]
    pub fn match_terms(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(self.name.as_str())
            .chain(self.keywords.iter().map(String::as_str))
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .filter(|k| seen.insert(k.clone()))
            .collect()
    }
}

/// Generate a URL-safe slug from an arbitrary display name.
///
/// `&` becomes `and` so "Crooks & Castles" slugs to `crooks-and-castles`.
#[must_use]
pub fn slug_from_name(name: &str) -> String {
    name.to_lowercase()
        .replace('&', " and ")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c.is_whitespace() {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Deserialize)]
pub struct BrandsFile {
    pub brands: Vec<BrandConfig>,
}

impl BrandsFile {
    /// The brand the dashboard reports for, if one is configured.
    #[must_use]
    pub fn own_brand(&self) -> Option<&BrandConfig> {
        self.brands
            .iter()
            .find(|b| b.relationship == Relationship::Own)
    }

    #[must_use]
    pub fn competitors(&self) -> Vec<&BrandConfig> {
        self.brands
            .iter()
            .filter(|b| b.relationship == Relationship::Competitor)
            .collect()
    }

    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&BrandConfig> {
        self.brands.iter().find(|b| b.slug() == slug)
    }
}

/// Load and validate the brands configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brands(path: &Path) -> Result<BrandsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_brands(&content)
}

/// Parse and validate a brands YAML document.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_brands(content: &str) -> Result<BrandsFile, ConfigError> {
    let brands_file: BrandsFile =
        serde_yaml::from_str(content).map_err(ConfigError::BrandsFileParse)?;

    validate_brands(&brands_file)?;

    Ok(brands_file)
}

fn validate_brands(brands_file: &BrandsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();
    let mut own_count = 0;

    for brand in &brands_file.brands {
        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }

        if ![1, 2, 3].contains(&brand.tier) {
            return Err(ConfigError::Validation(format!(
                "brand '{}' has invalid tier {}; must be 1, 2, or 3",
                brand.name, brand.tier
            )));
        }

        if brand.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "brand '{}' has a blank keyword",
                brand.name
            )));
        }

        if let Some(range) = &brand.price_range {
            if range.min > range.max {
                return Err(ConfigError::Validation(format!(
                    "brand '{}' has price_range min {} above max {}",
                    brand.name, range.min, range.max
                )));
            }
        }

        if brand.relationship == Relationship::Own {
            own_count += 1;
            if own_count > 1 {
                return Err(ConfigError::Validation(format!(
                    "only one brand may be 'own'; '{}' is a second",
                    brand.name
                )));
            }
        }

        let lower_name = brand.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{}'",
                brand.name
            )));
        }

        let slug = brand.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "brand '{}' produces an empty slug",
                brand.name
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand slug: '{}' (from brand '{}')",
                slug, brand.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "brands_test.rs"]
mod tests;
