//! `brands` command handlers.

use std::fmt::Write as _;
use std::path::Path;

use clap::Subcommand;
use hypewatch_core::BrandsFile;

/// Sub-commands available under `brands`.
#[derive(Debug, Subcommand)]
pub enum BrandsCommands {
    /// Print the configured roster
    List,
    /// Load and validate the roster file
    Validate,
}

/// # Errors
///
/// Returns an error if the roster cannot be read or fails validation.
pub(crate) fn run_brands_list(path: &Path) -> anyhow::Result<()> {
    let roster = hypewatch_core::load_brands(path)?;
    print!("{}", format_roster(&roster));
    Ok(())
}

/// # Errors
///
/// Returns the validation failure so the process exits non-zero.
pub(crate) fn run_brands_validate(path: &Path) -> anyhow::Result<()> {
    let roster = hypewatch_core::load_brands(path)?;
    let own = roster
        .own_brand()
        .map_or_else(|| "none".to_string(), |b| b.name.clone());
    println!(
        "{}: ok ({} brands, own brand: {own}, {} competitors)",
        path.display(),
        roster.brands.len(),
        roster.competitors().len()
    );
    Ok(())
}

pub(crate) fn format_roster(roster: &BrandsFile) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<24} {:<11} {:>4}  keywords",
        "name", "slug", "relation", "tier"
    );
    for brand in &roster.brands {
        let _ = writeln!(
            out,
            "{:<24} {:<24} {:<11} {:>4}  {}",
            brand.name,
            brand.slug(),
            brand.relationship,
            brand.tier,
            brand.keywords.join(", ")
        );
    }
    out
}
