use std::path::Path;

use rust_decimal::Decimal;

use super::*;

fn brand(name: &str, relationship: Relationship, tier: u8) -> BrandConfig {
    BrandConfig {
        name: name.to_string(),
        relationship,
        tier,
        keywords: vec![],
        price_range: None,
        notes: None,
    }
}

#[test]
fn slug_simple_name() {
    assert_eq!(
        brand("Diamond Supply Co", Relationship::Competitor, 2).slug(),
        "diamond-supply-co"
    );
}

#[test]
fn slug_ampersand_becomes_and() {
    assert_eq!(
        brand("Crooks & Castles", Relationship::Own, 2).slug(),
        "crooks-and-castles"
    );
}

#[test]
fn slug_strips_non_ascii() {
    // ü is stripped; no dash inserted between adjacent ASCII chars
    assert_eq!(brand("Stüssy", Relationship::Competitor, 1).slug(), "stssy");
}

#[test]
fn slug_strips_punctuation() {
    assert_eq!(
        brand("Billionaire Boys' Club", Relationship::Competitor, 2).slug(),
        "billionaire-boys-club"
    );
}

#[test]
fn match_terms_include_name_and_dedupe() {
    let mut b = brand("Supreme", Relationship::Competitor, 1);
    b.keywords = vec!["supreme".into(), "Box Logo".into()];
    assert_eq!(b.match_terms(), vec!["supreme", "box logo"]);
}

#[test]
fn validate_rejects_invalid_tier() {
    let brands_file = BrandsFile {
        brands: vec![brand("Test Brand", Relationship::Competitor, 5)],
    };
    let err = validate_brands(&brands_file).unwrap_err();
    assert!(err.to_string().contains("invalid tier 5"));
}

#[test]
fn validate_rejects_empty_name() {
    let brands_file = BrandsFile {
        brands: vec![brand("  ", Relationship::Competitor, 1)],
    };
    let err = validate_brands(&brands_file).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn validate_rejects_duplicate_name() {
    let brands_file = BrandsFile {
        brands: vec![
            brand("Palace", Relationship::Competitor, 1),
            brand("palace", Relationship::Competitor, 2),
        ],
    };
    let err = validate_brands(&brands_file).unwrap_err();
    assert!(err.to_string().contains("duplicate brand name"));
}

#[test]
fn validate_rejects_duplicate_slug() {
    let brands_file = BrandsFile {
        brands: vec![
            brand("Crooks & Castles", Relationship::Own, 2),
            brand("Crooks and Castles", Relationship::Competitor, 1),
        ],
    };
    let err = validate_brands(&brands_file).unwrap_err();
    assert!(err.to_string().contains("duplicate brand slug"));
}

#[test]
fn validate_rejects_blank_keyword() {
    let mut b = brand("Hellstar", Relationship::Competitor, 3);
    b.keywords = vec!["hellstar".into(), "   ".into()];
    let err = validate_brands(&BrandsFile { brands: vec![b] }).unwrap_err();
    assert!(err.to_string().contains("blank keyword"));
}

#[test]
fn validate_rejects_inverted_price_range() {
    let mut b = brand("BAPE", Relationship::Competitor, 1);
    b.price_range = Some(PriceRange {
        min: Decimal::new(600, 0),
        max: Decimal::new(80, 0),
    });
    let err = validate_brands(&BrandsFile { brands: vec![b] }).unwrap_err();
    assert!(err.to_string().contains("price_range"));
}

#[test]
fn validate_rejects_two_own_brands() {
    let brands_file = BrandsFile {
        brands: vec![
            brand("Crooks & Castles", Relationship::Own, 2),
            brand("Supreme", Relationship::Own, 1),
        ],
    };
    let err = validate_brands(&brands_file).unwrap_err();
    assert!(err.to_string().contains("only one brand may be 'own'"));
}

#[test]
fn parse_brands_reads_price_range_strings() {
    let yaml = r#"
brands:
  - name: Crooks & Castles
    relationship: own
    tier: 2
    keywords: ["crooks"]
    price_range: { min: "35.00", max: "150.00" }
  - name: Supreme
    relationship: competitor
    tier: 1
"#;
    let file = parse_brands(yaml).expect("valid yaml");
    assert_eq!(file.brands.len(), 2);
    let own = file.own_brand().expect("own brand");
    assert_eq!(own.slug(), "crooks-and-castles");
    let range = own.price_range.as_ref().expect("price range");
    assert_eq!(range.min, Decimal::new(3500, 2));
    assert_eq!(file.competitors().len(), 1);
    assert!(file.find_by_slug("supreme").is_some());
    assert!(file.find_by_slug("palace").is_none());
}

#[test]
fn parse_brands_rejects_unknown_relationship() {
    let yaml = "brands:\n  - name: X\n    relationship: partner\n    tier: 1\n";
    assert!(matches!(
        parse_brands(yaml),
        Err(ConfigError::BrandsFileParse(_))
    ));
}

#[test]
fn load_brands_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("brands.yaml");
    assert!(
        path.exists(),
        "brands.yaml missing at {path:?}; required for this test"
    );
    let result = load_brands(&path);
    assert!(result.is_ok(), "failed to load brands.yaml: {result:?}");
    let brands_file = result.unwrap();
    assert!(!brands_file.brands.is_empty());
    assert_eq!(
        brands_file.own_brand().map(BrandConfig::slug).as_deref(),
        Some("crooks-and-castles")
    );
}

#[test]
fn load_brands_missing_file_is_io_error() {
    let err = load_brands(Path::new("/nonexistent/brands.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::BrandsFileIo { .. }));
}

#[test]
fn relationship_display_and_parse() {
    assert_eq!(Relationship::Own.to_string(), "own");
    assert_eq!(Relationship::Competitor.to_string(), "competitor");
    assert_eq!("own".parse::<Relationship>(), Ok(Relationship::Own));
    assert!("portfolio".parse::<Relationship>().is_err());
}
