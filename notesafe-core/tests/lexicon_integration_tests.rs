// notesafe-core/tests/lexicon_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use notesafe_core::{merge_lexicons, Category, Detector, Lexicon};

#[test]
fn test_load_default_lexicon() {
    let lexicon = Lexicon::load_default().unwrap();
    assert!(lexicon.street_suffixes.iter().any(|s| s == "Street"));
    assert!(lexicon.place_names.iter().any(|p| p == "Sydney"));
    assert!(lexicon.place_names.iter().any(|p| p == "Gold Coast"));
    assert!(lexicon.common_words.iter().any(|w| w == "Monday"));
    assert!(lexicon.common_words.iter().any(|w| w == "Medication"));
    assert_eq!(lexicon.postcode_min, 800);
    assert_eq!(lexicon.postcode_max, 9999);
    assert!(lexicon.disabled_categories.is_empty());
}

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
phone_patterns:
  - '0[0-9]{9}'
place_names:
  - Auckland
  - Wellington
postcode_min: 1000
postcode_max: 9999
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let lexicon = Lexicon::load_from_file(file.path())?;
    assert_eq!(lexicon.phone_patterns, vec!["0[0-9]{9}".to_string()]);
    assert_eq!(lexicon.place_names.len(), 2);
    assert_eq!(lexicon.postcode_min, 1000);
    // Omitted lists fall back to empty, omitted range fields to the defaults.
    assert!(lexicon.street_suffixes.is_empty());
    assert!(lexicon.common_words.is_empty());
    Ok(())
}

#[test]
fn test_load_from_file_rejects_invalid_phone_pattern() -> Result<()> {
    let yaml_content = r#"
phone_patterns:
  - '('
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let err = Lexicon::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Lexicon validation failed"));
    Ok(())
}

#[test]
fn test_load_from_file_rejects_inverted_postcode_range() -> Result<()> {
    let yaml_content = r#"
postcode_min: 5000
postcode_max: 800
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let err = Lexicon::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Postcode range is inverted"));
    Ok(())
}

#[test]
fn test_load_from_file_rejects_duplicate_entries() -> Result<()> {
    let yaml_content = r#"
place_names:
  - Sydney
  - Sydney
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let err = Lexicon::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Duplicate"));
    Ok(())
}

#[test]
fn test_merge_lexicons_keeps_defaults_for_omitted_lists() -> Result<()> {
    let default_lexicon = Lexicon::load_default()?;
    let user_lexicon = Lexicon {
        place_names: vec!["Auckland".to_string()],
        postcode_min: 100,
        ..Lexicon::default()
    };

    let merged = merge_lexicons(default_lexicon.clone(), Some(user_lexicon));

    assert_eq!(merged.place_names, vec!["Auckland".to_string()]);
    assert_eq!(merged.street_suffixes, default_lexicon.street_suffixes);
    assert_eq!(merged.common_words, default_lexicon.common_words);
    assert_eq!(merged.postcode_min, 100);
    Ok(())
}

#[test]
fn test_merge_lexicons_no_user_lexicon() -> Result<()> {
    let default_lexicon = Lexicon::load_default()?;
    let merged = merge_lexicons(default_lexicon.clone(), None);
    assert_eq!(merged, default_lexicon);
    Ok(())
}

#[test]
fn test_merged_lexicon_drives_detection() -> Result<()> {
    let user_lexicon = Lexicon {
        place_names: vec!["Auckland".to_string()],
        ..Lexicon::default()
    };
    let merged = merge_lexicons(Lexicon::load_default()?, Some(user_lexicon));
    let detector = Detector::new(merged)?;

    let detection = detector.detect("flew from sydney to auckland");

    // "sydney" is no longer in the gazetteer; "auckland" is.
    assert_eq!(detection.redacted_text, "flew from sydney to [LOCATION_1]");
    assert_eq!(detection.map[0].original, "auckland");
    Ok(())
}

#[test]
fn test_disabled_name_category_skips_proper_nouns() -> Result<()> {
    let mut lexicon = Lexicon::load_default()?;
    lexicon.disable_categories(&[Category::Name]);
    let detector = Detector::new(lexicon)?;

    let detection = detector.detect("he met David Lee, email david.lee@example.com");

    assert_eq!(
        detection.redacted_text,
        "he met David Lee, email [EMAIL_1]"
    );
    assert_eq!(detection.map.len(), 1);
    assert_eq!(detection.map[0].category, Category::Email);
    Ok(())
}
