/*!
 * Tests for language utility functions
 */

use srtalign::language_utils::{
    get_language_name, language_codes_match, normalize_to_part1_or_part2t, normalize_to_part2t, registry_key,
    validate_language_code, LanguageCodeType,
};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    assert!(matches!(validate_language_code("en").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("spa").unwrap(), LanguageCodeType::Part2T));
    assert!(matches!(validate_language_code("ger").unwrap(), LanguageCodeType::Part2B));
    assert!(matches!(validate_language_code(" RU ").unwrap(), LanguageCodeType::Part1));

    assert!(validate_language_code("xyz").is_err());
    assert!(validate_language_code("e").is_err());
}

#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("es").unwrap(), "spa");
    assert_eq!(normalize_to_part2t("ru").unwrap(), "rus");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("pt-BR").unwrap(), "por");
}

#[test]
fn test_normalize_to_part1_or_part2t_shouldPreferTwoLetters() {
    assert_eq!(normalize_to_part1_or_part2t("spa").unwrap(), "es");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
    assert!(normalize_to_part1_or_part2t("nope").is_err());
}

#[test]
fn test_registry_key_withUnknownCode_shouldLowercase() {
    assert_eq!(registry_key("ES"), "es");
    assert_eq!(registry_key("rus"), "ru");
    assert_eq!(registry_key(" Custom "), "custom");
}

#[test]
fn test_language_codes_match_withMatchingCodes_shouldReturnTrue() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("es", "spa"));
    assert!(!language_codes_match("es", "ru"));
    assert!(!language_codes_match("xx", "xx"));
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() {
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
    assert_eq!(get_language_name("ru").unwrap(), "Russian");
    assert!(get_language_name("zz").is_err());
}
