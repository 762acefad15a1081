// tests/trim_extractor.rs
use auction_listing_normalizer::trim::TargetField;
use auction_listing_normalizer::{default_normalizer, extract_trim_and_body_style};

#[test]
fn gt3_rs_without_body_style() {
    let r = extract_trim_and_body_style("2023 Porsche 911 GT3 RS", None);
    assert_eq!(r.trim.as_deref(), Some("GT3 RS"));
    assert_eq!(r.body_style, None);
}

#[test]
fn turbo_s_and_csl() {
    assert_eq!(
        extract_trim_and_body_style("2024 Porsche 911 Turbo S", None).trim.as_deref(),
        Some("Turbo S")
    );
    assert_eq!(
        extract_trim_and_body_style("1973 BMW 3.0 CSL", None).trim.as_deref(),
        Some("CSL")
    );
}

#[test]
fn body_styles_from_title() {
    let cases = [
        ("1990 Porsche 911 Carrera 4 Cabriolet", "Cabriolet"),
        ("1965 Jaguar E-Type Roadster", "Roadster"),
        ("2024 Ferrari 296 GTS Spider", "Spider"),
        ("2020 Ferrari GTC4Lusso Shooting Brake", "Shooting Brake"),
    ];
    for (title, want) in cases {
        assert_eq!(
            extract_trim_and_body_style(title, None).body_style.as_deref(),
            Some(want),
            "{title}"
        );
    }
}

#[test]
fn carrera_4s_beats_shorter_variants() {
    let r = extract_trim_and_body_style("2020 Porsche 911 Carrera 4S", None);
    assert_eq!(r.trim.as_deref(), Some("Carrera 4S"));
    let r = extract_trim_and_body_style("1990 Porsche 911 Carrera 4 Cabriolet", None);
    assert_eq!(r.trim.as_deref(), Some("Carrera 4"));
    let r = extract_trim_and_body_style("2012 Porsche 911 Carrera S Coupe", None);
    assert_eq!(r.trim.as_deref(), Some("Carrera S"));
}

#[test]
fn nothing_matches() {
    let r = extract_trim_and_body_style("1990 Honda Civic", None);
    assert_eq!(r.trim, None);
    assert_eq!(r.body_style, None);
}

#[test]
fn body_style_falls_back_to_description() {
    let r = extract_trim_and_body_style(
        "1990 Porsche 911",
        Some("This beautiful convertible has been well maintained."),
    );
    assert_eq!(r.body_style.as_deref(), Some("Convertible"));
}

#[test]
fn title_body_style_wins_over_description() {
    let r = extract_trim_and_body_style(
        "1989 Porsche 911 Targa",
        Some("Previously converted from a coupe."),
    );
    assert_eq!(r.body_style.as_deref(), Some("Targa"));
}

#[test]
fn trim_never_comes_from_description() {
    let r = extract_trim_and_body_style("1990 Porsche 911", Some("Optioned like a GT3 RS."));
    assert_eq!(r.trim, None);
}

#[test]
fn case_insensitive_with_canonical_output() {
    let r = extract_trim_and_body_style("2023 porsche 911 gt3 rs cabriolet", None);
    assert_eq!(r.trim.as_deref(), Some("GT3 RS"));
    assert_eq!(r.body_style.as_deref(), Some("Cabriolet"));
}

#[test]
fn alternative_spelling_maps_to_canonical() {
    let r = extract_trim_and_body_style("1967 Jaguar E-Type Series I Coupé", None);
    assert_eq!(r.body_style.as_deref(), Some("Coupe"));
    let r = extract_trim_and_body_style("1971 Ferrari 365 GTB/4 Coup&eacute;", None);
    assert_eq!(r.body_style.as_deref(), Some("Coupe"));
}

#[test]
fn shipped_library_is_ranked_specific_first() {
    // No earlier rule may fire on a later rule's canonical text.
    let ex = default_normalizer().trim_extractor();
    for field in [TargetField::Trim, TargetField::BodyStyle] {
        let rules = ex.ranked(field);
        for (i, earlier) in rules.iter().enumerate() {
            for later in &rules[i + 1..] {
                assert!(
                    !earlier.is_match(&later.canonical),
                    "{field}: `{}` is ranked before `{}` but fires on it",
                    earlier.canonical,
                    later.canonical
                );
            }
        }
    }
}
