use super::*;

#[test]
fn abbreviations_are_unique() {
    let mut seen = std::collections::HashSet::new();
    for p in ArchivePlatform::all() {
        assert!(
            seen.insert(p.abbreviation.to_lowercase()),
            "duplicate abbreviation {}",
            p.abbreviation
        );
    }
}

#[test]
fn lookup_by_menu_number() {
    let first = ArchivePlatform::lookup("1").unwrap();
    assert_eq!(first, ArchivePlatform::all()[0]);
    assert!(ArchivePlatform::lookup("0").is_err());
    let past_end = (ArchivePlatform::all().len() + 1).to_string();
    assert!(ArchivePlatform::lookup(&past_end).is_err());
}

#[test]
fn abbreviation_beats_substring() {
    let p = ArchivePlatform::lookup("ps2").unwrap();
    assert_eq!(p.directory, "Sony - PlayStation 2");
    // "pc" is also a substring of the NEC PC Engine entries listed earlier
    let p = ArchivePlatform::lookup("pc").unwrap();
    assert_eq!(p.directory, "IBM - PC");
}

#[test]
fn exact_directory_beats_substring() {
    let p = ArchivePlatform::lookup("sony - playstation").unwrap();
    assert_eq!(p.abbreviation, "PS1");
}

#[test]
fn substring_is_case_insensitive() {
    let p = ArchivePlatform::lookup("gamecube").unwrap();
    assert_eq!(p.abbreviation, "NGC");
    let p = ArchivePlatform::lookup("Saturn").unwrap();
    assert_eq!(p.abbreviation, "SAT");
}

#[test]
fn unknown_query_returns_err() {
    assert!("commodore vic-20".parse::<ArchivePlatform>().is_err());
    assert!(ArchivePlatform::lookup("   ").is_err());
}
