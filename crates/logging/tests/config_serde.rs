//! Serde representation of levels and filters.
#![cfg(feature = "serde")]

use logging::{Level, LevelFilter};

#[test]
fn levels_serialize_as_lowercase_names() {
    assert_eq!(serde_json::to_string(&Level::Information).unwrap(), "\"information\"");
    assert_eq!(
        serde_json::from_str::<Level>("\"critical\"").unwrap(),
        Level::Critical
    );
    assert!(serde_json::from_str::<Level>("\"verbose\"").is_err());
}

#[test]
fn filters_use_their_display_form() {
    assert_eq!(serde_json::to_string(&LevelFilter::Off).unwrap(), "\"off\"");
    assert_eq!(
        serde_json::to_string(&LevelFilter::AtLeast(Level::Warning)).unwrap(),
        "\"warning\""
    );
    assert_eq!(
        serde_json::from_str::<LevelFilter>("\"Info\"").unwrap(),
        LevelFilter::AtLeast(Level::Information)
    );
    assert!(serde_json::from_str::<LevelFilter>("\"chatty\"").is_err());
}
