//! Configuration parsing: defaults and overrides.

use std::path::PathBuf;

use clap::Parser;
use dermascan::Settings;

#[test]
fn defaults_match_documented_values() {
    let s = Settings::try_parse_from(["dermascan"]).unwrap();
    assert_eq!(s.image_size, 224);
    assert_eq!(s.class_names, ["Acne", "Eczema", "Melanoma", "Psoriasis", "Rosacea"]);
    assert_eq!(s.cors_origins, ["http://localhost:3000", "http://127.0.0.1:3000"]);
    assert!(s.worker_count() >= 1);
}

#[test]
fn class_names_split_on_commas() {
    let s = Settings::try_parse_from(["dermascan", "--class-names", "A,B,C"]).unwrap();
    assert_eq!(s.class_names, ["A", "B", "C"]);
}

#[test]
fn overrides_model_path_and_size() {
    let s = Settings::try_parse_from([
        "dermascan",
        "--model-path",
        "/srv/models/m.json",
        "--image-size",
        "64",
        "--workers",
        "3",
    ])
    .unwrap();
    assert_eq!(s.model_path, PathBuf::from("/srv/models/m.json"));
    assert_eq!(s.image_size, 64);
    assert_eq!(s.worker_count(), 3);
}

#[test]
fn zero_image_size_rejected() {
    assert!(Settings::try_parse_from(["dermascan", "--image-size", "0"]).is_err());
}

#[test]
fn origin_allow_list() {
    let s = Settings::try_parse_from(["dermascan"]).unwrap();
    assert!(s.allows_origin("http://localhost:3000"));
    assert!(!s.allows_origin("http://evil.example"));
}
