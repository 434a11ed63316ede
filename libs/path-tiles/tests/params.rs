//! Tile parameter files.

use path_tiles::{EmptyChannelPolicy, ErrorKind, TileParams};

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = std::env::temp_dir().join(format!("path-tiles-params-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("params.json");
    std::fs::write(&path, r#"{ "tile_size": 80.0, "empty_channel_policy": "reject" }"#).unwrap();

    let params = TileParams::from_json_file(&path).unwrap();
    assert_eq!(params.tile_size, 80.0);
    assert_eq!(params.empty_channel_policy, EmptyChannelPolicy::Reject);
    assert_eq!(params.tile_thickness, 5.0);
    assert_eq!(params.curve_samples, 64);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_round_trip_through_json() {
    let params = TileParams {
        path_radius: 3.25,
        arc_segments: 48,
        ..Default::default()
    };
    let json = serde_json::to_string_pretty(&params).unwrap();
    assert_eq!(TileParams::from_json_str(&json).unwrap(), params);
}

#[test]
fn test_invalid_file_values() {
    let err = TileParams::from_json_str(r#"{ "channel_depth": 5.0 }"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = TileParams::from_json_str(r#"{ "curve_samples": "many" }"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
