use std::collections::HashMap;

use super::*;

#[test]
fn environment_overrides_defaults() {
    let env = HashMap::from([
        (ENV_ASSETS_DIR, "/srv/dp/public"),
        (ENV_FRAMES_PREFIX, "static/frames"),
        (ENV_DOWNLOAD_DIR, "  "),
    ]);
    let settings = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string()));

    assert_eq!(settings.assets_root, PathBuf::from("/srv/dp/public"));
    assert_eq!(settings.frames_prefix, "static/frames");
    assert_eq!(settings.download_dir, PathBuf::from("."));
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let settings: Settings = serde_json::from_str(r#"{"frames_prefix":"f"}"#).unwrap();
    assert_eq!(settings.frames_prefix, "f");
    assert_eq!(settings.assets_root, Settings::default().assets_root);
}
