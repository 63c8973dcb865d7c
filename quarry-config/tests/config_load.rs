use quarry_config::QuarryConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_full_config_from_file() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
social:
  consumer_key: "ck"
  consumer_secret: "${QUARRY_TEST_CONSUMER_SECRET}"
  access_token: "at"
  access_token_secret: "ats"
  screen_name: "20thcenturyfox"
wiki:
  endpoint: "https://en.wikipedia.org/w/api.php"
"#;
    let p = write_yaml(&tmp, "quarry.yaml", file_yaml);

    temp_env::with_var("QUARRY_TEST_CONSUMER_SECRET", Some("s3cr3t"), || {
        let config = QuarryConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load quarry config");

        let social = config.social.expect("social section");
        assert_eq!(social.consumer_key, "ck");
        assert_eq!(social.consumer_secret, "s3cr3t");
        assert_eq!(social.screen_name, "20thcenturyfox");
        assert_eq!(social.endpoint, "https://api.twitter.com");
        assert_eq!(config.wiki.endpoint, "https://en.wikipedia.org/w/api.php");
    });
}

#[test]
#[serial]
fn wiki_defaults_apply_without_file_sections() {
    let config = QuarryConfigLoader::new()
        .with_yaml_str("wiki: {}")
        .load()
        .expect("load minimal config");

    assert!(config.social.is_none());
    assert_eq!(config.wiki.endpoint, "https://en.wikipedia.org/w/api.php");
}
