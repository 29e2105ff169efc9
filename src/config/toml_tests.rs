//! Tests for TOML configuration parsing.

use super::toml::{MaxAgeSetting, TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [app]
            id = "123"
            secret = "s3cret"

            [api]
            url = "http://localhost:9000"
            access_token = "tok"
            retry = 1

            [server]
            bind = "0.0.0.0:9000"
            path = "/hook"
            max_age = 60
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.app.id.as_deref(), Some("123"));
        assert_eq!(config.app.secret.as_deref(), Some("s3cret"));
        assert_eq!(config.api.url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.api.access_token.as_deref(), Some("tok"));
        assert_eq!(config.api.retry, Some(1));
        assert_eq!(config.server.bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(config.server.path.as_deref(), Some("/hook"));
        assert_eq!(config.server.max_age, Some(MaxAgeSetting::Seconds(60)));
    }

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.app.secret.is_none());
        assert!(config.api.retry.is_none());
        assert!(config.server.max_age.is_none());
    }

    #[test]
    fn max_age_accepts_text() {
        let config = TomlConfig::parse("[server]\nmax_age = \"unbounded\"").unwrap();

        assert_eq!(
            config.server.max_age,
            Some(MaxAgeSetting::Text("unbounded".to_string()))
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(TomlConfig::parse("[app]\nname = \"x\"").is_err());
        assert!(TomlConfig::parse("[database]\nurl = \"x\"").is_err());
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(TomlConfig::parse("[api]\nretry = \"three\"").is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(config.api.retry, Some(3));
        assert_eq!(config.server.max_age, Some(MaxAgeSetting::Seconds(30)));
        assert!(config.app.secret.is_none());
    }

    #[test]
    fn default_template_documents_sections() {
        let template = default_config_template();

        assert!(template.contains("[app]"));
        assert!(template.contains("[api]"));
        assert!(template.contains("[server]"));
    }
}

mod file_loading {
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [app]
            secret = "from-file"
        "#
        )
        .unwrap();

        let config = TomlConfig::load(file.path()).unwrap();
        assert_eq!(config.app.secret.as_deref(), Some("from-file"));
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let path = Path::new("nonexistent_graphlink_config_12345.toml");
        let result = TomlConfig::load(path);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_invalid_toml_file_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let result = TomlConfig::load(file.path());

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}
