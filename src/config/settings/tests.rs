use super::*;

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn default_values() {
    let config = Config::default();
    assert_eq!(config.embedding.host, "localhost");
    assert_eq!(config.embedding.port, 11434);
    assert_eq!(config.embedding.model, "nomic-embed-text:latest");
    assert_eq!(config.generator.model, "gemini-2.0-flash");
    assert_eq!(config.retrieval.top_k, 3);
    assert_eq!(config.retrieval.max_generations, 5);
    assert_eq!(config.indexing.split_length, 100);
    assert_eq!(config.indexing.split_overlap, 10);
    assert_eq!(config.indexing.urls.len(), 13);
}

#[test]
fn embedding_url_formatting() {
    let config = EmbeddingConfig {
        protocol: "http".to_string(),
        host: "embed-host".to_string(),
        port: 8080,
        model: "test-model".to_string(),
    };

    let url = config.url().expect("URL should parse");
    assert_eq!(url.as_str(), "http://embed-host:8080/");
}

#[test]
fn invalid_protocol_rejected() {
    let config = Config {
        embedding: EmbeddingConfig {
            protocol: "ftp".to_string(),
            ..EmbeddingConfig::default()
        },
        ..Config::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidProtocol(_))
    ));
}

#[test]
fn zero_top_k_rejected() {
    let config = Config {
        retrieval: RetrievalConfig {
            top_k: 0,
            ..RetrievalConfig::default()
        },
        ..Config::default()
    };

    assert!(matches!(config.validate(), Err(ConfigError::InvalidTopK(0))));
}

#[test]
fn zero_max_generations_rejected() {
    let config = Config {
        retrieval: RetrievalConfig {
            max_generations: 0,
            ..RetrievalConfig::default()
        },
        ..Config::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidMaxGenerations(0))
    ));
}

#[test]
fn overlap_must_be_smaller_than_length() {
    let config = Config {
        indexing: IndexingConfig {
            split_length: 50,
            split_overlap: 50,
            ..IndexingConfig::default()
        },
        ..Config::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::OverlapTooLarge(50, 50))
    ));
}

#[test]
fn empty_generator_model_rejected() {
    let config = Config {
        generator: GeneratorConfig {
            model: "  ".to_string(),
        },
        ..Config::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidModel(_))
    ));
}

#[test]
fn toml_round_trip() {
    let config = Config::default();
    let serialized = toml::to_string_pretty(&config).expect("serialization should succeed");
    let parsed: Config = toml::from_str(&serialized).expect("parsing should succeed");
    assert_eq!(parsed, config);
}

#[test]
fn load_from_missing_file_returns_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");

    let config = Config::load_from(&path).expect("load should succeed");
    assert_eq!(config, Config::default());
}

#[test]
fn load_from_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[retrieval]\ntop_k = 7\n").expect("write should succeed");

    let config = Config::load_from(&path).expect("load should succeed");
    assert_eq!(config.retrieval.top_k, 7);
    assert_eq!(config.retrieval.max_generations, 5);
    assert_eq!(config.embedding, EmbeddingConfig::default());
}

#[test]
fn load_from_invalid_values_fails_validation() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[retrieval]\ntop_k = 0\n").expect("write should succeed");

    assert!(Config::load_from(&path).is_err());
}
