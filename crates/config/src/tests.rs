use crate::{AppConfig, ConfigError};
use figment::Jail;

#[test]
fn test_defaults_without_files() {
    Jail::expect_with(|_jail| {
        let config = AppConfig::load(".").map_err(|e| e.to_string())?;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.product_service.endpoint, "http://127.0.0.1:9090");
        assert_eq!(config.product_service.connect_timeout_ms, 5000);
        assert!(config.product_service.deadline().is_none());
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.telemetry.metrics);
        Ok(())
    });
}

#[test]
fn test_toml_and_env_override() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "default.toml",
            r#"
            [server]
            port = 9000

            [product_service]
            endpoint = "http://product-grpc-service:9090"
            deadline_ms = 1500
            "#,
        )?;
        jail.set_env("CATALOG_SERVER__PORT", "8181");
        jail.set_env("CATALOG_TELEMETRY__JSON", "true");

        let config = AppConfig::load(".").map_err(|e| e.to_string())?;
        assert_eq!(config.server.port, 8181);
        assert_eq!(
            config.product_service.endpoint,
            "http://product-grpc-service:9090"
        );
        assert_eq!(
            config.product_service.deadline(),
            Some(std::time::Duration::from_millis(1500))
        );
        assert!(config.telemetry.json);
        Ok(())
    });
}

#[test]
fn test_env_specific_file() {
    Jail::expect_with(|jail| {
        jail.create_file("default.toml", "[server]\nport = 9000\n")?;
        jail.create_file("production.toml", "[server]\nport = 80\n")?;
        jail.set_env("APP_ENV", "production");

        let config = AppConfig::load(".").map_err(|e| e.to_string())?;
        assert_eq!(config.server.port, 80);
        assert!(config.is_production());
        assert!(!config.is_development());
        Ok(())
    });
}

#[test]
fn test_rejects_endpoint_without_scheme() {
    Jail::expect_with(|jail| {
        jail.set_env("CATALOG_PRODUCT_SERVICE__ENDPOINT", "product-grpc-service:9090");

        let err = AppConfig::load(".").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        Ok(())
    });
}

#[test]
fn test_rejects_zero_deadline() {
    let mut config = AppConfig::default();
    config.product_service.endpoint = "http://localhost:9090".to_string();
    config.product_service.connect_timeout_ms = 100;
    config.product_service.deadline_ms = Some(0);

    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    config.product_service.deadline_ms = Some(250);
    assert!(config.validate().is_ok());
}
