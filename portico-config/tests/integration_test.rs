//! Integration tests for portico-config

use portico_config::*;
use std::env;
use std::fs;

#[test]
fn test_config_manager_with_prefix() {
    unsafe {
        env::set_var("PORTICOIT_SESSIONTIMEOUT", "900");
        env::set_var("PORTICOIT_KNOWNPRINCIPALS", "UserPrincipal");
    }

    let manager = ConfigManager::with_prefix("PORTICOIT");
    manager.load_env().unwrap();

    assert_eq!(manager.get_string("sessiontimeout").unwrap(), "900");
    assert_eq!(manager.get_string("knownprincipals").unwrap(), "UserPrincipal");
    assert!(!manager.has("PORTICOIT_SESSIONTIMEOUT"));

    unsafe {
        env::remove_var("PORTICOIT_SESSIONTIMEOUT");
        env::remove_var("PORTICOIT_KNOWNPRINCIPALS");
    }
}

#[test]
fn test_env_loader_with_prefix() {
    let loader = EnvLoader::new(Some("PORTICOLOADER".to_string()));

    unsafe {
        env::set_var("PORTICOLOADER_SESSION_COOKIE", "LOGINID");
    }

    assert_eq!(loader.load_var("session_cookie").unwrap(), "LOGINID");
    assert_eq!(loader.load_var_or("missing", "fallback"), "fallback");
    assert!(matches!(loader.load_var("missing"), Err(ConfigError::EnvError(_))));

    unsafe {
        env::remove_var("PORTICOLOADER_SESSION_COOKIE");
    }
}

#[test]
fn test_load_toml_file() {
    let path = env::temp_dir().join(format!("portico-config-{}.toml", std::process::id()));
    fs::write(
        &path,
        "sessionTimeout = 600\nknownPrincipals = [\"UserPrincipal\", \"SimplePrincipal\"]\n",
    )
    .unwrap();

    let manager = ConfigManager::new();
    manager
        .load_file(&path, FileFormat::detect(&path).unwrap())
        .unwrap();

    assert_eq!(manager.get_int("sessionTimeout").unwrap(), 600);
    assert_eq!(
        manager.get::<Vec<String>>("knownPrincipals").unwrap(),
        vec!["UserPrincipal", "SimplePrincipal"]
    );

    fs::remove_file(&path).ok();
}

#[test]
fn test_load_properties_style_file() {
    let path = env::temp_dir().join(format!("portico-config-{}.properties", std::process::id()));
    fs::write(&path, "# login settings\n! legacy comment\nsessionTimeout=120\n").unwrap();

    let manager = ConfigManager::new();
    manager
        .load_file(&path, FileFormat::detect(&path).unwrap())
        .unwrap();

    assert_eq!(manager.get_string("sessionTimeout").unwrap(), "120");
    assert_eq!(manager.keys().len(), 1);

    fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file() {
    let manager = ConfigManager::new();
    let result = manager.load_file("/nonexistent/portico.toml", FileFormat::Toml);
    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}

#[test]
fn test_unsupported_extension() {
    assert!(FileFormat::detect(std::path::Path::new("login.yaml")).is_err());
    assert!(FileFormat::detect(std::path::Path::new("login")).is_err());
}

#[test]
fn test_merge_later_wins() {
    let defaults = ConfigManager::new();
    defaults.set("sessionTimeout", 1800).unwrap();
    defaults.set("sessionCookie", "PORTICOSESSIONID").unwrap();

    let overrides = ConfigManager::new();
    overrides.set("sessionTimeout", 60).unwrap();

    defaults.merge(&overrides);

    assert_eq!(defaults.get_int("sessionTimeout").unwrap(), 60);
    assert_eq!(defaults.get_string("sessionCookie").unwrap(), "PORTICOSESSIONID");
}
