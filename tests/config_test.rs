use std::io::Write;

use rs_fragments::{Error, ServiceConfig, SESSION_COOKIE_ENV};

const CONFIG: &str = r#"
bind = "0.0.0.0:8080"
allowed_hosts = ["new.xianbao.fun"]
comments_allowed_hosts = ["WWW.Douban.com"]
secondary_allowed_hosts = ["www.douban.com"]
timeout_secs = 30

[extraction]
comment_item_selector = "li.comment-item"
fetch_linked_comments = false

[extraction.list]
primary = "ul.posts"
fallbacks = ["ul.recent"]

[[extraction.list_link_rewrites]]
from = "/douban-maizu"
to = "/detail"
"#;

#[test]
fn config_loads_from_file() {
    let mut file = match tempfile::NamedTempFile::new() {
        Ok(file) => file,
        Err(err) => panic!("tempfile: {err}"),
    };
    if let Err(err) = file.write_all(CONFIG.as_bytes()) {
        panic!("write: {err}");
    }

    let config = match ServiceConfig::from_toml_file(file.path()) {
        Ok(config) => config,
        Err(err) => panic!("expected valid config, got {err:?}"),
    };

    assert_eq!(config.bind, "0.0.0.0:8080");
    assert!(!config.allowed_hosts.contains("www.douban.com"));
    assert!(config.comments_allowed_hosts.contains("www.douban.com"));
    assert!(config
        .secondary_allowed_hosts
        .as_ref()
        .is_some_and(|hosts| hosts.contains("www.douban.com")));
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.extraction.comment_item_selector, "li.comment-item");
    assert!(!config.extraction.fetch_linked_comments);
    assert_eq!(config.extraction.list.primary, "ul.posts");
    assert_eq!(config.extraction.list.fallbacks, vec!["ul.recent".to_string()]);
    assert_eq!(config.extraction.list.tag_filter, None);
    assert_eq!(config.extraction.list_link_rewrites[0].to, "/detail");
    assert_eq!(config.default_list_url, ServiceConfig::default().default_list_url);
}

#[test]
fn missing_file_is_config_error() {
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(err) => panic!("tempdir: {err}"),
    };
    let result = ServiceConfig::from_toml_file(dir.path().join("absent.toml"));

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn malformed_toml_is_config_error() {
    assert!(matches!(
        ServiceConfig::from_toml_str("allowed_hosts = "),
        Err(Error::Config(_))
    ));
}

#[test]
fn default_url_outside_allow_list_is_rejected() {
    let result = ServiceConfig::from_toml_str(
        r#"
        allowed_hosts = ["www.douban.com"]
        "#,
    );

    match result {
        Err(Error::Config(message)) => assert!(message.contains("default_list_url"), "{message}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn template_without_placeholder_is_rejected() {
    let result = ServiceConfig::from_toml_str(
        r#"
        detail_url_template = "https://new.xianbao.fun/douban-maizu/latest.html"
        "#,
    );

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn invalid_topic_pattern_is_rejected() {
    let result = ServiceConfig::from_toml_str(
        r#"
        [extraction]
        topic_id_pattern = "topic/\\d+"
        "#,
    );

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn invalid_selector_is_config_error() {
    let result = ServiceConfig::from_toml_str(
        r#"
        [extraction.list]
        primary = "ul[[["
        "#,
    );

    match result {
        Err(Error::Config(message)) => assert!(message.contains("list.primary"), "{message}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn comments_template_outside_comment_hosts_is_rejected() {
    let result = ServiceConfig::from_toml_str(
        r#"
        comments_allowed_hosts = ["new.xianbao.fun"]
        "#,
    );

    match result {
        Err(Error::Config(message)) => assert!(message.contains("comments_url_template"), "{message}"),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn session_cookie_comes_from_environment() {
    std::env::set_var(SESSION_COOKIE_ENV, " bid=from-env ");
    let config = ServiceConfig::default().with_env_overrides();
    std::env::remove_var(SESSION_COOKIE_ENV);

    assert_eq!(config.fetch.session_cookie.as_deref(), Some("bid=from-env"));
}

#[test]
fn example_config_is_valid() {
    let result = ServiceConfig::from_toml_str(include_str!("../config.example.toml"));
    assert!(result.is_ok(), "{result:?}");
}
