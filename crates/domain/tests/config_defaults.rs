//! Config default behavior: an empty TOML file must yield a fully usable
//! configuration, and partial files only override what they name.

use sp_domain::config::Config;

#[test]
fn empty_toml_yields_defaults() {
    let config: Config = toml::from_str("").unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 5080);
    assert_eq!(config.crm.base_url, "http://localhost:5000");
    assert_eq!(config.crm.timeout_ms, 8000);
    assert_eq!(config.crm.page_size, 100);
    assert_eq!(config.llm.model, "gemini-2.5-flash");
    assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
    assert_eq!(config.llm.max_output_tokens, 1024);
}

#[test]
fn snapshot_limits_default_to_prompt_budget() {
    let config = Config::default();

    assert_eq!(config.snapshot.lead_sample, 10);
    assert_eq!(config.snapshot.partner_limit, 15);
    assert_eq!(config.snapshot.product_limit, 15);
    assert_eq!(config.snapshot.order_limit, 10);
    assert_eq!(config.snapshot.partner_order_limit, 5);
}

#[test]
fn partial_section_keeps_sibling_defaults() {
    let config: Config = toml::from_str(
        r#"
        [server]
        port = 9999

        [snapshot]
        lead_sample = 3
        "#,
    )
    .unwrap();

    assert_eq!(config.server.port, 9999);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.snapshot.lead_sample, 3);
    assert_eq!(config.snapshot.partner_limit, 15);
}
