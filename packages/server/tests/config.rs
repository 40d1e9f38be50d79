use std::{path::PathBuf, sync::LazyLock};

use oracle_server::{args::CliArgs, config::Config, test_utils::app::TestApp};
use oracle_types::{FieldId, StrategyEntry};
use utils::config::{CliEnvExt, ConfigBuilder, ConfigExt, ConfigFilePath};

fn load(cli_args: CliArgs) -> Config {
    ConfigBuilder::new(cli_args).build().unwrap()
}

// the complete list of fallbacks depends on the platform and global env vars,
// so only the user overrides at the front are checked
#[test]
fn config_filepath() {
    fn filepaths(home: Option<PathBuf>) -> Vec<PathBuf> {
        let cli_env_args = CliArgs {
            home,
            dotenv: None,
            ..Default::default()
        }
        .merge_cli_env_args()
        .unwrap();

        ConfigFilePath::new(Config::FILENAME, cli_env_args.home_dir()).into_possible()
    }

    // make sure the test directories are not there by default
    let default_dirs = filepaths(None);
    for i in 1..=10 {
        assert!(!default_dirs
            .contains(&PathBuf::from(format!("/tmp{}", i)).join(Config::FILENAME)));
    }

    // an explicit home directory is the first one to try
    assert_eq!(
        filepaths(Some("/tmp1".into())).first().unwrap(),
        &PathBuf::from("/tmp1").join(Config::FILENAME)
    );

    // even if we also provide it in an env var, the explicit one still takes precedence
    temp_env::with_vars(
        [(format!("{}_{}", CliArgs::ENV_VAR_PREFIX, "HOME"), Some("/tmp2"))],
        || {
            assert_eq!(
                filepaths(Some("/tmp1".into())).first().unwrap(),
                &PathBuf::from("/tmp1").join(Config::FILENAME)
            );
        },
    );

    // but with only the env var, it becomes the first
    temp_env::with_vars(
        [(format!("{}_{}", CliArgs::ENV_VAR_PREFIX, "HOME"), Some("/tmp2"))],
        || {
            assert_eq!(
                filepaths(None).first().unwrap(),
                &PathBuf::from("/tmp2").join(Config::FILENAME),
            );
        },
    );
}

#[test]
fn config_default() {
    // no file, no env, no args
    // holding the env lock keeps the other tests' vars out
    temp_env::with_vars_unset(
        [format!("{}_{}", CliArgs::ENV_VAR_PREFIX, "PORT")],
        || {
            assert_eq!(TestApp::new().config.as_ref(), &Config::default());
        },
    );
}

#[test]
fn config_array_string() {
    static TRACING_ENV_FILTER: LazyLock<tracing_subscriber::EnvFilter> = LazyLock::new(|| {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("info".parse().unwrap())
            .add_directive("oracle_engine=debug".parse().unwrap())
    });

    let config = temp_env::with_vars(
        [
            (
                format!("{}_{}", CliArgs::ENV_VAR_PREFIX, "LOG_LEVEL"),
                Some("info, oracle_engine=debug"),
            ),
            (
                format!("{}_{}", CliArgs::ENV_VAR_PREFIX, "GATEWAY_URLS"),
                Some("https://gw-a.example, https://gw-b.example"),
            ),
        ],
        || load(TestApp::zeroed_cli_args()),
    );

    assert_eq!(config.log_level, ["info", "oracle_engine=debug"]);
    assert_eq!(
        config.gateway_urls,
        ["https://gw-a.example", "https://gw-b.example"]
    );
    assert_eq!(
        config.tracing_env_filter().unwrap().to_string(),
        TRACING_ENV_FILTER.to_string()
    );

    // cli wins over env
    let config = temp_env::with_vars(
        [(
            format!("{}_{}", CliArgs::ENV_VAR_PREFIX, "LOG_LEVEL"),
            Some("info"),
        )],
        || {
            load(CliArgs {
                log_level: vec!["trace".to_string()],
                ..TestApp::zeroed_cli_args()
            })
        },
    );
    assert_eq!(config.log_level, ["trace"]);
}

#[test]
fn config_invalid_log_level_is_an_error() {
    let config = load(CliArgs {
        log_level: vec!["not a [directive".to_string()],
        ..TestApp::zeroed_cli_args()
    });

    config.tracing_env_filter().unwrap_err();
}

#[test]
fn config_file_section_overrides_globals() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join(Config::FILENAME),
        r#"
[default]
port = 9000
call_timeout_ms = 1500

[oracle]
port = 9100
legacy_service_id = "redstone-primary-prod"
data_feeds = ["BTC"]

[[oracle.strategies]]
service_id = "redstone-primary-prod"
with_gateways = false

[oracle.signers]
redstone-primary-prod = ["0x0C39486f770B26F5527BBBf942726537986Cd7eb"]
"#,
    )
    .unwrap();

    let config = load(CliArgs {
        home: Some(home.path().to_path_buf()),
        ..TestApp::zeroed_cli_args()
    });

    assert_eq!(config.port, 9100);
    assert_eq!(config.call_timeout_ms, 1500);
    assert_eq!(config.legacy_service_id, "redstone-primary-prod");
    assert_eq!(config.data_feeds, vec![FieldId::Btc]);
    assert_eq!(
        config.strategies,
        vec![StrategyEntry::new("redstone-primary-prod", false)]
    );
    assert!(config.signers.contains_key("redstone-primary-prod"));

    // env beats the file
    let config = temp_env::with_vars(
        [(format!("{}_{}", CliArgs::ENV_VAR_PREFIX, "PORT"), Some("9200"))],
        || {
            load(CliArgs {
                home: Some(home.path().to_path_buf()),
                ..TestApp::zeroed_cli_args()
            })
        },
    );
    assert_eq!(config.port, 9200);
}

#[test]
fn config_feed_contract_from_env() {
    let config = temp_env::with_vars(
        [(
            format!("{}_{}", CliArgs::ENV_VAR_PREFIX, "FEED_CONTRACT_ADDRESS"),
            Some("0x0000000000000000000000000000000000000001"),
        )],
        || load(TestApp::zeroed_cli_args()),
    );

    assert_eq!(
        config.feed_contract_address,
        alloy_primitives::Address::with_last_byte(1)
    );
}

#[test]
fn config_data_feeds_any_case() {
    let config = temp_env::with_vars(
        [(
            format!("{}_{}", CliArgs::ENV_VAR_PREFIX, "DATA_FEEDS"),
            Some("eth, Btc"),
        )],
        || load(TestApp::zeroed_cli_args()),
    );

    assert_eq!(config.data_feeds, vec![FieldId::Eth, FieldId::Btc]);
}
