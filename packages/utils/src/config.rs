use anyhow::{bail, Context, Result};
use figment::{providers::Format, Figment};
use serde::{de::DeserializeOwned, Serialize};
use std::{marker::PhantomData, path::PathBuf};

/// Directory name used for every fallback location of the config file
pub const CONFIG_DIRNAME: &str = "attested-oracle";

/// The builder we use to build Config
#[derive(Debug)]
pub struct ConfigBuilder<CONFIG, ARG> {
    pub cli_env_args: ARG,
    _config: PhantomData<CONFIG>,
}

/// Implemented by the clap args struct, which doubles as the env-var surface
pub trait CliEnvExt: Serialize + DeserializeOwned + Default + std::fmt::Debug {
    // e.g. "ORACLE"
    const ENV_VAR_PREFIX: &'static str;

    // The section identifier in the TOML file, e.g. "oracle"
    const TOML_IDENTIFIER: &'static str;

    // an optional argument to specify the home directory
    // if not supplied, config will try a series of fallbacks
    fn home_dir(&self) -> Option<PathBuf>;

    // an optional path to a dotenv file
    // if not supplied, the current directory's .env is tried
    fn dotenv_path(&self) -> Option<PathBuf>;

    fn merge_cli_env_args(&self) -> Result<Self> {
        let env_prefix = format!("{}_", Self::ENV_VAR_PREFIX);

        let merged = Figment::new()
            .merge(figment::providers::Env::prefixed(&env_prefix))
            .merge(figment::providers::Serialized::defaults(self))
            .extract()?;

        Ok(merged)
    }

    fn env_var(name: &str) -> Option<String> {
        std::env::var(format!("{}_{name}", Self::ENV_VAR_PREFIX)).ok()
    }
}

pub trait ConfigExt: Serialize + DeserializeOwned + Default + std::fmt::Debug {
    const FILENAME: &'static str = "oracle.toml";

    fn log_levels(&self) -> impl Iterator<Item = &str>;

    fn tracing_env_filter(&self) -> Result<tracing_subscriber::EnvFilter> {
        let mut filter = tracing_subscriber::EnvFilter::from_default_env();
        for directive in self.log_levels() {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => bail!("{}: {}", err, directive),
            }
        }

        Ok(filter)
    }
}

impl<CONFIG: ConfigExt, ARG: CliEnvExt> ConfigBuilder<CONFIG, ARG> {
    pub fn new(cli_env_args: ARG) -> Self {
        Self {
            cli_env_args,
            _config: PhantomData,
        }
    }

    pub fn build(self) -> Result<CONFIG> {
        // dotenv goes first, since it may set the env vars for the paths below
        let mut dotenv_paths = Vec::new();

        if let Some(dotenv_path) = self.cli_env_args.dotenv_path() {
            dotenv_paths.push(dotenv_path);
        }

        if let Some(dotenv_path) = ARG::env_var("DOTENV") {
            dotenv_paths.push(PathBuf::from(dotenv_path));
        }

        dotenv_paths.push(std::env::current_dir()?.join(".env"));

        for dotenv_path in dotenv_paths {
            if dotenv_path.exists() {
                if let Err(e) = dotenvy::from_path(dotenv_path) {
                    bail!("Error loading dotenv file: {}", e);
                }
            }
        }

        let cli_env_args = self.cli_env_args.merge_cli_env_args()?;

        let home_dir = cli_env_args.home_dir();

        // Start with the default values as the base
        let mut figment = Figment::new().merge(figment::providers::Serialized::defaults(
            CONFIG::default(),
        ));

        // the file is optional, everything has a usable default
        let filepath = ConfigFilePath::new(CONFIG::FILENAME, home_dir.clone()).into_path();
        if let Some(filepath) = filepath {
            figment = figment
                // global keys first
                .merge(Figment::from(
                    figment::providers::Toml::file(&filepath).nested(),
                ))
                // then our own section, overriding globals where needed
                .merge(
                    Figment::from(figment::providers::Toml::file(&filepath).nested())
                        .select(ARG::TOML_IDENTIFIER),
                );
        }

        // Finally override with cli/env args
        let config: CONFIG = figment
            .merge(figment::providers::Serialized::defaults(cli_env_args))
            .extract()
            .context(format!(
                "Error extracting config (filename: {}, homedir: {:?})",
                CONFIG::FILENAME,
                home_dir
            ))?;

        Ok(config)
    }
}

// a helper to try a series of fallback paths, looking for a config file
#[derive(Clone, Debug)]
pub struct ConfigFilePath {
    // the filename to look for in each directory, e.g. "oracle.toml"
    pub filename: String,
    // the optional directory set via direct args or env
    pub arg_env_dir: Option<PathBuf>,
}

impl ConfigFilePath {
    pub fn new(filename: impl ToString, arg_env_dir: Option<PathBuf>) -> Self {
        Self {
            filename: filename.to_string(),
            arg_env_dir,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        self.into_possible().into_iter().find(|path| path.exists())
    }

    // tries a series of fallbacks
    pub fn into_possible(self) -> Vec<PathBuf> {
        let Self {
            filename,
            arg_env_dir,
        } = self;

        // the paths returned will be tried in order of pushing
        let mut dirs = Vec::new();

        // explicit, e.g. passing --home /foo to a binary, or env var ORACLE_HOME="/foo"
        // i.e. the path in this case will be /foo/{filename}
        if let Some(dir) = arg_env_dir {
            let expanded = shellexpand::tilde(&dir.to_string_lossy()).to_string();
            dirs.push(PathBuf::from(expanded));
        }

        // the current working directory, wherever the command is run from
        if let Ok(dir) = std::env::current_dir() {
            dirs.push(dir);
        }

        // ~/.attested-oracle/{filename}, directly in the user's home
        if let Some(dir) = dirs::home_dir().map(|dir| dir.join(format!(".{CONFIG_DIRNAME}"))) {
            dirs.push(dir);
        }

        // the system config directory, e.g.
        // Linux: ~/.config/attested-oracle
        // macOS: ~/Library/Application Support/attested-oracle
        if let Some(dir) = dirs::config_dir().map(|dir| dir.join(CONFIG_DIRNAME)) {
            dirs.push(dir);
        }

        if let Some(dir) = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .map(|dir| dir.join(CONFIG_DIRNAME))
        {
            dirs.push(dir);
        }

        // on macOS and windows config_dir above is not ~/.config
        if let Some(dir) = dirs::home_dir().map(|dir| dir.join(".config").join(CONFIG_DIRNAME)) {
            dirs.push(dir);
        }

        dirs.push(PathBuf::from("/etc").join(CONFIG_DIRNAME));

        let mut all_files: Vec<PathBuf> = dirs.into_iter().map(|dir| dir.join(&filename)).collect();

        all_files.dedup();

        all_files
    }
}
