use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

// all config values in this tool will be written locally in this file
const CONFIG_PATH: &str = "fetcher_config";
const CONFIG_ENV: &str = ".env";

pub mod keys {
    pub const CONFIG_KEY_HOST_ENV: &str = "FETCHER_HOST_ENV";
    pub const CONFIG_KEY_USER_AGENT: &str = "FETCHER_USER_AGENT";
    pub const CONFIG_KEY_DEFAULT_HEADERS: &str = "FETCHER_DEFAULT_HEADERS";
}

pub fn get_config_path() -> String {
    let root_path = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_string_lossy().to_string()))
        .unwrap_or_else(|| String::from("."));
    format!("{}/{}", root_path, CONFIG_PATH)
}

fn get_env_path() -> String {
    let config_path = get_config_path();
    format!("{}/{}", config_path, CONFIG_ENV)
}

// load all configs from .env file into map
// using BTreeMap to get ordered keys
pub fn get_configs_from_dot_env() -> BTreeMap<String, String> {
    let env_path = get_env_path();
    let mut map = BTreeMap::new();
    let file = match File::open(env_path) {
        Ok(file) => file,
        // .env file could not be found
        Err(_) => return map,
    };

    let reader = BufReader::new(file);
    // unreadable lines are skipped, the rest of the file still loads
    for line in reader.lines().filter_map(Result::ok) {
        if let Some((key, value)) = line.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    map
}

pub fn get_configs_from_proc_env() -> BTreeMap<String, String> {
    env::vars().collect()
}

pub fn set_configs(values: HashMap<String, String>) -> io::Result<()> {
    // make sure the path exists
    let config_path_str = get_config_path();
    let config_path = Path::new(config_path_str.as_str());
    if !config_path.exists() {
        create_dir_all(config_path)?;
    }

    // fetch existing values
    let mut config = get_configs_from_dot_env();
    for (key, value) in values {
        config.insert(key, value);
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(get_env_path())?;

    // update entire file
    for (key, value) in config {
        env::set_var(&key, &value);
        writeln!(file, "{}={}", key, value)?;
    }

    Ok(())
}

pub fn init_env_from_config() {
    let env_path = get_env_path();
    dotenv::from_filename(env_path).ok();
}

// this wraps base config functions
#[async_trait]
pub trait ConfigHandler: Send + Sync {
    async fn get_configs(&self) -> BTreeMap<String, String>;
    async fn set_configs(&self, values: HashMap<String, String>) -> io::Result<()>;
}

pub struct ConfigHandlerImpl;

#[async_trait]
impl ConfigHandler for ConfigHandlerImpl {
    async fn get_configs(&self) -> BTreeMap<String, String> {
        get_configs_from_dot_env()
    }

    async fn set_configs(&self, values: HashMap<String, String>) -> io::Result<()> {
        set_configs(values)
    }
}
