#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::env;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use common::config::{
        get_config_path, get_configs_from_dot_env, get_configs_from_proc_env, init_env_from_config, keys,
        set_configs, ConfigHandler, ConfigHandlerImpl
    };
    use serial_test::serial;


    fn get_test_env_path() -> String {
        let config_path = get_config_path();
        format!("{}/{}", config_path, ".env")
    }

    // create a mock .env file
    fn setup() {
        let config_path_str = get_config_path();
        let config_path = Path::new(&config_path_str);
        if !config_path.exists() {
            fs::create_dir_all(config_path).expect("Failed to create test config directory");
        }

        let env_path_str = get_test_env_path();
        let mut file = File::create(env_path_str).expect("Failed to create mock .env file");
        writeln!(file, "TEST_KEY_1=test_value_1").expect("Failed to write to mock .env file");
        writeln!(file, "TEST_KEY_2=test_value_2").expect("Failed to write to mock .env file");
    }

    // remove the mock .env file
    fn teardown() {
        let env_path = get_test_env_path();
        let env_path_exists = Path::new(&env_path).exists();
        if env_path_exists {
            fs::remove_file(env_path).expect("Failed to remove mock .env file");
        }
        let config_path = get_config_path();
        print!("dir: {}", config_path);
        if !env_path_exists && Path::new(&config_path).exists() {
           fs::remove_dir(config_path).expect("Failed to remove test config directory");
        }
    }

    #[test]
    #[serial]
    fn test_get_configs_from_dot_env() {
        setup();
        let configs = get_configs_from_dot_env();
        let mut expected_configs = BTreeMap::new();
        expected_configs.insert("TEST_KEY_1".to_string(), "test_value_1".to_string());
        expected_configs.insert("TEST_KEY_2".to_string(), "test_value_2".to_string());
        assert_eq!(configs, expected_configs);
        teardown();
    }
    #[test]
    #[serial]
    fn test_get_configs_from_dot_env_skips_unreadable_line() {
        setup();
        let mut file = File::create(get_test_env_path()).expect("Failed to create mock .env file");
        file.write_all(b"TEST_KEY_1=test_value_1\n\xFF\xFE=bad\nTEST_KEY_2=test_value_2\n")
            .expect("Failed to write to mock .env file");

        let configs = get_configs_from_dot_env();
        assert_eq!(configs.get("TEST_KEY_1").map(String::as_str), Some("test_value_1"));
        assert_eq!(configs.get("TEST_KEY_2").map(String::as_str), Some("test_value_2"));
        assert_eq!(configs.len(), 2);
        teardown();
    }

    #[test]
    #[serial]
    fn test_set_configs() {
        setup();
        let mut new_configs = HashMap::new();
        new_configs.insert("TEST_KEY_2".to_string(), "new_value_2".to_string());
        new_configs.insert("TEST_KEY_3".to_string(), "test_value_3".to_string());
        set_configs(new_configs).unwrap();

        let configs_from_dot_env = get_configs_from_dot_env();
        let configs_from_proc_env = get_configs_from_proc_env();
        let mut expected_configs = BTreeMap::new();
        expected_configs.insert("TEST_KEY_1".to_string(), "test_value_1".to_string());
        expected_configs.insert("TEST_KEY_2".to_string(), "new_value_2".to_string());
        expected_configs.insert("TEST_KEY_3".to_string(), "test_value_3".to_string());

        // all keys and values in expected_confings should exist in configs_from_dot_nev and configs_from_proc_env
        for (key, value) in &expected_configs {
            assert_eq!(configs_from_dot_env.get(key), Some(value), "Key '{}' is missing or has a different value", key);
            assert_eq!(configs_from_proc_env.get(key), Some(value), "Key '{}' is missing or has a different value", key);
        }

        // dotenv never overrides existing vars, keep the process env clean for other tests
        for key in expected_configs.keys() {
            env::remove_var(key);
        }
        teardown();
    }

    #[test]
    #[serial]
    fn test_init_env_from_config() {
        setup();
        init_env_from_config();

        assert_eq!(env::var("TEST_KEY_1").unwrap(), "test_value_1");
        assert_eq!(env::var("TEST_KEY_2").unwrap(), "test_value_2");
        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_config_handler_round_trip() {
        setup();
        let handler = ConfigHandlerImpl;
        handler.set_configs(HashMap::from([
            (keys::CONFIG_KEY_HOST_ENV.to_string(), "text".to_string())
        ])).await.unwrap();

        let configs = handler.get_configs().await;
        assert_eq!(configs.get(keys::CONFIG_KEY_HOST_ENV).map(String::as_str), Some("text"));
        assert_eq!(configs.get("TEST_KEY_1").map(String::as_str), Some("test_value_1"));

        // clean up the process env for other tests
        env::remove_var(keys::CONFIG_KEY_HOST_ENV);
        teardown();
    }
}
