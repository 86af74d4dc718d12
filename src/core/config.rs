#[derive(Debug, Clone)]
pub struct Config {
    pub database_name: String,
    pub version: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_name: String::from("quarry"),
            version: 1,
        }
    }
}

impl Config {
    pub fn new(database_name: &str) -> Self {
        Config {
            database_name: database_name.to_string(),
            version: 1,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}
