use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

fn default_page_size() -> usize {
    10
}

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub service_name: String,
    pub listen_port: String,
    pub database_url: String,
    pub database_pool_max_connections: u32,
    // accounts matching this email are granted the admin dashboard
    pub admin_email: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    //email
    pub from_email: String,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub smtp_server: String,
    pub smtp_port: u16,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .add_source(Environment::default())
            .build()?;
        conf.try_deserialize()
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}
