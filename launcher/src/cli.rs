use backend::{DEFAULT_API_BASE, DEFAULT_MODEL, GeneratorConfig};
use clap::Parser;
use std::net::IpAddr;

#[derive(Parser)]
#[command(about = "HTTP service that stores NPCs and generates their stock greetings")]
pub struct Cli {
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,
    /// `postgres://` URLs use PostgreSQL, anything else SQLite
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://npc-greeter.db")]
    pub database_url: String,
    #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,
    #[arg(long, env = "GENERATION_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
    #[arg(long, env = "GENERATION_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}

impl Cli {
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            model: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_are_used() {
        let cli = Cli::try_parse_from([
            "npc-greeter",
            "--port",
            "9000",
            "--host",
            "0.0.0.0",
            "--database-url",
            "postgres://localhost/npc",
            "--api-key",
            "secret",
            "--api-base",
            "http://localhost:1234/v1",
            "--model",
            "local-model",
        ])
        .unwrap();

        assert_eq!(cli.port, 9000);
        assert_eq!(cli.host.to_string(), "0.0.0.0");
        assert_eq!(cli.database_url, "postgres://localhost/npc");
        assert_eq!(
            cli.generator_config(),
            GeneratorConfig {
                api_key: "secret".to_string(),
                api_base: "http://localhost:1234/v1".to_string(),
                model: "local-model".to_string(),
            }
        );
    }

    #[test]
    fn rejects_invalid_host() {
        assert!(Cli::try_parse_from(["npc-greeter", "--host", "not-an-ip"]).is_err());
    }
}
