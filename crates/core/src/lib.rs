pub mod domain;
pub mod ingest;
pub mod stats;
pub mod storage;
pub mod store;

pub mod config {
    use anyhow::Context;

    const DEFAULT_PORT: u16 = 8000;
    const DEFAULT_INSERT_BATCH: usize = 2000;
    const DEFAULT_CORS_ORIGINS: [&str; 4] = [
        "http://127.0.0.1:5500",
        "http://localhost:5500",
        "http://127.0.0.1:5173",
        "http://localhost:5173",
    ];

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub sentry_dsn: Option<String>,
        pub matches_csv: Option<String>,
        pub port: u16,
        pub cors_allow_origins: Vec<String>,
        pub insert_batch: usize,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = match non_empty_var("PORT") {
                Some(s) => s
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a valid port number (got {s:?})"))?,
                None => DEFAULT_PORT,
            };

            let insert_batch = match non_empty_var("MATCHES_INSERT_BATCH") {
                Some(s) => s.parse::<usize>().with_context(|| {
                    format!("MATCHES_INSERT_BATCH must be a positive integer (got {s:?})")
                })?,
                None => DEFAULT_INSERT_BATCH,
            };
            anyhow::ensure!(insert_batch >= 1, "MATCHES_INSERT_BATCH must be >= 1");

            Ok(Self {
                database_url: non_empty_var("DATABASE_URL"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                matches_csv: non_empty_var("MATCHES_CSV"),
                port,
                cors_allow_origins: parse_origins(non_empty_var("CORS_ALLOW_ORIGINS").as_deref()),
                insert_batch,
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn parse_origins(raw: Option<&str>) -> Vec<String> {
        match raw {
            Some(s) => s
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn default_origins_cover_local_dev_servers() {
            let origins = parse_origins(None);
            assert_eq!(origins.len(), 4);
            assert!(origins.contains(&"http://localhost:5173".to_string()));
        }

        #[test]
        fn explicit_origins_are_split_and_trimmed() {
            let origins = parse_origins(Some(" https://a.example , ,https://b.example"));
            assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
        }
    }
}
