use actix_cors::Cors;
use actix_web::http;

use crate::config::{Config, StoreBackend};
use crate::store::{MemoryStore, ScyllaStore, Store};
use crate::utils::logger::log_success;

pub struct App {
    pub config: Config,
    pub store: Store,
}

impl App {
    pub async fn new() -> Self {
        dotenv::dotenv().ok();

        let config = Config::load();
        let store = match config.store.backend {
            StoreBackend::Scylla => Store::Scylla(ScyllaStore::init(config.scylla()).await),
            StoreBackend::Memory => Store::Memory(MemoryStore::default()),
        };

        Self { config, store }
    }

    /// Init processes that need to be run on startup
    pub fn init(&self) {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

        log_success(format!(
            "{:?} store ready, listening on port {}",
            self.config.store.backend,
            self.port()
        ));
    }

    pub fn cors(&self) -> Cors {
        Cors::default()
            .allowed_origin(self.config.allowed_origin.as_str())
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::ORIGIN,
                http::header::CONTENT_TYPE,
            ])
            .max_age(86400)
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    impl App {
        pub fn memory() -> Self {
            App {
                config: Config {
                    port: 0,
                    allowed_origin: "http://localhost:3001".to_string(),
                    store: StoreConfig {
                        backend: StoreBackend::Memory,
                    },
                    scylla: None,
                },
                store: Store::Memory(MemoryStore::default()),
            }
        }

        pub fn memory_store(&self) -> &MemoryStore {
            match &self.store {
                Store::Memory(store) => store,
                Store::Scylla(_) => panic!("test app must use the memory store"),
            }
        }
    }
}
