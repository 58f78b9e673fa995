use crate::config::Config;
use crate::domain::blocklist::{BlocklistService, MemoryStore, RequestContext};
use color_eyre::eyre::Context;

/// Builds the blocklist service and blocks the configured seed addresses.
pub async fn setup(config: &Config) -> color_eyre::Result<BlocklistService<MemoryStore>> {
    let max_entries = config.blocklist.max_entries;
    tracing::info!("Using in-memory blocklist storage (max {max_entries} entries).");
    let service = BlocklistService::new(MemoryStore::new().with_max_entries(max_entries));

    let seed = &config.blocklist.seed;
    if !seed.is_empty() {
        service
            .add_all(&RequestContext::background(), seed.as_slice())
            .await
            .wrap_err("Failed to seed the blocklist")?;
        tracing::info!("Seeded blocklist with {} address(es)", seed.len());
    }

    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with_seed(seed: &str) -> Config {
        let mut config = Config::load_with_sources(Some(HashMap::new())).unwrap();
        config.blocklist.seed = seed.split(',').map(str::to_string).collect();
        config
    }

    #[tokio::test]
    async fn test_setup_seeds_the_store() {
        let config = config_with_seed("10.0.0.1,::1,0:0:0:0:0:0:0:1");
        let service = setup(&config).await.unwrap();
        assert_eq!(service.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_setup_rejects_invalid_seed() {
        let config = config_with_seed("10.0.0.1,300.0.0.1");
        let err = setup(&config).await.unwrap_err();
        assert!(format!("{err:?}").contains("300.0.0.1"));
    }

    #[tokio::test]
    async fn test_setup_rejects_seed_over_capacity() {
        let mut config = config_with_seed("10.0.0.1,10.0.0.2,10.0.0.3");
        config.blocklist.max_entries = 2;
        let err = setup(&config).await.unwrap_err();
        assert!(format!("{err:?}").contains("full"));
    }
}
