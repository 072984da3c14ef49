//! Pricing service implementation
//!
//! Assembles a tenant's active pricing configuration (per-km rate,
//! per-kg rate, active fee bands) and computes trip quotes with the pure
//! engine. The assembled configuration is cached in Redis because the
//! quote endpoint is invoked on every trip form keystroke; cache
//! failures degrade to direct repository reads.

use frete_cache::{keys, RedisCache};
use frete_core::{
    pricing::{compute_trip_cost, PricingConfig, TripCost, TripInput},
    traits::{CacheService, FeeBandRepository, PricingService, RateRepository},
    AppResult,
};
use frete_core::models::RateKind;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;
use tracing::{debug, instrument, warn};

use crate::constants::PRICING_CACHE_TTL;

/// Pricing service implementation with caching
pub struct PricingServiceImpl<R: RateRepository, B: FeeBandRepository> {
    rate_repo: Arc<R>,
    band_repo: Arc<B>,
    cache: Arc<RedisCache>,
}

impl<R: RateRepository, B: FeeBandRepository> PricingServiceImpl<R, B> {
    /// Create a new pricing service
    pub fn new(rate_repo: Arc<R>, band_repo: Arc<B>, cache: Arc<RedisCache>) -> Self {
        Self {
            rate_repo,
            band_repo,
            cache,
        }
    }

    /// Assemble the active configuration straight from the repositories
    async fn load_config(
        rate_repo: &R,
        band_repo: &B,
        tenant: Uuid,
    ) -> AppResult<PricingConfig> {
        let distance_rate = rate_repo
            .find_active(tenant, RateKind::Distance)
            .await?
            .map(|rate| rate.value)
            .unwrap_or(Decimal::ZERO);

        let weight_rate = rate_repo
            .find_active(tenant, RateKind::Weight)
            .await?
            .map(|rate| rate.value)
            .unwrap_or(Decimal::ZERO);

        let fee_bands = band_repo.find_active(tenant).await?;

        Ok(PricingConfig {
            distance_rate,
            weight_rate,
            fee_bands,
        })
    }

    /// Try to get the configuration from cache
    async fn get_from_cache(&self, tenant: Uuid) -> Option<PricingConfig> {
        let key = keys::pricing_config_key(tenant);

        match self.cache.get::<PricingConfig>(&key).await {
            Ok(config) => {
                if config.is_some() {
                    debug!("Pricing config cache HIT for tenant {}", tenant);
                }
                config
            }
            Err(e) => {
                // Degrade to a repository read, never fail the request.
                warn!("Cache error for tenant {}: {}", tenant, e);
                None
            }
        }
    }

    /// Store the configuration in cache
    async fn store_in_cache(&self, tenant: Uuid, config: &PricingConfig) {
        let key = keys::pricing_config_key(tenant);

        if let Err(e) = self.cache.set(&key, config, PRICING_CACHE_TTL).await {
            warn!("Failed to cache pricing config for {}: {}", tenant, e);
        }
    }
}

#[async_trait]
impl<R: RateRepository, B: FeeBandRepository> PricingService for PricingServiceImpl<R, B> {
    #[instrument(skip(self))]
    async fn active_config(&self, tenant: Uuid) -> AppResult<PricingConfig> {
        debug!("Loading active pricing config for tenant {}", tenant);

        // Try cache first
        if let Some(config) = self.get_from_cache(tenant).await {
            return Ok(config);
        }

        // Cache miss - query repositories
        debug!("Pricing config cache MISS for tenant {}", tenant);
        let config = Self::load_config(&self.rate_repo, &self.band_repo, tenant).await?;

        self.store_in_cache(tenant, &config).await;

        Ok(config)
    }

    #[instrument(skip(self, input))]
    async fn quote(&self, tenant: Uuid, input: &TripInput) -> AppResult<TripCost> {
        debug!(
            "Quoting trip for tenant {}: {} -> {} km, {} kg",
            tenant, input.start_km, input.end_km, input.weight
        );

        let config = self.active_config(tenant).await?;
        let cost = compute_trip_cost(input, &config)?;

        debug!(
            "Quoted {} for tenant {} ({} km)",
            cost.total_price, tenant, cost.total_km
        );

        Ok(cost)
    }

    #[instrument(skip(self))]
    async fn invalidate(&self, tenant: Uuid) -> AppResult<()> {
        let key = keys::pricing_config_key(tenant);

        if let Err(e) = self.cache.delete(&key).await {
            // The entry expires on its own; a failed invalidation only
            // delays visibility of the change.
            warn!("Failed to invalidate pricing config for {}: {}", tenant, e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frete_core::models::{DepartureFeeBand, PriceRate};
    use frete_core::AppError;
    use rust_decimal_macros::dec;

    struct MockRateRepository {
        distance: Option<PriceRate>,
        weight: Option<PriceRate>,
    }

    #[async_trait]
    impl RateRepository for MockRateRepository {
        async fn list(&self, _tenant: Uuid, _kind: RateKind) -> AppResult<Vec<PriceRate>> {
            Ok(vec![])
        }

        async fn find_by_id(
            &self,
            _tenant: Uuid,
            _kind: RateKind,
            _id: i32,
        ) -> AppResult<Option<PriceRate>> {
            Ok(None)
        }

        async fn find_active(&self, _tenant: Uuid, kind: RateKind) -> AppResult<Option<PriceRate>> {
            Ok(match kind {
                RateKind::Distance => self.distance.clone(),
                RateKind::Weight => self.weight.clone(),
            })
        }

        async fn activate(
            &self,
            _tenant: Uuid,
            _kind: RateKind,
            _value: Decimal,
        ) -> AppResult<PriceRate> {
            Err(AppError::Internal("not implemented".to_string()))
        }

        async fn update_value(
            &self,
            _tenant: Uuid,
            _kind: RateKind,
            _id: i32,
            _value: Decimal,
        ) -> AppResult<PriceRate> {
            Err(AppError::Internal("not implemented".to_string()))
        }

        async fn set_active(
            &self,
            _tenant: Uuid,
            _kind: RateKind,
            _id: i32,
            _active: bool,
        ) -> AppResult<PriceRate> {
            Err(AppError::Internal("not implemented".to_string()))
        }

        async fn delete(&self, _tenant: Uuid, _kind: RateKind, _id: i32) -> AppResult<bool> {
            Ok(false)
        }
    }

    struct MockFeeBandRepository {
        bands: Vec<DepartureFeeBand>,
    }

    #[async_trait]
    impl FeeBandRepository for MockFeeBandRepository {
        async fn list(&self, _tenant: Uuid) -> AppResult<Vec<DepartureFeeBand>> {
            Ok(self.bands.clone())
        }

        async fn find_active(&self, _tenant: Uuid) -> AppResult<Vec<DepartureFeeBand>> {
            Ok(self.bands.iter().filter(|b| b.active).cloned().collect())
        }

        async fn find_by_id(
            &self,
            _tenant: Uuid,
            _id: i32,
        ) -> AppResult<Option<DepartureFeeBand>> {
            Ok(None)
        }

        async fn create(&self, _band: &DepartureFeeBand) -> AppResult<DepartureFeeBand> {
            Err(AppError::Internal("not implemented".to_string()))
        }

        async fn update(&self, _band: &DepartureFeeBand) -> AppResult<DepartureFeeBand> {
            Err(AppError::Internal("not implemented".to_string()))
        }

        async fn set_active(
            &self,
            _tenant: Uuid,
            _id: i32,
            _active: bool,
        ) -> AppResult<DepartureFeeBand> {
            Err(AppError::Internal("not implemented".to_string()))
        }

        async fn delete(&self, _tenant: Uuid, _id: i32) -> AppResult<bool> {
            Ok(false)
        }
    }

    fn mock_rate(kind: RateKind, value: Decimal) -> PriceRate {
        PriceRate {
            id: 1,
            kind,
            value,
            ..Default::default()
        }
    }

    fn mock_band(start_km: i32, end_km: i32, value: Decimal) -> DepartureFeeBand {
        DepartureFeeBand {
            id: 1,
            start_km,
            end_km,
            value,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_config_assembles_active_rates() {
        let rate_repo = MockRateRepository {
            distance: Some(mock_rate(RateKind::Distance, dec!(2.50))),
            weight: Some(mock_rate(RateKind::Weight, dec!(0.10))),
        };
        let band_repo = MockFeeBandRepository {
            bands: vec![mock_band(200, 400, dec!(157.00))],
        };

        let config =
            PricingServiceImpl::load_config(&rate_repo, &band_repo, Uuid::nil())
                .await
                .unwrap();

        assert_eq!(config.distance_rate, dec!(2.50));
        assert_eq!(config.weight_rate, dec!(0.10));
        assert_eq!(config.fee_bands.len(), 1);
    }

    #[tokio::test]
    async fn test_load_config_defaults_missing_rates_to_zero() {
        let rate_repo = MockRateRepository {
            distance: None,
            weight: None,
        };
        let band_repo = MockFeeBandRepository { bands: vec![] };

        let config =
            PricingServiceImpl::load_config(&rate_repo, &band_repo, Uuid::nil())
                .await
                .unwrap();

        assert_eq!(config.distance_rate, Decimal::ZERO);
        assert_eq!(config.weight_rate, Decimal::ZERO);
        assert!(config.fee_bands.is_empty());
    }

    #[tokio::test]
    async fn test_load_config_skips_inactive_bands() {
        let mut inactive = mock_band(0, 200, dec!(80.00));
        inactive.active = false;

        let rate_repo = MockRateRepository {
            distance: None,
            weight: None,
        };
        let band_repo = MockFeeBandRepository {
            bands: vec![inactive, mock_band(200, 400, dec!(157.00))],
        };

        let config =
            PricingServiceImpl::load_config(&rate_repo, &band_repo, Uuid::nil())
                .await
                .unwrap();

        assert_eq!(config.fee_bands.len(), 1);
        assert_eq!(config.fee_bands[0].start_km, 200);
    }

    #[tokio::test]
    #[ignore] // Requires Redis
    async fn test_quote_through_service() {
        let rate_repo = Arc::new(MockRateRepository {
            distance: Some(mock_rate(RateKind::Distance, dec!(2.50))),
            weight: Some(mock_rate(RateKind::Weight, dec!(0.10))),
        });
        let band_repo = Arc::new(MockFeeBandRepository {
            bands: vec![mock_band(200, 400, dec!(157.00))],
        });
        let cache = Arc::new(RedisCache::new("redis://127.0.0.1:6379").await.unwrap());

        let service = PricingServiceImpl::new(rate_repo, band_repo, cache);
        let tenant = Uuid::new_v4();

        let cost = service
            .quote(
                tenant,
                &TripInput {
                    start_km: dec!(100),
                    end_km: dec!(350),
                    weight: dec!(1000),
                },
            )
            .await
            .unwrap();

        assert_eq!(cost.total_price, dec!(882.00));

        service.invalidate(tenant).await.unwrap();
    }
}
