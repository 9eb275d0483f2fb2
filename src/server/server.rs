use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::server::*;
use crate::settings::Settings;
use nanoid::nanoid;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use std::time::Duration;

pub struct Server {
    pub connection_service: Arc<dyn ConnectionService>,
    pub follow_service: Arc<dyn FollowService>,
    pub block_service: Arc<dyn BlockService>,
    pub messaging_service: Arc<dyn MessagingService>,
    pub payment_service: Arc<dyn PaymentService>,
    pub session_verifier: Arc<dyn SessionVerifier>,
    pool: Option<Pool<MySql>>,
}

/// Every repository port, backed by one store.
struct Repos {
    connection: Arc<dyn ConnectionRepo>,
    request: Arc<dyn ConnectionRequestRepo>,
    follow: Arc<dyn FollowRepo>,
    block: Arc<dyn BlockRepo>,
    message: Arc<dyn MessageRepo>,
    user: Arc<dyn UserRepo>,
    tx_manager: Arc<dyn TxManager>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let alphabet: [char; 16] = [
            '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'a', 'b', 'c', 'd', 'e', 'f',
        ];
        let run_id = nanoid!(10, &alphabet);

        let (repos, pool) = match settings.store.backend.as_str() {
            "memory" => {
                let store = Arc::new(MemoryStore::new());
                let repos = Repos {
                    connection: store.clone(),
                    request: store.clone(),
                    follow: store.clone(),
                    block: store.clone(),
                    message: store.clone(),
                    user: store.clone(),
                    tx_manager: store,
                };
                (repos, None)
            }
            "mysql" => {
                let dsn = settings
                    .store
                    .dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("store.dsn is required for mysql"))?;
                let pool = MySqlPoolOptions::new()
                    .max_connections(settings.store.max_connections)
                    .connect(dsn)
                    .await?;
                let repos = Repos {
                    connection: Arc::new(MySqlConnectionRepo::new(pool.clone())),
                    request: Arc::new(MySqlConnectionRequestRepo::new(pool.clone())),
                    follow: Arc::new(MySqlFollowRepo::new(pool.clone())),
                    block: Arc::new(MySqlBlockRepo::new(pool.clone())),
                    message: Arc::new(MySqlMessageRepo::new(pool.clone())),
                    user: Arc::new(MySqlUserRepo::new(pool.clone())),
                    tx_manager: Arc::new(MySqlTxManager::new(pool.clone())),
                };
                (repos, Some(pool))
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let cache: Arc<dyn RelationCache> = match settings.cache.backend.as_str() {
            "memory" => Arc::new(MemoryRelationCache::new()),
            "redis" => {
                let dsn = settings
                    .cache
                    .dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("cache.dsn is required for redis"))?;
                let redis_client = redis::Client::open(dsn)?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisRelationCache::new(
                    redis_manager,
                    settings.cache.prefix.clone(),
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown cache backend: {}", other)),
        };

        let events: Arc<dyn EventSink> = match settings.events.backend.as_str() {
            "log" => Arc::new(TracingEventSink),
            "kafka" => {
                let servers = settings
                    .events
                    .bootstrap_servers
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("events.bootstrap_servers is required"))?;
                let publisher: Arc<dyn EventPublisher> = Arc::new(KafkaPublisher::new(
                    servers,
                    &format!("tradelink-pub-{}", run_id),
                    Duration::from_secs(settings.events.delivery_timeout_secs),
                )?);
                Arc::new(PublishingEventSink::new(
                    publisher,
                    settings.events.topic.clone(),
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown events backend: {}", other)),
        };

        let session_verifier: Arc<dyn SessionVerifier> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeSessionVerifier::new()),
            "jwt" => {
                let key = std::env::var(&settings.auth.signing_key_env).map_err(|_| {
                    anyhow::anyhow!("{} is not set", settings.auth.signing_key_env)
                })?;
                Arc::new(JwtSessionVerifier::new(JwtConfig {
                    issuer: settings.auth.issuer.clone(),
                    audience: settings.auth.audience.clone(),
                    signing_key: key.into_bytes(),
                }))
            }
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };

        let connection_service: Arc<dyn ConnectionService> =
            Arc::new(RealConnectionService::new(
                repos.connection,
                repos.request,
                repos.tx_manager.clone(),
                cache.clone(),
                events.clone(),
            ));
        let follow_service: Arc<dyn FollowService> = Arc::new(RealFollowService::new(
            repos.follow,
            cache.clone(),
            events.clone(),
        ));
        let block_service: Arc<dyn BlockService> =
            Arc::new(RealBlockService::new(repos.block, cache, events.clone()));
        let messaging_service: Arc<dyn MessagingService> = Arc::new(RealMessagingService::new(
            repos.message,
            repos.tx_manager,
            connection_service.clone(),
            events,
        ));
        let payment_service: Arc<dyn PaymentService> = Arc::new(RealPaymentService::new(
            repos.user,
            messaging_service.clone(),
        ));

        info!(
            %run_id,
            store = %settings.store.backend,
            cache = %settings.cache.backend,
            events = %settings.events.backend,
            "server started"
        );

        Ok(Self {
            connection_service,
            follow_service,
            block_service,
            messaging_service,
            payment_service,
            session_verifier,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
