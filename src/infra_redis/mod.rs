mod relation_cache_redis;

pub use relation_cache_redis::*;
