use moka::future::Cache;
use std::{future::Future, hash::Hash, time::Duration};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
const MAX_CAPACITY: u64 = 1_000;

/// Read-through cache of upstream responses.
///
/// Entries expire `ttl` after insertion and are then re-fetched on the next read.
#[derive(Clone)]
pub struct ResponseCache<K, V> {
    inner: Cache<K, V>,
}

impl<K, V> ResponseCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(MAX_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    /// Returns the cached value for `key` or runs `fetch`. Only successful results are stored.
    pub async fn get_or_try_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.inner.get(&key).await {
            tracing::debug!("response cache hit");
            return Ok(value);
        }

        let value = fetch().await?;
        self.inner.insert(key, value.clone()).await;
        Ok(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache: ResponseCache<String, u32> = ResponseCache::new(DEFAULT_TTL);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_try_fetch(String::from("upcoming"), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, String>(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache: ResponseCache<&'static str, u32> = ResponseCache::new(DEFAULT_TTL);

        let result = cache
            .get_or_try_fetch("past", || async { Err::<u32, String>(String::from("down")) })
            .await;
        assert_eq!(result, Err(String::from("down")));

        let result = cache
            .get_or_try_fetch("past", || async { Ok::<u32, String>(7) })
            .await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache: ResponseCache<u8, u32> = ResponseCache::new(Duration::from_millis(50));
        cache
            .get_or_try_fetch(1, || async { Ok::<u32, ()>(1) })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        let value = cache
            .get_or_try_fetch(1, || async { Ok::<u32, ()>(2) })
            .await
            .unwrap();
        assert_eq!(value, 2);
    }
}
