use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// member_number -> member id, for QR check-in lookups.
/// Only active members are cached; inactive members fall through to the DB.
pub static MEMBER_CACHE: Lazy<Cache<String, u64>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000) // tune based on memory
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Remember one member-number mapping
pub async fn remember(member_number: &str, member_id: u64) {
    MEMBER_CACHE
        .insert(member_number.trim().to_uppercase(), member_id)
        .await;
}

/// Look up a member id by number
pub async fn lookup(member_number: &str) -> Option<u64> {
    MEMBER_CACHE.get(&member_number.trim().to_uppercase()).await
}

/// Drop a mapping (member deactivated or renumbered)
pub async fn forget(member_number: &str) {
    MEMBER_CACHE
        .invalidate(&member_number.trim().to_uppercase())
        .await;
}

/// Batch insert mappings
async fn batch_remember(rows: &[(String, u64)]) {
    let futures: Vec<_> = rows
        .iter()
        .map(|(number, id)| MEMBER_CACHE.insert(number.trim().to_uppercase(), *id))
        .collect();

    futures::future::join_all(futures).await;
}

/// Load active members into the in-memory cache (batched)
pub async fn warmup_member_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String, u64)>(
        r#"
        SELECT member_number, id
        FROM members
        WHERE status = 'active'
        ORDER BY id
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let row = row?;
        batch.push(row);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_remember(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_remember(&batch).await;
    }

    log::info!(
        "Member cache warmup complete: {} active members",
        total_count
    );

    Ok(())
}
