use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Expected capacity and false-positive rate.
/// Tune these based on real congregation sizes.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static MEMBER_NUMBER_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

/// Set once the warmup scan finishes. A negative from a cold or
/// partially-loaded filter would wrongly reject real member numbers, so
/// until this flips every lookup must fall through to the cache/DB.
static WARMUP_COMPLETE: AtomicBool = AtomicBool::new(false);

#[inline]
fn normalize(member_number: &str) -> String {
    member_number.trim().to_uppercase()
}

fn mark_warmed() {
    WARMUP_COMPLETE.store(true, Ordering::Release);
}

/// Check if a member number might exist (false positives possible).
/// A negative lets QR check-in reject an unknown code without a round
/// trip to the database, but is only authoritative after a successful
/// warmup; before that everything reads as a maybe.
pub fn might_exist(member_number: &str) -> bool {
    if !WARMUP_COMPLETE.load(Ordering::Acquire) {
        return true;
    }
    let member_number = normalize(member_number);
    MEMBER_NUMBER_FILTER
        .read()
        .expect("member number filter poisoned")
        .contains(&member_number)
}

/// Insert a single member number into the filter
pub fn insert(member_number: &str) {
    let member_number = normalize(member_number);
    MEMBER_NUMBER_FILTER
        .write()
        .expect("member number filter poisoned")
        .add(&member_number);
}

/// Remove a member number from the filter
pub fn remove(member_number: &str) {
    let member_number = normalize(member_number);
    MEMBER_NUMBER_FILTER
        .write()
        .expect("member number filter poisoned")
        .remove(&member_number);
}

/// Warm up the member-number filter using streaming + batching
pub async fn warmup_member_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream =
        sqlx::query_as::<_, (String,)>("SELECT member_number FROM members").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (member_number,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&member_number));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    mark_warmed();
    log::info!("Member number filter warmup complete: {} members", total);
    Ok(())
}

/// Insert a batch of normalized member numbers
fn insert_batch(member_numbers: &[String]) {
    let mut filter = MEMBER_NUMBER_FILTER
        .write()
        .expect("member number filter poisoned");

    for member_number in member_numbers {
        filter.add(member_number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // single test so the ordering against the global warmup flag is fixed
    #[test]
    fn negatives_are_only_authoritative_after_warmup() {
        // cold filter: nothing can be ruled out, known numbers included
        assert!(might_exist("M-9999"));
        assert!(might_exist("nonsense"));

        mark_warmed();
        assert!(!might_exist("M-9999"));

        insert(" m-0001 ");
        assert!(might_exist("M-0001"));

        remove("M-0001");
        assert!(!might_exist("M-0001"));
    }
}
