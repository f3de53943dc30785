use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::env;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, Mutex, OnceLock};

use rand::prelude::*;

use rand_xorshift::XorShiftRng;

/// Provides a set of patterns useful for testing and benchmarking sorting
/// algorithms. Currently limited to i32 values.

// --- Public ---

pub fn random(len: usize) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    static CACHE: KeyedVecCache = KeyedVecCache::new();

    CACHE.copy_cached_or_gen(len, (), |len, seed, ()| {
        let mut rng: XorShiftRng = rand::SeedableRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen::<i32>()).collect()
    })
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i32>
where
    R: Into<rand::distributions::Uniform<i32>> + Hash,
{
    // :.:.:.::

    static CACHE: KeyedVecCache = KeyedVecCache::new();

    CACHE.copy_cached_or_gen(len, range, |len, seed, range| {
        let mut rng: XorShiftRng = rand::SeedableRng::seed_from_u64(seed);

        // Abstracting over ranges in Rust :(
        let dist: rand::distributions::Uniform<i32> = range.into();
        (0..len).map(|_| dist.sample(&mut rng)).collect()
    })
}

pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i32> {
    //     .:
    //   .:::. :
    // .::::::.::
    // [----][--]
    //  ^      ^
    //  |      |
    // sorted  |
    //     unsorted

    static CACHE: KeyedVecCache = KeyedVecCache::new();

    CACHE.copy_cached_or_gen(len, sorted_percent.to_bits(), |len, _seed, spb| {
        // Simulate a pre-existing sorted slice, where len - sorted_percent
        // are the new unsorted values and part of the overall distribution.
        let sorted_percent = f64::from_bits(spb);
        let mut v = random(len);
        let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;

        v[0..sorted_len].sort_unstable();

        v
    })
}

pub fn all_equal(len: usize) -> Vec<i32> {
    // ......
    // ::::::

    (0..len).map(|_| 66).collect::<Vec<_>>()
}

pub fn ascending(len: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i32).collect::<Vec<_>>()
}

pub fn descending(len: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..len as i32).rev().collect::<Vec<_>>()
}

pub fn sawtooth(len: usize, period: usize) -> Vec<i32> {
    //   .:  .:
    //  ::: :::
    // :::::::::

    let period = period.max(1);
    (0..len).map(|i| (i % period) as i32).collect::<Vec<_>>()
}

pub fn organ_pipe(len: usize) -> Vec<i32> {
    //   .:.
    // .:::::.

    (0..len).map(|i| i.min(len - 1 - i) as i32).collect::<Vec<_>>()
}

pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    //   .:  .:
    // .:::.:::

    if len == 0 {
        return Vec::new();
    }

    static CACHE: KeyedVecCache = KeyedVecCache::new();

    CACHE.copy_cached_or_gen(len, saw_count, |len, _seed, saw_count| {
        let mut vals = random(len);
        let chunks_size = len / saw_count.max(1);

        for chunk in vals.chunks_mut(chunks_size) {
            chunk.sort_unstable();
        }

        vals
    })
}

pub fn saw_descending(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.
    // :::.:::.

    if len == 0 {
        return Vec::new();
    }

    static CACHE: KeyedVecCache = KeyedVecCache::new();

    CACHE.copy_cached_or_gen(len, saw_count, |len, _seed, saw_count| {
        let mut vals = random(len);
        let chunks_size = len / saw_count.max(1);

        for chunk in vals.chunks_mut(chunks_size) {
            chunk.sort_unstable_by_key(|&e| std::cmp::Reverse(e));
        }

        vals
    })
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    if len == 0 {
        return Vec::new();
    }

    static CACHE: KeyedVecCache = KeyedVecCache::new();

    CACHE.copy_cached_or_gen(len, saw_count, |len, _seed, saw_count| {
        let mut vals = random(len);
        let chunks_size = len / saw_count.max(1);
        let saw_directions = random_uniform((len / chunks_size) + 1, 0..=1);

        for (i, chunk) in vals.chunks_mut(chunks_size).enumerate() {
            if saw_directions[i] == 0 {
                chunk.sort_unstable();
            } else if saw_directions[i] == 1 {
                chunk.sort_unstable_by_key(|&e| std::cmp::Reverse(e));
            } else {
                unreachable!();
            }
        }

        vals
    })
}

pub fn get_or_init_rand_seed() -> u64 {
    *SEED_VALUE.get_or_init(|| {
        env::var("OVERRIDE_SEED")
            .ok()
            .map(|seed| u64::from_str(&seed).unwrap())
            .unwrap_or_else(rand_root_seed)
    })
}

// --- Private ---

static SEED_VALUE: OnceLock<u64> = OnceLock::new();

#[cfg(not(miri))]
fn rand_root_seed() -> u64 {
    // We want a fuzzer-like exploration of the test space across runs while
    // keeping crashes reproducible. The seconds since UNIX epoch / 10 are
    // easy to re-construct from CI log output and stable within a run.

    use std::time::{SystemTime, UNIX_EPOCH};

    let epoch_seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    epoch_seconds / 10
}

#[cfg(miri)]
fn rand_root_seed() -> u64 {
    // Miri is usually run with isolation which gives us repeatability but
    // also permutations based on other code that runs before.
    thread_rng().gen()
}

struct KeyedVecCache {
    keyed_caches: Mutex<Option<HashMap<u64, Arc<Vec<i32>>>>>,
}

impl KeyedVecCache {
    const fn new() -> Self {
        Self {
            keyed_caches: Mutex::new(None),
        }
    }

    // Uses a fn pointer to avoid accidental captures. Captured values would
    // need to be accounted for as part of the key.
    fn copy_cached_or_gen<K: Hash>(
        &self,
        len: usize,
        key: K,
        gen_fn: fn(usize, u64, K) -> Vec<i32>,
    ) -> Vec<i32> {
        let seed = get_or_init_rand_seed();

        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let key_hash = hasher.finish();

        // With a fixed seed the generators produce the same values in
        // sequence, and lock plus memcpy is faster than re-generating them,
        // mainly in debug builds.
        {
            let keyed_caches_lock = self.keyed_caches.lock().unwrap();

            if let Some(keyed_caches) = keyed_caches_lock.as_ref() {
                if let Some(v_cached) = keyed_caches.get(&key_hash) {
                    if v_cached.len() >= len {
                        // Cheap clone to return control to other threads as
                        // fast as possible.
                        let v_cached_arc_clone = v_cached.clone();
                        drop(keyed_caches_lock);

                        return v_cached_arc_clone[..len].to_vec();
                    }
                }
            }

            // The lock is shared, so drop it while generating; this might
            // race some work but that's ok.
        }

        let v_new = Arc::new(gen_fn(len, seed, key));
        let v_new_clone = v_new.clone();

        {
            let mut keyed_caches_lock = self.keyed_caches.lock().unwrap();
            let v_cached = keyed_caches_lock
                .get_or_insert_with(Default::default)
                .entry(key_hash)
                .or_insert_with(Default::default);

            // Only keep the generated value if no longer value was inserted
            // in the meantime by another thread.
            if v_new_clone.len() > v_cached.len() {
                *v_cached = v_new_clone;
            }
        }

        v_new.to_vec()
    }
}
