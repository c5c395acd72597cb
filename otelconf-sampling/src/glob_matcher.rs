// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Mutex;

const CACHE_SIZE: usize = 256;

/// A backtracking implementation of the glob matching algorithm.
///
/// `*` matches any run of characters (including none) and `?` exactly one character. The
/// pattern must cover the whole subject and the match is case sensitive.
///
/// Results are kept in an LRU cache for faster repeated matching.
pub struct GlobMatcher {
    pattern: String,
    pattern_chars: Vec<char>,
    cache: Mutex<LruCache<String, bool>>,
}

impl fmt::Debug for GlobMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobMatcher")
            .field("pattern", &self.pattern)
            .finish()
    }
}

impl PartialEq for GlobMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl GlobMatcher {
    pub fn new(pattern: &str) -> Self {
        let cache_size = NonZeroUsize::new(CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        GlobMatcher {
            pattern: pattern.to_string(),
            pattern_chars: pattern.chars().collect(),
            cache: Mutex::new(LruCache::new(cache_size)),
        }
    }

    /// Returns the original pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Checks if the whole subject matches the pattern
    pub fn matches(&self, subject: &str) -> bool {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(&result) = cache.get(subject) {
                return result;
            }
        }

        let result = self.match_uncached(subject);

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(subject.to_string(), result);
        }
        result
    }

    fn match_uncached(&self, subject: &str) -> bool {
        let pattern = &self.pattern_chars;
        let subject: Vec<char> = subject.chars().collect();

        let mut px = 0; // Pattern index
        let mut sx = 0; // Subject index
        let mut next_px = 0; // Next backtracking pattern index
        let mut next_sx = 0; // Next backtracking subject index

        while px < pattern.len() || sx < subject.len() {
            if px < pattern.len() {
                match pattern[px] {
                    '?' if sx < subject.len() => {
                        px += 1;
                        sx += 1;
                        continue;
                    }
                    '*' => {
                        next_px = px;
                        next_sx = sx + 1;
                        px += 1;
                        continue;
                    }
                    c if c != '?' && sx < subject.len() && subject[sx] == c => {
                        px += 1;
                        sx += 1;
                        continue;
                    }
                    _ => {}
                }
            }

            // Backtrack to the last `*` and let it swallow one more character
            if 0 < next_sx && next_sx <= subject.len() {
                px = next_px;
                sx = next_sx;
                continue;
            }
            return false;
        }
        true
    }
}

impl Clone for GlobMatcher {
    fn clone(&self) -> Self {
        // each instance maintains its own cache
        GlobMatcher::new(&self.pattern)
    }
}
