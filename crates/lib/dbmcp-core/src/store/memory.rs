use std::{
    collections::{BTreeMap, HashMap},
    num::NonZeroU64,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

use super::kv::{KeyValueStore, KvEndpoint, StoreError, StoreResult};

#[derive(Debug, Clone)]
enum Value {
    Text(String),
    Hash(BTreeMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// In-process key-value store with Redis string/hash semantics.
///
/// Expired keys are treated as absent on read and dropped on the next write
/// that touches them.
pub struct MemoryStore {
    endpoint: KvEndpoint,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: KvEndpoint {
                host: "memory".to_string(),
                port: 0,
                db: 0,
            },
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn live<'a>(entries: &'a HashMap<String, Entry>, key: &str) -> Option<&'a Entry> {
    let now = Instant::now();
    entries.get(key).filter(|entry| entry.is_live(now))
}

fn purge_expired(entries: &mut HashMap<String, Entry>, key: &str) {
    let now = Instant::now();
    if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
        entries.remove(key);
    }
}

impl KeyValueStore for MemoryStore {
    fn endpoint(&self) -> &KvEndpoint {
        &self.endpoint
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().await;
        match live(&entries, key).map(|entry| &entry.value) {
            Some(Value::Text(text)) => Ok(Some(text.clone())),
            Some(Value::Hash(_)) => Err(StoreError::WrongType),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<NonZeroU64>) -> StoreResult<()> {
        let expires_at = ttl_secs
            .and_then(|ttl| Instant::now().checked_add(Duration::from_secs(ttl.get())));
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::Text(value.to_string()),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<u64> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let removed = entries.remove(key).is_some_and(|entry| entry.is_live(now));
        Ok(u64::from(removed))
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<BTreeMap<String, String>> {
        let entries = self.entries.read().await;
        match live(&entries, key).map(|entry| &entry.value) {
            Some(Value::Hash(fields)) => Ok(fields.clone()),
            Some(Value::Text(_)) => Err(StoreError::WrongType),
            None => Ok(BTreeMap::new()),
        }
    }

    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut entries = self.entries.write().await;
        purge_expired(&mut entries, key);
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::Hash(BTreeMap::new()),
            expires_at: None,
        });
        let Value::Hash(hash) = &mut entry.value else {
            return Err(StoreError::WrongType);
        };
        for (field, value) in fields {
            hash.insert(field.clone(), value.clone());
        }
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, entry)| entry.is_live(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

/// Redis-style glob matching: `*`, `?`, `[abc]`, `[^abc]`, `[a-z]` and `\`
/// escapes. An unterminated `[` class runs to the end of the pattern.
///
/// Runs in `O(pattern * text)`: only the most recent `*` is ever retried.
#[must_use]
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let tokens = tokenize(&pattern);
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut last_star: Option<(usize, usize)> = None;
    while t < text.len() {
        match tokens.get(p) {
            Some(Token::Star) => {
                last_star = Some((p, t));
                p += 1;
            }
            Some(token) if token.accepts(text[t]) => {
                p += 1;
                t += 1;
            }
            _ => match last_star {
                Some((star, resume)) => {
                    p = star + 1;
                    t = resume + 1;
                    last_star = Some((star, resume + 1));
                }
                None => return false,
            },
        }
    }
    tokens[p..].iter().all(|token| matches!(token, Token::Star))
}

enum Token<'a> {
    Star,
    Any,
    Literal(char),
    Class(&'a [char]),
}

impl Token<'_> {
    fn accepts(&self, ch: char) -> bool {
        match self {
            Self::Star | Self::Any => true,
            Self::Literal(literal) => *literal == ch,
            Self::Class(class) => class_contains(class, ch),
        }
    }
}

fn tokenize(pattern: &[char]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < pattern.len() {
        match pattern[i] {
            '*' => {
                if !matches!(tokens.last(), Some(Token::Star)) {
                    tokens.push(Token::Star);
                }
                i += 1;
            }
            '?' => {
                tokens.push(Token::Any);
                i += 1;
            }
            '[' => {
                let mut end = i + 1;
                while end < pattern.len() && pattern[end] != ']' {
                    end += if pattern[end] == '\\' && end + 1 < pattern.len() { 2 } else { 1 };
                }
                tokens.push(Token::Class(&pattern[i + 1..end]));
                i = end + 1;
            }
            '\\' if i + 1 < pattern.len() => {
                tokens.push(Token::Literal(pattern[i + 1]));
                i += 2;
            }
            literal => {
                tokens.push(Token::Literal(literal));
                i += 1;
            }
        }
    }
    tokens
}

fn class_contains(class: &[char], ch: char) -> bool {
    let negate = class.first() == Some(&'^');
    let mut i = usize::from(negate);
    let mut matched = false;
    while i < class.len() {
        if class[i] == '\\' && i + 1 < class.len() {
            matched |= class[i + 1] == ch;
            i += 2;
        } else if i + 2 < class.len() && class[i + 1] == '-' {
            let (low, high) = if class[i] <= class[i + 2] {
                (class[i], class[i + 2])
            } else {
                (class[i + 2], class[i])
            };
            matched |= (low..=high).contains(&ch);
            i += 3;
        } else {
            matched |= class[i] == ch;
            i += 1;
        }
    }
    matched != negate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_wildcards() {
        assert!(glob_match("*", ""));
        assert!(glob_match("*", "user:1"));
        assert!(glob_match("user:*", "user:42"));
        assert!(!glob_match("user:*", "product:1"));
        assert!(glob_match("h?llo", "hello"));
        assert!(!glob_match("h?llo", "hllo"));
        assert!(glob_match("*:1", "order:1"));
        assert!(glob_match("a**b", "axxb"));
    }

    #[test]
    fn glob_classes_and_escapes() {
        assert!(glob_match("h[ae]llo", "hallo"));
        assert!(!glob_match("h[ae]llo", "hillo"));
        assert!(glob_match("h[^e]llo", "hallo"));
        assert!(!glob_match("h[^e]llo", "hello"));
        assert!(glob_match("key[0-9]", "key7"));
        assert!(glob_match("key[9-0]", "key3"));
        assert!(!glob_match("key[0-9]", "keyx"));
        assert!(glob_match("what\\?", "what?"));
        assert!(!glob_match("what\\?", "whats"));
        assert!(glob_match("a[bc", "ab"));
        assert!(glob_match("[a\\]]x", "]x"));
    }

    #[test]
    fn glob_backtracking_stays_linear() {
        let text = "a".repeat(200);
        let started = Instant::now();
        assert!(!glob_match("*a*a*a*a*a*a*b", &text));
        assert!(glob_match("*a*a*a*a*a*a*", &text));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn strings_and_hashes_do_not_mix() {
        let store = MemoryStore::new();
        store.set("plain", "v", None).await.unwrap();
        store
            .hash_set("hash", &[("f".to_string(), "v".to_string())])
            .await
            .unwrap();

        assert!(matches!(store.get("hash").await, Err(StoreError::WrongType)));
        assert!(matches!(store.hash_get_all("plain").await, Err(StoreError::WrongType)));
        assert!(matches!(
            store.hash_set("plain", &[("f".to_string(), "v".to_string())]).await,
            Err(StoreError::WrongType)
        ));
    }

    #[tokio::test]
    async fn expired_keys_read_as_absent() {
        let store = MemoryStore::new();
        store.entries.write().await.insert(
            "stale".to_string(),
            Entry {
                value: Value::Text("old".to_string()),
                expires_at: Some(Instant::now()),
            },
        );
        tokio::time::sleep(Duration::from_millis(2)).await;

        assert_eq!(store.get("stale").await.unwrap(), None);
        assert!(store.keys("*").await.unwrap().is_empty());
        assert_eq!(store.delete("stale").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ttl_keys_are_live_until_deadline() {
        let store = MemoryStore::new();
        store
            .set("session", "token", NonZeroU64::new(60))
            .await
            .unwrap();
        assert_eq!(store.get("session").await.unwrap().as_deref(), Some("token"));
        assert_eq!(store.delete("session").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn keys_filters_by_pattern() {
        let store = MemoryStore::new();
        for key in ["user:1", "user:2", "product:1"] {
            store.set(key, "x", None).await.unwrap();
        }
        let mut keys = store.keys("user:*").await.unwrap();
        keys.sort();
        assert_eq!(keys, ["user:1", "user:2"]);
    }
}
