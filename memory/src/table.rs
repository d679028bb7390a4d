//! Bounded, least-recently-used table of per-user state.

use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};

use async_lock::Mutex;
use lru::LruCache;
use tracing::info;

/// Shared handle to one user's state.
pub type UserHandle<T> = Arc<Mutex<T>>;

/// Maps user ids to their state, evicting the least recently touched user when full.
///
/// The table lock is only held for bookkeeping; work on a user's state happens under that
/// user's own async mutex, so users never wait on each other.
pub struct UserTable<T> {
    users: parking_lot::Mutex<LruCache<String, UserHandle<T>>>,
    removed: parking_lot::Mutex<Vec<Weak<Mutex<T>>>>,
}

impl<T> std::fmt::Debug for UserTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let users = self.users.lock();
        f.debug_struct("UserTable")
            .field("len", &users.len())
            .field("capacity", &users.cap())
            .finish()
    }
}

impl<T> UserTable<T> {
    /// Creates a table tracking at most `max_users` users (at least one).
    #[must_use]
    pub fn new(max_users: usize) -> Self {
        let capacity = NonZeroUsize::new(max_users).unwrap_or(NonZeroUsize::MIN);
        Self {
            users: parking_lot::Mutex::new(LruCache::new(capacity)),
            removed: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Marks `user_id` as most recently used, creating its state with `init` if absent.
    ///
    /// Creating a user in a full table evicts the least recently used one.
    pub fn touch_or_create(&self, user_id: &str, init: impl FnOnce() -> T) -> UserHandle<T> {
        get_or_insert(&mut self.users.lock(), user_id, init)
    }

    /// Resolves `user_id` again for a caller that obtained `handle` before a long await.
    ///
    /// Returns the tracked state, recreating it with `init` if the user was evicted meanwhile.
    /// Returns `None` if `handle` was dropped through [`remove`](Self::remove), so writes meant
    /// for a reset user are discarded rather than resurrecting it.
    pub fn reacquire(
        &self,
        user_id: &str,
        handle: &UserHandle<T>,
        init: impl FnOnce() -> T,
    ) -> Option<UserHandle<T>> {
        let mut users = self.users.lock();
        let removed = self
            .removed
            .lock()
            .iter()
            .any(|retired| std::ptr::eq(retired.as_ptr(), Arc::as_ptr(handle)));
        if removed {
            return None;
        }
        Some(get_or_insert(&mut users, user_id, init))
    }

    /// Marks `user_id` as most recently used if it is tracked. Never creates state.
    pub fn touch(&self, user_id: &str) -> Option<UserHandle<T>> {
        self.users.lock().get(user_id).map(Arc::clone)
    }

    /// Returns the state of `user_id` without changing its recency.
    pub fn peek(&self, user_id: &str) -> Option<UserHandle<T>> {
        self.users.lock().peek(user_id).map(Arc::clone)
    }

    /// Drops `user_id` and its state. Returns whether it was tracked.
    pub fn remove(&self, user_id: &str) -> bool {
        let mut users = self.users.lock();
        let Some(handle) = users.pop(user_id) else {
            return false;
        };

        let mut removed = self.removed.lock();
        removed.retain(|retired| retired.strong_count() > 0);
        if Arc::strong_count(&handle) > 1 {
            removed.push(Arc::downgrade(&handle));
        }
        true
    }

    /// Returns `true` if `user_id` is tracked, without changing its recency.
    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.users.lock().contains(user_id)
    }

    /// Tracked user ids, least recently used first.
    #[must_use]
    pub fn users(&self) -> Vec<String> {
        self.users.lock().iter().rev().map(|(id, _)| id.clone()).collect()
    }

    /// Number of tracked users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    /// Returns `true` if no user is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn get_or_insert<T>(
    users: &mut LruCache<String, UserHandle<T>>,
    user_id: &str,
    init: impl FnOnce() -> T,
) -> UserHandle<T> {
    if let Some(handle) = users.get(user_id) {
        return Arc::clone(handle);
    }

    let handle = Arc::new(Mutex::new(init()));
    if let Some((evicted, _)) = users.push(user_id.to_owned(), Arc::clone(&handle)) {
        info!(user_id = %evicted, "evicted least recently used user");
    }
    handle
}
