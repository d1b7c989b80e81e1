use std::sync::{Arc, Mutex, MutexGuard};

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;

use super::{FavoritesSet, Identity, PersistHandle, PersistOutcome};
use crate::config::FavoritesConfig;
use crate::store::{DocumentStore, LocalStorage, ProfilesExt};
use crate::watch::{Derived, Observable, Subscription};

/// Event name used for change notifications on the attached emitter.
pub const FAVORITES_CHANGED: &str = "FavoritesChanged";

/// Owns the in-memory favorites set and keeps it in step with the store
/// that matches the current identity.
///
/// Local storage is authoritative while anonymous, the user's remote record
/// once signed in. Every change is applied to memory first and published to
/// subscribers, then written. Local storage is written before the call
/// returns; remote writes follow the configured `PersistMode`. A failed
/// write is logged, never rolled back.
///
/// ## Example
///
/// ```ignore
/// use std::sync::Arc;
/// use shelfkeeper::{FavoritesSync, InMemoryDocumentStore, InMemoryLocalStorage};
/// use shelfkeeper::config::FavoritesConfig;
///
/// let sync = FavoritesSync::new(
///     Arc::new(InMemoryLocalStorage::new()),
///     Arc::new(InMemoryDocumentStore::new()),
///     FavoritesConfig::default(),
/// );
///
/// sync.add("book-1");
/// sync.sign_in("uid-1").wait();
/// assert_eq!(sync.current_favorites(), vec!["book-1".to_string()]);
/// ```
pub struct FavoritesSync<L, D> {
    local: Arc<L>,
    remote: Arc<D>,
    config: FavoritesConfig,
    state: Observable<FavoritesSet>,
    identity: Observable<Identity>,
    // Held around local storage access that depends on the identity.
    local_guard: Arc<Mutex<()>>,
    #[cfg(feature = "emitter")]
    emitter: Option<Mutex<EventEmitter>>,
}

impl<L, D> FavoritesSync<L, D>
where
    L: LocalStorage + 'static,
    D: DocumentStore + 'static,
{
    /// Create an anonymous synchronizer seeded from local storage.
    pub fn new(local: Arc<L>, remote: Arc<D>, config: FavoritesConfig) -> Self {
        let sync = Self {
            local,
            remote,
            config,
            state: Observable::default(),
            identity: Observable::default(),
            local_guard: Arc::new(Mutex::new(())),
            #[cfg(feature = "emitter")]
            emitter: None,
        };
        sync.state.set(sync.read_local());
        sync
    }

    /// Also announce every change as a `FavoritesChanged` event carrying the
    /// id list.
    #[cfg(feature = "emitter")]
    pub fn with_emitter(mut self, emitter: EventEmitter) -> Self {
        self.emitter = Some(Mutex::new(emitter));
        self
    }

    /// Last known favorites. Never waits on a store.
    pub fn current_favorites(&self) -> Vec<String> {
        self.state.get().into_vec()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.get().contains(id)
    }

    /// Subscribe to the favorites set: the current set first, then every change.
    pub fn favorites(&self) -> Subscription<FavoritesSet> {
        self.state.subscribe()
    }

    /// Whether `id` is a favorite, re-evaluated on every change.
    ///
    /// Every change queues a copy of the set until the stream is read; see
    /// `Observable::subscribe`.
    pub fn is_favorite(&self, id: &str) -> Derived<FavoritesSet, bool> {
        let id = id.to_string();
        self.state.subscribe().map(move |set| set.contains(&id))
    }

    pub fn identity(&self) -> Identity {
        self.identity.get()
    }

    /// Subscribe to identity changes.
    pub fn identity_changes(&self) -> Subscription<Identity> {
        self.identity.subscribe()
    }

    /// Add `id` and persist. Adding an id that is already a favorite does
    /// nothing and writes nothing.
    pub fn add(&self, id: &str) -> PersistHandle {
        let Some(updated) = self.state.update_if(|set| set.insert(id)) else {
            log::debug!("{} is already a favorite", id);
            return PersistHandle::done(PersistOutcome::Skipped);
        };
        self.notify(&updated);
        self.persist(updated)
    }

    /// Remove `id` and persist the remaining set.
    pub fn remove(&self, id: &str) -> PersistHandle {
        let updated = self.state.update(|set| {
            set.remove(id);
            set.clone()
        });
        self.notify(&updated);
        self.persist(updated)
    }

    /// Switch to `identity`, merging or reloading favorites as needed.
    pub fn set_identity(&self, identity: Identity) -> PersistHandle {
        match identity {
            Identity::Authenticated { uid } => self.sign_in(&uid),
            Identity::Anonymous => {
                self.sign_out();
                PersistHandle::done(PersistOutcome::Skipped)
            }
        }
    }

    /// Load the user's remote favorites and fold in whatever was saved
    /// anonymously on this device.
    ///
    /// The union is written back to the remote record; local storage is
    /// cleared only once that write succeeds and only if `uid` is still
    /// signed in, so a failed or interrupted merge is retried at the next
    /// sign-in. Concurrent sign-ins on other devices race and the last union
    /// written wins.
    pub fn sign_in(&self, uid: &str) -> PersistHandle {
        self.identity.set(Identity::authenticated(uid));

        let remote = self.read_remote(uid);
        log::debug!("loaded {} remote favorites for {}", remote.len(), uid);
        self.state.set(remote.clone());
        self.notify(&remote);

        let local = self.read_local();
        if local.is_empty() {
            return PersistHandle::done(PersistOutcome::Skipped);
        }

        let merged = self.state.update(|set| {
            set.extend(local.iter().cloned());
            set.clone()
        });
        log::debug!(
            "merging {} local favorites into {} for {}",
            local.len(),
            merged.len(),
            uid
        );
        self.notify(&merged);

        let local_store = Arc::clone(&self.local);
        let remote_store = Arc::clone(&self.remote);
        let identity = self.identity.clone();
        let guard = Arc::clone(&self.local_guard);
        let key = self.config.storage_key.clone();
        let collection = self.config.users_collection.clone();
        let uid = uid.to_string();

        PersistHandle::run(self.config.persist, move || {
            match remote_store
                .profiles_in(&collection)
                .merge_favorites(&uid, merged.ids())
            {
                Ok(version) => {
                    let _held = lock_guard(&guard);
                    if identity.get().uid() == Some(uid.as_str()) {
                        if let Err(err) = local_store.remove_item(&key) {
                            log::error!("error clearing local favorites: {}", err);
                        }
                    } else {
                        log::debug!(
                            "{} signed out before the merge finished, keeping local favorites",
                            uid
                        );
                    }
                    PersistOutcome::Remote { version }
                }
                Err(err) => {
                    log::error!("error saving merged favorites for {}: {}", uid, err);
                    PersistOutcome::Failed(err.to_string())
                }
            }
        })
    }

    /// Drop back to anonymous and show the favorites saved on this device.
    pub fn sign_out(&self) {
        let local = {
            let _held = lock_guard(&self.local_guard);
            self.identity.set(Identity::Anonymous);
            self.read_local()
        };
        self.state.set(local.clone());
        self.notify(&local);
    }

    fn persist(&self, favorites: FavoritesSet) -> PersistHandle {
        match self.identity.get() {
            Identity::Authenticated { uid } => {
                let remote = Arc::clone(&self.remote);
                let collection = self.config.users_collection.clone();
                PersistHandle::run(self.config.persist, move || {
                    match remote
                        .profiles_in(&collection)
                        .merge_favorites(&uid, favorites.ids())
                    {
                        Ok(version) => PersistOutcome::Remote { version },
                        Err(err) => {
                            log::error!("error saving favorites for {}: {}", uid, err);
                            PersistOutcome::Failed(err.to_string())
                        }
                    }
                })
            }
            // Local writes stay in call order whatever the persist mode.
            Identity::Anonymous => {
                let _held = lock_guard(&self.local_guard);
                let outcome =
                    match write_local(self.local.as_ref(), &self.config.storage_key, &favorites) {
                        Ok(()) => PersistOutcome::Local,
                        Err(err) => {
                            log::error!("error saving local favorites: {}", err);
                            PersistOutcome::Failed(err)
                        }
                    };
                PersistHandle::done(outcome)
            }
        }
    }

    fn read_local(&self) -> FavoritesSet {
        let key = &self.config.storage_key;
        match self.local.get_item(key) {
            Ok(Some(raw)) => match serde_json::from_str::<FavoritesSet>(&raw) {
                Ok(set) => set,
                Err(err) => {
                    log::warn!("ignoring unreadable local favorites under {}: {}", key, err);
                    FavoritesSet::new()
                }
            },
            Ok(None) => FavoritesSet::new(),
            Err(err) => {
                log::warn!("error reading local favorites: {}", err);
                FavoritesSet::new()
            }
        }
    }

    fn read_remote(&self, uid: &str) -> FavoritesSet {
        match self
            .remote
            .profiles_in(&self.config.users_collection)
            .get(uid)
        {
            Ok(Some(profile)) => FavoritesSet::from_ids(profile.favorites().iter().cloned()),
            Ok(None) => FavoritesSet::new(),
            Err(err) => {
                log::warn!("error loading favorites for {}, using none: {}", uid, err);
                FavoritesSet::new()
            }
        }
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, favorites: &FavoritesSet) {
        if let Some(emitter) = &self.emitter {
            match emitter.lock() {
                Ok(mut emitter) => {
                    emitter.emit(FAVORITES_CHANGED, favorites.ids().to_vec());
                }
                Err(_) => log::warn!("favorites emitter lock poisoned"),
            }
        }
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _favorites: &FavoritesSet) {}
}

fn lock_guard(guard: &Mutex<()>) -> MutexGuard<'_, ()> {
    guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_local<L: LocalStorage + ?Sized>(
    local: &L,
    key: &str,
    favorites: &FavoritesSet,
) -> Result<(), String> {
    let raw = serde_json::to_string(favorites).map_err(|e| e.to_string())?;
    local.set_item(key, &raw).map_err(|e| e.to_string())
}
