use anyhow::Result;
use chrono::NaiveDate;
use cinelist_models::MovieDetail;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::persist::{self, PersistConfig};
use crate::storage::KeyValueStorage;

/// Name of the wishlist slice inside the persisted root.
pub const SLICE_NAME: &str = "wishlist";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WishlistState {
    pub list_wishlist: Vec<MovieDetail>,
}

impl WishlistState {
    pub fn contains(&self, movie_id: u64) -> bool {
        self.list_wishlist.iter().any(|m| m.id == movie_id)
    }
}

#[derive(Debug, Clone)]
pub enum WishlistAction {
    Add(Box<MovieDetail>),
    Remove(u64),
    Clear,
}

/// Apply `action`, returning whether the state changed.
pub fn reduce(state: &mut WishlistState, action: WishlistAction) -> bool {
    match action {
        WishlistAction::Add(detail) => {
            if state.contains(detail.id) {
                return false;
            }
            state.list_wishlist.push(*detail);
            true
        }
        WishlistAction::Remove(movie_id) => {
            let before = state.list_wishlist.len();
            state.list_wishlist.retain(|m| m.id != movie_id);
            state.list_wishlist.len() != before
        }
        WishlistAction::Clear => {
            let changed = !state.list_wishlist.is_empty();
            state.list_wishlist.clear();
            changed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WishlistSortKey {
    #[default]
    Rating,
    Alphabetical,
    ReleaseDate,
}

impl WishlistSortKey {
    pub fn label(&self) -> &'static str {
        match self {
            WishlistSortKey::Rating => "Rating",
            WishlistSortKey::Alphabetical => "Alphabetical order",
            WishlistSortKey::ReleaseDate => "Release Date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WishlistSort {
    pub key: WishlistSortKey,
    pub order: SortOrder,
}

impl WishlistSort {
    pub fn new(key: WishlistSortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    fn compare(&self, a: &MovieDetail, b: &MovieDetail) -> Ordering {
        let ordering = match self.key {
            WishlistSortKey::Alphabetical => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            WishlistSortKey::Rating => a.vote_average.total_cmp(&b.vote_average),
            WishlistSortKey::ReleaseDate => release_or_epoch(a).cmp(&release_or_epoch(b)),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

fn release_or_epoch(movie: &MovieDetail) -> NaiveDate {
    // NaiveDate::default() is 1970-01-01
    movie.release_day().unwrap_or_default()
}

/// Sorted view over `items`. The input order is left untouched.
pub fn sort_view<'a>(items: &'a [MovieDetail], sort: WishlistSort) -> Vec<&'a MovieDetail> {
    let mut view: Vec<&MovieDetail> = items.iter().collect();
    view.sort_by(|a, b| sort.compare(a, b));
    view
}

type Subscriber = Box<dyn Fn(&WishlistState) + Send + Sync>;

/// Owns the wishlist state and writes it through to storage after every change.
pub struct WishlistStore<S: KeyValueStorage> {
    storage: S,
    config: PersistConfig,
    state: WishlistState,
    subscribers: Vec<(usize, Subscriber)>,
    next_subscriber: usize,
}

impl<S: KeyValueStorage> WishlistStore<S> {
    /// Rehydrate from `storage`. Unreadable slices are logged and replaced by an
    /// empty wishlist.
    pub fn open(storage: S, config: PersistConfig) -> Result<Self> {
        let initial = root_value(&WishlistState::default())?;
        let root = persist::rehydrate(&storage, &config, initial)?;

        let state = match root.get(SLICE_NAME).cloned().map(serde_json::from_value::<WishlistState>) {
            Some(Ok(state)) => state,
            Some(Err(e)) => {
                warn!("Persisted wishlist could not be decoded: {}. Starting with an empty wishlist.", e);
                if let Some(raw) = storage.get_item(&config.key())? {
                    storage.set_item(&config.backup_key(), &raw)?;
                }
                WishlistState::default()
            }
            None => WishlistState::default(),
        };

        info!("Loaded wishlist: {} movies", state.list_wishlist.len());
        Ok(Self {
            storage,
            config,
            state,
            subscribers: Vec::new(),
            next_subscriber: 0,
        })
    }

    pub fn state(&self) -> &WishlistState {
        &self.state
    }

    /// Run the reducer on a copy; on change, persist the copy, adopt it and then
    /// notify subscribers. A failed write leaves the current state untouched.
    pub fn dispatch(&mut self, action: WishlistAction) -> Result<bool> {
        let mut next = self.state.clone();
        if !reduce(&mut next, action) {
            debug!("Wishlist action made no change");
            return Ok(false);
        }

        self.persist(&next)?;
        self.state = next;
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.state);
        }
        Ok(true)
    }

    pub fn add(&mut self, detail: MovieDetail) -> Result<bool> {
        self.dispatch(WishlistAction::Add(Box::new(detail)))
    }

    pub fn remove(&mut self, movie_id: u64) -> Result<bool> {
        self.dispatch(WishlistAction::Remove(movie_id))
    }

    /// Add when absent, remove when present. Returns whether the movie is now saved.
    pub fn toggle(&mut self, detail: MovieDetail) -> Result<bool> {
        if self.contains(detail.id) {
            self.remove(detail.id)?;
            Ok(false)
        } else {
            self.add(detail)?;
            Ok(true)
        }
    }

    pub fn contains(&self, movie_id: u64) -> bool {
        self.state.contains(movie_id)
    }

    pub fn select_all(&self) -> &[MovieDetail] {
        &self.state.list_wishlist
    }

    pub fn sorted(&self, sort: WishlistSort) -> Vec<&MovieDetail> {
        sort_view(&self.state.list_wishlist, sort)
    }

    /// Drop every saved movie in one change. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let count = self.state.list_wishlist.len();
        self.dispatch(WishlistAction::Clear)?;
        Ok(count)
    }

    /// Register a callback run after each accepted change. Returns a handle for
    /// [`WishlistStore::unsubscribe`].
    pub fn subscribe(&mut self, subscriber: impl Fn(&WishlistState) + Send + Sync + 'static) -> usize {
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: usize) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn persist(&self, state: &WishlistState) -> Result<()> {
        let root = root_value(state)?;
        persist::persist(&self.storage, &self.config, &root)
    }
}

fn root_value(state: &WishlistState) -> Result<Value> {
    let mut root = Map::new();
    root.insert(SLICE_NAME.to_string(), serde_json::to_value(state)?);
    Ok(Value::Object(root))
}
