use std::{collections::HashSet, sync::Arc};

use rust_decimal::Decimal;
use shared::domain::{MenuItem, ALL_CATEGORIES};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::RemoteApi;

pub const MENU_FALLBACK_NOTICE: &str = "Menu tidak dapat dimuat. Menampilkan contoh.";

/// Lifecycle of a one-shot remote list fetch.
///
/// Moves forward only: `Loading` to either `Ready` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    Loading,
    Ready(Vec<T>),
    /// The fetch failed; `fallback` is shown in place of the remote data.
    Failed { fallback: Vec<T>, message: String },
}

impl<T> FetchState<T> {
    /// Items to display; empty while loading.
    pub fn items(&self) -> &[T] {
        match self {
            FetchState::Loading => &[],
            FetchState::Ready(items) => items,
            FetchState::Failed { fallback, .. } => fallback,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Inline notice for the failed state.
    pub fn notice(&self) -> Option<&str> {
        match self {
            FetchState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Distinct categories in first-seen order, led by [`ALL_CATEGORIES`].
pub fn derive_categories(items: &[MenuItem]) -> Vec<String> {
    let mut seen = HashSet::from([ALL_CATEGORIES]);
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for item in items {
        if seen.insert(item.category.as_str()) {
            categories.push(item.category.clone());
        }
    }
    categories
}

pub fn filter_by_category<'a>(items: &'a [MenuItem], selected: &str) -> Vec<&'a MenuItem> {
    items
        .iter()
        .filter(|item| selected == ALL_CATEGORIES || item.category == selected)
        .collect()
}

/// Sample catalog shown when the backend cannot be reached.
pub fn fallback_menu() -> Vec<MenuItem> {
    vec![
        MenuItem {
            name: "Signature Latte".into(),
            description: "Espresso lembut dengan sirup homemade".into(),
            price: Decimal::new(450, 2),
            category: "Kopi".into(),
            image_url: "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085".into(),
            is_featured: true,
        },
        MenuItem {
            name: "Croissant".into(),
            description: "Pastry renyah, dipanggang setiap pagi".into(),
            price: Decimal::new(300, 2),
            category: "Pastry".into(),
            image_url: "https://images.unsplash.com/photo-1519681393784-d120267933ba".into(),
            is_featured: false,
        },
    ]
}

struct MenuView {
    state: FetchState<MenuItem>,
    selected: String,
    requested: bool,
}

/// Loads the menu once per page lifetime and exposes a category-filtered view of it.
///
/// Dropping the controller cancels its lifecycle token.
pub struct MenuListController {
    api: Arc<dyn RemoteApi>,
    lifecycle: CancellationToken,
    view: Mutex<MenuView>,
}

impl MenuListController {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self::with_lifecycle(api, CancellationToken::new())
    }

    /// Ties the controller to a page lifecycle; cancelling `lifecycle` discards in-flight results.
    pub fn with_lifecycle(api: Arc<dyn RemoteApi>, lifecycle: CancellationToken) -> Self {
        Self {
            api,
            lifecycle,
            view: Mutex::new(MenuView {
                state: FetchState::Loading,
                selected: ALL_CATEGORIES.to_string(),
                requested: false,
            }),
        }
    }

    /// Issues the single menu request. Later calls return the current state untouched.
    pub async fn load(&self) -> FetchState<MenuItem> {
        {
            let mut view = self.view.lock().await;
            if view.requested {
                debug!("menu: already requested for this page");
                return view.state.clone();
            }
            view.requested = true;
        }

        let outcome = tokio::select! {
            biased;
            _ = self.lifecycle.cancelled() => None,
            result = self.api.fetch_menu() => Some(result),
        };

        let mut view = self.view.lock().await;
        let result = match outcome {
            Some(result) if !self.lifecycle.is_cancelled() => result,
            _ => {
                debug!("menu: page torn down, discarding fetch result");
                return view.state.clone();
            }
        };

        view.state = match result {
            Ok(items) => {
                info!(items = items.len(), "menu: loaded");
                FetchState::Ready(items)
            }
            Err(error) => {
                warn!(%error, "menu: load failed, showing sample catalog");
                FetchState::Failed {
                    fallback: fallback_menu(),
                    message: MENU_FALLBACK_NOTICE.to_string(),
                }
            }
        };
        view.state.clone()
    }

    pub async fn state(&self) -> FetchState<MenuItem> {
        self.view.lock().await.state.clone()
    }

    /// Everything currently shown, ignoring the category selection.
    pub async fn items(&self) -> Vec<MenuItem> {
        self.view.lock().await.state.items().to_vec()
    }

    pub async fn categories(&self) -> Vec<String> {
        derive_categories(self.view.lock().await.state.items())
    }

    pub async fn selected_category(&self) -> String {
        self.view.lock().await.selected.clone()
    }

    pub async fn select_category(&self, category: impl Into<String>) {
        self.view.lock().await.selected = category.into();
    }

    /// Items under the selected category, in received order.
    pub async fn visible_items(&self) -> Vec<MenuItem> {
        let view = self.view.lock().await;
        filter_by_category(view.state.items(), &view.selected)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn teardown(&self) {
        self.lifecycle.cancel();
    }
}

impl Drop for MenuListController {
    fn drop(&mut self) {
        self.lifecycle.cancel();
    }
}

#[cfg(test)]
#[path = "tests/menu_tests.rs"]
mod tests;
