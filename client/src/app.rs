use std::collections::HashSet;
use std::sync::Arc;

use leptos::prelude::*;

use grid_shared::{Position, PublicUser, SquareMap};

use crate::auth::{LocalUserStore, UserStore};
use crate::canvas::GridCanvas;
use crate::images::LoadedImages;
use crate::leaderboard::Leaderboard;
use crate::panel::UserPanel;
use crate::storage::{LocalSquareStore, SquareStore};
use crate::toolbar::Toolbar;
use crate::viewport::Viewport;

// Context newtypes so expect_context() picks the right signal.
#[derive(Clone, Copy)]
pub(crate) struct Selected(pub RwSignal<Option<Position>>);
#[derive(Clone, Copy)]
pub(crate) struct SearchTerm(pub RwSignal<String>);
#[derive(Clone, Copy)]
pub(crate) struct SearchResults(pub RwSignal<HashSet<String>>);
#[derive(Clone, Copy)]
pub(crate) struct CurrentUser(pub RwSignal<Option<PublicUser>>);
#[derive(Clone, Copy)]
pub(crate) struct AllUsers(pub RwSignal<Vec<PublicUser>>);
#[derive(Clone, Copy)]
pub(crate) struct ShowLeaderboard(pub RwSignal<bool>);
/// Transient user-facing feedback line shown in the panel.
#[derive(Clone, Copy)]
pub(crate) struct StatusMessage(pub RwSignal<Option<String>>);

/// Persistence backends, injected via context so components never talk to
/// localStorage directly. Context storage requires `Send + Sync`, so the
/// trait objects carry those bounds (both backends are zero-sized).
#[derive(Clone)]
pub(crate) struct Stores {
    pub squares: Arc<dyn SquareStore + Send + Sync>,
    pub users: Arc<dyn UserStore + Send + Sync>,
}

impl Stores {
    pub fn local() -> Self {
        Self {
            squares: Arc::new(LocalSquareStore),
            users: Arc::new(LocalUserStore),
        }
    }
}

/// Root application component. Provides global reactive signals via context.
#[component]
pub fn App() -> impl IntoView {
    let stores = Stores::local();

    // Global signals
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let squares: RwSignal<SquareMap> = RwSignal::new(stores.squares.load_all());
    let loaded_images: RwSignal<LoadedImages> = RwSignal::new(LoadedImages::new());
    let selected: RwSignal<Option<Position>> = RwSignal::new(None);
    let search_term: RwSignal<String> = RwSignal::new(String::new());
    let search_results: RwSignal<HashSet<String>> = RwSignal::new(HashSet::new());
    let current_user: RwSignal<Option<PublicUser>> = RwSignal::new(stores.users.current_user());
    let all_users: RwSignal<Vec<PublicUser>> = RwSignal::new(stores.users.all_users());
    let show_leaderboard: RwSignal<bool> = RwSignal::new(false);
    let status: RwSignal<Option<String>> = RwSignal::new(None);

    provide_context(viewport);
    provide_context(squares);
    provide_context(loaded_images);
    provide_context(Selected(selected));
    provide_context(SearchTerm(search_term));
    provide_context(SearchResults(search_results));
    provide_context(CurrentUser(current_user));
    provide_context(AllUsers(all_users));
    provide_context(ShowLeaderboard(show_leaderboard));
    provide_context(StatusMessage(status));
    provide_context(stores);

    // Recompute highlighted matches whenever the term or the squares change.
    Effect::new(move || {
        let term = search_term.get().trim().to_lowercase();
        squares.with(|squares| {
            if term.is_empty() {
                if !search_results.with_untracked(HashSet::is_empty) {
                    search_results.set(HashSet::new());
                }
                return;
            }
            let matches: HashSet<String> = squares
                .values()
                .filter(|square| {
                    square.id.to_lowercase().contains(&term)
                        || square
                            .owner
                            .as_deref()
                            .is_some_and(|owner| owner.to_lowercase().contains(&term))
                })
                .map(|square| square.id.clone())
                .collect();
            search_results.set(matches);
        });
    });

    view! {
        <div style="display: flex; flex-direction: column; height: 100vh; font-family: Arial, sans-serif;">
            <Toolbar />
            <div style="display: flex; flex: 1; overflow: hidden;">
                <GridCanvas />
                <UserPanel />
            </div>
            {move || {
                if show_leaderboard.get() {
                    view! { <Leaderboard /> }.into_any()
                } else {
                    ().into_any()
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::Stores;

    fn assert_send_sync<T: Send + Sync>() {}

    // Context values must be shareable across threads.
    #[test]
    fn stores_context_value_is_send_and_sync() {
        assert_send_sync::<Stores>();
    }
}
