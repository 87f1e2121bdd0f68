use leptos::prelude::*;

use crate::app::{AllUsers, ShowLeaderboard};

const MAX_ROWS: usize = 100;

/// Modal ranking users by squares owned.
#[component]
pub fn Leaderboard() -> impl IntoView {
    let AllUsers(all_users) = expect_context();
    let ShowLeaderboard(show_leaderboard) = expect_context();

    let ranked = Memo::new(move |_| {
        let mut users = all_users.get();
        users.sort_by(|a, b| {
            b.squares_owned
                .cmp(&a.squares_owned)
                .then_with(|| a.username.cmp(&b.username))
        });
        users.truncate(MAX_ROWS);
        users
    });

    view! {
        <div
            style="position: fixed; inset: 0; background: rgba(0,0,0,0.5); display: flex; align-items: center; justify-content: center; z-index: 50;"
            on:click=move |_| show_leaderboard.set(false)
        >
            <div
                style="background: #fff; border-radius: 8px; padding: 24px; width: 380px; max-height: 80vh; overflow-y: auto;"
                on:click=|e| e.stop_propagation()
            >
                <div style="display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px;">
                    <h2 style="margin: 0; font-size: 1.3rem;">"Leaderboard"</h2>
                    <button
                        on:click=move |_| show_leaderboard.set(false)
                        style="border: none; background: none; font-size: 1.2rem; cursor: pointer; color: #6b7280;"
                    >
                        "\u{2715}"
                    </button>
                </div>
                <table style="width: 100%; border-collapse: collapse;">
                    <thead>
                        <tr>
                            <th style="text-align: left; padding: 4px 0;">"Rank"</th>
                            <th style="text-align: left; padding: 4px 0;">"Username"</th>
                            <th style="text-align: right; padding: 4px 0;">"Squares"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            ranked
                                .get()
                                .into_iter()
                                .enumerate()
                                .map(|(i, user)| view! {
                                    <tr style="border-top: 1px solid #e5e7eb;">
                                        <td style="padding: 6px 0;">{i + 1}</td>
                                        <td style="padding: 6px 0;">{user.username.clone()}</td>
                                        <td style="padding: 6px 0; text-align: right;">
                                            {user.squares_owned}
                                        </td>
                                    </tr>
                                })
                                .collect_view()
                        }}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
