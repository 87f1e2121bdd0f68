use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use grid_shared::{Square, SquareContent, SquareMap, square_price};

use crate::app::{AllUsers, CurrentUser, Selected, StatusMessage, Stores};
use crate::payment;

/// Stripe test payment method; a real card form is out of scope for the demo.
const TEST_PAYMENT_METHOD: &str = "pm_card_visa";

const FONT_FAMILIES: &[&str] = &["Arial", "Georgia", "Courier New", "Verdana"];

fn input_value(ev: &web_sys::Event) -> String {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|el| el.value())
        .unwrap_or_default()
}

fn select_value(ev: &web_sys::Event) -> String {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
        .map(|el| el.value())
        .unwrap_or_default()
}

const FIELD_STYLE: &str =
    "width: 100%; padding: 6px 8px; margin-bottom: 8px; border: 1px solid #ccc; border-radius: 4px; box-sizing: border-box;";
const BUTTON_STYLE: &str =
    "width: 100%; padding: 8px; margin-bottom: 8px; border: none; border-radius: 4px; cursor: pointer; color: #fff;";
const LABEL_STYLE: &str = "font-size: 0.8rem; color: #555; display: block; margin-bottom: 2px;";

/// Right-hand panel: account session plus inspection, purchase,
/// customization, and transfer of the selected square.
#[component]
pub fn UserPanel() -> impl IntoView {
    let CurrentUser(current_user) = expect_context();
    let Selected(selected) = expect_context();
    let StatusMessage(status) = expect_context();

    view! {
        <div style="width: 300px; background: #fff; border-left: 1px solid #ddd; padding: 16px; overflow-y: auto; display: flex; flex-direction: column; gap: 4px;">
            {move || {
                if current_user.get().is_some() {
                    view! { <SessionInfo /> }.into_any()
                } else {
                    view! { <AuthForms /> }.into_any()
                }
            }}
            {move || {
                selected.get().map(|_| view! { <SquareDetails /> })
            }}
            {move || {
                status.get().map(|msg| view! {
                    <p style="font-size: 0.85rem; color: #92400e; background: #fef3c7; padding: 8px; border-radius: 4px;">
                        {msg}
                    </p>
                })
            }}
        </div>
    }
}

#[component]
fn SessionInfo() -> impl IntoView {
    let CurrentUser(current_user) = expect_context();
    let StatusMessage(status) = expect_context();
    let stores: Stores = expect_context();

    let on_logout = move |_| {
        stores.users.logout();
        current_user.set(None);
        status.set(None);
    };

    view! {
        <div>
            {move || {
                current_user.get().map(|user| view! {
                    <p style="margin: 0 0 4px 0; font-weight: bold;">{user.username.clone()}</p>
                    <p style="margin: 0 0 8px 0; font-size: 0.85rem; color: #555;">
                        {format!("{} squares owned", user.squares_owned)}
                    </p>
                })
            }}
            <button
                on:click=on_logout
                style=format!("{BUTTON_STYLE} background: #6b7280;")
            >
                "Log out"
            </button>
        </div>
    }
}

#[component]
fn AuthForms() -> impl IntoView {
    let CurrentUser(current_user) = expect_context();
    let AllUsers(all_users) = expect_context();
    let StatusMessage(status) = expect_context();
    let stores: Stores = expect_context();

    let login_id = RwSignal::new(String::new());
    let login_password = RwSignal::new(String::new());
    let signup_username = RwSignal::new(String::new());
    let signup_email = RwSignal::new(String::new());
    let signup_password = RwSignal::new(String::new());

    let stores_login = stores.clone();
    let on_login = move |_| {
        match stores_login
            .users
            .login(login_id.get_untracked().trim(), &login_password.get_untracked())
        {
            Ok(user) => {
                current_user.set(Some(user));
                status.set(None);
            }
            Err(err) => status.set(Some(err.to_string())),
        }
    };

    let on_sign_up = move |_| {
        match stores.users.sign_up(
            signup_username.get_untracked().trim(),
            signup_email.get_untracked().trim(),
            &signup_password.get_untracked(),
        ) {
            Ok(user) => {
                current_user.set(Some(user));
                all_users.set(stores.users.all_users());
                status.set(None);
            }
            Err(err) => status.set(Some(err.to_string())),
        }
    };

    view! {
        <div>
            <h3 style="margin: 0 0 8px 0;">"Log in"</h3>
            <input
                type="text"
                placeholder="Username or email"
                prop:value=move || login_id.get()
                on:input=move |ev| login_id.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <input
                type="password"
                placeholder="Password"
                prop:value=move || login_password.get()
                on:input=move |ev| login_password.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <button on:click=on_login style=format!("{BUTTON_STYLE} background: #2563eb;")>
                "Log in"
            </button>

            <h3 style="margin: 12px 0 8px 0;">"Sign up"</h3>
            <input
                type="text"
                placeholder="Username (3-13 chars)"
                prop:value=move || signup_username.get()
                on:input=move |ev| signup_username.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <input
                type="email"
                placeholder="Email"
                prop:value=move || signup_email.get()
                on:input=move |ev| signup_email.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <input
                type="password"
                placeholder="Password (8+ chars)"
                prop:value=move || signup_password.get()
                on:input=move |ev| signup_password.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <button on:click=on_sign_up style=format!("{BUTTON_STYLE} background: #16a34a;")>
                "Sign up"
            </button>
        </div>
    }
}

#[component]
fn SquareDetails() -> impl IntoView {
    let squares: RwSignal<SquareMap> = expect_context();
    let Selected(selected) = expect_context();
    let CurrentUser(current_user) = expect_context();

    let square = Memo::new(move |_| {
        let pos = selected.get()?;
        squares.with(|squares| squares.get(&pos.cell_id()).cloned())
    });

    view! {
        <div style="border-top: 1px solid #ddd; padding-top: 12px; margin-top: 8px;">
            {move || {
                let pos = selected.get()?;
                let price = square_price(pos);
                let owner = square.get().and_then(|sq| sq.owner);
                Some(view! {
                    <p style="margin: 0 0 4px 0; font-weight: bold;">
                        {format!("Square ({}, {})", pos.x, pos.y)}
                    </p>
                    <p style="margin: 0 0 8px 0; font-size: 0.85rem; color: #555;">
                        {match &owner {
                            Some(owner) => format!("Owned by {owner}"),
                            None => format!("Unowned \u{00b7} ${price:.2}"),
                        }}
                    </p>
                })
            }}
            {move || {
                selected.get()?;
                let user = current_user.get()?;
                match square.get().and_then(|sq| sq.owner) {
                    None => Some(view! { <PurchaseButton /> }.into_any()),
                    Some(owner) if owner == user.username => {
                        Some(view! { <OwnerTools /> }.into_any())
                    }
                    Some(_) => None,
                }
            }}
        </div>
    }
}

#[component]
fn PurchaseButton() -> impl IntoView {
    let squares: RwSignal<SquareMap> = expect_context();
    let Selected(selected) = expect_context();
    let CurrentUser(current_user) = expect_context();
    let AllUsers(all_users) = expect_context();
    let StatusMessage(status) = expect_context();
    let stores: Stores = expect_context();

    let in_flight = RwSignal::new(false);

    let on_purchase = move |_| {
        let Some(pos) = selected.get_untracked() else {
            return;
        };
        let Some(user) = current_user.get_untracked() else {
            return;
        };
        if in_flight.get_untracked() {
            return;
        }
        let id = pos.cell_id();
        // First buyer wins; an owned square cannot be re-purchased.
        let already_owned = squares
            .with_untracked(|squares| squares.get(&id).is_some_and(|sq| sq.owner.is_some()));
        if already_owned {
            status.set(Some("This square already has an owner".into()));
            return;
        }

        let price = square_price(pos);
        let stores = stores.clone();
        in_flight.set(true);
        status.set(Some(format!("Processing ${price:.2} payment...")));
        spawn_local(async move {
            let paid = payment::process_payment(price, TEST_PAYMENT_METHOD, &id).await;
            in_flight.set(false);
            if !paid {
                status.set(Some("Payment failed".into()));
                return;
            }

            let square = Square::new(pos, user.username.clone(), price);
            stores.squares.save(&square);
            squares.update(|squares| {
                squares.insert(id, square);
            });
            if let Some(updated) = stores.users.record_purchase(&user.username) {
                current_user.set(Some(updated));
            }
            all_users.set(stores.users.all_users());
            status.set(Some("Square purchased".into()));
        });
    };

    view! {
        <button
            on:click=on_purchase
            disabled=move || in_flight.get()
            style=format!("{BUTTON_STYLE} background: #2563eb;")
        >
            {move || {
                let price = selected.get().map(square_price).unwrap_or_default();
                if in_flight.get() {
                    "Processing...".to_string()
                } else {
                    format!("Buy for ${price:.2}")
                }
            }}
        </button>
    }
}

/// Customization and transfer controls, shown only to the square's owner.
#[component]
fn OwnerTools() -> impl IntoView {
    let squares: RwSignal<SquareMap> = expect_context();
    let Selected(selected) = expect_context();
    let CurrentUser(current_user) = expect_context();
    let AllUsers(all_users) = expect_context();
    let StatusMessage(status) = expect_context();
    let stores: Stores = expect_context();

    let text = RwSignal::new(String::new());
    let link = RwSignal::new(String::new());
    let image = RwSignal::new(String::new());
    let background = RwSignal::new(String::from("#f0f0f0"));
    let font_size = RwSignal::new(String::from("16"));
    let font_weight = RwSignal::new(String::from("normal"));
    let font_family = RwSignal::new(String::from("Arial"));
    let transfer_to = RwSignal::new(String::new());

    // Prefill the form from the selected square's current content.
    Effect::new(move || {
        let Some(pos) = selected.get() else {
            return;
        };
        squares.with_untracked(|squares| {
            let Some(square) = squares.get(&pos.cell_id()) else {
                return;
            };
            let content = &square.content;
            text.set(content.text.clone().unwrap_or_default());
            link.set(content.link.clone().unwrap_or_default());
            image.set(content.image.clone().unwrap_or_default());
            background.set(
                content
                    .background_color
                    .clone()
                    .unwrap_or_else(|| "#f0f0f0".into()),
            );
            font_size.set(
                content
                    .font_size
                    .map(|px| format!("{px}"))
                    .unwrap_or_else(|| "16".into()),
            );
            font_weight.set(content.font_weight.clone().unwrap_or_else(|| "normal".into()));
            font_family.set(content.font_family.clone().unwrap_or_else(|| "Arial".into()));
        });
    });

    let stores_apply = stores.clone();
    let on_apply = move |_| {
        let Some(pos) = selected.get_untracked() else {
            return;
        };
        let id = pos.cell_id();
        let non_empty = |s: String| (!s.trim().is_empty()).then_some(s);
        let patch = SquareContent {
            text: non_empty(text.get_untracked()),
            link: non_empty(link.get_untracked()),
            image: non_empty(image.get_untracked()),
            background_color: non_empty(background.get_untracked()),
            font_size: font_size.get_untracked().trim().parse().ok(),
            font_weight: non_empty(font_weight.get_untracked()),
            font_family: non_empty(font_family.get_untracked()),
        };

        squares.update(|squares| {
            if let Some(square) = squares.get_mut(&id) {
                square.content.apply(patch);
                stores_apply.squares.save(square);
            }
        });
        status.set(Some("Square updated".into()));
    };

    let on_transfer = move |_| {
        let Some(pos) = selected.get_untracked() else {
            return;
        };
        let recipient = transfer_to.get_untracked();
        if recipient.is_empty() {
            status.set(Some("Pick a recipient first".into()));
            return;
        }
        let id = pos.cell_id();
        match stores.squares.transfer(&id, &recipient) {
            Some(updated) => {
                squares.update(|squares| {
                    squares.insert(id, updated);
                });
                status.set(Some(format!("Square transferred to {recipient}")));
            }
            None => status.set(Some("Square not found".into())),
        }
    };

    view! {
        <div style="margin-top: 8px;">
            <h4 style="margin: 0 0 8px 0;">"Customize"</h4>
            <label style=LABEL_STYLE>"Text"</label>
            <input
                type="text"
                prop:value=move || text.get()
                on:input=move |ev| text.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <label style=LABEL_STYLE>"Link"</label>
            <input
                type="url"
                placeholder="https://..."
                prop:value=move || link.get()
                on:input=move |ev| link.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <label style=LABEL_STYLE>"Image URL"</label>
            <input
                type="url"
                prop:value=move || image.get()
                on:input=move |ev| image.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <label style=LABEL_STYLE>"Background color"</label>
            <input
                type="color"
                prop:value=move || background.get()
                on:input=move |ev| background.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <label style=LABEL_STYLE>"Font size (px)"</label>
            <input
                type="number"
                min="1"
                prop:value=move || font_size.get()
                on:input=move |ev| font_size.set(input_value(&ev))
                style=FIELD_STYLE
            />
            <label style=LABEL_STYLE>"Font weight"</label>
            <select
                on:change=move |ev| font_weight.set(select_value(&ev))
                prop:value=move || font_weight.get()
                style=FIELD_STYLE
            >
                <option value="normal">"Normal"</option>
                <option value="bold">"Bold"</option>
            </select>
            <label style=LABEL_STYLE>"Font family"</label>
            <select
                on:change=move |ev| font_family.set(select_value(&ev))
                prop:value=move || font_family.get()
                style=FIELD_STYLE
            >
                {FONT_FAMILIES
                    .iter()
                    .map(|family| view! { <option value=*family>{*family}</option> })
                    .collect_view()}
            </select>
            <button on:click=on_apply style=format!("{BUTTON_STYLE} background: #16a34a;")>
                "Apply"
            </button>

            <h4 style="margin: 12px 0 8px 0;">"Transfer"</h4>
            <select
                on:change=move |ev| transfer_to.set(select_value(&ev))
                style=FIELD_STYLE
            >
                <option value="">"Select a user..."</option>
                {move || {
                    let me = current_user.get().map(|u| u.username);
                    all_users
                        .get()
                        .into_iter()
                        .filter(|user| Some(&user.username) != me.as_ref())
                        .map(|user| {
                            let name = user.username.clone();
                            view! { <option value=name.clone()>{name.clone()}</option> }
                        })
                        .collect_view()
                }}
            </select>
            <button on:click=on_transfer style=format!("{BUTTON_STYLE} background: #d97706;")>
                "Transfer square"
            </button>
        </div>
    }
}
