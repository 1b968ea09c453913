//! Balatro joker checklist application using Yew.
//! Wires UI components, state hooks, and side-effect logic.

use joker_checklist::audio::SfxPlayer;
use joker_checklist::{
    defaults, is_visible, normalize_name, read_jokers_from_json_str, remote,
    resolve_display_name, sorted_order, storage, toggle_id, Joker, SortMode, ViewMode,
    JOKERS_JSON,
};
use log::{debug, warn};
use std::collections::HashSet;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod config;
mod params;

use components::{render_order_buttons, render_progress, render_view_buttons, JokerCard};
use config::{FALLBACK_TOTAL, ORDER_PARAM, VIEW_PARAM};

/// Primary application component wiring state, effects, and UI elements.
#[function_component(Main)]
fn main_component() -> Html {
    let catalog = use_memo((), |_| {
        read_jokers_from_json_str(JOKERS_JSON).unwrap_or_else(|err| {
            warn!("Joker catalog failed to load: {}", err);
            Vec::new()
        })
    });
    // Normalized filter keys, built once per catalog
    let name_keys = use_memo(catalog.clone(), |catalog: &std::rc::Rc<Vec<Joker>>| {
        catalog
            .iter()
            .map(|j| normalize_name(&resolve_display_name(Some(&j.name), None, &j.id)))
            .collect::<Vec<String>>()
    });

    let checked = use_state(HashSet::<String>::new);
    let filter = use_state(String::new);
    let hide_checked = use_state(|| defaults::HIDE_CHECKED);
    let muted = use_state(|| defaults::MUTED);
    let view_mode = use_state(|| {
        params::get_param(VIEW_PARAM)
            .and_then(|v| ViewMode::from_param(&v))
            .unwrap_or_default()
    });
    let sort_mode = use_state(|| {
        params::get_param(ORDER_PARAM)
            .and_then(|v| SortMode::from_param(&v))
            .unwrap_or_default()
    });
    let sfx = use_mut_ref(SfxPlayer::new);
    let filter_input = use_node_ref();

    // Hydrate persisted state once; the remote mirror, if reachable,
    // overrides the local checked set when it answers.
    {
        let checked = checked.clone();
        let hide_checked = hide_checked.clone();
        let muted = muted.clone();
        use_effect_with((), move |_| {
            checked.set(storage::load_checked());
            hide_checked.set(storage::load_hide_checked());
            muted.set(storage::load_muted());

            wasm_bindgen_futures::spawn_local(async move {
                if let Some(remote_set) = remote::fetch_checked().await {
                    debug!("Remote mirror answered with {} ids", remote_set.len());
                    checked.set(remote_set);
                }
            });
        });
    }

    // Unlock audio on the first user interaction anywhere on the page
    {
        let sfx = sfx.clone();
        use_effect_with((), move |_| {
            let document = gloo_utils::document();
            let unlock = Closure::<dyn FnMut()>::new(move || SfxPlayer::unlock(&sfx));
            for event in ["pointerdown", "keydown"] {
                let _ = document
                    .add_event_listener_with_callback(event, unlock.as_ref().unchecked_ref());
            }
            // unlock is idempotent, so the listeners may stay attached
            unlock.forget();
        });
    }

    let on_toggle = {
        let checked = checked.clone();
        let muted = muted.clone();
        let sfx = sfx.clone();
        Callback::from(move |id: String| {
            let mut set = (*checked).clone();
            let now_checked = toggle_id(&mut set, &id);
            storage::save_checked(&set);
            remote::push_checked(&set);
            if now_checked {
                SfxPlayer::unlock(&sfx);
                SfxPlayer::play(&sfx, *muted);
            }
            checked.set(set);
        })
    };

    let on_filter_input = {
        let filter = filter.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            filter.set(input.value());
        })
    };

    let on_filter_keydown = {
        let filter = filter.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Escape" && !filter.is_empty() {
                filter.set(String::new());
            }
        })
    };

    let on_clear_filter = {
        let filter = filter.clone();
        let filter_input = filter_input.clone();
        Callback::from(move |_: MouseEvent| {
            filter.set(String::new());
            if let Some(input) = filter_input.cast::<HtmlInputElement>() {
                input.set_value("");
                let _ = input.focus();
            }
        })
    };

    let on_hide_toggle = {
        let hide_checked = hide_checked.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            storage::save_hide_checked(input.checked());
            hide_checked.set(input.checked());
        })
    };

    let on_mute_toggle = {
        let muted = muted.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            storage::save_muted(input.checked());
            muted.set(input.checked());
        })
    };

    let on_select_view = {
        let view_mode = view_mode.clone();
        Callback::from(move |mode: ViewMode| {
            if mode != *view_mode {
                params::set_param(VIEW_PARAM, mode.as_param());
                view_mode.set(mode);
            }
        })
    };

    let on_select_order = {
        let sort_mode = sort_mode.clone();
        Callback::from(move |mode: SortMode| {
            if mode != *sort_mode {
                params::set_param(ORDER_PARAM, mode.as_param());
                sort_mode.set(mode);
            }
        })
    };

    let on_reset = {
        let checked = checked.clone();
        Callback::from(move |_: MouseEvent| {
            // Persist an explicit empty list so "cleared by the user" is
            // distinguishable from "never set" in the store.
            let empty = HashSet::new();
            storage::save_checked(&empty);
            remote::push_checked(&empty);
            checked.set(empty);
        })
    };

    let query = normalize_name(&filter);
    let order = sorted_order(&catalog, *sort_mode);
    let total = if catalog.is_empty() {
        FALLBACK_TOTAL
    } else {
        catalog.len()
    };
    let section_class = match *view_mode {
        ViewMode::Grid => "is-grid",
        ViewMode::List => "is-list",
    };

    html! {
        <div class="container">
            <header>
                <h1>{ "Balatro Joker Checklist" }</h1>
                { render_progress(checked.len(), total) }
            </header>

            <div class="toolbar">
                <div class="filter-group">
                    <input
                        type="search"
                        id="filter-jokers"
                        placeholder="Filter jokers…"
                        ref={filter_input}
                        value={(*filter).clone()}
                        oninput={on_filter_input}
                        onkeydown={on_filter_keydown}
                    />
                    <button
                        id="clear-filter"
                        aria-label="Clear filter"
                        hidden={filter.is_empty()}
                        onclick={on_clear_filter}
                    >
                        { "×" }
                    </button>
                </div>

                <label class="hide-checked-control">
                    <input
                        type="checkbox"
                        id="hide-checked"
                        checked={*hide_checked}
                        onchange={on_hide_toggle}
                    />
                    { "Hide collected" }
                </label>

                <label class="mute-control">
                    <input
                        type="checkbox"
                        id="mute-sfx"
                        checked={*muted}
                        onchange={on_mute_toggle}
                    />
                    { "Mute sounds" }
                </label>

                { render_view_buttons(*view_mode, &on_select_view) }
                { render_order_buttons(*sort_mode, &on_select_order) }

                <button id="reset-jokers" onclick={on_reset}>
                    { "Reset all" }
                </button>
            </div>

            <section class={section_class}>
                { order.into_iter().map(|i| {
                    let joker = catalog[i].clone();
                    let is_checked = checked.contains(&joker.id);
                    let hidden = !is_visible(&name_keys[i], &query, *hide_checked, is_checked);
                    let key = joker.id.clone();
                    html! {
                        <JokerCard
                            {key}
                            {joker}
                            checked={is_checked}
                            {hidden}
                            on_toggle={on_toggle.clone()}
                        />
                    }
                }).collect::<Html>() }
            </section>
        </div>
    }
}

/// Entry point: initializes the Yew renderer for the Main component.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<Main>::new().render();
}
