//! Pure Yew view components for the checklist UI.
//!
//! This module contains stateless components that render based on props,
//! making them easy to test and reuse.

use crate::config::JOKER_IMAGE_DIR;
use joker_checklist::{resolve_display_name, Joker, SortMode, ViewMode};
use yew::prelude::*;

/// One joker card: a label wrapping the collected checkbox, the sprite
/// and the display name. `hidden` reflects the current filter and
/// hide-checked rules; order changes never alter it.
#[derive(Properties, PartialEq)]
pub struct JokerCardProps {
    pub joker: Joker,
    pub checked: bool,
    pub hidden: bool,
    pub on_toggle: Callback<String>,
}

#[function_component(JokerCard)]
pub fn joker_card(props: &JokerCardProps) -> Html {
    let joker = &props.joker;
    let name = resolve_display_name(Some(&joker.name), None, &joker.id);
    let onchange = {
        let id = joker.id.clone();
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_: Event| on_toggle.emit(id.clone()))
    };

    html! {
        <label class="joker-card" hidden={props.hidden}>
            <input
                type="checkbox"
                id={joker.id.clone()}
                checked={props.checked}
                {onchange}
            />
            <img
                src={format!("{}/{}.webp", JOKER_IMAGE_DIR, joker.id)}
                alt={name.clone()}
                loading="lazy"
            />
            <div class="joker-desc">
                <h2>{ name }</h2>
            </div>
        </label>
    }
}

/// Collected-so-far readout.
pub fn render_progress(checked_count: usize, total: usize) -> Html {
    html! {
        <p class="progress">
            <span id="joker-count">{ checked_count }</span>
            { " / " }
            <span id="joker-total">{ total }</span>
            { " collected" }
        </p>
    }
}

fn active_marker(active: bool) -> Option<&'static str> {
    active.then_some("")
}

/// Grid/list layout toggle buttons.
pub fn render_view_buttons(current: ViewMode, on_select: &Callback<ViewMode>) -> Html {
    let button = |mode: ViewMode, label: &str| {
        let on_select = on_select.clone();
        html! {
            <button
                data-view={mode.as_param()}
                data-active={active_marker(current == mode)}
                onclick={Callback::from(move |_| on_select.emit(mode))}
            >
                { label }
            </button>
        }
    };
    html! {
        <div class="view-toggle" role="group" aria-label="Layout">
            { button(ViewMode::Grid, "Grid") }
            { button(ViewMode::List, "List") }
        </div>
    }
}

/// Alphabetical/game-order toggle buttons.
pub fn render_order_buttons(current: SortMode, on_select: &Callback<SortMode>) -> Html {
    let button = |mode: SortMode, label: &str| {
        let on_select = on_select.clone();
        html! {
            <button
                data-order={mode.as_param()}
                data-active={active_marker(current == mode)}
                onclick={Callback::from(move |_| on_select.emit(mode))}
            >
                { label }
            </button>
        }
    };
    html! {
        <div class="order-toggle" role="group" aria-label="Sort order">
            { button(SortMode::Alphabetical, "A-Z") }
            { button(SortMode::GameOrder, "Game order") }
        </div>
    }
}
