//! Pop sound effects for marking a joker as collected.
//!
//! Primary path is Web Audio: clips are fetched and decoded into
//! `AudioBuffer`s once, then played with low latency at a fixed gain.
//! Loading starts on the first user interaction (browser audio-unlock
//! rules) and happens at most once. If no clip decodes, playback
//! downgrades to a plain `HtmlAudioElement` that swallows its own
//! errors; sound is a non-essential enhancement and nothing here may
//! surface a failure to the user.

use log::debug;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

pub const SFX_URLS: &[&str] = &["/sounds/pop-1.mp3", "/sounds/pop-2.mp3"];
pub const SFX_GAIN: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SfxState {
    Uninitialized,
    Loading,
    Ready,
    Unavailable,
}

/// What a `play()` request resolves to given the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayAction {
    Ignore,
    Queue,
    PlayBuffered,
    PlayFallback,
}

pub struct SfxPlayer {
    state: SfxState,
    // At most one queued play; further requests while queued coalesce.
    pending_play: bool,
    ctx: Option<web_sys::AudioContext>,
    buffers: Vec<web_sys::AudioBuffer>,
}

impl Default for SfxPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SfxPlayer {
    pub fn new() -> Self {
        SfxPlayer {
            state: SfxState::Uninitialized,
            pending_play: false,
            ctx: None,
            buffers: Vec::new(),
        }
    }

    pub fn state(&self) -> SfxState {
        self.state
    }

    /// Enter `Loading` if nothing has been loaded yet. Returns whether
    /// the caller should actually start the fetch/decode work, so
    /// concurrent unlock triggers collapse into one in-flight load.
    fn begin_load(&mut self) -> bool {
        if self.state == SfxState::Uninitialized {
            self.state = SfxState::Loading;
            true
        } else {
            false
        }
    }

    /// Record the load outcome. Returns true when a queued play request
    /// should fire now that loading has settled.
    fn settle_load(&mut self, decoded_clips: usize) -> bool {
        self.state = if decoded_clips > 0 {
            SfxState::Ready
        } else {
            SfxState::Unavailable
        };
        std::mem::take(&mut self.pending_play)
    }

    fn decide_play(&mut self, muted: bool) -> PlayAction {
        if muted {
            return PlayAction::Ignore;
        }
        match self.state {
            SfxState::Uninitialized | SfxState::Loading => {
                self.pending_play = true;
                PlayAction::Queue
            }
            SfxState::Ready => PlayAction::PlayBuffered,
            SfxState::Unavailable => PlayAction::PlayFallback,
        }
    }

    fn ensure_context(&mut self) {
        if self.ctx.is_none() {
            let opts = web_sys::AudioContextOptions::new();
            opts.set_latency_hint(&JsValue::from_str("interactive"));
            match web_sys::AudioContext::new_with_context_options(&opts) {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(err) => debug!("AudioContext unavailable: {:?}", err),
            }
        }
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Unlock audio on a user interaction: create/resume the context
    /// and kick off the one-time clip load. Safe to call repeatedly.
    pub fn unlock(this: &Rc<RefCell<SfxPlayer>>) {
        let (ctx, should_load, fire_fallback) = {
            let mut player = this.borrow_mut();
            player.ensure_context();
            if player.ctx.is_none() {
                // No Web Audio at all: settle so a queued play reaches
                // the fallback element instead of waiting on a load
                // that will never start.
                (None, false, player.settle_load(0))
            } else {
                (player.ctx.clone(), player.begin_load(), false)
            }
        };
        if fire_fallback {
            fallback_play();
        }
        let (Some(ctx), true) = (ctx, should_load) else {
            return;
        };

        let this = this.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let mut decoded = Vec::new();
            for url in SFX_URLS {
                match fetch_and_decode(&ctx, url).await {
                    Ok(buffer) => decoded.push(buffer),
                    // Per-clip failure just shrinks the random pool
                    Err(err) => debug!("sfx clip '{}' failed to decode: {:?}", url, err),
                }
            }
            let fire_pending = {
                let mut player = this.borrow_mut();
                let count = decoded.len();
                player.buffers = decoded;
                player.settle_load(count)
            };
            if fire_pending {
                Self::play_settled(&this);
            }
        });
    }

    /// Play one notification sound. Mute is checked at call time; while
    /// loading, at most one request is queued for when loading settles.
    pub fn play(this: &Rc<RefCell<SfxPlayer>>, muted: bool) {
        let action = this.borrow_mut().decide_play(muted);
        match action {
            PlayAction::Ignore | PlayAction::Queue => {}
            PlayAction::PlayBuffered => Self::play_buffered(this),
            PlayAction::PlayFallback => fallback_play(),
        }
    }

    fn play_settled(this: &Rc<RefCell<SfxPlayer>>) {
        let state = this.borrow().state;
        match state {
            SfxState::Ready => Self::play_buffered(this),
            _ => fallback_play(),
        }
    }

    fn play_buffered(this: &Rc<RefCell<SfxPlayer>>) {
        let player = this.borrow();
        let Some(ctx) = &player.ctx else {
            return;
        };
        if player.buffers.is_empty() {
            return;
        }
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let i = rand::rng().random_range(0..player.buffers.len());
        let Ok(source) = ctx.create_buffer_source() else {
            return;
        };
        source.set_buffer(Some(&player.buffers[i]));

        let Ok(gain) = ctx.create_gain() else {
            return;
        };
        gain.gain().set_value(SFX_GAIN);

        // Independent source node per play; overlapping plays are fine
        let _ = source.connect_with_audio_node(&gain);
        let _ = gain.connect_with_audio_node(&ctx.destination());
        let _ = source.start();
    }
}

// Higher-latency playback used once the Web Audio path is unavailable.
fn fallback_play() {
    let i = rand::rng().random_range(0..SFX_URLS.len());
    if let Ok(audio) = web_sys::HtmlAudioElement::new_with_src(SFX_URLS[i]) {
        let _ = audio.play();
    }
}

async fn fetch_and_decode(
    ctx: &web_sys::AudioContext,
    url: &str,
) -> Result<web_sys::AudioBuffer, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let init = web_sys::RequestInit::new();
    init.set_cache(web_sys::RequestCache::ForceCache);
    let request = web_sys::Request::new_with_str_and_init(url, &init)?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: web_sys::Response = resp_value.dyn_into()?;
    let array_buf = JsFuture::from(resp.array_buffer()?).await?;
    let array_buf: js_sys::ArrayBuffer = array_buf.dyn_into()?;
    let decoded = JsFuture::from(ctx.decode_audio_data(&array_buf)?).await?;
    decoded.dyn_into::<web_sys::AudioBuffer>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_trigger_is_idempotent() {
        let mut player = SfxPlayer::new();
        assert!(player.begin_load());
        assert_eq!(player.state(), SfxState::Loading);
        // A second trigger must not restart the load
        assert!(!player.begin_load());
        player.settle_load(2);
        assert!(!player.begin_load());
        assert_eq!(player.state(), SfxState::Ready);
    }

    #[test]
    fn play_while_loading_queues_exactly_once() {
        let mut player = SfxPlayer::new();
        player.begin_load();
        assert_eq!(player.decide_play(false), PlayAction::Queue);
        assert_eq!(player.decide_play(false), PlayAction::Queue);
        // One settle fires one coalesced pending play
        assert!(player.settle_load(1));
        assert!(!player.settle_load(1));
    }

    #[test]
    fn total_decode_failure_downgrades_to_fallback() {
        let mut player = SfxPlayer::new();
        player.begin_load();
        player.settle_load(0);
        assert_eq!(player.state(), SfxState::Unavailable);
        assert_eq!(player.decide_play(false), PlayAction::PlayFallback);
    }

    #[test]
    fn queued_play_fires_fallback_when_nothing_decodes() {
        let mut player = SfxPlayer::new();
        player.begin_load();
        assert_eq!(player.decide_play(false), PlayAction::Queue);
        // Settling with zero clips still releases the queued play,
        // which now routes to the fallback element
        assert!(player.settle_load(0));
        assert_eq!(player.state(), SfxState::Unavailable);
        assert_eq!(player.decide_play(false), PlayAction::PlayFallback);
    }

    #[test]
    fn missing_context_releases_queued_play() {
        // A play queued before any context exists must not be stranded
        // when context construction fails outright.
        let mut player = SfxPlayer::new();
        assert_eq!(player.decide_play(false), PlayAction::Queue);
        assert!(player.settle_load(0));
        assert_eq!(player.state(), SfxState::Unavailable);
        assert!(!player.settle_load(0));
    }

    #[test]
    fn mute_wins_in_every_state() {
        let mut player = SfxPlayer::new();
        assert_eq!(player.decide_play(true), PlayAction::Ignore);
        player.begin_load();
        assert_eq!(player.decide_play(true), PlayAction::Ignore);
        player.settle_load(1);
        assert_eq!(player.decide_play(true), PlayAction::Ignore);
        // Muted requests must not queue a pending play either
        assert!(!player.pending_play);
    }

    #[test]
    fn ready_state_plays_immediately() {
        let mut player = SfxPlayer::new();
        player.begin_load();
        player.settle_load(2);
        assert_eq!(player.decide_play(false), PlayAction::PlayBuffered);
    }
}
