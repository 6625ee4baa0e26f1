use gloo_timers::callback::Timeout;
use gloo_utils::document;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{MouseEvent, Node};
use yew::prelude::*;

/// Listen for a mouse event on the whole document while the component is mounted.
///
/// Pointer moves and releases must be seen even when the cursor leaves the
/// dragged element, so drags are tracked at document level.
#[hook]
pub fn use_document_mouse(event: &'static str, callback: Callback<MouseEvent>) {
    use_effect_with(callback, move |callback| {
        let callback = callback.clone();
        let listener = Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| callback.emit(e));
        let doc = document();
        let registered = doc
            .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            .is_ok();
        if !registered {
            log::warn!("Could not listen for document {} events", event);
        }
        move || {
            if registered {
                let _ = doc.remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
            }
            drop(listener);
        }
    });
}

/// Emit `on_outside` for document clicks that land outside every `inside` node.
#[hook]
pub fn use_click_outside(inside: [NodeRef; 2], on_outside: Callback<()>) {
    let handler = use_callback((inside, on_outside), |e: MouseEvent, (inside, on_outside)| {
        let Some(target) = e.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
            return;
        };
        let hit = inside
            .iter()
            .any(|r| r.get().is_some_and(|node| node.contains(Some(&target))));
        if !hit {
            on_outside.emit(());
        }
    });
    use_document_mouse("click", handler);
}

/// Fire `callback` once, `delay_ms` after `key` last changed while `active`.
/// A newer key cancels the pending timer.
#[hook]
pub fn use_timeout_on<K>(key: K, active: bool, delay_ms: u32, callback: Callback<()>)
where
    K: PartialEq + Clone + 'static,
{
    use_effect_with((key, active), move |(_, active)| {
        let handle = active.then(|| Timeout::new(delay_ms, move || callback.emit(())));
        move || drop(handle)
    });
}
