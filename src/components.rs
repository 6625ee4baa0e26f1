//! Yew view components for the visualizer UI.
//!
//! Sizes are computed in Rust and applied as pixel styles; nothing relies on
//! CSS `calc()` with the calibration ratio.

use crate::hooks::use_timeout_on;
use crate::utils::{format_mm, format_ratio, px};
use jewelry_visualizer::calibration::StepDirection;
use jewelry_visualizer::catalog::Stone;
use jewelry_visualizer::config::{
    CREDIT_CARD_HEIGHT_MM, CREDIT_CARD_WIDTH_MM, NOTICE_DURATION_MS, SNAP_ANIMATION_MS,
    TITLE_HEIGHT_PX,
};
use jewelry_visualizer::layout::{center_footprint, mm_to_px, Footprint, SliderGeometry};
use jewelry_visualizer::slider::{SliderInput, SliderPhase};
use web_sys::HtmlInputElement;
use yew::prelude::*;

fn size_style(footprint: Footprint, ratio: f64) -> String {
    format!(
        "width: {}; height: {};",
        px(mm_to_px(footprint.width_mm, ratio)),
        px(mm_to_px(footprint.height_mm, ratio))
    )
}

fn stone_image(src: Option<&str>, class: Classes, alt: String, style: String) -> Html {
    match src {
        Some(src) => html! { <img class={class} src={src.to_string()} alt={alt} style={style} /> },
        None => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct CalibrationPanelProps {
    pub ratio: f64,
    pub open: bool,
    pub dragging: bool,
    pub toggle_ref: NodeRef,
    pub panel_ref: NodeRef,
    pub on_toggle: Callback<()>,
    pub on_step: Callback<StepDirection>,
    pub on_reset: Callback<()>,
    pub on_card_press: Callback<f64>,
}

/// Collapsible panel with the draggable credit card and precision controls.
#[function_component(CalibrationPanel)]
pub fn calibration_panel(props: &CalibrationPanelProps) -> Html {
    let card_style = format!(
        "width: {}; height: {};",
        px(mm_to_px(CREDIT_CARD_WIDTH_MM, props.ratio)),
        px(mm_to_px(CREDIT_CARD_HEIGHT_MM, props.ratio))
    );
    let on_card_down = {
        let on_card_press = props.on_card_press.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_card_press.emit(e.client_y() as f64);
        })
    };
    let step_button = |direction: StepDirection, label: &'static str| {
        let on_step = props.on_step.clone();
        html! {
            <button class="precision-btn" onclick={Callback::from(move |_| on_step.emit(direction))}>
                { label }
            </button>
        }
    };

    html! {
        <div class="calibration">
            <button id="calibration-toggle" ref={props.toggle_ref.clone()}
                onclick={props.on_toggle.reform(|_| ())}>
                { "Calibrate" }
            </button>
            <div ref={props.panel_ref.clone()}
                class={classes!("calibration-panel", (!props.open).then_some("collapsed"))}>
                <p class="calibration-hint">
                    { "Hold a credit card against the screen and drag the card's lower edge until both match." }
                </p>
                <div class={classes!("credit-card", props.dragging.then_some("dragging"))}
                    style={card_style} onmousedown={on_card_down} />
                <div class="calibration-controls">
                    { step_button(StepDirection::Up, "▲") }
                    { step_button(StepDirection::Down, "▼") }
                    <button class="btn-secondary small" onclick={props.on_reset.reform(|_| ())}>
                        { "Reset" }
                    </button>
                </div>
                <div class="calibration-ratio">
                    { "Ratio: " }<span>{ format_ratio(props.ratio) }</span>
                </div>
            </div>
        </div>
    }
}

/// Renders one tile per center stone.
pub fn render_center_stones(stones: &[Stone], selected: Option<usize>, on_select: &Callback<usize>) -> Html {
    html! {
        <div class="center-stone-options">
            { stones.iter().enumerate().map(|(index, stone)| {
                let onclick = on_select.reform(move |_| index);
                let style = stone
                    .image_reference
                    .as_ref()
                    .map(|src| format!("background-image: url('{}');", src))
                    .unwrap_or_default();
                html! {
                    <div class="stone-wrapper">
                        <div class="stone-title">{ &stone.title }</div>
                        <div class={classes!("stone-option", (selected == Some(index)).then_some("selected"))}
                            title={stone.title.clone()} style={style} {onclick} />
                    </div>
                }
            }).collect::<Html>() }
        </div>
    }
}

/// Renders every available size of the selected center stone at real scale.
pub fn render_size_grid(stone: &Stone, selected: Option<f64>, ratio: f64, on_select: &Callback<f64>) -> Html {
    html! {
        <div class="center-stone-sizes visible">
            <h3 class="sizes-title">{ "Available Sizes:" }</h3>
            <div class="size-grid">
                { stone.sizes.iter().map(|&size| {
                    let onclick = on_select.reform(move |_| size);
                    let style = size_style(center_footprint(stone, size), ratio);
                    html! {
                        <div class={classes!("size-item", (selected == Some(size)).then_some("selected"))} {onclick}>
                            { stone_image(stone.image_reference.as_deref(), classes!("size-image"), format_mm(size), style) }
                            <div class="size-label">{ format_mm(size) }</div>
                        </div>
                    }
                }).collect::<Html>() }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SideSliderProps {
    pub geometry: SliderGeometry,
    pub ratio: f64,
    pub center_size: f64,
    pub top: f64,
    pub phase: SliderPhase,
    pub settled_on: Option<usize>,
    pub snap_serial: u32,
    pub side_image: Option<String>,
    pub center_image: Option<String>,
    pub on_input: Callback<SliderInput>,
}

/// One side-stone slider: title, dots with side stones, and the draggable center stone.
#[function_component(SideSlider)]
pub fn side_slider(props: &SideSliderProps) -> Html {
    let snapping = matches!(props.phase, SliderPhase::Snapping { .. });
    use_timeout_on(
        props.snap_serial,
        snapping,
        SNAP_ANIMATION_MS,
        props.on_input.reform(|_| SliderInput::SnapSettled),
    );

    let ratio = props.ratio;
    let geometry = &props.geometry;
    let gap_px = px(mm_to_px(geometry.gap_mm(), ratio));
    let wrapper_style = format!(
        "width: {0}; min-width: {0};",
        px(geometry.container_width_px(ratio))
    );

    let dots = geometry.dots.iter().enumerate().map(|(index, dot)| {
        let label = format_mm(dot.size);
        let image_style = size_style(dot.footprint, ratio);
        let container_style = size_style(dot.footprint.rotated(), ratio);
        let onclick = props.on_input.reform(move |e: MouseEvent| {
            e.stop_propagation();
            SliderInput::DotClick { dot: index }
        });
        let side = |side_class: &'static str, offset: &str, rotate: &'static str| html! {
            <div class={classes!("side-stone-container", side_class)}
                style={format!("{} {}: calc(50% + {});", container_style, offset, gap_px)}>
                { stone_image(props.side_image.as_deref(), classes!("side-stone", rotate), label.clone(), image_style.clone()) }
            </div>
        };
        html! {
            <>
                <div class="side-stone-size-title" style={format!("top: {};", px(dot.offset_px - TITLE_HEIGHT_PX))}>
                    { label.clone() }
                </div>
                <div class={classes!("slider-dot", (props.settled_on == Some(index)).then_some("active"))}
                    style={format!("top: {};", px(dot.offset_px))} {onclick}>
                    { side("left", "right", "rotate-left") }
                    { side("right", "left", "rotate-right") }
                </div>
            </>
        }
    }).collect::<Html>();

    let on_press = props.on_input.reform(|e: MouseEvent| {
        e.prevent_default();
        SliderInput::Press { y: e.client_y() as f64 }
    });
    let center_class = classes!(
        "center-stone-slider",
        match props.phase {
            SliderPhase::Dragging { .. } => Some("dragging"),
            SliderPhase::Snapping { .. } => Some("snapping"),
            SliderPhase::Idle => None,
        }
    );
    let center_style = format!("top: {}; {}", px(props.top), size_style(geometry.center, ratio));

    html! {
        <div class="slider-wrapper" style={wrapper_style}>
            <h4 class="slider-title">{ &geometry.title }</h4>
            <div class="slider-container">
                <div class="slider-track" style={format!("height: {};", px(geometry.track_height_px))}>
                    { dots }
                </div>
                <div class={center_class} style={center_style} onmousedown={on_press}>
                    { stone_image(props.center_image.as_deref(), classes!("center-stone-image"), format_mm(props.center_size), String::new()) }
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
    pub id: u32,
    pub message: String,
    pub on_dismiss: Callback<u32>,
}

/// Error message that removes itself after a few seconds.
#[function_component(NoticeToast)]
pub fn notice_toast(props: &NoticeProps) -> Html {
    let id = props.id;
    use_timeout_on(id, true, NOTICE_DURATION_MS, props.on_dismiss.reform(move |_| id));
    html! {
        <div class="error-message">{ &props.message }</div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AdminPanelProps {
    pub active: bool,
    pub on_unlock: Callback<String>,
    pub on_lock: Callback<()>,
    pub on_change_password: Callback<String>,
}

/// Password field that unlocks the admin session, or changes the password
/// once unlocked.
#[function_component(AdminPanel)]
pub fn admin_panel(props: &AdminPanelProps) -> Html {
    let text = use_state(String::new);

    let oninput = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(input.value());
        })
    };
    let submit = |target: Callback<String>| {
        let text = text.clone();
        Callback::from(move |_: MouseEvent| {
            target.emit((*text).clone());
            text.set(String::new());
        })
    };

    html! {
        <div class="admin-panel">
            <input type="password" value={(*text).clone()} {oninput}
                placeholder={if props.active { "New password" } else { "Admin password" }} />
            if props.active {
                <button class="btn-secondary small" onclick={submit(props.on_change_password.clone())}>
                    { "Change password" }
                </button>
                <button class="btn-secondary small" onclick={props.on_lock.reform(|_| ())}>
                    { "Lock" }
                </button>
            } else {
                <button class="btn-secondary small" onclick={submit(props.on_unlock.clone())}>
                    { "Unlock" }
                </button>
            }
        </div>
    }
}
