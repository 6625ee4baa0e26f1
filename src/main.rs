//! Main module for the jewelry visualizer using Yew.
//! Wires the reducer state, document listeners and view components.

use jewelry_visualizer::{
    admin::AdminSession,
    catalog::{parse_catalog, StoneCategory},
    config::{CENTER_STONE_CATALOG, LOG_LEVEL, SIDE_STONE_CATALOG, STONE_IMAGE_TABLE},
    images::ImageRegistry,
    slider::SliderInput,
    storage::BrowserStorage,
    CalibrationStore, StepDirection, VisualizerAction, VisualizerState,
};
use log::info;
use yew::prelude::*;

mod components;
mod hooks;
mod logging;
mod utils;

use components::{
    render_center_stones, render_size_grid, AdminPanel, CalibrationPanel, NoticeToast, SideSlider,
};
use hooks::{use_click_outside, use_document_mouse};
use utils::measure_title_widths_mm;

type AppState = VisualizerState<BrowserStorage>;

/// Startup sequence. Failures are reported as notices; whatever loaded stays usable.
fn bootstrap() -> AppState {
    let mut failures = Vec::new();

    let registry = ImageRegistry::from_json(STONE_IMAGE_TABLE).unwrap_or_else(|e| {
        failures.push(format!("image table is invalid: {}", e));
        ImageRegistry::default()
    });
    let center = parse_catalog(CENTER_STONE_CATALOG, StoneCategory::Center).resolve_images(&registry);
    let side = parse_catalog(SIDE_STONE_CATALOG, StoneCategory::Side).resolve_images(&registry);

    let title_widths = {
        let titles: Vec<&str> = side.stones.iter().map(|s| s.title.as_str()).collect();
        let (widths, err) = measure_title_widths_mm(&titles);
        if let Some(e) = err {
            failures.push(e.to_string());
        }
        widths
    };

    let calibration = CalibrationStore::load(BrowserStorage::local());
    let admin = AdminSession::new(BrowserStorage::local(), BrowserStorage::session());

    let mut state = VisualizerState::new(center, side, title_widths, calibration).with_admin(admin);
    for failure in failures {
        state.apply(VisualizerAction::Notify(format!(
            "Failed to initialize visualizer: {}",
            failure
        )));
    }
    info!("Startup complete");
    state
}

/// Primary application component.
#[function_component(App)]
fn app() -> Html {
    let state = use_reducer(bootstrap);
    let dispatcher = state.dispatcher();

    // Pointer tracking only matters while something is held.
    let on_move = use_callback(
        (dispatcher.clone(), state.has_active_drag()),
        |e: MouseEvent, (dispatcher, dragging)| {
            if *dragging {
                dispatcher.dispatch(VisualizerAction::PointerMove { y: e.client_y() as f64 });
            }
        },
    );
    let on_up = use_callback(
        (dispatcher.clone(), state.has_active_drag()),
        |_: MouseEvent, (dispatcher, dragging)| {
            if *dragging {
                dispatcher.dispatch(VisualizerAction::PointerRelease);
            }
        },
    );
    use_document_mouse("mousemove", on_move);
    use_document_mouse("mouseup", on_up);

    let toggle_ref = use_node_ref();
    let panel_ref = use_node_ref();
    let close_panel = use_callback(
        (dispatcher.clone(), state.panel_open()),
        |_: (), (dispatcher, open)| {
            if *open {
                dispatcher.dispatch(VisualizerAction::ClosePanel);
            }
        },
    );
    use_click_outside([toggle_ref.clone(), panel_ref.clone()], close_panel);

    let emit = |action: VisualizerAction| {
        let dispatcher = dispatcher.clone();
        Callback::from(move |_: ()| dispatcher.dispatch(action.clone()))
    };
    let on_step = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |direction: StepDirection| {
            dispatcher.dispatch(VisualizerAction::StepCalibration(direction))
        })
    };
    let on_card_press = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |y: f64| dispatcher.dispatch(VisualizerAction::CardPress { y }))
    };
    let on_select_stone = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |index: usize| dispatcher.dispatch(VisualizerAction::SelectCenterStone(index)))
    };
    let on_select_size = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |size: f64| dispatcher.dispatch(VisualizerAction::SelectCenterSize(size)))
    };
    let on_admin_unlock = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |password: String| dispatcher.dispatch(VisualizerAction::AdminUnlock(password)))
    };
    let on_admin_password = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |password: String| {
            dispatcher.dispatch(VisualizerAction::AdminChangePassword(password))
        })
    };
    let on_dismiss = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |id: u32| dispatcher.dispatch(VisualizerAction::DismissNotice(id)))
    };

    let ratio = state.calibration_ratio();
    let selection = state.selection();
    let center_stone = state.selected_center_stone();

    let sliders = match (center_stone, selection.size) {
        (Some(center), Some(center_size)) => state
            .geometries()
            .iter()
            .zip(state.sliders())
            .enumerate()
            .map(|(index, (geometry, motion))| {
                let dispatcher = dispatcher.clone();
                let on_input = Callback::from(move |input: SliderInput| {
                    dispatcher.dispatch(VisualizerAction::Slider { slider: index, input })
                });
                let side_image = state
                    .side_stones()
                    .get(index)
                    .and_then(|s| s.image_reference.clone());
                html! {
                    <SideSlider
                        key={index}
                        geometry={geometry.clone()}
                        {ratio}
                        {center_size}
                        top={motion.top()}
                        phase={motion.phase()}
                        settled_on={motion.settled_on()}
                        snap_serial={motion.snap_serial()}
                        {side_image}
                        center_image={center.image_reference.clone()}
                        {on_input}
                    />
                }
            })
            .collect::<Html>(),
        _ => html! {},
    };

    html! {
        <div class="jewelry-visualizer">
            <div id="error-container">
                { state.notices().iter().map(|notice| html! {
                    <NoticeToast key={notice.id} id={notice.id}
                        message={notice.message.clone()} on_dismiss={on_dismiss.clone()} />
                }).collect::<Html>() }
            </div>

            <CalibrationPanel
                {ratio}
                open={state.panel_open()}
                dragging={state.is_dragging_card()}
                toggle_ref={toggle_ref}
                panel_ref={panel_ref}
                on_toggle={emit(VisualizerAction::TogglePanel)}
                {on_step}
                on_reset={emit(VisualizerAction::ResetCalibration)}
                {on_card_press}
            />

            <section class="center-stone-section">
                <h2>{ "Choose a center stone" }</h2>
                { render_center_stones(state.center_stones(), selection.center, &on_select_stone) }
            </section>

            if let Some(stone) = center_stone {
                { render_size_grid(stone, selection.size, ratio, &on_select_size) }
            }

            <section class="display-section">
                <div class="sliders-container">{ sliders }</div>
            </section>

            <AdminPanel
                active={state.admin_active()}
                on_unlock={on_admin_unlock}
                on_lock={emit(VisualizerAction::AdminLock)}
                on_change_password={on_admin_password}
            />
        </div>
    }
}

/// Entry point: installs logging and renders the App component.
fn main() {
    console_error_panic_hook::set_once();
    logging::init(LOG_LEVEL);
    yew::Renderer::<App>::new().render();
}
