use jewelry_visualizer::layout::px_to_mm;
use thiserror::Error;

/// Failures while preparing the page.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("document is not available")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

fn dom_err(e: wasm_bindgen::JsValue) -> InitError {
    InitError::Dom(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Rendered width of `text` in the slider title style, in millimetres.
pub fn measure_title_width_mm(text: &str) -> Result<f64, InitError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(InitError::NoDocument)?;
    let body = document.body().ok_or(InitError::NoBody)?;

    let span = document.create_element("span").map_err(dom_err)?;
    span.set_class_name("text-measurement");
    span.set_text_content(Some(text));
    body.append_child(&span).map_err(dom_err)?;
    let width_px = span.get_bounding_client_rect().width();
    body.remove_child(&span).map_err(dom_err)?;

    Ok(px_to_mm(width_px))
}

/// Measure every title; on failure fall back to zero widths and report the error.
pub fn measure_title_widths_mm(titles: &[&str]) -> (Vec<f64>, Option<InitError>) {
    let mut widths = Vec::with_capacity(titles.len());
    for title in titles {
        match measure_title_width_mm(title) {
            Ok(width) => widths.push(width),
            Err(e) => {
                widths.resize(titles.len(), 0.0);
                return (widths, Some(e));
            }
        }
    }
    (widths, None)
}

/// Size label as shown under stones, e.g. `5.8mm`.
pub fn format_mm(size: f64) -> String {
    format!("{}mm", size)
}

pub fn format_ratio(ratio: f64) -> String {
    format!("{:.6}", ratio)
}

/// CSS pixel length.
pub fn px(value: f64) -> String {
    format!("{:.3}px", value)
}
