use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use super::{ChartRegion, ChartSurface};

#[wasm_bindgen]
extern "C" {
    /// The global `Chart` constructor from Chart.js.
    #[wasm_bindgen(js_name = Chart)]
    pub type JsChart;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<JsChart, JsValue>;

    #[wasm_bindgen(method, js_class = "Chart")]
    fn destroy(this: &JsChart);
}

/// Draws onto the `<canvas>` elements rendered by the statistics tab.
#[derive(Default)]
pub struct CanvasSurface;

impl ChartSurface for CanvasSurface {
    type Handle = JsChart;

    fn mount(&self, region: ChartRegion, config: &Value) -> Result<JsChart, String> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(region.canvas_id()))
            .ok_or_else(|| format!("no canvas #{}", region.canvas_id()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| format!("#{} is not a canvas", region.canvas_id()))?;

        let config = js_sys::JSON::parse(&config.to_string()).map_err(|e| format!("{:?}", e))?;
        JsChart::new(&canvas, &config).map_err(|e| format!("{:?}", e))
    }

    fn unmount(&self, handle: JsChart) {
        handle.destroy();
    }
}
