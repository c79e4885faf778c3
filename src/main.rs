#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    // Set up logging; RUST_LOG=debug shows gesture transitions
    env_logger::init();

    // Background store operations and file dialogs run on this runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => Some(runtime),
        Err(e) => {
            log::warn!("No async runtime, store operations will block: {}", e);
            None
        }
    };
    let _guard = runtime.as_ref().map(|rt| rt.enter());

    diagram_editor::run_app()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use eframe::wasm_bindgen::JsCast as _;

    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to attach the editor to");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("diagram_canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("Missing <canvas id=\"diagram_canvas\">");
            return;
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(diagram_editor::DiagramApp::new(cc)))),
            )
            .await;

        if let Err(e) = start_result {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
}
