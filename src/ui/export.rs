//! SVG export of the current diagram.
//!
//! Native builds ask for a path with a save dialog; the browser build triggers
//! a download.

use super::state::DiagramApp;
use log::{info, warn};

/// File name offered for exports.
const EXPORT_FILE_NAME: &str = "diagram.svg";

impl DiagramApp {
    /// Exports the diagram, without selection chrome, as SVG.
    pub fn export_svg(&mut self) {
        let svg = self.editor.to_svg();

        #[cfg(target_arch = "wasm32")]
        {
            match Self::trigger_download(EXPORT_FILE_NAME, &svg, "image/svg+xml") {
                Ok(()) => self.set_status("SVG exported"),
                Err(e) => {
                    warn!("Failed to start SVG download: {}", e);
                    self.set_error(format!("Export failed: {}", e));
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let Ok(handle) = tokio::runtime::Handle::try_current() else {
                warn!("No async runtime, SVG export skipped");
                self.set_error("Export unavailable");
                return;
            };
            handle.spawn(async move {
                if let Some(file) = rfd::AsyncFileDialog::new()
                    .add_filter("SVG", &["svg"])
                    .set_file_name(EXPORT_FILE_NAME)
                    .save_file()
                    .await
                {
                    let path = file.path().to_path_buf();
                    match tokio::fs::write(&path, svg.as_bytes()).await {
                        Ok(()) => info!("Exported SVG to {}", path.display()),
                        Err(e) => warn!("Failed to save SVG: {}", e),
                    }
                }
            });
        }
    }

    /// Downloads `content` as a file through a temporary anchor element.
    #[cfg(target_arch = "wasm32")]
    fn trigger_download(filename: &str, content: &str, mime: &str) -> Result<(), String> {
        use eframe::wasm_bindgen::{JsCast, JsValue};

        let window = web_sys::window().ok_or("No window found")?;
        let document = window.document().ok_or("No document found")?;

        let blob_parts = js_sys::Array::new();
        blob_parts.push(&JsValue::from_str(content));

        let blob_options = web_sys::BlobPropertyBag::new();
        blob_options.set_type(mime);

        let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &blob_options)
            .map_err(|_| "Failed to create blob")?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Failed to create object URL")?;

        let anchor = document
            .create_element("a")
            .map_err(|_| "Failed to create anchor element")?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "Failed to cast to anchor element")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        let body = document.body().ok_or("No body found")?;
        body.append_child(&anchor)
            .map_err(|_| "Failed to append anchor")?;
        anchor.click();
        body.remove_child(&anchor)
            .map_err(|_| "Failed to remove anchor")?;

        web_sys::Url::revoke_object_url(&url).map_err(|_| "Failed to revoke object URL")?;
        Ok(())
    }
}
