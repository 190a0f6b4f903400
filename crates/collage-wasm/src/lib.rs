//! WASM bridge for Collage Maker. Exposes the editor to the page script.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM
//! (inputs, file reads, clipboard, downloads); every state change goes
//! through `CollageApp`, which answers with booleans ("redraw?") or JSON.

mod store;

use collage_core::filter::{FilterInput, FilterSlot};
use collage_core::id::ObjectId;
use collage_core::model::Color;
use collage_core::sizing::{CanvasSize, Template};
use collage_editor::shortcuts::{ShortcutAction, ShortcutMap};
use collage_editor::{
    Command, Editor, EditorConfig, EditorError, ImportOutcome, LayerAction, LoadToken, Placement,
};
use collage_render::{ExportFormat, FontBook, Rasterizer, clipboard_message};
use store::{LocalStorageStore, js_message};
use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, ImageData};

/// The page-facing collage controller.
#[wasm_bindgen]
pub struct CollageApp {
    editor: Editor<LocalStorageStore>,
    rasterizer: Rasterizer,
}

#[wasm_bindgen]
impl CollageApp {
    /// Open the editor, restoring the last saved collage if there is one.
    ///
    /// `config_json` may be empty or a partial `EditorConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<CollageApp, JsValue> {
        console_error_panic_hook_setup();

        let config = EditorConfig::from_json(config_json).unwrap_or_else(|e| {
            log::warn!("ignoring bad editor config: {e}");
            EditorConfig::default()
        });
        let editor = match Editor::open(LocalStorageStore::new(), config.clone()) {
            Ok(editor) => editor,
            // The unreadable slot stays put until the first edit replaces it.
            Err(e) => {
                log::warn!("could not restore saved collage, starting fresh: {e}");
                Editor::recover(LocalStorageStore::new(), config)
            }
        };
        Ok(Self {
            editor,
            rasterizer: Rasterizer::new(FontBook::new()),
        })
    }

    pub fn width(&self) -> f32 {
        self.editor.scene().width
    }

    pub fn height(&self) -> f32 {
        self.editor.scene().height
    }

    pub fn background(&self) -> String {
        self.editor.scene().background.to_hex()
    }

    // ─── Canvas setup ────────────────────────────────────────────────────

    /// Template selector changed. `name` is `"W:H"` or `"custom"`.
    /// Returns true if the canvas was resized.
    pub fn apply_template(
        &mut self,
        name: &str,
        container_width: f32,
        container_height: f32,
    ) -> bool {
        let template: Template = match name.parse() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{e}");
                return false;
            }
        };
        self.run(Command::ApplyTemplate {
            template,
            container: CanvasSize::new(container_width, container_height),
        })
    }

    pub fn apply_custom_size(&mut self, width: i32, height: i32) -> bool {
        self.run(Command::ApplyCustomSize { width, height })
    }

    pub fn set_background(&mut self, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Some(color) => self.run(Command::SetBackground(color)),
            None => {
                log::warn!("ignoring bad background color {hex:?}");
                false
            }
        }
    }

    pub fn add_text(&mut self, content: &str, font_family: &str, color_hex: &str) -> bool {
        let color = Color::from_hex(color_hex).unwrap_or(Color::BLACK);
        self.run(Command::AddText {
            content: content.to_string(),
            font_family: font_family.to_string(),
            color,
        })
    }

    // ─── Import ──────────────────────────────────────────────────────────

    /// Reserve an import for a picked (no drop point) or dropped file.
    /// Returns the load token, or `undefined` for non-image files.
    pub fn begin_import(
        &mut self,
        mime: &str,
        drop_x: Option<f32>,
        drop_y: Option<f32>,
    ) -> Option<String> {
        let token = self.editor.begin_import(mime, placement(drop_x, drop_y))?;
        Some(token.id().as_str().to_string())
    }

    /// Hand over the bytes of a finished file read. Returns true if an
    /// image was added; false if the token was cancelled or decoding failed.
    pub fn complete_import(&mut self, token: &str, bytes: Vec<u8>) -> bool {
        match self.editor.complete_import(token_from(token), bytes) {
            Ok(ImportOutcome::Added(_)) => true,
            Ok(ImportOutcome::Cancelled) => false,
            Err(e) => {
                log::error!("import failed: {e}");
                matches!(e, EditorError::Store(_))
            }
        }
    }

    pub fn cancel_import(&mut self, token: &str) -> bool {
        self.editor.cancel_import(token_from(token))
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select the topmost object under a canvas point (or clear).
    pub fn select_at(&mut self, x: f32, y: f32) -> bool {
        self.run(Command::SelectAt { x, y })
    }

    pub fn deselect(&mut self) -> bool {
        self.run(Command::Select(None))
    }

    /// Selected object ID, or an empty string.
    pub fn selected_id(&self) -> String {
        self.editor
            .selection()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn move_selected(&mut self, left: f32, top: f32) -> bool {
        let Some(id) = self.editor.selection() else {
            return false;
        };
        self.run(Command::MoveObject { id, left, top })
    }

    pub fn scale_selected(&mut self, scale_x: f32, scale_y: f32) -> bool {
        let Some(id) = self.editor.selection() else {
            return false;
        };
        self.run(Command::ScaleObject {
            id,
            scale_x,
            scale_y,
        })
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.editor.selection() else {
            return false;
        };
        self.run(Command::RemoveObject(id))
    }

    // ─── Layer panel ─────────────────────────────────────────────────────

    /// Layer rows as JSON, bottom first:
    /// `[{"id","index","label","kind","selected","loading"}]`.
    pub fn layers_json(&self) -> String {
        serde_json::to_string(&self.editor.layers()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Click on a layer row.
    pub fn select_layer(&mut self, index: usize) -> bool {
        let Some(entry) = self.editor.layers().into_iter().nth(index) else {
            return false;
        };
        if entry.loading {
            return false;
        }
        self.run(Command::Select(Some(entry.id)))
    }

    /// Layer row button: `"up"`, `"down"` or `"delete"`.
    pub fn layer_action(&mut self, index: usize, action: &str) -> bool {
        let Some(action) = LayerAction::from_name(action) else {
            log::warn!("unknown layer action {action:?}");
            return false;
        };
        let Some(entry) = self.editor.layers().into_iter().nth(index) else {
            return false;
        };
        self.run(Command::Layer { id: entry.id, action })
    }

    // ─── Filters ─────────────────────────────────────────────────────────

    /// Toggle filter changed (`"grayscale"`, `"sepia-filter"`, …).
    /// Returns the widget values to display, as JSON.
    pub fn set_filter_checked(&mut self, name: &str, checked: bool) -> String {
        self.set_filter(name, FilterInput::Checked(checked))
    }

    /// Slider filter changed. Returns the widget values, as JSON.
    pub fn set_filter_value(&mut self, name: &str, value: f32) -> String {
        self.set_filter(name, FilterInput::Value(value))
    }

    pub fn reset_filters(&mut self) -> String {
        self.run(Command::ResetFilters);
        self.filter_widgets_json()
    }

    /// Widget values for the selected image (all defaults otherwise).
    pub fn filter_widgets_json(&self) -> String {
        serde_json::to_string(&self.editor.filter_widgets()).unwrap_or_else(|_| "{}".to_string())
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.run(Command::Undo)
    }

    pub fn redo(&mut self) -> bool {
        self.run(Command::Redo)
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    /// Handle a key event. Returns JSON: `{"changed":bool,"action":"..."}`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return key_result(false, None);
        };
        let changed = match action.to_command(self.editor.selection()) {
            Some(command) => self.run(command),
            None => false,
        };
        key_result(changed, Some(action))
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Register a font for text objects. Unknown families fall back to the
    /// bundled DejaVu Sans.
    pub fn register_font(&mut self, family: &str, data: Vec<u8>) -> Result<(), JsValue> {
        self.rasterizer.fonts_mut().register(family, data).map_err(to_js)
    }

    /// Paint the collage into `ctx`, resizing its canvas to the scene, and
    /// outline the selection.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let scene = self.editor.scene();
        let pixels = self.rasterizer.render(scene).map_err(to_js)?;
        let (width, height) = pixels.dimensions();

        if let Some(canvas) = ctx.canvas()
            && (canvas.width(), canvas.height()) != (width, height)
        {
            canvas.set_width(width);
            canvas.set_height(height);
        }
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(pixels.as_raw().as_slice()),
            width,
            height,
        )?;
        ctx.put_image_data(&data, 0.0, 0.0)?;

        if let Some(obj) = self.editor.selection().and_then(|id| scene.get(id)) {
            let bounds = obj.bounds();
            let dash = js_sys::Array::of2(&JsValue::from(6.0), &JsValue::from(4.0));
            ctx.set_line_dash(&dash)?;
            ctx.set_stroke_style_str("#4FC3F7");
            ctx.set_line_width(2.0);
            ctx.stroke_rect(bounds.x0, bounds.y0, bounds.width(), bounds.height());
            ctx.set_line_dash(&js_sys::Array::new())?;
        }
        Ok(())
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Encoded image bytes for download. `format` is `"png"` or `"jpeg"`.
    pub fn export(&mut self, format: &str) -> Result<Vec<u8>, JsValue> {
        let format: ExportFormat = format.parse().map_err(to_js)?;
        self.rasterizer.export(self.editor.scene(), format).map_err(to_js)
    }

    /// Download file name for `format` (`collage.png` / `collage.jpeg`).
    pub fn export_file_name(&self, format: &str) -> Result<String, JsValue> {
        let format: ExportFormat = format.parse().map_err(to_js)?;
        Ok(format.file_name())
    }

    pub fn export_mime(&self, format: &str) -> Result<String, JsValue> {
        let format: ExportFormat = format.parse().map_err(to_js)?;
        Ok(format.mime().to_string())
    }

    /// PNG bytes for the clipboard write.
    pub fn clipboard_png(&mut self) -> Result<Vec<u8>, JsValue> {
        self.rasterizer.clipboard_png(self.editor.scene()).map_err(to_js)
    }

    /// Turn the page's clipboard result into the message shown to the user.
    pub fn report_clipboard_result(&self, ok: bool, error: &str) -> String {
        clipboard_message(if ok { Ok(()) } else { Err(error) })
    }
}

impl CollageApp {
    fn set_filter(&mut self, name: &str, input: FilterInput) -> String {
        match FilterSlot::from_name(name) {
            Some(slot) => {
                self.run(Command::SetFilter { slot, input });
            }
            None => log::warn!("unknown filter {name:?}"),
        }
        self.filter_widgets_json()
    }

    /// Dispatch and report whether the page should redraw.
    fn run(&mut self, command: Command) -> bool {
        let label = command.description();
        match self.editor.dispatch(command) {
            Ok(outcome) => outcome.needs_redraw(),
            // The change is applied and recorded; only the save failed.
            Err(EditorError::Store(e)) => {
                log::error!("{label}: could not save collage: {e}");
                true
            }
            Err(e) => {
                log::error!("{label}: {e}");
                false
            }
        }
    }
}

fn placement(drop_x: Option<f32>, drop_y: Option<f32>) -> Placement {
    match (drop_x, drop_y) {
        (Some(x), Some(y)) => Placement::Centered { x, y },
        _ => Placement::Origin,
    }
}

fn token_from(token: &str) -> LoadToken {
    LoadToken::from_id(ObjectId::intern(token))
}

fn action_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Delete => "delete",
        ShortcutAction::BringForward => "bringForward",
        ShortcutAction::SendBackward => "sendBackward",
        ShortcutAction::Deselect => "deselect",
    }
}

fn key_result(changed: bool, action: Option<ShortcutAction>) -> String {
    let action = action.map_or("none", action_name);
    format!(r#"{{"changed":{changed},"action":"{action}"}}"#)
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Collage WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if let Err(e) = console_log::init_with_level(log::Level::Info) {
                web_sys::console::warn_1(&format!("logger already set: {e}").into());
            }
        });
    }
}

/// Report an error from a page-side promise (file read, clipboard) to the
/// console through the logger.
#[wasm_bindgen]
pub fn log_host_error(context: &str, error: &JsValue) {
    log::error!("{context}: {}", js_message(error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drop_point_centers_import() {
        assert_eq!(placement(None, None), Placement::Origin);
        assert_eq!(placement(Some(10.0), None), Placement::Origin);
        assert_eq!(
            placement(Some(10.0), Some(20.0)),
            Placement::Centered { x: 10.0, y: 20.0 }
        );
    }

    #[test]
    fn key_result_json() {
        assert_eq!(key_result(false, None), r#"{"changed":false,"action":"none"}"#);
        assert_eq!(
            key_result(true, Some(ShortcutAction::BringForward)),
            r#"{"changed":true,"action":"bringForward"}"#
        );
    }

    #[test]
    fn token_round_trips_through_string() {
        let id = ObjectId::intern("image_42");
        let token = token_from(id.as_str());
        assert_eq!(token.id(), id);
    }
}
