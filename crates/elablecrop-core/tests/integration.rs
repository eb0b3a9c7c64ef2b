//! Integration tests for the crop controller end-to-end flow.
//!
//! Uses a MockRenderer that returns a synthetic page surface without
//! invoking poppler, so these tests run without poppler-utils.

use elablecrop_core::controller::{CropController, ManualField, SelectedFile, PDF_MEDIA_TYPE};
use elablecrop_core::error::CropError;
use elablecrop_core::geometry::{CropRect, MAGNIFICATION};
use elablecrop_core::presenter::{Presented, Presenter};
use elablecrop_core::render::DocumentRenderer;
use elablecrop_core::surface::Surface;
use image::{Rgba, RgbaImage};
use regex::Regex;
use std::sync::Mutex;
use tempfile::TempDir;

/// Letter page (612 x 792 pt) at 1.5x.
const PAGE_WIDTH: u32 = 918;
const PAGE_HEIGHT: u32 = 1188;

struct MockRenderer {
    calls: Mutex<Vec<(Vec<u8>, f64)>>,
}

impl MockRenderer {
    fn new() -> Self {
        MockRenderer {
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(Vec<u8>, f64)> {
        self.calls.lock().unwrap().clone()
    }
}

impl DocumentRenderer for MockRenderer {
    fn render_first_page(&self, pdf_bytes: &[u8], scale: f64) -> Result<Surface, CropError> {
        self.calls.lock().unwrap().push((pdf_bytes.to_vec(), scale));
        if !pdf_bytes.starts_with(b"%PDF-") {
            return Err(CropError::RenderFailed("Invalid PDF structure".into()));
        }
        Ok(Surface::from_rgba(RgbaImage::from_fn(
            PAGE_WIDTH,
            PAGE_HEIGHT,
            |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]),
        )))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn pdf(name: &str) -> SelectedFile {
    SelectedFile::new(name, PDF_MEDIA_TYPE, b"%PDF-1.7\n".to_vec())
}

fn controller() -> (CropController<MockRenderer>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let controller = CropController::new(MockRenderer::new(), Presenter::new(dir.path(), "elablecrop-FK"));
    (controller, dir)
}

fn set_fields(controller: &mut CropController<MockRenderer>, values: [&str; 4]) {
    controller.set_manual_field(ManualField::TopLeftX, values[0]);
    controller.set_manual_field(ManualField::TopLeftY, values[1]);
    controller.set_manual_field(ManualField::BottomRightX, values[2]);
    controller.set_manual_field(ManualField::BottomRightY, values[3]);
}

fn files_in(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// Triggers without a selection
// ---------------------------------------------------------------------------
#[test]
fn triggers_without_file_are_notices() {
    let (mut controller, dir) = controller();

    let err = controller.auto_crop().unwrap_err();
    assert!(matches!(err, CropError::NoFileSelected));
    assert!(err.is_user_notice());
    assert_eq!(err.to_string(), "Please choose a PDF file first.");

    assert!(matches!(controller.manual_crop(), Err(CropError::NoFileSelected)));
    assert!(controller.renderer().calls().is_empty());
    assert!(files_in(&dir).is_empty());
}

// ---------------------------------------------------------------------------
// Manual crop: 0,0 - 100,50 at 1.5x is 150 x 75 and is displayed
// ---------------------------------------------------------------------------
#[test]
fn manual_crop_displays_scaled_region() {
    let (mut controller, dir) = controller();
    controller.choose_file(pdf("label.pdf"));
    set_fields(&mut controller, ["0", "0", "100", "50"]);

    let presented = controller.manual_crop().unwrap();
    assert_eq!(presented, Presented::Displayed { width: 150, height: 75 });
    assert!(controller.download_visible());
    assert!(files_in(&dir).is_empty());

    let calls = controller.renderer().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, b"%PDF-1.7\n");
    assert_eq!(calls[0].1, MAGNIFICATION);

    let path = controller.download().unwrap().unwrap();
    let saved = Surface::decode(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!((saved.width(), saved.height()), (150, 75));
}

// ---------------------------------------------------------------------------
// Auto crop ignores the manual fields and downloads a timestamped PNG
// ---------------------------------------------------------------------------
#[test]
fn auto_crop_uses_preset_and_downloads() {
    let (mut controller, dir) = controller();
    controller.choose_file(pdf("label.pdf"));
    set_fields(&mut controller, ["0", "0", "10", "10"]);

    let presented = controller.auto_crop().unwrap();
    let Presented::Downloaded { path, width, height } = presented else {
        panic!("expected a download");
    };
    // (407-190)*1.5 = 325.5, (382-28)*1.5 = 531
    assert_eq!((width, height), (325, 531));
    // auto mode never reveals the manual download control
    assert!(!controller.download_visible());

    let pattern =
        Regex::new(r"^elablecrop-FK-\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}-\d{3}Z\.png$").unwrap();
    let names = files_in(&dir);
    assert_eq!(names.len(), 1);
    assert!(pattern.is_match(&names[0]), "bad file name {}", names[0]);
    assert_eq!(path.file_name().unwrap().to_string_lossy(), names[0]);

    let saved = Surface::decode(&std::fs::read(&path).unwrap()).unwrap();
    // top-left pixel comes from page pixel (285, 42)
    assert_eq!(saved.rgba().get_pixel(0, 0), &Rgba([(285 % 256) as u8, 42, 128, 255]));
}

// ---------------------------------------------------------------------------
// Property: output size is floor(1.5 * extent) for ordered rectangles
// ---------------------------------------------------------------------------
#[test]
fn output_size_is_floored_scaled_extent() {
    let renderer = MockRenderer::new();
    let rects = [
        (0.0, 0.0, 1.0, 1.0),
        (10.0, 20.0, 11.0, 23.0),
        (0.5, 0.5, 99.9, 33.3),
        (190.0, 28.0, 407.0, 382.0),
        (600.0, 780.0, 700.0, 900.0),
    ];
    for (tlx, tly, brx, bry) in rects {
        let rect = CropRect::new(tlx, tly, brx, bry);
        let out = elablecrop_core::crop_pdf(b"%PDF-1.4", &renderer, &rect).unwrap();
        assert_eq!(out.width(), ((brx - tlx) * 1.5f64).floor() as u32, "{rect:?}");
        assert_eq!(out.height(), ((bry - tly) * 1.5f64).floor() as u32, "{rect:?}");
    }
}

// ---------------------------------------------------------------------------
// Selection replaces the previous result
// ---------------------------------------------------------------------------
#[test]
fn new_selection_discards_previous_result() {
    let (mut controller, dir) = controller();
    controller.choose_file(pdf("first.pdf"));
    set_fields(&mut controller, ["0", "0", "10", "10"]);
    controller.manual_crop().unwrap();
    assert!(controller.last_surface().is_some());

    controller.choose_file(pdf("second.pdf"));
    assert_eq!(controller.selected_name(), Some("second.pdf"));
    assert!(controller.last_surface().is_none());
    assert!(!controller.download_visible());
    assert_eq!(controller.download().unwrap(), None);
    assert!(files_in(&dir).is_empty());
}

// ---------------------------------------------------------------------------
// Drag and drop
// ---------------------------------------------------------------------------
#[test]
fn drop_accepts_pdf_and_updates_name() {
    let (mut controller, _dir) = controller();
    controller.choose_file(pdf("old.pdf"));
    controller.drop_file(pdf("dropped.pdf")).unwrap();
    assert_eq!(controller.selected_name(), Some("dropped.pdf"));
}

#[test]
fn drop_rejects_non_pdf_without_state_change() {
    let (mut controller, _dir) = controller();
    controller.choose_file(pdf("keep.pdf"));
    set_fields(&mut controller, ["0", "0", "10", "10"]);
    controller.manual_crop().unwrap();

    let png = SelectedFile::new("photo.png", "image/png", vec![0x89, b'P', b'N', b'G']);
    let err = controller.drop_file(png).unwrap_err();
    assert!(err.is_user_notice());
    assert!(matches!(err, CropError::NotAPdf { ref media_type, .. } if media_type == "image/png"));
    assert_eq!(err.to_string(), "Please drop a valid PDF file.");

    assert_eq!(controller.selected_name(), Some("keep.pdf"));
    assert!(controller.last_surface().is_some());
    assert!(controller.download_visible());
}

#[test]
fn chooser_accepts_any_file_type() {
    let (mut controller, _dir) = controller();
    controller.choose_file(SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec()));
    assert_eq!(controller.selected_name(), Some("notes.txt"));

    // the renderer rejects it and the failure propagates
    let err = controller.manual_crop().unwrap_err();
    assert!(matches!(err, CropError::RenderFailed(_)));
    assert!(!err.is_user_notice());
}

#[test]
fn selected_file_from_path_declares_type_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("Label.PDF");
    std::fs::write(&pdf_path, b"%PDF-1.7\n").unwrap();
    let txt_path = dir.path().join("label.txt");
    std::fs::write(&txt_path, b"%PDF-1.7\n").unwrap();

    let file = SelectedFile::from_path(&pdf_path).unwrap();
    assert_eq!(file.name(), "Label.PDF");
    assert_eq!(file.media_type(), PDF_MEDIA_TYPE);

    let (mut controller, _out) = controller();
    let txt = SelectedFile::from_path(&txt_path).unwrap();
    assert!(controller.drop_file(txt).is_err());
    assert!(controller.drop_file(file).is_ok());
}

// ---------------------------------------------------------------------------
// Manual fields and the visibility toggle
// ---------------------------------------------------------------------------
#[test]
fn toggle_does_not_change_crop_mode() {
    let (mut controller, dir) = controller();
    controller.choose_file(pdf("label.pdf"));
    assert!(!controller.manual_fields_visible());
    assert!(controller.toggle_manual_fields());

    // visible fields, but the auto trigger still downloads
    assert!(matches!(controller.auto_crop().unwrap(), Presented::Downloaded { .. }));
    assert_eq!(files_in(&dir).len(), 1);

    // hidden fields, but the manual trigger still displays
    assert!(!controller.toggle_manual_fields());
    set_fields(&mut controller, ["0", "0", "2", "2"]);
    assert_eq!(
        controller.manual_crop().unwrap(),
        Presented::Displayed { width: 3, height: 3 }
    );
}

#[test]
fn non_numeric_fields_give_empty_result() {
    let (mut controller, dir) = controller();
    controller.choose_file(pdf("label.pdf"));
    set_fields(&mut controller, ["left", "0", "100", "50"]);

    let presented = controller.manual_crop().unwrap();
    assert_eq!(presented, Presented::Displayed { width: 0, height: 75 });

    let err = controller.download().unwrap_err();
    assert!(matches!(err, CropError::EmptySurface { width: 0, height: 75 }));
    assert!(files_in(&dir).is_empty());
}

#[test]
fn lenient_field_parsing() {
    let (mut controller, _dir) = controller();
    controller.choose_file(pdf("label.pdf"));
    set_fields(&mut controller, [" 10pt", "+20", "30.", ".4e2"]);

    // (30-10)*1.5 = 30, (40-20)*1.5 = 30
    assert_eq!(
        controller.manual_crop().unwrap(),
        Presented::Displayed { width: 30, height: 30 }
    );
}

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------
#[test]
fn render_failure_clears_previous_result() {
    let (mut controller, _dir) = controller();
    controller.choose_file(pdf("good.pdf"));
    set_fields(&mut controller, ["0", "0", "10", "10"]);
    controller.manual_crop().unwrap();
    assert!(controller.download_visible());

    controller.choose_file(SelectedFile::new("broken.pdf", PDF_MEDIA_TYPE, b"garbage".to_vec()));
    set_fields(&mut controller, ["0", "0", "10", "10"]);
    assert!(matches!(controller.manual_crop(), Err(CropError::RenderFailed(_))));
    assert!(controller.last_surface().is_none());
    assert!(!controller.download_visible());
}

#[test]
fn download_without_crop_is_noop() {
    let (mut controller, dir) = controller();
    assert_eq!(controller.download().unwrap(), None);
    controller.choose_file(pdf("label.pdf"));
    assert_eq!(controller.download().unwrap(), None);
    assert!(files_in(&dir).is_empty());
}

#[test]
fn latest_crop_wins() {
    let (mut controller, dir) = controller();
    controller.choose_file(pdf("label.pdf"));
    set_fields(&mut controller, ["0", "0", "10", "10"]);
    controller.manual_crop().unwrap();
    set_fields(&mut controller, ["0", "0", "20", "4"]);
    controller.manual_crop().unwrap();

    let path = controller.download().unwrap().unwrap();
    let saved = Surface::decode(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!((saved.width(), saved.height()), (30, 6));
    assert_eq!(files_in(&dir).len(), 1);
}

#[test]
fn status_reflects_controller_state() {
    let (mut controller, dir) = controller();
    controller.choose_file(pdf("label.pdf"));
    controller.toggle_manual_fields();
    set_fields(&mut controller, ["0", "0", "100", "50"]);
    controller.manual_crop().unwrap();

    let status = controller.status();
    assert_eq!(status.selected.as_deref(), Some("label.pdf"));
    assert!(status.manual_fields_visible);
    assert_eq!(status.manual_fields.brx, "100");
    assert_eq!(status.last_result, Some((150, 75)));
    assert!(status.download_visible);
    assert_eq!(status.output_dir, dir.path());

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["last_result"], serde_json::json!([150, 75]));
}
