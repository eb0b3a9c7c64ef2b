use elablecrop_core::controller::ControllerStatus;
use elablecrop_core::presenter::Presented;

pub fn format_presented(presented: &Presented) -> String {
    match presented {
        Presented::Downloaded {
            path,
            width,
            height,
        } => format!("Downloaded {}x{} crop to {}", width, height, path.display()),
        Presented::Displayed { width, height } => {
            format!("Cropped region: {}x{} (use `download` to save)", width, height)
        }
    }
}

pub fn format_status(status: &ControllerStatus) -> String {
    let mut out = String::new();

    match status.selected.as_deref() {
        Some(name) => out.push_str(&format!("Selected: {}\n", name)),
        None => out.push_str("Selected: (none)\n"),
    }

    if status.manual_fields_visible {
        let f = &status.manual_fields;
        out.push_str(&format!(
            "Manual fields: tlx={:?} tly={:?} brx={:?} bry={:?}\n",
            f.tlx, f.tly, f.brx, f.bry
        ));
    } else {
        out.push_str("Manual fields: hidden\n");
    }

    match status.last_result {
        Some((w, h)) => out.push_str(&format!("Last result: {}x{}\n", w, h)),
        None => out.push_str("Last result: (none)\n"),
    }

    out.push_str(&format!(
        "Download control: {}\n",
        if status.download_visible {
            "visible"
        } else {
            "hidden"
        }
    ));
    out.push_str(&format!("Output directory: {}", status.output_dir.display()));

    out
}
