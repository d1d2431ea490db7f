// What you SEE:
// • The picture, centred in the window over a checkerboard (checkerboard = erased).
// • Hold Left Mouse: erase under the brush circle (or, in keep mode, keep only it).
// • P renders the picture over the chosen background; Tab flips between edit and preview.
// • S / J write background-removed.png / .jpg from the last preview. ESC quits.
// Full key list: `background-eraser --help`.

mod cli;

use std::time::{Duration, Instant};

use clap::Parser;
use minifb::Key;

use background_eraser::draw::{self, Drawer};
use background_eraser::mapper::centered_origin;
use background_eraser::types::FrameBuffer;
use background_eraser::{EditingSession, Error, ExportFormat, Mode, Point};

use cli::CliArgs;

/// Height of the status strip at the top of the window.
const BAR_HEIGHT: usize = 22;
/// How long a status message stays visible.
const MESSAGE_TTL: Duration = Duration::from_secs(3);
/// Brush size change per [ or ] press.
const BRUSH_STEP: f32 = 5.0;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    /* --- Session ---
       The picture is copied once at its natural size; history starts with that copy. */
    let mut session = EditingSession::new(args.session_config(), args.editor_state());
    session.open(&args.input)?;

    /* --- Window + reusable screen buffer --- */
    let mut drawer = Drawer::new("Background Eraser", args.window_width, args.window_height)?;
    let mut screen = FrameBuffer::new(args.window_width, args.window_height);

    let mut show_preview = false;
    let mut was_down = false;
    let mut last_mouse: Option<Point> = None;
    let mut message: Option<(String, Instant)> = None;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Keys: controls first, so a stroke this frame uses the new values. */
        let mut notes: Vec<String> = Vec::new();
        {
            let state = session.state_mut();
            if drawer.pressed_once(Key::E) { state.mode = Mode::Erase; }
            if drawer.pressed_once(Key::K) { state.mode = Mode::Keep; }
            if drawer.pressed_once(Key::LeftBracket) { state.set_brush_diameter(state.brush_diameter - BRUSH_STEP); }
            if drawer.pressed_once(Key::RightBracket) { state.set_brush_diameter(state.brush_diameter + BRUSH_STEP); }
            if drawer.pressed_once(Key::Minus) { state.zoom_out(); }
            if drawer.pressed_once(Key::Equal) { state.zoom_in(); }
            if drawer.pressed_once(Key::B) {
                state.background = state.background.next();
                notes.push(format!("background {} - P to update preview", state.background));
            }
        }

        let undo_key = drawer.pressed_once(Key::U) || (drawer.ctrl_down() && drawer.pressed_once(Key::Z));
        if undo_key && !session.is_drawing() {
            notes.push(report(session.undo().map(|_| "undone".to_string())));
        }
        if drawer.pressed_once(Key::R) && !session.is_drawing() {
            notes.push(report(session.reset().map(|_| "canvas reset".to_string())));
        }
        if drawer.pressed_once(Key::P) {
            let rendered = session.render_preview().map(|_| "preview updated".to_string());
            show_preview = rendered.is_ok();
            notes.push(report(rendered));
        }
        if drawer.pressed_once(Key::Tab) && session.preview_available() {
            show_preview = !show_preview;
        }
        for (key, format) in [(Key::S, ExportFormat::Png), (Key::J, ExportFormat::Jpeg)] {
            if drawer.pressed_once(key) {
                let written = session
                    .export_to_dir(format, &args.output_dir)
                    .map(|path| format!("saved {}", path.display()));
                notes.push(report(written));
            }
        }

        /* 2) Where the picture sits this frame; pointer positions are mapped against it. */
        let (img_w, img_h) = session.dimensions().unwrap_or_default();
        let zoom = session.state().zoom;
        let view_h = screen.height.saturating_sub(BAR_HEIGHT);
        let mut origin = centered_origin(img_w, img_h, screen.width, view_h, zoom);
        origin.y += BAR_HEIGHT as f32;

        /* 3) Pointer: down starts a stroke, held + moved paints, up/leave ends it.
              Painting is disabled while the preview is on screen. */
        let mouse = drawer.mouse_pos();
        let down = drawer.left_mouse_down();
        match mouse {
            Some(at) if down && !show_preview => {
                let result = if !was_down {
                    session.pointer_down(at, origin).map(|_| ())
                } else if last_mouse != Some(at) {
                    session.pointer_move(at, origin)
                } else {
                    Ok(())
                };
                if let Err(e) = result {
                    notes.push(report::<String>(Err(e)));
                }
            }
            Some(_) => {
                if session.is_drawing() {
                    let _ = session.pointer_up();
                }
            }
            None => {
                if session.is_drawing() {
                    let _ = session.pointer_leave();
                }
            }
        }
        was_down = down;
        last_mouse = mouse;

        if let Some(text) = notes.pop() {
            message = Some((text, Instant::now()));
        }
        if message.as_ref().is_some_and(|(_, at)| at.elapsed() > MESSAGE_TTL) {
            message = None;
        }

        /* 4) Picture: the edit buffer, or the last preview. */
        let shown = if show_preview {
            session.preview().map(|p| p.buffer())
        } else {
            session.buffer()
        };
        if let Some(picture) = shown {
            draw::draw_picture(&mut screen, picture, origin, zoom)?;
        }

        /* 5) Brush circle at the cursor, then the status strip. */
        if let (Some(at), false) = (mouse, show_preview) {
            draw::draw_brush_cursor(&mut screen, at, session.state().brush_diameter, zoom);
        }

        let state = session.state();
        let status = format!(
            "{} | BRUSH {} | ZOOM {}% | BG {} | UNDO {} | {}",
            state.mode,
            state.brush_diameter as u32,
            state.zoom_percent(),
            state.background,
            session.history_len().saturating_sub(1),
            if show_preview { "PREVIEW" } else { "EDIT" },
        );
        let bar_w = screen.width;
        draw::fill_rect(&mut screen, 0, 0, bar_w, BAR_HEIGHT, 0x00_18_18_1B);
        draw::draw_text_5x7(&mut screen, 8, 7, &status, 0x00_FF_FF_FF);
        if let Some((text, _)) = &message {
            let x = screen.width as i32 - 8 - 6 * text.chars().count() as i32;
            draw::draw_text_5x7(&mut screen, x.max(8), 7 + BAR_HEIGHT as i32, text, 0x00_FF_CC_33);
        }

        /* 6) Present (this is when the on-screen image updates). */
        drawer.present(&screen)?;
    }

    Ok(())
}

/// Turn an engine result into a one-line status message.
fn report<T: Into<String>>(result: Result<T, Error>) -> String {
    match result {
        Ok(text) => text.into(),
        Err(e) => {
            log::debug!("rejected: {e}");
            e.to_string()
        }
    }
}
