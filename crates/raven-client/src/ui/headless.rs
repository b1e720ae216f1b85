//! Run egui frames without a window and inspect what was painted

use eframe::egui;

pub fn screen_rect() -> egui::Rect {
    egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0))
}

/// Run one frame with `events`, drawing `add_contents` in a central panel
pub fn run_frame(
    ctx: &egui::Context,
    events: Vec<egui::Event>,
    mut add_contents: impl FnMut(&mut egui::Ui),
) -> egui::FullOutput {
    let input = egui::RawInput {
        screen_rect: Some(screen_rect()),
        events,
        ..Default::default()
    };
    ctx.run(input, |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| add_contents(ui));
    })
}

/// Run `count` frames without input; new areas need a sizing frame before they are drawn
pub fn settle(ctx: &egui::Context, count: usize, mut add_contents: impl FnMut(&mut egui::Ui)) -> egui::FullOutput {
    let mut output = run_frame(ctx, Vec::new(), &mut add_contents);
    for _ in 1..count {
        output = run_frame(ctx, Vec::new(), &mut add_contents);
    }
    output
}

pub fn pointer_moved(pos: egui::Pos2) -> Vec<egui::Event> {
    vec![egui::Event::PointerMoved(pos)]
}

fn primary_button(pos: egui::Pos2, pressed: bool) -> Vec<egui::Event> {
    vec![egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed,
        modifiers: egui::Modifiers::NONE,
    }]
}

/// Hover, press and release at `pos` over three frames
pub fn click(ctx: &egui::Context, pos: egui::Pos2, mut add_contents: impl FnMut(&mut egui::Ui)) -> egui::FullOutput {
    run_frame(ctx, pointer_moved(pos), &mut add_contents);
    run_frame(ctx, primary_button(pos, true), &mut add_contents);
    run_frame(ctx, primary_button(pos, false), &mut add_contents)
}

fn collect_texts(shape: &egui::Shape, out: &mut Vec<(String, egui::Rect)>) {
    match shape {
        egui::Shape::Vec(shapes) => {
            for shape in shapes {
                collect_texts(shape, out);
            }
        }
        egui::Shape::Text(text) => {
            let rect = text.galley.rect.translate(text.pos.to_vec2());
            out.push((text.galley.text().to_string(), rect));
        }
        _ => {}
    }
}

/// Every painted text with its screen rect
pub fn painted_texts(output: &egui::FullOutput) -> Vec<(String, egui::Rect)> {
    let mut texts = Vec::new();
    for clipped in &output.shapes {
        collect_texts(&clipped.shape, &mut texts);
    }
    texts
}

pub fn has_text(output: &egui::FullOutput, text: &str) -> bool {
    painted_texts(output).iter().any(|(t, _)| t == text)
}

pub fn text_rect(output: &egui::FullOutput, text: &str) -> Option<egui::Rect> {
    painted_texts(output)
        .into_iter()
        .find(|(t, _)| t == text)
        .map(|(_, rect)| rect)
}
