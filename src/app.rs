use std::time::{Duration, Instant};

use egui::{Color32, Pos2, Rect, RichText};
use nalgebra::Point2;

use crate::expression::display::{meter_fill, InstructionTip};
use crate::expression::{EmotionDisplay, EmotionMeter, Expression, EMOTION_METERS};
use crate::utils::{lock_state, SharedState};

const METER_SIZE: egui::Vec2 = egui::vec2(180.0, 18.0);

pub struct ExpressionApp {
    shared_state: SharedState,
    mirrored: bool,
    tip: InstructionTip,
}

impl ExpressionApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        shared_state: SharedState,
        mirrored: bool,
    ) -> Self {
        Self {
            shared_state,
            mirrored,
            tip: InstructionTip::default(),
        }
    }
}

impl eframe::App for ExpressionApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // copy what we need out of the shared state and release the lock
        let (fps, resolution, tracker_name, last_error, landmarks, expression) = {
            let state = lock_state(&self.shared_state);
            (
                state.fps,
                state.resolution,
                state.tracker_name.clone(),
                state.last_error.clone(),
                state.landmarks.clone(),
                state.expression,
            )
        };
        let now = Instant::now();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        frame.close();
                    }
                });
                ui.separator();
                let status = if expression.is_some() {
                    "SYSTEM ONLINE"
                } else {
                    "SCANNING"
                };
                ui.label(status);
            });
        });

        egui::SidePanel::left("side_panel").show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(format!("FPS: {}", fps.unwrap_or(0.0)));
                let (w, h) = resolution.unwrap_or((0, 0));
                ui.label(format!("Resolution: {}x{}", w, h));
                ui.label(format!(
                    "Tracker: {}",
                    tracker_name.as_deref().unwrap_or("none")
                ));
                if let Some(err) = &last_error {
                    ui.colored_label(Color32::from_rgb(0xef, 0x44, 0x44), err.as_str());
                }

                let meters = meter_values(expression.as_ref());
                if !meters.is_empty() {
                    ui.separator();
                    for (meter, value) in meters {
                        if emotion_meter(ui, meter, value).clicked() {
                            self.tip.select(meter, now);
                        }
                    }

                    if let Some(instruction) = self.tip.current(now) {
                        ui.separator();
                        ui.label(RichText::new(instruction).italics());
                    }
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            let painter = ui.painter_at(rect);

            let landmark_color = Color32::from_rgba_unmultiplied(0x22, 0xd3, 0xee, 0x90);
            for point in landmarks.iter() {
                let center = landmark_to_screen(point, rect, self.mirrored);
                painter.circle_filled(center, 1.5, landmark_color);
            }

            ui.vertical_centered(|ui| match expression {
                Some(expression) => {
                    let display = expression.dominant.display;
                    ui.label(
                        RichText::new(format!("{} {}", display.emoji, display.label))
                            .size(48.0)
                            .strong()
                            .color(color32(display)),
                    );
                }
                None => {
                    ui.label(RichText::new("No face detected").size(32.0).weak());
                }
            });
        });

        // redraw everything 30 times per second by default:
        ctx.request_repaint_after(Duration::from_millis(1000 / 30));
    }
}

// meters to draw and their scores; none while no face is tracked
fn meter_values(expression: Option<&Expression>) -> Vec<(&'static EmotionMeter, f64)> {
    expression.map_or_else(Vec::new, |expression| {
        EMOTION_METERS
            .iter()
            .map(|meter| (meter, expression.emotions.get(meter.emotion)))
            .collect()
    })
}

fn color32(display: &EmotionDisplay) -> Color32 {
    let [r, g, b] = display.rgb();
    Color32::from_rgb(r, g, b)
}

// a labelled horizontal progress bar, clickable for its instruction
fn emotion_meter(ui: &mut egui::Ui, meter: &EmotionMeter, value: f64) -> egui::Response {
    let display = meter.display();
    let (rect, response) = ui.allocate_exact_size(METER_SIZE, egui::Sense::click());

    let painter = ui.painter();
    painter.rect_filled(rect, 3.0, Color32::from_gray(40));

    let fill = meter_fill(value);
    if fill > 0.0 {
        let filled = Rect::from_min_size(rect.min, egui::vec2(rect.width() * fill, rect.height()));
        painter.rect_filled(filled, 3.0, color32(display));
    }

    painter.text(
        rect.left_center() + egui::vec2(6.0, 0.0),
        egui::Align2::LEFT_CENTER,
        format!("{} {}", display.emoji, meter.label),
        egui::FontId::proportional(13.0),
        Color32::WHITE,
    );
    painter.text(
        rect.right_center() - egui::vec2(6.0, 0.0),
        egui::Align2::RIGHT_CENTER,
        format!("{:.0}%", fill * 100.0),
        egui::FontId::monospace(12.0),
        Color32::WHITE,
    );

    response.on_hover_text(meter.instruction)
}

/// Maps a normalized landmark onto `rect`, flipping x for a mirrored view.
pub fn landmark_to_screen(point: &Point2<f32>, rect: Rect, mirrored: bool) -> Pos2 {
    let x = if mirrored { 1.0 - point.x } else { point.x };
    Pos2::new(
        rect.min.x + x * rect.width(),
        rect.min.y + point.y * rect.height(),
    )
}
