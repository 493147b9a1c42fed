//! Animated 2x2 density-matrix grid built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Player`] and implements
//! [`eframe::App`] to drive playback from egui's clock and paint the
//! current scene.

use eframe::App;
use glam::Vec2;

use dmat_core::{
    color::Fill,
    player::Player,
    scene::{Label, WORLD_MAX, WORLD_MIN},
};

/// Label font size relative to one world unit on screen.
const LABEL_SCALE: f32 = 1.2;
const MIN_LABEL_SIZE: f32 = 10.0;
/// Angle bracket width and inset relative to the text height.
const BRACKET_WIDTH: f32 = 0.25;
const BRACKET_INSET: f32 = 0.15;
/// Space around each bracket relative to the text height.
const BRACKET_GAP: f32 = 0.04;
const BRACKET_STROKE: f32 = 0.07;

/// Screen positions of the pieces of a `|i⟩⟨j|` label.
///
/// The two angle brackets are stroked instead of typeset, so the label
/// does not depend on the font covering U+27E8/U+27E9.
///
/// ### Fields
/// - `ket_min` - Top-left corner of the `|i` text run.
/// - `ket_close` - Polyline of the `⟩` bracket, top to bottom.
/// - `bra_open` - Polyline of the `⟨` bracket, top to bottom.
/// - `bra_min` - Top-left corner of the `j|` text run.
#[derive(Debug, PartialEq)]
struct KetBraLayout {
    ket_min: egui::Pos2,
    ket_close: [egui::Pos2; 3],
    bra_open: [egui::Pos2; 3],
    bra_min: egui::Pos2,
}

impl KetBraLayout {
    /// Lays out the label around `center`.
    ///
    /// ### Parameters
    /// - `center` - Screen position of the label center.
    /// - `ket_width` - Width of the laid out `|i` text.
    /// - `bra_width` - Width of the laid out `j|` text.
    /// - `height` - Row height of the text.
    fn new(center: egui::Pos2, ket_width: f32, bra_width: f32, height: f32) -> Self {
        let w = height * BRACKET_WIDTH;
        let gap = height * BRACKET_GAP;
        let total = ket_width + bra_width + 2.0 * w + 4.0 * gap;

        let top = center.y - height / 2.0;
        let bottom = center.y + height / 2.0;
        let inset = height * BRACKET_INSET;

        let x0 = center.x - total / 2.0;
        let close_x = x0 + ket_width + gap;
        let open_x = close_x + w + 2.0 * gap;

        Self {
            ket_min: egui::pos2(x0, top),
            ket_close: [
                egui::pos2(close_x, top + inset),
                egui::pos2(close_x + w, center.y),
                egui::pos2(close_x, bottom - inset),
            ],
            bra_open: [
                egui::pos2(open_x + w, top + inset),
                egui::pos2(open_x, center.y),
                egui::pos2(open_x + w, bottom - inset),
            ],
            bra_min: egui::pos2(open_x + w + gap, top),
        }
    }
}

/// Main application state for the viewer.
///
/// The per-frame update is:
/// 1. Handle keyboard input (`R` restarts playback).
/// 2. Let the [`Player`] apply the next frame if its interval has elapsed.
/// 3. Paint the squares and labels and request another repaint while
///    frames remain.
///
/// Once the last frame is reached no more repaints are requested and the
/// window keeps showing that frame until it is closed.
pub struct Viewer {
    player: Player,
}

impl Viewer {
    pub fn new(player: Player) -> Self {
        Self { player }
    }

    /// Converts a world-space position to screen-space.
    ///
    /// The square world window is scaled to fit inside `rect` without
    /// distortion and centered in it. The y-axis is flipped so that
    /// positive y goes up in world space.
    fn world_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let scale = Self::world_scale(rect);
        let world_center = (WORLD_MIN + WORLD_MAX) / 2.0;
        let center = rect.center();
        egui::pos2(
            center.x + (p.x - world_center) * scale,
            center.y - (p.y - world_center) * scale,
        )
    }

    /// Screen pixels per world unit.
    fn world_scale(rect: egui::Rect) -> f32 {
        rect.width().min(rect.height()) / (WORLD_MAX - WORLD_MIN)
    }

    fn to_color32(fill: Fill) -> egui::Color32 {
        let [r, g, b, a] = fill.to_rgba8();
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    fn status_text(&self) -> String {
        let shown = self.player.current_frame().map_or(0, |f| f + 1);
        format!(
            "frame {}/{}  t = {:.3}  mode = {}",
            shown,
            self.player.frame_count(),
            self.player.current_row().time,
            self.player.scene().mode(),
        )
    }

    /// Builds the bottom status bar (frame counter, time, mode).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status_text());
                if self.player.is_finished() {
                    ui.separator();
                    ui.label("finished (R to replay)");
                }
            });
        });
    }

    /// Builds the central panel where the grid is drawn.
    fn ui_central_panel(&self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let painter = ui.painter_at(rect);
                let scene = self.player.scene();

                for sq in scene.squares() {
                    let a = Self::world_to_screen(sq.min, rect);
                    let b = Self::world_to_screen(sq.max(), rect);
                    painter.rect_filled(
                        egui::Rect::from_two_pos(a, b),
                        0.0,
                        Self::to_color32(sq.fill),
                    );
                }

                let font = egui::FontId::proportional(
                    (Self::world_scale(rect) * LABEL_SCALE).max(MIN_LABEL_SIZE),
                );
                for label in scene.labels() {
                    let center = Self::world_to_screen(label.pos, rect);
                    Self::paint_label(&painter, label, center, &font);
                }
            });
    }

    /// Paints `|i⟩⟨j|` centered at `center`, with stroked angle brackets.
    fn paint_label(
        painter: &egui::Painter,
        label: &Label,
        center: egui::Pos2,
        font: &egui::FontId,
    ) {
        let color = Self::to_color32(label.color);
        let (ket, bra) = label.element.indices();

        let ket_galley = painter.layout_no_wrap(format!("|{ket}"), font.clone(), color);
        let bra_galley = painter.layout_no_wrap(format!("{bra}|"), font.clone(), color);
        let height = ket_galley.size().y;
        let layout = KetBraLayout::new(center, ket_galley.size().x, bra_galley.size().x, height);

        let stroke = egui::Stroke::new((height * BRACKET_STROKE).max(1.0), color);
        painter.galley(layout.ket_min, ket_galley, color);
        painter.add(egui::Shape::line(layout.ket_close.to_vec(), stroke));
        painter.add(egui::Shape::line(layout.bra_open.to_vec(), stroke));
        painter.galley(layout.bra_min, bra_galley, color);
    }
}

impl App for Viewer {
    /// eframe callback that advances playback and redraws the grid.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.player.restart();
        }

        let now = ctx.input(|i| i.time);
        self.player.tick(now);

        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);

        if !self.player.is_finished() {
            ctx.request_repaint_after(self.player.interval());
        }
    }
}
