use macroquad::color::{BLACK, Color, WHITE};
use macroquad::math::vec2;
use macroquad::shapes::draw_rectangle_lines;
use macroquad::text::draw_text;
use macroquad::texture::{DrawTextureParams, draw_texture, draw_texture_ex};
use macroquad::window::clear_background;

use super::assets::Assets;
use crate::game::{Grid, Position};
use crate::platform::{ImageId, Renderer};

const GRID_LINE_COLOR: Color = Color::new(0.08, 0.4, 0.08, 0.6);
const TEXT_COLOR: Color = WHITE;
const TEXT_SIZE: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
enum DrawCommand {
    Image { image: ImageId, position: Position },
    Rect { position: Position, size: (f32, f32) },
    Text { text: String, position: Position },
}

/// Records draw calls and replays the last presented frame.
///
/// macroquad wants the screen redrawn on every `next_frame`, while the
/// session only draws once per render interval. Draw calls are collected
/// into a pending list; `present_frame` publishes it and [`show`] repaints
/// the published list as often as macroquad asks.
///
/// [`show`]: MacroquadRenderer::show
pub struct MacroquadRenderer<'a> {
    assets: &'a Assets,
    board: (f32, f32),
    pending: Vec<DrawCommand>,
    presented: Vec<DrawCommand>,
}

impl<'a> MacroquadRenderer<'a> {
    pub fn new(assets: &'a Assets, grid: &Grid) -> Self {
        Self {
            assets,
            board: (grid.width(), grid.height()),
            pending: Vec::new(),
            presented: Vec::new(),
        }
    }

    /// Repaint the most recently presented frame
    pub fn show(&self) {
        clear_background(BLACK);
        for command in &self.presented {
            match command {
                DrawCommand::Image {
                    image: ImageId::Background,
                    position,
                } => {
                    // Stretched over the whole board whatever its pixel size
                    let params = DrawTextureParams {
                        dest_size: Some(vec2(self.board.0, self.board.1)),
                        ..Default::default()
                    };
                    draw_texture_ex(
                        self.assets.texture(ImageId::Background),
                        position.x,
                        position.y,
                        WHITE,
                        params,
                    );
                }
                DrawCommand::Image { image, position } => {
                    draw_texture(self.assets.texture(*image), position.x, position.y, WHITE);
                }
                DrawCommand::Rect { position, size } => {
                    draw_rectangle_lines(position.x, position.y, size.0, size.1, 1.0, GRID_LINE_COLOR);
                }
                DrawCommand::Text { text, position } => {
                    draw_text(text, position.x, position.y, TEXT_SIZE, TEXT_COLOR);
                }
            }
        }
    }
}

impl Renderer for MacroquadRenderer<'_> {
    fn draw_image(&mut self, image: ImageId, position: Position) {
        self.pending.push(DrawCommand::Image { image, position });
    }

    fn draw_rect(&mut self, position: Position, size: (f32, f32)) {
        self.pending.push(DrawCommand::Rect { position, size });
    }

    fn draw_text(&mut self, text: &str, position: Position) {
        self.pending.push(DrawCommand::Text {
            text: text.to_owned(),
            position,
        });
    }

    fn present_frame(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.presented);
        self.pending.clear();
    }
}
