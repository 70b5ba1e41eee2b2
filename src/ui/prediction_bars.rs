/// Prediction bar chart
/// Draws one horizontal probability bar per ranked prediction
use iced::widget::canvas::{self, Text};
use iced::{alignment, Color, Pixels, Point, Rectangle, Size};

use crate::classify::display_label;
use crate::state::data::PredictionEntry;
use crate::Message;

/// Height of one prediction row in pixels
pub const ROW_HEIGHT: f32 = 32.0;

/// Width reserved for the label column
const LABEL_WIDTH: f32 = 160.0;

/// Width reserved for the percentage column
const VALUE_WIDTH: f32 = 64.0;

/// Bar chart data: display label and probability per row
#[derive(Debug, Clone)]
pub struct PredictionBars {
    pub rows: Vec<(String, f64)>,
}

impl PredictionBars {
    pub fn new(predictions: &[PredictionEntry]) -> Self {
        Self {
            rows: predictions
                .iter()
                .map(|p| (display_label(&p.class_label), p.probability))
                .collect(),
        }
    }

    /// Total height needed to draw every row
    pub fn height(&self) -> f32 {
        self.rows.len() as f32 * ROW_HEIGHT
    }
}

/// Width of a bar for a probability, clamped to the track
pub fn bar_width(probability: f64, track_width: f32) -> f32 {
    let fraction = (probability / 100.0).clamp(0.0, 1.0) as f32;
    fraction * track_width.max(0.0)
}

impl canvas::Program<Message> for PredictionBars {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let track_width = bounds.width - LABEL_WIDTH - VALUE_WIDTH;
        let bar_height = ROW_HEIGHT * 0.6;

        let track_color = Color::from_rgba(1.0, 1.0, 1.0, 0.08);
        let bar_color = Color::from_rgb(0.30, 0.69, 0.31); // Leaf green
        let text_color = Color::from_rgb(0.9, 0.9, 0.9);

        for (index, (label, probability)) in self.rows.iter().enumerate() {
            let row_top = index as f32 * ROW_HEIGHT;
            let center_y = row_top + ROW_HEIGHT / 2.0;
            let bar_top = center_y - bar_height / 2.0;

            frame.fill_text(Text {
                content: label.clone(),
                position: Point::new(0.0, center_y),
                color: text_color,
                size: Pixels(14.0),
                vertical_alignment: alignment::Vertical::Center,
                ..Text::default()
            });

            // Background track, then the filled portion
            frame.fill_rectangle(
                Point::new(LABEL_WIDTH, bar_top),
                Size::new(track_width.max(0.0), bar_height),
                track_color,
            );
            frame.fill_rectangle(
                Point::new(LABEL_WIDTH, bar_top),
                Size::new(bar_width(*probability, track_width), bar_height),
                bar_color,
            );

            frame.fill_text(Text {
                content: format!("{:.2}%", probability),
                position: Point::new(bounds.width, center_y),
                color: text_color,
                size: Pixels(14.0),
                horizontal_alignment: alignment::Horizontal::Right,
                vertical_alignment: alignment::Vertical::Center,
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
