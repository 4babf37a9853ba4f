//! Drag-to-select overlay drawn over the frozen screenshot.

use iced::widget::canvas::{self, event, Event, Frame, Geometry, Path, Stroke};
use iced::{mouse, Color, Point, Rectangle, Renderer, Size, Theme};

use crate::capture::Selection;

use super::app::Message;

/// Canvas program that lets the user drag a rectangle.
///
/// Emits [`Message::SelectionFinished`] with a normalized selection when the
/// left mouse button is released.
#[derive(Debug, Default)]
pub struct RegionSelector;

/// In-progress drag, owned by the canvas.
#[derive(Debug, Default)]
pub struct DragState {
    start: Option<Point>,
    current: Option<Point>,
}

impl canvas::Program<Message> for RegionSelector {
    type State = DragState;

    fn update(
        &self,
        state: &mut DragState,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        let position = cursor
            .position()
            .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y));

        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(p) = cursor.position_in(bounds) {
                    state.start = Some(p);
                    state.current = Some(p);
                    return (event::Status::Captured, None);
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) if state.start.is_some() => {
                if position.is_some() {
                    state.current = position;
                }
                return (event::Status::Captured, None);
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if let Some(start) = state.start.take() {
                    let end = position.or(state.current).unwrap_or(start);
                    state.current = None;
                    let selection = normalize(start, end, bounds.size());
                    return (
                        event::Status::Captured,
                        Some(Message::SelectionFinished(selection)),
                    );
                }
            }
            _ => {}
        }

        (event::Status::Ignored, None)
    }

    fn draw(
        &self,
        state: &DragState,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        // Dim the frozen screen like the original overlay window
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgba(0.0, 0.0, 0.0, 0.3),
        );

        if let (Some(start), Some(current)) = (state.start, state.current) {
            let top_left = Point::new(start.x.min(current.x), start.y.min(current.y));
            let size = Size::new((start.x - current.x).abs(), (start.y - current.y).abs());
            frame.stroke(
                &Path::rectangle(top_left, size),
                Stroke::default()
                    .with_color(Color::from_rgb(1.0, 0.0, 0.0))
                    .with_width(2.0),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &DragState,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        mouse::Interaction::Crosshair
    }
}

/// Turn two canvas points into a selection relative to the canvas size.
fn normalize(start: Point, end: Point, size: Size) -> Selection {
    if size.width <= 0.0 || size.height <= 0.0 {
        return Selection::default();
    }
    let scale = |p: Point| (p.x / size.width, p.y / size.height);
    Selection::new(scale(start), scale(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Region;

    #[test]
    fn test_normalize_maps_to_image_pixels() {
        // Window is half the size of the screenshot
        let selection = normalize(
            Point::new(100.0, 50.0),
            Point::new(300.0, 250.0),
            Size::new(960.0, 540.0),
        );
        assert_eq!(
            selection.to_region(1920, 1080),
            Region::new(200, 100, 400, 400)
        );
    }

    #[test]
    fn test_normalize_zero_size() {
        let selection = normalize(Point::ORIGIN, Point::new(5.0, 5.0), Size::ZERO);
        assert!(selection.to_region(100, 100).is_empty());
    }
}
