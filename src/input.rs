use egui::{Context, PointerButton, Pos2, Rect};

use crate::state::CanvasState;

/// Canvas input in the canvas's own screen space (origin at the top-left of
/// the drawing surface).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A button was pressed over the canvas
    PointerDown { position: Pos2, button: PointerButton },
    /// The pointer moved
    PointerMove { position: Pos2 },
    /// A button was released
    PointerUp { position: Pos2, button: PointerButton },
    /// The pointer left the canvas
    PointerLeave,
    /// Scroll wheel; positive notches zoom in
    Wheel { position: Pos2, notches: f32 },
}

const BUTTONS: [PointerButton; 3] = [
    PointerButton::Primary,
    PointerButton::Secondary,
    PointerButton::Middle,
];

/// Converts raw egui input into [`InputEvent`]s for one canvas
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    was_inside: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect this frame's events.
    ///
    /// `canvas_hovered` should come from the canvas widget's response so that
    /// windows floating over the canvas swallow their own clicks. It stays
    /// true while the canvas is dragged, so leaving is decided from the
    /// pointer position against `canvas_rect`.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect, canvas_hovered: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let to_local = |pos: Pos2| (pos - canvas_rect.min).to_pos2();

        ctx.input(|input| {
            let hover_pos = input.pointer.hover_pos();
            let inside = canvas_hovered && hover_pos.is_some_and(|pos| canvas_rect.contains(pos));

            // Leave goes first so the gesture ends before any outside point is seen
            if self.was_inside && !inside {
                events.push(InputEvent::PointerLeave);
            }
            self.was_inside = inside;

            if let Some(pos) = hover_pos {
                if Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove {
                        position: to_local(pos),
                    });
                }
            }
            self.last_pointer_pos = hover_pos;

            for button in BUTTONS {
                if input.pointer.button_pressed(button) && inside {
                    if let Some(pos) = hover_pos {
                        events.push(InputEvent::PointerDown {
                            position: to_local(pos),
                            button,
                        });
                    }
                }
                if input.pointer.button_released(button) {
                    let position = hover_pos.map(to_local).unwrap_or_default();
                    events.push(InputEvent::PointerUp { position, button });
                }
            }

            if inside {
                let scroll = input.raw_scroll_delta.y;
                if scroll != 0.0 {
                    if let Some(pos) = hover_pos {
                        events.push(InputEvent::Wheel {
                            position: to_local(pos),
                            notches: scroll.signum(),
                        });
                    }
                }
            }
        });

        events
    }
}

/// Dispatch one event to the canvas
pub fn route_event(event: &InputEvent, state: &mut CanvasState) {
    match *event {
        InputEvent::PointerDown { position, button } => state.pointer_down(position, button),
        InputEvent::PointerMove { position } => state.pointer_move(position),
        InputEvent::PointerUp { .. } => state.pointer_up(),
        InputEvent::PointerLeave => state.pointer_leave(),
        InputEvent::Wheel { position, notches } => state.wheel(position, notches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Event, Modifiers, RawInput, pos2};

    fn frame(ctx: &Context, handler: &mut InputHandler, events: Vec<Event>, hovered: bool) -> Vec<InputEvent> {
        let rect = Rect::from_min_size(pos2(100.0, 50.0), egui::vec2(400.0, 300.0));
        let raw = RawInput {
            events,
            ..Default::default()
        };
        let mut out = Vec::new();
        let _ = ctx.run(raw, |ctx| {
            out = handler.process_input(ctx, rect, hovered);
        });
        out
    }

    #[test]
    fn test_press_is_reported_in_canvas_space() {
        let ctx = Context::default();
        let mut handler = InputHandler::new();
        let events = frame(
            &ctx,
            &mut handler,
            vec![
                Event::PointerMoved(pos2(150.0, 80.0)),
                Event::PointerButton {
                    pos: pos2(150.0, 80.0),
                    button: PointerButton::Primary,
                    pressed: true,
                    modifiers: Modifiers::default(),
                },
            ],
            true,
        );

        assert!(events.contains(&InputEvent::PointerDown {
            position: pos2(50.0, 30.0),
            button: PointerButton::Primary,
        }));
    }

    #[test]
    fn test_leaving_the_canvas_emits_leave() {
        let ctx = Context::default();
        let mut handler = InputHandler::new();
        frame(&ctx, &mut handler, vec![Event::PointerMoved(pos2(150.0, 80.0))], true);
        let events = frame(&ctx, &mut handler, vec![Event::PointerGone], false);
        assert_eq!(events.last(), Some(&InputEvent::PointerLeave));
    }

    #[test]
    fn test_route_draws_a_path() {
        let mut state = CanvasState::default();
        state.resize(egui::vec2(200.0, 200.0));
        let events = [
            InputEvent::PointerDown {
                position: pos2(10.0, 10.0),
                button: PointerButton::Primary,
            },
            InputEvent::PointerMove {
                position: pos2(20.0, 10.0),
            },
            InputEvent::PointerUp {
                position: pos2(20.0, 10.0),
                button: PointerButton::Primary,
            },
        ];
        for event in &events {
            route_event(event, &mut state);
        }
        assert_eq!(state.current_layer().map(|l| l.paths.len()), Some(1));
    }

    #[test]
    fn test_route_wheel_zooms() {
        let mut state = CanvasState::default();
        route_event(
            &InputEvent::Wheel {
                position: pos2(0.0, 0.0),
                notches: -1.0,
            },
            &mut state,
        );
        assert!(state.viewport().zoom < 1.0);
    }

    #[test]
    fn test_dragging_out_of_the_rect_leaves_before_moving() {
        let ctx = Context::default();
        let mut handler = InputHandler::new();
        frame(&ctx, &mut handler, vec![Event::PointerMoved(pos2(150.0, 80.0))], true);

        // A dragged widget still reports itself hovered outside its rect
        let events = frame(&ctx, &mut handler, vec![Event::PointerMoved(pos2(650.0, 80.0))], true);
        assert_eq!(
            events,
            vec![
                InputEvent::PointerLeave,
                InputEvent::PointerMove {
                    position: pos2(550.0, 30.0),
                },
            ]
        );
    }
}
