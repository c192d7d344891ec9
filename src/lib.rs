use std::collections::HashMap;

pub mod frame;
pub mod sim;

mod key;
pub use key::Key;

mod platform;

use frame::Frame;
use platform::{Window, WindowClient, WindowEvent, WindowTrait};

pub struct EngineBuilder {
    width: u32,
    height: u32,

    title: String,
}

impl EngineBuilder {
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    #[inline]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[inline]
    pub fn title(mut self, title: String) -> Self {
        self.title = title;
        self
    }

    pub fn build(self) -> Engine {
        Engine::new(self)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            title: String::from("bouncebox"),
        }
    }
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
enum PressedState {
    JustPressed,
    Pressed,
    JustReleased,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

pub struct Engine {
    frame: Frame,

    window: Option<Window>,
}

impl Engine {
    fn new(builder: EngineBuilder) -> Self {
        let EngineBuilder {
            width,
            height,
            title,
        } = builder;

        let window = Window::new(width, height, &title);
        let window_size = window.window_dimensions();

        Self {
            frame: Frame::new(window_size.0, window_size.1),

            window: Some(window),
        }
    }

    /// Runs the main loop until the client requests exit. `handle_frame` is
    /// called once per tick, after all pending window events have been
    /// drained, and draws into the frame that gets presented.
    pub fn run<F>(&mut self, handle_frame: F)
    where
        F: FnMut(&mut Context, &mut Frame),
    {
        let mut window = self.window.take().unwrap();
        let (width, height) = window.window_dimensions();

        let mut runner = Runner {
            width,
            height,

            frame: &mut self.frame,
            handle_frame,

            current_frame: 0,

            mouse_pos: (0.0, 0.0),
            is_mouse_in_window: false,

            mouse_button_states: HashMap::new(),
            key_states: HashMap::new(),

            will_exit: false,
        };

        window.run(&mut runner);
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.frame.width()
    }
    #[inline]
    pub fn height(&self) -> u32 {
        self.frame.height()
    }
}

struct Runner<'a, F>
where
    F: FnMut(&mut Context, &mut Frame),
{
    width: u32,
    height: u32,

    frame: &'a mut Frame,
    handle_frame: F,

    current_frame: u64,

    mouse_pos: (f32, f32),
    is_mouse_in_window: bool,

    mouse_button_states: HashMap<MouseButton, PressedState>,
    key_states: HashMap<Key, PressedState>,

    will_exit: bool,
}

impl<'a, F> WindowClient for Runner<'a, F>
where
    F: FnMut(&mut Context, &mut Frame),
{
    fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::MouseButton { button, pressed } => {
                self.mouse_button_states.insert(
                    button,
                    if pressed {
                        PressedState::JustPressed
                    } else {
                        PressedState::JustReleased
                    },
                );
            }
            WindowEvent::Key { key, pressed } => {
                self.key_states.insert(
                    key,
                    if pressed {
                        PressedState::JustPressed
                    } else {
                        PressedState::JustReleased
                    },
                );
            }
            WindowEvent::MouseEnter { entered } => self.is_mouse_in_window = entered,
            WindowEvent::MousePos { x, y } => {
                // Tracked only; nothing downstream consumes the pointer yet.
                self.mouse_pos = (x as f32, y as f32);
            }
            WindowEvent::WindowClose => self.will_exit = true,
            WindowEvent::WindowResize { width, height } => {
                self.width = width;
                self.height = height;
                self.frame.resize(width, height);
            }
        }
    }

    fn frame(&mut self) -> bool {
        let mut ctx = Context {
            width: self.width,
            height: self.height,
            current_frame: self.current_frame,

            mouse_pos: self.mouse_pos,
            is_mouse_in_window: self.is_mouse_in_window,

            mouse_button_states: &self.mouse_button_states,

            key_states: &self.key_states,

            will_exit: self.will_exit,
        };
        (self.handle_frame)(&mut ctx, &mut *self.frame);

        self.current_frame += 1;

        let keep_running = !ctx.will_exit;

        self.key_states
            .retain(|_, state| *state != PressedState::JustReleased);
        for (_, state) in self.key_states.iter_mut() {
            if *state == PressedState::JustPressed {
                *state = PressedState::Pressed;
            }
        }
        self.mouse_button_states
            .retain(|_, state| *state != PressedState::JustReleased);
        for (_, state) in self.mouse_button_states.iter_mut() {
            if *state == PressedState::JustPressed {
                *state = PressedState::Pressed;
            }
        }

        keep_running
    }

    fn pixels(&self) -> &[u8] {
        self.frame.pixels()
    }
}

pub struct Context<'a> {
    width: u32,
    height: u32,
    current_frame: u64,

    mouse_pos: (f32, f32),
    is_mouse_in_window: bool,

    mouse_button_states: &'a HashMap<MouseButton, PressedState>,

    key_states: &'a HashMap<Key, PressedState>,

    will_exit: bool,
}

impl<'a> Context<'a> {
    #[inline]
    pub fn will_exit(&self) -> bool {
        self.will_exit
    }
    #[inline]
    pub fn exit(&mut self) {
        self.will_exit = true;
    }
    #[inline]
    pub fn prevent_exit(&mut self) {
        self.will_exit = false;
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
    #[inline]
    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
    #[inline]
    pub fn mouse_x(&self) -> f32 {
        self.mouse_pos.0
    }
    #[inline]
    pub fn mouse_y(&self) -> f32 {
        self.mouse_pos.1
    }
    #[inline]
    pub fn mouse_pos(&self) -> (f32, f32) {
        self.mouse_pos
    }
    #[inline]
    pub fn is_mouse_in_window(&self) -> bool {
        self.is_mouse_in_window
    }

    pub fn is_key_pressed(&self, key_code: Key) -> bool {
        self.key_states
            .get(&key_code)
            .map_or(false, |state| *state != PressedState::JustReleased)
    }
    pub fn is_key_just_pressed(&self, key_code: Key) -> bool {
        self.key_states
            .get(&key_code)
            .map_or(false, |state| *state == PressedState::JustPressed)
    }
    pub fn is_key_just_released(&self, key_code: Key) -> bool {
        self.key_states
            .get(&key_code)
            .map_or(false, |state| *state == PressedState::JustReleased)
    }
    #[inline]
    pub fn is_mouse_button_pressed(&self, mouse_button: MouseButton) -> bool {
        self.mouse_button_states
            .get(&mouse_button)
            .map_or(false, |state| *state != PressedState::JustReleased)
    }
    pub fn is_mouse_button_just_pressed(&self, mouse_button: MouseButton) -> bool {
        self.mouse_button_states
            .get(&mouse_button)
            .map_or(false, |state| *state == PressedState::JustPressed)
    }
    pub fn is_mouse_button_just_released(&self, mouse_button: MouseButton) -> bool {
        self.mouse_button_states
            .get(&mouse_button)
            .map_or(false, |state| *state == PressedState::JustReleased)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn test_runner<F>(frame: &mut Frame, handle_frame: F) -> Runner<'_, F>
    where
        F: FnMut(&mut Context, &mut Frame),
    {
        Runner {
            width: frame.width(),
            height: frame.height(),
            frame,
            handle_frame,

            current_frame: 0,

            mouse_pos: (0.0, 0.0),
            is_mouse_in_window: false,

            mouse_button_states: HashMap::new(),
            key_states: HashMap::new(),

            will_exit: false,
        }
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let mut frame = Frame::new(4, 4);
        let mut runner = test_runner(&mut frame, |ctx, _| {
            if ctx.is_key_just_pressed(Key::Escape) {
                ctx.exit();
            }
        });

        assert!(runner.frame());

        runner.handle_event(WindowEvent::Key {
            key: Key::Escape,
            pressed: true,
        });
        assert!(!runner.frame());
    }

    #[test]
    fn window_close_stops_the_loop() {
        let mut frame = Frame::new(4, 4);
        let mut runner = test_runner(&mut frame, |_, _| {});

        assert!(runner.frame());

        runner.handle_event(WindowEvent::WindowClose);
        assert!(!runner.frame());
    }

    #[test]
    fn just_pressed_lasts_one_frame() {
        let mut frame = Frame::new(4, 4);
        let just_pressed = Cell::new(0u32);
        let held = Cell::new(0u32);
        let mut runner = test_runner(&mut frame, |ctx, _| {
            if ctx.is_key_just_pressed(Key::Space) {
                just_pressed.set(just_pressed.get() + 1);
            }
            if ctx.is_key_pressed(Key::Space) {
                held.set(held.get() + 1);
            }
        });

        runner.handle_event(WindowEvent::Key {
            key: Key::Space,
            pressed: true,
        });
        runner.frame();
        runner.frame();

        assert_eq!(just_pressed.get(), 1);
        assert_eq!(held.get(), 2);
    }

    #[test]
    fn released_keys_decay_out_of_the_map() {
        let mut frame = Frame::new(4, 4);
        let mut runner = test_runner(&mut frame, |_, _| {});

        runner.handle_event(WindowEvent::Key {
            key: Key::Space,
            pressed: true,
        });
        runner.frame();
        runner.handle_event(WindowEvent::Key {
            key: Key::Space,
            pressed: false,
        });
        runner.frame();

        assert!(runner.key_states.is_empty());
    }

    #[test]
    fn resize_updates_context_and_frame() {
        let mut frame = Frame::new(4, 4);
        let seen = Cell::new((0u32, 0u32));
        let mut runner = test_runner(&mut frame, |ctx, frame| {
            seen.set(ctx.dimensions());
            assert_eq!(frame.width(), ctx.width());
            assert_eq!(frame.height(), ctx.height());
        });

        runner.handle_event(WindowEvent::WindowResize {
            width: 10,
            height: 6,
        });
        runner.frame();

        assert_eq!(seen.get(), (10, 6));
        assert_eq!(runner.pixels().len(), 10 * 6 * 3);
    }

    #[test]
    fn frame_counter_increments() {
        let mut frame = Frame::new(4, 4);
        let last = Cell::new(0u64);
        let mut runner = test_runner(&mut frame, |ctx, _| {
            last.set(ctx.current_frame());
        });

        runner.frame();
        assert_eq!(last.get(), 0);
        runner.frame();
        assert_eq!(last.get(), 1);
    }

    #[test]
    fn pointer_motion_is_tracked_but_inert() {
        let mut frame = Frame::new(4, 4);
        let pos = Cell::new((0.0f32, 0.0f32));
        let mut runner = test_runner(&mut frame, |ctx, _| {
            pos.set(ctx.mouse_pos());
        });

        runner.handle_event(WindowEvent::MouseEnter { entered: true });
        runner.handle_event(WindowEvent::MousePos { x: 3, y: 2 });
        assert!(runner.frame());

        assert_eq!(pos.get(), (3.0, 2.0));
    }
}
