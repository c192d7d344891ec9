use std::{thread, time};

use glfw::Context;
use log::{debug, info};

use crate::platform::WindowClient;
use crate::MouseButton;

use super::Gl;

// Post-tick delay. The buffer swap already waits on vsync where available;
// this keeps the loop polite when it does not.
const TICK_DELAY: time::Duration = time::Duration::from_micros(200);

pub struct GLFWWindow {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,

    gl: Gl,
}

impl crate::platform::WindowTrait for GLFWWindow {
    fn new(width: u32, height: u32, title: &str) -> Self {
        let mut glfw = glfw::init(|error, description| {
            glfw::fail_on_errors(error, description);
        })
        .expect("failed to create GLFW instance");

        glfw.window_hint(glfw::WindowHint::ContextVersionMajor(3));
        glfw.window_hint(glfw::WindowHint::ContextVersionMinor(3));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(
            glfw::OpenGlProfileHint::Core,
        ));

        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .expect("failed to create GLFW window");

        window.set_size_polling(true);
        window.set_close_polling(true);
        window.set_key_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_cursor_enter_polling(true);

        window.make_current();

        let window_size = window.get_size();
        let gl = Gl::new(window_size.0 as u32, window_size.1 as u32, |s| {
            window.get_proc_address(s) as _
        });

        glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

        info!("window created: {}x{}", window_size.0, window_size.1);

        Self {
            glfw,
            window,
            events,

            gl,
        }
    }

    fn window_dimensions(&self) -> (u32, u32) {
        let window_size = self.window.get_size();

        (window_size.0 as u32, window_size.1 as u32)
    }

    fn run<T>(&mut self, client: &mut T)
    where
        T: WindowClient,
    {
        loop {
            // Drain everything pending before advancing the simulation.
            self.glfw.poll_events();

            for (_, glfw_event) in glfw::flush_messages(&self.events) {
                use crate::platform::WindowEvent as W;
                use glfw::WindowEvent as E;
                let event = match glfw_event {
                    E::Key(key, _, action, _) => W::Key {
                        key: match super::glfw_key_to_key(key) {
                            Some(key) => key,
                            None => continue,
                        },
                        pressed: match action {
                            glfw::Action::Release => false,
                            glfw::Action::Press => true,
                            glfw::Action::Repeat => continue,
                        },
                    },
                    E::Size(width, height) => {
                        let (width, height) = (width as u32, height as u32);
                        if (width, height) == self.gl.dimensions() {
                            continue;
                        }
                        debug!("window resized: {width}x{height}");
                        self.gl.resize(width, height);
                        W::WindowResize { width, height }
                    }
                    E::Close => W::WindowClose,
                    E::MouseButton(mouse_button, action, ..) => W::MouseButton {
                        button: match mouse_button {
                            glfw::MouseButtonLeft => MouseButton::Left,
                            glfw::MouseButtonMiddle => MouseButton::Middle,
                            glfw::MouseButtonRight => MouseButton::Right,
                            _ => continue,
                        },
                        pressed: match action {
                            glfw::Action::Release => false,
                            glfw::Action::Press => true,
                            glfw::Action::Repeat => continue,
                        },
                    },
                    E::CursorPos(x, y) => W::MousePos {
                        x: x as u32,
                        y: y as u32,
                    },
                    E::CursorEnter(entered) => W::MouseEnter { entered },
                    _ => continue,
                };

                client.handle_event(event);
            }

            if !client.frame() {
                info!("exit requested, leaving run loop");
                return;
            }

            self.gl.draw(client.pixels());
            self.window.swap_buffers();

            thread::sleep(TICK_DELAY);
        }
    }
}

impl Drop for GLFWWindow {
    fn drop(&mut self) {
        self.gl.deinit();
    }
}
