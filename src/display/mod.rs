mod pixel_buffer;

pub use pixel_buffer::{argb, rgb_of, FrameLock, PixelBuffer, BLACK};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use crate::error::{DemoError, DemoResult};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

/// Streaming texture the pixel buffer is uploaded into every frame
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

impl Display {
    /// Create display with custom resolution and VSync settings
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> DemoResult<(Self, TextureCreator<WindowContext>)> {
        let sdl_context = sdl2::init().map_err(DemoError::display)?;
        let video_subsystem = sdl_context.video().map_err(DemoError::display)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| DemoError::display(e.to_string()))?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder
            .build()
            .map_err(|e| DemoError::display(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(DemoError::display)?;

        Ok((
            Self {
                canvas,
                event_pump,
                width,
                height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Upload the buffer and flip
    pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> DemoResult<()> {
        debug_assert_eq!((target.width, target.height), (buffer.width(), buffer.height()));
        target
            .texture
            .update(None, buffer.as_bytes(), buffer.pitch())
            .map_err(|e| DemoError::display(e.to_string()))?;

        self.canvas
            .copy(&target.texture, None, None)
            .map_err(DemoError::display)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a 32-bit streaming target; the pixel buffer stores native-endian
    /// ARGB8888 words, which is SDL's packed ARGB8888 layout.
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> DemoResult<Self> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| DemoError::display(e.to_string()))?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }
}
