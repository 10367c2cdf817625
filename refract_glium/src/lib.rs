use core::array;
use num_traits::AsPrimitive;

use gl::{backend::glutin::DisplayCreationError, glutin};

use glutin::{dpi, event_loop, window};
use refract_prism::{
    refract::{nalgebra::SVector, *},
    *,
};

mod app;
mod renderable;

pub use glium as gl;
pub use refract_prism;
pub use renderable::*;

use app::App;

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Vertex<const N: usize> {
    pub position: [f32; N],
}

impl<const D: usize> Default for Vertex<D> {
    fn default() -> Self {
        Self { position: [0.; D] }
    }
}

pub type Vertex2D = Vertex<2>;
gl::implement_vertex!(Vertex2D, position);

impl<S, const D: usize> From<SVector<S, D>> for Vertex<D>
where
    S: AsPrimitive<f32>,
{
    fn from(v: SVector<S, D>) -> Self {
        Self {
            position: array::from_fn(|i| v[i].as_()),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ViewerError {
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamError),
    #[error("failed to create display: {0}")]
    Display(#[from] DisplayCreationError),
    #[error("failed to compile shaders: {0}")]
    Program(#[from] gl::ProgramCreationError),
    #[error("failed to upload vertices: {0}")]
    Buffer(#[from] gl::vertex::BufferCreationError),
    #[error("failed to draw: {0}")]
    Draw(#[from] gl::DrawError),
    #[error("failed to swap buffers: {0}")]
    SwapBuffers(#[from] gl::SwapBuffersError),
}

/// Colours, and other looks of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ViewerParams {
    pub bg_color: [f32; 4],
    pub line_width: f32,
    /// Multiplies (or divides) the zoom level on each mouse wheel notch
    pub zoom_step: f32,
}

impl Default for ViewerParams {
    fn default() -> Self {
        Self {
            bg_color: [1., 1., 1., 1.],
            line_width: 2.,
            zoom_step: 1.1,
        }
    }
}

/// A handle for the window used to explore a hollow prism.
pub struct PrismWindow {
    events_loop: event_loop::EventLoop<()>,
    display: gl::Display,
}

impl PrismWindow {
    #[inline]
    /// Create a new window from a `winit` [`WindowBuilder`](window::WindowBuilder)
    /// and a [`glutin::ContextBuilder`].
    pub fn new<T: glutin::ContextCurrentState>(
        wb: window::WindowBuilder,
        cb: glutin::ContextBuilder<T>,
    ) -> Result<Self, DisplayCreationError> {
        let events_loop = event_loop::EventLoop::default();
        gl::Display::new(wb, cb, &events_loop).map(|display| Self {
            events_loop,
            display,
        })
    }

    /// A window with a sensible size, vsync and multisampling.
    pub fn open() -> Result<Self, ViewerError> {
        Ok(Self::new(
            window::WindowBuilder::new()
                .with_inner_size(dpi::LogicalSize::new(900, 800))
                .with_title("Hollow prism"),
            glutin::ContextBuilder::new()
                .with_vsync(true)
                .with_multisampling(1 << 3),
        )?)
    }

    /// Show the prism, with sliders starting at `initial`, until the window is closed.
    ///
    /// Only returns early, if the window couldn't be set up.
    pub fn display(self, initial: &PrismParams, params: ViewerParams) -> Result<(), ViewerError> {
        let Self {
            events_loop,
            display,
        } = self;

        let app = App::new(&display, ControlPanel::new(initial), params)?;

        app.run(display, events_loop)
    }
}
