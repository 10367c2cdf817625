use super::*;

use gl::{
    index::{NoIndices, PrimitiveType},
    Surface,
};
use glutin::event::{
    ElementState, Event, KeyboardInput, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use refract_prism::refract::nalgebra::{Orthographic3, Vector2};

const VERTEX_SHADER_SRC: &str = r"#version 140

in vec2 position;
uniform mat4 projection;

void main() {
    gl_Position = projection * vec4(position, 0.0, 1.0);
}";

const FRAGMENT_SHADER_SRC: &str = r"#version 140

uniform vec4 color_vec;

out vec4 color;

void main() {
    color = color_vec;
}";

/// Slider steps taken on each key press
const COARSE_STEP: Float = 1.0;
/// Same, with shift held
const FINE_STEP: Float = 0.1;

const MIN_ZOOM: f32 = 0.2;
const MAX_ZOOM: f32 = 20.0;
/// Space left around the view bounds, as a fraction of their size
const MARGIN: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
    Select(SliderId),
    Step(Float),
    Reset,
    Quit,
}

pub(crate) fn key_action(key: VirtualKeyCode, fine: bool) -> Option<Action> {
    use VirtualKeyCode as K;

    let step = if fine { FINE_STEP } else { COARSE_STEP };

    Some(match key {
        K::Key1 | K::Numpad1 => Action::Select(SliderId::N1),
        K::Key2 | K::Numpad2 => Action::Select(SliderId::N2),
        K::Key3 | K::Numpad3 => Action::Select(SliderId::N3),
        K::Key4 | K::Numpad4 => Action::Select(SliderId::Thickness),
        K::Key5 | K::Numpad5 => Action::Select(SliderId::Theta1),
        K::Right | K::Up => Action::Step(step),
        K::Left | K::Down => Action::Step(-step),
        K::R => Action::Reset,
        K::Escape => Action::Quit,
        _ => return None,
    })
}

pub(crate) fn window_title(controls: &ControlPanel, path: &PrismTrace) -> String {
    let outcome = match path.termination {
        Termination::TotalInternalReflection { interface } => {
            format!("total internal reflection at wall {}", interface + 1)
        }
        Termination::MissedInterface { interface } => format!("misses wall {}", interface + 1),
        Termination::Exited => path
            .exit_angle()
            .map_or_else(String::new, |angle| format!("exit angle {angle:.2}°")),
    };

    format!("{controls}  |  {outcome}")
}

struct ShapeRenderData {
    vertices: gl::VertexBuffer<Vertex2D>,
    primitive: PrimitiveType,
    color: [f32; 4],
}

impl ShapeRenderData {
    fn new(display: &gl::Display, shape: &Shape) -> Result<Self, ViewerError> {
        Ok(Self {
            vertices: gl::VertexBuffer::immutable(display, &shape.vertices)?,
            primitive: shape.primitive,
            color: shape.color,
        })
    }
}

pub(crate) struct App {
    program: gl::Program,
    controls: ControlPanel,
    bounds: ViewBounds,
    path: PrismTrace,
    scene: Vec<ShapeRenderData>,
    zoom: f32,
    fine: bool,
    params: ViewerParams,
}

impl App {
    pub(crate) fn new(
        display: &gl::Display,
        mut controls: ControlPanel,
        params: ViewerParams,
    ) -> Result<Self, ViewerError> {
        let program =
            gl::Program::from_source(display, VERTEX_SHADER_SRC, FRAGMENT_SHADER_SRC, None)?;

        let bounds = ViewBounds::default();
        controls.take_changed();
        let (prism, path) = Self::retrace(&controls, &bounds)?;

        let mut app = Self {
            program,
            controls,
            bounds,
            path,
            scene: vec![],
            zoom: 1.0,
            fine: false,
            params,
        };

        app.upload(display, &prism)?;

        Ok(app)
    }

    fn retrace(
        controls: &ControlPanel,
        bounds: &ViewBounds,
    ) -> Result<(HollowPrism, PrismTrace), ParamError> {
        let params = controls.params();
        let prism = HollowPrism::new(params.l)?;
        let path = trace_through(&prism, &params, bounds);
        Ok((prism, path))
    }

    fn upload(&mut self, display: &gl::Display, prism: &HollowPrism) -> Result<(), ViewerError> {
        self.scene = shapes_of(&(prism, &self.path))
            .iter()
            .map(|shape| ShapeRenderData::new(display, shape))
            .collect::<Result<_, _>>()?;

        self.update_title(display);

        Ok(())
    }

    fn update_title(&self, display: &gl::Display) {
        display
            .gl_window()
            .window()
            .set_title(&window_title(&self.controls, &self.path));
    }

    /// Retrace the ray, and upload the new scene, if a slider moved.
    fn refresh(&mut self, display: &gl::Display) -> Result<(), ViewerError> {
        if !self.controls.take_changed() {
            return Ok(());
        }

        let (prism, path) = Self::retrace(&self.controls, &self.bounds)?;

        tracing::info!(
            params = %self.controls,
            termination = ?path.termination,
            exit_angle = ?path.exit_angle(),
            "parameters changed"
        );

        self.path = path;
        self.upload(display, &prism)
    }

    /// Returns `false` if the window should close.
    fn apply(&mut self, action: Action, display: &gl::Display) -> bool {
        match action {
            Action::Select(id) => {
                self.controls.select(id);
                tracing::debug!(slider = id.label(), "slider selected");
                self.update_title(display);
            }
            Action::Step(steps) => self.controls.step_selected(steps),
            Action::Reset => {
                tracing::info!("resetting parameters");
                self.controls.reset();
            }
            Action::Quit => return false,
        }
        true
    }

    fn zoom(&mut self, delta: MouseScrollDelta) {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.,
        };

        self.zoom = (self.zoom * self.params.zoom_step.powf(notches)).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Fit the view bounds in a `width` x `height` window, keeping the aspect ratio.
    fn projection(&self, width: u32, height: u32) -> [[f32; 4]; 4] {
        let min: Vector2<f32> = self.bounds.min.map(|c| c as f32);
        let max: Vector2<f32> = self.bounds.max.map(|c| c as f32);

        let center = (min + max) / 2.;
        let half = (max - min) * (0.5 + MARGIN);

        let aspect = width as f32 / height.max(1) as f32;
        let half_h = half.y.max(half.x / aspect) / self.zoom;
        let half_w = half_h * aspect;

        Orthographic3::new(
            center.x - half_w,
            center.x + half_w,
            center.y - half_h,
            center.y + half_h,
            -1.,
            1.,
        )
        .to_homogeneous()
        .into()
    }

    fn render(&self, display: &gl::Display) -> Result<(), ViewerError> {
        let mut target = display.draw();

        let [r, g, b, a] = self.params.bg_color;
        target.clear_color(r, g, b, a);

        let (width, height) = target.get_dimensions();
        let projection = self.projection(width, height);

        let params = gl::DrawParameters {
            blend: gl::Blend::alpha_blending(),
            line_width: Some(self.params.line_width),
            ..Default::default()
        };

        let drawn = self.scene.iter().try_for_each(|shape| {
            target.draw(
                &shape.vertices,
                NoIndices(shape.primitive),
                &self.program,
                &gl::uniform! {
                    projection: projection,
                    color_vec: shape.color,
                },
                &params,
            )
        });

        // the frame must be finished even if drawing failed
        target.finish()?;
        Ok(drawn?)
    }

    pub(crate) fn run(
        mut self,
        display: gl::Display,
        events_loop: event_loop::EventLoop<()>,
    ) -> Result<(), ViewerError> {
        use event_loop::ControlFlow;

        tracing::info!(params = %self.controls, "viewer started");

        events_loop.run(move |ev, _, control_flow| {
            let result = match ev {
                Event::WindowEvent { event, .. } => {
                    match event {
                        WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                        WindowEvent::Resized(physical_size) => {
                            display.gl_window().resize(physical_size);
                        }

                        WindowEvent::ModifiersChanged(modifiers) => self.fine = modifiers.shift(),

                        WindowEvent::KeyboardInput {
                            input:
                                KeyboardInput {
                                    virtual_keycode: Some(key),
                                    state: ElementState::Pressed,
                                    ..
                                },
                            ..
                        } => {
                            if let Some(action) = key_action(key, self.fine) {
                                if !self.apply(action, &display) {
                                    *control_flow = ControlFlow::Exit;
                                }
                            }
                        }

                        WindowEvent::MouseWheel { delta, .. } => self.zoom(delta),

                        _ => {}
                    }
                    Ok(())
                }
                Event::RedrawRequested(_) => self.render(&display),
                Event::MainEventsCleared => {
                    let refreshed = self.refresh(&display);
                    display.gl_window().window().request_redraw();
                    refreshed
                }
                _ => Ok(()),
            };

            if let Err(err) = result {
                tracing::error!("{err}");
                *control_flow = ControlFlow::Exit;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_sliders() {
        assert_eq!(
            key_action(VirtualKeyCode::Key4, false),
            Some(Action::Select(SliderId::Thickness))
        );
        assert_eq!(
            key_action(VirtualKeyCode::Numpad5, true),
            Some(Action::Select(SliderId::Theta1))
        );
        assert_eq!(key_action(VirtualKeyCode::R, false), Some(Action::Reset));
        assert_eq!(key_action(VirtualKeyCode::Escape, false), Some(Action::Quit));
        assert_eq!(key_action(VirtualKeyCode::Q, false), None);
    }

    #[test]
    fn shift_makes_steps_finer() {
        assert_eq!(
            key_action(VirtualKeyCode::Up, false),
            Some(Action::Step(COARSE_STEP))
        );
        assert_eq!(
            key_action(VirtualKeyCode::Left, true),
            Some(Action::Step(-FINE_STEP))
        );
    }

    #[test]
    fn title_shows_the_outcome() {
        let controls = ControlPanel::default();
        let path = trace(&controls.params()).unwrap();
        let exit = path.exit_angle().unwrap();

        assert_eq!(
            window_title(&controls, &path),
            format!("[n1 = 1.00]  n2 = 1.50  n3 = 1.33  l = 0.100  θ1 = 45.00  |  exit angle {exit:.2}°")
        );

        let controls = ControlPanel::new(&PrismParams {
            n1: 3.0,
            n2: 3.0,
            n3: 0.5,
            l: 0.01,
            theta1: 30.0,
        });
        let path = trace(&controls.params()).unwrap();
        assert!(window_title(&controls, &path).ends_with("total internal reflection at wall 2"));
    }
}
