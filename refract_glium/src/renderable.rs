use super::*;
use gl::index::PrimitiveType;

pub const BLACK: [f32; 4] = [0., 0., 0., 1.];
pub const RED: [f32; 4] = [1., 0., 0., 1.];
pub const BLUE: [f32; 4] = [0., 0., 1., 1.];
pub const GREEN: [f32; 4] = [0., 0.5, 0., 1.];
pub const MEDIUM_SEA_GREEN: [f32; 4] = [60. / 255., 179. / 255., 113. / 255., 1.];

/// Colour of each segment of a ray's path through the prism, the incident ray first.
pub const SEGMENT_COLORS: [[f32; 4]; 5] = [RED, BLUE, GREEN, MEDIUM_SEA_GREEN, BLACK];

/// Vertices, to be drawn with a single colour and primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub vertices: Vec<Vertex2D>,
    pub primitive: PrimitiveType,
    pub color: [f32; 4],
}

impl Shape {
    pub fn line_loop(vertices: impl IntoIterator<Item = Vertex2D>, color: [f32; 4]) -> Self {
        Self {
            vertices: vertices.into_iter().collect(),
            primitive: PrimitiveType::LineLoop,
            color,
        }
    }

    pub fn line(a: Vertex2D, b: Vertex2D, color: [f32; 4]) -> Self {
        Self {
            vertices: vec![a, b],
            primitive: PrimitiveType::LinesList,
            color,
        }
    }
}

/// A wrapper around a `Vec<T>` that only allows pushing/appending/extending etc...
pub struct List<T>(Vec<T>);

impl<T> List<T> {
    #[inline]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.0.reserve(additional);
    }

    #[inline]
    pub fn push(&mut self, v: T) {
        self.0.push(v);
    }
}

impl<T> Extend<T> for List<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<T> From<Vec<T>> for List<T> {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Self(value)
    }
}

/// Anything that can be drawn as a set of coloured [`Shape`]s.
#[impl_trait_for_tuples::impl_for_tuples(1, 16)]
pub trait Renderable {
    fn append_shapes(&self, list: &mut List<Shape>);
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn append_shapes(&self, list: &mut List<Shape>) {
        (*self).append_shapes(list);
    }
}

impl<T: Renderable> Renderable for Option<T> {
    fn append_shapes(&self, list: &mut List<Shape>) {
        if let Some(inner) = self {
            inner.append_shapes(list);
        }
    }
}

impl Renderable for HollowPrism {
    /// The outer and inner outlines
    fn append_shapes(&self, list: &mut List<Shape>) {
        for vertices in [self.outer_vertices(), self.inner_vertices()] {
            list.push(Shape::line_loop(vertices.iter().map(|&v| Vertex2D::from(v)), BLACK));
        }
    }
}

impl Renderable for PrismTrace {
    /// One line per segment, coloured by its position in the path.
    fn append_shapes(&self, list: &mut List<Shape>) {
        list.reserve(self.segments.len());
        for (segment, color) in self.segments.iter().zip(SEGMENT_COLORS) {
            list.push(Shape::line(segment.origin.into(), segment.end().into(), color));
        }
    }
}

/// Collect the shapes of `scene` into a `Vec`.
pub fn shapes_of(scene: &(impl Renderable + ?Sized)) -> Vec<Shape> {
    let mut list = List::from(vec![]);
    scene.append_shapes(&mut list);
    list.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prism_is_two_triangles() {
        let prism = HollowPrism::new(0.1).unwrap();
        let shapes = shapes_of(&prism);

        assert_eq!(shapes.len(), 2);
        for shape in &shapes {
            assert_eq!(shape.vertices.len(), 3);
            assert_eq!(shape.primitive, PrimitiveType::LineLoop);
            assert_eq!(shape.color, BLACK);
        }
        assert_eq!(shapes[0].vertices[1].position, [0., 0.5]);
    }

    #[test]
    fn segments_are_coloured_in_order() {
        let path = trace(&PrismParams::default()).unwrap();
        let shapes = shapes_of(&path);

        assert_eq!(shapes.len(), 5);
        for (shape, color) in shapes.iter().zip(SEGMENT_COLORS) {
            assert_eq!(shape.color, color);
            assert_eq!(shape.vertices.len(), 2);
        }

        // the incident ray ends on the origin
        assert!(shapes[0].vertices[1].position.iter().all(|c| c.abs() < 1e-6));
    }

    #[test]
    fn nothing_is_drawn_past_total_internal_reflection() {
        let path = trace(&PrismParams {
            n1: 3.0,
            n2: 3.0,
            n3: 0.5,
            l: 0.01,
            theta1: 30.0,
        })
        .unwrap();

        let shapes = shapes_of(&path);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[1].color, BLUE);
    }

    #[test]
    fn tuples_draw_every_member() {
        let params = PrismParams::default();
        let prism = HollowPrism::new(params.l).unwrap();
        let path = trace(&params).unwrap();

        assert_eq!(shapes_of(&(&prism, &path)).len(), 7);
        assert_eq!(shapes_of(&(prism, None::<PrismTrace>)).len(), 2);
    }
}
