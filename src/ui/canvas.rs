use eframe::egui::{Color32, Mesh, Painter, Pos2, Rect, Shape, Stroke, vec2};

use crate::color;
use crate::particles::Trail;

// ---------------------------------------------------------------------------
// Particle canvas (background layer)
// ---------------------------------------------------------------------------

/// Paint the gradient backdrop and the particle trail into `rect`.
pub fn paint(painter: &Painter, rect: Rect, trail: &Trail) {
    paint_background(painter, rect);

    let to_screen = |p: [f32; 2]| -> Pos2 { rect.min + vec2(p[0], p[1]) };

    for (weight, frame) in trail.layers() {
        for dot in &frame.dots {
            painter.circle_filled(
                to_screen([dot.x, dot.y]),
                dot.radius,
                color::accent_alpha(dot.opacity * weight),
            );
        }
        for link in &frame.links {
            painter.line_segment(
                [to_screen(link.from), to_screen(link.to)],
                Stroke::new(1.0, color::accent_alpha(link.opacity * weight)),
            );
        }
    }
}

/// Diagonal two-tone gradient.
fn paint_background(painter: &Painter, rect: Rect) {
    let [start, end] = [color::BACKGROUND_START, color::BACKGROUND_END];
    let mid = blend(start, end);

    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), start);
    mesh.colored_vertex(rect.right_top(), mid);
    mesh.colored_vertex(rect.right_bottom(), end);
    mesh.colored_vertex(rect.left_bottom(), mid);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));
}

fn blend(a: Color32, b: Color32) -> Color32 {
    let colors = color::gradient([a.r(), a.g(), a.b()], [b.r(), b.g(), b.b()], 3);
    colors.get(1).copied().unwrap_or(a)
}
