use eframe::egui::viewport::IconData;

/// Window icon: a dark film frame with sprocket holes and an amber play mark.
pub fn generate_icon(size: u32) -> IconData {
    let s = size as f32;
    let mut rgba = vec![0u8; (size * size * 4) as usize];

    let frame = (s * 0.08, s * 0.16, s * 0.92, s * 0.84);
    let strip = s * 0.12;
    let hole = s * 0.05;
    let play = [(s * 0.40, s * 0.36), (s * 0.40, s * 0.64), (s * 0.64, s * 0.50)];

    for y in 0..size {
        for x in 0..size {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let idx = ((y * size + x) * 4) as usize;
            if px < frame.0 || px > frame.2 || py < frame.1 || py > frame.3 {
                continue;
            }
            let in_strip = py < frame.1 + strip || py > frame.3 - strip;
            let color = if in_strip && is_sprocket(px, py, frame, strip, hole) {
                [0, 0, 0, 0]
            } else if in_strip {
                [24, 24, 28, 255]
            } else if inside_triangle(px, py, play) {
                [255, 176, 32, 255]
            } else {
                [48, 52, 64, 255]
            };
            rgba[idx..idx + 4].copy_from_slice(&color);
        }
    }

    IconData { rgba, width: size, height: size }
}

fn is_sprocket(px: f32, py: f32, frame: (f32, f32, f32, f32), strip: f32, hole: f32) -> bool {
    let pitch = hole * 2.0;
    let along = (px - frame.0) % pitch;
    let row_center = if py < frame.1 + strip { frame.1 + strip * 0.5 } else { frame.3 - strip * 0.5 };
    along > hole * 0.5 && along < hole * 1.5 && (py - row_center).abs() < hole * 0.5
}

fn inside_triangle(px: f32, py: f32, t: [(f32, f32); 3]) -> bool {
    let edge = |a: (f32, f32), b: (f32, f32)| (b.0 - a.0) * (py - a.1) - (b.1 - a.1) * (px - a.0);
    let d1 = edge(t[0], t[1]);
    let d2 = edge(t[1], t[2]);
    let d3 = edge(t[2], t[0]);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
