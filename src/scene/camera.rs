/// Orthographic orbit camera around the scene origin, z up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Rotation around the vertical axis (radians).
    pub yaw: f64,
    /// Tilt above the horizon (radians), clamped to ±PITCH_LIMIT.
    pub pitch: f64,
    pub zoom: f64,
}

pub const PITCH_LIMIT: f64 = 1.5;
const ZOOM_RANGE: (f64, f64) = (0.1, 10.0);
const ORBIT_SPEED: f64 = 0.01;

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.5,
            zoom: 1.0,
        }
    }
}

impl OrbitCamera {
    /// Project a world point to view coordinates (x right, y up) and depth.
    /// Larger depth is farther from the viewer.
    pub fn project(&self, p: [f64; 3]) -> ([f64; 2], f64) {
        let (sin_y, cos_y) = self.yaw.sin_cos();
        let (sin_p, cos_p) = self.pitch.sin_cos();

        // Rotate around z (yaw)
        let x1 = p[0] * cos_y - p[1] * sin_y;
        let y1 = p[0] * sin_y + p[1] * cos_y;

        // Tilt around the view x axis (pitch)
        let up = p[2] * cos_p + y1 * sin_p;
        let depth = y1 * cos_p - p[2] * sin_p;

        ([x1 * self.zoom, up * self.zoom], depth)
    }

    /// Orbit by a pointer drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw += dx as f64 * ORBIT_SPEED;
        self.pitch = (self.pitch + dy as f64 * ORBIT_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Mean depth of a polygon, for back-to-front ordering.
pub fn mean_depth(camera: &OrbitCamera, points: &[[f64; 3]]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| camera.project(*p).1).sum::<f64>() / points.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn origin_projects_to_center() {
        let cam = OrbitCamera::default();
        let (xy, depth) = cam.project([0.0, 0.0, 0.0]);
        assert!(xy[0].abs() < EPS && xy[1].abs() < EPS && depth.abs() < EPS);
    }

    #[test]
    fn depth_follows_yaw() {
        let mut cam = OrbitCamera {
            yaw: 0.0,
            pitch: 0.0,
            zoom: 1.0,
        };
        let near = [0.0, -10.0, 0.0];
        let far = [0.0, 10.0, 0.0];
        assert!(cam.project(far).1 > cam.project(near).1);

        cam.yaw = std::f64::consts::PI;
        assert!(cam.project(far).1 < cam.project(near).1);
    }

    #[test]
    fn looking_down_brings_high_points_closer() {
        let cam = OrbitCamera {
            yaw: 0.0,
            pitch: 1.0,
            zoom: 2.0,
        };
        let (xy, depth) = cam.project([0.0, 0.0, 5.0]);
        assert!(depth < 0.0);
        assert!((xy[1] - 10.0 * 1.0_f64.cos()).abs() < EPS);
    }

    #[test]
    fn orbit_and_zoom_are_clamped() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, 10_000.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        cam.zoom_by(1000.0);
        assert_eq!(cam.zoom, 10.0);
        cam.reset();
        assert_eq!(cam, OrbitCamera::default());
    }
}
