use std::f64::consts::TAU;

use askama::Template;

use super::composition::SceneFrame;
use super::error::VisualizationError;
use crate::geometry::Point3;

pub const DEFAULT_CAMERA: Point3 = Point3::new(3.0, 3.0, 3.0);
const RING_RADIUS: f64 = 1.01;
const RING_SEGMENTS: usize = 100;
/// Visible half-extent of the scene in world units.
const VIEW_EXTENT: f64 = 1.35;

/// Turns a [`SceneFrame`] into some drawable output.
pub trait SceneRenderer {
    type Output;

    fn render(&self, frame: &SceneFrame<'_>) -> Result<Self::Output, VisualizationError>;
}

/// Orthographic view of the scene, looking from `camera` at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
    pub camera: Point3,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
            camera: DEFAULT_CAMERA,
        }
    }
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    fn view(&self, globe_radius: f64) -> Result<View, VisualizationError> {
        if self.width == 0 || self.height == 0 {
            return Err(VisualizationError::Render(format!(
                "viewport {}x{} has no area",
                self.width, self.height
            )));
        }
        let forward = Point3::new(-self.camera.x, -self.camera.y, -self.camera.z)
            .normalized()
            .ok_or_else(|| VisualizationError::Render("camera sits at the origin".into()))?;
        let right = forward
            .cross(&Point3::new(0.0, 1.0, 0.0))
            .normalized()
            .ok_or_else(|| VisualizationError::Render("camera looks straight along y".into()))?;
        let up = right.cross(&forward);

        let (w, h) = (self.width as f64, self.height as f64);
        Ok(View {
            forward,
            right,
            up,
            cx: w / 2.0,
            cy: h / 2.0,
            scale: w.min(h) / 2.0 / VIEW_EXTENT,
            globe_radius,
        })
    }
}

struct View {
    forward: Point3,
    right: Point3,
    up: Point3,
    cx: f64,
    cy: f64,
    scale: f64,
    globe_radius: f64,
}

struct Projected {
    x: f64,
    y: f64,
    hidden: bool,
}

impl View {
    fn project(&self, p: &Point3) -> Projected {
        let u = p.dot(&self.right);
        let v = p.dot(&self.up);
        let depth = -p.dot(&self.forward);
        // behind the globe's silhouette
        let hidden = depth < 0.0 && u * u + v * v < self.globe_radius * self.globe_radius;
        Projected {
            x: self.cx + self.scale * u,
            y: self.cy - self.scale * v,
            hidden,
        }
    }

    /// Visible runs of a polyline, each as an SVG `points` attribute.
    fn polylines<'a>(&self, points: impl IntoIterator<Item = &'a Point3>) -> Vec<String> {
        let mut runs = Vec::new();
        let mut current: Vec<String> = Vec::new();
        for p in points {
            let projected = self.project(p);
            if projected.hidden {
                if current.len() > 1 {
                    runs.push(current.join(" "));
                }
                current.clear();
            } else {
                current.push(format!("{:.2},{:.2}", projected.x, projected.y));
            }
        }
        if current.len() > 1 {
            runs.push(current.join(" "));
        }
        runs
    }

    fn marker(&self, p: &Point3) -> Option<Marker> {
        let projected = self.project(p);
        (!projected.hidden).then(|| Marker {
            x: format!("{:.2}", projected.x),
            y: format!("{:.2}", projected.y),
        })
    }
}

struct Marker {
    x: String,
    y: String,
}

#[derive(Template)]
#[template(path = "scene.svg")]
struct SceneSvg {
    width: u32,
    height: u32,
    cx: String,
    cy: String,
    globe_r: String,
    rings: Vec<String>,
    path: Vec<String>,
    observer: Option<Marker>,
    satellite: Option<Marker>,
    has_data: bool,
}

fn ring(axis: fn(f64) -> Point3) -> Vec<Point3> {
    (0..=RING_SEGMENTS)
        .map(|i| axis(TAU * i as f64 / RING_SEGMENTS as f64))
        .collect()
}

impl SceneRenderer for SvgRenderer {
    type Output = String;

    fn render(&self, frame: &SceneFrame<'_>) -> Result<String, VisualizationError> {
        let view = self.view(frame.globe_radius)?;

        let equator = ring(|a| Point3::new(RING_RADIUS * a.cos(), 0.0, RING_RADIUS * a.sin()));
        let meridian = ring(|a| Point3::new(RING_RADIUS * a.cos(), RING_RADIUS * a.sin(), 0.0));
        let mut rings = view.polylines(&equator);
        rings.extend(view.polylines(&meridian));

        let template = SceneSvg {
            width: self.width,
            height: self.height,
            cx: format!("{:.2}", view.cx),
            cy: format!("{:.2}", view.cy),
            globe_r: format!("{:.2}", view.scale * frame.globe_radius),
            rings,
            path: view.polylines(frame.path.iter().map(|p| &p.position)),
            observer: view.marker(&frame.observer),
            satellite: frame.satellite.as_ref().and_then(|s| view.marker(s)),
            has_data: frame.has_data,
        };
        template
            .render()
            .map_err(|e| VisualizationError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::spherical_to_cartesian;
    use crate::trajectory::TrajectoryPoint;

    fn point(index: usize, position: Point3) -> TrajectoryPoint {
        TrajectoryPoint {
            index,
            t: index as f64,
            azimuth_deg: 0.0,
            elevation_deg: 0.0,
            position,
        }
    }

    fn frame(path: &[TrajectoryPoint]) -> SceneFrame<'_> {
        SceneFrame {
            globe_radius: 1.0,
            observer: spherical_to_cartesian(0.0, 0.0, 1.01),
            path,
            satellite: path.first().map(|p| p.position),
            has_data: !path.is_empty(),
        }
    }

    #[test]
    fn test_render_contains_layers() {
        let path = vec![
            point(0, Point3::new(1.2, 0.0, 0.0)),
            point(1, Point3::new(0.8, 0.8, 0.4)),
            point(2, Point3::new(0.0, 1.2, 0.0)),
        ];
        let svg = SvgRenderer::default().render(&frame(&path)).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"class="globe""#));
        assert!(svg.contains(r#"class="path""#));
        assert!(svg.contains(r#"class="satellite""#));
        assert!(svg.contains(r#"class="observer""#));
        assert!(!svg.contains("No pass data"));
    }

    #[test]
    fn test_empty_frame_shows_placeholder() {
        let svg = SvgRenderer::default().render(&frame(&[])).unwrap();
        assert!(svg.contains("No pass data"));
        assert!(!svg.contains(r#"class="path""#));
        assert!(!svg.contains(r#"class="satellite""#));
    }

    #[test]
    fn test_far_side_is_hidden() {
        let view = SvgRenderer::default().view(1.0).unwrap();
        assert!(!view.project(&Point3::new(1.0, 1.0, 1.0)).hidden);
        assert!(view.project(&Point3::new(-0.5, -0.5, -0.5)).hidden);
        // outside the silhouette even though it is behind
        assert!(!view.project(&Point3::new(-2.0, -1.0, 2.0)).hidden);
    }

    #[test]
    fn test_hidden_points_split_runs() {
        let view = SvgRenderer::default().view(1.0).unwrap();
        let points = [
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.1, 1.0, 1.0),
            Point3::new(-0.5, -0.5, -0.5),
            Point3::new(1.0, 1.1, 1.0),
            Point3::new(1.0, 1.0, 1.1),
        ];
        assert_eq!(view.polylines(&points).len(), 2);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let view = SvgRenderer::new(400, 200).view(1.0).unwrap();
        let p = view.project(&Point3::new(0.0, 0.0, 0.0));
        assert!((p.x - 200.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_viewport_is_an_error() {
        let result = SvgRenderer::new(0, 480).render(&frame(&[]));
        assert!(matches!(result, Err(VisualizationError::Render(_))));
    }
}
