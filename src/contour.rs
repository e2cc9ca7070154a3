//! Isoline extraction via marching squares.
//!
//! Traces the point paths along which a gridded scalar field equals a given
//! level. Cells are classified against the level, crossings are located by
//! linear interpolation along cell edges, and the resulting segments are
//! chained into polylines. All geometry is expressed directly in the
//! longitude/latitude coordinates of the accompanying grid.

use crate::errors::{IsoLatError, Result};
use crate::grid::CoordinateGrid;
use ndarray::Array2;

/// A geographic point on a contour path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// A line segment between two points.
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A connected contour polyline.
#[derive(Debug, Clone)]
pub struct ContourPath {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl ContourPath {
    /// Arithmetic mean of the path's latitudes.
    pub fn mean_latitude(&self) -> f64 {
        if self.points.is_empty() {
            return f64::NAN;
        }
        let sum: f64 = self.points.iter().map(|p| p.lat).sum();
        sum / self.points.len() as f64
    }
}

/// Tolerance for matching segment endpoints, in degrees.
const ENDPOINT_EPSILON: f64 = 1e-6;

/// Trace all contour paths of `field` at `level`.
///
/// The field must share its (ny, nx) shape with the coordinate grid, row 0
/// on the southern edge. Cells touching a NaN corner are skipped, so masked
/// areas simply truncate paths. Paths are returned in grid scan order
/// (south to north, west to east by seed cell); downstream policy takes the
/// first path and the mean of its latitudes, so reimplementations must keep
/// this ordering deterministic.
pub fn trace_contour(
    field: &Array2<f32>,
    grid: &CoordinateGrid,
    level: f64,
) -> Result<Vec<ContourPath>> {
    if field.shape() != grid.lons.shape() {
        return Err(IsoLatError::ContourError(format!(
            "contour field shape {:?} does not match coordinate grid shape {:?}",
            field.shape(),
            grid.lons.shape()
        )));
    }

    let segments = march_squares(field, grid, level);
    Ok(connect_segments(segments))
}

/// Evenly spaced contour levels covering `[min, max]` at `interval`.
pub fn contour_levels(min: f64, max: f64, interval: f64) -> Vec<f64> {
    if interval <= 0.0 || max <= min || !min.is_finite() || !max.is_finite() {
        return vec![];
    }

    let start = (min / interval).ceil() * interval;
    if start > max {
        return vec![];
    }

    // Each level is multiplied out from the start; accumulating the
    // interval drifts and can drop the topmost level.
    let count = ((max - start) / interval + 1e-9).floor() as usize + 1;
    (0..count).map(|k| start + k as f64 * interval).collect()
}

/// Scan every grid cell and emit the raw crossing segments for `level`.
fn march_squares(field: &Array2<f32>, grid: &CoordinateGrid, level: f64) -> Vec<Segment> {
    let (ny, nx) = (grid.ny(), grid.nx());
    let mut segments = Vec::new();

    for j in 0..ny - 1 {
        for i in 0..nx - 1 {
            let sw = field[[j, i]] as f64;
            let se = field[[j, i + 1]] as f64;
            let nw = field[[j + 1, i]] as f64;
            let ne = field[[j + 1, i + 1]] as f64;

            if sw.is_nan() || se.is_nan() || nw.is_nan() || ne.is_nan() {
                continue;
            }

            let mut cell_index = 0u8;
            if sw >= level {
                cell_index |= 1;
            }
            if se >= level {
                cell_index |= 2;
            }
            if ne >= level {
                cell_index |= 4;
            }
            if nw >= level {
                cell_index |= 8;
            }

            if cell_index == 0 || cell_index == 15 {
                continue;
            }

            let p_sw = Point::new(grid.lons[[j, i]], grid.lats[[j, i]]);
            let p_se = Point::new(grid.lons[[j, i + 1]], grid.lats[[j, i + 1]]);
            let p_nw = Point::new(grid.lons[[j + 1, i]], grid.lats[[j + 1, i]]);
            let p_ne = Point::new(grid.lons[[j + 1, i + 1]], grid.lats[[j + 1, i + 1]]);

            let south = interpolate_edge(p_sw, p_se, sw, se, level);
            let east = interpolate_edge(p_se, p_ne, se, ne, level);
            let north = interpolate_edge(p_nw, p_ne, nw, ne, level);
            let west = interpolate_edge(p_sw, p_nw, sw, nw, level);

            segments.extend(cell_segments(cell_index, south, east, north, west));
        }
    }

    segments
}

/// Marching squares lookup: which edge crossings to join for a cell class.
fn cell_segments(
    cell_index: u8,
    south: Point,
    east: Point,
    north: Point,
    west: Point,
) -> Vec<Segment> {
    match cell_index {
        1 | 14 => vec![Segment {
            start: west,
            end: south,
        }],
        2 | 13 => vec![Segment {
            start: south,
            end: east,
        }],
        3 | 12 => vec![Segment {
            start: west,
            end: east,
        }],
        4 | 11 => vec![Segment {
            start: east,
            end: north,
        }],
        // Saddle: two opposite corners above the level
        5 => vec![
            Segment {
                start: west,
                end: south,
            },
            Segment {
                start: east,
                end: north,
            },
        ],
        6 | 9 => vec![Segment {
            start: south,
            end: north,
        }],
        7 | 8 => vec![Segment {
            start: west,
            end: north,
        }],
        10 => vec![
            Segment {
                start: south,
                end: east,
            },
            Segment {
                start: west,
                end: north,
            },
        ],
        _ => vec![],
    }
}

/// Locate the level crossing on the edge between two corners.
fn interpolate_edge(a: Point, b: Point, value_a: f64, value_b: f64, level: f64) -> Point {
    if (value_b - value_a).abs() < 1e-12 {
        // Degenerate edge, take the midpoint
        return Point::new((a.lon + b.lon) / 2.0, (a.lat + b.lat) / 2.0);
    }

    let t = ((level - value_a) / (value_b - value_a)).clamp(0.0, 1.0);
    Point::new(a.lon + t * (b.lon - a.lon), a.lat + t * (b.lat - a.lat))
}

fn distance(a: Point, b: Point) -> f64 {
    ((a.lon - b.lon).powi(2) + (a.lat - b.lat).powi(2)).sqrt()
}

/// Chain unordered crossing segments into continuous polylines.
fn connect_segments(segments: Vec<Segment>) -> Vec<ContourPath> {
    if segments.is_empty() {
        return vec![];
    }

    let mut paths = Vec::new();
    let mut used = vec![false; segments.len()];

    for seed in 0..segments.len() {
        if used[seed] {
            continue;
        }

        let mut points = vec![segments[seed].start, segments[seed].end];
        used[seed] = true;

        let mut changed = true;
        while changed {
            changed = false;
            let current_end = points[points.len() - 1];

            for (i, segment) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }

                if distance(segment.start, current_end) < ENDPOINT_EPSILON {
                    points.push(segment.end);
                    used[i] = true;
                    changed = true;
                    break;
                } else if distance(segment.end, current_end) < ENDPOINT_EPSILON {
                    points.push(segment.start);
                    used[i] = true;
                    changed = true;
                    break;
                }
            }
        }

        let closed = distance(points[0], points[points.len() - 1]) < ENDPOINT_EPSILON;
        paths.push(ContourPath { points, closed });
    }

    paths
}
