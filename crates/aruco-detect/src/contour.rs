//! Quadrilateral candidate extraction from a binary mask.

use aruco_detect_core::GrayImageView;
use nalgebra::Point2;

/// A candidate quadrilateral, counter-clockwise, starting from the corner
/// nearest the component's topmost-leftmost boundary pixel.
pub(crate) type Quad = [Point2<f32>; 4];

/// Output of the contour stage, with the trace count for diagnostics.
pub(crate) struct ContourScan {
    pub contours: usize,
    pub quads: Vec<Quad>,
}

/// Components smaller than this are noise and not worth tracing.
const MIN_REGION_PIXELS: usize = 16;

/// Moore neighborhood, clockwise from north.
const DX: [i32; 8] = [0, 1, 1, 1, 0, -1, -1, -1];
const DY: [i32; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];

/// Find convex quadrilateral candidates in a binary mask.
///
/// Connected regions of both mask polarities are enumerated: markers carry a
/// dark border on a brighter surround, so the marker outline is the outer
/// boundary of a dark region, while bright shapes contribute their own
/// outlines. Each region's outer boundary is traced, simplified with
/// Douglas-Peucker at a tolerance of `accuracy_rate` times the closed
/// perimeter, and kept only when exactly four convex vertices remain.
pub(crate) fn find_quad_candidates(mask: &GrayImageView<'_>, accuracy_rate: f32) -> ContourScan {
    let (w, h) = (mask.width, mask.height);
    let mut visited = vec![false; w * h];
    let mut scan = ContourScan {
        contours: 0,
        quads: Vec::new(),
    };
    let mut stack: Vec<(i32, i32)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if visited[idx] {
                continue;
            }

            // Flood-fill the component; the seed is its topmost-leftmost
            // pixel because of the scan order.
            let bright = mask.data[idx] > 0;
            let pixels = flood_fill(mask, &mut visited, &mut stack, x, y, bright);
            if pixels < MIN_REGION_PIXELS {
                continue;
            }

            let boundary = trace_boundary(mask, x, y, bright);
            if boundary.len() < 4 {
                continue;
            }
            scan.contours += 1;

            let perimeter = closed_perimeter(&boundary);
            let epsilon = accuracy_rate * perimeter;
            let simplified = simplify_closed(&boundary, epsilon);
            if simplified.len() != 4 {
                continue;
            }

            let mut quad: Quad = [simplified[0], simplified[1], simplified[2], simplified[3]];
            if !is_convex(&quad) || polygon_area(&quad) < 1.0 {
                continue;
            }
            orient_ccw(&mut quad);
            scan.quads.push(quad);
        }
    }

    scan
}

/// Mark a connected component visited and return its pixel count.
fn flood_fill(
    mask: &GrayImageView<'_>,
    visited: &mut [bool],
    stack: &mut Vec<(i32, i32)>,
    seed_x: usize,
    seed_y: usize,
    bright: bool,
) -> usize {
    let w = mask.width;
    let mut count = 0usize;
    visited[seed_y * w + seed_x] = true;
    stack.push((seed_x as i32, seed_y as i32));

    while let Some((x, y)) = stack.pop() {
        count += 1;
        for dir in 0..8 {
            let nx = x + DX[dir];
            let ny = y + DY[dir];
            if nx < 0 || ny < 0 || nx >= mask.width as i32 || ny >= mask.height as i32 {
                continue;
            }
            let nidx = ny as usize * w + nx as usize;
            if visited[nidx] || (mask.data[nidx] > 0) != bright {
                continue;
            }
            visited[nidx] = true;
            stack.push((nx, ny));
        }
    }
    count
}

/// Moore-neighbour border following around a component's outer boundary,
/// starting at its topmost-leftmost pixel. The walk is clockwise in image
/// coordinates and stops when it returns to the start pixel.
fn trace_boundary(
    mask: &GrayImageView<'_>,
    start_x: usize,
    start_y: usize,
    bright: bool,
) -> Vec<Point2<f32>> {
    let mut points = Vec::new();
    let mut curr_x = start_x as i32;
    let mut curr_y = start_y as i32;
    let mut walk_dir = 2usize; // the start pixel has nothing above it, head east

    let max_steps = 4 * mask.data.len().max(16);
    for _ in 0..max_steps {
        points.push(Point2::new(curr_x as f32, curr_y as f32));

        let mut found = false;
        // Search clockwise starting from the "outside" of the last move.
        for i in 0..8 {
            let dir = (walk_dir + 6 + i) % 8;
            let nx = curr_x + DX[dir];
            let ny = curr_y + DY[dir];
            if nx < 0 || ny < 0 || nx >= mask.width as i32 || ny >= mask.height as i32 {
                continue;
            }
            if (mask.data[ny as usize * mask.width + nx as usize] > 0) == bright {
                curr_x = nx;
                curr_y = ny;
                walk_dir = dir;
                found = true;
                break;
            }
        }

        if !found || (curr_x == start_x as i32 && curr_y == start_y as i32) {
            break;
        }
    }

    points
}

fn closed_perimeter(points: &[Point2<f32>]) -> f32 {
    let n = points.len();
    let mut len = 0f32;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        len += (a - b).norm();
    }
    len
}

/// Douglas-Peucker on a closed contour: anchor at index 0 and the point
/// farthest from it, simplify the two open chains, and merge.
fn simplify_closed(points: &[Point2<f32>], epsilon: f32) -> Vec<Point2<f32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut far = 0usize;
    let mut far_d = 0f32;
    for (i, p) in points.iter().enumerate() {
        let d = (p - points[0]).norm_squared();
        if d > far_d {
            far_d = d;
            far = i;
        }
    }
    if far == 0 {
        return vec![points[0]];
    }

    let first: Vec<Point2<f32>> = points[0..=far].to_vec();
    let mut second: Vec<Point2<f32>> = points[far..].to_vec();
    second.push(points[0]);

    let a = simplify_open(&first, epsilon);
    let b = simplify_open(&second, epsilon);

    // Both chains keep their endpoints; drop the seam duplicates.
    let mut merged = a;
    merged.extend_from_slice(&b[1..b.len() - 1]);
    merged
}

/// Iterative Douglas-Peucker for an open polyline; endpoints always survive.
fn simplify_open(points: &[Point2<f32>], epsilon: f32) -> Vec<Point2<f32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end - start < 2 {
            continue;
        }

        let mut dmax = 0f32;
        let mut index = start;
        for i in start + 1..end {
            let d = perpendicular_distance(points[i], points[start], points[end]);
            if d > dmax {
                dmax = d;
                index = i;
            }
        }

        if dmax > epsilon {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    points
        .iter()
        .zip(keep.iter())
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect()
}

fn perpendicular_distance(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mag = (dx * dx + dy * dy).sqrt();
    if mag < 1e-9 {
        return (p - a).norm();
    }
    (dy * p.x - dx * p.y + b.x * a.y - b.y * a.x).abs() / mag
}

/// Strict convexity: every consecutive edge pair turns the same way.
fn is_convex(quad: &Quad) -> bool {
    let mut sign = 0f32;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let c = quad[(i + 2) % 4];
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if cross == 0.0 {
            return false;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

fn polygon_area(quad: &Quad) -> f32 {
    let mut area = 0f32;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        area += a.x * b.y - b.x * a.y;
    }
    area.abs() * 0.5
}

/// Normalize winding while keeping corner 0 fixed: if the first three
/// vertices wind clockwise, swap the 2nd and 4th.
fn orient_ccw(quad: &mut Quad) {
    let v1 = quad[1] - quad[0];
    let v2 = quad[2] - quad[0];
    if v1.x * v2.y - v1.y * v2.x < 0.0 {
        quad.swap(1, 3);
    }
}
