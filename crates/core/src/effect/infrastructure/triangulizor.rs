use image::{imageops, Rgb, RgbImage};

use crate::effect::domain::image_filter::ImageFilter;
use crate::effect::infrastructure::tile_size::effective_tile_size;

type Color = [f64; 3];

/// Rebuilds an image as a mesh of flat triangles, two per square tile.
///
/// Each tile is cut into four triangles by its diagonals. The pair of
/// neighboring triangles with the closest average colors decides which
/// diagonal splits the tile, and each half is filled with the mean of its
/// two triangles. The output is trimmed to a whole number of tiles.
#[derive(Clone, Copy, Debug, Default)]
pub struct Triangulizor;

impl Triangulizor {
    pub fn new() -> Self {
        Self
    }
}

impl ImageFilter for Triangulizor {
    fn filter(
        &self,
        image: &RgbImage,
        tile_size: u32,
    ) -> Result<RgbImage, Box<dyn std::error::Error>> {
        let (width, height) = image.dimensions();
        let tile = effective_tile_size(tile_size, width, height);
        let trimmed_w = width / tile * tile;
        let trimmed_h = height / tile * tile;
        log::debug!("Triangulizing {width}x{height} with tile size {tile}");

        let mut out = imageops::crop_imm(image, 0, 0, trimmed_w, trimmed_h).to_image();
        if tile < 2 {
            return Ok(out);
        }
        for ty in (0..trimmed_h).step_by(tile as usize) {
            for tx in (0..trimmed_w).step_by(tile as usize) {
                process_tile(&mut out, tx, ty, tile);
            }
        }
        Ok(out)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Quarter {
    North,
    East,
    South,
    West,
}

/// Diagonal a tile is cut along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Split {
    /// Top-left to bottom-right.
    Right,
    /// Bottom-left to top-right.
    Left,
}

fn quarter_of(px: u32, py: u32, tile: u32) -> Quarter {
    // Doubled offsets from the tile center keep this in integers
    let dx = 2 * px as i64 - (tile as i64 - 1);
    let dy = 2 * py as i64 - (tile as i64 - 1);
    if dy.abs() >= dx.abs() {
        if dy < 0 {
            Quarter::North
        } else {
            Quarter::South
        }
    } else if dx < 0 {
        Quarter::West
    } else {
        Quarter::East
    }
}

fn process_tile(img: &mut RgbImage, tx: u32, ty: u32, tile: u32) {
    let mut sums = [[0f64; 3]; 4];
    let mut counts = [0u32; 4];
    for py in 0..tile {
        for px in 0..tile {
            let q = quarter_of(px, py, tile) as usize;
            let p = img.get_pixel(tx + px, ty + py).0;
            for c in 0..3 {
                sums[q][c] += p[c] as f64;
            }
            counts[q] += 1;
        }
    }

    let tile_mean = mean_of(
        sums.iter().fold([0.0; 3], |acc, s| add(acc, *s)),
        counts.iter().sum(),
    );
    let avg = |q: Quarter| {
        let i = q as usize;
        if counts[i] == 0 {
            tile_mean
        } else {
            mean_of(sums[i], counts[i])
        }
    };
    let (n, e, s, w) = (
        avg(Quarter::North),
        avg(Quarter::East),
        avg(Quarter::South),
        avg(Quarter::West),
    );

    let (split, top, bottom) = match closest_pair(n, e, s, w) {
        Split::Right => (Split::Right, midpoint(n, e), midpoint(s, w)),
        Split::Left => (Split::Left, midpoint(n, w), midpoint(s, e)),
    };
    let top = to_rgb(top);
    let bottom = to_rgb(bottom);

    for py in 0..tile {
        for px in 0..tile {
            let in_top = match split {
                Split::Right => px >= py,
                Split::Left => px + py < tile,
            };
            img.put_pixel(tx + px, ty + py, if in_top { top } else { bottom });
        }
    }
}

/// The first of (N,E), (N,W), (S,E), (S,W) with the smallest distance wins.
fn closest_pair(n: Color, e: Color, s: Color, w: Color) -> Split {
    let candidates = [
        (distance(n, e), Split::Right),
        (distance(n, w), Split::Left),
        (distance(s, e), Split::Left),
        (distance(s, w), Split::Right),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.0 < best.0 {
            best = *c;
        }
    }
    best.1
}

fn distance(a: Color, b: Color) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

fn add(a: Color, b: Color) -> Color {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn mean_of(sum: Color, count: u32) -> Color {
    let n = count.max(1) as f64;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

fn midpoint(a: Color, b: Color) -> Color {
    mean_of(add(a, b), 2)
}

fn to_rgb(c: Color) -> Rgb<u8> {
    Rgb(c.map(|v| v.round().clamp(0.0, 255.0) as u8))
}
