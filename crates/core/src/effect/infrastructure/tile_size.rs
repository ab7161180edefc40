/// Resolves the tile size the triangulizor will actually use.
///
/// `0` picks one from the image size. Explicit sizes are rounded down to
/// an even value, with 2 as the floor.
pub fn effective_tile_size(requested: u32, width: u32, height: u32) -> u32 {
    match requested {
        0 => auto_tile_size(width, height),
        1 => 2,
        n => n / 2 * 2,
    }
}

/// Picks a tile size near 5% of the larger side that divides the width or
/// the height, preferring even sizes.
pub fn auto_tile_size(width: u32, height: u32) -> u32 {
    let largest = width.max(height);
    if largest <= 1 {
        return 1;
    }
    let divides = |t: u32| width % t == 0 || height % t == 0;
    let target = (largest / 20 / 2 * 2).max(2);

    (2..=target)
        .rev()
        .filter(|t| t % 2 == 0)
        .find(|&t| divides(t))
        .or_else(|| (2..=target).rev().find(|&t| divides(t)))
        .or_else(|| (target + 1..=largest).find(|&t| divides(t)))
        .unwrap_or(1)
}
