// Toroidal plane: wrap transform and phantom offsets for seamless edge rendering.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToroidalSpace {
    pub width: f32,
    pub height: f32,
}

impl ToroidalSpace {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Maps a coordinate pair back onto the plane, `[0, width) x [0, height)`.
    ///
    /// A position counts as crossed once the craft's centre leaves `[0, size)`. Just past an
    /// edge this is a translation by one width/height; farther out (pointer warps, runaway
    /// velocity) it folds by as many tiles as needed. The result is canonical, so wrapping it
    /// again changes nothing.
    pub fn wrap(&self, x: f32, y: f32) -> (f32, f32) {
        (wrap_axis(x, self.width), wrap_axis(y, self.height))
    }

    /// Offsets of the 8 neighbouring tiles, in column-major order starting top-left.
    pub fn phantom_offsets(&self) -> [(f32, f32); 8] {
        let (w, h) = (self.width, self.height);
        [
            (-w, -h),
            (-w, 0.0),
            (-w, h),
            (0.0, -h),
            (0.0, h),
            (w, -h),
            (w, 0.0),
            (w, h),
        ]
    }
}

fn wrap_axis(value: f32, size: f32) -> f32 {
    let wrapped = value.rem_euclid(size);
    // A tiny negative value rounds up to exactly `size` in f32.
    if wrapped >= size { 0.0 } else { wrapped }
}
