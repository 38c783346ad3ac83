use crate::Coord;
use crate::screen::Bitmap;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// Renders a window of the live bitmap as braille characters, 2x4 pixels per character.
///
/// Pixels are read through [`Bitmap::get`], so the camera never has to know about the screen's
/// interleaved layout.
pub struct Camera {
    /// The cell buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the cell buffer
    w: usize,

    /// Height of the cell buffer
    h: usize,

    /// Screen `x` of the left edge
    x: Coord,

    /// Screen `y` of the top edge
    y: Coord,
}

impl Camera {
    pub fn new(w: usize, h: usize) -> Self {
        let cb = vec![false; w * h];

        // For each braille character, we need 3 bytes, and for each newline one byte. With
        // `bw = ceil(w / 2)` and `bh = ceil(h / 4)` characters, that's `3 * (bw * bh) + bh`.
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));
        let cp = vec![BRAILLE_EMPTY; bw * bh];
        let fb = String::with_capacity(3 * (bw * bh) + bh);

        Self {
            cb,
            fb,
            cp,
            w,
            h,
            x: 0,
            y: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Moves the top left corner of the camera to screen coordinates `(x, y)`.
    pub fn look_at(&mut self, x: Coord, y: Coord) {
        self.x = x;
        self.y = y;
    }

    /// Copies the camera's window of `bitmap` into the cell buffer. Parts of the window hanging
    /// off the bitmap come out blank.
    pub fn capture(&mut self, bitmap: &Bitmap) {
        for n in 0..self.cb.len() {
            let (dx, dy) = self.xy_to(n);

            let x = usize::from(self.x) + dx;
            let y = usize::from(self.y) + dy;

            self.cb[n] = match (Coord::try_from(x), Coord::try_from(y)) {
                (Ok(x), Ok(y)) => bitmap.get(x, y),
                _ => false,
            };
        }
    }

    /// Builds the frame for the last capture. Every row of characters ends with a newline.
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            if !px {
                continue;
            }

            let (x, y) = (n % self.w, n / self.w);
            self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
        }

        // update framebuffer
        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }
        self.fb.push('\n');

        &self.fb
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.w, n / self.w)
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}
