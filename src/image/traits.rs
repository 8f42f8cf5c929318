//! Row-oriented views over strided single-channel buffers.
//!
//! Implementors expose their backing buffer; row access, row iteration and
//! the contiguous-slice fast path are derived from `width`/`stride`.

pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    /// Backing buffer holding at least `stride * (height - 1) + width` pixels.
    fn buffer(&self) -> &[Self::Pixel];

    fn row(&self, y: usize) -> &[Self::Pixel] {
        let start = y * self.stride();
        &self.buffer()[start..start + self.width()]
    }

    fn rows(&self) -> Rows<'_, Self::Pixel> {
        Rows {
            rest: self.buffer(),
            width: self.width(),
            stride: self.stride(),
            remaining: self.height(),
        }
    }

    fn is_contiguous(&self) -> bool {
        self.stride() == self.width()
    }

    fn as_slice(&self) -> Option<&[Self::Pixel]> {
        let len = self.width() * self.height();
        self.is_contiguous().then(|| &self.buffer()[..len])
    }
}

pub trait ImageViewMut: ImageView {
    fn buffer_mut(&mut self) -> &mut [Self::Pixel];

    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel] {
        let start = y * self.stride();
        let end = start + self.width();
        &mut self.buffer_mut()[start..end]
    }

    fn rows_mut(&mut self) -> RowsMut<'_, Self::Pixel> {
        let (width, stride, remaining) = (self.width(), self.stride(), self.height());
        RowsMut {
            rest: self.buffer_mut(),
            width,
            stride,
            remaining,
        }
    }

    fn as_mut_slice(&mut self) -> Option<&mut [Self::Pixel]> {
        let len = self.width() * self.height();
        if self.is_contiguous() {
            Some(&mut self.buffer_mut()[..len])
        } else {
            None
        }
    }
}

pub struct Rows<'a, P> {
    rest: &'a [P],
    width: usize,
    stride: usize,
    remaining: usize,
}

impl<'a, P> Iterator for Rows<'a, P> {
    type Item = &'a [P];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let (row, tail) = self.rest.split_at(self.stride.min(self.rest.len()));
        self.rest = tail;
        Some(&row[..self.width])
    }
}

pub struct RowsMut<'a, P> {
    rest: &'a mut [P],
    width: usize,
    stride: usize,
    remaining: usize,
}

impl<'a, P> Iterator for RowsMut<'a, P> {
    type Item = &'a mut [P];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        // Rows are split off the front, so each is handed out exactly once.
        let rest = std::mem::take(&mut self.rest);
        let (row, tail) = rest.split_at_mut(self.stride.min(rest.len()));
        self.rest = tail;
        Some(&mut row[..self.width])
    }
}
