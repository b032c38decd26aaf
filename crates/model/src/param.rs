//! Parameter blocks: a weight matrix paired with its gradient accumulator.

use rand::Rng;

/// A row-major `rows x cols` parameter matrix with an accumulated gradient of
/// the same shape. Vectors are `rows x 1`.
#[derive(Debug, Clone)]
pub struct Param {
    rows: usize,
    cols: usize,
    pub w: Vec<f64>,
    pub g: Vec<f64>,
}

impl Param {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            w: vec![0.0; rows * cols],
            g: vec![0.0; rows * cols],
        }
    }

    /// Uniform init in `[-limit, limit]` (Xavier/Glorot range chosen by the
    /// caller from fan-in/fan-out).
    pub fn uniform<R: Rng>(rows: usize, cols: usize, limit: f64, rng: &mut R) -> Self {
        let mut p = Self::zeros(rows, cols);
        for w in &mut p.w {
            *w = rng.gen_range(-limit..=limit);
        }
        p
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.w.len()
    }

    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }

    pub fn zero_grad(&mut self) {
        self.g.iter_mut().for_each(|g| *g = 0.0);
    }

    /// `out = W x` (length `rows`; `x` has length `cols`).
    pub fn matvec(&self, x: &[f64], out: &mut [f64]) {
        debug_assert_eq!(x.len(), self.cols);
        debug_assert_eq!(out.len(), self.rows);
        for r in 0..self.rows {
            let row = &self.w[r * self.cols..(r + 1) * self.cols];
            let mut acc = 0.0;
            for (w, xv) in row.iter().zip(x) {
                acc += w * xv;
            }
            out[r] = acc;
        }
    }

    /// `out += W^T d` (length `cols`; `d` has length `rows`).
    pub fn matvec_transpose_add(&self, d: &[f64], out: &mut [f64]) {
        debug_assert_eq!(d.len(), self.rows);
        debug_assert_eq!(out.len(), self.cols);
        for r in 0..self.rows {
            let row = &self.w[r * self.cols..(r + 1) * self.cols];
            let dv = d[r];
            for (o, w) in out.iter_mut().zip(row) {
                *o += dv * w;
            }
        }
    }

    /// Accumulate the outer product `d x^T` into the gradient.
    pub fn grad_add_outer(&mut self, d: &[f64], x: &[f64]) {
        debug_assert_eq!(d.len(), self.rows);
        debug_assert_eq!(x.len(), self.cols);
        for r in 0..self.rows {
            let grow = &mut self.g[r * self.cols..(r + 1) * self.cols];
            let dv = d[r];
            for (g, xv) in grow.iter_mut().zip(x) {
                *g += dv * xv;
            }
        }
    }

    /// Accumulate a vector gradient (for bias parameters, `cols == 1`).
    pub fn grad_add_vec(&mut self, d: &[f64]) {
        debug_assert_eq!(d.len(), self.g.len());
        for (g, dv) in self.g.iter_mut().zip(d) {
            *g += dv;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matvec_and_transpose_agree_on_a_known_matrix() {
        // W = [[1, 2], [3, 4], [5, 6]]
        let mut p = Param::zeros(3, 2);
        p.w.copy_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let mut out = [0.0; 3];
        p.matvec(&[1.0, 1.0], &mut out);
        assert_eq!(out, [3.0, 7.0, 11.0]);

        let mut back = [0.0; 2];
        p.matvec_transpose_add(&[1.0, 1.0, 1.0], &mut back);
        assert_eq!(back, [9.0, 12.0]);
    }

    #[test]
    fn outer_product_gradient_accumulates() {
        let mut p = Param::zeros(2, 2);
        p.grad_add_outer(&[1.0, 2.0], &[3.0, 4.0]);
        p.grad_add_outer(&[1.0, 2.0], &[3.0, 4.0]);
        assert_eq!(p.g, vec![6.0, 8.0, 12.0, 16.0]);
        p.zero_grad();
        assert!(p.g.iter().all(|&g| g == 0.0));
    }
}
