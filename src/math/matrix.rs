//! Matrices over generic rings, with dimensions checked at runtime.

use crate::error::{Error, Result};
use crate::math::rand_sampled::*;
use crate::math::ring_elem::*;
use itertools::Itertools;
use log::debug;
use rand::Rng;
use std::cmp::max;
use std::fmt;
use std::ops::{Index, IndexMut, Neg};

/// Representation of a matrix as a flattened row-major order vector. The operations in ring type
/// `R` are those used in the relevant matrix operations.
///
/// Shapes are only known at runtime, since the slides mix `2 x 3`, `3 x 2` and `2 x 1` operands
/// built from literal nested rows. Operations whose operands may disagree in shape return
/// [`Error::DimensionMismatch`] instead of panicking.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<R: RingElement>
where
    for<'a> &'a R: RingElementRef<R>,
{
    rows: usize,
    cols: usize,
    data: Vec<R>,
}

/// One entry of a product `A * B`, computed as row `row` of `A` times column `col` of `B`.
#[derive(Clone, Debug, PartialEq)]
pub struct MulStep<R> {
    pub row: usize,
    pub col: usize,
    /// Position of the entry in the row-major listing of the product.
    pub entry: usize,
    /// The pairs `(A[row][t], B[t][col])` that are multiplied and summed.
    pub terms: Vec<(R, R)>,
    pub value: R,
}

/// Constructors.

impl<R: RingElement> Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
{
    /// Constructs the `rows x cols` zero matrix.
    pub fn zero(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![R::zero(); rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut out = Matrix::zero(n, n);
        for i in 0..n {
            out[(i, i)] = R::one();
        }
        out
    }

    /// Builds a matrix from nested rows. Every row must have the same length; an empty list of
    /// rows gives the `0 x 0` matrix.
    pub fn from_rows<Row: AsRef<[R]>>(rows: &[Row]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::RaggedRows {
                    row: i,
                    len: row.len(),
                    expected: cols,
                });
            }
            data.extend(row.iter().cloned());
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Builds an `n x 1` column vector.
    pub fn from_column(col: &[R]) -> Self {
        Matrix {
            rows: col.len(),
            cols: 1,
            data: col.to_vec(),
        }
    }
}

/// Shape and access.

impl<R: RingElement> Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
{
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The caption drawn under a matrix on the slides, e.g. `(2 x 3)`.
    pub fn dimension_label(&self) -> String {
        format!("({} x {})", self.rows, self.cols)
    }

    pub fn row(&self, i: usize) -> &[R] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn column(&self, j: usize) -> Vec<R> {
        (0..self.rows).map(|i| self[(i, j)].clone()).collect()
    }

    /// Iterates over the entries in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = &R> {
        self.data.iter()
    }

    /// Returns the entries as nested rows, the inverse of [`Matrix::from_rows`].
    pub fn into_rows(self) -> Vec<Vec<R>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data
            .chunks(self.cols)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    pub fn transpose(&self) -> Self {
        let mut out = Matrix::zero(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out[(c, r)] = self[(r, c)].clone();
            }
        }
        out
    }

    /// Applies `f` to every entry, possibly changing the ring.
    pub fn map_ring<S: RingElement, F: Fn(&R) -> S>(&self, f: F) -> Matrix<S>
    where
        for<'a> &'a S: RingElementRef<S>,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Converts a matrix over the ring `R` into a matrix over the ring `S`, given that `R` can be
    /// converted to `S`.
    pub fn into_ring<S: RingElement>(&self) -> Matrix<S>
    where
        for<'a> &'a S: RingElementRef<S>,
        for<'a> S: From<&'a R>,
    {
        self.map_ring(|r| S::from(r))
    }
}

/// Indexing

impl<R: RingElement> Index<(usize, usize)> for Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
{
    type Output = R;

    /// Returns the `(row, col)` element of the matrix.
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        assert!(index.0 < self.rows, "row index out of bounds");
        assert!(index.1 < self.cols, "column index out of bounds");
        &self.data[index.0 * self.cols + index.1]
    }
}

impl<R: RingElement> IndexMut<(usize, usize)> for Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
{
    /// Returns the `(row, col)` element of the matrix.
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        assert!(index.0 < self.rows, "row index out of bounds");
        assert!(index.1 < self.cols, "column index out of bounds");
        &mut self.data[index.0 * self.cols + index.1]
    }
}

/// Arithmetic operations

impl<R: RingElement> Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
{
    fn check_mul(&self, other: &Matrix<R>) -> Result<()> {
        if self.cols != other.rows {
            return Err(Error::DimensionMismatch {
                op: "mul",
                lhs: self.dimensions(),
                rhs: other.dimensions(),
            });
        }
        Ok(())
    }

    fn check_same_shape(&self, other: &Matrix<R>, op: &'static str) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::DimensionMismatch {
                op,
                lhs: self.dimensions(),
                rhs: other.dimensions(),
            });
        }
        Ok(())
    }

    /// Dense matrix product. For `self: m x k` and `other: k x n` the result is `m x n`; no
    /// reduction is applied beyond the arithmetic of `R` itself. For `i64` that means native
    /// arithmetic, which panics on overflow in debug builds and wraps in release builds; use
    /// [`Matrix::checked_mul`] when entries may be large.
    pub fn try_mul(&self, other: &Matrix<R>) -> Result<Matrix<R>> {
        self.check_mul(other)?;
        debug!(
            "multiplying {} by {}",
            self.dimension_label(),
            other.dimension_label()
        );
        let mut out = Matrix::zero(self.rows, other.cols);
        for r in 0..self.rows {
            for c in 0..other.cols {
                for i in 0..self.cols {
                    out[(r, c)] += &(&self[(r, i)] * &other[(i, c)]);
                }
            }
        }
        Ok(out)
    }

    /// The product `self * other` broken down entry by entry, in the order the matmul slide
    /// highlights them (row-major over the result).
    pub fn mul_steps(&self, other: &Matrix<R>) -> Result<Vec<MulStep<R>>> {
        self.check_mul(other)?;
        let steps = (0..self.rows)
            .cartesian_product(0..other.cols)
            .map(|(row, col)| {
                let terms = (0..self.cols)
                    .map(|t| (self[(row, t)].clone(), other[(t, col)].clone()))
                    .collect_vec();
                let mut value = R::zero();
                for (x, y) in terms.iter() {
                    value += &(x * y);
                }
                MulStep {
                    row,
                    col,
                    entry: row * other.cols + col,
                    terms,
                    value,
                }
            })
            .collect();
        Ok(steps)
    }

    pub fn try_add(&self, other: &Matrix<R>) -> Result<Matrix<R>> {
        self.check_same_shape(other, "add")?;
        let mut out = self.clone();
        for (x, y) in out.data.iter_mut().zip(other.data.iter()) {
            *x += y;
        }
        Ok(out)
    }

    pub fn try_sub(&self, other: &Matrix<R>) -> Result<Matrix<R>> {
        self.check_same_shape(other, "sub")?;
        let mut out = self.clone();
        for (x, y) in out.data.iter_mut().zip(other.data.iter()) {
            *x -= y;
        }
        Ok(out)
    }

    /// Multiplies each element of the matrix by `scalar`.
    pub fn scale(&self, scalar: &R) -> Matrix<R> {
        self.map_ring(|x| x * scalar)
    }
}

impl<R: RingElement> Neg for &Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
{
    type Output = Matrix<R>;
    fn neg(self) -> Self::Output {
        self.map_ring(|x| -x)
    }
}

/// Integer matrices

impl Matrix<i64> {
    /// Reduces every entry into `[0, q)`.
    pub fn reduce_mod(&self, q: i64) -> Matrix<i64> {
        assert!(q > 0, "modulus must be positive");
        self.map_ring(|x| x.rem_euclid(q))
    }

    /// Exact integer product. Fails with [`Error::Overflow`] at the first entry whose sum of
    /// products does not fit in an `i64`.
    pub fn checked_mul(&self, other: &Matrix<i64>) -> Result<Matrix<i64>> {
        self.check_mul(other)?;
        let mut out = Matrix::zero(self.rows, other.cols);
        for r in 0..self.rows {
            for c in 0..other.cols {
                let overflow = Error::Overflow { op: "mul", row: r, col: c };
                out[(r, c)] = (0..self.cols).try_fold(0_i64, |acc, i| {
                    self[(r, i)]
                        .checked_mul(other[(i, c)])
                        .and_then(|x| acc.checked_add(x))
                        .ok_or_else(|| overflow.clone())
                })?;
            }
        }
        Ok(out)
    }
}

/// Norm
impl<R: RingElement> Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
    R: NormedRingElement,
{
    pub fn norm(&self) -> u64 {
        self.data.iter().fold(0, |worst, x| max(worst, x.norm()))
    }
}

/// Random sampling implementations inherited from the base ring.

impl<R: RingElement> Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
    R: RandUniformSampled,
{
    pub fn rand_uniform<T: Rng>(rows: usize, cols: usize, rng: &mut T) -> Self {
        Matrix {
            rows,
            cols,
            data: (0..rows * cols).map(|_| R::rand_uniform(rng)).collect(),
        }
    }
}

impl<R: RingElement> Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
    R: RandDiscreteGaussianSampled,
{
    pub fn rand_discrete_gaussian<T: Rng, const NOISE_WIDTH_MILLIONTHS: u64>(
        rows: usize,
        cols: usize,
        rng: &mut T,
    ) -> Self {
        Matrix {
            rows,
            cols,
            data: (0..rows * cols)
                .map(|_| R::rand_discrete_gaussian::<_, NOISE_WIDTH_MILLIONTHS>(rng))
                .collect(),
        }
    }
}

/// Formatting

impl<R: RingElement + fmt::Display> fmt::Display for Matrix<R>
where
    for<'a> &'a R: RingElementRef<R>,
{
    /// Writes one bracketed row per line, e.g. `[4, 6]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            if r > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}]", self.row(r).iter().join(", "))?;
        }
        Ok(())
    }
}

/// Multiplies two matrices given as nested rows and returns the product as nested rows.
///
/// Fails with [`Error::RaggedRows`] if either input is not rectangular and with
/// [`Error::DimensionMismatch`] if the column count of `a` differs from the row count of `b`.
/// Entries are combined with the arithmetic of `R`, so `i64` inputs must keep every sum of
/// products within range (see [`Matrix::checked_mul`]).
pub fn multiply<R: RingElement>(a: &[Vec<R>], b: &[Vec<R>]) -> Result<Vec<Vec<R>>>
where
    for<'a> &'a R: RingElementRef<R>,
{
    let a = Matrix::from_rows(a)?;
    let b = Matrix::from_rows(b)?;
    Ok(a.try_mul(&b)?.into_rows())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::int_mod::IntMod;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn mat(rows: &[&[i64]]) -> Matrix<i64> {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn zero_and_identity_are_correct() {
        let zero: Matrix<i64> = Matrix::zero(2, 3);
        assert_eq!(zero.dimensions(), (2, 3));
        assert!(zero.entries().all(|&x| x == 0));

        let id: Matrix<i64> = Matrix::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(id[(i, j)], if i == j { 1 } else { 0 });
            }
        }
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let ragged: Vec<Vec<i64>> = vec![vec![1, 2], vec![3]];
        assert_eq!(
            Matrix::from_rows(&ragged),
            Err(Error::RaggedRows {
                row: 1,
                len: 1,
                expected: 2
            })
        );

        let empty: Vec<Vec<i64>> = vec![];
        assert_eq!(Matrix::from_rows(&empty).unwrap().dimensions(), (0, 0));
    }

    #[test]
    fn multiplication_is_correct() {
        let product = multiply(
            &[vec![1_i64, 2, 3], vec![4, 5, 6]],
            &[vec![1, 0], vec![0, 1], vec![1, 0]],
        )
        .unwrap();
        assert_eq!(product, vec![vec![4, 2], vec![10, 5]]);

        let hint = multiply(&[vec![1_i64, 1], vec![1, 0]], &[vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(hint, vec![vec![4, 6], vec![1, 2]]);

        let m = mat(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(m.try_mul(&Matrix::identity(3)).unwrap(), m);
    }

    #[test]
    fn multiplication_of_empty_operands() {
        let empty: Vec<Vec<i64>> = vec![];
        assert_eq!(multiply(&empty, &empty).unwrap(), empty);

        let two_by_zero: Vec<Vec<i64>> = vec![vec![], vec![]];
        assert_eq!(
            multiply(&two_by_zero, &empty).unwrap(),
            vec![Vec::<i64>::new(), Vec::new()]
        );

        assert_eq!(
            multiply(&empty, &[vec![1_i64, 2]]),
            Err(Error::DimensionMismatch {
                op: "mul",
                lhs: (0, 0),
                rhs: (1, 2)
            })
        );
    }

    #[test]
    fn checked_multiplication_reports_overflow() {
        let big = mat(&[&[i64::MAX, 0], &[1, 1]]);
        let two = mat(&[&[2], &[0]]);
        assert_eq!(
            big.checked_mul(&two),
            Err(Error::Overflow {
                op: "mul",
                row: 0,
                col: 0
            })
        );

        let a = mat(&[&[1, 2, 3], &[4, 5, 6]]);
        let b = mat(&[&[1, 0], &[0, 1], &[1, 0]]);
        assert_eq!(a.checked_mul(&b).unwrap(), a.try_mul(&b).unwrap());
        assert!(a.checked_mul(&a).is_err());
    }

    #[test]
    fn multiplication_of_floats() {
        let product = multiply(&[vec![0.5_f64, 1.5]], &[vec![2.0], vec![4.0]]).unwrap();
        assert_eq!(product, vec![vec![7.0]]);
    }

    #[test]
    fn multiplication_rejects_mismatched_dimensions() {
        let a = mat(&[&[1, 2, 3], &[4, 5, 6]]);
        let b = mat(&[&[1, 2], &[3, 4]]);
        assert_eq!(
            a.try_mul(&b),
            Err(Error::DimensionMismatch {
                op: "mul",
                lhs: (2, 3),
                rhs: (2, 2)
            })
        );
        assert!(a.mul_steps(&b).is_err());
        assert!(multiply(&[vec![1_i64, 2]], &[vec![1_i64, 2]]).is_err());
    }

    #[test]
    fn product_shape_and_associativity() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        for (m, k, l, n) in [(1, 1, 1, 1), (2, 3, 4, 1), (3, 2, 2, 3), (4, 1, 5, 2)] {
            let a: Matrix<IntMod<3329>> = Matrix::rand_uniform(m, k, &mut rng);
            let b: Matrix<IntMod<3329>> = Matrix::rand_uniform(k, l, &mut rng);
            let c: Matrix<IntMod<3329>> = Matrix::rand_uniform(l, n, &mut rng);

            let ab = a.try_mul(&b).unwrap();
            assert_eq!(ab.dimensions(), (m, l));

            let left = ab.try_mul(&c).unwrap();
            let right = a.try_mul(&b.try_mul(&c).unwrap()).unwrap();
            assert_eq!(left, right);

            let a_int = a.map_ring(|x| i64::from(*x));
            let b_int = b.map_ring(|x| i64::from(*x));
            let c_int = c.map_ring(|x| i64::from(*x));
            let left = a_int.try_mul(&b_int).unwrap().try_mul(&c_int).unwrap();
            let right = a_int.try_mul(&b_int.try_mul(&c_int).unwrap()).unwrap();
            assert_eq!(left, right);
        }
    }

    #[test]
    fn mul_steps_match_product() {
        let a = mat(&[&[1, 2, 3], &[4, 5, 6]]);
        let b = mat(&[&[1, 0], &[0, 1], &[1, 0]]);
        let steps = a.mul_steps(&b).unwrap();
        let product = a.try_mul(&b).unwrap();

        assert_eq!(steps.len(), 4);
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.entry, i);
            assert_eq!(step.value, product[(step.row, step.col)]);
            assert_eq!(step.terms.len(), 3);
        }
        assert_eq!(steps[2].terms, vec![(4, 1), (5, 0), (6, 1)]);
        assert_eq!(steps[2].value, 10);
    }

    #[test]
    fn elementwise_operations() {
        let a = mat(&[&[1, 2], &[3, 4]]);
        let b = mat(&[&[5, 6], &[7, 8]]);
        assert_eq!(a.try_add(&b).unwrap(), mat(&[&[6, 8], &[10, 12]]));
        assert_eq!(b.try_sub(&a).unwrap(), mat(&[&[4, 4], &[4, 4]]));
        assert_eq!(a.scale(&3), mat(&[&[3, 6], &[9, 12]]));
        assert_eq!(a.try_add(&-&a).unwrap(), Matrix::zero(2, 2));
        assert_eq!(
            a.try_add(&Matrix::zero(2, 1)),
            Err(Error::DimensionMismatch {
                op: "add",
                lhs: (2, 2),
                rhs: (2, 1)
            })
        );
    }

    #[test]
    fn reduce_mod_and_ring_conversion() {
        let a = mat(&[&[13, -1], &[7, 20]]);
        assert_eq!(a.reduce_mod(7), mat(&[&[6, 6], &[0, 6]]));

        let a_mod: Matrix<IntMod<7>> = a.into_ring();
        assert_eq!(a_mod.map_ring(|x| u64::from(*x) as i64), a.reduce_mod(7));
        assert_eq!(a.norm(), 20);
    }

    #[test]
    fn shape_helpers() {
        let a = mat(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(a.dimension_label(), "(2 x 3)");
        assert_eq!(a.row(1), &[4, 5, 6]);
        assert_eq!(a.column(2), vec![3, 6]);
        assert_eq!(a.transpose(), mat(&[&[1, 4], &[2, 5], &[3, 6]]));
        assert_eq!(Matrix::from_column(&[1_i64, 2]).dimensions(), (2, 1));
        assert_eq!(a.clone().into_rows(), vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(a.to_string(), "[1, 2, 3]\n[4, 5, 6]");
    }
}
