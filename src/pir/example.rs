//! The worked SimplePIR round-trip shown on the slides.
//!
//! Every value here is a literal chosen so that the arithmetic is small enough to follow by hand:
//! a `2 x 2` database, LWE modulus `q = 7` and plaintext modulus `p = 2`, so the selected column
//! is encoded as multiples of `floor(7 / 2) = 3`.

use crate::error::Result;
use crate::math::int_mod::IntMod;
use crate::math::matrix::Matrix;
use log::info;
use std::collections::BTreeMap;

/// LWE modulus of the worked example.
pub const EXAMPLE_Q: u64 = 7;
/// Plaintext modulus of the worked example.
pub const EXAMPLE_P: u64 = 2;
/// The database column the client asks for.
pub const SELECTED_COLUMN: usize = 1;

const DB: [[i64; 2]; 2] = [[1, 1], [1, 0]];
const A: [[i64; 2]; 2] = [[1, 2], [3, 4]];
const S: [i64; 2] = [2, 1];
const E: [i64; 2] = [1, -1];

/// Names of the matrices in the order they are introduced on the slides.
pub const ROLES: [&str; 8] = ["db", "a", "hint", "s", "e", "delta_u", "qu", "ans"];

type ZQ = IntMod<EXAMPLE_Q>;
type ZP = IntMod<EXAMPLE_P>;

/// All values of one fabricated query, from the server's database to the answer.
#[derive(Clone, Debug, PartialEq)]
pub struct ExampleScenario {
    /// Server database, entries mod `p`.
    pub db: Matrix<i64>,
    /// Public LWE matrix.
    pub a: Matrix<i64>,
    /// `db * a`, sent to the client ahead of time.
    pub hint: Matrix<i64>,
    /// Client secret.
    pub s: Matrix<i64>,
    /// LWE noise.
    pub e: Matrix<i64>,
    /// `floor(q / p)` times the unit vector of the selected column.
    pub delta_u: Matrix<i64>,
    /// Encrypted query `(a * s + e + delta_u) mod q`.
    pub qu: Matrix<i64>,
    /// Server answer `(db * qu) mod q`.
    pub ans: Matrix<i64>,
}

/// Builds the worked example. The literal inputs always have compatible shapes, so this only
/// fails if the constants above are edited into an inconsistent state.
pub fn build_example_scenario() -> Result<ExampleScenario> {
    let q = EXAMPLE_Q as i64;
    let db = Matrix::from_rows(&DB)?;
    let a = Matrix::from_rows(&A)?;
    let hint = db.try_mul(&a)?;

    let s = Matrix::from_column(&S);
    let e = Matrix::from_column(&E);
    let mut delta_u = Matrix::zero(db.cols(), 1);
    delta_u[(SELECTED_COLUMN, 0)] = (EXAMPLE_Q / EXAMPLE_P) as i64;

    let qu = a.try_mul(&s)?.try_add(&e)?.try_add(&delta_u)?.reduce_mod(q);
    let ans = db.try_mul(&qu)?.reduce_mod(q);

    info!("built example scenario: hint = {:?}, ans = {:?}", hint, ans);
    Ok(ExampleScenario {
        db,
        a,
        hint,
        s,
        e,
        delta_u,
        qu,
        ans,
    })
}

impl ExampleScenario {
    /// The bundle as a `{name: matrix}` mapping, keyed by the names in [`ROLES`].
    pub fn to_map(&self) -> BTreeMap<&'static str, Matrix<i64>> {
        ROLES
            .iter()
            .map(|&name| (name, self.get(name).clone()))
            .collect()
    }

    fn get(&self, role: &str) -> &Matrix<i64> {
        match role {
            "db" => &self.db,
            "a" => &self.a,
            "hint" => &self.hint,
            "s" => &self.s,
            "e" => &self.e,
            "delta_u" => &self.delta_u,
            "qu" => &self.qu,
            "ans" => &self.ans,
            _ => unreachable!("unknown role {role}"),
        }
    }

    /// The column selected by `delta_u`, i.e. the index of its only nonzero entry.
    pub fn selected_column(&self) -> Option<usize> {
        (0..self.delta_u.rows()).find(|&i| self.delta_u[(i, 0)] != 0)
    }

    /// `(ans - hint * s) mod q`, which equals `db * (e + delta_u)`: the selected column scaled by
    /// `floor(q / p)`, plus small noise.
    pub fn noisy_column(&self) -> Result<Matrix<i64>> {
        let ans: Matrix<ZQ> = self.ans.into_ring();
        let hint: Matrix<ZQ> = self.hint.into_ring();
        let s: Matrix<ZQ> = self.s.into_ring();
        let noisy = ans.try_sub(&hint.try_mul(&s)?)?;
        Ok(noisy.map_ring(|x| u64::from(*x) as i64))
    }

    /// The client's decryption: rounds [`ExampleScenario::noisy_column`] to the nearest multiple
    /// of `floor(q / p)`, recovering the selected database column.
    pub fn recover(&self) -> Result<Matrix<i64>> {
        let noisy = self.noisy_column()?;
        Ok(noisy.map_ring(|&x| {
            let rounded: ZP = ZQ::from(x).round_down_into();
            u64::from(rounded) as i64
        }))
    }
}
