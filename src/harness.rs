//! Command line driver that prints the numbers behind each slide.

use crate::error::Result;
use crate::math::int_mod::IntMod;
use crate::math::matrix::Matrix;
use crate::math::ring_elem::{RingElement, RingElementRef};
use crate::pir::example::{build_example_scenario, EXAMPLE_P, EXAMPLE_Q, ROLES};
use crate::pir::lwe::LweInstance;
use crate::pir::regev::{DemoRegev, DEMO_REGEV_PARAMS};
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::fmt;

/// Operands of the matrix multiplication slide.
pub const MATMUL_LHS: [[i64; 3]; 2] = [[1, 2, 3], [4, 5, 6]];
pub const MATMUL_RHS: [[i64; 2]; 3] = [[1, 0], [0, 1], [1, 0]];

const LWE_Q: u64 = DEMO_REGEV_PARAMS.Q;
const LWE_WIDTH_MILLIONTHS: u64 = DEMO_REGEV_PARAMS.NOISE_WIDTH_MILLIONTHS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Matmul,
    Scenario,
    Lwe,
    Regev,
    All,
}

#[derive(Parser, Debug)]
#[command(about = "Print the worked examples behind the PIR slides")]
pub struct Args {
    /// Seed for the randomized sections; drawn from entropy when absent.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Section::All)]
    pub section: Section,
}

fn matrix_block<R>(name: &str, m: &Matrix<R>) -> String
where
    R: RingElement + fmt::Display,
    for<'a> &'a R: RingElementRef<R>,
{
    format!("{} {}:\n{}\n", name, m.dimension_label(), m)
}

/// The product `MATMUL_LHS * MATMUL_RHS`, one highlighted row/column pair at a time.
pub fn render_matmul() -> Result<String> {
    let lhs = Matrix::from_rows(&MATMUL_LHS)?;
    let rhs = Matrix::from_rows(&MATMUL_RHS)?;
    let product = lhs.try_mul(&rhs)?;

    let mut out = String::from("== Matrix multiplication ==\n");
    out += &matrix_block("A", &lhs);
    out += &matrix_block("B", &rhs);
    for step in lhs.mul_steps(&rhs)? {
        out += &format!(
            "row {} x col {}: {} = {} (entry {})\n",
            step.row,
            step.col,
            step.terms
                .iter()
                .map(|(x, y)| format!("{}*{}", x, y))
                .join(" + "),
            step.value,
            step.entry
        );
    }
    out += &matrix_block("A x B", &product);
    Ok(out)
}

/// Every matrix of the worked SimplePIR example, followed by the client's recovery.
pub fn render_scenario() -> Result<String> {
    let scenario = build_example_scenario()?;
    let map = scenario.to_map();

    let mut out = format!(
        "== Worked SimplePIR example (q = {}, p = {}) ==\n",
        EXAMPLE_Q, EXAMPLE_P
    );
    for role in ROLES {
        out += &matrix_block(role, &map[role]);
    }
    if let Some(col) = scenario.selected_column() {
        out += &format!("selected column: {}\n", col);
    }
    out += &matrix_block("recovered", &scenario.recover()?);
    Ok(out)
}

/// A `3 x 3` LWE instance, with and without noise.
pub fn render_lwe<T: Rng>(rng: &mut T) -> Result<String> {
    let lwe = LweInstance::<LWE_Q>::sample::<_, LWE_WIDTH_MILLIONTHS>(3, 3, rng)?;

    let mut out = format!("== Learning with errors (q = {}) ==\n", LWE_Q);
    out += &matrix_block("A", &lwe.a);
    out += &matrix_block("s", &lwe.s);
    out += &matrix_block("A x s", &lwe.without_noise()?);
    out += &matrix_block("e", &lwe.noise());
    out += &matrix_block("b = A x s + e", &lwe.b);
    Ok(out)
}

/// Encrypts every plaintext mod `P`, decrypts it again and adds two ciphertexts together.
pub fn render_regev<T: Rng>(rng: &mut T) -> Result<String> {
    let params = DEMO_REGEV_PARAMS;
    let s = DemoRegev::keygen(rng);

    let mut lines = Vec::new();
    let mut cts = Vec::new();
    for mu in 0..params.P {
        let mu = IntMod::from(mu);
        let ct = DemoRegev::encrypt(&s, mu, rng)?;
        let decrypted = DemoRegev::decrypt(&s, &ct)?;
        let noise = DemoRegev::noise(&s, &ct, mu)?;
        lines.push(format!(
            "mu = {}: c = {}, noise = {}, decrypts to {}",
            mu, ct.c, noise, decrypted
        ));
        cts.push((mu, ct));
    }
    if let [(mu0, ct0), (mu1, ct1), ..] = cts.as_slice() {
        let sum = ct0.try_add(ct1)?;
        lines.push(format!(
            "enc({}) + enc({}) decrypts to {}",
            mu0,
            mu1,
            DemoRegev::decrypt(&s, &sum)?
        ));
    }

    Ok(format!(
        "== Regev encryption (n = {}, q = {}, p = {}) ==\n{}\n",
        params.N,
        params.Q,
        params.P,
        lines.join("\n")
    ))
}

pub fn run(args: &Args) -> Result<String> {
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("running section {:?} with seed {}", args.section, seed);
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let sections = match args.section {
        Section::All => vec![
            Section::Matmul,
            Section::Scenario,
            Section::Lwe,
            Section::Regev,
        ],
        section => vec![section],
    };

    let mut rendered = Vec::with_capacity(sections.len());
    for section in sections {
        rendered.push(match section {
            Section::Matmul => render_matmul()?,
            Section::Scenario => render_scenario()?,
            Section::Lwe => render_lwe(&mut rng)?,
            Section::Regev => render_regev(&mut rng)?,
            Section::All => unreachable!("expanded above"),
        });
    }
    Ok(rendered.join("\n"))
}

pub fn harness_main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    print!("{}", run(&args)?);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render_matmul() {
        let out = render_matmul().unwrap();
        assert!(out.contains("row 1 x col 0: 4*1 + 5*0 + 6*1 = 10 (entry 2)"));
        assert!(out.contains("A x B (2 x 2):\n[4, 2]\n[10, 5]"));
    }

    #[test]
    fn test_render_scenario() {
        let out = render_scenario().unwrap();
        assert!(out.contains("hint (2 x 2):\n[4, 6]\n[1, 2]"));
        assert!(out.contains("ans (2 x 1):\n[3]\n[5]"));
        assert!(out.contains("qu (2 x 1):\n[5]\n[5]"));
        assert!(out.contains("selected column: 1"));
        assert!(out.contains("recovered (2 x 1):\n[1]\n[0]"));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let args = Args {
            seed: Some(42),
            section: Section::All,
        };
        let first = run(&args).unwrap();
        assert_eq!(first, run(&args).unwrap());
        assert!(first.contains("== Learning with errors (q = 3329) =="));
        assert!(first.contains("enc(0) + enc(1) decrypts to 1"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["worked_example", "--seed", "7", "--section", "regev"]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.section, Section::Regev);

        let args = Args::parse_from(["worked_example"]);
        assert_eq!(args.section, Section::All);
    }
}
