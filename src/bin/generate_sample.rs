//! Writes a deterministic synthetic case file in CSV and Parquet form, with
//! the same column names as the public case-surveillance extracts.
//!
//! Usage: `generate_sample [ROWS] [OUTPUT_STEM]` (defaults: 2000, `sample_cases`).

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Age groups with relative weights.
const AGE_GROUPS: [(&str, f64); 5] = [
    ("0 - 17 years", 0.16),
    ("18 to 49 years", 0.48),
    ("50 to 64 years", 0.19),
    ("65+ years", 0.15),
    ("Missing", 0.02),
];

/// Race/ethnicity values with relative weights.
const RACES: [(&str, f64); 8] = [
    ("White, Non-Hispanic", 0.44),
    ("Hispanic/Latino", 0.21),
    ("Black, Non-Hispanic", 0.12),
    ("Asian, Non-Hispanic", 0.04),
    ("Multiple/Other, Non-Hispanic", 0.04),
    ("American Indian/Alaska Native, Non-Hispanic", 0.01),
    ("Native Hawaiian/Other Pacific Islander, Non-Hispanic", 0.005),
    ("Unknown", 0.145),
];

const SEXES: [&str; 3] = ["Female", "Male", "Unknown"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Pick from `(value, weight)` pairs proportionally to weight.
    fn weighted<'a>(&mut self, choices: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut target = self.next_f64() * total;
        for &(value, weight) in choices {
            if target < weight {
                return value;
            }
            target -= weight;
        }
        choices.last().map_or("", |&(v, _)| v)
    }
}

struct Case {
    case_month: String,
    age_group: &'static str,
    sex: &'static str,
    race_ethnicity_combined: &'static str,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Case> {
    (0..rows)
        .map(|_| {
            let month_index = (rng.next_u64() % 24) as usize;
            Case {
                case_month: format!("{}-{:02}", 2020 + month_index / 12, month_index % 12 + 1),
                age_group: rng.weighted(&AGE_GROUPS),
                sex: SEXES[(rng.next_u64() % SEXES.len() as u64) as usize],
                race_ethnicity_combined: rng.weighted(&RACES),
            }
        })
        .collect()
}

fn write_csv(path: &str, cases: &[Case]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["case_month", "age_group", "sex", "race_ethnicity_combined"])?;
    for case in cases {
        writer.write_record([
            case.case_month.as_str(),
            case.age_group,
            case.sex,
            case.race_ethnicity_combined,
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, cases: &[Case]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("case_month", DataType::Utf8, false),
        Field::new("age_group", DataType::Utf8, false),
        Field::new("sex", DataType::Utf8, false),
        Field::new("race_ethnicity_combined", DataType::Utf8, false),
    ]));

    let column = |f: fn(&Case) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(cases.iter().map(f).collect::<Vec<_>>()))
    };
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            column(|c| c.case_month.as_str()),
            column(|c| c.age_group),
            column(|c| c.sex),
            column(|c| c.race_ethnicity_combined),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 2000,
    };
    let stem = args.next().unwrap_or_else(|| "sample_cases".to_string());

    let mut rng = SimpleRng::new(42);
    let cases = generate(rows, &mut rng);

    let csv_path = format!("{stem}.csv");
    let parquet_path = format!("{stem}.parquet");
    write_csv(&csv_path, &cases)?;
    write_parquet(&parquet_path, &cases)?;

    println!("Wrote {rows} cases to {csv_path} and {parquet_path}");
    Ok(())
}
