/// Economy profile used to synthesize respondents: name, code, region,
/// baseline account coverage, and debit-card coverage among account holders.
struct EconomyProfile {
    name: &'static str,
    code: &'static str,
    region: &'static str,
    account_rate: f64,
    debit_given_account: f64,
}

const ECONOMIES: &[EconomyProfile] = &[
    EconomyProfile { name: "Philippines", code: "PHL", region: "East Asia & Pacific", account_rate: 0.34, debit_given_account: 0.60 },
    EconomyProfile { name: "Brunei", code: "BRN", region: "East Asia & Pacific", account_rate: 0.82, debit_given_account: 0.83 },
    EconomyProfile { name: "Cambodia", code: "KHM", region: "East Asia & Pacific", account_rate: 0.22, debit_given_account: 0.45 },
    EconomyProfile { name: "Indonesia", code: "IDN", region: "East Asia & Pacific", account_rate: 0.49, debit_given_account: 0.63 },
    EconomyProfile { name: "Lao PDR", code: "LAO", region: "East Asia & Pacific", account_rate: 0.29, debit_given_account: 0.45 },
    EconomyProfile { name: "Malaysia", code: "MYS", region: "East Asia & Pacific", account_rate: 0.85, debit_given_account: 0.87 },
    EconomyProfile { name: "Myanmar", code: "MMR", region: "East Asia & Pacific", account_rate: 0.26, debit_given_account: 0.35 },
    EconomyProfile { name: "Singapore", code: "SGP", region: "East Asia & Pacific", account_rate: 0.98, debit_given_account: 0.94 },
    EconomyProfile { name: "Thailand", code: "THA", region: "East Asia & Pacific", account_rate: 0.82, debit_given_account: 0.73 },
    EconomyProfile { name: "Vietnam", code: "VNM", region: "East Asia & Pacific", account_rate: 0.31, debit_given_account: 0.87 },
    EconomyProfile { name: "India", code: "IND", region: "South Asia", account_rate: 0.80, debit_given_account: 0.41 },
    EconomyProfile { name: "Bangladesh", code: "BGD", region: "South Asia", account_rate: 0.50, debit_given_account: 0.12 },
    EconomyProfile { name: "Kenya", code: "KEN", region: "Sub-Saharan Africa", account_rate: 0.82, debit_given_account: 0.46 },
    EconomyProfile { name: "Brazil", code: "BRA", region: "Latin America & Caribbean", account_rate: 0.70, debit_given_account: 0.84 },
];

const RESPONDENTS_PER_ECONOMY: usize = 400;

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

    /// Bernoulli draw with probability clamped to (0.01, 0.99).
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p.clamp(0.01, 0.99)
    }

    /// Uniform integer in `lo..=hi`.
    fn int_between(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }
}

fn yes_no_code(yes: bool) -> i64 {
    if yes {
        1
    } else {
        2
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_path = "micro_world.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "economy",
            "economycode",
            "regionwb",
            "wpid_random",
            "female",
            "age",
            "educ",
            "inc_q",
            "account_fin",
            "fin17a",
            "fin24",
            "fin2",
        ])
        .expect("Failed to write header");

    let mut respondent_id: i64 = 100_000;

    for economy in ECONOMIES {
        for _ in 0..RESPONDENTS_PER_ECONOMY {
            respondent_id += 1;

            let female = rng.int_between(1, 2);
            let age = rng.int_between(15, 79);
            let educ = match rng.next_f64() {
                p if p < 0.35 => 1,
                p if p < 0.80 => 2,
                _ => 3,
            };
            let inc_q = rng.int_between(1, 5);

            // Account ownership leans on the economy baseline plus an
            // income-quintile tilt, so the cohort charts show structure.
            let account_p = economy.account_rate + 0.07 * (inc_q - 3) as f64;
            let has_account = rng.chance(account_p);

            let saves = has_account && rng.chance(0.36);
            let emergency_p = if has_account { 0.62 } else { 0.28 } + 0.04 * (inc_q - 3) as f64;
            let emergency = rng.chance(emergency_p);
            let debit = if has_account {
                rng.chance(economy.debit_given_account)
            } else {
                rng.chance(0.02)
            };

            writer
                .write_record([
                    economy.name.to_string(),
                    economy.code.to_string(),
                    economy.region.to_string(),
                    respondent_id.to_string(),
                    female.to_string(),
                    age.to_string(),
                    educ.to_string(),
                    inc_q.to_string(),
                    yes_no_code(has_account).to_string(),
                    yes_no_code(saves).to_string(),
                    yes_no_code(emergency).to_string(),
                    yes_no_code(debit).to_string(),
                ])
                .expect("Failed to write row");
        }
    }

    writer.flush().expect("Failed to flush output");

    println!(
        "Wrote {} respondents across {} economies to {output_path}",
        ECONOMIES.len() * RESPONDENTS_PER_ECONOMY,
        ECONOMIES.len()
    );
}
