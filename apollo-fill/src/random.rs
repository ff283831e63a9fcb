use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

const WORDS: &[&str] = &[
    "account", "bandwidth", "bridge", "calculator", "capacitor", "circuit", "compress",
    "connect", "copy", "database", "driver", "feed", "firewall", "generate", "hack", "hard",
    "index", "input", "interface", "matrix", "monitor", "navigate", "network", "override",
    "panel", "parse", "pixel", "port", "program", "protocol", "quantify", "reboot", "sensor",
    "synthesize", "system", "transmit", "array", "bus", "card", "microchip", "alarm",
    "application", "capability", "framework", "hierarchy", "middleware", "paradigm",
    "solution", "toolset", "workforce",
];

/// A seeded source of the values filling scalar leaves.
///
/// A fresh generator is created for every value, from the position of that value in the
/// response. Custom generators receive it so that their output is as reproducible as the
/// built-in ones.
#[derive(Debug)]
pub struct Random {
    rng: StdRng,
}

impl Random {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A lowercase english word.
    pub fn word(&mut self) -> &'static str {
        WORDS.choose(&mut self.rng).copied().unwrap_or("word")
    }

    /// An integer in `0..=99999`.
    pub fn int(&mut self) -> i64 {
        self.rng.random_range(0..=99_999)
    }

    /// A number in `0..=99999` with two decimals.
    pub fn float(&mut self) -> f64 {
        self.rng.random_range(0..=9_999_900_i64) as f64 / 100.0
    }

    pub fn boolean(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// A version 4 UUID in its hyphenated form.
    pub fn uuid(&mut self) -> String {
        uuid::Builder::from_random_bytes(self.rng.random())
            .into_uuid()
            .to_string()
    }

    /// A uniformly chosen item, `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// The underlying generator, for anything the helpers above do not cover.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Whether a nullable value comes out as `null`.
    pub(crate) fn choose_null(&mut self) -> bool {
        self.boolean()
    }
}
