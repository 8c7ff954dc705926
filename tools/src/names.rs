//! Seeded demo data: a small deterministic RNG and curated name lists.
//!
//! Same seed, same roster, same week. Nothing here calls a platform RNG,
//! so demo runs are reproducible end to end.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Deterministic RNG stream for one demo run.
pub struct DemoRng {
    inner: Pcg64Mcg,
}

impl DemoRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Curated name and topic lists for demo rosters.
pub struct DemoNames;

impl DemoNames {
    /// Draw a full display name.
    pub fn full_name(rng: &mut DemoRng) -> String {
        let first = Self::pick(rng, Self::first_names());
        let last = Self::pick(rng, Self::last_names());
        format!("{first} {last}")
    }

    /// Draw a help-session topic.
    pub fn session_topic(rng: &mut DemoRng) -> &'static str {
        Self::pick(rng, Self::session_topics())
    }

    fn pick(rng: &mut DemoRng, list: &'static [&'static str]) -> &'static str {
        list[rng.next_u64_below(list.len() as u64) as usize]
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Ana", "Aisha", "Bo", "Carmen", "Cody", "Dara", "Diego", "Eli", "Emma", "Fern",
            "Gia", "Hal", "Hana", "Ibrahim", "Ines", "Jonah", "Kai", "Leila", "Leo", "Lin",
            "Maya", "Mateo", "Nadia", "Noor", "Omar", "Priya", "Quinn", "Ravi", "Remy", "Rosa",
            "Sam", "Sofia", "Sol", "Tariq", "Tess", "Theo", "Uma", "Viktor", "Wen", "Yara",
            "Yusuf", "Zane", "Zoe", "Amara", "Felix", "Greta", "Hugo", "Imani",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Flores", "Lindqvist", "Reyes", "Patel", "Navarro", "Walsh", "Moretti", "Osei",
            "Okafor", "Fontaine", "Quinn", "Kim", "Nguyen", "Haddad", "Silva", "Ivanova",
            "Tanaka", "Muller", "Johansson", "Adeyemi", "Costa", "Dubois", "Eriksson", "Garcia",
            "Hassan", "Ito", "Jansen", "Kowalski", "Larsen", "Mbeki", "Novak", "Ortega",
            "Park", "Rahman", "Santos", "Tran", "Umarov", "Vega", "Weber", "Xu",
            "Yilmaz", "Zhang", "Abara", "Bauer", "Chen", "Diallo", "Endo", "Farah",
        ]
    }

    fn session_topics() -> &'static [&'static str] {
        &[
            "Calculus II review",
            "Linear algebra problem set",
            "Organic chemistry lab prep",
            "Python debugging",
            "Data structures walkthrough",
            "Algorithms whiteboarding",
            "SQL query tuning",
            "Statics exam prep",
            "Circuit analysis",
            "Physics mechanics review",
            "Statistics homework help",
            "Microeconomics problem set",
            "Accounting fundamentals",
            "Essay structure workshop",
            "Thesis proofreading",
            "Spanish conversation practice",
            "German grammar drill",
            "Public speaking practice",
            "Mock interview",
            "Resume review",
            "Genetics study session",
            "Music theory basics",
            "Photo editing crash course",
            "Intro to machine learning",
        ]
    }
}
