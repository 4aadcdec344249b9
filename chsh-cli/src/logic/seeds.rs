use anyhow::{Result, bail};
use std::collections::HashSet;

/// Keywords that request a seed drawn from process entropy.
const ENTROPY_TOKENS: [&str; 2] = ["random", "entropy"];

/// Seed metadata used for reproducible runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// Set when the seed came from entropy rather than the command line.
    pub generated: bool,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            generated: false,
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            seed: rand::random(),
            generated: true,
        }
    }
}

/// Resolve CLI seed arguments into concrete seeds.
///
/// Supports decimal integers (negative values use their magnitude), `0x`
/// hexadecimal, and the keywords `random` / `entropy`, which draw a fresh
/// seed each time they appear. Duplicates keep their first position; an
/// empty list resolves to one entropy seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut resolved: Vec<SeedInfo> = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let info = if ENTROPY_TOKENS
            .iter()
            .any(|keyword| token.eq_ignore_ascii_case(keyword))
        {
            SeedInfo::from_entropy()
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            && let Ok(value) = u64::from_str_radix(hex, 16)
        {
            SeedInfo::from_numeric(value)
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_entropy());
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn resolves_numeric_and_hex() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0xFF"])).unwrap();
        let values: Vec<u64> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![42, 7, 255]);
        assert!(seeds.iter().all(|s| !s.generated));
    }

    #[test]
    fn deduplicates_in_order() {
        let seeds = resolve_seed_inputs(&tokens(&["5", "0x5", "6", "5"])).unwrap();
        let values: Vec<u64> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![5, 6]);
    }

    #[test]
    fn entropy_keywords_and_empty_input_draw_fresh_seeds() {
        let seeds = resolve_seed_inputs(&tokens(&["RANDOM"])).unwrap();
        assert_eq!(seeds.len(), 1);
        assert!(seeds[0].generated);
        let fallback = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(fallback.len(), 1);
        assert!(fallback[0].generated);
    }

    #[test]
    fn rejects_garbage() {
        let err = resolve_seed_inputs(&tokens(&["CL-ORANGE42"])).unwrap_err();
        assert!(err.to_string().contains("Unrecognized seed token"));
    }
}
