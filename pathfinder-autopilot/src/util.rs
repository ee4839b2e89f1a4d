use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Accepts `0x`-prefixed hex or decimal, with `_` digit separators.
pub fn parse_seed(raw: &str) -> Result<u32> {
    let token: String = raw.trim().chars().filter(|c| *c != '_').collect();
    let (digits, radix) = match token.get(..2) {
        Some("0x" | "0X") => (&token[2..], 16),
        _ => (token.as_str(), 10),
    };
    if digits.is_empty() {
        return Err(anyhow!("empty seed {raw:?}"));
    }
    u32::from_str_radix(digits, radix)
        .with_context(|| format!("seed {raw:?} is not a base-{radix} u32"))
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

/// Seeds separated by commas or whitespace; `#` starts a comment that runs to
/// the end of the line.
fn parse_seed_list(text: &str) -> Result<Vec<u32>> {
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(kept, _)| kept))
        .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|token| !token.is_empty())
        .map(parse_seed)
        .collect()
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let seeds = parse_seed_list(input)?;
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

pub fn parse_seed_file(path: &Path) -> Result<Vec<u32>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed reading seed file {}", path.display()))?;
    let seeds =
        parse_seed_list(&text).with_context(|| format!("in seed file {}", path.display()))?;
    if seeds.is_empty() {
        return Err(anyhow!("seed file {} had no seeds", path.display()));
    }
    Ok(seeds)
}

/// `count` seeds starting at `start`, each derived from the previous by an LCG step.
pub fn seed_sequence(start: u32, count: u32) -> Result<Vec<u32>> {
    if count == 0 {
        return Err(anyhow!("--seed-count must be >= 1"));
    }
    let mut out = Vec::with_capacity(count as usize);
    let mut cur = start;
    for _ in 0..count {
        out.push(cur);
        cur = cur.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    }
    Ok(out)
}

/// Creates parent directories as needed.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}
