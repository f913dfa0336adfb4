use std::fmt;
use std::str::FromStr;

use crate::error::LifeError;

/// Largest neighbor count in a Moore neighborhood.
pub const MAX_NEIGHBORS: u32 = 8;

/// Mask with one bit per possible neighbor count (0..=8).
const ALL_COUNTS: u32 = (1 << (MAX_NEIGHBORS + 1)) - 1;

/// Birth/death rule of the automaton.
///
/// Both sets are stored as bitmasks: bit `n` set means "a cell with `n`
/// live neighbors is in this set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule {
    /// Neighbor counts at which a dead cell comes alive.
    rise: u32,
    /// Neighbor counts at which a live cell dies. Always the complement
    /// of the survive set within `0..=8`.
    fall: u32,
}

impl Rule {
    /// Build a rule from birth and survive bitmasks.
    pub fn from_masks(birth: u32, survive: u32) -> Self {
        Self {
            rise: birth & ALL_COUNTS,
            fall: !survive & ALL_COUNTS,
        }
    }

    /// Standard Conway's Game of Life: B3/S23
    pub fn conway() -> Self {
        Self::from_masks(1 << 3, (1 << 2) | (1 << 3))
    }

    /// HighLife: B36/S23 - known for its replicator pattern
    pub fn highlife() -> Self {
        Self::from_masks((1 << 3) | (1 << 6), (1 << 2) | (1 << 3))
    }

    /// Day & Night: B3678/S34678 - symmetric under on/off inversion
    pub fn day_and_night() -> Self {
        Self::from_masks(
            (1 << 3) | (1 << 6) | (1 << 7) | (1 << 8),
            (1 << 3) | (1 << 4) | (1 << 6) | (1 << 7) | (1 << 8),
        )
    }

    /// Seeds: B2/S - every live cell dies, only birth
    pub fn seeds() -> Self {
        Self::from_masks(1 << 2, 0)
    }

    /// Life without Death: B3/S012345678 - cells never die
    pub fn life_without_death() -> Self {
        Self::from_masks(1 << 3, ALL_COUNTS)
    }

    /// Parse a rule string.
    ///
    /// Accepted forms:
    /// - `23/3` (survive digits, then birth digits)
    /// - `S23/B3` or `B3/S23` (tagged, any order)
    pub fn parse(text: &str) -> Result<Self, LifeError> {
        let invalid = |reason: &str| LifeError::InvalidRule {
            rule: text.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = text.trim().split('/').collect();
        let &[first, second] = &parts[..] else {
            return Err(invalid("expected exactly two parts separated by '/'"));
        };

        let (survive_str, birth_str) = match (split_tag(first), split_tag(second)) {
            (None, None) => (first, second),
            (Some(('S', s)), Some(('B', b))) | (Some(('B', b)), Some(('S', s))) => (s, b),
            (Some(_), Some(_)) => return Err(invalid("tagged parts must be one 'S' and one 'B'")),
            _ => return Err(invalid("either both parts are tagged with S/B or neither is")),
        };

        let survive = parse_counts(survive_str).ok_or_else(|| invalid("survive counts must be digits 0-8"))?;
        let birth = parse_counts(birth_str).ok_or_else(|| invalid("birth counts must be digits 0-8"))?;

        Ok(Self::from_masks(birth, survive))
    }

    /// Whether a dead cell with `count` live neighbors comes alive.
    pub fn rises(&self, count: u32) -> bool {
        count <= MAX_NEIGHBORS && (self.rise >> count) & 1 == 1
    }

    /// Whether a live cell with `count` live neighbors dies.
    pub fn falls(&self, count: u32) -> bool {
        count <= MAX_NEIGHBORS && (self.fall >> count) & 1 == 1
    }

    pub fn rise_counts(&self) -> Vec<u32> {
        counts(self.rise)
    }

    pub fn fall_counts(&self) -> Vec<u32> {
        counts(self.fall)
    }

    pub fn survive_counts(&self) -> Vec<u32> {
        counts(!self.fall & ALL_COUNTS)
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::conway()
    }
}

impl FromStr for Rule {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Formats as a `B<birth>/S<survive>` label, e.g. `B3/S23`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |list: Vec<u32>| -> String { list.iter().map(|n| n.to_string()).collect() };
        write!(f, "B{}/S{}", digits(self.rise_counts()), digits(self.survive_counts()))
    }
}

/// Split an `S`/`B` tag (either case) off the front of a rule part.
fn split_tag(part: &str) -> Option<(char, &str)> {
    let tag = part.chars().next()?.to_ascii_uppercase();
    matches!(tag, 'S' | 'B').then(|| (tag, &part[1..]))
}

/// Parse a run of neighbor-count digits into a bitmask.
fn parse_counts(s: &str) -> Option<u32> {
    let mut mask = 0u32;
    for ch in s.chars() {
        let n = ch.to_digit(10).filter(|&n| n <= MAX_NEIGHBORS)?;
        mask |= 1 << n;
    }
    Some(mask)
}

fn counts(mask: u32) -> Vec<u32> {
    (0..=MAX_NEIGHBORS).filter(|&n| (mask >> n) & 1 == 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_conway_rule() {
        let rule = Rule::parse("23/3").unwrap();
        assert_eq!(rule.rise_counts(), vec![3]);
        assert_eq!(rule.fall_counts(), vec![0, 1, 4, 5, 6, 7, 8]);
        assert_eq!(rule.survive_counts(), vec![2, 3]);
        assert_eq!(rule, Rule::conway());
    }

    #[test]
    fn fall_is_complement_of_survive() {
        let rule = Rule::parse("23/3").unwrap();
        for n in 0..=MAX_NEIGHBORS {
            assert_eq!(rule.falls(n), n != 2 && n != 3, "count {n}");
        }
    }

    #[test]
    fn tagged_order_does_not_matter() {
        let plain = Rule::parse("23/3").unwrap();
        assert_eq!(Rule::parse("S23/B3").unwrap(), plain);
        assert_eq!(Rule::parse("B3/S23").unwrap(), plain);
        assert_eq!(Rule::parse("b3/s23").unwrap(), plain);
    }

    #[test]
    fn empty_digit_runs() {
        let seeds = Rule::parse("B2/S").unwrap();
        assert_eq!(seeds, Rule::seeds());
        assert_eq!(seeds.fall_counts(), (0..=8).collect::<Vec<_>>());

        let no_birth = Rule::parse("23/").unwrap();
        assert!(no_birth.rise_counts().is_empty());
    }

    #[test]
    fn presets_match_their_labels() {
        assert_eq!(Rule::parse("B36/S23").unwrap(), Rule::highlife());
        assert_eq!(Rule::parse("B3678/S34678").unwrap(), Rule::day_and_night());
        assert_eq!(Rule::parse("012345678/3").unwrap(), Rule::life_without_death());
        assert_eq!(Rule::default(), Rule::conway());
    }

    #[test]
    fn display_label() {
        assert_eq!(Rule::conway().to_string(), "B3/S23");
        assert_eq!(Rule::seeds().to_string(), "B2/S");
        let reparsed: Rule = Rule::highlife().to_string().parse().unwrap();
        assert_eq!(reparsed, Rule::highlife());
    }

    #[test]
    fn rejects_malformed_rules() {
        for bad in ["", "233", "23/3/1", "2a/3", "23/9", "S23/S3", "S23/3", "23/B3", "X3/Y2"] {
            let err = Rule::parse(bad).unwrap_err();
            assert!(matches!(err, LifeError::InvalidRule { .. }), "{bad:?} gave {err:?}");
        }
    }

    #[test]
    fn out_of_range_counts_never_match() {
        let rule = Rule::life_without_death();
        assert!(!rule.rises(9));
        assert!(!rule.falls(9));
    }
}
