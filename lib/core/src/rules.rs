//! Ordered derivation rules.
//!
//! Each resolvable group of measurements (bracket, head set, wheelbase) is an
//! ordered table of rules. A rule inspects the stage input and either derives
//! the stage output or declines. The first rule that derives wins, so the
//! table order is the precedence.

/// One entry of a rule table. `P` names the derivation path taken.
pub struct Rule<I, O, P> {
    pub path: P,
    pub derive: fn(&I) -> Option<O>,
}

impl<I, O, P: Copy> Rule<I, O, P> {
    pub const fn new(path: P, derive: fn(&I) -> Option<O>) -> Self {
        Self { path, derive }
    }
}

/// Run `rules` in order and return the first derivation along with its path.
pub fn first_applicable<I, O, P: Copy>(rules: &[Rule<I, O, P>], input: &I) -> Option<(P, O)> {
    rules
        .iter()
        .find_map(|rule| (rule.derive)(input).map(|out| (rule.path, out)))
}
