//! Global dashboard state: the coin universe, search box and selection.

use crate::model::Coin;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

pub const SUGGESTION_LIMIT: usize = 5;
pub const SAMPLE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum View<'a> {
    Browse,
    Detail(&'a Coin),
}

/// First `SUGGESTION_LIMIT` coins, in list order, whose name or symbol
/// contains `term`. A blank term yields nothing.
pub fn suggestions(term: &str, coins: &[Coin]) -> Vec<Coin> {
    if term.trim().is_empty() {
        return Vec::new();
    }
    coins
        .iter()
        .filter(|coin| coin.matches(term))
        .take(SUGGESTION_LIMIT)
        .cloned()
        .collect()
}

/// Up to `SAMPLE_SIZE` distinct coins from a shuffled copy of the list.
pub fn random_sample<R: Rng + ?Sized>(coins: &[Coin], rng: &mut R) -> Vec<Coin> {
    let mut shuffled = coins.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(SAMPLE_SIZE);
    shuffled
}

#[derive(Debug, Default)]
pub struct Shell {
    coins: Vec<Coin>,
    search_term: String,
    suggestions: Vec<Coin>,
    sample: Vec<Coin>,
    selected: Option<Coin>,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the coin list. Only a non-empty list reshuffles the sample.
    pub fn load_coins<R: Rng + ?Sized>(&mut self, coins: Vec<Coin>, rng: &mut R) {
        debug!("Loaded {} coins", coins.len());
        self.coins = coins;
        if !self.coins.is_empty() {
            self.sample = random_sample(&self.coins, rng);
        }
        self.refresh_suggestions();
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.refresh_suggestions();
    }

    pub fn clear_search(&mut self) {
        self.set_search_term("");
    }

    pub fn select(&mut self, coin: Coin) {
        info!("Selected coin {} ({}), id = {}", coin.name, coin.symbol, coin.id);
        self.selected = Some(coin);
        self.search_term.clear();
        self.suggestions.clear();
    }

    pub fn deselect(&mut self) {
        if let Some(coin) = self.selected.take() {
            debug!("Back to browse from {}", coin.name);
        }
    }

    /// Drops everything, as a fresh start would.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Coin behind the 1-based `position` of whatever list is on screen:
    /// suggestions while there are any, the sample cards otherwise.
    pub fn pick(&self, position: usize) -> Option<&Coin> {
        let list = if self.suggestions.is_empty() {
            &self.sample
        } else {
            &self.suggestions
        };
        position.checked_sub(1).and_then(|index| list.get(index))
    }

    pub fn view(&self) -> View<'_> {
        match &self.selected {
            Some(coin) => View::Detail(coin),
            None => View::Browse,
        }
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn suggestions(&self) -> &[Coin] {
        &self.suggestions
    }

    pub fn sample(&self) -> &[Coin] {
        &self.sample
    }

    pub fn selected(&self) -> Option<&Coin> {
        self.selected.as_ref()
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = suggestions(&self.search_term, &self.coins);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::coin::coin;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn bitcoin_and_ethereum() -> Vec<Coin> {
        vec![coin(1, "Bitcoin", "BTC"), coin(2, "Ethereum", "ETH")]
    }

    fn many_coins(n: u64) -> Vec<Coin> {
        (1..=n)
            .map(|i| coin(i, &format!("Coin {}", i), &format!("C{}", i)))
            .collect()
    }

    #[test]
    fn test_suggestions_scenario() {
        let found = suggestions("eth", &bitcoin_and_ethereum());
        assert_eq!(1, found.len());
        assert_eq!("2", found[0].id.as_str());
    }

    #[test]
    fn test_suggestions_blank_term_is_empty() {
        assert!(suggestions("", &bitcoin_and_ethereum()).is_empty());
        assert!(suggestions("   ", &bitcoin_and_ethereum()).is_empty());
    }

    #[test]
    fn test_suggestions_are_capped_and_in_list_order() {
        let coins = many_coins(30);
        let found = suggestions("coin", &coins);
        assert_eq!(SUGGESTION_LIMIT, found.len());
        assert_eq!(&coins[..SUGGESTION_LIMIT], &found[..]);
    }

    fn coin_list() -> impl Strategy<Value = Vec<Coin>> {
        prop::collection::vec(("[a-zA-Z ]{0,8}", "[A-Z]{1,4}"), 0..40).prop_map(|rows| {
            rows.iter()
                .enumerate()
                .map(|(i, (name, symbol))| coin(i as u64 + 1, name, symbol))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn suggestions_are_capped_and_all_match(coins in coin_list(), term in "[a-zA-Z]{1,3}") {
            let found = suggestions(&term, &coins);
            prop_assert!(found.len() <= SUGGESTION_LIMIT);
            prop_assert!(found.iter().all(|c| c.matches(&term)));
            let expected: Vec<Coin> = coins
                .iter()
                .filter(|c| c.matches(&term))
                .take(SUGGESTION_LIMIT)
                .cloned()
                .collect();
            prop_assert_eq!(expected, found);
        }

        #[test]
        fn blank_term_never_suggests(coins in coin_list(), term in "[ \t]{0,4}") {
            prop_assert!(suggestions(&term, &coins).is_empty());
        }

        #[test]
        fn random_sample_is_distinct_subset(coins in coin_list(), seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = random_sample(&coins, &mut rng);
            prop_assert_eq!(std::cmp::min(SAMPLE_SIZE, coins.len()), sample.len());
            let ids: HashSet<_> = sample.iter().map(|c| c.id.clone()).collect();
            prop_assert_eq!(sample.len(), ids.len());
            prop_assert!(sample.iter().all(|c| coins.contains(c)));
        }
    }

    #[test]
    fn test_select_clears_search_and_switches_view() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut shell = Shell::new();
        shell.load_coins(bitcoin_and_ethereum(), &mut rng);
        shell.set_search_term("eth");
        assert_eq!(1, shell.suggestions().len());
        assert_eq!(View::Browse, shell.view());

        let eth = shell.pick(1).cloned().unwrap();
        shell.select(eth.clone());
        assert_eq!("", shell.search_term());
        assert!(shell.suggestions().is_empty());
        assert_eq!(View::Detail(&eth), shell.view());
    }

    #[test]
    fn test_selection_does_not_reshuffle() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut shell = Shell::new();
        shell.load_coins(many_coins(40), &mut rng);
        let before = shell.sample().to_vec();
        let first = before[0].clone();
        shell.select(first);
        shell.deselect();
        assert_eq!(before, shell.sample());
        assert_eq!(View::Browse, shell.view());
    }

    #[test]
    fn test_empty_list_keeps_browse_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut shell = Shell::new();
        shell.load_coins(Vec::new(), &mut rng);
        assert!(shell.sample().is_empty());
        assert!(shell.pick(1).is_none());
    }

    #[test]
    fn test_suggestions_follow_list_changes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut shell = Shell::new();
        shell.set_search_term("btc");
        assert!(shell.suggestions().is_empty());
        shell.load_coins(bitcoin_and_ethereum(), &mut rng);
        assert_eq!("Bitcoin", shell.suggestions()[0].name);
    }

    #[test]
    fn test_pick_prefers_suggestions() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut shell = Shell::new();
        shell.load_coins(bitcoin_and_ethereum(), &mut rng);
        shell.set_search_term("bit");
        assert_eq!("Bitcoin", shell.pick(1).unwrap().name);
        assert!(shell.pick(2).is_none());
        assert!(shell.pick(0).is_none());
        shell.clear_search();
        assert!(shell.pick(2).is_some());
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut shell = Shell::new();
        shell.load_coins(bitcoin_and_ethereum(), &mut rng);
        shell.select(coin(1, "Bitcoin", "BTC"));
        shell.reset();
        assert!(shell.coins().is_empty());
        assert!(shell.sample().is_empty());
        assert!(shell.selected().is_none());
    }
}
