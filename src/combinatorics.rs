use itertools::Itertools;

/// Every way to split the indices `0..2 * pairs` into unordered pairs.
///
/// There are `(2 * pairs - 1)!!` of them. Zero pairs have exactly one (empty) pairing.
pub fn all_pairing_sets(pairs: usize) -> Vec<Vec<(usize, usize)>> {
    pairings_of(&(0..pairs * 2).collect_vec())
}

fn pairings_of(items: &[usize]) -> Vec<Vec<(usize, usize)>> {
    let Some((&first, rest)) = items.split_first() else {
        return vec![vec![]];
    };
    rest.iter()
        .enumerate()
        .flat_map(|(partner_index, &partner)| {
            let remaining = rest
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != partner_index)
                .map(|(_, item)| *item)
                .collect_vec();
            pairings_of(&remaining).into_iter().map(move |mut pairing| {
                pairing.insert(0, (first, partner));
                pairing
            })
        })
        .collect()
}

/// All `length`-long sequences over `0..symbols`, repetition allowed, in lexicographic order.
///
/// A `length` of zero yields a single empty sequence; zero symbols with a nonzero length yield nothing.
#[derive(Clone, Debug)]
pub struct Permutations {
    symbols: usize,
    next: Option<Vec<usize>>,
}

impl Permutations {
    #[allow(missing_docs)]
    pub fn new(symbols: usize, length: usize) -> Self {
        Self { symbols, next: (symbols > 0 || length == 0).then(|| vec![0; length]) }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        let advanced = successor.iter_mut().rev().any(|digit| {
            *digit += 1;
            if *digit < self.symbols {
                return true;
            }
            *digit = 0;
            false
        });
        if advanced {
            self.next = Some(successor);
        }
        Some(current)
    }
}
