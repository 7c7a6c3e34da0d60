use crate::RngState;

/// Returns a shuffled copy of `cards`. The input keeps its order.
pub fn shuffle_deck(cards: &[String], rng: &mut RngState) -> Vec<String> {
    let mut shuffled = cards.to_vec();
    rng.shuffle(&mut shuffled);
    shuffled
}
