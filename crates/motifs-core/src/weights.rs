//! Position-weight matrix transforms.

use crate::models::BaseWeights;

/// Reverse-complement a position-weight matrix.
///
/// Position order is reversed, then each position's `A, C, G, T` tuple is
/// reversed, which exchanges A with T and C with G. The two steps are only
/// ever applied together. The function is an involution.
pub fn reverse_complement(mut weights: Vec<BaseWeights>) -> Vec<BaseWeights> {
    weights.reverse();
    for position in weights.iter_mut() {
        position.reverse();
    }
    weights
}
