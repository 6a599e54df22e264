//! Batch operations over slices of field elements: Montgomery's simultaneous
//! inversion trick, and straightforward summation/product.

use crate::error::FieldError;
use crate::field::FieldElement;

/// Inverts every element of `values`, in place of a fresh vector, using
/// Montgomery's trick: `3n - 3` multiplications plus one inversion instead of
/// `n` inversions. Fails if any input is zero, leaving `values` untouched.
pub fn batch_invert(values: &[FieldElement]) -> Result<Vec<FieldElement>, FieldError> {
    let zero_indices: Vec<usize> = values.iter().enumerate().filter(|(_, v)| v.is_zero()).map(|(i, _)| i).collect();
    if !zero_indices.is_empty() {
        let count = zero_indices.len();
        return Err(FieldError::BatchInversionZero { zero_indices, count });
    }
    Ok(invert_nonzero(values))
}

/// Like [`batch_invert`], but tolerates zero entries: they are treated as `1`
/// while building the product fabric (so they do not poison the shared
/// inversion) and left unmodified in the output. Returns the indices of the
/// zero entries found.
pub fn batch_invert_skip_zeros(values: &[FieldElement]) -> (Vec<FieldElement>, Vec<usize>) {
    let zero_indices: Vec<usize> = values.iter().enumerate().filter(|(_, v)| v.is_zero()).map(|(i, _)| i).collect();
    if zero_indices.is_empty() {
        return (invert_nonzero(values), zero_indices);
    }

    let substituted: Vec<FieldElement> =
        values.iter().map(|v| if v.is_zero() { FieldElement::ONE } else { *v }).collect();
    let mut inverted = invert_nonzero(&substituted);
    for &i in &zero_indices {
        inverted[i] = values[i];
    }
    (inverted, zero_indices)
}

/// Montgomery's trick, assuming every element of `values` is nonzero.
fn invert_nonzero(values: &[FieldElement]) -> Vec<FieldElement> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut prefix = Vec::with_capacity(n);
    let mut acc = FieldElement::ONE;
    for v in values {
        acc = acc.mul(v);
        prefix.push(acc);
    }

    // `acc` is now the product of all values; invert once.
    let mut inv_acc = acc.invert().expect("values contain no zero entries");

    let mut result = vec![FieldElement::ZERO; n];
    for i in (0..n).rev() {
        let prefix_before = if i == 0 { FieldElement::ONE } else { prefix[i - 1] };
        result[i] = inv_acc.mul(&prefix_before);
        inv_acc = inv_acc.mul(&values[i]);
    }
    result
}

/// Left-to-right sum of `values`; `0` for an empty slice.
pub fn sum_slice(values: &[FieldElement]) -> FieldElement {
    match values {
        [] => FieldElement::ZERO,
        [first] => *first,
        [first, rest @ ..] => rest.iter().fold(*first, |acc, v| acc.add(v)),
    }
}

/// Left-to-right product of `values`; `1` for an empty slice.
pub fn product_slice(values: &[FieldElement]) -> FieldElement {
    match values {
        [] => FieldElement::ONE,
        [first] => *first,
        [first, rest @ ..] => rest.iter().fold(*first, |acc, v| acc.mul(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elems(vals: &[u64]) -> Vec<FieldElement> {
        vals.iter().map(|&v| FieldElement::from_u64(v)).collect()
    }

    #[test]
    fn batch_invert_matches_individual_inversion() {
        let values = elems(&[3, 7, 11, 123456789]);
        let inverted = batch_invert(&values).unwrap();
        for (v, inv) in values.iter().zip(inverted.iter()) {
            assert_eq!(*inv, v.invert().unwrap());
        }
    }

    #[test]
    fn batch_invert_rejects_zero_and_reports_all_indices() {
        let values = elems(&[1, 0, 2, 0]);
        match batch_invert(&values) {
            Err(FieldError::BatchInversionZero { zero_indices, count }) => {
                assert_eq!(zero_indices, vec![1, 3]);
                assert_eq!(count, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn batch_invert_skip_zeros_leaves_zero_entries_untouched() {
        let values = elems(&[5, 0, 9]);
        let (inverted, zero_indices) = batch_invert_skip_zeros(&values);
        assert_eq!(zero_indices, vec![1]);
        assert!(inverted[1].is_zero());
        assert_eq!(inverted[0], values[0].invert().unwrap());
        assert_eq!(inverted[2], values[2].invert().unwrap());
    }

    #[test]
    fn sum_and_product_of_empty_slice() {
        assert_eq!(sum_slice(&[]), FieldElement::ZERO);
        assert_eq!(product_slice(&[]), FieldElement::ONE);
    }

    #[test]
    fn sum_and_product_accumulate_left_to_right() {
        let values = elems(&[2, 3, 4]);
        assert_eq!(sum_slice(&values), FieldElement::from_u64(9));
        assert_eq!(product_slice(&values), FieldElement::from_u64(24));
    }
}
