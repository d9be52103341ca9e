use matforge_net::{FieldArithmetic, GaloisField, GfMatrix};
use proptest::prelude::*;

const PRIMES: [u32; 5] = [2, 3, 5, 7, 11];

/// Laplace expansion along the first row, reduced mod `q`.
fn reference_determinant(rows: &[Vec<u32>], q: u32) -> u32 {
    let n = rows.len();
    if n == 0 {
        return 1;
    }
    let q = i64::from(q);
    let mut total = 0i64;
    for column in 0..n {
        let minor: Vec<Vec<u32>> = rows[1..]
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(index, _)| *index != column)
                    .map(|(_, value)| *value)
                    .collect()
            })
            .collect();
        let term = i64::from(rows[0][column]) * i64::from(reference_determinant(&minor, q as u32));
        total += if column % 2 == 0 { term } else { -term };
    }
    total.rem_euclid(q) as u32
}

fn field_and_rows() -> impl Strategy<Value = (u32, Vec<Vec<u32>>)> {
    (prop::sample::select(PRIMES.to_vec()), 1usize..=4).prop_flat_map(|(q, n)| {
        (
            Just(q),
            prop::collection::vec(prop::collection::vec(0..q, n), n),
        )
    })
}

#[test]
fn identity_is_one_in_every_field() {
    for q in PRIMES {
        let field = GaloisField::new(q).unwrap();
        for size in 0..6 {
            assert_eq!(GfMatrix::identity(size).determinant(&field), 1, "q = {q}");
        }
    }
}

proptest! {
    #[test]
    fn elimination_matches_expansion((q, rows) in field_and_rows()) {
        let field = GaloisField::new(q).unwrap();
        let matrix = GfMatrix::from_rows(rows.clone()).unwrap();
        prop_assert_eq!(matrix.determinant(&field), reference_determinant(&rows, q));
    }

    #[test]
    fn swapping_rows_negates((q, rows) in field_and_rows()) {
        prop_assume!(rows.len() >= 2);
        let field = GaloisField::new(q).unwrap();
        let before = GfMatrix::from_rows(rows.clone()).unwrap().determinant(&field);
        let mut swapped = rows;
        swapped.swap(0, 1);
        let after = GfMatrix::from_rows(swapped).unwrap().determinant(&field);
        prop_assert_eq!(after, field.neg(before));
    }

    #[test]
    fn zero_row_is_singular((q, rows) in field_and_rows(), index in 0usize..4) {
        let field = GaloisField::new(q).unwrap();
        let mut rows = rows;
        let index = index % rows.len();
        rows[index].iter_mut().for_each(|value| *value = 0);
        prop_assert_eq!(GfMatrix::from_rows(rows).unwrap().determinant(&field), 0);
    }
}
