use fri_iop::field::Fp;
use fri_iop::fiat_shamir::Transcript;
use fri_iop::fri::Fri;
use fri_iop::merkle;
use fri_iop::hash::Sha3Hasher;
use fri_iop::polynomial::Polynomial;
use fri_iop::field::{P, U128PrimeField};

type Fq = U128PrimeField<P>;

fn test_fri(domain_length: usize, expansion_factor: usize, num_colinearity_tests: usize) -> Fri {
    let offset = Fp::generator();
    let omega = Fp::primitive_nth_root(domain_length as u128).unwrap();
    Fri::new(offset, omega, domain_length, expansion_factor, num_colinearity_tests).unwrap()
}

fn low_degree_codeword(fri: &Fri, degree: usize) -> Vec<Fp> {
    let coefficients: Vec<Fp> = (0..=degree).map(|i| Fp::from_u128((i as u128) * 3 + 1)).collect();
    let poly = Polynomial::new(coefficients);
    poly.evaluate_domain(&fri.eval_domain())
}

#[test]
fn end_to_end_accepts_a_genuine_low_degree_codeword() {
    let fri = test_fri(64, 4, 4);
    let codeword = low_degree_codeword(&fri, 15);

    let mut transcript = Transcript::new();
    fri.prove(codeword, &mut transcript).unwrap();

    assert!(fri.verify(&mut transcript));
}

#[test]
fn end_to_end_rejects_a_single_corrupted_evaluation() {
    let fri = test_fri(64, 4, 4);
    let mut codeword = low_degree_codeword(&fri, 15);
    codeword[10] = codeword[10] + Fp::one();

    let mut transcript = Transcript::new();
    fri.prove(codeword, &mut transcript).unwrap();

    assert!(!fri.verify(&mut transcript));
}

#[test]
fn end_to_end_rejects_a_truncated_transcript() {
    let fri = test_fri(64, 4, 4);
    let codeword = low_degree_codeword(&fri, 15);

    let mut transcript = Transcript::new();
    fri.prove(codeword, &mut transcript).unwrap();

    let mut empty = Transcript::new();
    assert!(!fri.verify(&mut empty));
}

#[test]
fn field_round_trips_through_inversion() {
    let a = Fp::from_u128(2024);
    assert_eq!(a * a.inv().unwrap(), Fp::one());
}

#[test]
fn interpolation_reproduces_sample_points() {
    let domain = vec![Fp::from_u128(1), Fp::from_u128(2), Fp::from_u128(3), Fp::from_u128(4)];
    let values = vec![Fp::from_u128(1), Fp::from_u128(8), Fp::from_u128(27), Fp::from_u128(64)];
    let poly = Polynomial::interpolate_domain(&domain, &values).unwrap();
    for (x, y) in domain.iter().zip(values.iter()) {
        assert_eq!(poly.evaluate(*x), *y);
    }
}

#[test]
fn sixteen_leaf_merkle_tree_opens_and_verifies() {
    let data: Vec<Vec<u8>> = (0..16u8).map(|i| vec![i]).collect();
    let root = merkle::commit::<Sha3Hasher>(&data).unwrap();
    for i in 0..data.len() {
        let path = merkle::open::<Sha3Hasher>(i, &data).unwrap();
        assert!(merkle::verify::<Sha3Hasher>(&root, i, &path, &data[i]));
    }
}

#[test]
fn colinearity_distinguishes_lines_from_curves() {
    let on_a_line = [
        (Fp::from_u128(0), Fp::from_u128(2)),
        (Fp::from_u128(1), Fp::from_u128(5)),
        (Fp::from_u128(2), Fp::from_u128(8)),
    ];
    assert!(Polynomial::<Fq>::test_colinearity(&on_a_line).unwrap());

    let not_on_a_line = [
        (Fp::from_u128(0), Fp::from_u128(2)),
        (Fp::from_u128(1), Fp::from_u128(5)),
        (Fp::from_u128(2), Fp::from_u128(9)),
    ];
    assert!(!Polynomial::<Fq>::test_colinearity(&not_on_a_line).unwrap());
}
