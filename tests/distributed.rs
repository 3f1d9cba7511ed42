use approx::assert_relative_eq;

use mpi_matmul::checksum::checksum;
use mpi_matmul::config::Settings;
use mpi_matmul::error::{ConfigError, Error};
use mpi_matmul::matrix::{self, Fill, SquareMatrix};
use mpi_matmul::run_local;

fn sequential(order: usize, fill: Fill) -> SquareMatrix {
    let (a, b) = matrix::generate_inputs(order, fill);
    SquareMatrix::from_vec(order, matrix::multiply(a.as_slice(), b.as_slice(), order)).unwrap()
}

#[test]
fn four_by_four_on_a_single_participant() {
    let (c, report) = run_local(1, &Settings::new(4)).unwrap();

    assert_eq!(c.get(0, 0), 14.);
    assert_eq!(report.rows, vec![4]);
    assert_eq!(c, sequential(4, Fill::Indexed));
}

#[test]
fn distributed_product_equals_sequential_product() {
    for (order, participants) in [(6, 4), (8, 4), (10, 3), (17, 5), (5, 2), (32, 7)] {
        let (c, report) = run_local(participants, &Settings::new(order)).unwrap();
        let expected = sequential(order, Fill::Indexed);

        assert_eq!(report.participants, participants);
        assert_eq!(report.rows.iter().sum::<usize>(), order);
        for (got, want) in c.as_slice().iter().zip(expected.as_slice()) {
            assert_relative_eq!(*got, *want, max_relative = 1e-12);
        }
        assert_eq!(report.checksums.c, checksum(expected.as_slice()), "N={order} P={participants}");
    }
}

#[test]
fn remainder_rows_land_in_the_last_block() {
    let (c, report) = run_local(4, &Settings::new(6)).unwrap();
    assert_eq!(report.rows, vec![1, 1, 1, 3]);

    let expected = sequential(6, Fill::Indexed);
    assert_eq!(c.rows(3, 3), expected.rows(3, 3));
    assert_eq!(c, expected);
}

#[test]
fn small_order_stays_on_the_root() {
    let (c, report) = run_local(5, &Settings::new(3)).unwrap();
    assert_eq!(report.rows, vec![3, 0, 0, 0, 0]);
    assert_eq!(c, sequential(3, Fill::Indexed));
}

#[test]
fn random_inputs_verify_against_sequential() {
    let mut settings = Settings::new(20);
    settings.fill = Fill::Random { seed: 42 };
    settings.verify = true;

    let (c, report) = run_local(3, &settings).unwrap();
    let verification = report.verification.unwrap();
    assert!(verification.matches);
    assert!(verification.checksum_matches);

    for (got, want) in c.as_slice().iter().zip(sequential(20, settings.fill).as_slice()) {
        assert_relative_eq!(*got, *want, max_relative = 1e-12);
    }
}

#[test]
fn runs_are_reproducible() {
    let (_, first) = run_local(3, &Settings::new(9)).unwrap();
    let (_, second) = run_local(2, &Settings::new(9)).unwrap();

    assert_eq!(first.checksums, second.checksums);
}

#[test]
fn empty_group_is_rejected() {
    assert!(matches!(
        run_local(0, &Settings::new(4)),
        Err(Error::Config(ConfigError::NoParticipants))
    ));
}
