use paratask::workload::{merge_widths, parallel_merge_sort, scrambled};
use paratask_test_utils::init_tracing;

fn is_sorted(values: &[i64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

#[test]
fn sorts_power_of_two_input() {
    init_tracing();

    let data = scrambled(1 << 12, 7);
    let mut expected = data.clone();
    expected.sort_unstable();

    let sorted = parallel_merge_sort(8, data).unwrap();
    assert_eq!(sorted, expected);
}

#[test]
fn sorts_lengths_that_do_not_divide_evenly() {
    for (len, workers) in [(1, 4), (2, 3), (7, 4), (1000, 3), (1023, 16), (5, 8)] {
        let data = scrambled(len, len as u64 + 1);
        let sorted = parallel_merge_sort(workers, data.clone()).unwrap();
        assert!(is_sorted(&sorted), "len={len} workers={workers}");

        let mut expected = data;
        expected.sort_unstable();
        assert_eq!(sorted, expected, "len={len} workers={workers}");
    }
}

#[test]
fn empty_input_is_fine() {
    assert!(parallel_merge_sort(4, Vec::new()).unwrap().is_empty());
}

#[test]
fn same_input_gives_same_result_on_fresh_schedulers() {
    let data = scrambled(5000, 99);
    let first = parallel_merge_sort(4, data.clone()).unwrap();
    let second = parallel_merge_sort(4, data).unwrap();
    assert_eq!(first, second);
}

#[test]
fn merge_levels_double_until_they_cover_the_input() {
    assert_eq!(merge_widths(16, 4), vec![4, 8]);
    assert_eq!(merge_widths(17, 4), vec![4, 8, 16]);
    assert!(merge_widths(4, 4).is_empty());
    assert!(merge_widths(0, 1).is_empty());
}

#[test]
fn zero_workers_is_an_error() {
    assert!(parallel_merge_sort(0, vec![3, 2, 1]).is_err());
}
