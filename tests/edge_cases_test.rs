//! Edge case tests for the parse → validate → filter → aggregate pipeline.

use sales_analytics::{
    parse_transactions, read_lines, region_wise_sales, top_products, total_revenue,
    validate_and_filter, FilterCriteria, FilterOutcome, Money, RegionKey, SalesError,
    TextEncoding, DEFAULT_ENCODINGS,
};
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;
use tempfile::NamedTempFile;

fn run(lines: &[&str], criteria: &FilterCriteria) -> FilterOutcome {
    let parsed = parse_transactions(lines);
    validate_and_filter(&parsed.records, criteria)
}

fn money(s: &str) -> Money {
    Money::from_str(s).unwrap()
}

fn ids(outcome: &FilterOutcome) -> Vec<&str> {
    outcome
        .transactions
        .iter()
        .map(|tx| tx.transaction_id.as_str())
        .collect()
}

const MIXED: &[&str] = &[
    "T001|2024-12-01|P101|Laptop|2|45,000|C001|North",
    "T002|2024-12-01|P102|Mouse|38|500|C002|South",
    "T003|2024-12-02|P103|Monitor|1|12,000|C003|North",
    "t004|2024-12-02|P104|Keyboard|1|1,500|C004|East",
    "T005|2024-12-03|p105|Webcam|1|3,000|C005|West",
    "T006|2024-12-03|P106|Chair|1|4,000|c006|West",
    "T007|2024-12-04|P107|Desk|-2|8,000|C007|East",
    "T008|2024-12-04|P108|Lamp|2|-800|C008|South",
    "T009|2024-12-05||Pen|2|10|C009|South",
    "T010|2024-12-05|P110|Tablet|3|20,000|C010|East",
    "T011|2024-12-06|P111|Stand|5|700|C011|West",
];

// ==================== SPEC EXAMPLES ====================

#[test]
fn test_total_revenue_example() {
    let outcome = run(
        &[
            "T001|2024-12-01|P101|Laptop|2|45,000|C001|North",
            "T002|2024-12-01|P102|Mouse|38|500|C002|South",
        ],
        &FilterCriteria::new(),
    );
    assert_eq!(total_revenue(&outcome.transactions).to_string(), "109000.00");
}

#[test]
fn test_region_and_min_amount_example() {
    let outcome = run(
        &[
            "T001|2024-12-01|P101|Laptop|2|45,000|C001|North",
            "T002|2024-12-01|P102|Mouse|38|500|C002|South",
        ],
        &FilterCriteria::new().region("North").min_amount(money("1000")),
    );
    assert_eq!(ids(&outcome), vec!["T001"]);
    assert_eq!(outcome.summary.filtered_out_region_count, 1);
    assert_eq!(outcome.summary.filtered_out_min_amt_count, 0);
    assert_eq!(outcome.summary.final_count, 1);
}

#[test]
fn test_non_numeric_quantity_never_reaches_validation() {
    let outcome = run(
        &[
            "T001|2024-12-01|P101|Laptop|two|45,000|C001|North",
            "T002|2024-12-01|P102|Mouse|38|500|C002|South",
        ],
        &FilterCriteria::new(),
    );
    assert_eq!(outcome.summary.total_input, 1);
    assert_eq!(outcome.invalid, 0);
    assert_eq!(ids(&outcome), vec!["T002"]);
}

// ==================== VALIDATION ====================

#[test]
fn test_every_rule_rejects() {
    let outcome = run(MIXED, &FilterCriteria::new());
    // t004 lowercase, p105, c006, qty -2, price -800, empty product ID
    assert_eq!(outcome.invalid, 6);
    assert_eq!(ids(&outcome), vec!["T001", "T002", "T003", "T010", "T011"]);
}

#[test]
fn test_valid_transactions_hold_invariants() {
    let outcome = run(MIXED, &FilterCriteria::new());
    for tx in &outcome.transactions {
        assert!(tx.quantity > 0);
        assert!(tx.unit_price.is_positive());
        assert!(tx.transaction_id.starts_with('T'));
        assert!(tx.product_id.starts_with('P'));
        assert!(tx.customer_id.starts_with('C'));
        assert!(!tx.region.is_empty());
    }
}

#[test]
fn test_summary_accounting() {
    let criteria_sets = [
        FilterCriteria::new(),
        FilterCriteria::new().region("West"),
        FilterCriteria::new().min_amount(money("5000")),
        FilterCriteria::new().max_amount(money("20000")),
        FilterCriteria::new()
            .region("East")
            .min_amount(money("100"))
            .max_amount(money("100000")),
    ];

    for criteria in &criteria_sets {
        let s = run(MIXED, criteria).summary;
        assert_eq!(s.total_input, 11);
        assert_eq!(s.invalid, 6);
        assert!(s.final_count <= s.total_input - s.invalid);
        assert_eq!(
            s.final_count,
            s.valid()
                - s.filtered_out_region_count
                - s.filtered_out_min_amt_count
                - s.filtered_out_max_amt_count
        );
    }
}

#[test]
fn test_thousands_separator_in_quantity() {
    let outcome = run(
        &["T001|2024-12-01|P101|Cable|1,200|5|C001|North"],
        &FilterCriteria::new(),
    );
    assert_eq!(outcome.transactions[0].quantity, 1200);
    assert_eq!(total_revenue(&outcome.transactions).to_string(), "6000.00");
}

#[test]
fn test_fractional_quantity_is_dropped_by_parser() {
    let parsed = parse_transactions(&["T001|2024-12-01|P101|Cable|1.5|5|C001|North"]);
    assert!(parsed.records.is_empty());
    assert_eq!(parsed.non_numeric, 1);
}

#[test]
fn test_huge_amount_is_counted_invalid() {
    let outcome = run(
        &[
            "T001|2024-12-01|P101|Bulk|9,000,000,000,000,000,000|100,000,000,000|C001|North",
            "T002|2024-12-01|P102|Mouse|38|500|C002|South",
        ],
        &FilterCriteria::new().min_amount(money("1")),
    );
    assert_eq!(outcome.invalid, 1);
    assert_eq!(ids(&outcome), vec!["T002"]);
    assert_eq!(total_revenue(&outcome.transactions).to_string(), "19000.00");
}

#[test]
fn test_huge_quantities_do_not_wrap() {
    let outcome = run(
        &[
            "T001|2024-12-01|P101|Pen|9000000000000000000|1|C001|North",
            "T002|2024-12-01|P101|Pen|9000000000000000000|1|C002|North",
            "T003|2024-12-01|P102|Ink|1|1|C003|North",
        ],
        &FilterCriteria::new(),
    );
    assert_eq!(outcome.transactions.len(), 3);
    let top = top_products(&outcome.transactions, 5);
    assert_eq!(top[0].product_name, "Pen");
    assert_eq!(top[0].total_quantity, i64::MAX);
}

#[test]
fn test_malformed_line_is_counted_not_fatal() {
    let parsed = parse_transactions(&[
        "T001|2024-12-01|P101|Laptop|2|45,000|C001",
        "T002|2024-12-01|P102|Mouse|38|500|C002|South",
        "garbage",
    ]);
    assert_eq!(parsed.malformed, 2);
    assert_eq!(parsed.records.len(), 1);
}

// ==================== FILTERS ====================

#[test]
fn test_min_count_is_relative_to_region_output() {
    // T002 (South, 19000) and T011 (West, 3500) never reach the min filter.
    let outcome = run(
        MIXED,
        &FilterCriteria::new().region("North").min_amount(money("50000")),
    );
    assert_eq!(outcome.summary.filtered_out_region_count, 3);
    assert_eq!(outcome.summary.filtered_out_min_amt_count, 1);
    assert_eq!(ids(&outcome), vec!["T001"]);
}

#[test]
fn test_unknown_filter_region_removes_everything() {
    let outcome = run(MIXED, &FilterCriteria::new().region("Central"));
    assert!(outcome.transactions.is_empty());
    assert_eq!(outcome.summary.filtered_out_region_count, 5);
}

#[test]
fn test_min_above_max_leaves_nothing() {
    let outcome = run(
        MIXED,
        &FilterCriteria::new()
            .min_amount(money("20000"))
            .max_amount(money("10000")),
    );
    assert!(outcome.transactions.is_empty());
    assert_eq!(outcome.summary.filtered_out_min_amt_count, 3);
    assert_eq!(outcome.summary.filtered_out_max_amt_count, 2);
}

// ==================== AGGREGATION ====================

#[test]
fn test_region_percentages_sum_to_hundred() {
    let outcome = run(MIXED, &FilterCriteria::new());
    let total: Decimal = region_wise_sales(&outcome.transactions)
        .iter()
        .map(|r| r.percentage)
        .sum();
    assert!((total - Decimal::ONE_HUNDRED).abs() <= Decimal::from_str("0.01").unwrap());
}

#[test]
fn test_unrecognized_region_is_bucketed() {
    let outcome = run(
        &[
            "T001|2024-12-01|P101|Laptop|1|100|C001|North",
            "T002|2024-12-01|P102|Mouse|1|100|C002|Central",
        ],
        &FilterCriteria::new(),
    );
    let stats = region_wise_sales(&outcome.transactions);
    let other = stats.iter().find(|r| r.region == RegionKey::Other).unwrap();
    assert_eq!(other.transaction_count, 1);
    assert_eq!(other.percentage.to_string(), "50.00");
}

#[test]
fn test_top_n_returns_everything_when_n_is_large() {
    let outcome = run(MIXED, &FilterCriteria::new());
    let top = top_products(&outcome.transactions, 100);
    assert_eq!(top.len(), 5);
    assert!(top
        .windows(2)
        .all(|w| w[0].total_quantity >= w[1].total_quantity));
    assert_eq!(top_products(&outcome.transactions, 5), top);
}

#[test]
fn test_aggregation_does_not_mutate_input() {
    let outcome = run(MIXED, &FilterCriteria::new());
    let before = outcome.transactions.clone();
    let _ = total_revenue(&outcome.transactions);
    let _ = region_wise_sales(&outcome.transactions);
    let _ = top_products(&outcome.transactions, 3);
    assert_eq!(outcome.transactions, before);
}

// ==================== ROUND TRIP ====================

#[test]
fn test_parsed_fields_round_trip() {
    let lines = [
        "T001|2024-12-01|P101|Laptop|2|45,000|C001|North",
        "T002|2024-12-01|P102|Mouse|38|500|C002|South",
    ];
    let parsed = parse_transactions(&lines);
    let rebuilt: Vec<String> = parsed.records.iter().map(|r| r.to_line()).collect();
    assert_eq!(rebuilt, lines);
}

// ==================== FILE READING ====================

#[test]
fn test_read_then_process_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region\r\n\
         T001|2024-12-01|P101|Laptop|2|45,000|C001|North\r\n\
         \r\n\
         \t \r\n\
         T002|2024-12-01|P102|Mouse|38|500|C002|South\r\n"
    )
    .unwrap();

    let lines = read_lines(file.path(), &DEFAULT_ENCODINGS).unwrap();
    assert_eq!(lines.len(), 2);

    let outcome = run(
        &lines.iter().map(String::as_str).collect::<Vec<_>>(),
        &FilterCriteria::new(),
    );
    assert_eq!(total_revenue(&outcome.transactions).to_string(), "109000.00");
}

#[test]
fn test_no_encoding_candidates() {
    let file = NamedTempFile::new().unwrap();
    let err = read_lines(file.path(), &[]).unwrap_err();
    assert!(matches!(err, SalesError::Decode { .. }));
}

#[test]
fn test_cp1252_only() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"header\nT001|2024-12-01|P101|\x93Pro\x94 Pen|1|10|C001|North\n")
        .unwrap();
    let lines = read_lines(file.path(), &[TextEncoding::Windows1252]).unwrap();
    assert_eq!(lines[0], "T001|2024-12-01|P101|\u{201c}Pro\u{201d} Pen|1|10|C001|North");
}
