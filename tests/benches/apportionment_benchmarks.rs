//! # Apura Hot-Path Benchmarks
//!
//! Performance validation for the per-pass computation stages:
//!
//! | Stage | Claim | Target |
//! |-------|-------|--------|
//! | ap-02 ICMS apportionment | linear in items | < 1ms per 1k items |
//! | ap-03 PROTEGE dual-track | linear in items | < 1ms per 1k items |
//! | ap-01 lane classification | byte probe, no parse | < 1μs per file |
//! | ap-01 path inference | segment walk | < 1μs per path |
//! | ap-04 credit key encode | allocation only | < 1μs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::path::Path;
use std::time::Duration;

use ap_01_source_scanner::{classify, infer_from_path, ScannerConfig};
use ap_02_icms_engine::apportion;
use ap_03_protege_engine::compute;
use ap_04_period_ledger::credit_key;
use shared_types::{
    CanonicalLineItem, Period, ProtegeRule, ProtegeTrack, RuleFilter, TaxRule,
};

// ============================================================================
// Shared generators
// ============================================================================

const PRODUCTS: [(&str, &str); 4] = [
    ("CIMENTO CP-II 50KG", "25232910"),
    ("ENERGIA ELETRICA INDUSTRIAL", "27160000"),
    ("ARGAMASSA COLANTE AC-III", "38245000"),
    ("VERGALHAO CA-50 10MM", "72142000"),
];

fn generate_items(count: usize) -> Vec<CanonicalLineItem> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let (description, ncm) = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
            let base = rng.gen_range(100.0..100_000.0_f64);
            CanonicalLineItem {
                document_ref: format!("NF-{}", i),
                transaction_date: "2025-03-10".to_string(),
                company_cnpj: "06354976000141".to_string(),
                product_code: format!("P-{}", i % 1000),
                product_description: description.to_string(),
                ncm: ncm.to_string(),
                cfop: "5102".to_string(),
                cst: "00".to_string(),
                operation_value: base,
                icms_base: base,
                icms_rate: 18.0,
                icms_amount: base * 0.18,
            }
        })
        .collect()
}

/// `count - 1` narrow NCM rules plus a catch-all, so most items scan
/// the whole list.
fn generate_icms_rules(count: usize) -> Vec<TaxRule> {
    let mut rules: Vec<TaxRule> = (0..count.saturating_sub(1))
        .map(|i| TaxRule {
            id: format!("icms-ncm-{}", i),
            priority: i as u32,
            filter: RuleFilter {
                ncm: Some(format!("9{:07}", i)),
                cfop: None,
                cst: None,
            },
            rate: 12.0,
            base_reduction_percent: None,
            benefit: None,
            protege: false,
            difal: false,
            ciap: false,
        })
        .collect();
    rules.push(TaxRule {
        id: "icms-go-padrao".to_string(),
        priority: count as u32,
        filter: RuleFilter::default(),
        rate: 17.0,
        base_reduction_percent: None,
        benefit: None,
        protege: false,
        difal: false,
        ciap: false,
    });
    rules
}

fn protege_rules() -> Vec<ProtegeRule> {
    vec![
        ProtegeRule {
            id: "protege-2-insumos".to_string(),
            priority: 10,
            filter: RuleFilter {
                ncm: Some("25232910".to_string()),
                cfop: None,
                cst: None,
            },
            track: ProtegeTrack::Protege2,
            rate: 2.0,
            benefits: Vec::new(),
            product_keywords: vec!["cimento".to_string(), "argamassa".to_string()],
        },
        ProtegeRule {
            id: "protege-15-geral".to_string(),
            priority: 20,
            filter: RuleFilter::default(),
            track: ProtegeTrack::Protege15,
            rate: 15.0,
            benefits: Vec::new(),
            product_keywords: Vec::new(),
        },
    ]
}

// ============================================================================
// AP-02: ICMS apportionment
// Claim: one linear pass over items, first-match rule scan per item
// ============================================================================

fn bench_icms_apportionment(c: &mut Criterion) {
    let mut group = c.benchmark_group("ap-02-icms-apportionment");
    group.measurement_time(Duration::from_secs(10));

    let rules = generate_icms_rules(10);
    for count in [100, 1_000, 5_000, 10_000] {
        let items = generate_items(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("apportion_batch", count),
            &items,
            |b, items| b.iter(|| black_box(apportion(items, &rules))),
        );
    }

    // Rule-list scan cost at fixed batch size.
    let items = generate_items(1_000);
    for rule_count in [1, 10, 50, 100] {
        let rules = generate_icms_rules(rule_count);

        group.bench_with_input(
            BenchmarkId::new("rule_list_scan", rule_count),
            &rules,
            |b, rules| b.iter(|| black_box(apportion(&items, rules))),
        );
    }

    group.finish();
}

// ============================================================================
// AP-03: PROTEGE dual-track computation
// Claim: one linear pass, keyword probe only on 2%-track candidates
// ============================================================================

fn bench_protege_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("ap-03-protege-compute");
    group.measurement_time(Duration::from_secs(10));

    let rules = protege_rules();
    let period = Period::new(2025, 3).unwrap();

    for count in [100, 1_000, 5_000, 10_000] {
        let items = generate_items(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("dual_track_batch", count),
            &items,
            |b, items| {
                b.iter(|| black_box(compute(items, &rules, "06354976000141", period, 1_000.0)))
            },
        );
    }

    group.finish();
}

// ============================================================================
// AP-01: lane classification and path inference
// Claim: classification is a byte probe; inference walks segments once
// ============================================================================

fn bench_scanner_domain(c: &mut Criterion) {
    let mut group = c.benchmark_group("ap-01-scanner-domain");
    group.measurement_time(Duration::from_secs(10));

    // Worst case for the probe: the marker sits at the end of the
    // buffer.
    let mut sped_tail = vec![b'x'; 4096];
    sped_tail.extend_from_slice(b"|0000|EFD|");
    let generic = vec![b'y'; 4096];

    group.bench_function("classify_sped_marker_at_tail", |b| {
        b.iter(|| black_box(classify("efd_icms.txt", "txt", &sped_tail)))
    });
    group.bench_function("classify_generic_full_scan", |b| {
        b.iter(|| black_box(classify("notas.txt", "txt", &generic)))
    });
    group.bench_function("classify_schedule_by_name", |b| {
        b.iter(|| black_box(classify("guia_protege_go.pdf", "pdf", b"")))
    });

    let config = ScannerConfig::default();
    let path = Path::new("/fiscal/empresa/06354976000141/Exercicio 2025/03/efd_icms.txt");
    group.bench_function("infer_company_and_period", |b| {
        b.iter(|| black_box(infer_from_path(path, &config)))
    });

    group.finish();
}

// ============================================================================
// AP-04: credit key encoding
// ============================================================================

fn bench_ledger_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("ap-04-ledger-keys");

    let period = Period::new(2025, 3).unwrap();
    group.bench_function("credit_key_encode", |b| {
        b.iter(|| black_box(credit_key("06354976000141", period)))
    });
    group.bench_function("period_parse", |b| {
        b.iter(|| black_box(Period::parse("202503")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_icms_apportionment,
    bench_protege_compute,
    bench_scanner_domain,
    bench_ledger_keys,
);

criterion_main!(benches);
