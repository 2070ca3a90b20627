//! Performance benchmarks for the payroll engine.
//!
//! This benchmark suite covers:
//! - Salary component calculation for a single employee
//! - Parameter resolution against a company's parameter history
//! - Generation runs of 100 and 1000 employees, including the commit
//! - Compliance checks over a generated period
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::analytics::check_compliance;
use payroll_engine::calculation::{calculate_salary_components, resolve_pay_parameter};
use payroll_engine::config::{ConfigLoader, EngineSettings};
use payroll_engine::directory::{InMemoryDirectory, PayParameterSource};
use payroll_engine::generation::{GenerationFilter, PayrollCoordinator};
use payroll_engine::models::{Employee, EmployeeType, PayParameter, PayPeriod};
use payroll_engine::notification::LogNotifier;
use payroll_engine::policy::StaticPolicy;
use payroll_engine::store::InMemoryPayrollStore;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn april() -> PayPeriod {
    PayPeriod::new(4, 2025).unwrap()
}

/// Loads the bundled company 1 parameter sets.
fn bundled_parameters() -> Vec<PayParameter> {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    config.parameters().parameters(1)
}

/// Creates `count` active employees of company 1 across all configured types.
fn create_employees(count: u64) -> Vec<Employee> {
    let types = [
        EmployeeType::Permanent,
        EmployeeType::Contract,
        EmployeeType::Intern,
        EmployeeType::Consultant,
    ];
    (1..=count)
        .map(|id| Employee {
            id,
            company_id: 1,
            employee_code: format!("BENCH-{:05}", id),
            name: format!("Employee {}", id),
            email: None,
            role: "EMPLOYEE".to_string(),
            employee_type: types[(id % 4) as usize],
            department_id: 10 + (id % 2) * 10,
            designation_id: 100,
            basic_salary: Decimal::from(10_000 + (id % 40) * 500),
            is_active: true,
        })
        .collect()
}

/// Creates a coordinator with a fresh store over `employees`.
fn create_coordinator(employees: Vec<Employee>) -> PayrollCoordinator {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    let (settings, registry, _) = config.into_parts();
    PayrollCoordinator::new(
        Arc::new(InMemoryDirectory::with_employees(employees)),
        Arc::new(registry),
        Arc::new(InMemoryPayrollStore::new()),
        Arc::new(StaticPolicy::allow_all()),
        Arc::new(LogNotifier),
        settings,
    )
}

/// Benchmark: component calculation for one employee.
fn bench_single_calculation(c: &mut Criterion) {
    let parameters = bundled_parameters();
    let parameter = resolve_pay_parameter(
        &parameters,
        1,
        EmployeeType::Permanent,
        Some(20),
        None,
        NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
    )
    .expect("bundled PERMANENT set")
    .clone();

    c.bench_function("single_calculation", |b| {
        b.iter(|| {
            calculate_salary_components(
                black_box(dec("15000")),
                black_box(&parameter),
                EmployeeType::Permanent,
                black_box(dec("2")),
            )
        })
    });
}

/// Benchmark: most-specific-scope resolution.
fn bench_resolution(c: &mut Criterion) {
    let parameters = bundled_parameters();
    let as_of = NaiveDate::from_ymd_opt(2025, 8, 31).unwrap();

    c.bench_function("resolve_pay_parameter", |b| {
        b.iter(|| {
            resolve_pay_parameter(
                black_box(&parameters),
                1,
                EmployeeType::Permanent,
                Some(20),
                Some(200),
                as_of,
            )
        })
    });
}

/// Benchmark: whole generation runs, including the batch commit.
fn bench_generation(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("generation");

    for count in [100u64, 1000] {
        group.throughput(Throughput::Elements(count));
        if count >= 1000 {
            group.sample_size(10);
        }
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.to_async(&rt).iter_batched(
                || create_coordinator(create_employees(count)),
                |coordinator| async move {
                    coordinator
                        .generate(1, april(), &GenerationFilter::default())
                        .await
                        .unwrap()
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark: compliance checks over 1000 generated records.
fn bench_compliance(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let coordinator = create_coordinator(create_employees(1000));
    let outcome = rt
        .block_on(coordinator.generate(1, april(), &GenerationFilter::default()))
        .unwrap();
    let parameters = bundled_parameters();
    let settings = EngineSettings::default();

    let mut group = c.benchmark_group("analytics");
    group.throughput(Throughput::Elements(outcome.created.len() as u64));
    group.bench_function("compliance_1000", |b| {
        b.iter(|| {
            check_compliance(
                april(),
                black_box(&outcome.created),
                black_box(&parameters),
                &settings,
            )
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_single_calculation,
    bench_resolution,
    bench_generation,
    bench_compliance
);
criterion_main!(benches);

