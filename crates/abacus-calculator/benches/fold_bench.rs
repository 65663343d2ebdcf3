use abacus_calculator::{Calculator, Number, SimpleCalculator};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn generate_operands(count: usize) -> Vec<Number> {
    (0..count)
        .map(|i| if i % 2 == 0 { Number::Integer(i as i64 + 1) } else { Number::Float(i as f64 * 0.5) })
        .collect()
}

fn bench_variadic_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("variadic_fold");
    let calculator = SimpleCalculator::new();

    for size in [2, 16, 256].iter() {
        let operands = generate_operands(*size);
        for operator in ["+", "*", "/"] {
            group.bench_with_input(BenchmarkId::new(operator, size), &operands, |b, operands| {
                b.iter(|| black_box(calculator.calculate(operator, black_box(operands))))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_variadic_fold);
criterion_main!(benches);
