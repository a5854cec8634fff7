use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pbratu_rs::discretization::field::Field2d;
use pbratu_rs::discretization::grid::Grid2d;
use pbratu_rs::numerics::sparse::{StencilMatrix, StencilShape};
use pbratu_rs::physics::autodiff::assemble_jacobian_ad;
use pbratu_rs::physics::jacobian::{assemble_jacobian, JacobianType};
use pbratu_rs::physics::pbratu::{PBratu, PBratuParams};
use pbratu_rs::physics::residual::calculate_residual;
use pbratu_rs::physics::StencilProblem;

fn grid_sizes() -> Vec<usize> {
    vec![32, 64]
}

fn setup(m: usize) -> (Grid2d, PBratuParams, Field2d) {
    let grid = Grid2d::new(m, m);
    let par = PBratuParams {
        p: 3.0,
        ..PBratuParams::default()
    };
    let u = PBratu::new(par).initial_condition(&grid);
    (grid, par, u)
}

fn bench_residual(c: &mut Criterion) {
    let mut group = c.benchmark_group("residual");
    for &m in &grid_sizes() {
        let (grid, par, u) = setup(m);
        let mut f = Field2d::zeros(&grid);
        group.bench_with_input(BenchmarkId::from_parameter(m), &m, |b, &_| {
            b.iter(|| {
                calculate_residual(&par, &grid, &grid.owned(), &u, &mut f);
                std::hint::black_box(&f);
            });
        });
    }
    group.finish();
}

fn bench_analytic_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytic_jacobian");
    let (grid, par, u) = setup(64);
    for jtype in [
        JacobianType::Laplacian,
        JacobianType::Picard,
        JacobianType::NewtonStar,
        JacobianType::NewtonBox,
    ] {
        let mut mat = StencilMatrix::new(&grid, StencilShape::Box);
        group.bench_with_input(
            BenchmarkId::from_parameter(jtype.index()),
            &jtype,
            |b, &jtype| {
                b.iter(|| {
                    mat.reset();
                    assemble_jacobian(&par, jtype, &grid, &grid.owned(), &u, &mut mat).unwrap();
                    std::hint::black_box(&mat);
                });
            },
        );
    }
    group.finish();
}

fn bench_autodiff_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("autodiff_jacobian");
    for &m in &grid_sizes() {
        let (grid, par, u) = setup(m);
        let mut mat = StencilMatrix::new(&grid, StencilShape::Box);
        group.bench_with_input(BenchmarkId::from_parameter(m), &m, |b, &_| {
            b.iter(|| {
                mat.reset();
                assemble_jacobian_ad(&par, &grid, &grid.owned(), &u, &mut mat).unwrap();
                std::hint::black_box(&mat);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_residual,
    bench_analytic_jacobian,
    bench_autodiff_jacobian
);
criterion_main!(benches);
