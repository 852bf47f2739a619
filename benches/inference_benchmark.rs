use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hoomd_reader::prelude::*;

// Linear chains of `len` particles followed by `n_free` unbonded particles
fn make_storage(n_chains: usize, len: usize, n_free: usize) -> SystemStorage {
    let n = n_chains * len + n_free;
    let types: Vec<String> = (0..n)
        .map(|i| {
            if i >= n_chains * len {
                "W".to_owned()
            } else if i % len == 0 || i % len == len - 1 {
                "CH3".to_owned()
            } else {
                "CH2".to_owned()
            }
        })
        .collect();

    let mut st = SystemStorage {
        positions: (0..n).map(|i| Pos::new(i as f32 * 0.1, 0.0, 0.0)).collect(),
        masses: vec![1.0; n],
        charges: vec![0.0; n],
        ..Default::default()
    };
    for c in 0..n_chains {
        for k in 0..len - 1 {
            let i = c * len + k;
            st.bonds.push(Bond::from_types([i, i + 1], &types));
        }
    }
    st.types = types;
    st
}

fn inference(c: &mut Criterion) {
    let opts = LoadOptions::default();
    let st = make_storage(1000, 20, 20000);

    c.bench_function("identify 1000 chains + 20000 free", |b| {
        b.iter(|| ParticleSystem::from_storage(black_box(st.clone()), &opts).unwrap())
    });

    let st = make_storage(10, 5000, 0);
    c.bench_function("identify 10 long chains", |b| {
        b.iter(|| ParticleSystem::from_storage(black_box(st.clone()), &opts).unwrap())
    });
}

criterion_group!(benches, inference);
criterion_main!(benches);
