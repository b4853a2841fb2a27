use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rs_hmm_core::model::generation_input::GenerationInput;
use rs_hmm_core::model::hmm::{FirstOrderHmm, Sequencer};

fn random_obs(rng: &mut StdRng, len: usize, vocab: usize) -> Vec<usize> {
	(0..len).map(|_| rng.random_range(0..vocab)).collect()
}

fn demo_hmm() -> FirstOrderHmm {
	FirstOrderHmm::new(
		vec![0.5, 0.5],
		vec![vec![0.9, 0.1], vec![0.2, 0.8]],
		vec![vec![0.8, 0.2], vec![0.3, 0.7]],
	)
	.unwrap()
}

fn bench_viterbi(c: &mut Criterion) {
	let model = demo_hmm();
	let mut group = c.benchmark_group("viterbi");
	for &len in &[1_000usize, 10_000] {
		group.bench_function(format!("decode_len_{len}"), |b| {
			b.iter_batched(
				|| {
					let mut rng = StdRng::seed_from_u64(44);
					random_obs(&mut rng, len, 2)
				},
				|obs| criterion::black_box(model.decode(&obs).unwrap()),
				BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

fn bench_generate_and_train(c: &mut Criterion) {
	let model = demo_hmm();
	let input = GenerationInput::new(10, 50, 1_000).unwrap();

	c.bench_function("generate_batch_1000", |b| {
		let mut rng = StdRng::seed_from_u64(7);
		b.iter(|| criterion::black_box(model.generate_batch(&input, &mut rng).unwrap()))
	});

	let samples = model.generate_batch(&input, &mut StdRng::seed_from_u64(8)).unwrap();
	c.bench_function("train_1000", |b| {
		b.iter(|| {
			let mut trained = FirstOrderHmm::empty();
			trained.train(&samples).unwrap();
			criterion::black_box(trained)
		})
	});
}

criterion_group!(benches, bench_viterbi, bench_generate_and_train);
criterion_main!(benches);
