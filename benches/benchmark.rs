use criterion::{criterion_group, criterion_main, Criterion};
use kernels::{
    gappy_pair_kernel, gappy_pair_kernel_trie, preprocess, GappyParams, Layout, MismatchKernel,
    MotifTrie, SequenceInput,
};

const SEQUENCES: [&str; 4] = [
    "ACGTCGATGCTAGCTAGGATCGATCGATGCAtgcatgcaTCGATCGATGCTAGCTAGCTAGCAGTCGATCGAT",
    "GTCGATAGCTAGCTAGCTAGGGATCGATCGATCGATGCATGCTAGCTAGCTAGCGGATCGACTAGCTAGCTAG",
    "TTGACGGCATTAGCAGCTAGCTAGCTAGCTGATCGATCGTAGCTAGCTAGCTAGCTAGCTAGTCGATCGATCG",
    "CATCATCAGCTAGCTAGCATCGATCGATCGTAGCTAGCTAGCTAGCTAGCTAGCTAGATCGATCGATGCATGC",
];

fn criterion_benchmark(c: &mut Criterion) {
    let trie = MotifTrie::new(&["A[CG]T", "C.G", "C..G.T", "G[^A][AT]", "GT.A[CA].[CT]G"]);
    let seq = SEQUENCES[0].to_ascii_uppercase();
    c.bench_function("motif scan", |b| b.iter(|| trie.scan(seq.as_bytes())));

    let params = GappyParams::new(2, Default::default()).gap(3);
    c.bench_function("gappy pair direct", |b| {
        b.iter(|| gappy_pair_kernel(SequenceInput::raw(&SEQUENCES), &params, Layout::Sparse))
    });
    c.bench_function("gappy pair trie", |b| {
        b.iter(|| gappy_pair_kernel_trie(SequenceInput::raw(&SEQUENCES), &params, Layout::Sparse))
    });

    if let Ok(coding) = preprocess(&SEQUENCES, true) {
        if let Ok(kernel) = MismatchKernel::new(coding.alphabet_size(), 5, 1) {
            c.bench_function("mismatch k5 m1", |b| {
                b.iter(|| kernel.compute(&coding.sequences, true))
            });
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
