use criterion::{criterion_group, criterion_main, Criterion};
use mopro_bridge::proof::{decode, decode_with, encode};
use mopro_bridge::{DecodePolicy, Proof, ProofResult, G1, G2};

fn sample(inputs: usize) -> ProofResult {
    let felt = "21888242871839275222246405745257275088548364400416034343698204186575808495616";
    ProofResult::new(
        Proof {
            a: G1::new(felt, felt, "1"),
            b: G2::from_strs([felt, felt], [felt, felt], ["1", "0"]),
            c: G1::new(felt, felt, "1"),
            protocol: "groth16".into(),
            curve: "bn128".into(),
        },
        (0..inputs).map(|i| i.to_string()).collect(),
    )
}

fn bench_codec(c: &mut Criterion) {
    let small = sample(2);
    let large = sample(256);
    let small_wire = encode(&small);
    let large_wire = encode(&large);

    c.bench_function("encode_2_inputs", |b| b.iter(|| encode(&small)));

    c.bench_function("encode_256_inputs", |b| b.iter(|| encode(&large)));

    c.bench_function("decode_2_inputs", |b| b.iter(|| decode(&small_wire)));

    c.bench_function("decode_256_inputs_strict", |b| {
        b.iter(|| decode_with(&large_wire, DecodePolicy::Strict))
    });

    c.bench_function("fingerprint_2_inputs", |b| b.iter(|| small.fingerprint()));
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
