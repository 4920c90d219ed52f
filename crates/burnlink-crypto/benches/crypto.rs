use burnlink_crypto::{decrypt, encrypt, generate_key};

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_encrypt(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| encrypt(divan::black_box(&data), divan::black_box(&key)).unwrap());
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_decrypt(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let data = make_data(size);
    let envelope = encrypt(&data, &key).unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| decrypt(divan::black_box(&envelope), divan::black_box(&key)).unwrap());
}

#[divan::bench(args = [65536])]
fn bench_envelope_text(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let envelope = encrypt(&make_data(size), &key).unwrap();
    bencher.bench(|| divan::black_box(&envelope).to_text());
}

fn main() {
    divan::main();
}
