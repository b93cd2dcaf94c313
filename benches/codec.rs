use aamp::io::reader::decode;
use aamp::io::writer::write;
use aamp::{Crc32, Parameter, ParameterIO, ParameterList, ParameterObject};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_tree(num_objects: usize, params_per_object: usize) -> ParameterIO {
    let mut root = ParameterList::new(Crc32::new(0));
    for i in 0..num_objects {
        let mut obj = ParameterObject::new(Crc32::hash(&format!("Object{i}")));
        for j in 0..params_per_object {
            obj.set_param(&format!("Param{j}"), Parameter::F32(j as f32 * 0.5));
        }
        root.set_object(&format!("Object{i}"), obj);
    }
    ParameterIO::with_root("xml", 0, Crc32::new(0), root)
}

fn bench_encode(c: &mut Criterion) {
    let pio = synthetic_tree(200, 20);
    c.bench_function("encode_mid_sized_tree", |b| {
        b.iter(|| write(black_box(&pio)).unwrap());
    });
}

fn bench_decode(c: &mut Criterion) {
    let pio = synthetic_tree(200, 20);
    let bytes = write(&pio).unwrap();
    c.bench_function("decode_mid_sized_tree", |b| {
        b.iter(|| decode(black_box(&bytes)).unwrap());
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
