//! Property tests: for every generated parameter tree, encoding then
//! decoding must reproduce the tree exactly, and the encoded bytes must
//! always be 4-byte aligned.

use proptest::prelude::*;

use aamp::types::{BufferF32, BufferInt, Vec3};
use aamp::{decode, write, Crc32, Parameter, ParameterIO, ParameterList, ParameterObject};

fn arb_parameter() -> impl Strategy<Value = Parameter> {
    prop_oneof![
        any::<bool>().prop_map(Parameter::Bool),
        any::<f32>().prop_filter("finite", |f| f.is_finite()).prop_map(Parameter::F32),
        any::<i32>().prop_map(Parameter::Int),
        any::<u32>().prop_map(Parameter::U32),
        (
            any::<f32>().prop_filter("finite", |f| f.is_finite()),
            any::<f32>().prop_filter("finite", |f| f.is_finite()),
            any::<f32>().prop_filter("finite", |f| f.is_finite()),
        )
            .prop_map(|(x, y, z)| Parameter::Vec3(Vec3::new(x, y, z))),
        "[a-zA-Z0-9_]{0,30}".prop_map(Parameter::StringRef),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(|v| Parameter::BufferInt(BufferInt(v))),
        prop::collection::vec(any::<f32>().prop_filter("finite", |f| f.is_finite()), 0..8)
            .prop_map(|v| Parameter::BufferF32(BufferF32(v))),
    ]
}

fn arb_object() -> impl Strategy<Value = ParameterObject> {
    prop::collection::vec(("[a-zA-Z][a-zA-Z0-9_]{0,15}", arb_parameter()), 0..6).prop_map(|params| {
        let mut obj = ParameterObject::new(Crc32::new(0));
        for (name, value) in params {
            obj.set_param(&name, value);
        }
        obj
    })
}

fn arb_tree() -> impl Strategy<Value = ParameterIO> {
    (any::<u32>(), prop::collection::vec(("[a-zA-Z][a-zA-Z0-9_]{0,15}", arb_object()), 0..4)).prop_map(
        |(version, objects)| {
            let mut root = ParameterList::new(Crc32::new(0));
            for (name, obj) in objects {
                root.set_object(&name, obj);
            }
            ParameterIO::with_root("xml", version, Crc32::new(0), root)
        },
    )
}

proptest! {
    #[test]
    fn roundtrips_through_binary_encoding(pio in arb_tree()) {
        let bytes = write(&pio).unwrap();
        let decoded = decode(&bytes).unwrap();
        prop_assert_eq!(decoded, pio);
    }

    #[test]
    fn encoded_bytes_are_four_byte_aligned(pio in arb_tree()) {
        let bytes = write(&pio).unwrap();
        prop_assert_eq!(bytes.len() % 4, 0);
    }
}
